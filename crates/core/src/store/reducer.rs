//! # Catalog Reducer
//!
//! `(state, action) -> new state`, with no storage or network access. The
//! store runs persistence after each dispatch based on [`should_persist`].

use super::action::Action;
use super::catalog_state::CatalogState;
use super::merge::{merge_remote, upsert_item};

/// Apply one action, returning the next state
pub fn reduce(state: &CatalogState, action: Action) -> CatalogState {
    let mut next = state.clone();

    match action {
        Action::FetchStarted => {
            if next.load_status.begin() {
                next.load_error = None;
            }
        }
        Action::FetchSucceeded(remote) => {
            next.items = merge_remote(&state.items, remote);
            next.load_status.succeed();
            next.load_error = None;
            next.clamp_page();
        }
        Action::FetchFailed(message) => {
            next.load_status.fail();
            next.load_error = Some(message);
        }
        Action::ItemFetched(item) => {
            upsert_item(&mut next.items, item);
            next.clamp_page();
        }
        Action::AddItem(mut item) => {
            if !next.contains(&item.id) {
                item.is_favorite = false;
                next.items.push(item);
            }
        }
        Action::DeleteItem(id) => {
            next.items.retain(|item| item.id != id);
            next.clamp_page();
        }
        Action::ToggleFavorite(id) => {
            if let Some(item) = next.items.iter_mut().find(|item| item.id == id) {
                item.is_favorite = !item.is_favorite;
                next.clamp_page();
            }
        }
        Action::SetFilterFavoritesOnly(flag) => {
            next.filter_favorites_only = flag;
            next.current_page = 1;
        }
        Action::ToggleShowFavorites => {
            next.filter_favorites_only = !next.filter_favorites_only;
            next.current_page = 1;
        }
        Action::GoToPage(page) => {
            next.current_page = page;
            next.clamp_page();
        }
        Action::NextPage => {
            if next.current_page < next.total_pages() {
                next.current_page += 1;
            }
        }
        Action::PrevPage => {
            next.current_page = next.current_page.saturating_sub(1).max(1);
        }
        Action::SetPageSize(size) => {
            if size > 0 {
                next.page_size = size;
                next.current_page = 1;
            }
        }
    }

    next
}

/// Whether the transition `before -> after` must be written to storage
///
/// Persisted fields are items, the favorites filter, and page size; fetch
/// results are always written. An intent that leaves all three unchanged,
/// such as re-setting the current filter flag, writes nothing.
pub fn should_persist(always: bool, before: &CatalogState, after: &CatalogState) -> bool {
    always
        || before.items != after.items
        || before.filter_favorites_only != after.filter_favorites_only
        || before.page_size != after.page_size
}
