//! # Catalog Actions
//!
//! Every state change goes through one of these.

use crate::models::CatalogItem;

/// An intent or a fetch result applied to `CatalogState`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A catalog fetch is about to start
    FetchStarted,
    /// The remote listing arrived
    FetchSucceeded(Vec<CatalogItem>),
    /// The remote listing failed with a readable message
    FetchFailed(String),
    /// A single item was fetched for the detail view
    ItemFetched(CatalogItem),
    /// Append a locally created item
    AddItem(CatalogItem),
    DeleteItem(String),
    ToggleFavorite(String),
    SetFilterFavoritesOnly(bool),
    ToggleShowFavorites,
    GoToPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(usize),
}

impl Action {
    /// Fetch results are written even if they leave items unchanged
    pub fn always_persists(&self) -> bool {
        matches!(self, Self::FetchSucceeded(_) | Self::ItemFetched(_))
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchStarted => "fetch_started",
            Self::FetchSucceeded(_) => "fetch_succeeded",
            Self::FetchFailed(_) => "fetch_failed",
            Self::ItemFetched(_) => "item_fetched",
            Self::AddItem(_) => "add_item",
            Self::DeleteItem(_) => "delete_item",
            Self::ToggleFavorite(_) => "toggle_favorite",
            Self::SetFilterFavoritesOnly(_) => "set_filter_favorites_only",
            Self::ToggleShowFavorites => "toggle_show_favorites",
            Self::GoToPage(_) => "go_to_page",
            Self::NextPage => "next_page",
            Self::PrevPage => "prev_page",
            Self::SetPageSize(_) => "set_page_size",
        }
    }
}
