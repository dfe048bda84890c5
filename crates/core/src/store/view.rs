//! # Catalog View
//!
//! Render-ready snapshot of the store, published to subscribers after each
//! state change.

use serde::Serialize;

use super::catalog_state::CatalogState;
use super::status::LoadStatus;
use crate::models::CatalogItem;

/// What a list view needs to draw one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub items: Vec<CatalogItem>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub filter_favorites_only: bool,
    pub load_status: LoadStatus,
    pub load_error: Option<String>,
    /// All items, ignoring the filter
    pub total_items: usize,
    /// Items passing the filter
    pub matching_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl CatalogView {
    pub fn from_state(state: &CatalogState) -> Self {
        let total_pages = state.total_pages();
        Self {
            items: state.visible_items(),
            current_page: state.current_page,
            total_pages,
            page_size: state.page_size,
            filter_favorites_only: state.filter_favorites_only,
            load_status: state.load_status,
            load_error: state.load_error.clone(),
            total_items: state.items.len(),
            matching_items: state.filtered_count(),
            has_prev: state.current_page > 1,
            has_next: state.current_page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_counts() {
        let mut state = CatalogState::new(2);
        state.items = (0..5)
            .map(|i| CatalogItem::new(format!("c{i}"), "u"))
            .collect();
        state.items[0].is_favorite = true;
        state.current_page = 2;

        let view = CatalogView::from_state(&state);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.total_items, 5);
        assert_eq!(view.matching_items, 5);
        assert!(view.has_prev);
        assert!(view.has_next);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["loadStatus"], "not_started");
        assert_eq!(json["currentPage"], 2);
    }
}
