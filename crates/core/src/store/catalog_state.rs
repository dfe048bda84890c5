//! # Catalog State
//!
//! The full client-side catalog and the paging/filter derivations over it.

use serde::Serialize;

use super::status::LoadStatus;
use crate::models::CatalogItem;

/// Everything the catalog views render from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    /// Items in arrival order, unique by id
    pub items: Vec<CatalogItem>,
    pub load_status: LoadStatus,
    /// Message of the last failed fetch
    pub load_error: Option<String>,
    /// 1-based page into the filtered items
    pub current_page: usize,
    /// Items per page, always > 0
    pub page_size: usize,
    pub filter_favorites_only: bool,
}

impl CatalogState {
    /// Empty, not-yet-loaded state
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            load_status: LoadStatus::NotStarted,
            load_error: None,
            current_page: 1,
            page_size: page_size.max(1),
            filter_favorites_only: false,
        }
    }

    /// Items passing the favorites filter, in order
    pub fn filtered_items(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        let favorites_only = self.filter_favorites_only;
        self.items
            .iter()
            .filter(move |item| !favorites_only || item.is_favorite)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_items().count()
    }

    /// Page count for the current filter, at least 1
    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size.max(1)).max(1)
    }

    /// Pull `current_page` back into `[1, total_pages]`
    pub fn clamp_page(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Items on the current page
    pub fn visible_items(&self) -> Vec<CatalogItem> {
        let page_size = self.page_size.max(1);
        let start = (self.current_page.max(1) - 1) * page_size;
        self.filtered_items()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}
