//! # Catalog Store
//!
//! Client-side catalog state: what was fetched, what the user changed, and
//! which page of it is on screen.
//!
//! ```text
//! intent → Action → reduce(state, action) → new state
//!                                        ├→ persistence (if items/filter changed)
//!                                        └→ subscribers (CatalogView)
//! ```

pub mod action;
pub mod catalog_state;
pub mod catalog_store;
pub mod merge;
pub mod reducer;
pub mod status;
pub mod view;

pub use action::Action;
pub use catalog_state::CatalogState;
pub use catalog_store::{CatalogStore, ItemLookup, RefreshOutcome, StoreError};
pub use merge::merge_remote;
pub use reducer::{reduce, should_persist};
pub use status::LoadStatus;
pub use view::CatalogView;
