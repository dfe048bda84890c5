//! # Felis Core
//!
//! Catalog state management for the Felis cat breed browser: everything
//! between the remote breed API and whatever renders the cards.
//!
//! ## Architecture
//!
//! - `models` - Catalog items and breed records
//! - `config` - Runtime configuration (API endpoint, key, paging defaults)
//! - `source/` - Remote catalog source (breed/image HTTP API)
//! - `state/` - Key/value storage and the persisted catalog blob
//! - `store/` - Pure reducer, merge logic, and the `CatalogStore` context
//! - `validation` - Checks for locally added items
//!
//! ## Usage
//!
//! ```rust,ignore
//! use felis_core::{CatalogConfig, CatalogStore};
//!
//! let config = CatalogConfig::from_env();
//! let store = CatalogStore::open(&config)?;
//! store.refresh().await;
//! let view = store.snapshot();
//! ```

pub mod config;
pub mod models;
pub mod source;
pub mod state;
pub mod store;
pub mod validation;

pub use config::CatalogConfig;
pub use models::{BreedInfo, CatalogItem, Weight};
pub use store::{CatalogStore, CatalogView, ItemLookup, LoadStatus, RefreshOutcome, StoreError};
