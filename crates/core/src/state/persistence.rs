//! # Catalog Persistence
//!
//! Reads and writes the catalog blob under a single fixed key. Every
//! failure is absorbed here: a missing, unreadable, or malformed blob loads
//! as `None`, and write failures are logged and dropped.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::kv::KeyValueStore;
use crate::models::CatalogItem;
use crate::store::CatalogState;

/// Storage key of the persisted catalog
pub const STORAGE_KEY: &str = "catalog_state";

/// The persisted projection of `CatalogState`
///
/// Unknown fields are ignored and missing optional ones defaulted, so older
/// and newer blobs both load. `items` is the only required field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCatalog {
    #[serde(alias = "cats")]
    pub items: Vec<CatalogItem>,
    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    pub load_status: Option<String>,
    #[serde(default, alias = "showFavorites")]
    pub filter_favorites_only: bool,
    #[serde(default, alias = "itemsPerPage", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl PersistedCatalog {
    /// Project the fields of a state worth keeping across restarts
    pub fn from_state(state: &CatalogState) -> Self {
        Self {
            items: state.items.clone(),
            load_status: Some(state.load_status.as_str().to_string()),
            filter_favorites_only: state.filter_favorites_only,
            page_size: Some(state.page_size),
        }
    }
}

/// Persistence adapter over a key/value store
#[derive(Clone)]
pub struct CatalogPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CatalogPersistence {
    /// Adapter writing under [`STORAGE_KEY`]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Load the stored blob, `None` on any failure
    pub fn load(&self) -> Option<PersistedCatalog> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read persisted catalog: {:#}", e);
                return None;
            }
        };

        match serde_json::from_str::<PersistedCatalog>(&raw) {
            Ok(persisted) => Some(persisted),
            Err(e) => {
                tracing::warn!(key = %self.key, "Discarding malformed persisted catalog: {}", e);
                None
            }
        }
    }

    /// Write the persisted projection of `state`
    pub fn save(&self, state: &CatalogState) {
        let blob = PersistedCatalog::from_state(state);

        let data = match serde_json::to_string(&blob) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to serialize catalog state: {}", e);
                return;
            }
        };

        match self.store.set(&self.key, &data) {
            Ok(()) => tracing::debug!(items = blob.items.len(), "Catalog state persisted"),
            Err(e) => tracing::warn!(key = %self.key, "Failed to persist catalog state: {:#}", e),
        }
    }

    /// Drop the stored blob
    ///
    /// Unlike `save`, failures are returned: this is an explicit user request.
    pub fn clear(&self) -> anyhow::Result<()> {
        self.store
            .remove(&self.key)
            .with_context(|| format!("Failed to clear persisted catalog '{}'", self.key))?;
        tracing::info!(key = %self.key, "Persisted catalog cleared");
        Ok(())
    }
}
