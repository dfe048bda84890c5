pub mod db;
pub mod kv;
pub mod persistence;

pub use db::CatalogDb;
pub use kv::{KeyValueStore, MemoryStore};
pub use persistence::{CatalogPersistence, PersistedCatalog, STORAGE_KEY};
