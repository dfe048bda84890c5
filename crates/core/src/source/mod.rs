//! # Remote Catalog Source
//!
//! The breed/image API as seen by the store: a bulk listing and a
//! single-item lookup.

pub mod cat_api;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CatalogItem;

pub use cat_api::CatApiClient;

/// Failures of the remote source
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested item does not exist remotely
    #[error("not found: {0}")]
    NotFound(String),
    /// Transport-level failure (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    /// The response body did not have the expected shape
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
    /// The breed exists but has no image to show
    #[error("breed '{0}' has no reference image")]
    MissingImage(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Provider of catalog items
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full listing; items may lack breed data
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, SourceError>;

    /// Fetch one item by id
    async fn fetch_one(&self, id: &str) -> Result<CatalogItem, SourceError>;
}
