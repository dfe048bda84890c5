//! # Cat API Client
//!
//! `CatalogSource` over the public cat breed API.
//!
//! ## Endpoints
//!
//! - `GET /breeds?limit=N` - breed records
//! - `GET /images/search?breed_ids=ID&limit=1` - one image per breed
//! - `GET /breeds/{id}` and `GET /images/{image_id}` - single item

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{CatalogSource, SourceError};
use crate::config::CatalogConfig;
use crate::models::{BreedInfo, CatalogItem};

/// Image record as returned by the image endpoints
#[derive(Debug, Clone, Deserialize)]
struct ImageRecord {
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// HTTP client for the breed/image API
pub struct CatApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    breed_limit: u32,
}

impl CatApiClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("felis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_empty() {
            tracing::warn!("No API key configured; requests may be rejected by the provider");
        }

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            breed_limit: config.breed_limit,
        })
    }

    async fn get_value(&self, url: &str) -> Result<serde_json::Value, SourceError> {
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| decode_error(url, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let value = self.get_value(url).await?;
        serde_json::from_value(value).map_err(|e| decode_error(url, e))
    }

    /// First image for a breed, `None` if the API has none
    async fn item_for_breed(&self, breed: BreedInfo) -> Result<Option<CatalogItem>, SourceError> {
        let url = format!(
            "{}/images/search?breed_ids={}&limit=1",
            self.base_url,
            urlencoding::encode(&breed.id)
        );

        let images: Vec<ImageRecord> = self.get_json(&url).await?;
        let image = images.into_iter().find(|image| !image.url.is_empty());

        if image.is_none() {
            tracing::debug!(breed = %breed.id, "No image for breed, skipping");
        }

        Ok(image.map(|image| item_from(breed, image)))
    }
}

#[async_trait]
impl CatalogSource for CatApiClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, SourceError> {
        let url = format!("{}/breeds?limit={}", self.base_url, self.breed_limit);
        let breeds: Vec<BreedInfo> = self.get_json(&url).await?;
        let breed_count = breeds.len();

        let items: Vec<CatalogItem> =
            try_join_all(breeds.into_iter().map(|breed| self.item_for_breed(breed)))
                .await?
                .into_iter()
                .flatten()
                .collect();

        tracing::info!(breeds = breed_count, items = items.len(), "Fetched catalog");
        Ok(items)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_one(&self, id: &str) -> Result<CatalogItem, SourceError> {
        let breed_url = format!("{}/breeds/{}", self.base_url, urlencoding::encode(id));
        let value = self
            .get_value(&breed_url)
            .await
            .map_err(|e| not_found_on_404(e, id))?;

        // Unknown breed ids come back as an empty object
        if value.as_object().map_or(true, |fields| fields.is_empty()) {
            return Err(SourceError::NotFound(id.to_string()));
        }
        let breed: BreedInfo =
            serde_json::from_value(value).map_err(|e| decode_error(&breed_url, e))?;

        let image_id = match breed.reference_image_id.as_deref() {
            Some(image_id) if !image_id.is_empty() => image_id.to_string(),
            _ => return Err(SourceError::MissingImage(breed.id.clone())),
        };

        let image_url = format!(
            "{}/images/{}",
            self.base_url,
            urlencoding::encode(&image_id)
        );
        let image: ImageRecord = self
            .get_json(&image_url)
            .await
            .map_err(|e| not_found_on_404(e, id))?;

        Ok(item_from(breed, image))
    }
}

fn item_from(breed: BreedInfo, image: ImageRecord) -> CatalogItem {
    let mut item = CatalogItem::new(breed.id.clone(), image.url).with_breed(breed);
    item.width = image.width;
    item.height = image.height;
    item
}

fn not_found_on_404(err: SourceError, id: &str) -> SourceError {
    match err {
        SourceError::Status { status: 404, .. } => SourceError::NotFound(id.to_string()),
        other => other,
    }
}

fn decode_error(url: &str, err: serde_json::Error) -> SourceError {
    SourceError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    }
}
