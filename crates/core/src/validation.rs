//! # Item Validation
//!
//! Checks a user-submitted draft before it becomes a local catalog item.
//! All failing fields are reported together, keyed by field.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BreedInfo, CatalogItem, Weight};

/// Largest accepted upload
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted upload content types
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Dimensions recorded for locally added images
const LOCAL_IMAGE_SIZE: u32 = 500;

/// A draft field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Name,
    WeightImperial,
    WeightMetric,
    LifeSpan,
    Temperament,
    Origin,
    Description,
    Image,
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<DraftField, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: DraftField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

/// Image attached to a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DraftImage {
    /// Already hosted somewhere
    Url { url: String },
    /// Uploaded bytes, base64-encoded
    #[serde(rename_all = "camelCase")]
    Upload { content_type: String, data: String },
}

/// A locally submitted item before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    /// Explicit id; generated when absent or blank
    pub id: Option<String>,
    pub name: String,
    pub weight: Weight,
    pub life_span: String,
    pub temperament: String,
    pub origin: String,
    pub description: String,
    pub image: Option<DraftImage>,
}

impl ItemDraft {
    /// Validate and build the catalog item
    pub fn into_item(self) -> Result<CatalogItem, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let required = [
            (DraftField::Name, &self.name, "Breed name is required"),
            (
                DraftField::WeightImperial,
                &self.weight.imperial,
                "Weight (imperial) is required",
            ),
            (
                DraftField::WeightMetric,
                &self.weight.metric,
                "Weight (metric) is required",
            ),
            (DraftField::LifeSpan, &self.life_span, "Life span is required"),
            (
                DraftField::Temperament,
                &self.temperament,
                "Temperament is required",
            ),
            (DraftField::Origin, &self.origin, "Origin is required"),
            (
                DraftField::Description,
                &self.description,
                "Description is required",
            ),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.add(field, message);
            }
        }

        let display_url = match self.image.as_ref().map(image_url) {
            Some(Ok(url)) => Some(url),
            Some(Err(message)) => {
                errors.add(DraftField::Image, message);
                None
            }
            None => {
                errors.add(DraftField::Image, "Image is required");
                None
            }
        };

        let display_url = match display_url {
            Some(url) if errors.is_empty() => url,
            _ => return Err(errors),
        };

        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(generate_item_id);

        let breed = BreedInfo {
            id: id.clone(),
            name: self.name.trim().to_string(),
            weight: Weight {
                imperial: self.weight.imperial.trim().to_string(),
                metric: self.weight.metric.trim().to_string(),
            },
            life_span: self.life_span.trim().to_string(),
            temperament: self.temperament.trim().to_string(),
            origin: self.origin.trim().to_string(),
            description: self.description.trim().to_string(),
            reference_image_id: None,
        };

        Ok(CatalogItem::new(id, display_url)
            .with_breed(breed)
            .with_dimensions(LOCAL_IMAGE_SIZE, LOCAL_IMAGE_SIZE))
    }
}

/// Resolve a draft image to a displayable URL
fn image_url(image: &DraftImage) -> Result<String, String> {
    match image {
        DraftImage::Url { url } => {
            let url = url.trim();
            if url.is_empty() {
                Err("Image is required".to_string())
            } else {
                Ok(url.to_string())
            }
        }
        DraftImage::Upload { content_type, data } => {
            if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                return Err(format!(
                    "Invalid file format. Allowed: {}",
                    ALLOWED_IMAGE_TYPES.join(", ")
                ));
            }

            let bytes = BASE64
                .decode(data.trim())
                .map_err(|_| "Image data is not valid base64".to_string())?;

            if bytes.is_empty() {
                return Err("Image is required".to_string());
            }
            if bytes.len() > MAX_IMAGE_BYTES {
                return Err(format!(
                    "The file is too large. Maximum size: {}MB",
                    MAX_IMAGE_BYTES / 1024 / 1024
                ));
            }

            Ok(format!(
                "data:{};base64,{}",
                content_type,
                BASE64.encode(&bytes)
            ))
        }
    }
}

/// Generate an id for a locally added item
pub fn generate_item_id() -> String {
    format!("local-{}", Uuid::new_v4())
}
