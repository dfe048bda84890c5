//! # Catalog Models
//!
//! Cat breed records and the catalog items built from them.
//!
//! The same types describe the remote API payloads and the persisted blob,
//! so breed fields keep the API's snake_case names while item fields use
//! camelCase.

use serde::{Deserialize, Serialize};

/// Weight range as free text, e.g. "7 - 10" / "3 - 5"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Weight {
    #[serde(default)]
    pub imperial: String,
    #[serde(default)]
    pub metric: String,
}

/// Descriptive metadata for a cat breed
///
/// Attached to an item as a whole; never edited field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedInfo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub weight: Weight,
    #[serde(default)]
    pub life_span: String,
    #[serde(default)]
    pub temperament: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_id: Option<String>,
}

impl BreedInfo {
    /// Stand-in record for items that arrive without breed data
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: "Unknown Breed".to_string(),
            weight: Weight {
                imperial: "N/A".to_string(),
                metric: "N/A".to_string(),
            },
            life_span: "N/A".to_string(),
            temperament: "Unknown".to_string(),
            origin: "Unknown".to_string(),
            description: "N/A".to_string(),
            reference_image_id: None,
        }
    }
}

/// One displayable card: an image plus (usually) one breed record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(alias = "url", default)]
    pub display_url: String,
    #[serde(alias = "breeds", default)]
    pub breed_info: Vec<BreedInfo>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl CatalogItem {
    /// Create a non-favorite item
    pub fn new(id: impl Into<String>, display_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_url: display_url.into(),
            breed_info: Vec::new(),
            is_favorite: false,
            width: None,
            height: None,
        }
    }

    /// Attach a breed record, replacing any existing one
    pub fn with_breed(mut self, breed: BreedInfo) -> Self {
        self.breed_info = vec![breed];
        self
    }

    /// Set the image dimensions
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// The breed shown on the card, if any
    pub fn breed(&self) -> Option<&BreedInfo> {
        self.breed_info.first()
    }

    /// Breed name for display, falling back to the placeholder name
    pub fn display_name(&self) -> &str {
        self.breed().map(|b| b.name.as_str()).unwrap_or("Unknown Breed")
    }

    /// Guarantee a breed record so renderers never see an empty list
    pub fn with_placeholder_breed(mut self) -> Self {
        if self.breed_info.is_empty() {
            self.breed_info.push(BreedInfo::placeholder());
        }
        self
    }
}
