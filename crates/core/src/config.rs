//! # Catalog Configuration
//!
//! Runtime settings for the remote source, storage location, and paging.
//! Defaults match the public cat API; every field can be overridden from
//! the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Default base URL of the breed/image API
pub const DEFAULT_API_BASE_URL: &str = "https://api.thecatapi.com/v1";

/// Configuration for the catalog store and its collaborators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL of the breed/image API, without trailing slash
    pub api_base_url: String,
    /// Static API key sent as `x-api-key` (empty is tolerated)
    #[serde(default)]
    pub api_key: String,
    /// Number of breeds requested from the listing endpoint
    pub breed_limit: u32,
    /// Items per page for a fresh catalog
    pub page_size: usize,
    /// SQLite file holding the persisted catalog
    pub db_path: PathBuf,
    /// Per-request timeout for the remote source
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            breed_limit: 20,
            page_size: 3,
            db_path: PathBuf::from(".felis/felis.db"),
            request_timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    /// Build a configuration from defaults overlaid with environment variables
    ///
    /// - `FELIS_API_BASE_URL`
    /// - `CAT_API_KEY`
    /// - `FELIS_BREED_LIMIT`
    /// - `FELIS_PAGE_SIZE`
    /// - `FELIS_DB_PATH`
    /// - `FELIS_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CatalogConfig::from_env`] with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FELIS_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(key) = lookup("CAT_API_KEY") {
            config.api_key = key.trim().to_string();
        }
        if let Some(path) = lookup("FELIS_DB_PATH").filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        config.breed_limit = parse_or("FELIS_BREED_LIMIT", &lookup, config.breed_limit);
        config.request_timeout_secs = parse_or(
            "FELIS_REQUEST_TIMEOUT_SECS",
            &lookup,
            config.request_timeout_secs,
        );

        let page_size = parse_or("FELIS_PAGE_SIZE", &lookup, config.page_size);
        if page_size > 0 {
            config.page_size = page_size;
        } else {
            tracing::warn!("FELIS_PAGE_SIZE must be positive, keeping {}", config.page_size);
        }

        config
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, fallback: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(%key, value = %raw, "Unparsable setting, using {}", fallback);
                fallback
            }
        },
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = CatalogConfig::from_lookup(|_| None);
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.page_size, 3);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_environment_overrides() {
        let config = CatalogConfig::from_lookup(lookup_from(&[
            ("FELIS_API_BASE_URL", "http://localhost:9000/v1/"),
            ("CAT_API_KEY", " secret "),
            ("FELIS_BREED_LIMIT", "5"),
            ("FELIS_PAGE_SIZE", "6"),
        ]));

        assert_eq!(config.api_base_url, "http://localhost:9000/v1");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.breed_limit, 5);
        assert_eq!(config.page_size, 6);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = CatalogConfig::from_lookup(lookup_from(&[
            ("FELIS_BREED_LIMIT", "lots"),
            ("FELIS_PAGE_SIZE", "0"),
        ]));

        assert_eq!(config.breed_limit, 20);
        assert_eq!(config.page_size, 3);
    }
}
