//! # Remote Merge
//!
//! Reconciles a fresh remote listing with local state.
//!
//! - Remote order wins; a repeated remote id keeps its first occurrence
//! - Favorite flags carry over from local items with the same id
//! - Items missing breed data get the placeholder breed
//! - Local-only items follow, in their local order

use std::collections::{HashMap, HashSet};

use crate::models::CatalogItem;

/// Merge a remote listing into the local item list
pub fn merge_remote(local: &[CatalogItem], remote: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let favorites: HashMap<&str, bool> = local
        .iter()
        .map(|item| (item.id.as_str(), item.is_favorite))
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(remote.len() + local.len());
    let mut merged = Vec::with_capacity(remote.len() + local.len());

    for mut item in remote {
        if !seen.insert(item.id.clone()) {
            continue;
        }
        item.is_favorite = favorites.get(item.id.as_str()).copied().unwrap_or(false);
        merged.push(item.with_placeholder_breed());
    }

    for item in local {
        if seen.insert(item.id.clone()) {
            merged.push(item.clone());
        }
    }

    merged
}

/// Insert or replace a single fetched item, keeping its favorite flag
pub fn upsert_item(items: &mut Vec<CatalogItem>, mut item: CatalogItem) {
    match items.iter().position(|existing| existing.id == item.id) {
        Some(index) => {
            item.is_favorite = items[index].is_favorite;
            items[index] = item.with_placeholder_breed();
        }
        None => {
            item.is_favorite = false;
            items.push(item.with_placeholder_breed());
        }
    }
}
