//! # Catalog Store
//!
//! The single owner of `CatalogState`. Every mutation goes through the pure
//! reducer under one lock, then storage is synced and subscribers are
//! notified. Network calls happen outside the lock; the only suspension
//! points are `refresh` and `lookup`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::broadcast;

use super::action::Action;
use super::catalog_state::CatalogState;
use super::reducer::{reduce, should_persist};
use super::status::LoadStatus;
use super::view::CatalogView;
use crate::config::CatalogConfig;
use crate::models::CatalogItem;
use crate::source::{CatApiClient, CatalogSource};
use crate::state::{CatalogDb, CatalogPersistence};
use crate::validation::{ItemDraft, ValidationErrors};

/// Capacity of the view broadcast channel
const EVENT_CAPACITY: usize = 64;

/// Load error recorded when a refresh is dropped mid-fetch
const REFRESH_CANCELLED: &str = "Refresh cancelled before the fetch finished";

/// Rejected store intents
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid item: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("an item with id '{0}' already exists")]
    DuplicateId(String),
}

/// Result of a `refresh` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Another fetch was already in flight; nothing was requested
    AlreadyLoading,
    /// Listing merged; `count` items came from the remote
    Loaded { count: usize },
    /// Listing failed; items untouched
    Failed { message: String },
}

/// Result of a single-item lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    Found(CatalogItem),
    /// Neither local state nor the remote source knows this id
    NotFound,
    /// The remote lookup failed for another reason
    Failed(String),
}

/// Catalog context shared by every view binding
pub struct CatalogStore {
    state: Mutex<CatalogState>,
    persistence: CatalogPersistence,
    source: Arc<dyn CatalogSource>,
    events: broadcast::Sender<CatalogView>,
}

impl CatalogStore {
    /// Build the store, rehydrating from storage when possible
    ///
    /// A stored blob with items is adopted as `Loaded`; otherwise the store
    /// starts `NotStarted` and waits for `refresh`.
    pub fn initialize(
        persistence: CatalogPersistence,
        source: Arc<dyn CatalogSource>,
        default_page_size: usize,
    ) -> Self {
        let mut state = CatalogState::new(default_page_size);

        if let Some(persisted) = persistence.load() {
            if let Some(page_size) = persisted.page_size.filter(|size| *size > 0) {
                state.page_size = page_size;
            }
            state.filter_favorites_only = persisted.filter_favorites_only;

            if !persisted.items.is_empty() {
                // Stored blobs are not trusted to have unique ids
                let mut seen = HashSet::new();
                state.items = persisted
                    .items
                    .into_iter()
                    .filter(|item| seen.insert(item.id.clone()))
                    .collect();
                state.load_status = LoadStatus::Loaded;
                tracing::info!(items = state.items.len(), "Catalog rehydrated from storage");
            }
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: Mutex::new(state),
            persistence,
            source,
            events,
        }
    }

    /// Wire the default collaborators from configuration
    ///
    /// SQLite storage at `config.db_path` and the HTTP breed API.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        let db = CatalogDb::open_at(&config.db_path)
            .with_context(|| format!("Failed to open catalog storage at {:?}", config.db_path))?;
        let source = CatApiClient::new(config).context("Failed to build catalog API client")?;

        Ok(Self::initialize(
            CatalogPersistence::new(Arc::new(db)),
            Arc::new(source),
            config.page_size,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        // State is replaced whole after reducing, so a poisoned guard still holds a valid state
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run one action to completion; returns the new view and whether state changed
    fn apply(&self, action: Action) -> (CatalogView, bool) {
        let name = action.name();
        let always = action.always_persists();

        let (view, changed) = {
            let mut state = self.lock();
            let next = reduce(&state, action);

            if should_persist(always, &state, &next) {
                self.persistence.save(&next);
            }

            let changed = *state != next;
            *state = next;
            (CatalogView::from_state(&state), changed)
        };

        if changed {
            // No subscribers is fine
            let _ = self.events.send(view.clone());
        } else {
            tracing::debug!(action = name, "Action left catalog unchanged");
        }

        (view, changed)
    }

    /// Fetch the remote listing and merge it in
    ///
    /// A no-op while another fetch is in flight.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let (_, started) = self.apply(Action::FetchStarted);
        if !started {
            tracing::debug!("Refresh skipped, fetch already in flight");
            return RefreshOutcome::AlreadyLoading;
        }

        let mut guard = FetchGuard {
            store: self,
            armed: true,
        };
        let result = self.source.fetch_catalog().await;
        guard.armed = false;

        match result {
            Ok(items) => {
                let count = items.len();
                let (view, _) = self.apply(Action::FetchSucceeded(items));
                tracing::info!(remote = count, total = view.total_items, "Catalog refreshed");
                RefreshOutcome::Loaded { count }
            }
            Err(e) => {
                let message = format!("Failed to fetch catalog: {}", e);
                tracing::warn!("{}", message);
                self.apply(Action::FetchFailed(message.clone()));
                RefreshOutcome::Failed { message }
            }
        }
    }

    /// Validate a draft and append it as a local, non-favorite item
    pub fn add_item(&self, draft: ItemDraft) -> Result<CatalogItem, StoreError> {
        let item = draft.into_item()?;
        let id = item.id.clone();

        let (_, added) = self.apply(Action::AddItem(item.clone()));
        if !added {
            return Err(StoreError::DuplicateId(id));
        }

        tracing::info!(id = %id, "Local item added");
        Ok(item)
    }

    /// Remove an item; `false` if no item had that id
    pub fn delete_item(&self, id: &str) -> bool {
        let (_, removed) = self.apply(Action::DeleteItem(id.to_string()));
        if removed {
            tracing::info!(id = %id, "Item deleted");
        }
        removed
    }

    /// Flip the favorite flag; `false` if no item had that id
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let (_, toggled) = self.apply(Action::ToggleFavorite(id.to_string()));
        if !toggled {
            tracing::debug!(id = %id, "Toggle favorite ignored, no such item");
        }
        toggled
    }

    pub fn set_filter_favorites_only(&self, flag: bool) -> CatalogView {
        self.apply(Action::SetFilterFavoritesOnly(flag)).0
    }

    pub fn toggle_show_favorites(&self) -> CatalogView {
        self.apply(Action::ToggleShowFavorites).0
    }

    pub fn go_to_page(&self, page: usize) -> CatalogView {
        self.apply(Action::GoToPage(page)).0
    }

    pub fn next_page(&self) -> CatalogView {
        self.apply(Action::NextPage).0
    }

    pub fn prev_page(&self) -> CatalogView {
        self.apply(Action::PrevPage).0
    }

    /// Change items per page; zero is ignored
    pub fn set_page_size(&self, size: usize) -> CatalogView {
        if size == 0 {
            tracing::debug!("Ignoring page size of zero");
        }
        self.apply(Action::SetPageSize(size)).0
    }

    /// Items on the current page
    pub fn visible_items(&self) -> Vec<CatalogItem> {
        self.lock().visible_items()
    }

    pub fn snapshot(&self) -> CatalogView {
        CatalogView::from_state(&self.lock())
    }

    /// Copy of the full state
    pub fn state(&self) -> CatalogState {
        self.lock().clone()
    }

    pub fn load_status(&self) -> LoadStatus {
        self.lock().load_status
    }

    pub fn find(&self, id: &str) -> Option<CatalogItem> {
        self.lock().find(id).cloned()
    }

    /// Receive a view after every state change
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogView> {
        self.events.subscribe()
    }

    /// Find an item locally, falling back to the remote source
    ///
    /// A remotely fetched item is kept in the catalog. Never changes the
    /// load status.
    #[tracing::instrument(skip(self))]
    pub async fn lookup(&self, id: &str) -> ItemLookup {
        if let Some(item) = self.find(id) {
            return ItemLookup::Found(item);
        }

        match self.source.fetch_one(id).await {
            Ok(item) => {
                let fetched_id = item.id.clone();
                self.apply(Action::ItemFetched(item));
                match self.find(&fetched_id) {
                    Some(item) => ItemLookup::Found(item),
                    None => ItemLookup::NotFound,
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %id, "Item not found remotely");
                ItemLookup::NotFound
            }
            Err(e) => {
                tracing::warn!(id = %id, "Item lookup failed: {}", e);
                ItemLookup::Failed(format!("Failed to load item '{}': {}", id, e))
            }
        }
    }
}

/// Ends the in-flight fetch as failed if `refresh` is dropped before the
/// source answers; otherwise the status would stay `Loading` for good.
struct FetchGuard<'a> {
    store: &'a CatalogStore,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("{}", REFRESH_CANCELLED);
            self.store
                .apply(Action::FetchFailed(REFRESH_CANCELLED.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::models::BreedInfo;
    use crate::state::{KeyValueStore, MemoryStore};
    use crate::validation::DraftImage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Scripted remote source counting its calls
    struct FakeSource {
        listing: Mutex<Result<Vec<CatalogItem>, String>>,
        single: Mutex<Option<CatalogItem>>,
        gate: Option<Arc<Notify>>,
        catalog_calls: AtomicUsize,
        single_calls: AtomicUsize,
    }

    impl FakeSource {
        fn listing(items: Vec<CatalogItem>) -> Self {
            Self {
                listing: Mutex::new(Ok(items)),
                single: Mutex::new(None),
                gate: None,
                catalog_calls: AtomicUsize::new(0),
                single_calls: AtomicUsize::new(0),
            }
        }

        fn gated(items: Vec<CatalogItem>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::listing(items)
            }
        }

        fn set_listing(&self, items: Vec<CatalogItem>) {
            *self.listing.lock().unwrap() = Ok(items);
        }

        fn catalog_calls(&self) -> usize {
            self.catalog_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, SourceError> {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let listing = self.listing.lock().unwrap().clone();
            listing.map_err(|message| SourceError::Decode {
                url: "fake://breeds".to_string(),
                message,
            })
        }

        async fn fetch_one(&self, id: &str) -> Result<CatalogItem, SourceError> {
            self.single_calls.fetch_add(1, Ordering::SeqCst);
            match self.single.lock().unwrap().clone() {
                Some(item) if item.id == id => Ok(item),
                Some(_) | None if id == "broken" => Err(SourceError::Status {
                    status: 500,
                    url: "fake://breeds/broken".to_string(),
                }),
                _ => Err(SourceError::NotFound(id.to_string())),
            }
        }
    }

    fn item(id: &str) -> CatalogItem {
        let mut breed = BreedInfo::placeholder();
        breed.id = id.to_string();
        breed.name = id.to_uppercase();
        CatalogItem::new(id, format!("https://img/{id}.jpg")).with_breed(breed)
    }

    fn store_with(
        source: Arc<FakeSource>,
        page_size: usize,
    ) -> (CatalogStore, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let store = CatalogStore::initialize(
            CatalogPersistence::new(kv.clone()),
            source,
            page_size,
        );
        (store, kv)
    }

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            weight: crate::models::Weight {
                imperial: "8".to_string(),
                metric: "4".to_string(),
            },
            life_span: "12".to_string(),
            temperament: "Calm".to_string(),
            origin: "Home".to_string(),
            description: "A cat".to_string(),
            image: Some(DraftImage::Url {
                url: "https://img/local.jpg".to_string(),
            }),
            ..ItemDraft::default()
        }
    }

    #[tokio::test]
    async fn test_fresh_store_is_not_started() {
        let (store, kv) = store_with(Arc::new(FakeSource::listing(vec![])), 3);
        assert_eq!(store.load_status(), LoadStatus::NotStarted);
        assert!(store.visible_items().is_empty());
        assert_eq!(kv.writes(), 0);
    }

    #[tokio::test]
    async fn test_refresh_loads_and_persists() {
        let source = Arc::new(FakeSource::listing(vec![item("abys"), item("beng")]));
        let (store, kv) = store_with(source.clone(), 3);

        let outcome = store.refresh().await;
        assert_eq!(outcome, RefreshOutcome::Loaded { count: 2 });
        assert_eq!(store.load_status(), LoadStatus::Loaded);
        assert_eq!(store.visible_items().len(), 2);
        assert_eq!(kv.writes(), 1);
        assert_eq!(source.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_items() {
        let source = Arc::new(FakeSource::listing(vec![item("abys")]));
        let (store, kv) = store_with(source.clone(), 3);
        store.refresh().await;
        let writes = kv.writes();

        *source.listing.lock().unwrap() = Err("offline".to_string());
        let outcome = store.refresh().await;

        assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
        let state = store.state();
        assert_eq!(state.load_status, LoadStatus::Failed);
        assert!(state.load_error.unwrap().contains("offline"));
        assert_eq!(state.items.len(), 1);
        assert_eq!(kv.writes(), writes);
    }

    #[tokio::test]
    async fn test_refresh_while_loading_is_noop() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource::gated(vec![item("abys")], gate.clone()));
        let (store, _) = store_with(source.clone(), 3);
        let store = Arc::new(store);

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });

        while store.load_status() != LoadStatus::Loading {
            tokio::task::yield_now().await;
        }

        assert_eq!(store.refresh().await, RefreshOutcome::AlreadyLoading);
        gate.notify_one();

        assert_eq!(first.await.unwrap(), RefreshOutcome::Loaded { count: 1 });
        assert_eq!(source.catalog_calls(), 1);
    }

    async fn wait_for_loading(store: &CatalogStore) {
        while store.load_status() != LoadStatus::Loading {
            tokio::task::yield_now().await;
        }
    }

    fn spawn_refresh(store: &Arc<CatalogStore>) -> tokio::task::JoinHandle<RefreshOutcome> {
        let store = store.clone();
        tokio::spawn(async move { store.refresh().await })
    }

    #[tokio::test]
    async fn test_dropped_refresh_releases_loading() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource::gated(vec![item("abys")], gate.clone()));
        let (store, kv) = store_with(source.clone(), 3);
        let store = Arc::new(store);

        let task = spawn_refresh(&store);
        wait_for_loading(&store).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let state = store.state();
        assert_eq!(state.load_status, LoadStatus::Failed);
        assert_eq!(state.load_error.as_deref(), Some(REFRESH_CANCELLED));
        assert_eq!(kv.writes(), 0);

        gate.notify_one();
        assert_eq!(store.refresh().await, RefreshOutcome::Loaded { count: 1 });
        assert_eq!(store.load_status(), LoadStatus::Loaded);
        assert_eq!(source.catalog_calls(), 2);
    }

    #[tokio::test]
    async fn test_intents_during_refresh_merge_with_result() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource::gated(
            vec![item("a"), item("b"), item("c")],
            gate.clone(),
        ));
        let (store, _) = store_with(source.clone(), 3);
        let store = Arc::new(store);
        gate.notify_one();
        store.refresh().await;

        let task = spawn_refresh(&store);
        wait_for_loading(&store).await;

        assert!(store.toggle_favorite("a"));
        assert!(store.delete_item("b"));
        let added = store.add_item(draft("Moon Cat")).unwrap();
        assert_eq!(store.load_status(), LoadStatus::Loading);

        gate.notify_one();
        assert_eq!(task.await.unwrap(), RefreshOutcome::Loaded { count: 3 });

        let state = store.state();
        let ids: Vec<_> = state.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", added.id.as_str()]);
        assert!(state.find("a").unwrap().is_favorite);
        assert!(!state.find("b").unwrap().is_favorite);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[tokio::test]
    async fn test_failed_refresh_with_intents_leaves_loading() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(FakeSource::gated(vec![item("a")], gate.clone()));
        let (store, _) = store_with(source.clone(), 3);
        let store = Arc::new(store);
        gate.notify_one();
        store.refresh().await;

        let task = spawn_refresh(&store);
        wait_for_loading(&store).await;
        *source.listing.lock().unwrap() = Err("offline".to_string());
        assert!(store.toggle_favorite("a"));

        gate.notify_one();
        assert!(matches!(task.await.unwrap(), RefreshOutcome::Failed { .. }));
        assert_eq!(store.load_status(), LoadStatus::Failed);
        assert!(store.find("a").unwrap().is_favorite);

        source.set_listing(vec![item("a"), item("b")]);
        gate.notify_one();
        assert_eq!(store.refresh().await, RefreshOutcome::Loaded { count: 2 });
        assert_eq!(store.load_status(), LoadStatus::Loaded);
        assert!(store.find("a").unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_favorites_survive_refresh() {
        let source = Arc::new(FakeSource::listing(vec![item("abys"), item("beng")]));
        let (store, _) = store_with(source.clone(), 3);
        store.refresh().await;
        assert!(store.toggle_favorite("beng"));

        source.set_listing(vec![item("beng"), item("abys"), item("char")]);
        store.refresh().await;

        let state = store.state();
        let ids: Vec<_> = state.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["beng", "abys", "char"]);
        assert!(state.find("beng").unwrap().is_favorite);
        assert!(!state.find("abys").unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_local_items_survive_refresh() {
        let source = Arc::new(FakeSource::listing(vec![item("abys")]));
        let (store, _) = store_with(source.clone(), 3);
        store.refresh().await;

        let added = store.add_item(draft("Moon Cat")).unwrap();
        store.refresh().await;

        let state = store.state();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1].id, added.id);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_and_duplicate() {
        let (store, kv) = store_with(Arc::new(FakeSource::listing(vec![])), 3);

        let err = store.add_item(ItemDraft::default()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref e) if e.len() == 8));
        assert_eq!(kv.writes(), 0);

        let mut first = draft("Moon Cat");
        first.id = Some("moon".to_string());
        store.add_item(first.clone()).unwrap();
        assert_eq!(kv.writes(), 1);

        let err = store.add_item(first).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "moon"));
        assert_eq!(store.state().items.len(), 1);
        assert_eq!(kv.writes(), 1);
    }

    #[tokio::test]
    async fn test_toggle_missing_id_does_not_write() {
        let source = Arc::new(FakeSource::listing(vec![item("abys")]));
        let (store, kv) = store_with(source, 3);
        store.refresh().await;
        let before = store.state();
        let writes = kv.writes();

        assert!(!store.toggle_favorite("missing-id"));
        assert_eq!(store.state(), before);
        assert_eq!(kv.writes(), writes);
    }

    #[tokio::test]
    async fn test_delete_scenario() {
        let source = Arc::new(FakeSource::listing(vec![item("a"), item("b"), item("c")]));
        let (store, _) = store_with(source, 3);
        store.refresh().await;

        assert!(store.delete_item("b"));
        assert!(!store.delete_item("b"));
        assert_eq!(store.visible_items().len(), 2);
        assert_eq!(store.snapshot().current_page, 1);
    }

    #[tokio::test]
    async fn test_filter_with_zero_favorites() {
        let source = Arc::new(FakeSource::listing(vec![item("a"), item("b"), item("c"), item("d")]));
        let (store, _) = store_with(source, 3);
        store.refresh().await;
        store.next_page();

        let view = store.set_filter_favorites_only(true);
        assert!(view.items.is_empty());
        assert_eq!(view.current_page, 1);
        assert!(store.visible_items().is_empty());
    }

    #[tokio::test]
    async fn test_visible_items_is_idempotent() {
        let source = Arc::new(FakeSource::listing(vec![item("a"), item("b"), item("c"), item("d")]));
        let (store, kv) = store_with(source, 3);
        store.refresh().await;
        let writes = kv.writes();

        assert_eq!(store.visible_items(), store.visible_items());
        assert_eq!(store.snapshot(), store.snapshot());
        assert_eq!(kv.writes(), writes);
    }

    #[tokio::test]
    async fn test_paging_does_not_persist() {
        let source = Arc::new(FakeSource::listing(vec![item("a"), item("b"), item("c"), item("d")]));
        let (store, kv) = store_with(source, 3);
        store.refresh().await;
        let writes = kv.writes();

        assert_eq!(store.next_page().current_page, 2);
        assert_eq!(store.next_page().current_page, 2);
        assert_eq!(store.prev_page().current_page, 1);
        assert_eq!(store.go_to_page(7).current_page, 2);
        assert_eq!(kv.writes(), writes);

        assert_eq!(store.set_page_size(2).current_page, 1);
        assert_eq!(kv.writes(), writes + 1);
    }

    #[tokio::test]
    async fn test_rehydrate_from_storage() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            crate::state::STORAGE_KEY,
            r#"{"items": [
                {"id": "a", "displayUrl": "u", "isFavorite": true},
                {"id": "a", "displayUrl": "dup"},
                {"id": "b", "displayUrl": "u"}
            ], "filterFavoritesOnly": true, "pageSize": 5}"#,
        )
        .unwrap();

        let source = Arc::new(FakeSource::listing(vec![]));
        let store = CatalogStore::initialize(CatalogPersistence::new(kv), source.clone(), 3);

        let state = store.state();
        assert_eq!(state.load_status, LoadStatus::Loaded);
        assert_eq!(state.items.len(), 2);
        assert!(state.filter_favorites_only);
        assert_eq!(state.page_size, 5);
        assert_eq!(store.visible_items().len(), 1);
        assert_eq!(source.catalog_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_blob_starts_not_started() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(crate::state::STORAGE_KEY, r#"{"items": []}"#).unwrap();

        let store = CatalogStore::initialize(
            CatalogPersistence::new(kv),
            Arc::new(FakeSource::listing(vec![])),
            3,
        );
        assert_eq!(store.load_status(), LoadStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_lookup_prefers_local_then_remote() {
        let source = Arc::new(FakeSource::listing(vec![item("abys")]));
        *source.single.lock().unwrap() = Some(item("beng"));
        let (store, kv) = store_with(source.clone(), 3);
        store.refresh().await;
        let writes = kv.writes();

        assert_eq!(store.lookup("abys").await, ItemLookup::Found(item("abys")));
        assert_eq!(source.single_calls.load(Ordering::SeqCst), 0);

        let found = store.lookup("beng").await;
        assert!(matches!(found, ItemLookup::Found(ref i) if i.id == "beng"));
        assert!(store.find("beng").is_some());
        assert_eq!(kv.writes(), writes + 1);

        assert_eq!(store.lookup("nope").await, ItemLookup::NotFound);
        assert!(matches!(store.lookup("broken").await, ItemLookup::Failed(_)));
        assert_eq!(store.load_status(), LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let source = Arc::new(FakeSource::listing(vec![item("a"), item("b")]));
        let (store, _) = store_with(source, 3);
        let mut rx = store.subscribe();

        store.refresh().await;
        assert_eq!(rx.recv().await.unwrap().load_status, LoadStatus::Loading);
        assert_eq!(rx.recv().await.unwrap().total_items, 2);

        store.toggle_favorite("missing");
        store.toggle_favorite("a");
        let view = rx.recv().await.unwrap();
        assert!(view.items[0].is_favorite);
        assert!(rx.try_recv().is_err());
    }
}
