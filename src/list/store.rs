//! Shared cache for one paginated collection view
//!
//! A `ListStore` owns the cached `PaginatedList` for a collection and applies
//! page fetches and push events to it through the pure operations in
//! `list::sync`. Observers either register callbacks or listen on a broadcast
//! channel of `ListChange` events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::sync::{apply_page, edit_in_place, insert_sorted, remove_by_ids};
use super::{Document, PaginatedList, SortSpec, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use crate::error::{ClientError, Result};

/// A change applied to a `ListStore`
#[derive(Clone, Debug, PartialEq)]
pub enum ListChange {
    PageLoaded { page: u32 },
    Inserted(Document),
    Edited(Document),
    Removed(Vec<Value>),
}

#[derive(Debug, Default)]
struct ListState {
    list: Option<PaginatedList>,
    version: u64,
    last_synced: Option<DateTime<Utc>>,
}

type Callback = Box<dyn Fn(&ListChange) + Send + Sync>;

/// The cached list for a collection
#[derive(Clone)]
pub struct ListStore {
    name: String,
    sort: SortSpec,
    state: Arc<Mutex<ListState>>,
    writer: Arc<Mutex<()>>,
    subscribers: Arc<Mutex<HashMap<Uuid, Callback>>>,
    update_tx: broadcast::Sender<ListChange>,
}

impl ListStore {
    /// Create an empty store for the named collection
    pub fn new(name: &str, sort: SortSpec) -> Self {
        let (update_tx, _) = broadcast::channel(32);

        Self {
            name: name.to_string(),
            sort,
            state: Arc::new(Mutex::new(ListState::default())),
            writer: Arc::new(Mutex::new(())),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            update_tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Fold a fetched page into the cache
    pub fn apply_page(&self, incoming: PaginatedList) -> Result<()> {
        let page = incoming.page;

        self.mutate(|state| {
            let current_page = state.list.as_ref().map_or(DEFAULT_PAGE, |list| list.page);
            let current = state.list.as_ref().map(|list| list.documents.as_slice());
            state.list = Some(apply_page(current, current_page, incoming));
            state.last_synced = Some(Utc::now());
            Some(ListChange::PageLoaded { page })
        })?;

        log::debug!("[{}] loaded page {}", self.name, page);
        Ok(())
    }

    /// Insert a pushed document at its sorted position
    pub fn insert(&self, document: Document) -> Result<()> {
        let sort = self.sort.clone();

        self.mutate(move |state| {
            let inserted = document.clone();
            let list = state.list.get_or_insert_with(PaginatedList::default);
            list.documents = insert_sorted(
                Some(&list.documents),
                Some(list.page),
                Some(list.per_page),
                document,
                &sort,
            );
            Some(ListChange::Inserted(inserted))
        })?;

        Ok(())
    }

    /// Replace a cached document with a pushed update
    pub fn edit(&self, document: Document) -> Result<()> {
        self.mutate(move |state| {
            let list = state.list.as_mut()?;
            let documents = std::mem::take(&mut list.documents);
            list.documents = edit_in_place(Some(documents), &document).unwrap_or_default();
            Some(ListChange::Edited(document))
        })?;

        Ok(())
    }

    /// Drop cached documents by identifier
    pub fn remove(&self, ids: Vec<Value>) -> Result<()> {
        self.mutate(move |state| {
            let list = state.list.as_mut()?;
            let documents = std::mem::take(&mut list.documents);
            list.documents = remove_by_ids(Some(documents), &ids).unwrap_or_default();
            Some(ListChange::Removed(ids))
        })?;

        Ok(())
    }

    /// The cached documents, or `None` before anything was loaded
    pub fn documents(&self) -> Option<Vec<Document>> {
        self.snapshot().map(|list| list.documents)
    }

    /// A copy of the whole cached list
    pub fn snapshot(&self) -> Option<PaginatedList> {
        self.state.lock().ok().and_then(|state| state.list.clone())
    }

    /// Last fetched page, 1 when nothing was fetched
    pub fn page(&self) -> u32 {
        self.snapshot().map_or(DEFAULT_PAGE, |list| list.page)
    }

    /// Page size of the last fetched page
    pub fn per_page(&self) -> u32 {
        self.snapshot().map_or(DEFAULT_PER_PAGE, |list| list.per_page)
    }

    /// Number of changes applied so far
    pub fn version(&self) -> u64 {
        self.state.lock().map(|state| state.version).unwrap_or(0)
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.state.lock().ok().and_then(|state| state.last_synced)
    }

    /// Subscribe to changes
    ///
    /// Callbacks run in the order changes were applied. They may read the
    /// store but must not mutate it.
    pub fn subscribe(&self, callback: Box<dyn Fn(&ListChange) + Send + Sync>) -> Uuid {
        let id = Uuid::new_v4();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(id, callback);
        }
        id
    }

    /// Unsubscribe
    pub fn unsubscribe(&self, id: Uuid) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.remove(&id);
        }
    }

    /// Receive every change on a broadcast channel
    pub fn updates(&self) -> broadcast::Receiver<ListChange> {
        self.update_tx.subscribe()
    }

    /// Apply a change and announce it
    ///
    /// The writer lock is held until every observer has seen the change, so
    /// concurrent writers are announced in the order they were applied. The
    /// version only moves when `apply` reports a change.
    fn mutate(&self, apply: impl FnOnce(&mut ListState) -> Option<ListChange>) -> Result<()> {
        let _writer = self.writer.lock().map_err(|_| lock_error())?;

        let change = {
            let mut state = self.state.lock().map_err(|_| lock_error())?;
            let change = apply(&mut state);
            if change.is_some() {
                state.version += 1;
            }
            change
        };

        if let Some(change) = change {
            self.notify(change);
        }
        Ok(())
    }

    fn notify(&self, change: ListChange) {
        let _ = self.update_tx.send(change.clone());
        if let Ok(subs) = self.subscribers.lock() {
            for callback in subs.values() {
                callback(&change);
            }
        }
    }
}

fn lock_error() -> ClientError {
    ClientError::InvalidOperation("Failed to acquire lock".into())
}
