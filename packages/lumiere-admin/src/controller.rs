//! List/filter/paginate/select controller for one admin resource.
//!
//! The controller owns the filter state, the cached page, and the selection.
//! Every fetch is stamped with a request token; a response only commits if no
//! newer fetch was issued while it was in flight, so overlapping reloads can
//! never leave an older page on screen.
//!
//! State transitions are all-or-nothing: filters, items, and total are
//! replaced together on success and left untouched on failure.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lumiere_client::Page;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AdminError, Result};
use crate::filters::{FilterState, FilterValue};
use crate::pagination::{self, PageDirection, PageInfo};
use crate::resource::{Creatable, Editable, Resource};
use crate::selection::SelectionSet;
use crate::traits::BaseBackend;

/// Result of a fetch that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// The response replaced the cached page.
    Applied,
    /// A newer fetch was issued meanwhile; the response was discarded.
    Stale,
}

/// Outcome of a confirmed single-item action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Declined,
    Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    NothingSelected,
    Declined,
    Deleted { count: usize },
}

/// Read-only copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    pub filters: FilterState,
    pub items: Vec<T>,
    pub total: u64,
    pub selected: SelectionSet,
}

impl<T> ListSnapshot<T> {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.filters.skip(), self.filters.limit(), self.total)
    }
}

struct ListState<T> {
    filters: FilterState,
    items: Vec<T>,
    total: u64,
    selected: SelectionSet,
    latest_token: u64,
}

pub struct ResourceListController<R: Resource> {
    backend: Arc<dyn BaseBackend>,
    state: Mutex<ListState<R::Item>>,
    _resource: PhantomData<R>,
}

impl<R: Resource> ResourceListController<R> {
    pub fn new(backend: Arc<dyn BaseBackend>) -> Self {
        Self::with_filters(backend, FilterState::default())
    }

    pub fn with_page_size(backend: Arc<dyn BaseBackend>, limit: u64) -> Self {
        Self::with_filters(backend, FilterState::with_limit(limit))
    }

    fn with_filters(backend: Arc<dyn BaseBackend>, filters: FilterState) -> Self {
        Self {
            backend,
            state: Mutex::new(ListState {
                filters,
                items: Vec::new(),
                total: 0,
                selected: SelectionSet::new(),
                latest_token: 0,
            }),
            _resource: PhantomData,
        }
    }

    // The guard is never held across an await, so a poisoned lock still
    // holds consistent state.
    fn lock(&self) -> MutexGuard<'_, ListState<R::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn snapshot(&self) -> ListSnapshot<R::Item> {
        let state = self.lock();
        ListSnapshot {
            filters: state.filters.clone(),
            items: state.items.clone(),
            total: state.total,
            selected: state.selected.clone(),
        }
    }

    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.lock().items.clone()
    }

    pub fn total(&self) -> u64 {
        self.lock().total
    }

    pub fn selected(&self) -> SelectionSet {
        self.lock().selected.clone()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.lock().selected.contains(id)
    }

    fn filters_and_total(&self) -> (FilterState, u64) {
        let state = self.lock();
        (state.filters.clone(), state.total)
    }

    pub fn page_info(&self) -> PageInfo {
        let state = self.lock();
        PageInfo::new(state.filters.skip(), state.filters.limit(), state.total)
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Store a filter value without fetching. Falsy values unset the key.
    pub fn set_filter(&self, key: &str, value: impl Into<FilterValue>) -> Result<()> {
        if !R::accepts_filter(key) {
            return Err(AdminError::UnknownFilter {
                resource: R::NAME,
                key: key.to_string(),
            });
        }
        self.lock().filters.set(key, value.into())
    }

    pub fn reset_to_first_page(&self) {
        self.lock().filters.reset_to_first_page();
    }

    /// Restart pagination and fetch with the current filters.
    pub async fn apply_filters(&self) -> Result<Fetch> {
        let mut filters = self.filters();
        filters.reset_to_first_page();
        self.fetch(filters).await
    }

    pub async fn reload(&self) -> Result<Fetch> {
        let filters = self.filters();
        self.fetch(filters).await
    }

    /// Move one page. `None` when the move is out of range; nothing is fetched.
    pub async fn change_page(&self, direction: PageDirection) -> Result<Option<Fetch>> {
        let (mut filters, total) = self.filters_and_total();
        let Some(skip) = pagination::step(filters.skip(), filters.limit(), total, direction) else {
            debug!(resource = R::NAME, %direction, "Page change out of range");
            return Ok(None);
        };
        filters.set_skip(skip);
        self.fetch(filters).await.map(Some)
    }

    /// Fetch one page for `filters` and commit it together with its offset.
    async fn fetch(&self, filters: FilterState) -> Result<Fetch> {
        let token = {
            let mut state = self.lock();
            state.latest_token += 1;
            state.latest_token
        };
        let query = filters.to_query();
        debug!(resource = R::NAME, token, ?query, "Fetching list page");

        let page = self
            .backend
            .list_items(&R::list_path(), &query)
            .await
            .and_then(decode_page::<R>);
        let mut state = self.lock();
        let page = match page {
            Ok(page) => page,
            Err(e) if token != state.latest_token => {
                debug!(resource = R::NAME, token, error = %e, "Superseded list fetch failed");
                return Ok(Fetch::Stale);
            }
            Err(e) => {
                warn!(resource = R::NAME, token, error = %e, "List fetch failed");
                return Err(e);
            }
        };

        if token != state.latest_token {
            debug!(
                resource = R::NAME,
                token,
                latest = state.latest_token,
                "Discarding stale list response"
            );
            return Ok(Fetch::Stale);
        }
        // Only the offset is committed; filter edits made while the request
        // was in flight stay pending for the next fetch.
        state.filters.set_skip(filters.skip());
        state.items = page.items;
        state.total = page.total;
        state.selected.clear();
        debug!(resource = R::NAME, token, total = state.total, "List page applied");
        Ok(Fetch::Applied)
    }

    /// Reload after a delete; if the current page emptied out, step back to
    /// the last page that still has rows.
    async fn reload_after_delete(&self) -> Result<Fetch> {
        let fetched = self.reload().await?;
        let (mut filters, total) = self.filters_and_total();
        if fetched == Fetch::Applied && total > 0 && filters.skip() >= total {
            filters.set_skip(pagination::last_page_start(total, filters.limit()));
            debug!(resource = R::NAME, skip = filters.skip(), "Stepping back to last page");
            return self.fetch(filters).await;
        }
        Ok(fetched)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns whether `id` is selected afterwards.
    pub fn toggle_selection(&self, id: i64) -> bool {
        self.lock().selected.toggle(id)
    }

    /// `true` selects every row of the cached page; `false` empties the
    /// selection, including ids toggled while other pages were shown.
    pub fn toggle_all(&self, select_all: bool) {
        let mut state = self.lock();
        if select_all {
            let ids: Vec<i64> = state.items.iter().map(R::id_of).collect();
            state.selected.select_all(ids);
        } else {
            state.selected.clear();
        }
    }

    pub fn clear_selection(&self) {
        self.lock().selected.clear();
    }

    /// Delete every selected id in one request.
    ///
    /// `confirm` sees the ids and runs once; nothing is sent if it returns
    /// false. The selection survives a failed request so it can be retried;
    /// once the request succeeds it is cleared, even if the reload then fails.
    pub async fn bulk_delete<F>(&self, confirm: F) -> Result<BulkOutcome>
    where
        F: FnOnce(&[i64]) -> bool,
    {
        let ids = self.lock().selected.ids();
        if ids.is_empty() {
            return Ok(BulkOutcome::NothingSelected);
        }
        if !confirm(&ids) {
            debug!(resource = R::NAME, count = ids.len(), "Bulk delete declined");
            return Ok(BulkOutcome::Declined);
        }

        if let Err(e) = self
            .backend
            .bulk_delete_items(&R::bulk_delete_path(), &ids)
            .await
        {
            warn!(resource = R::NAME, error = %e, "Bulk delete failed");
            return Err(e);
        }
        info!(resource = R::NAME, count = ids.len(), "Bulk delete committed");
        self.clear_selection();

        self.reload_after_delete().await.map_err(committed)?;
        Ok(BulkOutcome::Deleted { count: ids.len() })
    }

    // =========================================================================
    // Single items
    // =========================================================================

    pub async fn get_item(&self, id: i64) -> Result<R::Item> {
        let raw = self.backend.get_item(&R::item_path(id)).await?;
        decode_item::<R>(raw)
    }

    pub async fn delete_item<F>(&self, id: i64, confirm: F) -> Result<ActionOutcome>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return Ok(ActionOutcome::Declined);
        }
        self.backend.delete_item(&R::item_path(id)).await?;
        info!(resource = R::NAME, id, "Item deleted");

        self.reload_after_delete().await.map_err(committed)?;
        Ok(ActionOutcome::Applied)
    }

    /// POST an action path, then reload.
    pub(crate) async fn run_action(&self, path: &str) -> Result<()> {
        self.backend.post_action(path).await?;
        info!(resource = R::NAME, path, "Action applied");
        self.reload().await.map_err(committed)?;
        Ok(())
    }
}

impl<R: Creatable> ResourceListController<R> {
    /// Create an item, then reload the current page.
    pub async fn create_item(&self, draft: &R::Draft) -> Result<R::Item> {
        let body = encode(draft)?;
        let raw = self.backend.create_item(&R::create_path(), body).await?;
        let created = decode_item::<R>(raw)?;
        info!(resource = R::NAME, id = R::id_of(&created), "Item created");

        self.reload().await.map_err(committed)?;
        Ok(created)
    }
}

impl<R: Editable> ResourceListController<R> {
    /// Apply a partial update, then reload the current page.
    pub async fn update_item(&self, id: i64, patch: &R::Patch) -> Result<R::Item> {
        let body = encode(patch)?;
        let raw = self.backend.update_item(&R::item_path(id), body).await?;
        let updated = decode_item::<R>(raw)?;
        info!(resource = R::NAME, id, "Item updated");

        self.reload().await.map_err(committed)?;
        Ok(updated)
    }
}

/// The mutation went through; only the follow-up reload failed.
fn committed(err: AdminError) -> AdminError {
    AdminError::ReloadFailed(Box::new(err))
}

fn encode<T: serde::Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| AdminError::Encode(e.to_string()))
}

fn decode_item<R: Resource>(raw: Value) -> Result<R::Item> {
    serde_json::from_value(raw).map_err(|e| AdminError::Decode {
        resource: R::NAME,
        message: e.to_string(),
    })
}

fn decode_page<R: Resource>(page: Page<Value>) -> Result<Page<R::Item>> {
    let items = page
        .items
        .into_iter()
        .map(decode_item::<R>)
        .collect::<Result<Vec<_>>>()?;
    Ok(Page {
        items,
        total: page.total,
    })
}
