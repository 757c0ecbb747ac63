// MockBackend - scripted backend for controller tests
//
// Queue list pages (optionally delayed) and failures, then inspect the calls
// the controller made.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lumiere_client::Page;
use serde_json::{json, Value};

use crate::error::{AdminError, Result};
use crate::traits::BaseBackend;

/// A call captured by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List {
        path: String,
        query: Vec<(String, String)>,
    },
    Get {
        path: String,
    },
    Create {
        path: String,
        body: Value,
    },
    Update {
        path: String,
        body: Value,
    },
    Delete {
        path: String,
    },
    BulkDelete {
        path: String,
        ids: Vec<i64>,
    },
    Action {
        path: String,
    },
}

impl BackendCall {
    pub fn path(&self) -> &str {
        match self {
            BackendCall::List { path, .. }
            | BackendCall::Get { path }
            | BackendCall::Create { path, .. }
            | BackendCall::Update { path, .. }
            | BackendCall::Delete { path }
            | BackendCall::BulkDelete { path, .. }
            | BackendCall::Action { path } => path,
        }
    }
}

struct ScriptedList {
    delay: Duration,
    result: Result<Page<Value>>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    list_responses: Arc<Mutex<VecDeque<ScriptedList>>>,
    item_responses: Arc<Mutex<VecDeque<Result<Value>>>>,
    mutation_failures: Arc<Mutex<VecDeque<AdminError>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a list response.
    pub fn with_page(self, items: Vec<Value>, total: u64) -> Self {
        self.with_delayed_page(Duration::ZERO, items, total)
    }

    /// Queue a list response that resolves after `delay`.
    pub fn with_delayed_page(self, delay: Duration, items: Vec<Value>, total: u64) -> Self {
        self.list_responses.lock().unwrap().push_back(ScriptedList {
            delay,
            result: Ok(Page { items, total }),
        });
        self
    }

    /// Queue a failing list response.
    pub fn with_list_error(self, error: AdminError) -> Self {
        self.with_delayed_list_error(Duration::ZERO, error)
    }

    /// Queue a list failure that surfaces after `delay`.
    pub fn with_delayed_list_error(self, delay: Duration, error: AdminError) -> Self {
        self.list_responses.lock().unwrap().push_back(ScriptedList {
            delay,
            result: Err(error),
        });
        self
    }

    /// Queue a response for get/create/update.
    pub fn with_item(self, item: Value) -> Self {
        self.item_responses.lock().unwrap().push_back(Ok(item));
        self
    }

    /// Fail the next mutating call (create, update, delete, bulk delete, action).
    pub fn with_mutation_error(self, error: AdminError) -> Self {
        self.mutation_failures.lock().unwrap().push_back(error);
        self
    }

    /// Get all calls in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Query of every list call, in order
    pub fn list_queries(&self) -> Vec<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                BackendCall::List { query, .. } => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_mutation(&self) -> Result<()> {
        match self.mutation_failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn next_item(&self, fallback: Value) -> Result<Value> {
        self.item_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(fallback))
    }
}

#[async_trait]
impl BaseBackend for MockBackend {
    async fn list_items(&self, path: &str, query: &[(String, String)]) -> Result<Page<Value>> {
        self.record(BackendCall::List {
            path: path.to_string(),
            query: query.to_vec(),
        });

        let scripted = self.list_responses.lock().unwrap().pop_front();
        match scripted {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result
            }
            None => Ok(Page::default()),
        }
    }

    async fn get_item(&self, path: &str) -> Result<Value> {
        self.record(BackendCall::Get {
            path: path.to_string(),
        });
        self.next_item(Value::Null)
    }

    async fn create_item(&self, path: &str, body: Value) -> Result<Value> {
        self.record(BackendCall::Create {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next_mutation()?;
        self.next_item(body)
    }

    async fn update_item(&self, path: &str, body: Value) -> Result<Value> {
        self.record(BackendCall::Update {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next_mutation()?;
        self.next_item(body)
    }

    async fn delete_item(&self, path: &str) -> Result<()> {
        self.record(BackendCall::Delete {
            path: path.to_string(),
        });
        self.next_mutation()
    }

    async fn bulk_delete_items(&self, path: &str, ids: &[i64]) -> Result<()> {
        self.record(BackendCall::BulkDelete {
            path: path.to_string(),
            ids: ids.to_vec(),
        });
        self.next_mutation()
    }

    async fn post_action(&self, path: &str) -> Result<()> {
        self.record(BackendCall::Action {
            path: path.to_string(),
        });
        self.next_mutation()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn article_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Article {}", id),
        "author": "Ana",
        "status": "published",
        "views": id * 10,
        "created_at": "2024-05-01T09:30:00"
    })
}

pub fn articles_json(ids: impl IntoIterator<Item = i64>) -> Vec<Value> {
    ids.into_iter().map(article_json).collect()
}

pub fn comment_json(id: i64, is_approved: bool) -> Value {
    json!({
        "id": id,
        "content": format!("Comment {}", id),
        "article_id": 1,
        "article_title": "Article 1",
        "author": "Léo",
        "is_approved": is_approved,
        "created_at": "2024-05-02T10:00:00+00:00"
    })
}

pub fn user_json(id: i64, is_admin: bool) -> Value {
    json!({
        "id": id,
        "username": format!("user{}", id),
        "email": format!("user{}@example.org", id),
        "full_name": null,
        "is_admin": is_admin
    })
}
