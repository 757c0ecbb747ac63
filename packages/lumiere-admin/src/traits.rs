// Backend trait for dependency injection
//
// Transport only: paths in, JSON out. Resource semantics (which path, which
// item type) live in `Resource` and the controller.

use async_trait::async_trait;
use lumiere_client::Page;
use serde_json::Value;

use crate::error::Result;

#[async_trait]
pub trait BaseBackend: Send + Sync {
    /// GET a list endpoint. Implementations normalize bare-array responses
    /// into the `{items, total}` envelope.
    async fn list_items(&self, path: &str, query: &[(String, String)]) -> Result<Page<Value>>;

    async fn get_item(&self, path: &str) -> Result<Value>;

    async fn create_item(&self, path: &str, body: Value) -> Result<Value>;

    async fn update_item(&self, path: &str, body: Value) -> Result<Value>;

    async fn delete_item(&self, path: &str) -> Result<()>;

    async fn bulk_delete_items(&self, path: &str, ids: &[i64]) -> Result<()>;

    /// Body-less POST (approve, toggle-admin).
    async fn post_action(&self, path: &str) -> Result<()>;
}
