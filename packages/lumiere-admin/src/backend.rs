//! `BaseBackend` over the LUMIÈRE REST client.

use async_trait::async_trait;
use lumiere_client::{LumiereClient, Page};
use serde_json::Value;

use crate::error::Result;
use crate::traits::BaseBackend;

#[async_trait]
impl BaseBackend for LumiereClient {
    async fn list_items(&self, path: &str, query: &[(String, String)]) -> Result<Page<Value>> {
        Ok(self.list(path, query).await?)
    }

    async fn get_item(&self, path: &str) -> Result<Value> {
        Ok(self.get_json(path, &[]).await?)
    }

    async fn create_item(&self, path: &str, body: Value) -> Result<Value> {
        Ok(self.post_json(path, &body).await?)
    }

    async fn update_item(&self, path: &str, body: Value) -> Result<Value> {
        Ok(self.put_json(path, &body).await?)
    }

    async fn delete_item(&self, path: &str) -> Result<()> {
        Ok(self.delete(path).await?)
    }

    async fn bulk_delete_items(&self, path: &str, ids: &[i64]) -> Result<()> {
        Ok(self.bulk_delete(path, ids).await?)
    }

    async fn post_action(&self, path: &str) -> Result<()> {
        Ok(LumiereClient::post_action(self, path).await?)
    }
}
