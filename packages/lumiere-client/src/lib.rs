//! Pure LUMIÈRE REST API client.
//!
//! A minimal client for the LUMIÈRE content platform API. Handles the bearer
//! token, error `detail` extraction, and normalizes list responses into a
//! single `{items, total}` envelope.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumiere_client::LumiereClient;
//!
//! let token = LumiereClient::new("http://localhost:8000/api")
//!     .login("admin", "secret")
//!     .await?;
//! let client = LumiereClient::new("http://localhost:8000/api").with_token(token.access_token);
//!
//! let stats = client.stats().await?;
//! println!("{} comments waiting", stats.pending_comments);
//! ```

pub mod error;
pub mod types;

pub use error::{ClientError, Result, FALLBACK_MESSAGE};
pub use types::*;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Query string pairs, in the order they are appended.
pub type Query = [(String, String)];

#[derive(Clone)]
pub struct LumiereClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for LumiereClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumiereClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl LumiereClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request except login.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> Result<String> {
        if !path.starts_with('/') {
            return Err(ClientError::Config(format!(
                "path must start with '/': {path}"
            )));
        }
        Ok(format!("{}{}", self.base_url, path))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error::detail_message(&body);
            warn!(status = status.as_u16(), %message, "LUMIÈRE API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
        serde_json::from_str(body)
            .map_err(|e| ClientError::Parse(format!("Failed to deserialize response: {}", e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, params = query.len(), "GET");
        let request = self.authorize(self.http_client.get(&url).query(query));
        let body = self.send(request).await?;
        Self::decode(&body)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(%url, "POST");
        let request = self.authorize(self.http_client.post(&url).json(body));
        let body = self.send(request).await?;
        Self::decode(&body)
    }

    /// POST without a body, discarding the acknowledgement message.
    pub async fn post_action(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        debug!(%url, "POST action");
        let request = self.authorize(self.http_client.post(&url));
        self.send(request).await?;
        Ok(())
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(%url, "PUT");
        let request = self.authorize(self.http_client.put(&url).json(body));
        let body = self.send(request).await?;
        Self::decode(&body)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        debug!(%url, "DELETE");
        let request = self.authorize(self.http_client.delete(&url));
        self.send(request).await?;
        Ok(())
    }

    /// Fetch a list endpoint, accepting either the `{items, total}` envelope or
    /// a bare array.
    pub async fn list<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<Page<T>> {
        let response: ListResponse<T> = self.get_json(path, query).await?;
        let page = response.into_page();
        debug!(path, items = page.items.len(), total = page.total, "Fetched list page");
        Ok(page)
    }

    pub async fn bulk_delete(&self, path: &str, ids: &[i64]) -> Result<()> {
        let url = self.url(path)?;
        debug!(%url, count = ids.len(), "POST bulk delete");
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        let request = self.authorize(self.http_client.post(&url).json(&body));
        self.send(request).await?;
        Ok(())
    }

    /// Exchange credentials for a bearer token. Sent without any token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token> {
        let url = self.url("/auth/token")?;
        debug!(%url, username, "Logging in");
        let request = self
            .http_client
            .post(&url)
            .form(&[("username", username), ("password", password)]);
        let body = self.send(request).await?;
        Self::decode(&body)
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get_json("/auth/me", &[]).await
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        self.get_json("/admin/stats", &[]).await
    }
}
