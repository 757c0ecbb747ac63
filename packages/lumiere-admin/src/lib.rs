//! Admin list controllers for the LUMIÈRE content platform.
//!
//! One [`ResourceListController`] per resource (articles, spots, comments,
//! users) turns declarative filter state into list queries, caches the last
//! page, tracks row selection, and runs confirmed mutations. Rendering is left
//! to the caller, which reads [`ListSnapshot`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumiere_admin::{Articles, PageDirection, ResourceListController};
//! use lumiere_client::LumiereClient;
//!
//! let client = LumiereClient::new("http://localhost:8000/api").with_token(token);
//! let articles = ResourceListController::<Articles>::new(Arc::new(client));
//!
//! articles.set_filter("search", "paris")?;
//! articles.apply_filters().await?;
//! articles.change_page(PageDirection::Next).await?;
//! println!("{}", articles.page_info());
//! ```

pub mod backend;
pub mod controller;
pub mod error;
pub mod filters;
pub mod moderation;
pub mod pagination;
pub mod resource;
pub mod selection;
pub mod testing;
pub mod traits;

pub use controller::{ActionOutcome, BulkOutcome, Fetch, ListSnapshot, ResourceListController};
pub use error::{AdminError, Result};
pub use filters::{FilterState, FilterValue, DEFAULT_LIMIT};
pub use pagination::{PageDirection, PageInfo};
pub use resource::{Articles, Comments, Creatable, Editable, Resource, Spots, Users};
pub use selection::SelectionSet;
pub use traits::BaseBackend;
