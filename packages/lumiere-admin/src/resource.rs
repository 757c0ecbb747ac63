//! Admin resource definitions.
//!
//! Each resource is a zero-sized marker type carrying its wire item type, the
//! filter names its list endpoint understands, and its path layout.

use lumiere_client::{
    Article, ArticleDraft, ArticlePatch, Comment, Spot, SpotDraft, SpotPatch, User, UserPatch,
};
use serde::{de::DeserializeOwned, Serialize};

/// Pagination keys every resource accepts.
pub const PAGINATION_KEYS: &[&str] = &["skip", "limit"];

pub trait Resource: Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Plural name used in paths (`/admin/{NAME}`).
    const NAME: &'static str;

    /// Recognized filter names, pagination keys included.
    const FILTER_KEYS: &'static [&'static str];

    fn id_of(item: &Self::Item) -> i64;

    fn accepts_filter(key: &str) -> bool {
        Self::FILTER_KEYS.contains(&key)
    }

    fn list_path() -> String {
        format!("/admin/{}", Self::NAME)
    }

    /// Path for get/update/delete of a single item.
    fn item_path(id: i64) -> String {
        format!("/{}/{}", Self::NAME, id)
    }

    fn bulk_delete_path() -> String {
        format!("/admin/{}/bulk-delete", Self::NAME)
    }
}

/// Resources the console can create.
pub trait Creatable: Resource {
    type Draft: Serialize + Send + Sync;

    fn create_path() -> String {
        format!("/{}", Self::NAME)
    }
}

/// Resources the console can edit in place.
pub trait Editable: Resource {
    type Patch: Serialize + Send + Sync;
}

#[derive(Debug, Clone, Copy)]
pub struct Articles;

impl Resource for Articles {
    type Item = Article;
    const NAME: &'static str = "articles";
    const FILTER_KEYS: &'static [&'static str] = &["skip", "limit", "search", "status", "category"];

    fn id_of(item: &Article) -> i64 {
        item.id
    }
}

impl Creatable for Articles {
    type Draft = ArticleDraft;
}

impl Editable for Articles {
    type Patch = ArticlePatch;
}

#[derive(Debug, Clone, Copy)]
pub struct Spots;

impl Resource for Spots {
    type Item = Spot;
    const NAME: &'static str = "spots";
    const FILTER_KEYS: &'static [&'static str] = &["skip", "limit", "search", "category"];

    fn id_of(item: &Spot) -> i64 {
        item.id
    }
}

impl Creatable for Spots {
    type Draft = SpotDraft;
}

impl Editable for Spots {
    type Patch = SpotPatch;
}

#[derive(Debug, Clone, Copy)]
pub struct Comments;

impl Comments {
    pub fn approve_path(id: i64) -> String {
        format!("/admin/comments/{}/approve", id)
    }
}

impl Resource for Comments {
    type Item = Comment;
    const NAME: &'static str = "comments";
    const FILTER_KEYS: &'static [&'static str] = &["skip", "limit", "search", "pending"];

    fn id_of(item: &Comment) -> i64 {
        item.id
    }

    fn item_path(id: i64) -> String {
        format!("/admin/comments/{}", id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Users;

impl Users {
    pub fn toggle_admin_path(id: i64) -> String {
        format!("/admin/users/{}/toggle-admin", id)
    }
}

impl Resource for Users {
    type Item = User;
    const NAME: &'static str = "users";
    const FILTER_KEYS: &'static [&'static str] = &["skip", "limit", "search"];

    fn id_of(item: &User) -> i64 {
        item.id
    }

    fn item_path(id: i64) -> String {
        format!("/admin/users/{}", id)
    }
}

impl Editable for Users {
    type Patch = UserPatch;
}
