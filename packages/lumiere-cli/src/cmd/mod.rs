//! Console commands.

use clap::{Args, ValueEnum};
use lumiere_client::ArticleStatus;

pub mod auth;
pub mod browse;
pub mod items;
pub mod moderate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Articles,
    Spots,
    Comments,
    Users,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Articles,
        ResourceKind::Spots,
        ResourceKind::Comments,
        ResourceKind::Users,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Articles => "Articles",
            ResourceKind::Spots => "Photo spots",
            ResourceKind::Comments => "Comments",
            ResourceKind::Users => "Users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Draft,
    Published,
    Review,
}

impl From<StatusArg> for ArticleStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Draft => ArticleStatus::Draft,
            StatusArg::Published => ArticleStatus::Published,
            StatusArg::Review => ArticleStatus::Review,
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub resource: ResourceKind,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Article status
    #[arg(long)]
    pub status: Option<StatusArg>,

    /// Article or spot category
    #[arg(long)]
    pub category: Option<String>,

    /// Only comments awaiting approval
    #[arg(long)]
    pub pending: bool,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u64,

    /// Page size (overrides LUMIERE_PAGE_SIZE)
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// Print the raw page as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run `$body` with `$r` bound to the resource marker type for `$kind`.
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            $crate::cmd::ResourceKind::Articles => {
                type $r = lumiere_admin::Articles;
                $body
            }
            $crate::cmd::ResourceKind::Spots => {
                type $r = lumiere_admin::Spots;
                $body
            }
            $crate::cmd::ResourceKind::Comments => {
                type $r = lumiere_admin::Comments;
                $body
            }
            $crate::cmd::ResourceKind::Users => {
                type $r = lumiere_admin::Users;
                $body
            }
        }
    };
}

pub(crate) use with_resource;
