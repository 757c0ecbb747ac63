//! LUMIÈRE admin console
//!
//! Lists, filters, pages through, and moderates articles, spots, comments,
//! and users over the admin REST API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;
mod context;
mod render;

use cmd::{ListArgs, ResourceKind, StatusArg};
use config::Config;
use context::AppContext;

#[derive(Parser)]
#[command(name = "lumiere")]
#[command(about = "LUMIÈRE admin console")]
#[command(version)]
struct Cli {
    /// Run in quiet mode (non-interactive, confirmations are declined)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// API base URL (overrides LUMIERE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides LUMIERE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange credentials for an access token
    Login {
        username: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the user the token belongs to
    Whoami,

    /// Dashboard counters
    Stats,

    /// List one page of a resource
    List(ListArgs),

    /// Show a single item as JSON
    Show { resource: ResourceKind, id: i64 },

    /// Delete a single item
    Delete { resource: ResourceKind, id: i64 },

    /// Delete several items in one request
    BulkDelete {
        resource: ResourceKind,

        /// Comma-separated ids
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },

    /// Approve a pending comment
    Approve { id: i64 },

    /// Grant or revoke admin rights
    ToggleAdmin { id: i64 },

    /// Change an article's publication status
    SetStatus { id: i64, status: StatusArg },

    /// Interactive list browser
    Browse { resource: Option<ResourceKind> },
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.api_url, cli.token);
    let ctx = AppContext::new(config, cli.yes, cli.quiet);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(dispatch(&ctx, cli.command))
}

async fn dispatch(ctx: &AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Login { username, password }) => {
            cmd::auth::login(ctx, &username, password).await
        }
        Some(Commands::Whoami) => cmd::auth::whoami(ctx).await,
        Some(Commands::Stats) => cmd::auth::stats(ctx).await,
        Some(Commands::List(args)) => cmd::items::list(ctx, args).await,
        Some(Commands::Show { resource, id }) => cmd::items::show(ctx, resource, id).await,
        Some(Commands::Delete { resource, id }) => cmd::items::delete(ctx, resource, id).await,
        Some(Commands::BulkDelete { resource, ids }) => {
            cmd::items::bulk_delete(ctx, resource, ids).await
        }
        Some(Commands::Approve { id }) => cmd::moderate::approve(ctx, id).await,
        Some(Commands::ToggleAdmin { id }) => cmd::moderate::toggle_admin(ctx, id).await,
        Some(Commands::SetStatus { id, status }) => {
            cmd::moderate::set_status(ctx, id, status).await
        }
        Some(Commands::Browse { resource }) => cmd::browse::run(ctx, resource).await,
        None => cmd::browse::run(ctx, None).await,
    }
}
