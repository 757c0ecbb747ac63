//! Application context with shared state and utilities

use std::sync::Arc;

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use lumiere_admin::{BaseBackend, Resource, ResourceListController};
use lumiere_client::LumiereClient;
use tracing::warn;

use crate::config::Config;

/// Application context passed to all commands
pub struct AppContext {
    pub config: Config,
    pub client: Arc<LumiereClient>,
    /// Answer yes to every confirmation
    pub assume_yes: bool,
    pub quiet: bool,
}

impl AppContext {
    pub fn new(config: Config, assume_yes: bool, quiet: bool) -> Self {
        let mut client = LumiereClient::new(config.api_url.clone());
        if let Some(token) = &config.token {
            client = client.with_token(token.clone());
        }
        Self {
            config,
            client: Arc::new(client),
            assume_yes,
            quiet,
        }
    }

    pub fn backend(&self) -> Arc<dyn BaseBackend> {
        self.client.clone()
    }

    /// A fresh controller for `R`, using the configured page size unless
    /// `limit` overrides it.
    pub fn controller<R: Resource>(&self, limit: Option<u64>) -> ResourceListController<R> {
        ResourceListController::with_page_size(
            self.backend(),
            limit.unwrap_or(self.config.page_size),
        )
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if self.quiet {
            return Ok(false);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    /// Confirmation for controller callbacks, which cannot fail. A prompt that
    /// cannot be shown counts as "no".
    pub fn confirm_or_decline(&self, prompt: &str) -> bool {
        self.confirm(prompt).unwrap_or_else(|e| {
            warn!(error = %e, "Confirmation prompt failed");
            false
        })
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }
}
