//! Account and dashboard commands.

use anyhow::{Context, Result};
use console::style;
use dialoguer::Password;

use crate::context::AppContext;

pub async fn login(ctx: &AppContext, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::with_theme(&ctx.theme())
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let token = ctx
        .client
        .login(username, &password)
        .await
        .context("Login failed")?;

    ctx.print_success(&format!("✓ Logged in as {}", username));
    if ctx.quiet {
        println!("{}", token.access_token);
    } else {
        println!();
        println!("Export the token to use it in later commands:");
        println!("  export LUMIERE_TOKEN={}", token.access_token);
    }
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let user = ctx
        .client
        .current_user()
        .await
        .context("Could not load the current user")?;

    println!("{} ({})", style(user.display_name()).bold(), user.username);
    println!("  Email: {}", user.email);
    println!("  Role:  {}", if user.is_admin { "admin" } else { "user" });
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.client.stats().await.context("Could not load stats")?;

    ctx.print_header("Dashboard");
    println!("  Total views:      {}", stats.total_views);
    println!("  Photo spots:      {}", stats.total_spots);
    println!("  Subscribers:      {}", stats.total_subscribers);
    if stats.pending_comments > 0 {
        println!(
            "  Pending comments: {}",
            style(stats.pending_comments).yellow()
        );
    } else {
        println!("  Pending comments: 0");
    }
    Ok(())
}
