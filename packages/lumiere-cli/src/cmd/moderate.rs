//! Comment approval, user roles, and article status.

use anyhow::Result;
use lumiere_admin::{ActionOutcome, Articles, Comments, Users};
use lumiere_client::ArticlePatch;

use super::StatusArg;
use crate::context::AppContext;

pub async fn approve(ctx: &AppContext, id: i64) -> Result<()> {
    let comments = ctx.controller::<Comments>(None);
    comments.approve(id).await?;
    ctx.print_success(&format!("✓ Approved comment #{}", id));
    Ok(())
}

pub async fn toggle_admin(ctx: &AppContext, id: i64) -> Result<()> {
    let users = ctx.controller::<Users>(None);
    let prompt = format!("Change admin rights for user #{}?", id);
    match users
        .toggle_admin(id, || ctx.confirm_or_decline(&prompt))
        .await?
    {
        ActionOutcome::Applied => ctx.print_success(&format!("✓ Toggled admin rights for user #{}", id)),
        ActionOutcome::Declined => ctx.print_warning("Cancelled"),
    }
    Ok(())
}

pub async fn set_status(ctx: &AppContext, id: i64, status: StatusArg) -> Result<()> {
    let articles = ctx.controller::<Articles>(None);
    let patch = ArticlePatch {
        status: Some(status.into()),
        ..Default::default()
    };
    let updated = articles.update_item(id, &patch).await?;
    ctx.print_success(&format!(
        "✓ \"{}\" is now {}",
        updated.title,
        updated.status.label()
    ));
    Ok(())
}
