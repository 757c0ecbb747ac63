//! List, show, and delete commands shared by every resource.

use anyhow::{bail, Result};
use lumiere_admin::{
    ActionOutcome, BulkOutcome, FilterValue, Resource, ResourceListController,
};
use serde::Serialize;

use super::{with_resource, ListArgs, ResourceKind};
use crate::context::AppContext;
use crate::render::{self, TableRow};

pub async fn list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    with_resource!(args.resource, R => list_page::<R>(ctx, &args).await)
}

pub async fn show(ctx: &AppContext, kind: ResourceKind, id: i64) -> Result<()> {
    with_resource!(kind, R => show_item::<R>(ctx, id).await)
}

pub async fn delete(ctx: &AppContext, kind: ResourceKind, id: i64) -> Result<()> {
    with_resource!(kind, R => delete_one::<R>(ctx, id).await)
}

pub async fn bulk_delete(ctx: &AppContext, kind: ResourceKind, ids: Vec<i64>) -> Result<()> {
    with_resource!(kind, R => delete_many::<R>(ctx, &ids).await)
}

/// Copy command-line filters into the controller. Filters the resource does
/// not support are rejected by `set_filter`.
pub fn apply_args<R: Resource>(controller: &ResourceListController<R>, args: &ListArgs) -> Result<()> {
    if let Some(search) = &args.search {
        controller.set_filter("search", search.as_str())?;
    }
    if let Some(status) = args.status {
        let status: lumiere_client::ArticleStatus = status.into();
        controller.set_filter("status", status.as_str())?;
    }
    if let Some(category) = &args.category {
        controller.set_filter("category", category.as_str())?;
    }
    if args.pending {
        controller.set_filter("pending", true)?;
    }
    if args.page == 0 {
        bail!("--page starts at 1");
    }
    let skip = (args.page - 1)
        .checked_mul(controller.filters().limit())
        .and_then(|skip| i64::try_from(skip).ok());
    let Some(skip) = skip else {
        bail!("--page is out of range");
    };
    controller.set_filter("skip", FilterValue::Int(skip))?;
    Ok(())
}

async fn list_page<R>(ctx: &AppContext, args: &ListArgs) -> Result<()>
where
    R: Resource,
    R::Item: TableRow + Serialize,
{
    let controller = ctx.controller::<R>(args.limit);
    apply_args(&controller, args)?;
    controller.reload().await?;

    let snapshot = controller.snapshot();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "items": snapshot.items,
                "total": snapshot.total,
            }))?
        );
        return Ok(());
    }
    render::print_snapshot(args.resource.title(), &snapshot);
    Ok(())
}

async fn show_item<R>(ctx: &AppContext, id: i64) -> Result<()>
where
    R: Resource,
    R::Item: Serialize,
{
    let item = ctx.controller::<R>(None).get_item(id).await?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

async fn delete_one<R: Resource>(ctx: &AppContext, id: i64) -> Result<()> {
    let controller = ctx.controller::<R>(None);
    let prompt = format!("Delete {} #{}? This cannot be undone.", singular(R::NAME), id);
    match controller
        .delete_item(id, || ctx.confirm_or_decline(&prompt))
        .await?
    {
        ActionOutcome::Applied => ctx.print_success(&format!("✓ Deleted {} #{}", singular(R::NAME), id)),
        ActionOutcome::Declined => ctx.print_warning("Cancelled"),
    }
    Ok(())
}

async fn delete_many<R: Resource>(ctx: &AppContext, ids: &[i64]) -> Result<()> {
    let controller = ctx.controller::<R>(None);
    for &id in ids {
        if !controller.is_selected(id) {
            controller.toggle_selection(id);
        }
    }

    let outcome = controller
        .bulk_delete(|ids| {
            ctx.confirm_or_decline(&format!("Delete {} {}? This cannot be undone.", ids.len(), R::NAME))
        })
        .await?;
    match outcome {
        BulkOutcome::Deleted { count } => ctx.print_success(&format!("✓ Deleted {} {}", count, R::NAME)),
        BulkOutcome::Declined => ctx.print_warning("Cancelled"),
        BulkOutcome::NothingSelected => ctx.print_warning("Nothing selected"),
    }
    Ok(())
}

/// "articles" -> "article"
pub fn singular(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}
