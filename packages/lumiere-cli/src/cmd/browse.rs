//! Interactive list browser.

use anyhow::{bail, Result};
use chrono::Utc;
use dialoguer::{Input, MultiSelect, Select};
use lumiere_admin::{BulkOutcome, PageDirection, Resource, ResourceListController};

use super::{with_resource, ResourceKind};
use crate::context::AppContext;
use crate::render::{self, TableRow};

const MENU: &[&str] = &[
    "Next page",
    "Previous page",
    "Search",
    "Select rows",
    "Select all on page",
    "Clear selection",
    "Delete selected",
    "Reload",
    "Quit",
];

pub async fn run(ctx: &AppContext, resource: Option<ResourceKind>) -> Result<()> {
    if ctx.quiet {
        bail!("browse is interactive and cannot run in quiet mode");
    }
    let kind = match resource {
        Some(kind) => kind,
        None => {
            let titles: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.title()).collect();
            let choice = Select::with_theme(&ctx.theme())
                .with_prompt("Browse")
                .items(&titles)
                .default(0)
                .interact()?;
            ResourceKind::ALL[choice]
        }
    };
    with_resource!(kind, R => browse::<R>(ctx, kind).await)
}

async fn browse<R>(ctx: &AppContext, kind: ResourceKind) -> Result<()>
where
    R: Resource,
    R::Item: TableRow,
{
    let controller = ctx.controller::<R>(None);
    if let Err(e) = controller.reload().await {
        ctx.print_error(&format!("Failed to load {}: {}", R::NAME, e));
    }

    loop {
        render::print_snapshot(kind.title(), &controller.snapshot());
        println!();

        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("Action")
            .items(MENU)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => turn_page(ctx, &controller, PageDirection::Next).await,
            1 => turn_page(ctx, &controller, PageDirection::Prev).await,
            2 => search(ctx, &controller).await,
            3 => select_rows(ctx, &controller),
            4 => {
                controller.toggle_all(true);
                Ok(())
            }
            5 => {
                controller.clear_selection();
                Ok(())
            }
            6 => delete_selected(ctx, &controller).await,
            7 => controller.reload().await.map(|_| ()).map_err(anyhow::Error::from),
            _ => break,
        };

        // Failed actions leave the list as it was; report and keep going.
        if let Err(e) = result {
            ctx.print_error(&format!("Error: {:#}", e));
        }
    }
    Ok(())
}

async fn turn_page<R: Resource>(
    ctx: &AppContext,
    controller: &ResourceListController<R>,
    direction: PageDirection,
) -> Result<()> {
    if controller.change_page(direction).await?.is_none() {
        ctx.print_info(match direction {
            PageDirection::Next => "Already on the last page",
            PageDirection::Prev => "Already on the first page",
        });
    }
    Ok(())
}

async fn search<R: Resource>(ctx: &AppContext, controller: &ResourceListController<R>) -> Result<()> {
    let current = controller
        .filters()
        .get("search")
        .map(|v| v.to_string())
        .unwrap_or_default();
    let text: String = Input::with_theme(&ctx.theme())
        .with_prompt("Search (empty to clear)")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    controller.set_filter("search", text.trim())?;
    controller.apply_filters().await?;
    Ok(())
}

fn select_rows<R>(ctx: &AppContext, controller: &ResourceListController<R>) -> Result<()>
where
    R: Resource,
    R::Item: TableRow,
{
    let snapshot = controller.snapshot();
    if snapshot.items.is_empty() {
        ctx.print_info("Nothing to select on this page");
        return Ok(());
    }

    let now = Utc::now();
    let labels: Vec<String> = snapshot
        .items
        .iter()
        .map(|item| {
            item.cells(now)
                .iter()
                .map(|c| render::truncate(c, 30))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    let checked: Vec<bool> = snapshot
        .items
        .iter()
        .map(|item| snapshot.selected.contains(item.row_id()))
        .collect();

    let picked = MultiSelect::with_theme(&ctx.theme())
        .with_prompt("Select rows (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    for (index, item) in snapshot.items.iter().enumerate() {
        let want = picked.contains(&index);
        if want != checked[index] {
            controller.toggle_selection(item.row_id());
        }
    }
    Ok(())
}

async fn delete_selected<R: Resource>(
    ctx: &AppContext,
    controller: &ResourceListController<R>,
) -> Result<()> {
    let outcome = controller
        .bulk_delete(|ids| {
            ctx.confirm_or_decline(&format!(
                "Delete {} {}? This cannot be undone.",
                ids.len(),
                R::NAME
            ))
        })
        .await?;
    match outcome {
        BulkOutcome::Deleted { count } => ctx.print_success(&format!("✓ Deleted {} {}", count, R::NAME)),
        BulkOutcome::Declined => ctx.print_warning("Cancelled"),
        BulkOutcome::NothingSelected => ctx.print_info("Select rows first"),
    }
    Ok(())
}
