//! Table rendering for list snapshots.

use chrono::{DateTime, Utc};
use console::style;
use lumiere_admin::{ListSnapshot, SelectionSet};
use lumiere_client::{Article, Comment, Spot, User};

const MAX_CELL: usize = 40;

/// How an item is laid out as a table row.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn row_id(&self) -> i64;

    fn cells(&self, now: DateTime<Utc>) -> Vec<String>;
}

impl TableRow for Article {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Author", "Status", "Views", "Date"];

    fn row_id(&self) -> i64 {
        self.id
    }

    fn cells(&self, now: DateTime<Utc>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            self.status.label().to_string(),
            self.views.to_string(),
            format_date(self.created_at, now),
        ]
    }
}

impl TableRow for Spot {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Location", "Category", "Rating", "Coordinates"];

    fn row_id(&self) -> i64 {
        self.id
    }

    fn cells(&self, _now: DateTime<Utc>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.location.clone(),
            self.category
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            format!("{:.1}", self.rating),
            format!("{:.4}, {:.4}", self.latitude, self.longitude),
        ]
    }
}

impl TableRow for Comment {
    const HEADERS: &'static [&'static str] = &["ID", "Comment", "Author", "Article", "Approved", "Date"];

    fn row_id(&self) -> i64 {
        self.id
    }

    fn cells(&self, now: DateTime<Utc>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.content.clone(),
            self.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            self.article_title.clone().unwrap_or_else(|| "Unknown".to_string()),
            if self.is_approved { "yes" } else { "pending" }.to_string(),
            format_date(self.created_at, now),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Username", "Email", "Role", "Joined"];

    fn row_id(&self) -> i64 {
        self.id
    }

    fn cells(&self, now: DateTime<Utc>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.display_name().to_string(),
            self.username.clone(),
            self.email.clone(),
            if self.is_admin { "admin" } else { "user" }.to_string(),
            format_date(self.created_at, now),
        ]
    }
}

/// "Today", "Yesterday", "3 days ago", or a calendar date past a week.
pub fn format_date(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return "N/A".to_string();
    };
    match (now - date).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{} days ago", days),
        _ => date.format("%-d %b %Y").to_string(),
    }
}

/// Cut to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Plain-text table. Selected rows are marked with `[x]`.
pub fn table<T: TableRow>(items: &[T], selected: &SelectionSet, now: DateTime<Utc>) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let mark = if selected.contains(item.row_id()) { "[x]" } else { "[ ]" };
            std::iter::once(mark.to_string())
                .chain(item.cells(now).into_iter().map(|c| truncate(&c, MAX_CELL)))
                .collect()
        })
        .collect();

    let headers: Vec<String> = std::iter::once(String::new())
        .chain(T::HEADERS.iter().map(|h| h.to_string()))
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render(&headers));
    out.push('\n');
    for row in &rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}

/// Print a snapshot: header line, rows, and the page window footer.
pub fn print_snapshot<T: TableRow>(title: &str, snapshot: &ListSnapshot<T>) {
    let now = Utc::now();
    println!();
    println!("{}", style(title).bold());
    if snapshot.items.is_empty() {
        println!("{}", style("No results.").dim());
    } else {
        let rendered = table(&snapshot.items, &snapshot.selected, now);
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            println!("{}", style(header).bold());
        }
        for line in lines {
            println!("{}", line);
        }
    }
    println!("{}", style(snapshot.page_info()).dim());
    if !snapshot.selected.is_empty() {
        println!(
            "{}",
            style(format!("{} selected", snapshot.selected.len())).cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn dates_are_relative_within_a_week() {
        assert_eq!(format_date(None, now()), "N/A");
        assert_eq!(format_date(Some(now() - Duration::hours(3)), now()), "Today");
        assert_eq!(format_date(Some(now() - Duration::hours(30)), now()), "Yesterday");
        assert_eq!(format_date(Some(now() - Duration::days(4)), now()), "4 days ago");
        assert_eq!(format_date(Some(now() - Duration::days(9)), now()), "1 May 2024");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Étretat", 10), "Étretat");
        assert_eq!(truncate("Lumière éternelle", 8), "Lumière…");
    }

    #[test]
    fn table_marks_selected_rows() {
        let user = |id: i64, name: &str| User {
            id,
            username: name.to_string(),
            email: format!("{name}@example.org"),
            full_name: None,
            is_admin: id == 1,
            created_at: None,
        };
        let items = vec![user(1, "ana"), user(2, "leo")];
        let mut selected = SelectionSet::new();
        selected.toggle(2);

        let out = table(&items, &selected, now());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Username"));
        assert!(lines[1].starts_with("[ ]  1"));
        assert!(lines[1].contains("admin"));
        assert!(lines[2].starts_with("[x]  2"));
    }
}
