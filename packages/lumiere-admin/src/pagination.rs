//! Offset pagination arithmetic.
//!
//! Offsets are not stable under concurrent inserts or deletes on the backend:
//! an item removed between two page loads shifts later items by one slot.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}

impl FromStr for PageDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(PageDirection::Prev),
            "next" => Ok(PageDirection::Next),
            other => Err(format!("unknown page direction: {other}")),
        }
    }
}

impl fmt::Display for PageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageDirection::Prev => f.write_str("prev"),
            PageDirection::Next => f.write_str("next"),
        }
    }
}

/// New `skip` after moving one page, or `None` when the move is out of range.
pub fn step(skip: u64, limit: u64, total: u64, direction: PageDirection) -> Option<u64> {
    match direction {
        PageDirection::Prev if skip > 0 => Some(skip.saturating_sub(limit)),
        PageDirection::Next if skip + limit < total => Some(skip + limit),
        _ => None,
    }
}

/// Offset of the last page holding at least one of `total` items.
pub fn last_page_start(total: u64, limit: u64) -> u64 {
    if total == 0 || limit == 0 {
        return 0;
    }
    ((total - 1) / limit) * limit
}

/// Window shown in a list footer ("Showing 21-40 of 45").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based index of the first row, 0 when the page is empty
    pub first: u64,
    pub last: u64,
    pub total: u64,
    pub has_prev: bool,
    pub has_next: bool,
    /// 1-based page number
    pub page: u64,
    /// Page count, at least 1
    pub pages: u64,
}

impl PageInfo {
    pub fn new(skip: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        let last = (skip + limit).min(total);
        Self {
            first: if last > skip { skip + 1 } else { 0 },
            last,
            total,
            has_prev: skip > 0,
            has_next: skip + limit < total,
            page: skip / limit + 1,
            pages: total.div_ceil(limit).max(1),
        }
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {}-{} of {} (page {}/{})",
            self.first, self.last, self.total, self.page, self.pages
        )
    }
}
