//! Page-position labels and export names for the decoration stage.

use std::fmt;

use chrono::NaiveDate;

/// File name shown when the source has none.
pub const UNTITLED: &str = "Untitled";

/// Position of one page within a page set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel {
    /// Page index (0-indexed)
    pub index: usize,

    /// Total number of pages
    pub total: usize,
}

impl PageLabel {
    /// Create a label for page `index` of `total`.
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// "N/total" indicator, 1-based.
    pub fn position(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }

    /// Header text `[<file> N/total] YYYY-MM-DD`.
    pub fn header(&self, file_name: Option<&str>, date: NaiveDate) -> String {
        let name = file_name.filter(|n| !n.trim().is_empty()).unwrap_or(UNTITLED);
        format!("[{} {}] {}", name, self.position(), date.format("%Y-%m-%d"))
    }

    /// Header text dated with the local date.
    pub fn header_today(&self, file_name: Option<&str>) -> String {
        self.header(file_name, chrono::Local::now().date_naive())
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index + 1, self.total)
    }
}

/// The active page of a preview, clamped to the page set bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    active: usize,
    total: usize,
}

impl PageCursor {
    /// Create a cursor at the first of `total` pages.
    pub fn new(total: usize) -> Self {
        Self { active: 0, total }
    }

    /// Index of the active page.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Total number of pages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Move to the next page. Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.active + 1 < self.total {
            self.active += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page. Returns false at the first page.
    pub fn prev(&mut self) -> bool {
        if self.active > 0 {
            self.active -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `index`, clamped to the last page.
    pub fn set(&mut self, index: usize) {
        self.active = index.min(self.total.saturating_sub(1));
    }

    /// Update the page count after a re-run, keeping the cursor in range.
    pub fn reset_total(&mut self, total: usize) {
        self.total = total;
        self.set(self.active);
    }

    /// Label of the active page.
    pub fn label(&self) -> PageLabel {
        PageLabel::new(self.active, self.total)
    }
}

/// Name of the exported file for page `index` (0-based in, 1-based out).
pub fn export_file_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}_{}.{}", prefix, index + 1, extension.trim_start_matches('.'))
}
