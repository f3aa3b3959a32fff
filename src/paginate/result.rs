//! Pagination result with statistics.

use crate::model::Page;
use serde::{Deserialize, Serialize};

/// Result of one pagination run: ordered pages plus statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSet {
    /// Pages in order, indexed from 0
    pub pages: Vec<Page>,

    /// Statistics of the run
    pub stats: PaginationStats,
}

impl PageSet {
    /// Create a page set, re-indexing pages from 0.
    pub fn new(pages: Vec<Page>, mut stats: PaginationStats) -> Self {
        let pages: Vec<Page> = pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| Page::new(index, page.blocks))
            .collect();
        stats.page_count = pages.len() as u32;
        Self { pages, stats }
    }

    /// Get the number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get a page by index.
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Iterate over pages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Statistics collected during a pagination run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationStats {
    /// Number of sections paginated independently
    pub section_count: u32,

    /// Number of groups dispatched to splitters
    pub group_count: u32,

    /// Number of pages produced
    pub page_count: u32,

    /// Number of oracle measurements
    pub measure_count: u32,

    /// Number of code fragments sealed from split code blocks
    pub code_fragment_count: u32,

    /// Number of list fragments sealed from split lists
    pub list_fragment_count: u32,

    /// Number of fragments sealed from oversized list items
    pub long_item_fragment_count: u32,

    /// Number of atoms placed alone despite exceeding the budget
    pub oversized_count: u32,
}

impl PaginationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment section count.
    pub fn add_section(&mut self) {
        self.section_count += 1;
    }

    /// Increment group count.
    pub fn add_group(&mut self) {
        self.group_count += 1;
    }

    /// Increment measurement count.
    pub fn add_measure(&mut self) {
        self.measure_count += 1;
    }

    /// Increment code fragment count.
    pub fn add_code_fragment(&mut self) {
        self.code_fragment_count += 1;
    }

    /// Increment list fragment count.
    pub fn add_list_fragment(&mut self) {
        self.list_fragment_count += 1;
    }

    /// Increment long item fragment count.
    pub fn add_long_item_fragment(&mut self) {
        self.long_item_fragment_count += 1;
    }

    /// Increment oversized atom count.
    pub fn add_oversized(&mut self) {
        self.oversized_count += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &PaginationStats) {
        self.section_count += other.section_count;
        self.group_count += other.group_count;
        self.page_count += other.page_count;
        self.measure_count += other.measure_count;
        self.code_fragment_count += other.code_fragment_count;
        self.list_fragment_count += other.list_fragment_count;
        self.long_item_fragment_count += other.long_item_fragment_count;
        self.oversized_count += other.oversized_count;
    }
}
