//! Page-level types.

use super::Block;
use serde::{Deserialize, Serialize};

/// A single output page: an ordered run of self-contained blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-indexed, stable within one page set)
    pub index: usize,

    /// Content blocks on the page
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page.
    pub fn new(index: usize, blocks: Vec<Block>) -> Self {
        Self { index, blocks }
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if at least one block has text or an image.
    pub fn has_content(&self) -> bool {
        self.blocks.iter().any(Block::has_content)
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
