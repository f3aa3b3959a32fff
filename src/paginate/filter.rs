//! Final empty-content filter.

use crate::model::{Block, Page};

/// Turn sealed block runs into pages, dropping blocks and pages without
/// visible content.
pub fn drop_empty_pages(pages: Vec<Vec<Block>>) -> Vec<Page> {
    pages
        .into_iter()
        .map(|blocks| {
            blocks
                .into_iter()
                .filter(Block::has_content)
                .collect::<Vec<_>>()
        })
        .filter(|blocks| !blocks.is_empty())
        .enumerate()
        .map(|(index, blocks)| Page::new(index, blocks))
        .collect()
}
