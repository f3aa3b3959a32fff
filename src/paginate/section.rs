//! Section splitting on horizontal rules.

use crate::model::Block;

/// Split blocks into sections separated by horizontal rules.
///
/// With `enabled == false` the whole input is one section. Sections without
/// content are dropped; if none remain, the whole input is returned as a
/// single section so pagination always has something to work on.
pub fn split_sections(blocks: &[Block], enabled: bool) -> Vec<Vec<Block>> {
    if !enabled {
        return vec![blocks.to_vec()];
    }

    let mut sections = Vec::new();
    let mut current: Vec<Block> = Vec::new();

    for block in blocks {
        if block.is_rule() {
            close_section(&mut sections, &mut current);
        } else {
            current.push(block.clone());
        }
    }
    close_section(&mut sections, &mut current);

    if sections.is_empty() {
        return vec![blocks.to_vec()];
    }

    log::debug!("split into {} sections", sections.len());
    sections
}

fn close_section(sections: &mut Vec<Vec<Block>>, current: &mut Vec<Block>) {
    let section = std::mem::take(current);
    if section.iter().any(Block::has_content) {
        sections.push(section);
    }
}
