//! Grouping of blocks into dispatch units.

use crate::model::Block;

/// Which splitter a group is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Kept whole or moved to the next page
    Single,
    /// Split at line granularity
    CodeBlock,
    /// Split at item granularity
    List {
        /// Ordered (numbered) list
        ordered: bool,
        /// Number of the first item
        start: u32,
    },
}

/// An atomic dispatch unit for the paginator.
///
/// Always owns at least one block with visible content.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Splitting strategy
    pub kind: GroupKind,

    /// Blocks owned by the group
    pub blocks: Vec<Block>,
}

impl Group {
    fn new(kind: GroupKind, block: Block) -> Self {
        Self {
            kind,
            blocks: vec![block],
        }
    }
}

/// Partition blocks into groups, skipping blocks without content.
pub fn group_blocks(blocks: &[Block]) -> Vec<Group> {
    blocks
        .iter()
        .filter(|block| block.has_content())
        .map(|block| {
            let kind = match block {
                Block::CodeBlock { .. } => GroupKind::CodeBlock,
                Block::List(list) => GroupKind::List {
                    ordered: list.ordered,
                    start: list.start,
                },
                _ => GroupKind::Single,
            };
            Group::new(kind, block.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_kinds() {
        let blocks = vec![
            Block::heading(1, "Title"),
            Block::code(Some("rust"), "fn main() {}"),
            Block::ordered_list(3, ["a", "b"]),
            Block::bullet_list(["c"]),
            Block::paragraph("text"),
        ];
        let groups = group_blocks(&blocks);
        let kinds: Vec<_> = groups.iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GroupKind::Single,
                GroupKind::CodeBlock,
                GroupKind::List {
                    ordered: true,
                    start: 3
                },
                GroupKind::List {
                    ordered: false,
                    start: 1
                },
                GroupKind::Single,
            ]
        );
    }

    #[test]
    fn test_empty_blocks_skipped() {
        let blocks = vec![
            Block::paragraph("  "),
            Block::Rule,
            Block::code(None, ""),
            Block::bullet_list([""]),
            Block::paragraph("kept"),
        ];
        let groups = group_blocks(&blocks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].blocks[0], Block::paragraph("kept"));
    }
}
