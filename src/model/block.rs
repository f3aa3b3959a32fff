//! Block-level types.

use super::inline::{self, Inline};
use serde::{Deserialize, Serialize};

/// A content block of a rendered document.
///
/// Blocks are values: splitting never mutates a block, it builds new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading (level 1-6)
    Heading {
        /// Heading level
        level: u8,
        /// Heading content
        content: Vec<Inline>,
    },

    /// Anything not specially handled by the paginator
    Generic {
        /// What the block was in the source document
        kind: GenericKind,
        /// Block content
        content: Vec<Inline>,
    },

    /// A code block with its raw text
    CodeBlock {
        /// Language tag from the fence info string
        language: Option<String>,
        /// Raw code text
        code: String,
    },

    /// An ordered or unordered list
    List(List),

    /// A horizontal rule, used as a section marker
    Rule,
}

impl Block {
    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            content: vec![Inline::text(text)],
        }
    }

    /// Create a paragraph block with plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Generic {
            kind: GenericKind::Paragraph,
            content: vec![Inline::text(text)],
        }
    }

    /// Create a generic block from inline content.
    pub fn generic(kind: GenericKind, content: Vec<Inline>) -> Self {
        Block::Generic { kind, content }
    }

    /// Create a code block.
    pub fn code(language: Option<&str>, code: impl Into<String>) -> Self {
        Block::CodeBlock {
            language: language.map(str::to_string),
            code: code.into(),
        }
    }

    /// Create an ordered list starting at `start` with one text item per entry.
    pub fn ordered_list<S: Into<String>>(start: u32, items: impl IntoIterator<Item = S>) -> Self {
        Block::List(List::new(
            true,
            start,
            items.into_iter().map(ListItem::new).collect(),
        ))
    }

    /// Create an unordered list with one text item per entry.
    pub fn bullet_list<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Block::List(List::new(
            false,
            1,
            items.into_iter().map(ListItem::new).collect(),
        ))
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { content, .. } | Block::Generic { content, .. } => {
                inline::plain_text(content)
            }
            Block::CodeBlock { code, .. } => code.clone(),
            Block::List(list) => list.plain_text(),
            Block::Rule => String::new(),
        }
    }

    /// Check if the block embeds an image or an image placeholder.
    pub fn has_image(&self) -> bool {
        match self {
            Block::Heading { content, .. } | Block::Generic { content, .. } => {
                inline::has_image(content)
            }
            Block::List(list) => list.items.iter().any(|item| inline::has_image(&item.content)),
            Block::CodeBlock { .. } | Block::Rule => false,
        }
    }

    /// Check if the block has non-blank text or at least one image.
    ///
    /// This is the single content rule shared by grouping, section splitting
    /// and page flushing.
    pub fn has_content(&self) -> bool {
        match self {
            Block::List(list) => list.items.iter().any(ListItem::has_content),
            Block::Rule => false,
            _ => self.has_image() || !self.plain_text().trim().is_empty(),
        }
    }

    /// Check if this block is a section marker.
    pub fn is_rule(&self) -> bool {
        matches!(self, Block::Rule)
    }
}

/// What a generic block was in the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericKind {
    /// A paragraph (default)
    #[default]
    Paragraph,
    /// A block quote
    Quote,
    /// A table, flattened to text rows
    Table,
    /// Raw HTML
    Html,
}

/// A list with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Ordered (numbered) or unordered (bulleted)
    pub ordered: bool,

    /// Number shown on the first item of an ordered list
    pub start: u32,

    /// List items
    pub items: Vec<ListItem>,
}

impl List {
    /// Create a new list.
    pub fn new(ordered: bool, start: u32, items: Vec<ListItem>) -> Self {
        Self {
            ordered,
            start,
            items,
        }
    }

    /// Build a fragment of this list carrying its own start number.
    pub fn fragment(&self, start: u32, items: Vec<ListItem>) -> Self {
        Self {
            ordered: self.ordered,
            start,
            items,
        }
    }

    /// Number displayed for the item at `index`.
    pub fn number_of(&self, index: usize) -> u32 {
        self.start + index as u32
    }

    /// Get plain text of all items, one per line.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(ListItem::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// A single list item with its inline content.
///
/// Paragraphs inside an item are separated by a blank line in its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content
    pub content: Vec<Inline>,
}

impl ListItem {
    /// Create a list item with plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content: vec![Inline::text(text)],
        }
    }

    /// Create a list item from inline content.
    pub fn from_inlines(content: Vec<Inline>) -> Self {
        Self { content }
    }

    /// Get plain text content of the item.
    pub fn plain_text(&self) -> String {
        inline::plain_text(&self.content)
    }

    /// Check if the item has non-blank text or an image.
    pub fn has_content(&self) -> bool {
        inline::has_visible_content(&self.content)
    }
}
