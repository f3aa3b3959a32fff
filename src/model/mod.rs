//! Document model types for paginated content.
//!
//! Blocks are produced once per pagination run by the markdown front-end
//! (or any other renderer) and are never mutated afterwards: every split
//! builds new block values.

mod block;
pub mod inline;
mod page;

pub use block::{Block, GenericKind, List, ListItem};
pub use inline::{ImageRef, Inline};
pub use page::Page;
