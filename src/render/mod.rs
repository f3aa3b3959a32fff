//! Stages around the paginator: Markdown in, images resolved, pages out.

pub mod images;
mod json;
pub mod label;
pub mod markdown;
mod text;

pub use images::{resolve_images, FsImageResolver, ImageResolver, ResolvedImage};
pub use json::{to_json, JsonFormat};
pub use label::{export_file_name, PageCursor, PageLabel};
pub use markdown::{page_markdown, parse_markdown, to_markdown};
pub use text::to_text;

#[cfg(feature = "async")]
pub use images::resolve_images_async;
