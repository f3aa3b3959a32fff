//! Plain text rendering for page sets.

use crate::paginate::PageSet;

/// Separator written between pages (form feed on its own line).
pub const PAGE_BREAK: &str = "\n\u{000C}\n";

/// Convert a page set to plain text, one form-feed separated chunk per page.
pub fn to_text(pages: &PageSet) -> String {
    pages
        .iter()
        .map(|page| page.plain_text().trim().to_string())
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}
