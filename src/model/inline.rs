//! Inline content carried by headings, paragraphs and list items.

use serde::{Deserialize, Serialize};

/// Inline content within a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text {
        /// The text content
        text: String,
    },

    /// An inline code span
    Code {
        /// The code content
        code: String,
    },

    /// A hard line break
    LineBreak,

    /// A hyperlink
    Link {
        /// Link text
        text: String,
        /// Link URL
        url: String,
    },

    /// An embedded image
    Image(ImageRef),

    /// Fixed-size stand-in for an image that could not be resolved
    Placeholder {
        /// Message shown in place of the image
        message: String,
        /// Height of the placeholder in layout units
        height: f32,
    },
}

impl Inline {
    /// Create a text run.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// Create an image reference without known dimensions.
    pub fn image(src: impl Into<String>) -> Self {
        Inline::Image(ImageRef::new(src))
    }

    /// Text this inline contributes to the rendered output.
    ///
    /// Images contribute nothing; placeholders contribute their message.
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text { text } => text,
            Inline::Code { code } => code,
            Inline::LineBreak => "\n",
            Inline::Link { text, .. } => text,
            Inline::Image(_) => "",
            Inline::Placeholder { message, .. } => message,
        }
    }

    /// Check if this inline is an image or an image placeholder.
    pub fn is_image(&self) -> bool {
        matches!(self, Inline::Image(_) | Inline::Placeholder { .. })
    }
}

/// A reference to an image, resolved or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image source (path, link text or URL)
    pub src: String,

    /// Alternative text
    pub alt: Option<String>,

    /// Intrinsic width in pixels, once resolved
    pub width: Option<f32>,

    /// Intrinsic height in pixels, once resolved
    pub height: Option<f32>,
}

impl ImageRef {
    /// Create an unresolved image reference.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            width: None,
            height: None,
        }
    }

    /// Set the alternative text.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set the intrinsic size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Get intrinsic dimensions if both are known.
    pub fn dimensions(&self) -> Option<(f32, f32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

/// Concatenate the plain text of a run of inlines.
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::plain_text).collect()
}

/// Check whether a run of inlines embeds an image (or its placeholder).
pub fn has_image(content: &[Inline]) -> bool {
    content.iter().any(Inline::is_image)
}

/// Check whether a run of inlines has visible text or an image.
pub fn has_visible_content(content: &[Inline]) -> bool {
    has_image(content) || content.iter().any(|c| !c.plain_text().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_skips_images() {
        let content = vec![
            Inline::text("Hello "),
            Inline::Image(ImageRef::new("cat.png").with_alt("a cat")),
            Inline::Code {
                code: "world".to_string(),
            },
        ];
        assert_eq!(plain_text(&content), "Hello world");
    }

    #[test]
    fn test_visible_content() {
        assert!(!has_visible_content(&[]));
        assert!(!has_visible_content(&[Inline::text("  \n "), Inline::LineBreak]));
        assert!(has_visible_content(&[Inline::image("a.png")]));
        assert!(has_visible_content(&[Inline::Placeholder {
            message: String::new(),
            height: 100.0,
        }]));
    }

    #[test]
    fn test_image_dimensions() {
        let img = ImageRef::new("a.png");
        assert_eq!(img.dimensions(), None);
        let img = img.with_size(640.0, 480.0);
        assert_eq!(img.dimensions(), Some((640.0, 480.0)));
    }
}
