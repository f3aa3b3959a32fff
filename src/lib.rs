//! # notepage
//!
//! Paginate Markdown notes into fixed-aspect pages ready for image export.
//!
//! The engine decides, block by block, where page boundaries fall. Headings
//! and paragraphs move whole, code blocks split between lines, lists split
//! between items with their numbering carried across pages, and a single
//! oversized list item is broken at paragraphs and then words. Every fit
//! decision asks a [`MeasurementOracle`] for a rendered height.
//!
//! ## Quick Start
//!
//! ```
//! use notepage::{paginate_markdown, LayoutConfig};
//!
//! let source = "# Groceries\n\n1. apples\n2. pears\n";
//! let pages = paginate_markdown(source, &LayoutConfig::default())?;
//! assert_eq!(pages.len(), 1);
//! # Ok::<(), notepage::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Oracle-driven**: plug in a browser, a font engine or the built-in
//!   [`TextMetricsOracle`]
//! - **Structure-aware splitting**: code by line, lists by item, long items
//!   by paragraph and word
//! - **Numbering continuity**: every list fragment carries its own start
//! - **Section splitting**: horizontal rules start a new page
//! - **Parallel batches**: independent documents paginated with Rayon

pub mod error;
pub mod layout;
pub mod model;
pub mod paginate;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{
    CountingOracle, FnOracle, LayoutConfig, MeasurementOracle, PageChrome, PageFrame,
    TextMetricsOracle,
};
pub use model::{Block, GenericKind, ImageRef, Inline, List, ListItem, Page};
pub use paginate::{paginate, paginate_batch, PageSet, PaginateOptions, PaginationStats, Paginator};
pub use render::{FsImageResolver, ImageResolver, JsonFormat, PageLabel};

use std::path::{Path, PathBuf};

/// Paginate Markdown source with the built-in text-metrics oracle.
///
/// # Example
///
/// ```
/// use notepage::{paginate_markdown, LayoutConfig};
///
/// let config = LayoutConfig::default().with_font_size(18.0);
/// let pages = paginate_markdown("Hello\n\n---\n\nWorld", &config)?;
/// assert_eq!(pages.len(), 2);
/// # Ok::<(), notepage::Error>(())
/// ```
pub fn paginate_markdown(source: &str, config: &LayoutConfig) -> Result<PageSet> {
    let blocks = render::parse_markdown(source);
    paginate(
        &blocks,
        config,
        &PaginateOptions::default(),
        &TextMetricsOracle::new(),
    )
}

/// Read a Markdown file, resolve its images and paginate it.
///
/// Images are resolved relative to the file's directory.
///
/// # Example
///
/// ```no_run
/// use notepage::paginate_file;
///
/// let pages = paginate_file("notes/today.md").unwrap();
/// println!("Pages: {}", pages.len());
/// ```
pub fn paginate_file<P: AsRef<Path>>(path: P) -> Result<PageSet> {
    Notepage::new().paginate_file(path)
}

/// Convert a Markdown file to paginated Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let pages = paginate_file(path)?;
    Ok(render::to_markdown(&pages))
}

/// Convert a Markdown file to a JSON page set.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let pages = paginate_file(path)?;
    render::to_json(&pages, format)
}

/// Builder for paginating Markdown documents.
///
/// # Example
///
/// ```
/// use notepage::Notepage;
///
/// let pages = Notepage::new()
///     .with_font_size(14.0)
///     .with_section_split(false)
///     .paginate_str("first\n\n---\n\nsecond")?;
/// assert_eq!(pages.len(), 1);
/// # Ok::<(), notepage::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Notepage {
    config: LayoutConfig,
    options: PaginateOptions,
    frame: PageFrame,
    chrome: Option<PageChrome>,
    base_dir: Option<PathBuf>,
}

impl Notepage {
    /// Create a new builder with the default page frame.
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
            options: PaginateOptions::default(),
            frame: PageFrame::default(),
            chrome: None,
            base_dir: None,
        }
    }

    /// Replace the whole layout configuration.
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.config = self.config.with_font_size(size);
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.config = self.config.with_font_family(family);
        self
    }

    /// Set the line height multiplier.
    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.config = self.config.with_line_height(multiplier);
        self
    }

    /// Enable or disable section splitting on horizontal rules.
    pub fn with_section_split(mut self, enabled: bool) -> Self {
        self.options = self.options.with_section_split(enabled);
        self
    }

    /// Set the page frame used with [`with_chrome`](Self::with_chrome).
    pub fn with_frame(mut self, frame: PageFrame) -> Self {
        self.frame = frame;
        self
    }

    /// Measure this header and footer to derive the content budget.
    pub fn with_chrome(mut self, chrome: PageChrome) -> Self {
        self.chrome = Some(chrome);
        self
    }

    /// Resolve images against this directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Get the layout configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Paginate Markdown source with the built-in text-metrics oracle.
    pub fn paginate_str(&self, source: &str) -> Result<PageSet> {
        self.paginate_with(source, &TextMetricsOracle::new())
    }

    /// Paginate Markdown source with a caller-supplied oracle.
    pub fn paginate_with<O: MeasurementOracle + ?Sized>(
        &self,
        source: &str,
        oracle: &O,
    ) -> Result<PageSet> {
        let mut blocks = render::parse_markdown(source);
        if let Some(dir) = &self.base_dir {
            blocks = render::resolve_images(blocks, &FsImageResolver::new(dir));
        }

        let config = self.layout_config(oracle)?;
        paginate(&blocks, &config, &self.options, oracle)
    }

    /// Read and paginate a Markdown file.
    ///
    /// Without an explicit base directory, images resolve against the
    /// file's own directory.
    pub fn paginate_file<P: AsRef<Path>>(&self, path: P) -> Result<PageSet> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        if self.base_dir.is_some() {
            return self.paginate_str(&source);
        }
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.clone().with_base_dir(dir).paginate_str(&source)
    }

    /// Layout configuration for a run, measuring chrome when configured.
    fn layout_config<O: MeasurementOracle + ?Sized>(&self, oracle: &O) -> Result<LayoutConfig> {
        let Some(chrome) = &self.chrome else {
            return Ok(self.config.clone());
        };
        let measured = self.frame.measured_layout_config(
            oracle,
            chrome,
            self.config.font_size,
            &self.config.font_family,
        )?;
        Ok(self
            .config
            .clone()
            .with_max_content_height(measured.max_content_height))
    }
}

impl Default for Notepage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = Notepage::default();
        assert_eq!(builder.config().max_content_height, 530.0);
        assert!(builder.options.split_on_rules);
        assert!(builder.chrome.is_none());
    }

    #[test]
    fn test_builder_chained() {
        let builder = Notepage::new()
            .with_font_size(20.0)
            .with_font_family("serif")
            .with_line_height(1.2)
            .with_section_split(false);

        assert_eq!(builder.config.font_size, 20.0);
        assert_eq!(builder.config.font_family, "serif");
        assert_eq!(builder.config.line_height, 1.2);
        assert!(!builder.options.split_on_rules);
    }

    #[test]
    fn test_chrome_shrinks_budget() {
        let oracle = FnOracle(|_: &[Block], _: &LayoutConfig| Ok(100.0));
        let builder = Notepage::new().with_chrome(
            PageChrome::new()
                .with_header(vec![Block::paragraph("[note 1/1]")])
                .with_footer(vec![Block::paragraph("footer")]),
        );
        let config = builder.layout_config(&oracle).unwrap();
        // 600 - 20 padding - 100 - 100
        assert_eq!(config.max_content_height, 380.0);
    }

    #[test]
    fn test_paginate_str_sections() {
        let pages = Notepage::new()
            .paginate_str("# One\n\ntext\n\n---\n\n# Two\n\nmore text")
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.stats.section_count, 2);
    }

    #[test]
    fn test_paginate_missing_file() {
        let result = paginate_file("/nonexistent/notes.md");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_paginate_file_resolves_relative_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "Intro\n\n![missing](pics/none.png)\n").unwrap();

        let pages = paginate_file(&path).unwrap();
        let text = pages.pages[0].plain_text();
        assert!(text.contains("Image not found: pics/none.png"));
    }
}
