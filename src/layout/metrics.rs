//! Built-in font-metrics oracle.
//!
//! Approximates a browser layout of the blocks with fixed glyph advances:
//! text wraps with `textwrap` at a column count derived from the content
//! width, and East Asian wide characters count as two columns through
//! `unicode-width`. Precise enough for previews and the CLI; embedders with
//! a real renderer should supply their own [`MeasurementOracle`].

use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthStr;

use super::{LayoutConfig, MeasurementOracle};
use crate::error::Result;
use crate::model::{Block, Inline};

/// Tunable constants of the text-metrics model.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    /// Advance of a narrow glyph as a multiple of the font size
    pub glyph_width_ratio: f32,

    /// Advance of a monospace glyph as a multiple of the font size
    pub mono_width_ratio: f32,

    /// Space after every block, in em
    pub block_spacing_em: f32,

    /// Left indent of list item text, in em
    pub list_indent_em: f32,

    /// Vertical padding around code blocks, in em
    pub code_padding_em: f32,

    /// Vertical margin around images
    pub image_margin: f32,

    /// Height assumed for an image whose size is unknown
    pub unknown_image_height: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            glyph_width_ratio: 0.55,
            mono_width_ratio: 0.6,
            block_spacing_em: 0.5,
            list_indent_em: 1.5,
            code_padding_em: 1.0,
            image_margin: 20.0,
            unknown_image_height: 100.0,
        }
    }
}

/// Oracle estimating heights from font size, line height and text width.
#[derive(Debug, Clone, Default)]
pub struct TextMetricsOracle {
    metrics: TextMetrics,
}

impl TextMetricsOracle {
    /// Create an oracle with default metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the metrics model.
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the metrics model.
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    fn block_height(&self, block: &Block, config: &LayoutConfig) -> f32 {
        let m = &self.metrics;
        match block {
            Block::Heading { level, content } => {
                let size = config.font_size * heading_scale(*level);
                self.inline_height(content, config.content_width, size, config)
            }
            Block::Generic { content, .. } => {
                self.inline_height(content, config.content_width, config.font_size, config)
            }
            Block::CodeBlock { code, .. } => {
                let cols = columns(config.content_width, config.font_size * m.mono_width_ratio);
                let rows: usize = code
                    .lines()
                    .map(|line| line.width().div_ceil(cols).max(1))
                    .sum();
                rows as f32 * config.line_height_px() + m.code_padding_em * config.font_size
            }
            Block::List(list) => {
                let width = config.content_width - m.list_indent_em * config.font_size;
                list.items
                    .iter()
                    .map(|item| self.inline_height(&item.content, width, config.font_size, config))
                    .sum()
            }
            Block::Rule => config.font_size,
        }
    }

    /// Height of a run of inlines: wrapped text interleaved with images.
    fn inline_height(&self, content: &[Inline], width: f32, size: f32, config: &LayoutConfig) -> f32 {
        let cols = columns(width, size * self.metrics.glyph_width_ratio);
        let line = size * config.line_height;

        let mut height = 0.0;
        let mut text = String::new();
        for inline in content {
            match inline {
                Inline::Image(image) => {
                    height += text_lines(&text, cols) as f32 * line;
                    text.clear();
                    height += match image.dimensions() {
                        Some((w, h)) if w > 0.0 => h * (width / w).min(1.0),
                        _ => self.metrics.unknown_image_height,
                    } + self.metrics.image_margin;
                }
                Inline::Placeholder { height: h, .. } => {
                    height += text_lines(&text, cols) as f32 * line;
                    text.clear();
                    height += h;
                }
                other => text.push_str(other.plain_text()),
            }
        }
        height + text_lines(&text, cols) as f32 * line
    }
}

impl MeasurementOracle for TextMetricsOracle {
    fn measure(&self, blocks: &[Block], config: &LayoutConfig) -> Result<f32> {
        let spacing = self.metrics.block_spacing_em * config.font_size;
        let height = blocks
            .iter()
            .map(|block| self.block_height(block, config) + spacing)
            .sum();
        log::trace!("measured {} blocks: {:.1}", blocks.len(), height);
        Ok(height)
    }
}

fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 2.0,
        2 => 1.5,
        3 => 1.25,
        _ => 1.0,
    }
}

fn columns(width: f32, advance: f32) -> usize {
    if advance <= 0.0 {
        return 1;
    }
    ((width / advance).floor() as usize).max(1)
}

/// Number of wrapped lines `text` occupies at `cols` columns.
fn text_lines(text: &str, cols: usize) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    let text: String = text.nfc().collect();
    text.split('\n')
        .map(|line| textwrap::wrap(line, cols).len().max(1))
        .sum()
}
