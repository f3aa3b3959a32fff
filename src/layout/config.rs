//! Layout configuration and page geometry.

use serde::{Deserialize, Serialize};

use super::MeasurementOracle;
use crate::error::{Error, Result};
use crate::model::Block;

/// Font family used when none is configured.
pub const DEFAULT_FONT_FAMILY: &str =
    "Optima-Regular, Optima, PingFangSC-light, PingFangTC-light, \"PingFang SC\"";

/// Font size in pixels used when none is configured.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Line height multiplier used when none is configured.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.5;

/// Everything the measurement oracle needs to lay out a candidate page.
///
/// Constant for one pagination run. A change to any field means a full
/// re-run, never an incremental patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of the content box in layout units
    pub content_width: f32,

    /// Height budget of the content box in layout units
    pub max_content_height: f32,

    /// Base font size in layout units
    pub font_size: f32,

    /// CSS-style font family list
    pub font_family: String,

    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl LayoutConfig {
    /// Create a configuration with the default page frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content width.
    pub fn with_content_width(mut self, width: f32) -> Self {
        self.content_width = width;
        self
    }

    /// Set the height budget.
    pub fn with_max_content_height(mut self, height: f32) -> Self {
        self.max_content_height = height;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the line height multiplier.
    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.line_height = multiplier;
        self
    }

    /// Height of one line of body text.
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Check that every dimension is finite and positive.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("content width", self.content_width),
            ("max content height", self.max_content_height),
            ("font size", self.font_size),
            ("line height", self.line_height),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        PageFrame::default().layout_config(DEFAULT_FONT_SIZE, DEFAULT_FONT_FAMILY)
    }
}

/// Geometry of a fixed-aspect page the content box sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFrame {
    /// Page width
    pub page_width: f32,

    /// Page height as a multiple of the width (1.5 = 2:3 portrait)
    pub aspect_ratio: f32,

    /// Inner padding of the page on every side
    pub padding: f32,

    /// Horizontal margin of the content section on each side
    pub section_margin: f32,

    /// Fixed allowance reserved for the header
    pub header_allowance: f32,

    /// Fixed allowance reserved for the footer
    pub footer_allowance: f32,
}

impl PageFrame {
    /// Page height derived from width and aspect ratio.
    pub fn page_height(&self) -> f32 {
        self.page_width * self.aspect_ratio
    }

    /// Width left for content once padding and section margins are removed.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.padding - 2.0 * self.section_margin
    }

    /// Derive a layout configuration using the fixed header/footer allowances.
    pub fn layout_config(&self, font_size: f32, font_family: &str) -> LayoutConfig {
        LayoutConfig {
            content_width: self.content_width(),
            max_content_height: self.page_height() - self.header_allowance - self.footer_allowance,
            font_size,
            font_family: font_family.to_string(),
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    /// Derive a layout configuration by measuring the real header and footer.
    ///
    /// The content budget is the page height minus vertical padding and the
    /// heights the oracle reports for the chrome blocks.
    pub fn measured_layout_config<O: MeasurementOracle + ?Sized>(
        &self,
        oracle: &O,
        chrome: &PageChrome,
        font_size: f32,
        font_family: &str,
    ) -> Result<LayoutConfig> {
        let mut config = self.layout_config(font_size, font_family);
        config.validate()?;

        let header = if chrome.header.is_empty() {
            0.0
        } else {
            oracle.measure(&chrome.header, &config)?
        };
        let footer = if chrome.footer.is_empty() {
            0.0
        } else {
            oracle.measure(&chrome.footer, &config)?
        };

        let budget = self.page_height() - 2.0 * self.padding - header - footer;
        log::debug!(
            "measured chrome: header {:.1}, footer {:.1}, content budget {:.1}",
            header,
            footer,
            budget
        );
        if budget <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "header and footer leave no room for content ({:.1} of {:.1})",
                header + footer,
                self.page_height()
            )));
        }

        config.max_content_height = budget;
        Ok(config)
    }
}

impl Default for PageFrame {
    fn default() -> Self {
        Self {
            page_width: 400.0,
            aspect_ratio: 1.5,
            padding: 10.0,
            section_margin: 13.0,
            header_allowance: 20.0,
            footer_allowance: 50.0,
        }
    }
}

/// Header and footer blocks drawn on every page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageChrome {
    /// Blocks drawn above the content
    pub header: Vec<Block>,

    /// Blocks drawn below the content
    pub footer: Vec<Block>,
}

impl PageChrome {
    /// Create empty chrome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header blocks.
    pub fn with_header(mut self, blocks: Vec<Block>) -> Self {
        self.header = blocks;
        self
    }

    /// Set the footer blocks.
    pub fn with_footer(mut self, blocks: Vec<Block>) -> Self {
        self.footer = blocks;
        self
    }
}
