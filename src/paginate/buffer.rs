//! The scratch page every splitter works against.

use crate::error::{Error, Result};
use crate::layout::{LayoutConfig, MeasurementOracle};
use crate::model::Block;

use super::result::PaginationStats;

/// Tolerance when comparing a measured height to the budget.
pub(crate) const EPSILON: f32 = 0.01;

/// Current page under construction plus the pages already sealed.
///
/// Each run owns one buffer; nothing in it is shared across runs.
pub(crate) struct PageBuffer<'a, O: ?Sized> {
    oracle: &'a O,
    config: &'a LayoutConfig,
    current: Vec<Block>,
    pages: Vec<Vec<Block>>,
    pub(crate) stats: PaginationStats,
}

impl<'a, O: MeasurementOracle + ?Sized> PageBuffer<'a, O> {
    pub(crate) fn new(oracle: &'a O, config: &'a LayoutConfig) -> Self {
        Self {
            oracle,
            config,
            current: Vec::new(),
            pages: Vec::new(),
            stats: PaginationStats::new(),
        }
    }

    fn checked(&mut self, height: Result<f32>, blocks: usize) -> Result<f32> {
        self.stats.add_measure();
        let height = height?;
        if !height.is_finite() || height < 0.0 {
            return Err(Error::Measure(format!(
                "oracle returned invalid height {}",
                height
            )));
        }
        log::trace!("measure({} blocks) = {:.2}", blocks, height);
        Ok(height)
    }

    /// Whether a measured height is within the budget.
    pub(crate) fn within_budget(&self, height: f32) -> bool {
        height <= self.config.max_content_height + EPSILON
    }

    /// Check whether `blocks` alone fit on an empty page.
    pub(crate) fn fits_alone(&mut self, blocks: &[Block]) -> Result<bool> {
        let height = self.oracle.measure(blocks, self.config);
        let height = self.checked(height, blocks.len())?;
        Ok(self.within_budget(height))
    }

    /// Check whether the current page followed by `extra` fits.
    pub(crate) fn fits_with_current(&mut self, extra: &[Block]) -> Result<bool> {
        let len = self.current.len();
        self.current.extend_from_slice(extra);
        let height = self.oracle.measure(&self.current, self.config);
        let count = self.current.len();
        self.current.truncate(len);

        let height = self.checked(height, count)?;
        Ok(self.within_budget(height))
    }

    /// Append a block to the current page.
    pub(crate) fn push(&mut self, block: Block) {
        self.current.push(block);
    }

    /// Whether the current page holds any block at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Seal the current page and start a new one.
    ///
    /// A page without visible content is discarded instead of sealed.
    pub(crate) fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let page = std::mem::take(&mut self.current);
        if page.iter().any(Block::has_content) {
            log::debug!("flush page {} ({} blocks)", self.pages.len() + 1, page.len());
            self.pages.push(page);
        } else {
            log::debug!("discarding page without content");
        }
    }

    /// Flush the last page and hand back everything sealed.
    pub(crate) fn finish(mut self) -> (Vec<Vec<Block>>, PaginationStats) {
        self.flush();
        (self.pages, self.stats)
    }
}
