//! Height-driven pagination of block sequences.
//!
//! Blocks are split into sections at horizontal rules, grouped into
//! dispatch units, and placed greedily onto pages. Each group kind has its
//! own splitter; every fit decision is a call to the
//! [`MeasurementOracle`].
//!
//! ```
//! use notepage::layout::{FnOracle, LayoutConfig};
//! use notepage::paginate::{PaginateOptions, Paginator};
//! use notepage::Block;
//!
//! let oracle = FnOracle(|blocks: &[Block], _: &LayoutConfig| Ok(blocks.len() as f32 * 100.0));
//! let config = LayoutConfig::default().with_max_content_height(250.0);
//! let paginator = Paginator::new(config, oracle).with_options(PaginateOptions::new());
//!
//! let blocks: Vec<Block> = (0..5).map(|i| Block::paragraph(format!("p{}", i))).collect();
//! let pages = paginator.paginate(&blocks)?;
//! assert_eq!(pages.len(), 3);
//! # Ok::<(), notepage::Error>(())
//! ```

mod buffer;
mod code;
mod filter;
mod generic;
mod group;
mod list;
mod long_item;
mod options;
mod result;
mod section;

pub use filter::drop_empty_pages;
pub use group::{group_blocks, Group, GroupKind};
pub use options::PaginateOptions;
pub use result::{PageSet, PaginationStats};
pub use section::split_sections;

use crate::error::Result;
use crate::layout::{LayoutConfig, MeasurementOracle};
use crate::model::Block;
use buffer::PageBuffer;

/// Greedy paginator bound to one layout configuration and oracle.
#[derive(Debug, Clone)]
pub struct Paginator<O> {
    config: LayoutConfig,
    options: PaginateOptions,
    oracle: O,
}

impl<O: MeasurementOracle> Paginator<O> {
    /// Create a paginator with default options.
    pub fn new(config: LayoutConfig, oracle: O) -> Self {
        Self {
            config,
            options: PaginateOptions::default(),
            oracle,
        }
    }

    /// Set run options.
    pub fn with_options(mut self, options: PaginateOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the layout configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Get the oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Paginate a full block sequence.
    ///
    /// An oracle error aborts the run; no partial result is returned.
    pub fn paginate(&self, blocks: &[Block]) -> Result<PageSet> {
        self.config.validate()?;

        let sections = split_sections(blocks, self.options.split_on_rules);
        let mut buf = PageBuffer::new(&self.oracle, &self.config);

        for section in &sections {
            buf.stats.add_section();
            let groups = group_blocks(section);
            place_groups(&mut buf, groups)?;
            buf.flush();
        }

        let (pages, stats) = buf.finish();
        let pages = drop_empty_pages(pages);
        log::debug!(
            "paginated {} blocks into {} pages ({} measurements)",
            blocks.len(),
            pages.len(),
            stats.measure_count
        );
        Ok(PageSet::new(pages, stats))
    }

    /// Paginate the groups of a single section.
    pub fn paginate_section(&self, groups: Vec<Group>) -> Result<PageSet> {
        self.config.validate()?;

        let mut buf = PageBuffer::new(&self.oracle, &self.config);
        buf.stats.add_section();
        place_groups(&mut buf, groups)?;

        let (pages, stats) = buf.finish();
        Ok(PageSet::new(drop_empty_pages(pages), stats))
    }
}

fn place_groups<O>(buf: &mut PageBuffer<'_, O>, groups: Vec<Group>) -> Result<()>
where
    O: MeasurementOracle + ?Sized,
{
    for group in groups {
        buf.stats.add_group();
        for block in group.blocks {
            match group.kind {
                GroupKind::Single => generic::place_single(buf, block)?,
                GroupKind::CodeBlock => code::place_code(buf, block)?,
                GroupKind::List { start, .. } => list::place_list(buf, block, start)?,
            }
        }
    }
    Ok(())
}

/// Paginate blocks with an explicit configuration and oracle.
pub fn paginate<O>(
    blocks: &[Block],
    config: &LayoutConfig,
    options: &PaginateOptions,
    oracle: &O,
) -> Result<PageSet>
where
    O: MeasurementOracle + ?Sized,
{
    Paginator::new(config.clone(), oracle)
        .with_options(options.clone())
        .paginate(blocks)
}

/// Paginate several independent documents in parallel.
///
/// Each run owns its own scratch page; results keep the input order.
pub fn paginate_batch<O>(
    documents: &[Vec<Block>],
    config: &LayoutConfig,
    options: &PaginateOptions,
    oracle: &O,
) -> Vec<Result<PageSet>>
where
    O: MeasurementOracle + Sync + ?Sized,
{
    use rayon::prelude::*;

    documents
        .par_iter()
        .map(|blocks| paginate(blocks, config, options, oracle))
        .collect()
}
