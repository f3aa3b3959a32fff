//! Placement of blocks that are never split.

use std::slice;

use super::buffer::PageBuffer;
use crate::error::Result;
use crate::layout::MeasurementOracle;
use crate::model::Block;

/// Place a block whole: on the current page if it fits, else on a new one.
///
/// A block taller than the budget on its own goes alone onto a fresh page.
pub(crate) fn place_single<O>(buf: &mut PageBuffer<'_, O>, block: Block) -> Result<()>
where
    O: MeasurementOracle + ?Sized,
{
    let candidate = slice::from_ref(&block);

    if !buf.fits_alone(candidate)? {
        log::warn!("block exceeds page budget on its own; placing it alone");
        buf.stats.add_oversized();
        buf.flush();
        buf.push(block);
        return Ok(());
    }

    if !buf.is_empty() && !buf.fits_with_current(candidate)? {
        buf.flush();
    }
    buf.push(block);
    Ok(())
}
