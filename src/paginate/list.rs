//! Item-granular splitting of lists with numbering continuity.

use std::slice;

use super::buffer::PageBuffer;
use super::generic::place_single;
use super::long_item::place_long_item;
use crate::error::Result;
use crate::layout::MeasurementOracle;
use crate::model::{Block, ListItem};

/// Place a list, splitting it between items when it cannot fit.
///
/// Every sealed fragment is a complete list whose `start` continues the
/// numbering of the fragment before it. Items without content are dropped.
pub(crate) fn place_list<O>(buf: &mut PageBuffer<'_, O>, block: Block, start: u32) -> Result<()>
where
    O: MeasurementOracle + ?Sized,
{
    let list = match &block {
        Block::List(list) => list.clone(),
        _ => return place_single(buf, block),
    };

    let items: Vec<ListItem> = list
        .items
        .iter()
        .filter(|item| item.has_content())
        .cloned()
        .collect();
    if items.is_empty() {
        if block.has_content() {
            buf.push(block);
        }
        return Ok(());
    }

    let mut start = start;
    let mut running: Vec<ListItem> = Vec::new();
    let mut sealed = 0u32;
    let mut index = 0;

    while index < items.len() {
        running.push(items[index].clone());
        let candidate = Block::List(list.fragment(start, running.clone()));
        if buf.fits_with_current(slice::from_ref(&candidate))? {
            index += 1;
            continue;
        }
        running.pop();

        if !running.is_empty() {
            let fragment = std::mem::take(&mut running);
            let count = fragment.len() as u32;
            log::debug!("sealing list fragment {}..{}", start, start + count - 1);
            buf.push(Block::List(list.fragment(start, fragment)));
            buf.stats.add_list_fragment();
            sealed += 1;
            start += count;
            buf.flush();
        } else if !buf.is_empty() {
            buf.flush();
        } else {
            place_long_item(buf, &list, start, items[index].clone())?;
            sealed += 1;
            start += 1;
            index += 1;
        }
    }

    if !running.is_empty() {
        buf.push(Block::List(list.fragment(start, running)));
        if sealed > 0 {
            buf.stats.add_list_fragment();
        }
    }
    Ok(())
}
