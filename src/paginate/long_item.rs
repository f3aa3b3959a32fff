//! Splitting of a single list item too tall for any page.
//!
//! The item is broken at blank-line paragraph boundaries first, then at
//! whitespace between words. Each fragment becomes a one-item list at the
//! next ordinal. The work list is explicit so a pathological item cannot
//! exhaust the stack.

use std::collections::VecDeque;
use std::slice;
use std::sync::OnceLock;

use regex::Regex;

use super::buffer::PageBuffer;
use crate::error::Result;
use crate::layout::MeasurementOracle;
use crate::model::{Block, Inline, List, ListItem};

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"))
}

/// Place one list item on fresh pages, splitting it as needed.
///
/// The last fragment stays on the current page so following items can
/// share it.
pub(crate) fn place_long_item<O>(
    buf: &mut PageBuffer<'_, O>,
    list: &List,
    ordinal: u32,
    item: ListItem,
) -> Result<()>
where
    O: MeasurementOracle + ?Sized,
{
    buf.flush();

    let whole = item_block(list, ordinal, item.content.clone());
    if buf.fits_alone(slice::from_ref(&whole))? {
        buf.push(whole);
        return Ok(());
    }

    log::debug!("splitting oversized list item {}", ordinal);
    let mut ordinal = ordinal;
    let mut pending: VecDeque<Vec<Inline>> = paragraphs(&item.content).into();

    while !pending.is_empty() {
        let mut taken: Vec<Vec<Inline>> = Vec::new();
        while let Some(next) = pending.front() {
            let mut trial = taken.clone();
            trial.push(next.clone());
            let candidate = item_block(list, ordinal, join_paragraphs(&trial));
            if !buf.fits_with_current(slice::from_ref(&candidate))? {
                break;
            }
            taken = trial;
            pending.pop_front();
        }

        let content = if !taken.is_empty() {
            join_paragraphs(&taken)
        } else if let Some(paragraph) = pending.pop_front() {
            let (head, rest) = take_words(buf, list, ordinal, &paragraph)?;
            if !rest.is_empty() {
                pending.push_front(join_words(&rest));
            }
            join_words(&head)
        } else {
            break;
        };

        buf.push(item_block(list, ordinal, content));
        buf.stats.add_long_item_fragment();
        if !pending.is_empty() {
            buf.flush();
            ordinal += 1;
        }
    }
    Ok(())
}

/// Take as many leading words of `paragraph` as fit on the current page.
///
/// At least one word is always taken.
fn take_words<O>(
    buf: &mut PageBuffer<'_, O>,
    list: &List,
    ordinal: u32,
    paragraph: &[Inline],
) -> Result<(Vec<Inline>, Vec<Inline>)>
where
    O: MeasurementOracle + ?Sized,
{
    let words = words(paragraph);
    let mut count = 0;
    while count < words.len() {
        let candidate = item_block(list, ordinal, join_words(&words[..=count]));
        if !buf.fits_with_current(slice::from_ref(&candidate))? {
            break;
        }
        count += 1;
    }
    if count == 0 && !words.is_empty() {
        log::warn!("word exceeds page budget; placing it alone");
        buf.stats.add_oversized();
        count = 1;
    }

    let mut head = words;
    let rest = head.split_off(count);
    Ok((head, rest))
}

fn item_block(list: &List, ordinal: u32, content: Vec<Inline>) -> Block {
    Block::List(list.fragment(ordinal, vec![ListItem::from_inlines(content)]))
}

/// Split inline content at blank lines, dropping empty paragraphs.
fn paragraphs(content: &[Inline]) -> Vec<Vec<Inline>> {
    let mut result = Vec::new();
    let mut current: Vec<Inline> = Vec::new();

    for inline in content {
        match inline {
            Inline::Text { text } => {
                let mut pieces = paragraph_break().split(text);
                if let Some(first) = pieces.next() {
                    push_text(&mut current, first);
                }
                for piece in pieces {
                    result.push(std::mem::take(&mut current));
                    push_text(&mut current, piece);
                }
            }
            other => current.push(other.clone()),
        }
    }
    result.push(current);

    result
        .into_iter()
        .filter(|p| crate::model::inline::has_visible_content(p))
        .collect()
}

/// Split a paragraph into word atoms. Images, links and code spans stay whole.
fn words(paragraph: &[Inline]) -> Vec<Inline> {
    let mut words = Vec::new();
    for inline in paragraph {
        match inline {
            Inline::Text { text } => words.extend(text.split_whitespace().map(Inline::text)),
            Inline::LineBreak => {}
            other => words.push(other.clone()),
        }
    }
    words
}

fn join_paragraphs(paragraphs: &[Vec<Inline>]) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 {
            push_text(&mut out, "\n\n");
        }
        for inline in paragraph {
            match inline {
                Inline::Text { text } => push_text(&mut out, text),
                other => out.push(other.clone()),
            }
        }
    }
    out
}

fn join_words(words: &[Inline]) -> Vec<Inline> {
    let mut out = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            push_text(&mut out, " ");
        }
        match word {
            Inline::Text { text } => push_text(&mut out, text),
            other => out.push(other.clone()),
        }
    }
    out
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Inline::Text { text: last }) => last.push_str(text),
        _ => out.push(Inline::text(text)),
    }
}
