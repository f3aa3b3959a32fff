//! Line-granular splitting of code blocks.

use std::slice;

use super::buffer::PageBuffer;
use super::generic::place_single;
use crate::error::Result;
use crate::layout::MeasurementOracle;
use crate::model::Block;

/// Place a code block, splitting it between lines when it cannot fit.
///
/// Blank lines are dropped from split fragments. Every fragment keeps the
/// language tag of the original block.
pub(crate) fn place_code<O>(buf: &mut PageBuffer<'_, O>, block: Block) -> Result<()>
where
    O: MeasurementOracle + ?Sized,
{
    let (language, code) = match &block {
        Block::CodeBlock { language, code } => (language.clone(), code.clone()),
        _ => return place_single(buf, block),
    };

    let whole = slice::from_ref(&block);
    if buf.fits_with_current(whole)? {
        buf.push(block);
        return Ok(());
    }
    if !buf.is_empty() && buf.fits_alone(whole)? {
        buf.flush();
        buf.push(block);
        return Ok(());
    }

    let lines: Vec<&str> = code.lines().filter(|line| !line.trim().is_empty()).collect();
    log::debug!("splitting code block of {} lines", lines.len());

    let mut fragment: Vec<&str> = Vec::new();
    for line in lines {
        loop {
            fragment.push(line);
            let candidate = code_fragment(&language, &fragment);
            if buf.fits_with_current(slice::from_ref(&candidate))? {
                break;
            }
            fragment.pop();

            if !fragment.is_empty() {
                buf.push(code_fragment(&language, &fragment));
                buf.stats.add_code_fragment();
                fragment.clear();
                buf.flush();
            } else if !buf.is_empty() {
                buf.flush();
            } else {
                log::warn!("code line exceeds page budget; placing it alone");
                buf.stats.add_oversized();
                buf.stats.add_code_fragment();
                buf.push(candidate);
                break;
            }
        }
    }

    if !fragment.is_empty() {
        buf.push(code_fragment(&language, &fragment));
        buf.stats.add_code_fragment();
    }
    Ok(())
}

fn code_fragment(language: &Option<String>, lines: &[&str]) -> Block {
    Block::CodeBlock {
        language: language.clone(),
        code: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FnOracle, LayoutConfig};

    fn line_oracle() -> FnOracle<impl Fn(&[Block], &LayoutConfig) -> Result<f32>> {
        FnOracle(|blocks: &[Block], _: &LayoutConfig| {
            Ok(blocks
                .iter()
                .map(|b| b.plain_text().lines().count().max(1) as f32)
                .sum())
        })
    }

    fn code_lines(block: &Block) -> usize {
        match block {
            Block::CodeBlock { code, .. } => code.lines().count(),
            _ => 0,
        }
    }

    #[test]
    fn test_whole_block_kept() {
        let oracle = line_oracle();
        let config = LayoutConfig::default().with_max_content_height(10.0);
        let mut buf = PageBuffer::new(&oracle, &config);

        let block = Block::code(Some("rust"), "a\nb\nc");
        place_code(&mut buf, block.clone()).unwrap();
        let (pages, stats) = buf.finish();
        assert_eq!(pages, vec![vec![block]]);
        assert_eq!(stats.code_fragment_count, 0);
    }

    #[test]
    fn test_moves_whole_block_to_fresh_page() {
        let oracle = line_oracle();
        let config = LayoutConfig::default().with_max_content_height(5.0);
        let mut buf = PageBuffer::new(&oracle, &config);

        buf.push(Block::paragraph("one\ntwo\nthree"));
        place_code(&mut buf, Block::code(None, "a\nb\nc")).unwrap();
        let (pages, _) = buf.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(code_lines(&pages[1][0]), 3);
    }

    #[test]
    fn test_split_by_lines() {
        let oracle = line_oracle();
        let config = LayoutConfig::default().with_max_content_height(4.0);
        let mut buf = PageBuffer::new(&oracle, &config);

        let code = (1..=10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        place_code(&mut buf, Block::code(Some("py"), code)).unwrap();
        let (pages, stats) = buf.finish();

        let counts: Vec<usize> = pages.iter().map(|p| code_lines(&p[0])).collect();
        assert_eq!(counts, vec![4, 4, 2]);
        assert_eq!(stats.code_fragment_count, 3);
        for page in &pages {
            assert!(matches!(&page[0], Block::CodeBlock { language: Some(l), .. } if l == "py"));
        }
    }

    #[test]
    fn test_fills_partial_page_first() {
        let oracle = line_oracle();
        let config = LayoutConfig::default().with_max_content_height(4.0);
        let mut buf = PageBuffer::new(&oracle, &config);

        buf.push(Block::paragraph("intro"));
        let code = (1..=6).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        place_code(&mut buf, Block::code(None, code)).unwrap();
        let (pages, _) = buf.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(code_lines(&pages[0][1]), 3);
        assert_eq!(code_lines(&pages[1][0]), 3);
    }

    #[test]
    fn test_blank_lines_dropped_on_split() {
        let oracle = line_oracle();
        let config = LayoutConfig::default().with_max_content_height(2.0);
        let mut buf = PageBuffer::new(&oracle, &config);

        place_code(&mut buf, Block::code(None, "a\n\n  \nb\nc")).unwrap();
        let (pages, _) = buf.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], vec![Block::code(None, "a\nb")]);
        assert_eq!(pages[1], vec![Block::code(None, "c")]);
    }
}
