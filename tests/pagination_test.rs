//! Integration tests for the pagination engine.
//!
//! Heights come from a deterministic line-counting oracle, so every page
//! break below can be worked out by hand.

use notepage::error::{Error, Result};
use notepage::paginate::{group_blocks, split_sections, GroupKind};
use notepage::render::parse_markdown;
use notepage::{
    paginate, paginate_batch, Block, CountingOracle, LayoutConfig, List, ListItem,
    MeasurementOracle, PageSet, PaginateOptions, Paginator,
};

/// Pixels per rendered line.
const LINE: f32 = 10.0;

/// Counts wrapped lines: `cols` characters per line, one line per code line.
struct LineOracle {
    cols: usize,
}

impl LineOracle {
    fn new(cols: usize) -> Self {
        Self { cols }
    }

    fn text_lines(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.cols).max(1)
    }
}

impl MeasurementOracle for LineOracle {
    fn measure(&self, blocks: &[Block], _config: &LayoutConfig) -> Result<f32> {
        let lines: usize = blocks
            .iter()
            .map(|block| match block {
                Block::CodeBlock { code, .. } => code.lines().count(),
                Block::List(list) => list
                    .items
                    .iter()
                    .map(|item| self.text_lines(&item.plain_text()))
                    .sum(),
                Block::Rule => 0,
                other => self.text_lines(&other.plain_text()),
            })
            .sum();
        Ok(lines as f32 * LINE)
    }
}

fn config_lines(lines: usize) -> LayoutConfig {
    LayoutConfig::default().with_max_content_height(lines as f32 * LINE)
}

fn run(blocks: &[Block], lines: usize, cols: usize) -> PageSet {
    paginate(
        blocks,
        &config_lines(lines),
        &PaginateOptions::default(),
        &LineOracle::new(cols),
    )
    .unwrap()
}

/// Every list fragment on every page, in page order.
fn list_fragments(pages: &PageSet) -> Vec<(usize, List)> {
    pages
        .iter()
        .flat_map(|page| {
            page.blocks.iter().filter_map(move |block| match block {
                Block::List(list) => Some((page.index, list.clone())),
                _ => None,
            })
        })
        .collect()
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn page_tokens(pages: &PageSet) -> Vec<String> {
    pages.iter().flat_map(|page| tokens(&page.plain_text())).collect()
}

fn block_tokens(blocks: &[Block]) -> Vec<String> {
    blocks.iter().flat_map(|b| tokens(&b.plain_text())).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_ordered_list_split_carries_start() {
    let list = Block::ordered_list(1, ["one", "two", "three", "four", "five"]);
    let pages = run(&[list], 3, 40);

    assert_eq!(pages.len(), 2);
    let fragments = list_fragments(&pages);
    assert_eq!(fragments.len(), 2);

    let (page, first) = &fragments[0];
    assert_eq!(*page, 0);
    assert_eq!(first.start, 1);
    assert_eq!(first.len(), 3);
    assert_eq!(first.number_of(2), 3);

    let (page, second) = &fragments[1];
    assert_eq!(*page, 1);
    assert_eq!(second.start, 4);
    assert_eq!(
        second.items.iter().map(ListItem::plain_text).collect::<Vec<_>>(),
        vec!["four", "five"]
    );
    assert_eq!(second.number_of(1), 5);
}

#[test]
fn test_code_block_split_by_lines() {
    let code: Vec<String> = (0..40).map(|i| format!("let x{} = {};", i, i)).collect();
    let block = Block::code(Some("rust"), code.join("\n"));
    let pages = run(&[block], 15, 80);

    assert_eq!(pages.len(), 3);
    let counts: Vec<usize> = pages
        .iter()
        .map(|page| match &page.blocks[..] {
            [Block::CodeBlock { language, code }] => {
                assert_eq!(language.as_deref(), Some("rust"));
                code.lines().count()
            }
            other => panic!("unexpected page {:?}", other),
        })
        .collect();
    assert_eq!(counts, vec![15, 15, 10]);
    assert_eq!(pages.stats.code_fragment_count, 3);
}

#[test]
fn test_rule_splits_sections() {
    let blocks = vec![
        Block::heading(1, "Title"),
        Block::paragraph("before the rule"),
        Block::Rule,
        Block::paragraph("after the rule"),
    ];
    let pages = run(&blocks, 50, 40);

    assert_eq!(pages.len(), 2);
    assert_eq!(pages.pages[0].blocks.len(), 2);
    assert_eq!(pages.pages[1].plain_text(), "after the rule");
    assert!(pages.iter().all(|p| !p.blocks.iter().any(Block::is_rule)));
}

#[test]
fn test_long_item_split_by_words() {
    let words: Vec<String> = (0..2000).map(|i| format!("w{}", i)).collect();
    let text = words.join(" ");
    let list = Block::List(List::new(false, 1, vec![ListItem::new(text.clone())]));
    let pages = run(&[list], 2, 40);

    assert!(pages.len() > 1);
    for page in &pages {
        assert!(page.has_content(), "page {} is empty", page.index);
        assert_eq!(page.blocks.len(), 1);
    }
    assert_eq!(page_tokens(&pages), words);
    assert!(pages.stats.long_item_fragment_count > 1);
}

// ============================================================================
// Properties
// ============================================================================

const NOTE: &str = r#"# Weekly notes

Some opening words that run on for a little while so that they wrap.

1. first task
2. second task with a longer description that will wrap around
3. third task

```python
def main():
    print("hello")

    return 0
```

---

## Reading

- a book
- another book



Closing paragraph.
"#;

#[test]
fn test_no_empty_pages() {
    let blocks = parse_markdown(NOTE);
    for lines in 1..8 {
        let pages = run(&blocks, lines, 20);
        for page in &pages {
            assert!(
                page.has_content(),
                "empty page {} at budget {}",
                page.index,
                lines
            );
        }
    }
}

#[test]
fn test_numbering_continuity() {
    let items: Vec<String> = (0..12).map(|i| format!("item {}", i)).collect();
    let list = Block::ordered_list(3, items.iter().map(String::as_str));

    for lines in 1..6 {
        let pages = run(&[list.clone()], lines, 40);
        let fragments = list_fragments(&pages);

        let mut expected_start = 3;
        let mut renumbered = Vec::new();
        for (_, fragment) in &fragments {
            assert_eq!(fragment.start, expected_start);
            expected_start += fragment.len() as u32;
            renumbered.extend(fragment.items.iter().map(ListItem::plain_text));
        }
        assert_eq!(renumbered, items);
    }
}

#[test]
fn test_content_conservation() {
    let blocks = parse_markdown(NOTE);
    let expected = block_tokens(&blocks);

    for lines in 1..8 {
        let pages = run(&blocks, lines, 20);
        assert_eq!(page_tokens(&pages), expected, "budget {}", lines);
    }
}

#[test]
fn test_idempotent_under_fixed_config() {
    let blocks = parse_markdown(NOTE);
    let first = run(&blocks, 4, 20);
    let second = run(&blocks, 4, 20);
    assert_eq!(first, second);
}

#[test]
fn test_oversized_atom_placed_alone() {
    let giant = "x".repeat(100);
    let list = Block::List(List::new(
        true,
        1,
        vec![
            ListItem::new("a"),
            ListItem::new(giant.clone()),
            ListItem::new("c"),
        ],
    ));
    let pages = run(&[list], 3, 10);

    assert_eq!(pages.len(), 3);
    assert_eq!(pages.pages[1].plain_text(), giant);
    assert_eq!(pages.pages[1].blocks.len(), 1);
    assert!(pages.stats.oversized_count >= 1);

    let starts: Vec<u32> = list_fragments(&pages).iter().map(|(_, l)| l.start).collect();
    assert_eq!(starts, vec![1, 2, 3]);
}

#[test]
fn test_oversized_paragraph_not_split() {
    let long = "word ".repeat(40);
    let blocks = vec![Block::paragraph("short"), Block::paragraph(long.trim())];
    let pages = run(&blocks, 2, 20);

    assert_eq!(pages.len(), 2);
    assert_eq!(pages.pages[1].blocks.len(), 1);
    assert_eq!(pages.stats.oversized_count, 1);
}

#[test]
fn test_long_item_split_by_paragraphs() {
    let item = ListItem::new("aaaa bbbb cccc dddd\n\neeee ffff gggg hhhh");
    let list = Block::List(List::new(true, 1, vec![item]));
    let pages = run(&[list], 3, 10);

    assert_eq!(pages.len(), 2);
    let fragments = list_fragments(&pages);
    assert_eq!(fragments[0].1.start, 1);
    assert_eq!(fragments[0].1.plain_text(), "aaaa bbbb cccc dddd");
    assert_eq!(fragments[1].1.start, 2);
    assert_eq!(fragments[1].1.plain_text(), "eeee ffff gggg hhhh");
}

// ============================================================================
// Pre-passes and errors
// ============================================================================

#[test]
fn test_sections_without_content_dropped() {
    let blocks = vec![
        Block::Rule,
        Block::paragraph("  "),
        Block::Rule,
        Block::paragraph("kept"),
        Block::Rule,
    ];
    let sections = split_sections(&blocks, true);
    assert_eq!(sections.len(), 1);

    let pages = run(&blocks, 5, 40);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages.pages[0].plain_text(), "kept");
}

#[test]
fn test_grouper_kinds() {
    let blocks = parse_markdown("# H\n\n5. five\n6. six\n\n```\ncode\n```\n\n- a\n");
    let kinds: Vec<GroupKind> = group_blocks(&blocks).iter().map(|g| g.kind).collect();
    assert_eq!(
        kinds,
        vec![
            GroupKind::Single,
            GroupKind::List {
                ordered: true,
                start: 5
            },
            GroupKind::CodeBlock,
            GroupKind::List {
                ordered: false,
                start: 1
            },
        ]
    );
}

#[test]
fn test_empty_input() {
    let pages = run(&[], 5, 40);
    assert!(pages.is_empty());

    let pages = run(&[Block::Rule, Block::paragraph("")], 5, 40);
    assert!(pages.is_empty());
}

struct FailingOracle;

impl MeasurementOracle for FailingOracle {
    fn measure(&self, _blocks: &[Block], _config: &LayoutConfig) -> Result<f32> {
        Err(Error::Measure("renderer crashed".to_string()))
    }
}

#[test]
fn test_oracle_failure_is_fatal() {
    let result = paginate(
        &[Block::paragraph("a")],
        &LayoutConfig::default(),
        &PaginateOptions::default(),
        &FailingOracle,
    );
    assert!(matches!(result, Err(Error::Measure(msg)) if msg.contains("crashed")));
}

#[test]
fn test_measure_count_matches_oracle_calls() {
    let oracle = CountingOracle::new(LineOracle::new(20));
    let blocks = parse_markdown(NOTE);
    let pages = Paginator::new(config_lines(4), &oracle).paginate(&blocks).unwrap();
    assert_eq!(pages.stats.measure_count as usize, oracle.calls());
}

#[test]
fn test_batch_keeps_order() {
    let documents = vec![
        vec![Block::paragraph("one")],
        parse_markdown(NOTE),
        vec![Block::paragraph("a"), Block::Rule, Block::paragraph("b")],
    ];
    let config = config_lines(4);
    let options = PaginateOptions::default();
    let oracle = LineOracle::new(20);

    let results = paginate_batch(&documents, &config, &options, &oracle);
    assert_eq!(results.len(), 3);
    for (blocks, result) in documents.iter().zip(results) {
        let expected = paginate(blocks, &config, &options, &oracle).unwrap();
        assert_eq!(result.unwrap(), expected);
    }
}
