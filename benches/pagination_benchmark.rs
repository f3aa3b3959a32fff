//! Benchmarks for notepage pagination performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks paginate synthetic Markdown notes with the built-in
//! text-metrics oracle.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use notepage::{LayoutConfig, PaginateOptions, TextMetricsOracle};

/// Creates a synthetic note with the given number of sections.
fn create_test_note(sections: usize) -> String {
    let mut note = String::new();

    for i in 0..sections {
        note.push_str(&format!("## Section {}\n\n", i + 1));
        note.push_str(
            "A paragraph of ordinary prose that wraps across several lines of the page \
             and gives the oracle some work to do.\n\n",
        );

        // Ordered list long enough to split
        for n in 1..=12 {
            note.push_str(&format!("{}. list item number {} with a few words\n", n, n));
        }
        note.push('\n');

        // Code block long enough to split
        note.push_str("```rust\n");
        for n in 0..30 {
            note.push_str(&format!("let value_{} = compute({});\n", n, n));
        }
        note.push_str("```\n\n");

        if i + 1 < sections {
            note.push_str("---\n\n");
        }
    }

    note
}

/// Benchmark the Markdown front-end alone.
fn bench_markdown_parsing(c: &mut Criterion) {
    let note = create_test_note(10);

    c.bench_function("parse_markdown", |b| {
        b.iter(|| notepage::render::parse_markdown(black_box(&note)));
    });
}

/// Benchmark full pagination at various sizes.
fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagination");
    let config = LayoutConfig::default();
    let options = PaginateOptions::default();
    let oracle = TextMetricsOracle::new();

    for sections in [1, 5, 20].iter() {
        let blocks = notepage::render::parse_markdown(&create_test_note(*sections));

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| notepage::paginate(black_box(&blocks), &config, &options, &oracle).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel batch pagination.
fn bench_batch(c: &mut Criterion) {
    let documents: Vec<_> = (0..8)
        .map(|_| notepage::render::parse_markdown(&create_test_note(5)))
        .collect();
    let config = LayoutConfig::default();
    let options = PaginateOptions::default();
    let oracle = TextMetricsOracle::new();

    c.bench_function("paginate_batch_8", |b| {
        b.iter(|| notepage::paginate_batch(black_box(&documents), &config, &options, &oracle));
    });
}

criterion_group!(benches, bench_markdown_parsing, bench_pagination, bench_batch);
criterion_main!(benches);
