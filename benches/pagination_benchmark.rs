//! Pagination and chapter indexing benchmarks.
//!
//! Layout runs on every open, chapter change and resize, so it has to stay
//! well under a frame even for long chapters.
//!
//! Run with: cargo bench --bench pagination_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use txtreader::text::{paginate, ChapterIndexer, Viewport};

const PARAGRAPH: &str =
    "斗之力，三段！望着测验魔石碑上面闪亮得甚至有些刺眼的五个大字，少年面无表情，唇角有着一抹自嘲。";

/// A chapter body of `lines` CJK paragraphs.
fn chapter_body(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("{PARAGRAPH}{i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A whole book: `chapters` headings with `per_chapter` lines each.
fn book_lines(chapters: usize, per_chapter: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(chapters * (per_chapter + 1));
    for c in 0..chapters {
        lines.push(format!("第{}章 标题", c + 1));
        lines.extend((0..per_chapter).map(|i| format!("{PARAGRAPH}{i}")));
    }
    lines
}

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    for lines in [100usize, 1_000, 10_000] {
        let body = chapter_body(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &body, |b, body| {
            b.iter(|| paginate(black_box(body), Viewport::new(80, 40), Some(lines / 2)))
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let body = chapter_body(2_000);
    c.bench_function("paginate_narrow_terminal", |b| {
        b.iter(|| paginate(black_box(&body), Viewport::new(24, 10), None))
    });
}

fn bench_index(c: &mut Criterion) {
    let lines = book_lines(2_000, 50);
    let indexer = ChapterIndexer::default();
    c.bench_function("index_100k_lines", |b| {
        b.iter(|| indexer.index(black_box(&lines)))
    });
}

criterion_group!(benches, bench_paginate, bench_resize, bench_index);
criterion_main!(benches);
