//! Parser benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use termseq_parser::{Parser, SeqType};

fn feed_str(parser: &mut Parser, input: &str) -> usize {
    let mut emitted = 0;
    for c in input.chars() {
        let (status, _) = parser.feed(c as u32);
        if status != SeqType::None {
            emitted += 1;
        }
    }
    emitted
}

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let plain_text = "Hello, World! ".repeat(1000);
    group.throughput(Throughput::Elements(plain_text.chars().count() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(feed_str(&mut parser, black_box(&plain_text)))
        })
    });

    group.finish();
}

fn bench_csi_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let csi_heavy = "\x1b[1;31mRed\x1b[0m \x1b[5;10H\x1b[2J".repeat(100);
    group.throughput(Throughput::Elements(csi_heavy.chars().count() as u64));

    group.bench_function("csi_sequences", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(feed_str(&mut parser, black_box(&csi_heavy)))
        })
    });

    group.finish();
}

fn bench_mixed_content(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let mixed = "Line 1: \x1b[32mOK\x1b[0m\r\nLine 2: \x1b[31mERROR\x1b[0m\r\n".repeat(500);
    group.throughput(Throughput::Elements(mixed.chars().count() as u64));

    group.bench_function("mixed_content", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(feed_str(&mut parser, black_box(&mixed)))
        })
    });

    group.finish();
}

fn bench_designations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let designations = "\x1b(B\x1b)0\x1b*A\x1b$B\x1b-A".repeat(500);
    group.throughput(Throughput::Elements(designations.chars().count() as u64));

    group.bench_function("designations", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(feed_str(&mut parser, black_box(&designations)))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_plain_text,
    bench_csi_sequences,
    bench_mixed_content,
    bench_designations
);

criterion_main!(benches);
