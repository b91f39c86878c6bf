use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wbwt::{compress, decompress, deserialize, serialize};

/// Generate repetitive prose
fn generate_prose(size: usize) -> String {
    let pattern = "the quick brown fox jumps over the lazy dog ";
    let mut result = pattern.repeat(size / pattern.len() + 1);
    result.truncate(size);
    result
}

/// Generate markdown-like note text
fn generate_markdown(size: usize) -> String {
    let patterns = [
        "# Meeting notes\n\n",
        "- TODO review the draft\n",
        "- ping Sam about the release\n",
        "Some *emphasis* and a [link](http://example.com).\n\n",
        "    indented code block\n",
    ];
    let mut result = String::new();
    let mut i = 0;
    while result.len() < size {
        result.push_str(patterns[i % patterns.len()]);
        i += 1;
    }
    result.truncate(size);
    result
}

/// Generate low-repetition data (simulating base64-ish junk)
fn generate_low_repetition(size: usize) -> String {
    let chars: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 "
        .chars()
        .collect();
    let mut result = String::new();
    let mut seed = 12345_u64;
    for _ in 0..size {
        // Simple LCG random
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        result.push(chars[(seed >> 16) as usize % chars.len()]);
    }
    result
}

fn bench_compress(c: &mut Criterion) {
    let sizes = [1_000, 5_000, 20_000];
    let mut group = c.benchmark_group("compress");

    for size in sizes.iter() {
        for (name, data) in [
            ("prose", generate_prose(*size)),
            ("markdown", generate_markdown(*size)),
            ("low_rep", generate_low_repetition(*size)),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &data,
                |b, data| b.iter(|| serialize(&compress(black_box(data)))),
            );
        }
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");

    for size in [1_000, 20_000] {
        let frame = serialize(&compress(&generate_markdown(size)));
        group.bench_with_input(
            BenchmarkId::new("markdown", size),
            &frame,
            |b, frame| b.iter(|| decompress(&deserialize(black_box(frame)).unwrap()).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
