use criterion::{Criterion, criterion_group, criterion_main};
use degap_core::vocab::Vocabulary;
use degap_parser::{extract_paths, tokenize};
use std::hint::black_box;

const SAMPLE_PYTHON: &str = r#"
"""Grade calculator used in lesson 7."""

def grade(score):
    if score >= 90:
        return "A"
    elif score >= 80:
        return "B"
    else:
        return "C"


scores = [95, 82, 67, 74, 88]
for s in scores:
    if s < 0:
        continue
    for attempt in range(3):
        if attempt == s % 3:
            break
    print(grade(s))
"#;

fn bench_tokenize(c: &mut Criterion) {
    let source = SAMPLE_PYTHON.repeat(50);
    c.bench_function("tokenize_python", |b| {
        b.iter(|| tokenize(black_box(&source)).unwrap());
    });
}

fn bench_extract_paths(c: &mut Criterion) {
    let source = SAMPLE_PYTHON.repeat(50);
    let vocab = Vocabulary::default();
    c.bench_function("extract_paths_python", |b| {
        b.iter(|| extract_paths(black_box(&source), &vocab).unwrap());
    });
}

criterion_group!(benches, bench_tokenize, bench_extract_paths);
criterion_main!(benches);
