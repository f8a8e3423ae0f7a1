//! Benchmarks for candidate filtering
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic export sized like a large project (thousands of PRs,
//! dozens of patterns).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{CandidateFilter, MatchMode, PatternMatcher};
use pr_records::{PatternSet, PullRequestRecord};

fn synthetic_records(count: usize) -> Vec<PullRequestRecord> {
    let dirs = ["src/planner", "src/control", "docs", "test", "tools/ci", "perception"];
    (0..count)
        .map(|i| {
            let files = (0..8)
                .map(|j| format!("{}/module_{}/file_{}.cpp", dirs[(i + j) % dirs.len()], i % 17, j))
                .collect();
            PullRequestRecord::new(i.to_string(), files)
        })
        .collect()
}

fn synthetic_patterns() -> PatternSet {
    let mut patterns: Vec<String> = (0..40).map(|i| format!("module_{}/file_9", i)).collect();
    patterns.extend(["*.launch", "perception/**.cpp", "control/"].map(String::from));
    PatternSet::from_patterns(patterns)
}

fn bench_compile_patterns(c: &mut Criterion) {
    let patterns = synthetic_patterns();

    c.bench_function("compile_patterns", |b| {
        b.iter(|| PatternMatcher::compile(black_box(&patterns), MatchMode::Auto).unwrap())
    });
}

fn bench_candidate_filter(c: &mut Criterion) {
    let records = synthetic_records(5_000);
    let matcher = PatternMatcher::compile(&synthetic_patterns(), MatchMode::Auto).unwrap();
    let filter = CandidateFilter::new(matcher);

    c.bench_function("candidate_filter_5000_prs", |b| {
        b.iter(|| {
            let selected = filter.select(black_box(records.clone()));
            black_box(selected)
        })
    });
}

criterion_group!(benches, bench_compile_patterns, bench_candidate_filter);
criterion_main!(benches);
