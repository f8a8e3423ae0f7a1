//! Property tests for the candidate decision.

use pipeline::filter;
use pr_records::{PatternSet, PullRequestRecord};
use proptest::prelude::*;

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["src", "planner", "control", "docs", "nav", "a.cpp", "b.py", "README.md"]),
        1..4,
    )
    .prop_map(|segments| segments.join("/"))
}

fn records() -> impl Strategy<Value = Vec<PullRequestRecord>> {
    prop::collection::vec(prop::collection::vec(path(), 0..4), 0..12).prop_map(|files| {
        files
            .into_iter()
            .enumerate()
            .map(|(idx, files)| PullRequestRecord::new(idx.to_string(), files))
            .collect()
    })
}

fn patterns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["planner", "*.cpp", "control/", "nav", "src/*.py", "**.md", "x"])
            .prop_map(str::to_string),
        0..4,
    )
}

fn ids(records: &[PullRequestRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn is_subsequence(sub: &[String], full: &[String]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|s| it.any(|f| f == s))
}

proptest! {
    #[test]
    fn output_is_ordered_subsequence(input in records(), pats in patterns()) {
        let output = filter(input.clone(), &PatternSet::from_patterns(pats)).unwrap();
        prop_assert!(output.len() <= input.len());
        prop_assert!(is_subsequence(&ids(&output), &ids(&input)));
    }

    #[test]
    fn filtering_is_deterministic(input in records(), pats in patterns()) {
        let set = PatternSet::from_patterns(pats);
        let first = filter(input.clone(), &set).unwrap();
        let second = filter(input, &set).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn adding_a_pattern_never_removes_a_candidate(
        input in records(),
        pats in patterns(),
        extra in patterns(),
    ) {
        let base = filter(input.clone(), &PatternSet::from_patterns(pats.clone())).unwrap();
        let grown = filter(input, &PatternSet::from_patterns(pats.into_iter().chain(extra))).unwrap();
        prop_assert!(is_subsequence(&ids(&base), &ids(&grown)));
    }

    #[test]
    fn empty_inputs_never_select(input in records(), pats in patterns()) {
        prop_assert!(filter(input.clone(), &PatternSet::default()).unwrap().is_empty());

        let output = filter(input, &PatternSet::from_patterns(pats)).unwrap();
        prop_assert!(output.iter().all(|r| !r.changed_files.is_empty()));
    }
}
