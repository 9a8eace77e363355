//! Invariants 2 and 3 (§8): within a single `Diff`, each detail kind appears
//! at most once, and when several appear together they are ordered
//! `[OrderChange*, Removal?, Addition?]`. Also checks that a `Report`
//! round-trips through `serde_json`.

use treediff_engine::{compare_input_files, CompareOptions};
use treediff_model::{DetailKind, InputFile, NodeId, Tag};

fn named_entry(file: &mut InputFile, name: &str) -> NodeId {
    let k = file.scalar(Tag::str(), "name");
    let v = file.scalar(Tag::str(), name);
    file.mapping(Tag::map(), vec![(k, v)])
}

/// From `[A, C, B, D, E]` to `[A, X1, B, C, D, X2]`: one `Diff` with an
/// `OrderChange`, a `Removal`, and an `Addition`, in that order (mirrors E4).
fn build_order_add_remove_pair() -> (InputFile, InputFile) {
    let mut from = InputFile::new(None);
    let from_entries: Vec<NodeId> = ["A", "C", "B", "D", "E"]
        .iter()
        .map(|n| named_entry(&mut from, n))
        .collect();
    let from_root = from.sequence(Tag::seq(), from_entries);
    from.push_document(from_root);

    let mut to = InputFile::new(None);
    let to_entries: Vec<NodeId> = ["A", "X1", "B", "C", "D", "X2"]
        .iter()
        .map(|n| named_entry(&mut to, n))
        .collect();
    let to_root = to.sequence(Tag::seq(), to_entries);
    to.push_document(to_root);

    (from, to)
}

#[test]
fn detail_kinds_within_a_diff_each_appear_at_most_once() {
    let (from, to) = build_order_add_remove_pair();
    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();

    for diff in &report.diffs {
        let mut seen = Vec::new();
        for detail in &diff.details {
            assert!(
                !seen.contains(&detail.kind),
                "duplicate detail kind {:?} at path {}",
                detail.kind,
                diff.path.to_string(treediff_model::PathStyle::Dot)
            );
            seen.push(detail.kind);
        }
    }
}

#[test]
fn detail_ordering_is_order_change_then_removal_then_addition() {
    let (from, to) = build_order_add_remove_pair();
    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();

    let diff = report
        .diffs
        .iter()
        .find(|d| d.details.len() > 1)
        .expect("expected a diff with multiple details");

    let kinds: Vec<DetailKind> = diff.details.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DetailKind::OrderChange, DetailKind::Removal, DetailKind::Addition]
    );
}

#[test]
fn report_round_trips_through_serde_json() {
    let (from, to) = build_order_add_remove_pair();
    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();

    let json = serde_json::to_string(&report).expect("serialize report");
    let restored: treediff_model::Report = serde_json::from_str(&json).expect("deserialize report");

    assert_eq!(restored.from_name, report.from_name);
    assert_eq!(restored.to_name, report.to_name);
    assert_eq!(restored.diffs, report.diffs);
}
