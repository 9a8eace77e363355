//! Unit tests exercising the walker and each differ directly against
//! hand-built node trees. Covers the end-to-end scenarios and invariants
//! enumerated alongside the comparison engine's design.

use treediff_model::{DetailKind, InputFile, NodeId, NodeKind, Tag};

use crate::{compare_input_files, CompareOptions};

fn str_pair(file: &mut InputFile, k: &str, v: &str) -> (NodeId, NodeId) {
    let key = file.scalar(Tag::str(), k);
    let val = file.scalar(Tag::str(), v);
    (key, val)
}

fn named_entry(file: &mut InputFile, name: &str, extra: &[(&str, &str)]) -> NodeId {
    let mut pairs = vec![str_pair(file, "name", name)];
    for (k, v) in extra {
        pairs.push(str_pair(file, k, v));
    }
    file.mapping(Tag::map(), pairs)
}

fn single_keyed_mapping(file: &mut InputFile, outer_key: &str, value: NodeId) -> NodeId {
    let key = file.scalar(Tag::str(), outer_key);
    file.mapping(Tag::map(), vec![(key, value)])
}

#[test]
fn e1_nested_scalar_modification() {
    let mut from = InputFile::new(None);
    let c_val = from.scalar(Tag::new("!!int"), "1");
    let b = single_keyed_mapping(&mut from, "c", c_val);
    let a = single_keyed_mapping(&mut from, "b", b);
    let root = single_keyed_mapping(&mut from, "a", a);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let c_val2 = to.scalar(Tag::new("!!int"), "2");
    let b2 = single_keyed_mapping(&mut to, "c", c_val2);
    let a2 = single_keyed_mapping(&mut to, "b", b2);
    let root2 = single_keyed_mapping(&mut to, "a", a2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(
        report.diffs[0].path.to_string(treediff_model::PathStyle::Dot),
        "a.b.c"
    );
    assert_eq!(report.diffs[0].details.len(), 1);
    assert_eq!(report.diffs[0].details[0].kind, DetailKind::Modification);
}

#[test]
fn e2_sequence_addition() {
    let mut from = InputFile::new(None);
    let one = from.scalar(Tag::str(), "one");
    let two = from.scalar(Tag::str(), "two");
    let x = from.sequence(Tag::seq(), vec![one, two]);
    let root = single_keyed_mapping(&mut from, "x", x);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let one2 = to.scalar(Tag::str(), "one");
    let two2 = to.scalar(Tag::str(), "two");
    let three2 = to.scalar(Tag::str(), "three");
    let x2 = to.sequence(Tag::seq(), vec![one2, two2, three2]);
    let root2 = single_keyed_mapping(&mut to, "x", x2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details.len(), 1);
    let detail = &report.diffs[0].details[0];
    assert_eq!(detail.kind, DetailKind::Addition);
    let added = detail.to.as_ref().unwrap();
    match &added.root().kind {
        NodeKind::Sequence(items) => assert_eq!(items.len(), 1),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn e3_named_entry_order_change() {
    let mut from = InputFile::new(None);
    let mut entries = Vec::new();
    for n in ["A", "C", "B", "D"] {
        entries.push(named_entry(&mut from, n, &[]));
    }
    let list = from.sequence(Tag::seq(), entries);
    let root = single_keyed_mapping(&mut from, "list", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let mut entries2 = Vec::new();
    for n in ["A", "B", "C", "D"] {
        entries2.push(named_entry(&mut to, n, &[]));
    }
    let list2 = to.sequence(Tag::seq(), entries2);
    let root2 = single_keyed_mapping(&mut to, "list", list2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details.len(), 1);
    assert_eq!(report.diffs[0].details[0].kind, DetailKind::OrderChange);
}

#[test]
fn e4_order_change_plus_add_and_remove() {
    let mut from = InputFile::new(None);
    let mut entries = Vec::new();
    for n in ["A", "C", "B", "D", "E"] {
        entries.push(named_entry(&mut from, n, &[]));
    }
    let list = from.sequence(Tag::seq(), entries);
    let root = single_keyed_mapping(&mut from, "list", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let mut entries2 = Vec::new();
    for n in ["A", "X1", "B", "C", "D", "X2"] {
        entries2.push(named_entry(&mut to, n, &[]));
    }
    let list2 = to.sequence(Tag::seq(), entries2);
    let root2 = single_keyed_mapping(&mut to, "list", list2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    let kinds: Vec<DetailKind> = report.diffs[0].details.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DetailKind::OrderChange, DetailKind::Removal, DetailKind::Addition]
    );
}

#[test]
fn e5_identical_input_has_no_diffs() {
    let mut from = InputFile::new(None);
    let root = named_entry(&mut from, "web", &[("port", "80")]);
    from.push_document(root);
    let mut to = InputFile::new(None);
    let root2 = named_entry(&mut to, "web", &[("port", "80")]);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn e5_document_count_mismatch_is_an_error() {
    let mut from = InputFile::new(None);
    let r = from.scalar(Tag::str(), "x");
    from.push_document(r);
    let r2 = from.scalar(Tag::str(), "x");
    from.push_document(r2);

    let mut to = InputFile::new(None);
    let r3 = to.scalar(Tag::str(), "x");
    to.push_document(r3);

    let err = compare_input_files(&from, &to, &CompareOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        treediff_model::EngineError::DocumentCountMismatch { from: 2, to: 1 }
    ));
}

#[test]
fn e6_string_case_change_is_a_modification() {
    let mut from = InputFile::new(None);
    let val = from.scalar(Tag::str(), "foobar");
    let root = single_keyed_mapping(&mut from, "x", val);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let val2 = to.scalar(Tag::str(), "fOObAr");
    let root2 = single_keyed_mapping(&mut to, "x", val2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details[0].kind, DetailKind::Modification);
}

#[test]
fn e6_tag_change_is_a_single_modification_not_add_and_remove() {
    let mut from = InputFile::new(None);
    let val = from.scalar(Tag::new("!!int"), "12");
    let root = single_keyed_mapping(&mut from, "x", val);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let val2 = to.scalar(Tag::str(), "12");
    let root2 = single_keyed_mapping(&mut to, "x", val2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details.len(), 1);
    let detail = &report.diffs[0].details[0];
    assert_eq!(detail.kind, DetailKind::Modification);
    assert_ne!(
        detail.from.as_ref().unwrap().root().tag,
        detail.to.as_ref().unwrap().root().tag
    );
}

#[test]
fn invariant_key_order_insensitivity() {
    let mut from = InputFile::new(None);
    let pair_a = str_pair(&mut from, "a", "1");
    let pair_b = str_pair(&mut from, "b", "2");
    let root = from.mapping(Tag::map(), vec![pair_a, pair_b]);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let pair_b2 = str_pair(&mut to, "b", "2");
    let pair_a2 = str_pair(&mut to, "a", "1");
    let root2 = to.mapping(Tag::map(), vec![pair_b2, pair_a2]);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn invariant_null_representations_are_equivalent() {
    let mut from = InputFile::new(None);
    let val = from.scalar(Tag::null(), "~");
    let root = single_keyed_mapping(&mut from, "x", val);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let val2 = to.scalar(Tag::null(), "");
    let root2 = single_keyed_mapping(&mut to, "x", val2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn invariant_alias_transparency() {
    let mut from = InputFile::new(None);
    let port_pair = str_pair(&mut from, "port", "80");
    let anchor = from.mapping(Tag::map(), vec![port_pair]);
    let alias = from.alias(anchor);
    let base_key = from.scalar(Tag::str(), "base");
    let derived_key = from.scalar(Tag::str(), "derived");
    let root = from.mapping(Tag::map(), vec![(base_key, anchor), (derived_key, alias)]);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let port_pair2 = str_pair(&mut to, "port", "80");
    let anchor2 = to.mapping(Tag::map(), vec![port_pair2]);
    let port_pair3 = str_pair(&mut to, "port", "80");
    let inline2 = to.mapping(Tag::map(), vec![port_pair3]);
    let base_key2 = to.scalar(Tag::str(), "base");
    let derived_key2 = to.scalar(Tag::str(), "derived");
    let root2 = to.mapping(
        Tag::map(),
        vec![(base_key2, anchor2), (derived_key2, inline2)],
    );
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert!(report.is_empty());
}

#[test]
fn invariant_identifier_priority_prefers_name_over_key() {
    let mut from = InputFile::new(None);
    let name_a = str_pair(&mut from, "name", "a");
    let key_z = str_pair(&mut from, "key", "z");
    let e1 = from.mapping(Tag::map(), vec![name_a, key_z]);
    let name_b = str_pair(&mut from, "name", "b");
    let key_y = str_pair(&mut from, "key", "y");
    let e2 = from.mapping(Tag::map(), vec![name_b, key_y]);
    let from_entries = vec![e1, e2];
    let list = from.sequence(Tag::seq(), from_entries.clone());
    let root = single_keyed_mapping(&mut from, "list", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let name_b2 = str_pair(&mut to, "name", "b");
    let key_y2 = str_pair(&mut to, "key", "y");
    let e3 = to.mapping(Tag::map(), vec![name_b2, key_y2]);
    let name_a2 = str_pair(&mut to, "name", "a");
    let key_z2 = str_pair(&mut to, "key", "z");
    let e4 = to.mapping(Tag::map(), vec![name_a2, key_z2]);
    let to_entries = vec![e3, e4];
    let list2 = to.sequence(Tag::seq(), to_entries.clone());
    let root2 = single_keyed_mapping(&mut to, "list", list2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details[0].kind, DetailKind::OrderChange);

    // If `key` had won instead of `name`, the swapped order would still
    // match (the two fields agree on which entry is which), so assert the
    // chosen identifier directly rather than relying only on shape.
    assert_eq!(
        crate::identifier::infer_identifier(
            &from,
            &from_entries,
            &to,
            &to_entries,
            &CompareOptions::default()
        ),
        Some("name".to_string())
    );
}

#[test]
fn non_standard_identifier_guess_requires_length_above_threshold() {
    let mut from = InputFile::new(None);
    let mut entries = Vec::new();
    for i in 0..3 {
        let pair = str_pair(&mut from, "sku", &i.to_string());
        entries.push(from.mapping(Tag::map(), vec![pair]));
    }
    let mut to = InputFile::new(None);
    let mut entries2 = Vec::new();
    for i in 0..3 {
        let pair = str_pair(&mut to, "sku", &i.to_string());
        entries2.push(to.mapping(Tag::map(), vec![pair]));
    }
    assert_eq!(
        crate::identifier::infer_identifier(&from, &entries, &to, &entries2, &CompareOptions::default()),
        None
    );

    let mut from2 = InputFile::new(None);
    let mut entries3 = Vec::new();
    for i in 0..4 {
        let pair = str_pair(&mut from2, "sku", &i.to_string());
        entries3.push(from2.mapping(Tag::map(), vec![pair]));
    }
    let mut to2 = InputFile::new(None);
    let mut entries4 = Vec::new();
    for i in 0..4 {
        let pair = str_pair(&mut to2, "sku", &i.to_string());
        entries4.push(to2.mapping(Tag::map(), vec![pair]));
    }
    assert_eq!(
        crate::identifier::infer_identifier(&from2, &entries3, &to2, &entries4, &CompareOptions::default()),
        Some("sku".to_string())
    );
}

#[test]
fn kubernetes_metadata_name_identifier() {
    fn make(f: &mut InputFile, name: &str) -> NodeId {
        let pair = str_pair(f, "name", name);
        let meta = f.mapping(Tag::map(), vec![pair]);
        single_keyed_mapping(f, "metadata", meta)
    }

    let mut from = InputFile::new(None);
    let e1 = make(&mut from, "cm-a");
    let e2 = make(&mut from, "cm-b");
    let list = from.sequence(Tag::seq(), vec![e1, e2]);
    let root = single_keyed_mapping(&mut from, "items", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let e3 = make(&mut to, "cm-b");
    let e4 = make(&mut to, "cm-a");
    let list2 = to.sequence(Tag::seq(), vec![e3, e4]);
    let root2 = single_keyed_mapping(&mut to, "items", list2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    assert_eq!(report.diffs[0].details[0].kind, DetailKind::OrderChange);
}

#[test]
fn simple_list_duplicate_removal_keeps_n_copies() {
    let mut from = InputFile::new(None);
    let items: Vec<NodeId> = (0..3).map(|_| from.scalar(Tag::str(), "x")).collect();
    let list = from.sequence(Tag::seq(), items);
    let root = single_keyed_mapping(&mut from, "tags", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let items2: Vec<NodeId> = (0..1).map(|_| to.scalar(Tag::str(), "x")).collect();
    let list2 = to.sequence(Tag::seq(), items2);
    let root2 = single_keyed_mapping(&mut to, "tags", list2);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 1);
    let detail = &report.diffs[0].details[0];
    assert_eq!(detail.kind, DetailKind::Removal);
    match &detail.from.as_ref().unwrap().root().kind {
        NodeKind::Sequence(items) => assert_eq!(items.len(), 2),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn ignore_order_changes_suppresses_order_detail_only() {
    let mut from = InputFile::new(None);
    let mut entries = Vec::new();
    for n in ["A", "B", "C"] {
        entries.push(named_entry(&mut from, n, &[]));
    }
    let list = from.sequence(Tag::seq(), entries);
    let root = single_keyed_mapping(&mut from, "list", list);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let mut entries2 = Vec::new();
    for n in ["B", "A", "D"] {
        entries2.push(named_entry(&mut to, n, &[]));
    }
    let list2 = to.sequence(Tag::seq(), entries2);
    let root2 = single_keyed_mapping(&mut to, "list", list2);
    to.push_document(root2);

    let opts = CompareOptions {
        ignore_order_changes: true,
        ..CompareOptions::default()
    };
    let report = compare_input_files(&from, &to, &opts).unwrap();
    assert_eq!(report.diffs.len(), 1);
    let kinds: Vec<DetailKind> = report.diffs[0].details.iter().map(|d| d.kind).collect();
    assert!(!kinds.contains(&DetailKind::OrderChange));
    assert_eq!(kinds, vec![DetailKind::Removal, DetailKind::Addition]);
}

#[test]
fn filter_and_exclude_select_by_path() {
    let mut from = InputFile::new(None);
    let a = from.scalar(Tag::str(), "1");
    let b = from.scalar(Tag::str(), "2");
    let a_key = from.scalar(Tag::str(), "a");
    let b_key = from.scalar(Tag::str(), "b");
    let root = from.mapping(Tag::map(), vec![(a_key, a), (b_key, b)]);
    from.push_document(root);

    let mut to = InputFile::new(None);
    let a2 = to.scalar(Tag::str(), "9");
    let b2 = to.scalar(Tag::str(), "8");
    let a_key2 = to.scalar(Tag::str(), "a");
    let b_key2 = to.scalar(Tag::str(), "b");
    let root2 = to.mapping(Tag::map(), vec![(a_key2, a2), (b_key2, b2)]);
    to.push_document(root2);

    let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
    assert_eq!(report.diffs.len(), 2);

    let re = regex::Regex::new("^a$").unwrap();
    let filtered = crate::filter::filter(&report, &[re.clone()]);
    assert_eq!(filtered.diffs.len(), 1);
    assert_eq!(
        filtered.diffs[0].path.to_string(treediff_model::PathStyle::Dot),
        "a"
    );

    let excluded = crate::filter::exclude(&report, &[re]);
    assert_eq!(excluded.diffs.len(), 1);
    assert_eq!(
        excluded.diffs[0].path.to_string(treediff_model::PathStyle::Dot),
        "b"
    );
}
