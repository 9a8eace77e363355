//! Sequence differ (§4.3): strategy selection plus the simple-list algorithm.

use std::collections::HashMap;

use treediff_model::{Detail, Diff, EngineError, InputFile, NodeId, NodeKind, Path, Tag};

use crate::hash::node_hash;
use crate::identifier::infer_identifier;
use crate::named_entry::diff_named_entries;
use crate::options::CompareOptions;
use crate::walker::compare;

fn items_of<'a>(file: &'a InputFile, id: NodeId) -> &'a [NodeId] {
    match &file.node(id).kind {
        NodeKind::Sequence(items) => items,
        _ => &[],
    }
}

pub fn diff_sequence(
    path: &Path,
    from_file: &InputFile,
    from_id: NodeId,
    to_file: &InputFile,
    to_id: NodeId,
    opts: &CompareOptions,
) -> Result<Vec<Diff>, EngineError> {
    let from_items = items_of(from_file, from_id);
    let to_items = items_of(to_file, to_id);

    if from_items.is_empty() && to_items.is_empty() {
        return Ok(Vec::new());
    }

    if from_items.len() == 1 && to_items.len() == 1 {
        let child_path = path.child_indexed(0);
        return compare(&child_path, from_file, from_items[0], to_file, to_items[0], opts);
    }

    if let Some(identifier) = infer_identifier(from_file, from_items, to_file, to_items, opts) {
        return diff_named_entries(path, from_file, from_items, to_file, to_items, &identifier, opts);
    }

    diff_simple_list(path, from_file, from_items, to_file, to_items, opts)
}

/// §4.3.1: content-hash based matching with duplicate accounting.
fn diff_simple_list(
    path: &Path,
    from_file: &InputFile,
    from_items: &[NodeId],
    to_file: &InputFile,
    to_items: &[NodeId],
    opts: &CompareOptions,
) -> Result<Vec<Diff>, EngineError> {
    let from_hashes: Vec<u64> = from_items.iter().map(|id| node_hash(from_file, *id, opts)).collect();
    let to_hashes: Vec<u64> = to_items.iter().map(|id| node_hash(to_file, *id, opts)).collect();

    let mut from_counts: HashMap<u64, usize> = HashMap::new();
    for h in &from_hashes {
        *from_counts.entry(*h).or_default() += 1;
    }
    let mut to_counts: HashMap<u64, usize> = HashMap::new();
    for h in &to_hashes {
        *to_counts.entry(*h).or_default() += 1;
    }

    let mut removal_quota: HashMap<u64, usize> = HashMap::new();
    for (h, count) in &from_counts {
        let other = to_counts.get(h).copied().unwrap_or(0);
        if *count > other {
            removal_quota.insert(*h, *count - other);
        }
    }
    let mut addition_quota: HashMap<u64, usize> = HashMap::new();
    for (h, count) in &to_counts {
        let other = from_counts.get(h).copied().unwrap_or(0);
        if *count > other {
            addition_quota.insert(*h, *count - other);
        }
    }

    let mut removed_ids = Vec::new();
    let mut common_from_ids = Vec::new();
    for (id, h) in from_items.iter().zip(from_hashes.iter()) {
        let quota = removal_quota.entry(*h).or_default();
        if *quota > 0 {
            *quota -= 1;
            removed_ids.push(*id);
        } else {
            common_from_ids.push(*id);
        }
    }

    let mut added_ids = Vec::new();
    let mut common_to_ids = Vec::new();
    for (id, h) in to_items.iter().zip(to_hashes.iter()) {
        let quota = addition_quota.entry(*h).or_default();
        if *quota > 0 {
            *quota -= 1;
            added_ids.push(*id);
        } else {
            common_to_ids.push(*id);
        }
    }

    let mut details = Vec::new();

    if !opts.ignore_order_changes && common_from_ids.len() == common_to_ids.len() {
        let common_from_hashes: Vec<u64> = common_from_ids
            .iter()
            .map(|id| node_hash(from_file, *id, opts))
            .collect();
        let common_to_hashes: Vec<u64> = common_to_ids
            .iter()
            .map(|id| node_hash(to_file, *id, opts))
            .collect();
        if common_from_hashes != common_to_hashes {
            details.push(Detail::order_change(
                from_file.clone_sequence_subset(Tag::seq(), &common_from_ids),
                to_file.clone_sequence_subset(Tag::seq(), &common_to_ids),
            ));
        }
    }

    if !removed_ids.is_empty() {
        details.push(Detail::removal(
            from_file.clone_sequence_subset(Tag::seq(), &removed_ids),
        ));
    }
    if !added_ids.is_empty() {
        details.push(Detail::addition(
            to_file.clone_sequence_subset(Tag::seq(), &added_ids),
        ));
    }

    if details.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Diff {
        path: path.clone(),
        details,
    }])
}
