//! Patch interface (§6): turning a [`Report`] into a sequence of ops that can
//! be replayed against a document.

use treediff_model::{
    copy_subtree_into, grab, EngineError, InputFile, NodeData, NodeId, NodeKind, NodeSource,
    OwnedNode, Path, PathStyle, Report,
};

use crate::hash::node_hash;
use crate::options::CompareOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOpKind {
    Add,
    Remove,
    Replace,
    Reorder,
}

/// One operation derived from a single [`treediff_model::Detail`].
#[derive(Debug, Clone)]
pub struct PatchOp {
    pub op: PatchOpKind,
    pub path: Path,
    pub from: Option<OwnedNode>,
    pub to: Option<OwnedNode>,
}

/// Derive one [`PatchOp`] per detail across every diff in `report`.
pub fn generate_patch(report: &Report) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    for diff in &report.diffs {
        for detail in &diff.details {
            let kind = match detail.kind {
                treediff_model::DetailKind::Addition => PatchOpKind::Add,
                treediff_model::DetailKind::Removal => PatchOpKind::Remove,
                treediff_model::DetailKind::Modification => PatchOpKind::Replace,
                treediff_model::DetailKind::OrderChange => PatchOpKind::Reorder,
            };
            ops.push(PatchOp {
                op: kind,
                path: diff.path.clone(),
                from: detail.from.clone(),
                to: detail.to.clone(),
            });
        }
    }
    ops
}

fn mismatch(path: &Path, reason: impl Into<String>) -> EngineError {
    EngineError::PatchApplyMismatch {
        path: path.to_string(PathStyle::Dot),
        reason: reason.into(),
    }
}

/// Apply every op in `ops` to `file`, in order.
pub fn apply_patch(file: &mut InputFile, ops: &[PatchOp]) -> Result<(), EngineError> {
    let opts = CompareOptions::default();
    for op in ops {
        apply_one(file, op, &opts)?;
    }
    Ok(())
}

fn apply_one(file: &mut InputFile, op: &PatchOp, opts: &CompareOptions) -> Result<(), EngineError> {
    let target = grab(file, &op.path)?;
    match op.op {
        PatchOpKind::Add => {
            let to = op
                .to
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "add op missing payload"))?;
            apply_add(file, target, to, &op.path)
        }
        PatchOpKind::Remove => {
            let from = op
                .from
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "remove op missing payload"))?;
            apply_remove(file, target, from, &op.path, opts)
        }
        PatchOpKind::Replace => {
            let from = op
                .from
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "replace op missing from"))?;
            let to = op
                .to
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "replace op missing to"))?;
            apply_replace(file, target, from, to, &op.path)
        }
        PatchOpKind::Reorder => {
            let from = op
                .from
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "reorder op missing from"))?;
            let to = op
                .to
                .as_ref()
                .ok_or_else(|| mismatch(&op.path, "reorder op missing to"))?;
            apply_reorder(file, target, from, to, &op.path, opts)
        }
    }
}

fn apply_add(file: &mut InputFile, target: NodeId, to: &OwnedNode, path: &Path) -> Result<(), EngineError> {
    let to_entries = match &to.root().kind {
        NodeKind::Mapping(entries) => Some(entries.clone()),
        _ => None,
    };
    let to_items = match &to.root().kind {
        NodeKind::Sequence(items) => Some(items.clone()),
        _ => None,
    };
    let target_is_mapping = matches!(file.node(target).kind, NodeKind::Mapping(_));
    let target_is_sequence = matches!(file.node(target).kind, NodeKind::Sequence(_));

    if let (Some(to_entries), true) = (to_entries, target_is_mapping) {
        let mut imported = Vec::with_capacity(to_entries.len());
        for (k, v) in &to_entries {
            let new_k = copy_subtree_into(to, *k, &mut file.arena);
            let new_v = copy_subtree_into(to, *v, &mut file.arena);
            imported.push((new_k, new_v));
        }
        let NodeKind::Mapping(entries) = &mut file.arena[target.0].kind else {
            unreachable!("target checked above")
        };
        entries.extend(imported);
        return Ok(());
    }
    if let (Some(to_items), true) = (to_items, target_is_sequence) {
        let imported: Vec<NodeId> = to_items
            .iter()
            .map(|id| copy_subtree_into(to, *id, &mut file.arena))
            .collect();
        let NodeKind::Sequence(items) = &mut file.arena[target.0].kind else {
            unreachable!("target checked above")
        };
        items.extend(imported);
        return Ok(());
    }
    Err(mismatch(path, "add payload shape does not match target"))
}

fn apply_remove(
    file: &mut InputFile,
    target: NodeId,
    from: &OwnedNode,
    path: &Path,
    opts: &CompareOptions,
) -> Result<(), EngineError> {
    let from_entries = match &from.root().kind {
        NodeKind::Mapping(entries) => Some(entries.clone()),
        _ => None,
    };
    let from_items = match &from.root().kind {
        NodeKind::Sequence(items) => Some(items.clone()),
        _ => None,
    };
    let target_entries = match &file.node(target).kind {
        NodeKind::Mapping(entries) => Some(entries.clone()),
        _ => None,
    };
    let target_items = match &file.node(target).kind {
        NodeKind::Sequence(items) => Some(items.clone()),
        _ => None,
    };

    if let (Some(from_entries), Some(target_entries)) = (from_entries, target_entries) {
        let needle: Vec<u64> = from_entries
            .iter()
            .map(|(k, v)| pair_hash(from, *k, *v, opts))
            .collect();
        let haystack: Vec<u64> = target_entries
            .iter()
            .map(|(k, v)| pair_hash(file, *k, *v, opts))
            .collect();
        let start = find_subslice(&haystack, &needle)
            .ok_or_else(|| mismatch(path, "removed entries not found as a contiguous run"))?;
        let NodeKind::Mapping(entries) = &mut file.arena[target.0].kind else {
            unreachable!("target checked above")
        };
        entries.drain(start..start + needle.len());
        return Ok(());
    }
    if let (Some(from_items), Some(target_items)) = (from_items, target_items) {
        let needle: Vec<u64> = from_items.iter().map(|id| node_hash(from, *id, opts)).collect();
        let haystack: Vec<u64> = target_items.iter().map(|id| node_hash(file, *id, opts)).collect();
        let start = find_subslice(&haystack, &needle)
            .ok_or_else(|| mismatch(path, "removed elements not found as a contiguous run"))?;
        let NodeKind::Sequence(items) = &mut file.arena[target.0].kind else {
            unreachable!("target checked above")
        };
        items.drain(start..start + needle.len());
        return Ok(());
    }
    Err(mismatch(path, "remove payload shape does not match target"))
}

fn apply_replace(
    file: &mut InputFile,
    target: NodeId,
    from: &OwnedNode,
    to: &OwnedNode,
    path: &Path,
) -> Result<(), EngineError> {
    let NodeKind::Scalar(current) = &file.node(target).kind else {
        return Err(mismatch(path, "replace target is not a scalar"));
    };
    let NodeKind::Scalar(expected) = &from.root().kind else {
        return Err(mismatch(path, "replace from-payload is not a scalar"));
    };
    if current != expected {
        return Err(mismatch(path, "current value does not match replace's expected from-value"));
    }
    let NodeKind::Scalar(new_value) = &to.root().kind else {
        return Err(mismatch(path, "replace to-payload is not a scalar"));
    };
    file.arena[target.0] = NodeData {
        tag: to.root().tag.clone(),
        kind: NodeKind::Scalar(new_value.clone()),
    };
    Ok(())
}

fn apply_reorder(
    file: &mut InputFile,
    target: NodeId,
    from: &OwnedNode,
    to: &OwnedNode,
    path: &Path,
    opts: &CompareOptions,
) -> Result<(), EngineError> {
    let NodeKind::Sequence(from_items) = &from.root().kind else {
        return Err(mismatch(path, "reorder from-payload is not a sequence"));
    };
    let NodeKind::Sequence(to_items) = &to.root().kind else {
        return Err(mismatch(path, "reorder to-payload is not a sequence"));
    };
    let from_items = from_items.clone();
    let to_items = to_items.clone();

    let needle: Vec<u64> = from_items.iter().map(|id| node_hash(from, *id, opts)).collect();
    let target_items: Vec<NodeId> = match &file.node(target).kind {
        NodeKind::Sequence(items) => items.clone(),
        _ => return Err(mismatch(path, "reorder target is not a sequence")),
    };
    let haystack: Vec<u64> = target_items.iter().map(|id| node_hash(file, *id, opts)).collect();
    let start = find_subslice(&haystack, &needle)
        .ok_or_else(|| mismatch(path, "reordered run not found in target sequence"))?;

    let imported: Vec<NodeId> = to_items
        .iter()
        .map(|id| copy_subtree_into(to, *id, &mut file.arena))
        .collect();

    let NodeKind::Sequence(items) = &mut file.arena[target.0].kind else {
        unreachable!("target checked above")
    };
    items.splice(start..start + needle.len(), imported);
    Ok(())
}

fn pair_hash<S: NodeSource>(source: &S, k: NodeId, v: NodeId, opts: &CompareOptions) -> u64 {
    node_hash(source, k, opts) ^ node_hash(source, v, opts).rotate_left(17)
}

fn find_subslice(haystack: &[u64], needle: &[u64]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
