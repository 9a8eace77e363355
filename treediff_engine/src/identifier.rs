//! Identifier inference for sequences of mappings (the heart of §4.4).

use std::collections::HashSet;

use treediff_model::{lookup_dotted, InputFile, NodeId, NodeKind};

use crate::options::CompareOptions;

/// Standard identifier candidates, in priority order. `manager` only applies
/// when Kubernetes entity detection is enabled.
const STANDARD_CANDIDATES: &[&str] = &["name", "key", "id"];
const KUBERNETES_MANAGER_CANDIDATE: &str = "manager";

/// Decide which field (possibly dotted, e.g. `metadata.name`) should be used
/// to match entries of `from_items` against `to_items`. Returns `None` when no
/// candidate qualifies, meaning the caller should fall back to a simple-list
/// diff.
pub fn infer_identifier(
    from: &InputFile,
    from_items: &[NodeId],
    to: &InputFile,
    to_items: &[NodeId],
    opts: &CompareOptions,
) -> Option<String> {
    if from_items.is_empty() || to_items.is_empty() {
        return None;
    }
    if !all_mappings(from, from_items) || !all_mappings(to, to_items) {
        return None;
    }

    let mut candidates: Vec<&str> = STANDARD_CANDIDATES.to_vec();
    if opts.kubernetes_entity_detection {
        candidates.push(KUBERNETES_MANAGER_CANDIDATE);
    }
    for field in candidates {
        if qualifies_standard(from, from_items, to, to_items, field) {
            return Some(field.to_string());
        }
    }

    if let Some(field) = guess_non_standard(from, from_items, to, to_items, opts) {
        return Some(field);
    }

    if opts.kubernetes_entity_detection && all_have_dotted(from, from_items, "metadata.name") && all_have_dotted(to, to_items, "metadata.name") {
        return Some("metadata.name".to_string());
    }

    None
}

fn all_mappings(file: &InputFile, items: &[NodeId]) -> bool {
    items.iter().all(|id| {
        let resolved = file.resolve(*id).ok();
        matches!(resolved.map(|r| &file.node(r).kind), Some(NodeKind::Mapping(_)))
    })
}

fn all_have_dotted(file: &InputFile, items: &[NodeId], dotted: &str) -> bool {
    items.iter().all(|id| lookup_dotted(file, *id, dotted).is_some())
}

fn qualifies_standard(
    from: &InputFile,
    from_items: &[NodeId],
    to: &InputFile,
    to_items: &[NodeId],
    field: &str,
) -> bool {
    unique_values(from, from_items, field, false)
        .is_some_and(|set| set.len() == from_items.len())
        && unique_values(to, to_items, field, false).is_some_and(|set| set.len() == to_items.len())
}

/// Scan every entry's own mapping field order across both sides, first-seen
/// wins ties, to build a deterministic candidate order for the non-standard
/// guess.
fn guess_non_standard(
    from: &InputFile,
    from_items: &[NodeId],
    to: &InputFile,
    to_items: &[NodeId],
    opts: &CompareOptions,
) -> Option<String> {
    if from_items.len() as u32 <= opts.non_standard_identifier_guess_count_threshold
        || to_items.len() as u32 <= opts.non_standard_identifier_guess_count_threshold
    {
        return None;
    }

    let mut ordered_fields = Vec::new();
    for (owner, side) in [(from, from_items), (to, to_items)] {
        for id in side {
            let Ok(resolved) = owner.resolve(*id) else {
                continue;
            };
            if let NodeKind::Mapping(entries) = &owner.node(resolved).kind {
                for (k, _) in entries {
                    if let NodeKind::Scalar(name) = &owner.node(*k).kind {
                        if !ordered_fields.contains(name) {
                            ordered_fields.push(name.clone());
                        }
                    }
                }
            }
        }
    }

    ordered_fields.into_iter().find(|field| {
        str_unique_values(from, from_items, field).is_some_and(|set| set.len() == from_items.len())
            && str_unique_values(to, to_items, field).is_some_and(|set| set.len() == to_items.len())
    })
}

/// Collect the scalar-string value of `field` for every entry, requiring
/// presence on all entries; `require_str_value` additionally requires the
/// value node itself to be tagged `!!str`.
fn unique_values(
    file: &InputFile,
    items: &[NodeId],
    field: &str,
    require_str_value: bool,
) -> Option<HashSet<String>> {
    let mut out = HashSet::new();
    for id in items {
        let resolved = file.resolve(*id).ok()?;
        let NodeKind::Mapping(entries) = &file.node(resolved).kind else {
            return None;
        };
        let value_id = entries.iter().find_map(|(k, v)| match &file.node(*k).kind {
            NodeKind::Scalar(name) if name == field => Some(*v),
            _ => None,
        })?;
        let value_resolved = file.resolve(value_id).ok()?;
        let value_data = file.node(value_resolved);
        if require_str_value && !value_data.tag.is_str() {
            return None;
        }
        match &value_data.kind {
            NodeKind::Scalar(v) => {
                out.insert(v.clone());
            }
            _ => return None,
        }
    }
    Some(out)
}

fn str_unique_values(file: &InputFile, items: &[NodeId], field: &str) -> Option<HashSet<String>> {
    unique_values(file, items, field, true)
}

/// Resolve the identifier's name for a single entry (possibly a dotted path).
pub fn resolve_name(file: &InputFile, entry: NodeId, identifier: &str) -> Option<String> {
    let id = lookup_dotted(file, entry, identifier)?;
    match &file.node(id).kind {
        NodeKind::Scalar(value) => Some(value.clone()),
        _ => None,
    }
}
