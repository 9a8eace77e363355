//! Mapping differ (§4.2): key-wise recursion plus add/remove partitioning.

use treediff_model::{Detail, Diff, EngineError, InputFile, NodeId, NodeKind, Path, Tag};

use crate::options::CompareOptions;
use crate::walker::compare;

/// Extract a mapping key's scalar string, tag-insensitively (quoting a key
/// does not change which field it names).
fn key_name(file: &InputFile, key_id: NodeId) -> Option<String> {
    let resolved = file.resolve(key_id).ok()?;
    match &file.node(resolved).kind {
        NodeKind::Scalar(value) => Some(value.clone()),
        _ => None,
    }
}

pub fn diff_mapping(
    path: &Path,
    from_file: &InputFile,
    from_id: NodeId,
    to_file: &InputFile,
    to_id: NodeId,
    opts: &CompareOptions,
) -> Result<Vec<Diff>, EngineError> {
    let NodeKind::Mapping(from_entries) = &from_file.node(from_id).kind else {
        return Err(EngineError::UnsupportedKind {
            path: path.to_string(treediff_model::PathStyle::Dot),
        });
    };
    let NodeKind::Mapping(to_entries) = &to_file.node(to_id).kind else {
        return Err(EngineError::UnsupportedKind {
            path: path.to_string(treediff_model::PathStyle::Dot),
        });
    };

    let mut removals: Vec<(NodeId, NodeId)> = Vec::new();
    let mut additions: Vec<(NodeId, NodeId)> = Vec::new();
    let mut child_diffs: Vec<Diff> = Vec::new();

    for (k, v_from) in from_entries {
        let Some(name) = key_name(from_file, *k) else {
            continue;
        };
        match to_entries
            .iter()
            .find(|(tk, _)| key_name(to_file, *tk).as_deref() == Some(name.as_str()))
        {
            Some((_, v_to)) => {
                let child_path = path.child_named(&name);
                child_diffs.extend(compare(&child_path, from_file, *v_from, to_file, *v_to, opts)?);
            }
            None => removals.push((*k, *v_from)),
        }
    }

    for (k, v_to) in to_entries {
        let Some(name) = key_name(to_file, *k) else {
            continue;
        };
        let present_in_from = from_entries
            .iter()
            .any(|(fk, _)| key_name(from_file, *fk).as_deref() == Some(name.as_str()));
        if !present_in_from {
            additions.push((*k, *v_to));
        }
    }

    let mut details = Vec::new();
    if !removals.is_empty() {
        details.push(Detail::removal(
            from_file.clone_mapping_subset(Tag::map(), &removals),
        ));
    }
    if !additions.is_empty() {
        details.push(Detail::addition(
            to_file.clone_mapping_subset(Tag::map(), &additions),
        ));
    }

    let mut result = Vec::new();
    if !details.is_empty() {
        result.push(Diff {
            path: path.clone(),
            details,
        });
    }
    result.extend(child_diffs);
    Ok(result)
}
