//! Named-entry differ (§4.5): identifier-keyed matching and order detection.

use treediff_model::{Detail, Diff, EngineError, InputFile, NodeId, Path, Tag};

use crate::identifier::resolve_name;
use crate::options::CompareOptions;
use crate::util::owned_string_sequence;
use crate::walker::compare;

pub fn diff_named_entries(
    path: &Path,
    from_file: &InputFile,
    from_items: &[NodeId],
    to_file: &InputFile,
    to_items: &[NodeId],
    identifier: &str,
    opts: &CompareOptions,
) -> Result<Vec<Diff>, EngineError> {
    let mut removed_ids = Vec::new();
    let mut common_from_names = Vec::new();
    let mut child_diffs = Vec::new();

    for entry in from_items {
        let Some(name) = resolve_name(from_file, *entry, identifier) else {
            removed_ids.push(*entry);
            continue;
        };
        let matched = to_items
            .iter()
            .find(|candidate| resolve_name(to_file, **candidate, identifier).as_deref() == Some(name.as_str()));
        match matched {
            Some(to_entry) => {
                common_from_names.push(name.clone());
                let child_path = path.child_keyed(identifier, &name);
                child_diffs.extend(compare(&child_path, from_file, *entry, to_file, *to_entry, opts)?);
            }
            None => removed_ids.push(*entry),
        }
    }

    let mut added_ids = Vec::new();
    let mut common_to_names = Vec::new();
    for entry in to_items {
        let Some(name) = resolve_name(to_file, *entry, identifier) else {
            added_ids.push(*entry);
            continue;
        };
        let present_in_from = from_items
            .iter()
            .any(|candidate| resolve_name(from_file, *candidate, identifier).as_deref() == Some(name.as_str()));
        if present_in_from {
            common_to_names.push(name);
        } else {
            added_ids.push(*entry);
        }
    }

    let mut details = Vec::new();
    if !opts.ignore_order_changes && common_from_names.len() == common_to_names.len() && common_from_names != common_to_names {
        details.push(Detail::order_change(
            owned_string_sequence(&common_from_names),
            owned_string_sequence(&common_to_names),
        ));
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
