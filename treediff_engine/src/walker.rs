//! Structural walker (§4.1): the top-level recursive dispatch.

use treediff_model::{Detail, Diff, EngineError, InputFile, NodeId, NodeKind, Path};

use crate::mapping::diff_mapping;
use crate::options::CompareOptions;
use crate::scalar::scalars_equal;
use crate::sequence::diff_sequence;

/// Compare the subtree rooted at `from_id` (in `from_file`) against the
/// subtree rooted at `to_id` (in `to_file`), anchoring any resulting
/// [`Diff`]s at `path`.
///
/// Absence of a side (a mapping key or sequence entry present on only one
/// side) is handled by the caller before recursing here; `compare` itself
/// only ever sees two present nodes.
pub fn compare(
    path: &Path,
    from_file: &InputFile,
    from_id: NodeId,
    to_file: &InputFile,
    to_id: NodeId,
    opts: &CompareOptions,
) -> Result<Vec<Diff>, EngineError> {
    let from_id = from_file.resolve(from_id)?;
    let to_id = to_file.resolve(to_id)?;
    let from_data = from_file.node(from_id);
    let to_data = to_file.node(to_id);

    let same_shape = from_data.tag == to_data.tag
        && std::mem::discriminant(&from_data.kind) == std::mem::discriminant(&to_data.kind);

    if !same_shape {
        return Ok(vec![Diff {
            path: path.clone(),
            details: vec![Detail::modification(
                from_file.clone_subtree(from_id),
                to_file.clone_subtree(to_id),
            )],
        }]);
    }

    match (&from_data.kind, &to_data.kind) {
        (NodeKind::Document(a), NodeKind::Document(b)) => {
            let (a, b) = (*a, *b);
            compare(path, from_file, a, to_file, b, opts)
        }
        (NodeKind::Mapping(_), NodeKind::Mapping(_)) => {
            diff_mapping(path, from_file, from_id, to_file, to_id, opts)
        }
        (NodeKind::Sequence(_), NodeKind::Sequence(_)) => {
            diff_sequence(path, from_file, from_id, to_file, to_id, opts)
        }
        (NodeKind::Scalar(a), NodeKind::Scalar(b)) => {
            if scalars_equal(&from_data.tag, a, b) {
                Ok(Vec::new())
            } else {
                Ok(vec![Diff {
                    path: path.clone(),
                    details: vec![Detail::modification(
                        from_file.clone_subtree(from_id),
                        to_file.clone_subtree(to_id),
                    )],
                }])
            }
        }
        (NodeKind::Alias(_), NodeKind::Alias(_)) => {
            unreachable!("resolve() dereferences aliases before returning")
        }
        _ => Err(EngineError::UnsupportedKind {
            path: path.to_string(treediff_model::PathStyle::Dot),
        }),
    }
}
