//! Change-root interface (§6): re-anchoring a single-document input at a
//! resolved sub-path, optionally exploding a resulting sequence into one
//! document per element.
//!
//! Never called from [`crate::compare_input_files`]; this is a standalone
//! entry point for callers that want to diff a sub-tree of a larger document
//! (e.g. just the `items` of a Kubernetes list) as if it were the whole input.

use treediff_model::{grab, parse_path, EngineError, InputFile, NodeKind, Tag};

/// Re-root `input` at the node resolved by `path_string`, replacing its
/// document list in place. Requires `input` to carry exactly one document.
///
/// When the resolved node is a sequence and `translate_list_to_documents` is
/// set, each element becomes its own document; otherwise the resolved node
/// becomes the sole new document. `input`'s name is annotated with a note
/// recording the change for diagnostic display.
pub fn change_root(
    input: &mut InputFile,
    path_string: &str,
    translate_list_to_documents: bool,
) -> Result<(), EngineError> {
    if input.documents.len() != 1 {
        return Err(EngineError::UnsupportedKind {
            path: format!(
                "change_root requires a single-document input, found {}",
                input.documents.len()
            ),
        });
    }

    let path = parse_path(path_string, 0)?;
    let resolved = grab(input, &path)?;

    let new_documents = if translate_list_to_documents {
        match input.node(resolved).kind.clone() {
            NodeKind::Sequence(items) => items
                .iter()
                .map(|item| input.insert(Tag::new("!!doc"), NodeKind::Document(*item)))
                .collect(),
            _ => vec![input.insert(Tag::new("!!doc"), NodeKind::Document(resolved))],
        }
    } else {
        vec![input.insert(Tag::new("!!doc"), NodeKind::Document(resolved))]
    };

    input.documents = new_documents;
    input.name = Some(match input.name.take() {
        Some(existing) => format!("{existing} (root changed to '{path_string}')"),
        None => format!("root changed to '{path_string}'"),
    });
    Ok(())
}
