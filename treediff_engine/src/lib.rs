//! Structural diff engine for parsed YAML/JSON document trees.
//!
//! Computes path-anchored, identifier-aware structural differences between
//! two [`treediff_model::InputFile`]s and exposes report filtering, rename
//! detection, and patch generation/application on top of the result.
//!
//! # Example
//!
//! ```rust
//! use treediff_engine::{compare_input_files, CompareOptions};
//! use treediff_model::{InputFile, Tag};
//!
//! let mut from = InputFile::new(Some("a.yaml".to_string()));
//! let key = from.scalar(Tag::str(), "name");
//! let val = from.scalar(Tag::str(), "web");
//! let root = from.mapping(Tag::map(), vec![(key, val)]);
//! from.push_document(root);
//!
//! let mut to = InputFile::new(Some("b.yaml".to_string()));
//! let key2 = to.scalar(Tag::str(), "name");
//! let val2 = to.scalar(Tag::str(), "worker");
//! let root2 = to.mapping(Tag::map(), vec![(key2, val2)]);
//! to.push_document(root2);
//!
//! let report = compare_input_files(&from, &to, &CompareOptions::default()).unwrap();
//! assert_eq!(report.diffs.len(), 1);
//! ```

pub mod change_root;
pub mod filter;
pub mod hash;
pub mod identifier;
pub mod mapping;
pub mod named_entry;
pub mod options;
pub mod patch;
pub mod rename;
pub mod scalar;
pub mod sequence;
pub mod util;
pub mod walker;

#[cfg(test)]
mod tests;

pub use change_root::change_root;
pub use options::CompareOptions;
pub use patch::{apply_patch, generate_patch, PatchOp, PatchOpKind};
pub use rename::{detect_renames, serialize_document, RenameCandidate, RenameMatch};

use treediff_model::{EngineError, InputFile, Path, Report};

/// Compare two document streams and return the full [`Report`].
///
/// `from` and `to` must carry the same number of documents; a mismatch is
/// reported immediately rather than comparing a truncated prefix.
pub fn compare_input_files(
    from: &InputFile,
    to: &InputFile,
    opts: &CompareOptions,
) -> Result<Report, EngineError> {
    if from.documents.len() != to.documents.len() {
        return Err(EngineError::DocumentCountMismatch {
            from: from.documents.len(),
            to: to.documents.len(),
        });
    }

    let mut diffs = Vec::new();
    for (idx, (from_doc, to_doc)) in from.documents.iter().zip(to.documents.iter()).enumerate() {
        let path = Path::root(idx);
        diffs.extend(walker::compare(&path, from, *from_doc, to, *to_doc, opts)?);
    }

    Ok(Report {
        from_name: from.name.clone(),
        to_name: to.name.clone(),
        diffs,
    })
}
