//! Engine-internal error taxonomy.

use thiserror::Error;

/// Errors surfaced by the comparison engine.
///
/// `HashFailure` has no reachable construction site in this implementation:
/// every [`crate::node::NodeKind`] variant is hashable by construction. It is
/// kept in the taxonomy for completeness rather than dropped silently.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document count mismatch: from has {from} document(s), to has {to}")]
    DocumentCountMismatch { from: usize, to: usize },

    #[error("unsupported node kind encountered at {path}")]
    UnsupportedKind { path: String },

    #[error("path lookup failed: {0}")]
    PathLookup(String),

    #[error("content hash failure at {path}")]
    HashFailure { path: String },

    #[error("similarity index exceeded capacity")]
    IndexFull,

    #[error("patch failed to apply at {path}: {reason}")]
    PatchApplyMismatch { path: String, reason: String },
}
