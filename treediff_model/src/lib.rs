//! Arena-backed node tree, path model, and diff report types for structural
//! comparison of parsed YAML/JSON document trees.
//!
//! This crate provides:
//! - a tree model (`InputFile`, `NodeData`, `NodeKind`, `Tag`)
//! - a path model (`Path`, `PathElement`, `parse_path`, `grab`)
//! - the diff output contracts (`Report`, `Diff`, `Detail`)
//! - the engine error taxonomy (`EngineError`)
//!
//! Building and comparing trees is the job of a diff engine built on top of
//! this crate; this crate only fixes the shared vocabulary.
//!
//! # Example
//!
//! ```rust
//! use treediff_model::{InputFile, Tag, PathStyle};
//!
//! let mut file = InputFile::new(Some("example.yaml".to_string()));
//! let name_key = file.scalar(Tag::str(), "name");
//! let name_val = file.scalar(Tag::str(), "web");
//! let root = file.mapping(Tag::map(), vec![(name_key, name_val)]);
//! file.push_document(root);
//!
//! let path = treediff_model::Path::root(0).child_named("name");
//! assert_eq!(path.to_string(PathStyle::Dot), "name");
//! ```

pub mod error;
pub mod node;
pub mod path;
pub mod report;

pub use error::EngineError;
pub use node::{
    copy_subtree_into, InputFile, NodeData, NodeId, NodeKind, NodeSource, OwnedNode, Tag,
    MAX_ALIAS_DEPTH,
};
pub use path::{grab, lookup_dotted, parse_path, Path, PathElement, PathStyle};
pub use report::{Detail, DetailKind, Diff, Report};
