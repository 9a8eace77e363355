//! Path anchoring: identifies a location inside a document's node tree.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::node::{InputFile, NodeId, NodeKind};

/// One step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PathElement {
    /// Mapping key traversal.
    Named { name: String },
    /// Named-list entry: the child of a sequence where field `key` equals `name`.
    Keyed { key: String, name: String },
    /// Positional sequence index.
    Indexed { idx: usize },
}

impl std::fmt::Display for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathElement::Named { name } => write!(f, "{name}"),
            PathElement::Keyed { key, name } => write!(f, "{key}={name}"),
            PathElement::Indexed { idx } => write!(f, "{idx}"),
        }
    }
}

/// Rendering style for [`Path::to_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `a.b.c`
    Dot,
    /// `/a/b/key=name/`
    KeyValue,
}

/// An ordered sequence of [`PathElement`]s anchored at a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub document_index: usize,
    pub elements: Vec<PathElement>,
}

impl Path {
    pub fn root(document_index: usize) -> Self {
        Path {
            document_index,
            elements: Vec::new(),
        }
    }

    pub fn child_named(&self, name: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::Named { name: name.into() });
        Path {
            document_index: self.document_index,
            elements,
        }
    }

    pub fn child_keyed(&self, key: impl Into<String>, name: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::Keyed {
            key: key.into(),
            name: name.into(),
        });
        Path {
            document_index: self.document_index,
            elements,
        }
    }

    pub fn child_indexed(&self, idx: usize) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::Indexed { idx });
        Path {
            document_index: self.document_index,
            elements,
        }
    }

    pub fn parent(&self) -> Path {
        let mut elements = self.elements.clone();
        elements.pop();
        Path {
            document_index: self.document_index,
            elements,
        }
    }

    pub fn to_string(&self, style: PathStyle) -> String {
        match style {
            PathStyle::Dot => {
                let parts: Vec<String> = self.elements.iter().map(PathElement::to_string).collect();
                parts.join(".")
            }
            PathStyle::KeyValue => {
                let mut out = String::from("/");
                for elem in &self.elements {
                    out.push_str(&elem.to_string());
                    out.push('/');
                }
                out
            }
        }
    }
}

/// Parse a dot-separated path string (`a.b.key=name.2`) into a [`Path`].
///
/// Tokens of the form `key=name` become [`PathElement::Keyed`]; tokens that
/// parse as a bare integer become [`PathElement::Indexed`]; everything else
/// becomes [`PathElement::Named`].
pub fn parse_path(input: &str, document_index: usize) -> Result<Path, EngineError> {
    if input.is_empty() {
        return Ok(Path::root(document_index));
    }
    let mut elements = Vec::new();
    for token in input.split('.') {
        if token.is_empty() {
            return Err(EngineError::PathLookup(format!(
                "empty path segment in '{input}'"
            )));
        }
        if let Some((key, name)) = token.split_once('=') {
            elements.push(PathElement::Keyed {
                key: key.to_string(),
                name: name.to_string(),
            });
        } else if let Ok(idx) = token.parse::<usize>() {
            elements.push(PathElement::Indexed { idx });
        } else {
            elements.push(PathElement::Named {
                name: token.to_string(),
            });
        }
    }
    Ok(Path {
        document_index,
        elements,
    })
}

/// Resolve `path` against `file`, following aliases transparently at each step.
pub fn grab(file: &InputFile, path: &Path) -> Result<NodeId, EngineError> {
    let doc_id = *file.documents.get(path.document_index).ok_or_else(|| {
        EngineError::PathLookup(format!(
            "document index {} out of range",
            path.document_index
        ))
    })?;
    let NodeKind::Document(root) = &file.node(doc_id).kind else {
        return Err(EngineError::UnsupportedKind {
            path: "<document root>".to_string(),
        });
    };
    let mut current = *root;

    for element in &path.elements {
        current = file.resolve(current)?;
        current = step(file, current, element)?;
    }
    Ok(current)
}

fn step(file: &InputFile, current: NodeId, element: &PathElement) -> Result<NodeId, EngineError> {
    let current = file.resolve(current)?;
    match (&file.node(current).kind, element) {
        (NodeKind::Mapping(entries), PathElement::Named { name }) => entries
            .iter()
            .find(|(k, _)| scalar_value(file, *k) == Some(name.as_str()))
            .map(|(_, v)| *v)
            .ok_or_else(|| EngineError::PathLookup(format!("no such key '{name}'"))),
        (NodeKind::Sequence(items), PathElement::Indexed { idx }) => items
            .get(*idx)
            .copied()
            .ok_or_else(|| EngineError::PathLookup(format!("index {idx} out of range"))),
        (NodeKind::Sequence(items), PathElement::Keyed { key, name }) => {
            for item in items {
                if let Some(field) = lookup_dotted(file, *item, key) {
                    if scalar_value(file, field) == Some(name.as_str()) {
                        return Ok(*item);
                    }
                }
            }
            Err(EngineError::PathLookup(format!(
                "no entry with {key}={name}"
            )))
        }
        _ => Err(EngineError::PathLookup(
            "path element does not match node shape".to_string(),
        )),
    }
}

fn scalar_value(file: &InputFile, id: NodeId) -> Option<&str> {
    match &file.node(id).kind {
        NodeKind::Scalar(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Resolve a dotted identifier such as `metadata.name` against `root` by
/// iterated mapping lookup, returning the final field's node id.
pub fn lookup_dotted(file: &InputFile, root: NodeId, dotted: &str) -> Option<NodeId> {
    let mut current = file.resolve(root).ok()?;
    for segment in dotted.split('.') {
        let NodeKind::Mapping(entries) = &file.node(current).kind else {
            return None;
        };
        let next = entries
            .iter()
            .find(|(k, _)| scalar_value(file, *k) == Some(segment))
            .map(|(_, v)| *v)?;
        current = file.resolve(next).ok()?;
    }
    Some(current)
}
