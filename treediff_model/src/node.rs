//! Arena-backed node tree shared by every document the engine compares.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Maximum alias-follow depth before a document is considered malformed.
///
/// A legitimate YAML anchor graph is never anywhere near this deep; hitting it
/// means we are either chasing a cycle or something pathological.
pub const MAX_ALIAS_DEPTH: usize = 64;

/// Stable arena identifier for a node within a single [`InputFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// YAML-style type tag, e.g. `!!str`, `!!int`, `!!null`, `!!map`, `!!seq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Tag(tag.into())
    }

    pub fn str() -> Self {
        Tag("!!str".to_string())
    }

    pub fn null() -> Self {
        Tag("!!null".to_string())
    }

    pub fn map() -> Self {
        Tag("!!map".to_string())
    }

    pub fn seq() -> Self {
        Tag("!!seq".to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0 == "!!null"
    }

    pub fn is_str(&self) -> bool {
        self.0 == "!!str"
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arena node payload. Mapping entries are stored as an ordered list of
/// `(key, value)` node id pairs; key order is preserved for rendering but is
/// not significant to engine equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Document(NodeId),
    Mapping(Vec<(NodeId, NodeId)>),
    Sequence(Vec<NodeId>),
    Scalar(String),
    Alias(NodeId),
}

/// A single node: its type tag plus its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub tag: Tag,
    pub kind: NodeKind,
}

/// One parsed input (a document stream), holding every node in a flat arena.
///
/// Nodes are addressed by [`NodeId`] rather than by pointer; this sidesteps
/// lifetime and `Rc`/`Weak` bookkeeping for alias back-references, since an
/// alias is just another `NodeId` into the same arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputFile {
    pub name: Option<String>,
    pub arena: Vec<NodeData>,
    pub documents: Vec<NodeId>,
}

impl InputFile {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            arena: Vec::new(),
            documents: Vec::new(),
        }
    }

    pub fn insert(&mut self, tag: Tag, kind: NodeKind) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(NodeData { tag, kind });
        id
    }

    pub fn scalar(&mut self, tag: Tag, value: impl Into<String>) -> NodeId {
        self.insert(tag, NodeKind::Scalar(value.into()))
    }

    pub fn mapping(&mut self, tag: Tag, entries: Vec<(NodeId, NodeId)>) -> NodeId {
        self.insert(tag, NodeKind::Mapping(entries))
    }

    pub fn sequence(&mut self, tag: Tag, items: Vec<NodeId>) -> NodeId {
        self.insert(tag, NodeKind::Sequence(items))
    }

    pub fn alias(&mut self, target: NodeId) -> NodeId {
        self.insert(Tag::new("!!alias"), NodeKind::Alias(target))
    }

    /// Wrap `root` as a document and register it.
    pub fn push_document(&mut self, root: NodeId) -> NodeId {
        let id = self.insert(Tag::new("!!doc"), NodeKind::Document(root));
        self.documents.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.arena[id.0]
    }

    /// Follow `Alias` nodes to their ultimate referent, bounded by
    /// [`MAX_ALIAS_DEPTH`].
    pub fn resolve(&self, mut id: NodeId) -> Result<NodeId, EngineError> {
        for _ in 0..MAX_ALIAS_DEPTH {
            match &self.node(id).kind {
                NodeKind::Alias(target) => id = *target,
                _ => return Ok(id),
            }
        }
        Err(EngineError::UnsupportedKind {
            path: format!("<alias depth exceeded at node {}>", id.0),
        })
    }

    /// Deep-copy the subtree rooted at `id` into a freshly allocated,
    /// self-contained arena. Used to materialize synthetic detail payloads
    /// (removed/added entries, order-change snapshots) that must outlive the
    /// [`InputFile`] they were drawn from.
    pub fn clone_subtree(&self, id: NodeId) -> OwnedNode {
        let mut arena = Vec::new();
        let root = copy_subtree_into(self, id, &mut arena);
        OwnedNode { arena, root }
    }

    /// Materialize a synthetic mapping node from a list of `(key, value)`
    /// pairs drawn from this arena, as a standalone [`OwnedNode`].
    pub fn clone_mapping_subset(&self, tag: Tag, entries: &[(NodeId, NodeId)]) -> OwnedNode {
        let mut arena = Vec::new();
        let copied: Vec<(NodeId, NodeId)> = entries
            .iter()
            .map(|(k, v)| (copy_subtree_into(self, *k, &mut arena), copy_subtree_into(self, *v, &mut arena)))
            .collect();
        let root = NodeId(arena.len());
        arena.push(NodeData {
            tag,
            kind: NodeKind::Mapping(copied),
        });
        OwnedNode { arena, root }
    }

    /// Materialize a synthetic sequence node from a list of element ids
    /// drawn from this arena, as a standalone [`OwnedNode`].
    pub fn clone_sequence_subset(&self, tag: Tag, items: &[NodeId]) -> OwnedNode {
        let mut arena = Vec::new();
        let copied: Vec<NodeId> = items.iter().map(|id| copy_subtree_into(self, *id, &mut arena)).collect();
        let root = NodeId(arena.len());
        arena.push(NodeData {
            tag,
            kind: NodeKind::Sequence(copied),
        });
        OwnedNode { arena, root }
    }
}

/// Deep-copy the subtree rooted at `id` in `src` into `dst`, returning the
/// new root's id in `dst`. `src` may be any [`NodeSource`] — an [`InputFile`]
/// or an [`OwnedNode`] — which is what lets patch application import a
/// synthetic detail payload into a live document's arena.
pub fn copy_subtree_into<S: NodeSource>(src: &S, id: NodeId, dst: &mut Vec<NodeData>) -> NodeId {
    let data = src.node(id);
    let kind = match &data.kind {
        NodeKind::Document(inner) => NodeKind::Document(copy_subtree_into(src, *inner, dst)),
        NodeKind::Mapping(entries) => NodeKind::Mapping(
            entries
                .iter()
                .map(|(k, v)| (copy_subtree_into(src, *k, dst), copy_subtree_into(src, *v, dst)))
                .collect(),
        ),
        NodeKind::Sequence(items) => {
            NodeKind::Sequence(items.iter().map(|item| copy_subtree_into(src, *item, dst)).collect())
        }
        NodeKind::Scalar(value) => NodeKind::Scalar(value.clone()),
        NodeKind::Alias(target) => NodeKind::Alias(copy_subtree_into(src, *target, dst)),
    };
    let new_id = NodeId(dst.len());
    dst.push(NodeData {
        tag: data.tag.clone(),
        kind,
    });
    new_id
}

/// A node subtree with its own private arena, independent of the
/// [`InputFile`] it was cloned from. Used for synthetic detail payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedNode {
    pub arena: Vec<NodeData>,
    pub root: NodeId,
}

impl OwnedNode {
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.arena[id.0]
    }

    pub fn root(&self) -> &NodeData {
        self.node(self.root)
    }
}

/// Common read access over an arena, implemented by both a full
/// [`InputFile`] and a standalone [`OwnedNode`] snapshot. Lets hashing and
/// equality code work uniformly over "the current document" and "a
/// synthetic detail payload" without caring which kind of arena backs it.
pub trait NodeSource {
    fn node(&self, id: NodeId) -> &NodeData;
    fn resolve(&self, id: NodeId) -> Result<NodeId, EngineError>;
}

impl NodeSource for InputFile {
    fn node(&self, id: NodeId) -> &NodeData {
        InputFile::node(self, id)
    }

    fn resolve(&self, id: NodeId) -> Result<NodeId, EngineError> {
        InputFile::resolve(self, id)
    }
}

impl NodeSource for OwnedNode {
    fn node(&self, id: NodeId) -> &NodeData {
        OwnedNode::node(self, id)
    }

    fn resolve(&self, mut id: NodeId) -> Result<NodeId, EngineError> {
        for _ in 0..MAX_ALIAS_DEPTH {
            match &NodeSource::node(self, id).kind {
                NodeKind::Alias(target) => id = *target,
                _ => return Ok(id),
            }
        }
        Err(EngineError::UnsupportedKind {
            path: format!("<alias depth exceeded at node {}>", id.0),
        })
    }
}
