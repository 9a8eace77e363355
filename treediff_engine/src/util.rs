//! Small helpers shared by the sequence and named-entry differs.

use treediff_model::{NodeData, NodeId, NodeKind, OwnedNode, Tag};

/// Build a standalone `!!seq` of `!!str` scalars from a list of names, used
/// to render order-change snapshots for named-entry lists (the names
/// themselves, not the matched mapping entries, are what moved).
pub fn owned_string_sequence(values: &[String]) -> OwnedNode {
    let mut arena = Vec::new();
    let mut items = Vec::new();
    for v in values {
        let id = NodeId(arena.len());
        arena.push(NodeData {
            tag: Tag::str(),
            kind: NodeKind::Scalar(v.clone()),
        });
        items.push(id);
    }
    let root = NodeId(arena.len());
    arena.push(NodeData {
        tag: Tag::seq(),
        kind: NodeKind::Sequence(items),
    });
    OwnedNode { arena, root }
}
