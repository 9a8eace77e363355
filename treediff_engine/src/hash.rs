//! Deterministic content hashing used to match sequence elements across sides.
//!
//! Hashes are stable for the lifetime of a single comparison run but are not
//! meant to be stable across runs or implementations; they exist purely as an
//! engine-internal matching mechanism and are never surfaced in a [`treediff_model::Report`].

use treediff_model::{NodeId, NodeKind, NodeSource, Tag};
use xxhash_rust::xxh3::xxh3_64;

use crate::options::CompareOptions;

const MIX: u64 = 0x9e3779b97f4a7c15;

fn mix(a: u64, b: u64) -> u64 {
    (a ^ b.wrapping_add(MIX).wrapping_add(a << 6).wrapping_add(a >> 2)).wrapping_mul(MIX)
}

fn hash_tag(tag: &Tag) -> u64 {
    xxh3_64(tag.0.as_bytes())
}

/// Compute a stable content hash for `id`, honoring `ignore_order_changes` for
/// nested sequences. Generic over [`NodeSource`] so it works uniformly over a
/// real [`treediff_model::InputFile`] and a synthetic [`treediff_model::OwnedNode`].
pub fn node_hash<S: NodeSource>(source: &S, id: NodeId, opts: &CompareOptions) -> u64 {
    let data = source.node(id);
    let tag_hash = hash_tag(&data.tag);
    match &data.kind {
        NodeKind::Document(inner) => mix(tag_hash, node_hash(source, *inner, opts)),
        NodeKind::Scalar(value) => mix(tag_hash, xxh3_64(value.as_bytes())),
        NodeKind::Alias(target) => node_hash(source, *target, opts),
        NodeKind::Mapping(entries) => {
            // Fold with wrapping_add so key order never affects the result.
            let mut acc = tag_hash;
            for (k, v) in entries {
                let entry_hash = mix(node_hash(source, *k, opts), node_hash(source, *v, opts));
                acc = acc.wrapping_add(entry_hash);
            }
            acc
        }
        NodeKind::Sequence(items) => {
            let mut child_hashes: Vec<u64> =
                items.iter().map(|id| node_hash(source, *id, opts)).collect();
            if opts.ignore_order_changes {
                child_hashes.sort_unstable();
            }
            let mut acc = tag_hash;
            for (idx, h) in child_hashes.iter().enumerate() {
                acc = mix(acc, mix(*h, idx as u64));
            }
            acc
        }
    }
}
