//! Rename detector (§4.7): an optional post-pass pairing document-level
//! removals with document-level additions by content + name similarity.
//!
//! Adapted from JGit's `SimilarityRenameDetector` family. This module is
//! never called from [`crate::compare_input_files`]; callers opt in
//! explicitly by handing it the top-level additions/removals of a [`Report`].

use treediff_model::{EngineError, InputFile, NodeId, NodeKind};

use crate::options::CompareOptions;

const MAX_HASH_BITS: u32 = 30;
const MAX_MATRIX_SIZE: usize = 10_000;

fn pack(key: u32, count: u32) -> u64 {
    ((key as u64) << 32) | (count as u64)
}

fn unpack(cell: u64) -> (u32, u32) {
    ((cell >> 32) as u32, cell as u32)
}

/// Compact hashed fingerprint of a serialized candidate, bounded to grow up
/// to `hashBits = 30`.
struct SimilarityIndex {
    hash_bits: u32,
    table: Vec<u64>,
    num_records: usize,
}

impl SimilarityIndex {
    fn new() -> Self {
        let hash_bits = 8;
        SimilarityIndex {
            hash_bits,
            table: vec![0u64; 1usize << hash_bits],
            num_records: 0,
        }
    }

    fn slot(key: u32, hash_bits: u32) -> usize {
        let h = (key as u64).wrapping_mul(0x9e3779b97f4a7c15);
        (h >> (64 - hash_bits)) as usize
    }

    fn grow_threshold(&self) -> usize {
        let capacity = 1usize << self.hash_bits;
        capacity * (self.hash_bits as usize - 3) / self.hash_bits as usize
    }

    fn add(&mut self, key: u32) -> Result<(), EngineError> {
        let key = if key == 0 { 1 } else { key };
        if self.num_records >= self.grow_threshold() && self.hash_bits < MAX_HASH_BITS {
            self.grow()?;
        }
        let mut idx = Self::slot(key, self.hash_bits);
        loop {
            let cell = self.table[idx];
            if cell == 0 {
                self.table[idx] = pack(key, 1);
                self.num_records += 1;
                return Ok(());
            }
            let (k, c) = unpack(cell);
            if k == key {
                if c == u32::MAX {
                    return Err(EngineError::IndexFull);
                }
                self.table[idx] = pack(key, c + 1);
                return Ok(());
            }
            idx = (idx + 1) % self.table.len();
        }
    }

    fn grow(&mut self) -> Result<(), EngineError> {
        if self.hash_bits >= MAX_HASH_BITS {
            return Err(EngineError::IndexFull);
        }
        let new_bits = self.hash_bits + 1;
        let mut new_table = vec![0u64; 1usize << new_bits];
        for &cell in &self.table {
            if cell == 0 {
                continue;
            }
            let (k, c) = unpack(cell);
            let mut idx = Self::slot(k, new_bits);
            while new_table[idx] != 0 {
                idx = (idx + 1) % new_table.len();
            }
            new_table[idx] = pack(k, c);
        }
        self.hash_bits = new_bits;
        self.table = new_table;
        Ok(())
    }

    fn sorted_entries(&self) -> Vec<u64> {
        let mut entries: Vec<u64> = self.table.iter().copied().filter(|c| *c != 0).collect();
        entries.sort_unstable();
        entries
    }
}

/// Partition `bytes` into newline-or-64-byte-bounded regions and hash each
/// with a djb2-like rolling hash, ignoring a CR immediately before an LF.
fn hash_document(bytes: &[u8]) -> Result<SimilarityIndex, EngineError> {
    let mut index = SimilarityIndex::new();
    let mut i = 0;
    while i < bytes.len() {
        let mut h: u32 = 5381;
        let mut consumed = 0;
        while i < bytes.len() && consumed < 64 {
            let b = bytes[i];
            if b == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                i += 1;
                continue;
            }
            h = h.wrapping_mul(33).wrapping_add(b as u32);
            i += 1;
            consumed += 1;
            if b == b'\n' {
                break;
            }
        }
        index.add(h)?;
    }
    Ok(index)
}

fn similarity_score(a: &SimilarityIndex, b: &SimilarityIndex, max_score: u32) -> u32 {
    let sorted_a = a.sorted_entries();
    let sorted_b = b.sorted_entries();
    if sorted_a.is_empty() && sorted_b.is_empty() {
        return max_score;
    }

    let mut common: u64 = 0;
    let (mut i, mut j) = (0usize, 0usize);
    while i < sorted_a.len() && j < sorted_b.len() {
        let (ka, ca) = unpack(sorted_a[i]);
        let (kb, cb) = unpack(sorted_b[j]);
        match ka.cmp(&kb) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                common += ca.min(cb) as u64;
                i += 1;
                j += 1;
            }
        }
    }

    let hashed_a: u64 = sorted_a.iter().map(|c| unpack(*c).1 as u64).sum();
    let hashed_b: u64 = sorted_b.iter().map(|c| unpack(*c).1 as u64).sum();
    let denom = hashed_a.max(hashed_b).max(1);
    ((common as u128 * max_score as u128) / denom as u128) as u32
}

/// Directory-prefix + filename-suffix similarity in `[0, 100]`.
fn name_similarity(a: &str, b: &str) -> u32 {
    let a_parts: Vec<&str> = a.split('/').collect();
    let b_parts: Vec<&str> = b.split('/').collect();
    if a_parts.is_empty() || b_parts.is_empty() {
        return 0;
    }
    let prefix = a_parts
        .iter()
        .zip(b_parts.iter())
        .take_while(|(x, y)| x == y)
        .count();
    let suffix = a_parts
        .iter()
        .rev()
        .zip(b_parts.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let total = a_parts.len().max(b_parts.len());
    let matched = (prefix + suffix).min(total);
    ((matched as u64 * 100) / total.max(1) as u64) as u32
}

/// Serialize a document's node tree to a canonical byte form: one
/// `field: value` per line in original key order, nested mappings indented.
/// This is a minimal, engine-local rendering for similarity hashing, not the
/// out-of-scope general-purpose renderer.
pub fn serialize_document(file: &InputFile, id: NodeId) -> Vec<u8> {
    let mut out = String::new();
    serialize_node(file, id, 0, &mut out);
    out.into_bytes()
}

fn serialize_node(file: &InputFile, id: NodeId, indent: usize, out: &mut String) {
    let Ok(id) = file.resolve(id) else { return };
    match &file.node(id).kind {
        NodeKind::Document(inner) => serialize_node(file, *inner, indent, out),
        NodeKind::Scalar(value) => {
            out.push_str(value);
            out.push('\n');
        }
        NodeKind::Mapping(entries) => {
            for (k, v) in entries {
                let key_name = match &file.node(*k).kind {
                    NodeKind::Scalar(s) => s.clone(),
                    _ => String::new(),
                };
                let Ok(v_resolved) = file.resolve(*v) else { continue };
                match &file.node(v_resolved).kind {
                    NodeKind::Mapping(_) | NodeKind::Sequence(_) => {
                        out.push_str(&" ".repeat(indent));
                        out.push_str(&key_name);
                        out.push_str(":\n");
                        serialize_node(file, *v, indent + 2, out);
                    }
                    NodeKind::Scalar(value) => {
                        out.push_str(&" ".repeat(indent));
                        out.push_str(&key_name);
                        out.push_str(": ");
                        out.push_str(value);
                        out.push('\n');
                    }
                    _ => {}
                }
            }
        }
        NodeKind::Sequence(items) => {
            for item in items {
                out.push_str(&" ".repeat(indent));
                out.push_str("- ");
                let Ok(item_resolved) = file.resolve(*item) else { continue };
                match &file.node(item_resolved).kind {
                    NodeKind::Scalar(value) => {
                        out.push_str(value);
                        out.push('\n');
                    }
                    _ => {
                        out.push('\n');
                        serialize_node(file, *item, indent + 2, out);
                    }
                }
            }
        }
        NodeKind::Alias(_) => {}
    }
}

/// One side of a candidate rename pairing: a top-level document plus its
/// optional human-facing name (e.g. a Kubernetes `kind/namespace/name` key).
pub struct RenameCandidate<'a> {
    pub file: &'a InputFile,
    pub id: NodeId,
    pub name: Option<String>,
}

/// An accepted rename pairing between a removed and an added candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameMatch {
    pub deleted_index: usize,
    pub added_index: usize,
    pub score: u32,
}

/// Pair removed candidates with added candidates by combined content+name
/// similarity. Returns an empty list (never an error) when detection is
/// aborted by `rename_limit` or the internal matrix-size cap.
pub fn detect_renames(
    deleted: &[RenameCandidate],
    added: &[RenameCandidate],
    opts: &CompareOptions,
) -> Vec<RenameMatch> {
    let larger_side = deleted.len().max(added.len());
    if opts.rename_limit != 0 && larger_side > opts.rename_limit {
        return Vec::new();
    }
    if deleted.len().saturating_mul(added.len()) > MAX_MATRIX_SIZE {
        return Vec::new();
    }

    let deleted_bytes: Vec<Vec<u8>> = deleted
        .iter()
        .map(|c| serialize_document(c.file, c.id))
        .collect();
    let added_bytes: Vec<Vec<u8>> = added.iter().map(|c| serialize_document(c.file, c.id)).collect();

    let deleted_idx: Vec<Option<SimilarityIndex>> =
        deleted_bytes.iter().map(|b| hash_document(b).ok()).collect();
    let added_idx: Vec<Option<SimilarityIndex>> =
        added_bytes.iter().map(|b| hash_document(b).ok()).collect();

    let mut scored: Vec<(u32, usize, usize)> = Vec::new();
    for (i, di) in deleted_idx.iter().enumerate() {
        let Some(di) = di else { continue };
        let size_i = deleted_bytes[i].len().max(1);
        for (j, aj) in added_idx.iter().enumerate() {
            let Some(aj) = aj else { continue };
            let size_j = added_bytes[j].len().max(1);
            let ratio = (size_i.min(size_j) * 100 / size_i.max(size_j)) as u32;
            if ratio < opts.rename_score {
                continue;
            }
            let content_score = similarity_score(di, aj, 10_000);
            let name_score = match (&deleted[i].name, &added[j].name) {
                (Some(a), Some(b)) => name_similarity(a, b),
                _ => 0,
            };
            let combined = (content_score * 99 + name_score * 100) / 10_000;
            if combined < opts.rename_score {
                continue;
            }
            scored.push((combined, j, i));
        }
    }

    // Ascending by (score, added_idx, deleted_idx); consumed highest-first below.
    scored.sort();

    let mut used_deleted = vec![false; deleted.len()];
    let mut used_added = vec![false; added.len()];
    let mut matches = Vec::new();
    for &(score, j, i) in scored.iter().rev() {
        if used_deleted[i] || used_added[j] {
            continue;
        }
        used_deleted[i] = true;
        used_added[j] = true;
        matches.push(RenameMatch {
            deleted_index: i,
            added_index: j,
            score,
        });
    }
    matches.sort_by_key(|m| m.deleted_index);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use treediff_model::{InputFile, Tag};

    fn candidate_file(content: &[(&str, &str)]) -> InputFile {
        let mut file = InputFile::new(None);
        let entries: Vec<(NodeId, NodeId)> = content
            .iter()
            .map(|(k, v)| (file.scalar(Tag::str(), *k), file.scalar(Tag::str(), *v)))
            .collect();
        let root = file.mapping(Tag::map(), entries);
        file.push_document(root);
        file
    }

    #[test]
    fn identical_documents_score_max_and_are_paired() {
        let deleted_file = candidate_file(&[("kind", "ConfigMap"), ("name", "app-config")]);
        let added_file = candidate_file(&[("kind", "ConfigMap"), ("name", "app-config")]);
        let deleted_root = deleted_file.documents[0];
        let added_root = added_file.documents[0];

        let deleted = vec![RenameCandidate {
            file: &deleted_file,
            id: deleted_root,
            name: Some("configmaps/app-config".to_string()),
        }];
        let added = vec![RenameCandidate {
            file: &added_file,
            id: added_root,
            name: Some("configmaps/app-config".to_string()),
        }];

        let matches = detect_renames(&deleted, &added, &CompareOptions::default());
        assert_eq!(
            matches,
            vec![RenameMatch {
                deleted_index: 0,
                added_index: 0,
                score: 100,
            }]
        );
    }

    #[test]
    fn dissimilar_pair_falls_below_rename_score() {
        let deleted_file = candidate_file(&[
            ("kind", "ConfigMap"),
            ("name", "app-config"),
            ("data", "retain-this-value"),
        ]);
        let added_file = candidate_file(&[
            ("totally", "unrelated"),
            ("different", "payload-shape"),
            ("nothing", "in-common"),
        ]);
        let deleted_root = deleted_file.documents[0];
        let added_root = added_file.documents[0];

        let deleted = vec![RenameCandidate {
            file: &deleted_file,
            id: deleted_root,
            name: Some("configmaps/app-config".to_string()),
        }];
        let added = vec![RenameCandidate {
            file: &added_file,
            id: added_root,
            name: Some("secrets/other-thing".to_string()),
        }];

        let matches = detect_renames(&deleted, &added, &CompareOptions::default());
        assert!(matches.is_empty());
    }

    #[test]
    fn rename_limit_aborts_detection_when_exceeded() {
        let deleted_file = candidate_file(&[("kind", "ConfigMap"), ("name", "app-config")]);
        let added_file = candidate_file(&[("kind", "ConfigMap"), ("name", "app-config")]);
        let deleted_root = deleted_file.documents[0];
        let added_root = added_file.documents[0];

        let deleted = vec![
            RenameCandidate { file: &deleted_file, id: deleted_root, name: None },
            RenameCandidate { file: &deleted_file, id: deleted_root, name: None },
        ];
        let added = vec![
            RenameCandidate { file: &added_file, id: added_root, name: None },
            RenameCandidate { file: &added_file, id: added_root, name: None },
        ];

        let mut opts = CompareOptions::default();
        opts.rename_limit = 2;
        assert!(
            !detect_renames(&deleted, &added, &opts).is_empty(),
            "larger_side == rename_limit must not abort"
        );

        opts.rename_limit = 1;
        assert!(
            detect_renames(&deleted, &added, &opts).is_empty(),
            "larger_side > rename_limit must abort and return no matches"
        );
    }

    #[test]
    fn matrix_size_cap_aborts_detection_for_large_candidate_sets() {
        let file = candidate_file(&[("kind", "ConfigMap"), ("name", "app-config")]);
        let root = file.documents[0];

        // 101 * 100 = 10_100, just over MAX_MATRIX_SIZE.
        let deleted: Vec<RenameCandidate> = (0..101)
            .map(|_| RenameCandidate { file: &file, id: root, name: None })
            .collect();
        let added: Vec<RenameCandidate> = (0..100)
            .map(|_| RenameCandidate { file: &file, id: root, name: None })
            .collect();

        assert!(detect_renames(&deleted, &added, &CompareOptions::default()).is_empty());
    }
}
