//! Tunable knobs for a single comparison run.

/// Options controlling identifier inference, order-change suppression, and
/// the optional rename pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Minimum sequence length (strictly greater than) required before a
    /// non-standard field is accepted as an identifier.
    pub non_standard_identifier_guess_count_threshold: u32,
    /// Suppress `OrderChange` details while still reporting add/remove/modify.
    pub ignore_order_changes: bool,
    /// Attempt `metadata.name` identifier detection for Kubernetes-shaped entries.
    pub kubernetes_entity_detection: bool,
    /// Minimum combined similarity score (0-100) for a rename pairing to be accepted.
    pub rename_score: u32,
    /// Abort rename detection if `max(|added|, |deleted|)` exceeds this limit (0 = unlimited).
    pub rename_limit: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            non_standard_identifier_guess_count_threshold: 3,
            ignore_order_changes: false,
            kubernetes_entity_detection: true,
            rename_score: 60,
            rename_limit: 400,
        }
    }
}
