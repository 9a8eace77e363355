//! Output contracts: [`Detail`], [`Diff`], and [`Report`].

use serde::{Deserialize, Serialize};

use crate::node::OwnedNode;
use crate::path::Path;

/// The kind of a single atomic change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    /// `+`
    Addition,
    /// `-`
    Removal,
    /// `±`
    Modification,
    /// `⇆`
    OrderChange,
}

impl DetailKind {
    pub fn symbol(self) -> char {
        match self {
            DetailKind::Addition => '+',
            DetailKind::Removal => '-',
            DetailKind::Modification => '±',
            DetailKind::OrderChange => '⇆',
        }
    }
}

/// A single atomic change at a [`Diff`]'s path.
///
/// A `Modification` always carries both `from` and `to`; an `Addition` carries
/// only `to`; a `Removal` carries only `from`; an `OrderChange` carries both,
/// as sequence nodes of the common elements in their respective orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub kind: DetailKind,
    pub from: Option<OwnedNode>,
    pub to: Option<OwnedNode>,
}

impl Detail {
    pub fn addition(to: OwnedNode) -> Self {
        Detail {
            kind: DetailKind::Addition,
            from: None,
            to: Some(to),
        }
    }

    pub fn removal(from: OwnedNode) -> Self {
        Detail {
            kind: DetailKind::Removal,
            from: Some(from),
            to: None,
        }
    }

    pub fn modification(from: OwnedNode, to: OwnedNode) -> Self {
        Detail {
            kind: DetailKind::Modification,
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn order_change(from: OwnedNode, to: OwnedNode) -> Self {
        Detail {
            kind: DetailKind::OrderChange,
            from: Some(from),
            to: Some(to),
        }
    }
}

/// A path plus the ordered, non-empty list of [`Detail`]s at that exact path.
///
/// Within one `Diff`, details are packed `[OrderChange*, Removal?, Addition?]`
/// when produced by the sequence differs; the mapping differ packs
/// `[Removal?, Addition?]` prepended to child-path diffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub path: Path,
    pub details: Vec<Detail>,
}

/// The full result of comparing two input streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub from_name: Option<String>,
    pub to_name: Option<String>,
    pub diffs: Vec<Diff>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}
