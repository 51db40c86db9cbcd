// src/graph/types.rs
//! Raw snapshot records as produced by the snapshot store.

use serde::{Deserialize, Serialize};

/// Dense node identifier in `[0, N)`.
pub type NodeId = u32;

/// One incoming recommendation: `source` appeared at `position` on the
/// target's list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub position: u32,
    /// Views of the source on the snapshot date, if known.
    pub weight: Option<f64>,
}

impl EdgeRecord {
    #[must_use]
    pub fn new(source: NodeId, position: u32) -> Self {
        Self { source, position, weight: None }
    }

    #[must_use]
    pub fn weighted(source: NodeId, position: u32, weight: f64) -> Self {
        Self { source, position, weight: Some(weight) }
    }
}

/// All incoming records of a single target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecords {
    pub target: NodeId,
    pub incoming: Vec<EdgeRecord>,
}

/// The raw record set of one day over a fixed node universe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingRecords {
    universe_size: usize,
    targets: Vec<TargetRecords>,
}

impl IncomingRecords {
    #[must_use]
    pub fn new(universe_size: usize) -> Self {
        Self {
            universe_size,
            targets: Vec::new(),
        }
    }

    /// Appends the record list of `target`. Duplicate targets are kept as-is
    /// and checked for consistency when the graph is built.
    pub fn push(&mut self, target: NodeId, incoming: Vec<EdgeRecord>) {
        self.targets.push(TargetRecords { target, incoming });
    }

    /// Builder-style variant of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, target: NodeId, incoming: Vec<EdgeRecord>) -> Self {
        self.push(target, incoming);
        self
    }

    /// Convenience constructor from `(source, target, position)` triples.
    #[must_use]
    pub fn from_edges(universe_size: usize, edges: &[(NodeId, NodeId, u32)]) -> Self {
        let mut by_target: std::collections::BTreeMap<NodeId, Vec<EdgeRecord>> =
            std::collections::BTreeMap::new();
        for &(source, target, position) in edges {
            by_target
                .entry(target)
                .or_default()
                .push(EdgeRecord::new(source, position));
        }
        let mut records = Self::new(universe_size);
        for (target, incoming) in by_target {
            records.push(target, incoming);
        }
        records
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.universe_size
    }

    #[must_use]
    pub fn targets(&self) -> &[TargetRecords] {
        &self.targets
    }

    /// Total number of raw records, duplicates included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.targets.iter().map(|t| t.incoming.len()).sum()
    }
}
