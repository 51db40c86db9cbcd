// src/graph/builder.rs
//! Graph construction: raw incoming records to a cutoff-filtered adjacency.

use std::collections::{BTreeMap, HashSet};

use super::adjacency::Adjacency;
use super::types::{EdgeRecord, IncomingRecords, NodeId, TargetRecords};
use crate::error::{RecnetError, Result};

/// Builds one snapshot graph from raw records.
///
/// Only records with `position < cutoff` become edges. Repeated
/// `(source, target)` pairs collapse into a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBuilder {
    cutoff: u32,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(cutoff: u32) -> Self {
        Self { cutoff }
    }

    /// Returns a builder for a different cutoff.
    #[must_use]
    pub fn with_cutoff(self, cutoff: u32) -> Self {
        Self { cutoff }
    }

    #[must_use]
    pub fn cutoff(&self) -> u32 {
        self.cutoff
    }

    /// Builds the adjacency for `records`.
    ///
    /// Targets are processed in ascending id order, so out-neighbor order
    /// does not depend on the order records were supplied in.
    ///
    /// # Errors
    /// Returns `DataIntegrity` if any record references a node outside
    /// `[0, N)`, or if a target appears twice with differing record lists.
    pub fn build(&self, records: &IncomingRecords) -> Result<Adjacency> {
        let universe = records.universe_size();
        let by_target = group_targets(records.targets())?;

        for (&target, incoming) in &by_target {
            check_node(target, universe, "target")?;
            for record in incoming.iter() {
                check_node(record.source, universe, "source")?;
            }
        }

        let mut adjacency = Adjacency::empty(universe);
        let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();

        for (&target, incoming) in &by_target {
            for record in incoming.iter().filter(|r| r.position < self.cutoff) {
                if seen.insert((record.source, target)) {
                    adjacency.insert(record.source, target);
                }
            }
        }

        tracing::debug!(
            cutoff = self.cutoff,
            nodes = adjacency.active_count(),
            edges = adjacency.edge_count(),
            "graph built"
        );
        Ok(adjacency)
    }
}

fn group_targets(targets: &[TargetRecords]) -> Result<BTreeMap<NodeId, &[EdgeRecord]>> {
    let mut by_target: BTreeMap<NodeId, &[EdgeRecord]> = BTreeMap::new();
    for entry in targets {
        match by_target.get(&entry.target) {
            Some(existing) if !same_records(existing, &entry.incoming) => {
                return Err(RecnetError::integrity(format!(
                    "target {} listed twice with conflicting incoming records",
                    entry.target
                )));
            }
            Some(_) => {}
            None => {
                by_target.insert(entry.target, &entry.incoming);
            }
        }
    }
    Ok(by_target)
}

/// Record-wise equality with weights compared by bit pattern, so a NaN
/// weight matches an identical NaN.
fn same_records(a: &[EdgeRecord], b: &[EdgeRecord]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.source == y.source
                && x.position == y.position
                && x.weight.map(f64::to_bits) == y.weight.map(f64::to_bits)
        })
}

fn check_node(node: NodeId, universe: usize, role: &str) -> Result<()> {
    if (node as usize) < universe {
        return Ok(());
    }
    Err(RecnetError::integrity(format!(
        "{role} node {node} is outside the universe [0, {universe})"
    )))
}
