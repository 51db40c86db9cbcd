// src/graph/adjacency.rs
//! The directed graph of one (day, cutoff) snapshot.

use super::types::NodeId;

/// Out-neighbor lists over a fixed node universe.
///
/// Built by [`GraphBuilder`](super::builder::GraphBuilder); edges are unique
/// per `(source, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    out: Vec<Vec<NodeId>>,
    active: Vec<bool>,
    edge_count: usize,
}

impl Adjacency {
    /// Creates an edgeless graph over `universe_size` nodes.
    #[must_use]
    pub fn empty(universe_size: usize) -> Self {
        Self {
            out: vec![Vec::new(); universe_size],
            active: vec![false; universe_size],
            edge_count: 0,
        }
    }

    /// Adds `source → target`. Callers guarantee both ids are in range and
    /// the pair is new.
    #[allow(clippy::indexing_slicing)]
    pub(crate) fn insert(&mut self, source: NodeId, target: NodeId) {
        self.out[source as usize].push(target);
        self.active[source as usize] = true;
        self.active[target as usize] = true;
        self.edge_count += 1;
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.out.len()
    }

    /// Deduplicated edge count.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Out-neighbors of `node` in insertion order. Empty for unknown ids.
    #[must_use]
    pub fn out_neighbors(&self, node: NodeId) -> &[NodeId] {
        self.out.get(node as usize).map_or(&[], Vec::as_slice)
    }

    /// True if `node` has at least one incident edge.
    #[must_use]
    pub fn is_active(&self, node: NodeId) -> bool {
        self.active.get(node as usize).copied().unwrap_or(false)
    }

    /// Nodes with at least one incident edge, ascending.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .filter_map(|(i, _)| NodeId::try_from(i).ok())
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Nodes with zero in- and out-degree.
    #[must_use]
    pub fn isolated_count(&self) -> usize {
        self.universe_size() - self.active_count()
    }

    #[must_use]
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.out_neighbors(source).contains(&target)
    }
}
