// src/graph/bowtie/classifier.rs
//! Region classification of SCCs around the largest SCC.
//!
//! Membership tests are single-hop: an SCC is IN when one of its nodes has a
//! direct edge into the reference set, OUT when a reference node has a direct
//! edge into it. Multi-hop reachability is deliberately not followed.

use std::cmp::Reverse;

use super::types::{Classification, Region, RegionCounts};
use crate::graph::adjacency::Adjacency;
use crate::graph::scc::Scc;
use crate::graph::types::NodeId;

/// A growing set of classified nodes together with the nodes they point to.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    members: Vec<bool>,
    successors: Vec<bool>,
}

impl ReferenceSet {
    #[must_use]
    pub fn new(universe_size: usize) -> Self {
        Self {
            members: vec![false; universe_size],
            successors: vec![false; universe_size],
        }
    }

    /// Adds `scc` and records the out-neighbors of its nodes.
    pub fn extend(&mut self, scc: &Scc, adjacency: &Adjacency) {
        for &node in scc.nodes() {
            set(&mut self.members, node);
            for &target in adjacency.out_neighbors(node) {
                set(&mut self.successors, target);
            }
        }
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        get(&self.members, node)
    }

    /// True if some member has a direct edge into `node`.
    #[must_use]
    pub fn points_to(&self, node: NodeId) -> bool {
        get(&self.successors, node)
    }
}

fn set(mask: &mut [bool], node: NodeId) {
    if let Some(slot) = mask.get_mut(node as usize) {
        *slot = true;
    }
}

fn get(mask: &[bool], node: NodeId) -> bool {
    mask.get(node as usize).copied().unwrap_or(false)
}

/// Is `scc` an IN component of `reference`? True iff some node of `scc`
/// has an edge into `reference`.
#[must_use]
pub fn is_in_component(scc: &Scc, adjacency: &Adjacency, reference: &ReferenceSet) -> bool {
    scc.nodes().iter().any(|&node| {
        adjacency
            .out_neighbors(node)
            .iter()
            .any(|&target| reference.contains(target))
    })
}

/// Is `scc` an OUT component of `reference`? True iff some node of
/// `reference` has an edge into `scc`.
#[must_use]
pub fn is_out_component(scc: &Scc, reference: &ReferenceSet) -> bool {
    scc.nodes().iter().any(|&node| reference.points_to(node))
}

/// Sorts SCCs by descending size; equal sizes are ordered by their
/// smallest node id, so the same graph always yields the same LSCC.
#[must_use]
pub fn order_components(mut sccs: Vec<Scc>) -> Vec<Scc> {
    sccs.sort_by_key(|scc| (Reverse(scc.len()), scc.min_node()));
    sccs
}

/// Classifies every node of the universe.
///
/// `sccs` may be in any order; they are ordered with [`order_components`]
/// before the first one is taken as the LSCC.
#[must_use]
pub fn classify(adjacency: &Adjacency, sccs: Vec<Scc>) -> Classification {
    let universe = adjacency.universe_size();
    let isolated = adjacency.isolated_count();
    let mut pass = Pass::new(universe);

    let mut ordered = order_components(sccs).into_iter();
    let Some(largest) = ordered.next() else {
        return Classification::new(pass.labels, Vec::new(), pass.counts, isolated);
    };

    let mut core = ReferenceSet::new(universe);
    core.extend(&largest, adjacency);
    pass.assign(&largest, Region::Lscc);

    let mut in_set = ReferenceSet::new(universe);
    let mut remaining = Vec::new();
    for scc in ordered {
        if is_in_component(&scc, adjacency, &core) {
            in_set.extend(&scc, adjacency);
            pass.assign(&scc, Region::In);
        } else {
            remaining.push(scc);
        }
    }

    let mut out_set = ReferenceSet::new(universe);
    let mut unattached = Vec::new();
    for scc in remaining {
        if is_out_component(&scc, &core) {
            out_set.extend(&scc, adjacency);
            pass.assign(&scc, Region::Out);
        } else {
            unattached.push(scc);
        }
    }

    for scc in unattached {
        let region = if is_out_component(&scc, &in_set)
            || is_in_component(&scc, adjacency, &out_set)
        {
            Region::Tendrils
        } else {
            Region::Disconnected
        };
        pass.assign(&scc, region);
    }

    Classification::new(pass.labels, largest.nodes().to_vec(), pass.counts, isolated)
}

/// Scratch state of one classification; discarded when it returns.
struct Pass {
    labels: Vec<Region>,
    counts: RegionCounts,
}

impl Pass {
    fn new(universe: usize) -> Self {
        Self {
            labels: vec![Region::Disconnected; universe],
            counts: RegionCounts::default(),
        }
    }

    fn assign(&mut self, scc: &Scc, region: Region) {
        for &node in scc.nodes() {
            if let Some(label) = self.labels.get_mut(node as usize) {
                *label = region;
            }
        }
        self.counts.add(region, 1);
    }
}
