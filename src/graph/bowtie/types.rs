// src/graph/bowtie/types.rs
//! Core types for the bow-tie decomposition.

use serde::{Deserialize, Serialize};

use crate::graph::types::NodeId;

/// Structural region of a node relative to the largest SCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Lscc,
    In,
    Out,
    Tendrils,
    Disconnected,
}

impl Region {
    /// All regions in report order.
    pub const ALL: [Region; 5] = [
        Region::Lscc,
        Region::In,
        Region::Out,
        Region::Tendrils,
        Region::Disconnected,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lscc => "LSCC",
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Tendrils => "TENDRILS",
            Self::Disconnected => "DISCONNECTED",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Lscc => 0,
            Self::In => 1,
            Self::Out => 2,
            Self::Tendrils => 3,
            Self::Disconnected => 4,
        }
    }
}

/// Per-region counters indexed by [`Region::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCounts([usize; 5]);

impl RegionCounts {
    #[must_use]
    pub fn get(&self, region: Region) -> usize {
        self.0.get(region.index()).copied().unwrap_or(0)
    }

    pub fn add(&mut self, region: Region, n: usize) {
        if let Some(slot) = self.0.get_mut(region.index()) {
            *slot += n;
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Node-to-region mapping produced by one classification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    labels: Vec<Region>,
    lscc: Vec<NodeId>,
    scc_counts: RegionCounts,
    isolated: usize,
}

impl Classification {
    pub(crate) fn new(
        labels: Vec<Region>,
        lscc: Vec<NodeId>,
        scc_counts: RegionCounts,
        isolated: usize,
    ) -> Self {
        Self { labels, lscc, scc_counts, isolated }
    }

    /// Region of `node`, or `None` outside the universe.
    #[must_use]
    pub fn region(&self, node: NodeId) -> Option<Region> {
        self.labels.get(node as usize).copied()
    }

    /// Labels indexed by node id.
    #[must_use]
    pub fn labels(&self) -> &[Region] {
        &self.labels
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.labels.len()
    }

    /// Members of the largest SCC, ascending. Empty for an edgeless graph.
    #[must_use]
    pub fn lscc(&self) -> &[NodeId] {
        &self.lscc
    }

    /// Number of SCCs folded into `region`. Isolated nodes are not SCCs.
    #[must_use]
    pub fn scc_count(&self, region: Region) -> usize {
        self.scc_counts.get(region)
    }

    /// Nodes with zero degree under the cutoff.
    #[must_use]
    pub fn isolated(&self) -> usize {
        self.isolated
    }

    /// Nodes labelled `region`, ascending.
    #[must_use]
    pub fn members(&self, region: Region) -> Vec<NodeId> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &r)| r == region)
            .filter_map(|(i, _)| NodeId::try_from(i).ok())
            .collect()
    }

    #[must_use]
    pub fn node_counts(&self) -> RegionCounts {
        let mut counts = RegionCounts::default();
        for &r in &self.labels {
            counts.add(r, 1);
        }
        counts
    }
}

/// Aggregated statistics of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: Region,
    pub node_count: usize,
    pub node_pct: f64,
    pub scc_count: usize,
    pub attention_sum: f64,
    pub attention_pct: f64,
}

/// The per-run aggregate report handed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowtieReport {
    /// Snapshot day, when the run came from a store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<usize>,
    pub cutoff: u32,
    pub universe_size: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub total_attention: f64,
    pub isolated_nodes: usize,
    pub lscc_size: usize,
    pub regions: Vec<RegionStats>,
}

impl BowtieReport {
    #[must_use]
    pub fn with_day(mut self, day: usize) -> Self {
        self.day = Some(day);
        self
    }

    #[must_use]
    pub fn region(&self, region: Region) -> Option<&RegionStats> {
        self.regions.iter().find(|s| s.region == region)
    }
}
