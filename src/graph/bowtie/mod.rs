// src/graph/bowtie/mod.rs
//! Bow-tie decomposition of a recommendation snapshot.
//!
//! Pipeline: raw records → [`GraphBuilder`] → [`strongly_connected`] →
//! [`classify`] → [`summarize`]. Each call is independent; nothing is kept
//! between snapshots.

pub mod aggregate;
pub mod classifier;
pub mod report;
pub mod types;

pub use aggregate::{aggregate, summarize, total_attention};
pub use classifier::{classify, is_in_component, is_out_component, order_components, ReferenceSet};
pub use types::{BowtieReport, Classification, Region, RegionCounts, RegionStats};

use crate::error::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::scc::strongly_connected;
use crate::graph::types::IncomingRecords;

/// Output of one decomposition run.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub classification: Classification,
    pub report: BowtieReport,
}

/// Classifies every node of one snapshot at the given cutoff.
///
/// # Errors
/// Returns `DataIntegrity` for malformed records.
pub fn classify_snapshot(records: &IncomingRecords, cutoff: u32) -> Result<Classification> {
    let adjacency = GraphBuilder::new(cutoff).build(records)?;
    let sccs = strongly_connected(&adjacency);
    Ok(classify(&adjacency, sccs))
}

/// Runs the full pipeline on one snapshot.
///
/// # Errors
/// Returns `DataIntegrity` for malformed records or weights, and
/// `EmptyGraph` if percentages are undefined.
pub fn decompose(records: &IncomingRecords, weights: &[f64], cutoff: u32) -> Result<Decomposition> {
    let adjacency = GraphBuilder::new(cutoff).build(records)?;
    let sccs = strongly_connected(&adjacency);
    let scc_total = sccs.len();
    let classification = classify(&adjacency, sccs);
    let report = summarize(&adjacency, &classification, weights, cutoff)?;

    tracing::info!(
        cutoff,
        nodes = report.graph_nodes,
        edges = report.graph_edges,
        sccs = scc_total,
        lscc = report.lscc_size,
        "bow-tie decomposed"
    );

    Ok(Decomposition {
        classification,
        report,
    })
}
