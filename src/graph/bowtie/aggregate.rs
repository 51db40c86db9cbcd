// src/graph/bowtie/aggregate.rs
//! Node-count and attention totals per region.

use super::types::{BowtieReport, Classification, Region, RegionStats};
use crate::error::{RecnetError, Result};
use crate::graph::adjacency::Adjacency;

/// Sum of all attention weights.
#[must_use]
pub fn total_attention(weights: &[f64]) -> f64 {
    weights.iter().sum()
}

/// Aggregates `classification` into per-region statistics.
///
/// `weights` is indexed by node id and must cover the whole universe.
/// Percentages are fractions in `[0, 1]` of the universe size and of
/// `total_attention` respectively.
///
/// # Errors
/// Returns `EmptyGraph` if the universe is empty or `total_attention` is
/// not a positive finite number, and `DataIntegrity` if `weights` does not
/// match the universe or holds a negative or non-finite weight.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(
    classification: &Classification,
    weights: &[f64],
    total_attention: f64,
) -> Result<Vec<RegionStats>> {
    let universe = classification.universe_size();
    if universe == 0 {
        return Err(RecnetError::EmptyGraph("universe has no nodes".into()));
    }
    if weights.len() != universe {
        return Err(RecnetError::integrity(format!(
            "attention covers {} nodes, universe has {universe}",
            weights.len()
        )));
    }
    if let Some((node, weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(RecnetError::integrity(format!(
            "node {node} has invalid attention {weight}"
        )));
    }
    if !total_attention.is_finite() || total_attention <= 0.0 {
        return Err(RecnetError::EmptyGraph(format!(
            "total attention is {total_attention}"
        )));
    }

    let mut sums = [0.0_f64; 5];
    for (&region, &weight) in classification.labels().iter().zip(weights) {
        if let Some(slot) = sums.get_mut(region.index()) {
            *slot += weight;
        }
    }
    let counts = classification.node_counts();

    let stats = Region::ALL
        .iter()
        .map(|&region| {
            let node_count = counts.get(region);
            let attention_sum = sums.get(region.index()).copied().unwrap_or(0.0);
            RegionStats {
                region,
                node_count,
                node_pct: node_count as f64 / universe as f64,
                scc_count: classification.scc_count(region),
                attention_sum,
                attention_pct: attention_sum / total_attention,
            }
        })
        .collect();

    Ok(stats)
}

/// Builds the full run report for one snapshot.
///
/// # Errors
/// Propagates [`aggregate`] errors.
pub fn summarize(
    adjacency: &Adjacency,
    classification: &Classification,
    weights: &[f64],
    cutoff: u32,
) -> Result<BowtieReport> {
    let total = total_attention(weights);
    let regions = aggregate(classification, weights, total)?;

    Ok(BowtieReport {
        day: None,
        cutoff,
        universe_size: adjacency.universe_size(),
        graph_nodes: adjacency.active_count(),
        graph_edges: adjacency.edge_count(),
        total_attention: total,
        isolated_nodes: classification.isolated(),
        lscc_size: classification.lscc().len(),
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::bowtie::types::RegionCounts;

    fn classification(labels: Vec<Region>) -> Classification {
        let mut counts = RegionCounts::default();
        counts.add(Region::Lscc, 1);
        Classification::new(labels, vec![0, 1], counts, 0)
    }

    #[test]
    fn test_percentages() {
        let c = classification(vec![Region::Lscc, Region::Lscc, Region::In, Region::Disconnected]);
        let stats = aggregate(&c, &[10.0, 30.0, 40.0, 20.0], 100.0).unwrap();

        let lscc = &stats[Region::Lscc.index()];
        assert_eq!(lscc.node_count, 2);
        assert!((lscc.node_pct - 0.5).abs() < 1e-12);
        assert!((lscc.attention_sum - 40.0).abs() < 1e-12);
        assert!((lscc.attention_pct - 0.4).abs() < 1e-12);
        assert_eq!(lscc.scc_count, 1);

        let out = &stats[Region::Out.index()];
        assert_eq!(out.node_count, 0);
        assert_eq!(out.attention_sum, 0.0);
    }

    #[test]
    fn test_regions_in_report_order() {
        let c = classification(vec![Region::Lscc, Region::Lscc]);
        let stats = aggregate(&c, &[1.0, 1.0], 2.0).unwrap();
        let order: Vec<_> = stats.iter().map(|s| s.region).collect();
        assert_eq!(order, Region::ALL.to_vec());
    }

    #[test]
    fn test_zero_attention_is_empty_graph() {
        let c = classification(vec![Region::Lscc, Region::Lscc]);
        assert!(matches!(
            aggregate(&c, &[0.0, 0.0], 0.0),
            Err(RecnetError::EmptyGraph(_))
        ));
    }

    #[test]
    fn test_empty_universe_is_empty_graph() {
        let c = Classification::new(Vec::new(), Vec::new(), RegionCounts::default(), 0);
        assert!(matches!(aggregate(&c, &[], 1.0), Err(RecnetError::EmptyGraph(_))));
    }

    #[test]
    fn test_non_finite_or_negative_weight_is_rejected() {
        let c = classification(vec![Region::Lscc, Region::Lscc]);
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let weights = [bad, 1.0];
            assert!(matches!(
                aggregate(&c, &weights, total_attention(&weights)),
                Err(RecnetError::DataIntegrity(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_total_is_empty_graph() {
        let c = classification(vec![Region::Lscc, Region::Lscc]);
        for total in [f64::NAN, f64::INFINITY, -2.0] {
            assert!(matches!(
                aggregate(&c, &[1.0, 1.0], total),
                Err(RecnetError::EmptyGraph(_))
            ));
        }
    }

    #[test]
    fn test_weight_length_mismatch() {
        let c = classification(vec![Region::Lscc, Region::Lscc]);
        assert!(matches!(
            aggregate(&c, &[1.0], 1.0),
            Err(RecnetError::DataIntegrity(_))
        ));
    }
}
