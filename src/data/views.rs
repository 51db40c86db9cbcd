// src/data/views.rs
//! Daily view counts: the attention weights of each node.
//!
//! Input is the forecast TSV: `embed<TAB>video_id<TAB>v0,v1,...<TAB>total`,
//! one line per tracked video, with `embed` ids dense in `[0, N)`.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{RecnetError, Result};
use crate::graph::types::NodeId;

/// Produces per-node attention weights for a given day.
pub trait AttentionSource: Sync {
    fn universe_size(&self) -> usize;

    /// Weights indexed by node id.
    ///
    /// # Errors
    /// Returns `DataIntegrity` if the day is not covered.
    fn weights(&self, day: usize) -> Result<Vec<f64>>;
}

/// View series of every tracked video.
#[derive(Debug, Clone, Default)]
pub struct ViewTable {
    video_ids: Vec<String>,
    series: Vec<Vec<u64>>,
    index: HashMap<String, NodeId>,
}

impl ViewTable {
    /// Reads and parses a forecast TSV file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, or a parse error.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RecnetError::io(e, path))?;
        let table = Self::parse(&content)?;
        tracing::info!(path = %path.display(), videos = table.len(), "daily views loaded");
        Ok(table)
    }

    /// Parses forecast TSV content.
    ///
    /// # Errors
    /// Returns `DataIntegrity` for malformed lines, duplicate or missing
    /// embed ids.
    pub fn parse(content: &str) -> Result<Self> {
        let mut rows: BTreeMap<NodeId, (String, Vec<u64>)> = BTreeMap::new();

        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (embed, video_id, series) = parse_line(line, lineno + 1)?;
            if rows.insert(embed, (video_id, series)).is_some() {
                return Err(RecnetError::integrity(format!(
                    "line {}: embed {embed} listed twice",
                    lineno + 1
                )));
            }
        }

        // Keys are ascending and distinct, so they are dense iff each one
        // equals its rank.
        let mut table = Self::default();
        for (expected, (embed, (video_id, series))) in rows.into_iter().enumerate() {
            if embed as usize != expected {
                return Err(RecnetError::integrity(format!("embed {expected} is missing")));
            }
            table.index.insert(video_id.clone(), embed);
            table.video_ids.push(video_id);
            table.series.push(series);
        }
        Ok(table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.video_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.video_ids.is_empty()
    }

    #[must_use]
    pub fn video_id(&self, node: NodeId) -> Option<&str> {
        self.video_ids.get(node as usize).map(String::as_str)
    }

    #[must_use]
    pub fn node_of(&self, video_id: &str) -> Option<NodeId> {
        self.index.get(video_id).copied()
    }

    #[must_use]
    pub fn daily_views(&self, node: NodeId, day: usize) -> Option<u64> {
        self.series.get(node as usize)?.get(day).copied()
    }

    /// Mean daily views per node; zero for an empty series.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_views(&self) -> Vec<f64> {
        self.series
            .iter()
            .map(|s| {
                if s.is_empty() {
                    0.0
                } else {
                    s.iter().sum::<u64>() as f64 / s.len() as f64
                }
            })
            .collect()
    }

    /// Length of the shortest series, i.e. the number of fully covered days.
    #[must_use]
    pub fn days(&self) -> usize {
        self.series.iter().map(Vec::len).min().unwrap_or(0)
    }
}

impl AttentionSource for ViewTable {
    fn universe_size(&self) -> usize {
        self.len()
    }

    #[allow(clippy::cast_precision_loss)]
    fn weights(&self, day: usize) -> Result<Vec<f64>> {
        self.series
            .iter()
            .enumerate()
            .map(|(node, s)| {
                s.get(day).map(|&v| v as f64).ok_or_else(|| {
                    RecnetError::integrity(format!("node {node} has no views for day {day}"))
                })
            })
            .collect()
    }
}

fn parse_line(line: &str, lineno: usize) -> Result<(NodeId, String, Vec<u64>)> {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    let [embed, video_id, series, _total] = fields.as_slice() else {
        return Err(RecnetError::integrity(format!(
            "line {lineno}: expected 4 tab-separated fields, found {}",
            fields.len()
        )));
    };

    let embed = embed
        .parse::<NodeId>()
        .map_err(|e| RecnetError::integrity(format!("line {lineno}: embed: {e}")))?;
    let series = series
        .split(',')
        .map(|v| v.trim().parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| RecnetError::integrity(format!("line {lineno}: views: {e}")))?;

    Ok((embed, (*video_id).to_string(), series))
}

/// The same weights for every day.
#[derive(Debug, Clone)]
pub struct FixedAttention {
    weights: Vec<f64>,
}

impl FixedAttention {
    #[must_use]
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }
}

impl AttentionSource for FixedAttention {
    fn universe_size(&self) -> usize {
        self.weights.len()
    }

    fn weights(&self, _day: usize) -> Result<Vec<f64>> {
        Ok(self.weights.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\tvidB\t5,6,7\t18\n0\tvidA\t1,2,3\t6\n";

    #[test]
    fn test_parse_orders_by_embed() {
        let table = ViewTable::parse(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.video_id(0), Some("vidA"));
        assert_eq!(table.node_of("vidB"), Some(1));
        assert_eq!(table.daily_views(1, 2), Some(7));
        assert_eq!(table.days(), 3);
    }

    #[test]
    fn test_weights_for_day() {
        let table = ViewTable::parse(SAMPLE).unwrap();
        assert_eq!(table.weights(1).unwrap(), vec![2.0, 6.0]);
        assert!(matches!(table.weights(3), Err(RecnetError::DataIntegrity(_))));
    }

    #[test]
    fn test_mean_views() {
        let table = ViewTable::parse(SAMPLE).unwrap();
        assert_eq!(table.mean_views(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_missing_embed_fails() {
        let err = ViewTable::parse("0\tvidA\t1\t1\n2\tvidC\t1\t1\n").unwrap_err();
        assert!(matches!(err, RecnetError::DataIntegrity(_)));
    }

    #[test]
    fn test_duplicate_embed_fails() {
        assert!(ViewTable::parse("0\tvidA\t1\t1\n0\tvidB\t1\t1\n").is_err());
    }

    #[test]
    fn test_malformed_line_fails() {
        assert!(ViewTable::parse("0\tvidA\t1,x\t1\n").is_err());
        assert!(ViewTable::parse("0\tvidA\n").is_err());
    }

    #[test]
    fn test_oversized_embed_is_integrity_error() {
        for embed in ["18446744073709551615", "10000000000"] {
            let err = ViewTable::parse(&format!("{embed}\tvidA\t1\t1\n")).unwrap_err();
            assert!(matches!(err, RecnetError::DataIntegrity(_)), "{embed}: {err}");
        }
    }

    #[test]
    fn test_sparse_large_embed_reports_gap() {
        let err = ViewTable::parse("0\tvidA\t1\t1\n4000000000\tvidB\t1\t1\n").unwrap_err();
        assert!(err.to_string().contains("embed 1 is missing"), "{err}");
    }
}
