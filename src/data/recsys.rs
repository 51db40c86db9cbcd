// src/data/recsys.rs
//! Conversion of raw daily recommendation lists into snapshot records.
//!
//! Input lines look like `{"vid": "abc", "relevant_list": ["def", ...]}`:
//! the videos recommended on `vid`'s page, in display order.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::views::ViewTable;
use crate::error::{RecnetError, Result};
use crate::graph::types::{EdgeRecord, IncomingRecords, NodeId};

#[derive(Debug, Deserialize)]
struct RecsysLine {
    vid: String,
    relevant_list: Vec<String>,
}

/// Outcome counters of one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub lines: usize,
    pub unknown_sources: usize,
    pub records: usize,
}

/// Builds the incoming records of `day` from recommendation lists.
///
/// Only the first `max_position` entries of each list are read and only
/// tracked videos become records. Every tracked video gets an entry, even
/// with no incoming records.
///
/// # Errors
/// Returns `DataIntegrity` for unparsable lines or if a source has no views
/// on `day`.
pub fn extract_day(
    content: &str,
    views: &ViewTable,
    day: usize,
    max_position: usize,
) -> Result<(IncomingRecords, ExtractStats)> {
    let mut incoming: BTreeMap<NodeId, Vec<EdgeRecord>> = BTreeMap::new();
    let mut stats = ExtractStats::default();

    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;
        let parsed: RecsysLine = serde_json::from_str(line)
            .map_err(|e| RecnetError::integrity(format!("recsys line {}: {e}", lineno + 1)))?;

        let Some(source) = views.node_of(&parsed.vid) else {
            stats.unknown_sources += 1;
            continue;
        };
        let weight = source_views(views, source, day)?;

        for (position, target_vid) in parsed.relevant_list.iter().take(max_position).enumerate() {
            let Some(target) = views.node_of(target_vid) else {
                continue;
            };
            let position = u32::try_from(position)
                .map_err(|_| RecnetError::integrity("position exceeds u32"))?;
            incoming
                .entry(target)
                .or_default()
                .push(EdgeRecord::weighted(source, position, weight));
            stats.records += 1;
        }
    }

    let mut records = IncomingRecords::new(views.len());
    for node in 0..views.len() {
        let target = NodeId::try_from(node)
            .map_err(|_| RecnetError::integrity("universe exceeds node id range"))?;
        records.push(target, incoming.remove(&target).unwrap_or_default());
    }

    Ok((records, stats))
}

#[allow(clippy::cast_precision_loss)]
fn source_views(views: &ViewTable, source: NodeId, day: usize) -> Result<f64> {
    views
        .daily_views(source, day)
        .map(|v| v as f64)
        .ok_or_else(|| RecnetError::integrity(format!("node {source} has no views for day {day}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ViewTable {
        ViewTable::parse("0\ta\t10,11\t21\n1\tb\t20,21\t41\n2\tc\t30,31\t61\n").unwrap()
    }

    #[test]
    fn test_extract_day_builds_incoming_lists() {
        let content = concat!(
            "{\"vid\":\"a\",\"relevant_list\":[\"b\",\"zz\",\"c\"]}\n",
            "{\"vid\":\"c\",\"relevant_list\":[\"b\"]}\n",
        );
        let (records, stats) = extract_day(content, &table(), 1, 50).unwrap();

        assert_eq!(records.targets().len(), 3);
        assert!(records.targets()[0].incoming.is_empty());
        assert_eq!(
            records.targets()[1].incoming,
            vec![EdgeRecord::weighted(0, 0, 11.0), EdgeRecord::weighted(2, 0, 31.0)]
        );
        // "zz" is untracked but still occupies position 1.
        assert_eq!(records.targets()[2].incoming, vec![EdgeRecord::weighted(0, 2, 11.0)]);
        assert_eq!(stats.records, 3);
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn test_max_position_truncates_lists() {
        let content = "{\"vid\":\"a\",\"relevant_list\":[\"b\",\"c\"]}\n";
        let (records, stats) = extract_day(content, &table(), 0, 1).unwrap();
        assert_eq!(stats.records, 1);
        assert!(records.targets()[2].incoming.is_empty());
    }

    #[test]
    fn test_unknown_source_is_skipped() {
        let content = "{\"vid\":\"q\",\"relevant_list\":[\"b\"]}\n";
        let (records, stats) = extract_day(content, &table(), 0, 50).unwrap();
        assert_eq!(stats.unknown_sources, 1);
        assert_eq!(records.record_count(), 0);
    }

    #[test]
    fn test_day_outside_series_fails() {
        let content = "{\"vid\":\"a\",\"relevant_list\":[\"b\"]}\n";
        assert!(extract_day(content, &table(), 5, 50).is_err());
    }

    #[test]
    fn test_bad_json_fails() {
        assert!(matches!(
            extract_day("{oops", &table(), 0, 50),
            Err(RecnetError::DataIntegrity(_))
        ));
    }
}
