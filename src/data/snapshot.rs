// src/data/snapshot.rs
//! Daily network snapshots on disk.
//!
//! One JSON object per line:
//! `{"target": 3, "incoming": [[source, position, views], ...]}`.
//! Files are named `network_<YYYY-MM-DD>.jsonl`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::snapshot_date;
use crate::error::{RecnetError, Result};
use crate::graph::types::{EdgeRecord, IncomingRecords, NodeId};

/// Produces the raw incoming records of one day.
pub trait SnapshotSource: Sync {
    fn universe_size(&self) -> usize;

    /// Loads the records of `day`.
    ///
    /// # Errors
    /// Returns `Io` if the day is unavailable, `DataIntegrity` if malformed.
    fn load(&self, day: usize) -> Result<IncomingRecords>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotLine {
    target: NodeId,
    incoming: Vec<(NodeId, u32, Option<f64>)>,
}

/// Parses snapshot JSONL content.
///
/// # Errors
/// Returns `DataIntegrity` naming the first unparsable line.
pub fn parse_snapshot(content: &str, universe_size: usize) -> Result<IncomingRecords> {
    let mut records = IncomingRecords::new(universe_size);
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: SnapshotLine = serde_json::from_str(line).map_err(|e| {
            RecnetError::integrity(format!("snapshot line {}: {e}", lineno + 1))
        })?;
        let incoming = parsed
            .incoming
            .into_iter()
            .map(|(source, position, weight)| EdgeRecord { source, position, weight })
            .collect();
        records.push(parsed.target, incoming);
    }
    Ok(records)
}

/// Renders records as snapshot JSONL.
///
/// # Errors
/// Returns `Json` if serialization fails.
pub fn render_snapshot(records: &IncomingRecords) -> Result<String> {
    let mut out = String::new();
    for entry in records.targets() {
        let line = SnapshotLine {
            target: entry.target,
            incoming: entry
                .incoming
                .iter()
                .map(|r| (r.source, r.position, r.weight))
                .collect(),
        };
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');
    }
    Ok(out)
}

/// A directory of dated snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotDir {
    dir: PathBuf,
    base_date: NaiveDate,
    universe_size: usize,
}

impl SnapshotDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, base_date: NaiveDate, universe_size: usize) -> Self {
        Self {
            dir: dir.into(),
            base_date,
            universe_size,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path of `day`.
    ///
    /// # Errors
    /// Returns `Other` if the date overflows.
    pub fn path_for(&self, day: usize) -> Result<PathBuf> {
        let date = snapshot_date(self.base_date, day)?;
        Ok(self.dir.join(format!("network_{}.jsonl", date.format("%Y-%m-%d"))))
    }

    /// Writes `records` as the snapshot of `day`.
    ///
    /// # Errors
    /// Returns `Io` if the directory or file cannot be written.
    pub fn write(&self, day: usize, records: &IncomingRecords) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| RecnetError::io(e, &self.dir))?;
        let path = self.path_for(day)?;
        let body = render_snapshot(records)?;
        std::fs::write(&path, body).map_err(|e| RecnetError::io(e, &path))?;
        Ok(path)
    }
}

impl SnapshotSource for SnapshotDir {
    fn universe_size(&self) -> usize {
        self.universe_size
    }

    fn load(&self, day: usize) -> Result<IncomingRecords> {
        let path = self.path_for(day)?;
        let content = std::fs::read_to_string(&path).map_err(|e| RecnetError::io(e, &path))?;
        let records = parse_snapshot(&content, self.universe_size)?;
        tracing::debug!(day, path = %path.display(), records = records.record_count(), "snapshot loaded");
        Ok(records)
    }
}

/// Snapshots held in memory, indexed by day.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshots {
    universe_size: usize,
    days: Vec<IncomingRecords>,
}

impl MemorySnapshots {
    #[must_use]
    pub fn new(universe_size: usize) -> Self {
        Self {
            universe_size,
            days: Vec::new(),
        }
    }

    pub fn push(&mut self, records: IncomingRecords) {
        self.days.push(records);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl SnapshotSource for MemorySnapshots {
    fn universe_size(&self) -> usize {
        self.universe_size
    }

    fn load(&self, day: usize) -> Result<IncomingRecords> {
        self.days
            .get(day)
            .cloned()
            .ok_or_else(|| RecnetError::Other(format!("no snapshot for day {day}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let content = "{\"target\":1,\"incoming\":[[0,3,12.0],[2,0,null]]}\n\n{\"target\":0,\"incoming\":[]}\n";
        let records = parse_snapshot(content, 3).unwrap();
        assert_eq!(records.targets().len(), 2);
        assert_eq!(
            records.targets()[0].incoming,
            vec![EdgeRecord::weighted(0, 3, 12.0), EdgeRecord::new(2, 0)]
        );
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = parse_snapshot("{\"target\":0,\"incoming\":[]}\nnot json\n", 1).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_render_then_parse_preserves_records() {
        let records = IncomingRecords::new(3)
            .with(2, vec![EdgeRecord::weighted(1, 4, 7.0)])
            .with(0, Vec::new());
        let text = render_snapshot(&records).unwrap();
        assert_eq!(parse_snapshot(&text, 3).unwrap(), records);
    }

    #[test]
    fn test_dir_round_trip_uses_dated_names() {
        let tmp = tempfile::tempdir().unwrap();
        let base = NaiveDate::from_ymd_opt(2018, 9, 1).unwrap();
        let dir = SnapshotDir::new(tmp.path(), base, 2);
        let records = IncomingRecords::new(2).with(1, vec![EdgeRecord::new(0, 0)]);

        let path = dir.write(30, &records).unwrap();
        assert!(path.ends_with("network_2018-10-01.jsonl"));
        assert_eq!(dir.load(30).unwrap(), records);
        assert!(matches!(dir.load(31), Err(RecnetError::Io { .. })));
    }

    #[test]
    fn test_memory_snapshots() {
        let mut mem = MemorySnapshots::new(2);
        mem.push(IncomingRecords::new(2));
        assert_eq!(mem.len(), 1);
        assert!(mem.load(0).is_ok());
        assert!(mem.load(1).is_err());
    }
}
