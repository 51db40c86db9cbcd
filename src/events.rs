// src/events.rs
//! Machine-readable run log.
//!
//! Every decomposition run and sweep boundary is appended as one JSON line,
//! by default to `.recnet/runs.jsonl`. Reporting reads this file back.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::graph::bowtie::BowtieReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SweepStarted {
        sweep: String,
        runs: usize,
    },
    RunCompleted {
        day: usize,
        cutoff: u32,
        report: BowtieReport,
    },
    RunFailed {
        day: usize,
        cutoff: u32,
        error: String,
    },
    SweepFinished {
        completed: usize,
        failed: usize,
    },
    SnapshotExtracted {
        day: usize,
        path: String,
        records: usize,
    },
    PersistentExtracted {
        links: usize,
        reciprocal_pairs: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(log_path: &Path) -> Self {
        Self {
            log_path: log_path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, kind: EventKind) {
        // Logging is best-effort. We swallow errors to avoid crashing main flow.
        match Self::serialize_event(kind) {
            Ok(json) => {
                if let Err(e) = self.append_to_file(&json) {
                    tracing::warn!(path = %self.log_path.display(), "run log write failed: {e}");
                }
            }
            Err(e) => tracing::warn!("run log serialization failed: {e}"),
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = RunEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Reads a run log back, skipping lines that do not parse.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn read_log(path: &Path) -> Result<Vec<RunEvent>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_append_as_json_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(&tmp.path().join("nested").join("runs.jsonl"));

        logger.log(EventKind::SweepStarted { sweep: "days".into(), runs: 2 });
        logger.log(EventKind::RunFailed { day: 3, cutoff: 15, error: "boom".into() });

        let events = read_log(logger.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].kind,
            EventKind::RunFailed { day: 3, cutoff: 15, error: "boom".into() }
        );
    }

    #[test]
    fn test_unwritable_log_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let logger = EventLogger::new(&blocker.join("runs.jsonl"));
        logger.log(EventKind::SweepFinished { completed: 0, failed: 0 });
    }
}
