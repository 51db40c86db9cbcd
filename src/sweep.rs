// src/sweep.rs
//! Parameter sweeps over snapshots.
//!
//! A day sweep decomposes a sequence of snapshots at one cutoff. A cutoff
//! sweep decomposes one snapshot at a range of cutoffs. Runs share no
//! mutable state and execute on the rayon pool; a failed run is recorded
//! and the sweep carries on.

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;

use crate::data::{AttentionSource, SnapshotSource};
use crate::error::{RecnetError, Result};
use crate::events::{EventKind, EventLogger};
use crate::graph::bowtie::{decompose, BowtieReport};
use crate::graph::types::IncomingRecords;

/// How one run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed(BowtieReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub day: usize,
    pub cutoff: u32,
    #[serde(flatten)]
    pub status: RunStatus,
}

impl RunOutcome {
    fn from_result(day: usize, cutoff: u32, result: Result<BowtieReport>) -> Self {
        let status = match result {
            Ok(report) => RunStatus::Completed(report),
            Err(e) => {
                tracing::warn!(day, cutoff, "run failed: {e}");
                RunStatus::Failed(e.to_string())
            }
        };
        Self { day, cutoff, status }
    }

    fn failed(day: usize, cutoff: u32, error: &RecnetError) -> Self {
        Self {
            day,
            cutoff,
            status: RunStatus::Failed(error.to_string()),
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&BowtieReport> {
        match &self.status {
            RunStatus::Completed(report) => Some(report),
            RunStatus::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RunStatus::Completed(_) => None,
            RunStatus::Failed(e) => Some(e),
        }
    }
}

/// All runs of one sweep, in parameter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub sweep: String,
    pub runs: Vec<RunOutcome>,
}

impl SweepSummary {
    #[must_use]
    pub fn completed(&self) -> usize {
        self.runs.iter().filter(|r| r.report().is_some()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.runs.len() - self.completed()
    }

    pub fn reports(&self) -> impl Iterator<Item = &BowtieReport> {
        self.runs.iter().filter_map(RunOutcome::report)
    }
}

/// Decomposes one stored snapshot.
///
/// # Errors
/// Propagates load, weight, and decomposition errors.
pub fn run_one(
    snapshots: &dyn SnapshotSource,
    attention: &dyn AttentionSource,
    day: usize,
    cutoff: u32,
) -> Result<BowtieReport> {
    let records = snapshots.load(day)?;
    let weights = attention.weights(day)?;
    let decomposition = decompose(&records, &weights, cutoff)?;
    Ok(decomposition.report.with_day(day))
}

/// Drives sweeps against a snapshot store and an attention source.
pub struct Sweeper<'a> {
    snapshots: &'a dyn SnapshotSource,
    attention: &'a dyn AttentionSource,
    logger: Option<&'a EventLogger>,
}

impl<'a> Sweeper<'a> {
    #[must_use]
    pub fn new(snapshots: &'a dyn SnapshotSource, attention: &'a dyn AttentionSource) -> Self {
        Self {
            snapshots,
            attention,
            logger: None,
        }
    }

    /// Appends every run to `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: &'a EventLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Decomposes each of `days` at `cutoff`.
    #[must_use]
    pub fn days(&self, days: &[usize], cutoff: u32) -> SweepSummary {
        self.start("days", days.len());

        let runs: Vec<RunOutcome> = days
            .par_iter()
            .map(|&day| {
                let result = run_one(self.snapshots, self.attention, day, cutoff);
                RunOutcome::from_result(day, cutoff, result)
            })
            .collect();

        self.finish("days", runs)
    }

    /// Decomposes the snapshot of `day` at each of `cutoffs`.
    ///
    /// The snapshot and its weights are loaded once. If either fails to
    /// load, every run fails with that error.
    #[must_use]
    pub fn cutoffs(&self, day: usize, cutoffs: &[u32]) -> SweepSummary {
        self.start("cutoffs", cutoffs.len());

        let inputs = self
            .snapshots
            .load(day)
            .and_then(|records| Ok((records, self.attention.weights(day)?)));

        let runs: Vec<RunOutcome> = match &inputs {
            Ok((records, weights)) => cutoffs
                .par_iter()
                .map(|&cutoff| {
                    let result = run_at(records, weights, day, cutoff);
                    RunOutcome::from_result(day, cutoff, result)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(day, "snapshot inputs failed to load: {e}");
                cutoffs
                    .iter()
                    .map(|&cutoff| RunOutcome::failed(day, cutoff, e))
                    .collect()
            }
        };

        self.finish("cutoffs", runs)
    }

    fn start(&self, sweep: &str, runs: usize) {
        tracing::info!(sweep, runs, "sweep started");
        if let Some(logger) = self.logger {
            logger.log(EventKind::SweepStarted {
                sweep: sweep.to_string(),
                runs,
            });
        }
    }

    fn finish(&self, sweep: &str, runs: Vec<RunOutcome>) -> SweepSummary {
        let summary = SweepSummary {
            sweep: sweep.to_string(),
            runs,
        };

        // Logged after the parallel phase so lines follow parameter order.
        if let Some(logger) = self.logger {
            for run in &summary.runs {
                logger.log(run_event(run));
            }
            logger.log(EventKind::SweepFinished {
                completed: summary.completed(),
                failed: summary.failed(),
            });
        }

        tracing::info!(
            sweep,
            completed = summary.completed(),
            failed = summary.failed(),
            "sweep finished"
        );
        summary
    }
}

fn run_at(records: &IncomingRecords, weights: &[f64], day: usize, cutoff: u32) -> Result<BowtieReport> {
    let decomposition = decompose(records, weights, cutoff)?;
    Ok(decomposition.report.with_day(day))
}

fn run_event(run: &RunOutcome) -> EventKind {
    match &run.status {
        RunStatus::Completed(report) => EventKind::RunCompleted {
            day: run.day,
            cutoff: run.cutoff,
            report: report.clone(),
        },
        RunStatus::Failed(error) => EventKind::RunFailed {
            day: run.day,
            cutoff: run.cutoff,
            error: error.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FixedAttention, MemorySnapshots, ViewTable};
    use crate::events::read_log;
    use crate::graph::bowtie::Region;

    // 0 ↔ 1 at positions 0 and 20; 2 → 0 at position 5.
    fn day_records() -> IncomingRecords {
        IncomingRecords::from_edges(3, &[(0, 1, 0), (1, 0, 20), (2, 0, 5)])
    }

    fn store(days: usize) -> MemorySnapshots {
        let mut store = MemorySnapshots::new(3);
        for _ in 0..days {
            store.push(day_records());
        }
        store
    }

    #[test]
    fn test_day_sweep_in_order() {
        let snapshots = store(3);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);
        let summary = Sweeper::new(&snapshots, &attention).days(&[0, 1, 2], 25);

        assert_eq!(summary.completed(), 3);
        let days: Vec<usize> = summary.runs.iter().map(|r| r.day).collect();
        assert_eq!(days, vec![0, 1, 2]);
        let report = summary.runs[1].report().unwrap();
        assert_eq!(report.day, Some(1));
        assert_eq!(report.lscc_size, 2);
        assert_eq!(report.region(Region::In).unwrap().node_count, 1);
    }

    #[test]
    fn test_missing_day_does_not_abort() {
        let snapshots = store(2);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);
        let summary = Sweeper::new(&snapshots, &attention).days(&[0, 5, 1], 25);

        assert_eq!(summary.completed(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(summary.runs[1].error().unwrap().contains("day 5"));
    }

    #[test]
    fn test_cutoff_sweep_shares_snapshot() {
        let snapshots = store(1);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);
        let summary = Sweeper::new(&snapshots, &attention).cutoffs(0, &[10, 25]);

        assert_eq!(summary.completed(), 2);
        // At cutoff 10 the 1 → 0 link is dropped and no cycle remains.
        let tight = summary.runs[0].report().unwrap();
        assert_eq!(tight.cutoff, 10);
        assert_eq!(tight.lscc_size, 1);
        assert_eq!(summary.runs[1].report().unwrap().lscc_size, 2);
    }

    #[test]
    fn test_cutoff_sweep_on_missing_day_fails_every_run() {
        let snapshots = store(0);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);
        let summary = Sweeper::new(&snapshots, &attention).cutoffs(3, &[5, 10, 15]);

        assert_eq!(summary.failed(), 3);
    }

    #[test]
    fn test_cutoff_sweep_keeps_load_error_kind() {
        let snapshots = store(2);
        let views = ViewTable::parse("0\ta\t1\t1\n1\tb\t1\t1\n2\tc\t1\t1\n").unwrap();
        let summary = Sweeper::new(&snapshots, &views).cutoffs(1, &[5, 10]);

        assert_eq!(summary.failed(), 2);
        let expected = views.weights(1).unwrap_err().to_string();
        for run in &summary.runs {
            assert_eq!(run.error(), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_weight_mismatch_is_a_failed_run() {
        let snapshots = store(1);
        let attention = FixedAttention::new(vec![1.0]);
        let summary = Sweeper::new(&snapshots, &attention).days(&[0], 25);

        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_runs_are_logged() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = EventLogger::new(&tmp.path().join("runs.jsonl"));
        let snapshots = store(1);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);

        let _ = Sweeper::new(&snapshots, &attention)
            .with_logger(&logger)
            .days(&[0, 1], 25);

        let events = read_log(logger.path()).unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[1].kind, EventKind::RunCompleted { day: 0, .. }));
        assert!(matches!(events[2].kind, EventKind::RunFailed { day: 1, .. }));
        assert_eq!(
            events[3].kind,
            EventKind::SweepFinished {
                completed: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_summary_serializes_status() {
        let snapshots = store(0);
        let attention = FixedAttention::new(vec![1.0, 1.0, 2.0]);
        let summary = Sweeper::new(&snapshots, &attention).days(&[0], 25);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["runs"][0]["day"], 0);
        assert!(json["runs"][0]["failed"].is_string());
    }
}
