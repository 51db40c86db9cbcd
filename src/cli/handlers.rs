// src/cli/handlers.rs
//! Command handlers.
//!
//! Each handler loads what it needs from the configured data paths, runs,
//! and prints either colored tables or JSON.

use anyhow::{Context as _, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::data::recsys::extract_day;
use crate::data::{snapshot_date, MetadataTable, SnapshotDir, SnapshotSource, ViewTable};
use crate::events::{EventKind, EventLogger};
use crate::exit::RecnetExit;
use crate::graph::bowtie::report::{print_failure, print_report, print_sweep_footer};
use crate::graph::persistent::{self, content_overlap, PersistentNetwork};
use crate::sweep::{RunOutcome, SweepSummary, Sweeper};

/// Shared state of one invocation.
pub struct Context {
    pub config: Config,
    pub json: bool,
}

impl Context {
    #[must_use]
    pub fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }

    fn logger(&self) -> EventLogger {
        EventLogger::new(&self.config.data.run_log)
    }

    fn views(&self) -> Result<ViewTable> {
        let path = &self.config.data.views_path;
        ViewTable::load(path).with_context(|| format!("loading views from {}", path.display()))
    }

    fn snapshots(&self, views: &ViewTable) -> SnapshotDir {
        SnapshotDir::new(
            self.config.data.snapshot_dir.clone(),
            self.config.sweep.base_date,
            views.len(),
        )
    }

    fn title(&self, run: &RunOutcome) -> String {
        let date = snapshot_date(self.config.sweep.base_date, run.day)
            .map_or_else(|_| "?".to_string(), |d| d.to_string());
        format!("day {} ({date}) @ cutoff {}", run.day, run.cutoff)
    }
}

/// Decomposes one day.
///
/// # Errors
/// Returns error if the view table cannot be loaded.
pub fn handle_bowtie(ctx: &Context, day: usize, cutoff: Option<u32>) -> Result<RecnetExit> {
    let cutoff = cutoff.unwrap_or(ctx.config.sweep.cutoff);
    let views = ctx.views()?;
    let snapshots = ctx.snapshots(&views);
    let logger = ctx.logger();

    let summary = Sweeper::new(&snapshots, &views)
        .with_logger(&logger)
        .days(&[day], cutoff);
    emit_summary(ctx, &summary, false)
}

/// Decomposes the first `days` days at one cutoff.
///
/// # Errors
/// Returns error if the view table cannot be loaded.
pub fn handle_evolve(ctx: &Context, cutoff: Option<u32>, days: Option<usize>) -> Result<RecnetExit> {
    let cutoff = cutoff.unwrap_or(ctx.config.sweep.cutoff);
    let days: Vec<usize> = (0..days.unwrap_or(ctx.config.sweep.num_days)).collect();
    let views = ctx.views()?;
    let snapshots = ctx.snapshots(&views);
    let logger = ctx.logger();

    let summary = Sweeper::new(&snapshots, &views)
        .with_logger(&logger)
        .days(&days, cutoff);
    emit_summary(ctx, &summary, true)
}

/// Decomposes one day at every cutoff in `min..=max`.
///
/// # Errors
/// Returns error if the range is empty or the view table cannot be loaded.
pub fn handle_cutoff_sweep(
    ctx: &Context,
    day: Option<usize>,
    min: Option<u32>,
    max: Option<u32>,
) -> Result<RecnetExit> {
    let sweep = &ctx.config.sweep;
    let day = day.unwrap_or(sweep.reference_day);
    let min = min.unwrap_or(sweep.cutoff_min);
    let max = max.unwrap_or(sweep.cutoff_max);
    if min == 0 || min > max {
        anyhow::bail!("invalid cutoff range {min}..={max}");
    }
    let cutoffs: Vec<u32> = (min..=max).collect();

    let views = ctx.views()?;
    let snapshots = ctx.snapshots(&views);
    let logger = ctx.logger();

    let summary = Sweeper::new(&snapshots, &views)
        .with_logger(&logger)
        .cutoffs(day, &cutoffs);
    emit_summary(ctx, &summary, true)
}

/// Converts raw recommendation lists into snapshot files.
///
/// # Errors
/// Returns error if the view table cannot be loaded.
pub fn handle_extract(ctx: &Context, day: Option<usize>, all: bool) -> Result<RecnetExit> {
    let days: Vec<usize> = match day {
        Some(d) if !all => vec![d],
        _ => (0..ctx.config.sweep.num_days).collect(),
    };
    let views = ctx.views()?;
    let snapshots = ctx.snapshots(&views);
    let logger = ctx.logger();

    let mut failed = 0;
    for &day in &days {
        match extract_one(ctx, &views, &snapshots, day) {
            Ok((path, records)) => {
                logger.log(EventKind::SnapshotExtracted {
                    day,
                    path: path.display().to_string(),
                    records,
                });
                if !ctx.json {
                    println!("{} day {day}: {records} records → {}", "✓".green(), path.display());
                }
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(day, "extraction failed: {e:#}");
                if !ctx.json {
                    print_failure(&format!("day {day}"), &format!("{e:#}"));
                }
            }
        }
    }

    if ctx.json {
        let body = serde_json::json!({ "days": days.len(), "failed": failed });
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    Ok(if failed == 0 {
        RecnetExit::Success
    } else {
        RecnetExit::RunsFailed
    })
}

fn extract_one(
    ctx: &Context,
    views: &ViewTable,
    snapshots: &SnapshotDir,
    day: usize,
) -> Result<(PathBuf, usize)> {
    let path = recsys_path(ctx, day)?;
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let (records, stats) = extract_day(&content, views, day, ctx.config.sweep.max_position)?;
    tracing::debug!(
        day,
        lines = stats.lines,
        unknown = stats.unknown_sources,
        "recommendation lists read"
    );
    let written = snapshots.write(day, &records)?;
    Ok((written, stats.records))
}

fn recsys_path(ctx: &Context, day: usize) -> Result<PathBuf> {
    let date = snapshot_date(ctx.config.sweep.base_date, day)?;
    Ok(ctx.config.data.recsys_dir.join(format!("recsys_{}.json", date.format("%Y-%m-%d"))))
}

/// Extracts the persistent network over the whole window.
///
/// # Errors
/// Returns error if any snapshot or the view table cannot be loaded.
pub fn handle_persistent(ctx: &Context, out: Option<&Path>) -> Result<RecnetExit> {
    let views = ctx.views()?;
    let snapshots = ctx.snapshots(&views);

    let days = (0..ctx.config.sweep.num_days)
        .map(|day| snapshots.load(day))
        .collect::<crate::error::Result<Vec<_>>>()?;
    let mut network = persistent::extract(&days, &views.mean_views(), &ctx.config.persistent)?;

    let metadata_path = &ctx.config.data.metadata_path;
    if metadata_path.exists() {
        let metadata = MetadataTable::load(metadata_path, &views)?;
        network.content = Some(content_overlap(&network.links, &metadata));
    } else {
        tracing::info!(path = %metadata_path.display(), "no video metadata, skipping content counts");
    }

    if let Some(path) = out {
        std::fs::write(path, network.to_csv())
            .with_context(|| format!("writing {}", path.display()))?;
    }
    ctx.logger().log(EventKind::PersistentExtracted {
        links: network.links.len(),
        reciprocal_pairs: network.reciprocal_pairs,
    });

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&network)?);
    } else {
        print_persistent(&network, out);
    }
    Ok(RecnetExit::Success)
}

fn print_persistent(network: &PersistentNetwork, out: Option<&Path>) {
    println!(
        "\n{} {} links | {} sources | {} targets | {} both | {} reciprocal pairs",
        "PERSISTENT".cyan().bold(),
        network.links.len(),
        network.sources,
        network.targets,
        network.overlap,
        network.reciprocal_pairs,
    );
    if let Some(content) = network.content {
        println!(
            "  {} same artist ({}) | {} same genre ({})",
            content.same_artist,
            share(content.same_artist, network.links.len()),
            content.same_genre,
            share(content.same_genre, network.links.len()),
        );
    }
    if let Some(path) = out {
        println!("  written to {}", path.display().to_string().dimmed());
    }
}

#[allow(clippy::cast_precision_loss)]
fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", 100.0 * count as f64 / total as f64)
}

fn emit_summary(ctx: &Context, summary: &SweepSummary, footer: bool) -> Result<RecnetExit> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        for run in &summary.runs {
            let title = ctx.title(run);
            match (run.report(), run.error()) {
                (Some(report), _) => print_report(&title, report),
                (None, Some(error)) => print_failure(&title, error),
                (None, None) => {}
            }
        }
        if footer {
            print_sweep_footer(summary.completed(), summary.failed());
        }
    }

    Ok(if summary.failed() == 0 {
        RecnetExit::Success
    } else {
        RecnetExit::RunsFailed
    })
}
