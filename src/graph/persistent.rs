// src/graph/persistent.rs
//! Persistent links: recommendations that hold across most of the window.
//!
//! This accumulates over many days and is kept apart from the per-snapshot
//! decomposition, which holds no state between runs.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::types::{IncomingRecords, NodeId};
use crate::error::{RecnetError, Result};

/// Thresholds for persistent-link extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistentConfig {
    /// Only positions below this count as a presence.
    pub cutoff: u32,
    /// Minimum mean daily views of the target.
    pub min_target_mean_views: f64,
    /// Source mean must be at least this fraction of the target mean.
    pub min_source_ratio: f64,
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self {
            cutoff: 15,
            min_target_mean_views: 100.0,
            min_source_ratio: 0.01,
        }
    }
}

/// The extracted persistent network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentNetwork {
    /// `(source, target)` pairs, ascending by target then source.
    pub links: Vec<(NodeId, NodeId)>,
    pub sources: usize,
    pub targets: usize,
    /// Nodes that are both a source and a target.
    pub overlap: usize,
    /// Unordered pairs linked in both directions.
    pub reciprocal_pairs: usize,
    /// Links between videos of one channel or one genre, when metadata is
    /// available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentOverlap>,
}

/// Per-node content attributes.
pub trait ContentLookup {
    /// Uploading channel, if known.
    fn channel(&self, node: NodeId) -> Option<&str>;

    /// Genres of the node; empty if unknown.
    fn genres(&self, node: NodeId) -> &[String];
}

/// Link counts by shared content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOverlap {
    /// Source and target come from the same channel.
    pub same_artist: usize,
    /// Source and target share at least one genre.
    pub same_genre: usize,
}

/// Counts `links` whose endpoints share a channel or a genre.
#[must_use]
pub fn content_overlap(links: &[(NodeId, NodeId)], content: &impl ContentLookup) -> ContentOverlap {
    let mut overlap = ContentOverlap::default();
    for &(source, target) in links {
        if let (Some(a), Some(b)) = (content.channel(source), content.channel(target)) {
            if a == b {
                overlap.same_artist += 1;
            }
        }
        let target_genres = content.genres(target);
        if content.genres(source).iter().any(|g| target_genres.contains(g)) {
            overlap.same_genre += 1;
        }
    }
    overlap
}

impl PersistentNetwork {
    /// Renders the link list as `Source,Target` CSV.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Source,Target\n");
        for (source, target) in &self.links {
            out.push_str(&format!("{source},{target}\n"));
        }
        out
    }
}

fn window_sum(days: &[bool]) -> usize {
    days.iter().filter(|&&d| d).count()
}

/// Is the daily presence series persistent?
///
/// Requires 2 of the first 4 days, 3 of the first 5, the same at the end
/// of the window, and at least 4 presences in every centred 7-day window.
#[must_use]
pub fn is_persistent_link(presence: &[bool]) -> bool {
    let n = presence.len();
    let head = |k: usize| window_sum(presence.get(..k.min(n)).unwrap_or_default());
    let tail = |k: usize| window_sum(presence.get(n.saturating_sub(k)..).unwrap_or_default());

    if head(4) < 2 || head(5) < 3 || tail(4) < 2 || tail(5) < 3 {
        return false;
    }

    (3..n.saturating_sub(4)).all(|i| {
        let window = presence.get(i - 3..i + 4).unwrap_or_default();
        window_sum(window) >= 4
    })
}

/// Extracts persistent links from a sequence of daily snapshots.
///
/// `mean_views` is indexed by node id and must cover every snapshot's
/// universe.
///
/// # Errors
/// Returns `DataIntegrity` if snapshots disagree on the universe size or a
/// record references a node outside it.
pub fn extract(
    days: &[IncomingRecords],
    mean_views: &[f64],
    config: &PersistentConfig,
) -> Result<PersistentNetwork> {
    let presence = collect_presence(days, mean_views.len(), config.cutoff)?;

    let mut kept: BTreeSet<(NodeId, NodeId)> = BTreeSet::new();
    for (&(target, source), series) in &presence {
        if is_persistent_link(series) && passes_view_filter(source, target, mean_views, config) {
            kept.insert((target, source));
        }
    }

    Ok(summarize(kept.into_iter().map(|(t, s)| (s, t)).collect()))
}

fn collect_presence(
    days: &[IncomingRecords],
    universe: usize,
    cutoff: u32,
) -> Result<BTreeMap<(NodeId, NodeId), Vec<bool>>> {
    let mut presence: BTreeMap<(NodeId, NodeId), Vec<bool>> = BTreeMap::new();

    for (day, records) in days.iter().enumerate() {
        if records.universe_size() != universe {
            return Err(RecnetError::integrity(format!(
                "day {day} has {} nodes, expected {universe}",
                records.universe_size()
            )));
        }
        for entry in records.targets() {
            for record in entry.incoming.iter().filter(|r| r.position < cutoff) {
                if record.source as usize >= universe || entry.target as usize >= universe {
                    return Err(RecnetError::integrity(format!(
                        "day {day}: edge {} → {} outside [0, {universe})",
                        record.source, entry.target
                    )));
                }
                let series = presence
                    .entry((entry.target, record.source))
                    .or_insert_with(|| vec![false; days.len()]);
                if let Some(slot) = series.get_mut(day) {
                    *slot = true;
                }
            }
        }
    }

    Ok(presence)
}

fn passes_view_filter(
    source: NodeId,
    target: NodeId,
    mean_views: &[f64],
    config: &PersistentConfig,
) -> bool {
    let source_mean = mean_views.get(source as usize).copied().unwrap_or(0.0);
    let target_mean = mean_views.get(target as usize).copied().unwrap_or(0.0);
    target_mean >= config.min_target_mean_views
        && source_mean >= config.min_source_ratio * target_mean
}

fn summarize(links: Vec<(NodeId, NodeId)>) -> PersistentNetwork {
    let sources: HashSet<NodeId> = links.iter().map(|&(s, _)| s).collect();
    let targets: HashSet<NodeId> = links.iter().map(|&(_, t)| t).collect();
    let edge_set: HashSet<(NodeId, NodeId)> = links.iter().copied().collect();

    let reciprocal_pairs = links
        .iter()
        .filter(|&&(s, t)| s < t && edge_set.contains(&(t, s)))
        .count();

    PersistentNetwork {
        sources: sources.len(),
        targets: targets.len(),
        overlap: sources.intersection(&targets).count(),
        reciprocal_pairs,
        links,
        content: None,
    }
}
