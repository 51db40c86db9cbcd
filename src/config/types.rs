// src/config/types.rs
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::graph::persistent::PersistentConfig;

/// Where input data lives and where runs are logged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_views_path")]
    pub views_path: PathBuf,
    /// Optional; enables channel and genre counts on persistent links.
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    #[serde(default = "default_recsys_dir")]
    pub recsys_dir: PathBuf,
    #[serde(default = "default_run_log")]
    pub run_log: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            views_path: default_views_path(),
            metadata_path: default_metadata_path(),
            snapshot_dir: default_snapshot_dir(),
            recsys_dir: default_recsys_dir(),
            run_log: default_run_log(),
        }
    }
}

fn default_views_path() -> PathBuf { PathBuf::from("data/vevo_forecast_data_60k.tsv") }
fn default_metadata_path() -> PathBuf { PathBuf::from("data/vevo_en_videos_60k.json") }
fn default_snapshot_dir() -> PathBuf { PathBuf::from("data/network_snapshots") }
fn default_recsys_dir() -> PathBuf { PathBuf::from("data/recsys") }
fn default_run_log() -> PathBuf { PathBuf::from(".recnet/runs.jsonl") }

/// Observation window and cutoff sweep bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_base_date")]
    pub base_date: NaiveDate,
    #[serde(default = "default_num_days")]
    pub num_days: usize,
    #[serde(default = "default_cutoff")]
    pub cutoff: u32,
    #[serde(default = "default_cutoff_min")]
    pub cutoff_min: u32,
    #[serde(default = "default_cutoff_max")]
    pub cutoff_max: u32,
    /// Day used by the cutoff sweep.
    #[serde(default = "default_reference_day")]
    pub reference_day: usize,
    /// Recommendation list positions kept when extracting snapshots.
    #[serde(default = "default_max_position")]
    pub max_position: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base_date: default_base_date(),
            num_days: default_num_days(),
            cutoff: default_cutoff(),
            cutoff_min: default_cutoff_min(),
            cutoff_max: default_cutoff_max(),
            reference_day: default_reference_day(),
            max_position: default_max_position(),
        }
    }
}

fn default_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 9, 1).unwrap_or_default()
}
const fn default_num_days() -> usize { 63 }
const fn default_cutoff() -> u32 { 15 }
const fn default_cutoff_min() -> u32 { 5 }
const fn default_cutoff_max() -> u32 { 50 }
const fn default_reference_day() -> usize { 30 }
const fn default_max_position() -> usize { 50 }

/// The `recnet.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecnetToml {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub persistent: PersistentConfig,
}
