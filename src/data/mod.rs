// src/data/mod.rs
//! Data stores feeding the decomposition: snapshots, daily views, raw
//! recommendation lists, and video metadata.

pub mod metadata;
pub mod recsys;
pub mod snapshot;
pub mod views;

pub use metadata::MetadataTable;
pub use snapshot::{MemorySnapshots, SnapshotDir, SnapshotSource};
pub use views::{AttentionSource, FixedAttention, ViewTable};

use chrono::{Days, NaiveDate};

use crate::error::{RecnetError, Result};

/// Calendar date of `day` counted from `base`.
///
/// # Errors
/// Returns `Other` if the date overflows.
pub fn snapshot_date(base: NaiveDate, day: usize) -> Result<NaiveDate> {
    let offset = u64::try_from(day).map_err(|_| RecnetError::Other(format!("day {day} out of range")))?;
    base.checked_add_days(Days::new(offset))
        .ok_or_else(|| RecnetError::Other(format!("day {day} overflows the calendar")))
}
