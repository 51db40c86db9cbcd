// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::types::{DataConfig, RecnetToml, SweepConfig};

use std::path::Path;

use crate::error::{RecnetError, Result};
use crate::graph::persistent::PersistentConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "recnet.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    pub sweep: SweepConfig,
    pub persistent: PersistentConfig,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if the loaded values fail [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        let config = match io::load_toml_config(path)? {
            Some(parsed) => Self::from_toml(parsed),
            None => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::new()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses config content.
    ///
    /// # Errors
    /// Returns `Toml` for malformed content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        io::parse_toml(content).map(Self::from_toml)
    }

    fn from_toml(parsed: RecnetToml) -> Self {
        Self {
            data: parsed.data,
            sweep: parsed.sweep,
            persistent: parsed.persistent,
        }
    }

    /// Validates configuration.
    ///
    /// # Errors
    /// Returns `Other` if the cutoff range is inverted or a cutoff is zero.
    pub fn validate(&self) -> Result<()> {
        let sweep = &self.sweep;
        if sweep.cutoff == 0 || sweep.cutoff_min == 0 {
            return Err(RecnetError::Other("cutoffs must be at least 1".into()));
        }
        if sweep.cutoff_min > sweep.cutoff_max {
            return Err(RecnetError::Other(format!(
                "cutoff_min {} exceeds cutoff_max {}",
                sweep.cutoff_min, sweep.cutoff_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sweep.cutoff, 15);
        assert_eq!(config.sweep.num_days, 63);
        assert_eq!(config.persistent.min_target_mean_views, 100.0);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::parse_toml(
            "[sweep]\ncutoff = 20\nbase_date = \"2019-01-01\"\n[persistent]\ncutoff = 10\n",
        )
        .unwrap();
        assert_eq!(config.sweep.cutoff, 20);
        assert_eq!(config.sweep.cutoff_max, 50);
        assert_eq!(config.sweep.base_date.to_string(), "2019-01-01");
        assert_eq!(config.persistent.cutoff, 10);
        assert_eq!(config.persistent.min_source_ratio, 0.01);
    }

    #[test]
    fn test_malformed_toml_fails() {
        assert!(matches!(
            Config::parse_toml("[sweep\ncutoff = "),
            Err(RecnetError::Toml(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = Config::new();
        config.sweep.cutoff_min = 30;
        config.sweep.cutoff_max = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[sweep]\ncutoff = 25\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().sweep.cutoff, 25);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[sweep]\ncutoff = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
