//! Configuration and constants for the CLI.

use crate::aggregator::RankOrder;
use crate::estimator::MleOptions;
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default number of hottest keys listed per operation class
pub const DEFAULT_TOP_K: usize = 10;

/// Upper bound accepted for `top_k`
pub const MAX_TOP_K: usize = 10_000;

/// Positive floor for normalized ranks. A Beta likelihood is undefined at 0,
/// and the key of rank 0 would otherwise normalize to exactly 0.
pub const RANK_FLOOR: f64 = f64::EPSILON;

// Newton optimizer defaults for the MLE fit
pub const MLE_TOLERANCE: f64 = 1e-10;
pub const MLE_MAX_ITERATIONS: usize = 200;
pub const MLE_MAX_SHAPE: f64 = 1e7;

/// Share of touched keys counted as "hot" in concentration metrics
pub const HOT_KEY_FRACTION: f64 = 0.1;

/// Settings for one analysis run
///
/// Every field has a default, so a settings file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Number of hottest keys listed per operation class
    pub top_k: usize,

    /// How keys are ranked before normalization
    pub rank_order: RankOrder,

    /// Also estimate a Beta fit for inserts
    pub include_inserts: bool,

    /// Optimizer settings for the maximum likelihood fit
    pub mle: MleOptions,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            rank_order: RankOrder::Insertion,
            include_inserts: false,
            mle: MleOptions::default(),
        }
    }
}

impl SkewConfig {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be greater than 0".to_string()));
        }
        if self.top_k > MAX_TOP_K {
            return Err(ConfigError::Invalid(format!(
                "top_k is too large (max {})",
                MAX_TOP_K
            )));
        }
        if !(self.mle.tolerance.is_finite() && self.mle.tolerance > 0.0) {
            return Err(ConfigError::Invalid(
                "mle.tolerance must be a positive number".to_string(),
            ));
        }
        if self.mle.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "mle.max_iterations must be greater than 0".to_string(),
            ));
        }
        if !(self.mle.max_shape > 1.0) {
            return Err(ConfigError::Invalid(
                "mle.max_shape must be greater than 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("skew.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SkewConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading settings from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: SkewConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SkewConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "top_k = 3\nrank_order = \"popularity\"\n\n[mle]\nmax_iterations = 50").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.rank_order, RankOrder::Popularity);
        assert_eq!(config.mle.max_iterations, 50);
        assert_eq!(config.mle.tolerance, MLE_TOLERANCE);
        assert!(!config.include_inserts);
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "top_k = 0").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "top_k = = 3").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
