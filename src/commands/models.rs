use crate::aggregator::RankOrder;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
///
/// Options left as `None` fall back to the settings file, then to the
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the operation trace
    pub trace: PathBuf,

    /// Output path for the JSON report
    pub output: PathBuf,

    /// Number of hottest keys listed per operation class
    pub top_k: Option<usize>,

    /// Key ordering used for normalization
    pub rank_order: Option<RankOrder>,

    /// Also fit inserts
    pub include_inserts: bool,

    /// Optional TOML settings file
    pub config: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::new(),
            output: PathBuf::from("skew.json"),
            top_k: None,
            rank_order: None,
            include_inserts: false,
            config: None,
            print_summary: false,
        }
    }
}

/// Arguments for the compare command
#[derive(Debug, Clone)]
pub struct CompareArgs {
    /// Path to the baseline report JSON
    pub baseline: PathBuf,

    /// Path to the target report JSON
    pub target: PathBuf,

    /// Path to write the comparison JSON
    pub output: Option<PathBuf>,

    /// Print a human-readable summary to the terminal
    pub summary: bool,
}

impl Default for CompareArgs {
    fn default() -> Self {
        Self {
            baseline: PathBuf::new(),
            target: PathBuf::new(),
            output: None,
            summary: true,
        }
    }
}
