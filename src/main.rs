//! Workload Skew CLI
//!
//! Estimates key-access skew of key-value operation traces as Beta
//! distributions and compares the resulting reports.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use workload_skew::aggregator::RankOrder;
use workload_skew::commands::{
    display_schema, display_version, execute_analyze, execute_compare, validate_args,
    validate_report_file, AnalyzeArgs, CompareArgs,
};

/// Workload Skew - Beta estimates of key-access skew
#[derive(Parser, Debug)]
#[command(name = "workload-skew")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Key ordering accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
enum RankOrderArg {
    Insertion,
    Popularity,
}

impl From<RankOrderArg> for RankOrder {
    fn from(arg: RankOrderArg) -> Self {
        match arg {
            RankOrderArg::Insertion => RankOrder::Insertion,
            RankOrderArg::Popularity => RankOrder::Popularity,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate access skew of a trace
    Analyze {
        /// Path to the operation trace
        #[arg(short, long)]
        trace: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "skew.json")]
        output: PathBuf,

        /// Number of hottest keys listed per operation class
        #[arg(long)]
        top_k: Option<usize>,

        /// Key ordering used for normalization
        #[arg(long, value_enum)]
        rank_order: Option<RankOrderArg>,

        /// Also fit a Beta distribution to inserts
        #[arg(long)]
        include_inserts: bool,

        /// TOML settings file
        #[arg(short, long, env = "WORKLOAD_SKEW_CONFIG")]
        config: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Compare two skew reports
    Compare {
        /// Baseline report JSON
        #[arg(short, long)]
        baseline: PathBuf,

        /// Target report JSON
        #[arg(short, long)]
        target: PathBuf,

        /// Path to write the comparison JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a human-readable summary to the terminal
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            trace,
            output,
            top_k,
            rank_order,
            include_inserts,
            config,
            summary,
        } => {
            let args = AnalyzeArgs {
                trace,
                output,
                top_k,
                rank_order: rank_order.map(RankOrder::from),
                include_inserts,
                config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Compare {
            baseline,
            target,
            output,
            summary,
        } => {
            execute_compare(CompareArgs {
                baseline,
                target,
                output,
                summary,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
