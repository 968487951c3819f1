//! Command-Line Interface

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trace Classifier - Recognize handwritten digit traces by stroke direction
#[derive(Parser, Debug)]
#[command(name = "trace-classify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Which classifier to evaluate
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    /// Direction-string pattern classifier
    Pattern,
    /// Uniformly random baseline
    Random,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the direction string of a trace file
    Encode {
        /// Trace file (.trc XML or .json)
        trace: PathBuf,

        /// Show every quantized segment
        #[arg(short, long)]
        explain: bool,
    },

    /// Classify a single trace file
    Classify {
        /// Trace file (.trc XML or .json)
        trace: PathBuf,

        /// Show the encoding and the matching pattern
        #[arg(short, long)]
        explain: bool,
    },

    /// Score a classifier against a labelled trace repository
    Evaluate {
        /// Repository root (one sub-directory per digit)
        #[arg(short = 'd', long)]
        corpus: Option<PathBuf>,

        /// Classifier to evaluate
        #[arg(short = 'k', long, value_enum, default_value = "pattern")]
        classifier: ClassifierKind,

        /// Seed for the random classifier
        #[arg(short, long)]
        seed: Option<u64>,

        /// Classify traces in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// List every failed trace
        #[arg(long)]
        show_failures: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "classifier.direction_count")
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
