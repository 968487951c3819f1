//! # Trace Classifier
//!
//! Recognizes handwritten digits recorded as timestamped point sequences.
//!
//! ## Overview
//!
//! A trace is reduced to a short symbolic string: every pair of consecutive
//! points yields a motion direction, directions are quantized into `K`
//! angular buckets, and repeated buckets collapse into one symbol. The string
//! is then matched against hand-authored per-digit regular expressions, in
//! ascending digit order, and the first match wins.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trace_classifier::{ClassifierConfig, Label, PatternClassifier, PatternTable, Trace};
//! use trace_classifier::classify::Classifier;
//!
//! let mut patterns = PatternTable::new();
//! patterns.push(Label::new(7).unwrap(), "^01$").unwrap();
//!
//! let config = ClassifierConfig {
//!     direction_count: 4,
//!     rotation_offset: Some(45.0),
//!     ..Default::default()
//! };
//! let classifier = PatternClassifier::new(config, patterns).unwrap();
//!
//! let trace = Trace::builder(chrono::NaiveDate::from_ymd_opt(2016, 1, 10).unwrap(), 0)
//!     .point(0.0, 0.0, 0.0)
//!     .point(0.0, -1.0, 1.0)
//!     .point(1.0, -1.0, 2.0)
//!     .build();
//!
//! assert_eq!(classifier.classify(&trace).unwrap(), Label::new(7).ok());
//! ```
//!
//! ## Architecture
//!
//! - [`trace`]: points, traces, labels, corpora and the on-disk repository
//! - [`encoding`]: direction quantization and the injectable debug sink
//! - [`classify`]: compiled pattern table and classifiers
//! - [`evaluation`]: test-case harness and score summaries
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Corpus    │───▶│  Direction  │───▶│   Pattern   │───▶│   Score     │
//! │ label→trace │    │   Encoder   │    │    Table    │    │  Summary    │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod trace;
pub mod encoding;
pub mod classify;
pub mod evaluation;
pub mod app;

// Re-export commonly used types
pub use trace::types::{Label, Point, Trace, TraceBuilder};
pub use trace::corpus::Corpus;
pub use trace::repository::{FileTraceRepository, TraceSource};
pub use encoding::direction::{Alphabet, DirectionEncoder};
pub use encoding::debug::DebugSink;
pub use classify::pattern::{CompiledPattern, PatternTable};
pub use classify::classifier::{ClassifierConfig, PatternClassifier, RandomClassifier};
pub use evaluation::harness::{evaluate, EvaluationRun, Harness, Outcome, TestCase};
pub use evaluation::summary::{LabelScore, ScoreSummary};

/// Result type alias for the trace classifier
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the trace classifier
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Trace has {found} point(s), at least 2 are required for encoding")]
    InsufficientPoints { found: usize },

    #[error("Corpus contains no test cases")]
    EmptyCorpus,

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Pattern {pattern:?} for digit {label} failed to compile: {source}")]
    Pattern {
        label: Label,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trace format error in {path}: {message}")]
    TraceFormat { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
