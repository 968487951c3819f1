//! Classifier evaluation
//!
//! Runs a classifier over every trace of a labelled corpus and aggregates
//! pass/fail counts overall and per expected label, including which wrong
//! digit each misclassification produced.

pub mod harness;
pub mod summary;

pub use harness::{evaluate, EvaluationRun, Harness, Outcome, TestCase};
pub use summary::{LabelScore, ScoreSummary};
