//! Digit classification
//!
//! The pattern classifier encodes a trace and matches the direction string
//! against a table of per-digit regular expressions. Precedence is fixed:
//! digits are tried from 0 to 9 and, within a digit, patterns in the order
//! they were supplied. The first pattern that matches from the start of the
//! string decides the label. Reordering the table changes results for
//! strings that satisfy more than one digit.

pub mod pattern;
pub mod classifier;

pub use pattern::{CompiledPattern, PatternTable};
pub use classifier::{Classifier, ClassifierConfig, PatternClassifier, RandomClassifier};
