//! Score aggregation
//!
//! Summaries only hold counts. Rates are derived on demand and are `None`
//! when there is nothing to divide by.

use super::harness::{Outcome, TestCase};
use crate::trace::types::Label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 * 100.0 / total as f64)
    }
}

/// Results for one expected label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Cases classified as the expected label
    pub passed: usize,
    /// All cases with this expected label
    pub total: usize,
    /// Cases no pattern matched
    pub unrecognized: usize,
    /// Cases that could not be classified at all
    pub errors: usize,
    /// Wrong digit produced -> occurrences. Unrecognized and failed cases
    /// are not confusions and never appear here.
    pub confusion: BTreeMap<Label, usize>,
}

impl LabelScore {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Fraction of cases passed, in `[0, 1]`
    pub fn pass_rate(&self) -> Option<f64> {
        percentage(self.passed, self.total).map(|p| p / 100.0)
    }

    pub fn passed_percentage(&self) -> Option<f64> {
        percentage(self.passed, self.total)
    }

    pub fn failed_percentage(&self) -> Option<f64> {
        percentage(self.failed(), self.total)
    }

    fn record(&mut self, expected: Label, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Recognized(actual) if *actual == expected => self.passed += 1,
            Outcome::Recognized(actual) => *self.confusion.entry(*actual).or_insert(0) += 1,
            Outcome::Unrecognized => self.unrecognized += 1,
            Outcome::Failed(_) => self.errors += 1,
        }
    }

    fn merge(&mut self, other: LabelScore) {
        self.passed += other.passed;
        self.total += other.total;
        self.unrecognized += other.unrecognized;
        self.errors += other.errors;
        for (label, count) in other.confusion {
            *self.confusion.entry(label).or_insert(0) += count;
        }
    }
}

/// Aggregate results of one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    passed: usize,
    total: usize,
    unrecognized: usize,
    errors: usize,
    per_label: BTreeMap<Label, LabelScore>,
}

impl ScoreSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary of the executed cases; cases that were never run are ignored
    pub fn from_cases(cases: &[TestCase<'_>]) -> Self {
        cases.iter().fold(Self::new(), |mut summary, case| {
            summary.record_case(case);
            summary
        })
    }

    /// Add one outcome
    pub fn record(&mut self, expected: Label, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Recognized(actual) if *actual == expected => self.passed += 1,
            Outcome::Recognized(_) => {}
            Outcome::Unrecognized => self.unrecognized += 1,
            Outcome::Failed(_) => self.errors += 1,
        }
        self.per_label.entry(expected).or_default().record(expected, outcome);
    }

    /// Report `label` even if no case for it is ever recorded
    pub fn ensure_label(&mut self, label: Label) {
        self.per_label.entry(label).or_default();
    }

    pub fn record_case(&mut self, case: &TestCase<'_>) {
        if let Some(outcome) = case.outcome() {
            self.record(case.expected, outcome);
        }
    }

    /// Combine two partial summaries. Commutative and associative, so
    /// partials from parallel workers can be merged in any order.
    pub fn merge(mut self, other: ScoreSummary) -> ScoreSummary {
        self.passed += other.passed;
        self.total += other.total;
        self.unrecognized += other.unrecognized;
        self.errors += other.errors;
        for (label, score) in other.per_label {
            self.per_label.entry(label).or_default().merge(score);
        }
        self
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    pub fn failed_count(&self) -> usize {
        self.total - self.passed
    }

    pub fn total_count(&self) -> usize {
        self.total
    }

    pub fn unrecognized_count(&self) -> usize {
        self.unrecognized
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn passed_percentage(&self) -> Option<f64> {
        percentage(self.passed, self.total)
    }

    pub fn failed_percentage(&self) -> Option<f64> {
        percentage(self.failed_count(), self.total)
    }

    pub fn label(&self, label: Label) -> Option<&LabelScore> {
        self.per_label.get(&label)
    }

    /// Per-label scores in ascending label order
    pub fn labels(&self) -> impl Iterator<Item = (Label, &LabelScore)> {
        self.per_label.iter().map(|(l, s)| (*l, s))
    }

    pub fn has_data(&self) -> bool {
        self.total > 0
    }

    /// `Err(EmptyCorpus)` when no case was evaluated
    pub fn ensure_data(&self) -> crate::Result<()> {
        if self.has_data() {
            Ok(())
        } else {
            Err(crate::Error::EmptyCorpus)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: u8) -> Label {
        Label::new(value).unwrap()
    }

    #[test]
    fn test_empty_summary_has_no_rates() {
        let summary = ScoreSummary::new();
        assert!(!summary.has_data());
        assert_eq!(summary.passed_percentage(), None);
        assert_eq!(summary.failed_percentage(), None);
        assert!(matches!(summary.ensure_data(), Err(crate::Error::EmptyCorpus)));
        assert_eq!(LabelScore::default().pass_rate(), None);
    }

    #[test]
    fn test_record_outcomes() {
        let mut summary = ScoreSummary::new();
        summary.record(label(0), &Outcome::Recognized(label(0)));
        summary.record(label(0), &Outcome::Recognized(label(6)));
        summary.record(label(0), &Outcome::Recognized(label(6)));
        summary.record(label(0), &Outcome::Unrecognized);
        summary.record(label(2), &Outcome::Failed("too short".to_string()));

        assert_eq!(summary.total_count(), 5);
        assert_eq!(summary.passed_count(), 1);
        assert_eq!(summary.failed_count(), 4);
        assert_eq!(summary.unrecognized_count(), 1);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.passed_percentage(), Some(20.0));
        assert_eq!(summary.failed_percentage(), Some(80.0));

        let zero = summary.label(label(0)).unwrap();
        assert_eq!(zero.total, 4);
        assert_eq!(zero.passed, 1);
        assert_eq!(zero.pass_rate(), Some(0.25));
        assert_eq!(zero.confusion.get(&label(6)), Some(&2));
        assert_eq!(zero.confusion.len(), 1);

        let two = summary.label(label(2)).unwrap();
        assert_eq!(two.errors, 1);
        assert!(two.confusion.is_empty());
        assert_eq!(two.failed_percentage(), Some(100.0));
    }

    #[test]
    fn test_merge_matches_sequential_record() {
        let outcomes = vec![
            (label(1), Outcome::Recognized(label(1))),
            (label(1), Outcome::Recognized(label(7))),
            (label(7), Outcome::Recognized(label(1))),
            (label(7), Outcome::Unrecognized),
            (label(3), Outcome::Failed("x".to_string())),
            (label(1), Outcome::Recognized(label(7))),
        ];

        let mut whole = ScoreSummary::new();
        for (expected, outcome) in &outcomes {
            whole.record(*expected, outcome);
        }

        let (left, right) = outcomes.split_at(2);
        let mut a = ScoreSummary::new();
        left.iter().for_each(|(e, o)| a.record(*e, o));
        let mut b = ScoreSummary::new();
        right.iter().for_each(|(e, o)| b.record(*e, o));

        assert_eq!(a.clone().merge(b.clone()), whole);
        assert_eq!(b.merge(a), whole);
    }

    #[test]
    fn test_labels_iterate_ascending() {
        let mut summary = ScoreSummary::new();
        summary.record(label(9), &Outcome::Unrecognized);
        summary.record(label(2), &Outcome::Unrecognized);
        summary.record(label(5), &Outcome::Unrecognized);

        let order: Vec<u8> = summary.labels().map(|(l, _)| l.value()).collect();
        assert_eq!(order, vec![2, 5, 9]);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut summary = ScoreSummary::new();
        summary.record(label(0), &Outcome::Recognized(label(1)));

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"per_label\""));
        let back: ScoreSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
