//! Evaluation Harness
//!
//! A [`Harness`] flattens a corpus into one [`TestCase`] per trace, in corpus
//! order, and is consumed by a run. Evaluating a changed corpus needs a new
//! harness.

use super::summary::ScoreSummary;
use crate::classify::classifier::Classifier;
use crate::trace::repository::TraceSource;
use crate::trace::types::{Label, Trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Numeric code reported for an unrecognized trace
pub const UNRECOGNIZED_CODE: i32 = -1;

/// Numeric code reported for a trace that could not be classified
pub const ERROR_CODE: i32 = -2;

/// What a classifier produced for one trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A digit was returned
    Recognized(Label),
    /// No pattern matched
    Unrecognized,
    /// The trace could not be classified (e.g. too few points)
    Failed(String),
}

impl Outcome {
    pub fn from_result(result: crate::Result<Option<Label>>) -> Self {
        match result {
            Ok(Some(label)) => Outcome::Recognized(label),
            Ok(None) => Outcome::Unrecognized,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            Outcome::Recognized(label) => Some(*label),
            _ => None,
        }
    }

    /// Digit value, or [`UNRECOGNIZED_CODE`] / [`ERROR_CODE`]
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Recognized(label) => label.value() as i32,
            Outcome::Unrecognized => UNRECOGNIZED_CODE,
            Outcome::Failed(_) => ERROR_CODE,
        }
    }
}

/// One trace with its expected label and, once run, the outcome
#[derive(Debug, Clone)]
pub struct TestCase<'c> {
    pub expected: Label,
    pub trace: &'c Trace,
    outcome: Option<Outcome>,
}

impl<'c> TestCase<'c> {
    pub fn new(expected: Label, trace: &'c Trace) -> Self {
        Self {
            expected,
            trace,
            outcome: None,
        }
    }

    /// Classify the trace. Classifier errors become [`Outcome::Failed`].
    pub fn run(&mut self, classifier: &dyn Classifier) -> &Outcome {
        let outcome = Outcome::from_result(classifier.classify(self.trace));

        match &outcome {
            Outcome::Failed(error) => {
                warn!(expected = %self.expected, points = self.trace.len(), error = %error, "Trace could not be classified");
            }
            Outcome::Recognized(actual) if *actual != self.expected => {
                debug!(expected = %self.expected, actual = %actual, "Misclassified trace");
            }
            _ => {}
        }

        self.outcome.insert(outcome)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn passed(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Recognized(actual)) if actual == self.expected)
    }
}

/// Finished evaluation: every case has an outcome
#[derive(Debug, Clone)]
pub struct EvaluationRun<'c> {
    /// Name of the classifier that produced the outcomes
    pub classifier: String,
    pub cases: Vec<TestCase<'c>>,
    pub summary: ScoreSummary,
}

impl<'c> EvaluationRun<'c> {
    pub fn failures(&self) -> impl Iterator<Item = &TestCase<'c>> {
        self.cases.iter().filter(|c| !c.passed())
    }
}

/// Single-use evaluation over one corpus snapshot
#[derive(Debug)]
pub struct Harness<'c> {
    labels: Vec<Label>,
    cases: Vec<TestCase<'c>>,
}

impl<'c> Harness<'c> {
    /// One test case per `(label, trace)` pair in corpus order
    pub fn new<S: TraceSource + ?Sized>(source: &'c S) -> Self {
        let corpus = source.traces();
        let cases = corpus
            .iter()
            .map(|(label, trace)| TestCase::new(label, trace))
            .collect();
        Self {
            labels: corpus.labels().collect(),
            cases,
        }
    }

    /// Summary holding an empty score for every corpus label, so labels
    /// without traces still show up as having no data
    fn seeded_summary(&self) -> ScoreSummary {
        let mut summary = ScoreSummary::new();
        for label in &self.labels {
            summary.ensure_label(*label);
        }
        summary
    }

    pub fn cases(&self) -> &[TestCase<'c>] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Classify every case in order
    pub fn run(mut self, classifier: &dyn Classifier) -> EvaluationRun<'c> {
        info!(classifier = classifier.name(), cases = self.cases.len(), "Starting evaluation");

        let mut summary = self.seeded_summary();
        for case in &mut self.cases {
            case.run(classifier);
            summary.record_case(case);
        }

        self.finish(classifier, summary)
    }

    /// Classify cases across the rayon thread pool. Each worker folds a
    /// partial summary; partials are merged at the end.
    pub fn run_parallel(mut self, classifier: &dyn Classifier) -> EvaluationRun<'c> {
        info!(classifier = classifier.name(), cases = self.cases.len(), "Starting parallel evaluation");

        let seeded = self.seeded_summary();
        let summary = self
            .cases
            .par_iter_mut()
            .fold(ScoreSummary::new, |mut partial, case| {
                case.run(classifier);
                partial.record_case(case);
                partial
            })
            .reduce(ScoreSummary::new, ScoreSummary::merge)
            .merge(seeded);

        self.finish(classifier, summary)
    }

    fn finish(self, classifier: &dyn Classifier, summary: ScoreSummary) -> EvaluationRun<'c> {
        info!(
            classifier = classifier.name(),
            passed = summary.passed_count(),
            total = summary.total_count(),
            errors = summary.error_count(),
            "Evaluation complete"
        );

        EvaluationRun {
            classifier: classifier.name().to_string(),
            cases: self.cases,
            summary,
        }
    }
}

/// Evaluate a classifier over a corpus in one call
pub fn evaluate<S: TraceSource + ?Sized>(source: &S, classifier: &dyn Classifier) -> ScoreSummary {
    Harness::new(source).run(classifier).summary
}
