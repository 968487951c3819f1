//! Classifiers

use super::pattern::PatternTable;
use crate::encoding::debug::{DebugSink, NoopSink, TracingSink};
use crate::encoding::direction::{Alphabet, DirectionEncoder, DEFAULT_ALPHABET};
use crate::trace::types::{Label, Trace};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Maps a trace to a digit.
///
/// `Ok(None)` means the trace was processed but not recognized; `Err` means
/// the trace could not be processed at all.
pub trait Classifier: Sync {
    /// Short name used in reports
    fn name(&self) -> &str;

    fn classify(&self, trace: &Trace) -> crate::Result<Option<Label>>;
}

/// Pattern classifier settings. Fixed once the classifier is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of direction buckets (K)
    pub direction_count: u32,
    /// Rotation offset in degrees; half a bucket width when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_offset: Option<f64>,
    /// Log every encoding and matching decision through `tracing`
    pub debug: bool,
    /// Symbols for bucket indices, at least `direction_count` long
    pub alphabet: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            direction_count: 4,
            rotation_offset: None,
            debug: false,
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Rotation offset actually applied
    pub fn effective_rotation(&self) -> f64 {
        match self.rotation_offset {
            Some(offset) => offset,
            None if self.direction_count > 0 => DirectionEncoder::default_rotation(self.direction_count),
            None => 0.0,
        }
    }

    pub fn build_encoder(&self) -> crate::Result<DirectionEncoder> {
        let alphabet = Alphabet::new(&self.alphabet)?;
        DirectionEncoder::with_alphabet(self.direction_count, self.effective_rotation(), alphabet)
    }
}

/// Direction-string classifier with first-match-wins precedence
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    config: ClassifierConfig,
    encoder: DirectionEncoder,
    patterns: PatternTable,
}

impl PatternClassifier {
    pub fn new(config: ClassifierConfig, patterns: PatternTable) -> crate::Result<Self> {
        let encoder = config.build_encoder()?;
        Ok(Self {
            config,
            encoder,
            patterns,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn encoder(&self) -> &DirectionEncoder {
        &self.encoder
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Direction string for a trace
    pub fn encode(&self, trace: &Trace) -> crate::Result<String> {
        self.encoder.encode(trace)
    }

    /// Label for an already encoded string
    pub fn match_encoded(&self, encoded: &str) -> Option<Label> {
        self.match_encoded_with(encoded, &mut NoopSink)
    }

    fn match_encoded_with(&self, encoded: &str, sink: &mut dyn DebugSink) -> Option<Label> {
        match self.patterns.find_match(encoded) {
            Some((label, pattern)) => {
                sink.matched(label, pattern.as_str());
                Some(label)
            }
            None => {
                sink.unmatched(encoded);
                None
            }
        }
    }

    /// Classify, reporting intermediate decisions to `sink`
    pub fn classify_with(&self, trace: &Trace, sink: &mut dyn DebugSink) -> crate::Result<Option<Label>> {
        let encoded = self.encoder.encode_with(trace, sink)?;
        Ok(self.match_encoded_with(&encoded, sink))
    }
}

impl Classifier for PatternClassifier {
    fn name(&self) -> &str {
        "pattern"
    }

    fn classify(&self, trace: &Trace) -> crate::Result<Option<Label>> {
        if self.config.debug {
            self.classify_with(trace, &mut TracingSink)
        } else {
            self.classify_with(trace, &mut NoopSink)
        }
    }
}

/// Uniformly random digit, as a baseline for evaluation reports
#[derive(Debug)]
pub struct RandomClassifier {
    rng: Mutex<StdRng>,
}

impl RandomClassifier {
    /// Reproducible sequence for a given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl Classifier for RandomClassifier {
    fn name(&self) -> &str {
        "random"
    }

    fn classify(&self, _trace: &Trace) -> crate::Result<Option<Label>> {
        let value = self.rng.lock().gen_range(0..Label::COUNT as u8);
        Ok(Some(Label::new(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::debug::CollectingSink;
    use chrono::NaiveDate;

    fn label(value: u8) -> Label {
        Label::new(value).unwrap()
    }

    fn make_trace(points: &[(f64, f64)]) -> Trace {
        let mut builder = Trace::builder(NaiveDate::from_ymd_opt(2016, 1, 10).unwrap(), 0);
        for (i, (x, y)) in points.iter().enumerate() {
            builder.push(*x, *y, i as f64);
        }
        builder.build()
    }

    fn four_way(patterns: PatternTable) -> PatternClassifier {
        let config = ClassifierConfig {
            direction_count: 4,
            rotation_offset: Some(45.0),
            ..Default::default()
        };
        PatternClassifier::new(config, patterns).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.direction_count, 4);
        assert_eq!(config.effective_rotation(), 45.0);
        assert!(!config.debug);
        assert_eq!(config.alphabet, "0123456789");
    }

    #[test]
    fn test_up_then_right_is_seven() {
        let patterns = PatternTable::new().with_patterns(label(7), &["^01$"]).unwrap();
        let classifier = four_way(patterns);
        let trace = make_trace(&[(0.0, 0.0), (0.0, -1.0), (0.0, -2.0), (1.0, -2.0)]);

        assert_eq!(classifier.encode(&trace).unwrap(), "01");
        assert_eq!(classifier.classify(&trace).unwrap(), Some(label(7)));
    }

    #[test]
    fn test_unmatched_string_is_unrecognized() {
        let patterns = PatternTable::new().with_patterns(label(7), &["^01$"]).unwrap();
        let classifier = four_way(patterns);
        assert_eq!(classifier.match_encoded("99"), None);

        let trace = make_trace(&[(0.0, 0.0), (0.0, 1.0)]);
        assert_eq!(classifier.classify(&trace).unwrap(), None);
    }

    #[test]
    fn test_overlapping_classes_resolve_to_lower_digit() {
        let patterns = PatternTable::new()
            .with_patterns(label(8), &["^0"])
            .unwrap()
            .with_patterns(label(3), &["^01"])
            .unwrap();
        let classifier = four_way(patterns);
        let trace = make_trace(&[(0.0, 0.0), (0.0, -1.0), (1.0, -1.0)]);

        for _ in 0..5 {
            assert_eq!(classifier.classify(&trace).unwrap(), Some(label(3)));
        }
    }

    #[test]
    fn test_insufficient_points_propagate() {
        let classifier = four_way(PatternTable::new());
        let trace = make_trace(&[(0.0, 0.0)]);
        assert!(matches!(
            classifier.classify(&trace),
            Err(crate::Error::InsufficientPoints { found: 1 })
        ));
    }

    #[test]
    fn test_classify_with_reports_match() {
        let patterns = PatternTable::new().with_patterns(label(1), &["^2$"]).unwrap();
        let classifier = four_way(patterns);
        let trace = make_trace(&[(0.0, 0.0), (0.0, 5.0), (0.0, 10.0)]);
        let mut sink = CollectingSink::new();

        let result = classifier.classify_with(&trace, &mut sink).unwrap();

        assert_eq!(result, Some(label(1)));
        assert_eq!(sink.encoded, vec!["2".to_string()]);
        assert_eq!(sink.matches, vec![(label(1), "^2$".to_string())]);
        assert!(sink.unmatched.is_empty());
    }

    #[test]
    fn test_classify_with_reports_no_match() {
        let classifier = four_way(PatternTable::new());
        let trace = make_trace(&[(0.0, 0.0), (5.0, 0.0)]);
        let mut sink = CollectingSink::new();

        assert_eq!(classifier.classify_with(&trace, &mut sink).unwrap(), None);
        assert_eq!(sink.unmatched, vec!["1".to_string()]);
    }

    #[test]
    fn test_debug_flag_does_not_change_result() {
        let patterns = PatternTable::new().with_patterns(label(1), &["^2$"]).unwrap();
        let config = ClassifierConfig {
            debug: true,
            ..Default::default()
        };
        let classifier = PatternClassifier::new(config, patterns).unwrap();
        let trace = make_trace(&[(0.0, 0.0), (0.0, 5.0)]);
        assert_eq!(classifier.classify(&trace).unwrap(), Some(label(1)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassifierConfig {
            direction_count: 16,
            ..Default::default()
        };
        assert!(PatternClassifier::new(config, PatternTable::new()).is_err());

        let config = ClassifierConfig {
            direction_count: 16,
            alphabet: "0123456789abcdef".to_string(),
            ..Default::default()
        };
        let classifier = PatternClassifier::new(config, PatternTable::new()).unwrap();
        assert_eq!(classifier.encoder().rotation_offset(), 11.25);
    }

    #[test]
    fn test_random_classifier_is_seeded() {
        let trace = make_trace(&[(0.0, 0.0), (1.0, 1.0)]);
        let a = RandomClassifier::new(42);
        let b = RandomClassifier::new(42);

        for _ in 0..20 {
            let left = a.classify(&trace).unwrap();
            assert!(left.is_some());
            assert_eq!(left, b.classify(&trace).unwrap());
        }
    }

    #[test]
    fn test_random_classifier_ignores_short_traces() {
        let classifier = RandomClassifier::from_entropy();
        let trace = make_trace(&[]);
        assert!(classifier.classify(&trace).unwrap().is_some());
    }
}
