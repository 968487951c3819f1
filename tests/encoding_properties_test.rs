//! Property tests for the direction encoder and the classifier precedence

use chrono::NaiveDate;
use proptest::prelude::*;
use trace_classifier::classify::{Classifier, ClassifierConfig, PatternClassifier, PatternTable};
use trace_classifier::{DirectionEncoder, Label, Trace};

fn make_trace(points: &[(f64, f64)]) -> Trace {
    let mut builder = Trace::builder(NaiveDate::from_ymd_opt(2016, 5, 1).unwrap(), 0);
    for (i, (x, y)) in points.iter().enumerate() {
        builder.push(*x, *y, i as f64);
    }
    builder.build()
}

fn points_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 2..40)
}

proptest! {
    #[test]
    fn encode_is_deterministic(
        points in points_strategy(),
        k in 1u32..=10,
        offset in -360.0f64..360.0,
    ) {
        let encoder = DirectionEncoder::with_rotation(k, offset).unwrap();
        let trace = make_trace(&points);
        let first = encoder.encode(&trace).unwrap();
        prop_assert_eq!(encoder.encode(&trace).unwrap(), first);
    }

    #[test]
    fn encoded_symbols_are_in_range_and_never_repeat(
        points in points_strategy(),
        k in 1u32..=10,
    ) {
        let encoder = DirectionEncoder::new(k).unwrap();
        let encoded = encoder.encode(&make_trace(&points)).unwrap();

        prop_assert!(!encoded.is_empty());
        prop_assert!(encoded.len() < points.len());
        for c in encoded.chars() {
            prop_assert!(c.to_digit(10).unwrap() < k);
        }
        let chars: Vec<char> = encoded.chars().collect();
        for pair in chars.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn collinear_trace_collapses_to_one_symbol(
        start in (-100.0f64..100.0, -100.0f64..100.0),
        direction in (-10.0f64..10.0, -10.0f64..10.0),
        steps in prop::collection::vec(0.5f64..20.0, 1..30),
        k in 1u32..=10,
    ) {
        prop_assume!(direction.0.abs() > 1e-3 || direction.1.abs() > 1e-3);

        let mut points = vec![start];
        let mut distance = 0.0;
        for step in &steps {
            distance += step;
            points.push((start.0 + direction.0 * distance, start.1 + direction.1 * distance));
        }

        // Quantize every segment on its own; they must all agree for the
        // collapse property to be meaningful under floating point
        let encoder = DirectionEncoder::new(k).unwrap();
        let trace = make_trace(&points);
        let directions: Vec<u32> = trace.segments().map(|(a, b)| encoder.direction(a, b)).collect();
        prop_assume!(directions.windows(2).all(|w| w[0] == w[1]));

        prop_assert_eq!(encoder.encode(&trace).unwrap().chars().count(), 1);
    }

    #[test]
    fn lower_digit_wins_on_shared_pattern(
        points in points_strategy(),
        low in 0u8..9,
        gap in 1u8..10,
    ) {
        let high = (low + gap).min(9);
        prop_assume!(high > low);

        let patterns = PatternTable::new()
            .with_patterns(Label::new(high).unwrap(), &["^[0-3]+$"])
            .unwrap()
            .with_patterns(Label::new(low).unwrap(), &["^[0-3]"])
            .unwrap();
        let classifier = PatternClassifier::new(ClassifierConfig::default(), patterns).unwrap();

        let result = classifier.classify(&make_trace(&points)).unwrap();
        prop_assert_eq!(result, Some(Label::new(low).unwrap()));
    }
}
