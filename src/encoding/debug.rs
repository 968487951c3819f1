//! Debug observation of encoding and matching
//!
//! Encoders and classifiers never keep debug state of their own. Callers that
//! want to see intermediate decisions pass a [`DebugSink`] into the call.

use crate::trace::types::{Label, Point};

/// Receives intermediate encoding and classification decisions
pub trait DebugSink {
    /// One point pair was quantized
    fn segment(&mut self, _from: &Point, _to: &Point, _angle: f64, _direction: u32) {}

    /// A trace finished encoding
    fn encoded(&mut self, _encoded: &str) {}

    /// A pattern matched the encoded string
    fn matched(&mut self, _label: Label, _pattern: &str) {}

    /// No pattern matched the encoded string
    fn unmatched(&mut self, _encoded: &str) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DebugSink for NoopSink {}

/// Forwards decisions to `tracing` at debug/trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn segment(&mut self, from: &Point, to: &Point, angle: f64, direction: u32) {
        tracing::trace!(
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            angle,
            direction,
            "Quantized segment"
        );
    }

    fn encoded(&mut self, encoded: &str) {
        tracing::debug!(encoded, "Encoded trace");
    }

    fn matched(&mut self, label: Label, pattern: &str) {
        tracing::debug!(label = %label, pattern, "Pattern matched");
    }

    fn unmatched(&mut self, encoded: &str) {
        tracing::debug!(encoded, "No pattern matched");
    }
}

/// One quantized point pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRecord {
    pub from: Point,
    pub to: Point,
    pub angle: f64,
    pub direction: u32,
}

/// Keeps every decision in memory, for explanations and tests
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub segments: Vec<SegmentRecord>,
    pub encoded: Vec<String>,
    pub matches: Vec<(Label, String)>,
    pub unmatched: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DebugSink for CollectingSink {
    fn segment(&mut self, from: &Point, to: &Point, angle: f64, direction: u32) {
        self.segments.push(SegmentRecord {
            from: *from,
            to: *to,
            angle,
            direction,
        });
    }

    fn encoded(&mut self, encoded: &str) {
        self.encoded.push(encoded.to_string());
    }

    fn matched(&mut self, label: Label, pattern: &str) {
        self.matches.push((label, pattern.to_string()));
    }

    fn unmatched(&mut self, encoded: &str) {
        self.unmatched.push(encoded.to_string());
    }
}
