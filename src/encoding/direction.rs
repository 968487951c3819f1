//! Direction Quantization
//!
//! Each consecutive point pair is reduced to a motion angle measured
//! clockwise from "up" in screen coordinates (y grows downwards), so up is
//! 0°, right 90°, down 180° and left 270°. The angle is shifted by a rotation
//! offset and dropped into one of `K` buckets of width `360 / K`; the lower
//! edge of each bucket is inclusive. With the default offset of half a
//! bucket, bucket 0 is centered on "up".
//!
//! Consecutive pairs that land in the same bucket contribute a single symbol.

use super::debug::{DebugSink, NoopSink};
use crate::trace::types::{Point, Trace};

/// Default symbol set: one ASCII digit per bucket
pub const DEFAULT_ALPHABET: &str = "0123456789";

/// Symbols used for bucket indices, in bucket order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string of distinct symbols
    pub fn new(symbols: &str) -> crate::Result<Self> {
        let chars: Vec<char> = symbols.chars().collect();
        if chars.is_empty() {
            return Err(crate::Error::Config("alphabet must not be empty".to_string()));
        }
        for (i, c) in chars.iter().enumerate() {
            if chars[..i].contains(c) {
                return Err(crate::Error::Config(format!(
                    "alphabet symbol {:?} appears more than once",
                    c
                )));
            }
        }
        Ok(Self { symbols: chars })
    }

    /// The ASCII digits `0` to `9`
    pub fn digits() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol for a bucket index
    pub fn symbol(&self, bucket: u32) -> Option<char> {
        self.symbols.get(bucket as usize).copied()
    }

    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::digits()
    }
}

/// Converts traces into run-length-collapsed direction strings
#[derive(Debug, Clone)]
pub struct DirectionEncoder {
    direction_count: u32,
    rotation_offset: f64,
    alphabet: Alphabet,
}

impl DirectionEncoder {
    /// Create an encoder with `direction_count` buckets and the default
    /// half-bucket rotation
    pub fn new(direction_count: u32) -> crate::Result<Self> {
        let offset = if direction_count > 0 {
            Self::default_rotation(direction_count)
        } else {
            0.0
        };
        Self::with_rotation(direction_count, offset)
    }

    /// Create an encoder with an explicit rotation offset in degrees
    pub fn with_rotation(direction_count: u32, rotation_offset: f64) -> crate::Result<Self> {
        Self::with_alphabet(direction_count, rotation_offset, Alphabet::digits())
    }

    /// Create an encoder with a custom symbol alphabet. The alphabet needs
    /// at least one symbol per bucket.
    pub fn with_alphabet(
        direction_count: u32,
        rotation_offset: f64,
        alphabet: Alphabet,
    ) -> crate::Result<Self> {
        if direction_count == 0 {
            return Err(crate::Error::Config("direction_count must be > 0".to_string()));
        }
        if !rotation_offset.is_finite() {
            return Err(crate::Error::Config(format!(
                "rotation_offset must be finite, got {}",
                rotation_offset
            )));
        }
        if direction_count as usize > alphabet.len() {
            return Err(crate::Error::Config(format!(
                "direction_count {} exceeds the {} symbol alphabet {:?}",
                direction_count,
                alphabet.len(),
                alphabet.as_string()
            )));
        }

        Ok(Self {
            direction_count,
            rotation_offset,
            alphabet,
        })
    }

    /// Half a bucket width: centers bucket 0 on "up"
    pub fn default_rotation(direction_count: u32) -> f64 {
        180.0 / direction_count as f64
    }

    pub fn direction_count(&self) -> u32 {
        self.direction_count
    }

    pub fn rotation_offset(&self) -> f64 {
        self.rotation_offset
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Angular width of one bucket in degrees
    pub fn bucket_width(&self) -> f64 {
        360.0 / self.direction_count as f64
    }

    /// Motion angle from `from` to `to` in `[0, 360)`, 0 = up
    pub fn angle(from: &Point, to: &Point) -> f64 {
        let (dx, dy) = from.delta_to(to);
        let angle = (90.0 + dy.atan2(dx).to_degrees()).rem_euclid(360.0);
        // rem_euclid rounds tiny negative values up to exactly 360
        if angle >= 360.0 {
            0.0
        } else {
            angle
        }
    }

    /// Bucket index for an angle
    pub fn quantize(&self, angle: f64) -> u32 {
        let rotated = (angle + self.rotation_offset).rem_euclid(360.0);
        let bucket = (rotated / self.bucket_width()).floor() as u32;
        // rem_euclid may round up to exactly 360.0
        bucket % self.direction_count
    }

    /// Bucket index for a point pair
    pub fn direction(&self, from: &Point, to: &Point) -> u32 {
        self.quantize(Self::angle(from, to))
    }

    /// Encode a trace
    pub fn encode(&self, trace: &Trace) -> crate::Result<String> {
        self.encode_with(trace, &mut NoopSink)
    }

    /// Encode a trace, reporting every quantized segment to `sink`
    pub fn encode_with(&self, trace: &Trace, sink: &mut dyn DebugSink) -> crate::Result<String> {
        if trace.len() < 2 {
            return Err(crate::Error::InsufficientPoints { found: trace.len() });
        }

        let mut encoded = String::new();
        let mut last: Option<u32> = None;

        for (from, to) in trace.segments() {
            let angle = Self::angle(from, to);
            let direction = self.quantize(angle);
            sink.segment(from, to, angle, direction);

            if last != Some(direction) {
                if let Some(symbol) = self.alphabet.symbol(direction) {
                    encoded.push(symbol);
                }
                last = Some(direction);
            }
        }

        sink.encoded(&encoded);
        Ok(encoded)
    }
}
