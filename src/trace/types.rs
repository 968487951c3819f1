//! Core trace types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used by trace records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Point in 2D space with timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Milliseconds since the start of the trace
    pub t: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    /// Motion vector from this point to `other`
    pub fn delta_to(&self, other: &Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// A digit class in `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Label(u8);

impl Label {
    /// Number of digit classes
    pub const COUNT: usize = 10;

    /// Create a label, rejecting values outside `0..=9`
    pub fn new(value: u8) -> crate::Result<Self> {
        if (value as usize) < Self::COUNT {
            Ok(Self(value))
        } else {
            Err(crate::Error::InvalidLabel(value.to_string()))
        }
    }

    /// All labels in ascending order. This is also the classifier's
    /// precedence order.
    pub fn all() -> impl Iterator<Item = Label> {
        (0..Self::COUNT as u8).map(Label)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Label {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Label::new(value)
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl FromStr for Label {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| crate::Error::InvalidLabel(s.to_string()))?;
        Label::new(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded handwritten digit gesture.
///
/// Points keep the order in which they were recorded. A trace is immutable
/// once built; use [`TraceBuilder`] to assemble one incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    date: NaiveDate,
    ms: u64,
    points: Vec<Point>,
}

impl Trace {
    pub fn new(date: NaiveDate, ms: u64, points: Vec<Point>) -> Self {
        Self { date, ms, points }
    }

    /// Start building a trace point by point
    pub fn builder(date: NaiveDate, ms: u64) -> TraceBuilder {
        TraceBuilder {
            date,
            ms,
            points: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn ms(&self) -> u64 {
        self.ms
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs in recording order
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Elapsed time between the first and last point
    pub fn span(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }
}

/// Incremental trace construction
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    date: NaiveDate,
    ms: u64,
    points: Vec<Point>,
}

impl TraceBuilder {
    /// Append a point
    pub fn point(mut self, x: f64, y: f64, t: f64) -> Self {
        self.points.push(Point::new(x, y, t));
        self
    }

    /// Append a point in place
    pub fn push(&mut self, x: f64, y: f64, t: f64) {
        self.points.push(Point::new(x, y, t));
    }

    pub fn build(self) -> Trace {
        Trace::new(self.date, self.ms, self.points)
    }
}
