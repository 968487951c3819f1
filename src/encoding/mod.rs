//! Trace-to-symbol encoding
//!
//! Turns a point sequence into a compact string of direction symbols:
//! - motion angle per consecutive point pair
//! - quantization into `K` equal-width buckets under a rotation offset
//! - run-length collapsing of repeated buckets

pub mod direction;
pub mod debug;

pub use direction::{Alphabet, DirectionEncoder};
pub use debug::{CollectingSink, DebugSink, NoopSink, TracingSink};
