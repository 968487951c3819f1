//! Trace data model
//!
//! Points, traces and digit labels, plus the labelled corpus and the
//! directory-backed repository that loads and stores it.

pub mod types;
pub mod corpus;
pub mod repository;

pub use types::{Label, Point, Trace, TraceBuilder};
pub use corpus::Corpus;
pub use repository::{FileTraceRepository, TraceSource};
