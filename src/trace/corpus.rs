//! Labelled trace corpus
//!
//! Maps each label to the traces recorded for it. Labels keep their
//! insertion order and traces keep their order within a label, so a corpus
//! always flattens to the same sequence of test cases.

use super::types::{Label, Trace};

/// Traces recorded for one label
#[derive(Debug, Clone)]
pub struct LabelBucket {
    pub label: Label,
    pub traces: Vec<Trace>,
}

/// Ordered `label -> [trace]` mapping
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    buckets: Vec<LabelBucket>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trace to its label, creating the label bucket at the end if
    /// it has not been seen yet
    pub fn insert(&mut self, label: Label, trace: Trace) {
        self.bucket_mut(label).traces.push(trace);
    }

    /// Register a label without traces
    pub fn ensure_label(&mut self, label: Label) {
        self.bucket_mut(label);
    }

    fn bucket_mut(&mut self, label: Label) -> &mut LabelBucket {
        let index = match self.buckets.iter().position(|b| b.label == label) {
            Some(index) => index,
            None => {
                self.buckets.push(LabelBucket {
                    label,
                    traces: Vec::new(),
                });
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[index]
    }

    /// Traces recorded for a label
    pub fn traces(&self, label: Label) -> &[Trace] {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.traces.as_slice())
            .unwrap_or(&[])
    }

    pub fn buckets(&self) -> &[LabelBucket] {
        &self.buckets
    }

    /// Labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.buckets.iter().map(|b| b.label)
    }

    /// Every `(label, trace)` pair in corpus order
    pub fn iter(&self) -> impl Iterator<Item = (Label, &Trace)> {
        self.buckets
            .iter()
            .flat_map(|b| b.traces.iter().map(move |t| (b.label, t)))
    }

    /// Total number of traces
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.traces.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(Label, Trace)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (Label, Trace)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (label, trace) in iter {
            corpus.insert(label, trace);
        }
        corpus
    }
}
