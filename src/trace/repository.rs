//! Directory-backed trace repository
//!
//! Layout: one sub-directory per label (`0` .. `9`), one file per trace.
//! Trace files are XML records:
//!
//! ```text
//! <trace ms="1458000000000" date="2016-03-14">
//!   <point x="10.5" y="20.0" t="0"/>
//!   <point x="11.0" y="24.5" t="16"/>
//! </trace>
//! ```
//!
//! Files with a `.json` extension are read as serialized [`Trace`] values.

use super::corpus::Corpus;
use super::types::{Label, Trace, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension used when writing trace files
pub const TRACE_EXTENSION: &str = "trc";

/// Anything that can hand out a labelled corpus
pub trait TraceSource {
    fn traces(&self) -> &Corpus;
}

impl TraceSource for Corpus {
    fn traces(&self) -> &Corpus {
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "trace")]
struct TraceRecord {
    #[serde(rename = "@ms")]
    ms: u64,
    #[serde(rename = "@date")]
    date: String,
    #[serde(rename = "point", default)]
    points: Vec<PointRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PointRecord {
    #[serde(rename = "@x")]
    x: f64,
    #[serde(rename = "@y")]
    y: f64,
    #[serde(rename = "@t")]
    t: f64,
}

impl TraceRecord {
    fn into_trace(self) -> Result<Trace, String> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| format!("invalid date {:?}: {}", self.date, e))?;
        let points = self
            .points
            .into_iter()
            .map(|p| super::types::Point::new(p.x, p.y, p.t))
            .collect();
        Ok(Trace::new(date, self.ms, points))
    }

    fn from_trace(trace: &Trace) -> Self {
        Self {
            ms: trace.ms(),
            date: trace.date().format(DATE_FORMAT).to_string(),
            points: trace
                .points()
                .iter()
                .map(|p| PointRecord { x: p.x, y: p.y, t: p.t })
                .collect(),
        }
    }
}

impl Trace {
    /// Parse a trace from its XML record
    pub fn from_xml(xml: &str) -> crate::Result<Self> {
        parse_xml(xml).map_err(|message| crate::Error::TraceFormat {
            path: "<xml>".to_string(),
            message,
        })
    }

    /// Render the trace as an XML record
    pub fn to_xml(&self) -> crate::Result<String> {
        quick_xml::se::to_string(&TraceRecord::from_trace(self)).map_err(|e| {
            crate::Error::TraceFormat {
                path: "<xml>".to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn parse_xml(xml: &str) -> Result<Trace, String> {
    let record: TraceRecord = quick_xml::de::from_str(xml).map_err(|e| e.to_string())?;
    record.into_trace()
}

/// Read a single trace file, choosing the codec by extension
pub fn load_trace(path: &Path) -> crate::Result<Trace> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false);

    let parsed = if is_json {
        serde_json::from_str::<Trace>(&content).map_err(|e| e.to_string())
    } else {
        parse_xml(&content)
    };

    parsed.map_err(|message| crate::Error::TraceFormat {
        path: path.display().to_string(),
        message,
    })
}

/// Traces stored as files under `<root>/<label>/`
#[derive(Debug)]
pub struct FileTraceRepository {
    root: PathBuf,
    corpus: Corpus,
}

impl FileTraceRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            corpus: Corpus::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a trace under a label. Traces are keyed by their `ms` stamp;
    /// returns `false` if the label already holds a trace with that stamp.
    pub fn add_trace(&mut self, label: Label, trace: Trace) -> bool {
        if self.corpus.traces(label).iter().any(|t| t.ms() == trace.ms()) {
            return false;
        }
        self.corpus.insert(label, trace);
        true
    }

    /// Load every trace below the root.
    ///
    /// Sub-directories are visited in name order and files in name order
    /// within each. Directories whose name is not a digit label are skipped.
    /// Traces whose `ms` stamp is already held under the label are ignored,
    /// so pulling again is a no-op. Returns the number of traces added.
    pub fn pull(&mut self) -> crate::Result<usize> {
        let mut loaded = 0;

        for dir in sorted_entries(&self.root, true)? {
            let name = dir.file_name().unwrap_or_default().to_string_lossy().to_string();
            let label = match name.parse::<Label>() {
                Ok(label) => label,
                Err(_) => {
                    warn!(directory = %name, "Skipping directory that is not a digit label");
                    continue;
                }
            };

            self.corpus.ensure_label(label);
            for file in sorted_entries(&dir, false)? {
                let trace = load_trace(&file)?;
                let ms = trace.ms();
                if self.add_trace(label, trace) {
                    debug!(label = %label, file = %file.display(), ms, "Loaded trace");
                    loaded += 1;
                } else {
                    debug!(label = %label, file = %file.display(), ms, "Trace already present");
                }
            }
        }

        info!(root = %self.root.display(), traces = loaded, "Pulled trace repository");
        Ok(loaded)
    }

    /// Write every trace to `<root>/<label>/<ms>.trc`, leaving existing files
    /// untouched. Returns the number of files written.
    pub fn push(&self) -> crate::Result<usize> {
        let mut written = 0;

        for bucket in self.corpus.buckets() {
            let dir = self.root.join(bucket.label.to_string());
            std::fs::create_dir_all(&dir)?;

            for trace in &bucket.traces {
                let path = dir.join(format!("{}.{}", trace.ms(), TRACE_EXTENSION));
                if path.exists() {
                    continue;
                }
                std::fs::write(&path, trace.to_xml()?)?;
                written += 1;
            }
        }

        info!(root = %self.root.display(), files = written, "Pushed trace repository");
        Ok(written)
    }

    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }
}

impl TraceSource for FileTraceRepository {
    fn traces(&self) -> &Corpus {
        &self.corpus
    }
}

/// Non-hidden directory entries of one kind, sorted by path
fn sorted_entries(dir: &Path, directories: bool) -> crate::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() == directories)
        .filter(|p| {
            !p.file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true)
        })
        .collect();
    entries.sort();
    Ok(entries)
}
