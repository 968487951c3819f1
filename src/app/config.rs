//! Configuration Management

use crate::classify::classifier::{ClassifierConfig, PatternClassifier};
use crate::classify::pattern::PatternTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Encoder and classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Digit -> ordered patterns
    #[serde(default = "default_patterns")]
    pub patterns: BTreeMap<String, Vec<String>>,
}

/// Evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Root of the labelled trace repository
    pub corpus_dir: PathBuf,
    /// Classify traces on the rayon thread pool
    pub parallel: bool,
    /// Seed for the random baseline classifier
    pub seed: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("pathcollector"),
            parallel: false,
            seed: 0,
        }
    }
}

/// Starter patterns for the default four-direction encoding
/// (0 = up, 1 = right, 2 = down, 3 = left)
pub fn default_patterns() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 10] = [
        ("0", &["^32103?$", "^12301?$"]),
        ("1", &["^[01]?2$"]),
        ("2", &["^0?123?1$"]),
        ("3", &["^1231?23$"]),
        ("4", &["^2102?$", "^212$"]),
        ("5", &["^3212?3$"]),
        ("6", &["^2103$"]),
        ("7", &["^1[23]$", "^01[23]$"]),
        ("8", &["^3212301?0?$"]),
        ("9", &["^3?2102$", "^3?21012$"]),
    ];

    table
        .iter()
        .map(|(digit, patterns)| {
            (
                digit.to_string(),
                patterns.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            evaluation: EvaluationConfig::default(),
            patterns: default_patterns(),
        }
    }
}

impl Config {
    /// Validate config values and compile the pattern table.
    /// Returns Ok(()) if valid, or Err describing the first problem found.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.classifier.build_encoder()?;
        self.pattern_table()?;
        Ok(())
    }

    /// Compile the configured patterns
    pub fn pattern_table(&self) -> Result<PatternTable, crate::Error> {
        PatternTable::from_config(&self.patterns)
    }

    /// Build the pattern classifier described by this config
    pub fn build_classifier(&self) -> Result<PatternClassifier, crate::Error> {
        PatternClassifier::new(self.classifier.clone(), self.pattern_table()?)
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, or defaults if the file does not exist yet
    pub fn load_or_default(path: &PathBuf) -> Result<Self, crate::Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        Self::load_or_default(&Self::default_path())
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Explicit path if given, otherwise [`Config::default_path`]
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(Self::default_path)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".trace_classifier").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Look up a value by dotted key, e.g. `classifier.direction_count`
    pub fn get(&self, key: &str) -> Result<Option<String>, crate::Error> {
        let root = toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        let found = key
            .split('.')
            .try_fold(&root, |value, part| value.get(part));

        Ok(found.map(|value| match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}
