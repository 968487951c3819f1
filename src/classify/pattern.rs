//! Compiled per-digit pattern table

use crate::trace::types::Label;
use regex::Regex;
use std::collections::BTreeMap;

/// A pattern anchored at the start of the encoded string.
///
/// Only the start is anchored; a pattern that must consume the whole string
/// ends with `$` itself.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        // Validate the text as written before wrapping it in a group
        Regex::new(source)?;
        let regex = Regex::new(&format!(r"\A(?:{})", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Pattern text as supplied
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, encoded: &str) -> bool {
        self.regex.is_match(encoded)
    }
}

/// Ordered patterns for every digit, validated when added
#[derive(Debug, Clone)]
pub struct PatternTable {
    classes: Vec<Vec<CompiledPattern>>,
}

impl PatternTable {
    /// Table with no patterns; classifies everything as unrecognized
    pub fn new() -> Self {
        Self {
            classes: (0..Label::COUNT).map(|_| Vec::new()).collect(),
        }
    }

    /// Append a pattern to a digit's list
    pub fn push(&mut self, label: Label, source: &str) -> crate::Result<()> {
        let pattern = CompiledPattern::compile(source).map_err(|e| crate::Error::Pattern {
            label,
            pattern: source.to_string(),
            source: e,
        })?;
        self.classes[label.index()].push(pattern);
        Ok(())
    }

    /// Builder form of [`PatternTable::push`] for a list of patterns
    pub fn with_patterns<S: AsRef<str>>(mut self, label: Label, sources: &[S]) -> crate::Result<Self> {
        for source in sources {
            self.push(label, source.as_ref())?;
        }
        Ok(self)
    }

    /// Build from a `"digit" -> [pattern]` map as found in the config file
    pub fn from_config(entries: &BTreeMap<String, Vec<String>>) -> crate::Result<Self> {
        let mut table = Self::new();
        for (key, sources) in entries {
            let label: Label = key.parse()?;
            for source in sources {
                table.push(label, source)?;
            }
        }
        Ok(table)
    }

    /// Inverse of [`PatternTable::from_config`]
    pub fn to_config(&self) -> BTreeMap<String, Vec<String>> {
        Label::all()
            .filter(|l| !self.patterns(*l).is_empty())
            .map(|l| {
                let sources: Vec<String> = self.patterns(l).iter().map(|p| p.as_str().to_string()).collect();
                (l.to_string(), sources)
            })
            .collect()
    }

    pub fn patterns(&self, label: Label) -> &[CompiledPattern] {
        &self.classes[label.index()]
    }

    /// Total number of patterns
    pub fn len(&self) -> usize {
        self.classes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First pattern, in digit then list order, that matches the string
    pub fn find_match(&self, encoded: &str) -> Option<(Label, &CompiledPattern)> {
        Label::all().find_map(|label| {
            self.patterns(label)
                .iter()
                .find(|p| p.matches(encoded))
                .map(|p| (label, p))
        })
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: u8) -> Label {
        Label::new(value).unwrap()
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let pattern = CompiledPattern::compile("1").unwrap();
        assert!(pattern.matches("1"));
        assert!(pattern.matches("12"));
        assert!(!pattern.matches("01"));
    }

    #[test]
    fn test_end_anchor_is_pattern_defined() {
        let pattern = CompiledPattern::compile("^01$").unwrap();
        assert!(pattern.matches("01"));
        assert!(!pattern.matches("012"));

        let prefix = CompiledPattern::compile("01").unwrap();
        assert!(prefix.matches("012"));
    }

    #[test]
    fn test_alternation_is_grouped() {
        // Without grouping the second branch would float free of the anchor
        let pattern = CompiledPattern::compile("3|1").unwrap();
        assert!(pattern.matches("1"));
        assert!(!pattern.matches("01"));
    }

    #[test]
    fn test_invalid_pattern_reports_label() {
        let mut table = PatternTable::new();
        match table.push(label(3), "0(1") {
            Err(crate::Error::Pattern { label: l, pattern, .. }) => {
                assert_eq!(l.value(), 3);
                assert_eq!(pattern, "0(1");
            }
            other => panic!("Expected Pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_pattern_not_rescued_by_grouping() {
        assert!(CompiledPattern::compile("0)(1").is_err());
    }

    #[test]
    fn test_lower_digit_wins() {
        let table = PatternTable::new()
            .with_patterns(label(5), &["^2+$"])
            .unwrap()
            .with_patterns(label(1), &["^2$"])
            .unwrap();

        let (winner, pattern) = table.find_match("2").unwrap();
        assert_eq!(winner.value(), 1);
        assert_eq!(pattern.as_str(), "^2$");

        let (winner, _) = table.find_match("22").unwrap();
        assert_eq!(winner.value(), 5);
    }

    #[test]
    fn test_list_order_within_digit() {
        let table = PatternTable::new()
            .with_patterns(label(0), &["^3", "^32"])
            .unwrap();
        let (_, pattern) = table.find_match("321").unwrap();
        assert_eq!(pattern.as_str(), "^3");
    }

    #[test]
    fn test_no_match_and_empty_table() {
        let table = PatternTable::new();
        assert!(table.is_empty());
        assert!(table.find_match("01").is_none());

        let table = PatternTable::new().with_patterns(label(7), &["^01$"]).unwrap();
        assert!(table.find_match("99").is_none());
        assert!(table.find_match("").is_none());
    }

    #[test]
    fn test_foreign_symbols_silently_fail() {
        let table = PatternTable::new().with_patterns(label(2), &["^[0-3]+$"]).unwrap();
        assert!(table.find_match("ab").is_none());
        assert!(table.find_match("0ä").is_none());
    }

    #[test]
    fn test_from_config() {
        let mut entries = BTreeMap::new();
        entries.insert("7".to_string(), vec!["^01$".to_string(), "^1[23]$".to_string()]);
        entries.insert("1".to_string(), vec!["^2$".to_string()]);

        let table = PatternTable::from_config(&entries).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.patterns(label(7)).len(), 2);
        assert_eq!(table.to_config(), entries);
    }

    #[test]
    fn test_from_config_rejects_bad_key() {
        let mut entries = BTreeMap::new();
        entries.insert("10".to_string(), vec!["^0$".to_string()]);
        assert!(matches!(
            PatternTable::from_config(&entries),
            Err(crate::Error::InvalidLabel(_))
        ));
    }
}
