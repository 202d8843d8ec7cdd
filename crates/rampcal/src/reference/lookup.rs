//! Reference lookup: maps exposure metadata to the best-matching artifact.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RampcalError, Result};
use crate::exposure::ExposureMetadata;

/// Category of reference artifact to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefCategory {
    /// Static per-detector bad-pixel bitmask.
    Mask,
}

impl RefCategory {
    /// Category name as it appears in selection tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefCategory::Mask => "mask",
        }
    }
}

impl std::fmt::Display for RefCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps exposure metadata to a reference-artifact path.
///
/// Implementations must behave as a pure function of the metadata at call
/// time: identical metadata yields the same artifact within a run. The
/// trait makes no caching guarantee.
pub trait ReferenceLookup: Send + Sync {
    /// Return the best-matching artifact of `category` for the exposure,
    /// or `NoMatchingReference` when nothing satisfies the metadata.
    fn best_reference(&self, category: RefCategory, meta: &ExposureMetadata) -> Result<PathBuf>;
}

/// One row of a reference-selection table.
///
/// `instrument`, `detector`, and `exposure_type` are either literals
/// (compared case-insensitively) or `"*"`, which matches anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRule {
    pub category: String,
    pub instrument: String,
    pub detector: String,
    pub exposure_type: String,
    pub path: PathBuf,
}

impl MatchRule {
    fn matches(&self, category: RefCategory, meta: &ExposureMetadata) -> bool {
        self.category.eq_ignore_ascii_case(category.as_str())
            && field_matches(&self.instrument, &meta.instrument)
            && field_matches(&self.detector, &meta.detector)
            && field_matches(&self.exposure_type, &meta.exposure_type)
    }
}

fn field_matches(rule: &str, value: &str) -> bool {
    rule == "*" || rule.eq_ignore_ascii_case(value)
}

/// Table-driven lookup over an ordered rule list. The first matching rule
/// wins; ranking and versioning beyond table order are the authoring
/// system's concern.
#[derive(Debug, Clone)]
pub struct TableLookup {
    rules: Vec<MatchRule>,
}

impl TableLookup {
    /// Build a lookup from rules already in memory.
    pub fn from_rules(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    /// Read a rule table from a TSV file with header
    /// `category  instrument  detector  exposure_type  path`.
    ///
    /// Relative artifact paths resolve against the table's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let base = path.parent().unwrap_or(Path::new("."));
        let mut rules = Vec::new();
        for result in reader.deserialize() {
            let mut rule: MatchRule = result?;
            if rule.path.is_relative() {
                rule.path = base.join(&rule.path);
            }
            rules.push(rule);
        }

        debug!("loaded {} selection rules from {}", rules.len(), path.display());
        Ok(Self { rules })
    }

    /// Number of rules in the table.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl ReferenceLookup for TableLookup {
    fn best_reference(&self, category: RefCategory, meta: &ExposureMetadata) -> Result<PathBuf> {
        for rule in &self.rules {
            if rule.matches(category, meta) {
                debug!(
                    "matched {} reference for {}/{}: {}",
                    category,
                    meta.detector,
                    meta.exposure_type,
                    rule.path.display()
                );
                return Ok(rule.path.clone());
            }
        }

        Err(RampcalError::NoMatchingReference {
            category: category.as_str().to_string(),
            instrument: meta.instrument.clone(),
            detector: meta.detector.clone(),
            exposure_type: meta.exposure_type.clone(),
        })
    }
}
