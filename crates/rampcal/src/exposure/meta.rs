//! Exposure metadata: instrument identity, observation mode, and provenance.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Detector names follow `<instrument><two-digit index>`, e.g. "WFI01".
static DETECTOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,6}\d{2}$").unwrap());

/// Completion status of a calibration step, recorded in the exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    /// The step ran and its outputs are present.
    Complete,
    /// The step was deliberately skipped by the pipeline driver.
    Skipped,
    /// The step has not run (initial state).
    Incomplete,
}

/// Metadata for one exposure, used for reference selection and provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureMetadata {
    /// Instrument name (e.g. "WFI").
    pub instrument: String,
    /// Detector identifier (e.g. "WFI01").
    pub detector: String,
    /// Observation mode / exposure type (e.g. "WFI_IMAGE", "WFI_GRISM").
    pub exposure_type: String,
    /// Additional calibration-selection parameters, carried opaquely.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, String>,
    /// Reference category ("mask", ...) to the artifact actually used.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub reference_files: IndexMap<String, String>,
    /// Per-step completion status.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cal_steps: IndexMap<String, StepStatus>,
}

impl ExposureMetadata {
    /// Create metadata for an exposure.
    pub fn new(
        instrument: impl Into<String>,
        detector: impl Into<String>,
        exposure_type: impl Into<String>,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            detector: detector.into(),
            exposure_type: exposure_type.into(),
            extra: IndexMap::new(),
            reference_files: IndexMap::new(),
            cal_steps: IndexMap::new(),
        }
    }

    /// Add a calibration-selection parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether the detector identifier follows the expected naming scheme.
    ///
    /// Nonconforming names are logged as warnings by the step; they never
    /// fail a pipeline run, since engineering data can carry ad-hoc names.
    pub fn detector_name_is_standard(&self) -> bool {
        DETECTOR_PATTERN.is_match(&self.detector)
    }

    /// Record the reference artifact used for a category.
    pub fn record_reference(&mut self, category: impl Into<String>, identifier: impl Into<String>) {
        self.reference_files
            .insert(category.into(), identifier.into());
    }

    /// Record a step's completion status.
    pub fn record_step(&mut self, step: impl Into<String>, status: StepStatus) {
        self.cal_steps.insert(step.into(), status);
    }

    /// Status of a step, `Incomplete` when never recorded.
    pub fn step_status(&self, step: &str) -> StepStatus {
        self.cal_steps
            .get(step)
            .copied()
            .unwrap_or(StepStatus::Incomplete)
    }
}
