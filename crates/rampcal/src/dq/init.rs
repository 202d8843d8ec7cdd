//! The DQ-init step: merge a reference bad-pixel mask into an exposure's
//! pixel DQ array.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{RampcalError, Result};
use crate::exposure::{RampExposure, StepStatus};
use crate::reference::{MaskLoader, RefCategory, ReferenceLookup, ReferenceMask};

/// Name under which the step records itself in exposure provenance.
pub const STEP_NAME: &str = "dq_init";

/// What one `apply` invocation did, for audit and regression comparison.
#[derive(Debug, Clone, Serialize)]
pub struct DqInitOutcome {
    /// Artifact actually merged.
    pub reference: PathBuf,
    /// SHA-256 of the artifact bytes.
    pub sha256: String,
    /// Declared conditions present in the merged mask, in dq_def order.
    pub flags_present: Vec<(u8, String)>,
    /// Bits the mask sets without declaring. Zero for well-formed artifacts.
    pub undeclared_bits: u32,
    pub applied_at: DateTime<Utc>,
}

/// Data-quality initialization step.
///
/// Holds its two collaborators explicitly; there is no ambient lookup
/// state. The step is stateless across invocations and may be shared
/// between threads processing distinct exposures.
pub struct DqInitStep {
    lookup: Arc<dyn ReferenceLookup>,
    loader: Arc<dyn MaskLoader>,
}

impl DqInitStep {
    pub fn new(lookup: Arc<dyn ReferenceLookup>, loader: Arc<dyn MaskLoader>) -> Self {
        Self { lookup, loader }
    }

    /// Merge the selected reference mask into the exposure's `pixel_dq`.
    ///
    /// When `reference_path` is given it is used as-is; otherwise the
    /// lookup selects an artifact from the exposure's metadata. Every
    /// check runs before any mutation: on error the exposure is exactly
    /// as it was on entry. Only `pixel_dq` and the provenance entries in
    /// `meta` change on success.
    pub fn apply(
        &self,
        exposure: &mut RampExposure,
        reference_path: Option<&Path>,
    ) -> Result<DqInitOutcome> {
        if !exposure.meta.detector_name_is_standard() {
            warn!(
                "detector '{}' does not follow standard naming",
                exposure.meta.detector
            );
        }

        let reference = match reference_path {
            Some(path) => path.to_path_buf(),
            None => self
                .lookup
                .best_reference(RefCategory::Mask, &exposure.meta)?,
        };
        info!(
            "dq_init: using mask reference {} for detector {}",
            reference.display(),
            exposure.meta.detector
        );

        let mask = self.loader.load(&reference)?;

        if mask.detector != exposure.meta.detector {
            return Err(RampcalError::DetectorMismatch {
                expected: exposure.meta.detector.clone(),
                actual: mask.detector,
            });
        }

        let expected = exposure.pixel_dq.dim();
        let actual = mask.shape();
        if expected != actual {
            return Err(RampcalError::ShapeMismatch { expected, actual });
        }

        merge_flags(exposure, &mask);

        let undeclared = mask.undeclared_bits();
        if undeclared != 0 {
            warn!(
                "{}: flag map sets undeclared bits {:#010x}",
                reference.display(),
                undeclared
            );
        }

        let flags_present: Vec<(u8, String)> = mask
            .flags_present()
            .into_iter()
            .map(|(bit, name)| (bit, name.to_string()))
            .collect();
        debug!(
            "dq_init: {} flagged pixels after merge",
            exposure.flagged_pixel_count()
        );

        let identifier = reference.to_string_lossy().into_owned();
        exposure.meta.record_reference(RefCategory::Mask.as_str(), identifier);
        exposure.meta.record_step(STEP_NAME, StepStatus::Complete);

        Ok(DqInitOutcome {
            reference,
            sha256: mask.provenance.sha256.clone(),
            flags_present,
            undeclared_bits: undeclared,
            applied_at: Utc::now(),
        })
    }
}

/// Bitwise-OR every mask flag word into the exposure's pixel DQ.
///
/// Idempotent and commutative; no bit is ever cleared. Shapes must already
/// agree when this runs.
fn merge_flags(exposure: &mut RampExposure, mask: &ReferenceMask) {
    exposure
        .pixel_dq
        .zip_mut_with(&mask.flag_map, |dq, &flag| *dq |= flag);
}
