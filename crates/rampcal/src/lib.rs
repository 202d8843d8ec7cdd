//! rampcal: data-quality initialization for detector ramp exposures.
//!
//! Given a raw ramp exposure and a per-detector bad-pixel reference mask
//! selected by metadata matching, the DQ-init step merges the mask's flag
//! bits into the exposure's pixel DQ array before the rest of the pipeline
//! runs.
//!
//! # Core Principles
//!
//! - **Explicit collaborators**: the step takes its reference lookup and
//!   mask loader as handles; there is no ambient resolution state
//! - **All-or-nothing**: every check runs before any mutation, so a failed
//!   invocation leaves the exposure byte-for-byte unchanged
//! - **Full provenance**: the artifact actually merged is recorded in the
//!   exposure and in the step outcome
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rampcal::{DqInitStep, JsonMaskLoader, RampExposure, TableLookup};
//!
//! # fn main() -> rampcal::Result<()> {
//! let mut exposure = RampExposure::load("r0000101_wfi01_uncal.json")?;
//! let lookup = TableLookup::from_file("references.tsv")?;
//!
//! let step = DqInitStep::new(Arc::new(lookup), Arc::new(JsonMaskLoader::new()));
//! let outcome = step.apply(&mut exposure, None)?;
//!
//! println!("merged {}", outcome.reference.display());
//! # Ok(())
//! # }
//! ```

pub mod dq;
pub mod error;
pub mod exposure;
pub mod reference;

pub use dq::{DqInitOutcome, DqInitStep, FlagDef};
pub use error::{RampcalError, Result};
pub use exposure::{ExposureMetadata, RampExposure, StepStatus};
pub use reference::{
    JsonMaskLoader, MaskLoader, MatchRule, RefCategory, ReferenceLookup, ReferenceMask,
    TableLookup,
};
