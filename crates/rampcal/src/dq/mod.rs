//! Data-quality flags and the DQ-init step.

pub mod flags;
mod init;

pub use flags::FlagDef;
pub use init::{DqInitOutcome, DqInitStep, STEP_NAME};
