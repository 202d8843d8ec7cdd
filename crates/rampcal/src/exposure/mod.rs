//! Exposure containers and their persistence.

mod io;
mod meta;
mod ramp;

pub use io::dqinit_output_path;
pub use meta::{ExposureMetadata, StepStatus};
pub use ramp::{GroupEntry, IntegrationTime, RampExposure};
