//! In-memory container for one observation's raw ramp cube.

use ndarray::{Array2, Array3, Array4};
use serde::{Deserialize, Serialize};

use super::meta::ExposureMetadata;

/// One row of the per-group parameters table. Opaque to calibration steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub integration: u32,
    pub group: u32,
    /// Group end time, MJD UTC.
    pub end_time: f64,
    /// Frames dropped before this group was averaged.
    pub drop_frames: u32,
}

/// Start/mid/end times for one integration, MJD UTC. Opaque to steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationTime {
    pub integration: u32,
    pub start: f64,
    pub mid: f64,
    pub end: f64,
}

/// A raw ramp exposure: the 4-D science cube plus its quality and error
/// arrays and auxiliary tables.
///
/// The science cube's axes are (integration, group, row, column) and its
/// shape is fixed once the exposure exists. `pixel_dq`, `group_dq`, and
/// `err` are materialized as zero-filled arrays of the matching shapes at
/// construction time; there is no lazy, access-triggered creation.
#[derive(Debug, Clone)]
pub struct RampExposure {
    pub meta: ExposureMetadata,
    /// Science samples, shape (nints, ngroups, nrows, ncols).
    pub science: Array4<f32>,
    /// Per-pixel quality flags, shape (nrows, ncols).
    pub pixel_dq: Array2<u32>,
    /// Per-group quality flags, shape (ngroups, nrows, ncols).
    pub group_dq: Array3<u8>,
    /// Error estimates, same shape as `science`.
    pub err: Array4<f32>,
    /// Optional zero-read frame, shape (nints, nrows, ncols).
    pub zeroframe: Option<Array3<f32>>,
    /// Per-group parameters table.
    pub group_table: Vec<GroupEntry>,
    /// Per-integration timestamps.
    pub integration_times: Vec<IntegrationTime>,
}

impl RampExposure {
    /// Create an exposure around a science cube, zero-filling the quality
    /// and error arrays to their invariant shapes.
    pub fn new(science: Array4<f32>, meta: ExposureMetadata) -> Self {
        let (_, ngroups, nrows, ncols) = science.dim();
        let err = Array4::zeros(science.raw_dim());

        Self {
            meta,
            science,
            pixel_dq: Array2::zeros((nrows, ncols)),
            group_dq: Array3::zeros((ngroups, nrows, ncols)),
            err,
            zeroframe: None,
            group_table: Vec::new(),
            integration_times: Vec::new(),
        }
    }

    /// Number of integrations in the ramp.
    pub fn integration_count(&self) -> usize {
        self.science.dim().0
    }

    /// Number of groups per integration.
    pub fn group_count(&self) -> usize {
        self.science.dim().1
    }

    /// The spatial (row, column) shape shared by every plane.
    pub fn spatial_shape(&self) -> (usize, usize) {
        let (_, _, nrows, ncols) = self.science.dim();
        (nrows, ncols)
    }

    /// Attach a zero-read frame.
    ///
    /// Returns the frame back as `Err` when its shape does not match
    /// (nints, nrows, ncols).
    pub fn set_zeroframe(&mut self, zeroframe: Array3<f32>) -> Result<(), Array3<f32>> {
        let (nints, _, nrows, ncols) = self.science.dim();
        if zeroframe.dim() != (nints, nrows, ncols) {
            return Err(zeroframe);
        }
        self.zeroframe = Some(zeroframe);
        Ok(())
    }

    /// Count of pixels with at least one quality flag set.
    pub fn flagged_pixel_count(&self) -> usize {
        self.pixel_dq.iter().filter(|&&word| word != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_exposure() -> RampExposure {
        let science = Array4::zeros((2, 3, 8, 8));
        RampExposure::new(science, ExposureMetadata::new("WFI", "WFI01", "WFI_IMAGE"))
    }

    #[test]
    fn test_quality_arrays_materialized_at_construction() {
        let exposure = small_exposure();

        assert_eq!(exposure.pixel_dq.dim(), (8, 8));
        assert_eq!(exposure.group_dq.dim(), (3, 8, 8));
        assert_eq!(exposure.err.dim(), (2, 3, 8, 8));
        assert!(exposure.pixel_dq.iter().all(|&w| w == 0));
        assert!(exposure.group_dq.iter().all(|&w| w == 0));
        assert!(exposure.err.iter().all(|&v| v == 0.0));
        assert!(exposure.zeroframe.is_none());
    }

    #[test]
    fn test_spatial_shape_tracks_science_trailing_axes() {
        let exposure = small_exposure();
        assert_eq!(exposure.spatial_shape(), (8, 8));
        assert_eq!(exposure.integration_count(), 2);
        assert_eq!(exposure.group_count(), 3);
    }

    #[test]
    fn test_zeroframe_shape_is_enforced() {
        let mut exposure = small_exposure();

        assert!(exposure.set_zeroframe(Array3::zeros((2, 8, 8))).is_ok());
        assert!(exposure.zeroframe.is_some());

        let rejected = exposure.set_zeroframe(Array3::zeros((2, 4, 4)));
        assert!(rejected.is_err());
    }

    #[test]
    fn test_flagged_pixel_count() {
        let mut exposure = small_exposure();
        assert_eq!(exposure.flagged_pixel_count(), 0);

        exposure.pixel_dq[[1, 2]] = 0x1;
        exposure.pixel_dq[[5, 5]] = 0x400;
        assert_eq!(exposure.flagged_pixel_count(), 2);
    }
}
