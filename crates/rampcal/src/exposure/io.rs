//! Persistence for ramp exposures - save/load JSON documents.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3, Array4};
use serde::{Deserialize, Serialize};

use crate::error::{RampcalError, Result};

use super::meta::ExposureMetadata;
use super::ramp::{GroupEntry, IntegrationTime, RampExposure};

/// Serialization surface for [`RampExposure`].
///
/// The quality and error arrays are optional on read: a document written
/// before any calibration ran may omit them, and they are zero-filled to
/// their invariant shapes during conversion. On write they are always
/// present.
#[derive(Debug, Serialize, Deserialize)]
struct RampDocument {
    meta: ExposureMetadata,
    science: Array4<f32>,
    #[serde(default)]
    pixel_dq: Option<Array2<u32>>,
    #[serde(default)]
    group_dq: Option<Array3<u8>>,
    #[serde(default)]
    err: Option<Array4<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zeroframe: Option<Array3<f32>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group_table: Vec<GroupEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    integration_times: Vec<IntegrationTime>,
}

impl RampDocument {
    fn from_exposure(exposure: &RampExposure) -> Self {
        Self {
            meta: exposure.meta.clone(),
            science: exposure.science.clone(),
            pixel_dq: Some(exposure.pixel_dq.clone()),
            group_dq: Some(exposure.group_dq.clone()),
            err: Some(exposure.err.clone()),
            zeroframe: exposure.zeroframe.clone(),
            group_table: exposure.group_table.clone(),
            integration_times: exposure.integration_times.clone(),
        }
    }

    /// Convert into an exposure, zero-filling omitted arrays and checking
    /// every shape invariant against the science cube.
    fn into_exposure(self, path: &Path) -> Result<RampExposure> {
        let (nints, ngroups, nrows, ncols) = self.science.dim();

        let mut exposure = RampExposure::new(self.science, self.meta);

        if let Some(pixel_dq) = self.pixel_dq {
            if pixel_dq.dim() != (nrows, ncols) {
                return Err(invalid_shape(
                    path,
                    "pixel_dq",
                    format!("{:?}", pixel_dq.dim()),
                    format!("{:?}", (nrows, ncols)),
                ));
            }
            exposure.pixel_dq = pixel_dq;
        }

        if let Some(group_dq) = self.group_dq {
            if group_dq.dim() != (ngroups, nrows, ncols) {
                return Err(invalid_shape(
                    path,
                    "group_dq",
                    format!("{:?}", group_dq.dim()),
                    format!("{:?}", (ngroups, nrows, ncols)),
                ));
            }
            exposure.group_dq = group_dq;
        }

        if let Some(err) = self.err {
            if err.dim() != (nints, ngroups, nrows, ncols) {
                return Err(invalid_shape(
                    path,
                    "err",
                    format!("{:?}", err.dim()),
                    format!("{:?}", (nints, ngroups, nrows, ncols)),
                ));
            }
            exposure.err = err;
        }

        if let Some(zeroframe) = self.zeroframe {
            let expected = (nints, nrows, ncols);
            exposure.set_zeroframe(zeroframe).map_err(|rejected| {
                invalid_shape(
                    path,
                    "zeroframe",
                    format!("{:?}", rejected.dim()),
                    format!("{:?}", expected),
                )
            })?;
        }

        exposure.group_table = self.group_table;
        exposure.integration_times = self.integration_times;

        Ok(exposure)
    }
}

fn invalid_shape(path: &Path, field: &str, actual: String, expected: String) -> RampcalError {
    RampcalError::InvalidDocument {
        path: path.to_path_buf(),
        message: format!("{field} has shape {actual}, expected {expected}"),
    }
}

impl RampExposure {
    /// Save the exposure to a JSON document.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use rampcal::RampExposure;
    /// # fn example(exposure: &RampExposure) -> rampcal::Result<()> {
    /// exposure.save("r0000101_wfi01_dqinit.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| RampcalError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| RampcalError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &RampDocument::from_exposure(self))?;

        Ok(())
    }

    /// Load an exposure from a JSON document.
    ///
    /// Omitted `pixel_dq`/`group_dq`/`err` fields come back zero-filled;
    /// any array whose shape disagrees with the science cube fails the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| RampcalError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let document: RampDocument = serde_json::from_reader(reader)?;

        document.into_exposure(path)
    }
}

/// Default output path for a DQ-initialized exposure.
///
/// # Example
///
/// ```
/// use rampcal::exposure::dqinit_output_path;
///
/// let path = dqinit_output_path("data/r0000101_wfi01_uncal.json");
/// assert_eq!(path.to_string_lossy(), "data/r0000101_wfi01_uncal_dqinit.json");
/// ```
pub fn dqinit_output_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}_dqinit.json", stem))
}
