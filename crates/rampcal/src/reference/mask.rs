//! Reference mask: a static per-detector bad-pixel bitmask.

use std::path::PathBuf;

use indexmap::IndexMap;
use ndarray::Array2;

use crate::dq::flags::FlagDef;

/// Where a loaded mask came from, for audit and regression comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskProvenance {
    /// Path of the artifact on disk.
    pub path: PathBuf,
    /// SHA-256 of the artifact bytes, `sha256:<hex>`.
    pub sha256: String,
    /// Pedigree of the calibration data (e.g. "GROUND", "DUMMY").
    pub pedigree: Option<String>,
    /// Earliest observation date the artifact applies to.
    pub useafter: Option<String>,
}

/// A per-detector bad-pixel mask selected for exactly one exposure.
///
/// Read-only for the duration of a step invocation; the flag map is merged
/// into the exposure's pixel DQ array and the mask is then discarded.
#[derive(Debug, Clone)]
pub struct ReferenceMask {
    /// Detector the artifact covers.
    pub detector: String,
    /// One flag word per (row, column).
    pub flag_map: Array2<u32>,
    /// Ordered bit position to flag meaning, as declared by the artifact.
    pub dq_def: IndexMap<u8, FlagDef>,
    pub provenance: MaskProvenance,
}

impl ReferenceMask {
    /// Spatial shape of the flag map.
    pub fn shape(&self) -> (usize, usize) {
        self.flag_map.dim()
    }

    /// Declared conditions that actually occur somewhere in the flag map,
    /// in dq_def order.
    pub fn flags_present(&self) -> Vec<(u8, &str)> {
        let mut union = 0u32;
        for &word in self.flag_map.iter() {
            union |= word;
        }

        self.dq_def
            .iter()
            .filter(|(bit, _)| union & (1u32 << *bit) != 0)
            .map(|(bit, def)| (*bit, def.name.as_str()))
            .collect()
    }

    /// Bits set somewhere in the flag map but absent from dq_def.
    ///
    /// Nonzero means the artifact flags conditions it never declared;
    /// reported as a warning, never an error.
    pub fn undeclared_bits(&self) -> u32 {
        let mut union = 0u32;
        for &word in self.flag_map.iter() {
            union |= word;
        }

        let mut declared = 0u32;
        for bit in self.dq_def.keys() {
            declared |= 1u32 << bit;
        }

        union & !declared
    }
}
