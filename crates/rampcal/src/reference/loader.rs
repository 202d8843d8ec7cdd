//! Reference mask loading from JSON artifacts.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::warn;
use ndarray::Array2;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::dq::flags::{self, FlagDef};
use crate::error::{RampcalError, Result};

use super::mask::{MaskProvenance, ReferenceMask};

/// Loads a reference artifact into a [`ReferenceMask`].
pub trait MaskLoader: Send + Sync {
    /// Load the artifact at `path`, or fail with `ReferenceLoad` when it is
    /// missing, corrupt, or does not declare a DQ-definition table.
    fn load(&self, path: &Path) -> Result<ReferenceMask>;
}

/// Metadata block of a mask artifact.
#[derive(Debug, Deserialize)]
struct MaskMeta {
    detector: String,
    #[serde(default)]
    pedigree: Option<String>,
    #[serde(default)]
    useafter: Option<String>,
}

/// One dq_def row as stored in the artifact.
#[derive(Debug, Deserialize)]
struct DqDefEntry {
    bit: u8,
    name: String,
    #[serde(default)]
    description: String,
}

/// On-disk layout of a mask artifact. `dq_def` is mandatory; an artifact
/// without one is rejected.
#[derive(Debug, Deserialize)]
struct MaskDocument {
    meta: MaskMeta,
    dq_def: Vec<DqDefEntry>,
    flag_map: Array2<u32>,
}

/// Loader for JSON mask artifacts.
#[derive(Debug, Clone, Default)]
pub struct JsonMaskLoader;

impl JsonMaskLoader {
    pub fn new() -> Self {
        Self
    }
}

impl MaskLoader for JsonMaskLoader {
    fn load(&self, path: &Path) -> Result<ReferenceMask> {
        let bytes = fs::read(path).map_err(|e| RampcalError::ReferenceLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = format!("sha256:{:x}", hasher.finalize());

        let document: MaskDocument =
            serde_json::from_slice(&bytes).map_err(|e| RampcalError::ReferenceLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut dq_def: IndexMap<u8, FlagDef> = IndexMap::new();
        for entry in document.dq_def {
            if entry.bit > 31 {
                return Err(RampcalError::ReferenceLoad {
                    path: path.to_path_buf(),
                    message: format!("dq_def bit {} out of range for 32-bit flags", entry.bit),
                });
            }
            let previous = dq_def.insert(
                entry.bit,
                FlagDef {
                    name: entry.name,
                    description: entry.description,
                },
            );
            if previous.is_some() {
                return Err(RampcalError::ReferenceLoad {
                    path: path.to_path_buf(),
                    message: format!("dq_def declares bit {} twice", entry.bit),
                });
            }
        }
        if dq_def.is_empty() {
            return Err(RampcalError::ReferenceLoad {
                path: path.to_path_buf(),
                message: "dq_def table is empty".to_string(),
            });
        }

        for (bit, def) in &dq_def {
            match flags::flag_name(*bit) {
                Some(standard) if !def.name.eq_ignore_ascii_case(standard) => {
                    warn!(
                        "{}: dq_def names bit {} '{}', standard vocabulary says '{}'",
                        path.display(),
                        bit,
                        def.name,
                        standard
                    );
                }
                None => {
                    warn!(
                        "{}: dq_def declares bit {} ('{}') outside the standard vocabulary",
                        path.display(),
                        bit,
                        def.name
                    );
                }
                _ => {}
            }
        }

        Ok(ReferenceMask {
            detector: document.meta.detector,
            flag_map: document.flag_map,
            dq_def,
            provenance: MaskProvenance {
                path: path.to_path_buf(),
                sha256,
                pedigree: document.meta.pedigree,
                useafter: document.meta.useafter,
            },
        })
    }
}
