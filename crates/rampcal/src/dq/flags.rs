//! Per-pixel data-quality flag vocabulary.
//!
//! Flag words are 32-bit; each bit position has a fixed meaning shared by
//! reference masks and exposure DQ arrays. Reference artifacts declare the
//! subset they use in their `dq_def` table, which must agree with this
//! vocabulary on bit position.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bad pixel. Do not use for science.
pub const DO_NOT_USE: u32 = 1;
/// Pixel saturated during exposure.
pub const SATURATED: u32 = 1 << 1;
/// Jump detected during exposure.
pub const JUMP_DET: u32 = 1 << 2;
/// Data lost in transmission.
pub const DROPOUT: u32 = 1 << 3;
/// High persistence from a previous exposure.
pub const PERSISTENCE: u32 = 1 << 4;
/// Uncertainty estimate is unreliable.
pub const UNRELIABLE_ERROR: u32 = 1 << 8;
/// Pixel not on science portion of detector.
pub const NON_SCIENCE: u32 = 1 << 9;
/// Dead pixel.
pub const DEAD: u32 = 1 << 10;
/// Hot pixel.
pub const HOT: u32 = 1 << 11;
/// Warm pixel.
pub const WARM: u32 = 1 << 12;
/// Low quantum efficiency.
pub const LOW_QE: u32 = 1 << 13;
/// Telegraph (random-telegraph-signal) pixel.
pub const TELEGRAPH: u32 = 1 << 15;
/// Pixel highly nonlinear.
pub const NONLINEAR: u32 = 1 << 16;
/// Reference pixel cannot be used for bias correction.
pub const BAD_REF_PIXEL: u32 = 1 << 17;
/// No flat-field information available.
pub const NO_FLAT_FIELD: u32 = 1 << 18;
/// Reference pixel (border, not light-sensitive).
pub const REFERENCE_PIXEL: u32 = 1 << 31;

/// (bit position, name, description) for every assigned bit.
const ASSIGNED: &[(u8, &str, &str)] = &[
    (0, "DO_NOT_USE", "Bad pixel. Do not use."),
    (1, "SATURATED", "Pixel saturated during exposure"),
    (2, "JUMP_DET", "Jump detected during exposure"),
    (3, "DROPOUT", "Data lost in transmission"),
    (4, "PERSISTENCE", "High persistence"),
    (8, "UNRELIABLE_ERROR", "Uncertainty exceeds quoted error"),
    (9, "NON_SCIENCE", "Pixel not on science portion of detector"),
    (10, "DEAD", "Dead pixel"),
    (11, "HOT", "Hot pixel"),
    (12, "WARM", "Warm pixel"),
    (13, "LOW_QE", "Low quantum efficiency"),
    (15, "TELEGRAPH", "Telegraph pixel"),
    (16, "NONLINEAR", "Pixel highly nonlinear"),
    (17, "BAD_REF_PIXEL", "Reference pixel cannot be used"),
    (18, "NO_FLAT_FIELD", "Flat field cannot be measured"),
    (31, "REFERENCE_PIXEL", "Border reference pixel"),
];

/// One entry of a DQ-definition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Name of an assigned bit position.
pub fn flag_name(bit: u8) -> Option<&'static str> {
    ASSIGNED
        .iter()
        .find(|(b, _, _)| *b == bit)
        .map(|(_, name, _)| *name)
}

/// Bit position of a named flag, matched case-insensitively.
pub fn flag_bit(name: &str) -> Option<u8> {
    ASSIGNED
        .iter()
        .find(|(_, n, _)| n.eq_ignore_ascii_case(name))
        .map(|(bit, _, _)| *bit)
}

/// Names of all assigned conditions present in a flag word.
///
/// Bits set outside the assigned vocabulary are ignored here; use
/// [`unassigned_bits`] to detect them.
pub fn describe(word: u32) -> Vec<&'static str> {
    ASSIGNED
        .iter()
        .filter(|(bit, _, _)| word & (1u32 << bit) != 0)
        .map(|(_, name, _)| *name)
        .collect()
}

/// Bits set in `word` that have no assigned meaning.
pub fn unassigned_bits(word: u32) -> u32 {
    let mut known = 0u32;
    for (bit, _, _) in ASSIGNED {
        known |= 1u32 << bit;
    }
    word & !known
}

/// The full assigned vocabulary as an ordered dq_def table.
pub fn standard_dq_def() -> IndexMap<u8, FlagDef> {
    ASSIGNED
        .iter()
        .map(|(bit, name, description)| {
            (
                *bit,
                FlagDef {
                    name: (*name).to_string(),
                    description: (*description).to_string(),
                },
            )
        })
        .collect()
}
