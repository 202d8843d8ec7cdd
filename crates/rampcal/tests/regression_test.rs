//! Regression scenario: reference selection plus mask application for one
//! WFI01 image exposure, end to end through the file-backed collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::{Array2, Array4};
use tempfile::tempdir;

use rampcal::{
    DqInitStep, ExposureMetadata, JsonMaskLoader, RampExposure, StepStatus, TableLookup,
    dq::flags,
};

/// Mask with (10, 20) flagged DEAD and (30, 40) flagged HOT, selection
/// table offering it for every WFI01 exposure type.
fn write_wfi01_fixtures(dir: &Path, nrows: usize, ncols: usize) -> PathBuf {
    let mut flag_map = Array2::<u32>::zeros((nrows, ncols));
    flag_map[[10, 20]] = flags::DEAD;
    flag_map[[30, 40]] = flags::HOT;

    let mask = serde_json::json!({
        "meta": { "detector": "WFI01", "pedigree": "GROUND" },
        "dq_def": [
            { "bit": 10, "name": "DEAD", "description": "Dead pixel" },
            { "bit": 11, "name": "HOT", "description": "Hot pixel" }
        ],
        "flag_map": serde_json::to_value(flag_map).unwrap(),
    });
    std::fs::write(
        dir.join("wfi_mask_0001.json"),
        serde_json::to_string(&mask).unwrap(),
    )
    .unwrap();

    let table_path = dir.join("references.tsv");
    std::fs::write(
        &table_path,
        "category\tinstrument\tdetector\texposure_type\tpath\n\
         mask\tWFI\tWFI01\t*\twfi_mask_0001.json\n",
    )
    .unwrap();

    table_path
}

fn run_scenario(shape: (usize, usize, usize, usize)) {
    let dir = tempdir().unwrap();
    let (_, _, nrows, ncols) = shape;
    let table_path = write_wfi01_fixtures(dir.path(), nrows, ncols);

    let lookup = TableLookup::from_file(&table_path).unwrap();
    let step = DqInitStep::new(Arc::new(lookup), Arc::new(JsonMaskLoader::new()));

    // Uncalibrated exposure: no quality arrays persisted yet.
    let mut exposure = RampExposure::new(
        Array4::zeros(shape),
        ExposureMetadata::new("WFI", "WFI01", "WFI_IMAGE"),
    );

    let outcome = step.apply(&mut exposure, None).unwrap();

    assert_eq!(exposure.pixel_dq[[10, 20]], 0x400);
    assert_eq!(exposure.pixel_dq[[30, 40]], 0x800);
    assert_eq!(exposure.flagged_pixel_count(), 2);
    assert_eq!(exposure.pixel_dq.dim(), (nrows, ncols));

    assert!(
        outcome
            .reference
            .to_string_lossy()
            .contains("wfi_mask_0001")
    );
    assert_eq!(
        outcome.flags_present,
        vec![(10, "DEAD".to_string()), (11, "HOT".to_string())]
    );
    assert_eq!(exposure.meta.step_status("dq_init"), StepStatus::Complete);
}

#[test]
fn test_wfi01_image_scenario() {
    run_scenario((2, 6, 64, 64));
}

// Full-frame variant of the same scenario. The science cube alone is
// ~800 MB, so this only runs when asked for explicitly:
// cargo test -p rampcal --test regression_test -- --ignored
#[test]
#[ignore = "allocates full-frame 4096x4096 arrays"]
fn test_wfi01_image_scenario_full_frame() {
    run_scenario((2, 6, 4096, 4096));
}

// Artifacts may declare their own bit conventions in dq_def. The merge
// works on raw words; the declared names only drive reporting.
#[test]
fn test_mask_with_artifact_local_dq_def() {
    let dir = tempdir().unwrap();

    let mut flag_map = Array2::<u32>::zeros((64, 64));
    flag_map[[10, 20]] = 0x1;
    flag_map[[30, 40]] = 0x2;
    let mask = serde_json::json!({
        "meta": { "detector": "WFI01" },
        "dq_def": [
            { "bit": 0, "name": "DEAD" },
            { "bit": 1, "name": "HOT" }
        ],
        "flag_map": serde_json::to_value(flag_map).unwrap(),
    });
    let mask_path = dir.path().join("local_convention_mask.json");
    std::fs::write(&mask_path, serde_json::to_string(&mask).unwrap()).unwrap();

    let lookup = TableLookup::from_rules(Vec::new());
    let step = DqInitStep::new(Arc::new(lookup), Arc::new(JsonMaskLoader::new()));

    let mut exposure = RampExposure::new(
        Array4::zeros((2, 6, 64, 64)),
        ExposureMetadata::new("WFI", "WFI01", "WFI_IMAGE"),
    );
    let outcome = step.apply(&mut exposure, Some(&mask_path)).unwrap();

    assert_eq!(exposure.pixel_dq[[10, 20]], 0x1);
    assert_eq!(exposure.pixel_dq[[30, 40]], 0x2);
    assert_eq!(exposure.flagged_pixel_count(), 2);
    assert_eq!(
        outcome.flags_present,
        vec![(0, "DEAD".to_string()), (1, "HOT".to_string())]
    );
    assert_eq!(outcome.undeclared_bits, 0);
}

#[test]
fn test_wfi01_grism_uses_same_mask() {
    let dir = tempdir().unwrap();
    let table_path = write_wfi01_fixtures(dir.path(), 64, 64);

    let lookup = TableLookup::from_file(&table_path).unwrap();
    let step = DqInitStep::new(Arc::new(lookup), Arc::new(JsonMaskLoader::new()));

    let mut exposure = RampExposure::new(
        Array4::zeros((2, 6, 64, 64)),
        ExposureMetadata::new("WFI", "WFI01", "WFI_GRISM"),
    );

    // The wildcard exposure_type rule covers grism data too.
    step.apply(&mut exposure, None).unwrap();
    assert_eq!(exposure.pixel_dq[[10, 20]], 0x400);
    assert_eq!(exposure.pixel_dq[[30, 40]], 0x800);
}
