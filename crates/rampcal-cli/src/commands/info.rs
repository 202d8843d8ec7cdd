//! Info command - show exposure metadata and a data-quality summary.

use std::path::PathBuf;

use colored::Colorize;
use rampcal::{RampExposure, dq::flags};

pub fn run(exposure_path: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !exposure_path.exists() {
        return Err(format!("File not found: {}", exposure_path.display()).into());
    }

    let exposure = RampExposure::load(&exposure_path)?;
    let (nints, ngroups, nrows, ncols) = exposure.science.dim();

    // Per-condition pixel counts over the assigned vocabulary.
    let mut flag_counts: Vec<(String, usize)> = Vec::new();
    for (bit, def) in flags::standard_dq_def() {
        let count = exposure
            .pixel_dq
            .iter()
            .filter(|&&word| word & (1u32 << bit) != 0)
            .count();
        if count > 0 {
            flag_counts.push((def.name, count));
        }
    }

    if json {
        let summary = serde_json::json!({
            "file": exposure_path.display().to_string(),
            "instrument": exposure.meta.instrument,
            "detector": exposure.meta.detector,
            "exposure_type": exposure.meta.exposure_type,
            "science_shape": [nints, ngroups, nrows, ncols],
            "flagged_pixels": exposure.flagged_pixel_count(),
            "flag_counts": flag_counts
                .iter()
                .map(|(name, count)| serde_json::json!({ "name": name, "pixels": count }))
                .collect::<Vec<_>>(),
            "reference_files": exposure.meta.reference_files,
            "cal_steps": exposure.meta.cal_steps,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Exposure".cyan().bold(),
        exposure_path.display().to_string().white()
    );
    println!(
        "  {} {} / {} / {}",
        "Observation:".yellow().bold(),
        exposure.meta.instrument,
        exposure.meta.detector,
        exposure.meta.exposure_type
    );
    println!("  Science cube: ({nints}, {ngroups}, {nrows}, {ncols})");
    println!(
        "  Flagged pixels: {} of {}",
        exposure.flagged_pixel_count().to_string().white().bold(),
        nrows * ncols
    );
    for (name, count) in &flag_counts {
        println!("    {:18} {}", name, count);
    }

    if !exposure.meta.reference_files.is_empty() {
        println!("  {}", "References used:".yellow().bold());
        for (category, identifier) in &exposure.meta.reference_files {
            println!("    {:8} {}", category, identifier);
        }
    }
    if !exposure.meta.cal_steps.is_empty() {
        println!("  {}", "Calibration steps:".yellow().bold());
        for (step, status) in &exposure.meta.cal_steps {
            println!("    {:12} {:?}", step, status);
        }
    }

    Ok(())
}
