//! DQ-init command - merge a reference mask into an exposure's pixel DQ.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rampcal::{DqInitStep, JsonMaskLoader, RampExposure, TableLookup, exposure::dqinit_output_path};

pub fn run(
    exposure_path: PathBuf,
    reference: Option<PathBuf>,
    reference_table: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !exposure_path.exists() {
        return Err(format!("File not found: {}", exposure_path.display()).into());
    }
    if reference.is_none() && reference_table.is_none() {
        return Err("Either --reference or --reference-table is required".into());
    }

    println!(
        "{} {}",
        "Initializing DQ for".cyan().bold(),
        exposure_path.display().to_string().white()
    );

    let mut exposure = RampExposure::load(&exposure_path)?;

    if verbose {
        let (nints, ngroups, nrows, ncols) = exposure.science.dim();
        println!(
            "  {} {} / {} / {}",
            "Exposure:".yellow().bold(),
            exposure.meta.instrument,
            exposure.meta.detector,
            exposure.meta.exposure_type
        );
        println!("  Science cube: ({nints}, {ngroups}, {nrows}, {ncols})");
    }

    let lookup = match reference_table {
        Some(ref table) => TableLookup::from_file(table)?,
        // Explicit reference given: the lookup is never consulted.
        None => TableLookup::from_rules(Vec::new()),
    };
    let step = DqInitStep::new(Arc::new(lookup), Arc::new(JsonMaskLoader::new()));

    let outcome = step.apply(&mut exposure, reference.as_deref())?;

    println!(
        "{} {}",
        "Merged mask".green().bold(),
        outcome.reference.display().to_string().white()
    );
    if outcome.flags_present.is_empty() {
        println!("No conditions flagged - mask is clean");
    } else {
        let names: Vec<&str> = outcome
            .flags_present
            .iter()
            .map(|(_, name)| name.as_str())
            .collect();
        println!(
            "Conditions present: {} ({} flagged pixels)",
            names.join(", ").white().bold(),
            exposure.flagged_pixel_count()
        );
    }
    if outcome.undeclared_bits != 0 {
        println!(
            "{} mask sets undeclared bits {:#010x}",
            "Warning:".yellow().bold(),
            outcome.undeclared_bits
        );
    }

    let output_path = output.unwrap_or_else(|| dqinit_output_path(&exposure_path));
    exposure.save(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
