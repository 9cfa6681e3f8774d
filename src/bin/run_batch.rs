//! Build schedules for every term set in a CSV file
//!
//! Usage: run_batch <terms.csv> [output.csv]
//!
//! The terms file has columns
//! Label,PresentValue,FutureValue,AnnualRate,ScheduleType,PeriodsPerYear,Years,Payment.
//! Rounding precision can be overridden with SCHEDULE_PRECISION.

use std::fs::File;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};

use bond_schedule::batch::{write_outcomes_csv, BatchRunner};
use bond_schedule::terms::load_terms;
use bond_schedule::ScheduleConfig;

const DEFAULT_OUTPUT_PATH: &str = "batch_schedule_output.csv";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .ok_or_else(|| anyhow!("usage: run_batch <terms.csv> [output.csv]"))?;
    let output_path = args.next().unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

    let start = Instant::now();
    println!("Loading terms from {}...", input_path);

    let terms = load_terms(&input_path)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Failed to load terms from {}", input_path))?;
    println!("Loaded {} term sets in {:?}", terms.len(), start.elapsed());

    let config = ScheduleConfig::from_env();
    println!("Building schedules (precision {})...", config.precision);

    let build_start = Instant::now();
    let outcomes = BatchRunner::new(config).run(&terms);
    println!("Schedules complete in {:?}", build_start.elapsed());

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path))?;
    write_outcomes_csv(&outcomes, file)?;
    println!("Output written to {}", output_path);

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
    println!("\nBatch Summary:");
    println!("  Built:  {}", outcomes.len() - failed.len());
    println!("  Failed: {}", failed.len());
    for outcome in &failed {
        if let Err(e) = &outcome.result {
            println!("    {}: {}", outcome.label, e);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
