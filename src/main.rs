//! Bond Schedule CLI
//!
//! Builds the payment schedule of a bond or loan and prints it as a table,
//! CSV or JSON (summary, records and chart series).
//!
//! Example:
//!     bond_schedule -v 100 0 -c 0.06 -s fullyAmoritized -n 12 -y 15

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use bond_schedule::report::{self, ScheduleReport};
use bond_schedule::schedule::DEFAULT_PRECISION;
use bond_schedule::{RepaymentPolicy, Schedule, ScheduleBuilder, ScheduleConfig, ScheduleParameters, ScheduleTerms};

/// Develop the schedule of payments for a bond over its lifetime until maturity
#[derive(Parser)]
#[command(name = "bond_schedule")]
#[command(version, about, long_about = None)]
#[command(after_help = "Example:\n  bond_schedule -v 100 0 -c 0.06 -s fullyAmoritized -n 12 -y 15")]
struct Cli {
    /// Present and (optional) future value: PV [FV]
    #[arg(
        short = 'v',
        long = "value",
        num_args = 1..=2,
        value_names = ["PV", "FV"],
        default_values_t = [100.0, 0.0],
        allow_negative_numbers = true
    )]
    value: Vec<f64>,

    /// Annualized coupon rate stated as a decimal
    #[arg(short = 'c', long = "coupon-rate", default_value_t = 0.03, allow_negative_numbers = true)]
    coupon_rate: f64,

    /// Schedule type: sinkingFund, fullyAmoritized or bullet
    #[arg(short = 's', long = "schedule-type", default_value = "bullet")]
    schedule_type: String,

    /// Fixed payment at the end of each period (required for sinkingFund)
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    payment: Option<f64>,

    /// Number of payment periods per year
    #[arg(short = 'n', long = "periods-per-year", default_value_t = 1)]
    periods_per_year: u32,

    /// Number of years until maturity
    #[arg(short = 'y', long, default_value_t = 15)]
    years: u32,

    /// Decimal digits kept after every arithmetic step
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Limit the number of periods shown in the table
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl Cli {
    fn terms(&self) -> ScheduleTerms {
        ScheduleTerms {
            label: None,
            present_value: self.value.first().copied().unwrap_or(100.0),
            future_value: self.value.get(1).copied().unwrap_or(0.0),
            annual_rate: self.coupon_rate,
            schedule_type: self.schedule_type.clone(),
            periods_per_year: self.periods_per_year,
            years: self.years,
            payment: self.payment,
        }
    }
}

/// Sinking fund payments are not checked by the builder; flag the obvious shortfalls here
fn check_sinking_fund(params: &ScheduleParameters, schedule: &Schedule) {
    if params.policy != RepaymentPolicy::SinkingFund {
        return;
    }

    if let Some(payment) = params.payment {
        let first_interest = params.present_value * params.periodic_rate;
        if payment <= first_interest {
            log::warn!(
                "Payment {} does not exceed first-period interest {:.3}; principal will not amortize",
                payment,
                first_interest
            );
        }
    }

    let tolerance = schedule.len() as f64 * 10f64.powi(-(schedule.precision() as i32));
    let residual = schedule.final_balance() - params.future_value;
    if residual.abs() > tolerance {
        log::warn!(
            "Sinking fund leaves a balance of {:.3} at maturity (target {:.3})",
            schedule.final_balance(),
            params.future_value
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let terms = cli.terms();

    let params = terms.to_parameters().context("Invalid schedule terms")?;
    log::debug!("Schedule parameters: {:?}", params);

    let builder = ScheduleBuilder::new(ScheduleConfig::with_precision(cli.precision));
    let schedule = builder.build(&params).context("Failed to build schedule")?;
    log::info!("Built {} schedule with {} periods", schedule.policy(), schedule.len());

    check_sinking_fund(&params, &schedule);

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match cli.format {
        OutputFormat::Table => write!(writer, "{}", report::render_table(&schedule, cli.rows))?,
        OutputFormat::Csv => report::write_csv(&schedule, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &ScheduleReport::new(schedule))?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    if let Some(path) = &cli.output {
        log::info!("Schedule written to {}", path.display());
    }

    Ok(())
}
