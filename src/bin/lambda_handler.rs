//! AWS Lambda handler for building payment schedules
//!
//! Accepts schedule terms as JSON and returns the summary, the period records
//! and (optionally) the chart series. Invalid terms come back as an `error`
//! field rather than an invocation failure.

use bond_schedule::report::{payment_breakdown, payment_trends, ChartView};
use bond_schedule::{ScheduleBuilder, ScheduleConfig, ScheduleError, ScheduleSummary, ScheduleTerms, PeriodRecord};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Input for one schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    /// Terms; omitted fields take the CLI defaults
    #[serde(flatten)]
    pub terms: ScheduleTerms,

    /// Rounding precision (default: SCHEDULE_PRECISION or 3)
    #[serde(default)]
    pub precision: Option<u32>,

    /// Include chart series in the response
    #[serde(default)]
    pub include_charts: bool,
}

#[derive(Debug, Serialize, Default)]
pub struct ScheduleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScheduleSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<PeriodRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<ChartView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn build_response(request: &ScheduleRequest) -> Result<ScheduleResponse, ScheduleError> {
    let config = request
        .precision
        .map(ScheduleConfig::with_precision)
        .unwrap_or_else(ScheduleConfig::from_env);

    let params = request.terms.to_parameters()?;
    let schedule = ScheduleBuilder::new(config).build(&params)?;

    let charts = if request.include_charts {
        vec![payment_breakdown(&schedule), payment_trends(&schedule)]
    } else {
        Vec::new()
    };

    Ok(ScheduleResponse {
        summary: Some(schedule.summary()),
        charts,
        records: schedule.into_records(),
        error: None,
    })
}

fn handle_request(request: &ScheduleRequest) -> ScheduleResponse {
    match build_response(request) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Rejected schedule request: {}", e);
            ScheduleResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}

async fn handler(event: LambdaEvent<ScheduleRequest>) -> Result<ScheduleResponse, Error> {
    let (request, context) = event.into_parts();
    log::info!(
        "Request {}: {} over {} years",
        context.request_id,
        request.terms.schedule_type,
        request.terms.years
    );
    Ok(handle_request(&request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
