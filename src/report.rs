//! Presentation of a computed schedule: chart series, text table and CSV

use std::io;

use serde::{Deserialize, Serialize};

use crate::schedule::{Schedule, ScheduleSummary};

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStyle {
    /// Discrete per-period amounts (stem plot)
    Stem,
    /// Continuous trend line
    Line,
}

/// One named series on a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub style: SeriesStyle,
    pub values: Vec<f64>,
}

/// A chart: shared period axis plus one or more series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub title: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub periods: Vec<u32>,
    pub series: Vec<ChartSeries>,
}

impl ChartView {
    fn new(title: &str, schedule: &Schedule) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Periods in bond term".to_string(),
            y_label: None,
            periods: schedule.iter().map(|r| r.period).collect(),
            series: Vec::new(),
        }
    }

    fn with_series(mut self, label: &str, style: SeriesStyle, values: Vec<f64>) -> Self {
        self.series.push(ChartSeries {
            label: label.to_string(),
            style,
            values,
        });
        self
    }
}

/// Total and principal payments made each period, drawn as stems
pub fn payment_breakdown(schedule: &Schedule) -> ChartView {
    let series = schedule.series();
    let mut view = ChartView::new("Payments made each Period", schedule)
        .with_series("Total PMT", SeriesStyle::Stem, series.total_payments)
        .with_series("Principal PMT", SeriesStyle::Stem, series.principal_payments);
    view.y_label = Some("$ Dollars".to_string());
    view
}

/// Principal and interest trends over the term, drawn as lines
pub fn payment_trends(schedule: &Schedule) -> ChartView {
    let series = schedule.series();
    ChartView::new("Payments by Type", schedule)
        .with_series("Principal Schedule", SeriesStyle::Line, series.principal_payments)
        .with_series("Interest Schedule", SeriesStyle::Line, series.interest_payments)
}

/// Everything the presentation side needs, in one serializable value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub summary: ScheduleSummary,
    pub schedule: Schedule,
    pub charts: Vec<ChartView>,
}

impl ScheduleReport {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            summary: schedule.summary(),
            charts: vec![payment_breakdown(&schedule), payment_trends(&schedule)],
            schedule,
        }
    }
}

/// Fixed-width table of the first `max_rows` periods followed by a summary
pub fn render_table(schedule: &Schedule, max_rows: Option<usize>) -> String {
    let width = schedule.precision() as usize;
    let mut out = String::new();

    out.push_str(&format!(
        "{} schedule ({} periods, opening balance {:.*})\n",
        schedule.policy(),
        schedule.len(),
        width,
        schedule.opening_balance()
    ));
    out.push_str(&format!(
        "{:>6} {:>14} {:>14} {:>14} {:>14}\n",
        "Period", "Payment", "Interest", "Principal", "Balance"
    ));
    out.push_str(&format!("{}\n", "-".repeat(66)));

    let limit = max_rows.unwrap_or(schedule.len());
    for record in schedule.iter().take(limit) {
        out.push_str(&format!(
            "{:>6} {:>14.*} {:>14.*} {:>14.*} {:>14.*}\n",
            record.period,
            width,
            record.payment,
            width,
            record.interest,
            width,
            record.principal,
            width,
            record.balance,
        ));
    }

    if schedule.len() > limit {
        out.push_str(&format!("... ({} more periods)\n", schedule.len() - limit));
    }

    let summary = schedule.summary();
    out.push_str("\nSummary:\n");
    if let Some(payment) = summary.level_payment {
        out.push_str(&format!("  Level Payment:   {:.*}\n", width, payment));
    }
    out.push_str(&format!("  Total Payments:  {:.*}\n", width, summary.total_payments));
    out.push_str(&format!("  Total Interest:  {:.*}\n", width, summary.total_interest));
    out.push_str(&format!("  Total Principal: {:.*}\n", width, summary.total_principal));
    out.push_str(&format!("  Final Balance:   {:.*}\n", width, summary.final_balance));

    out
}

/// CSV row written per period
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Payment")]
    payment: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Balance")]
    balance: f64,
}

/// Write the schedule as CSV, one row per period
pub fn write_csv<W: io::Write>(schedule: &Schedule, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    for record in schedule {
        wtr.serialize(CsvRow {
            period: record.period,
            payment: record.payment,
            interest: record.interest,
            principal: record.principal,
            balance: record.balance,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::build_schedule;
    use crate::terms::{RepaymentPolicy, ScheduleParameters};

    fn bullet_note() -> Schedule {
        let params = ScheduleParameters::new(1000.0, 0.0, 0.05 / 2.0, 10, RepaymentPolicy::Bullet);
        build_schedule(&params).unwrap()
    }

    #[test]
    fn test_payment_breakdown() {
        let view = payment_breakdown(&bullet_note());
        assert_eq!(view.periods, (1..=10).collect::<Vec<u32>>());
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[0].label, "Total PMT");
        assert_eq!(view.series[0].style, SeriesStyle::Stem);
        assert_eq!(view.series[0].values[9], 1025.0);
        assert_eq!(view.series[1].values[0], 0.0);
        assert_eq!(view.series[1].values[9], 1000.0);
    }

    #[test]
    fn test_payment_trends() {
        let view = payment_trends(&bullet_note());
        assert_eq!(view.title, "Payments by Type");
        assert!(view.series.iter().all(|s| s.style == SeriesStyle::Line));
        assert!(view.series[1].values.iter().all(|&v| v == 25.0));
    }

    #[test]
    fn test_render_table_truncates() {
        let table = render_table(&bullet_note(), Some(3));
        assert!(table.starts_with("bullet schedule (10 periods, opening balance 1000.000)"));
        assert!(table.contains("... (7 more periods)"));
        assert!(table.contains("Total Interest:  250.000"));
        assert!(table.contains("Final Balance:   0.000"));
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        write_csv(&bullet_note(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Period,Payment,Interest,Principal,Balance");
        assert!(lines[10].starts_with("10,1025"));
    }

    #[test]
    fn test_report_json() {
        let report = ScheduleReport::new(bullet_note());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["charts"].as_array().map(|c| c.len()), Some(2));
        assert_eq!(json["summary"]["total_periods"], 10);
    }
}
