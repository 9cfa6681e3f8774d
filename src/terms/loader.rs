//! Load schedule terms from CSV

use super::ScheduleTerms;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the batch terms file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "PresentValue")]
    present_value: f64,
    #[serde(rename = "FutureValue")]
    future_value: f64,
    #[serde(rename = "AnnualRate")]
    annual_rate: f64,
    #[serde(rename = "ScheduleType")]
    schedule_type: String,
    #[serde(rename = "PeriodsPerYear")]
    periods_per_year: u32,
    #[serde(rename = "Years")]
    years: u32,
    #[serde(rename = "Payment")]
    payment: Option<f64>,
}

impl CsvRow {
    /// Schedule type and period count are resolved per row by `ScheduleTerms::to_parameters`
    fn to_terms(self) -> ScheduleTerms {
        let label = match self.label.trim() {
            "" => None,
            label => Some(label.to_string()),
        };

        ScheduleTerms {
            label,
            present_value: self.present_value,
            future_value: self.future_value,
            annual_rate: self.annual_rate,
            schedule_type: self.schedule_type,
            periods_per_year: self.periods_per_year,
            years: self.years,
            payment: self.payment,
        }
    }
}

/// Load all term sets from a CSV file
pub fn load_terms<P: AsRef<Path>>(path: P) -> Result<Vec<ScheduleTerms>, Box<dyn Error>> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)?;
    let terms = read_terms(reader)?;
    log::debug!("Loaded {} term sets from {}", terms.len(), path.display());
    Ok(terms)
}

/// Load term sets from any reader (e.g., string buffer, request body)
pub fn load_terms_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ScheduleTerms>, Box<dyn Error>> {
    read_terms(Reader::from_reader(reader))
}

fn read_terms<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ScheduleTerms>, Box<dyn Error>> {
    let mut terms = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result.map_err(|e| format!("Row {}: {}", index + 1, e))?;
        terms.push(row.to_terms());
    }

    Ok(terms)
}
