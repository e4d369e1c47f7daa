//! CSV loader for per-vehicle survey rows.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::SurveyError;

/// One observed vehicle, exactly as it appears in the source file.
///
/// All fields stay as text; coercion happens where a metric needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleObservation {
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "timeOfDay", default)]
    pub time_of_day: String,
    #[serde(rename = "JunctionName", default)]
    pub junction: String,
    #[serde(rename = "VehicleType", default)]
    pub vehicle_type: String,
    #[serde(rename = "travel_Direction_in", default)]
    pub direction_in: String,
    #[serde(rename = "travel_Direction_out", default)]
    pub direction_out: String,
    #[serde(rename = "VehicleSpeed", default)]
    pub speed: String,
    #[serde(rename = "JunctionSpeedLimit", default)]
    pub speed_limit: String,
    #[serde(rename = "elctricHybrid", default)]
    pub electric_hybrid: String,
    #[serde(rename = "Weather_Conditions", default)]
    pub weather: Option<String>,
}

impl VehicleObservation {
    pub fn is_electric(&self) -> bool {
        matches!(
            self.electric_hybrid.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )
    }

    pub fn is_no_turn(&self) -> bool {
        self.direction_in == self.direction_out
    }

    /// Whether the observed speed exceeds the junction limit.
    ///
    /// `row` is the 1-based data row, used only for error reporting.
    pub fn is_speeding(&self, row: usize) -> Result<bool, SurveyError> {
        let speed = parse_number(&self.speed, row, "VehicleSpeed")?;
        let limit = parse_number(&self.speed_limit, row, "JunctionSpeedLimit")?;
        Ok(speed > limit)
    }
}

fn parse_number(raw: &str, row: usize, field: &'static str) -> Result<f64, SurveyError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SurveyError::Parse {
            row,
            field,
            value: raw.to_string(),
        })
}

/// Reads every row of the CSV at `path`, preserving file order.
///
/// # Errors
///
/// [`SurveyError::NotFound`] if the file does not exist, [`SurveyError::Csv`]
/// if the file is not readable CSV.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_observations(path: impl AsRef<Path>) -> Result<Vec<VehicleObservation>, SurveyError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SurveyError::NotFound(path.display().to_string()));
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let observations = read_observations(&mut rdr)?;

    debug!(rows = observations.len(), "Loaded survey rows");
    Ok(observations)
}

/// Reads observations from any CSV reader with a header row.
pub fn read_observations<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<VehicleObservation>, SurveyError> {
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: VehicleObservation = result?;
        rows.push(record);
    }
    Ok(rows)
}

/// Distinct `Date` values in first-seen order.
pub fn distinct_dates(observations: &[VehicleObservation]) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for obs in observations {
        if !dates.contains(&obs.date) {
            dates.push(obs.date.clone());
        }
    }
    dates
}
