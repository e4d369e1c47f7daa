//! Analysis settings: which junctions and vehicle categories the focus
//! metrics refer to.
//!
//! Stored as a JSON object on disk; every key is optional and falls back to
//! the values used by the published survey datasets:
//! ```json
//! {
//!   "primary_junction": "Elm Avenue/Rabbit Road",
//!   "secondary_junction": "Hanley Highway/Westway",
//!   "bus_type": "Buss",
//!   "max_year": 2024
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SurveyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub primary_junction: String,
    pub secondary_junction: String,
    pub truck_type: String,
    pub bus_type: String,
    pub bus_direction_in: String,
    pub bicycle_type: String,
    pub scooter_type: String,
    pub two_wheeled_types: Vec<String>,
    pub rain_keyword: String,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            primary_junction: "Elm Avenue/Rabbit Road".to_string(),
            secondary_junction: "Hanley Highway/Westway".to_string(),
            truck_type: "Truck".to_string(),
            // the datasets spell it this way
            bus_type: "Buss".to_string(),
            bus_direction_in: "N".to_string(),
            bicycle_type: "Bicycle".to_string(),
            scooter_type: "Scooter".to_string(),
            two_wheeled_types: vec![
                "Bicycle".to_string(),
                "Motorcycle".to_string(),
                "Scooter".to_string(),
            ],
            rain_keyword: "Rain".to_string(),
            min_year: 2000,
            max_year: 2024,
        }
    }
}

impl SurveyConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, SurveyError> {
        let content = std::fs::read_to_string(path)?;
        let config: SurveyConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path, "Loaded survey config");
        Ok(config)
    }

    /// Loads from `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, SurveyError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SurveyError> {
        let names = [
            ("primary_junction", &self.primary_junction),
            ("secondary_junction", &self.secondary_junction),
            ("truck_type", &self.truck_type),
            ("bus_type", &self.bus_type),
            ("bus_direction_in", &self.bus_direction_in),
            ("bicycle_type", &self.bicycle_type),
            ("scooter_type", &self.scooter_type),
            ("rain_keyword", &self.rain_keyword),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(SurveyError::Config(format!("'{key}' must not be empty")));
            }
        }
        if self.two_wheeled_types.is_empty() {
            return Err(SurveyError::Config(
                "'two_wheeled_types' must name at least one category".to_string(),
            ));
        }
        if self.min_year > self.max_year {
            return Err(SurveyError::Config(format!(
                "year range {}..={} is empty",
                self.min_year, self.max_year
            )));
        }
        Ok(())
    }

    pub fn is_two_wheeled(&self, vehicle_type: &str) -> bool {
        self.two_wheeled_types.iter().any(|t| t == vehicle_type)
    }
}
