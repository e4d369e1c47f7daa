//! Survey date selection and the file naming scheme built from it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::SurveyConfig;
use crate::error::SurveyError;

/// Which component of a date failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    /// Message shown when a value is outside the accepted range.
    pub fn range_message(&self, config: &SurveyConfig) -> String {
        match self {
            DatePart::Day => "Out of range - values must be in the range 1 and 31.".to_string(),
            DatePart::Month => "Out of range - values must be in the range 1 to 12.".to_string(),
            DatePart::Year => format!(
                "Out of range - values must range from {} and {}.",
                config.min_year, config.max_year
            ),
        }
    }

    pub fn bounds(&self, config: &SurveyConfig) -> (i32, i32) {
        match self {
            DatePart::Day => (1, 31),
            DatePart::Month => (1, 12),
            DatePart::Year => (config.min_year, config.max_year),
        }
    }
}

/// A validated survey date. Components are range-checked only; `31/02`
/// is accepted and simply resolves to a file that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl SurveyDate {
    pub fn new(day: i32, month: i32, year: i32, config: &SurveyConfig) -> Result<Self, SurveyError> {
        for (part, value) in [(DatePart::Day, day), (DatePart::Month, month), (DatePart::Year, year)] {
            let (lo, hi) = part.bounds(config);
            if !(lo..=hi).contains(&value) {
                return Err(SurveyError::InvalidDate(part.range_message(config)));
            }
        }
        Ok(Self {
            day: day as u32,
            month: month as u32,
            year,
        })
    }

    /// Parses `DD/MM/YYYY`.
    pub fn parse(text: &str, config: &SurveyConfig) -> Result<Self, SurveyError> {
        let parts: Vec<&str> = text.trim().split('/').collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(SurveyError::InvalidDate(format!(
                "expected a date as DD/MM/YYYY, got {text:?}"
            )));
        };
        let num = |s: &str| {
            s.parse::<i32>()
                .map_err(|_| SurveyError::InvalidDate(format!("Integer required, got {s:?}")))
        };
        Self::new(num(*day)?, num(*month)?, num(*year)?, config)
    }

    /// `traffic_dataDDMMYYYY.csv`
    pub fn file_name(&self) -> String {
        format!("traffic_data{:02}{:02}{}.csv", self.day, self.month, self.year)
    }

    /// Path of the dataset for this date inside `data_dir`.
    pub fn resolve(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl fmt::Display for SurveyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.day, self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_zero_padded() {
        let date = SurveyDate::new(5, 6, 2024, &SurveyConfig::default()).unwrap();
        assert_eq!(date.file_name(), "traffic_data05062024.csv");
        assert_eq!(date.to_string(), "05/06/2024");
    }

    #[test]
    fn test_resolve_joins_data_dir() {
        let date = SurveyDate::new(15, 6, 2024, &SurveyConfig::default()).unwrap();
        assert_eq!(
            date.resolve(Path::new("data")),
            Path::new("data").join("traffic_data15062024.csv")
        );
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        let config = SurveyConfig::default();
        assert!(SurveyDate::new(0, 6, 2024, &config).is_err());
        assert!(SurveyDate::new(32, 6, 2024, &config).is_err());
        assert!(SurveyDate::new(1, 13, 2024, &config).is_err());
        assert!(SurveyDate::new(1, 1, 1999, &config).is_err());
        assert!(SurveyDate::new(1, 1, 2025, &config).is_err());
        assert!(SurveyDate::new(31, 12, 2000, &config).is_ok());
    }

    #[test]
    fn test_year_range_follows_config() {
        let config = SurveyConfig {
            max_year: 2030,
            ..Default::default()
        };
        assert!(SurveyDate::new(1, 1, 2030, &config).is_ok());
    }

    #[test]
    fn test_parse() {
        let config = SurveyConfig::default();
        let date = SurveyDate::parse("15/06/2024", &config).unwrap();
        assert_eq!(date, SurveyDate { day: 15, month: 6, year: 2024 });

        assert!(SurveyDate::parse("15-06-2024", &config).is_err());
        assert!(SurveyDate::parse("xx/06/2024", &config).is_err());
        assert!(SurveyDate::parse("15/06/2024/1", &config).is_err());
    }
}
