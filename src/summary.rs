//! Packages a [`SurveyStats`] with its source into an ordered list of
//! labelled metrics for printing and logging.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::stats::SurveyStats;

/// A single metric value as it is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Percent(u32),
    Hours(BTreeSet<String>),
    NotRecorded,
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Percent(p) => write!(f, "{p}%"),
            MetricValue::Hours(hours) => {
                let joined: Vec<&str> = hours.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
            MetricValue::NotRecorded => write!(f, "not recorded"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub source: String,
    pub generated_at: DateTime<Local>,
    pub stats: SurveyStats,
}

impl AnalysisSummary {
    pub fn new(source: &str, stats: SurveyStats) -> Self {
        Self {
            source: source.to_string(),
            generated_at: Local::now(),
            stats,
        }
    }

    /// Labelled metrics in a fixed order.
    pub fn entries(&self) -> Vec<(String, MetricValue)> {
        let s = &self.stats;
        vec![
            ("Total Vehicles".to_string(), MetricValue::Count(s.total_vehicles)),
            ("Total Trucks".to_string(), MetricValue::Count(s.trucks)),
            ("Electric Vehicles".to_string(), MetricValue::Count(s.electric_vehicles)),
            ("Two-Wheeled Vehicles".to_string(), MetricValue::Count(s.two_wheeled)),
            (
                format!("Buses Heading {} at {}", s.bus_direction, s.primary_junction),
                MetricValue::Count(s.primary_buses_inbound),
            ),
            ("No Turns".to_string(), MetricValue::Count(s.no_turns)),
            ("Over Speeding Vehicles".to_string(), MetricValue::Count(s.over_speed)),
            ("Truck Percentage".to_string(), MetricValue::Percent(s.truck_percentage)),
            (
                "Avg Bicycles per Hour".to_string(),
                MetricValue::Count(s.avg_bicycles_per_hour as usize),
            ),
            (
                format!("{} Vehicles", s.primary_junction),
                MetricValue::Count(s.primary_vehicles),
            ),
            (
                format!("{} Vehicles", s.secondary_junction),
                MetricValue::Count(s.secondary_vehicles),
            ),
            (
                format!("Scooter Percentage {}", s.primary_junction),
                MetricValue::Percent(s.primary_scooter_percentage),
            ),
            (
                format!("Peak Hour(s) {}", s.secondary_junction),
                MetricValue::Hours(s.secondary_peak_hours.clone()),
            ),
            (
                "Total Rain Hours".to_string(),
                s.rain_hours.map_or(MetricValue::NotRecorded, MetricValue::Count),
            ),
        ]
    }
}
