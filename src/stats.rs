use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::SurveyConfig;
use crate::error::SurveyError;
use crate::hourly::{hour_bucket, peak_buckets};
use crate::record::VehicleObservation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurveyStats {
    pub total_vehicles: usize,

    // vehicle categories
    pub trucks: usize,
    pub electric_vehicles: usize,
    pub two_wheeled: usize,
    pub primary_buses_inbound: usize,
    pub bus_direction: String,

    // movement
    pub no_turns: usize,
    pub over_speed: usize,

    // derived
    pub truck_percentage: u32,
    pub avg_bicycles_per_hour: u32,

    // junctions
    pub primary_junction: String,
    pub secondary_junction: String,
    pub primary_vehicles: usize,
    pub secondary_vehicles: usize,
    pub primary_scooter_percentage: u32,
    pub secondary_peak_hours: BTreeSet<String>,

    /// `None` when the source carries no weather column.
    pub rain_hours: Option<usize>,
}

impl SurveyStats {
    /// Computes every metric for one dataset.
    ///
    /// # Errors
    ///
    /// [`SurveyError::Parse`] if a speed or speed limit is not numeric.
    pub fn from_observations(
        observations: &[VehicleObservation],
        config: &SurveyConfig,
    ) -> Result<Self, SurveyError> {
        let mut s = SurveyStats {
            primary_junction: config.primary_junction.clone(),
            secondary_junction: config.secondary_junction.clone(),
            bus_direction: config.bus_direction_in.clone(),
            ..Default::default()
        };

        let mut primary_scooters = 0usize;
        let mut bicycles_per_hour: BTreeMap<String, usize> = BTreeMap::new();
        let mut secondary_per_hour: BTreeMap<String, usize> = BTreeMap::new();
        let mut rain_buckets: BTreeSet<String> = BTreeSet::new();
        let mut weather_recorded = false;
        let rain_keyword = config.rain_keyword.to_lowercase();

        s.total_vehicles = observations.len();

        for (idx, obs) in observations.iter().enumerate() {
            let row = idx + 1;
            let bucket = hour_bucket(&obs.time_of_day);
            let at_primary = obs.junction == config.primary_junction;
            let at_secondary = obs.junction == config.secondary_junction;

            if obs.vehicle_type == config.truck_type {
                s.trucks += 1;
            }

            if obs.is_electric() {
                s.electric_vehicles += 1;
            }

            if config.is_two_wheeled(&obs.vehicle_type) {
                s.two_wheeled += 1;
            }

            if at_primary
                && obs.direction_in == config.bus_direction_in
                && obs.vehicle_type == config.bus_type
            {
                s.primary_buses_inbound += 1;
            }

            if obs.is_no_turn() {
                s.no_turns += 1;
            }

            if obs.is_speeding(row)? {
                s.over_speed += 1;
            }

            if at_primary {
                s.primary_vehicles += 1;

                if obs.vehicle_type == config.scooter_type {
                    primary_scooters += 1;
                }
            }

            if at_secondary {
                s.secondary_vehicles += 1;

                if let Some(hour) = bucket {
                    *secondary_per_hour.entry(hour.to_string()).or_insert(0) += 1;
                }
            }

            if obs.vehicle_type == config.bicycle_type {
                if let Some(hour) = bucket {
                    *bicycles_per_hour.entry(hour.to_string()).or_insert(0) += 1;
                }
            }

            if let Some(weather) = &obs.weather {
                weather_recorded = true;

                if weather.to_lowercase().contains(&rain_keyword) {
                    if let Some(hour) = bucket {
                        rain_buckets.insert(hour.to_string());
                    }
                }
            }
        }

        s.truck_percentage = Self::pct(s.trucks, s.total_vehicles);
        s.primary_scooter_percentage = Self::pct(primary_scooters, s.primary_vehicles);
        s.avg_bicycles_per_hour = Self::avg_per_bucket(&bicycles_per_hour);
        s.secondary_peak_hours = peak_buckets(&secondary_per_hour);
        s.rain_hours = weather_recorded.then(|| rain_buckets.len());

        Ok(s)
    }

    /// `part / total` as a whole percentage, 0 when `total` is 0.
    ///
    /// Halves round to the nearest even number.
    pub fn pct(part: usize, total: usize) -> u32 {
        if total == 0 {
            0
        } else {
            ((part as f64 / total as f64) * 100.0).round_ties_even() as u32
        }
    }

    /// Mean count per distinct bucket, rounded; 0 with no buckets.
    pub fn avg_per_bucket(counts: &BTreeMap<String, usize>) -> u32 {
        if counts.is_empty() {
            0
        } else {
            let sum: usize = counts.values().sum();
            (sum as f64 / counts.len() as f64).round_ties_even() as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vehicle(junction: &str, vehicle_type: &str) -> VehicleObservation {
        VehicleObservation {
            date: "15/06/2024".into(),
            time_of_day: "08:00:00".into(),
            junction: junction.into(),
            vehicle_type: vehicle_type.into(),
            direction_in: "N".into(),
            direction_out: "S".into(),
            speed: "20".into(),
            speed_limit: "30".into(),
            electric_hybrid: "False".into(),
            weather: None,
        }
    }

    fn at_hour(mut obs: VehicleObservation, time: &str) -> VehicleObservation {
        obs.time_of_day = time.into();
        obs
    }

    const ELM: &str = "Elm Avenue/Rabbit Road";
    const HANLEY: &str = "Hanley Highway/Westway";

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(SurveyStats::pct(10, 0), 0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(SurveyStats::pct(50, 100), 50);
        assert_eq!(SurveyStats::pct(1, 4), 25);
        assert_eq!(SurveyStats::pct(1, 3), 33);
        assert_eq!(SurveyStats::pct(2, 3), 67);
        assert_eq!(SurveyStats::pct(7, 7), 100);
    }

    #[test]
    fn test_pct_rounds_half_to_even() {
        assert_eq!(SurveyStats::pct(1, 8), 12);
        assert_eq!(SurveyStats::pct(3, 8), 38);
    }

    #[test]
    fn test_avg_per_bucket() {
        let counts: BTreeMap<String, usize> =
            [("08".to_string(), 3), ("09".to_string(), 4)].into();
        assert_eq!(SurveyStats::avg_per_bucket(&counts), 4);
        assert_eq!(SurveyStats::avg_per_bucket(&BTreeMap::new()), 0);
    }

    #[test]
    fn test_empty_input() {
        let stats = SurveyStats::from_observations(&[], &SurveyConfig::default()).unwrap();

        assert_eq!(stats.total_vehicles, 0);
        assert_eq!(stats.trucks, 0);
        assert_eq!(stats.truck_percentage, 0);
        assert_eq!(stats.primary_scooter_percentage, 0);
        assert_eq!(stats.avg_bicycles_per_hour, 0);
        assert!(stats.secondary_peak_hours.is_empty());
        assert_eq!(stats.rain_hours, None);
    }

    #[test]
    fn test_trucks_and_two_wheelers() {
        let rows = vec![
            vehicle(ELM, "Truck"),
            vehicle(ELM, "Truck"),
            vehicle(ELM, "Bicycle"),
            vehicle(ELM, "Scooter"),
        ];
        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();

        assert_eq!(stats.total_vehicles, 4);
        assert_eq!(stats.trucks, 2);
        assert_eq!(stats.truck_percentage, 50);
        assert_eq!(stats.two_wheeled, 2);
        assert_eq!(stats.primary_vehicles, 4);
        assert_eq!(stats.primary_scooter_percentage, 25);
    }

    #[test]
    fn test_buses_need_all_three_conditions() {
        let mut wrong_direction = vehicle(ELM, "Buss");
        wrong_direction.direction_in = "S".into();
        let rows = vec![
            vehicle(ELM, "Buss"),
            vehicle(HANLEY, "Buss"),
            wrong_direction,
            vehicle(ELM, "Car"),
        ];
        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();
        assert_eq!(stats.primary_buses_inbound, 1);
    }

    #[test]
    fn test_no_turns_electric_and_speeding() {
        let mut straight = vehicle(HANLEY, "Car");
        straight.direction_out = "N".into();
        straight.electric_hybrid = "True".into();
        let mut fast = vehicle(HANLEY, "Car");
        fast.speed = "45".into();
        let rows = vec![straight, fast, vehicle(ELM, "Car")];

        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();
        assert_eq!(stats.no_turns, 1);
        assert_eq!(stats.electric_vehicles, 1);
        assert_eq!(stats.over_speed, 1);
        assert_eq!(stats.secondary_vehicles, 2);
    }

    #[test]
    fn test_non_numeric_speed_is_parse_error() {
        let mut bad = vehicle(ELM, "Car");
        bad.speed = "abc".into();
        let rows = vec![vehicle(ELM, "Car"), bad];

        match SurveyStats::from_observations(&rows, &SurveyConfig::default()) {
            Err(SurveyError::Parse { row, field, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "VehicleSpeed");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_bicycles_per_hour_skips_blank_times() {
        let rows = vec![
            at_hour(vehicle(ELM, "Bicycle"), "08:00"),
            at_hour(vehicle(ELM, "Bicycle"), "08:30"),
            at_hour(vehicle(ELM, "Bicycle"), "08:40"),
            at_hour(vehicle(HANLEY, "Bicycle"), "10:05"),
            at_hour(vehicle(HANLEY, "Bicycle"), ""),
        ];
        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();
        // (3 + 1) / 2 buckets
        assert_eq!(stats.avg_bicycles_per_hour, 2);
    }

    #[test]
    fn test_blank_times_do_not_form_a_bucket() {
        let rows = vec![
            at_hour(vehicle(HANLEY, "Bicycle"), "08:00"),
            at_hour(vehicle(HANLEY, "Bicycle"), "   "),
            at_hour(vehicle(HANLEY, "Car"), "  "),
        ];
        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();

        assert_eq!(stats.avg_bicycles_per_hour, 1);
        assert_eq!(stats.secondary_peak_hours, BTreeSet::from(["08".to_string()]));
    }

    #[test]
    fn test_secondary_peak_hours_keep_ties() {
        let mut rows = Vec::new();
        for time in ["08:00", "08:10", "09:00", "09:10", "10:00"] {
            rows.push(at_hour(vehicle(HANLEY, "Car"), time));
        }
        rows.push(at_hour(vehicle(ELM, "Car"), "10:20"));
        rows.push(at_hour(vehicle(ELM, "Car"), "10:30"));

        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();
        let expected: BTreeSet<String> = ["08".to_string(), "09".to_string()].into();
        assert_eq!(stats.secondary_peak_hours, expected);
    }

    #[test]
    fn test_rain_hours_counts_distinct_buckets() {
        let weather = |time: &str, w: &str| {
            let mut obs = at_hour(vehicle(ELM, "Car"), time);
            obs.weather = Some(w.into());
            obs
        };
        let rows = vec![
            weather("08:00", "Light Rain"),
            weather("08:30", "Heavy Rain"),
            weather("09:00", "Clear"),
            weather("10:00", "heavy rain"),
        ];
        let stats = SurveyStats::from_observations(&rows, &SurveyConfig::default()).unwrap();
        assert_eq!(stats.rain_hours, Some(2));
    }

    #[test]
    fn test_rain_hours_zero_when_recorded_but_dry() {
        let mut obs = vehicle(ELM, "Car");
        obs.weather = Some("Clear".into());
        let stats = SurveyStats::from_observations(&[obs], &SurveyConfig::default()).unwrap();
        assert_eq!(stats.rain_hours, Some(0));
    }

    #[test]
    fn test_custom_config_junctions() {
        let config = SurveyConfig {
            primary_junction: "Station Road".into(),
            ..Default::default()
        };
        let rows = vec![vehicle("Station Road", "Scooter"), vehicle(ELM, "Scooter")];
        let stats = SurveyStats::from_observations(&rows, &config).unwrap();

        assert_eq!(stats.primary_junction, "Station Road");
        assert_eq!(stats.primary_vehicles, 1);
        assert_eq!(stats.primary_scooter_percentage, 100);
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let rows = vec![vehicle(ELM, "Truck"), at_hour(vehicle(HANLEY, "Bicycle"), "07:00")];
        let config = SurveyConfig::default();
        let first = SurveyStats::from_observations(&rows, &config).unwrap();
        let second = SurveyStats::from_observations(&rows, &config).unwrap();
        assert_eq!(first, second);
    }
}
