//! Hour-bucket extraction and the hour × junction volume table.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::SurveyError;
use crate::record::VehicleObservation;

/// Text before the first `:` of a time-of-day value, or `None` if the
/// field is blank.
pub fn hour_bucket(time_of_day: &str) -> Option<&str> {
    let time = time_of_day.trim();
    if time.is_empty() {
        return None;
    }
    time.split(':').next().map(str::trim)
}

/// Every bucket whose count equals the maximum. Empty input gives an
/// empty set.
pub fn peak_buckets<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> BTreeSet<K> {
    let Some(max) = counts.values().copied().max() else {
        return BTreeSet::new();
    };
    counts
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(bucket, _)| bucket.clone())
        .collect()
}

/// Vehicle counts keyed by hour (0-23), then by junction name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HourlyVolumeTable {
    volumes: BTreeMap<u8, BTreeMap<String, usize>>,
}

impl HourlyVolumeTable {
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn hours(&self) -> impl Iterator<Item = u8> + '_ {
        self.volumes.keys().copied()
    }

    /// Sorted union of junction names across all hours.
    pub fn junctions(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .volumes
            .values()
            .flat_map(|by_junction| by_junction.keys().map(String::as_str))
            .collect();
        names.into_iter().collect()
    }

    /// Count for `(hour, junction)`; absent pairs are 0.
    pub fn volume(&self, hour: u8, junction: &str) -> usize {
        self.volumes
            .get(&hour)
            .and_then(|by_junction| by_junction.get(junction))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.volumes
            .values()
            .flat_map(|by_junction| by_junction.values())
            .sum()
    }

    /// Largest single cell, used to scale charts.
    pub fn max_volume(&self) -> usize {
        self.volumes
            .values()
            .flat_map(|by_junction| by_junction.values().copied())
            .max()
            .unwrap_or(0)
    }

    /// Hours with the highest count at `junction`; ties are all kept.
    pub fn peak_hours(&self, junction: &str) -> BTreeSet<u8> {
        let counts: BTreeMap<u8, usize> = self
            .volumes
            .iter()
            .filter_map(|(hour, by_junction)| by_junction.get(junction).map(|c| (*hour, *c)))
            .collect();
        peak_buckets(&counts)
    }

    fn increment(&mut self, hour: u8, junction: &str) {
        *self
            .volumes
            .entry(hour)
            .or_default()
            .entry(junction.to_string())
            .or_insert(0) += 1;
    }
}

/// Builds the hourly table from `observations`, keeping only rows whose
/// date equals `target_date` when one is given.
///
/// # Errors
///
/// [`SurveyError::MissingField`] if a counted row has an empty time or
/// junction; [`SurveyError::Parse`] if its hour is not an integer in 0-23.
#[tracing::instrument(skip(observations), fields(rows = observations.len()))]
pub fn group_by_hour(
    observations: &[VehicleObservation],
    target_date: Option<&str>,
) -> Result<HourlyVolumeTable, SurveyError> {
    let mut table = HourlyVolumeTable::default();

    for (idx, obs) in observations.iter().enumerate() {
        if let Some(date) = target_date {
            if obs.date != date {
                continue;
            }
        }
        let row = idx + 1;

        let bucket = hour_bucket(&obs.time_of_day).ok_or(SurveyError::MissingField {
            row,
            field: "timeOfDay",
        })?;
        let hour = bucket
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| SurveyError::Parse {
                row,
                field: "timeOfDay",
                value: obs.time_of_day.clone(),
            })?;

        if obs.junction.is_empty() {
            return Err(SurveyError::MissingField {
                row,
                field: "JunctionName",
            });
        }

        table.increment(hour, &obs.junction);
    }

    debug!(total = table.total(), hours = table.volumes.len(), "Hourly table built");
    Ok(table)
}
