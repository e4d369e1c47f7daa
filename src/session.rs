//! One analysis pass over a single dataset: load, aggregate, group, assemble.
//!
//! Every pass builds its own accumulators, so nothing carries over between
//! datasets analysed in the same run.

use std::path::Path;
use tracing::{info, warn};

use crate::config::SurveyConfig;
use crate::error::SurveyError;
use crate::hourly::{HourlyVolumeTable, group_by_hour};
use crate::record::{VehicleObservation, distinct_dates, load_observations};
use crate::stats::SurveyStats;
use crate::summary::AnalysisSummary;

/// Outcome of one pass. Metrics and grouping fail independently; a bad
/// speed value does not hide the hourly table and vice versa.
#[derive(Debug)]
pub struct PassReport {
    pub source: String,
    pub rows: usize,
    /// Date the hourly table was built for (first date in the file).
    pub target_date: Option<String>,
    /// All dates present, in first-seen order.
    pub dates: Vec<String>,
    pub summary: Result<AnalysisSummary, SurveyError>,
    pub hourly: Result<HourlyVolumeTable, SurveyError>,
}

impl PassReport {
    pub fn has_multiple_dates(&self) -> bool {
        self.dates.len() > 1
    }
}

/// Runs metrics and grouping over already-loaded observations.
pub fn analyze_observations(
    source: &str,
    observations: &[VehicleObservation],
    config: &SurveyConfig,
) -> PassReport {
    if observations.is_empty() {
        warn!(source, "Dataset has no rows");
    }

    let dates = distinct_dates(observations);
    let target_date = dates.first().cloned();
    if dates.len() > 1 {
        warn!(
            source,
            dates = dates.len(),
            using = target_date.as_deref().unwrap_or_default(),
            "The file contains multiple dates. Using the first date."
        );
    }

    let summary = SurveyStats::from_observations(observations, config)
        .map(|stats| AnalysisSummary::new(source, stats));
    let hourly = group_by_hour(observations, target_date.as_deref());

    PassReport {
        source: source.to_string(),
        rows: observations.len(),
        target_date,
        dates,
        summary,
        hourly,
    }
}

/// Loads `path` and analyses it.
///
/// # Errors
///
/// Only load failures are returned here; metric and grouping failures are
/// carried inside the [`PassReport`].
#[tracing::instrument(skip(path, config), fields(path = %path.as_ref().display()))]
pub fn run_pass(path: impl AsRef<Path>, config: &SurveyConfig) -> Result<PassReport, SurveyError> {
    let path = path.as_ref();
    let observations = load_observations(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let report = analyze_observations(&source, &observations, config);
    info!(
        source = %report.source,
        rows = report.rows,
        metrics_ok = report.summary.is_ok(),
        hourly_ok = report.hourly.is_ok(),
        "Pass complete"
    );
    Ok(report)
}
