//! Output formatting and persistence for analysis summaries.
//!
//! Supports pretty-printing, JSON serialization, and appending a text block
//! to the results log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::error::SurveyError;
use crate::summary::AnalysisSummary;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &AnalysisSummary) {
    debug!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &AnalysisSummary) -> Result<(), SurveyError> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Writes the labelled metrics, one `label: value` per line.
pub fn write_results<W: Write>(out: &mut W, summary: &AnalysisSummary) -> std::io::Result<()> {
    for (label, value) in summary.entries() {
        writeln!(out, "{label}: {value}")?;
    }
    Ok(())
}

/// Renders the block appended to the results log for one run.
pub fn format_block(summary: &AnalysisSummary) -> String {
    let mut block = format!(
        "Analysis Date: {}\nCSV File: {}\nTraffic Analysis Results:\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S"),
        summary.source
    );
    for (label, value) in summary.entries() {
        block.push_str(&format!("{label}: {value}\n"));
    }
    block.push('\n');
    block
}

/// Appends the summary block to the text log at `path`, creating it if needed.
pub fn append_summary(path: &str, summary: &AnalysisSummary) -> Result<(), SurveyError> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending results block");

    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    file.write_all(format_block(summary).as_bytes())?;
    file.flush()?;

    Ok(())
}
