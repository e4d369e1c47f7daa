//! CLI entry point for the traffic survey analyser.
//!
//! Provides subcommands for analysing one dataset, charting its hourly
//! volumes, and an interactive loop that asks for survey dates until the
//! operator stops.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_survey::{
    chart::render_histogram,
    config::SurveyConfig,
    error::SurveyError,
    output::{append_summary, print_json, print_pretty, write_results},
    prompt::Prompter,
    session::{PassReport, run_pass},
    source::SurveyDate,
};

#[derive(Parser)]
#[command(name = "traffic_survey")]
#[command(about = "Summarise junction traffic survey CSV files", long_about = None)]
struct Cli {
    /// JSON file overriding junction names and vehicle categories
    #[arg(long, global = true, env = "TRAFFIC_SURVEY_CONFIG")]
    config: Option<String>,

    /// Text file that result blocks are appended to
    #[arg(short, long, global = true, env = "RESULTS_FILE", default_value = "results.txt")]
    results: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one survey CSV and append the results
    Analyze {
        /// Path to the CSV file
        #[arg(value_name = "FILE", required_unless_present = "date")]
        file: Option<PathBuf>,

        /// Survey date as DD/MM/YYYY, resolved to traffic_dataDDMMYYYY.csv
        #[arg(short, long, conflicts_with = "file")]
        date: Option<String>,

        /// Directory searched when --date is given
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Also log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Draw the hour by junction volume chart for one survey CSV
    Histogram {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Ask for survey dates and analyse each one until told to stop
    Interactive {
        /// Directory containing the traffic_dataDDMMYYYY.csv files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Skip the chart after each dataset
        #[arg(long, default_value_t = false)]
        no_chart: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_survey.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_survey.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = SurveyConfig::load_or_default(cli.config.as_deref())
        .context("failed to load survey config")?;

    match cli.command {
        Commands::Analyze {
            file,
            date,
            data_dir,
            json,
        } => {
            let path = analyze_path(file, date.as_deref(), &data_dir, &config)?;
            let report = run_pass(&path, &config)?;
            let summary = report
                .summary
                .with_context(|| format!("failed to compute metrics for {}", path.display()))?;

            let mut stdout = io::stdout().lock();
            writeln!(stdout, "\nAnalysis Results:")?;
            writeln!(stdout, "CSV File Name: {}", summary.source)?;
            write_results(&mut stdout, &summary)?;

            print_pretty(&summary);
            if json {
                print_json(&summary)?;
            }
            append_summary(&cli.results, &summary)?;
            info!(results = %cli.results, "Results saved");
        }
        Commands::Histogram { file } => {
            let report = run_pass(&file, &config)?;
            let table = report
                .hourly
                .with_context(|| format!("failed to group {} by hour", file.display()))?;
            let date = report.target_date.unwrap_or_default();
            render_histogram(&mut io::stdout().lock(), &table, &date)?;
        }
        Commands::Interactive { data_dir, no_chart } => {
            let stdin = io::stdin();
            let prompter = Prompter::new(stdin.lock(), io::stdout());
            interactive(prompter, &config, &data_dir, &cli.results, !no_chart)?;
        }
    }

    Ok(())
}

/// CSV path for `analyze`: the explicit file, else the file named after
/// `--date` inside `data_dir`.
fn analyze_path(
    file: Option<PathBuf>,
    date: Option<&str>,
    data_dir: &Path,
    config: &SurveyConfig,
) -> Result<PathBuf> {
    match (file, date) {
        (Some(file), _) => Ok(file),
        (None, Some(date)) => Ok(SurveyDate::parse(date, config)?.resolve(data_dir)),
        (None, None) => anyhow::bail!("either FILE or --date is required"),
    }
}

/// Date prompt → pass → print and append → chart, repeated until the
/// operator answers N. Dataset failures are reported and the loop goes on.
fn interactive<R: BufRead, W: Write>(
    mut prompter: Prompter<R, W>,
    config: &SurveyConfig,
    data_dir: &Path,
    results_path: &str,
    chart: bool,
) -> Result<()> {
    loop {
        let date = prompter.ask_date(config)?;
        let path = date.resolve(data_dir);
        writeln!(prompter.output(), "Valid date input: {}", date.file_name())?;

        let span = tracing::info_span!("dataset", date = %date);
        let _enter = span.enter();

        match run_pass(&path, config) {
            Ok(report) => {
                if let Err(e) = present(prompter.output(), report, results_path, chart) {
                    error!(error = %e, "Failed to present results");
                    writeln!(prompter.output(), "An error occurred: {e}")?;
                }
            }
            Err(e @ SurveyError::NotFound(_)) => {
                warn!(path = %path.display(), "Dataset not found");
                writeln!(prompter.output(), "{e}")?;
            }
            Err(e) => {
                error!(error = %e, data_quality = e.is_data_quality(), "Dataset load failed");
                writeln!(prompter.output(), "An error occurred: {e}")?;
            }
        }
        drop(_enter);

        if !prompter.ask_continue()? {
            writeln!(prompter.output(), "Exiting the program.")?;
            break;
        }
    }
    Ok(())
}

fn present<W: Write>(
    out: &mut W,
    report: PassReport,
    results_path: &str,
    chart: bool,
) -> Result<()> {
    match report.summary {
        Ok(summary) => {
            writeln!(out, "\nAnalysis Results:")?;
            writeln!(out, "CSV File Name: {}", summary.source)?;
            write_results(out, &summary)?;
            append_summary(results_path, &summary)?;
            writeln!(out, "\nResults saved to '{results_path}'")?;
        }
        Err(e) => {
            error!(error = %e, source = %report.source, "Metric computation failed");
            writeln!(out, "An error occurred: {e}")?;
        }
    }

    if !chart {
        return Ok(());
    }
    if report.dates.len() > 1 {
        writeln!(
            out,
            "The file contains multiple dates. Using the first date."
        )?;
    }
    let date = report.target_date.unwrap_or_default();
    match report.hourly {
        Ok(table) => match render_histogram(out, &table, &date) {
            Err(SurveyError::EmptySource(_)) => {
                writeln!(out, "No traffic data available for visualization.")?
            }
            other => other?,
        },
        Err(e) => {
            error!(error = %e, source = %report.source, "Hourly grouping failed");
            writeln!(out, "Invalid data: {e}")?;
        }
    }
    Ok(())
}
