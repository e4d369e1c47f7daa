//! Terminal histogram of hourly junction volumes.

use std::io::Write;

use crate::error::SurveyError;
use crate::hourly::HourlyVolumeTable;

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

/// Draws one group of bars per hour, one bar per junction, with a lettered
/// legend.
///
/// # Errors
///
/// [`SurveyError::EmptySource`] if the table has no data; nothing is drawn.
pub fn render_histogram<W: Write>(
    out: &mut W,
    table: &HourlyVolumeTable,
    date: &str,
) -> Result<(), SurveyError> {
    if table.is_empty() {
        return Err(SurveyError::EmptySource(date.to_string()));
    }

    let junctions = table.junctions();
    let keys = legend_keys(junctions.len());
    let key_width = keys.iter().map(String::len).max().unwrap_or(1);
    let max = table.max_volume().max(1);
    let count_width = max.to_string().len();

    writeln!(out, "Traffic Data for {date}")?;
    writeln!(out)?;
    writeln!(out, "Junctions:")?;
    for (i, junction) in junctions.iter().enumerate() {
        writeln!(out, "  {:>key_width$} = {}", keys[i], junction)?;
    }
    writeln!(out)?;

    for hour in table.hours() {
        for (i, junction) in junctions.iter().enumerate() {
            let volume = table.volume(hour, junction);
            let label = if i == 0 {
                format!("{hour:02}")
            } else {
                "  ".to_string()
            };
            writeln!(
                out,
                "{label} {:>key_width$} |{} {volume:>count_width$}",
                keys[i],
                bar(volume, max),
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Hours of the Day (rows) / Traffic Volume (bars)")?;
    Ok(())
}

/// Letters `A..Z` while they suffice, otherwise `1..=count` so every
/// junction keeps a distinct key.
fn legend_keys(count: usize) -> Vec<String> {
    if count <= 26 {
        (0..count).map(|i| ((b'A' + i as u8) as char).to_string()).collect()
    } else {
        (1..=count).map(|i| i.to_string()).collect()
    }
}

fn bar(volume: usize, max: usize) -> String {
    let mut len = volume * BAR_WIDTH / max;
    if volume > 0 && len == 0 {
        len = 1;
    }
    let mut s: String = std::iter::repeat_n(BAR_CHAR, len).collect();
    s.push_str(&" ".repeat(BAR_WIDTH - len));
    s
}
