//! Table, JSON and lap-series rendering for `plan`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use strat_core::{RankedStrategyResult, TrackProfile};

/// `H:MM:SS`, truncating fractional seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_race_time(seconds: f64) -> String {
    let whole = seconds.max(0.0).floor() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Lap numbers of the stops, or `-` for a no-stop run.
pub fn format_pit_laps(result: &RankedStrategyResult) -> String {
    let laps = result.pit_stop_laps();
    if laps.is_empty() {
        return "-".to_string();
    }
    laps.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_table(
    out: &mut impl Write,
    track: &TrackProfile,
    laps: u32,
    results: &[RankedStrategyResult],
) -> Result<()> {
    writeln!(
        out,
        "{}: {laps}/{} laps, pit loss {:.1}s",
        track.display_name(),
        track.total_laps,
        track.pit_loss
    )?;
    writeln!(out, "{}", "-".repeat(60))?;
    writeln!(out, "{:<4} {:<24} {:>9} {:>9}  pit laps", "#", "strategy", "time", "gap")?;

    let Some(fastest) = results.first().map(|r| r.time) else {
        writeln!(out, "no feasible strategy")?;
        return Ok(());
    };
    for (rank, result) in results.iter().enumerate() {
        let gap = format!("+{:.3}", result.time - fastest);
        writeln!(
            out,
            "{:<4} {:<24} {:>9} {:>9}  {}",
            rank + 1,
            result.label,
            format_race_time(result.time),
            gap,
            format_pit_laps(result),
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PlanReport<'a> {
    track: &'a str,
    laps: u32,
    content_version: &'a str,
    strategies: &'a [RankedStrategyResult],
}

pub fn write_json(
    out: &mut impl Write,
    track: &TrackProfile,
    laps: u32,
    content_version: &str,
    results: &[RankedStrategyResult],
) -> Result<()> {
    let report = PlanReport {
        track: &track.id.0,
        laps,
        content_version,
        strategies: results,
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("serializing plan")?;
    writeln!(out)?;
    Ok(())
}

/// One row per lap, one lap-time column per strategy.
pub fn write_series(path: &Path, results: &[RankedStrategyResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating series file {}", path.display()))?;

    let mut header = vec!["lap".to_string()];
    header.extend(results.iter().map(|r| r.label.clone()));
    writer.write_record(&header).context("writing series header")?;

    let laps = results.iter().map(RankedStrategyResult::total_laps).max().unwrap_or(0);
    for lap in 0..laps {
        let mut row = vec![(lap + 1).to_string()];
        row.extend(results.iter().map(|r| {
            r.laptimes
                .get(lap)
                .map_or_else(String::new, |t| format!("{t:.3}"))
        }));
        writer.write_record(&row).context("writing series row")?;
    }
    writer.flush().context("flushing series file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strat_core::test_fixtures::{bahrain, default_inventory};
    use strat_core::{assemble, rank_by_time, TireInventory};

    fn ranked(laps: u32) -> Vec<RankedStrategyResult> {
        let track = bahrain();
        let mut results = assemble(&track, laps, &TireInventory::from_units(&default_inventory()));
        rank_by_time(&mut results);
        results
    }

    #[test]
    fn race_time_formats_hours_minutes_seconds() {
        assert_eq!(format_race_time(5541.367), "1:32:21");
        assert_eq!(format_race_time(59.999), "0:00:59");
        assert_eq!(format_race_time(3600.0), "1:00:00");
        assert_eq!(format_race_time(-3.0), "0:00:00");
    }

    #[test]
    fn pit_laps_are_cumulative() {
        let results = ranked(57);
        let sms = results.iter().find(|r| r.id == "S-M-S").unwrap();
        let stops = sms.pit_stop_laps();
        assert_eq!(format_pit_laps(sms), format!("{}, {}", stops[0], stops[1]));

        let single = ranked(5);
        let no_stop = single.iter().find(|r| r.stints.len() == 1).unwrap();
        assert_eq!(format_pit_laps(no_stop), "-");
    }

    #[test]
    fn table_lists_fastest_first() {
        let results = ranked(57);
        let mut out = Vec::new();
        write_table(&mut out, &bahrain(), 57, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("bahrain"));
        assert!(lines[3].starts_with("1 "));
        assert!(lines[3].contains(&results[0].label));
        assert!(lines[3].contains("+0.000"));
        assert_eq!(lines.len(), 3 + results.len());
    }

    #[test]
    fn empty_table_says_so() {
        let mut out = Vec::new();
        write_table(&mut out, &bahrain(), 57, &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no feasible strategy"));
    }

    #[test]
    fn json_report_carries_strategies() {
        let results = ranked(57);
        let mut out = Vec::new();
        write_json(&mut out, &bahrain(), 57, "test", &results[..3]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["track"], "bahrain");
        assert_eq!(value["laps"], 57);
        assert_eq!(value["strategies"].as_array().unwrap().len(), 3);
        assert_eq!(value["strategies"][0]["id"], results[0].id.as_str());
    }

    #[test]
    fn series_has_one_row_per_lap() {
        let results = ranked(57);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_series(&path, &results[..2]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 3);
        assert_eq!(&headers[0], "lap");
        assert_eq!(&headers[1], results[0].label.as_str());

        let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 57);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[56][0], "57");
        let first: f64 = rows[0][1].parse().unwrap();
        assert!((first - results[0].laptimes[0]).abs() < 0.001);
    }
}
