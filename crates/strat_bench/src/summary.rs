use crate::runner::CaseResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct CaseSummary {
    pub track: String,
    pub laps: u32,
    pub strategy_count: usize,
    pub best: Option<BestStrategy>,
    /// Seconds between the fastest and second fastest strategy.
    pub margin: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BestStrategy {
    pub id: String,
    pub label: String,
    pub time: f64,
    pub pit_stop_laps: Vec<u32>,
}

/// One `results.csv` row.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    track: &'a str,
    laps: u32,
    rank: usize,
    strategy: &'a str,
    label: &'a str,
    time: f64,
    gap: f64,
    stops: usize,
    pit_stop_laps: String,
}

pub fn compute_summary(results: &[CaseResult]) -> Vec<CaseSummary> {
    results
        .iter()
        .map(|case| {
            let best = case.best().map(|b| BestStrategy {
                id: b.id.clone(),
                label: b.label.clone(),
                time: b.time,
                pit_stop_laps: b.pit_stop_laps(),
            });
            let margin = match case.strategies.as_slice() {
                [first, second, ..] => Some(second.time - first.time),
                _ => None,
            };
            CaseSummary {
                track: case.track.clone(),
                laps: case.laps,
                strategy_count: case.strategies.len(),
                best,
                margin,
            }
        })
        .collect()
}

pub fn win_counts(summaries: &[CaseSummary]) -> BTreeMap<String, usize> {
    let mut wins = BTreeMap::new();
    for best in summaries.iter().filter_map(|s| s.best.as_ref()) {
        *wins.entry(best.id.clone()).or_insert(0) += 1;
    }
    wins
}

pub fn write_results_csv(path: &Path, results: &[CaseResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for case in results {
        let fastest = case.best().map_or(0.0, |b| b.time);
        for (rank, strategy) in case.strategies.iter().enumerate() {
            let pit_stop_laps = strategy
                .pit_stop_laps()
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(";");
            writer
                .serialize(ResultRow {
                    track: &case.track,
                    laps: case.laps,
                    rank: rank + 1,
                    strategy: &strategy.id,
                    label: &strategy.label,
                    time: strategy.time,
                    gap: strategy.time - fastest,
                    stops: strategy.pit.len(),
                    pit_stop_laps,
                })
                .context("writing results row")?;
        }
    }
    writer.flush().context("flushing results.csv")?;
    Ok(())
}

pub fn print_summary(scenario_name: &str, summaries: &[CaseSummary]) {
    println!(
        "\n=== {} ({} cases) ===\n",
        scenario_name,
        summaries.len()
    );
    println!(
        "{:<16} {:>5} {:>6}  {:<24} {:>10} {:>8}  pit laps",
        "Track", "Laps", "Count", "Best", "Time", "Margin"
    );
    println!("{}", "-".repeat(90));
    for summary in summaries {
        match &summary.best {
            Some(best) => println!(
                "{:<16} {:>5} {:>6}  {:<24} {:>10.3} {:>8}  {:?}",
                summary.track,
                summary.laps,
                summary.strategy_count,
                best.label,
                best.time,
                summary
                    .margin
                    .map_or_else(|| "-".to_string(), |m| format!("{m:.3}")),
                best.pit_stop_laps,
            ),
            None => println!(
                "{:<16} {:>5} {:>6}  no feasible strategy",
                summary.track, summary.laps, summary.strategy_count
            ),
        }
    }
}
