use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use strat_core::TireInventory;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod run_result;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "strat_bench",
    about = "Batch strategy evaluation across tracks and race distances"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across its tracks and lap counts.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

fn run(scenario_path: &str, output_dir: &str) -> Result<PathBuf> {
    let started = Instant::now();
    let scenario = scenario::load_scenario(Path::new(scenario_path))?;
    let table = strat_world::load_content(&scenario.content_dir)?;

    let units = scenario
        .inventory
        .clone()
        .unwrap_or_else(strat_world::default_inventory);
    let inventory = TireInventory::from_units(&units);
    let cases = runner::build_cases(&scenario, &table)?;

    tracing::info!(
        scenario = %scenario.name,
        cases = cases.len(),
        content_version = %table.content_version,
        "scenario loaded"
    );

    let track_ids: BTreeSet<&str> = cases.iter().map(|c| c.track.id.0.as_str()).collect();
    let scenario_params = serde_json::json!({
        "tracks": track_ids,
        "laps": scenario.laps.as_ref().map(scenario::LapSpec::expand),
        "inventory": units,
        "content_dir": scenario.content_dir,
    });

    // Create timestamped output directory.
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;
    tracing::info!(dir = %run_dir.display(), "writing output");

    // Cases are independent; collect keeps input order.
    let results: Vec<runner::CaseResult> = cases
        .par_iter()
        .map(|case| runner::run_case(case, &inventory))
        .collect();

    let summaries = summary::compute_summary(&results);
    summary::print_summary(&scenario.name, &summaries);

    summary::write_results_csv(&run_dir.join("results.csv"), &results)?;

    let summary_path = run_dir.join("summary.json");
    let summary_json = serde_json::to_string_pretty(&summaries).context("serializing summary")?;
    std::fs::write(&summary_path, summary_json)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = started.elapsed().as_millis() as u64;
    let batch_summary = run_result::BatchSummary {
        batch_schema_version: 1,
        batch_id: Uuid::new_v4().to_string(),
        git_sha: run_result::git_sha(),
        git_dirty: run_result::git_dirty(),
        started_at: timestamp,
        scenario_name: scenario.name.clone(),
        scenario_params,
        content_version: table.content_version.clone(),
        case_count: results.len(),
        empty_case_count: results.iter().filter(|r| r.strategies.is_empty()).count(),
        strategies_evaluated: results.iter().map(|r| r.strategies.len()).sum(),
        wall_time_ms,
        wins_by_strategy: summary::win_counts(&summaries),
    };

    let batch_path = run_dir.join("batch_summary.json");
    batch_summary
        .write_atomic(&batch_path)
        .context("writing batch_summary.json")?;

    tracing::info!(
        cases = batch_summary.case_count,
        empty = batch_summary.empty_case_count,
        wall_time_ms,
        "batch complete"
    );
    println!("Summary written to {}", summary_path.display());
    println!("Batch summary written to {}", batch_path.display());
    Ok(run_dir)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => {
            run(&scenario, &output_dir)?;
        }
    }
    Ok(())
}
