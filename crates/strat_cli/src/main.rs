use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strat_core::{assemble, rank_by_time, TireInventory};
use strat_world::{default_inventory, load_content, load_inventory};
use tracing_subscriber::EnvFilter;

mod output;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "strat_cli", about = "Race tire strategy planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tracks in the content directory.
    Tracks {
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
    /// Rank every feasible strategy for one track.
    Plan {
        #[arg(long)]
        track: String,
        /// Laps to plan for. Defaults to the full race distance.
        #[arg(long)]
        laps: Option<u32>,
        /// JSON list of tire sets. Defaults to a fresh race-weekend allocation.
        #[arg(long)]
        inventory: Option<PathBuf>,
        /// Only show the N fastest strategies.
        #[arg(long)]
        top: Option<usize>,
        /// Print the ranked strategies as JSON instead of a table.
        #[arg(long)]
        json: bool,
        /// Write per-lap times of the shown strategies to a CSV file.
        #[arg(long)]
        series: Option<PathBuf>,
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn list_tracks(content_dir: &str) -> Result<()> {
    let content = load_content(content_dir)?;
    println!("content_version={}", content.content_version);
    for track in content.iter() {
        println!(
            "{:<16} laps={:<3} pit_loss={:.1}s presets={}",
            track.id,
            track.total_laps,
            track.pit_loss,
            track.presets.len()
        );
    }
    Ok(())
}

struct PlanArgs {
    track: String,
    laps: Option<u32>,
    inventory: Option<PathBuf>,
    top: Option<usize>,
    json: bool,
    series: Option<PathBuf>,
    content_dir: String,
}

fn plan(args: &PlanArgs) -> Result<()> {
    let content = load_content(&args.content_dir)?;
    let track = content.get(&args.track)?;

    let units = match &args.inventory {
        Some(path) => load_inventory(path)?,
        None => default_inventory(),
    };
    let inventory = TireInventory::from_units(&units);

    let requested = args.laps.unwrap_or(track.total_laps);
    let laps = track.clamp_laps(requested);
    if laps != requested {
        tracing::warn!(requested, laps, "lap count clamped to race distance");
    }

    let mut results = assemble(track, laps, &inventory);
    rank_by_time(&mut results);
    tracing::info!(track = %track.id, laps, strategies = results.len(), "plan complete");
    if let Some(top) = args.top {
        results.truncate(top);
    }

    if let Some(path) = &args.series {
        output::write_series(path, &results)?;
        tracing::info!(path = %path.display(), "lap series written");
    }

    let mut stdout = std::io::stdout().lock();
    if args.json {
        output::write_json(&mut stdout, track, laps, &content.content_version, &results)
    } else {
        output::write_table(&mut stdout, track, laps, &results)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Tracks { content_dir } => list_tracks(&content_dir)?,
        Commands::Plan {
            track,
            laps,
            inventory,
            top,
            json,
            series,
            content_dir,
        } => plan(&PlanArgs {
            track,
            laps,
            inventory,
            top,
            json,
            series,
            content_dir,
        })?,
    }
    Ok(())
}
