use crate::scenario::Scenario;
use anyhow::Result;
use std::time::Instant;
use strat_core::{assemble, rank_by_time, RankedStrategyResult, TireInventory, TrackProfile};
use strat_world::TrackTable;

/// One (track, laps) evaluation.
#[derive(Debug, Clone)]
pub struct Case<'a> {
    pub track: &'a TrackProfile,
    pub laps: u32,
}

pub struct CaseResult {
    pub track: String,
    pub laps: u32,
    /// Fastest first.
    pub strategies: Vec<RankedStrategyResult>,
    pub wall_time_us: u64,
}

impl CaseResult {
    pub fn best(&self) -> Option<&RankedStrategyResult> {
        self.strategies.first()
    }
}

/// Expands a scenario into cases, in track-id then lap order.
pub fn build_cases<'a>(scenario: &Scenario, table: &'a TrackTable) -> Result<Vec<Case<'a>>> {
    let tracks: Vec<&TrackProfile> = if scenario.tracks.is_empty() {
        table.iter().collect()
    } else {
        let mut ids: Vec<&str> = scenario.tracks.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| table.get(id))
            .collect::<Result<_>>()?
    };

    Ok(tracks
        .into_iter()
        .flat_map(|track| {
            scenario
                .laps_for(track.total_laps)
                .into_iter()
                .map(move |laps| Case { track, laps })
        })
        .collect())
}

pub fn run_case(case: &Case<'_>, inventory: &TireInventory) -> CaseResult {
    let start = Instant::now();
    let mut strategies = assemble(case.track, case.laps, inventory);
    rank_by_time(&mut strategies);

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_us = start.elapsed().as_micros() as u64;
    tracing::debug!(
        track = %case.track.id,
        laps = case.laps,
        strategies = strategies.len(),
        wall_time_us,
        "case evaluated"
    );

    CaseResult {
        track: case.track.id.0.clone(),
        laps: case.laps,
        strategies,
        wall_time_us,
    }
}
