//! Strategy assembly: cache, enumerate, solve, and package results.

use tracing::debug;

use crate::enumerate::enumerate;
use crate::solver::solve;
use crate::{ProfileCache, RankedStrategyResult, Strategy, TireInventory, TrackProfile};

/// Evaluates every candidate strategy for `laps` laps.
///
/// `laps` is clamped to `[1, track.total_laps]`. Strategies with no feasible
/// split are left out. Results come back in enumeration order; ranking is up
/// to the caller (see [`rank_by_time`]).
pub fn assemble(
    track: &TrackProfile,
    laps: u32,
    inventory: &TireInventory,
) -> Vec<RankedStrategyResult> {
    let laps = track.clamp_laps(laps);
    let cache = ProfileCache::build(track, laps, inventory);
    let strategies = enumerate(track, laps, inventory);

    let results: Vec<RankedStrategyResult> = strategies
        .iter()
        .filter_map(|strategy| evaluate(track, strategy, &cache))
        .collect();

    debug!(
        track = %track.id,
        laps,
        candidates = strategies.len(),
        feasible = results.len(),
        "strategies assembled"
    );
    results
}

/// Solves one strategy and adds one pit loss per stop.
pub fn evaluate(
    track: &TrackProfile,
    strategy: &Strategy,
    cache: &ProfileCache,
) -> Option<RankedStrategyResult> {
    let Some(plan) = solve(&strategy.stints, strategy.total_laps, cache) else {
        debug!(strategy = %strategy.id, laps = strategy.total_laps, "no feasible split");
        return None;
    };

    let time = plan.total_time + track.pit_loss * strategy.stops() as f64;
    let final_laps = plan.final_stint_laps(strategy.total_laps);

    let mut laptimes = Vec::with_capacity(strategy.total_laps as usize);
    for (index, token) in strategy.stints.iter().enumerate() {
        let stint_laps = plan.pit_laps.get(index).copied().unwrap_or(final_laps);
        let profile = cache.get(token)?;
        laptimes.extend_from_slice(profile.lap_times(stint_laps));
    }

    Some(RankedStrategyResult {
        id: strategy.id.clone(),
        label: strategy_label(strategy),
        time,
        pit: plan.pit_laps.to_vec(),
        laptimes,
        stints: strategy.stints.to_vec(),
    })
}

/// The strategy id, followed by per-stint conditions when any set is used.
pub fn strategy_label(strategy: &Strategy) -> String {
    if strategy.stints.iter().all(crate::StintToken::is_fresh) {
        return strategy.id.clone();
    }
    let conditions: Vec<String> = strategy
        .stints
        .iter()
        .map(|token| token.condition.to_string())
        .collect();
    format!("{} ({})", strategy.id, conditions.join("/"))
}

/// Stable sort, fastest first.
pub fn rank_by_time(results: &mut [RankedStrategyResult]) {
    results.sort_by(|a, b| a.time.total_cmp(&b.time));
}
