//! Shared test fixtures for strat_core and downstream crates.
//!
//! `bahrain()` mirrors the production Bahrain entry in `content/tracks.json`
//! so engine tests do not need to read files.

use std::collections::BTreeMap;

use crate::{Compound, TireUnit, TrackId, TrackProfile};

fn per_compound(soft: f64, medium: f64, hard: f64) -> BTreeMap<Compound, f64> {
    BTreeMap::from([
        (Compound::Soft, soft),
        (Compound::Medium, medium),
        (Compound::Hard, hard),
    ])
}

/// Bahrain: 57 laps, 20s pit loss, soft-heavy presets.
pub fn bahrain() -> TrackProfile {
    TrackProfile {
        id: TrackId("bahrain".to_string()),
        lap_time: per_compound(95.128, 95.967, 96.736),
        competitive_laps: per_compound(1.089 / 1.75 * 27.0, 1.5 / 1.75 * 27.0, 27.0),
        average_deg: per_compound(0.175 / 1.089, 0.175 / 1.5, 0.1),
        pit_loss: 20.0,
        total_laps: 57,
        presets: vec![
            vec![Compound::Soft, Compound::Medium, Compound::Soft],
            vec![Compound::Soft, Compound::Hard, Compound::Soft],
            vec![Compound::Soft, Compound::Hard, Compound::Medium],
        ],
    }
}

/// Five soft slots (three available), three mediums, two hards, all fresh.
pub fn default_inventory() -> Vec<TireUnit> {
    let mut units = Vec::new();
    for slot in 0..5 {
        units.push(TireUnit {
            available: slot < 3,
            ..TireUnit::fresh(Compound::Soft)
        });
    }
    units.extend((0..3).map(|_| TireUnit::fresh(Compound::Medium)));
    units.extend((0..2).map(|_| TireUnit::fresh(Compound::Hard)));
    units
}
