//! Wear-state profile cache.
//!
//! Every compound gets a fresh profile. A worn tire reuses the fresh curve:
//! it enters the curve at the point where a new tire would have reached the
//! same condition, carrying the degradation accumulated up to there.

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::curve::{build_stint, full_life_laps, StintCurve, StintStart};
use crate::{
    CompoundParams, DegradationProfile, StintToken, TireInventory, TrackProfile, FRESH_CONDITION,
};

/// Profiles for one computation pass, keyed by compound and condition.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    profiles: AHashMap<StintToken, DegradationProfile>,
}

impl ProfileCache {
    /// Builds the fresh profile of every track compound and a derived profile
    /// for every distinct worn condition in the inventory.
    pub fn build(track: &TrackProfile, laps: u32, inventory: &TireInventory) -> Self {
        let mut cache = Self::default();

        for compound in track.compounds() {
            let Some(params) = track.compound_params(compound) else {
                continue;
            };
            let reference = build_stint(
                full_life_laps(params.wear_per_lap, laps),
                StintStart::fresh(),
                &params,
            );
            cache.insert(StintToken::fresh(compound), reference.to_profile(laps));

            let mut worn: Vec<u32> = inventory
                .conditions(compound)
                .iter()
                .copied()
                .filter(|&condition| condition < FRESH_CONDITION)
                .collect();
            worn.dedup();

            for condition in worn {
                match derive_worn_profile(&reference, condition, laps, &params) {
                    Some(profile) => cache.insert(StintToken::new(compound, condition), profile),
                    None => trace!(%compound, condition, "tire spent, no profile"),
                }
            }
        }

        debug!(track = %track.id, laps, profiles = cache.len(), "profile cache built");
        cache
    }

    pub fn insert(&mut self, token: StintToken, profile: DegradationProfile) {
        if !profile.is_empty() {
            self.profiles.insert(token, profile);
        }
    }

    pub fn get(&self, token: &StintToken) -> Option<&DegradationProfile> {
        self.profiles.get(token)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Entry point on the fresh curve for a tire already worn to `condition`.
///
/// Finds the first lap whose condition is at or below `condition` and
/// interpolates the accumulated degradation linearly within that lap, at the
/// exact fractional lap where a fresh tire reaches `condition`. Returns
/// `None` when the reference never gets that low.
pub fn worn_entry(
    reference: &StintCurve,
    condition: u32,
    params: &CompoundParams,
) -> Option<StintStart> {
    let lap_index = reference
        .wear_trace
        .iter()
        .position(|&wear| wear <= i64::from(condition))?;

    let deg_after = reference.deg_trace[lap_index];
    let deg_before = lap_index
        .checked_sub(1)
        .map_or(0.0, |previous| reference.deg_trace[previous]);

    let worn_by = FRESH_CONDITION - condition.min(FRESH_CONDITION);
    let exact_lap = f64::from(worn_by) / params.wear_per_lap;
    let fraction = (exact_lap - lap_index as f64).clamp(0.0, 1.0);

    Some(StintStart {
        wear: f64::from(condition),
        deg: deg_before + fraction * (deg_after - deg_before),
        stint_time: 0.0,
    })
}

/// Profile of a tire worn to `condition`, re-based so index 0 is the first
/// lap on it. `None` if the tire cannot complete a lap.
pub fn derive_worn_profile(
    reference: &StintCurve,
    condition: u32,
    laps: u32,
    params: &CompoundParams,
) -> Option<DegradationProfile> {
    let start = worn_entry(reference, condition, params)?;
    let curve = build_stint(laps, start, params);
    if curve.is_empty() {
        return None;
    }
    Some(curve.into_profile())
}
