//! Type definitions for `strat_core`.
//!
//! Track parameters, tire inventory, stint tokens, and the result records
//! handed to consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::curve::COMPETITIVE_WEAR_PCT;

/// Hard cap on stints per strategy (three stops).
pub const MAX_STINTS: usize = 4;

pub const COMPOUND_COUNT: usize = 3;

/// Condition of an unused tire set.
pub const FRESH_CONDITION: u32 = 100;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TrackId);

// ---------------------------------------------------------------------------
// Compounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    /// Canonical order used for enumeration and output.
    pub const ALL: [Compound; COMPOUND_COUNT] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn code(self) -> char {
        match self {
            Compound::Soft => 'S',
            Compound::Medium => 'M',
            Compound::Hard => 'H',
        }
    }

    pub fn index(self) -> usize {
        match self {
            Compound::Soft => 0,
            Compound::Medium => 1,
            Compound::Hard => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Compound::Soft => "soft",
            Compound::Medium => "medium",
            Compound::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Compound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Compound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "soft" => Ok(Compound::Soft),
            "m" | "medium" => Ok(Compound::Medium),
            "h" | "hard" => Ok(Compound::Hard),
            other => Err(format!("unknown compound '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Track parameters
// ---------------------------------------------------------------------------

/// Static per-track constants. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfile {
    pub id: TrackId,
    /// Base lap time in seconds per compound, before any degradation.
    pub lap_time: BTreeMap<Compound, f64>,
    /// Laps over which a compound loses `COMPETITIVE_WEAR_PCT` of its life.
    pub competitive_laps: BTreeMap<Compound, f64>,
    /// Average lap-time loss per lap in seconds, scaled by the wear factor.
    pub average_deg: BTreeMap<Compound, f64>,
    /// Time lost per pit stop in seconds.
    pub pit_loss: f64,
    pub total_laps: u32,
    /// Known-good orderings substituted for generated sequences of the same
    /// composition.
    #[serde(default)]
    pub presets: Vec<Vec<Compound>>,
}

/// Per-compound inputs of the degradation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundParams {
    pub base_lap_time: f64,
    pub average_deg: f64,
    /// Condition percentage lost per lap.
    pub wear_per_lap: f64,
}

impl TrackProfile {
    pub fn display_name(&self) -> String {
        self.id.0.replace('_', " ")
    }

    /// Compounds with a full parameter set, in canonical order.
    pub fn compounds(&self) -> impl Iterator<Item = Compound> + '_ {
        Compound::ALL
            .into_iter()
            .filter(|&compound| self.compound_params(compound).is_some())
    }

    pub fn compound_params(&self, compound: Compound) -> Option<CompoundParams> {
        let base_lap_time = *self.lap_time.get(&compound)?;
        let average_deg = *self.average_deg.get(&compound)?;
        let competitive_laps = *self.competitive_laps.get(&compound)?;
        Some(CompoundParams {
            base_lap_time,
            average_deg,
            wear_per_lap: COMPETITIVE_WEAR_PCT / competitive_laps,
        })
    }

    /// Clamps a requested lap count to `[1, total_laps]`.
    pub fn clamp_laps(&self, laps: u32) -> u32 {
        laps.clamp(1, self.total_laps.max(1))
    }

    pub fn is_full_race(&self, laps: u32) -> bool {
        laps == self.total_laps
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// One physical tire set as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireUnit {
    pub compound: Compound,
    pub condition: u32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl TireUnit {
    pub fn fresh(compound: Compound) -> Self {
        Self {
            compound,
            condition: FRESH_CONDITION,
            available: true,
        }
    }
}

/// Usable tire conditions per compound, each list sorted descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireInventory {
    conditions: BTreeMap<Compound, Vec<u32>>,
}

impl TireInventory {
    /// Keeps available units with condition > 0; conditions above 100 are
    /// clamped to fresh.
    pub fn from_units(units: &[TireUnit]) -> Self {
        let mut conditions: BTreeMap<Compound, Vec<u32>> = BTreeMap::new();
        for unit in units.iter().filter(|u| u.available && u.condition > 0) {
            conditions
                .entry(unit.compound)
                .or_default()
                .push(unit.condition.min(FRESH_CONDITION));
        }
        for list in conditions.values_mut() {
            list.sort_unstable_by(|a, b| b.cmp(a));
        }
        Self { conditions }
    }

    pub fn conditions(&self, compound: Compound) -> &[u32] {
        self.conditions.get(&compound).map_or(&[], Vec::as_slice)
    }

    pub fn count(&self, compound: Compound) -> usize {
        self.conditions(compound).len()
    }

    /// Condition of the `nth` freshest set of a compound.
    pub fn condition(&self, compound: Compound, nth: usize) -> Option<u32> {
        self.conditions(compound).get(nth).copied()
    }

    /// Compounds with at least one usable set, in canonical order.
    pub fn compounds(&self) -> impl Iterator<Item = Compound> + '_ {
        Compound::ALL
            .into_iter()
            .filter(|&compound| self.count(compound) > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.values().all(Vec::is_empty)
    }
}

// ---------------------------------------------------------------------------
// Strategy types
// ---------------------------------------------------------------------------

/// A stint on a specific tire set; also the profile cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StintToken {
    pub compound: Compound,
    pub condition: u32,
}

impl StintToken {
    pub fn new(compound: Compound, condition: u32) -> Self {
        Self {
            compound,
            condition,
        }
    }

    pub fn fresh(compound: Compound) -> Self {
        Self::new(compound, FRESH_CONDITION)
    }

    pub fn is_fresh(&self) -> bool {
        self.condition >= FRESH_CONDITION
    }
}

impl std::fmt::Display for StintToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.compound.code(), self.condition)
    }
}

/// Lap-by-lap times of one tire set, index 0 = first lap of the stint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegradationProfile {
    pub per_lap_time: Vec<f64>,
    pub cumulative_time: Vec<f64>,
}

impl DegradationProfile {
    pub fn len(&self) -> usize {
        self.cumulative_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative_time.is_empty()
    }

    /// Total stint time after `laps` laps, or `None` when the tire cannot
    /// cover that many.
    pub fn cumulative_at(&self, laps: u32) -> Option<f64> {
        let index = usize::try_from(laps).ok()?.checked_sub(1)?;
        self.cumulative_time.get(index).copied()
    }

    /// Per-lap times of the first `laps` laps (shorter if the profile is).
    pub fn lap_times(&self, laps: u32) -> &[f64] {
        let end = usize::try_from(laps)
            .unwrap_or(usize::MAX)
            .min(self.per_lap_time.len());
        &self.per_lap_time[..end]
    }
}

/// Candidate compound sequence bound to concrete tire sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// Compound codes joined by `-`, e.g. `S-M-S`.
    pub id: String,
    pub stints: SmallVec<[StintToken; MAX_STINTS]>,
    pub total_laps: u32,
}

impl Strategy {
    pub fn stops(&self) -> usize {
        self.stints.len().saturating_sub(1)
    }
}

/// Best split for a stint sequence. `total_time` excludes pit loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalPlan {
    pub total_time: f64,
    /// Laps of every stint except the last.
    pub pit_laps: SmallVec<[u32; MAX_STINTS]>,
}

impl OptimalPlan {
    pub fn final_stint_laps(&self, total_laps: u32) -> u32 {
        total_laps.saturating_sub(self.pit_laps.iter().sum())
    }
}

/// One evaluated strategy, the record consumers sort and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategyResult {
    pub id: String,
    pub label: String,
    /// Total race time in seconds, pit loss included.
    pub time: f64,
    /// Stint lengths of all but the final stint.
    pub pit: Vec<u32>,
    pub laptimes: Vec<f64>,
    pub stints: Vec<StintToken>,
}

impl RankedStrategyResult {
    /// Lap number of each stop (running sum of `pit`).
    pub fn pit_stop_laps(&self) -> Vec<u32> {
        self.pit
            .iter()
            .scan(0, |lap, stint| {
                *lap += stint;
                Some(*lap)
            })
            .collect()
    }

    pub fn total_laps(&self) -> usize {
        self.laptimes.len()
    }

    pub fn final_stint_laps(&self) -> usize {
        let pitted: u32 = self.pit.iter().sum();
        self.laptimes
            .len()
            .saturating_sub(usize::try_from(pitted).unwrap_or(usize::MAX))
    }
}
