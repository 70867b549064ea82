//! Degradation curve model: lap time as a function of tire wear.
//!
//! A compound loses `wear_per_lap` percent of condition every lap. The
//! degradation added per lap is the compound's average rate scaled by a step
//! factor that grows as the tire approaches the end of its life.

use crate::{CompoundParams, DegradationProfile, FRESH_CONDITION};

/// Condition percentage consumed over a compound's competitive laps.
pub const COMPETITIVE_WEAR_PCT: f64 = 70.0;

/// Degradation multiplier for a tire at the given (rounded) condition.
pub fn deg_factor(wear: i64) -> f64 {
    match wear {
        100.. => 0.0,
        90..=99 => 0.1,
        85..=89 => 0.25,
        80..=84 => 0.5,
        75..=79 => 0.75,
        61..=74 => 1.0,
        51..=60 => 1.25,
        41..=50 => 1.5,
        31..=40 => 1.75,
        21..=30 => 3.0,
        _ => 5.0,
    }
}

/// Entry point of a stint on the degradation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StintStart {
    /// Condition when the stint starts.
    pub wear: f64,
    /// Degradation already accumulated by the tire, in seconds per lap.
    pub deg: f64,
    /// Stint time already elapsed.
    pub stint_time: f64,
}

impl StintStart {
    pub fn fresh() -> Self {
        Self {
            wear: f64::from(FRESH_CONDITION),
            deg: 0.0,
            stint_time: 0.0,
        }
    }
}

/// Output of [`build_stint`]. All four sequences have the same length and
/// entry `j` describes the state after lap `j + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StintCurve {
    pub per_lap_time: Vec<f64>,
    pub cumulative_time: Vec<f64>,
    pub wear_trace: Vec<i64>,
    pub deg_trace: Vec<f64>,
}

impl StintCurve {
    pub fn len(&self) -> usize {
        self.per_lap_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_lap_time.is_empty()
    }

    /// Profile covering at most `laps` laps.
    pub fn to_profile(&self, laps: u32) -> DegradationProfile {
        let end = usize::try_from(laps).unwrap_or(usize::MAX).min(self.len());
        DegradationProfile {
            per_lap_time: self.per_lap_time[..end].to_vec(),
            cumulative_time: self.cumulative_time[..end].to_vec(),
        }
    }

    pub fn into_profile(self) -> DegradationProfile {
        DegradationProfile {
            per_lap_time: self.per_lap_time,
            cumulative_time: self.cumulative_time,
        }
    }
}

/// Rounded condition after `lap` laps of the stint.
#[allow(clippy::cast_possible_truncation)]
fn wear_after(start_wear: f64, wear_per_lap: f64, lap: u32) -> i64 {
    (start_wear - wear_per_lap * f64::from(lap)).round() as i64
}

/// Builds up to `laps_budget` laps of a stint. The sequence ends before the
/// first lap whose condition would round to zero or below.
pub fn build_stint(laps_budget: u32, start: StintStart, params: &CompoundParams) -> StintCurve {
    let mut curve = StintCurve::default();
    let mut deg = start.deg;
    let mut stint_time = start.stint_time;

    for lap in 1..=laps_budget {
        let wear = wear_after(start.wear, params.wear_per_lap, lap);
        if wear <= 0 {
            break;
        }
        deg += deg_factor(wear) * params.average_deg;
        let lap_time = params.base_lap_time + deg;
        stint_time += lap_time;

        curve.per_lap_time.push(lap_time);
        curve.cumulative_time.push(stint_time);
        curve.wear_trace.push(wear);
        curve.deg_trace.push(deg);
    }
    curve
}

/// Laps a fresh tire lasts before its condition is spent, plus one lap of
/// headroom. Falls back to `floor` when the compound never wears.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn full_life_laps(wear_per_lap: f64, floor: u32) -> u32 {
    if !wear_per_lap.is_finite() || wear_per_lap <= 0.0 {
        return floor;
    }
    let life = (f64::from(FRESH_CONDITION) / wear_per_lap).ceil();
    if life >= f64::from(u32::MAX - 1) {
        return floor;
    }
    (life as u32 + 1).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CompoundParams {
        CompoundParams {
            base_lap_time: 90.0,
            average_deg: 0.1,
            wear_per_lap: 70.0 / 20.0,
        }
    }

    #[test]
    fn deg_factor_breakpoints() {
        let cases = [
            (100, 0.0),
            (99, 0.1),
            (90, 0.1),
            (89, 0.25),
            (85, 0.25),
            (84, 0.5),
            (80, 0.5),
            (79, 0.75),
            (75, 0.75),
            (74, 1.0),
            (61, 1.0),
            (60, 1.25),
            (51, 1.25),
            (50, 1.5),
            (41, 1.5),
            (40, 1.75),
            (31, 1.75),
            (30, 3.0),
            (21, 3.0),
            (20, 5.0),
            (1, 5.0),
        ];
        for (wear, expected) in cases {
            assert!(
                (deg_factor(wear) - expected).abs() < 1e-12,
                "wear {wear}: expected {expected}, got {}",
                deg_factor(wear)
            );
        }
    }

    #[test]
    fn deg_factor_never_decreases_as_wear_drops() {
        let mut previous = deg_factor(100);
        for wear in (1..100).rev() {
            let factor = deg_factor(wear);
            assert!(factor >= previous, "factor dropped at wear {wear}");
            previous = factor;
        }
    }

    #[test]
    fn first_lap_adds_scaled_degradation() {
        let curve = build_stint(10, StintStart::fresh(), &params());
        // Lap 1: wear = round(100 - 3.5) = 97 (rounded half away from zero: 96.5 -> 97)
        assert_eq!(curve.wear_trace[0], 97);
        assert!((curve.per_lap_time[0] - 90.01).abs() < 1e-9);
        assert!((curve.cumulative_time[0] - 90.01).abs() < 1e-9);
    }

    #[test]
    fn per_lap_times_are_non_decreasing() {
        let curve = build_stint(100, StintStart::fresh(), &params());
        assert!(!curve.is_empty());
        for pair in curve.per_lap_time.windows(2) {
            assert!(pair[1] >= pair[0], "lap time dropped: {pair:?}");
        }
        for pair in curve.cumulative_time.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn curve_stops_before_tire_is_spent() {
        let curve = build_stint(1000, StintStart::fresh(), &params());
        // 100 / 3.5 = 28.57: lap 28 leaves round(2.0) = 2, lap 29 would leave round(-1.5).
        assert_eq!(curve.len(), 28);
        assert!(curve.wear_trace.iter().all(|&w| w > 0));
    }

    #[test]
    fn budget_truncates_curve() {
        let curve = build_stint(5, StintStart::fresh(), &params());
        assert_eq!(curve.len(), 5);
        assert_eq!(curve.to_profile(3).len(), 3);
        assert_eq!(curve.to_profile(50).len(), 5);
    }

    #[test]
    fn start_offsets_carry_into_curve() {
        let start = StintStart {
            wear: 50.0,
            deg: 2.0,
            stint_time: 10.0,
        };
        let curve = build_stint(1, start, &params());
        // round(50 - 3.5) = 47 -> factor 1.5
        assert!((curve.deg_trace[0] - 2.15).abs() < 1e-9);
        assert!((curve.per_lap_time[0] - 92.15).abs() < 1e-9);
        assert!((curve.cumulative_time[0] - 102.15).abs() < 1e-9);
    }

    #[test]
    fn full_life_laps_covers_whole_curve() {
        let p = params();
        let life = full_life_laps(p.wear_per_lap, 1);
        let curve = build_stint(life, StintStart::fresh(), &p);
        assert!(curve.len() < life as usize);
        assert_eq!(full_life_laps(0.0, 57), 57);
    }
}
