//! Optimal pit-lap split for a fixed stint sequence.

use smallvec::SmallVec;

use crate::{OptimalPlan, ProfileCache, StintToken};

/// Totals are compared at millisecond precision. Candidates that agree to
/// three decimals count as equal and the earlier one (longer first stint)
/// is kept.
#[allow(clippy::cast_possible_truncation)]
fn thousandths(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

/// Splits `laps` over `stints` to minimize the summed stint times.
///
/// Every stint runs at least one lap and never more laps than its profile
/// covers. Returns `None` when no split is feasible. Recursion depth is the
/// number of stints.
pub fn solve(stints: &[StintToken], laps: u32, cache: &ProfileCache) -> Option<OptimalPlan> {
    let (head, tail) = stints.split_first()?;
    let profile = cache.get(head)?;

    if tail.is_empty() {
        return profile.cumulative_at(laps).map(|total_time| OptimalPlan {
            total_time,
            pit_laps: SmallVec::new(),
        });
    }

    let max_first = laps.min(u32::try_from(profile.len()).unwrap_or(u32::MAX));
    let mut best: Option<OptimalPlan> = None;

    for first in (1..=max_first).rev() {
        let Some(head_time) = profile.cumulative_at(first) else {
            continue;
        };
        let Some(rest) = solve(tail, laps - first, cache) else {
            continue;
        };
        let total_time = head_time + rest.total_time;
        let improves = best
            .as_ref()
            .map_or(true, |b| thousandths(total_time) < thousandths(b.total_time));
        if improves {
            let mut pit_laps = SmallVec::new();
            pit_laps.push(first);
            pit_laps.extend(rest.pit_laps);
            best = Some(OptimalPlan {
                total_time,
                pit_laps,
            });
        }
    }
    best
}
