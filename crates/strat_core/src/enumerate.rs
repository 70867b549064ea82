//! Strategy enumeration.
//!
//! Sequences grow breadth-first, one stint per level, up to [`MAX_STINTS`].
//! Within a level only one ordering per composition survives; a track preset
//! with that composition replaces the generated ordering.

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    Compound, StintToken, Strategy, TireInventory, TrackProfile, COMPOUND_COUNT, MAX_STINTS,
};

type Sequence = SmallVec<[Compound; MAX_STINTS]>;

/// Compound counts of a sequence, ignoring order.
pub fn composition(sequence: &[Compound]) -> [usize; COMPOUND_COUNT] {
    let mut counts = [0; COMPOUND_COUNT];
    for compound in sequence {
        counts[compound.index()] += 1;
    }
    counts
}

/// `S-M-S` style identifier.
pub fn sequence_id(sequence: impl IntoIterator<Item = Compound>) -> String {
    sequence
        .into_iter()
        .map(|compound| compound.code().to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// All candidate strategies for `laps` laps with the given inventory.
///
/// Single-compound strategies are only kept when `laps` is less than the full
/// race distance, since a full race must use two different compounds.
pub fn enumerate(track: &TrackProfile, laps: u32, inventory: &TireInventory) -> Vec<Strategy> {
    let compounds: Vec<Compound> = inventory.compounds().collect();
    let full_race = track.is_full_race(laps);

    let strategies: Vec<Strategy> = compound_sequences(track, &compounds, inventory)
        .into_iter()
        .filter(|sequence| !full_race || distinct_compounds(sequence) > 1)
        .filter_map(|sequence| bind_tires(&sequence, laps, inventory))
        .collect();

    debug!(
        track = %track.id,
        laps,
        full_race,
        count = strategies.len(),
        "strategies enumerated"
    );
    strategies
}

fn compound_sequences(
    track: &TrackProfile,
    compounds: &[Compound],
    inventory: &TireInventory,
) -> Vec<Sequence> {
    let mut levels: Vec<Vec<Sequence>> = vec![compounds
        .iter()
        .map(|&compound| SmallVec::from_slice(&[compound]))
        .collect()];

    for _ in 1..MAX_STINTS {
        let Some(previous) = levels.last() else {
            break;
        };
        let mut next: Vec<Sequence> = Vec::new();

        for sequence in previous {
            for &compound in compounds {
                let used = sequence.iter().filter(|&&c| c == compound).count();
                if used >= inventory.count(compound) {
                    continue;
                }
                let mut candidate = sequence.clone();
                candidate.push(compound);

                let key = composition(&candidate);
                if next.iter().any(|existing| composition(existing) == key) {
                    continue;
                }
                let preset = track
                    .presets
                    .iter()
                    .find(|preset| preset.len() <= MAX_STINTS && composition(preset) == key);
                next.push(preset.map_or(candidate, |p| Sequence::from_slice(p)));
            }
        }
        levels.push(next);
    }

    levels.into_iter().flatten().collect()
}

fn distinct_compounds(sequence: &[Compound]) -> usize {
    composition(sequence).iter().filter(|&&n| n > 0).count()
}

/// Assigns tire sets freshest-first to repeated uses of a compound.
fn bind_tires(sequence: &[Compound], laps: u32, inventory: &TireInventory) -> Option<Strategy> {
    let mut used = [0usize; COMPOUND_COUNT];
    let stints = sequence
        .iter()
        .map(|&compound| {
            let nth = used[compound.index()];
            used[compound.index()] += 1;
            inventory
                .condition(compound, nth)
                .map(|condition| StintToken::new(compound, condition))
        })
        .collect::<Option<SmallVec<[StintToken; MAX_STINTS]>>>()?;

    Some(Strategy {
        id: sequence_id(sequence.iter().copied()),
        stints,
        total_laps: laps,
    })
}
