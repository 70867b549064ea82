//! Track content and tire inventory loading shared between strat_cli and strat_bench.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use strat_core::{Compound, TireUnit, TrackId, TrackProfile, MAX_STINTS};

#[derive(Deserialize)]
struct TracksFile {
    content_version: String,
    tracks: Vec<TrackProfile>,
}

/// Validated track parameters keyed by id. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct TrackTable {
    pub content_version: String,
    tracks: BTreeMap<TrackId, TrackProfile>,
}

impl TrackTable {
    /// Builds a table from already-parsed profiles, running the same checks
    /// as [`load_content`].
    pub fn new(content_version: impl Into<String>, tracks: Vec<TrackProfile>) -> Result<Self> {
        validate_tracks(&tracks)?;
        let tracks = tracks
            .into_iter()
            .map(|track| (track.id.clone(), track))
            .collect();
        Ok(Self {
            content_version: content_version.into(),
            tracks,
        })
    }

    /// Looks up a track, listing the known ids when it is missing.
    pub fn get(&self, id: &str) -> Result<&TrackProfile> {
        match self.tracks.get(&TrackId(id.to_string())) {
            Some(track) => Ok(track),
            None => bail!(
                "unknown track '{id}' (known tracks: {})",
                self.ids().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(|id| id.0.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackProfile> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Rejects authoring errors in track content.
///
/// Catches mistakes like a duplicated track id, a compound with a lap time but
/// no degradation figure, or a preset naming a compound the track never
/// defines.
pub fn validate_tracks(tracks: &[TrackProfile]) -> Result<()> {
    if tracks.is_empty() {
        bail!("no tracks defined");
    }

    let mut seen: BTreeSet<&TrackId> = BTreeSet::new();
    for track in tracks {
        let id = &track.id;
        if id.0.is_empty() {
            bail!("track has empty id");
        }
        if !seen.insert(id) {
            bail!("duplicate track id '{id}'");
        }
        if track.total_laps == 0 {
            bail!("track '{id}' has zero total_laps");
        }
        if !(track.pit_loss.is_finite() && track.pit_loss >= 0.0) {
            bail!("track '{id}' has invalid pit_loss {}", track.pit_loss);
        }

        let defined: BTreeSet<Compound> = track
            .lap_time
            .keys()
            .chain(track.competitive_laps.keys())
            .chain(track.average_deg.keys())
            .copied()
            .collect();
        if defined.is_empty() {
            bail!("track '{id}' defines no compounds");
        }
        for compound in &defined {
            validate_compound(track, *compound)?;
        }

        for preset in &track.presets {
            if preset.is_empty() || preset.len() > MAX_STINTS {
                bail!(
                    "track '{id}' preset has {} stints, expected 1..={MAX_STINTS}",
                    preset.len()
                );
            }
            if let Some(missing) = preset.iter().find(|c| !defined.contains(*c)) {
                bail!("track '{id}' preset uses undefined compound '{missing}'");
            }
        }
    }
    Ok(())
}

fn validate_compound(track: &TrackProfile, compound: Compound) -> Result<()> {
    let id = &track.id;
    let (Some(&lap_time), Some(&competitive_laps), Some(&average_deg)) = (
        track.lap_time.get(&compound),
        track.competitive_laps.get(&compound),
        track.average_deg.get(&compound),
    ) else {
        bail!("track '{id}' compound '{compound}' is missing lap_time, competitive_laps or average_deg");
    };
    if !(lap_time.is_finite() && lap_time > 0.0) {
        bail!("track '{id}' compound '{compound}' has non-positive lap_time {lap_time}");
    }
    if !(competitive_laps.is_finite() && competitive_laps > 0.0) {
        bail!("track '{id}' compound '{compound}' has non-positive competitive_laps {competitive_laps}");
    }
    if !(average_deg.is_finite() && average_deg >= 0.0) {
        bail!("track '{id}' compound '{compound}' has negative average_deg {average_deg}");
    }
    Ok(())
}

pub fn load_content(content_dir: &str) -> Result<TrackTable> {
    let dir = Path::new(content_dir);
    let tracks_file: TracksFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("tracks.json")).context("reading tracks.json")?,
    )
    .context("parsing tracks.json")?;
    let table = TrackTable::new(tracks_file.content_version, tracks_file.tracks)
        .context("validating tracks.json")?;
    tracing::info!(
        tracks = table.len(),
        content_version = %table.content_version,
        "content loaded"
    );
    Ok(table)
}

/// Race-weekend allocation: five soft slots of which three are still
/// available, three mediums and two hards, all unused.
pub fn default_inventory() -> Vec<TireUnit> {
    let mut units: Vec<TireUnit> = (0..5)
        .map(|slot| TireUnit {
            available: slot < 3,
            ..TireUnit::fresh(Compound::Soft)
        })
        .collect();
    units.extend((0..3).map(|_| TireUnit::fresh(Compound::Medium)));
    units.extend((0..2).map(|_| TireUnit::fresh(Compound::Hard)));
    units
}

/// Reads a JSON array of tire units.
pub fn load_inventory(path: &Path) -> Result<Vec<TireUnit>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory {}", path.display()))?;
    let units: Vec<TireUnit> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing inventory {}", path.display()))?;
    for unit in &units {
        if unit.condition > strat_core::FRESH_CONDITION {
            tracing::warn!(
                compound = %unit.compound,
                condition = unit.condition,
                "tire condition above 100, treating as fresh"
            );
        }
    }
    Ok(units)
}
