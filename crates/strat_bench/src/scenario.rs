use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use strat_core::TireUnit;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Track ids to evaluate. Empty means every track in the content.
    #[serde(default)]
    pub tracks: Vec<String>,
    /// Lap counts per track. Absent means the full race distance.
    #[serde(default)]
    pub laps: Option<LapSpec>,
    /// Tire sets shared by every case. Absent means the default allocation.
    #[serde(default)]
    pub inventory: Option<Vec<TireUnit>>,
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
}

fn default_content_dir() -> String {
    "./content".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LapSpec {
    List(Vec<u32>),
    Range { range: [u32; 2] },
}

impl LapSpec {
    pub fn expand(&self) -> Vec<u32> {
        match self {
            LapSpec::List(laps) => laps.clone(),
            LapSpec::Range { range } => (range[0]..=range[1]).collect(),
        }
    }
}

impl Scenario {
    /// Lap counts to run on a track of `total_laps`, clamped and deduplicated.
    pub fn laps_for(&self, total_laps: u32) -> Vec<u32> {
        let Some(spec) = &self.laps else {
            return vec![total_laps];
        };
        let mut laps: Vec<u32> = spec
            .expand()
            .into_iter()
            .map(|n| n.clamp(1, total_laps.max(1)))
            .collect();
        laps.sort_unstable();
        laps.dedup();
        laps
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if let Some(spec) = &scenario.laps {
        let laps = spec.expand();
        if laps.is_empty() {
            bail!("scenario 'laps' must produce at least one lap count");
        }
        if laps.contains(&0) {
            bail!("scenario 'laps' must be > 0");
        }
    }
    if scenario.inventory.as_ref().is_some_and(Vec::is_empty) {
        bail!("scenario 'inventory' must list at least one tire set");
    }
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use strat_core::Compound;

    fn write_temp_scenario(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_scenario() {
        let file = write_temp_scenario(r#"{ "name": "season" }"#);
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.name, "season");
        assert!(scenario.tracks.is_empty());
        assert!(scenario.laps.is_none());
        assert!(scenario.inventory.is_none());
        assert_eq!(scenario.content_dir, "./content");
        assert_eq!(scenario.laps_for(57), vec![57]);
    }

    #[test]
    fn test_load_scenario_with_lap_list() {
        let file = write_temp_scenario(
            r#"{
            "name": "short_runs",
            "tracks": ["bahrain", "miami"],
            "laps": [30, 10, 80, 10]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.tracks, vec!["bahrain", "miami"]);
        assert_eq!(scenario.laps_for(57), vec![10, 30, 57]);
    }

    #[test]
    fn test_load_scenario_with_lap_range() {
        let file = write_temp_scenario(
            r#"{
            "name": "range_test",
            "laps": {"range": [48, 52]}
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.laps_for(57), vec![48, 49, 50, 51, 52]);
        assert_eq!(scenario.laps_for(50), vec![48, 49, 50]);
    }

    #[test]
    fn test_load_scenario_with_inventory() {
        let file = write_temp_scenario(
            r#"{
            "name": "used_softs",
            "inventory": [
                {"compound": "soft", "condition": 70},
                {"compound": "medium", "condition": 100},
                {"compound": "hard", "condition": 100, "available": false}
            ]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        let inventory = scenario.inventory.unwrap();
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[0].compound, Compound::Soft);
        assert_eq!(inventory[0].condition, 70);
        assert!(!inventory[2].available);
    }

    #[test]
    fn test_load_scenario_empty_name_fails() {
        let file = write_temp_scenario(r#"{ "name": "" }"#);
        let result = load_scenario(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_load_scenario_zero_laps_fails() {
        let file = write_temp_scenario(r#"{ "name": "bad", "laps": [0, 10] }"#);
        assert!(load_scenario(file.path()).is_err());

        let file = write_temp_scenario(r#"{ "name": "bad", "laps": [] }"#);
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_load_scenario_empty_inventory_fails() {
        let file = write_temp_scenario(r#"{ "name": "bad", "inventory": [] }"#);
        let err = load_scenario(file.path()).unwrap_err();
        assert!(err.to_string().contains("inventory"));
    }
}
