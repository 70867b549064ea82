use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Contents of `batch_summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_schema_version: u32,
    pub batch_id: String,
    pub git_sha: String,
    pub git_dirty: bool,
    pub started_at: String,
    pub scenario_name: String,
    pub scenario_params: serde_json::Value,
    pub content_version: String,
    pub case_count: usize,
    /// Cases where no strategy could cover the requested laps.
    pub empty_case_count: usize,
    pub strategies_evaluated: usize,
    pub wall_time_ms: u64,
    /// How many cases each strategy id won.
    pub wins_by_strategy: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Writes through a temp file so readers never see a partial summary.
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

pub fn git_sha() -> String {
    env!("GIT_SHA").to_string()
}

pub fn git_dirty() -> bool {
    env!("GIT_DIRTY") == "true"
}
