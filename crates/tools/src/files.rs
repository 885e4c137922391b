//! Policy, snapshot, and trace files used by the developer binaries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use delver_core::{DecisionTrace, LevelSnapshot, PlannerPolicy};

/// Reads a TOML policy; keys left out keep their defaults. `None` yields the default policy.
pub fn load_policy(path: Option<&Path>) -> Result<PlannerPolicy> {
    let Some(path) = path else {
        return Ok(PlannerPolicy::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse policy TOML: {}", path.display()))
}

/// Reads a snapshot from JSON and checks it has one start, one exit, and the player on the field.
pub fn load_snapshot(path: &Path) -> Result<LevelSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot: LevelSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to deserialize snapshot JSON: {}", path.display()))?;
    snapshot.validate().with_context(|| format!("Invalid snapshot: {}", path.display()))?;
    Ok(snapshot)
}

/// Writes the trace next to `path` first, then renames it into place.
pub fn write_trace(trace: &DecisionTrace, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create trace directory: {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let json = trace.to_json().context("Failed to serialize decision trace")?;
    fs::write(&tmp_path, json)
        .with_context(|| format!("Failed to write trace file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move trace into place: {}", path.display()))?;
    Ok(())
}
