use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};

use crate::dataset::{self, LeagueFile};
use crate::records::RecordStore;

const CACHE_DIR: &str = "cricket_owners";
const CACHE_FILE: &str = "league.json";

/// The cache file, if one has been written before.
pub fn existing_cache_path() -> Option<PathBuf> {
    cache_path().filter(|path| path.is_file())
}

pub fn save_cache(store: &RecordStore) -> Result<PathBuf> {
    let path = cache_path().ok_or_else(|| anyhow!("no cache directory (set XDG_CACHE_HOME or HOME)"))?;
    save_league_file(&path, store)?;
    Ok(path)
}

pub fn save_league_file(path: &Path, store: &RecordStore) -> Result<()> {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let file = LeagueFile::from_store(store, Some(generated_at));
    let json = serde_json::to_string_pretty(&file).context("serialize league file")?;
    write_atomic(path, &json)
}

/// owner_stats.json in the shape earlier tooling reads.
pub fn write_owner_stats_json(path: &Path, store: &RecordStore) -> Result<()> {
    let stats = dataset::legacy_owner_stats(store);
    let json = serde_json::to_string_pretty(&stats).context("serialize owner stats")?;
    write_atomic(path, &json)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}
