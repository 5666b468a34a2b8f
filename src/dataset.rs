use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::aggregate::{OwnerSummary, summarize};
use crate::error::{DashboardError, DashboardResult};
use crate::fake_league;
use crate::join;
use crate::records::{OwnerRoster, PlayerRecord, RecordStore};
use crate::sample;

pub const LEAGUE_FILE_VERSION: u32 = 1;

/// Versioned on-disk league. `roster` wins over `owners` key order, which wins
/// over first-seen order in `players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub owners: Map<String, Value>,
    pub players: Vec<PlayerRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SuppliedTotals {
    #[serde(default)]
    total_runs: u64,
    #[serde(default)]
    total_wickets: u64,
    #[serde(default, alias = "total_players")]
    player_count: usize,
}

/// Shape of the owner_stats.json the league has been publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyOwnerStats {
    pub total_runs: u64,
    pub total_wickets: u64,
    pub total_players: usize,
    pub players: Vec<LegacyPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPlayer {
    #[serde(default)]
    pub player_id: Option<u64>,
    pub player_name: String,
    pub team_id: u32,
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Joined { teams_csv: PathBuf, player_stats: PathBuf },
    Cache(PathBuf),
    Sample,
    Demo { owners: usize, players_per_owner: usize, seed: u64 },
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Joined {
                teams_csv,
                player_stats,
            } => format!("{} + {}", teams_csv.display(), player_stats.display()),
            DataSource::Cache(path) => format!("cache {}", path.display()),
            DataSource::Sample => sample::SAMPLE_SOURCE.to_string(),
            DataSource::Demo {
                owners,
                players_per_owner,
                ..
            } => format!("demo {owners}x{players_per_owner}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub source: String,
    pub records: usize,
    pub owners: usize,
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub store: RecordStore,
    pub report: LoadReport,
}

impl LoadedDataset {
    fn new(store: RecordStore, source: String, skipped: Vec<String>, warnings: Vec<String>) -> Self {
        let report = LoadReport {
            source,
            records: store.len(),
            owners: store.roster().len(),
            skipped,
            warnings,
        };
        Self { store, report }
    }
}

pub fn load(source: &DataSource) -> DashboardResult<LoadedDataset> {
    let label = source.label();
    match source {
        DataSource::File(path) | DataSource::Cache(path) => {
            let raw = read_file(path)?;
            let (roster, records, warnings) = parse_dataset_json(&raw)
                .with_context(|| format!("parse {}", path.display()))
                .map_err(to_load_error)?;
            let store = RecordStore::new(roster, records)?;
            Ok(LoadedDataset::new(store, label, Vec::new(), warnings))
        }
        DataSource::Joined {
            teams_csv,
            player_stats,
        } => {
            let teams = join::parse_teams_csv(&read_file(teams_csv)?)
                .with_context(|| format!("parse {}", teams_csv.display()))
                .map_err(to_load_error)?;
            let stats = join::parse_player_stats_json(&read_file(player_stats)?)
                .with_context(|| format!("parse {}", player_stats.display()))
                .map_err(to_load_error)?;
            let joined = join::join(&teams, &stats);
            let store = RecordStore::new(joined.roster, joined.records)?;
            Ok(LoadedDataset::new(store, label, joined.unmatched, Vec::new()))
        }
        DataSource::Sample => Ok(LoadedDataset::new(
            sample::sample_store()?,
            label,
            Vec::new(),
            Vec::new(),
        )),
        DataSource::Demo {
            owners,
            players_per_owner,
            seed,
        } => Ok(LoadedDataset::new(
            fake_league::generate_league(*owners, *players_per_owner, *seed)?,
            label,
            Vec::new(),
            Vec::new(),
        )),
    }
}

/// Loads `primary`. Only an unconfigured source or a failed cache read falls
/// back to the builtin sample, and only when allowed; the failure is kept as a
/// warning. Sources the user named explicitly report their own errors.
pub fn load_with_fallback(
    primary: Option<&DataSource>,
    fallback: bool,
) -> DashboardResult<LoadedDataset> {
    let err = match primary {
        Some(source) => match load(source) {
            Ok(loaded) => return Ok(loaded),
            Err(err) if !matches!(source, DataSource::Cache(_)) => return Err(err),
            Err(err) => err,
        },
        None => DashboardError::Load("no data source configured".to_string()),
    };
    if !fallback {
        return Err(err);
    }
    let mut loaded = load(&DataSource::Sample)?;
    loaded
        .report
        .warnings
        .push(format!("{err}; showing {}", sample::SAMPLE_SOURCE));
    Ok(loaded)
}

fn read_file(path: &Path) -> DashboardResult<String> {
    fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))
        .map_err(to_load_error)
}

fn to_load_error(err: anyhow::Error) -> DashboardError {
    DashboardError::Load(format!("{err:#}"))
}

/// Parses either a league file or the legacy owner_stats shape. A top-level
/// `players` array marks a league file.
pub fn parse_dataset_json(raw: &str) -> Result<(OwnerRoster, Vec<PlayerRecord>, Vec<String>)> {
    let root: Value = serde_json::from_str(raw).context("invalid json")?;
    if root.get("players").is_some_and(Value::is_array) {
        let file: LeagueFile = serde_json::from_value(root).context("invalid league file")?;
        return from_league_file(file);
    }
    let owners: Map<String, Value> =
        serde_json::from_value(root).context("expected an object keyed by owner")?;
    from_legacy(owners)
}

fn from_league_file(file: LeagueFile) -> Result<(OwnerRoster, Vec<PlayerRecord>, Vec<String>)> {
    if file.version != LEAGUE_FILE_VERSION {
        return Err(anyhow!(
            "unsupported league file version {} (expected {LEAGUE_FILE_VERSION})",
            file.version
        ));
    }

    let roster = match file.roster {
        Some(owners) => OwnerRoster::new(owners),
        None if !file.owners.is_empty() => {
            let mut owners: Vec<String> = file.owners.keys().cloned().collect();
            // Owners that only appear on player rows still need a slot.
            for owner in OwnerRoster::first_seen(&file.players).iter() {
                if !owners.iter().any(|o| o == owner) {
                    owners.push(owner.to_string());
                }
            }
            OwnerRoster::new(owners)
        }
        None => OwnerRoster::first_seen(&file.players),
    };

    let mut supplied = Vec::with_capacity(file.owners.len());
    for (owner, value) in &file.owners {
        let totals: SuppliedTotals = serde_json::from_value(value.clone())
            .with_context(|| format!("owner {owner:?} summary"))?;
        supplied.push((owner.clone(), totals));
    }
    let warnings = cross_check(&roster, &file.players, &supplied);
    Ok((roster, file.players, warnings))
}

fn from_legacy(owners: Map<String, Value>) -> Result<(OwnerRoster, Vec<PlayerRecord>, Vec<String>)> {
    let mut roster = Vec::with_capacity(owners.len());
    let mut records = Vec::new();
    let mut supplied = Vec::with_capacity(owners.len());
    for (owner, value) in owners {
        let stats: LegacyOwnerStats = serde_json::from_value(value)
            .with_context(|| format!("owner {owner:?} entry"))?;
        records.extend(stats.players.into_iter().map(|p| PlayerRecord {
            owner: owner.clone(),
            player_name: p.player_name,
            team_id: p.team_id,
            runs: p.runs,
            wickets: p.wickets,
            player_id: p.player_id,
        }));
        supplied.push((
            owner.clone(),
            SuppliedTotals {
                total_runs: stats.total_runs,
                total_wickets: stats.total_wickets,
                player_count: stats.total_players,
            },
        ));
        roster.push(owner);
    }
    let roster = OwnerRoster::new(roster);
    let warnings = cross_check(&roster, &records, &supplied);
    Ok((roster, records, warnings))
}

/// Supplied totals are informational; derived totals always win.
fn cross_check(
    roster: &OwnerRoster,
    records: &[PlayerRecord],
    supplied: &[(String, SuppliedTotals)],
) -> Vec<String> {
    let derived = summarize(roster, records);
    let mut warnings = Vec::new();
    for (owner, totals) in supplied {
        let Some(row) = derived.iter().find(|s| &s.owner == owner) else {
            warnings.push(format!("summary for {owner:?} has no roster entry"));
            continue;
        };
        if row.total_runs != totals.total_runs
            || row.total_wickets != totals.total_wickets
            || row.player_count != totals.player_count
        {
            warnings.push(format!(
                "summary for {owner:?} says {}/{}/{} but players add up to {}/{}/{}",
                totals.total_runs,
                totals.total_wickets,
                totals.player_count,
                row.total_runs,
                row.total_wickets,
                row.player_count
            ));
        }
    }
    warnings
}

impl LeagueFile {
    pub fn from_store(store: &RecordStore, generated_at: Option<String>) -> Self {
        let owners = summarize(store.roster(), store.records())
            .into_iter()
            .map(|s| {
                let value = serde_json::json!({
                    "total_runs": s.total_runs,
                    "total_wickets": s.total_wickets,
                    "player_count": s.player_count,
                });
                (s.owner, value)
            })
            .collect();
        Self {
            version: LEAGUE_FILE_VERSION,
            generated_at,
            roster: Some(store.roster().owners().to_vec()),
            owners,
            players: store.records().to_vec(),
        }
    }
}

/// Legacy owner_stats.json content for a store, in roster order.
pub fn legacy_owner_stats(store: &RecordStore) -> Map<String, Value> {
    let summaries: Vec<OwnerSummary> = summarize(store.roster(), store.records());
    let mut out = Map::new();
    for summary in summaries {
        let players: Vec<LegacyPlayer> = store
            .records_for(&summary.owner)
            .map(|r| LegacyPlayer {
                player_id: r.player_id,
                player_name: r.player_name.clone(),
                team_id: r.team_id,
                runs: r.runs,
                wickets: r.wickets,
            })
            .collect();
        let entry = LegacyOwnerStats {
            total_runs: summary.total_runs,
            total_wickets: summary.total_wickets,
            total_players: summary.player_count,
            players,
        };
        let value = serde_json::to_value(entry).unwrap_or(Value::Null);
        out.insert(summary.owner, value);
    }
    out
}
