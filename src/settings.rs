use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::dataset::DataSource;
use crate::persist;

const DEFAULT_TOP_N: usize = 3;
const DEFAULT_EXPORT_PATH: &str = "cricket_owners.xlsx";
const DEFAULT_DEMO_PLAYERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data: Option<PathBuf>,
    pub teams_csv: Option<PathBuf>,
    pub player_stats: Option<PathBuf>,
    pub demo_owners: Option<usize>,
    pub fallback: bool,
    pub use_cache: bool,
    pub top_n: usize,
    pub export_path: PathBuf,
    pub initial_owner: Option<String>,
    pub json_out: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: None,
            teams_csv: None,
            player_stats: None,
            demo_owners: None,
            fallback: true,
            use_cache: true,
            top_n: DEFAULT_TOP_N,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            initial_owner: None,
            json_out: None,
        }
    }
}

impl Settings {
    /// `.env.local`, then `.env`, then the process environment, then `args`.
    pub fn load(args: &[String]) -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let mut settings = Self::from_vars(|key| std::env::var(key).ok());
        settings.apply_args(args)?;
        Ok(settings)
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let mut settings = Self {
            data: path("CRICKET_DATA"),
            teams_csv: path("CRICKET_TEAMS_CSV"),
            player_stats: path("CRICKET_PLAYER_STATS"),
            ..Self::default()
        };
        if get("CRICKET_NO_FALLBACK").is_some_and(|v| is_truthy(&v)) {
            settings.fallback = false;
        }
        if let Some(v) = get("CRICKET_USE_CACHE") {
            settings.use_cache = is_truthy(&v);
        }
        if let Some(n) = get("CRICKET_TOP_N").and_then(|v| v.trim().parse::<usize>().ok()) {
            settings.top_n = clamp_top_n(n);
        }
        if let Some(p) = path("CRICKET_EXPORT_PATH") {
            settings.export_path = p;
        }
        settings
    }

    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let mut value = || -> Result<String> {
                inline
                    .clone()
                    .or_else(|| iter.next().cloned())
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| anyhow!("{flag} needs a value"))
            };
            match flag {
                "--data" => self.data = Some(PathBuf::from(value()?)),
                "--teams" => self.teams_csv = Some(PathBuf::from(value()?)),
                "--stats" => self.player_stats = Some(PathBuf::from(value()?)),
                "--owner" => self.initial_owner = Some(value()?),
                "--export" => self.export_path = PathBuf::from(value()?),
                "--json" => self.json_out = Some(PathBuf::from(value()?)),
                "--top" => {
                    let raw = value()?;
                    let n = raw
                        .parse::<usize>()
                        .map_err(|_| anyhow!("--top expects a number, got {raw:?}"))?;
                    self.top_n = clamp_top_n(n);
                }
                "--demo" => {
                    let raw = value()?;
                    let n = raw
                        .parse::<usize>()
                        .map_err(|_| anyhow!("--demo expects an owner count, got {raw:?}"))?;
                    self.demo_owners = Some(n);
                }
                "--no-fallback" => self.fallback = false,
                "--no-cache" => self.use_cache = false,
                other => return Err(anyhow!("unknown argument {other:?}")),
            }
        }
        Ok(())
    }

    /// Demo, then an explicit file, then the csv/json pair, then the cache file.
    /// `None` leaves the choice to the sample fallback.
    pub fn primary_source(&self) -> Option<DataSource> {
        if let Some(owners) = self.demo_owners {
            return Some(DataSource::Demo {
                owners,
                players_per_owner: DEFAULT_DEMO_PLAYERS,
                seed: owners as u64,
            });
        }
        if let Some(path) = &self.data {
            return Some(DataSource::File(path.clone()));
        }
        if let (Some(teams_csv), Some(player_stats)) = (&self.teams_csv, &self.player_stats) {
            return Some(DataSource::Joined {
                teams_csv: teams_csv.clone(),
                player_stats: player_stats.clone(),
            });
        }
        if self.use_cache {
            return persist::existing_cache_path().map(DataSource::Cache);
        }
        None
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn clamp_top_n(n: usize) -> usize {
    n.clamp(1, 20)
}
