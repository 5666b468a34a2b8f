//! Builds player records from the two raw inputs the league keeps: a
//! `teams.csv` roster (who owns which player) and a `player_stats.json`
//! scorecard dump (what each player did). Rows are matched on the
//! lower-cased player name since the two files use different ids.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::csv::{self, Header};
use crate::records::{OwnerRoster, PlayerRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    pub player_id: Option<u64>,
    pub team_id: u32,
    pub player: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub stats_id: String,
    pub name: String,
    pub runs: u32,
    pub wickets: u32,
}

#[derive(Debug, Clone)]
pub struct JoinOutput {
    pub roster: OwnerRoster,
    pub records: Vec<PlayerRecord>,
    /// Stats entries with no roster row, by name.
    pub unmatched: Vec<String>,
}

pub fn parse_teams_csv(raw: &str) -> Result<Vec<TeamEntry>> {
    let mut rows = csv::parse_rows(raw).into_iter();
    let header = rows.next().ok_or_else(|| anyhow!("teams csv is empty"))?;
    let header = Header::new(&header);
    let col = |name: &str| {
        header
            .index(name)
            .ok_or_else(|| anyhow!("teams csv missing column {name:?}"))
    };
    let player_id_col = col("player_id")?;
    let team_id_col = col("team_id")?;
    let player_col = col("player")?;
    let owner_col = col("owner")?;

    let mut out = Vec::new();
    for (idx, row) in rows.enumerate() {
        let line = idx + 2;
        let cell = |col: usize| row.get(col).map(|c| c.trim()).unwrap_or("");
        let player = cell(player_col);
        let owner = cell(owner_col);
        if player.is_empty() || owner.is_empty() {
            return Err(anyhow!("teams csv line {line}: player and owner are required"));
        }
        let team_id = cell(team_id_col)
            .parse::<u32>()
            .with_context(|| format!("teams csv line {line}: bad team_id"))?;
        out.push(TeamEntry {
            player_id: cell(player_id_col).parse::<u64>().ok(),
            team_id,
            player: player.to_string(),
            owner: owner.to_string(),
        });
    }
    Ok(out)
}

/// Accepts the dump either bare (`{id: {...}}`) or nested under `"players"`.
pub fn parse_player_stats_json(raw: &str) -> Result<Vec<StatLine>> {
    let root: Value = serde_json::from_str(raw).context("player stats is not valid json")?;
    let entries = match root.get("players") {
        Some(Value::Object(players)) => players,
        _ => root
            .as_object()
            .ok_or_else(|| anyhow!("player stats must be a json object"))?,
    };

    let mut out = Vec::with_capacity(entries.len());
    for (stats_id, entry) in entries {
        let name = entry
            .get("player_name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| entry.get("name").and_then(Value::as_str))
            .unwrap_or("");
        let (runs, wickets) = match entry.get("batting").and_then(|b| b.get("runs")) {
            Some(runs) => (
                Some(runs),
                entry.get("bowling").and_then(|b| b.get("wickets")),
            ),
            None => (entry.get("runs"), entry.get("wickets")),
        };
        let runs = count(runs).with_context(|| format!("player stats {stats_id:?}: runs"))?;
        let wickets =
            count(wickets).with_context(|| format!("player stats {stats_id:?}: wickets"))?;
        out.push(StatLine {
            stats_id: stats_id.clone(),
            name: name.to_string(),
            runs,
            wickets,
        });
    }
    Ok(out)
}

/// Absent counts are zero. Anything present must be a non-negative whole number.
fn count(value: Option<&Value>) -> Result<u32> {
    let Some(value) = value else {
        return Ok(0);
    };
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| anyhow!("{n} is out of range"));
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => Ok(f as u32),
        _ => Err(anyhow!("expected a non-negative whole number, got {value}")),
    }
}

pub fn join(teams: &[TeamEntry], stats: &[StatLine]) -> JoinOutput {
    // Later rows win when a name appears twice in the roster.
    let by_name: HashMap<String, &TeamEntry> = teams
        .iter()
        .map(|t| (t.player.to_lowercase(), t))
        .collect();

    let mut seen = HashSet::new();
    let roster = OwnerRoster::new(
        teams
            .iter()
            .filter(|t| seen.insert(t.owner.as_str()))
            .map(|t| t.owner.clone())
            .collect(),
    );

    let mut records = Vec::new();
    let mut unmatched = Vec::new();
    for line in stats {
        match by_name.get(&line.name.to_lowercase()) {
            Some(team) if !line.name.is_empty() => records.push(PlayerRecord {
                owner: team.owner.clone(),
                player_name: team.player.clone(),
                team_id: team.team_id,
                runs: line.runs,
                wickets: line.wickets,
                player_id: team.player_id,
            }),
            _ => unmatched.push(if line.name.is_empty() {
                line.stats_id.clone()
            } else {
                line.name.clone()
            }),
        }
    }

    JoinOutput {
        roster,
        records,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAMS: &str = "player_id,team_id,player,owner\n\
                         101,1,Virat Kohli,Sai\n\
                         102,2,Jasprit Bumrah,Mohit\n\
                         103,3,Rinku Singh,Sai\n\
                         104,4,Unused Player,Aman\n";

    #[test]
    fn parses_teams_csv_by_header_name() {
        let teams = parse_teams_csv("owner,player,team_id,player_id\nSai,Virat Kohli,1,101\n").unwrap();
        assert_eq!(
            teams,
            vec![TeamEntry {
                player_id: Some(101),
                team_id: 1,
                player: "Virat Kohli".to_string(),
                owner: "Sai".to_string(),
            }]
        );
    }

    #[test]
    fn malformed_counts_fail_with_the_stats_id() {
        for bad in [r#""45""#, "-3", "null", "12.5"] {
            let raw = format!(r#"{{"p-7": {{"player_name": "Rinku Singh", "runs": {bad}}}}}"#);
            let err = parse_player_stats_json(&raw).unwrap_err();
            let msg = format!("{err:#}");
            assert!(msg.contains("p-7"), "{bad}: {msg}");
            assert!(msg.contains("runs"), "{bad}: {msg}");
        }
    }

    #[test]
    fn absent_counts_default_to_zero() {
        let stats = parse_player_stats_json(r#"{"1": {"player_name": "A", "batting": {"runs": 40.0}}}"#).unwrap();
        assert_eq!((stats[0].runs, stats[0].wickets), (40, 0));
    }

    #[test]
    fn excel_saved_teams_csv_parses() {
        let teams = parse_teams_csv("\u{feff}player_id,team_id,player,owner\r\n101,1,Virat Kohli,Sai\r\n").unwrap();
        assert_eq!(teams[0].player_id, Some(101));
        assert_eq!(teams[0].owner, "Sai");
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = parse_teams_csv("player_id,player,owner\n1,X,Y\n").unwrap_err();
        assert!(err.to_string().contains("team_id"));
    }

    #[test]
    fn reads_nested_and_flat_stats() {
        let raw = r#"{"players": {
            "9": {"player_name": "Virat Kohli", "batting": {"runs": 59}, "bowling": {"wickets": 1}},
            "7": {"name": "Jasprit Bumrah", "runs": 2, "wickets": 3.0}
        }}"#;
        let stats = parse_player_stats_json(raw).unwrap();
        assert_eq!(stats[0].name, "Virat Kohli");
        assert_eq!((stats[0].runs, stats[0].wickets), (59, 1));
        assert_eq!((stats[1].runs, stats[1].wickets), (2, 3));
    }

    #[test]
    fn join_matches_names_case_insensitively() {
        let teams = parse_teams_csv(TEAMS).unwrap();
        let stats = vec![
            StatLine {
                stats_id: "a".into(),
                name: "rinku singh".into(),
                runs: 12,
                wickets: 0,
            },
            StatLine {
                stats_id: "b".into(),
                name: "Nobody Known".into(),
                runs: 5,
                wickets: 0,
            },
            StatLine {
                stats_id: "c".into(),
                name: "VIRAT KOHLI".into(),
                runs: 59,
                wickets: 0,
            },
        ];
        let out = join(&teams, &stats);
        assert_eq!(out.roster.owners(), &["Sai", "Mohit", "Aman"]);
        let names: Vec<_> = out.records.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["Rinku Singh", "Virat Kohli"]);
        assert_eq!(out.records[0].player_id, Some(103));
        assert_eq!(out.unmatched, vec!["Nobody Known"]);
    }
}
