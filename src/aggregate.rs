use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::records::{OwnerRoster, PlayerRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner: String,
    pub total_runs: u64,
    pub total_wickets: u64,
    pub player_count: usize,
}

impl OwnerSummary {
    fn empty(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            total_runs: 0,
            total_wickets: 0,
            player_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeagueTotals {
    pub runs: u64,
    pub wickets: u64,
    pub players: usize,
}

/// One summary per roster owner, in roster order. Owners without records get zeros.
/// Records whose owner is not on the roster are ignored; a `RecordStore` never holds any.
pub fn summarize(roster: &OwnerRoster, records: &[PlayerRecord]) -> Vec<OwnerSummary> {
    let mut out: Vec<OwnerSummary> = roster.iter().map(OwnerSummary::empty).collect();
    let slots: HashMap<&str, usize> = roster
        .iter()
        .enumerate()
        .map(|(idx, owner)| (owner, idx))
        .collect();

    for record in records {
        let Some(&idx) = slots.get(record.owner.as_str()) else {
            continue;
        };
        let row = &mut out[idx];
        row.total_runs += u64::from(record.runs);
        row.total_wickets += u64::from(record.wickets);
        row.player_count += 1;
    }
    out
}

pub fn totals(summaries: &[OwnerSummary]) -> LeagueTotals {
    summaries.iter().fold(LeagueTotals::default(), |acc, s| LeagueTotals {
        runs: acc.runs + s.total_runs,
        wickets: acc.wickets + s.total_wickets,
        players: acc.players + s.player_count,
    })
}

/// Highest total runs first; equal totals keep roster order.
pub fn ranked_by_runs(summaries: &[OwnerSummary]) -> Vec<&OwnerSummary> {
    let mut ranked: Vec<&OwnerSummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| b.total_runs.cmp(&a.total_runs));
    ranked
}

/// An owner's best `n` players by runs. Equal runs keep record order.
pub fn top_players<'a>(owner: &str, records: &'a [PlayerRecord], n: usize) -> Vec<&'a PlayerRecord> {
    let mut players: Vec<&PlayerRecord> = records.iter().filter(|r| r.owner == owner).collect();
    players.sort_by(|a, b| b.runs.cmp(&a.runs));
    players.truncate(n);
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::record;

    fn roster(owners: &[&str]) -> OwnerRoster {
        OwnerRoster::new(owners.iter().map(|o| o.to_string()).collect())
    }

    #[test]
    fn sai_example_sums_runs_and_counts_players() {
        let records = vec![record("Sai", "Rinku Singh", 12, 0), record("Sai", "Virat Kohli", 59, 0)];
        let out = summarize(&roster(&["Sai"]), &records);
        assert_eq!(
            out,
            vec![OwnerSummary {
                owner: "Sai".to_string(),
                total_runs: 71,
                total_wickets: 0,
                player_count: 2,
            }]
        );
    }

    #[test]
    fn owner_without_records_gets_zero_row_in_roster_position() {
        let records = vec![record("Sai", "A", 10, 2)];
        let out = summarize(&roster(&["Ghost", "Sai"]), &records);
        assert_eq!(out[0].owner, "Ghost");
        assert_eq!(out[0].total_runs, 0);
        assert_eq!(out[0].total_wickets, 0);
        assert_eq!(out[0].player_count, 0);
        assert_eq!(out[1].total_wickets, 2);
    }

    #[test]
    fn player_counts_add_up_to_record_count() {
        let records = vec![
            record("A", "p1", 1, 1),
            record("B", "p2", 2, 0),
            record("A", "p3", 3, 2),
            record("C", "p4", 0, 0),
        ];
        let out = summarize(&roster(&["A", "B", "C"]), &records);
        assert_eq!(totals(&out).players, records.len());
        assert_eq!(totals(&out).runs, 6);
        assert_eq!(totals(&out).wickets, 3);
    }

    #[test]
    fn summarize_is_repeatable() {
        let records = vec![record("A", "p1", 5, 1), record("B", "p2", 7, 3)];
        let r = roster(&["B", "A"]);
        assert_eq!(summarize(&r, &records), summarize(&r, &records));
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let records = vec![record("A", "p1", 5, 0), record("B", "p2", 9, 0), record("C", "p3", 5, 0)];
        let out = summarize(&roster(&["A", "B", "C"]), &records);
        let order: Vec<_> = ranked_by_runs(&out).iter().map(|s| s.owner.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn top_players_truncates_and_sorts() {
        let records = vec![
            record("A", "low", 3, 0),
            record("B", "other", 99, 0),
            record("A", "high", 40, 0),
            record("A", "mid", 20, 0),
        ];
        let names: Vec<_> = top_players("A", &records, 2)
            .iter()
            .map(|r| r.player_name.as_str())
            .collect();
        assert_eq!(names, vec!["high", "mid"]);
    }
}
