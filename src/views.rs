//! Presentation-neutral tables: ordered column names plus rows of already
//! formatted cells. The terminal UI, the xlsx export and the plain-text report
//! all render from these.

use crate::aggregate::{OwnerSummary, top_players};
use crate::records::{OwnerRoster, PlayerRecord};

pub const OWNER_SUMMARY_COLUMNS: [&str; 4] = ["Owner", "Total Runs", "Total Wickets", "Player Count"];
pub const ALL_PLAYERS_COLUMNS: [&str; 5] = ["Owner", "Player", "Team ID", "Runs", "Wickets"];
pub const TOP_PLAYERS_COLUMNS: [&str; 5] = ["Owner", "Rank", "Player", "Runs", "Wickets"];

const COUNT_COLUMNS: [&str; 7] = [
    "Total Runs",
    "Total Wickets",
    "Player Count",
    "Team ID",
    "Rank",
    "Runs",
    "Wickets",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableModel {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Widest cell per column, header included, in chars.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(idx) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }

    /// Which columns hold counts. Decided by column name, never by cell text,
    /// so a player called "007" stays text.
    pub fn numeric_columns(&self) -> Vec<bool> {
        self.columns
            .iter()
            .map(|c| COUNT_COLUMNS.contains(&c.as_str()))
            .collect()
    }

    /// Header row followed by data rows, the layout the workbook sheets use.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.columns.clone());
        grid.extend(self.rows.iter().cloned());
        grid
    }
}

pub fn owner_summary_table(summaries: &[OwnerSummary]) -> TableModel {
    let mut table = TableModel::with_columns(&OWNER_SUMMARY_COLUMNS);
    table.rows = summaries.iter().map(summary_row).collect();
    table
}

pub fn all_players_table(records: &[PlayerRecord]) -> TableModel {
    let mut table = TableModel::with_columns(&ALL_PLAYERS_COLUMNS);
    table.rows = records.iter().map(player_row).collect();
    table
}

pub fn top_players_table(roster: &OwnerRoster, records: &[PlayerRecord], n: usize) -> TableModel {
    let mut table = TableModel::with_columns(&TOP_PLAYERS_COLUMNS);
    for owner in roster.iter() {
        for (rank, record) in top_players(owner, records, n).into_iter().enumerate() {
            table.rows.push(vec![
                owner.to_string(),
                (rank + 1).to_string(),
                record.player_name.clone(),
                record.runs.to_string(),
                record.wickets.to_string(),
            ]);
        }
    }
    table
}

fn summary_row(summary: &OwnerSummary) -> Vec<String> {
    vec![
        summary.owner.clone(),
        summary.total_runs.to_string(),
        summary.total_wickets.to_string(),
        summary.player_count.to_string(),
    ]
}

fn player_row(record: &PlayerRecord) -> Vec<String> {
    vec![
        record.owner.clone(),
        record.player_name.clone(),
        record.team_id.to_string(),
        record.runs.to_string(),
        record.wickets.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::records::record;

    #[test]
    fn owner_table_has_fixed_headers_and_plain_numbers() {
        let records = vec![record("Sai", "A", 12_345, 3)];
        let roster = OwnerRoster::new(vec!["Sai".to_string()]);
        let table = owner_summary_table(&summarize(&roster, &records));
        assert_eq!(table.columns, vec!["Owner", "Total Runs", "Total Wickets", "Player Count"]);
        assert_eq!(table.rows, vec![vec!["Sai", "12345", "3", "1"]]);
    }

    #[test]
    fn numeric_columns_are_decided_per_column() {
        let records = vec![record("007", "1983", 12, 0)];
        let table = all_players_table(&records);
        assert_eq!(table.numeric_columns(), vec![false, false, true, true, true]);

        let roster = OwnerRoster::new(vec!["007".to_string()]);
        let owners = owner_summary_table(&summarize(&roster, &records));
        assert_eq!(owners.numeric_columns(), vec![false, true, true, true]);
        assert!(TableModel::default().numeric_columns().is_empty());
    }

    #[test]
    fn players_table_keeps_store_order() {
        let mut a = record("Sai", "Rinku Singh", 12, 0);
        a.team_id = 7;
        let b = record("Mohit", "Jasprit Bumrah", 0, 4);
        let table = all_players_table(&[a, b]);
        assert_eq!(table.columns, vec!["Owner", "Player", "Team ID", "Runs", "Wickets"]);
        assert_eq!(table.rows[0], vec!["Sai", "Rinku Singh", "7", "12", "0"]);
        assert_eq!(table.rows[1][1], "Jasprit Bumrah");
    }

    #[test]
    fn top_table_ranks_within_each_owner() {
        let roster = OwnerRoster::new(vec!["A".to_string(), "B".to_string()]);
        let records = vec![
            record("B", "b1", 5, 0),
            record("A", "a1", 1, 0),
            record("A", "a2", 9, 0),
        ];
        let table = top_players_table(&roster, &records, 3);
        let flat: Vec<(&str, &str, &str)> = table
            .rows
            .iter()
            .map(|r| (r[0].as_str(), r[1].as_str(), r[2].as_str()))
            .collect();
        assert_eq!(flat, vec![("A", "1", "a2"), ("A", "2", "a1"), ("B", "1", "b1")]);
    }

    #[test]
    fn widths_cover_header_and_cells() {
        let table = all_players_table(&[record("Sai", "Suryakumar Yadav", 100, 0)]);
        assert_eq!(table.column_widths(), vec![5, 16, 7, 4, 7]);
    }
}
