use std::fmt::Write;

use crate::aggregate::{ranked_by_runs, summarize, top_players};
use crate::records::RecordStore;
use crate::views::{TableModel, owner_summary_table};

const REPORT_WIDTH: usize = 80;

/// Fixed-width text table. Count columns are right-aligned.
pub fn render_table(table: &TableModel) -> String {
    let widths = table.column_widths();
    let numeric = table.numeric_columns();
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let w = widths.get(idx).copied().unwrap_or(0);
                if numeric.get(idx).copied().unwrap_or(false) {
                    format!("{cell:>w$}")
                } else {
                    format!("{cell:<w$}")
                }
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&table.columns);
    for row in &table.rows {
        out.push_str(&line(row));
    }
    out
}

fn banner(out: &mut String, title: &str) {
    let width = REPORT_WIDTH;
    let rule = "=".repeat(width);
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "{title:^width$}");
    let _ = writeln!(out, "{rule}");
}

/// Summary sorted by total runs, then each owner's best `top_n` players.
pub fn owner_report(store: &RecordStore, top_n: usize) -> String {
    let summaries = summarize(store.roster(), store.records());
    let ranked: Vec<_> = ranked_by_runs(&summaries).into_iter().cloned().collect();

    let mut out = String::new();
    banner(&mut out, "TEAM OWNER PERFORMANCE SUMMARY");
    out.push_str(&render_table(&owner_summary_table(&ranked)));

    banner(&mut out, "TOP PERFORMING PLAYERS BY OWNER");
    for owner in store.roster().iter() {
        let _ = writeln!(out, "\n{owner}'s Top Players:");
        let players = top_players(owner, store.records(), top_n);
        if players.is_empty() {
            out.push_str("  No player data available\n");
            continue;
        }
        for (idx, p) in players.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}: {} runs, {} wickets",
                idx + 1,
                p.player_name,
                p.runs,
                p.wickets
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{OwnerRoster, record};

    #[test]
    fn table_aligns_text_left_and_numbers_right() {
        let table = TableModel {
            columns: vec!["Owner".into(), "Runs".into()],
            rows: vec![vec!["Sai".into(), "7".into()], vec!["Mohit".into(), "120".into()]],
        };
        assert_eq!(render_table(&table), "Owner  Runs\nSai       7\nMohit   120\n");
    }

    #[test]
    fn digit_only_names_stay_left_aligned() {
        let table = TableModel {
            columns: vec!["Player".into(), "Runs".into()],
            rows: vec![vec!["007".into(), "5".into()], vec!["Virat Kohli".into(), "59".into()]],
        };
        let text = render_table(&table);
        assert!(text.contains("\n007 "));
        assert!(text.ends_with("Virat Kohli    59\n"));
    }

    #[test]
    fn report_sorts_by_runs_and_flags_empty_owners() {
        let store = RecordStore::new(
            OwnerRoster::new(vec!["Sai".into(), "Mohit".into(), "Karan".into()]),
            vec![
                record("Sai", "Rinku Singh", 12, 0),
                record("Mohit", "Shubman Gill", 84, 0),
                record("Sai", "Virat Kohli", 59, 0),
            ],
        )
        .unwrap();
        let text = owner_report(&store, 3);
        let mohit = text.find("Mohit  ").unwrap();
        let sai = text.find("Sai    ").unwrap();
        assert!(mohit < sai);
        assert!(text.contains("  1. Virat Kohli: 59 runs, 0 wickets"));
        assert!(text.contains("Karan's Top Players:\n  No player data available"));
    }
}
