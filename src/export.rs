use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::aggregate::summarize;
use crate::charts::series_for_owner;
use crate::records::RecordStore;
use crate::views::{self, TableModel};

pub struct ExportReport {
    pub owners: usize,
    pub players: usize,
    pub top_rows: usize,
    pub by_owner_rows: usize,
}

/// Writes Owners, Players, TopPlayers and ByOwner sheets.
pub fn export_workbook(path: &Path, store: &RecordStore, top_n: usize) -> Result<ExportReport> {
    let summaries = summarize(store.roster(), store.records());
    let owners = views::owner_summary_table(&summaries);
    let players = views::all_players_table(store.records());
    let top = views::top_players_table(store.roster(), store.records(), top_n);
    let by_owner = by_owner_table(store);

    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();
    for (name, table) in [
        ("Owners", &owners),
        ("Players", &players),
        ("TopPlayers", &top),
        ("ByOwner", &by_owner),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_table(sheet, table, &header).with_context(|| format!("sheet {name}"))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        owners: owners.nrows(),
        players: players.nrows(),
        top_rows: top.nrows(),
        by_owner_rows: by_owner.nrows(),
    })
}

/// The per-owner chart data for every owner, flattened into one sheet.
fn by_owner_table(store: &RecordStore) -> TableModel {
    let mut table = TableModel {
        columns: vec!["Owner".to_string(), "Player".to_string(), "Runs".to_string()],
        rows: Vec::new(),
    };
    for owner in store.roster().iter() {
        let series = series_for_owner(owner, store.records());
        table.rows.extend(
            series
                .points()
                .map(|(player, runs)| vec![owner.to_string(), player.to_string(), runs.to_string()]),
        );
    }
    table
}

fn write_table(worksheet: &mut Worksheet, table: &TableModel, header: &Format) -> Result<()> {
    let numeric = table.numeric_columns();
    for (row_idx, row) in table.to_grid().iter().enumerate() {
        let r = row_idx as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let c = col_idx as u16;
            let count = if r > 0 && numeric.get(col_idx).copied().unwrap_or(false) {
                value.parse::<u64>().ok()
            } else {
                None
            };
            // Count columns go in as numbers so the sheet can sum and sort them.
            let written = match (r, count) {
                (0, _) => worksheet.write_string_with_format(r, c, value, header),
                (_, Some(n)) => worksheet.write_number(r, c, n as f64),
                (_, None) => worksheet.write_string(r, c, value),
            };
            written.with_context(|| format!("write cell ({r},{c})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_store;

    #[test]
    fn by_owner_sheet_skips_owners_without_players() {
        let store = sample_store().unwrap();
        let table = by_owner_table(&store);
        assert_eq!(table.nrows(), store.len());
        assert!(table.rows.iter().all(|r| r[0] != "Karan"));
    }

    #[test]
    fn workbook_is_written() {
        let dir = std::env::temp_dir().join(format!("cricket_owners_xlsx_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("league.xlsx");
        let store = sample_store().unwrap();
        let report = export_workbook(&path, &store, 2).unwrap();
        assert_eq!(report.owners, store.roster().len());
        assert_eq!(report.players, store.len());
        assert!(path.is_file());
        let _ = std::fs::remove_dir_all(dir);
    }
}
