use anyhow::{Context, Result};

use cricket_owners::dataset;
use cricket_owners::export;
use cricket_owners::settings::Settings;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args)?;

    let primary = settings.primary_source();
    let loaded = dataset::load_with_fallback(primary.as_ref(), settings.fallback)
        .context("unable to load league data")?;
    for warning in &loaded.report.warnings {
        eprintln!("warning: {warning}");
    }

    let path = &settings.export_path;
    let summary = export::export_workbook(path, &loaded.store, settings.top_n)?;

    println!("Workbook written: {}", path.display());
    println!("Source: {}", loaded.report.source);
    println!("Owners: {}", summary.owners);
    println!("Players: {}", summary.players);
    println!("Top player rows: {}", summary.top_rows);
    println!("By-owner rows: {}", summary.by_owner_rows);
    Ok(())
}
