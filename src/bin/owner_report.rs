use anyhow::{Context, Result};

use cricket_owners::dataset;
use cricket_owners::persist;
use cricket_owners::report;
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
    if !loaded.report.skipped.is_empty() {
        eprintln!(
            "skipped {} stats entries with no roster player:",
            loaded.report.skipped.len()
        );
        for name in loaded.report.skipped.iter().take(10) {
            eprintln!("   - {name}");
        }
    }

    println!(
        "Source: {} ({} owners, {} players)",
        loaded.report.source, loaded.report.owners, loaded.report.records
    );
    print!("{}", report::owner_report(&loaded.store, settings.top_n));

    if let Some(path) = &settings.json_out {
        persist::write_owner_stats_json(path, &loaded.store)?;
        println!("\nOwner stats written: {}", path.display());
    }

    Ok(())
}
