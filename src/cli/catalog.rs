use std::path::PathBuf;

use clap::Args;

use crate::catalog::store::AnalysisCatalog;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CatalogArgs {
    /// Path to a custom analysis catalog (JSON)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute the catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => AnalysisCatalog::load_from_file(path)?,
        None => AnalysisCatalog::load_embedded()?,
    };

    match format {
        OutputFormat::Text => {
            println!("{:<30} DATABASE", "ANALYSIS");
            for entry in catalog.entries() {
                println!("{:<30} {}", entry.name, entry.database);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        }
    }

    Ok(())
}
