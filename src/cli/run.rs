use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::catalog::store::AnalysisCatalog;
use crate::cli::OutputFormat;
use crate::core::types::HitThresholds;
use crate::pipeline::context::PipelineSettings;
use crate::pipeline::Pipeline;
use crate::report;

#[derive(Args)]
pub struct RunArgs {
    /// Input genome in FASTA format (optionally gzip compressed)
    #[arg(required = true)]
    pub genome: PathBuf,

    /// Output directory for results
    #[arg(short, long, default_value = "analysis_results")]
    pub output: PathBuf,

    /// Root folder holding the reference databases
    #[arg(long, default_value = "database")]
    pub database_root: PathBuf,

    /// Path to a custom analysis catalog (JSON)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Bounded wait for each search invocation, in seconds
    #[arg(long, default_value = "600")]
    pub search_timeout: u64,

    /// Threads per search invocation
    #[arg(long, default_value = "4")]
    pub threads: usize,

    /// Minimum percent identity for a qualifying hit (0-100)
    #[arg(long, default_value = "90.0")]
    pub min_identity: f64,

    /// Minimum query coverage for a qualifying hit (0-100)
    #[arg(long, default_value = "90.0")]
    pub min_coverage: f64,
}

/// Execute the run subcommand
///
/// # Errors
///
/// Returns an error for fatal startup conditions: invalid arguments,
/// unreadable genome, missing required tools, or index build failure.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !(0.0..=100.0).contains(&args.min_identity) || !(0.0..=100.0).contains(&args.min_coverage) {
        anyhow::bail!("--min-identity and --min-coverage must be within 0-100");
    }

    let catalog = match &args.catalog {
        Some(path) => AnalysisCatalog::load_from_file(path)?,
        None => AnalysisCatalog::load_embedded()?,
    };

    if verbose {
        eprintln!(
            "Running {} analyses against {}",
            catalog.len(),
            args.genome.display()
        );
    }

    let settings = PipelineSettings {
        database_root: args.database_root.clone(),
        results_root: args.output.clone(),
        search_timeout: Duration::from_secs(args.search_timeout),
        threads: args.threads,
        thresholds: HitThresholds {
            min_identity: args.min_identity,
            min_coverage: args.min_coverage / 100.0,
        },
        ..PipelineSettings::default()
    };

    let pipeline = Pipeline::new(catalog, settings);

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(async { pipeline.run(&args.genome).await })?;

    match format {
        OutputFormat::Text => print!("{}", report::render(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
