//! Pathogen risk classification via an external tool.
//!
//! Unlike the search-based workflows this one never touches the genome
//! index: it stages a configuration payload in an isolated working
//! directory, invokes the classifier as a subprocess with a bounded wait,
//! and validates the expected output artifacts before extracting the
//! classification. Missing dependencies are detected before invocation and
//! reported as a configuration error, not a crash.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::process::Command;
use tracing::info;

use crate::catalog::store::CatalogEntry;
use crate::core::outcome::{AnalysisOutcome, AnalysisStatus, RiskAssessment};
use crate::pipeline::context::AnalysisContext;
use crate::pipeline::dispatch::{AnalysisHandler, AnalysisTask};
use crate::utils::deps::find_missing;
use crate::utils::process::run_checked;

pub const ANALYSIS_NAME: &str = "Risk_Classification";
pub const DATABASE_ID: &str = "risk_db";

/// Output artifacts the classifier must leave behind
const PREDICTIONS_FILE: &str = "risk_predictions.tsv";
const SUMMARY_FILE: &str = "risk_summary.txt";

/// Does this catalog entry belong to the risk classification workflow?
#[must_use]
pub fn claims(entry: &CatalogEntry) -> bool {
    entry.name == ANALYSIS_NAME || entry.database == DATABASE_ID
}

pub struct RiskHandler;

impl AnalysisHandler for RiskHandler {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn try_handle(
        &self,
        entry: &CatalogEntry,
        ctx: &Arc<AnalysisContext>,
    ) -> Option<AnalysisTask> {
        if !claims(entry) {
            return None;
        }
        Some(AnalysisTask::new(
            entry.clone(),
            run(Arc::clone(ctx), entry.clone()),
        ))
    }
}

/// Configuration payload handed to the classifier.
#[derive(Debug, Serialize)]
struct RiskPayload<'a> {
    input: &'a Path,
    output: &'a Path,
    database: &'a Path,
    threads: usize,
    threshold: f64,
}

async fn run(ctx: Arc<AnalysisContext>, entry: CatalogEntry) -> AnalysisStatus {
    let risk = &ctx.settings.risk;

    // Probe dependencies before invoking anything
    let tools: Vec<&str> = risk.required_tools.iter().map(String::as_str).collect();
    let missing = find_missing(&tools);
    if !missing.is_empty() {
        return AnalysisStatus::ConfigurationError {
            reason: format!("missing classifier dependencies: {}", missing.join(", ")),
        };
    }

    let database = ctx.database_dir(&entry);
    if !database.is_dir() {
        return AnalysisStatus::ConfigurationError {
            reason: format!("classifier database not found at {}", database.display()),
        };
    }

    let out_dir = match ctx.analysis_dir(&entry.name) {
        Ok(dir) => dir,
        Err(e) => {
            return AnalysisStatus::Failed {
                error: format!("failed to create output directory: {e}"),
            }
        }
    };
    let work_dir = match ctx.work_subdir("risk") {
        Ok(dir) => dir,
        Err(e) => {
            return AnalysisStatus::Failed {
                error: format!("failed to create working directory: {e}"),
            }
        }
    };

    // Stage the configuration payload in the isolated working directory
    let payload = RiskPayload {
        input: &ctx.genome.source,
        output: &out_dir,
        database: &database,
        threads: ctx.settings.threads,
        threshold: risk.threshold,
    };
    let config_path = work_dir.join("config.json");
    let staged = serde_json::to_string_pretty(&payload)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&config_path, json).map_err(|e| e.to_string()));
    if let Err(e) = staged {
        return AnalysisStatus::Failed {
            error: format!("failed to stage classifier config: {e}"),
        };
    }

    let mut cmd = Command::new(&risk.command);
    cmd.arg("predict")
        .arg("-i")
        .arg(&ctx.genome.source)
        .arg("-o")
        .arg(&out_dir)
        .arg("-c")
        .arg(&config_path);

    if let Err(e) = run_checked(&risk.command, &mut cmd, risk.timeout).await {
        return AnalysisStatus::Failed {
            error: e.to_string(),
        };
    }

    // Exit zero alone is not success: the expected artifacts must exist,
    // be non-empty, and parse
    match validate_outputs(&out_dir) {
        Ok(assessment) => {
            info!(
                analysis = %entry.name,
                label = %assessment.label,
                confidence = assessment.confidence,
                "risk classification complete"
            );
            AnalysisStatus::Completed {
                outcome: AnalysisOutcome::RiskAssessment(assessment),
            }
        }
        Err(error) => AnalysisStatus::Failed { error },
    }
}

fn validate_outputs(out_dir: &Path) -> Result<RiskAssessment, String> {
    let predictions_path = out_dir.join(PREDICTIONS_FILE);
    let summary_path = out_dir.join(SUMMARY_FILE);

    for path in [&predictions_path, &summary_path] {
        let len = std::fs::metadata(path)
            .map_err(|_| format!("expected output artifact missing: {}", path.display()))?
            .len();
        if len == 0 {
            return Err(format!("output artifact is empty: {}", path.display()));
        }
    }

    let text = std::fs::read_to_string(&predictions_path)
        .map_err(|e| format!("failed to read predictions: {e}"))?;
    parse_predictions(&text)
}

/// Parse the classifier's predictions table: a header line followed by one
/// data row of `label<TAB>confidence[<TAB>evidence...]`.
pub fn parse_predictions(text: &str) -> Result<RiskAssessment, String> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let _header = lines.next().ok_or("predictions table is empty")?;
    let row = lines.next().ok_or("predictions table has no data row")?;

    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < 2 {
        return Err(format!("prediction row has {} columns, need 2", fields.len()));
    }

    let label = fields[0].trim().to_string();
    if label.is_empty() {
        return Err("prediction label is empty".to_string());
    }

    let confidence: f64 = fields[1]
        .trim()
        .parse()
        .map_err(|_| format!("invalid confidence value '{}'", fields[1]))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(format!("confidence {confidence} outside [0, 1]"));
    }

    let evidence = fields[2..]
        .iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    Ok(RiskAssessment {
        label,
        confidence,
        evidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::test_support::make_context;

    #[test]
    fn test_parse_predictions_full_row() {
        let text = "label\tconfidence\tgenes\tmodel\n\
                    human pathogen\t0.93\t231 matched families\tv2.1\n";
        let assessment = parse_predictions(text).unwrap();
        assert_eq!(assessment.label, "human pathogen");
        assert!((assessment.confidence - 0.93).abs() < 1e-9);
        assert_eq!(assessment.evidence, vec!["231 matched families", "v2.1"]);
    }

    #[test]
    fn test_parse_predictions_without_evidence() {
        let assessment = parse_predictions("label\tconfidence\nnon-pathogen\t0.12\n").unwrap();
        assert_eq!(assessment.label, "non-pathogen");
        assert!(assessment.evidence.is_empty());
    }

    #[test]
    fn test_parse_predictions_rejects_missing_data_row() {
        assert!(parse_predictions("label\tconfidence\n").is_err());
        assert!(parse_predictions("").is_err());
    }

    #[test]
    fn test_parse_predictions_rejects_bad_confidence() {
        assert!(parse_predictions("h\tc\npathogen\tmaybe\n").is_err());
        assert!(parse_predictions("h\tc\npathogen\t1.7\n").is_err());
        assert!(parse_predictions("h\tc\npathogen\t-0.2\n").is_err());
    }

    #[test]
    fn test_parse_predictions_boundary_confidence() {
        assert!(parse_predictions("h\tc\npathogen\t0.0\n").is_ok());
        assert!(parse_predictions("h\tc\npathogen\t1.0\n").is_ok());
    }

    #[test]
    fn test_validate_outputs_requires_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PREDICTIONS_FILE),
            "label\tconfidence\npathogen\t0.9\n",
        )
        .unwrap();
        // Summary file absent
        assert!(validate_outputs(dir.path()).is_err());

        std::fs::write(dir.path().join(SUMMARY_FILE), "predicted pathogen\n").unwrap();
        assert!(validate_outputs(dir.path()).is_ok());
    }

    #[test]
    fn test_validate_outputs_rejects_empty_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PREDICTIONS_FILE),
            "label\tconfidence\npathogen\t0.9\n",
        )
        .unwrap();
        std::fs::write(dir.path().join(SUMMARY_FILE), "").unwrap();
        assert!(validate_outputs(dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_missing_dependency_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = make_context(dir.path());
        ctx.settings.risk.required_tools = vec!["definitely-not-a-real-tool-xyz".to_string()];
        let ctx = Arc::new(ctx);

        let entry = CatalogEntry {
            database: DATABASE_ID.to_string(),
            name: ANALYSIS_NAME.to_string(),
        };
        let task = RiskHandler.try_handle(&entry, &ctx).unwrap();
        let status = task.future.await;
        assert!(matches!(status, AnalysisStatus::ConfigurationError { .. }));
    }

    #[tokio::test]
    async fn test_missing_database_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = make_context(dir.path());
        // Dependencies satisfied by tools that exist everywhere
        ctx.settings.risk.required_tools = vec!["sh".to_string()];
        let ctx = Arc::new(ctx);

        let entry = CatalogEntry {
            database: "risk_db".to_string(),
            name: ANALYSIS_NAME.to_string(),
        };
        let task = RiskHandler.try_handle(&entry, &ctx).unwrap();
        let status = task.future.await;
        assert!(matches!(status, AnalysisStatus::ConfigurationError { .. }));
    }
}
