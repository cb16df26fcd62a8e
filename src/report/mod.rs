//! Final report rendering and persistence.
//!
//! Consumes the immutable [`PipelineReport`] only; all analysis decisions
//! were made upstream. Produces `report.txt` (human-readable) and
//! `report.json` (machine-readable with a creation timestamp).

pub mod text;

use std::path::Path;

use serde::Serialize;

use crate::core::outcome::PipelineReport;

pub use text::render;

/// Envelope for the JSON export.
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    created_at: String,
    #[serde(flatten)]
    report: &'a PipelineReport,
}

/// Write `report.txt` and `report.json` into `dir`.
///
/// # Errors
///
/// Returns an IO error if either file cannot be written.
pub fn write_report(report: &PipelineReport, dir: &Path) -> std::io::Result<()> {
    std::fs::write(dir.join("report.txt"), render(report))?;

    let document = ReportDocument {
        created_at: chrono::Utc::now().to_rfc3339(),
        report,
    };
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(dir.join("report.json"), json)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::{AnalysisRecord, AnalysisStatus};
    use crate::core::types::SpeciesTag;

    #[test]
    fn test_write_report_produces_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = PipelineReport {
            genome_id: "SAMPLE123".to_string(),
            species: SpeciesTag::known("klebsiella"),
            analyses: vec![AnalysisRecord {
                analysis: "Sequence_Typing".to_string(),
                status: AnalysisStatus::NotApplicable {
                    reason: "no typing scheme available for species 'unknown'".to_string(),
                },
            }],
        };

        write_report(&report, dir.path()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
        assert!(text.contains("SAMPLE123"));

        let json = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["genome_id"], "SAMPLE123");
        assert!(value["created_at"].is_string());
    }
}
