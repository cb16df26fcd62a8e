//! Plain-text rendering of the pipeline report.

use std::fmt::Write as _;

use crate::core::outcome::{AnalysisOutcome, AnalysisStatus, PipelineReport};

/// Render the report as the one-page text summary.
#[must_use]
pub fn render(report: &PipelineReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "========== Isolate Profile Report ==========");
    let _ = writeln!(out);
    let _ = writeln!(out, "Sample:  {}", report.genome_id);
    let _ = writeln!(out, "Species: {}", report.species);
    let _ = writeln!(out);

    for record in &report.analyses {
        let _ = writeln!(out, "--- {} ---", record.analysis.replace('_', " "));
        render_status(&mut out, &record.status);
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "{}/{} analyses completed",
        report.success_count(),
        report.analyses.len()
    );

    out
}

fn render_status(out: &mut String, status: &AnalysisStatus) {
    match status {
        AnalysisStatus::Completed { outcome } => render_outcome(out, outcome),
        AnalysisStatus::Failed { error } => {
            let _ = writeln!(out, "  FAILED: {error}");
        }
        AnalysisStatus::NotApplicable { reason } => {
            let _ = writeln!(out, "  not applicable: {reason}");
        }
        AnalysisStatus::ConfigurationError { reason } => {
            let _ = writeln!(out, "  configuration error: {reason}");
        }
    }
}

fn render_outcome(out: &mut String, outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::AlleleProfile(result) => {
            let _ = writeln!(out, "  Sequence type: {}", result.sequence_type);
            let profile = result
                .alleles
                .iter()
                .map(|call| format!("{}-{}", call.locus, call.assignment))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "  Allele profile: {profile}");
        }
        AnalysisOutcome::ResistanceSummary(digest) => {
            if digest.is_empty() {
                let _ = writeln!(out, "  No resistance genes detected.");
            } else {
                for (gene, record) in &digest.genes {
                    let _ = writeln!(
                        out,
                        "  {:<20} {} (identity {:.2}%, coverage {:.0}%)",
                        gene,
                        record.variant,
                        record.identity,
                        record.coverage * 100.0
                    );
                }
            }
        }
        AnalysisOutcome::RiskAssessment(assessment) => {
            let _ = writeln!(
                out,
                "  {} (confidence {:.2})",
                assessment.label, assessment.confidence
            );
            for item in &assessment.evidence {
                let _ = writeln!(out, "    - {item}");
            }
        }
        AnalysisOutcome::RawHits(hits) => {
            if hits.is_empty() {
                let _ = writeln!(out, "  No significant hits found.");
            } else {
                for hit in hits {
                    let _ = writeln!(
                        out,
                        "  {:<25} (identity {:.2}%, contig {})",
                        hit.query_id, hit.identity, hit.subject_id
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::{
        AlleleAssignment, AlleleCall, AnalysisRecord, ResistanceDigest, ResistanceRecord,
        SequenceTypeResult, StAssignment,
    };
    use crate::core::types::SpeciesTag;

    fn typing_record() -> AnalysisRecord {
        AnalysisRecord {
            analysis: "Sequence_Typing".to_string(),
            status: AnalysisStatus::Completed {
                outcome: AnalysisOutcome::AlleleProfile(SequenceTypeResult {
                    scheme: "klebsiella".to_string(),
                    alleles: vec![
                        AlleleCall {
                            locus: "gapA".to_string(),
                            assignment: AlleleAssignment::Called(3),
                            hit: None,
                        },
                        AlleleCall {
                            locus: "infB".to_string(),
                            assignment: AlleleAssignment::Missing,
                            hit: None,
                        },
                    ],
                    sequence_type: StAssignment::Incomplete,
                }),
            },
        }
    }

    #[test]
    fn test_render_header_and_typing() {
        let report = PipelineReport {
            genome_id: "SAMPLE123".to_string(),
            species: SpeciesTag::known("klebsiella"),
            analyses: vec![typing_record()],
        };

        let text = render(&report);
        assert!(text.contains("Sample:  SAMPLE123"));
        assert!(text.contains("Species: klebsiella"));
        assert!(text.contains("Sequence type: incomplete"));
        assert!(text.contains("gapA-3"));
        assert!(text.contains("infB--"));
        assert!(text.contains("1/1 analyses completed"));
    }

    #[test]
    fn test_render_failure_is_visible() {
        let report = PipelineReport {
            genome_id: "S1".to_string(),
            species: SpeciesTag::unknown(),
            analyses: vec![AnalysisRecord {
                analysis: "Plasmid_Replicons".to_string(),
                status: AnalysisStatus::Failed {
                    error: "blastn timed out after 600s".to_string(),
                },
            }],
        };

        let text = render(&report);
        assert!(text.contains("FAILED: blastn timed out"));
        assert!(text.contains("0/1 analyses completed"));
    }

    #[test]
    fn test_render_empty_resistance_digest() {
        let report = PipelineReport {
            genome_id: "S1".to_string(),
            species: SpeciesTag::unknown(),
            analyses: vec![AnalysisRecord {
                analysis: "Antimicrobial_Resistance".to_string(),
                status: AnalysisStatus::Completed {
                    outcome: AnalysisOutcome::ResistanceSummary(ResistanceDigest::default()),
                },
            }],
        };

        let text = render(&report);
        assert!(text.contains("No resistance genes detected."));
    }

    #[test]
    fn test_render_resistance_rows() {
        let mut digest = ResistanceDigest::default();
        digest.genes.insert(
            "blaKPC-2".to_string(),
            ResistanceRecord {
                variant: "blaKPC-2_2_AY034848".to_string(),
                identity: 100.0,
                coverage: 1.0,
            },
        );
        let report = PipelineReport {
            genome_id: "S1".to_string(),
            species: SpeciesTag::unknown(),
            analyses: vec![AnalysisRecord {
                analysis: "Antimicrobial_Resistance".to_string(),
                status: AnalysisStatus::Completed {
                    outcome: AnalysisOutcome::ResistanceSummary(digest),
                },
            }],
        };

        let text = render(&report);
        assert!(text.contains("blaKPC-2"));
        assert!(text.contains("identity 100.00%"));
    }
}
