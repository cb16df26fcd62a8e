use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::hit::SequenceHit;
use crate::core::types::SpeciesTag;

/// Allele assignment for one typing locus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "allele")]
pub enum AlleleAssignment {
    /// Full-length perfect match to a reference allele
    Called(u32),
    /// Qualifying but imperfect match; same allele number, lower confidence
    Uncertain(u32),
    /// No qualifying hit, or the locus search failed
    Missing,
}

impl AlleleAssignment {
    #[must_use]
    pub fn allele_number(&self) -> Option<u32> {
        match self {
            Self::Called(n) | Self::Uncertain(n) => Some(*n),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl std::fmt::Display for AlleleAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Called(n) => write!(f, "{n}"),
            Self::Uncertain(n) => write!(f, "~{n}"),
            Self::Missing => write!(f, "-"),
        }
    }
}

/// One allele call: locus, assignment, and the hit that supports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlleleCall {
    pub locus: String,
    pub assignment: AlleleAssignment,
    /// Best qualifying hit, absent when the locus is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit: Option<SequenceHit>,
}

/// Resolution of an ordered allele profile against the profile table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "st")]
pub enum StAssignment {
    /// Profile matched a known sequence type
    Type(u32),
    /// All loci resolved, but the profile is not in the table
    Novel,
    /// One or more loci are missing; no ST can be assigned
    Incomplete,
}

impl std::fmt::Display for StAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(n) => write!(f, "ST{n}"),
            Self::Novel => write!(f, "novel"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Result of the sequence typing workflow: the ordered allele profile and
/// its resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceTypeResult {
    /// Scheme the profile was resolved against (species tag)
    pub scheme: String,
    /// Allele calls in scheme locus order
    pub alleles: Vec<AlleleCall>,
    pub sequence_type: StAssignment,
}

/// Best qualifying hit for one resistance gene family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResistanceRecord {
    /// Full variant identifier of the matched reference entry
    pub variant: String,
    pub identity: f64,
    pub coverage: f64,
}

/// Per-family digest of resistance determinants. Empty means no resistance
/// genes were detected, which is a valid result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResistanceDigest {
    pub genes: BTreeMap<String, ResistanceRecord>,
}

impl ResistanceDigest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }
}

/// Output of the external risk classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub evidence: Vec<String>,
}

/// Outcome payload of one analysis, keyed by analysis kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum AnalysisOutcome {
    RawHits(Vec<SequenceHit>),
    AlleleProfile(SequenceTypeResult),
    ResistanceSummary(ResistanceDigest),
    RiskAssessment(RiskAssessment),
}

/// Terminal state of one analysis. Write-once: a workflow reports its status
/// exactly once and nothing overwrites it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum AnalysisStatus {
    Completed { outcome: AnalysisOutcome },
    /// External process exited non-zero, timed out, or produced garbage
    Failed { error: String },
    /// Preconditions for the analysis do not hold for this genome
    NotApplicable { reason: String },
    /// Required tool or reference data is absent
    ConfigurationError { reason: String },
}

impl AnalysisStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            Self::Completed { outcome } => Some(outcome),
            _ => None,
        }
    }
}

/// One entry of the final report: analysis display name plus its status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis: String,
    #[serde(flatten)]
    pub status: AnalysisStatus,
}

/// The merged result set for one run. Built exactly once by the aggregator;
/// immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub genome_id: String,
    pub species: SpeciesTag,
    /// Records in catalog order
    pub analyses: Vec<AnalysisRecord>,
}

impl PipelineReport {
    #[must_use]
    pub fn get(&self, analysis: &str) -> Option<&AnalysisStatus> {
        self.analyses
            .iter()
            .find(|r| r.analysis == analysis)
            .map(|r| &r.status)
    }

    /// Number of analyses that completed successfully
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.analyses.iter().filter(|r| r.status.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allele_assignment_number() {
        assert_eq!(AlleleAssignment::Called(4).allele_number(), Some(4));
        assert_eq!(AlleleAssignment::Uncertain(4).allele_number(), Some(4));
        assert_eq!(AlleleAssignment::Missing.allele_number(), None);
        assert!(AlleleAssignment::Missing.is_missing());
    }

    #[test]
    fn test_st_assignment_display() {
        assert_eq!(StAssignment::Type(258).to_string(), "ST258");
        assert_eq!(StAssignment::Novel.to_string(), "novel");
        assert_eq!(StAssignment::Incomplete.to_string(), "incomplete");
    }

    #[test]
    fn test_empty_digest_is_valid() {
        let digest = ResistanceDigest::default();
        assert!(digest.is_empty());
        assert_eq!(digest.len(), 0);
    }

    #[test]
    fn test_status_success() {
        let ok = AnalysisStatus::Completed {
            outcome: AnalysisOutcome::ResistanceSummary(ResistanceDigest::default()),
        };
        assert!(ok.is_success());
        assert!(ok.outcome().is_some());

        let failed = AnalysisStatus::Failed {
            error: "blastn exited with 1".to_string(),
        };
        assert!(!failed.is_success());
        assert!(failed.outcome().is_none());
    }

    #[test]
    fn test_report_lookup() {
        let report = PipelineReport {
            genome_id: "SAMPLE123".to_string(),
            species: SpeciesTag::known("klebsiella"),
            analyses: vec![AnalysisRecord {
                analysis: "Antimicrobial_Resistance".to_string(),
                status: AnalysisStatus::Completed {
                    outcome: AnalysisOutcome::ResistanceSummary(ResistanceDigest::default()),
                },
            }],
        };

        assert!(report.get("Antimicrobial_Resistance").is_some());
        assert!(report.get("Sequence_Typing").is_none());
        assert_eq!(report.success_count(), 1);
    }
}
