use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::types::HitThresholds;

/// One alignment between a query sequence and the genome.
///
/// The first twelve fields mirror the tabular output columns of the search
/// tool; `coverage` is derived from the aligned query span and the query
/// length. Hits are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceHit {
    pub query_id: String,
    pub subject_id: String,
    /// Percent identity (0-100)
    pub identity: f64,
    pub alignment_length: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,
    pub evalue: f64,
    pub bit_score: f64,
    /// Fraction of the query spanned by the alignment (0-1)
    pub coverage: f64,
}

impl SequenceHit {
    /// Gene family of the query: the id up to the first underscore.
    ///
    /// Reference sets name entries `<gene>_<allele>[_<accession>]`, so
    /// `blaKPC-2_1_AY034847` belongs to family `blaKPC-2`.
    #[must_use]
    pub fn query_gene(&self) -> &str {
        self.query_id.split('_').next().unwrap_or(&self.query_id)
    }

    /// Allele number encoded in the query id (`gapA_3` -> 3), if any.
    #[must_use]
    pub fn query_allele_number(&self) -> Option<u32> {
        self.query_id
            .rsplit_once('_')
            .and_then(|(_, n)| n.parse().ok())
    }

    /// Does this hit meet the identity and coverage thresholds?
    /// Both bounds are inclusive.
    #[must_use]
    pub fn qualifies(&self, thresholds: &HitThresholds) -> bool {
        self.identity >= thresholds.min_identity && self.coverage >= thresholds.min_coverage
    }

    /// Is this a full-length perfect match?
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.identity >= 100.0 && self.coverage >= 1.0
    }
}

/// Rank two hits: higher identity first, ties broken by longer alignment,
/// then by lower e-value.
#[must_use]
pub fn rank_hits(a: &SequenceHit, b: &SequenceHit) -> Ordering {
    b.identity
        .partial_cmp(&a.identity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.alignment_length.cmp(&a.alignment_length))
        .then_with(|| a.evalue.partial_cmp(&b.evalue).unwrap_or(Ordering::Equal))
}

/// Select the best qualifying hit from a set, or `None` when nothing passes
/// the thresholds.
#[must_use]
pub fn best_qualifying<'a>(
    hits: &'a [SequenceHit],
    thresholds: &HitThresholds,
) -> Option<&'a SequenceHit> {
    hits.iter()
        .filter(|h| h.qualifies(thresholds))
        .min_by(|a, b| rank_hits(a, b))
}
