use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::types::SpeciesTag;

/// Genera the species detector recognizes in header text.
///
/// Matching is by whole lowercase word, so "Klebsiella pneumoniae subsp."
/// maps to `klebsiella` while an accession like "KLEB01" does not.
const KNOWN_GENERA: &[&str] = &[
    "acinetobacter",
    "enterobacter",
    "enterococcus",
    "escherichia",
    "klebsiella",
    "listeria",
    "pseudomonas",
    "salmonella",
    "staphylococcus",
    "streptococcus",
];

/// An input genome, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Sample identifier: the first FASTA record id, or the file stem when
    /// the header carries no usable identifier
    pub id: String,

    /// Species detected from the first header's free text
    pub species: SpeciesTag,

    /// Path to the sequence file on disk
    pub source: PathBuf,

    /// Number of sequence records in the file
    pub contig_count: usize,

    /// Total bases across all records
    pub total_bases: u64,
}

/// Detect a species tag from free-text header content.
///
/// Pure function: scans the text for a known genus word and returns the
/// matching tag, or the `unknown` sentinel when nothing matches.
#[must_use]
pub fn detect_species(header_text: &str) -> SpeciesTag {
    let lowered = header_text.to_lowercase();
    for word in lowered.split(|c: char| !c.is_ascii_alphabetic()) {
        if KNOWN_GENERA.contains(&word) {
            return SpeciesTag::known(word);
        }
    }
    SpeciesTag::unknown()
}
