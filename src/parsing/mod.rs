//! Parsers for pipeline input files.
//!
//! This module provides parsers for:
//!
//! - **FASTA files**: the input genome and reference sequence sets
//! - **Profile tables**: ordered allele-number tuples mapped to ST numbers
//!
//! Tabular search output has its own parser next to the search engine, in
//! [`crate::search::tabular`], because its column contract belongs to the
//! search tool rather than to user-supplied input.

pub mod fasta;
pub mod profile;

pub use fasta::{
    collect_database_sequences, is_fasta_file, load_genome, read_sequences, write_fasta,
    FastaError, SequenceRecord,
};
pub use profile::{ProfileError, ProfileTable};
