//! Core data types for the analysis pipeline.
//!
//! This module provides the fundamental types used throughout the crate:
//!
//! - [`Genome`]: the input genome with its identifier and detected species
//! - [`SequenceHit`]: one alignment row from the search tool
//! - [`AlleleCall`], [`SequenceTypeResult`]: sequence typing results
//! - [`AnalysisOutcome`], [`AnalysisStatus`]: per-analysis terminal states
//! - [`PipelineReport`]: the merged, immutable result set for one run
//!
//! All of these are plain data: construction happens in the workflows, and
//! nothing here performs I/O.

pub mod genome;
pub mod hit;
pub mod outcome;
pub mod types;

pub use genome::{detect_species, Genome};
pub use hit::{best_qualifying, rank_hits, SequenceHit};
pub use outcome::{
    AlleleAssignment, AlleleCall, AnalysisOutcome, AnalysisRecord, AnalysisStatus, PipelineReport,
    ResistanceDigest, ResistanceRecord, RiskAssessment, SequenceTypeResult, StAssignment,
};
pub use types::{HitThresholds, SpeciesTag};
