use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("duplicate analysis name in catalog: {0}")]
    DuplicateName(String),

    #[error("catalog has no analyses")]
    Empty,
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// One configured analysis: the reference database identifier and the
/// display name used for output folders and the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Folder name under the database root (e.g. `resfinder_db`)
    pub database: String,
    /// Display name (e.g. `Antimicrobial_Resistance`)
    pub name: String,
}

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogData {
    version: String,
    analyses: Vec<CatalogEntry>,
}

/// The work list for a run: an ordered set of analyses, supplied as
/// configuration and read-only afterwards. Insertion order is preserved for
/// reporting; execution order across entries is not guaranteed.
#[derive(Debug, Clone)]
pub struct AnalysisCatalog {
    entries: Vec<CatalogEntry>,
}

impl AnalysisCatalog {
    /// Build a catalog from entries, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list, or
    /// `CatalogError::DuplicateName` when two entries share a display name
    /// (display names key the result set, so they must be unique).
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.clone()) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document is invalid (a
    /// packaging defect, not a runtime condition).
    pub fn load_embedded() -> Result<Self, CatalogError> {
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/default_analyses.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read, or a
    /// parse/validation error for invalid content.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalog from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` for invalid JSON, or a validation
    /// error from [`AnalysisCatalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "catalog version mismatch"
            );
        }

        Self::new(data.analyses)
    }

    /// Entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Find the entry with the given display name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
