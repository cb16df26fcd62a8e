//! Parser for sequence type profile tables.
//!
//! A profile table is a tab-separated file whose header row is
//! `ST<TAB>locus1<TAB>locus2...` and whose data rows map an ordered tuple of
//! allele numbers to a sequence type number. The header fixes the locus
//! order for the whole scheme.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid profile header: {0}")]
    InvalidHeader(String),

    #[error("invalid profile row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

/// Profile table: ordered loci plus the allele-tuple -> ST mapping.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    /// Locus names in scheme order
    pub loci: Vec<String>,
    rows: HashMap<Vec<u32>, u32>,
}

impl ProfileTable {
    /// Parse a profile table from a file.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Io` if the file cannot be read, or a parse
    /// error for a malformed header or row.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a profile table from text.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidHeader` if the header is missing or has
    /// no locus columns, or `ProfileError::InvalidRow` for malformed rows.
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let mut lines = text.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| ProfileError::InvalidHeader("empty profile table".to_string()))?;

        let mut columns = header.split('\t');
        match columns.next() {
            Some(first) if first.eq_ignore_ascii_case("st") => {}
            other => {
                return Err(ProfileError::InvalidHeader(format!(
                    "expected first column 'ST', found {other:?}"
                )))
            }
        }

        let loci: Vec<String> = columns.map(str::to_string).collect();
        if loci.is_empty() {
            return Err(ProfileError::InvalidHeader(
                "header has no locus columns".to_string(),
            ));
        }

        let mut rows = HashMap::new();
        for (i, line) in lines {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < loci.len() + 1 {
                return Err(ProfileError::InvalidRow {
                    line: i + 1,
                    reason: format!(
                        "expected {} columns, found {}",
                        loci.len() + 1,
                        fields.len()
                    ),
                });
            }

            let st: u32 = fields[0].parse().map_err(|_| ProfileError::InvalidRow {
                line: i + 1,
                reason: format!("invalid ST number '{}'", fields[0]),
            })?;

            let mut profile = Vec::with_capacity(loci.len());
            for field in &fields[1..=loci.len()] {
                let allele: u32 = field.parse().map_err(|_| ProfileError::InvalidRow {
                    line: i + 1,
                    reason: format!("invalid allele number '{field}'"),
                })?;
                profile.push(allele);
            }

            rows.insert(profile, st);
        }

        Ok(Self { loci, rows })
    }

    /// Look up the ST for a complete ordered allele tuple.
    #[must_use]
    pub fn lookup(&self, profile: &[u32]) -> Option<u32> {
        self.rows.get(profile).copied()
    }

    /// Number of profiles in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
