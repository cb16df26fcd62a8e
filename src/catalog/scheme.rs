//! Species-specific sequence typing schemes.
//!
//! A scheme lives at `<database-root>/<typing-db>/<species>/` and holds one
//! `<locus>.tfa` reference allele set per locus plus a `<species>.txt`
//! profile table. The profile header fixes the locus order. A genome with
//! an unknown species, or a species without a scheme directory, has no
//! scheme; that is a skip condition for typing, not an error.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{HitThresholds, SpeciesTag};
use crate::parsing::profile::{ProfileError, ProfileTable};

#[derive(Error, Debug)]
pub enum SchemeError {
    #[error("profile table missing for species '{species}' in {}", .dir.display())]
    MissingProfile { species: String, dir: PathBuf },

    #[error("allele set missing for locus '{locus}': {}", .path.display())]
    MissingLocus { locus: String, path: PathBuf },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// One typing locus: name plus the path to its reference allele set.
#[derive(Debug, Clone)]
pub struct Locus {
    pub name: String,
    pub alleles_path: PathBuf,
}

/// A complete typing scheme for one species.
#[derive(Debug, Clone)]
pub struct TypingScheme {
    pub species: String,
    /// Loci in profile-table order
    pub loci: Vec<Locus>,
    pub profiles: ProfileTable,
    pub thresholds: HitThresholds,
}

impl TypingScheme {
    /// Locate and load the scheme for a species under the typing database
    /// folder. Returns `Ok(None)` when the species is unknown or no scheme
    /// directory exists for it; returns an error only when a scheme exists
    /// but is incomplete or malformed.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::MissingProfile` when the scheme directory
    /// exists without a profile table, `SchemeError::MissingLocus` when a
    /// locus named in the profile header has no allele set file, or a
    /// profile parse error.
    pub fn discover(
        typing_db_dir: &Path,
        species: &SpeciesTag,
        thresholds: HitThresholds,
    ) -> Result<Option<Self>, SchemeError> {
        if species.is_unknown() {
            return Ok(None);
        }

        let scheme_dir = typing_db_dir.join(species.as_str());
        if !scheme_dir.is_dir() {
            return Ok(None);
        }

        let profile_path = scheme_dir.join(format!("{}.txt", species.as_str()));
        if !profile_path.is_file() {
            return Err(SchemeError::MissingProfile {
                species: species.as_str().to_string(),
                dir: scheme_dir,
            });
        }

        let profiles = ProfileTable::load(&profile_path)?;

        let mut loci = Vec::with_capacity(profiles.loci.len());
        for name in &profiles.loci {
            let alleles_path = scheme_dir.join(format!("{name}.tfa"));
            if !alleles_path.is_file() {
                return Err(SchemeError::MissingLocus {
                    locus: name.clone(),
                    path: alleles_path,
                });
            }
            loci.push(Locus {
                name: name.clone(),
                alleles_path,
            });
        }

        Ok(Some(Self {
            species: species.as_str().to_string(),
            loci,
            profiles,
            thresholds,
        }))
    }
}
