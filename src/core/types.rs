use serde::{Deserialize, Serialize};

/// Species tag detected from the genome header.
///
/// Tags are lowercase genus names (e.g. `klebsiella`). Detection failure is
/// represented by the `unknown` sentinel rather than an error, so a genome
/// with an unrecognizable header still flows through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesTag(String);

impl SpeciesTag {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn known(s: impl Into<String>) -> Self {
        Self(s.into().to_lowercase())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeciesTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualification thresholds for alignment hits.
///
/// Both bounds are inclusive: a hit at exactly the threshold qualifies.
/// These are scheme parameters, not constants; the typing scheme or the CLI
/// may override the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitThresholds {
    /// Minimum percent identity (0-100)
    pub min_identity: f64,
    /// Minimum query coverage fraction (0-1)
    pub min_coverage: f64,
}

impl Default for HitThresholds {
    fn default() -> Self {
        Self {
            min_identity: 90.0,
            min_coverage: 0.90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_tag_lowercases() {
        let tag = SpeciesTag::known("Klebsiella");
        assert_eq!(tag.as_str(), "klebsiella");
        assert!(!tag.is_unknown());
    }

    #[test]
    fn test_species_tag_unknown() {
        let tag = SpeciesTag::unknown();
        assert!(tag.is_unknown());
        assert_eq!(tag.to_string(), "unknown");
    }

    #[test]
    fn test_default_thresholds() {
        let t = HitThresholds::default();
        assert!((t.min_identity - 90.0).abs() < f64::EPSILON);
        assert!((t.min_coverage - 0.90).abs() < f64::EPSILON);
    }
}
