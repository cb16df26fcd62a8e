//! Analysis catalog and typing scheme configuration.
//!
//! The catalog is the work list for a run: an ordered mapping of reference
//! database identifiers to display names, supplied as configuration. An
//! embedded default catalog is compiled into the binary; a custom catalog
//! can be loaded from a JSON file with `--catalog`.
//!
//! Typing schemes are discovered per species under the typing database
//! folder at run time; see [`scheme::TypingScheme`].

pub mod scheme;
pub mod store;

pub use scheme::{Locus, SchemeError, TypingScheme};
pub use store::{AnalysisCatalog, CatalogEntry, CatalogError, CATALOG_VERSION};
