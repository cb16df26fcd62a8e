//! FASTA input using noodles.
//!
//! Loads the input genome (identifier, species, record stats) and reads
//! reference sequence sets for search queries. Supports both uncompressed
//! and gzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.tfa` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::genome::{detect_species, Genome};

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("invalid FASTA: {0}")]
    InvalidFormat(String),

    #[error("no reference sequences found in {0}")]
    EmptyDatabase(String),
}

/// One named sequence read from a FASTA file.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: String,
}

impl SequenceRecord {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".fa.gz")
        || path_str.ends_with(".fasta.gz")
        || path_str.ends_with(".fna.gz")
    {
        return true;
    }

    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna" | "tfa")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Load the input genome: identifier from the first record id (falling back
/// to the file stem), species from the first header's free text.
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, `FastaError::Noodles`
/// if parsing fails, or `FastaError::InvalidFormat` if no records are found.
pub fn load_genome(path: &Path) -> Result<Genome, FastaError> {
    let records = read_sequences(path)?;

    let first = records.first().ok_or_else(|| {
        FastaError::InvalidFormat(format!("no sequences found in {}", path.display()))
    })?;

    let id = if first.id.is_empty() {
        file_stem(path)
    } else {
        first.id.clone()
    };

    let species = detect_species(first.description.as_deref().unwrap_or_default());

    let total_bases = records.iter().map(SequenceRecord::len).sum();

    Ok(Genome {
        id,
        species,
        source: path.to_path_buf(),
        contig_count: records.len(),
        total_bases,
    })
}

/// Read all records from a FASTA file.
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, or
/// `FastaError::Noodles` if a record fails to parse.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, FastaError> {
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        let decoder = GzDecoder::new(file);
        let reader = BufReader::new(decoder);
        read_from(fasta::io::Reader::new(reader))
    } else {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        read_from(fasta::io::Reader::new(reader))
    }
}

fn read_from<R: BufRead>(mut reader: fasta::io::Reader<R>) -> Result<Vec<SequenceRecord>, FastaError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::Noodles(format!("failed to parse FASTA record: {e}")))?;

        let id = String::from_utf8_lossy(record.name()).to_string();
        let description = record
            .description()
            .map(|d| String::from_utf8_lossy(d).to_string());
        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_string();

        records.push(SequenceRecord {
            id,
            description,
            sequence,
        });
    }

    Ok(records)
}

/// Collect every FASTA file under a reference database folder, recursively,
/// and read all of their records into one combined query set.
///
/// # Errors
///
/// Returns `FastaError::EmptyDatabase` if the folder holds no FASTA files
/// (a missing folder counts as empty), or a read error from any file.
pub fn collect_database_sequences(dir: &Path) -> Result<Vec<SequenceRecord>, FastaError> {
    let mut files = Vec::new();
    collect_fasta_files(dir, &mut files)?;
    files.sort();

    if files.is_empty() {
        return Err(FastaError::EmptyDatabase(dir.display().to_string()));
    }

    let mut records = Vec::new();
    for file in &files {
        records.extend(read_sequences(file)?);
    }
    Ok(records)
}

fn collect_fasta_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<(), FastaError> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_fasta_files(&path, out)?;
        } else if is_fasta_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

/// Write records to a FASTA file, one sequence per record.
///
/// # Errors
///
/// Returns `FastaError::Io` on any write failure.
pub fn write_fasta(path: &Path, records: &[SequenceRecord]) -> Result<(), FastaError> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for record in records {
        match &record.description {
            Some(desc) => writeln!(out, ">{} {}", record.id, desc)?,
            None => writeln!(out, ">{}", record.id)?,
        }
        writeln!(out, "{}", record.sequence)?;
    }
    out.flush()?;
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fasta").unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna")));
        assert!(is_fasta_file(Path::new("gapA.tfa")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("/path/to/Genome.FA")));

        assert!(!is_fasta_file(Path::new("test.txt")));
        assert!(!is_fasta_file(Path::new("test.tsv")));
    }

    #[test]
    fn test_load_genome_id_and_species_from_header() {
        let temp = write_temp(b">SAMPLE123 Klebsiella pneumoniae strain X\nACGTACGT\nACGT\n>contig_2\nGGGG\n");

        let genome = load_genome(temp.path()).unwrap();
        assert_eq!(genome.id, "SAMPLE123");
        assert_eq!(genome.species.as_str(), "klebsiella");
        assert_eq!(genome.contig_count, 2);
        assert_eq!(genome.total_bases, 16);
    }

    #[test]
    fn test_load_genome_unknown_species() {
        let temp = write_temp(b">node_1 length=8\nACGTACGT\n");
        let genome = load_genome(temp.path()).unwrap();
        assert!(genome.species.is_unknown());
    }

    #[test]
    fn test_load_genome_empty_file() {
        let temp = write_temp(b"");
        assert!(load_genome(temp.path()).is_err());
    }

    #[test]
    fn test_read_sequences() {
        let temp = write_temp(b">gapA_1\nACGT\n>gapA_2 variant\nACGTAC\n");
        let records = read_sequences(temp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "gapA_1");
        assert_eq!(records[0].len(), 4);
        assert_eq!(records[1].description.as_deref(), Some("variant"));
    }

    #[test]
    fn test_collect_database_sequences() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fasta"), ">a_1\nACGT\n").unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("b.fna"), ">b_1\nGGGG\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let records = collect_database_sequences(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_collect_database_sequences_missing_dir() {
        let result = collect_database_sequences(Path::new("/nonexistent/db"));
        assert!(matches!(result, Err(FastaError::EmptyDatabase(_))));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta");
        let records = vec![SequenceRecord {
            id: "gapA_3".to_string(),
            description: None,
            sequence: "ACGTACGT".to_string(),
        }];
        write_fasta(&path, &records).unwrap();

        let back = read_sequences(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, "gapA_3");
        assert_eq!(back[0].sequence, "ACGTACGT");
    }
}
