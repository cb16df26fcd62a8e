//! Parser for the search tool's tabular output.
//!
//! One row per hit, tab-separated, twelve fixed columns: query id, subject
//! id, percent identity, alignment length, mismatches, gap opens, query
//! start/end, subject start/end, e-value, bit score. Column order and
//! presence are a compatibility contract; anything that deviates is a parse
//! error, kept separate from execution failures so callers can tell "tool
//! crashed" from "tool produced garbage". An empty file is a valid zero-hit
//! result.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::hit::SequenceHit;

#[derive(Error, Debug)]
pub enum TabularParseError {
    #[error("line {line}: expected 12 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: hit for unknown query '{query}'")]
    UnknownQuery { line: usize, query: String },
}

/// Parse tabular output into hits, deriving each hit's query coverage from
/// the aligned span and the query length.
///
/// # Errors
///
/// Returns a [`TabularParseError`] for short rows, unparsable numeric
/// fields, or hits referencing a query id absent from `query_lengths`.
pub fn parse_hits(
    text: &str,
    query_lengths: &HashMap<String, u64>,
) -> Result<Vec<SequenceHit>, TabularParseError> {
    let mut hits = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let row = raw.trim_end();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 12 {
            return Err(TabularParseError::ColumnCount {
                line,
                found: fields.len(),
            });
        }

        let query_id = fields[0].to_string();
        let query_len = *query_lengths
            .get(&query_id)
            .ok_or_else(|| TabularParseError::UnknownQuery {
                line,
                query: query_id.clone(),
            })?;

        let identity = parse_field(fields[2], line, "identity")?;
        let alignment_length = parse_field(fields[3], line, "alignment length")?;
        let mismatches = parse_field(fields[4], line, "mismatches")?;
        let gap_opens = parse_field(fields[5], line, "gap opens")?;
        let query_start: u64 = parse_field(fields[6], line, "query start")?;
        let query_end: u64 = parse_field(fields[7], line, "query end")?;
        let subject_start = parse_field(fields[8], line, "subject start")?;
        let subject_end = parse_field(fields[9], line, "subject end")?;
        let evalue = parse_field(fields[10], line, "e-value")?;
        let bit_score = parse_field(fields[11], line, "bit score")?;

        let span = query_end.saturating_sub(query_start) + 1;
        let coverage = if query_len == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let fraction = span as f64 / query_len as f64;
            fraction.min(1.0)
        };

        hits.push(SequenceHit {
            query_id,
            subject_id: fields[1].to_string(),
            identity,
            alignment_length,
            mismatches,
            gap_opens,
            query_start,
            query_end,
            subject_start,
            subject_end,
            evalue,
            bit_score,
            coverage,
        });
    }

    Ok(hits)
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    line: usize,
    field: &'static str,
) -> Result<T, TabularParseError> {
    value.parse().map_err(|_| TabularParseError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

/// Render hits back to the twelve-column tabular form.
#[must_use]
pub fn format_hits(hits: &[SequenceHit]) -> String {
    let mut out = String::new();
    for h in hits {
        out.push_str(&format!(
            "{}\t{}\t{:.3}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:e}\t{:.1}\n",
            h.query_id,
            h.subject_id,
            h.identity,
            h.alignment_length,
            h.mismatches,
            h.gap_opens,
            h.query_start,
            h.query_end,
            h.subject_start,
            h.subject_end,
            h.evalue,
            h.bit_score,
        ));
    }
    out
}
