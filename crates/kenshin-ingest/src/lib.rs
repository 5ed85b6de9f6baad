//! Upload ingestion: CSV text in, typed records and field-level findings out.
//!
//! Parsing and validation are separate passes with different failure
//! policies. The parser rejects the whole upload on a missing header column
//! and reports (but does not repair) rows with the wrong field count. The
//! validator never rejects: it walks every field of every row and collects
//! findings, so one row can carry several errors.

#![forbid(unsafe_code)]

mod parse;
mod validate;

use std::fmt::{Display, Formatter};

pub use parse::{parse_csv, ParseIssue, ParseOutcome};
pub use validate::{validate_records, FIELD_RANGES};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// Empty or whitespace-only upload body.
    NoData,
    /// Header row lacks one or more required columns.
    HeaderMismatch { missing: Vec<String> },
    /// The CSV reader itself failed (encoding, unbalanced quoting).
    Csv(String),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => f.write_str("no data rows in upload"),
            Self::HeaderMismatch { missing } => {
                write!(f, "header is missing required columns: {}", missing.join(", "))
            }
            Self::Csv(msg) => write!(f, "csv read failed: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {}
