//! Tabular validator: parses the uploaded CSV into records and enforces
//! the row ceiling and required columns.
//!
//! The header row names the columns. Rows may be ragged: missing trailing
//! fields read as empty, surplus fields without a header are dropped.

mod record;

pub use record::Record;

use crate::config::IngestConfig;
use crate::error::IngestError;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parses CSV from `reader` and validates it against `cfg`.
///
/// Fails with `RowCountExceeded` as soon as more than `cfg.max_rows` data rows
/// have been read (the rest of the input is not consumed), then with
/// `MissingColumns` if the first record lacks any required column. An input
/// without data rows counts as missing every column. Lines that are blank
/// after trimming are skipped and do not count as rows.
pub fn parse_records<R: Read>(reader: R, cfg: &IngestConfig) -> Result<Vec<Record>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(csv_error)?;
        // Whitespace-only lines trim down to empty fields; they are not rows.
        if row.iter().all(str::is_empty) {
            continue;
        }
        if records.len() == cfg.max_rows {
            return Err(IngestError::RowCountExceeded { max: cfg.max_rows });
        }
        records.push(Record::from_row(&headers, &row));
    }

    let missing: Vec<String> = match records.first() {
        Some(first) => cfg
            .required_columns()
            .filter(|col| !first.has_column(col))
            .map(str::to_string)
            .collect(),
        None => cfg.required_columns().map(str::to_string).collect(),
    };
    if !missing.is_empty() {
        tracing::debug!(?missing, "upload is missing required columns");
        return Err(IngestError::MissingColumns { missing });
    }

    tracing::debug!(rows = records.len(), "parsed upload");
    Ok(records)
}

/// Read failures are ours, not the client's; everything else is bad CSV.
fn csv_error(e: csv::Error) -> IngestError {
    if e.is_io_error() {
        IngestError::Internal(anyhow::Error::new(e).context("read upload"))
    } else {
        IngestError::Parse(e)
    }
}

/// Opens the upload at `path` and parses it with [`parse_records`].
pub fn read_records(path: &Path, cfg: &IngestConfig) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path)
        .with_context(|| format!("open upload {}", path.display()))
        .map_err(IngestError::Internal)?;
    parse_records(BufReader::new(file), cfg)
}
