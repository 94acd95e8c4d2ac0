//! Importing tax rows from CSV.
//!
//! The file has a header row with the columns `tax_code`, `old_fare` and
//! `new_fare`. Blank fare cells are zero, as on the form.
//!
//! ```text
//! tax_code,old_fare,new_fare
//! YQ,10.00,15.00
//! XF,4.50,
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use fare_core::{FareForm, FareSide, RowCollectionError, RowIndex};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when importing tax rows.
#[derive(Debug, Error)]
pub enum TaxRowImportError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid tax row '{0}': expected [CODE=]OLD:NEW")]
    InvalidSpec(String),
}

impl From<csv::Error> for TaxRowImportError {
    fn from(err: csv::Error) -> Self {
        TaxRowImportError::CsvParse(err.to_string())
    }
}

/// One tax line as raw field text.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TaxRowRecord {
    #[serde(default)]
    pub tax_code: String,
    #[serde(default)]
    pub old_fare: String,
    #[serde(default)]
    pub new_fare: String,
}

impl FromStr for TaxRowRecord {
    type Err = TaxRowImportError;

    /// Parses `OLD:NEW` or `CODE=OLD:NEW`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tax_code, fares) = match s.split_once('=') {
            Some((code, fares)) => (code.trim(), fares),
            None => ("", s),
        };
        let (old_fare, new_fare) = fares
            .split_once(':')
            .ok_or_else(|| TaxRowImportError::InvalidSpec(s.to_string()))?;

        Ok(Self {
            tax_code: tax_code.to_string(),
            old_fare: old_fare.trim().to_string(),
            new_fare: new_fare.trim().to_string(),
        })
    }
}

/// Outcome of [`apply_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
}

/// Parses tax row records from a CSV reader.
pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxRowRecord>, TaxRowImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: TaxRowRecord = result?;
        records.push(record);
    }

    Ok(records)
}

/// Reads tax row records from a CSV file.
pub fn load_from_file(path: &Path) -> Result<Vec<TaxRowRecord>, TaxRowImportError> {
    let file = File::open(path).map_err(|source| TaxRowImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse(file)
}

/// Writes records into the form's tax rows.
///
/// The first record fills row 1 if it is still blank; every other record
/// gets a new row. Records past the row limit are counted as rejected.
pub fn apply_records(
    form: &mut FareForm,
    records: &[TaxRowRecord],
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let mut first_row_free = form
        .rows()
        .get(RowIndex::FIRST)
        .is_some_and(|row| form.rows().len() == 1 && is_blank(row));

    for record in records {
        let index = if first_row_free {
            first_row_free = false;
            RowIndex::FIRST
        } else {
            match form.add_tax_row() {
                Ok(index) => index,
                Err(RowCollectionError::MaxRowsExceeded(max)) => {
                    summary.rejected = records.len() - summary.imported;
                    warn!(max, rejected = summary.rejected, "tax rows past the limit were not imported");
                    break;
                }
                Err(e) => {
                    warn!("tax row not imported: {}", e);
                    summary.rejected += 1;
                    continue;
                }
            }
        };

        let filled = form
            .set_tax_code(index, &record.tax_code)
            .and_then(|()| form.set_tax_fare(index, FareSide::Old, &record.old_fare))
            .and_then(|()| form.set_tax_fare(index, FareSide::New, &record.new_fare));
        if let Err(e) = filled {
            warn!(%index, "tax row not filled: {}", e);
            summary.rejected += 1;
            continue;
        }
        summary.imported += 1;
    }

    summary
}

fn is_blank(row: &fare_core::TaxRow) -> bool {
    row.tax_code.is_empty() && row.old_fare.is_zero() && row.new_fare.is_zero()
}
