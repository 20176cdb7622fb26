use super::parse::{DEFAULT_NULL_TOKENS, TIMESTAMP_FORMAT};
use super::types::{ColumnKind, Dataset, is_date_only, kind_of};
use crate::error::{Result, ResultExt as _, TidyError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// How raw CSV text is turned into columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Raw cell contents that load as missing.
    pub null_tokens: Vec<String>,
    /// Rows sampled when inferring column types.
    pub infer_schema_length: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| (*s).to_owned()).collect(),
            infer_schema_length: 10_000,
        }
    }
}

/// Reads a comma-delimited CSV with a header row.
///
/// Columns polars infers as numbers load as numeric (`Float64`); everything
/// else loads as text. Repeated header names are made unique by polars.
///
/// # Errors
///
/// An I/O error when the file cannot be opened, [`TidyError::InvalidInput`]
/// when its content is not a usable CSV (empty, not UTF-8, malformed).
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Dataset> {
    std::fs::metadata(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let null_values = NullValues::AllColumns(
        options
            .null_tokens
            .iter()
            .map(|t| t.as_str().into())
            .collect(),
    );
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length.max(1)))
        .with_null_values(Some(null_values))
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|e| TidyError::InvalidInput(format!("{}: {e}", path.display())))?;

    if df.width() == 0 {
        return Err(TidyError::InvalidInput(format!(
            "{} has no header row",
            path.display()
        )));
    }
    Dataset::from_frame(df)
}

pub fn save_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(dataset, file)
}

/// Writes the dataset with a header row, in column order. Missing cells are
/// written as empty fields; timestamp columns holding only midnights are
/// written as plain dates.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut df = output_frame(dataset)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_datetime_format(Some(TIMESTAMP_FORMAT.to_owned()))
        .finish(&mut df)?;
    Ok(())
}

fn output_frame(dataset: &Dataset) -> Result<DataFrame> {
    let columns = dataset
        .columns()
        .iter()
        .map(|column| -> Result<Column> {
            if kind_of(column) == ColumnKind::Timestamp && is_date_only(column)? {
                let dates = column.as_materialized_series().cast(&DataType::Date)?;
                Ok(dates.into_column())
            } else {
                Ok(column.clone())
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}
