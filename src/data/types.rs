use super::parse::{format_number, format_timestamp, from_millis, is_midnight};
use crate::error::{Result, TidyError};
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const VALUE_COLUMN: &str = "value";
const COUNT_COLUMN: &str = "count";

/// What the present cells of a column hold. Each kind has exactly one
/// storage type inside a [`Dataset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    Categorical,
    Timestamp,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::Categorical(..) => Self::Categorical,
            d if d.is_primitive_numeric() => Self::Numeric,
            d if d.is_temporal() => Self::Timestamp,
            _ => Self::Text,
        }
    }

    /// The storage type a column of this kind is normalised to.
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Numeric => DataType::Float64,
            Self::Text => DataType::String,
            Self::Categorical => DataType::Categorical(None, Default::default()),
            Self::Timestamp => DataType::Datetime(TimeUnit::Milliseconds, None),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Text => "Text",
            Self::Categorical => "Categorical",
            Self::Timestamp => "Timestamp",
        }
    }
}

pub fn kind_of(column: &Column) -> ColumnKind {
    ColumnKind::of(column.dtype())
}

/// A polars frame whose columns are all `Float64`, `String`, `Categorical`
/// or millisecond `Datetime`.
#[derive(Clone, Debug)]
pub struct Dataset {
    df: DataFrame,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            df: DataFrame::empty(),
        }
    }
}

impl Dataset {
    /// Builds a dataset, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let df = DataFrame::new(columns).map_err(|e| TidyError::InvalidInput(e.to_string()))?;
        Self::from_frame(df)
    }

    /// Wraps a frame, casting every column to its kind's storage type.
    /// Booleans and other non-numeric, non-temporal columns become text.
    pub fn from_frame(df: DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            df: DataFrame::new(columns)?,
        })
    }

    /// For frames derived from an existing dataset by operations that keep
    /// the storage types.
    pub(crate) fn from_normalized(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn columns(&self) -> &[Column] {
        self.df.get_columns()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.df.column(name).ok()
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(kind_of)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name().as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            df: self.df.head(Some(n)),
        }
    }

    /// The last `n` rows.
    pub fn tail(&self, n: usize) -> Self {
        Self {
            df: self.df.tail(Some(n)),
        }
    }
}

/// Equal when names, kinds and cells match; missing equals missing.
impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.df.shape() == other.df.shape()
            && self.columns().iter().zip(other.columns()).all(|(a, b)| {
                a.name() == b.name()
                    && kind_of(a) == kind_of(b)
                    && comparable(a)
                        .zip(comparable(b))
                        .is_some_and(|(a, b)| a.equals_missing(&b))
            })
    }
}

fn comparable(column: &Column) -> Option<Series> {
    let series = column.as_materialized_series();
    match kind_of(column) {
        ColumnKind::Categorical => series.cast(&DataType::String).ok(),
        _ => Some(series.clone()),
    }
}

fn normalize(column: &Column) -> Result<Column> {
    let kind = kind_of(column);
    let unchanged = match (kind, column.dtype()) {
        (ColumnKind::Categorical, _) => true,
        (_, dtype) => *dtype == kind.dtype(),
    };
    if unchanged {
        return Ok(column.clone());
    }
    let series = column.as_materialized_series().cast(&kind.dtype())?;
    Ok(series.into_column())
}

/// Non-missing values of a numeric column in row order.
pub fn numbers(column: &Column) -> Result<Vec<f64>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().flatten().collect())
}

/// Timestamps of a timestamp column, missing cells as `None`.
pub fn timestamps(column: &Column) -> Result<Vec<Option<NaiveDateTime>>> {
    let millis = column.as_materialized_series().cast(&DataType::Int64)?;
    Ok(millis
        .i64()?
        .into_iter()
        .map(|ms| ms.and_then(from_millis))
        .collect())
}

/// Whether every present timestamp falls on midnight, so the column can be
/// shown as plain dates.
pub fn is_date_only(column: &Column) -> Result<bool> {
    Ok(timestamps(column)?.iter().flatten().all(is_midnight))
}

/// Display text of every cell, missing cells as `None`.
pub fn labels(column: &Column) -> Result<Vec<Option<String>>> {
    let series = column.as_materialized_series();
    let labels = match kind_of(column) {
        ColumnKind::Numeric => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(format_number))
            .collect(),
        ColumnKind::Timestamp => {
            let date_only = is_date_only(column)?;
            timestamps(column)?
                .into_iter()
                .map(|ts| ts.map(|ts| format_timestamp(&ts, date_only)))
                .collect()
        }
        ColumnKind::Text | ColumnKind::Categorical => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect(),
    };
    Ok(labels)
}

/// Counts of the present values, most frequent first. Ties keep the order
/// in which the values first appear in the column.
pub fn value_counts(column: &Column) -> Result<Vec<(String, usize)>> {
    let labels = Series::new(VALUE_COLUMN.into(), labels(column)?).drop_nulls();
    if labels.is_empty() {
        return Ok(Vec::new());
    }

    let counted = labels.value_counts(false, false, COUNT_COLUMN.into(), false)?;
    let values = counted.column(VALUE_COLUMN)?.as_materialized_series();
    let counts = counted
        .column(COUNT_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let by_value: HashMap<&str, usize> = values
        .str()?
        .into_iter()
        .zip(counts.u64()?)
        .filter_map(|(value, count)| Some((value?, usize::try_from(count?).ok()?)))
        .collect();

    let first_seen = labels.unique_stable()?;
    let mut ordered: Vec<(String, usize)> = first_seen
        .str()?
        .into_iter()
        .flatten()
        .filter_map(|value| by_value.get(value).map(|&n| (value.to_owned(), n)))
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(ordered)
}
