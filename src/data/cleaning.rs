//! Dataset cleaning: type coercion, missing-value imputation and duplicate
//! row removal.
//!
//! [`clean`] never mutates its input and never changes the set or order of
//! columns. Steps always run as coerce, fill, dedup; with that order a second
//! pass with the same options changes nothing.
//!
//! Every change produces one [`CleaningAction`]. A step that is switched off
//! or finds nothing to do leaves no trace in the report.

use super::parse::{parse_timestamp, to_millis};
use super::types::{ColumnKind, Dataset, kind_of, value_counts};
use crate::error::{Result, TidyError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A text column becomes categorical when it has fewer distinct values than
/// this, and fewer than half the row count.
pub const CATEGORICAL_MAX_DISTINCT: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Impute missing cells (mean, mode, or forward/back fill for timestamps).
    pub fill_missing: bool,
    /// Remove rows that exactly repeat an earlier row.
    pub drop_duplicates: bool,
    /// Reinterpret text columns as numbers, timestamps or categories.
    pub coerce_types: bool,
}

impl CleaningOptions {
    pub fn all() -> Self {
        Self {
            fill_missing: true,
            drop_duplicates: true,
            coerce_types: true,
        }
    }

    pub fn is_noop(&self) -> bool {
        !(self.fill_missing || self.drop_duplicates || self.coerce_types)
    }
}

/// The value used to fill a column's missing cells.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FillStrategy {
    Mean(f64),
    Mode(String),
    ForwardBackward,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean(v) => write!(f, "mean {v}"),
            Self::Mode(s) => write!(f, "most frequent value '{s}'"),
            Self::ForwardBackward => f.write_str("neighbouring timestamps"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CleaningAction {
    Coerced {
        column: String,
        from: ColumnKind,
        to: ColumnKind,
    },
    FilledMissing {
        column: String,
        count: usize,
        strategy: FillStrategy,
    },
    DroppedDuplicates {
        removed: usize,
        remaining: usize,
    },
}

impl fmt::Display for CleaningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coerced { column, from, to } => {
                write!(f, "Converted column '{column}' from {from} to {to}")
            }
            Self::FilledMissing {
                column,
                count,
                strategy,
            } => write!(
                f,
                "Filled {count} missing value(s) in column '{column}' with {strategy}"
            ),
            Self::DroppedDuplicates { removed, remaining } => write!(
                f,
                "Removed {removed} duplicate row(s), {remaining} row(s) remain"
            ),
        }
    }
}

/// Ordered log of the changes a [`clean`] call made.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    actions: Vec<CleaningAction>,
}

impl CleaningReport {
    pub fn actions(&self) -> &[CleaningAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// One human-readable line per action.
    pub fn lines(&self) -> Vec<String> {
        self.actions.iter().map(ToString::to_string).collect()
    }

    fn push(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }
}

/// Cleans a copy of `dataset` according to `options`.
///
/// # Errors
///
/// Returns [`TidyError::InvalidInput`] when the dataset has no columns. Every
/// other anomaly (all-missing columns, unparsable cells, zero rows) degrades
/// to a no-op for the affected column.
pub fn clean(dataset: &Dataset, options: &CleaningOptions) -> Result<(Dataset, CleaningReport)> {
    if dataset.column_count() == 0 {
        return Err(TidyError::InvalidInput(
            "dataset has no columns".to_owned(),
        ));
    }

    let mut df = dataset.frame().clone();
    let mut report = CleaningReport::default();
    let names: Vec<String> = dataset.column_names().into_iter().map(str::to_owned).collect();

    if options.coerce_types {
        let rows = df.height();
        for name in &names {
            if let Some((series, action)) = coerce_column(df.column(name)?, rows)? {
                df.with_column(series)?;
                report.push(action);
            }
        }
    }

    if options.fill_missing {
        for name in &names {
            if let Some((series, action)) = fill_column(df.column(name)?)? {
                df.with_column(series)?;
                report.push(action);
            }
        }
    }

    if options.drop_duplicates {
        let before = df.height();
        df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();
        if removed > 0 {
            report.push(CleaningAction::DroppedDuplicates {
                removed,
                remaining: df.height(),
            });
        }
    }

    Ok((Dataset::from_normalized(df), report))
}

/// Imputes the missing cells of one column.
///
/// Returns the filled column, or `None` when there was nothing to fill or no
/// value to fill with.
pub fn fill_column(column: &Column) -> Result<Option<(Series, CleaningAction)>> {
    let missing = column.null_count();
    if missing == 0 || missing == column.len() {
        return Ok(None);
    }

    let series = column.as_materialized_series();
    let (filled, strategy) = match kind_of(column) {
        ColumnKind::Numeric => {
            let Some(mean) = series.mean() else {
                return Ok(None);
            };
            (series.fill_null(FillNullStrategy::Mean)?, FillStrategy::Mean(mean))
        }
        kind @ (ColumnKind::Text | ColumnKind::Categorical) => {
            let Some((mode, _)) = value_counts(column)?.into_iter().next() else {
                return Ok(None);
            };
            (fill_with_label(series, &mode, kind)?, FillStrategy::Mode(mode))
        }
        ColumnKind::Timestamp => {
            let filled = series
                .fill_null(FillNullStrategy::Forward(None))?
                .fill_null(FillNullStrategy::Backward(None))?;
            (filled, FillStrategy::ForwardBackward)
        }
    };

    Ok(Some((
        filled,
        CleaningAction::FilledMissing {
            column: column.name().to_string(),
            count: missing,
            strategy,
        },
    )))
}

fn fill_with_label(series: &Series, label: &str, kind: ColumnKind) -> Result<Series> {
    let name = series.name().clone();
    let text = series.cast(&DataType::String)?;
    let filled = DataFrame::new(vec![text.into_column()])?
        .lazy()
        .select([col(name.clone()).fill_null(lit(label))])
        .collect()?;
    Ok(filled
        .column(name.as_str())?
        .as_materialized_series()
        .cast(&kind.dtype())?)
}

/// Attempts to narrow a text column, trying numbers, then timestamps, then
/// low-cardinality categories.
///
/// A target is only adopted when every present value supports it and at
/// least one value is present. Missing cells stay missing.
pub fn coerce_column(column: &Column, rows: usize) -> Result<Option<(Series, CleaningAction)>> {
    if kind_of(column) != ColumnKind::Text || column.null_count() == column.len() {
        return Ok(None);
    }

    let series = column.as_materialized_series();
    let coerced = if let Some(numbers) = to_numbers(series) {
        numbers
    } else if let Some(timestamps) = to_timestamps(series)? {
        timestamps
    } else {
        let distinct = series.drop_nulls().n_unique()?;
        if distinct >= CATEGORICAL_MAX_DISTINCT || distinct as f64 >= rows as f64 * 0.5 {
            return Ok(None);
        }
        series.cast(&ColumnKind::Categorical.dtype())?
    };

    let action = CleaningAction::Coerced {
        column: column.name().to_string(),
        from: ColumnKind::Text,
        to: ColumnKind::of(coerced.dtype()),
    };
    Ok(Some((coerced, action)))
}

/// Strict cast to `Float64`; any unparsable or non-finite value rejects the
/// whole column.
fn to_numbers(series: &Series) -> Option<Series> {
    let numbers = series.strict_cast(&DataType::Float64).ok()?;
    let finite = numbers.f64().ok()?.into_iter().flatten().all(f64::is_finite);
    finite.then_some(numbers)
}

fn to_timestamps(series: &Series) -> Result<Option<Series>> {
    let millis: Option<Vec<Option<i64>>> = series
        .str()?
        .into_iter()
        .map(|value| match value {
            None => Some(None),
            Some(raw) => parse_timestamp(raw).map(|ts| Some(to_millis(&ts))),
        })
        .collect();
    let Some(millis) = millis else {
        return Ok(None);
    };
    let timestamps =
        Series::new(series.name().clone(), millis).cast(&ColumnKind::Timestamp.dtype())?;
    Ok(Some(timestamps))
}
