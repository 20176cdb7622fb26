//! Tabular data model, CSV I/O and cleaning, built on polars.
//!
//! A [`Dataset`] wraps a polars `DataFrame` whose columns each hold one
//! [`ColumnKind`]: numbers (`Float64`), text (`String`), categories
//! (`Categorical`) or timestamps (millisecond `Datetime`). Missing cells are
//! polars nulls.

pub mod cleaning;
pub mod io;
pub mod parse;
pub mod types;

pub use cleaning::{CleaningAction, CleaningOptions, CleaningReport, FillStrategy, clean};
pub use io::{CsvOptions, load_csv, save_csv, write_csv};
pub use types::{ColumnKind, Dataset, kind_of, labels, numbers, value_counts};

#[cfg(test)]
mod tests;
