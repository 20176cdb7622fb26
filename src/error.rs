//! Error handling for the cleaning and plotting core.
//!
//! The core reports failures through [`TidyError`]. Only a handful of
//! conditions are real errors; everything else (missing cells, unparsable
//! values, unknown style names) degrades in-band so that an exploratory run
//! always produces a best-effort result.
//!
//! ```
//! use tidyframe::error::TidyError;
//!
//! fn describe(err: &TidyError) -> &'static str {
//!     match err {
//!         TidyError::InvalidInput(_) => "the CSV could not be used",
//!         TidyError::ColumnNotFound(_) => "no such column",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! The `ResultExt` trait adds `.context()` to any result whose error converts
//! into [`TidyError`]:
//!
//! ```no_run
//! use tidyframe::error::ResultExt as _;
//!
//! fn read_input(path: &str) -> tidyframe::error::Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read input")
//! }
//! ```

use std::fmt;

/// Main error type for tidyframe operations.
#[derive(Debug)]
pub enum TidyError {
    /// The dataset could not be parsed or has no columns.
    InvalidInput(String),

    /// A plot request named a column the dataset does not have.
    ColumnNotFound(String),

    /// Data processing errors raised by polars.
    DataProcessing(String),

    /// I/O errors while reading or writing files.
    Io(std::io::Error),

    /// The chart could not be drawn or encoded.
    Render(String),

    /// Configuration file errors.
    Config(String),

    /// Generic error with context.
    Other(String),
}

impl fmt::Display for TidyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::ColumnNotFound(name) => write!(f, "Column not found: '{name}'"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TidyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TidyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for TidyError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<serde_json::Error> for TidyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<image::ImageError> for TidyError {
    fn from(err: image::ImageError) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<TidyError> for String {
    fn from(err: TidyError) -> Self {
        err.to_string()
    }
}

/// Result type alias for tidyframe operations.
pub type Result<T> = std::result::Result<T, TidyError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TidyError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: TidyError = e.into();
            TidyError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: TidyError = e.into();
            TidyError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TidyError::ColumnNotFound("z".to_owned());
        assert_eq!(err.to_string(), "Column not found: 'z'");

        let err = TidyError::InvalidInput("dataset has no columns".to_owned());
        assert_eq!(err.to_string(), "Invalid input: dataset has no columns");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = TidyError::Render("empty buffer".to_owned());
        let s: String = err.into();
        assert_eq!(s, "Render error: empty buffer");
    }

    #[test]
    fn test_polars_errors_are_data_processing() {
        let err: TidyError = polars::error::PolarsError::ComputeError("bad cast".into()).into();
        assert!(matches!(err, TidyError::DataProcessing(ref msg) if msg.contains("bad cast")));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.csv",
        ));

        let result: Result<()> = result.context("Failed to read file");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read file")
        );
    }
}
