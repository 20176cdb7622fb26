//! # tidyframe
//!
//! Cleans tabular CSV data and charts a single column.
//!
//! ```no_run
//! use tidyframe::data::{self, CleaningOptions, CsvOptions};
//! use tidyframe::plot::{self, PlotRequest};
//!
//! # fn example() -> tidyframe::error::Result<()> {
//! let dataset = data::load_csv("sales.csv".as_ref(), &CsvOptions::default())?;
//! let (cleaned, report) = data::clean(&dataset, &CleaningOptions::all())?;
//! for line in report.lines() {
//!     println!("{line}");
//! }
//!
//! let result = plot::visualize(&cleaned, &PlotRequest::new("price"))?;
//! std::fs::write("price_distribution.png", &result.png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`data`]: the polars-backed [`data::Dataset`], CSV I/O and [`data::clean`]
//! - [`plot`]: chart selection, statistics and PNG rendering
//! - [`config`]: JSON configuration for plot defaults and CSV parsing
//! - [`error`]: the [`error::TidyError`] type shared by the library
//! - [`logging`]: console logger set-up for the front ends
//!
//! The library itself never prints or logs. Problems surface as errors or,
//! for presentation issues, as warnings on the plot result.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod plot;
