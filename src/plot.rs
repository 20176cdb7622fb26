//! Single-column charts with summary statistics.
//!
//! [`visualize`] looks at one column, decides once what shape of data it
//! holds ([`ColumnShape`]), and renders the matching chart as PNG bytes:
//!
//! - numeric columns become a histogram,
//! - low-cardinality columns a bar chart of value counts,
//! - high-cardinality ("identifier") columns a bar chart of the most frequent
//!   values plus an `"Other"` bucket.
//!
//! Presentation problems (unknown style, odd figure size) never fail the call;
//! they are reported in [`PlotResult::warnings`].

pub(crate) mod render;
pub mod stats;
pub mod style;

pub use stats::{CategoricalSummary, ColumnStats, NumericSummary};
pub use style::PlotStyle;

use crate::data::{self, ColumnKind, Dataset};
use crate::error::{Result, TidyError};
use polars::prelude::Column;
use render::{ChartData, Frame};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use stats::MAX_BINS;

pub const DEFAULT_FIGSIZE: (f32, f32) = (10.0, 6.0);
const MIN_INCHES: f32 = 1.0;
const MAX_INCHES: f32 = 40.0;
const MAX_HEIGHT_RATIO: f32 = 1.5;
/// Largest bitmap drawn, in pixels (width times height).
pub const MAX_PIXELS: u64 = 16_000_000;

/// Defaults and thresholds for [`visualize_with`]. Loaded from the
/// configuration file; [`PlotSettings::default`] matches the CLI defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub style: PlotStyle,
    /// Width and height in inches.
    pub figsize: (f32, f32),
    pub bins: usize,
    /// A categorical column with more distinct values than this is treated
    /// as an identifier.
    pub max_categories: usize,
    /// Bars shown for an identifier column before the "Other" bucket.
    pub top_n: usize,
    pub dpi: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            style: PlotStyle::default(),
            figsize: DEFAULT_FIGSIZE,
            bins: 20,
            max_categories: 50,
            top_n: 10,
            dpi: 100,
        }
    }
}

impl PlotSettings {
    /// A request for `column` using these defaults.
    pub fn request(&self, column: impl Into<String>) -> PlotRequest {
        PlotRequest {
            column: column.into(),
            style: self.style.as_str().to_owned(),
            figsize: self.figsize,
            bins: None,
            title: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub column: String,
    /// Style name; unknown names fall back to the default style.
    pub style: String,
    pub figsize: (f32, f32),
    pub bins: Option<usize>,
    pub title: Option<String>,
}

impl PlotRequest {
    pub fn new(column: impl Into<String>) -> Self {
        PlotSettings::default().request(column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Histogram,
    Bar,
    /// Bar chart of the most frequent values plus an "Other" bucket.
    TopN,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Histogram => "histogram",
            Self::Bar => "bar chart",
            Self::TopN => "top-N bar chart",
        })
    }
}

/// What a column holds, as far as charting is concerned.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnShape {
    /// Non-missing values in row order.
    Numeric(Vec<f64>),
    /// Value counts, most frequent first.
    Categorical(Vec<(String, usize)>),
    /// Value counts of a high-cardinality column, most frequent first.
    Identifier(Vec<(String, usize)>),
}

impl ColumnShape {
    pub fn of(column: &Column, settings: &PlotSettings) -> Result<Self> {
        if data::kind_of(column) == ColumnKind::Numeric {
            return Ok(Self::Numeric(data::numbers(column)?));
        }

        let counts = data::value_counts(column)?;
        let present = column.len() - column.null_count();
        let distinct = counts.len();

        let mostly_unique = present >= 10 && distinct as f64 >= present as f64 * 0.9;
        Ok(if distinct > settings.max_categories || mostly_unique {
            Self::Identifier(counts)
        } else {
            Self::Categorical(counts)
        })
    }
}

/// A rendered chart and what was learned about the column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotResult {
    #[serde(skip)]
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub chart: ChartKind,
    pub title: String,
    pub style: PlotStyle,
    pub stats: ColumnStats,
    pub warnings: Vec<String>,
}

/// [`visualize_with`] using [`PlotSettings::default`].
pub fn visualize(dataset: &Dataset, request: &PlotRequest) -> Result<PlotResult> {
    visualize_with(dataset, request, &PlotSettings::default())
}

/// Renders a chart of `request.column`.
///
/// # Errors
///
/// [`TidyError::ColumnNotFound`] when the column does not exist and
/// [`TidyError::Render`] when drawing or PNG encoding fails.
pub fn visualize_with(
    dataset: &Dataset,
    request: &PlotRequest,
    settings: &PlotSettings,
) -> Result<PlotResult> {
    let column = dataset
        .column(&request.column)
        .ok_or_else(|| TidyError::ColumnNotFound(request.column.clone()))?;

    let mut warnings = Vec::new();
    let (style, style_warning) = PlotStyle::resolve(&request.style);
    warnings.extend(style_warning);
    let (width, height) = figure_pixels(request.figsize, settings.dpi, &mut warnings);

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("{} distribution", column.name()), str::to_owned);

    let mut frame = Frame {
        title: &title,
        x_desc: column.name().as_str(),
        y_desc: "Count",
        theme: style.theme(),
        size: (width, height),
    };

    let (chart, stats, png) = match ColumnShape::of(column, settings)? {
        ColumnShape::Numeric(values) => {
            let bins = histogram_bins(request.bins.unwrap_or(settings.bins), &mut warnings);
            let hist = stats::Histogram::new(&values, bins);
            let summary = stats::summarize_numeric(column)?;
            let density = stats::kde_curve(&values, summary.std_dev, &hist);
            frame.y_desc = "Frequency";
            let chart = ChartData::Histogram {
                bins: &hist,
                density: &density,
            };
            let png = render::render_png(&chart, &frame)?;
            (ChartKind::Histogram, ColumnStats::Numeric(summary), png)
        }
        ColumnShape::Categorical(counts) => {
            let png = render::render_png(&ChartData::Bars(&counts), &frame)?;
            let summary = stats::summarize_categorical(&counts);
            (ChartKind::Bar, ColumnStats::Categorical(summary), png)
        }
        ColumnShape::Identifier(counts) => {
            let bars = stats::top_n_with_other(&counts, settings.top_n);
            let png = render::render_png(&ChartData::Bars(&bars), &frame)?;
            let summary = stats::summarize_categorical(&counts);
            (ChartKind::TopN, ColumnStats::Categorical(summary), png)
        }
    };

    Ok(PlotResult {
        png,
        width,
        height,
        chart,
        title,
        style,
        stats,
        warnings,
    })
}

/// Clamps a bin count to `[1, MAX_BINS]`.
fn histogram_bins(bins: usize, warnings: &mut Vec<String>) -> usize {
    let clamped = bins.clamp(1, MAX_BINS);
    if clamped != bins {
        warnings.push(format!("Bin count {bins} out of range, using {clamped}"));
    }
    clamped
}

/// Converts a figure size in inches to pixels. Non-positive or non-finite
/// sizes fall back to [`DEFAULT_FIGSIZE`]; each side is clamped to
/// `[1, 40]` inches and the height to at most 1.5x the width. Bitmaps over
/// [`MAX_PIXELS`] are scaled down, keeping the aspect ratio.
fn figure_pixels(figsize: (f32, f32), dpi: u32, warnings: &mut Vec<String>) -> (u32, u32) {
    let (mut width, mut height) = figsize;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        warnings.push(format!(
            "Invalid figure size {width}x{height}, using {}x{}",
            DEFAULT_FIGSIZE.0, DEFAULT_FIGSIZE.1
        ));
        (width, height) = DEFAULT_FIGSIZE;
    }

    let width = width.clamp(MIN_INCHES, MAX_INCHES);
    let mut height = height.clamp(MIN_INCHES, MAX_INCHES);
    let max_height = width * MAX_HEIGHT_RATIO;
    if height > max_height {
        warnings.push(format!(
            "Figure height {height} capped at {max_height} (1.5x width)"
        ));
        height = max_height;
    }

    let dpi = dpi.clamp(10, 600) as f32;
    let (mut px_width, mut px_height) = ((width * dpi).round(), (height * dpi).round());
    let area = f64::from(px_width) * f64::from(px_height);
    if area > MAX_PIXELS as f64 {
        let scale = (MAX_PIXELS as f64 / area).sqrt() as f32;
        let (w, h) = ((px_width * scale).floor(), (px_height * scale).floor());
        warnings.push(format!(
            "Figure of {px_width}x{px_height} pixels exceeds {MAX_PIXELS}, drawing at {w}x{h}"
        ));
        (px_width, px_height) = (w, h);
    }
    (px_width as u32, px_height as u32)
}
