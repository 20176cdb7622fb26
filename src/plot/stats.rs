//! Summary statistics and binning for a single column.

use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Non-missing values the statistics were computed over.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub distinct: usize,
    pub top: Option<(String, usize)>,
    /// Value counts by descending frequency, ties in first-seen order.
    pub value_counts: Vec<(String, usize)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ColumnStats {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnStats {
    /// Label/value pairs for display. Absent statistics render as "—".
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Numeric(s) => vec![
                ("Count", s.count.to_string()),
                ("Mean", fmt_opt(s.mean)),
                ("Median", fmt_opt(s.median)),
                ("Std Dev", fmt_opt(s.std_dev)),
                ("Min", fmt_opt(s.min)),
                ("Max", fmt_opt(s.max)),
            ],
            Self::Categorical(s) => vec![
                ("Count", s.count.to_string()),
                ("Distinct", s.distinct.to_string()),
                (
                    "Top",
                    s.top
                        .as_ref()
                        .map_or_else(|| "—".to_owned(), |(v, n)| format!("{v} ({n})")),
                ),
            ],
        }
    }
}

/// Formats an optional f64 to 2 decimal places, or returns "—" if None or non-finite.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.2}"),
        _ => "—".to_owned(),
    }
}

/// Summary of the non-missing values of a numeric column.
pub fn summarize_numeric(column: &Column) -> Result<NumericSummary> {
    let values = column
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .drop_nulls();
    let ca = values.f64()?;
    let count = ca.len();
    if count == 0 {
        return Ok(NumericSummary::default());
    }

    Ok(NumericSummary {
        count,
        mean: ca.mean(),
        median: ca.median(),
        std_dev: if count > 1 { ca.std(1) } else { None },
        min: ca.min(),
        max: ca.max(),
    })
}

pub fn summarize_categorical(value_counts: &[(String, usize)]) -> CategoricalSummary {
    CategoricalSummary {
        count: value_counts.iter().map(|(_, n)| n).sum(),
        distinct: value_counts.len(),
        top: value_counts.first().cloned(),
        value_counts: value_counts.to_vec(),
    }
}

/// Keeps the `top_n` most frequent values and folds the rest into one
/// `"Other"` bucket when anything remains.
pub fn top_n_with_other(value_counts: &[(String, usize)], top_n: usize) -> Vec<(String, usize)> {
    let top_n = top_n.max(1);
    let mut bars: Vec<(String, usize)> = value_counts.iter().take(top_n).cloned().collect();
    let rest: usize = value_counts.iter().skip(top_n).map(|(_, n)| n).sum();
    if rest > 0 {
        bars.push((OTHER_LABEL.to_owned(), rest));
    }
    bars
}

pub const OTHER_LABEL: &str = "Other";

/// Upper bound on histogram bins.
pub const MAX_BINS: usize = 1000;

/// Samples along the density curve.
const KDE_POINTS: usize = 200;

/// Equal-width bins over the value range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width intervals, `bins` clamped to
    /// `[1, MAX_BINS]`. The last interval is closed on the right. A constant
    /// column is spread over `value ± 0.5`; an empty one over `[0, 1]`.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.clamp(1, MAX_BINS);
        let (lo, hi) = match (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) {
            (Some(lo), Some(hi)) if hi > lo => (lo, hi),
            (Some(v), Some(_)) => (v - 0.5, v + 0.5),
            _ => (0.0, 1.0),
        };

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);
        let mut counts = vec![0; bins];
        for v in values {
            let i = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[i] += 1;
        }
        Self { edges, counts }
    }

    /// `(left, right, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn range(&self) -> (f64, f64) {
        (
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(1.0),
        )
    }

    pub fn bin_width(&self) -> f64 {
        let (lo, hi) = self.range();
        (hi - lo) / self.counts.len().max(1) as f64
    }
}

/// Gaussian kernel density estimate sampled across the histogram range and
/// scaled to bar heights (`n * bin_width` times the density). Bandwidth
/// follows Scott's rule, `std_dev * n^(-1/5)`.
///
/// Empty for fewer than two values or no spread.
pub fn kde_curve(values: &[f64], std_dev: Option<f64>, histogram: &Histogram) -> Vec<(f64, f64)> {
    let n = values.len();
    let Some(std_dev) = std_dev.filter(|s| s.is_finite() && *s > 0.0) else {
        return Vec::new();
    };
    if n < 2 {
        return Vec::new();
    }

    let n = n as f64;
    let bandwidth = std_dev * n.powf(-0.2);
    let norm = histogram.bin_width() / (bandwidth * (2.0 * PI).sqrt());
    let (lo, hi) = histogram.range();
    let step = (hi - lo) / (KDE_POINTS - 1) as f64;

    (0..KDE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Column {
        Series::new("x".into(), values).into()
    }

    fn counts(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
        pairs.iter().map(|(v, n)| ((*v).to_owned(), *n)).collect()
    }

    #[test]
    fn test_summarize_one_to_five() {
        let s = summarize_numeric(&column(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, Some(3.0));
        assert_eq!(s.median, Some(3.0));
        let std = s.std_dev.unwrap();
        assert!((std - 2.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(5.0));
    }

    #[test]
    fn test_summarize_even_count_median() {
        let s = summarize_numeric(&column(&[4.0, 1.0, 3.0, 2.0])).unwrap();
        assert_eq!(s.median, Some(2.5));
    }

    #[test]
    fn test_summarize_empty_and_single() {
        assert_eq!(summarize_numeric(&column(&[])).unwrap(), NumericSummary::default());

        let single = summarize_numeric(&column(&[7.0])).unwrap();
        assert_eq!(single.mean, Some(7.0));
        assert_eq!(single.std_dev, None);
    }

    #[test]
    fn test_summarize_skips_missing() {
        let col: Column = Series::new("x".into(), [Some(2.0), None, Some(4.0)]).into();
        let s = summarize_numeric(&col).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.mean, Some(3.0));
    }

    #[test]
    fn test_summarize_categorical() {
        let s = summarize_categorical(&counts(&[("b", 2), ("a", 2), ("c", 1)]));
        assert_eq!(s.count, 5);
        assert_eq!(s.distinct, 3);
        assert_eq!(s.top, Some(("b".to_owned(), 2)));
    }

    #[test]
    fn test_top_n_with_other() {
        let counts = counts(&[("a", 2), ("b", 1), ("c", 1), ("d", 1)]);
        let bars = top_n_with_other(&counts, 2);
        assert_eq!(
            bars,
            vec![
                ("a".to_owned(), 2),
                ("b".to_owned(), 1),
                (OTHER_LABEL.to_owned(), 2),
            ]
        );

        assert_eq!(top_n_with_other(&counts, 10).len(), 4);
    }

    #[test]
    fn test_histogram_bins() {
        let h = Histogram::new(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(h.counts, vec![1, 1, 1, 1, 1]);
        assert_eq!(h.range(), (1.0, 5.0));
        assert_eq!(h.bins().count(), 5);

        let two = Histogram::new(&[0.0, 0.1, 0.9, 1.0], 2);
        assert_eq!(two.counts, vec![2, 2]);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        let constant = Histogram::new(&[3.0, 3.0], 4);
        assert_eq!(constant.range(), (2.5, 3.5));
        assert_eq!(constant.counts.iter().sum::<usize>(), 2);

        let empty = Histogram::new(&[], 0);
        assert_eq!(empty.counts, vec![0]);
        assert_eq!(empty.max_count(), 0);
    }

    #[test]
    fn test_histogram_bins_are_capped() {
        let h = Histogram::new(&[1.0, 2.0], usize::MAX);
        assert_eq!(h.counts.len(), MAX_BINS);
        assert_eq!(h.edges.len(), MAX_BINS + 1);
    }

    #[test]
    fn test_kde_area_matches_bars() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let s = summarize_numeric(&column(&values)).unwrap();
        let h = Histogram::new(&values, 10);
        let curve = kde_curve(&values, s.std_dev, &h);
        assert_eq!(curve.len(), KDE_POINTS);

        // Trapezoid area under the curve against total bar area. Kernel mass
        // past the range edges is lost.
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        let bars = values.len() as f64 * h.bin_width();
        assert!(area > bars * 0.8 && area <= bars, "{area} vs {bars}");
    }

    #[test]
    fn test_kde_needs_spread() {
        let h = Histogram::new(&[3.0, 3.0], 4);
        assert!(kde_curve(&[3.0, 3.0], Some(0.0), &h).is_empty());
        assert!(kde_curve(&[3.0], None, &h).is_empty());
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456)), "1.23");
        assert_eq!(fmt_opt(None), "—");
        assert_eq!(fmt_opt(Some(f64::NAN)), "—");
    }
}
