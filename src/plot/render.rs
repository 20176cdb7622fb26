//! Draws a chart into an in-memory bitmap and encodes it as PNG.
//!
//! Text goes through plotters' `ab_glyph` backend using a font embedded in
//! the binary, registered once under the family every style asks for.

use super::stats::Histogram as Binned;
use super::style::Theme;
use crate::error::{Result, TidyError};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
const MAX_LABEL_CHARS: usize = 16;
/// Count labels are skipped when there are more bars than this.
const MAX_COUNT_LABELS: usize = 60;

pub(crate) enum ChartData<'a> {
    Histogram {
        bins: &'a Binned,
        /// Density curve in bar-height units; empty when not drawn.
        density: &'a [(f64, f64)],
    },
    Bars(&'a [(String, usize)]),
}

/// Everything around the data: title, axis descriptions, colours and pixel size.
pub(crate) struct Frame<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub theme: Theme,
    pub size: (u32, u32),
}

/// Registers the embedded font with plotters. Safe to call repeatedly.
pub(crate) fn ensure_fonts() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        register_font(
            FONT_FAMILY,
            FontStyle::Normal,
            epaint_default_fonts::UBUNTU_LIGHT,
        )
        .is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(TidyError::Render(
            "embedded chart font could not be loaded".to_owned(),
        ))
    }
}

pub(crate) fn render_png(chart: &ChartData<'_>, frame: &Frame<'_>) -> Result<Vec<u8>> {
    ensure_fonts()?;
    let (width, height) = frame.size;
    let mut buffer = vec![0_u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&frame.theme.background).map_err(render_error)?;
        match chart {
            ChartData::Histogram { bins, density } => {
                draw_histogram(&root, bins, density, frame)?;
            }
            ChartData::Bars(bars) => draw_bars(&root, bars, frame)?,
        }
        root.present().map_err(render_error)?;
    }
    encode_png(buffer, width, height)
}

fn draw_histogram(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    hist: &Binned,
    density: &[(f64, f64)],
    frame: &Frame<'_>,
) -> Result<()> {
    let theme = frame.theme;
    let (lo, hi) = hist.range();
    let curve_max = density.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let y_max = y_limit(hist.max_count()).max(curve_max * 1.1);

    let mut chart = ChartBuilder::on(root)
        .caption(frame.title, caption_style(&theme))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0_f64..y_max)
        .map_err(render_error)?;
    chart
        .plotting_area()
        .fill(&theme.panel)
        .map_err(render_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(frame.x_desc)
        .y_desc(frame.y_desc)
        .axis_style(theme.axis.stroke_width(1))
        .label_style(label_style(&theme));
    match theme.grid {
        Some(grid) => {
            mesh.bold_line_style(grid.stroke_width(1))
                .light_line_style(theme.panel.stroke_width(1));
        }
        None => {
            mesh.disable_mesh();
        }
    }
    mesh.draw().map_err(render_error)?;

    chart
        .draw_series(hist.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], theme.bar.filled())
        }))
        .map_err(render_error)?;
    chart
        .draw_series(hist.bins().filter(|&(_, _, count)| count > 0).map(
            |(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], theme.edge.stroke_width(1))
            },
        ))
        .map_err(render_error)?;

    if hist.counts.len() <= MAX_COUNT_LABELS {
        chart
            .draw_series(hist.bins().filter(|&(_, _, count)| count > 0).map(
                |(left, right, count)| {
                    Text::new(
                        count.to_string(),
                        ((left + right) / 2.0, count as f64),
                        count_style(&theme),
                    )
                },
            ))
            .map_err(render_error)?;
    }

    if !density.is_empty() {
        chart
            .draw_series(LineSeries::new(
                density.iter().copied(),
                theme.line.stroke_width(2),
            ))
            .map_err(render_error)?;
    }

    Ok(())
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    bars: &[(String, usize)],
    frame: &Frame<'_>,
) -> Result<()> {
    let theme = frame.theme;
    let slots = bars.len().max(1);
    let y_max = y_limit(bars.iter().map(|(_, n)| *n).max().unwrap_or(0));

    let mut chart = ChartBuilder::on(root)
        .caption(frame.title, caption_style(&theme))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0..slots as i32).into_segmented(), 0_f64..y_max)
        .map_err(render_error)?;
    chart
        .plotting_area()
        .fill(&theme.panel)
        .map_err(render_error)?;

    let x_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| bars.get(i))
            .map(|(label, _)| shorten(label))
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(frame.x_desc)
        .y_desc(frame.y_desc)
        .x_labels(slots)
        .x_label_formatter(&x_label)
        .axis_style(theme.axis.stroke_width(1))
        .label_style(label_style(&theme))
        .disable_x_mesh();
    match theme.grid {
        Some(grid) => {
            mesh.bold_line_style(grid.stroke_width(1))
                .light_line_style(theme.panel.stroke_width(1));
        }
        None => {
            mesh.disable_mesh();
        }
    }
    mesh.draw().map_err(render_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(theme.bar.filled())
                .margin(6)
                .data(
                    bars.iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i as i32, *count as f64)),
                ),
        )
        .map_err(render_error)?;

    if bars.len() <= MAX_COUNT_LABELS {
        chart
            .draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
                Text::new(
                    count.to_string(),
                    (SegmentValue::CenterOf(i as i32), *count as f64),
                    count_style(&theme),
                )
            }))
            .map_err(render_error)?;
    }

    Ok(())
}

fn y_limit(max_count: usize) -> f64 {
    max_count.max(1) as f64 * 1.1
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_owned()
    } else {
        let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        short.push('…');
        short
    }
}

fn caption_style(theme: &Theme) -> TextStyle<'static> {
    (FONT_FAMILY, 22).into_font().color(&theme.text)
}

fn label_style(theme: &Theme) -> TextStyle<'static> {
    (FONT_FAMILY, 13).into_font().color(&theme.text)
}

/// Centred on the bar, sitting on its top edge.
fn count_style(theme: &Theme) -> TextStyle<'static> {
    (FONT_FAMILY, 11)
        .into_font()
        .color(&theme.text)
        .pos(Pos::new(HPos::Center, VPos::Bottom))
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        TidyError::Render("pixel buffer does not match the figure size".to_owned())
    })?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(png.into_inner())
}

fn render_error(err: impl std::fmt::Display) -> TidyError {
    TidyError::Render(err.to_string())
}
