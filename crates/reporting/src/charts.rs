//! Chart Helpers

use crate::{ReportError, TabularSummary};
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::RangedCoordusize;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;

/// Slice colours for pie charts, cycled when there are more slices
pub const PIE_PALETTE: [RGBColor; 4] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x66, 0xb3, 0xff),
    RGBColor(0x99, 0xff, 0x99),
    RGBColor(0xff, 0xcc, 0x99),
];

const LABEL_GREY: RGBColor = RGBColor(0x80, 0x80, 0x80);
const TICK_FONT_SIZE: u32 = 8;
const FONT: &str = "sans-serif";

/// Axis labels, title and bar colour for bar charts
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    pub color: RGBColor,
}

impl ChartStyle {
    pub fn new(
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        title: impl Into<String>,
        color: RGBColor,
    ) -> Self {
        Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            title: title.into(),
            color,
        }
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

fn validate(summary: &TabularSummary) -> Result<(), ReportError> {
    if summary.is_empty() {
        return Err(ReportError::EmptySummary);
    }
    for (label, value) in &summary.rows {
        if !value.is_finite() || *value < 0.0 {
            return Err(ReportError::InvalidValue {
                label: label.clone(),
                value: *value,
            });
        }
    }
    Ok(())
}

/// Pie chart with grey slice labels and a percentage legend on the right.
///
/// Slices start at 12 o'clock and run counter-clockwise.
pub fn pie_chart<DB: DrawingBackend>(
    summary: &TabularSummary,
    title: &str,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), ReportError> {
    validate(summary)?;
    let total = summary.total();
    if total <= 0.0 {
        return Err(ReportError::EmptySummary);
    }

    let area = area.titled(title, (FONT, 16)).map_err(render_err)?;
    let (width, _) = area.dim_in_pixel();
    let (pie_area, legend_area) = area.split_horizontally((width as f64 * 0.7) as u32);

    let (pw, ph) = pie_area.dim_in_pixel();
    let center = (pw as f64 / 2.0, ph as f64 / 2.0);
    let radius = pw.min(ph) as f64 * 0.38;
    let label_style = (FONT, 12).into_font().color(&LABEL_GREY);

    let mut angle = PI / 2.0;
    for (idx, (label, value)) in summary.rows.iter().enumerate() {
        let sweep = 2.0 * PI * value / total;
        let color = PIE_PALETTE[idx % PIE_PALETTE.len()];

        let steps = ((sweep / (2.0 * PI)) * 90.0).ceil().max(2.0) as usize;
        let mut points = vec![(center.0 as i32, center.1 as i32)];
        for step in 0..=steps {
            let theta = angle + sweep * step as f64 / steps as f64;
            points.push(polar(center, radius, theta));
        }
        pie_area
            .draw(&Polygon::new(points, color.filled()))
            .map_err(render_err)?;

        let (lx, ly) = polar(center, radius * 1.05, angle + sweep / 2.0);
        pie_area
            .draw(&Text::new(label.clone(), (lx, ly), label_style.clone()))
            .map_err(render_err)?;

        angle += sweep;
    }

    let legend_style = (FONT, 11).into_font();
    let (_, lh) = legend_area.dim_in_pixel();
    let row_height = 18i32;
    let top = lh as i32 / 2 - row_height * summary.rows.len() as i32 / 2;
    for (idx, (label, value)) in summary.rows.iter().enumerate() {
        let y = top + row_height * idx as i32;
        let color = PIE_PALETTE[idx % PIE_PALETTE.len()];
        legend_area
            .draw(&Rectangle::new([(4, y), (14, y + 10)], color.filled()))
            .map_err(render_err)?;
        let text = format!("{} {:.1}%", label, value / total * 100.0);
        legend_area
            .draw(&Text::new(text, (20, y), legend_style.clone()))
            .map_err(render_err)?;
    }

    Ok(())
}

/// Discrete axis with one band per row. The integer range is inclusive, so
/// `rows` bands need `0..rows - 1`; a single row keeps a two-point range.
fn band_axis(rows: usize) -> SegmentedCoord<RangedCoordusize> {
    (0..rows.saturating_sub(1).max(1)).into_segmented()
}

/// Far edge of band `i` on an axis built by [`band_axis`]
fn band_end(i: usize, rows: usize) -> SegmentValue<usize> {
    if i + 1 < rows.max(2) {
        SegmentValue::Exact(i + 1)
    } else {
        SegmentValue::Last
    }
}

fn polar(center: (f64, f64), radius: f64, theta: f64) -> (i32, i32) {
    (
        (center.0 + radius * theta.cos()).round() as i32,
        (center.1 - radius * theta.sin()).round() as i32,
    )
}

/// Horizontal bar chart, rows sorted ascending by value, no legend
pub fn barh_chart<DB: DrawingBackend>(
    summary: &TabularSummary,
    style: &ChartStyle,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), ReportError> {
    validate(summary)?;
    let sorted = summary.sorted_ascending();
    let labels = sorted.labels();
    let values = sorted.values();
    let rows = values.len();
    let max = values.iter().cloned().fold(0.0f64, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(&style.title, (FONT, 14))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max, band_axis(labels.len()))
        .map_err(render_err)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .label_style((FONT, TICK_FONT_SIZE))
        .y_labels(labels.len())
        .y_label_formatter(&label_of)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &value)| {
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(i)), (value, band_end(i, rows))],
                style.color.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(render_err)?;

    Ok(())
}

/// Vertical bar chart in input order with horizontal tick labels, no legend
pub fn bar_chart<DB: DrawingBackend>(
    summary: &TabularSummary,
    style: &ChartStyle,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), ReportError> {
    validate(summary)?;
    let labels = summary.labels();
    let values = summary.values();
    let rows = values.len();
    let max = values.iter().cloned().fold(0.0f64, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(&style.title, (FONT, 14))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(band_axis(labels.len()), 0.0..max)
        .map_err(render_err)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .label_style((FONT, TICK_FONT_SIZE))
        .x_labels(labels.len())
        .x_label_formatter(&label_of)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &value)| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (band_end(i, rows), value)],
                style.color.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(render_err)?;

    Ok(())
}
