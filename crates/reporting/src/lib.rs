//! Reporting Helpers
//!
//! Stateless chart helpers (pie, horizontal bar, vertical bar) drawn from a
//! label/value summary onto any plotters drawing area.

mod charts;
mod render;
mod summary;

pub use charts::{bar_chart, barh_chart, pie_chart, ChartStyle, PIE_PALETTE};
pub use render::{render_svg, render_svg_to_string};
pub use summary::TabularSummary;

use thiserror::Error;

/// Errors while building or rendering a chart
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Summary has no rows to plot")]
    EmptySummary,
    #[error("Invalid value {value} for {label}: values must be finite and non-negative")]
    InvalidValue { label: String, value: f64 },
    #[error("Rendering failed: {0}")]
    Render(String),
}
