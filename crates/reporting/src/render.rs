//! SVG Rendering Targets

use crate::ReportError;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Render onto a white SVG canvas written to `path`
pub fn render_svg<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), ReportError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), ReportError>,
{
    {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| ReportError::Render(e.to_string()))?;
        draw(&root)?;
        root.present().map_err(|e| ReportError::Render(e.to_string()))?;
    }
    info!("Rendered chart to {}", path.display());
    Ok(())
}

/// Render onto a white SVG canvas and return the document
pub fn render_svg_to_string<F>(size: (u32, u32), draw: F) -> Result<String, ReportError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), ReportError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| ReportError::Render(e.to_string()))?;
        draw(&root)?;
        root.present().map_err(|e| ReportError::Render(e.to_string()))?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_to_file() {
        let path = std::env::temp_dir().join(format!("reporting-{}.svg", std::process::id()));
        render_svg(&path, (200, 100), |_| Ok(())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_draw_error_propagates() {
        let result = render_svg_to_string((10, 10), |_| Err(ReportError::EmptySummary));
        assert!(matches!(result, Err(ReportError::EmptySummary)));
    }
}
