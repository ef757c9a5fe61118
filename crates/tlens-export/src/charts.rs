//! Time-series chart rendering.

use std::path::Path;

use plotters::prelude::*;
use tlens_models::MetricSeries;
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Rendered chart dimensions in pixels.
const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 500;

/// Render the two metric sequences as side-by-side line plots.
///
/// The x axis is the detected-pose ordinal, not the frame number. Writes a
/// single PNG to `out_path`.
pub fn render_charts(series: &MetricSeries, out_path: impl AsRef<Path>) -> ExportResult<()> {
    let out_path = out_path.as_ref();

    let root = BitMapBackend::new(out_path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| ExportError::chart(e.to_string()))?;

    let (left, right) = root.split_horizontally(CHART_WIDTH / 2);

    draw_series(
        &left,
        "Player Speed Over Time",
        "Detected Frame",
        "Speed (km/h)",
        &series.speeds,
        &BLUE,
    )?;
    draw_series(
        &right,
        "Pass Accuracy Over Time",
        "Detected Frame",
        "Accuracy (%)",
        &series.accuracies,
        &GREEN,
    )?;

    root.present().map_err(|e| ExportError::chart(e.to_string()))?;

    debug!("Rendered charts to {}", out_path.display());
    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    values: &[f64],
    color: &RGBColor,
) -> ExportResult<()> {
    let x_max = values.len().max(1) as i32;
    let y_max = axis_max(values);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(|e| ExportError::chart(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(|e| ExportError::chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i as i32, *v)),
            color,
        ))
        .map_err(|e| ExportError::chart(e.to_string()))?;

    Ok(())
}

/// Upper axis bound: 10% headroom above the data, with a sane floor so an
/// empty or all-zero series still produces a drawable range.
fn axis_max(values: &[f64]) -> f64 {
    let data_max = values.iter().copied().fold(0.0_f64, f64::max);
    if data_max <= 0.0 {
        1.0
    } else {
        data_max * 1.1
    }
}
