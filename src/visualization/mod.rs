//! Scatter plot of reference positions and measured centroids.
//!
//! Renders a 2D (x, y) PNG with three series: reference positions, raw
//! centroids and filtered centroids. Each series appears once in the legend.

use std::path::Path;

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::core::geometry::Coordinate;
use crate::processors::aggregation::DirectorySummary;
use crate::processors::evaluation::Stream;

/// Errors that can occur during visualization.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plotting error: {0}")]
    PlottingError(String),
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

const REFERENCE_COLOR: RGBColor = RGBColor(0, 160, 60);
const RAW_COLOR: RGBColor = RGBColor(30, 90, 220);
const FILTERED_COLOR: RGBColor = RGBColor(220, 40, 40);

/// Fraction of the data span added on each side of the plot.
const PADDING: f64 = 0.1;

fn plot_err<E: std::fmt::Display>(e: E) -> VisualizationError {
    VisualizationError::PlottingError(e.to_string())
}

/// Plot the reference positions and per-reference centroids of a summary.
pub fn plot_summary(
    output_path: &Path,
    summary: &DirectorySummary,
    title: &str,
    config: &PlotConfig,
) -> Result<()> {
    plot_positions(
        output_path,
        &summary.reference_positions(),
        &summary.per_reference_centroids(Stream::Raw),
        &summary.per_reference_centroids(Stream::Filtered),
        title,
        config,
    )
}

/// Plot reference, raw and filtered positions on the x/y plane and save as PNG.
///
/// Empty input renders an empty chart over a unit range.
///
/// # Arguments
///
/// * `output_path` - Path to save the PNG image
/// * `references` - Ground truth positions
/// * `raw` - Raw centroids
/// * `filtered` - Filtered centroids
/// * `title` - Chart caption, drawn only with a legend enabled
/// * `config` - Image size, marker size and legend toggle
pub fn plot_positions(
    output_path: &Path,
    references: &[Coordinate],
    raw: &[Coordinate],
    filtered: &[Coordinate],
    title: &str,
    config: &PlotConfig,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let all: Vec<&Coordinate> = references.iter().chain(raw).chain(filtered).collect();
    let (x_min, x_max, y_min, y_max) = compute_bounds(&all);
    let x_padding = (x_max - x_min) * PADDING;
    let y_padding = (y_max - y_min) * PADDING;

    let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(40).y_label_area_size(50);
    if config.legend {
        builder.caption(title, ("sans-serif", 24));
    }

    let mut chart = builder
        .build_cartesian_2d(
            (x_min - x_padding)..(x_max + x_padding),
            (y_min - y_padding)..(y_max + y_padding),
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("X Axis")
        .y_desc("Y Axis")
        .draw()
        .map_err(plot_err)?;

    let size = config.point_size;

    chart
        .draw_series(
            references
                .iter()
                .map(|p| Circle::new((p.x, p.y), size, REFERENCE_COLOR.filled())),
        )
        .map_err(plot_err)?
        .label("Reference positions")
        .legend(move |(x, y)| Circle::new((x, y), size, REFERENCE_COLOR.filled()));

    chart
        .draw_series(
            raw.iter()
                .map(|p| Cross::new((p.x, p.y), size, RAW_COLOR.stroke_width(2))),
        )
        .map_err(plot_err)?
        .label("Raw positions")
        .legend(move |(x, y)| Cross::new((x, y), size, RAW_COLOR.stroke_width(2)));

    chart
        .draw_series(
            filtered
                .iter()
                .map(|p| Cross::new((p.x, p.y), size, FILTERED_COLOR.stroke_width(2))),
        )
        .map_err(plot_err)?
        .label("Filtered positions")
        .legend(move |(x, y)| Cross::new((x, y), size, FILTERED_COLOR.stroke_width(2)));

    if config.legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;

    log::info!("Plot -> {}", output_path.display());
    Ok(())
}

/// Compute the (x_min, x_max, y_min, y_max) bounds of a point set.
///
/// Degenerate or empty extents are widened to a unit range.
fn compute_bounds(points: &[&Coordinate]) -> (f64, f64, f64, f64) {
    if points.is_empty() {
        return (-1.0, 1.0, -1.0, 1.0);
    }

    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    for p in points {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }

    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    (x_min, x_max, y_min, y_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bounds_empty() {
        assert_eq!(compute_bounds(&[]), (-1.0, 1.0, -1.0, 1.0));
    }

    #[test]
    fn test_compute_bounds() {
        let a = Coordinate::new(-2.0, 1.0, 9.0);
        let b = Coordinate::new(3.0, 4.0, -9.0);
        assert_eq!(compute_bounds(&[&a, &b]), (-2.0, 3.0, 1.0, 4.0));
    }

    #[test]
    fn test_plot_positions_empty_input() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        for legend in [false, true] {
            let path = temp_dir.path().join(format!("empty_{}.png", legend));
            let config = PlotConfig {
                legend,
                ..PlotConfig::default()
            };

            let result = plot_positions(&path, &[], &[], &[], "Empty", &config);
            assert!(result.is_ok(), "legend={}: {:?}", legend, result);
            assert!(path.exists());
        }
    }

    #[test]
    fn test_compute_bounds_single_point_is_widened() {
        let a = Coordinate::new(2.0, 5.0, 0.0);
        assert_eq!(compute_bounds(&[&a]), (1.0, 3.0, 4.0, 6.0));
    }
}
