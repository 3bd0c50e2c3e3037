// ============================================================
// Layer 6 — Comparison Chart
// ============================================================
// Renders the "normal values" bar chart behind GET /comparison.
//
// The chart always plots the fixed baseline constants from
// domain::patient::NORMAL_VALUES; it does not take the caller's
// own values. The output is an SVG file so no system fonts or
// raster encoder are needed at runtime.
//
//   <static_dir>/comparison_plot.svg
//
// The SVG is drawn in memory, written to a temporary file in the
// same directory and renamed over the target, so /static never
// serves a half-written chart while another request re-renders.
// Rendering is synchronous file I/O; the HTTP layer runs it on
// the blocking pool.
//
// Reference: plotters documentation (histogram / bar examples)

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// File name of the rendered chart inside the static directory
pub const COMPARISON_FILE: &str = "comparison_plot.svg";

const BAR_COLORS: [RGBColor; 2] = [RGBColor(135, 206, 235), RGBColor(60, 179, 113)];

/// Draw a bar per (label, value) pair into `<dir>/comparison_plot.svg`
/// and return the written path. The directory is created if needed
/// and any previous chart is replaced.
pub fn render_comparison(dir: &Path, values: &[(&str, f64)]) -> Result<PathBuf> {
    if values.is_empty() {
        return Err(anyhow!("nothing to plot"));
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create static directory '{}'", dir.display()))?;
    let path = dir.join(COMPARISON_FILE);

    let svg = draw(values).map_err(|e| anyhow!("Cannot render chart '{}': {e}", path.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temporary chart in '{}'", dir.display()))?;
    tmp.write_all(svg.as_bytes())
        .with_context(|| format!("Cannot write chart to '{}'", tmp.path().display()))?;
    tmp.persist(&path)
        .with_context(|| format!("Cannot move chart into place at '{}'", path.display()))?;

    tracing::debug!("Rendered comparison chart to '{}'", path.display());
    Ok(path)
}

fn draw(values: &[(&str, f64)]) -> Result<String, Box<dyn std::error::Error>> {
    let mut svg = String::new();
    draw_into(&mut svg, values)?;
    Ok(svg)
}

fn draw_into(svg: &mut String, values: &[(&str, f64)]) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = values.iter().map(|(name, _)| *name).collect();
    let y_max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max).max(1.0) * 1.1;

    let root = SVGBackend::with_string(svg, (1000, 560)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Comparison with Normal Values", ("sans-serif", 22).into_font())
        .margin(16)
        .x_label_area_size(90)
        .y_label_area_size(50)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => labels.get(*i).map(|s| s.to_string()).unwrap_or_default(),
            _                         => String::new(),
        })
        .y_desc("Value")
        .label_style(("sans-serif", 11).into_font())
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, (_, v))| {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
            color.filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    root.present()?;
    Ok(())
}
