//! Rendering of speedup tables: a PNG line chart, a CSV export, and a text preview for the
//! terminal.

use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use plotlib::page::Page;
use plotlib::repr::Plot;
use plotlib::style::{PointMarker, PointStyle};
use plotlib::view::ContinuousView;
use plotters::prelude::*;

use crate::speedup::SpeedupTable;

/// The size of the rendered chart, in pixels.
pub const CHART_SIZE: (u32, u32) = (1024, 768);

const MARKERS: [PointMarker; 3] = [PointMarker::Circle, PointMarker::Square, PointMarker::Cross];

/// Draw one line per setting, with thread counts along the x-axis and speedup up the y-axis, and
/// write it to `path` as a PNG.
pub fn render_chart(table: &SpeedupTable, path: &Path) -> Result<()> {
    let labels: Vec<String> = table.thread_counts().iter().map(ToString::to_string).collect();
    let last = u32::try_from(labels.len().saturating_sub(1))?;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..last).into_segmented(), 0.0..y_limit(table))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Number of Threads")
        .y_desc("Speedup")
        .draw()?;

    for (i, series) in table.series().iter().enumerate() {
        let colour = Palette99::pick(i).to_rgba();
        let points = (0u32..).zip(series.speedups()).map(|(x, y)| (SegmentValue::CenterOf(x), y));
        chart
            .draw_series(LineSeries::new(points, colour.stroke_width(2)).point_size(4))?
            .label(series.setting().as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present().with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write the table as CSV, one row per setting and thread count.
pub fn write_csv<W: io::Write>(table: &SpeedupTable, w: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(w);
    out.write_record(["setting", "threads", "baseline_seconds", "mean_seconds", "speedup"])?;
    for series in table.series() {
        for cell in series.cells() {
            out.write_record([
                series.setting().to_string(),
                cell.threads.to_string(),
                series.baseline().to_string(),
                cell.mean.to_string(),
                cell.speedup.to_string(),
            ])?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Render the chart as text, for a quick look in the terminal.
pub fn preview(table: &SpeedupTable, width: u32, height: u32) -> Result<String> {
    let threads: Vec<f64> = table.thread_counts().iter().map(|n| f64::from(n.get())).collect();
    let min = threads.iter().copied().fold(f64::INFINITY, f64::min);
    let max = threads.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut view = ContinuousView::new()
        .x_range(min - 1.0, max + 1.0)
        .y_range(0.0, y_limit(table))
        .x_label("Number of Threads")
        .y_label("Speedup");
    for (i, series) in table.series().iter().enumerate() {
        let data = threads.iter().copied().zip(series.speedups()).collect();
        let plot = Plot::new(data)
            .point_style(PointStyle::new().marker(MARKERS[i % MARKERS.len()].clone()))
            .legend(series.setting().to_string());
        view = view.add(plot);
    }

    Page::single(&view).dimensions(width, height).to_text().map_err(|e| anyhow!("{}", e))
}

fn y_limit(table: &SpeedupTable) -> f64 {
    (table.max_speedup() * 1.1).max(1.0)
}
