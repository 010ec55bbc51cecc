use std::error::Error;
use std::path::Path;

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::errors::{BenchError, Result};
use crate::perf::Speedups;

const FONT: &str = "sans-serif";
const PLOT_WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 600;
const CAPTION: &str = "Twitter Feed Speedup Graph";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// `.svg` gets vector output; everything else is rendered as a bitmap.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }
}

/// Draws one speedup curve per problem size and writes the image to `path`,
/// replacing any existing file.
pub fn write_plot(thread_counts: &[usize], speedups: &Speedups, path: &Path) -> Result<()> {
    let series = collect_series(thread_counts, speedups)?;
    let format = ImageFormat::for_path(path);
    debug!("writing {format:?} plot to {}", path.display());

    let resolution = (PLOT_WIDTH, PLOT_HEIGHT);
    let drawn = match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, resolution).into_drawing_area();
            draw_chart(root, thread_counts, &series)
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, resolution).into_drawing_area();
            draw_chart(root, thread_counts, &series)
        }
    };

    drawn.map_err(|e| BenchError::Plot(format!("{}: {e}", path.display())))
}

/// (problem size, points) in table order, points ordered by the configured thread counts.
fn collect_series<'a>(
    thread_counts: &[usize],
    speedups: &'a Speedups,
) -> Result<Vec<(&'a str, Vec<(usize, f64)>)>> {
    let mut series = Vec::with_capacity(speedups.len());
    for (problem_size, by_threads) in speedups.iter() {
        let mut points = Vec::with_capacity(thread_counts.len());
        for &threads in thread_counts {
            let speedup = by_threads.get(&threads).ok_or_else(|| {
                BenchError::Plot(format!("no speedup for {problem_size:?} with {threads} threads"))
            })?;
            points.push((threads, *speedup));
        }
        series.push((problem_size.as_str(), points));
    }
    Ok(series)
}

/// Thread count axis range; widened by one when only one thread count is plotted.
fn x_range(thread_counts: &[usize]) -> std::ops::Range<usize> {
    let x_min = thread_counts.iter().copied().min().unwrap_or(1);
    let x_max = thread_counts.iter().copied().max().unwrap_or(1);
    x_min..x_max.max(x_min + 1)
}

/// Speedup axis range: from zero to the highest speedup plus 10% headroom.
fn y_range(series: &[(&str, Vec<(usize, f64)>)]) -> std::ops::Range<f64> {
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, y)| y))
        .fold(0.0_f64, f64::max);
    if y_max > 0.0 {
        0.0..y_max * 1.1
    } else {
        0.0..1.0
    }
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    thread_counts: &[usize],
    series: &[(&str, Vec<(usize, f64)>)],
) -> std::result::Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(CAPTION, (FONT, 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_range(thread_counts), y_range(series))?;

    chart
        .configure_mesh()
        .x_labels(thread_counts.len().max(2))
        .x_label_formatter(&|v| format!("{}", v))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .x_desc("Number of threads")
        .y_desc("Speedup")
        .draw()?;

    for (idx, (problem_size, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*problem_size)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 13))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
