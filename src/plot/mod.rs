use std::path::Path;

use plotters::prelude::*;

use crate::core::{Comparison, Track};
use crate::error::{Error, Result};
use crate::report::format_net_worth;

pub const CHART_TITLE: &str = "Net Worth Comparison: 3-Year vs 7-Year Residency";
pub const X_LABEL: &str = "Years Since Graduation";
pub const Y_LABEL: &str = "Net Worth ($)";

const CHART_SIZE: (u32, u32) = (1000, 600);
const SHORT_COLOR: RGBColor = RGBColor(31, 119, 180);
const LONG_COLOR: RGBColor = RGBColor(255, 127, 14);
const MARKER_SIZE: i32 = 4;

/// Renders the comparison as a PNG line chart at `path`.
pub fn render_chart(comparison: &Comparison, path: &Path) -> Result<()> {
    draw_chart(comparison, path).map_err(|e| Error::Plot(e.to_string()))?;
    tracing::debug!(path = %path.display(), "chart rendered");
    Ok(())
}

fn draw_chart(
    comparison: &Comparison,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(0.0, comparison.years as f64);
    let (y_min, y_max) = value_bounds(comparison);
    let y_range = padded_range(y_min, y_max);

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format_net_worth(*y))
        .draw()?;

    chart.draw_series(LineSeries::new(
        [(x_range.start, 0.0), (x_range.end, 0.0)],
        RED.mix(0.3).stroke_width(2),
    ))?;

    let short_points = points(comparison, Track::ShortTrack);
    chart
        .draw_series(LineSeries::new(
            short_points.iter().copied(),
            SHORT_COLOR.stroke_width(2),
        ))?
        .label(Track::ShortTrack.label())
        .legend(|(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (20, 0)], SHORT_COLOR.stroke_width(2))
                + Circle::new((10, 0), MARKER_SIZE, SHORT_COLOR.filled())
        });
    chart.draw_series(
        short_points
            .iter()
            .map(|&point| Circle::new(point, MARKER_SIZE, SHORT_COLOR.filled())),
    )?;

    let long_points = points(comparison, Track::LongTrack);
    chart
        .draw_series(LineSeries::new(
            long_points.iter().copied(),
            LONG_COLOR.stroke_width(2),
        ))?
        .label(Track::LongTrack.label())
        .legend(|(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (20, 0)], LONG_COLOR.stroke_width(2))
                + Rectangle::new(
                    [(10 - MARKER_SIZE, -MARKER_SIZE), (10 + MARKER_SIZE, MARKER_SIZE)],
                    LONG_COLOR.filled(),
                )
        });
    chart.draw_series(long_points.iter().map(|&point| {
        EmptyElement::at(point)
            + Rectangle::new(
                [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                LONG_COLOR.filled(),
            )
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn points(comparison: &Comparison, track: Track) -> Vec<(f64, f64)> {
    let trajectory = match track {
        Track::ShortTrack => &comparison.short_track,
        Track::LongTrack => &comparison.long_track,
    };
    trajectory
        .values()
        .iter()
        .enumerate()
        .map(|(year, &value)| (year as f64, value))
        .collect()
}

/// Min and max over both series, always including the zero line.
fn value_bounds(comparison: &Comparison) -> (f64, f64) {
    comparison
        .short_track
        .values()
        .iter()
        .chain(comparison.long_track.values())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn padded_range(lo: f64, hi: f64) -> std::ops::Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

pub fn display_available() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Opens the chart in the system image viewer. Never fails the run.
pub fn show_chart(path: &Path) {
    if !display_available() {
        tracing::info!("no display available, skipping chart preview");
        return;
    }
    match open::that_detached(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "opened chart viewer"),
        Err(err) => tracing::warn!("could not open chart viewer: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SimulationParameters, run_comparison};

    #[test]
    fn bounds_cover_both_series_and_zero() {
        let comparison = run_comparison(&SimulationParameters::default(), 15);
        let (lo, hi) = value_bounds(&comparison);
        // Deepest point is the end of the long residency.
        assert_eq!(lo, comparison.long_track.values()[7]);
        assert!(lo < -600_000.0, "{lo}");
        assert_eq!(hi, comparison.long_track.last().max(comparison.short_track.last()));
        assert!(hi > 0.0);
    }

    #[test]
    fn bounds_include_zero_for_all_negative_series() {
        let comparison = run_comparison(&SimulationParameters::default(), 2);
        let (lo, hi) = value_bounds(&comparison);
        assert!(lo < 0.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let range = padded_range(0.0, 0.0);
        assert!(range.start < 0.0 && range.end > 0.0);

        let range = padded_range(0.0, 10.0);
        assert_eq!(range, -0.5..10.5);
    }

    #[test]
    fn render_chart_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        let comparison = run_comparison(&SimulationParameters::default(), 15);

        render_chart(&comparison, &path).expect("chart rendered");

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn points_are_indexed_by_year() {
        let comparison = run_comparison(&SimulationParameters::default(), 3);
        let short = points(&comparison, Track::ShortTrack);
        assert_eq!(short.len(), 4);
        assert_eq!(short[0], (0.0, -500_000.0));
        assert_eq!(short[3].0, 3.0);
    }
}
