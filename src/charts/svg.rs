// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{ensure, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::debug;

use super::{ChartConfig, ChartKind, ChartSurface, Dataset};

const CANVAS: (u32, u32) = (1200, 800);
const COLOR_SLATE: RGBColor = RGBColor(100, 116, 139);

/// Draws every mounted chart in memory and writes `<dir>/<mount_id>.svg`
/// files only on `finish`, once all charts have drawn.
pub struct SvgSurface {
    dir: PathBuf,
    pending: Vec<(PathBuf, String)>,
    written: Vec<PathBuf>,
}

impl SvgSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;
        Ok(Self {
            dir,
            pending: Vec::new(),
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ChartSurface for SvgSurface {
    fn mount(&mut self, mount_id: &str, config: &ChartConfig) -> Result<()> {
        let path = self.dir.join(chart_file_name(mount_id)?);
        let svg = draw_chart(mount_id, config)
            .with_context(|| format!("Failed to draw {}", mount_id))?;
        self.pending.push((path, svg));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut written = Vec::new();
        for (path, svg) in std::mem::take(&mut self.pending) {
            if let Err(e) = std::fs::write(&path, svg) {
                // Leave no half-written dashboard behind.
                for done in &written {
                    let _ = std::fs::remove_file(done);
                }
                return Err(e).with_context(|| format!("Failed to write {}", path.display()));
            }
            debug!(path = %path.display(), "chart written");
            written.push(path);
        }
        self.written.extend(written);
        Ok(())
    }
}

/// Mount ids become file names, so they may not name a path.
fn chart_file_name(mount_id: &str) -> Result<String> {
    ensure!(
        !mount_id.is_empty()
            && mount_id != "."
            && mount_id != ".."
            && !mount_id.contains(|c: char| c == '/' || c == '\\'),
        "Invalid mount id {:?}",
        mount_id
    );
    Ok(format!("{}.svg", mount_id))
}

fn draw_chart(caption: &str, config: &ChartConfig) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CANVAS).into_drawing_area();
        root.fill(&WHITE)?;

        match (config.kind, config.data.datasets.first()) {
            (_, None) => {}
            (ChartKind::Doughnut, Some(dataset)) => {
                draw_doughnut(&root, caption, &config.data.labels, dataset)?
            }
            (ChartKind::Bar, Some(dataset)) => draw_bars(&root, caption, config, dataset)?,
            (ChartKind::Line, Some(dataset)) => draw_line(&root, caption, config, dataset)?,
        }

        root.present()?;
    }
    Ok(svg)
}

fn hex_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.trim_start_matches('#');
    ensure!(
        digits.len() == 6 && digits.is_ascii(),
        "Unsupported colour {}",
        hex
    );
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .with_context(|| format!("Unsupported colour {}", hex))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn fill_color(dataset: &Dataset, index: usize) -> Result<RGBColor> {
    match dataset.color_for(index).or(dataset.border_color.as_deref()) {
        Some(hex) => hex_color(hex),
        None => Ok(COLOR_SLATE),
    }
}

/// Y range for cartesian charts: configured bounds, or zero to 110% of the peak.
fn y_range(config: &ChartConfig, values: &[f64]) -> (f64, f64) {
    if let Some(bounds) = config.y_bounds() {
        return (bounds.min, bounds.max);
    }
    let peak = values.iter().copied().fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return (0.0, 1.0);
    }
    let top = peak * 1.1;
    (0.0, if top.is_finite() { top } else { peak })
}

fn draw_doughnut(
    root: &DrawingArea<SVGBackend, Shift>,
    caption: &str,
    labels: &[String],
    dataset: &Dataset,
) -> Result<()> {
    root.draw_text(
        caption,
        &TextStyle::from(("sans-serif", 32).into_font()).color(&BLACK),
        (40, 30),
    )?;

    let total: f64 = dataset.data.iter().sum();
    if total <= 0.0 {
        return Ok(());
    }

    let center = (400, 420);
    let mut start_angle = -90.0; // Start from top

    for (i, value) in dataset.data.iter().enumerate() {
        let sweep_angle = value / total * 360.0;
        draw_donut_segment(
            root,
            center,
            280.0,
            140.0,
            start_angle,
            sweep_angle,
            fill_color(dataset, i)?,
        )?;
        start_angle += sweep_angle;
    }

    // Legend
    let legend_x = 800;
    for (i, (label, value)) in labels.iter().zip(&dataset.data).enumerate() {
        let y = 120 + (i as i32) * 35;
        root.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 20, y + 20)],
            fill_color(dataset, i)?.filled(),
        ))?;
        root.draw_text(
            &format!("{} ({})", label, value),
            &TextStyle::from(("sans-serif", 16).into_font()),
            (legend_x + 30, y + 3),
        )?;
    }

    Ok(())
}

fn draw_donut_segment(
    root: &DrawingArea<SVGBackend, Shift>,
    center: (i32, i32),
    outer_radius: f64,
    inner_radius: f64,
    start_angle: f64,
    sweep_angle: f64,
    color: RGBColor,
) -> Result<()> {
    let num_points = 100;
    let point_at = |radius: f64, i: i32| {
        let angle = start_angle + sweep_angle * f64::from(i) / f64::from(num_points);
        let rad = angle.to_radians();
        (
            center.0 + (radius * rad.cos()) as i32,
            center.1 + (radius * rad.sin()) as i32,
        )
    };

    // Outer arc, then inner arc in reverse
    let mut points: Vec<(i32, i32)> = (0..=num_points)
        .map(|i| point_at(outer_radius, i))
        .collect();
    points.extend((0..=num_points).rev().map(|i| point_at(inner_radius, i)));

    root.draw(&Polygon::new(points, color.filled()))?;
    Ok(())
}

fn draw_bars(
    root: &DrawingArea<SVGBackend, Shift>,
    caption: &str,
    config: &ChartConfig,
    dataset: &Dataset,
) -> Result<()> {
    let labels = &config.data.labels;
    let count = labels.len().max(dataset.data.len());
    if count == 0 {
        root.draw_text(
            caption,
            &TextStyle::from(("sans-serif", 32).into_font()).color(&BLACK),
            (40, 30),
        )?;
        return Ok(());
    }

    let (y_min, y_max) = y_range(config, &dataset.data);
    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..count).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count)
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .y_desc(dataset.label.clone().unwrap_or_default())
        .draw()?;

    for (i, value) in dataset.data.iter().enumerate() {
        // Values beyond a fixed axis are cut at the edge.
        let top = value.clamp(y_min, y_max);
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), y_min), (SegmentValue::Exact(i + 1), top)],
            fill_color(dataset, i)?.filled(),
        );
        bar.set_margin(0, 0, 10, 10);
        chart.draw_series(std::iter::once(bar))?;
    }

    Ok(())
}

fn draw_line(
    root: &DrawingArea<SVGBackend, Shift>,
    caption: &str,
    config: &ChartConfig,
    dataset: &Dataset,
) -> Result<()> {
    let labels = &config.data.labels;
    let (y_min, y_max) = y_range(config, &dataset.data);
    let x_max = dataset.data.len().saturating_sub(1).max(1);
    let color = fill_color(dataset, 0)?;

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(dataset.data.len().max(2))
        .x_label_formatter(&|i| labels.get(*i).cloned().unwrap_or_default())
        .y_desc(dataset.label.clone().unwrap_or_default())
        .draw()?;

    let points: Vec<(usize, f64)> = dataset.data.iter().copied().enumerate().collect();
    chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
    chart.draw_series(
        points
            .into_iter()
            .map(|point| Circle::new(point, 4, color.filled())),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryCounts;
    use crate::charts::{bar_chart, energy_gauge, pie_chart, sleep_line_chart, ChartLabels};

    #[test]
    fn test_hex_color() -> Result<()> {
        let color = hex_color("#4e73df")?;
        assert_eq!((color.0, color.1, color.2), (0x4e, 0x73, 0xdf));
        assert!(hex_color("blue").is_err());
        assert!(hex_color("#zzzzzz").is_err());
        Ok(())
    }

    #[test]
    fn test_y_range() {
        let labels = ChartLabels::default();
        assert_eq!(y_range(&energy_gauge(55.0, &labels), &[55.0]), (0.0, 100.0));

        let (min, max) = y_range(&sleep_line_chart(&[5.0, 10.0], &labels), &[5.0, 10.0]);
        assert_eq!(min, 0.0);
        assert!((max - 11.0).abs() < 1e-9);

        assert_eq!(y_range(&sleep_line_chart(&[], &labels), &[]), (0.0, 1.0));
    }

    #[test]
    fn test_y_range_stays_finite_for_huge_values() {
        let labels = ChartLabels::default();
        let series = [1.7e308, 7.0];
        let (min, max) = y_range(&sleep_line_chart(&series, &labels), &series);

        assert_eq!(min, 0.0);
        assert!(max.is_finite());
        assert_eq!(max, 1.7e308);
    }

    #[test]
    fn test_chart_file_name() -> Result<()> {
        assert_eq!(chart_file_name("sleepChart")?, "sleepChart.svg");
        assert!(chart_file_name("").is_err());
        assert!(chart_file_name("..").is_err());
        assert!(chart_file_name("no_such_dir/sleepChart").is_err());
        assert!(chart_file_name("a\\b").is_err());
        Ok(())
    }

    #[test]
    fn test_writes_one_svg_per_mount_on_finish() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let chart_dir = dir.path().join("charts");
        let mut surface = SvgSurface::new(&chart_dir)?;
        let labels = ChartLabels::default();

        let mut counts = CategoryCounts::default();
        for label in ["Cat", "Dog", "Cat", "Owl", "Bat", "Fox", "Elk", "Yak"] {
            counts.increment(label);
        }

        surface.mount("creatureChart", &pie_chart(&counts))?;
        surface.mount("deadlineChart", &bar_chart(&counts, &labels))?;
        surface.mount("sleepChart", &sleep_line_chart(&[7.0, 6.5, 8.0], &labels))?;
        surface.mount("energyChart", &energy_gauge(140.0, &labels))?;

        // Nothing reaches disk until every chart has drawn
        assert_eq!(std::fs::read_dir(&chart_dir)?.count(), 0);
        assert!(surface.written().is_empty());

        surface.finish()?;

        assert_eq!(surface.written().len(), 4);
        for path in surface.written() {
            let svg = std::fs::read_to_string(path)?;
            assert!(svg.contains("<svg"));
        }
        assert!(chart_dir.join("energyChart.svg").exists());
        Ok(())
    }

    #[test]
    fn test_huge_finite_value_still_draws() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface = SvgSurface::new(dir.path())?;
        let labels = ChartLabels::default();

        surface.mount("sleepChart", &sleep_line_chart(&[1.7e308, 7.0], &labels))?;
        surface.mount("energyChart", &energy_gauge(1e308, &labels))?;
        surface.finish()?;

        assert_eq!(surface.written().len(), 2);
        Ok(())
    }

    #[test]
    fn test_bad_mount_id_fails_before_anything_is_written() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface = SvgSurface::new(dir.path())?;
        let labels = ChartLabels::default();

        surface.mount("deadlineChart", &bar_chart(&CategoryCounts::default(), &labels))?;
        let err = surface
            .mount("no_such_dir/sleepChart", &sleep_line_chart(&[7.0], &labels))
            .unwrap_err();

        assert!(err.to_string().contains("Invalid mount id"));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_empty_data_still_writes_canvas() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface = SvgSurface::new(dir.path())?;
        let labels = ChartLabels::default();

        surface.mount("creatureChart", &pie_chart(&CategoryCounts::default()))?;
        surface.mount("deadlineChart", &bar_chart(&CategoryCounts::default(), &labels))?;
        surface.mount("sleepChart", &sleep_line_chart(&[], &labels))?;
        surface.finish()?;

        assert_eq!(surface.written().len(), 3);
        Ok(())
    }
}
