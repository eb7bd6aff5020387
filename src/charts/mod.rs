// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod html;
mod render;
mod svg;

pub use html::HtmlSurface;
pub use render::{
    bar_chart, energy_gauge, pie_chart, sleep_line_chart, ChartLabels, BAR_COLOR, ENERGY_COLOR,
    PIE_PALETTE, SLEEP_COLOR,
};
pub use svg::SvgSurface;

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    /// Fill colours, reused from the start when there are more points than colours.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub background_color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl Dataset {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            label: None,
            data,
            background_color: Vec::new(),
            border_color: None,
            fill: None,
            tension: None,
        }
    }

    /// Fill colour for the point at `index`.
    pub fn color_for(&self, index: usize) -> Option<&str> {
        if self.background_color.is_empty() {
            return None;
        }
        Some(&self.background_color[index % self.background_color.len()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scales {
    pub y: AxisBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            scales: None,
        }
    }
}

/// Declarative chart description, serialized in the shape Chart.js accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn y_bounds(&self) -> Option<AxisBounds> {
        self.options.scales.map(|scales| scales.y)
    }
}

/// Something that can draw a chart at a named mount point.
pub trait ChartSurface {
    fn mount(&mut self, mount_id: &str, config: &ChartConfig) -> Result<()>;

    /// Called once after every chart is mounted.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fans every call out to several surfaces in order.
#[derive(Default)]
pub struct SurfaceSet {
    surfaces: Vec<Box<dyn ChartSurface>>,
}

impl SurfaceSet {
    pub fn with(mut self, surface: impl ChartSurface + 'static) -> Self {
        self.surfaces.push(Box::new(surface));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl ChartSurface for SurfaceSet {
    fn mount(&mut self, mount_id: &str, config: &ChartConfig) -> Result<()> {
        for surface in &mut self.surfaces {
            surface.mount(mount_id, config)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for surface in &mut self.surfaces {
            surface.finish()?;
        }
        Ok(())
    }
}

/// Keeps mounted charts in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub mounted: Vec<(String, ChartConfig)>,
    pub finished: bool,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn get(&self, mount_id: &str) -> Option<&ChartConfig> {
        self.mounted
            .iter()
            .find(|(id, _)| id == mount_id)
            .map(|(_, config)| config)
    }
}

#[cfg(test)]
impl ChartSurface for RecordingSurface {
    fn mount(&mut self, mount_id: &str, config: &ChartConfig) -> Result<()> {
        self.mounted.push((mount_id.to_string(), config.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
