// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ChartConfig, ChartSurface};

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js";

#[derive(Serialize)]
struct MountedChart<'a> {
    id: &'a str,
    config: &'a ChartConfig,
}

/// Collects mounted charts and writes them as one Chart.js page on `finish`.
pub struct HtmlSurface {
    path: PathBuf,
    title: String,
    charts: Vec<(String, ChartConfig)>,
}

impl HtmlSurface {
    pub fn new(dir: impl AsRef<Path>, title: impl Into<String>) -> Self {
        Self {
            path: dir.as_ref().join("index.html"),
            title: title.into(),
            charts: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render_page(&self) -> Result<String> {
        let mounted: Vec<MountedChart> = self
            .charts
            .iter()
            .map(|(id, config)| MountedChart { id, config })
            .collect();
        // Keep a stray `</script>` inside a label from closing the tag.
        let json = serde_json::to_string(&mounted)?.replace("</", "<\\/");

        let mut page = String::new();
        writeln!(page, "<!DOCTYPE html>")?;
        writeln!(page, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(page, "<title>{}</title>", escape_html(&self.title))?;
        writeln!(page, "<script src=\"{}\"></script>", CHART_JS)?;
        writeln!(
            page,
            "<style>.chart {{ position: relative; height: 360px; margin: 24px; }}</style>"
        )?;
        writeln!(page, "</head>\n<body>")?;
        writeln!(page, "<h1>{}</h1>", escape_html(&self.title))?;
        for (id, _) in &self.charts {
            writeln!(
                page,
                "<div class=\"chart\"><canvas id=\"{}\"></canvas></div>",
                escape_html(id)
            )?;
        }
        writeln!(page, "<script>")?;
        writeln!(page, "const charts = {};", json)?;
        writeln!(
            page,
            "for (const {{ id, config }} of charts) {{ new Chart(document.getElementById(id), config); }}"
        )?;
        writeln!(page, "</script>\n</body>\n</html>")?;

        Ok(page)
    }
}

impl ChartSurface for HtmlSurface {
    fn mount(&mut self, mount_id: &str, config: &ChartConfig) -> Result<()> {
        self.charts.push((mount_id.to_string(), config.clone()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let page = self.render_page()?;
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, page)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), charts = self.charts.len(), "page written");
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{energy_gauge, sleep_line_chart, ChartLabels};

    #[test]
    fn test_page_has_canvas_per_mount() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let labels = ChartLabels::default();
        let mut surface = HtmlSurface::new(dir.path(), "Survey");

        surface.mount("sleepChart", &sleep_line_chart(&[7.0, 8.0], &labels))?;
        surface.mount("energyChart", &energy_gauge(70.0, &labels))?;
        surface.finish()?;

        let page = std::fs::read_to_string(surface.path())?;
        assert!(page.contains("<canvas id=\"sleepChart\"></canvas>"));
        assert!(page.contains("<canvas id=\"energyChart\"></canvas>"));
        assert!(page.contains("\"type\":\"line\""));
        assert!(page.contains("\"max\":100.0"));
        Ok(())
    }

    #[test]
    fn test_labels_cannot_break_out_of_script() -> Result<()> {
        let labels = ChartLabels {
            sleep_series: "</script><b>".to_string(),
            ..Default::default()
        };
        let mut surface = HtmlSurface::new(".", "a & b");
        surface.mount("sleepChart", &sleep_line_chart(&[1.0], &labels))?;

        let page = surface.render_page()?;
        assert!(!page.contains("</script><b>"));
        assert!(page.contains("<title>a &amp; b</title>"));
        Ok(())
    }

    #[test]
    fn test_nothing_written_before_finish() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut surface = HtmlSurface::new(dir.path(), "Survey");
        surface.mount("sleepChart", &sleep_line_chart(&[], &ChartLabels::default()))?;

        assert!(!surface.path().exists());
        Ok(())
    }
}
