// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

use super::{AxisBounds, ChartConfig, ChartData, ChartKind, ChartOptions, Dataset, Scales};
use crate::aggregate::{round_to_one_decimal, CategoryCounts};

// Six colours only; a seventh category reuses the first.
pub const PIE_PALETTE: [&str; 6] = [
    "#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b", "#858796",
];
pub const BAR_COLOR: &str = "#4e73df";
pub const SLEEP_COLOR: &str = "#1cc88a";
pub const ENERGY_COLOR: &str = "#f6c23e";

const SLEEP_TENSION: f64 = 0.1;
const ENERGY_SCALE: AxisBounds = AxisBounds {
    min: 0.0,
    max: 100.0,
};

/// Text used in dataset and axis labels, configurable under `[labels]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub respondents: String,
    pub respondent_prefix: String,
    pub sleep_series: String,
    pub energy_category: String,
    pub energy_series: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            respondents: "Respondents".to_string(),
            respondent_prefix: "respondent".to_string(),
            sleep_series: "Daily sleep hours".to_string(),
            energy_category: "Average energy (all respondents)".to_string(),
            energy_series: "Average energy (%)".to_string(),
        }
    }
}

/// Doughnut with one slice per category.
pub fn pie_chart(counts: &CategoryCounts) -> ChartConfig {
    let mut dataset = Dataset::new(counts.values());
    dataset.background_color = PIE_PALETTE.iter().map(|c| c.to_string()).collect();

    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: counts.labels(),
            datasets: vec![dataset],
        },
        options: ChartOptions::default(),
    }
}

pub fn bar_chart(counts: &CategoryCounts, labels: &ChartLabels) -> ChartConfig {
    let mut dataset = Dataset::new(counts.values());
    dataset.label = Some(labels.respondents.clone());
    dataset.background_color = vec![BAR_COLOR.to_string()];

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: counts.labels(),
            datasets: vec![dataset],
        },
        options: ChartOptions::default(),
    }
}

/// One point per respondent, in row order.
pub fn sleep_line_chart(series: &[f64], labels: &ChartLabels) -> ChartConfig {
    let mut dataset = Dataset::new(series.to_vec());
    dataset.label = Some(labels.sleep_series.clone());
    dataset.border_color = Some(SLEEP_COLOR.to_string());
    dataset.fill = Some(false);
    dataset.tension = Some(SLEEP_TENSION);

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: (1..=series.len())
                .map(|n| format!("{} {}", labels.respondent_prefix, n))
                .collect(),
            datasets: vec![dataset],
        },
        options: ChartOptions::default(),
    }
}

/// A single bar holding the rounded average on a fixed 0-100 axis.
///
/// Averages outside the axis are not clamped here; they simply run off the chart.
pub fn energy_gauge(average: f64, labels: &ChartLabels) -> ChartConfig {
    let mut dataset = Dataset::new(vec![round_to_one_decimal(average)]);
    dataset.label = Some(labels.energy_series.clone());
    dataset.background_color = vec![ENERGY_COLOR.to_string()];

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: vec![labels.energy_category.clone()],
            datasets: vec![dataset],
        },
        options: ChartOptions {
            scales: Some(Scales { y: ENERGY_SCALE }),
            ..Default::default()
        },
    }
}
