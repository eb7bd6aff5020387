// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::aggregate::{DashboardAggregates, NumericPolicy};
use crate::api::SurveySource;
use crate::charts::{
    bar_chart, energy_gauge, pie_chart, sleep_line_chart, ChartConfig, ChartLabels, ChartSurface,
};
use crate::columns::{ColumnMap, ColumnNames};
use crate::parser::SurveyTable;

/// Identifiers of the four chart mount points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountPoints {
    pub creature: String,
    pub faction: String,
    pub sleep: String,
    pub energy: String,
}

impl Default for MountPoints {
    fn default() -> Self {
        Self {
            creature: "creatureChart".to_string(),
            faction: "deadlineChart".to_string(),
            sleep: "sleepChart".to_string(),
            energy: "energyChart".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSettings {
    pub columns: ColumnNames,
    pub labels: ChartLabels,
    pub numeric_policy: NumericPolicy,
}

/// How a single initialization ended.
#[derive(Debug)]
pub enum InitOutcome {
    Rendered(DashboardAggregates),
    /// Already logged; nothing was mounted.
    Failed(anyhow::Error),
}

impl InitOutcome {
    pub fn aggregates(&self) -> Option<&DashboardAggregates> {
        match self {
            InitOutcome::Rendered(aggregates) => Some(aggregates),
            InitOutcome::Failed(_) => None,
        }
    }
}

/// Fetch the export at `location`, aggregate it and mount all four charts.
///
/// Any failure is logged once and reported as [`InitOutcome::Failed`]; there
/// is no retry and no partial dashboard.
pub async fn init_dashboard(
    source: &dyn SurveySource,
    location: &str,
    mounts: &MountPoints,
    settings: &DashboardSettings,
    surface: &mut dyn ChartSurface,
) -> InitOutcome {
    match load_and_render(source, location, mounts, settings, surface).await {
        Ok(aggregates) => {
            info!(
                respondents = aggregates.respondents,
                "Survey loaded, {} responses", aggregates.respondents
            );
            InitOutcome::Rendered(aggregates)
        }
        Err(e) => {
            error!("Dashboard initialization failed: {:#}", e);
            InitOutcome::Failed(e)
        }
    }
}

async fn load_and_render(
    source: &dyn SurveySource,
    location: &str,
    mounts: &MountPoints,
    settings: &DashboardSettings,
    surface: &mut dyn ChartSurface,
) -> Result<DashboardAggregates> {
    let text = source
        .fetch_text(location)
        .await
        .with_context(|| format!("Failed to fetch survey from {}", location))?;

    let table = SurveyTable::parse(&text);
    let columns = ColumnMap::resolve(table.header(), &settings.columns);
    debug!(?columns, rows = table.len(), "survey parsed");

    let aggregates = DashboardAggregates::collect(&table, &columns, settings.numeric_policy);
    let charts = build_charts(&aggregates, mounts, &settings.labels);

    for (mount_id, config) in &charts {
        surface
            .mount(mount_id, config)
            .with_context(|| format!("Failed to mount chart {}", mount_id))?;
    }
    surface.finish()?;

    Ok(aggregates)
}

/// All four chart configs, built before anything is mounted.
fn build_charts<'a>(
    aggregates: &DashboardAggregates,
    mounts: &'a MountPoints,
    labels: &ChartLabels,
) -> [(&'a str, ChartConfig); 4] {
    [
        (mounts.creature.as_str(), pie_chart(&aggregates.creatures)),
        (mounts.faction.as_str(), bar_chart(&aggregates.factions, labels)),
        (
            mounts.sleep.as_str(),
            sleep_line_chart(&aggregates.sleep_hours, labels),
        ),
        (
            mounts.energy.as_str(),
            energy_gauge(aggregates.average_energy, labels),
        ),
    ]
}
