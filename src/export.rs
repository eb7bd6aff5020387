// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregate::DashboardAggregates;

/// Write the dashboard numbers to `dashboard_summary_<timestamp>.csv`.
pub fn export_summary_csv(aggregates: &DashboardAggregates, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("dashboard_summary_{}.csv", timestamp));
    let mut writer = Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    write_summary(aggregates, &mut writer)?;
    Ok(csv_path)
}

fn write_summary<W: Write>(aggregates: &DashboardAggregates, writer: &mut Writer<W>) -> Result<()> {
    writer.write_record(["Metric", "Label", "Value"])?;

    let respondents = aggregates.respondents.to_string();
    writer.write_record(["respondents", "", respondents.as_str()])?;
    for (label, count) in aggregates.creatures.iter() {
        writer.write_record(["creature", label, count.to_string().as_str()])?;
    }
    for (label, count) in aggregates.factions.iter() {
        writer.write_record(["faction", label, count.to_string().as_str()])?;
    }
    for (i, hours) in aggregates.sleep_hours.iter().enumerate() {
        let respondent = (i + 1).to_string();
        writer.write_record(["sleep_hours", respondent.as_str(), hours.to_string().as_str()])?;
    }
    writer.write_record([
        "average_energy",
        "",
        format!("{:.1}", aggregates.average_energy).as_str(),
    ])?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::NumericPolicy;
    use crate::columns::ColumnMap;
    use crate::parser::SurveyTable;

    fn aggregates() -> DashboardAggregates {
        let table = SurveyTable::parse(
            "ts,creature,faction,sleep,a,b,energy\n1,Cat,\"Night, mostly\",7,,,80\n2,Dog,Day,6.5,,,65\n",
        );
        DashboardAggregates::collect(&table, &ColumnMap::default(), NumericPolicy::Lenient)
    }

    #[test]
    fn test_summary_rows() -> Result<()> {
        let mut writer = Writer::from_writer(Vec::new());
        write_summary(&aggregates(), &mut writer)?;
        let text = String::from_utf8(writer.into_inner().unwrap())?;

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Metric,Label,Value",
                "respondents,,3",
                "creature,Cat,1",
                "creature,Dog,1",
                "faction,\"Night, mostly\",1",
                "faction,Day,1",
                "sleep_hours,1,7",
                "sleep_hours,2,6.5",
                "average_energy,,72.5",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_export_creates_timestamped_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = export_summary_csv(&aggregates(), &dir.path().join("out"))?;

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("dashboard_summary_"));
        assert!(name.ends_with(".csv"));
        assert!(std::fs::read_to_string(&path)?.starts_with("Metric,Label,Value"));
        Ok(())
    }
}
