use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::NumericPolicy;
use crate::charts::ChartLabels;
use crate::columns::ColumnNames;
use crate::dashboard::{DashboardSettings, MountPoints};

pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSY7NZUZlhrODZPFRNQ40zm5MKqbIGiXLwwfFOP_C_Kc78c8jQi3OFFaK7CVqtgGY6p65PCn1aVRVyB/pub?output=csv";
pub const CSV_URL_ENV: &str = "SURVEY_CSV_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv_url: String,
    pub output_dir: PathBuf,
    pub title: String,
    pub numbers: NumericPolicy,
    pub mounts: MountPoints,
    pub columns: ColumnNames,
    pub labels: ChartLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            output_dir: PathBuf::from("output"),
            title: "Survey Dashboard".to_string(),
            numbers: NumericPolicy::default(),
            mounts: MountPoints::default(),
            columns: ColumnNames::default(),
            labels: ChartLabels::default(),
        }
    }
}

impl Config {
    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            columns: self.columns.clone(),
            labels: self.labels.clone(),
            numeric_policy: self.numbers,
        }
    }

    /// `SURVEY_CSV_URL` wins over the file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(CSV_URL_ENV) {
            if !url.trim().is_empty() {
                self.csv_url = url.trim().to_string();
            }
        }
    }
}

fn get_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// Load an explicit config file, or `./config.toml` when present, or defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => parse_config_file(path)?,
        None => {
            let default_path = get_config_path();
            if default_path.exists() {
                parse_config_file(&default_path)?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

fn parse_config_file(path: &Path) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
