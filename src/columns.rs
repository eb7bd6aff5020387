// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

pub const DEFAULT_CREATURE_COLUMN: usize = 1;
pub const DEFAULT_FACTION_COLUMN: usize = 2;
pub const DEFAULT_SLEEP_COLUMN: usize = 3;
pub const DEFAULT_ENERGY_COLUMN: usize = 6;

/// Header names to look for, as configured under `[columns]`.
///
/// A name that is not set, or not present in the header row, falls back to
/// the positional default for that column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub creature: Option<String>,
    pub faction: Option<String>,
    pub sleep_hours: Option<String>,
    pub energy: Option<String>,
}

/// Resolved column indices for the four charted metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub creature: usize,
    pub faction: usize,
    pub sleep_hours: usize,
    pub energy: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            creature: DEFAULT_CREATURE_COLUMN,
            faction: DEFAULT_FACTION_COLUMN,
            sleep_hours: DEFAULT_SLEEP_COLUMN,
            energy: DEFAULT_ENERGY_COLUMN,
        }
    }
}

impl ColumnMap {
    /// Look up each configured name in the header row once.
    pub fn resolve(header: &[String], names: &ColumnNames) -> Self {
        let defaults = Self::default();
        let lookup = |name: &Option<String>, fallback: usize| {
            name.as_deref()
                .and_then(|name| find_column(header, name))
                .unwrap_or(fallback)
        };

        Self {
            creature: lookup(&names.creature, defaults.creature),
            faction: lookup(&names.faction, defaults.faction),
            sleep_hours: lookup(&names.sleep_hours, defaults.sleep_hours),
            energy: lookup(&names.energy, defaults.energy),
        }
    }
}

/// Case-insensitive match on the cleaned header cell.
fn find_column(header: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    header
        .iter()
        .position(|cell| cell.replace('"', "").trim().to_lowercase() == wanted)
}
