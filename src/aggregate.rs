// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::columns::ColumnMap;
use crate::parser::{Row, SurveyTable};

/// How numeric cells are read. Cells that do not yield a finite number are
/// dropped from the series under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Skip leading whitespace and read the longest numeric prefix, so
    /// `"7 hours"` counts as 7.
    #[default]
    Lenient,
    /// The whole trimmed cell must be a number.
    Strict,
}

impl NumericPolicy {
    pub fn parse(self, cell: &str) -> Option<f64> {
        let value = match self {
            NumericPolicy::Lenient => {
                let cell = cell.trim_start();
                numeric_prefix(cell)?.parse::<f64>().ok()?
            }
            NumericPolicy::Strict => cell.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Label counts that iterate in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCounts {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl CategoryCounts {
    pub fn increment(&mut self, label: &str) {
        match self.positions.get(label) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.positions.get(label).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, count)| *count as f64).collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count the cleaned values of one categorical column.
///
/// Quotes are stripped and whitespace trimmed; rows that are too short or
/// whose cell cleans to nothing are skipped.
pub fn count_occurrences(rows: &[Row], column: usize) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for row in rows {
        let Some(cell) = row.get(column) else {
            continue;
        };
        let cleaned = cell.replace('"', "");
        let label = cleaned.trim();
        if !label.is_empty() {
            counts.increment(label);
        }
    }
    counts
}

/// Read one numeric column in row order, dropping cells that do not parse.
pub fn numeric_series(rows: &[Row], column: usize, policy: NumericPolicy) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter_map(|cell| policy.parse(cell))
        .collect()
}

pub fn average(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let count = series.len() as f64;
    let sum = series.iter().sum::<f64>();
    if sum.is_finite() {
        return sum / count;
    }
    // The sum overflowed; dividing first keeps huge finite inputs finite.
    series.iter().map(|v| v / count).sum()
}

pub fn round_to_one_decimal(value: f64) -> f64 {
    let scaled = value * 10.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10.0
}

/// Everything the four charts need, derived from one parsed export.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardAggregates {
    pub respondents: usize,
    pub creatures: CategoryCounts,
    pub factions: CategoryCounts,
    pub sleep_hours: Vec<f64>,
    pub average_energy: f64,
}

impl DashboardAggregates {
    pub fn collect(table: &SurveyTable, columns: &ColumnMap, policy: NumericPolicy) -> Self {
        Self::from_rows(table.rows(), columns, policy)
    }

    pub fn from_rows(rows: &[Row], columns: &ColumnMap, policy: NumericPolicy) -> Self {
        let energy = numeric_series(rows, columns.energy, policy);

        Self {
            respondents: rows.len(),
            creatures: count_occurrences(rows, columns.creature),
            factions: count_occurrences(rows, columns.faction),
            sleep_hours: numeric_series(rows, columns.sleep_hours, policy),
            average_energy: average(&energy),
        }
    }
}
