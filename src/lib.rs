// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod aggregate;
pub mod api;
pub mod charts;
pub mod columns;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod parser;
