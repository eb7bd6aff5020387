// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod survey_client;

pub use survey_client::{FileSource, HttpSource, SurveySource};
