// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

/// Where the survey export comes from.
#[async_trait::async_trait]
pub trait SurveySource {
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Fetches a published CSV export over HTTP. One GET, no retry.
#[derive(Clone, Default)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl SurveySource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if url.is_empty() {
            anyhow::bail!("survey url empty");
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("Survey request failed ({}): {}", status, body_excerpt(&text));
        }

        debug!(bytes = text.len(), "survey export downloaded");
        Ok(text)
    }
}

const ERROR_BODY_CHARS: usize = 200;

/// First few hundred characters of an error response, for log lines.
fn body_excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let mut excerpt: String = chars.by_ref().take(ERROR_BODY_CHARS).collect();
    if chars.next().is_some() {
        excerpt.push('…');
    }
    excerpt
}

/// Reads a CSV export saved on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

#[async_trait::async_trait]
impl SurveySource for FileSource {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read survey file: {}", path))
    }
}
