//! Crossref API client for author enrichment.
//!
//! Scopus search results only carry the first author, so the full author list
//! of a publication is recovered from Crossref by DOI.

use crate::error::{Result, ScopusError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Crossref API base URL
pub const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";

/// Polite pool email for Crossref API
pub const DEFAULT_MAILTO: &str = "scopus-roster@example.com";

/// Crossref API client
pub struct CrossrefClient {
    client: reqwest::Client,
    base_url: String,
}

impl CrossrefClient {
    /// Create a new CrossrefClient
    ///
    /// # Arguments
    ///
    /// * `mailto` - Contact address sent in the User-Agent (polite pool)
    /// * `timeout` - Per-request timeout
    pub fn new(mailto: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("scopus-roster/0.1 (mailto:{})", mailto))
            .timeout(timeout)
            .build()
            .map_err(|e| ScopusError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_CROSSREF_URL.to_string(),
        })
    }

    /// Point the client at another API root (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Author names of the work with this DOI, in Crossref order.
    ///
    /// An empty vector means the list is unavailable: request failure, unknown
    /// DOI, malformed body, or no `author` field.
    pub async fn authors(&self, doi: &str) -> Vec<String> {
        let doi = doi.trim();
        if doi.is_empty() {
            return Vec::new();
        }

        match self.do_lookup(doi).await {
            Ok(authors) => {
                debug!(doi = doi, count = authors.len(), "Crossref authors");
                authors
            }
            Err(e) => {
                debug!(doi = doi, error = %e, "Crossref lookup failed");
                Vec::new()
            }
        }
    }

    async fn do_lookup(&self, doi: &str) -> Result<Vec<String>> {
        let url = format!("{}/works/{}", self.base_url, encode_doi(doi));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ScopusError::Api {
                code: response.status().as_u16(),
                message: format!("Crossref API error: {}", response.status()),
            });
        }

        let body = response.text().await?;
        parse_authors(&body)
    }
}

// === Crossref API Response Types ===

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefMessage,
}

#[derive(Debug, Deserialize)]
struct CrossrefMessage {
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    #[serde(default)]
    given: String,
    #[serde(default)]
    family: String,
}

/// Percent-encode a DOI for the URL path, keeping its `/` separators
fn encode_doi(doi: &str) -> String {
    doi.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_authors(json_str: &str) -> Result<Vec<String>> {
    let data: CrossrefResponse = serde_json::from_str(json_str)?;
    Ok(data
        .message
        .author
        .iter()
        .map(|a| format!("{} {}", a.given, a.family).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
