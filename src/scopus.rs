//! Scopus Search API client
//!
//! Retrieves the publications of a single author, optionally restricted to one
//! publication year, by walking the paginated search endpoint.
//!
//! API details:
//! - Search endpoint: GET /content/search/scopus?query=...&start=...&count=...
//! - Author endpoint: GET /content/search/author?query=ORCID(...)
//! - Key passed in the `X-ELS-APIKey` header
//! - An empty result set comes back as a single entry carrying an `error` field

use crate::error::{Result, ScopusError};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Elsevier API base URL
pub const DEFAULT_SCOPUS_URL: &str = "https://api.elsevier.com";

/// Results requested per page
pub const DEFAULT_PAGE_SIZE: usize = 25;

static ORCID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").expect("valid ORCID pattern")
});

/// One Scopus search hit. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publication {
    pub title: Option<String>,
    pub journal: Option<String>,
    pub doi: Option<String>,
}

// === Scopus API Response Types ===

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "search-results", default)]
    search_results: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    entry: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(rename = "dc:title")]
    title: Option<String>,
    #[serde(rename = "prism:publicationName")]
    publication_name: Option<String>,
    #[serde(rename = "prism:doi")]
    doi: Option<String>,
    #[serde(rename = "dc:identifier")]
    identifier: Option<String>,
    /// Set on the placeholder entry of an empty result set
    error: Option<String>,
}

/// Build the Scopus query string for an author and optional year
pub fn build_query(author_id: &str, year: Option<i32>) -> String {
    let mut query = format!("AU-ID({})", author_id);
    if let Some(year) = year {
        query.push_str(&format!(" AND PUBYEAR IS {}", year));
    }
    query
}

/// Check the `NNNN-NNNN-NNNN-NNNC` ORCID shape
pub fn is_valid_orcid(orcid: &str) -> bool {
    ORCID_RE.is_match(orcid)
}

/// Scopus API client
pub struct ScopusClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: usize,
}

impl ScopusClient {
    /// Create a new ScopusClient
    ///
    /// # Arguments
    ///
    /// * `api_key` - Elsevier API key
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ScopusError::Config("Scopus API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScopusError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_SCOPUS_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Point the client at another API root (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Results requested per page, at least 1
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch up to `max_results` publications of one author.
    ///
    /// Pagination stops on an empty page, a short page, or once `max_results`
    /// records are collected. A failed request ends pagination and whatever was
    /// collected so far is returned.
    pub async fn fetch_publications(
        &self,
        author_id: &str,
        year: Option<i32>,
        max_results: usize,
    ) -> Vec<Publication> {
        let mut publications = Vec::new();
        if max_results == 0 {
            return publications;
        }

        let query = build_query(author_id, year);
        info!(query = %query, max_results = max_results, "Starting Scopus query");

        let mut start = 0;
        loop {
            let page = match self.fetch_page(&query, start).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        author_id = author_id,
                        start = start,
                        error = %e,
                        "Failed to retrieve page, keeping partial results"
                    );
                    break;
                }
            };

            let page_len = page.len();
            debug!(start = start, count = page_len, "Fetched Scopus page");
            if page_len == 0 {
                break;
            }

            publications.extend(page);
            start += self.page_size;

            if publications.len() >= max_results || page_len < self.page_size {
                break;
            }
        }

        publications.truncate(max_results);
        info!(
            author_id = author_id,
            total = publications.len(),
            "Scopus query complete"
        );
        publications
    }

    /// Look up the Scopus author id registered for an ORCID
    ///
    /// Returns `Ok(None)` when Scopus knows no author with that ORCID.
    pub async fn resolve_orcid(&self, orcid: &str) -> Result<Option<String>> {
        let orcid = orcid.trim();
        if !is_valid_orcid(orcid) {
            return Err(ScopusError::Validation(format!("Invalid ORCID: {}", orcid)));
        }

        let url = format!("{}/content/search/author", self.base_url);
        let query = format!("ORCID({})", orcid);
        let body = self.get(&url, &[("query", query)]).await?;
        let entries = parse_entries(&body)?;

        let scopus_id = entries
            .into_iter()
            .find_map(|e| e.identifier)
            .map(|id| id.trim_start_matches("AUTHOR_ID:").to_string())
            .filter(|id| !id.is_empty());

        info!(orcid = orcid, scopus_id = ?scopus_id, "Resolved ORCID");
        Ok(scopus_id)
    }

    /// Fetch one page of search results
    async fn fetch_page(&self, query: &str, start: usize) -> Result<Vec<Publication>> {
        let url = format!("{}/content/search/scopus", self.base_url);
        let body = self
            .get(
                &url,
                &[
                    ("query", query.to_string()),
                    ("start", start.to_string()),
                    ("count", self.page_size.to_string()),
                ],
            )
            .await?;

        Ok(parse_entries(&body)?
            .into_iter()
            .map(entry_to_publication)
            .collect())
    }

    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header("X-ELS-APIKey", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScopusError::Api {
                code: status.as_u16(),
                message: format!("Scopus API error: {}", status),
            });
        }

        Ok(response.text().await?)
    }
}

/// Decode a search response, dropping the empty-result placeholder
fn parse_entries(json_str: &str) -> Result<Vec<SearchEntry>> {
    let response: SearchResponse = serde_json::from_str(json_str)?;
    Ok(response
        .search_results
        .map(|r| r.entry)
        .unwrap_or_default()
        .into_iter()
        .filter(|e| e.error.is_none())
        .collect())
}

fn entry_to_publication(entry: SearchEntry) -> Publication {
    let non_empty = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    Publication {
        title: non_empty(entry.title),
        journal: non_empty(entry.publication_name),
        doi: non_empty(entry.doi),
    }
}
