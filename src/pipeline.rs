//! Roster harvesting pipeline.
//!
//! Authors are processed one at a time: all Scopus pages first, then one
//! Crossref lookup per publication with a DOI. The rows for each author are
//! appended to the returned table.

use crate::crossref::CrossrefClient;
use crate::roster::{AuthorRecord, Roster};
use crate::scopus::{Publication, ScopusClient};
use crate::table::{ResultRow, ResultTable};
use std::time::Duration;
use tracing::{info, warn};

/// Default pause between two authors
pub const DEFAULT_AUTHOR_DELAY: Duration = Duration::from_secs(1);

/// Default cap on publications per author
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Knobs for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Only publications from this year
    pub year: Option<i32>,
    /// Cap on publications per author
    pub max_results: usize,
    /// Pause between authors
    pub author_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            year: None,
            max_results: DEFAULT_MAX_RESULTS,
            author_delay: DEFAULT_AUTHOR_DELAY,
        }
    }
}

/// Author note used when Crossref was asked but returned no authors
pub fn authors_unavailable(name: &str) -> String {
    format!("{} (authors unavailable from Crossref)", name)
}

/// Author note used when the publication has no DOI to look up
pub fn authors_without_doi(name: &str) -> String {
    format!("{} (no DOI, author list not retrieved)", name)
}

/// Author note used when author lookup is switched off
pub fn authors_not_requested(name: &str) -> String {
    format!("{} (author lookup disabled)", name)
}

/// Harvest publications for every roster author.
///
/// `crossref` is optional; without it every row gets a roster-name note.
pub async fn run(
    roster: &Roster,
    scopus: &ScopusClient,
    crossref: Option<&CrossrefClient>,
    options: &PipelineOptions,
) -> ResultTable {
    let mut table = ResultTable::new();

    for (idx, author) in roster.iter().enumerate() {
        if idx > 0 && !options.author_delay.is_zero() {
            tokio::time::sleep(options.author_delay).await;
        }

        info!(
            scopus_id = %author.scopus_id,
            name = %author.name,
            orcid = ?author.orcid,
            "Processing author"
        );

        let publications = scopus
            .fetch_publications(&author.scopus_id, options.year, options.max_results)
            .await;

        let rows = enrich_author(author, publications, crossref).await;
        info!(name = %author.name, rows = rows.len(), "Author done");
        table.extend(rows);
    }

    info!(authors = roster.len(), rows = table.len(), "Pipeline complete");
    table
}

/// Turn one author's publications into result rows
async fn enrich_author(
    author: &AuthorRecord,
    publications: Vec<Publication>,
    crossref: Option<&CrossrefClient>,
) -> ResultTable {
    let mut rows = ResultTable::new();

    for publication in publications {
        let Some(title) = publication.title else {
            warn!(
                name = %author.name,
                journal = ?publication.journal,
                "Skipping publication without title"
            );
            continue;
        };

        let authors = match (&publication.doi, crossref) {
            (Some(doi), Some(client)) => {
                let names = client.authors(doi).await;
                if names.is_empty() {
                    authors_unavailable(&author.name)
                } else {
                    names.join(", ")
                }
            }
            (Some(_), None) => authors_not_requested(&author.name),
            (None, _) => authors_without_doi(&author.name),
        };

        rows.push(ResultRow {
            title: Some(title),
            doi: publication.doi,
            authors,
            journal: publication.journal,
        });
    }

    rows
}
