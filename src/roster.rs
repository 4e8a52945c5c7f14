//! Author roster loading and snapshotting.
//!
//! The roster is a small CSV table (`ORCID,Scopus ID,Name`). A default table is
//! compiled into the binary; a different one can be loaded from disk.

use crate::error::{Result, ScopusError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Roster compiled into the binary
const EMBEDDED_ROSTER: &str = include_str!("../data/roster.csv");

/// A tracked author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// ORCID, when the author has one
    #[serde(rename = "ORCID")]
    pub orcid: Option<String>,
    /// Scopus author id (`AU-ID`)
    #[serde(rename = "Scopus ID")]
    pub scopus_id: String,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
}

/// Immutable, ordered list of authors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    authors: Vec<AuthorRecord>,
}

impl Roster {
    pub fn new(authors: Vec<AuthorRecord>) -> Self {
        Self { authors }
    }

    pub fn authors(&self) -> &[AuthorRecord] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorRecord> {
        self.authors.iter()
    }

    /// Write the roster as CSV (`ORCID,Scopus ID,Name`), empty ORCID when missing
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        for author in &self.authors {
            wtr.serialize(author)?;
        }

        wtr.flush()?;
        info!(path = ?path, authors = self.authors.len(), "Wrote roster snapshot");
        Ok(())
    }
}

/// Where the roster comes from
#[derive(Debug, Clone, Default)]
pub enum RosterLoader {
    /// The table compiled into the binary
    #[default]
    Embedded,
    /// A CSV file on disk
    File(PathBuf),
}

impl RosterLoader {
    /// Embedded roster unless a path is given
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(Self::File).unwrap_or_default()
    }

    pub fn load(&self) -> Result<Roster> {
        match self {
            Self::Embedded => {
                debug!("Loading embedded roster");
                parse_roster(EMBEDDED_ROSTER.as_bytes())
            }
            Self::File(path) => {
                debug!(path = ?path, "Loading roster file");
                let file = std::fs::File::open(path)?;
                let roster = parse_roster(file)?;
                info!(path = ?path, authors = roster.len(), "Loaded roster");
                Ok(roster)
            }
        }
    }
}

/// Parse and validate roster CSV
fn parse_roster<R: std::io::Read>(reader: R) -> Result<Roster> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut authors = Vec::new();
    for (idx, record) in rdr.deserialize::<AuthorRecord>().enumerate() {
        let mut author = record?;
        let line = idx + 2;

        if author.scopus_id.is_empty() || !author.scopus_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScopusError::Validation(format!(
                "roster line {}: invalid Scopus ID {:?}",
                line, author.scopus_id
            )));
        }
        if author.name.is_empty() {
            return Err(ScopusError::Validation(format!(
                "roster line {}: missing name",
                line
            )));
        }
        author.orcid = author.orcid.filter(|o| !o.is_empty());
        authors.push(author);
    }

    Ok(Roster::new(authors))
}
