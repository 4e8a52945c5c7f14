//! # scopus-roster
//!
//! Harvests the publications of a tracked author roster from Scopus, recovers
//! full author lists from Crossref, and exports spreadsheet-ready CSV files.
//!
//! ## Modules
//!
//! - [`roster`] - Author roster loading and snapshots
//! - [`scopus`] - Scopus Search API client (paginated)
//! - [`crossref`] - Crossref API client for author enrichment
//! - [`table`] - Result table, title dedup and CSV export
//! - [`pipeline`] - Sequential per-author harvest
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scopus_roster::{crossref::CrossrefClient, pipeline, roster::RosterLoader, scopus::ScopusClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let roster = RosterLoader::Embedded.load()?;
//!     let scopus = ScopusClient::new("my-key", Duration::from_secs(30))?;
//!     let crossref = CrossrefClient::new("me@example.com", Duration::from_secs(30))?;
//!     let options = pipeline::PipelineOptions { year: Some(2024), ..Default::default() };
//!     let table = pipeline::run(&roster, &scopus, Some(&crossref), &options).await;
//!     table.write_csv(std::path::Path::new("publications.csv"))?;
//!     Ok(())
//! }
//! ```

pub mod crossref;
pub mod error;
pub mod pipeline;
pub mod roster;
pub mod scopus;
pub mod table;

pub use error::{Result, ScopusError};
