//! scopus-roster - Scopus publication harvester for an author roster
//!
//! Fetches the publications of every roster author from Scopus, fills in full
//! author lists from Crossref, and writes spreadsheet-ready CSV files.
//!
//! ## Usage
//!
//! ```bash
//! SCOPUS_API_KEY=... scopus-roster fetch --year 2024 --max-results 50
//! scopus-roster roster --export roster.csv
//! scopus-roster resolve-orcid 0000-0002-1547-4773
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use scopus_roster::{
    crossref::{CrossrefClient, DEFAULT_CROSSREF_URL, DEFAULT_MAILTO},
    pipeline::{self, PipelineOptions},
    roster::RosterLoader,
    scopus::{ScopusClient, DEFAULT_PAGE_SIZE, DEFAULT_SCOPUS_URL},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Scopus publication harvester for a tracked author roster
#[derive(Parser)]
#[command(name = "scopus-roster")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Scopus connection flags shared by subcommands
#[derive(clap::Args)]
struct ScopusArgs {
    /// Elsevier API key
    #[arg(long, env = "SCOPUS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Scopus API base URL
    #[arg(long, default_value = DEFAULT_SCOPUS_URL)]
    scopus_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest publications for every roster author
    Fetch {
        #[command(flatten)]
        scopus: ScopusArgs,

        /// Only publications from this year
        #[arg(long)]
        year: Option<i32>,

        /// Maximum publications per author
        #[arg(long, default_value_t = pipeline::DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Results requested per Scopus page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Roster CSV (ORCID,Scopus ID,Name); embedded roster if omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Pause between authors in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Skip Crossref author enrichment
        #[arg(long)]
        no_enrich: bool,

        /// Contact email for the Crossref polite pool
        #[arg(long, default_value = DEFAULT_MAILTO)]
        mailto: String,

        /// Crossref API base URL
        #[arg(long, default_value = DEFAULT_CROSSREF_URL)]
        crossref_url: String,

        /// Also save the roster used for this run
        #[arg(long)]
        roster_snapshot: bool,
    },

    /// Show the roster, optionally exporting it as CSV
    Roster {
        /// Roster CSV; embedded roster if omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Write the roster to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Look up the Scopus author id of an ORCID
    ResolveOrcid {
        /// ORCID (e.g., 0000-0002-1547-4773)
        orcid: String,

        #[command(flatten)]
        scopus: ScopusArgs,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Fetch {
            scopus,
            year,
            max_results,
            page_size,
            roster,
            output,
            delay_ms,
            no_enrich,
            mailto,
            crossref_url,
            roster_snapshot,
        } => {
            run_fetch(
                scopus,
                year,
                max_results,
                page_size,
                roster,
                output,
                delay_ms,
                no_enrich,
                mailto,
                crossref_url,
                roster_snapshot,
            )
            .await
        }
        Commands::Roster { roster, export } => handle_roster(roster, export),
        Commands::ResolveOrcid { orcid, scopus } => resolve_orcid(orcid, scopus).await,
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

#[allow(clippy::too_many_arguments)]
async fn run_fetch(
    scopus_args: ScopusArgs,
    year: Option<i32>,
    max_results: usize,
    page_size: usize,
    roster_path: Option<PathBuf>,
    output_dir: PathBuf,
    delay_ms: u64,
    no_enrich: bool,
    mailto: String,
    crossref_url: String,
    roster_snapshot: bool,
) -> Result<()> {
    let roster = RosterLoader::from_option(roster_path)
        .load()
        .context("Failed to load roster")?;
    println!("Loaded {} authors.", roster.len());

    let timeout = Duration::from_secs(scopus_args.timeout_secs);
    let scopus = scopus_client(&scopus_args)?.with_page_size(page_size);

    let crossref = if no_enrich {
        None
    } else {
        Some(
            CrossrefClient::new(&mailto, timeout)
                .context("Failed to create Crossref client")?
                .with_base_url(crossref_url),
        )
    };

    // Create output folder
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let folder_name = match year {
        Some(year) => format!("{}_{}", timestamp, year),
        None => timestamp,
    };
    let output_folder = output_dir.join(folder_name);
    std::fs::create_dir_all(&output_folder).context("Failed to create output directory")?;

    println!("Output folder: {}", output_folder.display());

    if roster_snapshot {
        let snapshot_path = output_folder.join("roster.csv");
        roster
            .write_snapshot(&snapshot_path)
            .context("Failed to write roster snapshot")?;
        println!("Saved: {:?}", snapshot_path);
    }

    let options = PipelineOptions {
        year,
        max_results,
        author_delay: Duration::from_millis(delay_ms),
    };

    info!(
        authors = roster.len(),
        year = ?year,
        max_results = max_results,
        enrich = !no_enrich,
        "Starting harvest"
    );

    let table = pipeline::run(&roster, &scopus, crossref.as_ref(), &options).await;
    println!("Collected {} publications.", table.len());

    let full_path = output_folder.join("publications.csv");
    table
        .write_csv(&full_path)
        .context("Failed to write publications CSV")?;
    println!("Saved: {:?}", full_path);

    let deduped = table.dedup_by_title();
    let dedup_path = output_folder.join("publications_dedup.csv");
    deduped
        .write_csv(&dedup_path)
        .context("Failed to write deduplicated CSV")?;
    println!(
        "Saved: {:?} ({} unique titles)",
        dedup_path,
        deduped.len()
    );

    println!("\n✓ Harvest complete. Results in: {}", output_folder.display());
    Ok(())
}

fn scopus_client(args: &ScopusArgs) -> Result<ScopusClient> {
    Ok(
        ScopusClient::new(args.api_key.clone(), Duration::from_secs(args.timeout_secs))
            .context("Failed to create Scopus client")?
            .with_base_url(args.scopus_url.clone()),
    )
}

// ============================================================================
// Roster & ORCID
// ============================================================================

fn handle_roster(roster_path: Option<PathBuf>, export: Option<PathBuf>) -> Result<()> {
    let roster = RosterLoader::from_option(roster_path)
        .load()
        .context("Failed to load roster")?;

    for (i, author) in roster.iter().enumerate() {
        println!(
            "{:>3}. {:<12} {:<20} {}",
            i + 1,
            author.scopus_id,
            author.orcid.as_deref().unwrap_or("-"),
            author.name
        );
    }

    if let Some(path) = export {
        roster
            .write_snapshot(&path)
            .context("Failed to write roster snapshot")?;
        println!("Saved: {:?}", path);
    }

    Ok(())
}

async fn resolve_orcid(orcid: String, args: ScopusArgs) -> Result<()> {
    let client = scopus_client(&args)?;
    match client
        .resolve_orcid(&orcid)
        .await
        .with_context(|| format!("Failed to resolve ORCID {}", orcid))?
    {
        Some(scopus_id) => println!("{} -> {}", orcid, scopus_id),
        None => println!("No Scopus author found for {}", orcid),
    }
    Ok(())
}
