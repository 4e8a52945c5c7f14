//! Result table and CSV export.
//!
//! Rows are written with a fixed spreadsheet layout: title in column A, DOI in
//! C, authors in F, journal in H. Columns B, D, E and G stay empty for manual
//! annotation. Missing values are rendered as placeholder text here and only
//! here.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const NO_TITLE: &str = "No title available";
pub const NO_JOURNAL: &str = "No journal name available";
pub const NO_DOI: &str = "No DOI available";

/// Number of columns, A through H
pub const COLUMN_COUNT: usize = 8;

pub const COL_TITLE: usize = 0; // A
pub const COL_DOI: usize = 2; // C
pub const COL_AUTHORS: usize = 5; // F
pub const COL_JOURNAL: usize = 7; // H

/// One publication in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub title: Option<String>,
    pub doi: Option<String>,
    /// Joined author list or a fallback note
    pub authors: String,
    pub journal: Option<String>,
}

impl ResultRow {
    /// Cells A..H for this row
    pub fn cells(&self) -> [String; COLUMN_COUNT] {
        let mut cells: [String; COLUMN_COUNT] = Default::default();
        cells[COL_TITLE] = self.title.clone().unwrap_or_else(|| NO_TITLE.to_string());
        cells[COL_DOI] = self.doi.clone().unwrap_or_else(|| NO_DOI.to_string());
        cells[COL_AUTHORS] = self.authors.clone();
        cells[COL_JOURNAL] = self
            .journal
            .clone()
            .unwrap_or_else(|| NO_JOURNAL.to_string());
        cells
    }
}

fn header() -> [&'static str; COLUMN_COUNT] {
    let mut header = [""; COLUMN_COUNT];
    header[COL_TITLE] = "title";
    header[COL_DOI] = "doi";
    header[COL_AUTHORS] = "authors";
    header[COL_JOURNAL] = "journal";
    header
}

/// Accumulated publications, in harvest order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, other: ResultTable) {
        self.rows.extend(other.rows);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the table keeping only the first row of each title
    pub fn dedup_by_title(&self) -> ResultTable {
        let mut titles: Vec<&Option<String>> = Vec::new();
        let mut rows = Vec::new();

        for row in &self.rows {
            if !titles.contains(&&row.title) {
                titles.push(&row.title);
                rows.push(row.clone());
            }
        }

        ResultTable { rows }
    }

    /// Write header plus one line per row; data line `i` is row `i`
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        wtr.write_record(header())?;
        for row in &self.rows {
            wtr.write_record(row.cells())?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Save table to a CSV file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)?;
        info!(path = ?path, rows = self.rows.len(), "Saved result table");
        Ok(())
    }
}

impl FromIterator<ResultRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn row(title: &str, doi: Option<&str>) -> ResultRow {
        ResultRow {
            title: Some(title.to_string()),
            doi: doi.map(str::to_string),
            authors: "A. Author".to_string(),
            journal: Some("Journal".to_string()),
        }
    }

    #[test]
    fn test_cells_layout() {
        let cells = row("Title", Some("10.1/x")).cells();
        assert_eq!(cells[0], "Title");
        assert_eq!(cells[2], "10.1/x");
        assert_eq!(cells[5], "A. Author");
        assert_eq!(cells[7], "Journal");
        for blank in [1, 3, 4, 6] {
            assert!(cells[blank].is_empty());
        }
    }

    #[test]
    fn test_cells_placeholders() {
        let cells = ResultRow {
            title: None,
            doi: None,
            authors: String::new(),
            journal: None,
        }
        .cells();
        assert_eq!(cells[COL_TITLE], NO_TITLE);
        assert_eq!(cells[COL_DOI], NO_DOI);
        assert_eq!(cells[COL_JOURNAL], NO_JOURNAL);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut second = row("A", Some("10.1/second"));
        second.authors = "Other".to_string();
        let table: ResultTable = vec![
            row("A", Some("10.1/first")),
            row("B", None),
            second,
            row("C", None),
        ]
        .into_iter()
        .collect();

        let deduped = table.dedup_by_title();
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped.rows()[0].doi.as_deref(), Some("10.1/first"));
        assert_eq!(deduped.rows()[1].title.as_deref(), Some("B"));
        assert_eq!(deduped.rows()[2].title.as_deref(), Some("C"));
    }

    #[test]
    fn test_dedup_idempotent() {
        let table: ResultTable = ["X", "Y", "X", "Z", "Y"]
            .iter()
            .map(|t| row(t, None))
            .collect();

        let once = table.dedup_by_title();
        assert_eq!(once.dedup_by_title(), once);
    }

    #[test]
    fn test_write_rows_aligned() -> Result<()> {
        let table: ResultTable = vec![row("First", Some("10.1/a")), row("Second", None)]
            .into_iter()
            .collect();

        let mut buf = Vec::new();
        table.write_to(&mut buf)?;
        let text = String::from_utf8_lossy(&buf);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "title,,doi,,,authors,,journal");
        assert_eq!(lines[1], "First,,10.1/a,,,A. Author,,Journal");
        assert_eq!(lines[2], "Second,,No DOI available,,,A. Author,,Journal");
        Ok(())
    }

    #[test]
    fn test_write_csv_file() -> Result<()> {
        let temp = NamedTempFile::new()?;
        ResultTable::new().write_csv(temp.path())?;
        let written = std::fs::read_to_string(temp.path())?;
        assert_eq!(written, "title,,doi,,,authors,,journal\n");
        Ok(())
    }
}
