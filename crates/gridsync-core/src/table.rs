//! Raw tabular input: CSV and Excel files decoded into header-keyed rows.
//!
//! Parsers consume a [`RawTable`] and never touch the filesystem
//! themselves, so tests can build tables in memory with
//! [`RawTable::from_rows`].

use std::fs::File;
use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};
use csv::ReaderBuilder;
use indexmap::IndexMap;

use crate::error::CoreError;

/// One data row: header name → trimmed cell value.
pub type Row = IndexMap<String, String>;

/// A decoded tabular file: ordered headers plus data rows.
///
/// Fully-empty rows are dropped at load time; they carry no network and
/// would otherwise pollute row-error accounting.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl RawTable {
    /// Load a table from disk, dispatching on the file extension.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "csv" | "tsv" => Self::from_delimited(path, &extension),
            "xlsx" | "xls" => Self::from_spreadsheet(path),
            other => Err(CoreError::UnsupportedFormat {
                extension: other.into(),
            }),
        }
    }

    /// Read a delimited text file (comma by default, tab for `.tsv`).
    fn from_delimited(path: &Path, extension: &str) -> Result<Self, CoreError> {
        let delimiter = if extension == "tsv" { b'\t' } else { b',' };
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.clone(), cell.trim().to_string()))
                .collect();
            if row.values().all(String::is_empty) {
                continue;
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Read the first worksheet of an Excel workbook.
    fn from_spreadsheet(path: &Path) -> Result<Self, CoreError> {
        let mut workbook: Xlsx<std::io::BufReader<File>> =
            open_workbook::<Xlsx<std::io::BufReader<File>>, _>(path)
                .map_err(|e| CoreError::Spreadsheet(e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CoreError::Spreadsheet("workbook has no worksheets".into()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| CoreError::Spreadsheet(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| CoreError::Spreadsheet("worksheet has no header row".into()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let row: Row = headers
                .iter()
                .zip(data_row.iter())
                .map(|(header, cell)| (header.clone(), cell.to_string().trim().to_string()))
                .collect();
            if row.values().all(String::is_empty) {
                continue;
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Build a table in memory. Rows shorter than the header list are
    /// padded with empty cells.
    pub fn from_rows<S: AsRef<str>>(headers: &[S], data: &[&[&str]]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = data
            .iter()
            .map(|cells| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        (
                            header.clone(),
                            cells.get(i).map(|c| (*c).trim().to_string()).unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_csv_keys_cells_by_header() {
        let file = csv_file("Network,Name,Owner\n10.0.0.0/24,corp,alice\n10.1.0.0/24,lab,\n");
        let table = RawTable::load(file.path()).unwrap();

        assert_eq!(table.headers(), ["Network", "Name", "Owner"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("Network").unwrap(), "10.0.0.0/24");
        assert_eq!(table.rows()[1].get("Owner").unwrap(), "");
    }

    #[test]
    fn load_csv_skips_fully_empty_rows() {
        let file = csv_file("Network,Name\n10.0.0.0/24,corp\n,\n10.1.0.0/24,lab\n");
        let table = RawTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn load_csv_trims_whitespace() {
        let file = csv_file("Network , Name\n 10.0.0.0/24 ,  corp \n");
        let table = RawTable::load(file.path()).unwrap();
        assert_eq!(table.headers(), ["Network", "Name"]);
        assert_eq!(table.rows()[0].get("Network").unwrap(), "10.0.0.0/24");
        assert_eq!(table.rows()[0].get("Name").unwrap(), "corp");
    }

    #[test]
    fn load_missing_file_fails() {
        let result = RawTable::load(Path::new("no/such/file.csv"));
        assert!(matches!(result, Err(CoreError::FileNotFound { .. })));
    }

    #[test]
    fn load_unknown_extension_fails() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"junk").unwrap();
        let result = RawTable::load(file.path());
        assert!(matches!(result, Err(CoreError::UnsupportedFormat { .. })));
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let table = RawTable::from_rows(&["A", "B", "C"], &[&["1", "2"]]);
        assert_eq!(table.rows()[0].get("C").unwrap(), "");
    }
}
