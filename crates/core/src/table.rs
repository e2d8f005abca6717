//! Batch input and output tables.
//!
//! Input is a CSV file with a header row that contains at least `URL_ID` and
//! `URL`. Every input column is carried through to the output unchanged and
//! followed by the thirteen metric columns. Rows whose article could not be
//! fetched get thirteen empty cells.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Writer};

use crate::analyzer::{METRIC_COLUMNS, TextMetrics};
use crate::{LexiscoreError, Result};

pub const URL_ID_COLUMN: &str = "URL_ID";
pub const URL_COLUMN: &str = "URL";

/// One article to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub url_id: String,
    pub url: String,
    /// All cells of the row, in header order.
    pub cells: Vec<String>,
}

/// A parsed input table.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<InputRow>,
}

impl InputTable {
    /// Reads a table from CSV.
    ///
    /// Every row is fitted to the header width: short rows are padded with
    /// empty cells and cells beyond the last header (a trailing comma, say)
    /// are dropped. Header names are matched after trimming surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`LexiscoreError::MissingColumn`] if `URL_ID` or `URL` is absent.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let id_idx = column_index(&headers, URL_ID_COLUMN)?;
        let url_idx = column_index(&headers, URL_COLUMN)?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.iter().skip(headers.len()).any(|c| !c.trim().is_empty()) {
                tracing::warn!(row = line + 1, extra = cells.len() - headers.len(), "dropping cells without a header");
            }
            cells.resize(headers.len(), String::new());

            let url_id = cells[id_idx].trim().to_string();
            let url = cells[url_idx].trim().to_string();
            rows.push(InputRow { url_id, url, cells });
        }

        Ok(Self { headers, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LexiscoreError::FileNotFound(path.to_path_buf()));
        }
        Self::from_reader(File::open(path)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LexiscoreError::MissingColumn(name.to_string()))
}

/// One output row: the input cells and the metrics, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub cells: Vec<String>,
    pub metrics: Option<TextMetrics>,
}

impl OutputRow {
    /// The row's cells followed by the metric cells.
    ///
    /// Missing metrics become thirteen empty strings, never a partial set.
    pub fn to_record(&self) -> Vec<String> {
        let metric_cells: Vec<String> = match &self.metrics {
            Some(metrics) => metrics.values().iter().map(ToString::to_string).collect(),
            None => vec![String::new(); METRIC_COLUMNS.len()],
        };

        self.cells.iter().cloned().chain(metric_cells).collect()
    }
}

/// Input headers followed by the metric column names.
pub fn output_headers(input_headers: &[String]) -> Vec<String> {
    input_headers
        .iter()
        .cloned()
        .chain(METRIC_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// Writes the output table as CSV.
pub fn write_output<W: Write>(writer: W, input_headers: &[String], rows: &[OutputRow]) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    writer.write_record(output_headers(input_headers))?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_output_path(path: impl AsRef<Path>, input_headers: &[String], rows: &[OutputRow]) -> Result<()> {
    write_output(File::create(path)?, input_headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_text;
    use crate::lexicon::Lexicons;

    const INPUT: &str = "URL_ID,URL,Source\n\
                         blackassign0001,https://example.com/a,news\n\
                         blackassign0002,https://example.com/b\n";

    #[test]
    fn test_read_input_table() {
        let table = InputTable::from_reader(INPUT.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["URL_ID", "URL", "Source"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].url_id, "blackassign0001");
        assert_eq!(table.rows[0].url, "https://example.com/a");
        assert_eq!(table.rows[0].cells, vec!["blackassign0001", "https://example.com/a", "news"]);
        assert_eq!(table.rows[1].cells, vec!["blackassign0002", "https://example.com/b", ""]);
    }

    #[test]
    fn test_rows_fitted_to_header_width() {
        let table =
            InputTable::from_reader("URL_ID,URL\n1,https://x.test,\n2,https://y.test,extra,more\n".as_bytes()).unwrap();

        assert_eq!(table.rows[0].cells, vec!["1", "https://x.test"]);
        assert_eq!(table.rows[1].cells, vec!["2", "https://y.test"]);

        let rows: Vec<OutputRow> =
            table.rows.iter().map(|r| OutputRow { cells: r.cells.clone(), metrics: None }).collect();
        let mut buffer = Vec::new();
        write_output(&mut buffer, &table.headers, &rows).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 3);
        assert!(output.lines().all(|l| l.split(',').count() == 15));
    }

    #[test]
    fn test_columns_in_any_position() {
        let table = InputTable::from_reader("URL, URL_ID \nhttps://x.test,7\n".as_bytes()).unwrap();
        assert_eq!(table.rows[0].url_id, "7");
        assert_eq!(table.rows[0].url, "https://x.test");
    }

    #[test]
    fn test_missing_column() {
        let result = InputTable::from_reader("ID,URL\n1,https://x.test\n".as_bytes());
        assert!(matches!(result, Err(LexiscoreError::MissingColumn(c)) if c == "URL_ID"));
    }

    #[test]
    fn test_from_path_missing() {
        let result = InputTable::from_path("/nonexistent/input.csv");
        assert!(matches!(result, Err(LexiscoreError::FileNotFound(_))));
    }

    #[test]
    fn test_output_headers() {
        let headers = output_headers(&["URL_ID".to_string(), "URL".to_string()]);
        assert_eq!(headers.len(), 15);
        assert_eq!(headers[2], "POSITIVE SCORE");
        assert_eq!(headers[14], "AVG WORD LENGTH");
    }

    #[test]
    fn test_write_output() {
        let table = InputTable::from_reader(INPUT.as_bytes()).unwrap();
        let metrics = analyze_text("A plain sentence.", &Lexicons::default());
        let rows = vec![
            OutputRow { cells: table.rows[0].cells.clone(), metrics: Some(metrics) },
            OutputRow { cells: table.rows[1].cells.clone(), metrics: None },
        ];

        let mut buffer = Vec::new();
        write_output(&mut buffer, &table.headers, &rows).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("URL_ID,URL,Source,POSITIVE SCORE,"));
        assert!(lines[1].starts_with("blackassign0001,https://example.com/a,news,0,0,0,0,3,0.333"));
        assert_eq!(lines[2], format!("blackassign0002,https://example.com/b,{}", ",".repeat(13)));
    }

    #[test]
    fn test_null_row_has_every_metric_cell() {
        let row = OutputRow { cells: vec!["1".to_string()], metrics: None };
        let record = row.to_record();
        assert_eq!(record.len(), 14);
        assert!(record[1..].iter().all(String::is_empty));
    }
}
