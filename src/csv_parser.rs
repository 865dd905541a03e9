//! CSV loader with per-column type inference.
//!
//! Turns an uploaded delimited-text file into a [`Dataset`]. The inference
//! order over non-missing values is Integer → Float → Boolean → Text.
//! Only `true` and `false` (any case) count as booleans; `yes`/`no` columns
//! stay text.
//!
//! - RFC 4180 quoting (quoted delimiters, escaped `""`, embedded newlines)
//! - Unquoted fields are trimmed; quoted fields keep their inner whitespace
//! - LF, CRLF and bare CR line endings; UTF-8 BOM stripped
//! - Blank lines are skipped
//! - Standard null markers: empty, `NA`, `N/A`, `null`, `None`, `NaN`, `#N/A`, ...
//!
//! # Example
//!
//! ```
//! use u_profile::csv_parser::CsvParser;
//! use u_profile::dataset::DataType;
//!
//! let csv = "name,age,score,member\nAlice,31,1.5,True\nBob,,2.25,false\n";
//! let ds = CsvParser::new().parse_str(csv).unwrap();
//! assert_eq!(ds.shape(), (2, 4));
//! assert_eq!(ds.column(0).unwrap().data_type(), DataType::Text);
//! assert_eq!(ds.column(1).unwrap().data_type(), DataType::Integer);
//! assert_eq!(ds.column(2).unwrap().data_type(), DataType::Float);
//! assert_eq!(ds.column(3).unwrap().data_type(), DataType::Boolean);
//! ```

use crate::dataset::{Column, Dataset, DataType, NumericKind, ValidityBitmap};
use crate::error::{ProfileError, Result};
use std::path::Path;

/// Standard null value markers recognized during parsing.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", "NaN", "nan", "NAN", "#N/A",
    "#NA",
];

/// CSV parser configuration and entry point.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

/// One physical record with the line it started on.
struct RawRow {
    line: usize,
    fields: Vec<String>,
}

impl CsvParser {
    /// Comma delimiter, header row, standard null markers.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true).
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Replaces the null markers.
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Parses uploaded bytes, which must be UTF-8.
    pub fn parse_bytes(&self, bytes: Vec<u8>) -> Result<Dataset> {
        let text = String::from_utf8(bytes)?;
        self.parse_str(&text)
    }

    /// Parses a CSV file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let content = std::fs::read(path.as_ref())?;
        self.parse_bytes(content)
    }

    /// Parses CSV text.
    pub fn parse_str(&self, input: &str) -> Result<Dataset> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let rows = self.parse_raw(input);
        let Some(first) = rows.first() else {
            return Ok(Dataset::new());
        };

        let (headers, data_rows) = if self.has_header {
            (dedupe_headers(&first.fields), &rows[1..])
        } else {
            let names = (0..first.fields.len()).map(|i| format!("col_{i}")).collect();
            (names, &rows[..])
        };

        let n_cols = headers.len();
        let mut raw_columns: Vec<Vec<&str>> = vec![Vec::with_capacity(data_rows.len()); n_cols];
        for row in data_rows {
            if row.fields.len() != n_cols {
                return Err(ProfileError::CsvParse {
                    line: row.line,
                    message: format!("expected {n_cols} fields, got {}", row.fields.len()),
                });
            }
            for (col, field) in raw_columns.iter_mut().zip(&row.fields) {
                col.push(field.as_str());
            }
        }

        let mut ds = Dataset::new();
        for (name, raw) in headers.into_iter().zip(&raw_columns) {
            ds.add_column(name, self.build_column(raw))?;
        }
        log::debug!(
            "parsed CSV: {} rows x {} columns",
            ds.row_count(),
            ds.column_count()
        );
        Ok(ds)
    }

    // ── Internal parsing ─────────────────────────────────────────

    /// Splits raw text into records, honoring quotes.
    fn parse_raw(&self, input: &str) -> Vec<RawRow> {
        let delim = self.delimiter as char;
        let mut rows = Vec::new();
        let mut fields: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut quote_end: Option<usize> = None;
        let mut line = 1usize;
        let mut row_start = 1usize;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    '"' => {
                        in_quotes = false;
                        quote_end = Some(field.len());
                    }
                    _ => {
                        if c == '\n' {
                            line += 1;
                        }
                        field.push(c);
                    }
                }
                continue;
            }
            match c {
                '"' if field.is_empty() => in_quotes = true,
                c if c == delim => fields.push(finish_field(&mut field, &mut quote_end)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => {
                    fields.push(finish_field(&mut field, &mut quote_end));
                    push_record(&mut rows, std::mem::take(&mut fields), row_start);
                    line += 1;
                    row_start = line;
                }
                _ => field.push(c),
            }
        }

        if !field.is_empty() || !fields.is_empty() || quote_end.is_some() {
            fields.push(finish_field(&mut field, &mut quote_end));
            push_record(&mut rows, fields, row_start);
        }
        rows
    }

    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    /// Infers the column type and builds a typed column.
    fn build_column(&self, raw: &[&str]) -> Column {
        let n = raw.len();
        let validity = ValidityBitmap::from_flags(raw.iter().map(|v| !self.is_null(v)));
        let present: Vec<&str> = validity.valid_indices().map(|i| raw[i]).collect();

        if validity.valid_count() == 0 {
            return if n == 0 {
                Column::text(Vec::new(), validity)
            } else {
                Column::numeric(NumericKind::Float, vec![0.0; n], validity)
            };
        }

        let inferred = if present.iter().all(|s| s.parse::<i64>().is_ok()) {
            DataType::Integer
        } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
            DataType::Float
        } else if present.iter().all(|s| is_boolean_str(s)) {
            DataType::Boolean
        } else {
            DataType::Text
        };

        let cell = |i: usize| if validity.is_valid(i) { Some(raw[i]) } else { None };
        match inferred {
            DataType::Integer | DataType::Float => {
                let kind = if inferred == DataType::Integer {
                    NumericKind::Integer
                } else {
                    NumericKind::Float
                };
                let values = (0..n)
                    .map(|i| cell(i).and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0))
                    .collect();
                Column::numeric(kind, values, validity)
            }
            DataType::Boolean => {
                let values = (0..n).map(|i| cell(i).is_some_and(parse_boolean_str)).collect();
                Column::boolean(values, validity)
            }
            DataType::Text => {
                let values = (0..n)
                    .map(|i| cell(i).unwrap_or_default().to_string())
                    .collect();
                Column::text(values, validity)
            }
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helper functions ──────────────────────────────────────────────────

/// Ends the current field. Unquoted text is trimmed; a quoted field keeps
/// its content and drops only whitespace after the closing quote.
fn finish_field(field: &mut String, quote_end: &mut Option<usize>) -> String {
    let mut raw = std::mem::take(field);
    match quote_end.take() {
        Some(end) => {
            let tail = raw[end..].trim_end().len();
            raw.truncate(end + tail);
            raw
        }
        None => raw.trim().to_string(),
    }
}

/// Keeps a record unless it is a blank line.
fn push_record(rows: &mut Vec<RawRow>, fields: Vec<String>, line: usize) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        rows.push(RawRow { line, fields });
    }
}

/// Makes header names unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        let mut candidate = name.to_string();
        let mut k = 1;
        while out.contains(&candidate) {
            candidate = format!("{name}.{k}");
            k += 1;
        }
        out.push(candidate);
    }
    out
}

fn is_boolean_str(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

fn parse_boolean_str(s: &str) -> bool {
    s.eq_ignore_ascii_case("true")
}

// ── Tests ─────────────────────────────────────────────────────────────
