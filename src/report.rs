//! Plain-text and JSON rendering of the summaries.
//!
//! [`Report::build`] runs the statistics once and keeps the returned
//! values; rendering reads them and never recomputes anything.
//!
//! ```
//! use u_profile::csv_parser::CsvParser;
//! use u_profile::report::{Report, ReportConfig};
//!
//! let ds = CsvParser::new().parse_str("A,B\n1,a\n2,b\n100,a\n").unwrap();
//! let report = Report::build(&ds, &ReportConfig::default());
//! let text = report.render_text();
//! assert!(text.contains("Shape: (3, 2)"));
//! assert!(text.contains("- B: Unique=2, Top=a (2)"));
//! ```

use crate::charts::{BarChart, Heatmap, Histogram, ScatterPlot};
use crate::dataset::{Column, Dataset};
use crate::error::Result;
use crate::stats::{
    self, BasicInfo, CategoricalSummary, MissingInfo, NumericSummary, OutlierInfo,
};
use serde::Serialize;
use std::fmt::{self, Write as _};

/// Marker printed for an undefined statistic.
pub const UNDEFINED: &str = "undefined";

/// Marker printed for a missing cell in the preview.
const MISSING_CELL: &str = "NA";

/// What a report includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Report title.
    pub title: String,
    /// Rows shown in the overview table. Default: 5.
    pub preview_rows: usize,
    /// Whether to run IQR outlier detection. Default: false.
    pub outliers: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Data Profiling Report".to_string(),
            preview_rows: 5,
            outliers: false,
        }
    }
}

/// Computed summaries of one dataset, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    /// First rows of the dataset as display strings.
    pub preview: Vec<Vec<String>>,
    pub basic_info: BasicInfo,
    pub missing_values: MissingInfo,
    pub numeric_summary: NumericSummary,
    pub categorical_summary: CategoricalSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierInfo>,
}

impl Report {
    /// Runs every summary requested by `config`.
    pub fn build(ds: &Dataset, config: &ReportConfig) -> Self {
        log::info!(
            "profiling dataset: {} rows x {} columns",
            ds.row_count(),
            ds.column_count()
        );
        let preview = (0..ds.row_count().min(config.preview_rows))
            .map(|row| ds.iter().map(|(_, col)| cell_text(col, row)).collect())
            .collect();

        Self {
            title: config.title.clone(),
            preview,
            basic_info: stats::get_basic_info(ds),
            missing_values: stats::get_missing_values(ds),
            numeric_summary: stats::get_numeric_summary(ds),
            categorical_summary: stats::get_categorical_summary(ds),
            outliers: config.outliers.then(|| stats::find_outliers(ds)),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable report.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    fn write_overview(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(out, "Dataset Overview")?;
        if self.basic_info.columns.is_empty() {
            return writeln!(out, "(no columns)");
        }
        let header: Vec<&str> = self.basic_info.columns.iter().map(String::as_str).collect();
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(c, name)| {
                self.preview
                    .iter()
                    .map(|row| row[c].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[&str]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        writeln!(out, "{}", line(&header[..]))?;
        for row in &self.preview {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            writeln!(out, "{}", line(&cells[..]))?;
        }
        Ok(())
    }

    fn write_basic_info(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(out, "Basic Information")?;
        let (rows, cols) = self.basic_info.shape;
        writeln!(out, "Shape: ({rows}, {cols})")?;
        writeln!(out, "Columns and Data Types:")?;
        for (name, dtype) in self.basic_info.dtypes.iter() {
            writeln!(out, "- {name}: {dtype}")?;
        }
        Ok(())
    }

    fn write_missing(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(out, "Missing Values")?;
        for (name, m) in self.missing_values.iter() {
            writeln!(out, "- {name}: {} missing ({:.2}%)", m.count, m.percentage)?;
        }
        Ok(())
    }

    fn write_numeric(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(out, "Numeric Summary")?;
        if self.numeric_summary.is_empty() {
            return writeln!(out, "No numeric columns found.");
        }
        for (name, s) in self.numeric_summary.iter() {
            writeln!(
                out,
                "- {name}: Mean={}, Median={}, Min={}, Max={}, Std={}",
                fmt_stat(s.mean),
                fmt_stat(s.median),
                fmt_stat(s.min),
                fmt_stat(s.max),
                fmt_stat(s.std),
            )?;
        }
        Ok(())
    }

    fn write_categorical(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(out, "Categorical Summary")?;
        if self.categorical_summary.is_empty() {
            return writeln!(out, "No categorical columns found.");
        }
        for (name, s) in self.categorical_summary.iter() {
            match &s.top_value {
                Some(top) => writeln!(
                    out,
                    "- {name}: Unique={}, Top={top} ({})",
                    s.unique_count, s.top_count
                )?,
                None => writeln!(out, "- {name}: Unique={}, Top={UNDEFINED}", s.unique_count)?,
            }
        }
        Ok(())
    }

    fn write_outliers(&self, out: &mut fmt::Formatter<'_>, outliers: &OutlierInfo) -> fmt::Result {
        section(out, "Outliers (IQR)")?;
        if outliers.is_empty() {
            return writeln!(out, "No numeric columns found.");
        }
        for (name, o) in outliers.iter() {
            let (Some(lo), Some(hi)) = (o.lower_bound, o.upper_bound) else {
                writeln!(out, "- {name}: {UNDEFINED}")?;
                continue;
            };
            write!(
                out,
                "- {name}: {} outlier(s) outside [{}, {}]",
                o.count(),
                fmt_num(lo),
                fmt_num(hi)
            )?;
            if !o.values.is_empty() {
                let listed: Vec<String> = o.values.iter().map(|&v| fmt_num(v)).collect();
                write!(out, ": {}", listed.join(", "))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        self.write_overview(f)?;
        self.write_basic_info(f)?;
        self.write_missing(f)?;
        self.write_numeric(f)?;
        self.write_categorical(f)?;
        if let Some(outliers) = &self.outliers {
            self.write_outliers(f, outliers)?;
        }
        Ok(())
    }
}

// ── Chart rendering ───────────────────────────────────────────────────

/// Width of the longest bar in text charts.
const BAR_WIDTH: usize = 40;

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "#".repeat((count * BAR_WIDTH).div_ceil(max))
}

/// One line per bin: `[lo, hi)  count  ####`.
pub fn render_histogram(h: &Histogram) -> String {
    let mut out = format!("Histogram of {}\n", h.column);
    let max = h.counts.iter().copied().max().unwrap_or(0);
    let last = h.n_bins().saturating_sub(1);
    for (i, &count) in h.counts.iter().enumerate() {
        let close = if i == last { ']' } else { ')' };
        let _ = writeln!(
            out,
            "[{}, {}{close}  {count}  {}",
            fmt_num(h.edges[i]),
            fmt_num(h.edges[i + 1]),
            bar(count, max)
        );
    }
    out
}

/// One line per label, most frequent first.
pub fn render_bar_chart(b: &BarChart) -> String {
    let mut out = format!("Bar chart of {}\n", b.column);
    let max = b.counts.first().copied().unwrap_or(0);
    let width = b.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    for (label, &count) in b.labels.iter().zip(&b.counts) {
        let _ = writeln!(out, "{label:<width$}  {count}  {}", bar(count, max));
    }
    out
}

/// Point list as two-column CSV.
pub fn render_scatter(s: &ScatterPlot) -> String {
    let mut out = format!("{},{}\n", s.x_column, s.y_column);
    for &(x, y) in &s.points {
        let _ = writeln!(out, "{},{}", fmt_num(x), fmt_num(y));
    }
    out
}

/// Correlation matrix with two decimals; undefined cells print as `-`.
pub fn render_heatmap(h: &Heatmap) -> String {
    if h.columns.is_empty() {
        return "Correlation heatmap\nNo numeric columns found.\n".to_string();
    }
    let width = h
        .columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let mut out = String::from("Correlation heatmap\n");
    let _ = write!(out, "{:width$}", "");
    for name in &h.columns {
        let _ = write!(out, "  {name:>width$}");
    }
    out.push('\n');
    for (i, name) in h.columns.iter().enumerate() {
        let _ = write!(out, "{name:<width$}");
        for j in 0..h.columns.len() {
            let cell = h.get(i, j).map_or_else(|| "-".to_string(), |r| format!("{r:.2}"));
            let _ = write!(out, "  {cell:>width$}");
        }
        out.push('\n');
    }
    out
}

// ── Formatting helpers ────────────────────────────────────────────────

fn section(out: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

/// Formats a number compactly: integers without a fraction, other values
/// with at most four decimals.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{v:.0}");
    }
    let mut s = String::new();
    let _ = write!(s, "{v:.4}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Formats an optional statistic, printing [`UNDEFINED`] for `None`.
pub fn fmt_stat(v: Option<f64>) -> String {
    v.map_or_else(|| UNDEFINED.to_string(), fmt_num)
}

fn cell_text(col: &Column, row: usize) -> String {
    if !col.is_valid(row) {
        return MISSING_CELL.to_string();
    }
    match col {
        Column::Numeric { values, .. } => fmt_num(values[row]),
        Column::Boolean { values, .. } => values[row].to_string(),
        Column::Text { values, .. } => values[row].clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
