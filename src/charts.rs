//! Plot-ready data for the standard charts.
//!
//! Each function turns dataset columns into the numbers a chart needs:
//! bin edges and counts for a histogram, label frequencies for a bar
//! chart, point pairs for a scatter plot, and a correlation matrix for a
//! heatmap. Drawing is left to the caller.
//!
//! # Example
//!
//! ```
//! use u_profile::charts::{histogram, Bins};
//! use u_profile::csv_parser::CsvParser;
//!
//! let ds = CsvParser::new().parse_str("x\n1\n2\n2\n3\n9\n").unwrap();
//! let h = histogram(&ds, "x", Bins::Count(4)).unwrap();
//! assert_eq!(h.counts, vec![3, 1, 0, 1]);
//! assert_eq!(h.edges.len(), 5);
//! ```

use crate::dataset::{Column, Dataset};
use crate::error::{ProfileError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Default number of equal-width histogram bins.
pub const DEFAULT_BINS: usize = 30;

/// Largest bin count accepted by [`Bins::Count`].
pub const MAX_BINS: usize = 10_000;

/// Default number of bars in a bar chart.
pub const DEFAULT_BAR_LIMIT: usize = 20;

// ── Configuration ───────────────────────────────────────────────────

/// Rule for choosing histogram bins from the data.
///
/// Mirrors `u_analytics::distribution::BinMethod` so the dependency does
/// not leak into the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMethod {
    /// Sturges' rule: k = ceil(log2(n)) + 1.
    Sturges,
    /// Scott's rule: h = 3.49 * sigma * n^(-1/3).
    Scott,
    /// Freedman-Diaconis rule: h = 2 * IQR * n^(-1/3).
    FreedmanDiaconis,
}

/// How histogram bins are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bins {
    /// Fixed number of equal-width bins between min and max.
    Count(usize),
    /// Bin count derived from the data.
    Rule(BinMethod),
}

impl Default for Bins {
    fn default() -> Self {
        Self::Count(DEFAULT_BINS)
    }
}

// ── Result Types ────────────────────────────────────────────────────

/// Histogram of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    /// Bin edges, `counts.len() + 1` of them. The last bin is closed.
    pub edges: Vec<f64>,
    /// Observations per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }
}

/// Most frequent labels of one column, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub column: String,
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

/// Paired values of two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub x_column: String,
    pub y_column: String,
    /// `(x, y)` for every row where both are present, in row order.
    pub points: Vec<(f64, f64)>,
}

/// Pearson correlations between all numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub columns: Vec<String>,
    /// Row-major `n × n` matrix; `None` where a correlation is undefined.
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    /// Correlation between the `i`-th and `j`-th numeric columns.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i).and_then(|row| row.get(j)).copied().flatten()
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Bins the present values of a numeric column.
///
/// # Errors
///
/// - [`ProfileError::ColumnNotFound`] / [`ProfileError::NonNumericColumn`]
/// - [`ProfileError::InvalidConfig`] for `Bins::Count(0)` or a count above [`MAX_BINS`]
/// - [`ProfileError::InsufficientData`] if the column has no finite values,
///   or too few for the chosen rule
pub fn histogram(ds: &Dataset, column: &str, bins: Bins) -> Result<Histogram> {
    let values: Vec<f64> = numeric_values(ds, column)?
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(ProfileError::InsufficientData {
            min_required: 1,
            actual: 0,
        });
    }

    let (edges, counts) = match bins {
        Bins::Count(0) => {
            return Err(ProfileError::InvalidConfig {
                message: "histogram needs at least one bin".into(),
            })
        }
        Bins::Count(n) if n > MAX_BINS => {
            return Err(ProfileError::InvalidConfig {
                message: format!("histogram bin count {n} exceeds the maximum of {MAX_BINS}"),
            })
        }
        Bins::Count(n) => equal_width_bins(&values, n),
        Bins::Rule(method) => {
            let method = match method {
                BinMethod::Sturges => u_analytics::distribution::BinMethod::Sturges,
                BinMethod::Scott => u_analytics::distribution::BinMethod::Scott,
                BinMethod::FreedmanDiaconis => {
                    u_analytics::distribution::BinMethod::FreedmanDiaconis
                }
            };
            let result = u_analytics::distribution::histogram_bins(&values, method).ok_or(
                ProfileError::InsufficientData {
                    min_required: 2,
                    actual: values.len(),
                },
            )?;
            (result.edges, result.counts)
        }
    };

    Ok(Histogram {
        column: column.to_string(),
        edges,
        counts,
    })
}

/// Counts the labels of a text or boolean column, keeping the `limit`
/// most frequent. Equal counts keep first-seen order.
pub fn bar_chart(ds: &Dataset, column: &str, limit: usize) -> Result<BarChart> {
    let col = ds.require(column)?;
    if col.data_type().is_numeric() {
        return Err(ProfileError::NonCategoricalColumn {
            column: column.to_string(),
        });
    }

    let mut order: Vec<String> = Vec::new();
    let mut freq: HashMap<String, usize> = HashMap::new();
    for idx in col.validity().valid_indices() {
        let Some(label) = col.label_at(idx) else {
            continue;
        };
        match freq.get_mut(&label) {
            Some(count) => *count += 1,
            None => {
                freq.insert(label.clone(), 1);
                order.push(label);
            }
        }
    }

    let mut bars: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| {
            let count = freq[&label];
            (label, count)
        })
        .collect();
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    bars.truncate(limit);

    let (labels, counts) = bars.into_iter().unzip();
    Ok(BarChart {
        column: column.to_string(),
        labels,
        counts,
    })
}

/// Pairs two numeric columns row by row, skipping rows where either is missing.
pub fn scatter_plot(ds: &Dataset, x: &str, y: &str) -> Result<ScatterPlot> {
    let xs = require_numeric(ds, x)?;
    let ys = require_numeric(ds, y)?;
    let points = (0..ds.row_count())
        .filter_map(|i| Some((xs.numeric_at(i)?, ys.numeric_at(i)?)))
        .collect();
    Ok(ScatterPlot {
        x_column: x.to_string(),
        y_column: y.to_string(),
        points,
    })
}

/// Pearson correlation matrix over every numeric column.
///
/// Each pair uses the rows where both columns hold finite values. A pair
/// with fewer than two such rows, or a constant column, has no defined
/// correlation.
pub fn correlation_heatmap(ds: &Dataset) -> Heatmap {
    let numeric: Vec<(&str, &Column)> = ds.numeric_columns().collect();
    let n = numeric.len();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pairwise_pearson(ds.row_count(), numeric[i].1, numeric[j].1);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Heatmap {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        matrix,
    }
}

// ── Internal helpers ────────────────────────────────────────────────

fn require_numeric<'a>(ds: &'a Dataset, column: &str) -> Result<&'a Column> {
    let col = ds.require(column)?;
    if !col.data_type().is_numeric() {
        return Err(ProfileError::NonNumericColumn {
            column: column.to_string(),
        });
    }
    Ok(col)
}

fn numeric_values(ds: &Dataset, column: &str) -> Result<Vec<f64>> {
    Ok(require_numeric(ds, column)?
        .valid_numeric_values()
        .unwrap_or_default())
}

/// Equal-width bins over `[min, max]`; a constant sample gets one unit-wide bin.
///
/// Bounds are scaled before they are subtracted, so the bin width stays
/// finite even when `max - min` exceeds `f64::MAX`.
fn equal_width_bins(values: &[f64], n_bins: usize) -> (Vec<f64>, Vec<usize>) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let n = n_bins as f64;
    let width = max / n - min / n;
    if max <= min || width <= 0.0 {
        return (vec![min - 0.5, min + 0.5], vec![values.len()]);
    }

    let edges: Vec<f64> = (0..=n_bins)
        .map(|k| {
            if k == n_bins {
                return max;
            }
            let t = k as f64 / n;
            min * (1.0 - t) + max * t
        })
        .collect();

    let mut counts = vec![0usize; n_bins];
    let offset = min / width;
    for &v in values {
        let idx = ((v / width - offset).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }
    (edges, counts)
}

fn pairwise_pearson(rows: usize, a: &Column, b: &Column) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = (0..rows)
        .filter_map(|i| Some((a.numeric_at(i)?, b.numeric_at(i)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unzip();
    let constant = |v: &[f64]| v.iter().all(|&x| x == v[0]);
    if xs.len() < 2 || constant(&xs) || constant(&ys) {
        return None;
    }
    u_analytics::correlation::correlation_matrix(&[xs.as_slice(), ys.as_slice()])
        .map(|m| m.get(0, 1))
        .filter(|r| r.is_finite())
}

// ── Tests ───────────────────────────────────────────────────────────
