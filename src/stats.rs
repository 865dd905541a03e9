//! Descriptive statistics over a [`Dataset`].
//!
//! Five pure entry points, each returning a [`ColumnMap`] keyed by column
//! name in dataset order:
//!
//! | Function | Columns covered | Per-column value |
//! |----------|-----------------|------------------|
//! | [`get_basic_info`] | all | [`DataType`] (inside [`BasicInfo`]) |
//! | [`get_missing_values`] | all | [`MissingStats`] |
//! | [`get_numeric_summary`] | integer, float | [`NumericStats`] |
//! | [`get_categorical_summary`] | text | [`CategoricalStats`] |
//! | [`find_outliers`] | integer, float | [`OutlierStats`] |
//!
//! Nothing here fails. A statistic that cannot be computed for the given
//! data (no values, a single value for the standard deviation, non-finite
//! input) is reported as `None`, the "undefined" marker.
//!
//! Conventions:
//!
//! - Statistics use the non-missing, finite values of a column only.
//! - Standard deviation is the sample deviation (denominator `n - 1`).
//! - Median and quartiles use R-7 linear interpolation.
//! - The most frequent text value is the first one reached in row order
//!   among those with the highest count.
//! - Outliers fall strictly outside `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` and are
//!   reported as the list of offending values in row order.
//!
//! # Example
//!
//! ```
//! use u_profile::csv_parser::CsvParser;
//! use u_profile::stats::{get_missing_values, get_numeric_summary};
//!
//! let ds = CsvParser::new().parse_str("A,B\n1,a\n2,\nNA,c\n4,d\n").unwrap();
//!
//! let missing = get_missing_values(&ds);
//! assert_eq!(missing["A"].count, 1);
//! assert_eq!(missing["B"].percentage, 25.0);
//!
//! let numeric = get_numeric_summary(&ds);
//! assert_eq!(numeric["A"].median, Some(2.0));
//! assert!(numeric.get("B").is_none());
//! ```

use crate::dataset::{Column, DataType, Dataset};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Tukey fence multiplier.
const IQR_FENCE: f64 = 1.5;

// ── ColumnMap ─────────────────────────────────────────────────────────

/// Mapping from column name to a per-column result, in dataset order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> ColumnMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, value: T) {
        self.entries.push((name.to_string(), value));
    }

    /// Returns the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, value)` pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<T> Default for ColumnMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<&str> for ColumnMap<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if no entry exists for `name`.
    fn index(&self, name: &str) -> &T {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no entry for column '{name}'"),
        }
    }
}

impl<T> FromIterator<(String, T)> for ColumnMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for ColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ── Result types ──────────────────────────────────────────────────────

/// Shape, column order and declared types of a dataset.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BasicInfo {
    /// `(rows, columns)`.
    pub shape: (usize, usize),
    /// Column names in dataset order.
    pub columns: Vec<String>,
    /// Declared element type per column.
    pub dtypes: ColumnMap<DataType>,
}

impl BasicInfo {
    pub fn row_count(&self) -> usize {
        self.shape.0
    }

    pub fn column_count(&self) -> usize {
        self.shape.1
    }
}

/// Missing-entry count and share for one column.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MissingStats {
    /// Number of missing entries.
    pub count: usize,
    /// `100 · count / rows`; `0.0` for a dataset without rows.
    pub percentage: f64,
}

/// Central tendency and spread of a numeric column.
///
/// `None` marks a statistic that is undefined for the column's data.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation; undefined below two values.
    pub std: Option<f64>,
}

impl NumericStats {
    /// Every statistic undefined.
    pub const UNDEFINED: Self = Self {
        mean: None,
        median: None,
        min: None,
        max: None,
        std: None,
    };
}

/// Cardinality and mode of a text column.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoricalStats {
    /// Distinct non-missing values.
    pub unique_count: usize,
    /// Most frequent value; undefined when the column has no values.
    pub top_value: Option<String>,
    /// Occurrences of `top_value` (0 when undefined).
    pub top_count: usize,
}

/// IQR fences and the values falling outside them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OutlierStats {
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    /// Outlying values in row order.
    pub values: Vec<f64>,
}

impl OutlierStats {
    /// Number of outlying values.
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

pub type MissingInfo = ColumnMap<MissingStats>;
pub type NumericSummary = ColumnMap<NumericStats>;
pub type CategoricalSummary = ColumnMap<CategoricalStats>;
pub type OutlierInfo = ColumnMap<OutlierStats>;

// ── Entry points ──────────────────────────────────────────────────────

/// Shape, ordered column names and the declared type of every column.
pub fn get_basic_info(ds: &Dataset) -> BasicInfo {
    BasicInfo {
        shape: ds.shape(),
        columns: ds.column_names().to_vec(),
        dtypes: ds
            .iter()
            .map(|(name, col)| (name.to_string(), col.data_type()))
            .collect(),
    }
}

/// Missing-entry count and percentage for every column.
pub fn get_missing_values(ds: &Dataset) -> MissingInfo {
    let rows = ds.row_count();
    let mut out = ColumnMap::new();
    for (name, col) in ds.iter() {
        let count = col.null_count();
        let percentage = if rows > 0 {
            count as f64 / rows as f64 * 100.0
        } else {
            0.0
        };
        out.push(name, MissingStats { count, percentage });
    }
    out
}

/// Mean, median, min, max and sample standard deviation per numeric column.
pub fn get_numeric_summary(ds: &Dataset) -> NumericSummary {
    let mut out = ColumnMap::new();
    for (name, col) in ds.numeric_columns() {
        let values = col.valid_numeric_values().unwrap_or_default();
        out.push(name, numeric_stats(&values));
    }
    out
}

/// Distinct count and most frequent value per text column.
pub fn get_categorical_summary(ds: &Dataset) -> CategoricalSummary {
    let mut out = ColumnMap::new();
    for (name, col) in ds.text_columns() {
        out.push(name, categorical_stats(col));
    }
    out
}

/// IQR-rule outliers per numeric column.
pub fn find_outliers(ds: &Dataset) -> OutlierInfo {
    let mut out = ColumnMap::new();
    for (name, col) in ds.numeric_columns() {
        let values = col.valid_numeric_values().unwrap_or_default();
        out.push(name, outlier_stats(&values));
    }
    out
}

// ── Per-column helpers ────────────────────────────────────────────────

/// Summarizes present numeric values.
///
/// Non-finite values (`inf`, `-inf`) are skipped, so every statistic is
/// either a finite number or undefined.
pub fn numeric_stats(values: &[f64]) -> NumericStats {
    let finite = finite_values(values);
    if finite.is_empty() {
        return NumericStats::UNDEFINED;
    }
    let std = if finite.len() < 2 {
        None
    } else {
        u_numflow::stats::std_dev(&finite)
    };
    NumericStats {
        mean: u_numflow::stats::mean(&finite),
        median: u_numflow::stats::median(&finite),
        min: u_numflow::stats::min(&finite),
        max: u_numflow::stats::max(&finite),
        std,
    }
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Distinct count and mode of a text column; other column types yield an
/// empty summary.
pub fn categorical_stats(col: &Column) -> CategoricalStats {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut freq: HashMap<&str, usize> = HashMap::new();

    for idx in col.validity().valid_indices() {
        let Some(value) = col.text_at(idx) else {
            continue;
        };
        let count = freq.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut top: Option<(&str, usize)> = None;
    for value in first_seen {
        let count = freq[value];
        if top.map_or(true, |(_, best)| count > best) {
            top = Some((value, count));
        }
    }

    CategoricalStats {
        unique_count: freq.len(),
        top_value: top.map(|(v, _)| v.to_string()),
        top_count: top.map_or(0, |(_, c)| c),
    }
}

/// Applies the IQR rule to present numeric values.
///
/// Non-finite values take no part in the fences and are never reported.
pub fn outlier_stats(values: &[f64]) -> OutlierStats {
    let finite = finite_values(values);

    let (Some(q1), Some(q3)) = (
        u_numflow::stats::quantile(&finite, 0.25),
        u_numflow::stats::quantile(&finite, 0.75),
    ) else {
        return OutlierStats {
            q1: None,
            q3: None,
            iqr: None,
            lower_bound: None,
            upper_bound: None,
            values: Vec::new(),
        };
    };

    let iqr = q3 - q1;
    let lower = q1 - IQR_FENCE * iqr;
    let upper = q3 + IQR_FENCE * iqr;

    OutlierStats {
        q1: Some(q1),
        q3: Some(q3),
        iqr: Some(iqr),
        lower_bound: Some(lower),
        upper_bound: Some(upper),
        values: finite
            .into_iter()
            .filter(|&v| v < lower || v > upper)
            .collect(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    /// `{A: [1, 2, None, 4], B: ["a", None, "c", "d"], C: [10.5, 20.3, 30.1, None]}`
    fn sample() -> Dataset {
        Dataset::new()
            .with_column("A", Column::from_i64s(vec![Some(1), Some(2), None, Some(4)]))
            .and_then(|d| d.with_column("B", Column::from_strs(vec![Some("a"), None, Some("c"), Some("d")])))
            .and_then(|d| {
                d.with_column(
                    "C",
                    Column::from_f64s(vec![Some(10.5), Some(20.3), Some(30.1), None]),
                )
            })
            .expect("sample dataset")
    }

    fn single(name: &str, col: Column) -> Dataset {
        Dataset::new().with_column(name, col).expect("dataset")
    }

    // ── ColumnMap ────────────────────────────────────────────────

    #[test]
    fn column_map_keeps_order() {
        let map: ColumnMap<u8> = vec![("z".to_string(), 1), ("a".to_string(), 2)]
            .into_iter()
            .collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(map["a"], 2);
        assert!(map.contains("z"));
        assert!(map.get("q").is_none());
        assert_eq!(
            serde_json::to_string(&map).expect("json"),
            r#"{"z":1,"a":2}"#
        );
    }

    #[test]
    #[should_panic(expected = "no entry for column 'q'")]
    fn column_map_index_panics_on_unknown() {
        let map: ColumnMap<u8> = ColumnMap::new();
        let _ = map["q"];
    }

    // ── Basic info ───────────────────────────────────────────────

    #[test]
    fn basic_info_shape_columns_dtypes() {
        let info = get_basic_info(&sample());
        assert_eq!(info.shape, (4, 3));
        assert_eq!(info.columns, vec!["A", "B", "C"]);
        assert_eq!(info.dtypes["A"], DataType::Integer);
        assert_eq!(info.dtypes["B"], DataType::Text);
        assert_eq!(info.dtypes["C"], DataType::Float);
    }

    #[test]
    fn basic_info_empty_dataset() {
        let info = get_basic_info(&Dataset::new());
        assert_eq!(info.shape, (0, 0));
        assert!(info.columns.is_empty());
        assert!(info.dtypes.is_empty());
    }

    // ── Missing values ───────────────────────────────────────────

    #[test]
    fn missing_counts_and_percentages() {
        let missing = get_missing_values(&sample());
        for col in ["A", "B", "C"] {
            assert_eq!(missing[col].count, 1);
            assert_eq!(missing[col].percentage, 25.0);
        }
    }

    #[test]
    fn missing_one_in_three() {
        let ds = single("A", Column::from_i64s(vec![Some(1), None, Some(3)]));
        let m = get_missing_values(&ds);
        assert!((m["A"].percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn missing_none() {
        let ds = single("A", Column::from_i64s(vec![Some(1), Some(2), Some(3)]));
        let m = get_missing_values(&ds);
        assert_eq!(m["A"], MissingStats { count: 0, percentage: 0.0 });
    }

    #[test]
    fn missing_zero_rows_is_zero_percent() {
        let ds = single("A", Column::from_f64s(Vec::new()));
        let m = get_missing_values(&ds);
        assert_eq!(m["A"], MissingStats { count: 0, percentage: 0.0 });
    }

    #[test]
    fn missing_all_null_is_hundred_percent() {
        let ds = single("A", Column::from_strs(vec![None, None]));
        assert_eq!(get_missing_values(&ds)["A"].percentage, 100.0);
    }

    // ── Numeric summary ──────────────────────────────────────────

    #[test]
    fn numeric_skips_missing() {
        let summary = get_numeric_summary(&sample());
        assert_eq!(summary.keys().collect::<Vec<_>>(), vec!["A", "C"]);
        let a = summary["A"];
        assert!(approx(a.mean, 7.0 / 3.0));
        assert_eq!(a.median, Some(2.0));
        assert_eq!(a.min, Some(1.0));
        assert_eq!(a.max, Some(4.0));
    }

    #[test]
    fn numeric_one_to_five() {
        let ds = single("A", Column::from_i64s((1..=5).map(Some).collect()));
        let a = get_numeric_summary(&ds)["A"];
        assert_eq!(a.mean, Some(3.0));
        assert_eq!(a.median, Some(3.0));
        assert_eq!(a.min, Some(1.0));
        assert_eq!(a.max, Some(5.0));
        assert!(approx(a.std, 2.5f64.sqrt()));
    }

    #[test]
    fn numeric_even_count_interpolates_median() {
        let ds = single("A", Column::from_f64s(vec![Some(4.0), Some(1.0), Some(3.0), Some(2.0)]));
        assert_eq!(get_numeric_summary(&ds)["A"].median, Some(2.5));
    }

    #[test]
    fn numeric_empty_column_is_undefined() {
        let ds = single("A", Column::from_f64s(Vec::new()));
        assert_eq!(get_numeric_summary(&ds)["A"], NumericStats::UNDEFINED);
    }

    #[test]
    fn numeric_all_missing_is_undefined() {
        let ds = single("A", Column::from_f64s(vec![None, None, None]));
        assert_eq!(get_numeric_summary(&ds)["A"], NumericStats::UNDEFINED);
    }

    #[test]
    fn numeric_single_value() {
        let ds = single("A", Column::from_f64s(vec![Some(7.5)]));
        let a = get_numeric_summary(&ds)["A"];
        assert_eq!(a.mean, Some(7.5));
        assert_eq!(a.median, Some(7.5));
        assert_eq!(a.min, Some(7.5));
        assert_eq!(a.max, Some(7.5));
        assert_eq!(a.std, None);
    }

    #[test]
    fn numeric_skips_infinite_values() {
        let ds = single(
            "x",
            Column::from_f64s(vec![Some(1.0), Some(2.0), Some(f64::INFINITY)]),
        );
        let x = get_numeric_summary(&ds)["x"];
        assert_eq!(x.mean, Some(1.5));
        assert_eq!(x.median, Some(1.5));
        assert_eq!(x.min, Some(1.0));
        assert_eq!(x.max, Some(2.0));
        assert!(approx(x.std, 0.5f64.sqrt()));
    }

    #[test]
    fn numeric_only_infinite_is_undefined() {
        let ds = single(
            "x",
            Column::from_f64s(vec![Some(f64::INFINITY), Some(f64::NEG_INFINITY)]),
        );
        assert_eq!(get_numeric_summary(&ds)["x"], NumericStats::UNDEFINED);

        let one = numeric_stats(&[1.0, f64::INFINITY]);
        assert_eq!(one.median, Some(1.0));
        assert_eq!(one.max, Some(1.0));
        assert_eq!(one.std, None);
    }

    #[test]
    fn numeric_excludes_text_and_boolean() {
        let ds = single("B", Column::from_bools(vec![Some(true), Some(false)]));
        assert!(get_numeric_summary(&ds).is_empty());
        assert!(get_categorical_summary(&ds).is_empty());
    }

    // ── Categorical summary ──────────────────────────────────────

    #[test]
    fn categorical_mode() {
        let ds = single(
            "B",
            Column::from_strs(["a", "b", "a", "c", "b", "a"].into_iter().map(Some).collect()),
        );
        let summary = get_categorical_summary(&ds);
        let b = &summary["B"];
        assert_eq!(b.unique_count, 3);
        assert_eq!(b.top_value.as_deref(), Some("a"));
        assert_eq!(b.top_count, 3);
    }

    #[test]
    fn categorical_all_unique() {
        let ds = single(
            "B",
            Column::from_strs(["a", "b", "c", "d"].into_iter().map(Some).collect()),
        );
        let summary = get_categorical_summary(&ds);
        let b = &summary["B"];
        assert_eq!(b.unique_count, 4);
        assert_eq!(b.top_count, 1);
        assert!(["a", "b", "c", "d"].contains(&b.top_value.as_deref().unwrap_or("")));
    }

    #[test]
    fn categorical_tie_goes_to_first_seen() {
        let ds = single(
            "B",
            Column::from_strs(["y", "x", "x", "y", "z"].into_iter().map(Some).collect()),
        );
        let summary = get_categorical_summary(&ds);
        let b = &summary["B"];
        assert_eq!(b.top_value.as_deref(), Some("y"));
        assert_eq!(b.top_count, 2);
    }

    #[test]
    fn categorical_nulls_excluded() {
        let summary = get_categorical_summary(&sample());
        let b = &summary["B"];
        assert_eq!(b.unique_count, 3);
        assert_eq!(b.top_value.as_deref(), Some("a"));
        assert_eq!(b.top_count, 1);
    }

    #[test]
    fn categorical_all_null_is_undefined() {
        let ds = single("B", Column::from_strs(vec![None, None]));
        let summary = get_categorical_summary(&ds);
        let b = &summary["B"];
        assert_eq!(b.unique_count, 0);
        assert_eq!(b.top_value, None);
        assert_eq!(b.top_count, 0);
    }

    // ── Outliers ─────────────────────────────────────────────────

    #[test]
    fn outliers_detected() {
        let ds = single("A", Column::from_i64s(vec![Some(1), Some(2), Some(3), Some(4), Some(100)]));
        let outliers = find_outliers(&ds);
        let a = &outliers["A"];
        assert_eq!(a.q1, Some(2.0));
        assert_eq!(a.q3, Some(4.0));
        assert_eq!(a.iqr, Some(2.0));
        assert_eq!(a.lower_bound, Some(-1.0));
        assert_eq!(a.upper_bound, Some(7.0));
        assert_eq!(a.values, vec![100.0]);
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn outliers_none() {
        let ds = single("A", Column::from_i64s((1..=5).map(Some).collect()));
        let outliers = find_outliers(&ds);
        let a = &outliers["A"];
        assert!(a.values.is_empty());
        assert_eq!(a.count(), 0);
    }

    #[test]
    fn outliers_both_sides_in_row_order() {
        let values = vec![50.0, 10.0, 11.0, 12.0, 13.0, 14.0, -40.0];
        let a = outlier_stats(&values);
        assert_eq!(a.values, vec![50.0, -40.0]);
    }

    #[test]
    fn outliers_on_fence_not_reported() {
        // Q1 = 2, Q3 = 4, upper fence = 7
        let a = outlier_stats(&[1.0, 2.0, 3.0, 4.0, 7.0]);
        assert_eq!(a.upper_bound, Some(7.0));
        assert!(a.values.is_empty());
    }

    #[test]
    fn outliers_empty_column() {
        let a = outlier_stats(&[]);
        assert_eq!(a.q1, None);
        assert_eq!(a.lower_bound, None);
        assert!(a.values.is_empty());
    }

    #[test]
    fn outliers_constant_column() {
        let a = outlier_stats(&[5.0; 6]);
        assert_eq!(a.iqr, Some(0.0));
        assert!(a.values.is_empty());
    }

    #[test]
    fn outliers_cover_numeric_columns_only() {
        let out = find_outliers(&sample());
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    // ── Purity ───────────────────────────────────────────────────

    #[test]
    fn repeated_calls_are_identical() {
        let ds = sample();
        let before = ds.clone();
        assert_eq!(get_basic_info(&ds), get_basic_info(&ds));
        assert_eq!(get_missing_values(&ds), get_missing_values(&ds));
        assert_eq!(get_numeric_summary(&ds), get_numeric_summary(&ds));
        assert_eq!(get_categorical_summary(&ds), get_categorical_summary(&ds));
        assert_eq!(find_outliers(&ds), find_outliers(&ds));
        assert_eq!(ds, before);
    }
}
