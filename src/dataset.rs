//! Column-major dataset for uploaded tabular data.
//!
//! A [`Dataset`] is an ordered set of named, typed columns of equal length.
//! Missing entries are tracked by a compact [`ValidityBitmap`] per column.
//!
//! # Column Types
//!
//! | Type | Storage | Summaries |
//! |------|---------|-----------|
//! | [`Integer`](DataType::Integer) | `Vec<f64>` + bitmap | numeric, outliers |
//! | [`Float`](DataType::Float) | `Vec<f64>` + bitmap | numeric, outliers |
//! | [`Boolean`](DataType::Boolean) | `Vec<bool>` + bitmap | missing values only |
//! | [`Text`](DataType::Text) | `Vec<String>` + bitmap | categorical |
//!
//! # Example
//!
//! ```
//! use u_profile::dataset::{Column, Dataset};
//!
//! let mut ds = Dataset::new();
//! ds.add_column("age", Column::from_i64s(vec![Some(31), None, Some(45)])).unwrap();
//! ds.add_column("city", Column::from_strs(vec![Some("Oslo"), Some("Rome"), None])).unwrap();
//! assert_eq!(ds.row_count(), 3);
//! assert_eq!(ds.column_count(), 2);
//! ```

use crate::error::{ProfileError, Result};
use serde::Serialize;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap, one bit per row.
///
/// A set bit marks a present value; a cleared bit marks a missing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates an empty bitmap with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Builds a bitmap from per-row presence flags.
    pub fn from_flags<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        let mut bitmap = Self::empty();
        for valid in flags {
            bitmap.push(valid);
        }
        bitmap
    }

    /// Returns `true` if the value at `idx` is present.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Appends a new position.
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        if idx / 64 >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    /// Returns the number of tracked rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap tracks zero rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts missing positions.
    pub fn null_count(&self) -> usize {
        self.len - self.valid_count()
    }

    /// Counts present positions.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns an iterator over indices of present positions, ascending.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_valid(i))
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Declared element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Whole numbers (stored as `f64`).
    Integer,
    /// Floating-point numbers.
    Float,
    /// True/false values.
    Boolean,
    /// Free-form strings.
    Text,
}

impl DataType {
    /// Type name as reported in basic info.
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }

    /// Integer and float columns are numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn is_text(self) -> bool {
        self == Self::Text
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// Storage flavour of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// A typed column with a validity bitmap.
///
/// Missing positions hold a placeholder (`0.0`, `false`, or an empty
/// string) that must be ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Integer or float values.
    Numeric {
        kind: NumericKind,
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    /// Boolean values.
    Boolean {
        values: Vec<bool>,
        validity: ValidityBitmap,
    },
    /// String values.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates a numeric column from dense values and a bitmap.
    pub fn numeric(kind: NumericKind, values: Vec<f64>, validity: ValidityBitmap) -> Self {
        debug_assert_eq!(values.len(), validity.len());
        Self::Numeric {
            kind,
            values,
            validity,
        }
    }

    /// Creates a boolean column from dense values and a bitmap.
    pub fn boolean(values: Vec<bool>, validity: ValidityBitmap) -> Self {
        debug_assert_eq!(values.len(), validity.len());
        Self::Boolean { values, validity }
    }

    /// Creates a text column from dense values and a bitmap.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        debug_assert_eq!(values.len(), validity.len());
        Self::Text { values, validity }
    }

    /// Float column from optional values; `None` is missing.
    pub fn from_f64s(values: Vec<Option<f64>>) -> Self {
        let validity = ValidityBitmap::from_flags(values.iter().map(Option::is_some));
        let dense = values.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        Self::numeric(NumericKind::Float, dense, validity)
    }

    /// Integer column from optional values; `None` is missing.
    pub fn from_i64s(values: Vec<Option<i64>>) -> Self {
        let validity = ValidityBitmap::from_flags(values.iter().map(Option::is_some));
        let dense = values
            .into_iter()
            .map(|v| v.map_or(0.0, |x| x as f64))
            .collect();
        Self::numeric(NumericKind::Integer, dense, validity)
    }

    /// Boolean column from optional values; `None` is missing.
    pub fn from_bools(values: Vec<Option<bool>>) -> Self {
        let validity = ValidityBitmap::from_flags(values.iter().map(Option::is_some));
        let dense = values.into_iter().map(Option::unwrap_or_default).collect();
        Self::boolean(dense, validity)
    }

    /// Text column from optional values; `None` is missing.
    pub fn from_strs(values: Vec<Option<&str>>) -> Self {
        let validity = ValidityBitmap::from_flags(values.iter().map(Option::is_some));
        let dense = values
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        Self::text(dense, validity)
    }

    /// Returns the declared element type.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric {
                kind: NumericKind::Integer,
                ..
            } => DataType::Integer,
            Self::Numeric {
                kind: NumericKind::Float,
                ..
            } => DataType::Float,
            Self::Boolean { .. } => DataType::Boolean,
            Self::Text { .. } => DataType::Text,
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. }
            | Self::Boolean { validity, .. }
            | Self::Text { validity, .. } => validity,
        }
    }

    /// Number of missing entries.
    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    /// Number of present entries.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Present numeric values in row order, or `None` for non-numeric columns.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric {
                values, validity, ..
            } => Some(validity.valid_indices().map(|i| values[i]).collect()),
            _ => None,
        }
    }

    /// Numeric value at `idx`, `None` when missing or not numeric.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric {
                values, validity, ..
            } if validity.is_valid(idx) => Some(values[idx]),
            _ => None,
        }
    }

    /// Text value at `idx`, `None` when missing or not text.
    pub fn text_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Text { values, validity } if validity.is_valid(idx) => Some(&values[idx]),
            _ => None,
        }
    }

    /// Row value rendered as a label, for text and boolean columns.
    ///
    /// Returns `None` when the entry is missing or the column is numeric.
    pub fn label_at(&self, idx: usize) -> Option<String> {
        match self {
            Self::Text { .. } => self.text_at(idx).map(str::to_string),
            Self::Boolean { values, validity } if validity.is_valid(idx) => {
                Some(values[idx].to_string())
            }
            _ => None,
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────────────

/// Ordered collection of named columns with a shared row count.
///
/// Summaries only ever borrow a dataset; nothing in this crate mutates
/// one after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Creates an empty dataset (0 rows, 0 columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(ProfileError::DuplicateColumn { name });
        }
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(ProfileError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder form of [`add_column`](Self::add_column).
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.add_column(name, column)?;
        Ok(self)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    /// Returns `true` if the dataset has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Looks up a column, failing with [`ProfileError::ColumnNotFound`].
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column_by_name(name)
            .ok_or_else(|| ProfileError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Iterates `(name, column)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Iterates numeric columns only.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.iter().filter(|(_, c)| c.data_type().is_numeric())
    }

    /// Iterates text columns only.
    pub fn text_columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.iter().filter(|(_, c)| c.data_type().is_text())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
