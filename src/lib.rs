//! # u-profile
//!
//! Descriptive statistics and data profiling for tabular CSV uploads.
//!
//! u-profile loads a CSV file into a typed, column-major [`Dataset`] and
//! summarizes it the way an exploratory data analysis session would:
//!
//! - **Profiling**: shape and column types, missing values, numeric and
//!   categorical summaries, IQR outliers. Never fails; statistics that
//!   cannot be computed are reported as undefined.
//! - **Charts**: plot-ready data for histograms, bar charts, scatter plots
//!   and correlation heatmaps.
//!
//! ## Modules
//!
//! - [`dataset`]: Column-major tabular data model (Dataset, Column, DataType)
//! - [`csv_parser`]: CSV parsing with null markers and type inference
//! - [`stats`]: Basic info, missing values, numeric/categorical summaries, outliers
//! - [`charts`]: Histogram, bar chart, scatter plot and heatmap data
//! - [`report`]: Plain-text and JSON rendering
//! - [`error`]: Error types
//!
//! ## Quick Start
//!
//! ```
//! use u_profile::csv_parser::CsvParser;
//! use u_profile::dataset::DataType;
//! use u_profile::stats;
//!
//! let csv = "A,B,C\n1,a,10.5\n2,,20.3\nNA,c,30.1\n4,d,\n";
//! let ds = CsvParser::new().parse_str(csv).unwrap();
//!
//! let info = stats::get_basic_info(&ds);
//! assert_eq!(info.shape, (4, 3));
//! assert_eq!(info.dtypes["A"], DataType::Integer);
//! assert_eq!(info.dtypes["B"], DataType::Text);
//!
//! let missing = stats::get_missing_values(&ds);
//! assert_eq!(missing["C"].percentage, 25.0);
//!
//! let numeric = stats::get_numeric_summary(&ds);
//! assert_eq!(numeric["A"].median, Some(2.0));
//!
//! let categorical = stats::get_categorical_summary(&ds);
//! assert_eq!(categorical["B"].unique_count, 3);
//!
//! // yes/no answers are labels, not booleans
//! let answers = CsvParser::new().parse_str("smoker\nyes\nno\nyes\n").unwrap();
//! let categorical = stats::get_categorical_summary(&answers);
//! assert_eq!(categorical["smoker"].unique_count, 2);
//! assert_eq!(categorical["smoker"].top_value.as_deref(), Some("yes"));
//! ```

pub mod charts;
pub mod csv_parser;
pub mod dataset;
pub mod error;
pub mod report;
pub mod stats;

pub use dataset::{Column, DataType, Dataset};
pub use error::{ProfileError, Result};
