//! Integration tests for u-profile: CSV text in, summaries and reports out.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use u_profile::charts::{self, Bins};
use u_profile::csv_parser::CsvParser;
use u_profile::report::{Report, ReportConfig};
use u_profile::stats::{
    find_outliers, get_basic_info, get_categorical_summary, get_missing_values,
    get_numeric_summary, NumericStats,
};
use u_profile::{DataType, ProfileError};

const SAMPLE: &str = "A,B,C\n1,a,10.5\n2,,20.3\nNA,c,30.1\n4,d,\n";

fn load(csv: &str) -> u_profile::Dataset {
    CsvParser::new().parse_str(csv).unwrap()
}

#[test]
fn upload_to_summaries() {
    let ds = load(SAMPLE);

    let info = get_basic_info(&ds);
    assert_eq!(info.shape, (4, 3));
    assert_eq!(info.columns, vec!["A", "B", "C"]);
    assert_eq!(info.dtypes["A"], DataType::Integer);
    assert_eq!(info.dtypes["B"], DataType::Text);
    assert_eq!(info.dtypes["C"], DataType::Float);

    let missing = get_missing_values(&ds);
    for col in ["A", "B", "C"] {
        assert_eq!(missing[col].count, 1);
        assert_eq!(missing[col].percentage, 25.0);
    }

    let numeric = get_numeric_summary(&ds);
    assert_eq!(numeric.keys().collect::<Vec<_>>(), vec!["A", "C"]);
    assert!((numeric["A"].mean.unwrap() - 7.0 / 3.0).abs() < 1e-9);
    assert_eq!(numeric["A"].median, Some(2.0));
    assert_eq!(numeric["C"].min, Some(10.5));
    assert_eq!(numeric["C"].max, Some(30.1));

    let categorical = get_categorical_summary(&ds);
    assert_eq!(categorical.keys().collect::<Vec<_>>(), vec!["B"]);
    assert_eq!(categorical["B"].unique_count, 3);
    assert_eq!(categorical["B"].top_value.as_deref(), Some("a"));
    assert_eq!(categorical["B"].top_count, 1);
}

#[test]
fn upload_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let ds = CsvParser::new().parse_file(file.path()).unwrap();
    assert_eq!(ds.shape(), (4, 3));
}

#[test]
fn semicolon_upload_with_custom_markers() {
    let ds = CsvParser::new()
        .delimiter(b';')
        .null_markers(vec!["?".to_string()])
        .parse_str("x;y\n1;?\n?;NA\n3;b\n")
        .unwrap();
    let missing = get_missing_values(&ds);
    assert_eq!(missing["x"].count, 1);
    assert_eq!(missing["y"].count, 1);
    // "NA" is an ordinary label once the markers are replaced
    let categorical = get_categorical_summary(&ds);
    assert_eq!(categorical["y"].unique_count, 2);
}

#[test]
fn malformed_upload_reports_line() {
    let err = CsvParser::new().parse_str("a,b\n1,2\n3\n").unwrap_err();
    match err {
        ProfileError::CsvParse { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_row_std_undefined() {
    let ds = load("v\n42\n");
    let v = get_numeric_summary(&ds)["v"];
    assert_eq!(v.mean, Some(42.0));
    assert_eq!(v.std, None);
}

#[test]
fn all_missing_column_undefined() {
    let ds = load("v,w\nNA,1\n,2\n");
    assert_eq!(get_numeric_summary(&ds)["v"], NumericStats::UNDEFINED);
    assert_eq!(get_missing_values(&ds)["v"].percentage, 100.0);
}

#[test]
fn header_only_upload() {
    let ds = load("a,b\n");
    let info = get_basic_info(&ds);
    assert_eq!(info.shape, (0, 2));
    let missing = get_missing_values(&ds);
    assert_eq!(missing["a"].count, 0);
    assert_eq!(missing["a"].percentage, 0.0);
}

#[test]
fn outliers_end_to_end() {
    let ds = load("A\n1\n2\n3\n4\n100\n");
    let outliers = find_outliers(&ds);
    assert_eq!(outliers["A"].values, vec![100.0]);
    assert_eq!(outliers["A"].lower_bound, Some(-1.0));
    assert_eq!(outliers["A"].upper_bound, Some(7.0));

    let calm = load("A\n1\n2\n3\n4\n5\n");
    assert_eq!(find_outliers(&calm)["A"].count(), 0);
}

#[test]
fn charts_end_to_end() {
    let ds = load("x,y,c\n1,10,red\n2,20,blue\n3,30,red\nNA,40,red\n");

    let h = charts::histogram(&ds, "x", Bins::Count(2)).unwrap();
    assert_eq!(h.counts.iter().sum::<usize>(), 3);

    let bar = charts::bar_chart(&ds, "c", 10).unwrap();
    assert_eq!(bar.labels, vec!["red", "blue"]);
    assert_eq!(bar.counts, vec![3, 1]);

    let scatter = charts::scatter_plot(&ds, "x", "y").unwrap();
    assert_eq!(scatter.points, vec![(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]);

    let heatmap = charts::correlation_heatmap(&ds);
    assert_eq!(heatmap.columns, vec!["x", "y"]);
    assert!((heatmap.get(0, 1).unwrap() - 1.0).abs() < 1e-9);

    assert!(matches!(
        charts::histogram(&ds, "c", Bins::default()),
        Err(ProfileError::NonNumericColumn { .. })
    ));
    assert!(matches!(
        charts::scatter_plot(&ds, "x", "nope"),
        Err(ProfileError::ColumnNotFound { .. })
    ));
}

#[test]
fn report_text_and_json() {
    let ds = load(SAMPLE);
    let config = ReportConfig {
        outliers: true,
        ..ReportConfig::default()
    };
    let report = Report::build(&ds, &config);

    let text = report.render_text();
    for section in [
        "Dataset Overview",
        "Basic Information",
        "Missing Values",
        "Numeric Summary",
        "Categorical Summary",
        "Outliers (IQR)",
    ] {
        assert!(text.contains(section), "missing section {section}");
    }
    assert!(text.contains("- C: 1 missing (25.00%)"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    let keys: Vec<&str> = json["numeric_summary"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 2);
    assert!(json["numeric_summary"]["A"]["std"].is_number());
}

#[test]
fn infinite_cells_never_reach_the_summary() {
    let ds = load("x\n1\n2\ninf\n");
    let x = get_numeric_summary(&ds)["x"];
    assert_eq!(x.max, Some(2.0));
    assert_eq!(x.median, Some(1.5));
    assert_eq!(x.mean, Some(1.5));
    assert!(x.std.is_some());

    let ds = load("x\n1\nInfinity\n");
    let x = get_numeric_summary(&ds)["x"];
    assert_eq!(x.median, Some(1.0));
    assert_eq!(x.max, Some(1.0));
    assert_eq!(x.std, None);

    let text = Report::build(&ds, &ReportConfig::default()).render_text();
    assert!(text.contains("- x: Mean=1, Median=1, Min=1, Max=1, Std=undefined"));
}

#[test]
fn yes_no_column_is_categorical() {
    let ds = load("smoker\nyes\nno\nyes\n");
    assert_eq!(get_basic_info(&ds).dtypes["smoker"], DataType::Text);
    let categorical = get_categorical_summary(&ds);
    assert_eq!(categorical["smoker"].unique_count, 2);
    assert_eq!(categorical["smoker"].top_value.as_deref(), Some("yes"));
    assert_eq!(categorical["smoker"].top_count, 2);
}
