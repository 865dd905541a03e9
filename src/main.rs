use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;

use u_profile::charts::{self, BarChart, BinMethod, Bins, Heatmap, Histogram, ScatterPlot};
use u_profile::csv_parser::{CsvParser, DEFAULT_NULL_MARKERS};
use u_profile::dataset::Dataset;
use u_profile::report::{self, Report, ReportConfig};

/// Loads a CSV file and prints a profiling report: shape and column types,
/// missing values, numeric and categorical summaries, and optionally IQR
/// outliers and chart data.
#[derive(Parser, Debug)]
#[command(name = "u-profile", version)]
struct Args {
    /// CSV file to profile; `-` reads standard input
    input: PathBuf,

    /// Field delimiter (a single byte)
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Treat the first row as data and name columns col_0, col_1, ...
    #[arg(long, default_value_t = false)]
    no_header: bool,

    /// Cell value read as missing; repeat to replace the default markers
    #[arg(long = "null-marker", value_name = "MARKER")]
    null_markers: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Rows shown in the overview table
    #[arg(long, default_value_t = 5)]
    head: usize,

    /// Report IQR outliers for every numeric column
    #[arg(long, default_value_t = false)]
    outliers: bool,

    /// Histogram of a numeric column
    #[arg(long, value_name = "COLUMN")]
    histogram: Option<String>,

    /// Histogram bins: a count up to 10000, or one of sturges, scott, fd
    #[arg(long, value_parser = parse_bins, default_value = "30")]
    bins: Bins,

    /// Bar chart of a categorical column
    #[arg(long, value_name = "COLUMN")]
    bar: Option<String>,

    /// Bars shown in the bar chart
    #[arg(long, default_value_t = charts::DEFAULT_BAR_LIMIT)]
    top: usize,

    /// Scatter plot of two numeric columns, given as X,Y
    #[arg(long, value_name = "X,Y")]
    scatter: Option<String>,

    /// Correlation heatmap of all numeric columns
    #[arg(long, default_value_t = false)]
    heatmap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_bins(s: &str) -> std::result::Result<Bins, String> {
    match s.to_ascii_lowercase().as_str() {
        "sturges" => Ok(Bins::Rule(BinMethod::Sturges)),
        "scott" => Ok(Bins::Rule(BinMethod::Scott)),
        "fd" | "freedman-diaconis" => Ok(Bins::Rule(BinMethod::FreedmanDiaconis)),
        other => match other.parse::<usize>() {
            Ok(0) => Err("bin count must be at least 1".to_string()),
            Ok(n) if n > charts::MAX_BINS => Err(format!(
                "bin count must be at most {}, got {n}",
                charts::MAX_BINS
            )),
            Ok(n) => Ok(Bins::Count(n)),
            Err(_) => Err(format!(
                "expected a bin count or one of sturges, scott, fd; got '{s}'"
            )),
        },
    }
}

fn split_pair(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once(',') {
        Some((x, y)) if !x.is_empty() && !y.is_empty() => Ok((x, y)),
        _ => bail!("--scatter expects two column names as X,Y, got '{spec}'"),
    }
}

#[derive(Debug, Default, Serialize)]
struct Charts {
    #[serde(skip_serializing_if = "Option::is_none")]
    histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bar_chart: Option<BarChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scatter_plot: Option<ScatterPlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    heatmap: Option<Heatmap>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a Report,
    #[serde(flatten)]
    charts: &'a Charts,
}

fn load(args: &Args) -> Result<Dataset> {
    if !args.delimiter.is_ascii() {
        bail!("--delimiter must be a single ASCII character");
    }
    let mut parser = CsvParser::new()
        .delimiter(args.delimiter as u8)
        .has_header(!args.no_header);
    if !args.null_markers.is_empty() {
        parser = parser.null_markers(args.null_markers.clone());
    }

    if args.input.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("reading standard input")?;
        return parser.parse_bytes(bytes).context("parsing standard input");
    }
    parser
        .parse_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))
}

fn build_charts(ds: &Dataset, args: &Args) -> Result<Charts> {
    let mut out = Charts::default();
    if let Some(col) = &args.histogram {
        out.histogram =
            Some(charts::histogram(ds, col, args.bins).context("building histogram")?);
    }
    if let Some(col) = &args.bar {
        out.bar_chart = Some(charts::bar_chart(ds, col, args.top).context("building bar chart")?);
    }
    if let Some(pair) = &args.scatter {
        let (x, y) = split_pair(pair)?;
        out.scatter_plot =
            Some(charts::scatter_plot(ds, x, y).context("building scatter plot")?);
    }
    if args.heatmap {
        out.heatmap = Some(charts::correlation_heatmap(ds));
    }
    Ok(out)
}

fn print_text(report: &Report, charts: &Charts) {
    print!("{report}");
    if let Some(h) = &charts.histogram {
        print!("\n{}", report::render_histogram(h));
    }
    if let Some(b) = &charts.bar_chart {
        print!("\n{}", report::render_bar_chart(b));
    }
    if let Some(s) = &charts.scatter_plot {
        print!("\n{}", report::render_scatter(s));
    }
    if let Some(h) = &charts.heatmap {
        print!("\n{}", report::render_heatmap(h));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.null_markers.is_empty() {
        log::debug!("using {} default null markers", DEFAULT_NULL_MARKERS.len());
    }

    let ds = load(&args)?;
    info!(
        "loaded {}: {} rows x {} columns",
        args.input.display(),
        ds.row_count(),
        ds.column_count()
    );

    let config = ReportConfig {
        preview_rows: args.head,
        outliers: args.outliers,
        ..ReportConfig::default()
    };
    let report = Report::build(&ds, &config);
    let charts = build_charts(&ds, &args)?;

    match args.format {
        Format::Text => print_text(&report, &charts),
        Format::Json => {
            let json = serde_json::to_string_pretty(&JsonOutput {
                report: &report,
                charts: &charts,
            })
            .context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
