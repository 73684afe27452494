//! CLI entry point for the attendance dashboard pipeline.
//!
//! Provides subcommands for building the dashboard report (written locally or
//! uploaded to S3), exporting summary, ranking and cleaned tables as CSV, and
//! inspecting per-employee details and filter options.

use anyhow::{Result, bail};
use attendance_dashboard::analyzers::aggregate::{Filters, aggregate, filter_options};
use attendance_dashboard::analyzers::calendar::{format_date, format_month};
use attendance_dashboard::analyzers::detail::detail;
use attendance_dashboard::analyzers::rank::rank;
use attendance_dashboard::analyzers::report::{Dataset, DashboardReport, build_report};
use attendance_dashboard::analyzers::types::{Category, MonthPeriod};
use attendance_dashboard::analyzers::utility::format_total;
use attendance_dashboard::analyzers::writetos3::write_json_to_s3;
use attendance_dashboard::config::DashboardConfig;
use attendance_dashboard::output::{
    create_file, write_cleaned_csv, write_json_file, write_ranking_csv, write_summary_csv,
};
use attendance_dashboard::source::{SourceError, load_table};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_SOURCE: &str = "attendances.xlsx";

#[derive(Parser)]
#[command(name = "attendance_dashboard")]
#[command(
    about = "Attendance exception reporting: leave, absence, tardiness and vacation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file with column names, labels and calendar settings
    #[arg(long, global = true)]
    config: Option<String>,

    /// Built-in config used when no file is given (english or thai)
    #[arg(long, global = true, default_value = "english")]
    preset: String,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Path or URL of the attendance spreadsheet (CSV or Excel).
    /// Defaults to $ATTENDANCE_SOURCE, then attendances.xlsx
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: Option<String>,
}

impl SourceArgs {
    fn resolve(&self) -> String {
        self.source
            .clone()
            .or_else(|| std::env::var("ATTENDANCE_SOURCE").ok())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
    }
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Year as displayed (era-shifted when the calendar has an offset)
    #[arg(long)]
    year: Option<i32>,

    /// Month in YYYY-MM form
    #[arg(long)]
    month: Option<MonthPeriod>,

    /// Department name
    #[arg(long)]
    department: Option<String>,

    /// Employee full name
    #[arg(long)]
    employee: Option<String>,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Filters {
            year: args.year,
            month: args.month,
            department: args.department,
            employee_name: args.employee,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dashboard report JSON for a filter selection
    Report {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// JSON file to write the report to
        #[arg(short, long, default_value = "report.json")]
        output: String,

        /// Optional: S3 bucket to upload the report to instead (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Object key used for the S3 upload
        #[arg(long, default_value = "aggregates/attendance.json")]
        s3_key: String,

        /// Optional: Gzip compress the report before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Export the per-employee summary table as CSV
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "summary.csv")]
        output: String,
    },
    /// Rank employees by one exception category
    Rank {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// sick_personal, absent, tardy or vacation
        #[arg(short, long)]
        category: Category,

        /// Optional: CSV file to write the ranking to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the dated entries behind one employee's totals
    Detail {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Only show this category (all categories when omitted)
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Export the cleaned records with their derived columns as CSV
    Clean {
        #[command(flatten)]
        source: SourceArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "cleaned.csv")]
        output: String,
    },
    /// Show the values each filter offers for the current selection
    Options {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/attendance_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("attendance_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.preset)?;

    match cli.command {
        Commands::Report {
            source,
            filters,
            output,
            s3_bucket,
            s3_key,
            gzip,
        } => {
            let filters = Filters::from(filters);
            let report = match load_dataset(&source.resolve(), &config).await {
                Ok(dataset) => build_report(&dataset, &filters, &config),
                Err(e) => DashboardReport::no_data(&e.to_string(), &filters, &config),
            };

            match s3_bucket {
                Some(bucket) if !bucket.is_empty() => {
                    let aws = aws_config::load_from_env().await;
                    let s3 = aws_sdk_s3::Client::new(&aws);
                    write_json_to_s3(&s3, &bucket, &s3_key, &report, gzip).await?;
                    info!(bucket = %bucket, key = %s3_key, "Report uploaded");
                }
                _ => {
                    write_json_file(&output, &report)?;
                    info!(output = %output, ready = report.is_ready(), "Report written");
                }
            }
        }
        Commands::Summary {
            source,
            filters,
            output,
        } => {
            let dataset = load_dataset(&source.resolve(), &config).await?;
            let aggregation = aggregate(&dataset.records, &Filters::from(filters));

            write_summary_csv(create_file(&output)?, &aggregation.summary)?;
            info!(output = %output, groups = aggregation.summary.len(), "Summary written");
        }
        Commands::Rank {
            source,
            filters,
            category,
            output,
        } => {
            let dataset = load_dataset(&source.resolve(), &config).await?;
            let aggregation = aggregate(&dataset.records, &Filters::from(filters));
            let ranking = rank(&aggregation.summary, category);

            if let Some(output) = output {
                write_ranking_csv(create_file(&output)?, &ranking)?;
                info!(output = %output, rows = ranking.len(), "Ranking written");
            } else if ranking.is_empty() {
                info!("No data for the selected filters");
            } else {
                info!(category = %config.vocabulary.category_name(category), "Ranking");
                for row in &ranking {
                    info!(
                        rank = row.rank,
                        employee = %row.employee_name,
                        department = %row.department,
                        value = %format_total(row.value),
                        "Rank"
                    );
                }
            }
        }
        Commands::Detail {
            source,
            filters,
            category,
        } => {
            let Some(employee) = filters.employee.clone() else {
                bail!("detail requires --employee");
            };
            let dataset = load_dataset(&source.resolve(), &config).await?;
            let aggregation = aggregate(&dataset.records, &Filters::from(filters));

            let categories = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };

            for category in categories {
                let view = detail(
                    aggregation.records.iter().copied(),
                    &employee,
                    category,
                    &config.vocabulary,
                );
                if view.rows.is_empty() {
                    continue;
                }

                let name = config.vocabulary.category_name(category);
                for row in &view.rows {
                    let date = row
                        .date
                        .map(|d| format_date(d, &config.calendar))
                        .unwrap_or_else(|| "-".to_string());
                    info!(
                        category = %name,
                        date = %date,
                        time = %row.time_period(),
                        label = %row.exception_label,
                        "Entry"
                    );
                }
                let unit = if category.is_day_based() { "days" } else { "times" };
                info!(category = %name, total = %format_total(view.total), unit, "Total");
            }
        }
        Commands::Clean { source, output } => {
            let dataset = load_dataset(&source.resolve(), &config).await?;

            write_cleaned_csv(create_file(&output)?, &dataset.records, &config.columns)?;
            info!(
                output = %output,
                records = dataset.records.len(),
                dropped = dataset.dropped_rows(),
                "Cleaned records written"
            );
        }
        Commands::Options { source, filters } => {
            let dataset = load_dataset(&source.resolve(), &config).await?;
            let options = filter_options(&dataset.records, &Filters::from(filters));

            info!(years = ?options.years, "Years");
            for month in &options.months {
                info!(month = %month, label = %format_month(*month, &config.calendar), "Month");
            }
            info!(departments = ?options.departments, "Departments");
            info!(employees = options.employees.len(), "Employees");
            for employee in &options.employees {
                info!(employee = %employee, "Employee");
            }
        }
    }

    Ok(())
}

/// Config file wins over `$ATTENDANCE_CONFIG`, which wins over the preset.
fn load_config(path: Option<&str>, preset: &str) -> Result<DashboardConfig> {
    let path = path
        .map(String::from)
        .or_else(|| std::env::var("ATTENDANCE_CONFIG").ok());

    match path {
        Some(path) => {
            info!(path = %path, "Loading config file");
            DashboardConfig::load(&path)
        }
        None => DashboardConfig::preset(preset),
    }
}

/// Loads and normalizes the dataset at `source`.
async fn load_dataset(source: &str, config: &DashboardConfig) -> Result<Dataset, SourceError> {
    let table = load_table(source).await?;
    let dataset = Dataset::from_table(&table, config);

    if dataset.dropped_rows() > 0 {
        warn!(
            dropped = dataset.dropped_rows(),
            kept = dataset.records.len(),
            "Some rows were excluded for unusable dates"
        );
    }
    Ok(dataset)
}
