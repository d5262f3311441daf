//! # bookclub-cli
//!
//! Command-line dashboard for the book club workbook.

mod config;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use bookclub_core::dashboard::{
    correlations, filter_years, gender_counts, load_books, load_resources, meetup_url,
    publisher_scores, publisher_topic_heatmap, selected_books, topic_counts, years,
};
use bookclub_core::{Column, CorrelationReport, LoadOptions, Overview, TypedTable, Value};
use bookclub_http::HttpClient;
use bookclub_sheet::{CsvDirSource, CsvOptions, RowSource, XlsxSource};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::Config;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// bookclub - What the club has read, and how it scored it
#[derive(Parser)]
#[command(name = "bookclub")]
#[command(author, version, about = "Book club reading dashboard", long_about = None)]
struct Cli {
    /// Directory of CSV/TSV sheets or an .xlsx workbook (overrides BOOKCLUB_SOURCE)
    #[arg(short, long, value_name = "PATH", global = true)]
    source: Option<PathBuf>,

    /// Fail on cells that cannot be read as their column type
    #[arg(long, global = true)]
    strict: bool,

    /// Output format (json, csv, table)
    #[arg(short = 'f', long = "format", default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// All-time stats
    Overview,
    /// Years with scored books
    Years,
    /// Books read, most recent first
    Books(YearFilter),
    /// Mean score and book count by publisher
    Publishers(YearFilter),
    /// Books per topic
    Topics(YearFilter),
    /// Publisher by topic book counts
    Heatmap(YearFilter),
    /// Books per author gender
    Genders(YearFilter),
    /// Score against pages, and our score against Goodreads
    Correlation(YearFilter),
    /// The Resources sheet
    Resources,
    /// Member count from the club's Meetup page
    Members,
}

#[derive(Args, Clone, Default)]
struct YearFilter {
    /// Only include books from this year (repeatable; default all years)
    #[arg(short, long = "year", value_name = "YEAR")]
    years: Vec<i64>,
}

impl YearFilter {
    fn apply(&self, books: &TypedTable) -> Result<TypedTable> {
        if self.years.is_empty() {
            return Ok(books.clone());
        }
        Ok(filter_years(books, &self.years)?)
    }
}

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with table or JSON output
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = try_main(&cli).await {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

async fn try_main(cli: &Cli) -> Result<()> {
    let config = Config::load()?;
    let path = config.require_source(cli.source.clone())?;
    let source = open_source(&path)?;
    info!(source = %path.display(), "opened data source");

    let mut out = io::stdout();
    run(cli, &config, source.as_ref(), &mut out).await
}

/// Pick a row source for `path`: a workbook file or a directory of sheets.
fn open_source(path: &Path) -> Result<Box<dyn RowSource>> {
    if path.is_dir() {
        let options = if path.join("Main.tsv").is_file() && !path.join("Main.csv").is_file() {
            CsvOptions::tsv()
        } else {
            CsvOptions::default()
        };
        return Ok(Box::new(CsvDirSource::with_options(path, options)));
    }

    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm"));
    if is_workbook && path.is_file() {
        return Ok(Box::new(XlsxSource::new(path)));
    }

    anyhow::bail!(
        "Data source must be a directory of CSV/TSV sheets or a workbook file: {}",
        path.display()
    )
}

/// Run one command against `source`, writing the result to `out`.
async fn run<W: Write>(
    cli: &Cli,
    config: &Config,
    source: &dyn RowSource,
    out: &mut W,
) -> Result<()> {
    let options = if cli.strict {
        LoadOptions::strict()
    } else {
        LoadOptions::default()
    };

    let books = |filter: Option<&YearFilter>| -> Result<TypedTable> {
        let books = load_books(source, options).context("Failed to load books")?;
        match filter {
            Some(filter) => filter.apply(&books),
            None => Ok(books),
        }
    };

    match &cli.command {
        Command::Overview => write_overview(&Overview::from_books(&books(None)?)?, cli.format, out),
        Command::Years => write_table(&years_table(&years(&books(None)?)?)?, cli.format, out),
        Command::Books(filter) => write_table(&selected_books(&books(Some(filter))?)?, cli.format, out),
        Command::Publishers(filter) => {
            write_table(&publisher_scores(&books(Some(filter))?)?, cli.format, out)
        }
        Command::Topics(filter) => write_table(&topic_counts(&books(Some(filter))?)?, cli.format, out),
        Command::Heatmap(filter) => {
            write_table(&publisher_topic_heatmap(&books(Some(filter))?)?, cli.format, out)
        }
        Command::Genders(filter) => write_table(&gender_counts(&books(Some(filter))?)?, cli.format, out),
        Command::Correlation(filter) => {
            write_correlations(&correlations(&books(Some(filter))?)?, cli.format, out)
        }
        Command::Resources => {
            let resources = load_resources(source, options).context("Failed to load resources")?;
            write_table(&resources, cli.format, out)
        }
        Command::Members => {
            let resources = load_resources(source, options).context("Failed to load resources")?;
            let report = member_report(config, meetup_url(&resources)?).await?;
            write_members(&report, cli.format, out)
        }
    }
}

#[derive(Debug, Serialize)]
struct MemberReport {
    url: Option<String>,
    members: u64,
}

/// Look up the member count, falling back to the configured default when
/// the page is missing or cannot be fetched.
async fn member_report(config: &Config, url: Option<String>) -> Result<MemberReport> {
    let Some(url) = url else {
        warn!("no Meetup Page in resources, using default member count");
        return Ok(MemberReport {
            url: None,
            members: config.default_members,
        });
    };

    let client = HttpClient::with_timeout(config.http_timeout_secs)?;
    let members = match client
        .fetch_member_count(&url, &config.member_element, config.default_members)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            warn!(url = %url, error = %e, "could not fetch member count, using default");
            config.default_members
        }
    };

    Ok(MemberReport {
        url: Some(url),
        members,
    })
}

fn years_table(years: &[i64]) -> Result<TypedTable> {
    Ok(TypedTable::new(vec![Column::integer(
        "Year",
        years.iter().copied().map(Some).collect(),
    )])?)
}

fn correlation_table(reports: &[CorrelationReport]) -> Result<TypedTable> {
    Ok(TypedTable::new(vec![
        Column::text("X", reports.iter().map(|r| Some(r.x.clone())).collect()),
        Column::text("Y", reports.iter().map(|r| Some(r.y.clone())).collect()),
        Column::float("r", reports.iter().map(|r| Some(r.r)).collect()),
        Column::text("Description", reports.iter().map(|r| Some(r.label)).collect()),
    ])?)
}

/// Write a table in the specified format.
fn write_table<W: Write>(table: &TypedTable, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if table.is_empty() {
                writeln!(out, "(empty table)")?;
                return Ok(());
            }
            let formatted = pretty_format_batches(&[table.to_record_batch()?])?;
            writeln!(out, "{formatted}")?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&table.to_records())?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(table.column_names())?;
            for row in 0..table.row_count() {
                writer.write_record(table.row(row).iter().map(csv_value))?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Format a value for CSV output; nulls are empty cells.
fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_correlations<W: Write>(
    reports: &[CorrelationReport],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(reports)?)?;
            Ok(())
        }
        OutputFormat::Csv => write_table(&correlation_table(reports)?, format, out),
        OutputFormat::Table => {
            if reports.is_empty() {
                writeln!(out, "Not enough scored books to correlate.")?;
            }
            for report in reports {
                writeln!(
                    out,
                    "{} vs {}: r = {} ({})",
                    report.x.bold(),
                    report.y.bold(),
                    report.r,
                    report.label
                )?;
            }
            Ok(())
        }
    }
}

fn overview_rows(overview: &Overview) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(top) = &overview.highest_score {
        rows.push(("Highest score", top.score.to_string()));
        rows.push(("Top book", top.title.clone().unwrap_or_default()));
        rows.push(("Top book author", top.author.clone().unwrap_or_default()));
        rows.push((
            "Top book read",
            top.date.map(|d| d.format("%B %Y").to_string()).unwrap_or_default(),
        ));
        if let Some(lead) = top.lead {
            rows.push(("Lead over runner-up", lead.to_string()));
        }
    }
    rows.push(("Total pages", overview.total_pages.to_string()));
    if let Some(pages) = overview.latest_pages {
        rows.push(("Pages in latest book", pages.to_string()));
    }
    rows.push(("Total books", overview.total_books.to_string()));
    rows.push(("Total authors", overview.total_authors.to_string()));
    rows.push(("Total publishers", overview.total_publishers.to_string()));
    rows
}

fn write_overview<W: Write>(overview: &Overview, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(overview)?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["Metric", "Value"])?;
            for (metric, value) in overview_rows(overview) {
                writer.write_record([metric, value.as_str()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}", "All-time stats".bold())?;
            for (metric, value) in overview_rows(overview) {
                writeln!(out, "{}: {value}", metric.green())?;
            }
        }
    }
    Ok(())
}

fn write_members<W: Write>(report: &MemberReport, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.serialize(report)?;
            writer.flush()?;
        }
        OutputFormat::Table => {
            writeln!(out, "{}: {}", "Members".green(), report.members)?;
            if let Some(url) = &report.url {
                writeln!(out, "{}: {url}", "Meetup".green())?;
            }
        }
    }
    Ok(())
}
