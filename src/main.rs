// Entry point and high-level CLI flow.
//
// Resolves the date, runs one query and prints the ordered per-region counts.
// Spreadsheet flags write files in addition to the listing.
use anyhow::Context;
use clap::Parser;
use covid_digger::config::Config;
use covid_digger::output::{self, SpreadsheetFormat};
use covid_digger::util::format_date;
use covid_digger::{logging, Digger, QueryRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "covid_digger")]
#[command(about = "Covid data digger: per-region case totals for a given day")]
#[command(version)]
struct Cli {
    /// Date you want to get the number of cases from, formatted YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,

    /// Also write the report to an XLSX workbook
    #[arg(long, value_name = "PATH")]
    xlsx: Option<PathBuf>,

    /// Also write the report to an ODS workbook
    #[arg(long, value_name = "PATH")]
    ods: Option<PathBuf>,

    /// Also write the report to a CSV sheet
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Also write the report to a JSON file
    #[arg(long, value_name = "PATH")]
    json_file: Option<PathBuf>,

    /// Read the dataset from a local JSON file instead of downloading it
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print the report as a JSON object
    #[arg(long, conflicts_with = "table")]
    json: bool,

    /// Print the report as a Markdown table
    #[arg(long)]
    table: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let digger = Digger::from_config(&config)?;

    let req = QueryRequest { date: cli.date, local_file: cli.file };
    let report = digger.run(&req).await?;

    if !cli.json {
        println!("Checking statistics for {}", format_date(report.date));
    }
    // Keep stdout parseable in JSON mode.
    for advisory in &report.advisories {
        if cli.json {
            eprintln!("{}", advisory);
        } else {
            println!("{}", advisory);
        }
    }

    if cli.json {
        println!("{}", output::render_json(&report.regions)?);
    } else if cli.table {
        output::print_table(&report.regions, report.is_today)?;
    } else {
        output::print_lines(&report.regions, report.is_today)?;
    }

    let sheets = [
        (cli.xlsx, SpreadsheetFormat::Xlsx),
        (cli.ods, SpreadsheetFormat::Ods),
        (cli.csv, SpreadsheetFormat::Csv),
    ];
    for (path, format) in sheets.into_iter().filter_map(|(p, f)| Some((p?, f))) {
        output::write_spreadsheet(&path, format, &report.regions)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("(Report exported to {})", path.display());
    }
    if let Some(path) = &cli.json_file {
        output::write_json(path, &report.regions)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("(Report exported to {})", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    logging::init_logging();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
