// HTTP front end: `GET /?date=YYYY-MM-DD` answers with the JSON report.
use anyhow::Context;
use clap::Parser;
use covid_digger::config::Config;
use covid_digger::{logging, server, Digger};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "covid_webserver")]
#[command(about = "Webserver that returns per-region case totals as JSON")]
#[command(version)]
struct Args {
    /// Hostname for the webserver
    #[arg(long)]
    hostname: Option<String>,

    /// Port number for the webserver
    #[arg(long)]
    port: Option<u16>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("loading configuration")?;
    let hostname = args.hostname.unwrap_or(config.server.hostname.clone());
    let port = args.port.unwrap_or(config.server.port);

    let digger = Arc::new(Digger::from_config(&config)?);
    let addr = server::resolve_addr(&hostname, port).await?;
    server::serve(addr, digger).await?;
    Ok(())
}
