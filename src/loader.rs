use crate::config::SourceConfig;
use crate::error::{Advisory, DiggerError, Result};
use crate::types::{Dataset, RawRecord, RawRow};
use crate::util::parse_date_prefix;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which dataset to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Most recent day only.
    Latest,
    /// Every day since the start of the records.
    Full,
    Local(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Latest => f.write_str("latest data endpoint"),
            Source::Full => f.write_str("full history endpoint"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A dataset plus the advisory raised while obtaining it, if any. An advisory
/// always comes with an empty dataset.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub dataset: Dataset,
    pub advisory: Option<Advisory>,
}

impl Fetched {
    fn ok(dataset: Dataset) -> Self {
        Self { dataset, advisory: None }
    }

    fn empty(advisory: Advisory) -> Self {
        Self { dataset: Vec::new(), advisory: Some(advisory) }
    }
}

/// Parse a JSON array of province-day rows.
pub fn parse_dataset(bytes: &[u8]) -> std::result::Result<Dataset, String> {
    let rows: Vec<RawRow> = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let record_date = parse_date_prefix(&row.date_time)
                .ok_or_else(|| format!("row {idx}: '{}' is not a date", row.date_time))?;
            Ok(RawRecord { record_date, region_name: row.region, total_cases: row.total_cases })
        })
        .collect()
}

/// Fetches datasets from the two remote endpoints or a local file.
///
/// Holds no per-query state; one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct DataSource {
    client: reqwest::Client,
    latest_url: String,
    full_url: String,
}

impl DataSource {
    pub fn new(cfg: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_seconds))
            .build()
            .map_err(|e| DiggerError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            latest_url: cfg.latest_url.clone(),
            full_url: cfg.full_url.clone(),
        })
    }

    /// Only `DataCorrupt` comes back as an error; everything else is an
    /// advisory on an empty dataset.
    pub async fn fetch(&self, source: &Source) -> Result<Fetched> {
        match source {
            Source::Latest => self.fetch_remote(source, &self.latest_url).await,
            Source::Full => self.fetch_remote(source, &self.full_url).await,
            Source::Local(path) => Ok(fetch_local(path).await),
        }
    }

    async fn fetch_remote(&self, source: &Source, url: &str) -> Result<Fetched> {
        info!(%url, "downloading dataset");
        let unavailable = |reason: String| {
            warn!(%url, %reason, "source unavailable");
            Fetched::empty(Advisory::SourceUnavailable {
                source_name: source.to_string(),
                reason,
            })
        };

        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(unavailable(e.to_string())),
        };
        let resp = match resp.error_for_status() {
            Ok(resp) => resp,
            Err(e) => return Ok(unavailable(e.to_string())),
        };
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => return Ok(unavailable(e.to_string())),
        };

        let dataset = parse_dataset(&body).map_err(|reason| DiggerError::DataCorrupt {
            source_name: source.to_string(),
            reason,
        })?;
        debug!(records = dataset.len(), bytes = body.len(), "dataset parsed");
        Ok(Fetched::ok(dataset))
    }
}

async fn fetch_local(path: &Path) -> Fetched {
    let failed = |reason: String| {
        warn!(path = %path.display(), %reason, "local source failed");
        Fetched::empty(Advisory::LocalSourceFailed { path: path.display().to_string(), reason })
    };

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => return failed(e.to_string()),
    };
    match parse_dataset(&bytes) {
        Ok(dataset) => {
            info!(path = %path.display(), records = dataset.len(), "loaded local dataset");
            Fetched::ok(dataset)
        }
        Err(reason) => failed(reason),
    }
}
