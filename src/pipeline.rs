use crate::config::Config;
use crate::dates::{Clock, DateResolver};
use crate::error::{Advisory, Result};
use crate::loader::{DataSource, Fetched, Source};
use crate::reports::{aggregate, order};
use crate::types::OrderedReport;
use crate::util::{format_date, format_int};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, warn, Instrument};

/// What a caller asks for. Both fields are optional.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub date: Option<String>,
    pub local_file: Option<PathBuf>,
}

/// The outcome of one query: the date actually used, every advisory raised
/// along the way, and the ordered counts.
#[derive(Debug, Clone)]
pub struct Report {
    pub date: NaiveDate,
    pub is_today: bool,
    pub advisories: Vec<Advisory>,
    pub regions: OrderedReport,
}

/// Resolver → source → aggregation → ordering. Holds only immutable settings
/// and the HTTP client, so one instance can serve concurrent queries.
#[derive(Debug, Clone)]
pub struct Digger {
    data_start: NaiveDate,
    clock: Clock,
    source: DataSource,
}

impl Digger {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            data_start: cfg.dates.start_date()?,
            clock: cfg.dates.clock,
            source: DataSource::new(&cfg.source)?,
        })
    }

    pub async fn run(&self, req: &QueryRequest) -> Result<Report> {
        self.run_for(self.clock.today(), req).await
    }

    /// Same as `run` with "today" pinned by the caller.
    pub async fn run_for(&self, today: NaiveDate, req: &QueryRequest) -> Result<Report> {
        let resolution = DateResolver::new(self.data_start, today).resolve(req.date.as_deref());
        let date = resolution.date;
        let advisories: Vec<Advisory> = resolution.advisory.into_iter().collect();

        let span = tracing::info_span!("query", date = %format_date(date));
        self.query(today, date, req, advisories).instrument(span).await
    }

    async fn query(
        &self,
        today: NaiveDate,
        date: NaiveDate,
        req: &QueryRequest,
        mut advisories: Vec<Advisory>,
    ) -> Result<Report> {
        let is_today = date == today;
        let fetched = self.fetch(req, is_today, &mut advisories).await?;

        let totals = aggregate(&fetched.dataset, date);
        let regions = order(&totals);
        info!(
            records = fetched.dataset.len(),
            regions = regions.len(),
            cases = %format_int(regions.total_cases()),
            "aggregation finished"
        );
        for a in &advisories {
            warn!(kind = a.kind(), "{}", a);
        }
        Ok(Report { date, is_today, advisories, regions })
    }

    // A failed local file falls back to the remote source once.
    async fn fetch(
        &self,
        req: &QueryRequest,
        is_today: bool,
        advisories: &mut Vec<Advisory>,
    ) -> Result<Fetched> {
        let remote = if is_today { Source::Latest } else { Source::Full };

        if let Some(path) = &req.local_file {
            let fetched = self.source.fetch(&Source::Local(path.clone())).await?;
            match fetched.advisory {
                Some(advisory) => advisories.push(advisory),
                None => return Ok(fetched),
            }
        }

        let mut fetched = self.source.fetch(&remote).await?;
        if let Some(advisory) = fetched.advisory.take() {
            advisories.push(advisory);
        }
        Ok(fetched)
    }
}
