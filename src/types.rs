use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::HashMap;
use tabled::Tabled;
use tracing::warn;

/// One province-day entry exactly as the upstream JSON carries it.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "data")]
    pub date_time: String,
    #[serde(rename = "denominazione_regione")]
    pub region: String,
    #[serde(rename = "totale_casi")]
    pub total_cases: u64,
}

/// A province-day observation with its date already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub record_date: NaiveDate,
    pub region_name: String,
    pub total_cases: u64,
}

pub type Dataset = Vec<RawRecord>;

/// Aggregated cases keyed by normalized region name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTotals {
    inner: HashMap<String, u64>,
}

impl RegionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saturates at `u64::MAX` instead of wrapping on absurd upstream counts.
    pub fn add(&mut self, region: &str, cases: u64) {
        let total = self.inner.entry(region.to_string()).or_insert(0);
        *total = total.checked_add(cases).unwrap_or_else(|| {
            warn!(region, "case total overflows u64, saturating");
            u64::MAX
        });
    }

    pub fn get(&self, region: &str) -> Option<u64> {
        self.inner.get(region).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for RegionTotals {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut totals = RegionTotals::new();
        for (region, cases) in iter {
            totals.add(&region, cases);
        }
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled, serde::Serialize)]
pub struct RegionCount {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Cases")]
    #[tabled(rename = "Cases")]
    pub cases: u64,
}

/// Per-region counts in their final order. Every emitter consumes this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedReport {
    pub entries: Vec<RegionCount>,
}

impl OrderedReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_cases(&self) -> u64 {
        self.entries.iter().fold(0u64, |acc, e| acc.saturating_add(e.cases))
    }

    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.entries.iter().map(|e| (e.region.as_str(), e.cases)).collect()
    }
}

// Serialized as a JSON object whose keys follow report order.
impl Serialize for OrderedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.region, &entry.cases)?;
        }
        map.end()
    }
}
