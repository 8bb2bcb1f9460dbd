use crate::types::{Dataset, OrderedReport, RegionCount, RegionTotals};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const TRENTINO_ALTO_ADIGE: &str = "Trentino - Alto Adige";

// The two autonomous provinces are published separately but reported as one
// region.
static REGION_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("P.A. Bolzano", TRENTINO_ALTO_ADIGE),
        ("P.A. Trento", TRENTINO_ALTO_ADIGE),
    ])
});

pub fn normalize_region(name: &str) -> &str {
    match REGION_ALIASES.get(name) {
        Some(alias) => *alias,
        None => name,
    }
}

/// Sum the cases of every record dated `day`, keyed by normalized region.
pub fn aggregate(dataset: &Dataset, day: NaiveDate) -> RegionTotals {
    let mut totals = RegionTotals::new();
    for r in dataset.iter().filter(|r| r.record_date == day) {
        totals.add(normalize_region(&r.region_name), r.total_cases);
    }
    totals
}

/// Cases descending, then region name ascending.
pub fn order(totals: &RegionTotals) -> OrderedReport {
    let mut entries: Vec<RegionCount> = totals
        .iter()
        .map(|(region, cases)| RegionCount { region: region.to_string(), cases })
        .collect();
    entries.sort_by(|a, b| b.cases.cmp(&a.cases).then_with(|| a.region.cmp(&b.region)));
    OrderedReport { entries }
}
