use crate::error::Advisory;
use crate::util::{format_date, parse_date_safe};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info};

/// First day the upstream dataset has records for.
pub const DATE_BEGINNING_DATA: &str = "2020-02-24";

/// Where "today" comes from. Read once per query so a run never straddles
/// midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Clock::Local => Local::now().date_naive(),
            Clock::Utc => Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub date: NaiveDate,
    pub advisory: Option<Advisory>,
}

impl Resolution {
    fn exact(date: NaiveDate) -> Self {
        Self { date, advisory: None }
    }

    fn fallback(today: NaiveDate, advisory: Advisory) -> Self {
        Self { date: today, advisory: Some(advisory) }
    }
}

/// Validates requested dates against `[data_start, today]`.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    data_start: NaiveDate,
    today: NaiveDate,
}

impl DateResolver {
    pub fn new(data_start: NaiveDate, today: NaiveDate) -> Self {
        Self { data_start, today }
    }

    /// Never fails: any unusable input resolves to today plus an advisory.
    /// An empty string counts as no date at all.
    pub fn resolve(&self, input: Option<&str>) -> Resolution {
        let Some(raw) = input.filter(|s| !s.is_empty()) else {
            info!(date = %format_date(self.today), "no date specified, defaulting to today");
            return Resolution::exact(self.today);
        };

        let Some(date) = parse_date_safe(Some(raw)) else {
            debug!(input = raw, "unparseable date");
            return Resolution::fallback(
                self.today,
                Advisory::DateFormatInvalid { input: raw.to_string() },
            );
        };

        if date < self.data_start {
            return Resolution::fallback(
                self.today,
                Advisory::DateOutOfRange { input: raw.to_string(), start: self.data_start },
            );
        }
        if date > self.today {
            return Resolution::fallback(
                self.today,
                Advisory::DateInFuture { input: raw.to_string() },
            );
        }
        Resolution::exact(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver() -> DateResolver {
        DateResolver::new(ymd(2020, 2, 24), ymd(2021, 6, 15))
    }

    #[test]
    fn absent_input_is_today_without_advisory() {
        let r = resolver().resolve(None);
        assert_eq!(r, Resolution { date: ymd(2021, 6, 15), advisory: None });
    }

    #[test]
    fn empty_input_counts_as_absent() {
        assert_eq!(resolver().resolve(Some("")), resolver().resolve(None));
    }

    #[test]
    fn valid_dates_resolve_to_themselves() {
        let resolver = resolver();
        for input in ["2020-02-24", "2020-12-31", "2021-06-15", "2021-01-07"] {
            let r = resolver.resolve(Some(input));
            assert_eq!(format_date(r.date), input);
            assert!(r.advisory.is_none());
            // Feeding the result back in changes nothing.
            let again = resolver.resolve(Some(&format_date(r.date)));
            assert_eq!(again, r);
        }
    }

    #[test]
    fn dates_before_start_fall_back_to_today() {
        let resolver = resolver();
        for input in ["2020-02-23", "2019-12-31", "1970-01-01"] {
            let r = resolver.resolve(Some(input));
            assert_eq!(r.date, ymd(2021, 6, 15));
            assert!(matches!(r.advisory, Some(Advisory::DateOutOfRange { .. })));
        }
    }

    #[test]
    fn future_dates_fall_back_to_today() {
        let r = resolver().resolve(Some("2021-06-16"));
        assert_eq!(r.date, ymd(2021, 6, 15));
        assert_eq!(r.advisory, Some(Advisory::DateInFuture { input: "2021-06-16".into() }));
    }

    #[test]
    fn malformed_dates_fall_back_to_today() {
        let resolver = resolver();
        for input in ["15/06/2021", "2021-13-01", "yesterday", " 2021-06-01", "2021-06-01 ", " "] {
            let r = resolver.resolve(Some(input));
            assert_eq!(r.date, ymd(2021, 6, 15));
            assert_eq!(r.advisory, Some(Advisory::DateFormatInvalid { input: input.into() }));
        }
    }

    #[test]
    fn default_start_constant_parses() {
        assert_eq!(parse_date_safe(Some(DATE_BEGINNING_DATA)), Some(ymd(2020, 2, 24)));
    }
}
