use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Hard failures. Anything in here aborts the query or the command.
#[derive(Error, Debug)]
pub enum DiggerError {
    #[error("data from {source_name} is corrupt: {reason}")]
    DataCorrupt { source_name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("ODS write failed: {0}")]
    Ods(#[from] spreadsheet_ods::OdsError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, DiggerError>;

/// Recoverable conditions. The stage that hits one substitutes a usable value
/// and hands the advisory back next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    DateFormatInvalid { input: String },
    DateOutOfRange { input: String, start: NaiveDate },
    DateInFuture { input: String },
    SourceUnavailable { source_name: String, reason: String },
    LocalSourceFailed { path: String, reason: String },
}

impl Advisory {
    pub fn kind(&self) -> &'static str {
        match self {
            Advisory::DateFormatInvalid { .. } => "date_format_invalid",
            Advisory::DateOutOfRange { .. } => "date_out_of_range",
            Advisory::DateInFuture { .. } => "date_in_future",
            Advisory::SourceUnavailable { .. } => "source_unavailable",
            Advisory::LocalSourceFailed { .. } => "local_source_failed",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::DateFormatInvalid { input } => {
                write!(f, "Date format not valid ({input}), defaulting to today")
            }
            Advisory::DateOutOfRange { start, .. } => write!(
                f,
                "There is no data available before {}, defaulting to today",
                start.format("%B %-d %Y")
            ),
            Advisory::DateInFuture { input } => {
                write!(f, "{input} is in the future, defaulting to today")
            }
            Advisory::SourceUnavailable { source_name, reason } => {
                write!(f, "Cannot reach {source_name}: {reason}")
            }
            Advisory::LocalSourceFailed { path, reason } => write!(
                f,
                "Cannot use local file {path} ({reason}), downloading the data instead"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_messages_name_the_input() {
        let a = Advisory::DateFormatInvalid { input: "24/02/2020".into() };
        assert!(a.to_string().contains("24/02/2020"));
        assert_eq!(a.kind(), "date_format_invalid");

        let a = Advisory::LocalSourceFailed { path: "dump.json".into(), reason: "missing".into() };
        assert!(a.to_string().contains("dump.json"));

        let start = NaiveDate::from_ymd_opt(2020, 2, 24).unwrap();
        let a = Advisory::DateOutOfRange { input: "2019-01-01".into(), start };
        assert_eq!(
            a.to_string(),
            "There is no data available before February 24 2020, defaulting to today"
        );
    }
}
