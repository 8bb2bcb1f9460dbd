//! Per-region COVID-19 case counts for Italy.
//!
//! A query resolves the requested date, fetches the province-level dataset,
//! folds it into per-region totals and orders them. The binaries render the
//! result as text, a spreadsheet, or JSON over HTTP.
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod server;
pub mod types;
pub mod util;

pub use error::{Advisory, DiggerError, Result};
pub use pipeline::{Digger, QueryRequest, Report};
