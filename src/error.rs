//! Error types for the filtering and aggregation core.

use std::path::PathBuf;

/// Errors raised while resolving filters, loading trip records, or
/// computing aggregates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A filter input fell outside its fixed enumeration.
    #[error("invalid {axis} filter value \"{value}\"")]
    InvalidFilterValue {
        /// Which input was rejected (`city`, `mode`, `month` or `day`).
        axis: &'static str,
        /// The raw input as received.
        value: String,
    },

    /// A row could not be turned into a [`TripRecord`](crate::record::TripRecord).
    #[error("malformed record in {city} at row {row}: field \"{field}\" = \"{raw}\" ({reason})")]
    MalformedRecord {
        /// Display name of the city dataset.
        city: String,
        /// One-based data row (header excluded).
        row: usize,
        /// Column name of the offending field.
        field: &'static str,
        /// The raw cell content.
        raw: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An aggregate with no defined value over zero records was requested.
    #[error("cannot compute {aggregate} over an empty record set")]
    EmptyAggregate {
        /// Name of the aggregate, e.g. `mean trip duration`.
        aggregate: &'static str,
    },

    /// An aggregate outgrew its accumulator.
    #[error("{aggregate} overflowed while aggregating")]
    AggregateOverflow { aggregate: &'static str },

    /// The data file lacks a column its city schema requires.
    #[error("column \"{column}\" missing from {path}")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// The CSV reader failed below the record level.
    #[error("CSV error in {path}")]
    Source {
        path: PathBuf,
        source: csv::Error,
    },

    /// The data file could not be opened.
    #[error("cannot open {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn invalid(axis: &'static str, value: &str) -> Self {
        CoreError::InvalidFilterValue {
            axis,
            value: value.to_string(),
        }
    }
}
