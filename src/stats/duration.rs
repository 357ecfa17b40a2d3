//! Total and mean trip duration.

use serde::Serialize;

use crate::error::CoreError;
use crate::record::RecordSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    /// Whole seconds of the summed durations.
    pub total_seconds: u64,
    pub mean_seconds: f64,
    /// `total_seconds` as `H:MM:SS`.
    pub total: String,
    /// Whole seconds of `mean_seconds` as `H:MM:SS`.
    pub mean: String,
}

/// Sums and averages trip durations.
///
/// # Errors
///
/// [`CoreError::EmptyAggregate`] when `set` is empty; the mean of zero trips
/// is undefined. [`CoreError::AggregateOverflow`] if the millisecond sum does
/// not fit in a `u64`.
pub fn duration_stats(set: &RecordSet) -> Result<DurationStats, CoreError> {
    if set.is_empty() {
        return Err(CoreError::EmptyAggregate {
            aggregate: "trip duration",
        });
    }

    // Sum at millisecond precision; truncation to seconds happens once, here.
    let total_ms = set
        .iter()
        .try_fold(0u64, |acc, r| acc.checked_add(r.trip_duration_ms))
        .ok_or(CoreError::AggregateOverflow {
            aggregate: "total trip duration",
        })?;
    let total_seconds = total_ms / 1000;
    let mean_seconds = total_ms as f64 / 1000.0 / set.len() as f64;

    Ok(DurationStats {
        total_seconds,
        mean_seconds,
        total: format_hms(total_seconds),
        mean: format_hms(mean_seconds.trunc() as u64),
    })
}

/// Formats seconds as `H:MM:SS`. Hours are not wrapped into days.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}
