//! Statistics over a filtered record set.
//!
//! Each computation only reads the set. [`StatisticsReport::compute`] runs all
//! four and records how long each took.

pub mod duration;
pub mod frequency;
pub mod station;
pub mod temporal;
pub mod users;

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::CoreError;
use crate::filter::FilterSpec;
use crate::record::RecordSet;

pub use duration::{DurationStats, duration_stats, format_hms};
pub use frequency::{FrequencyTable, Popular};
pub use station::{PopularTrip, StationStats, station_stats};
pub use temporal::{TemporalStats, time_stats};
pub use users::{BirthYearStats, Demographic, UserStats, user_stats};

/// A computed section plus the wall time spent computing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub value: T,
    pub elapsed_secs: f64,
}

fn timed<T>(name: &'static str, f: impl FnOnce() -> T) -> Section<T> {
    let start = Instant::now();
    let value = f();
    let elapsed_secs = start.elapsed().as_secs_f64();
    debug!(section = name, elapsed_secs, "Computed statistics section");
    Section {
        value,
        elapsed_secs,
    }
}

/// All four reports for one filtered record set.
///
/// `temporal`, `stations` and `duration` are `None` when the set is empty.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub generated_at: DateTime<Utc>,
    pub filter: FilterSpec,
    pub record_count: usize,
    pub skipped_records: usize,
    pub temporal: Section<Option<TemporalStats>>,
    pub stations: Section<Option<StationStats>>,
    pub duration: Section<Option<DurationStats>>,
    pub users: Section<UserStats>,
}

impl StatisticsReport {
    #[instrument(level = "debug", skip_all, fields(filter = %filter, records = set.len()))]
    pub fn compute(
        set: &RecordSet,
        filter: FilterSpec,
        skipped_records: usize,
    ) -> Result<Self, CoreError> {
        let duration = timed("duration", || duration_stats(set));
        let duration = Section {
            value: match duration.value {
                Ok(stats) => Some(stats),
                Err(CoreError::EmptyAggregate { .. }) => None,
                Err(e) => return Err(e),
            },
            elapsed_secs: duration.elapsed_secs,
        };

        Ok(StatisticsReport {
            generated_at: Utc::now(),
            filter,
            record_count: set.len(),
            skipped_records,
            temporal: timed("temporal", || time_stats(set)),
            stations: timed("stations", || station_stats(set)),
            duration,
            users: timed("users", || user_stats(set)),
        })
    }

    /// True when the filter matched no trips.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}
