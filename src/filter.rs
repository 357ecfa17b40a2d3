//! Filter resolution and application.
//!
//! [`FilterSpec::resolve`] turns the four user selections into a canonical
//! spec; [`apply`] selects the matching trips without touching the input set.
//!
//! | mode    | month applied | day applied |
//! |---------|---------------|-------------|
//! | `None`  | if set        | if set      |
//! | `Month` | if set        | never       |
//! | `Day`   | never         | if set      |
//! | `Both`  | if set        | if set      |

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::calendar::{DayOfWeek, FilterMonth};
use crate::city::City;
use crate::error::CoreError;
use crate::record::{RecordSet, TripRecord};

/// Selection meaning "no constraint on this axis".
pub const ALL: &str = "all";

/// Which axes a filter constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterMode {
    None,
    Month,
    Day,
    Both,
}

impl FilterMode {
    pub const fn constrains_month(self) -> bool {
        matches!(self, FilterMode::None | FilterMode::Month | FilterMode::Both)
    }

    pub const fn constrains_day(self) -> bool {
        matches!(self, FilterMode::None | FilterMode::Day | FilterMode::Both)
    }

    pub const fn name(self) -> &'static str {
        match self {
            FilterMode::None => "none",
            FilterMode::Month => "month",
            FilterMode::Day => "day",
            FilterMode::Both => "both",
        }
    }
}

impl FromStr for FilterMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FilterMode::None),
            "month" => Ok(FilterMode::Month),
            "day" => Ok(FilterMode::Day),
            "both" => Ok(FilterMode::Both),
            _ => Err(CoreError::invalid("mode", s)),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved filter. `month` and `day` are `None` when that axis is a
/// wildcard or when `mode` does not constrain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    city: City,
    mode: FilterMode,
    month: Option<FilterMonth>,
    day: Option<DayOfWeek>,
}

impl FilterSpec {
    /// Builds a spec, dropping any axis value `mode` does not constrain.
    pub fn new(
        city: City,
        mode: FilterMode,
        month: Option<FilterMonth>,
        day: Option<DayOfWeek>,
    ) -> Self {
        Self {
            city,
            mode,
            month: month.filter(|_| mode.constrains_month()),
            day: day.filter(|_| mode.constrains_day()),
        }
    }

    /// A spec that selects every trip of `city`.
    pub fn unfiltered(city: City) -> Self {
        Self::new(city, FilterMode::None, None, None)
    }

    /// Resolves raw selections.
    ///
    /// Every selection is checked against its enumeration, including one the
    /// mode will ignore, and `"all"` resolves to a wildcard.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidFilterValue`] for any value outside its enumeration.
    pub fn resolve(city: &str, mode: &str, month: &str, day: &str) -> Result<Self, CoreError> {
        let city: City = city.parse()?;
        let mode: FilterMode = mode.parse()?;
        let month = parse_selection::<FilterMonth>(month)?;
        let day = parse_selection::<DayOfWeek>(day)?;
        Ok(Self::new(city, mode, month, day))
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn month(&self) -> Option<FilterMonth> {
        self.month
    }

    pub fn day(&self) -> Option<DayOfWeek> {
        self.day
    }

    /// True when `record` satisfies every applicable constraint.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let month_ok = self.month.is_none_or(|m| record.month() == m.number());
        let day_ok = self.day.is_none_or(|d| record.day_of_week() == d);
        month_ok && day_ok
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.map_or(ALL, FilterMonth::name);
        let day = self.day.map_or(ALL, DayOfWeek::name);
        write!(
            f,
            "{} (mode: {}, month: {}, day: {})",
            self.city, self.mode, month, day
        )
    }
}

/// Parses one axis selection; `"all"` is `None`.
pub fn parse_selection<T: FromStr<Err = CoreError>>(s: &str) -> Result<Option<T>, CoreError> {
    if s.trim().eq_ignore_ascii_case(ALL) {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

/// Returns the trips of `set` that match `spec`, in their original order.
#[instrument(level = "debug", skip_all, fields(filter = %spec, input = set.len()))]
pub fn apply(set: &RecordSet, spec: &FilterSpec) -> RecordSet {
    let records: Vec<TripRecord> = set
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect();
    debug!(kept = records.len(), "Applied filter");

    RecordSet {
        city: set.city,
        schema: set.schema,
        records,
    }
}
