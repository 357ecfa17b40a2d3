//! Record loader: turns raw rows from a [`RecordSource`] into a [`RecordSet`].

use chrono::NaiveDateTime;
use tracing::{info, instrument, warn};

use crate::city::City;
use crate::error::CoreError;
use crate::record::{RecordSet, TripRecord};
use crate::source::{RawTrip, RecordSource, columns};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Longest trip accepted, in seconds (one year). Anything longer is a data
/// error, and the bound keeps millisecond sums far from `u64::MAX`.
pub const MAX_TRIP_DURATION_SECS: f64 = 365.0 * 24.0 * 3600.0;

/// What to do with a row that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort the load with [`CoreError::MalformedRecord`].
    #[default]
    Reject,
    /// Drop the row and count it.
    Skip,
}

/// Result of a load: the parsed records plus how many rows were dropped.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: RecordSet,
    pub skipped: usize,
}

/// Loads and parses every row of `city`'s dataset.
///
/// # Errors
///
/// Propagates source errors. Under [`MalformedPolicy::Reject`] the first
/// unparseable row fails the whole load.
#[instrument(level = "debug", skip(source), fields(city = %city))]
pub fn load_records(
    source: &impl RecordSource,
    city: City,
    policy: MalformedPolicy,
) -> Result<LoadOutcome, CoreError> {
    let raw = source.read(city)?;
    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for (i, row) in raw.into_iter().enumerate() {
        match parse_trip(city, i + 1, row) {
            Ok(record) => records.push(record),
            Err(e) if policy == MalformedPolicy::Skip => {
                warn!(error = %e, "Skipping malformed record");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(loaded = records.len(), skipped, "Loaded trip records");
    Ok(LoadOutcome {
        records: RecordSet::new(city, records),
        skipped,
    })
}

/// Parses one raw row; `row` is the 1-based data row used in errors.
pub fn parse_trip(city: City, row: usize, raw: RawTrip) -> Result<TripRecord, CoreError> {
    let malformed = |field: &'static str, value: &str, reason: &str| CoreError::MalformedRecord {
        city: city.name().to_string(),
        row,
        field,
        raw: value.to_string(),
        reason: reason.to_string(),
    };

    let start_time = parse_timestamp(&raw.start_time)
        .ok_or_else(|| malformed(columns::START_TIME, &raw.start_time, "unparseable timestamp"))?;

    let trip_duration_ms = parse_duration(&raw.trip_duration)
        .map_err(|reason| malformed(columns::TRIP_DURATION, &raw.trip_duration, reason))?;

    if raw.start_station.is_empty() {
        return Err(malformed(columns::START_STATION, "", "empty station name"));
    }
    if raw.end_station.is_empty() {
        return Err(malformed(columns::END_STATION, "", "empty station name"));
    }

    let birth_year = match raw.birth_year.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            parse_year(s).ok_or_else(|| malformed(columns::BIRTH_YEAR, s, "expected a whole year"))?,
        ),
    };

    Ok(TripRecord {
        start_time,
        trip_duration_ms,
        start_station: raw.start_station,
        end_station: raw.end_station,
        user_type: non_empty(raw.user_type),
        gender: raw.gender.and_then(non_empty),
        birth_year,
    })
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Seconds (fractional allowed) to whole milliseconds, rounded to nearest.
fn parse_duration(s: &str) -> Result<u64, &'static str> {
    let secs: f64 = s
        .parse()
        .map_err(|_| "expected a non-negative number of seconds")?;
    if !secs.is_finite() || secs < 0.0 {
        return Err("expected a non-negative number of seconds");
    }
    if secs > MAX_TRIP_DURATION_SECS {
        return Err("longer than the maximum trip duration");
    }
    Ok((secs * 1000.0).round() as u64)
}

/// Accepts `1992` and `1992.0`.
fn parse_year(s: &str) -> Option<i32> {
    let year: f64 = s.parse().ok()?;
    if !year.is_finite() || year.fract() != 0.0 || year.abs() > i32::MAX as f64 {
        return None;
    }
    Some(year as i32)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayOfWeek;

    struct StaticSource(Vec<RawTrip>);

    impl RecordSource for StaticSource {
        fn read(&self, _city: City) -> Result<Vec<RawTrip>, CoreError> {
            Ok(self.0.clone())
        }
    }

    fn raw(start: &str, duration: &str) -> RawTrip {
        RawTrip {
            start_time: start.into(),
            trip_duration: duration.into(),
            start_station: "Canal St & Madison St".into(),
            end_station: "Clark St & Randolph St".into(),
            user_type: "Subscriber".into(),
            gender: Some("Male".into()),
            birth_year: Some("1988.0".into()),
        }
    }

    #[test]
    fn test_parse_trip_derives_fields() {
        let t = parse_trip(City::Chicago, 1, raw("2017-06-23 15:09:32", "321")).unwrap();
        assert_eq!(t.month(), 6);
        assert_eq!(t.day_of_week(), DayOfWeek::Friday);
        assert_eq!(t.hour(), 15);
        assert_eq!(t.trip_duration_ms, 321_000);
        assert_eq!(t.birth_year, Some(1988));
        assert_eq!(t.gender.as_deref(), Some("Male"));
    }

    #[test]
    fn test_fractional_values() {
        let t = parse_trip(City::Washington, 1, raw("2017-03-01 07:00:00.250", "489.966")).unwrap();
        assert_eq!(t.trip_duration_ms, 489_966);
        assert_eq!(t.hour(), 7);
    }

    #[test]
    fn test_huge_duration_is_malformed() {
        for value in ["1e20", "40000000"] {
            let err = parse_trip(City::Washington, 4, raw("2017-03-01 07:00:00", value)).unwrap_err();
            match err {
                CoreError::MalformedRecord { row, field, raw, .. } => {
                    assert_eq!(row, 4);
                    assert_eq!(field, "Trip Duration");
                    assert_eq!(raw, value);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        let t = parse_trip(City::Washington, 1, raw("2017-03-01 07:00:00", "31536000")).unwrap();
        assert_eq!(t.trip_duration_ms, 31_536_000_000);
    }

    #[test]
    fn test_empty_optional_cells_become_none() {
        let mut r = raw("2017-01-01 00:07:57", "10");
        r.gender = Some(String::new());
        r.birth_year = Some(String::new());
        r.user_type = String::new();
        let t = parse_trip(City::NewYorkCity, 1, r).unwrap();
        assert_eq!(t.gender, None);
        assert_eq!(t.birth_year, None);
        assert_eq!(t.user_type, None);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(parse_trip(City::Chicago, 1, raw("not a date", "10")).is_err());
        assert!(parse_trip(City::Chicago, 1, raw("2017-01-01 00:00:00", "-5")).is_err());
        assert!(parse_trip(City::Chicago, 1, raw("2017-01-01 00:00:00", "NaN")).is_err());

        let mut r = raw("2017-01-01 00:00:00", "10");
        r.birth_year = Some("1988.5".into());
        assert!(parse_trip(City::Chicago, 1, r).is_err());

        let mut r = raw("2017-01-01 00:00:00", "10");
        r.end_station = String::new();
        assert!(parse_trip(City::Chicago, 1, r).is_err());
    }

    #[test]
    fn test_reject_policy_reports_offending_row() {
        let source = StaticSource(vec![
            raw("2017-01-01 00:07:57", "10"),
            raw("2017-13-01 00:00:00", "10"),
        ]);
        let err = load_records(&source, City::Chicago, MalformedPolicy::Reject).unwrap_err();
        match err {
            CoreError::MalformedRecord { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "Start Time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_counts_dropped_rows() {
        let source = StaticSource(vec![
            raw("2017-01-01 00:07:57", "10"),
            raw("garbage", "10"),
            raw("2017-01-02 09:00:00", "20"),
        ]);
        let outcome = load_records(&source, City::Chicago, MalformedPolicy::Skip).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.records.records[1].trip_duration_ms, 20_000);
    }

    #[test]
    fn test_derived_ranges_hold_for_loaded_records() {
        let source = StaticSource(vec![
            raw("2017-01-01 00:00:00", "1"),
            raw("2017-06-30 23:59:59", "1"),
            raw("2017-12-31 12:30:00", "1"),
        ]);
        let outcome = load_records(&source, City::Chicago, MalformedPolicy::Reject).unwrap();
        for t in &outcome.records {
            assert!((1..=12).contains(&t.month()));
            assert!(t.day_of_week().index() < 7);
            assert!(t.hour() <= 23);
        }
    }
}
