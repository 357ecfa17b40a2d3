//! Trip records and record sets.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::calendar::DayOfWeek;
use crate::city::{City, Schema};

/// One bike-share trip.
///
/// `month`, `day_of_week` and `hour` are derived from `start_time` on every
/// call and are never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    /// Trip length in milliseconds, kept at source precision so sums and
    /// means are truncated only once, after aggregating.
    pub trip_duration_ms: u64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    /// Calendar month of the trip start, 1..=12.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    /// Trip length in (possibly fractional) seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.trip_duration_ms as f64 / 1000.0
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from(self.start_time.weekday())
    }

    /// Hour of the trip start, 0..=23.
    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// An ordered set of trips from one city's dataset.
///
/// Order is the input order of the source rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub city: City,
    pub schema: Schema,
    pub records: Vec<TripRecord>,
}

impl RecordSet {
    pub fn new(city: City, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema: city.schema(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::trip;
    use super::*;

    #[test]
    fn test_derived_fields() {
        // 2017-03-17 was a Friday
        let t = trip("2017-03-17 08:15:00", 300, "A", "B");
        assert_eq!(t.month(), 3);
        assert_eq!(t.day_of_week(), DayOfWeek::Friday);
        assert_eq!(t.hour(), 8);
    }

    #[test]
    fn test_derived_fields_follow_start_time() {
        let mut t = trip("2017-01-01 00:07:57", 300, "A", "B");
        assert_eq!(t.day_of_week(), DayOfWeek::Sunday);

        t.start_time = NaiveDateTime::parse_from_str("2017-06-30 23:59:59", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(t.month(), 6);
        assert_eq!(t.day_of_week(), DayOfWeek::Friday);
        assert_eq!(t.hour(), 23);
    }

    #[test]
    fn test_duration_seconds_keeps_fraction() {
        let mut t = trip("2017-01-01 00:07:57", 0, "A", "B");
        t.trip_duration_ms = 489_066;
        assert_eq!(t.duration_seconds(), 489.066);
    }

    #[test]
    fn test_record_set_takes_city_schema() {
        let set = RecordSet::new(City::Washington, vec![]);
        assert!(set.is_empty());
        assert!(!set.schema.has_gender);
    }
}
