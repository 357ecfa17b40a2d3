//! Most popular stations and trips.

use serde::Serialize;

use crate::record::RecordSet;
use crate::stats::frequency::{FrequencyTable, Popular};

/// The most frequent start/end station pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularTrip {
    pub start_station: String,
    pub end_station: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub popular_start: Popular<String>,
    pub popular_end: Popular<String>,
    pub popular_trip: PopularTrip,
}

/// Popular start station, end station and station pair. `None` when `set`
/// is empty.
pub fn station_stats(set: &RecordSet) -> Option<StationStats> {
    let starts: FrequencyTable<&str> = set.iter().map(|r| r.start_station.as_str()).collect();
    let ends: FrequencyTable<&str> = set.iter().map(|r| r.end_station.as_str()).collect();
    // Tuple key: station names may contain any delimiter
    let pairs: FrequencyTable<(&str, &str)> = set
        .iter()
        .map(|r| (r.start_station.as_str(), r.end_station.as_str()))
        .collect();

    let owned = |p: Popular<&str>| Popular {
        value: p.value.to_string(),
        count: p.count,
    };
    let trip = pairs.mode()?;

    Some(StationStats {
        popular_start: owned(starts.mode()?),
        popular_end: owned(ends.mode()?),
        popular_trip: PopularTrip {
            start_station: trip.value.0.to_string(),
            end_station: trip.value.1.to_string(),
            count: trip.count,
        },
    })
}
