//! Most frequent times of travel.

use serde::Serialize;

use crate::calendar::{DayOfWeek, month_name};
use crate::record::RecordSet;
use crate::stats::frequency::{FrequencyTable, Popular};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub popular_month: Popular<&'static str>,
    pub month_counts: Vec<Popular<&'static str>>,
    pub popular_day: Popular<DayOfWeek>,
    pub day_counts: Vec<Popular<DayOfWeek>>,
    pub popular_hour: Popular<u32>,
    pub hour_counts: Vec<Popular<u32>>,
}

/// Popular month, day of week and start hour. `None` when `set` is empty.
pub fn time_stats(set: &RecordSet) -> Option<TemporalStats> {
    let months: FrequencyTable<u32> = set.iter().map(|r| r.month()).collect();
    let days: FrequencyTable<DayOfWeek> = set.iter().map(|r| r.day_of_week()).collect();
    let hours: FrequencyTable<u32> = set.iter().map(|r| r.hour()).collect();

    let months = months.map_keys(|&m| month_name(m).unwrap_or("Unknown"));

    Some(TemporalStats {
        popular_month: months.mode()?,
        month_counts: months.distribution(),
        popular_day: days.mode()?,
        day_counts: days.distribution(),
        popular_hour: hours.mode()?,
        hour_counts: hours.distribution(),
    })
}
