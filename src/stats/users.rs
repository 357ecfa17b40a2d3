//! User type and demographic breakdowns.

use serde::Serialize;

use crate::record::RecordSet;
use crate::stats::frequency::{FrequencyTable, Popular};

/// Result for a column that not every dataset carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Demographic<T> {
    /// The dataset's schema has no such column.
    Unavailable,
    /// The column exists but no record in the set has a value.
    NoData,
    Available(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<Popular<String>>,
    pub gender: Demographic<Vec<Popular<String>>>,
    pub birth_year: Demographic<BirthYearStats>,
}

/// Counts user types, and genders and birth years where the schema has them.
/// Null cells are skipped.
pub fn user_stats(set: &RecordSet) -> UserStats {
    let user_types: FrequencyTable<&str> = set.iter().filter_map(|r| r.user_type.as_deref()).collect();

    let gender = if set.schema.has_gender {
        let table: FrequencyTable<&str> = set.iter().filter_map(|r| r.gender.as_deref()).collect();
        if table.is_empty() {
            Demographic::NoData
        } else {
            Demographic::Available(owned(&table))
        }
    } else {
        Demographic::Unavailable
    };

    let birth_year = if set.schema.has_birth_year {
        birth_year_stats(set).map_or(Demographic::NoData, Demographic::Available)
    } else {
        Demographic::Unavailable
    };

    UserStats {
        user_types: owned(&user_types),
        gender,
        birth_year,
    }
}

fn birth_year_stats(set: &RecordSet) -> Option<BirthYearStats> {
    let years: Vec<i32> = set.iter().filter_map(|r| r.birth_year).collect();
    let table: FrequencyTable<i32> = years.iter().copied().collect();

    Some(BirthYearStats {
        earliest: *years.iter().min()?,
        most_recent: *years.iter().max()?,
        most_common: table.mode()?.value,
    })
}

fn owned(table: &FrequencyTable<&str>) -> Vec<Popular<String>> {
    table
        .distribution()
        .into_iter()
        .map(|p| Popular {
            value: p.value.to_string(),
            count: p.count,
        })
        .collect()
}
