//! Supported cities, their data files, and the optional columns each provides.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Which optional demographic columns a city's dataset carries.
///
/// Presence is a property of the dataset, fixed before any row is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// A city with a bike-share dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub const fn name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// File name of the city's trip data inside the data directory.
    pub const fn data_file(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub const fn schema(self) -> Schema {
        match self {
            City::Chicago | City::NewYorkCity => Schema {
                has_gender: true,
                has_birth_year: true,
            },
            City::Washington => Schema {
                has_gender: false,
                has_birth_year: false,
            },
        }
    }
}

impl FromStr for City {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::invalid("city", s))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_city_names() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("new york city".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("Washington".parse::<City>().unwrap(), City::Washington);
        assert!("Boston".parse::<City>().is_err());
    }

    #[test]
    fn test_unknown_city_is_an_invalid_filter_value() {
        let err = "Boston".parse::<City>().unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidFilterValue { axis: "city", ref value } if value == "Boston"
        ));
    }

    #[test]
    fn test_each_city_has_its_own_file() {
        let files: Vec<_> = City::ALL.iter().map(|c| c.data_file()).collect();
        assert_eq!(files, ["chicago.csv", "new_york_city.csv", "washington.csv"]);
    }

    #[test]
    fn test_washington_has_no_demographics() {
        let schema = City::Washington.schema();
        assert!(!schema.has_gender);
        assert!(!schema.has_birth_year);
        assert!(City::Chicago.schema().has_birth_year);
    }
}
