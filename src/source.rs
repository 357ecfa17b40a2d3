//! Record sources: where raw trip rows come from.
//!
//! [`RecordSource`] is the seam between the core and storage. [`CsvRecordSource`]
//! reads the per-city CSV files shipped with the bike-share datasets.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::city::City;
use crate::error::CoreError;

/// Column names as they appear in the dataset headers.
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";
}

/// One unparsed row. Optional columns are `None` when the city's schema
/// lacks them; empty cells are kept as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrip {
    pub start_time: String,
    pub trip_duration: String,
    pub start_station: String,
    pub end_station: String,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<String>,
}

/// Supplies the raw rows of one city's dataset, in file order.
pub trait RecordSource {
    fn read(&self, city: City) -> Result<Vec<RawTrip>, CoreError>;
}

/// Reads `<data_dir>/<city file>.csv`.
pub struct CsvRecordSource {
    data_dir: PathBuf,
}

impl CsvRecordSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.data_file())
    }
}

struct ColumnIndex {
    start_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(
        headers: &csv::StringRecord,
        city: City,
        path: &Path,
    ) -> Result<Self, CoreError> {
        let find = |column: &'static str| -> Result<usize, CoreError> {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| CoreError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        let schema = city.schema();

        Ok(Self {
            start_time: find(columns::START_TIME)?,
            trip_duration: find(columns::TRIP_DURATION)?,
            start_station: find(columns::START_STATION)?,
            end_station: find(columns::END_STATION)?,
            user_type: find(columns::USER_TYPE)?,
            gender: if schema.has_gender {
                Some(find(columns::GENDER)?)
            } else {
                None
            },
            birth_year: if schema.has_birth_year {
                Some(find(columns::BIRTH_YEAR)?)
            } else {
                None
            },
        })
    }

    fn extract(&self, record: &csv::StringRecord) -> RawTrip {
        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        RawTrip {
            start_time: cell(self.start_time),
            trip_duration: cell(self.trip_duration),
            start_station: cell(self.start_station),
            end_station: cell(self.end_station),
            user_type: cell(self.user_type),
            gender: self.gender.map(cell),
            birth_year: self.birth_year.map(cell),
        }
    }
}

impl RecordSource for CsvRecordSource {
    #[instrument(level = "debug", skip(self), fields(city = %city))]
    fn read(&self, city: City) -> Result<Vec<RawTrip>, CoreError> {
        let path = self.path_for(city);
        let file = File::open(&path).map_err(|e| CoreError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = rdr.headers().map_err(|e| CoreError::Source {
            path: path.clone(),
            source: e,
        })?;
        let index = ColumnIndex::from_headers(headers, city, &path)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CoreError::Source {
                path: path.clone(),
                source: e,
            })?;
            rows.push(index.extract(&record));
        }

        debug!(path = %path.display(), rows = rows.len(), "Read city data file");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_reads_washington_layout_with_index_column() {
        let dir = temp_dir("bikeshare_stats_source_washington");
        fs::write(
            dir.join("washington.csv"),
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
             1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber\n",
        )
        .unwrap();

        let rows = CsvRecordSource::new(&dir).read(City::Washington).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].start_time, "2017-06-21 08:36:34");
        assert_eq!(rows[0].trip_duration, "489.066");
        assert_eq!(rows[0].end_station, "15th & K St NW");
        assert_eq!(rows[0].gender, None);
        assert_eq!(rows[0].birth_year, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_keeps_empty_optional_cells() {
        let dir = temp_dir("bikeshare_stats_source_chicago");
        fs::write(
            dir.join("chicago.csv"),
            ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year\n\
             1,2017-05-29 18:36:27,2017-05-29 18:49:27,780,Columbus Dr & Randolph St,Federal St & Polk St,Customer,,\n",
        )
        .unwrap();

        let rows = CsvRecordSource::new(&dir).read(City::Chicago).unwrap();
        assert_eq!(rows[0].gender.as_deref(), Some(""));
        assert_eq!(rows[0].birth_year.as_deref(), Some(""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_schema_column_is_an_error() {
        let dir = temp_dir("bikeshare_stats_source_nyc");
        fs::write(
            dir.join("new_york_city.csv"),
            "Start Time,Trip Duration,Start Station,End Station,User Type\n",
        )
        .unwrap();

        let err = CsvRecordSource::new(&dir)
            .read(City::NewYorkCity)
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn { column: "Gender", .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = CsvRecordSource::new("/nonexistent/bikeshare")
            .read(City::Chicago)
            .unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
