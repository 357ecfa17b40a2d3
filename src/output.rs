//! Output formatting and persistence for statistics reports.
//!
//! Supports a human-readable text rendering, JSON serialization, raw record
//! pages, and appending a one-row summary to a CSV file.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::ALL;
use crate::record::TripRecord;
use crate::stats::{Demographic, Popular, Section, StatisticsReport};

const RULE: &str = "----------------------------------------";

/// Something that presents a finished report.
pub trait ReportSink {
    fn emit(&mut self, report: &StatisticsReport) -> Result<()>;
}

/// Writes the text rendering to any writer.
pub struct TextSink<W>(pub W);

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, report: &StatisticsReport) -> Result<()> {
        write!(self.0, "{}", TextReport(report))?;
        self.0.flush()?;
        Ok(())
    }
}

/// Writes pretty-printed JSON to any writer.
pub struct JsonSink<W>(pub W);

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, report: &StatisticsReport) -> Result<()> {
        writeln!(self.0, "{}", to_json(report)?)?;
        Ok(())
    }
}

/// Appends a summary row per report to a CSV file.
pub struct CsvSummarySink {
    pub path: String,
}

impl ReportSink for CsvSummarySink {
    fn emit(&mut self, report: &StatisticsReport) -> Result<()> {
        append_record(&self.path, report)
    }
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &StatisticsReport) {
    debug!("{:#?}", report);
}

pub fn to_json(report: &StatisticsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Human-readable rendering of a report, one section per statistic.
pub struct TextReport<'a>(pub &'a StatisticsReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Filter: {}", r.filter)?;
        write!(f, "Trips: {}", r.record_count)?;
        if r.skipped_records > 0 {
            write!(f, " ({} malformed rows skipped)", r.skipped_records)?;
        }
        writeln!(f)?;
        if r.is_empty() {
            writeln!(f, "No trips match this filter.")?;
        }
        writeln!(f, "{RULE}")?;

        writeln!(f, "\nCalculating The Most Frequent Times of Travel...\n")?;
        match &r.temporal.value {
            Some(t) => {
                popular(f, "Most frequent month of travel", &t.popular_month)?;
                counts(f, &t.month_counts)?;
                popular(f, "Most frequent day of travel", &t.popular_day)?;
                counts(f, &t.day_counts)?;
                popular(f, "Most frequent hour of travel", &t.popular_hour)?;
                counts(f, &t.hour_counts)?;
            }
            None => no_data(f)?,
        }
        footer(f, &r.temporal)?;

        writeln!(f, "\nCalculating The Most Popular Stations and Trip...\n")?;
        match &r.stations.value {
            Some(s) => {
                popular(f, "Most commonly used start station", &s.popular_start)?;
                popular(f, "Most commonly used end station", &s.popular_end)?;
                writeln!(
                    f,
                    "Most frequent combination of stations is from {} to {}, count: {}\n",
                    s.popular_trip.start_station, s.popular_trip.end_station, s.popular_trip.count
                )?;
            }
            None => no_data(f)?,
        }
        footer(f, &r.stations)?;

        writeln!(f, "\nCalculating Trip Duration...\n")?;
        match &r.duration.value {
            Some(d) => {
                writeln!(f, "Total travel duration is: {}\n", d.total)?;
                writeln!(f, "Mean travel duration is: {}\n", d.mean)?;
            }
            None => no_data(f)?,
        }
        footer(f, &r.duration)?;

        writeln!(f, "\nCalculating User Stats...\n")?;
        let u = &r.users.value;
        writeln!(f, "What's the break down of user types:")?;
        counts(f, &u.user_types)?;
        match &u.gender {
            Demographic::Available(dist) => {
                writeln!(f, "What's the break down of gender:")?;
                counts(f, dist)?;
            }
            Demographic::NoData => writeln!(f, "No gender values for this filter.")?,
            Demographic::Unavailable => writeln!(f, "There is no gender information for this dataset.")?,
        }
        match &u.birth_year {
            Demographic::Available(b) => {
                writeln!(f, "The earliest year of birth is: {}", b.earliest)?;
                writeln!(f, "The most recent year of birth is: {}", b.most_recent)?;
                writeln!(f, "The most common year of birth is: {}", b.most_common)?;
            }
            Demographic::NoData => writeln!(f, "No birth year values for this filter.")?,
            Demographic::Unavailable => {
                writeln!(f, "There are no birth year statistics for this dataset.")?
            }
        }
        footer(f, &r.users)
    }
}

fn popular<T: fmt::Display>(f: &mut fmt::Formatter<'_>, label: &str, p: &Popular<T>) -> fmt::Result {
    writeln!(f, "{label}: {}, count: {}", p.value, p.count)
}

fn counts<T: fmt::Display>(f: &mut fmt::Formatter<'_>, dist: &[Popular<T>]) -> fmt::Result {
    for p in dist {
        writeln!(f, "    {:<40} {}", p.value.to_string(), p.count)?;
    }
    writeln!(f)
}

fn no_data(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "No data for this filter.\n")
}

fn footer<T>(f: &mut fmt::Formatter<'_>, section: &Section<T>) -> fmt::Result {
    writeln!(f, "\nThis took {:.6} seconds.", section.elapsed_secs)?;
    writeln!(f, "{RULE}")
}

/// Renders one page of raw trips as JSON, one object per line.
pub fn render_page(records: &[TripRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Flat view of a report, suitable for one CSV row.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub city: String,
    pub mode: String,
    pub month: String,
    pub day: String,
    pub trips: usize,
    pub skipped_records: usize,
    pub popular_month: Option<String>,
    pub popular_day: Option<String>,
    pub popular_hour: Option<u32>,
    pub popular_start_station: Option<String>,
    pub popular_end_station: Option<String>,
    pub popular_trip_start: Option<String>,
    pub popular_trip_end: Option<String>,
    pub total_duration_seconds: Option<u64>,
    pub mean_duration_seconds: Option<f64>,
}

impl From<&StatisticsReport> for ReportSummary {
    fn from(r: &StatisticsReport) -> Self {
        let temporal = r.temporal.value.as_ref();
        let stations = r.stations.value.as_ref();
        let duration = r.duration.value.as_ref();

        ReportSummary {
            generated_at: r.generated_at,
            city: r.filter.city().to_string(),
            mode: r.filter.mode().to_string(),
            month: r.filter.month().map_or(ALL.to_string(), |m| m.to_string()),
            day: r.filter.day().map_or(ALL.to_string(), |d| d.to_string()),
            trips: r.record_count,
            skipped_records: r.skipped_records,
            popular_month: temporal.map(|t| t.popular_month.value.to_string()),
            popular_day: temporal.map(|t| t.popular_day.value.to_string()),
            popular_hour: temporal.map(|t| t.popular_hour.value),
            popular_start_station: stations.map(|s| s.popular_start.value.clone()),
            popular_end_station: stations.map(|s| s.popular_end.value.clone()),
            popular_trip_start: stations.map(|s| s.popular_trip.start_station.clone()),
            popular_trip_end: stations.map(|s| s.popular_trip.end_station.clone()),
            total_duration_seconds: duration.map(|d| d.total_seconds),
            mean_duration_seconds: duration.map(|d| d.mean_seconds),
        }
    }
}

/// Appends a [`ReportSummary`] row for `report` to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, report: &StatisticsReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(ReportSummary::from(report))?;
    writer.flush()?;

    info!(path, "Report summary appended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::filter::FilterSpec;
    use crate::record::RecordSet;
    use crate::record::fixtures::trip;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn report(records: Vec<TripRecord>, city: City) -> StatisticsReport {
        let set = RecordSet::new(city, records);
        StatisticsReport::compute(&set, FilterSpec::unfiltered(city), 0).unwrap()
    }

    fn sample_report() -> StatisticsReport {
        report(
            vec![
                trip("2017-01-06 08:00:00", 10, "Canal St & Adams St", "Clinton St & Madison St"),
                trip("2017-01-06 08:10:00", 20, "Canal St & Adams St", "Clinton St & Madison St"),
            ],
            City::Washington,
        )
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_text_report_sections() {
        let text = TextReport(&sample_report()).to_string();
        assert!(text.contains("Most frequent month of travel: January, count: 2"));
        assert!(text.contains("Most frequent day of travel: Friday, count: 2"));
        assert!(text.contains("from Canal St & Adams St to Clinton St & Madison St"));
        assert!(text.contains("Total travel duration is: 0:00:30"));
        assert!(text.contains("Mean travel duration is: 0:00:15"));
        assert!(text.contains("There is no gender information for this dataset."));
        assert!(text.contains("This took"));
    }

    #[test]
    fn test_text_report_empty_set() {
        let text = TextReport(&report(vec![], City::Chicago)).to_string();
        assert!(text.contains("Trips: 0\nNo trips match this filter."));
        assert_eq!(text.matches("No data for this filter.").count(), 3);
        assert!(text.contains("No birth year values for this filter."));
    }

    #[test]
    fn test_sinks_write_output() {
        let mut text = TextSink(Vec::new());
        text.emit(&sample_report()).unwrap();
        assert!(!text.0.is_empty());

        let mut json = JsonSink(Vec::new());
        json.emit(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json.0).unwrap();
        assert_eq!(value["record_count"], 2);
    }

    #[test]
    fn test_render_page_one_line_per_trip() {
        let records = vec![
            trip("2017-01-06 08:00:00", 10, "A", "B"),
            trip("2017-01-06 08:10:00", 20, "A", "C"),
        ];
        let page = render_page(&records).unwrap();
        assert_eq!(page.lines().count(), 2);
        assert!(page.contains("\"end_station\":\"C\""));
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("bikeshare_stats_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_report()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Washington"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("bikeshare_stats_test_header.csv");
        let _ = fs::remove_file(&path);

        let mut sink = CsvSummarySink { path: path.clone() };
        sink.emit(&sample_report()).unwrap();
        sink.emit(&report(vec![], City::Chicago)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("generated_at")).count(), 1);

        fs::remove_file(&path).unwrap();
    }
}
