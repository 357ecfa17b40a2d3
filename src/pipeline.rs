//! One run of the report: load, filter, compute.

use tracing::{info, instrument};

use crate::error::CoreError;
use crate::filter::{self, FilterSpec};
use crate::loader::{MalformedPolicy, load_records};
use crate::record::RecordSet;
use crate::source::RecordSource;
use crate::stats::StatisticsReport;

/// Output of a run: the filtered trips (for paging) and their statistics.
#[derive(Debug)]
pub struct RunOutput {
    pub filtered: RecordSet,
    pub report: StatisticsReport,
}

pub struct Pipeline<S> {
    source: S,
    policy: MalformedPolicy,
}

impl<S: RecordSource> Pipeline<S> {
    pub fn new(source: S, policy: MalformedPolicy) -> Self {
        Self { source, policy }
    }

    /// Loads the spec's city, filters it, and computes every report.
    #[instrument(level = "debug", skip(self), fields(filter = %spec))]
    pub fn run(&self, spec: &FilterSpec) -> Result<RunOutput, CoreError> {
        let loaded = load_records(&self.source, spec.city(), self.policy)?;
        let filtered = filter::apply(&loaded.records, spec);
        info!(
            loaded = loaded.records.len(),
            filtered = filtered.len(),
            skipped = loaded.skipped,
            "Filtered trip records"
        );

        let report = StatisticsReport::compute(&filtered, *spec, loaded.skipped)?;
        Ok(RunOutput { filtered, report })
    }
}
