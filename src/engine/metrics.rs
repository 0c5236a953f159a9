//! Engine run metrics.
//!
//! `Extractor::run` is the normal path; `Extractor::run_with_metrics` also
//! returns phase timings and the intermediate candidate lists, which the CLI
//! debug report and verbose API surface.

use std::time::Duration;

use crate::Candidate;
use crate::api::MeasurementResult;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Extractor::run_with_metrics`].
    pub total: Duration,
    /// Scrubbing, trigger scan, lexing and term search.
    pub scan: Duration,
    /// Template matching over every occurrence.
    pub generate: Duration,
    /// Overlap resolution and bounds filtering.
    pub resolve: Duration,
}

/// Extractor output bundled with the intermediate lists and timings.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    /// Names of the templates that passed bucket gating.
    pub active_templates: Vec<&'static str>,
    /// Every candidate before overlap resolution.
    pub candidates: Vec<Candidate>,
    /// Candidates removed by overlap resolution.
    pub overlap_dropped: Vec<Candidate>,
    /// Candidates removed by the bounds filter.
    pub bounds_dropped: Vec<Candidate>,
    /// Final results in start order.
    pub results: Vec<MeasurementResult>,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}
