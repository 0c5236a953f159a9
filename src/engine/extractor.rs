//! The extraction pipeline for one input text.
//!
//! `Extractor::new` does the per-input preparation (scrubbing, trigger scan and
//! template selection); `run` / `run_with_metrics` execute the remaining
//! phases for one request:
//!
//! ```text
//! scrub -> lex numerals + find term occurrences -> generate candidates
//!       -> resolve overlaps -> bounds filter -> results (start order)
//! ```
//!
//! Categorical requests skip the numeral phases and pair each occurrence with
//! an enum keyword instead.

use std::time::{Duration, Instant};

use tracing::debug;

use super::compiled_templates::CompiledTemplates;
use super::generator::Generator;
use super::metrics::{RunMetrics, RunResult};
use super::terms::TermSet;
use super::trigger::TriggerInfo;
use super::{assemble, categorical, lexer, overlap, scrub};
use crate::Template;
use crate::api::{ExtractionRequest, MeasurementResult, Options};

pub(crate) struct Extractor<'a> {
    scrubbed: String,
    active: Vec<&'a Template>,
    max_gap: usize,
    enum_max_gap: usize,
    prepare: Duration,
}

impl<'a> Extractor<'a> {
    pub fn new(input: &str, compiled: &CompiledTemplates<'a>, options: &Options) -> Self {
        let start = Instant::now();
        let scrubbed = scrub::scrub(input);
        let trigger = TriggerInfo::scan(&scrubbed);
        let active = compiled.select(trigger.buckets);
        debug!(buckets = ?trigger.buckets, active = active.len(), "trigger scan");

        Extractor {
            scrubbed,
            active,
            max_gap: options.max_gap,
            enum_max_gap: options.enum_max_gap,
            prepare: start.elapsed(),
        }
    }

    pub fn active_template_names(&self) -> Vec<&'static str> {
        self.active.iter().map(|t| t.name).collect()
    }

    /// Run every phase, keeping intermediate lists and timings.
    pub fn run_with_metrics(
        &self,
        terms: &TermSet,
        keywords: Option<&TermSet>,
        request: &ExtractionRequest,
    ) -> RunResult {
        let total_start = Instant::now();

        let scan_start = Instant::now();
        let occurrences = terms.occurrences(&self.scrubbed);
        let tokens = match keywords {
            Some(_) => Vec::new(),
            None => lexer::tokens(&self.scrubbed),
        };
        let scan = self.prepare + scan_start.elapsed();
        debug!(
            terms = ?terms.terms().collect::<Vec<_>>(),
            occurrences = occurrences.len(),
            numerals = tokens.len(),
            "scan"
        );

        let generate_start = Instant::now();
        let candidates = match keywords {
            Some(kw) => categorical::candidates(&self.scrubbed, &occurrences, kw, self.enum_max_gap),
            None => Generator::new(&self.scrubbed, &tokens, &occurrences, &self.active, self.max_gap)
                .candidates(request.report_denominator),
        };
        let generate = generate_start.elapsed();

        let resolve_start = Instant::now();
        let (kept, overlap_dropped) = overlap::resolve_overlaps(candidates.clone());
        let (results, bounds_dropped) = assemble::assemble(kept, request.min_value, request.max_value);
        let resolve = resolve_start.elapsed();

        debug!(
            candidates = candidates.len(),
            overlap_dropped = overlap_dropped.len(),
            bounds_dropped = bounds_dropped.len(),
            results = results.len(),
            "resolved"
        );

        RunResult {
            active_templates: self.active_template_names(),
            candidates,
            overlap_dropped,
            bounds_dropped,
            results,
            metrics: RunMetrics { total: self.prepare + total_start.elapsed(), scan, generate, resolve },
        }
    }

    /// Run every phase, keeping only the results.
    pub fn run(&self, terms: &TermSet, keywords: Option<&TermSet>, request: &ExtractionRequest) -> Vec<MeasurementResult> {
        let occurrences = terms.occurrences(&self.scrubbed);
        let candidates = match keywords {
            Some(kw) => categorical::candidates(&self.scrubbed, &occurrences, kw, self.enum_max_gap),
            None => {
                let tokens = lexer::tokens(&self.scrubbed);
                Generator::new(&self.scrubbed, &tokens, &occurrences, &self.active, self.max_gap)
                    .candidates(request.report_denominator)
            }
        };
        let (kept, _) = overlap::resolve_overlaps(candidates);
        assemble::assemble(kept, request.min_value, request.max_value).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BucketMask;
    use crate::templates;

    #[test]
    fn digitless_input_activates_no_templates() {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);
        let ex = Extractor::new("heart rate normal", &compiled, &Options::default());
        assert!(ex.active_template_names().is_empty());
        assert!(!TriggerInfo::scan("heart rate normal").buckets.contains(BucketMask::HAS_DIGITS));
    }

    #[test]
    fn run_reports_every_phase() {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);
        let request = ExtractionRequest::new("o2, o2 sat", 0.0, 1000.0);
        let terms = TermSet::new(&request.terms).unwrap();

        let ex = Extractor::new("O2 sat= 100% 2L NC", &compiled, &Options::default());
        let run = ex.run_with_metrics(&terms, None, &request);

        assert_eq!(run.candidates.len(), 2);
        assert_eq!(run.overlap_dropped.len(), 1);
        assert_eq!(run.results.len(), 1);
        assert_eq!(run.results[0].matching_term, "o2 sat");
        assert!(run.metrics.scan <= run.metrics.total);
    }

    #[test]
    fn plain_run_matches_the_measured_run() {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);
        let request = ExtractionRequest::new("hr, rr, bp", 0.0, 150.0);
        let terms = TermSet::new(&request.terms).unwrap();

        let ex = Extractor::new("BP 120/80 HR 60-80s RR 18, later HR 190", &compiled, &Options::default());
        let plain = ex.run(&terms, None, &request);
        let measured = ex.run_with_metrics(&terms, None, &request);

        assert_eq!(plain, measured.results);
        assert_eq!(plain.len(), 3);
        assert_eq!(measured.bounds_dropped.len(), 1);
    }
}
