use crate::engine::{self, CompiledTemplates, Extractor, terms::TermSet};
use crate::error::ExtractionError;
use crate::{Candidate, Condition, Template, Value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

static DEFAULT_TEMPLATES: Lazy<Vec<Template>> = Lazy::new(crate::templates::rules::get);
static COMPILED_TEMPLATES: Lazy<CompiledTemplates<'static>> = Lazy::new(|| CompiledTemplates::new(&DEFAULT_TEMPLATES));

/// Default byte distance allowed between a term and its first numeral.
pub const DEFAULT_MAX_GAP: usize = 64;

/// Tuning knobs that do not change what a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Maximum bytes between the end of a term and its first numeral.
    pub max_gap: usize,
    /// Maximum bytes between the end of a term and an enum keyword.
    pub enum_max_gap: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_gap: DEFAULT_MAX_GAP, enum_max_gap: DEFAULT_MAX_GAP }
    }
}

impl Options {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, ExtractionError> {
        let options: Options = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.max_gap == 0 {
            return Err(ExtractionError::InvalidOptions("maxGap must be positive".into()));
        }
        if self.enum_max_gap == 0 {
            return Err(ExtractionError::InvalidOptions("enumMaxGap must be positive".into()));
        }
        Ok(())
    }
}

/// What to look for: terms, accepted value bounds and the reporting mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub terms: Vec<String>,
    pub min_value: f64,
    pub max_value: f64,
    /// Keywords for categorical mode. When present, numerals are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_list: Option<Vec<String>>,
    /// Report the second component of fractions instead of the first.
    #[serde(default)]
    pub report_denominator: bool,
}

/// Split a comma-separated list, trimming entries but keeping empty ones.
fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

impl ExtractionRequest {
    /// Build a numeric request from a comma-separated term list.
    pub fn new(term_list: &str, min_value: f64, max_value: f64) -> Self {
        ExtractionRequest {
            terms: split_list(term_list),
            min_value,
            max_value,
            enum_list: None,
            report_denominator: false,
        }
    }

    /// Switch to categorical mode with a comma-separated keyword list.
    pub fn with_enum_list(mut self, enum_list: &str) -> Self {
        self.enum_list = Some(split_list(enum_list));
        self
    }

    pub fn with_report_denominator(mut self, report_denominator: bool) -> Self {
        self.report_denominator = report_denominator;
        self
    }

    /// Reject requests that cannot be run. Nothing is matched until this passes.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.terms.iter().all(|t| t.trim().is_empty()) {
            return Err(ExtractionError::EmptyTermList);
        }
        if !self.min_value.is_finite() || !self.max_value.is_finite() || self.min_value > self.max_value {
            return Err(ExtractionError::InvalidBounds { min: self.min_value, max: self.max_value });
        }
        if let Some(list) = &self.enum_list {
            if list.is_empty() {
                return Err(ExtractionError::MalformedEnumList("list is empty".into()));
            }
            if let Some(pos) = list.iter().position(|e| e.trim().is_empty()) {
                return Err(ExtractionError::MalformedEnumList(format!("entry {} is empty", pos + 1)));
            }
        }
        Ok(())
    }
}

/// One extracted measurement.
///
/// `start`/`end` are byte offsets into the input text covering the term and
/// its expression. They are not part of the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResult {
    pub matching_term: String,
    pub x: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    pub condition: Condition,
    #[serde(skip)]
    pub start: usize,
    #[serde(skip)]
    pub end: usize,
}

impl From<Candidate> for MeasurementResult {
    fn from(c: Candidate) -> Self {
        MeasurementResult {
            matching_term: c.term,
            x: c.x,
            y: c.y,
            condition: c.condition,
            start: c.range.start,
            end: c.range.end,
        }
    }
}

/// Result from [`extract`] and [`extract_with`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub measurement_count: usize,
    pub measurement_list: Vec<MeasurementResult>,
}

impl ExtractionResponse {
    fn new(measurement_list: Vec<MeasurementResult>) -> Self {
        ExtractionResponse { measurement_count: measurement_list.len(), measurement_list }
    }

    pub fn to_json(&self) -> Result<String, ExtractionError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A compact view of a candidate, used in verbose traces.
#[derive(Debug, Clone)]
pub struct CandidateSummary {
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub template: &'static str,
    pub condition: Condition,
    pub x: Value,
    pub y: Option<Value>,
    /// Values are fraction denominators.
    pub denominator: bool,
}

impl From<&Candidate> for CandidateSummary {
    fn from(c: &Candidate) -> Self {
        CandidateSummary {
            term: c.term.clone(),
            start: c.range.start,
            end: c.range.end,
            template: c.template,
            condition: c.condition,
            x: c.x.clone(),
            y: c.y.clone(),
            denominator: c.denominator,
        }
    }
}

/// Additional details returned by [`extract_verbose_with`].
#[derive(Debug, Clone)]
pub struct ExtractionDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Scrubbing, trigger scan, lexing and term search.
    pub scan: Duration,
    /// Template matching.
    pub generate: Duration,
    /// Overlap resolution and bounds filtering.
    pub resolve: Duration,
    /// Names of templates that were active for this input.
    pub active_templates: Vec<String>,
    /// Every candidate before overlap resolution.
    pub candidates: Vec<CandidateSummary>,
    pub overlap_dropped: Vec<CandidateSummary>,
    pub bounds_dropped: Vec<CandidateSummary>,
}

/// Result from [`extract_verbose_with`].
#[derive(Debug, Clone)]
pub struct ExtractionVerbose {
    pub response: ExtractionResponse,
    pub details: ExtractionDetails,
}

/// Extract values for a comma-separated `term_list` from `text`.
///
/// With `enum_list`, each term is paired with the nearest following keyword
/// instead of a numeral. With `report_denominator`, fractions report their
/// second component.
///
/// # Example
/// ```
/// use clinval::{Condition, Value, extract};
///
/// let out = extract("lvef", "The LVEF is 40%.", 0.0, 100.0, None, false).unwrap();
/// assert_eq!(out.measurement_count, 1);
/// assert_eq!(out.measurement_list[0].x, Value::Number(40.0));
/// assert_eq!(out.measurement_list[0].condition, Condition::Equal);
/// ```
pub fn extract(
    term_list: &str,
    text: &str,
    min_value: f64,
    max_value: f64,
    enum_list: Option<&str>,
    report_denominator: bool,
) -> Result<ExtractionResponse, ExtractionError> {
    let mut request = ExtractionRequest::new(term_list, min_value, max_value).with_report_denominator(report_denominator);
    if let Some(list) = enum_list {
        request = request.with_enum_list(list);
    }
    extract_with(&request, text, &Options::default())
}

fn prepare(request: &ExtractionRequest, options: &Options) -> Result<(TermSet, Option<TermSet>), ExtractionError> {
    request.validate()?;
    options.validate()?;
    let terms = TermSet::new(&request.terms)?;
    let keywords = match &request.enum_list {
        Some(list) => Some(TermSet::new(list)?),
        None => None,
    };
    Ok((terms, keywords))
}

/// Extract with an explicit request and options.
pub fn extract_with(
    request: &ExtractionRequest,
    text: &str,
    options: &Options,
) -> Result<ExtractionResponse, ExtractionError> {
    let (terms, keywords) = prepare(request, options)?;
    let extractor = Extractor::new(text, &COMPILED_TEMPLATES, options);
    let results = extractor.run(&terms, keywords.as_ref(), request);
    debug!(results = results.len(), "extracted");
    Ok(ExtractionResponse::new(results))
}

/// Extract and return extra (compact) debug details.
///
/// The default [`extract_with`] path does not keep these intermediate lists.
pub fn extract_verbose_with(
    request: &ExtractionRequest,
    text: &str,
    options: &Options,
) -> Result<ExtractionVerbose, ExtractionError> {
    let (terms, keywords) = prepare(request, options)?;
    let extractor = Extractor::new(text, &COMPILED_TEMPLATES, options);
    let run: engine::RunResult = extractor.run_with_metrics(&terms, keywords.as_ref(), request);

    let details = ExtractionDetails {
        total: run.metrics.total,
        scan: run.metrics.scan,
        generate: run.metrics.generate,
        resolve: run.metrics.resolve,
        active_templates: run.active_templates.iter().map(|s| s.to_string()).collect(),
        candidates: run.candidates.iter().map(CandidateSummary::from).collect(),
        overlap_dropped: run.overlap_dropped.iter().map(CandidateSummary::from).collect(),
        bounds_dropped: run.bounds_dropped.iter().map(CandidateSummary::from).collect(),
    };

    Ok(ExtractionVerbose { response: ExtractionResponse::new(run.results), details })
}
