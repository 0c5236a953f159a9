extern crate self as clinval;

use serde::{Deserialize, Serialize};

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod templates;

pub use api::{
    CandidateSummary, DEFAULT_MAX_GAP, ExtractionDetails, ExtractionRequest, ExtractionResponse, ExtractionVerbose,
    MeasurementResult, Options, extract, extract_verbose_with, extract_with,
};
pub use error::ExtractionError;

// --- Public value types ------------------------------------------------------

/// Comparison semantics of a matched expression.
///
/// Serialized as the fixed tags `EQUAL`, `LT`, `LTE`, `GT`, `GTE`, `APPROX`,
/// `RANGE` and `FRACTION_RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    Equal,
    Lt,
    Lte,
    Gt,
    Gte,
    Approx,
    Range,
    FractionRange,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Equal => "EQUAL",
            Condition::Lt => "LT",
            Condition::Lte => "LTE",
            Condition::Gt => "GT",
            Condition::Gte => "GTE",
            Condition::Approx => "APPROX",
            Condition::Range => "RANGE",
            Condition::FractionRange => "FRACTION_RANGE",
        }
    }

    /// Whether a result with this condition carries a second endpoint.
    pub fn is_range(&self) -> bool {
        matches!(self, Condition::Range | Condition::FractionRange)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported value: a number in numeric mode, a keyword in categorical mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // whole numbers print without a trailing ".0"
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

// --- Internal types ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    /// True when the two spans share at least one byte.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How the numeral text was suffixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SuffixKind {
    Plain,
    /// `20k` -> 20000
    Thousands,
    /// `90s`, `80's` -> the literal decade value
    Decade,
}

/// A numeral-like token recognized by the lexer.
///
/// Dual fractions (`120/80`) are a single token: `value` holds the numerator
/// and `denominator` the second component.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumeralToken {
    pub raw: String,
    pub range: Range,
    pub value: f64,
    pub suffix: SuffixKind,
    pub denominator: Option<f64>,
    /// Directly preceded by an ASCII letter (`T97.3`, `SaO2`).
    pub glued: bool,
}

impl NumeralToken {
    /// The component selected for reporting.
    pub fn component(&self, denominator: bool) -> f64 {
        match (denominator, self.denominator) {
            (true, Some(d)) => d,
            _ => self.value,
        }
    }
}

/// Template families, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TemplateKind {
    FractionRange,
    Range,
    Approximate,
    Inequality,
    Equality,
}

/// Numerals that follow one term occurrence, as seen by a template.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window<'a> {
    /// Scrubbed text between the end of the term and the first numeral.
    pub lead: &'a str,
    /// Numerals following the term, in source order.
    pub tokens: &'a [NumeralToken],
    /// The full scrubbed text the token offsets refer to.
    pub text: &'a str,
}

impl<'a> Window<'a> {
    pub fn token(&self, idx: usize) -> Option<&'a NumeralToken> {
        self.tokens.get(idx)
    }

    /// Text between token `idx` and token `idx + 1`.
    pub fn gap(&self, idx: usize) -> Option<&'a str> {
        let left = self.tokens.get(idx)?;
        let right = self.tokens.get(idx + 1)?;
        self.text.get(left.range.end..right.range.start)
    }
}

/// Indices of the numerals a template consumed, plus the comparator it read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TemplateMatch {
    pub first: usize,
    pub second: Option<usize>,
    pub comparator: Option<Condition>,
}

impl TemplateMatch {
    pub fn single(first: usize) -> Self {
        TemplateMatch { first, second: None, comparator: None }
    }

    pub fn pair(first: usize, second: usize) -> Self {
        TemplateMatch { first, second: Some(second), comparator: None }
    }

    pub fn compared(first: usize, comparator: Condition) -> Self {
        TemplateMatch { first, second: None, comparator: Some(comparator) }
    }
}

pub(crate) type Matcher = fn(&Window<'_>) -> Option<TemplateMatch>;

/// An expression template: a name, the family it belongs to, the coarse
/// input buckets it needs, and a pure matcher.
pub(crate) struct Template {
    pub name: &'static str,
    pub kind: TemplateKind,
    pub matcher: Matcher,
    /// Bucket mask - template only activates if the input has all of these.
    pub buckets: engine::BucketMask,
    /// Higher is tried first.
    pub priority: u16,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("matcher", &"<function>")
            .field("buckets", &self.buckets)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A tentative term + expression match before overlap and bounds resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub term: String,
    /// Term start to the end of the consumed expression.
    pub range: Range,
    pub x: Value,
    pub y: Option<Value>,
    pub condition: Condition,
    pub denominator: bool,
    /// Name of the template that produced this candidate.
    pub template: &'static str,
}

impl Candidate {
    /// Length of the matched term text, used to rank overlapping candidates.
    pub fn term_len(&self) -> usize {
        self.term.chars().count()
    }
}
