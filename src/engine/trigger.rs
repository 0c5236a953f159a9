//! Trigger scanning (input pre-classification).
//!
//! This module inspects the scrubbed input and produces coarse signals that
//! let the extractor quickly decide which templates should be considered.
//!
//! The scan only produces **buckets** (`BucketMask`): cheap booleans such as
//! "contains digits" or "mentions a comparator". Templates declare the buckets
//! they need and are skipped when the input cannot possibly satisfy them.
//!
//! ## Design notes
//!
//! - This is a *heuristic* scan. False positives are acceptable because the
//!   templates still have to match; false negatives are not, so every keyword
//!   a template reads must be covered here.
//! - Keywords are checked with plain substring search on the lowercased text.
//!   Glued forms like `RR22to42` must still light up the range bucket, so no
//!   tokenization happens here.

use super::compiled_templates::BucketMask;

/// Input characteristics detected from the scrubbed input.
#[derive(Debug, Clone, Copy)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
}

const RANGE_MARKS: &[&str] = &["-", "\u{2013}", "\u{2014}", "to", "thru", "through", "between"];
const APPROX_MARKS: &[&str] = &["~", "approx"];
const COMPARATOR_MARKS: &[&str] = &["<", ">", "\u{2264}", "\u{2265}", "lt", "gt", "less", "greater"];

impl TriggerInfo {
    /// Scan `lower` (already ASCII-lowercased) for coarse buckets.
    pub fn scan(lower: &str) -> Self {
        let mut buckets = BucketMask::empty();

        if lower.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }
        if lower.contains('/') {
            buckets |= BucketMask::HAS_SLASH;
        }
        if RANGE_MARKS.iter().any(|m| lower.contains(m)) {
            buckets |= BucketMask::RANGEISH;
        }
        if APPROX_MARKS.iter().any(|m| lower.contains(m)) {
            buckets |= BucketMask::APPROXISH;
        }
        if COMPARATOR_MARKS.iter().any(|m| lower.contains(m)) {
            buckets |= BucketMask::COMPARATORISH;
        }

        TriggerInfo { buckets }
    }
}
