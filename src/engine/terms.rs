//! Term matching.
//!
//! Terms made only of letters and spaces match as whole words, so `hr` does
//! not fire inside `three`. Any other term (`o2 sat`, `t`, `+`) is matched
//! literally. Matching is case-insensitive and any run of whitespace in the
//! text may stand in for a space in the term.
//!
//! Compiled matchers are kept in a process-wide LRU cache so repeated calls
//! with the same term list do not recompile regexes.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::Range;
use crate::error::ExtractionError;

const MATCHER_CACHE_CAPACITY: usize = 1000;

static MATCHER_CACHE: Lazy<Mutex<LruCache<String, Arc<TermMatcher>>>> = Lazy::new(|| {
    Mutex::new(LruCache::new(
        NonZeroUsize::new(MATCHER_CACHE_CAPACITY).expect("matcher cache capacity is non-zero"),
    ))
});

#[derive(Debug)]
pub(crate) struct TermMatcher {
    pub term: String,
    regex: Regex,
    whole_word: bool,
}

impl TermMatcher {
    fn compile(term: &str) -> Result<Self, ExtractionError> {
        let whole_word = term.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
        let body = term.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+");
        let regex = Regex::new(&format!("(?i){body}"))
            .map_err(|source| ExtractionError::TermCompile { term: term.to_string(), source })?;
        Ok(TermMatcher { term: term.to_string(), regex, whole_word })
    }

    /// Fetch a compiled matcher for `term`, compiling it on a cache miss.
    pub fn cached(term: &str) -> Result<Arc<Self>, ExtractionError> {
        let mut cache = MATCHER_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(hit) = cache.get(term) {
            return Ok(Arc::clone(hit));
        }
        trace!(term, "compiling term matcher");
        let matcher = Arc::new(Self::compile(term)?);
        cache.put(term.to_string(), Arc::clone(&matcher));
        Ok(matcher)
    }

    /// Every occurrence of the term in `text`.
    pub fn find_all(&self, text: &str) -> Vec<Range> {
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(m) = self.regex.find_at(text, pos) {
            let ok = !self.whole_word || {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                // digits may follow a word term (`t97.3`), letters may not
                !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphabetic)
            };
            if ok {
                out.push(Range::new(m.start(), m.end()));
                pos = m.end();
            } else {
                pos = next_char_boundary(text, m.start());
            }
            if pos >= text.len() {
                break;
            }
        }
        out
    }
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    let mut i = from + 1;
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// The distinct terms of one request, with their matchers.
#[derive(Debug, Clone)]
pub(crate) struct TermSet {
    matchers: Vec<Arc<TermMatcher>>,
}

/// One occurrence of a term in the scrubbed text.
#[derive(Debug, Clone)]
pub(crate) struct Occurrence {
    pub term: String,
    pub range: Range,
}

impl TermSet {
    /// Trim, lowercase and de-duplicate `terms`, dropping empty entries.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, ExtractionError> {
        let mut seen: Vec<String> = Vec::new();
        for t in terms {
            let t = t.as_ref().trim().to_lowercase();
            if !t.is_empty() && !seen.contains(&t) {
                seen.push(t);
            }
        }
        if seen.is_empty() {
            return Err(ExtractionError::EmptyTermList);
        }
        let matchers = seen.iter().map(|t| TermMatcher::cached(t)).collect::<Result<Vec<_>, _>>()?;
        Ok(TermSet { matchers })
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.term.as_str())
    }

    /// All occurrences of every term, ordered by start offset.
    pub fn occurrences(&self, text: &str) -> Vec<Occurrence> {
        let mut out: Vec<Occurrence> = self
            .matchers
            .iter()
            .flat_map(|m| m.find_all(text).into_iter().map(|range| Occurrence { term: m.term.clone(), range }))
            .collect();
        out.sort_by(|a, b| a.range.start.cmp(&b.range.start).then(b.range.end.cmp(&a.range.end)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(term: &str, text: &str) -> Vec<(usize, usize)> {
        let m = TermMatcher::cached(term).unwrap();
        m.find_all(text).into_iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn word_terms_respect_boundaries() {
        assert_eq!(spans("hr", "three hr 45"), vec![(6, 8)]);
        assert_eq!(spans("t", "t97.3 at rest"), vec![(0, 1)]);
        assert!(spans("rr", "error").is_empty());
        assert!(spans("hr", "\u{fc}hr 45").is_empty());
        assert!(spans("hr", "hr\u{e9} 45").is_empty());
        assert_eq!(spans("hr", "\u{e9}t\u{e9} hr 45"), vec![(6, 8)]);
    }

    #[test]
    fn multi_word_terms_allow_any_whitespace() {
        assert_eq!(spans("heart rate", "heart   rate 80"), vec![(0, 12)]);
        assert_eq!(spans("heart rate", "Heart\nRate 80"), vec![(0, 10)]);
    }

    #[test]
    fn symbolic_terms_match_literally() {
        assert_eq!(spans("o2 sat", "his o2 sat 98"), vec![(4, 10)]);
        assert_eq!(spans("+", "+titer"), vec![(0, 1)]);
    }

    #[test]
    fn cache_returns_the_same_matcher() {
        let a = TermMatcher::cached("lvef").unwrap();
        let b = TermMatcher::cached("lvef").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn term_set_normalizes_entries() {
        let set = TermSet::new(&[" LVEF", "lvef", "", "ejection fraction "]).unwrap();
        let terms: Vec<&str> = set.terms().collect();
        assert_eq!(terms, vec!["lvef", "ejection fraction"]);
    }

    #[test]
    fn term_set_rejects_empty_lists() {
        let err = TermSet::new(&[" ", ""]).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyTermList));
    }

    #[test]
    fn occurrences_are_ordered() {
        let set = TermSet::new(&["ef", "lvef"]).unwrap();
        let occ = set.occurrences("lvef 40 and ef 35");
        let found: Vec<(&str, usize)> = occ.iter().map(|o| (o.term.as_str(), o.range.start)).collect();
        assert_eq!(found, vec![("lvef", 0), ("ef", 12)]);
    }
}
