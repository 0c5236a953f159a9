//! Overlap resolution.
//!
//! Two candidates overlap when their spans (term start to end of the consumed
//! expression) share a byte. This happens when one term contains another
//! (`o2` in `o2 sat`, `pt` in `inr(pt)`) or when a term's expression runs into
//! a neighbour's.
//!
//! Candidates are ranked by matched term length (longest first), then by start
//! offset, then by term text, and accepted greedily: a candidate survives only
//! if it overlaps none already accepted. The ranking is a total order, so the
//! outcome never depends on generation order.

use std::cmp::Ordering;

use crate::Candidate;

fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.term_len()
        .cmp(&a.term_len())
        .then(a.range.start.cmp(&b.range.start))
        .then_with(|| a.term.cmp(&b.term))
        .then(a.range.end.cmp(&b.range.end))
}

/// Split `candidates` into survivors (ordered by start offset) and dropped.
pub(crate) fn resolve_overlaps(mut candidates: Vec<Candidate>) -> (Vec<Candidate>, Vec<Candidate>) {
    candidates.sort_by(rank);

    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut dropped = Vec::new();
    for c in candidates {
        if kept.iter().any(|k| k.range.overlaps(&c.range)) {
            dropped.push(c);
        } else {
            kept.push(c);
        }
    }

    kept.sort_by(|a, b| a.range.start.cmp(&b.range.start).then(a.range.end.cmp(&b.range.end)));
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, Range, Value};

    fn cand(term: &str, start: usize, end: usize) -> Candidate {
        Candidate {
            term: term.to_string(),
            range: Range::new(start, end),
            x: Value::Number(1.0),
            y: None,
            condition: Condition::Equal,
            denominator: false,
            template: "equality",
        }
    }

    #[test]
    fn longest_term_wins() {
        let (kept, dropped) = resolve_overlaps(vec![cand("o2", 0, 14), cand("o2 sat", 0, 14)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].term, "o2 sat");
        assert_eq!(dropped[0].term, "o2");
    }

    #[test]
    fn disjoint_candidates_all_survive_in_start_order() {
        let (kept, dropped) = resolve_overlaps(vec![cand("rr", 10, 15), cand("hr", 0, 5), cand("bp", 20, 29)]);
        let terms: Vec<&str> = kept.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["hr", "rr", "bp"]);
        assert!(dropped.is_empty());
    }

    #[test]
    fn outcome_is_independent_of_input_order() {
        let a = vec![cand("pt", 4, 11), cand("inr(pt)", 0, 11), cand("ptt", 12, 20)];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(resolve_overlaps(a).0, resolve_overlaps(b).0);
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let (kept, _) = resolve_overlaps(vec![cand("t", 0, 6), cand("hr", 6, 11)]);
        assert_eq!(kept.len(), 2);
    }
}
