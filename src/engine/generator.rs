//! Candidate generation.
//!
//! For every term occurrence, find the numerals that follow it and try the
//! active templates in priority order. The first template that matches
//! produces the occurrence's candidate; later templates are not consulted.
//!
//! ## Association rules
//!
//! The first numeral after a term is its value only when:
//!
//! - it starts within `max_gap` bytes of the end of the term,
//! - the text in between (the *lead*) is filler (words, spaces and a few
//!   punctuation marks, see `templates::helpers::is_filler`),
//! - no other term occurrence starts inside the lead, and
//! - a non-empty lead does not end glued to the numeral (`RR SaO2` must not
//!   give `RR` the `2` of `SaO2`).
//!
//! An occurrence left without a value looks back instead (`a 55% LVEF`,
//! `45 bpm HR`). The preceding numeral is taken as a plain value when:
//!
//! - it ends within `max_gap` bytes of the start of the term,
//! - the text in between holds only letters, whitespace and `%`, with at
//!   least one space (`96O2` is a word, not a value and a term),
//! - no other term occurrence starts in between,
//! - it is neither glued nor the second half of a range or fraction pair, and
//! - no forward candidate already consumed it.

use tracing::trace;

use super::classify::classify;
use super::terms::Occurrence;
use crate::templates::helpers::{fraction_separator, is_filler, range_separator};
use crate::{Candidate, NumeralToken, Range, Template, Window};

/// Numerals handed to the templates per occurrence.
const WINDOW_TOKENS: usize = 2;

pub(crate) struct Generator<'a> {
    text: &'a str,
    tokens: &'a [NumeralToken],
    occurrences: &'a [Occurrence],
    templates: &'a [&'a Template],
    max_gap: usize,
}

impl<'a> Generator<'a> {
    pub fn new(
        text: &'a str,
        tokens: &'a [NumeralToken],
        occurrences: &'a [Occurrence],
        templates: &'a [&'a Template],
        max_gap: usize,
    ) -> Self {
        Generator { text, tokens, occurrences, templates, max_gap }
    }

    /// Index of the first token starting at or after `pos`.
    fn first_token_at(&self, pos: usize) -> Option<usize> {
        let idx = self.tokens.partition_point(|t| t.range.start < pos);
        (idx < self.tokens.len()).then_some(idx)
    }

    fn blocked(&self, from: usize, to: usize) -> bool {
        self.occurrences.iter().any(|o| o.range.start >= from && o.range.start < to)
    }

    /// The window following `occ`, if a numeral is associated with it.
    fn window(&self, occ: &Occurrence) -> Option<Window<'a>> {
        let first = self.first_token_at(occ.range.end)?;
        let t1 = &self.tokens[first];
        if t1.range.start > occ.range.end + self.max_gap {
            return None;
        }

        let lead = self.text.get(occ.range.end..t1.range.start)?;
        if !lead.is_empty() && t1.glued {
            return None;
        }
        if !is_filler(lead) || self.blocked(occ.range.end, t1.range.start) {
            return None;
        }

        let last = (first + WINDOW_TOKENS).min(self.tokens.len());
        Some(Window { lead, tokens: &self.tokens[first..last], text: self.text })
    }

    /// The numeral preceding `occ`, as a one-token window.
    fn preceding_window(&self, occ: &Occurrence) -> Option<Window<'a>> {
        let idx = self.tokens.partition_point(|t| t.range.end <= occ.range.start).checked_sub(1)?;
        let t = &self.tokens[idx];
        if t.glued || t.range.end + self.max_gap < occ.range.start {
            return None;
        }

        let trail = self.text.get(t.range.end..occ.range.start)?;
        if !trail.chars().all(|c| c.is_alphabetic() || c.is_whitespace() || c == '%')
            || !trail.contains(char::is_whitespace)
        {
            return None;
        }
        if self.blocked(t.range.end, occ.range.start) {
            return None;
        }
        if idx > 0 {
            let joint = self.text.get(self.tokens[idx - 1].range.end..t.range.start)?;
            if range_separator(joint).is_some() || fraction_separator(joint) {
                return None;
            }
        }

        Some(Window { lead: "", tokens: &self.tokens[idx..=idx], text: self.text })
    }

    fn first_match(&self, occ: &Occurrence, window: &Window<'_>, report_denominator: bool) -> Option<Candidate> {
        self.templates.iter().find_map(|template| {
            let m = (template.matcher)(window)?;
            let candidate = classify(occ, window, template, m, report_denominator)?;
            trace!(
                term = %occ.term,
                numeral = %window.tokens[m.first].raw,
                template = template.name,
                condition = %candidate.condition,
                "candidate"
            );
            Some(candidate)
        })
    }

    /// Candidates for every occurrence, in occurrence order.
    ///
    /// Forward associations are made for all occurrences first, so a look-back
    /// never takes a numeral that another term already reads forward.
    pub fn candidates(&self, report_denominator: bool) -> Vec<Candidate> {
        let mut found: Vec<Option<Candidate>> = self
            .occurrences
            .iter()
            .map(|occ| {
                let window = self.window(occ)?;
                self.first_match(occ, &window, report_denominator)
            })
            .collect();

        let forward: Vec<Range> = found.iter().flatten().map(|c| c.range).collect();
        for (occ, slot) in self.occurrences.iter().zip(found.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            let Some(window) = self.preceding_window(occ) else {
                trace!(term = %occ.term, start = occ.range.start, "no associated numeral");
                continue;
            };
            let token = window.tokens[0].range;
            if forward.iter().any(|r| r.overlaps(&token)) {
                trace!(term = %occ.term, start = occ.range.start, "preceding numeral already taken");
                continue;
            }
            *slot = self.first_match(occ, &window, report_denominator).map(|mut c| {
                c.range = Range::new(token.start, occ.range.end);
                c
            });
        }

        found.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexer::tokens;
    use crate::engine::terms::TermSet;
    use crate::engine::{CompiledTemplates, scrub};
    use crate::{Condition, Value, templates};

    fn generate(terms: &[&str], input: &str, max_gap: usize) -> Vec<Candidate> {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);
        let active = compiled.select(crate::engine::BucketMask::all());
        let text = scrub(input);
        let toks = tokens(&text);
        let occ = TermSet::new(terms).unwrap().occurrences(&text);
        Generator::new(&text, &toks, &occ, &active, max_gap).candidates(false)
    }

    #[test]
    fn first_matching_template_wins() {
        let c = generate(&["rr"], "RR approx. 22-42", 64);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].condition, Condition::Range);
        assert_eq!(c[0].template, "range");
    }

    #[test]
    fn lead_glued_to_numeral_is_rejected() {
        let c = generate(&["rr", "sao2"], "HR 60-80s RR  SaO2 96%", 64);
        let terms: Vec<&str> = c.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["sao2"]);
        assert_eq!(c[0].x, Value::Number(96.0));
    }

    #[test]
    fn another_term_inside_the_lead_blocks_association() {
        let c = generate(&["hr", "rr"], "HR RR 18", 64);
        let terms: Vec<&str> = c.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["rr"]);
    }

    #[test]
    fn numerals_beyond_max_gap_are_ignored() {
        assert_eq!(generate(&["lvef"], "LVEF was measured at 55%", 64).len(), 1);
        assert!(generate(&["lvef"], "LVEF was measured at 55%", 8).is_empty());
    }

    #[test]
    fn preceding_numeral_is_used_when_nothing_follows() {
        let c = generate(&["lvef"], "a 55% LVEF", 64);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].x, Value::Number(55.0));
        assert_eq!(c[0].condition, Condition::Equal);
        assert_eq!((c[0].range.start, c[0].range.end), (2, 10));

        let c = generate(&["hr"], "45 bpm HR", 64);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].x, Value::Number(45.0));
    }

    #[test]
    fn look_back_skips_numerals_read_forward() {
        let c = generate(&["ejection fraction"], "ejection fraction showed a 60% preserved ejection fraction", 64);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].range.start, 0);

        let c = generate(&["rr"], "from 60-80s RR", 64);
        assert!(c.is_empty());

        assert!(generate(&["o2"], "R16 , 96O2-sat % RA", 64).is_empty());
    }

    #[test]
    fn punctuation_outside_the_filler_set_breaks_association() {
        assert!(generate(&["lvef"], "LVEF; see prior note 55", 64).is_empty());
    }
}
