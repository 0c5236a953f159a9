//! Categorical (enumeration) mode.
//!
//! Instead of numerals, each term occurrence is paired with the nearest
//! keyword from the enum list that follows it: `POSITIVE Titer-1:80` with
//! keywords `titer, hav` gives `positive -> titer`. Conditions are always
//! `EQUAL` and bounds do not apply.

use tracing::trace;

use super::terms::{Occurrence, TermSet};
use crate::{Candidate, Condition, Range, Value};

pub(crate) fn candidates(
    text: &str,
    occurrences: &[Occurrence],
    keywords: &TermSet,
    max_gap: usize,
) -> Vec<Candidate> {
    let found = keywords.occurrences(text);

    let mut out = Vec::new();
    for occ in occurrences {
        let Some(kw) = found.iter().find(|k| k.range.start >= occ.range.end) else { continue };
        if kw.range.start > occ.range.end + max_gap {
            continue;
        }
        if occurrences.iter().any(|o| o.range.start >= occ.range.end && o.range.start < kw.range.start) {
            continue;
        }

        trace!(term = %occ.term, keyword = %kw.term, "enumeration candidate");
        out.push(Candidate {
            term: occ.term.clone(),
            range: Range::new(occ.range.start, kw.range.end),
            x: Value::Text(kw.term.clone()),
            y: None,
            condition: Condition::Equal,
            denominator: false,
            template: "enumeration",
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scrub;

    fn run(terms: &[&str], keywords: &[&str], input: &str) -> Vec<(String, String)> {
        let text = scrub(input);
        let occ = TermSet::new(terms).unwrap().occurrences(&text);
        let kw = TermSet::new(keywords).unwrap();
        candidates(&text, &occ, &kw, 64)
            .into_iter()
            .map(|c| (c.term, c.x.as_text().unwrap_or_default().to_string()))
            .collect()
    }

    #[test]
    fn nearest_following_keyword() {
        let got = run(&["positive", "+", "negative"], &["titer", "hav", "igm", "igg"], "POSITIVE Titer-1:80");
        assert_eq!(got, vec![("positive".to_string(), "titer".to_string())]);

        let got = run(&["positive", "+", "negative"], &["titer", "hav", "igm", "igg"], "+Titer-1:80");
        assert_eq!(got, vec![("+".to_string(), "titer".to_string())]);
    }

    #[test]
    fn keyword_behind_another_term_is_not_taken() {
        let got = run(&["positive", "negative"], &["igm"], "positive, negative IgM");
        assert_eq!(got, vec![("negative".to_string(), "igm".to_string())]);
    }

    #[test]
    fn keywords_before_the_term_are_ignored() {
        assert!(run(&["negative"], &["igm"], "IgM negative").is_empty());
    }
}
