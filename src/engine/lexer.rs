//! Numeral lexer.
//!
//! Walks the scrubbed text and yields every numeral-like token in source
//! order: plain numbers, comma-grouped numbers, decimals, `k` and decade
//! suffixes, and dual fractions (`120/80`, `110 /70`) as one token.
//!
//! Tokens whose text cannot be normalized are skipped; the lexer never fails.

use super::normalize::normalize;
use crate::{NumeralToken, Range, SuffixKind};

pub(crate) struct NumeralLexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> NumeralLexer<'a> {
    pub fn new(text: &'a str) -> Self {
        NumeralLexer { text, pos: 0 }
    }
}

/// Bytes after which a bare `.5` is read as a decimal rather than punctuation.
fn opens_decimal(prev: u8) -> bool {
    prev.is_ascii_whitespace() || b"=:<>~(-".contains(&prev)
}

fn is_letter_at(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx).is_some_and(|b| b.is_ascii_alphabetic())
}

/// Length and kind of a `k`, `s` or `'s` suffix starting at `at`.
fn read_suffix(bytes: &[u8], at: usize) -> Option<(usize, SuffixKind)> {
    match bytes.get(at)? {
        b'k' if !is_letter_at(bytes, at + 1) => Some((1, SuffixKind::Thousands)),
        b's' if !is_letter_at(bytes, at + 1) => Some((1, SuffixKind::Decade)),
        b'\'' if bytes.get(at + 1) == Some(&b's') && !is_letter_at(bytes, at + 2) => Some((2, SuffixKind::Decade)),
        _ => None,
    }
}

impl Iterator for NumeralLexer<'_> {
    type Item = NumeralToken;

    fn next(&mut self) -> Option<NumeralToken> {
        let core = regex!(r"[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?|[0-9]+(?:\.[0-9]+)?|\.[0-9]+");
        let bytes = self.text.as_bytes();

        loop {
            let m = core.find_at(self.text, self.pos)?;
            let mut start = m.start();
            let mut end = m.end();

            // `lt.110`: the dot belongs to the abbreviation
            if bytes[start] == b'.' && start > 0 && !opens_decimal(bytes[start - 1]) {
                start += 1;
            }

            // `12,3456` is not a grouped number; keep only the leading digits
            if bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
                if let Some(comma) = self.text[start..end].find(',') {
                    end = start + comma;
                }
            }

            let glued = start > 0 && bytes[start - 1].is_ascii_alphabetic();

            let mut parsed = None;
            if let Some((len, kind)) = read_suffix(bytes, end) {
                if let Some((value, suffix)) = normalize(&self.text[start..end + len]) {
                    if suffix == kind {
                        parsed = Some((value, suffix, end + len));
                    }
                }
            }
            let Some((value, suffix, mut token_end)) =
                parsed.or_else(|| normalize(&self.text[start..end]).map(|(v, s)| (v, s, end)))
            else {
                self.pos = end.max(start + 1);
                continue;
            };

            let mut denominator = None;
            if suffix == SuffixKind::Plain {
                let mut j = token_end;
                while bytes.get(j) == Some(&b' ') {
                    j += 1;
                }
                if bytes.get(j) == Some(&b'/') && bytes.get(j + 1).is_some_and(|b| b.is_ascii_digit()) {
                    let denom = regex!(r"^[0-9]+(?:\.[0-9]+)?");
                    if let Some(d) = denom.find(&self.text[j + 1..]) {
                        if let Ok(v) = d.as_str().parse::<f64>() {
                            if v.is_finite() {
                                denominator = Some(v);
                                token_end = j + 1 + d.end();
                            }
                        }
                    }
                }
            }

            self.pos = token_end;
            return Some(NumeralToken {
                raw: self.text[start..token_end].to_string(),
                range: Range::new(start, token_end),
                value,
                suffix,
                denominator,
                glued,
            });
        }
    }
}

/// Lex every numeral token in `text`.
pub(crate) fn tokens(text: &str) -> Vec<NumeralToken> {
    NumeralLexer::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(text: &str) -> Vec<(String, f64, Option<f64>, bool)> {
        tokens(text).into_iter().map(|t| (t.raw, t.value, t.denominator, t.glued)).collect()
    }

    #[test]
    fn plain_and_decimal_numbers() {
        assert_eq!(
            summary("hr 45 temp 98.6 dose .5 mg"),
            vec![
                ("45".to_string(), 45.0, None, false),
                ("98.6".to_string(), 98.6, None, false),
                (".5".to_string(), 0.5, None, false),
            ]
        );
    }

    #[test]
    fn fractions_are_single_tokens() {
        assert_eq!(summary("bp 110/70"), vec![("110/70".to_string(), 110.0, Some(70.0), false)]);
        assert_eq!(summary("bp 110 /70"), vec![("110 /70".to_string(), 110.0, Some(70.0), false)]);
        assert_eq!(summary("rates-16/ tidal"), vec![("16".to_string(), 16.0, None, false)]);
    }

    #[test]
    fn suffixes() {
        let toks = tokens("plt 20k, in her 90's and 80s");
        let got: Vec<(f64, SuffixKind)> = toks.iter().map(|t| (t.value, t.suffix)).collect();
        assert_eq!(
            got,
            vec![(20000.0, SuffixKind::Thousands), (90.0, SuffixKind::Decade), (80.0, SuffixKind::Decade)]
        );
    }

    #[test]
    fn non_decade_s_falls_back_to_plain() {
        let toks = tokens("age 85s");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value, 85.0);
        assert_eq!(toks[0].suffix, SuffixKind::Plain);
        assert_eq!(toks[0].raw, "85");
    }

    #[test]
    fn glued_numerals() {
        let toks = tokens("t97.3 sao2");
        assert!(toks.iter().all(|t| t.glued));
        assert_eq!(toks[0].value, 97.3);
    }

    #[test]
    fn abbreviation_dot_is_not_a_decimal_point() {
        let toks = tokens("bp lt.110/70");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value, 110.0);
        assert_eq!(toks[0].denominator, Some(70.0));
        assert_eq!(toks[0].range.start, 6);
    }

    #[test]
    fn grouped_thousands() {
        let toks = tokens("wbc 25,000 and 12,3456");
        let values: Vec<f64> = toks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![25000.0, 12.0, 3456.0]);
    }

    #[test]
    fn empty_and_digitless_text() {
        assert!(tokens("").is_empty());
        assert!(tokens("no numbers here.").is_empty());
    }
}
