//! Numeral normalization.
//!
//! A total function from numeral text to a canonical value. Anything that
//! cannot be read as a finite number yields `None`, never a panic, so the
//! lexer can drop it and move on.

use crate::SuffixKind;

/// Normalize numeral text such as `"110"`, `"7.0"`, `"25,000"`, `"20k"`,
/// `"90s"` or `"80's"`.
///
/// ```text
/// "20k"    -> (20000, Thousands)
/// "80's"   -> (80, Decade)
/// "85s"    -> None   (decades are multiples of ten)
/// "1,2"    -> None   (bad thousands grouping)
/// ```
pub(crate) fn normalize(raw: &str) -> Option<(f64, SuffixKind)> {
    let lower = raw.trim().to_ascii_lowercase();

    let (digits, suffix) = if let Some(rest) = lower.strip_suffix("'s") {
        (rest, SuffixKind::Decade)
    } else if let Some(rest) = lower.strip_suffix('s') {
        (rest, SuffixKind::Decade)
    } else if let Some(rest) = lower.strip_suffix('k') {
        (rest, SuffixKind::Thousands)
    } else {
        (lower.as_str(), SuffixKind::Plain)
    };

    let value = parse_grouped(digits)?;

    let value = match suffix {
        SuffixKind::Plain => value,
        SuffixKind::Thousands => value * 1000.0,
        SuffixKind::Decade => {
            if value.fract() != 0.0 || value % 10.0 != 0.0 || digits.contains(['.', ',']) {
                return None;
            }
            value
        }
    };

    value.is_finite().then_some((value, suffix))
}

/// Parse a decimal that may use comma-grouped thousands (`25,000.5`).
fn parse_grouped(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    if int_part.contains(',') {
        let mut groups = int_part.split(',');
        let head = groups.next()?;
        if head.is_empty() || head.len() > 3 || !head.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit())) {
            return None;
        }
    } else if !int_part.bytes().all(|b| b.is_ascii_digit()) || (int_part.is_empty() && frac_part.is_none()) {
        return None;
    }

    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let value = cleaned.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_examples() {
        let cases: Vec<(&str, Option<(f64, SuffixKind)>)> = vec![
            ("110", Some((110.0, SuffixKind::Plain))),
            ("7.0", Some((7.0, SuffixKind::Plain))),
            (".5", Some((0.5, SuffixKind::Plain))),
            ("25,000", Some((25000.0, SuffixKind::Plain))),
            ("1,200,000", Some((1_200_000.0, SuffixKind::Plain))),
            ("20k", Some((20000.0, SuffixKind::Thousands))),
            ("38K", Some((38000.0, SuffixKind::Thousands))),
            ("1.5k", Some((1500.0, SuffixKind::Thousands))),
            ("90s", Some((90.0, SuffixKind::Decade))),
            ("80's", Some((80.0, SuffixKind::Decade))),
            ("85s", None),
            ("1,2", None),
            ("12,34", None),
            ("", None),
            ("k", None),
            ("abc", None),
            ("7.", None),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn overlong_digit_strings_do_not_panic() {
        let huge = "9".repeat(400);
        assert_eq!(normalize(&huge), None);
    }
}
