//! Offset-preserving scrubbing.
//!
//! Clinical text is full of numerals that must never be reported as a
//! measurement: dates that look like fractions (`3/27`), clock times, size
//! triples (`12 cm x 9 cm x 6 cm`) and anonymization markers. Rather than teach
//! every template to skip them, they are blanked out once, up front.
//!
//! Blanking replaces each byte of a region with an ASCII space, so every byte
//! offset in the scrubbed text refers to the same position in the input. The
//! text is ASCII-lowercased in the same pass for the same reason.

use crate::Range;

/// Lowercase `input` and blank out regions that must not yield values.
pub(crate) fn scrub(input: &str) -> String {
    let mut out = input.to_ascii_lowercase();
    let regions = blanked_regions(&out);
    for r in regions {
        if out.is_char_boundary(r.start) && out.is_char_boundary(r.end) {
            out.replace_range(r.start..r.end, &" ".repeat(r.end - r.start));
        }
    }
    out
}

fn blanked_regions(lower: &str) -> Vec<Range> {
    let mut regions = Vec::new();

    // [** 2648-8-10 **]
    let anon = regex!(r"\[\*\*.*?\*\*\]");
    // 2648-8-10
    let iso_date = regex!(r"\b[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}\b");
    // 02:24am, 14:05:10
    let clock = regex!(r"\b[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?(?:\s*[ap]\.?m\b\.?)?");
    // 12 cm. x 9 cm x 6 cm: three components, units optional
    let size_triple = regex!(
        r"\b[0-9]+(?:\.[0-9]+)?(?:\s*(?:mm|cm|m|in)\b\.?)?\s*x\s*[0-9]+(?:\.[0-9]+)?(?:\s*(?:mm|cm|m|in)\b\.?)?\s*x\s*[0-9]+(?:\.[0-9]+)?(?:\s*(?:mm|cm|m|in)\b\.?)?"
    );
    // 12cm x 9cm: two components, both with a unit
    let size_pair = regex!(
        r"\b[0-9]+(?:\.[0-9]+)?\s*(?:mm|cm|m|in)\b\.?\s*x\s*[0-9]+(?:\.[0-9]+)?\s*(?:mm|cm|m|in)\b\.?"
    );

    for re in [anon, iso_date, clock, size_triple, size_pair] {
        regions.extend(re.find_iter(lower).map(|m| Range::new(m.start(), m.end())));
    }

    // 3/27, 4/01, 12/31/2019: only when the components make a calendar date
    let slash_date = regex!(r"\b([0-9]{1,2})/([0-9]{1,2})(?:/[0-9]{2,4})?\b");
    for caps in slash_date.captures_iter(lower) {
        let Some(whole) = caps.get(0) else { continue };
        let month = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let day = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(month), Some(day)) = (month, day) {
            if (1..=12).contains(&month) && (1..=31).contains(&day) {
                regions.push(Range::new(whole.start(), whole.end()));
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_preserves_length_and_lowercases() {
        let input = "Her BP on 3/27 measured 110/70.";
        let out = scrub(input);
        assert_eq!(out.len(), input.len());
        assert_eq!(out, "her bp on      measured 110/70.");
    }

    #[test]
    fn blood_pressure_is_not_a_date() {
        assert_eq!(scrub("BP 60/36"), "bp 60/36");
        assert_eq!(scrub("BP 120/80"), "bp 120/80");
    }

    #[test]
    fn size_triples_are_blanked() {
        let out = scrub("from her 12 cm. x 9 cm x 6 cm heart");
        assert!(!out.bytes().any(|b| b.is_ascii_digit()));
        assert!(out.ends_with(" heart"));

        let out = scrub("from her 12cm x 9cm. x 6   cm heart");
        assert!(!out.bytes().any(|b| b.is_ascii_digit()));

        let out = scrub("a 3 cm x 2 cm mass");
        assert!(!out.bytes().any(|b| b.is_ascii_digit()));
    }

    #[test]
    fn multiplications_without_units_are_kept() {
        assert_eq!(scrub("WBC 7.5 x 10^9/L"), "wbc 7.5 x 10^9/l");
        assert_eq!(scrub("HR 80 x 2 readings"), "hr 80 x 2 readings");
    }

    #[test]
    fn times_and_anonymized_dates_are_blanked() {
        let out = scrub("Plt Ct-172 02:24AM BLOOD");
        assert_eq!(out, "plt ct-172         blood");

        let out = scrub("was in [**2648-8-10**], which");
        assert!(!out.bytes().any(|b| b.is_ascii_digit()));
    }

    #[test]
    fn trailing_slash_is_left_alone() {
        assert_eq!(scrub("Rates-16/ Tidal"), "rates-16/ tidal");
    }

    #[test]
    fn non_ascii_text_is_safe() {
        let input = "Température 38,5 – 3/4 café";
        let out = scrub(input);
        assert_eq!(out.len(), input.len());
    }
}
