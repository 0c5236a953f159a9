use crate::Condition;

/// Characters allowed in the text between a term and its first numeral.
///
/// Letters cover connecting words (`was estimated at`, `of approximately`);
/// the punctuation covers `LVEF= <`, `RR(`, `Temp.` and `ejection fraction ?`.
pub fn is_filler(lead: &str) -> bool {
    lead.chars().all(|c| {
        c.is_alphabetic()
            || c.is_whitespace()
            || matches!(c, ':' | '=' | '-' | '(' | '~' | '<' | '>' | '.' | ',' | '?' | '\u{2264}' | '\u{2265}')
    })
}

/// Gap between two plain numerals that makes them a range.
///
/// Returns `Some(true)` when the separator is followed by `the` (`80s to the
/// 90's`), which callers only accept before a decade numeral.
pub fn range_separator(gap: &str) -> Option<bool> {
    let re = regex!(
        r"^\s*(?:%|mmhg|ml|cc|mg|kg|g|mm|cm|bpm)?\s*(?:-|\x{2013}|\x{2014}|to|through|thru)\s*(the\s+)?$"
    );
    let caps = re.captures(gap)?;
    Some(caps.get(1).is_some())
}

/// Gap between two fractions that makes them a range. Units never sit
/// between fractions.
pub fn fraction_separator(gap: &str) -> bool {
    regex!(r"^\s*(?:-|\x{2013}|\x{2014}|to|through|thru)\s*$").is_match(gap)
}

/// The `and` of `between 22 and 42`, optionally after a unit.
///
/// Up to two words may sit between `between` and the first numeral
/// (`between about 22 and 42`, `between the 80s and 90s`).
pub fn between_and(lead: &str, gap: &str, allow_unit: bool) -> bool {
    if !regex!(r"\bbetween(?:\s+[a-z]+){0,2}\s*$").is_match(lead) {
        return false;
    }
    if allow_unit {
        regex!(r"^\s*(?:%|mmhg|ml|cc|mg|kg|g|mm|cm|bpm)?\s*and\s*$").is_match(gap)
    } else {
        regex!(r"^\s*and\s*$").is_match(gap)
    }
}

/// `approx`, `approx.`, `approximately`, `~`, optionally followed by `=`.
pub fn approximate_lead(lead: &str) -> bool {
    regex!(r"(?:\bapprox(?:imately)?\.?|~)\s*=?\s*$").is_match(lead)
}

/// The comparator the lead ends with, if any.
///
/// The two-character and `or equal` forms are tried before the strict ones
/// so `<=` never reads as `<`.
pub fn comparator(lead: &str) -> Option<Condition> {
    let lte = regex!(
        r"(?:<=|=<|\x{2264}|\blte\b\.?|\b(?:lt\.?|less\s+than)\s+or\s+eq(?:ual)?\.?(?:\s+to)?)\s*$"
    );
    let gte = regex!(
        r"(?:>=|=>|\x{2265}|\bgte\b\.?|\b(?:gt\.?|greater\s+than)\s+or\s+eq(?:ual)?\.?(?:\s+to)?)\s*$"
    );
    let lt = regex!(r"(?:<|\blt\.?|\bless\s+than)\s*$");
    let gt = regex!(r"(?:>|\bgt\.?|\bgreater\s+than)\s*$");

    if lte.is_match(lead) {
        Some(Condition::Lte)
    } else if gte.is_match(lead) {
        Some(Condition::Gte)
    } else if lt.is_match(lead) {
        Some(Condition::Lt)
    } else if gt.is_match(lead) {
        Some(Condition::Gt)
    } else {
        None
    }
}
