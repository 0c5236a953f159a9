use crate::{NumeralToken, SuffixKind};

/// Returns true when the token is a dual fraction (`120/80`).
pub fn is_fraction(t: &NumeralToken) -> bool {
    t.denominator.is_some()
}

/// Returns true when the token is a single number (any suffix).
pub fn is_single(t: &NumeralToken) -> bool {
    t.denominator.is_none()
}

/// Returns true when the token was written as a decade (`90s`, `80's`).
pub fn is_decade(t: &NumeralToken) -> bool {
    t.suffix == SuffixKind::Decade
}
