use crate::engine::BucketMask;
use crate::templates::helpers::{
    approximate_lead, between_and, comparator, fraction_separator, range_separator,
};
use crate::templates::predicates::{is_decade, is_fraction, is_single};
use crate::{Template, TemplateKind, TemplateMatch, Window};

/// `120/80 to 130/90`, `between 100/60 and 120/80`, `105/75 - 120/70`.
fn match_fraction_range(w: &Window<'_>) -> Option<TemplateMatch> {
    let (a, b) = (w.token(0)?, w.token(1)?);
    if !is_fraction(a) || !is_fraction(b) {
        return None;
    }
    let gap = w.gap(0)?;
    (fraction_separator(gap) || between_and(w.lead, gap, false)).then(|| TemplateMatch::pair(0, 1))
}

fn template_fraction_range() -> Template {
    template! {
        name: "fraction range",
        kind: TemplateKind::FractionRange,
        buckets: BucketMask::HAS_DIGITS | BucketMask::HAS_SLASH | BucketMask::RANGEISH,
        priority: 50,
        matcher: match_fraction_range,
    }
}

/// `22-42`, `22 to 42`, `500ml to 600ml`, `80s to the 90's`, `between 25k and 38k`.
fn match_range(w: &Window<'_>) -> Option<TemplateMatch> {
    let (a, b) = (w.token(0)?, w.token(1)?);
    if !is_single(a) || !is_single(b) {
        return None;
    }
    let gap = w.gap(0)?;
    let ok = match range_separator(gap) {
        // "the" only ever introduces a decade
        Some(has_the) => !has_the || is_decade(b),
        None => between_and(w.lead, gap, true),
    };
    ok.then(|| TemplateMatch::pair(0, 1))
}

fn template_range() -> Template {
    template! {
        name: "range",
        kind: TemplateKind::Range,
        buckets: BucketMask::HAS_DIGITS | BucketMask::RANGEISH,
        priority: 40,
        matcher: match_range,
    }
}

fn match_approximate(w: &Window<'_>) -> Option<TemplateMatch> {
    w.token(0)?;
    approximate_lead(w.lead).then(|| TemplateMatch::single(0))
}

fn template_approximate() -> Template {
    template! {
        name: "approximate",
        kind: TemplateKind::Approximate,
        buckets: BucketMask::HAS_DIGITS | BucketMask::APPROXISH,
        priority: 30,
        matcher: match_approximate,
    }
}

fn match_inequality(w: &Window<'_>) -> Option<TemplateMatch> {
    w.token(0)?;
    comparator(w.lead).map(|c| TemplateMatch::compared(0, c))
}

fn template_inequality() -> Template {
    template! {
        name: "inequality",
        kind: TemplateKind::Inequality,
        buckets: BucketMask::HAS_DIGITS | BucketMask::COMPARATORISH,
        priority: 20,
        matcher: match_inequality,
    }
}

fn match_equality(w: &Window<'_>) -> Option<TemplateMatch> {
    w.token(0).map(|_| TemplateMatch::single(0))
}

fn template_equality() -> Template {
    template! {
        name: "equality",
        kind: TemplateKind::Equality,
        buckets: BucketMask::HAS_DIGITS,
        priority: 10,
        matcher: match_equality,
    }
}

pub fn get() -> Vec<Template> {
    vec![
        template_fraction_range(),
        template_range(),
        template_approximate(),
        template_inequality(),
        template_equality(),
    ]
}
