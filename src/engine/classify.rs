//! Template match classification.
//!
//! Turns a successful template match into a `Candidate`: picks the condition
//! for the template family, reads the reported component of each consumed
//! numeral and computes the span covered by the term and its expression.

use super::terms::Occurrence;
use crate::{Candidate, Condition, Range, Template, TemplateKind, TemplateMatch, Value, Window};

pub(crate) fn condition_for(kind: TemplateKind, comparator: Option<Condition>) -> Option<Condition> {
    match kind {
        TemplateKind::FractionRange => Some(Condition::FractionRange),
        TemplateKind::Range => Some(Condition::Range),
        TemplateKind::Approximate => Some(Condition::Approx),
        TemplateKind::Inequality => comparator,
        TemplateKind::Equality => Some(Condition::Equal),
    }
}

/// Build the candidate for `m`.
///
/// Range endpoints are reported in source order. With `report_denominator`
/// each fraction reports its second component instead of its first.
pub(crate) fn classify(
    occ: &Occurrence,
    window: &Window<'_>,
    template: &Template,
    m: TemplateMatch,
    report_denominator: bool,
) -> Option<Candidate> {
    let condition = condition_for(template.kind, m.comparator)?;
    let first = window.token(m.first)?;
    let second = match m.second {
        Some(idx) => Some(window.token(idx)?),
        None => None,
    };

    let end = second.map_or(first.range.end, |t| t.range.end);

    Some(Candidate {
        term: occ.term.clone(),
        range: Range::new(occ.range.start, end),
        x: Value::Number(first.component(report_denominator)),
        y: second.map(|t| Value::Number(t.component(report_denominator))),
        condition,
        denominator: report_denominator && first.denominator.is_some(),
        template: template.name,
    })
}
