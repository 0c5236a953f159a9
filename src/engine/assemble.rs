//! Result assembly: bounds filtering and conversion to output records.

use crate::Candidate;
use crate::api::MeasurementResult;

/// True when every numeric value of `c` lies in `[min, max]`. Text values
/// from categorical mode are never filtered.
pub(crate) fn within_bounds(c: &Candidate, min: f64, max: f64) -> bool {
    let ok = |v: &crate::Value| v.as_number().is_none_or(|n| n >= min && n <= max);
    ok(&c.x) && c.y.as_ref().is_none_or(ok)
}

/// Apply the bounds filter to overlap survivors (already in start order).
pub(crate) fn assemble(kept: Vec<Candidate>, min: f64, max: f64) -> (Vec<MeasurementResult>, Vec<Candidate>) {
    let (inside, outside): (Vec<Candidate>, Vec<Candidate>) =
        kept.into_iter().partition(|c| within_bounds(c, min, max));
    let results = inside.into_iter().map(MeasurementResult::from).collect();
    (results, outside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, Range, Value};

    fn cand(x: Value, y: Option<Value>) -> Candidate {
        Candidate {
            term: "hr".to_string(),
            range: Range::new(0, 8),
            x,
            y,
            condition: Condition::Range,
            denominator: false,
            template: "range",
        }
    }

    #[test]
    fn both_endpoints_must_be_in_bounds() {
        assert!(within_bounds(&cand(Value::Number(60.0), Some(Value::Number(80.0))), 0.0, 100.0));
        assert!(!within_bounds(&cand(Value::Number(60.0), Some(Value::Number(180.0))), 0.0, 100.0));
        assert!(!within_bounds(&cand(Value::Number(-1.0), None), 0.0, 100.0));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(within_bounds(&cand(Value::Number(0.0), None), 0.0, 100.0));
        assert!(within_bounds(&cand(Value::Number(100.0), None), 0.0, 100.0));
    }

    #[test]
    fn text_values_pass() {
        assert!(within_bounds(&cand(Value::Text("titer".into()), None), 0.0, 1.0));
    }

    #[test]
    fn assemble_keeps_order_and_reports_dropped() {
        let kept = vec![cand(Value::Number(5.0), None), cand(Value::Number(500.0), None)];
        let (results, dropped) = assemble(kept, 0.0, 100.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].x, Value::Number(5.0));
        assert_eq!(dropped.len(), 1);
    }
}
