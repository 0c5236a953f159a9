//! The expression template library.
//!
//! Each template recognizes one family of value expressions in the window that
//! follows a term: ranges of fractions, ranges, approximations, inequalities
//! and plain equality. Templates are pure functions of the window.

pub(crate) mod helpers;
pub(crate) mod predicates;
pub(crate) mod rules;
