//! Extraction engine.
//!
//! This module is the internal entry point for value extraction. It is split
//! into focused submodules under `src/engine/` while keeping crate paths
//! stable (for example `crate::engine::Extractor` and `crate::engine::BucketMask`).
//!
//! ## How the parts work together
//!
//! ```text
//! templates (all) ──┐
//!                   │  CompiledTemplates::new        (compiled_templates.rs)
//!                   └───────────────┬──────────────
//!                                   │
//! input ── scrub ── TriggerInfo::scan ── select active templates
//!         (scrub.rs)  (trigger.rs)   │
//!                                    v
//!               NumeralLexer (lexer.rs) + TermSet::occurrences (terms.rs)
//!                                    │
//!                                    v
//!                   Generator::candidates (generator.rs)
//!                     - associate each occurrence with a window
//!                     - first matching template wins
//!                     - classify (classify.rs)
//!                                    │
//!                                    v
//!                   resolve_overlaps (overlap.rs)
//!                                    │
//!                                    v
//!                   bounds filter (assemble.rs)
//!                                    │
//!                                    v
//!                        Vec<MeasurementResult>
//! ```
//!
//! Categorical requests replace the lexer and generator with
//! `categorical::candidates`; overlap resolution is shared.
//!
//! ## Responsibilities by module
//!
//! - `scrub.rs`: lowercases and blanks dates, times, size triples and
//!   anonymization markers without moving any byte offset.
//! - `normalize.rs` / `lexer.rs`: numeral recognition and normalization.
//! - `terms.rs`: term matchers (cached) and occurrence search.
//! - `compiled_templates.rs` / `trigger.rs`: priority ordering and bucket gating.
//! - `generator.rs` / `classify.rs`: template application and candidate building.
//! - `overlap.rs` / `assemble.rs`: conflict resolution, bounds, output records.
//! - `metrics.rs`: phase timings and intermediate lists for verbose runs.
//!
//! ## Adding new templates
//!
//! - Templates live in `src/templates/rules.rs` and are passed into
//!   `CompiledTemplates::new(..)`.
//! - If a template reads a new keyword, add it to the matching bucket in
//!   `TriggerInfo::scan`, or the template will be gated off.
//!
//! ## Debugging
//!
//! Engine phases log through `tracing` at `debug`, per-candidate decisions at
//! `trace`. The CLI reads its filter from `CLINVAL_LOG`.

#[path = "engine/assemble.rs"]
mod assemble;
#[path = "engine/categorical.rs"]
mod categorical;
#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/compiled_templates.rs"]
mod compiled_templates;
#[path = "engine/extractor.rs"]
mod extractor;
#[path = "engine/generator.rs"]
mod generator;
#[path = "engine/lexer.rs"]
pub(crate) mod lexer;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/overlap.rs"]
mod overlap;
#[path = "engine/scrub.rs"]
mod scrub;
#[path = "engine/terms.rs"]
pub(crate) mod terms;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_templates::{BucketMask, CompiledTemplates};
pub(crate) use extractor::Extractor;
pub(crate) use metrics::RunResult;
pub(crate) use scrub::scrub;
#[allow(unused_imports)]
pub use trigger::TriggerInfo;
