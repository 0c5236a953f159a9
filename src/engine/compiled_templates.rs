//! Template compilation and indexing.
//!
//! This module holds the *static* side of the engine: the structures derived
//! from the full template list that make an extraction call cheap.
//!
//! Extraction is split into two phases:
//!
//! 1. **Compile/index templates** (this module): order the template library by
//!    priority once and index it by coarse bucket requirements.
//! 2. **Run** (see `extractor.rs`): scan the input for coarse triggers
//!    (`trigger.rs`), select the active templates, then generate candidates.
//!
//! ## Invariants
//!
//! - `CompiledTemplates::templates` is sorted by descending priority, and the
//!   sort is stable, so equal priorities keep library order.
//! - `select` never reorders: the active list is a subsequence of the
//!   compiled list, so "first success wins" keeps its meaning.

use crate::Template;

/// Template identifier (index into the compiled templates vector).
pub(crate) type TemplateId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        const HAS_DIGITS    = 1 << 0;
        const HAS_SLASH     = 1 << 1;
        const RANGEISH      = 1 << 2;
        const APPROXISH     = 1 << 3;
        const COMPARATORISH = 1 << 4;
    }
}

#[derive(Default, Debug)]
pub struct TemplateIndex {
    pub always_on: Vec<TemplateId>,
    pub gated: Vec<(TemplateId, BucketMask)>,
}

/// Pre-compiled template library with its bucket index.
#[derive(Debug)]
pub struct CompiledTemplates<'a> {
    pub templates: Vec<&'a Template>,
    pub index: TemplateIndex,
}

impl<'a> CompiledTemplates<'a> {
    pub fn new(templates: &'a [Template]) -> Self {
        let mut refs: Vec<&Template> = templates.iter().collect();
        refs.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut index = TemplateIndex::default();
        for (id, template) in refs.iter().enumerate() {
            if template.buckets.is_empty() {
                index.always_on.push(id);
            } else {
                index.gated.push((id, template.buckets));
            }
        }

        CompiledTemplates { templates: refs, index }
    }

    /// Templates whose bucket requirements are all present in `buckets`, in
    /// priority order.
    pub fn select(&self, buckets: BucketMask) -> Vec<&'a Template> {
        let mut active: Vec<TemplateId> = self.index.always_on.clone();
        active.extend(self.index.gated.iter().filter(|(_, need)| buckets.contains(*need)).map(|(id, _)| *id));
        active.sort_unstable();
        active.into_iter().map(|id| self.templates[id]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    #[test]
    fn compiled_library_is_in_priority_order() {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);
        let priorities: Vec<u16> = compiled.templates.iter().map(|t| t.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn select_drops_templates_missing_buckets() {
        let library = templates::rules::get();
        let compiled = CompiledTemplates::new(&library);

        let none = compiled.select(BucketMask::empty());
        assert!(none.is_empty());

        let digits_only = compiled.select(BucketMask::HAS_DIGITS);
        let names: Vec<&str> = digits_only.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["equality"]);

        let all = compiled.select(BucketMask::all());
        assert_eq!(all.len(), library.len());
        assert_eq!(all.first().map(|t| t.name), Some("fraction range"));
        assert_eq!(all.last().map(|t| t.name), Some("equality"));
    }
}
