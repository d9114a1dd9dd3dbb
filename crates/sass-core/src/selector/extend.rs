//! Parent-selector (`&`) resolution and `@extend` unification (spec §4.8).
//!
//! Full Sass selector unification handles arbitrary weaving of complex
//! selectors (an extender that is itself `a b` nested three levels deep
//! extending something inside another multi-compound chain). This
//! implementation covers the common cases -- a simple or complex extender
//! substituted in place of the matched compound -- and documents the
//! simplification as an open-question decision rather than silently
//! diverging (see `DESIGN.md`).

use crate::error::{Result, SassError};
use crate::selector::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};
use crate::span::Span;

/// Replace every `&` in `child` with `parent`'s complex selectors. A
/// compound with no `&` is implicitly descended from `parent` (ordinary
/// nesting); a compound containing `&` has it substituted away.
#[must_use]
pub fn resolve_parent_selectors(child: &SelectorList, parent: Option<&SelectorList>) -> SelectorList {
    let Some(parent) = parent else {
        return child.clone();
    };
    let mut complexes = Vec::new();
    for c in &child.complexes {
        if c.contains_parent_ref() {
            for p in &parent.complexes {
                complexes.push(substitute_parent(c, p));
            }
        } else {
            for p in &parent.complexes {
                complexes.push(nest_under(p, c));
            }
        }
    }
    SelectorList { complexes }
}

fn substitute_parent(child: &ComplexSelector, parent: &ComplexSelector) -> ComplexSelector {
    let mut components = Vec::new();
    for (i, (combinator, compound)) in child.components.iter().enumerate() {
        if compound.contains_parent_ref() {
            let suffix: Vec<SimpleSelector> = compound
                .simple_selectors
                .iter()
                .filter(|s| **s != SimpleSelector::Parent)
                .cloned()
                .collect();
            for (j, (parent_combinator, parent_compound)) in parent.components.iter().enumerate() {
                let mut merged = parent_compound.clone();
                if j == parent.components.len() - 1 {
                    merged.simple_selectors.extend(suffix.iter().cloned());
                }
                let resolved_combinator = if j == 0 {
                    if i == 0 { None } else { *combinator }
                } else {
                    *parent_combinator
                };
                components.push((resolved_combinator, merged));
            }
        } else {
            components.push((*combinator, compound.clone()));
        }
    }
    ComplexSelector { components }
}

fn nest_under(parent: &ComplexSelector, child: &ComplexSelector) -> ComplexSelector {
    let mut components = parent.components.clone();
    for (i, (combinator, compound)) in child.components.iter().enumerate() {
        let resolved_combinator = if i == 0 { Some(Combinator::Descendant) } else { *combinator };
        components.push((resolved_combinator, compound.clone()));
    }
    ComplexSelector { components }
}

/// One registered `@extend extendee` directive.
#[derive(Debug, Clone)]
struct ExtendRule {
    extendee: CompoundSelector,
    extender: ComplexSelector,
    optional: bool,
    span: Span,
    /// The enclosing `@media` query texts active where the `@extend` was
    /// written, outermost first. Empty means top-level.
    media_context: Vec<String>,
}

/// Accumulates every `@extend` seen during evaluation, then rewrites the
/// CSS tree's selectors once evaluation finishes (spec §4.6.7: `@extend`
/// registration happens during the main eval pass, unification happens
/// after).
#[derive(Debug, Default)]
pub struct ExtendRegistry {
    rules: Vec<ExtendRule>,
}

impl ExtendRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `extender { @extend extendee; }`, gated to `media_context`
    /// (the `@media` stack active at the `@extend` site).
    pub fn register(&mut self, extendee: CompoundSelector, extender: ComplexSelector, optional: bool, span: Span, media_context: Vec<String>) {
        self.rules.push(ExtendRule {
            extendee,
            extender,
            optional,
            span,
            media_context,
        });
    }

    /// Every extendee that was registered `!optional` but never matched
    /// anything, paired with its span, so the caller can warn/error.
    #[must_use]
    pub fn unmatched_required(&self, all_selectors: &[SelectorList]) -> Vec<(&CompoundSelector, Span)> {
        self.rules
            .iter()
            .filter(|rule| !rule.optional)
            .filter(|rule| !all_selectors.iter().any(|list| selector_list_contains(list, &rule.extendee)))
            .map(|rule| (&rule.extendee, rule.span))
            .collect()
    }

    /// Rewrite `list` (whose style rule lives under `media_context`),
    /// appending one extended alternative per matching `@extend` rule
    /// alongside the original selectors. A rule registered under an
    /// incompatible media context errors unless it was `!optional` (spec
    /// §4.6.7: "incompatible media contexts produce an error at
    /// finalization time").
    pub fn apply(&self, list: &SelectorList, media_context: &[String]) -> Result<SelectorList> {
        let mut complexes = list.complexes.clone();
        let mut extended = Vec::new();
        for complex in &list.complexes {
            for rule in &self.rules {
                if !rule_matches(complex, rule) {
                    continue;
                }
                if rule.media_context != media_context {
                    if rule.optional {
                        continue;
                    }
                    return Err(SassError::runtime("You may not @extend selectors across media queries.", rule.span));
                }
                for replacement in extend_complex(complex, rule) {
                    if !complexes.contains(&replacement) {
                        extended.push(replacement);
                    }
                }
            }
        }
        complexes.extend(extended);
        Ok(SelectorList { complexes })
    }
}

fn rule_matches(complex: &ComplexSelector, rule: &ExtendRule) -> bool {
    complex.components.iter().any(|(_, compound)| rule.extendee.is_subset_of(compound))
}

fn selector_list_contains(list: &SelectorList, extendee: &CompoundSelector) -> bool {
    list.complexes
        .iter()
        .flat_map(|c| &c.components)
        .any(|(_, compound)| extendee.is_subset_of(compound))
}

fn extend_complex(complex: &ComplexSelector, rule: &ExtendRule) -> Vec<ComplexSelector> {
    let mut results = Vec::new();
    for (index, (combinator, compound)) in complex.components.iter().enumerate() {
        if !rule.extendee.is_subset_of(compound) {
            continue;
        }
        let remaining: Vec<SimpleSelector> = compound
            .simple_selectors
            .iter()
            .filter(|s| !rule.extendee.simple_selectors.contains(s))
            .cloned()
            .collect();
        let mut components = complex.components.clone();
        let mut spliced = Vec::new();
        for (j, (extender_combinator, extender_compound)) in rule.extender.components.iter().enumerate() {
            let mut merged = extender_compound.clone();
            if j == rule.extender.components.len() - 1 {
                for s in &remaining {
                    if !merged.simple_selectors.contains(s) {
                        merged.simple_selectors.push(s.clone());
                    }
                }
            }
            let resolved_combinator = if j == 0 { *combinator } else { *extender_combinator };
            spliced.push((resolved_combinator, merged));
        }
        let _ = components.splice(index..=index, spliced);
        results.push(ComplexSelector { components });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::{resolve_parent_selectors, ExtendRegistry};
    use crate::selector::parser::parse_selector_list;
    use crate::span::{SourceId, Span};

    fn span() -> Span {
        Span::point(SourceId(0), 0)
    }

    #[test]
    fn test_resolve_parent_prefixes_class() {
        let parent = parse_selector_list(".btn");
        let child = parse_selector_list("&.active");
        let resolved = resolve_parent_selectors(&child, Some(&parent));
        assert_eq!(resolved.to_string(), ".btn.active");
    }

    #[test]
    fn test_resolve_without_parent_ref_nests() {
        let parent = parse_selector_list(".card");
        let child = parse_selector_list("a");
        let resolved = resolve_parent_selectors(&child, Some(&parent));
        assert_eq!(resolved.to_string(), ".card a");
    }

    #[test]
    fn test_extend_adds_matching_selector() {
        let mut registry = ExtendRegistry::new();
        let extendee = parse_selector_list("%message").complexes[0].components[0].1.clone();
        let extender = parse_selector_list(".success").complexes[0].clone();
        registry.register(extendee, extender, false, span(), Vec::new());

        let target = parse_selector_list("%message");
        let result = registry.apply(&target, &[]).unwrap();
        assert_eq!(result.complexes.len(), 2);
        assert_eq!(result.complexes[1].to_string(), ".success");
    }

    #[test]
    fn test_extend_across_incompatible_media_errors() {
        let mut registry = ExtendRegistry::new();
        let extendee = parse_selector_list("%message").complexes[0].components[0].1.clone();
        let extender = parse_selector_list(".success").complexes[0].clone();
        registry.register(extendee, extender, false, span(), vec!["screen".to_string()]);

        let target = parse_selector_list("%message");
        assert!(registry.apply(&target, &[]).is_err());
    }

    #[test]
    fn test_optional_extend_across_incompatible_media_is_silently_dropped() {
        let mut registry = ExtendRegistry::new();
        let extendee = parse_selector_list("%message").complexes[0].components[0].1.clone();
        let extender = parse_selector_list(".success").complexes[0].clone();
        registry.register(extendee, extender, true, span(), vec!["screen".to_string()]);

        let target = parse_selector_list("%message");
        let result = registry.apply(&target, &[]).unwrap();
        assert_eq!(result.complexes.len(), 1);
    }

    #[test]
    fn test_unmatched_required_extend_reported() {
        let mut registry = ExtendRegistry::new();
        let extendee = parse_selector_list(".missing").complexes[0].components[0].1.clone();
        let extender = parse_selector_list(".x").complexes[0].clone();
        registry.register(extendee, extender, false, span(), Vec::new());

        let selectors = vec![parse_selector_list(".unrelated")];
        assert_eq!(registry.unmatched_required(&selectors).len(), 1);
    }
}
