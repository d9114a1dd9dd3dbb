//! Selector types, specificity, and parent-selector (`&`) resolution
//! (spec §4.8).
//!
//! The simple-selector/compound-selector/complex-selector/specificity
//! layering is adapted from the teacher's `koala-css` selector engine
//! (`crates/koala-css/src/selector/mod.rs`), generalized with the two
//! things a DOM selector engine never needs: the placeholder selector
//! (`%name`) and the parent reference (`&`).

pub mod extend;
pub mod parser;

use std::fmt;

/// An attribute selector's comparison operator, e.g. `[href^="http"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatch {
    /// `[attr]`
    Exists,
    /// `[attr=value]`
    Equals(String),
    /// `[attr~=value]`
    Includes(String),
    /// `[attr|=value]`
    DashMatch(String),
    /// `[attr^=value]`
    PrefixMatch(String),
    /// `[attr$=value]`
    SuffixMatch(String),
    /// `[attr*=value]`
    SubstringMatch(String),
}

/// `[attr OP value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name.
    pub name: String,
    /// The match operator and value.
    pub matcher: AttributeMatch,
}

/// One simple selector: the smallest unit a compound selector is built
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `div`, `a`, etc.
    Type(String),
    /// `*`.
    Universal,
    /// `.name`.
    Class(String),
    /// `#name`.
    Id(String),
    /// `[attr...]`.
    Attribute(AttributeSelector),
    /// `:name` or `:name(args)`.
    PseudoClass(String, Option<String>),
    /// `::name`.
    PseudoElement(String),
    /// `%name`, a Sass-only placeholder that never appears in CSS output
    /// unless something `@extend`s it and the placeholder rule itself
    /// stays referenced.
    Placeholder(String),
    /// `&`, the parent-selector reference. Only appears pre-resolution;
    /// [`extend::resolve_parent_selectors`] replaces every occurrence
    /// before the selector reaches the emitter.
    Parent,
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{name}"),
            Self::Universal => write!(f, "*"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Placeholder(name) => write!(f, "%{name}"),
            Self::Attribute(attr) => write_attribute(f, attr),
            Self::PseudoClass(name, None) => write!(f, ":{name}"),
            Self::PseudoClass(name, Some(args)) => write!(f, ":{name}({args})"),
            Self::PseudoElement(name) => write!(f, "::{name}"),
            Self::Parent => write!(f, "&"),
        }
    }
}

fn write_attribute(f: &mut fmt::Formatter<'_>, attr: &AttributeSelector) -> fmt::Result {
    match &attr.matcher {
        AttributeMatch::Exists => write!(f, "[{}]", attr.name),
        AttributeMatch::Equals(v) => write!(f, "[{}=\"{v}\"]", attr.name),
        AttributeMatch::Includes(v) => write!(f, "[{}~=\"{v}\"]", attr.name),
        AttributeMatch::DashMatch(v) => write!(f, "[{}|=\"{v}\"]", attr.name),
        AttributeMatch::PrefixMatch(v) => write!(f, "[{}^=\"{v}\"]", attr.name),
        AttributeMatch::SuffixMatch(v) => write!(f, "[{}$=\"{v}\"]", attr.name),
        AttributeMatch::SubstringMatch(v) => write!(f, "[{}*=\"{v}\"]", attr.name),
    }
}

/// A run of simple selectors with no combinator between them, e.g.
/// `div.active#main`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The simple selectors making up this compound, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simple_selectors.is_empty() {
            return write!(f, "*");
        }
        for s in &self.simple_selectors {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl CompoundSelector {
    /// `true` if this compound contains `&`.
    #[must_use]
    pub fn contains_parent_ref(&self) -> bool {
        self.simple_selectors.iter().any(|s| *s == SimpleSelector::Parent)
    }

    /// `true` if every simple selector here also appears in `other`
    /// (used by `is-superselector()` and to detect already-satisfied
    /// `@extend`s).
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.simple_selectors.iter().all(|s| other.simple_selectors.contains(s))
    }
}

/// The combinator joining a compound selector to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descendant => write!(f, " "),
            Self::Child => write!(f, " > "),
            Self::NextSibling => write!(f, " + "),
            Self::SubsequentSibling => write!(f, " ~ "),
        }
    }
}

/// A full combinator chain, e.g. `.a > .b ~ .c`, stored left-to-right in
/// source order (unlike the teacher's DOM-matching selector, which keeps
/// a right-to-left chain for efficient tree matching -- this compiler
/// never matches selectors against a tree, only manipulates their text,
/// so source order is simpler to reason about for `@extend`/`&`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    /// `(combinator before this compound, compound)` pairs. The first
    /// entry's combinator is always `None`.
    pub components: Vec<(Option<Combinator>, CompoundSelector)>,
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (combinator, compound)) in self.components.iter().enumerate() {
            match combinator {
                Some(c) if i > 0 => write!(f, "{c}")?,
                _ if i > 0 => write!(f, " ")?,
                _ => {}
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

impl ComplexSelector {
    /// `true` if any compound in the chain contains `&`.
    #[must_use]
    pub fn contains_parent_ref(&self) -> bool {
        self.components.iter().any(|(_, c)| c.contains_parent_ref())
    }

    /// Specificity, summing over every compound in the chain: `(id,
    /// class-like, type-like)` triple, matching the teacher's
    /// `ComplexSelector::calculate_specificity` weighting.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut total = Specificity::default();
        for (_, compound) in &self.components {
            total = total + compound_specificity(compound);
        }
        total
    }
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            SimpleSelector::Id(_) => spec.0 += 1,
            SimpleSelector::Class(_)
            | SimpleSelector::Attribute(_)
            | SimpleSelector::PseudoClass(..)
            | SimpleSelector::Placeholder(_) => spec.1 += 1,
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.2 += 1,
            SimpleSelector::Universal | SimpleSelector::Parent => {}
        }
    }
    spec
}

/// `(id-count, class-count, type-count)`, ordered so that `Ord` gives the
/// correct cascade precedence directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// A comma-separated list of complex selectors -- what a style rule's
/// selector ultimately is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    /// Each comma-separated alternative.
    pub complexes: Vec<ComplexSelector>,
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.complexes.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl SelectorList {
    /// `true` if any alternative references `&`.
    #[must_use]
    pub fn contains_parent_ref(&self) -> bool {
        self.complexes.iter().any(ComplexSelector::contains_parent_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::{CompoundSelector, SimpleSelector, Specificity};

    #[test]
    fn test_id_outweighs_many_classes() {
        let id_compound = CompoundSelector {
            simple_selectors: vec![SimpleSelector::Id("x".into())],
        };
        let classes_compound = CompoundSelector {
            simple_selectors: (0..5).map(|i| SimpleSelector::Class(format!("c{i}"))).collect(),
        };
        assert!(super::compound_specificity(&id_compound) > super::compound_specificity(&classes_compound));
    }

    #[test]
    fn test_specificity_ordering() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 99, 99));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 99));
    }

    #[test]
    fn test_display_compound() {
        let compound = CompoundSelector {
            simple_selectors: vec![SimpleSelector::Type("div".into()), SimpleSelector::Class("a".into())],
        };
        assert_eq!(compound.to_string(), "div.a");
    }
}
