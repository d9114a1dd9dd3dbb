//! `#{...}` interpolation, shared by selectors, property names, string
//! literals, and `@media` queries (spec §4.3.4).

use super::expression::Expression;
use crate::span::Span;

/// One piece of an interpolated chunk sequence: either literal source
/// text or a `#{...}` expression to be evaluated and stringified.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationPart {
    /// Verbatim text between interpolations.
    Literal(String),
    /// An embedded `#{expr}`.
    Expr(Expression),
}

/// A sequence of literal text and embedded expressions. A plain
/// (non-interpolated) string or selector is represented as a single
/// `Literal` part, so callers don't need a separate "no interpolation"
/// case.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    /// The parts, in source order.
    pub parts: Vec<InterpolationPart>,
    /// Span covering the whole interpolated chunk.
    pub span: Span,
}

impl Interpolation {
    /// Build an interpolation containing only literal text (the common
    /// case for selectors/property names with no `#{...}`).
    #[must_use]
    pub fn plain(text: impl Into<String>, span: Span) -> Self {
        Self {
            parts: vec![InterpolationPart::Literal(text.into())],
            span,
        }
    }

    /// `true` if this interpolation has no embedded expressions, meaning
    /// it can be used as-is without an evaluator.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, InterpolationPart::Literal(_)))
    }

    /// The concatenated literal text, valid only when [`Interpolation::is_plain`].
    #[must_use]
    pub fn as_plain_text(&self) -> Option<String> {
        if !self.is_plain() {
            return None;
        }
        Some(
            self.parts
                .iter()
                .map(|p| match p {
                    InterpolationPart::Literal(s) => s.as_str(),
                    InterpolationPart::Expr(_) => unreachable!(),
                })
                .collect(),
        )
    }
}
