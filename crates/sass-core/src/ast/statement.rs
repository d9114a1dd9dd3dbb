//! Statement nodes: everything that can appear directly inside a
//! stylesheet or a rule body (spec §4.3.1, §4.4).

use super::expression::{CallArgs, Expression, Params};
use super::interpolation::Interpolation;
use crate::span::Span;

/// One `@import "..."` argument: a literal path (resolved through the
/// `Importer` chain at eval time) or, per spec §4.6.6, a path that is
/// actually plain-CSS passthrough (`.css` extension, `http(s)://`, or
/// `url(...)`) and therefore never touches an importer at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportArgument {
    /// A Sass-resolvable import target.
    Sass(String),
    /// A plain CSS `@import` left untouched in the output.
    Plain(Interpolation),
}

/// A statement: either a directive, a declaration, or a nested rule.
///
/// Mirrors the grammar in spec §4.3.1; the variant names match the Sass
/// at-rule keywords they parse (`@if` -> `If`, `@each` -> `Each`, ...) so
/// the parser's dispatch table and this enum read the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `selector { body }`.
    StyleRule {
        /// The (possibly interpolated) selector text, re-parsed by
        /// `selector::parser` once interpolation is resolved.
        selector: Interpolation,
        /// Statements nested inside the rule.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `property: value;` or `property: value { nested-prop: ...; }`.
    Declaration {
        /// Property name, possibly interpolated.
        name: Interpolation,
        /// The value expression, absent for a nested-properties-only declaration.
        value: Option<Expression>,
        /// `true` if the value was followed by `!important`.
        important: bool,
        /// Nested child declarations (`font: { size: 10px; weight: bold; }`).
        children: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `$name: value [!default] [!global];`.
    VariableDecl {
        /// Variable name, without `$`.
        name: String,
        /// Value expression.
        value: Expression,
        /// `true` if `!default` was given (assign only if unset/null).
        default: bool,
        /// `true` if `!global` was given.
        global: bool,
        /// Source location.
        span: Span,
    },
    /// `@if .. @else if .. @else { .. }`.
    If {
        /// `(condition, body)` pairs, in order; the first matching one runs.
        branches: Vec<(Expression, Vec<Statement>)>,
        /// The trailing unconditional `@else` body, if present.
        else_branch: Option<Vec<Statement>>,
        /// Source location.
        span: Span,
    },
    /// `@each $a, $b in list { .. }`.
    Each {
        /// Loop variable names (more than one destructures each element).
        variables: Vec<String>,
        /// The list/map expression iterated over.
        list: Expression,
        /// Loop body.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@for $i from a through/to b { .. }`.
    For {
        /// Loop variable name.
        variable: String,
        /// Start expression.
        from: Expression,
        /// End expression.
        to: Expression,
        /// `true` for `through` (inclusive), `false` for `to` (exclusive).
        inclusive: bool,
        /// Loop body.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@while condition { .. }`.
    While {
        /// Loop condition, re-evaluated each iteration.
        condition: Expression,
        /// Loop body.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@mixin name(params) { .. }`.
    MixinDef {
        /// Mixin name.
        name: String,
        /// Formal parameters.
        params: Params,
        /// `true` if the body contains `@content`.
        has_content: bool,
        /// Mixin body.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@include name(args) { content }`.
    Include {
        /// Namespace the mixin was imported under, if qualified.
        namespace: Option<String>,
        /// Mixin name.
        name: String,
        /// Call arguments.
        args: CallArgs,
        /// The `{ ... }` content block passed via `@content`, if any.
        content: Option<Vec<Statement>>,
        /// Source location.
        span: Span,
    },
    /// `@function name(params) { .. }`.
    FunctionDef {
        /// Function name.
        name: String,
        /// Formal parameters.
        params: Params,
        /// Function body.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@return expr;`.
    Return {
        /// The returned value expression.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// `@at-root [(query)] { .. }`.
    AtRoot {
        /// The optional `(with: ...)`/`(without: ...)` query.
        query: Option<Expression>,
        /// Body to hoist.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@media query { .. }`.
    Media {
        /// The (possibly interpolated) media query text.
        query: Interpolation,
        /// Body nested under the query.
        body: Vec<Statement>,
        /// Source location.
        span: Span,
    },
    /// `@import "a", "b", ...;`.
    Import {
        /// One entry per comma-separated argument.
        args: Vec<ImportArgument>,
        /// Source location.
        span: Span,
    },
    /// `@extend selector [!optional];`.
    Extend {
        /// The selector text being extended, with interpolation.
        selector: Interpolation,
        /// `true` if `!optional` was given (don't error on no match).
        optional: bool,
        /// Source location.
        span: Span,
    },
    /// `@warn expr;`.
    Warn {
        /// The message expression.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// `@error expr;`.
    Error {
        /// The message expression.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// `@debug expr;`.
    Debug {
        /// The message expression.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// `@content(args);` inside a mixin body.
    Content {
        /// Arguments forwarded to the content block's parameters (Sass
        /// 1.x `@content` argument lists).
        args: CallArgs,
        /// Source location.
        span: Span,
    },
    /// Any other at-rule passed through mostly verbatim (`@font-face`,
    /// `@keyframes`, `@supports`, `@charset`, ...), with its prelude kept
    /// as interpolated text and its body (if any) parsed recursively so
    /// that Sass constructs can still appear inside e.g. `@keyframes`.
    PlainAtRule {
        /// The at-rule name, without `@`.
        name: String,
        /// Raw prelude text (between the name and `{`/`;`).
        prelude: Interpolation,
        /// Body statements, `None` for a `;`-terminated at-rule.
        body: Option<Vec<Statement>>,
        /// Source location.
        span: Span,
    },
    /// A loud `/*! ... */` or plain `//`/`/* */` comment preserved in the
    /// output stream at its original position.
    Comment {
        /// Raw comment text including delimiters.
        text: String,
        /// Source location.
        span: Span,
    },
}

impl Statement {
    /// The span covering this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::StyleRule { span, .. }
            | Self::Declaration { span, .. }
            | Self::VariableDecl { span, .. }
            | Self::If { span, .. }
            | Self::Each { span, .. }
            | Self::For { span, .. }
            | Self::While { span, .. }
            | Self::MixinDef { span, .. }
            | Self::Include { span, .. }
            | Self::FunctionDef { span, .. }
            | Self::Return { span, .. }
            | Self::AtRoot { span, .. }
            | Self::Media { span, .. }
            | Self::Import { span, .. }
            | Self::Extend { span, .. }
            | Self::Warn { span, .. }
            | Self::Error { span, .. }
            | Self::Debug { span, .. }
            | Self::Content { span, .. }
            | Self::PlainAtRule { span, .. }
            | Self::Comment { span, .. } => *span,
        }
    }
}

/// A parsed stylesheet: its dialect-resolved top-level statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Top-level statements, in source order.
    pub statements: Vec<Statement>,
    /// The source this stylesheet was parsed from.
    pub source: crate::span::SourceId,
}
