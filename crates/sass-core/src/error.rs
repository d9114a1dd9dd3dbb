//! Unified error taxonomy for every stage of the compiler.

use thiserror::Error;

use crate::span::Span;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SassError>;

/// Every error a compile can fail with. Variants map directly onto the
/// taxonomy a Sass implementation reports to its caller: a bad parse, a
/// runtime type/arity error, an unresolved `@extend`, or an evaluated
/// value that cannot be represented as CSS.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SassError {
    /// Scanner or parser rejected the input.
    #[error("Error: {message}")]
    Parse {
        /// Human-readable description of what was expected.
        message: String,
        /// Where in the source the failure occurred.
        span: Span,
    },

    /// Evaluation of an otherwise well-formed AST failed: wrong argument
    /// type, unknown variable, arity mismatch, `@error` directive, etc.
    #[error("Error: {message}")]
    Runtime {
        /// Human-readable description of the failure.
        message: String,
        /// Where the failing expression/statement is.
        span: Span,
    },

    /// `@extend` could not find any matching selector and was not marked
    /// `!optional`.
    #[error("Error: \"{extendee}\" failed to @extend \"{extender}\".\nThe selector \"{extendee}\" was not found.")]
    Extend {
        /// The selector that requested the extension.
        extender: String,
        /// The selector it tried to extend.
        extendee: String,
        /// Where the `@extend` directive is.
        span: Span,
    },

    /// A value could not be serialized as a valid CSS property value
    /// (e.g. a Sass list used as a selector, or `NaN`).
    #[error("Error: {value} isn't a valid CSS value.")]
    InvalidCss {
        /// The value's `inspect()` rendering.
        value: String,
        /// Where the offending value came from.
        span: Span,
    },
}

impl SassError {
    /// The span the error should be reported at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Parse { span, .. }
            | Self::Runtime { span, .. }
            | Self::Extend { span, .. }
            | Self::InvalidCss { span, .. } => *span,
        }
    }

    /// Construct a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::Parse {
            message: message.into(),
            span,
        }
    }

    /// Construct a runtime error.
    #[must_use]
    pub fn runtime(message: impl Into<String>, span: Span) -> Self {
        Self::Runtime {
            message: message.into(),
            span,
        }
    }

    /// Construct an invalid-CSS-value error.
    #[must_use]
    pub fn invalid_css(value: impl Into<String>, span: Span) -> Self {
        Self::InvalidCss {
            value: value.into(),
            span,
        }
    }
}
