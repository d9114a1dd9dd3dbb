//! Abstract syntax tree shared by all three stylesheet dialects (spec §4.4).
//!
//! The SCSS, indented-Sass, and plain-CSS parsers in `parser/` all build
//! the same tree; dialect differences are resolved during parsing, not
//! carried into the AST.

pub mod expression;
pub mod interpolation;
pub mod statement;

pub use expression::{BinaryOp, CallArgs, Expression, Param, Params, UnaryOp};
pub use interpolation::{Interpolation, InterpolationPart};
pub use statement::{ImportArgument, Statement, Stylesheet};
