//! Plain-CSS entry point: SCSS grammar with Sass-only constructs rejected
//! by [`super::Dialect::Css`].

use crate::ast::Stylesheet;
use crate::error::Result;
use crate::span::SourceId;

use super::{Dialect, StylesheetParser};

/// Parse `text` as plain CSS (no variables, nesting, or control flow).
pub fn parse(text: &str, source: SourceId) -> Result<Stylesheet> {
    StylesheetParser::new(text, source, Dialect::Css).parse_stylesheet()
}
