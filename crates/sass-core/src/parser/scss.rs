//! SCSS entry point: brace-delimited syntax, the default dialect.

use crate::ast::Stylesheet;
use crate::error::Result;
use crate::span::SourceId;

use super::{Dialect, StylesheetParser};

/// Parse `text` as SCSS.
pub fn parse(text: &str, source: SourceId) -> Result<Stylesheet> {
    StylesheetParser::new(text, source, Dialect::Scss).parse_stylesheet()
}
