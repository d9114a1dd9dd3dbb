//! Indented-Sass entry point.
//!
//! Rather than duplicating the whole statement grammar for
//! indentation-based blocks, this dialect preprocesses the indentation
//! into the brace/semicolon form [`super::StylesheetParser`] already
//! understands, then hands off to the same shared grammar SCSS uses.
//! This mirrors how the original implementation's two parsers share one
//! stylesheet grammar and differ only in how a "block" is delimited.

use crate::ast::Stylesheet;
use crate::error::Result;
use crate::span::SourceId;

use super::{Dialect, StylesheetParser};

/// Parse `text` as indented Sass.
pub fn parse(text: &str, source: SourceId) -> Result<Stylesheet> {
    let flattened = flatten_indentation(text);
    StylesheetParser::new(&flattened, source, Dialect::Indented).parse_stylesheet()
}

/// Rewrite indentation-delimited blocks into `{ ... }`/`;` form.
fn flatten_indentation(text: &str) -> String {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(|line| (line.len() - line.trim_start().len(), line.trim_start()))
        .collect();

    let mut output = String::new();
    let mut stack: Vec<usize> = Vec::new();

    for (i, &(indent, content)) in lines.iter().enumerate() {
        while let Some(&top) = stack.last() {
            if indent < top {
                let _ = stack.pop();
                output.push_str("}\n");
            } else {
                break;
            }
        }

        let next_indent = lines.get(i + 1).map(|&(ind, _)| ind);
        let opens_block = next_indent.is_some_and(|next| next > indent);

        output.push_str(content);
        if opens_block {
            output.push_str(" {\n");
            stack.push(indent);
        } else if content.starts_with("//") || content.ends_with('{') || content.ends_with('}') {
            output.push('\n');
        } else {
            output.push_str(";\n");
        }
    }

    for _ in &stack {
        output.push_str("}\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::flatten_indentation;

    #[test]
    fn test_flatten_simple_rule() {
        let input = ".a\n  color: red\n";
        let flattened = flatten_indentation(input);
        assert_eq!(flattened, ".a {\ncolor: red;\n}\n");
    }

    #[test]
    fn test_flatten_nested_rules() {
        let input = ".a\n  .b\n    color: red\n";
        let flattened = flatten_indentation(input);
        assert_eq!(flattened, ".a {\n.b {\ncolor: red;\n}\n}\n");
    }

    #[test]
    fn test_flatten_sibling_declarations() {
        let input = ".a\n  color: red\n  margin: 0\n";
        let flattened = flatten_indentation(input);
        assert_eq!(flattened, ".a {\ncolor: red;\nmargin: 0;\n}\n");
    }
}
