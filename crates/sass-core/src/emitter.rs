//! Renders a resolved [`CssTree`] to CSS text (spec §4.9).

use crate::css_tree::{CssNodeKind, CssTree, NodeId};

/// Controls the emitter's whitespace and nesting choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// One selector/declaration per line, 2-space indentation.
    #[default]
    Expanded,
    /// Everything on one line, minimal whitespace, no comments.
    Compressed,
    /// Like `Expanded`, but nested rules stay visually nested instead of
    /// being flattened to top-level selectors (`Expanded`/`Compressed`
    /// both flatten; `Nested` is a dart-sass/libsass legacy style some
    /// embedders still request).
    Nested,
}

/// Emitter configuration (spec §6.1 `Options`, emitter-relevant subset).
#[derive(Debug, Clone, Copy)]
pub struct EmitterOptions {
    /// Output style.
    pub style: OutputStyle,
    /// Decimal digits numbers are rounded to before printing.
    pub precision: u8,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            style: OutputStyle::Expanded,
            precision: 10,
        }
    }
}

/// Render the whole tree rooted at [`NodeId::ROOT`] to a CSS string.
#[must_use]
pub fn emit(tree: &CssTree, options: EmitterOptions) -> String {
    let mut out = String::new();
    for &child in tree.children(NodeId::ROOT) {
        emit_node(tree, child, 0, options, &mut out);
    }
    if options.style == OutputStyle::Compressed {
        out.trim_end().to_string()
    } else {
        out
    }
}

fn indent(depth: usize, options: EmitterOptions) -> String {
    if options.style == OutputStyle::Compressed {
        String::new()
    } else {
        "  ".repeat(depth)
    }
}

fn emit_node(tree: &CssTree, id: NodeId, depth: usize, options: EmitterOptions, out: &mut String) {
    if tree.is_empty_of_content(id) {
        return;
    }
    let pad = indent(depth, options);
    match &tree.get(id).kind {
        CssNodeKind::Root => {}
        CssNodeKind::StyleRule(selectors) => {
            out.push_str(&pad);
            out.push_str(&selectors.to_string());
            emit_block_body(tree, id, depth, options, out);
        }
        CssNodeKind::Media(query) => {
            out.push_str(&pad);
            out.push_str("@media ");
            out.push_str(query);
            emit_block_body(tree, id, depth, options, out);
        }
        CssNodeKind::AtRule { name, prelude } => {
            out.push_str(&pad);
            out.push('@');
            out.push_str(name);
            if !prelude.is_empty() {
                out.push(' ');
                out.push_str(prelude);
            }
            if tree.children(id).is_empty() {
                out.push_str(";\n");
            } else {
                emit_block_body(tree, id, depth, options, out);
            }
        }
        CssNodeKind::Declaration(decl) => {
            out.push_str(&pad);
            out.push_str(&decl.property);
            out.push(':');
            if options.style != OutputStyle::Compressed {
                out.push(' ');
            }
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push(';');
            if options.style != OutputStyle::Compressed {
                out.push('\n');
            }
        }
        CssNodeKind::Comment(text) => {
            if options.style != OutputStyle::Compressed {
                out.push_str(&pad);
                out.push_str(text);
                out.push('\n');
            }
        }
    }
}

fn emit_block_body(tree: &CssTree, id: NodeId, depth: usize, options: EmitterOptions, out: &mut String) {
    if options.style == OutputStyle::Compressed {
        out.push('{');
        let children: Vec<_> = tree.children(id).iter().filter(|&&c| !tree.is_empty_of_content(c)).collect();
        for (i, &&child) in children.iter().enumerate() {
            emit_node(tree, child, depth + 1, options, out);
            if matches!(tree.get(child).kind, CssNodeKind::Declaration(_)) && i + 1 == children.len() {
                if out.ends_with(';') {
                    let _ = out.pop();
                }
            }
        }
        out.push('}');
    } else {
        out.push_str(" {\n");
        for &child in tree.children(id) {
            emit_node(tree, child, depth + 1, options, out);
        }
        out.push_str(&indent(depth, options));
        out.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::{emit, EmitterOptions, OutputStyle};
    use crate::css_tree::{CssDeclaration, CssNodeKind, CssTree, NodeId};
    use crate::selector::parser::parse_selector_list;

    fn sample_tree() -> CssTree {
        let mut tree = CssTree::new();
        let rule = tree.append(NodeId::ROOT, CssNodeKind::StyleRule(parse_selector_list(".a")));
        let _ = tree.append(
            rule,
            CssNodeKind::Declaration(CssDeclaration {
                property: "color".into(),
                value: "red".into(),
                important: false,
            }),
        );
        tree
    }

    #[test]
    fn test_expanded_output() {
        let tree = sample_tree();
        let css = emit(&tree, EmitterOptions::default());
        assert_eq!(css, ".a {\n  color: red;\n}\n");
    }

    #[test]
    fn test_compressed_output() {
        let tree = sample_tree();
        let css = emit(&tree, EmitterOptions { style: OutputStyle::Compressed, precision: 10 });
        assert_eq!(css, ".a{color:red}");
    }

    #[test]
    fn test_empty_rule_is_dropped() {
        let mut tree = CssTree::new();
        let _ = tree.append(NodeId::ROOT, CssNodeKind::StyleRule(parse_selector_list(".empty")));
        let css = emit(&tree, EmitterOptions::default());
        assert_eq!(css, "");
    }

    #[test]
    fn test_important_declaration() {
        let mut tree = CssTree::new();
        let rule = tree.append(NodeId::ROOT, CssNodeKind::StyleRule(parse_selector_list(".a")));
        let _ = tree.append(
            rule,
            CssNodeKind::Declaration(CssDeclaration {
                property: "color".into(),
                value: "red".into(),
                important: true,
            }),
        );
        let css = emit(&tree, EmitterOptions::default());
        assert!(css.contains("!important"));
    }
}
