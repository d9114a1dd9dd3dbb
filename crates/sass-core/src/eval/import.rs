//! `@import` resolution: turning an import argument into a parsed
//! stylesheet folded into the current evaluation (spec §4.6.6).

use crate::ast::ImportArgument;
use crate::css_tree::{CssNodeKind, NodeId};
use crate::error::{Result, SassError};
use crate::parser::{css, indented, scss};
use crate::span::Span;

use super::{Evaluator, MAX_IMPORT_DEPTH};

impl Evaluator<'_> {
    pub(super) fn eval_import(&mut self, args: &[ImportArgument], span: Span, container_parent: NodeId) -> Result<()> {
        for arg in args {
            match arg {
                ImportArgument::Sass(url) => self.import_one(url, span, container_parent)?,
                ImportArgument::Plain(interp) => {
                    let text = self.eval_interpolation(interp)?;
                    let prelude = if text.starts_with("url(") { text } else { format!("\"{text}\"") };
                    let _ = self.tree.append(container_parent, CssNodeKind::AtRule { name: "import".to_string(), prelude });
                }
            }
        }
        Ok(())
    }

    fn import_one(&mut self, url: &str, span: Span, container_parent: NodeId) -> Result<()> {
        if self.import_depth >= MAX_IMPORT_DEPTH {
            return Err(SassError::runtime(format!("Import depth limit exceeded resolving \"{url}\"."), span));
        }
        let current_path = self.registry.get(self.current_source).display_name();
        let from = (!current_path.starts_with('<')).then_some(current_path.as_str());
        let Some(resolved) = self.importer.resolve(url, from) else {
            return Err(SassError::runtime(format!("Can't find stylesheet to import: \"{url}\"."), span));
        };

        let source_id = self.registry.add_file(resolved.canonical_url.clone(), resolved.contents.to_string());
        let parsed = if resolved.canonical_url.ends_with(".sass") {
            indented::parse(&resolved.contents, source_id)
        } else if resolved.canonical_url.ends_with(".css") {
            css::parse(&resolved.contents, source_id)
        } else {
            scss::parse(&resolved.contents, source_id)
        }?;

        let saved_source = self.current_source;
        self.current_source = source_id;
        self.import_depth += 1;
        let result = self.eval_statements(&parsed.statements, None, container_parent, container_parent);
        self.import_depth -= 1;
        self.current_source = saved_source;
        result.map(|_| ())
    }
}
