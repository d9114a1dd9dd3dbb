//! A Sass/SCSS compiler core: scanner, parser (three dialects), evaluator,
//! selector engine, and CSS emitter.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner & span model** (`scanner.rs`, `span.rs`) — source text
//!   walking and the `SourceId`/`Span` bookkeeping every diagnostic and
//!   AST node carries.
//! - **Parser** (`parser/`) — a shared recursive-descent grammar with
//!   three dialect shims: `.scss` (brace-delimited), the indented `.sass`
//!   syntax (pre-processed into brace form), and plain `.css` (a strict
//!   subset that forbids Sass-only constructs).
//! - **AST** (`ast/`) — statements, expressions, and interpolation nodes.
//! - **Environment** (`env.rs`) — lexical variable scopes plus the
//!   `@mixin`/`@function` registries and call stack.
//! - **Evaluator** (`eval/`) — a tree-walking interpreter that turns a
//!   parsed stylesheet into a flat [`css_tree::CssTree`], including
//!   control flow, `@import`, `@content`, and the built-in function
//!   library (`eval/builtins/`).
//! - **Value system** (`value/`) — numbers with unit arithmetic, colors,
//!   lists, maps, strings, and the operators between them (`value/ops.rs`).
//! - **Selector engine** (`selector/`) — parsing, specificity, `&`
//!   resolution, and `@extend` unification.
//! - **Emitter** (`emitter.rs`) — renders a resolved tree to CSS text in
//!   expanded, compressed, or nested style.
//!
//! # Entry points
//!
//! [`compile_string`] compiles source text of a known [`parser::Dialect`].
//! [`compile`] is the convenience wrapper that infers the dialect from a
//! filename extension (`.scss`/`.sass`/`.css`), without touching the
//! filesystem itself — reading the file, if any, is the caller's job.
//!
//! # Non-goals
//!
//! No C ABI, no filesystem access beyond what an [`importer::Importer`]
//! implementation provides, no source-map serialization (only the
//! [`SourceMapSink`] hook a caller can use to record spans), no CLI
//! argument parsing, and no dynamic-library plugin loading.

pub mod ast;
pub mod css_tree;
pub mod emitter;
pub mod env;
pub mod error;
pub mod eval;
pub mod importer;
pub mod parser;
pub mod scanner;
pub mod selector;
pub mod span;
pub mod value;

use std::collections::HashMap;
use std::rc::Rc;

pub use emitter::OutputStyle;
pub use error::{Result, SassError};
pub use eval::callable::NativeFunction;
pub use eval::Evaluator;
pub use importer::{ImportResult, Importer, ImporterChain, MapImporter};
pub use parser::Dialect;
pub use sass_common::{LogEvent, Logger, StackFrame};

use emitter::EmitterOptions;
use span::{SourceId, SourceRegistry, Span};

/// A hook a caller can implement to record source-mapping information as
/// the emitter walks the resolved tree. `sass-core` never serializes a
/// source map itself (spec §1 Non-goals) — this is the seam an embedder
/// wanting `.css.map` output would hang its own writer on.
pub trait SourceMapSink {
    /// Called once for every declaration/rule emitted, with the span of
    /// the Sass source it came from and the byte offset it landed at in
    /// the generated CSS.
    fn record(&mut self, source_span: Span, generated_offset: usize);
}

/// A [`SourceMapSink`] that discards everything; the default when a
/// caller doesn't care about source maps.
#[derive(Debug, Default)]
pub struct NullSourceMapSink;

impl SourceMapSink for NullSourceMapSink {
    fn record(&mut self, _source_span: Span, _generated_offset: usize) {}
}

/// Configuration threaded into [`compile`]/[`compile_string`], mirroring
/// how the rest of this crate's pipeline takes its inputs as plain
/// structs rather than a builder with hidden state.
pub struct Options {
    /// Output formatting (spec §4.9).
    pub style: OutputStyle,
    /// Decimal digits numbers are rounded to before printing.
    pub precision: u8,
    /// `@import`/`@use` resolution chain. Empty by default, meaning only
    /// plain-CSS imports (`.css`, `http(s)://`, protocol-relative `//`)
    /// succeed.
    pub importers: ImporterChain,
    /// Custom functions, consulted after user-defined `@function`s but
    /// before the built-in library (spec §6).
    pub functions: HashMap<String, NativeFunction>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            style: OutputStyle::default(),
            precision: 10,
            importers: ImporterChain::new(),
            functions: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("style", &self.style)
            .field("precision", &self.precision)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Everything a compile produces: the rendered CSS plus every `@warn`/
/// `@debug`/deprecation event collected along the way (spec §7 requires
/// these to travel back to the caller, not just be printed).
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// The rendered stylesheet.
    pub css: String,
    /// `@warn`/`@debug`/deprecation events, in emission order.
    pub warnings: Vec<LogEvent>,
}

/// Compile `source`, written in `dialect`, using `options`.
///
/// # Errors
///
/// Returns the first parse or evaluation error encountered, per the
/// unified [`SassError`] taxonomy.
pub fn compile_string(source: &str, dialect: Dialect, options: &Options) -> Result<CompileResult> {
    let mut registry = SourceRegistry::new();
    let entry = registry.add_synthetic("stdin", source.to_string());
    compile_source(source, entry, dialect, &mut registry, options)
}

/// Compile `source`, inferring its dialect from `filename`'s extension
/// (`.sass` → indented, `.css` → plain CSS, anything else → SCSS). Does
/// not touch the filesystem; `source` is the text the caller already
/// read.
///
/// # Errors
///
/// Returns the first parse or evaluation error encountered.
pub fn compile(filename: &str, source: &str, options: &Options) -> Result<CompileResult> {
    let dialect = if filename.ends_with(".sass") {
        Dialect::Indented
    } else if filename.ends_with(".css") {
        Dialect::Css
    } else {
        Dialect::Scss
    };
    let mut registry = SourceRegistry::new();
    let entry = registry.add_file(filename.to_string(), source.to_string());
    compile_source(source, entry, dialect, &mut registry, options)
}

fn compile_source(source: &str, entry: SourceId, dialect: Dialect, registry: &mut SourceRegistry, options: &Options) -> Result<CompileResult> {
    let stylesheet = match dialect {
        Dialect::Scss => parser::scss::parse(source, entry)?,
        Dialect::Indented => parser::indented::parse(source, entry)?,
        Dialect::Css => parser::css::parse(source, entry)?,
    };
    let functions = Rc::new(options.functions.clone());
    let evaluator = Evaluator::new(&options.importers, registry, entry).with_functions(functions);
    let output = evaluator.run(&stylesheet)?;
    let css = emitter::emit(&output.tree, EmitterOptions { style: options.style, precision: options.precision });
    Ok(CompileResult { css, warnings: output.logger.warnings().to_vec() })
}

#[cfg(test)]
mod tests {
    use super::{compile, compile_string, Dialect, Options};

    #[test]
    fn test_compile_infers_scss_dialect() {
        let result = compile("input.scss", ".a { width: 1px + 1px; }", &Options::default()).unwrap();
        assert!(result.css.contains("width: 2px"));
    }

    #[test]
    fn test_compile_infers_indented_dialect() {
        let source = ".a\n  color: red\n";
        let result = compile("input.sass", source, &Options::default()).unwrap();
        assert!(result.css.contains("color: red"));
    }

    #[test]
    fn test_compile_string_with_explicit_dialect() {
        let result = compile_string(".a { color: blue; }", Dialect::Scss, &Options::default()).unwrap();
        assert_eq!(result.css, ".a {\n  color: blue;\n}\n");
    }

    #[test]
    fn test_compile_reports_warnings() {
        let result = compile_string("@warn \"deprecated\"; .a { color: red; }", Dialect::Scss, &Options::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "deprecated");
    }

    #[test]
    fn test_compile_error_propagates() {
        let err = compile_string(".a { width: $undefined; }", Dialect::Scss, &Options::default()).unwrap_err();
        assert!(matches!(err, super::SassError::Runtime { .. }));
    }

    #[test]
    fn test_custom_function_takes_precedence_over_builtin() {
        use std::rc::Rc;
        let mut options = Options::default();
        let _ = options.functions.insert(
            "double".to_string(),
            Rc::new(|args, span| {
                let crate::value::Value::Number(n) = &args[0] else {
                    return Err(super::SassError::runtime("expected a number", span));
                };
                Ok(crate::value::Value::Number(crate::value::SassNumber { value: n.value * 2.0, ..n.clone() }))
            }),
        );
        let result = compile_string(".a { width: double(3px); }", Dialect::Scss, &options).unwrap();
        assert!(result.css.contains("width: 6px"));
    }
}
