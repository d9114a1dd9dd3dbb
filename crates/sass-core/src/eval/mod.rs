//! Tree-walking evaluator: turns a parsed [`Stylesheet`] into a resolved
//! [`CssTree`], the way the teacher's cascade pass turns parsed CSS rules
//! into computed styles, except here the "computation" is a full
//! expression/control-flow language rather than a property cascade
//! (spec §4.6).

pub mod builtins;
pub mod callable;
pub mod control;
pub mod import;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Expression, Interpolation, InterpolationPart, Statement, Stylesheet};
use crate::css_tree::{CssDeclaration, CssNodeKind, CssTree, NodeId};
use crate::env::{Callable, Environment, Scope};
use crate::error::{Result, SassError};
use crate::importer::ImporterChain;
use crate::selector::extend::{resolve_parent_selectors, ExtendRegistry};
use crate::selector::parser::parse_selector_list;
use crate::selector::SelectorList;
use crate::span::{SourceId, SourceRegistry, Span};
use crate::value::{ops, SassList, SassMap, SassString, Value};
use sass_common::{Logger, StackFrame};

/// What a block of statements did when it finished: ran to completion, or
/// hit a `@return` that needs to unwind straight out of any enclosing
/// `@if`/`@each`/`@for`/`@while`.
pub(crate) enum Flow {
    /// Ran every statement normally.
    Normal,
    /// A `@return` fired; callers must stop executing sibling statements
    /// and propagate this value up to the enclosing function call.
    Return(Value),
}

/// A suspended `@content` block: the statements passed to an `@include`,
/// plus the scope they should see (the call site's, not the mixin's) and
/// the selector nesting context active at the call site.
struct ContentFrame {
    body: Vec<Statement>,
    closure: Rc<RefCell<Scope>>,
    selector: Option<SelectorList>,
}

/// Drives evaluation of one compile: owns the variable/callable
/// environment, the accumulated `@warn`/`@debug` log, the `@extend`
/// registry, and the output tree being built.
pub struct Evaluator<'a> {
    env: Environment,
    logger: Logger,
    extends: ExtendRegistry,
    tree: CssTree,
    importer: &'a ImporterChain,
    registry: &'a mut SourceRegistry,
    content_stack: Vec<Option<ContentFrame>>,
    current_source: SourceId,
    import_depth: usize,
    custom_functions: Rc<std::collections::HashMap<String, callable::NativeFunction>>,
    /// The enclosing `@media` query texts, outermost first, active at the
    /// current point of evaluation — consulted when registering `@extend`
    /// rules so cross-media extends can be rejected at finalization.
    media_stack: Vec<String>,
}

/// `@import` recurses arbitrarily; this bound exists purely to turn a
/// circular import into a catchable error instead of a stack overflow.
const MAX_IMPORT_DEPTH: usize = 64;

impl<'a> Evaluator<'a> {
    /// Build an evaluator that resolves imports through `importer` and
    /// registers any new sources (imported files, interpolated selectors)
    /// into `registry`.
    pub fn new(importer: &'a ImporterChain, registry: &'a mut SourceRegistry, entry_source: SourceId) -> Self {
        Self {
            env: Environment::new(),
            logger: Logger::new(),
            extends: ExtendRegistry::new(),
            tree: CssTree::new(),
            importer,
            registry,
            content_stack: Vec::new(),
            current_source: entry_source,
            import_depth: 0,
            custom_functions: Rc::new(std::collections::HashMap::new()),
            media_stack: Vec::new(),
        }
    }

    /// Register the custom functions from [`crate::Options::functions`],
    /// consulted after user-defined `@function`s but before the built-in
    /// library.
    #[must_use]
    pub fn with_functions(mut self, functions: Rc<std::collections::HashMap<String, callable::NativeFunction>>) -> Self {
        self.custom_functions = functions;
        self
    }

    /// Evaluate a whole stylesheet, then apply every registered `@extend`
    /// to the resulting tree before handing it back.
    pub fn run(mut self, stylesheet: &Stylesheet) -> Result<EvalOutput> {
        self.current_source = stylesheet.source;
        let _ = self.eval_statements(&stylesheet.statements, None, NodeId::ROOT, NodeId::ROOT)?;
        self.apply_extends()?;
        Ok(EvalOutput { tree: self.tree, logger: self.logger })
    }

    fn apply_extends(&mut self) -> Result<()> {
        let all_selectors: Vec<SelectorList> = self.collect_style_rule_selectors(NodeId::ROOT);
        let unmatched = self.extends.unmatched_required(&all_selectors);
        if let Some((extendee, span)) = unmatched.first() {
            return Err(SassError::Extend {
                extender: String::new(),
                extendee: extendee.to_string(),
                span: *span,
            });
        }
        self.rewrite_style_rule_selectors(NodeId::ROOT)?;
        Ok(())
    }

    fn collect_style_rule_selectors(&self, id: NodeId) -> Vec<SelectorList> {
        let mut out = Vec::new();
        for &child in self.tree.children(id) {
            if let CssNodeKind::StyleRule(list) = &self.tree.get(child).kind {
                out.push(list.clone());
            }
            out.extend(self.collect_style_rule_selectors(child));
        }
        out
    }

    fn rewrite_style_rule_selectors(&mut self, id: NodeId) -> Result<()> {
        let children = self.tree.children(id).to_vec();
        for child in children {
            if let CssNodeKind::StyleRule(list) = &self.tree.get(child).kind {
                let media_context = self.media_context_of(child);
                let rewritten = self.extends.apply(list, &media_context)?;
                self.tree.get_mut(child).kind = CssNodeKind::StyleRule(rewritten);
            }
            self.rewrite_style_rule_selectors(child)?;
        }
        Ok(())
    }

    /// The enclosing `@media` query texts of `id`, outermost first, read
    /// back off the built tree rather than the live `media_stack` (needed
    /// at finalization time, after evaluation has finished).
    fn media_context_of(&self, id: NodeId) -> Vec<String> {
        let mut stack = Vec::new();
        let mut current = self.tree.get(id).parent;
        while let Some(parent) = current {
            if let CssNodeKind::Media(text) = &self.tree.get(parent).kind {
                stack.push(text.clone());
            }
            current = self.tree.get(parent).parent;
        }
        stack.reverse();
        stack
    }

    /// Parse `(with: ...)`/`(without: ...)` into a query, or the default
    /// `(without: rule)` when `@at-root` has no parenthesized clause.
    fn eval_at_root_query(&mut self, query: Option<&Expression>) -> Result<AtRootQuery> {
        let Some(expr) = query else {
            return Ok(AtRootQuery::default());
        };
        let span = expr.span();
        let value = self.eval_expression(expr)?;
        let Value::Map(map) = &value else {
            return Err(SassError::runtime("@at-root query must be (with: ...) or (without: ...).", span));
        };
        let [(key, names)] = map.entries.as_slice() else {
            return Err(SassError::runtime("@at-root query must be (with: ...) or (without: ...).", span));
        };
        let names: Vec<String> = names.as_list_items().iter().map(|v| v.to_css_string().to_ascii_lowercase()).collect();
        match key.to_css_string().to_ascii_lowercase().as_str() {
            "with" => Ok(AtRootQuery::With(names)),
            "without" => Ok(AtRootQuery::Without(names)),
            _ => Err(SassError::runtime("@at-root query must be (with: ...) or (without: ...).", span)),
        }
    }

    /// Walk the tree from `container_parent` up to the root, dropping the
    /// ancestors `query` excludes and rebuilding the rest as a fresh chain
    /// under the root (spec §4.6.2: "re-roots the new content at the
    /// common ancestor, and re-attaches included intermediaries").
    fn reroot_for_at_root(&mut self, container_parent: NodeId, query: &AtRootQuery) -> NodeId {
        let mut chain = self.collect_ancestors(container_parent);
        chain.reverse();
        let mut new_parent = NodeId::ROOT;
        let mut rebuilding = false;
        for ancestor in chain {
            let kind = self.tree.get(ancestor).kind.clone();
            let excluded = at_root_kind_name(&kind).is_some_and(|name| query.excludes(name));
            if excluded {
                rebuilding = true;
                continue;
            }
            if rebuilding {
                // Everything below the first excluded ancestor must be a
                // fresh clone: the original node's own parent link still
                // points through the excluded one, so it can't just be
                // reused as a child of the rebuilt chain.
                new_parent = self.tree.append(new_parent, kind);
            } else {
                // Nothing excluded yet; reuse the real node so unrelated
                // siblings stay merged into the same block instead of a
                // duplicate being spliced in.
                new_parent = ancestor;
            }
        }
        new_parent
    }

    /// `id` and every ancestor up to (not including) the root, nearest
    /// first.
    fn collect_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == NodeId::ROOT {
                break;
            }
            out.push(node);
            current = self.tree.get(node).parent;
        }
        out
    }

    fn frame_stack(&self) -> Vec<StackFrame> {
        let (line, column) = self.registry.get(self.current_source).line_col(0);
        let path = self.registry.get(self.current_source).display_name();
        let mut frames: Vec<StackFrame> = self
            .env
            .call_stack()
            .iter()
            .rev()
            .map(|frame| {
                let (l, c) = self.registry.line_col(frame.call_span);
                StackFrame { path: path.clone(), line: l, column: c, kind: frame.kind, name: frame.name.clone() }
            })
            .collect();
        if frames.is_empty() {
            frames.push(StackFrame { path, line, column, kind: "root", name: String::new() });
        }
        frames
    }

    fn eval_statements(
        &mut self,
        stmts: &[Statement],
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        for stmt in stmts {
            match self.eval_statement(stmt, selector_ctx, decl_parent, container_parent)? {
                Flow::Normal => {}
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Normal)
    }

    #[allow(clippy::too_many_lines)]
    fn eval_statement(
        &mut self,
        stmt: &Statement,
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        match stmt {
            Statement::StyleRule { selector, body, .. } => {
                let text = self.eval_interpolation(selector)?;
                let parsed = parse_selector_list(&text);
                let resolved = resolve_parent_selectors(&parsed, selector_ctx);
                let node = self.tree.append(container_parent, CssNodeKind::StyleRule(resolved.clone()));
                let _ = self.eval_statements(body, Some(&resolved), node, container_parent)?;
            }
            Statement::Declaration { name, value, important, children, .. } => {
                let property = self.eval_interpolation(name)?;
                if let Some(expr) = value {
                    let evaluated = self.eval_expression(expr)?;
                    if !matches!(evaluated, Value::Null) {
                        check_valid_css_value(&evaluated, expr.span())?;
                        let _ = self.tree.append(
                            decl_parent,
                            CssNodeKind::Declaration(CssDeclaration {
                                property: property.clone(),
                                value: evaluated.to_css_string(),
                                important: *important,
                            }),
                        );
                    }
                }
                if !children.is_empty() {
                    self.eval_nested_declarations(&property, children, decl_parent)?;
                }
            }
            Statement::VariableDecl { name, value, default, global, .. } => {
                let evaluated = self.eval_expression(value)?;
                if *default {
                    self.env.set_default(name, evaluated, *global);
                } else {
                    self.env.set_variable(name, evaluated, *global);
                }
            }
            Statement::If { branches, else_branch, .. } => {
                return self.eval_if(branches, else_branch.as_deref(), selector_ctx, decl_parent, container_parent);
            }
            Statement::Each { variables, list, body, .. } => {
                return self.eval_each(variables, list, body, selector_ctx, decl_parent, container_parent);
            }
            Statement::For { variable, from, to, inclusive, body, .. } => {
                return self.eval_for(variable, from, to, *inclusive, body, selector_ctx, decl_parent, container_parent);
            }
            Statement::While { condition, body, .. } => {
                return self.eval_while(condition, body, selector_ctx, decl_parent, container_parent);
            }
            Statement::MixinDef { name, params, has_content, body, .. } => {
                self.env.define_mixin(
                    name.clone(),
                    Callable { params: params.clone(), body: body.clone(), closure: self.env.current_scope(), accepts_content: *has_content },
                );
            }
            Statement::Include { name, args, content, span, .. } => {
                self.eval_include(name, args, content.as_deref(), *span, selector_ctx, decl_parent, container_parent)?;
            }
            Statement::FunctionDef { name, params, body, .. } => {
                self.env.define_function(
                    name.clone(),
                    Callable { params: params.clone(), body: body.clone(), closure: self.env.current_scope(), accepts_content: false },
                );
            }
            Statement::Return { value, .. } => {
                let evaluated = self.eval_expression(value)?;
                return Ok(Flow::Return(evaluated));
            }
            Statement::AtRoot { query, body, .. } => {
                let at_root_query = self.eval_at_root_query(query.as_ref())?;
                let new_parent = self.reroot_for_at_root(container_parent, &at_root_query);
                let selector_for_body = if at_root_query.excludes("rule") { None } else { selector_ctx };
                let _ = self.eval_statements(body, selector_for_body, new_parent, new_parent)?;
            }
            Statement::Media { query, body, .. } => {
                let text = self.eval_interpolation(query)?;
                let merged = match &self.tree.get(container_parent).kind {
                    CssNodeKind::Media(enclosing) => merge_media_queries(enclosing, &text),
                    _ => Some(text),
                };
                let Some(merged) = merged else {
                    return Ok(Flow::Normal);
                };
                let node = self.tree.append(container_parent, CssNodeKind::Media(merged.clone()));
                self.media_stack.push(merged);
                let result = self.eval_statements(body, selector_ctx, node, node);
                let _ = self.media_stack.pop();
                let _ = result?;
            }
            Statement::Import { args, span } => {
                self.eval_import(args, *span, container_parent)?;
            }
            Statement::Extend { selector, optional, span } => {
                let text = self.eval_interpolation(selector)?;
                let parsed = parse_selector_list(&text);
                if parsed.complexes.is_empty() {
                    return Err(SassError::runtime("@extend requires a simple selector.", *span));
                }
                let Some(extender_list) = selector_ctx else {
                    return Err(SassError::runtime("@extend may only be used inside a style rule.", *span));
                };
                for complex in &parsed.complexes {
                    if complex.components.len() != 1 {
                        return Err(SassError::runtime("complex selectors may not be extended", *span));
                    }
                    let extendee = complex.components[0].1.clone();
                    for extender in &extender_list.complexes {
                        self.extends.register(extendee.clone(), extender.clone(), *optional, *span, self.media_stack.clone());
                    }
                }
            }
            Statement::Warn { value, span } => {
                let evaluated = self.eval_expression(value)?;
                let message = evaluated.to_css_string();
                let stack = self.frame_stack();
                let _ = span;
                self.logger.warn(message, stack);
            }
            Statement::Error { value, span } => {
                let evaluated = self.eval_expression(value)?;
                return Err(SassError::runtime(evaluated.to_css_string(), *span));
            }
            Statement::Debug { value, span } => {
                let evaluated = self.eval_expression(value)?;
                let message = evaluated.inspect();
                let stack = self.frame_stack();
                let _ = span;
                self.logger.debug(message, stack);
            }
            Statement::Content { .. } => {
                self.eval_content(selector_ctx, decl_parent, container_parent)?;
            }
            Statement::PlainAtRule { name, prelude, body, .. } => {
                let prelude_text = self.eval_interpolation(prelude)?;
                let node = self.tree.append(container_parent, CssNodeKind::AtRule { name: name.clone(), prelude: prelude_text });
                if let Some(body) = body {
                    let _ = self.eval_statements(body, selector_ctx, node, node)?;
                }
            }
            Statement::Comment { text, .. } => {
                let _ = self.tree.append(decl_parent, CssNodeKind::Comment(text.clone()));
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_nested_declarations(&mut self, prefix: &str, children: &[Statement], decl_parent: NodeId) -> Result<()> {
        for child in children {
            if let Statement::Declaration { name, value, important, children: grandchildren, .. } = child {
                let suffix = self.eval_interpolation(name)?;
                let full_name = format!("{prefix}-{suffix}");
                if let Some(expr) = value {
                    let evaluated = self.eval_expression(expr)?;
                    if !matches!(evaluated, Value::Null) {
                        check_valid_css_value(&evaluated, expr.span())?;
                        let _ = self.tree.append(
                            decl_parent,
                            CssNodeKind::Declaration(CssDeclaration {
                                property: full_name.clone(),
                                value: evaluated.to_css_string(),
                                important: *important,
                            }),
                        );
                    }
                }
                if !grandchildren.is_empty() {
                    self.eval_nested_declarations(&full_name, grandchildren, decl_parent)?;
                }
            }
        }
        Ok(())
    }

    fn eval_include(
        &mut self,
        name: &str,
        args: &crate::ast::CallArgs,
        content: Option<&[Statement]>,
        span: Span,
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<()> {
        let Some(mixin) = self.env.get_mixin(name) else {
            return Err(SassError::runtime(format!("Undefined mixin `{name}`."), span));
        };
        let evaluated_args = self.eval_call_args(args)?;
        let content_frame = content.map(|body| ContentFrame {
            body: body.to_vec(),
            closure: self.env.current_scope(),
            selector: selector_ctx.cloned(),
        });
        self.content_stack.push(content_frame);
        let body = mixin.body.clone();
        let result = self.call_with_args(&mixin, evaluated_args, span, "mixin", name.to_string(), move |evaluator| {
            let _ = evaluator.eval_statements(&body, selector_ctx, decl_parent, container_parent)?;
            Ok(Value::Null)
        });
        let _ = self.content_stack.pop();
        result.map(|_| ())
    }

    fn eval_content(&mut self, _outer_selector: Option<&SelectorList>, decl_parent: NodeId, container_parent: NodeId) -> Result<()> {
        let Some(Some(frame)) = self.content_stack.last() else {
            return Ok(());
        };
        let body = frame.body.clone();
        let closure = Rc::clone(&frame.closure);
        let selector = frame.selector.clone();
        let saved = self.env.push_closure_scope(&closure);
        let outcome = self.eval_statements(&body, selector.as_ref(), decl_parent, container_parent);
        self.env.pop_scope(saved);
        outcome.map(|_| ())
    }

    /// Evaluate `#{}` interpolation into plain text.
    pub(crate) fn eval_interpolation(&mut self, interp: &Interpolation) -> Result<String> {
        if let Some(plain) = interp.as_plain_text() {
            return Ok(plain);
        }
        let mut out = String::new();
        for part in &interp.parts {
            match part {
                InterpolationPart::Literal(text) => out.push_str(text),
                InterpolationPart::Expr(expr) => out.push_str(&self.eval_expression(expr)?.to_css_string()),
            }
        }
        Ok(out)
    }

    /// Evaluate one expression down to a [`Value`].
    #[allow(clippy::too_many_lines)]
    pub(crate) fn eval_expression(&mut self, expr: &Expression) -> Result<Value> {
        match expr {
            Expression::Literal(value, _) => Ok(value.clone()),
            Expression::Variable { name, span, .. } => self
                .env
                .get_variable(name)
                .ok_or_else(|| SassError::runtime(format!("Undefined variable: \"${name}\"."), *span)),
            Expression::StringLiteral { text, quoted } => {
                let rendered = self.eval_interpolation(text)?;
                Ok(Value::String(if *quoted { SassString::quoted(rendered) } else { SassString::unquoted(rendered) }))
            }
            Expression::ListLiteral { items, separator, bracketed, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expression(item)?);
                }
                Ok(Value::List(SassList { items: values, separator: *separator, bracketed: *bracketed }))
            }
            Expression::MapLiteral { entries, .. } => {
                let mut map = SassMap::new();
                for (key_expr, value_expr) in entries {
                    let key = self.eval_expression(key_expr)?;
                    let value = self.eval_expression(value_expr)?;
                    map.insert(key, value);
                }
                Ok(Value::Map(map))
            }
            Expression::BinaryOp { op, left, right, span } => self.eval_binary_op(*op, left, right, *span),
            Expression::UnaryOp { op, operand, span } => {
                let value = self.eval_expression(operand)?;
                match op {
                    crate::ast::UnaryOp::Neg => ops::negate(&value, *span),
                    crate::ast::UnaryOp::Plus => Ok(value),
                    crate::ast::UnaryOp::Not => Ok(ops::not(&value)),
                }
            }
            Expression::FunctionCall { name, args, span, .. } => self.eval_function_call(name, args, *span),
            Expression::Parenthesized(inner) => self.eval_expression(inner),
            Expression::ParentSelector(span) => Err(SassError::runtime("Top-level selectors may not contain the parent selector \"&\".", *span)),
        }
    }

    fn eval_binary_op(&mut self, op: crate::ast::BinaryOp, left: &Expression, right: &Expression, span: Span) -> Result<Value> {
        use crate::ast::BinaryOp as Op;
        if op == Op::Or {
            let l = self.eval_expression(left)?;
            return if l.is_truthy() { Ok(l) } else { self.eval_expression(right) };
        }
        if op == Op::And {
            let l = self.eval_expression(left)?;
            return if l.is_truthy() { self.eval_expression(right) } else { Ok(l) };
        }
        let l = self.eval_expression(left)?;
        let r = self.eval_expression(right)?;
        match op {
            Op::Eq => Ok(Value::Boolean(ops::values_equal(&l, &r))),
            Op::Neq => Ok(Value::Boolean(!ops::values_equal(&l, &r))),
            Op::Lt => Ok(Value::Boolean(ops::compare(&l, &r, span)?.is_lt())),
            Op::Le => Ok(Value::Boolean(ops::compare(&l, &r, span)?.is_le())),
            Op::Gt => Ok(Value::Boolean(ops::compare(&l, &r, span)?.is_gt())),
            Op::Ge => Ok(Value::Boolean(ops::compare(&l, &r, span)?.is_ge())),
            Op::Add => ops::add(&l, &r, span),
            Op::Sub => ops::subtract(&l, &r, span),
            Op::Mul => ops::multiply(&l, &r, span),
            Op::Div => ops::divide(&l, &r, span),
            Op::Mod => ops::modulo(&l, &r, span),
            Op::Or | Op::And => unreachable!("handled above"),
        }
    }

    fn eval_function_call(&mut self, name: &str, args: &crate::ast::CallArgs, span: Span) -> Result<Value> {
        let evaluated_args = self.eval_call_args(args)?;
        self.call_named_function(name, evaluated_args, span)
    }

    /// Resolve `name` to a user-defined function, a built-in, or (failing
    /// both) a plain CSS function call, and invoke it with `args` already
    /// evaluated. Shared by ordinary function-call expressions and
    /// `meta.call()`'s dynamic dispatch.
    pub(crate) fn call_named_function(&mut self, name: &str, args: callable::EvaluatedArgs, span: Span) -> Result<Value> {
        if let Some(function) = self.env.get_function(name) {
            let body = function.body.clone();
            let owned_name = name.to_string();
            return self.call_with_args(&function, args, span, "function", owned_name.clone(), move |evaluator| {
                match evaluator.eval_statements(&body, None, NodeId::ROOT, NodeId::ROOT)? {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Err(SassError::runtime(format!("Function finished without @return: `{owned_name}`."), span)),
                }
            });
        }
        if let Some(native) = self.custom_functions.get(name).cloned() {
            return native(&args.positional, span);
        }
        if let Some(result) = builtins::call_builtin(self, name, &args, span)? {
            return Ok(result);
        }
        // Not a known function: render as a plain CSS function call.
        Ok(Value::String(SassString::unquoted(format!("{name}({})", render_plain_call(&args)))))
    }

    /// `variable-exists()`: does a variable by this name resolve in the
    /// current scope chain?
    pub(crate) fn has_variable(&self, name: &str) -> bool {
        self.env.get_variable(name).is_some()
    }

    /// `function-exists()`: is there a user-defined function (built-ins
    /// aren't enumerable, so this only covers user code) by this name?
    pub(crate) fn has_function(&self, name: &str) -> bool {
        self.env.get_function(name).is_some() || self.custom_functions.contains_key(name)
    }

    /// `mixin-exists()`.
    pub(crate) fn has_mixin(&self, name: &str) -> bool {
        self.env.get_mixin(name).is_some()
    }
}

/// The product of evaluating a stylesheet: the resolved CSS tree and every
/// `@warn`/`@debug` event raised along the way.
#[derive(Debug)]
pub struct EvalOutput {
    /// The resolved, extend-applied CSS tree.
    pub tree: CssTree,
    /// Warnings and debug messages accumulated during evaluation.
    pub logger: Logger,
}

/// Reject a declaration value CSS has no way to represent: `NaN` and the
/// infinities, which the arithmetic in `value/ops.rs` can produce (`0 / 0`,
/// a unitless number divided to overflow) but which no browser accepts.
fn check_valid_css_value(value: &Value, span: Span) -> Result<()> {
    if let Value::Number(n) = value {
        if !n.value.is_finite() {
            return Err(SassError::invalid_css(value.inspect(), span));
        }
    }
    Ok(())
}

/// Merge a nested `@media` query with its enclosing one by `and`-conjunction
/// (spec §4.6.3). `all` is the identity query on either side. Returns `None`
/// when the merge produces an empty query set, which silently drops the
/// nested block rather than emitting it unconditionally.
fn merge_media_queries(enclosing: &str, inner: &str) -> Option<String> {
    let enclosing = enclosing.trim();
    let inner = inner.trim();
    if inner.is_empty() {
        return if enclosing.is_empty() { None } else { Some(enclosing.to_string()) };
    }
    if enclosing.is_empty() || enclosing.eq_ignore_ascii_case("all") {
        return Some(inner.to_string());
    }
    if inner.eq_ignore_ascii_case("all") {
        return Some(enclosing.to_string());
    }
    Some(format!("{enclosing} and {inner}"))
}

/// A parsed `@at-root` clause: which node kinds to keep (`With`) or hoist
/// past (`Without`). `"all"` in either list matches every kind.
enum AtRootQuery {
    With(Vec<String>),
    Without(Vec<String>),
}

impl Default for AtRootQuery {
    /// Bare `@at-root { ... }` hoists past the nearest style rule only,
    /// leaving `@media`/`@supports`/other at-rule context untouched.
    fn default() -> Self {
        Self::Without(vec!["rule".to_string()])
    }
}

impl AtRootQuery {
    fn excludes(&self, kind_name: &str) -> bool {
        let matches_any = |names: &[String]| names.iter().any(|n| n == "all" || n.eq_ignore_ascii_case(kind_name));
        match self {
            Self::Without(names) => matches_any(names),
            Self::With(names) => !matches_any(names),
        }
    }
}

/// The keyword an `@at-root` query matches this node kind against
/// (`"rule"`, `"media"`, or the at-rule's own name), or `None` for nodes
/// `@at-root` never hoists past (the root itself, declarations, comments).
fn at_root_kind_name(kind: &CssNodeKind) -> Option<&str> {
    match kind {
        CssNodeKind::StyleRule(_) => Some("rule"),
        CssNodeKind::Media(_) => Some("media"),
        CssNodeKind::AtRule { name, .. } => Some(name.as_str()),
        CssNodeKind::Root | CssNodeKind::Declaration(_) | CssNodeKind::Comment(_) => None,
    }
}

fn render_plain_call(args: &callable::EvaluatedArgs) -> String {
    let mut parts: Vec<String> = args.positional.iter().map(Value::to_css_string).collect();
    for (name, value) in &args.named {
        parts.push(format!("${name}: {}", value.to_css_string()));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::Evaluator;
    use crate::emitter::{emit, EmitterOptions};
    use crate::importer::ImporterChain;
    use crate::parser::scss;
    use crate::span::SourceRegistry;

    fn compile(source: &str) -> String {
        let mut registry = SourceRegistry::new();
        let id = registry.add_file("input.scss", source.to_string());
        let stylesheet = scss::parse(source, id).unwrap();
        let importer = ImporterChain::new();
        let output = Evaluator::new(&importer, &mut registry, id).run(&stylesheet).unwrap();
        emit(&output.tree, EmitterOptions::default())
    }

    #[test]
    fn test_simple_declaration() {
        assert_eq!(compile(".a { color: red; }"), ".a {\n  color: red;\n}\n");
    }

    #[test]
    fn test_nested_rule_flattens_to_sibling() {
        let css = compile(".a { .b { color: blue; } }");
        assert!(css.contains(".a .b {"));
    }

    #[test]
    fn test_variable_and_arithmetic() {
        let css = compile("$x: 10px; .a { width: $x * 2; }");
        assert!(css.contains("width: 20px"));
    }

    #[test]
    fn test_if_else_branch() {
        let css = compile("$ok: false; .a { @if $ok { color: red; } @else { color: blue; } }");
        assert!(css.contains("color: blue"));
    }

    #[test]
    fn test_each_over_list() {
        let css = compile("@each $n in 1, 2, 3 { .item-#{$n} { width: $n; } }");
        assert!(css.contains(".item-1"));
        assert!(css.contains(".item-3"));
    }

    #[test]
    fn test_for_loop_inclusive() {
        let css = compile("@for $i from 1 through 3 { .c-#{$i} { z-index: $i; } }");
        assert!(css.contains(".c-3"));
        assert!(!css.contains(".c-4"));
    }

    #[test]
    fn test_mixin_with_content() {
        let css = compile("@mixin wrap { .inner { @content; } } .outer { @include wrap { color: green; } }");
        assert!(css.contains(".inner {"));
        assert!(css.contains("color: green"));
    }

    #[test]
    fn test_function_return() {
        let css = compile("@function double($n) { @return $n * 2; } .a { width: double(5px); }");
        assert!(css.contains("width: 10px"));
    }

    #[test]
    fn test_important_flag_propagates() {
        let css = compile(".a { color: red !important; }");
        assert!(css.contains("!important"));
    }

    #[test]
    fn test_builtin_function_call() {
        let css = compile(".a { width: percentage(0.5); }");
        assert!(css.contains("width: 50%"));
    }

    #[test]
    fn test_extend_rewrites_selector() {
        let css = compile(".base { color: red; } .child { @extend .base; }");
        assert!(css.contains(".base, .child"));
    }

    #[test]
    fn test_while_loop() {
        let css = compile("$i: 0; .a { @while $i < 3 { width: $i; $i: $i + 1; } }");
        assert!(css.contains("width: 2"));
    }

    #[test]
    fn test_missing_argument_errors() {
        let mut registry = SourceRegistry::new();
        let source = "@function add($a, $b) { @return $a + $b; } .a { width: add(1px); }";
        let id = registry.add_file("input.scss", source.to_string());
        let stylesheet = scss::parse(source, id).unwrap();
        let importer = ImporterChain::new();
        assert!(Evaluator::new(&importer, &mut registry, id).run(&stylesheet).is_err());
    }

    #[test]
    fn test_rest_args_forward_to_arglist() {
        let css = compile("@function first($items...) { @return nth($items, 1); } .a { width: first(1px, 2px, 3px); }");
        assert!(css.contains("width: 1px"));
    }

    #[test]
    fn test_named_arg_binding() {
        let css = compile("@mixin box($w, $h) { width: $w; height: $h; } .a { @include box($h: 2px, $w: 1px); }");
        assert!(css.contains("width: 1px"));
        assert!(css.contains("height: 2px"));
    }

    #[test]
    fn test_import_resolves_through_map_importer() {
        let mut registry = SourceRegistry::new();
        let source = "@import \"colors\"; .a { color: $brand; }";
        let id = registry.add_file("input.scss", source.to_string());
        let stylesheet = scss::parse(source, id).unwrap();
        let mut importer = ImporterChain::new();
        let mut files = crate::importer::MapImporter::new();
        files.add("_colors.scss", "$brand: teal;");
        importer.push(Box::new(files));
        let output = Evaluator::new(&importer, &mut registry, id).run(&stylesheet).unwrap();
        let css = emit(&output.tree, EmitterOptions::default());
        assert!(css.contains("color: teal"));
    }

    #[test]
    fn test_plain_import_passes_through() {
        let css = compile("@import \"theme.css\";");
        assert!(css.contains("@import"));
        assert!(css.contains("theme.css"));
    }

    #[test]
    fn test_string_builtins() {
        let css = compile(".a { content: to-upper-case(hello); }");
        assert!(css.contains("HELLO"));
    }

    #[test]
    fn test_list_builtins() {
        let css = compile(".a { width: length(1px 2px 3px); }");
        assert!(css.contains("width: 3"));
    }

    #[test]
    fn test_map_builtins() {
        let css = compile("$m: (a: 1, b: 2); .a { width: map-get($m, b); }");
        assert!(css.contains("width: 2"));
    }

    #[test]
    fn test_math_builtins() {
        let css = compile(".a { width: max(1px, 3px, 2px); }");
        assert!(css.contains("width: 3px"));
    }

    #[test]
    fn test_color_builtins() {
        let css = compile(".a { color: mix(red, blue, 50%); }");
        assert!(css.contains("color:"));
    }

    #[test]
    fn test_meta_variable_exists() {
        let css = compile("$x: 1; .a { width: if(variable-exists(x), 1px, 2px); }");
        assert!(css.contains("width: 1px"));
    }

    #[test]
    fn test_selector_nest_builtin() {
        let css = compile(".a { content: quote(selector-nest(\".a\", \".b\")); }");
        assert!(css.contains(".a .b"));
    }

    #[test]
    fn test_nested_media_queries_merge_with_and() {
        let css = compile("@media screen { @media (min-width: 10px) { .a { width: 1px; } } }");
        assert!(css.contains("@media screen and (min-width: 10px)"));
    }

    #[test]
    fn test_media_all_is_identity() {
        let css = compile("@media all { @media print { .a { width: 1px; } } }");
        assert!(css.contains("@media print"));
        assert!(!css.contains("all and"));
    }

    #[test]
    fn test_non_finite_number_rejected_as_invalid_css() {
        let mut registry = SourceRegistry::new();
        let source = ".a { width: to-number-or-nan(bogus); }";
        let id = registry.add_file("input.scss", source.to_string());
        let stylesheet = scss::parse(source, id).unwrap();
        let importer = ImporterChain::new();
        let functions: std::collections::HashMap<String, super::callable::NativeFunction> = [(
            "to-number-or-nan".to_string(),
            std::rc::Rc::new(|_: &[super::Value], _: super::Span| {
                Ok(super::Value::Number(crate::value::SassNumber::unitless(f64::NAN)))
            }) as super::callable::NativeFunction,
        )]
        .into_iter()
        .collect();
        let err = Evaluator::new(&importer, &mut registry, id)
            .with_functions(std::rc::Rc::new(functions))
            .run(&stylesheet)
            .unwrap_err();
        assert!(matches!(err, super::SassError::InvalidCss { .. }));
    }

    #[test]
    fn test_at_root_default_query_hoists_past_rule_not_media() {
        let css = compile("@media screen { .card { @at-root { .banner { color: red; } } } }");
        assert!(css.contains("@media screen"));
        assert!(css.contains(".banner {"));
        assert!(!css.contains(".card .banner"));
    }

    #[test]
    fn test_at_root_with_media_keeps_media_context() {
        let css = compile("@media screen { .card { @at-root (with: media) { .banner { color: red; } } } }");
        assert!(css.contains("@media screen"));
        assert!(css.contains(".banner {"));
    }

    #[test]
    fn test_extend_complex_selector_rejected() {
        let mut registry = SourceRegistry::new();
        let source = ".a .b { color: red; } .c { @extend .a .b; }";
        let id = registry.add_file("input.scss", source.to_string());
        let stylesheet = scss::parse(source, id).unwrap();
        let importer = ImporterChain::new();
        let err = Evaluator::new(&importer, &mut registry, id).run(&stylesheet).unwrap_err();
        match err {
            super::SassError::Runtime { message, .. } => assert!(message.contains("complex selectors")),
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }
}
