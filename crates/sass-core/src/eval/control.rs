//! `@if`/`@each`/`@for`/`@while` control flow (spec §4.6.3).

use crate::ast::{Expression, Statement};
use crate::css_tree::NodeId;
use crate::error::{Result, SassError};
use crate::selector::SelectorList;
use crate::value::{SassNumber, Value};

use super::{Evaluator, Flow};

impl Evaluator<'_> {
    pub(super) fn eval_if(
        &mut self,
        branches: &[(Expression, Vec<Statement>)],
        else_branch: Option<&[Statement]>,
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        for (condition, body) in branches {
            if self.eval_expression(condition)?.is_truthy() {
                return self.with_new_scope(|evaluator| evaluator.eval_statements(body, selector_ctx, decl_parent, container_parent));
            }
        }
        if let Some(body) = else_branch {
            return self.with_new_scope(|evaluator| evaluator.eval_statements(body, selector_ctx, decl_parent, container_parent));
        }
        Ok(Flow::Normal)
    }

    pub(super) fn eval_each(
        &mut self,
        variables: &[String],
        list_expr: &Expression,
        body: &[Statement],
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        let list_value = self.eval_expression(list_expr)?;
        let items = list_value.as_list_items();
        for item in items {
            let bindings = destructure(variables, &item);
            let flow = self.with_new_scope(|evaluator| {
                for (name, value) in &bindings {
                    evaluator.env.set_local(name.clone(), value.clone());
                }
                evaluator.eval_statements(body, selector_ctx, decl_parent, container_parent)
            })?;
            if let Flow::Return(_) = flow {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    pub(super) fn eval_for(
        &mut self,
        variable: &str,
        from_expr: &Expression,
        to_expr: &Expression,
        inclusive: bool,
        body: &[Statement],
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        let span = from_expr.span().merge(to_expr.span());
        let from = expect_integer(&self.eval_expression(from_expr)?, span)?;
        let to = expect_integer(&self.eval_expression(to_expr)?, span)?;
        let (start, end, step): (i64, i64, i64) = if from <= to { (from, to, 1) } else { (from, to, -1) };
        let mut i = start;
        loop {
            let done = if step > 0 { i > end } else { i < end };
            let at_exclusive_end = !inclusive && i == end;
            if done || at_exclusive_end {
                break;
            }
            let flow = self.with_new_scope(|evaluator| {
                evaluator.env.set_local(variable.to_string(), Value::Number(SassNumber::unitless(i as f64)));
                evaluator.eval_statements(body, selector_ctx, decl_parent, container_parent)
            })?;
            if let Flow::Return(_) = flow {
                return Ok(flow);
            }
            i += step;
        }
        Ok(Flow::Normal)
    }

    pub(super) fn eval_while(
        &mut self,
        condition: &Expression,
        body: &[Statement],
        selector_ctx: Option<&SelectorList>,
        decl_parent: NodeId,
        container_parent: NodeId,
    ) -> Result<Flow> {
        while self.eval_expression(condition)?.is_truthy() {
            let flow = self.with_new_scope(|evaluator| evaluator.eval_statements(body, selector_ctx, decl_parent, container_parent))?;
            if let Flow::Return(_) = flow {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn with_new_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.env.push_new_scope();
        let result = f(self);
        self.env.pop_scope(saved);
        result
    }
}

/// Bind `@each`'s loop variables to one list item, destructuring a
/// space-separated sub-list across multiple variables (`@each $a, $b in
/// $pairs`), the way Sass does when the list's elements are themselves lists.
fn destructure(variables: &[String], item: &Value) -> Vec<(String, Value)> {
    if variables.len() <= 1 {
        return vec![(variables[0].clone(), item.clone())];
    }
    let parts = item.as_list_items();
    variables
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), parts.get(i).cloned().unwrap_or(Value::Null)))
        .collect()
}

fn expect_integer(value: &Value, span: crate::span::Span) -> Result<i64> {
    match value {
        Value::Number(n) => Ok(n.value.round() as i64),
        other => Err(SassError::runtime(format!("{} is not an integer.", other.inspect()), span)),
    }
}
