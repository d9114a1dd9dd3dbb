//! Call-argument evaluation and parameter binding shared by `@include`,
//! function calls, and `@content` (spec §4.6.4).

use std::rc::Rc;

use crate::ast::{CallArgs, Params};
use crate::env::{CallFrame, Callable};
use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{SassList, Value};

use super::Evaluator;

/// A custom function registered through [`crate::Options::functions`]: a
/// native Rust implementation consulted after user-defined `@function`s
/// but before the built-in library (spec §6 "custom functions").
pub type NativeFunction = Rc<dyn Fn(&[Value], Span) -> Result<Value>>;

/// Arguments evaluated down to plain values, ready to bind against a
/// [`Params`] list.
pub struct EvaluatedArgs {
    /// Positional argument values, in call order.
    pub positional: Vec<Value>,
    /// Named (`$name: value`) argument values.
    pub named: Vec<(String, Value)>,
    /// The spread `...` value, if one was given.
    pub rest: Option<Value>,
}

impl Evaluator<'_> {
    /// Evaluate every expression in a call-argument list.
    pub fn eval_call_args(&mut self, args: &CallArgs) -> Result<EvaluatedArgs> {
        let mut positional = Vec::with_capacity(args.positional.len());
        for expr in &args.positional {
            positional.push(self.eval_expression(expr)?);
        }
        let mut named = Vec::with_capacity(args.named.len());
        for (name, expr) in &args.named {
            named.push((name.clone(), self.eval_expression(expr)?));
        }
        let rest = match &args.rest {
            Some(expr) => Some(self.eval_expression(expr)?),
            None => None,
        };
        Ok(EvaluatedArgs { positional, named, rest })
    }

    /// Bind `args` into a fresh child of `callable`'s closure per its
    /// declared parameters, push a call-stack frame, run `body`, then
    /// unwind both the scope and the frame. Every callable (mixin,
    /// function) invocation goes through this single path.
    pub fn call_with_args(
        &mut self,
        callable: &Rc<Callable>,
        args: EvaluatedArgs,
        call_span: Span,
        frame_kind: &'static str,
        frame_name: String,
        body: impl FnOnce(&mut Self) -> Result<Value>,
    ) -> Result<Value> {
        self.env.push_frame(CallFrame { kind: frame_kind, name: frame_name, call_span });
        let saved_scope = self.env.push_closure_scope(&callable.closure);
        let outcome = self.bind_params(&callable.params, args, call_span).and_then(|()| body(self));
        self.env.pop_scope(saved_scope);
        self.env.pop_frame();
        outcome
    }

    fn bind_params(&mut self, params: &Params, args: EvaluatedArgs, span: Span) -> Result<()> {
        let mut named = args.named;
        let mut positional_pool = args.positional;
        if let Some(Value::List(list) | Value::ArgumentList(list, _)) = &args.rest {
            positional_pool.extend(list.items.iter().cloned());
        }
        let mut positional_iter = positional_pool.into_iter();

        for param in &params.params {
            if let Some(value) = positional_iter.next() {
                self.env.set_local(param.name.clone(), value);
                continue;
            }
            if let Some(pos) = named.iter().position(|(n, _)| n == &param.name) {
                let (_, value) = named.remove(pos);
                self.env.set_local(param.name.clone(), value);
                continue;
            }
            if let Some(default) = &param.default {
                let evaluated = self.eval_expression(default)?;
                self.env.set_local(param.name.clone(), evaluated);
                continue;
            }
            return Err(SassError::runtime(format!("Missing argument ${}.", param.name), span));
        }

        let leftover_positional: Vec<Value> = positional_iter.collect();
        if let Some(rest_name) = &params.rest {
            let keywords = named.into_iter().map(|(name, value)| (Rc::from(name.as_str()), value)).collect();
            self.env.set_local(rest_name.clone(), Value::ArgumentList(SassList::space(leftover_positional), keywords));
        } else if !leftover_positional.is_empty() {
            return Err(SassError::runtime(
                format!(
                    "Only {} argument(s) allowed, but {} were passed.",
                    params.params.len(),
                    leftover_positional.len() + params.params.len()
                ),
                span,
            ));
        } else if let Some((name, _)) = named.first() {
            return Err(SassError::runtime(format!("No argument named ${name}."), span));
        }
        Ok(())
    }
}
