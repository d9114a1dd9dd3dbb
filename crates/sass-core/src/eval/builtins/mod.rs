//! The built-in function library (spec §4.9). Dispatches by bare name so
//! that both `string.to-upper-case()` and the legacy global
//! `to-upper-case()` spelling resolve to the same implementation, the way
//! the original runtime exposes every built-in under its module name and
//! (for the ones that predate modules) under the global namespace too.

mod color;
mod list;
mod map;
mod math;
mod meta;
mod selector_fns;
mod string;

use crate::error::Result;
use crate::span::Span;
use crate::value::Value;

use super::callable::EvaluatedArgs;
use super::Evaluator;

/// Fetch the `index`-th positional argument, falling back to a named
/// argument called `name`. Built-in signatures are fixed, so this is
/// enough to support both call styles without a full parameter binder.
pub(super) fn arg<'a>(args: &'a EvaluatedArgs, index: usize, name: &str) -> Option<&'a Value> {
    args.positional.get(index).or_else(|| args.named.iter().find(|(n, _)| n == name).map(|(_, v)| v))
}

/// Try every built-in category in turn. Returns `Ok(None)` when `name`
/// isn't a known built-in at all, letting the caller fall back to
/// rendering a plain CSS function call.
pub(super) fn call_builtin(evaluator: &mut Evaluator<'_>, name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    if let Some(value) = math::call(name, args, span)? {
        return Ok(Some(value));
    }
    if let Some(value) = string::call(name, args, span)? {
        return Ok(Some(value));
    }
    if let Some(value) = list::call(name, args, span)? {
        return Ok(Some(value));
    }
    if let Some(value) = map::call(name, args, span)? {
        return Ok(Some(value));
    }
    if let Some(value) = color::call(name, args, span)? {
        return Ok(Some(value));
    }
    if let Some(value) = selector_fns::call(name, args, span)? {
        return Ok(Some(value));
    }
    meta::call(evaluator, name, args, span)
}
