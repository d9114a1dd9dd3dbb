//! `sass:meta` built-ins (spec §4.9.7): introspection and the
//! `call()`/`if()` escape hatches that need the evaluator itself rather
//! than just plain values.

use std::rc::Rc;

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{FunctionRef, SassString, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;
use super::super::Evaluator;

pub(super) fn call(evaluator: &mut Evaluator<'_>, name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "type-of" => Value::String(SassString::unquoted(value_arg(args, 0, "value", span)?.type_name())),
        "inspect" => Value::String(SassString::unquoted(value_arg(args, 0, "value", span)?.inspect())),
        "if" => if_function(args, span)?,
        "get-function" => get_function(args, span)?,
        "call" => return call_dynamic(evaluator, args, span).map(Some),
        "feature-exists" => Value::Boolean(false),
        "variable-exists" => Value::Boolean(matches!(arg(args, 0, "name"), Some(Value::String(n)) if evaluator.has_variable(&n.text))),
        "function-exists" => Value::Boolean(matches!(arg(args, 0, "name"), Some(Value::String(n)) if evaluator.has_function(&n.text))),
        "mixin-exists" => Value::Boolean(matches!(arg(args, 0, "name"), Some(Value::String(n)) if evaluator.has_mixin(&n.text))),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn value_arg<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a Value> {
    arg(args, index, name).ok_or_else(|| SassError::runtime(format!("Missing argument ${name}."), span))
}

fn if_function(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let condition = value_arg(args, 0, "condition", span)?;
    if condition.is_truthy() {
        value_arg(args, 1, "if-true", span).cloned()
    } else {
        value_arg(args, 2, "if-false", span).cloned()
    }
}

fn get_function(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    match arg(args, 0, "name") {
        Some(Value::String(s)) => Ok(Value::FunctionRef(FunctionRef { name: Rc::from(s.text.as_ref()) })),
        Some(other) => Err(SassError::runtime(format!("$name: {} is not a string.", other.inspect()), span)),
        None => Err(SassError::runtime("Missing argument $name.", span)),
    }
}

fn call_dynamic(evaluator: &mut Evaluator<'_>, args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let Some(Value::FunctionRef(function_ref)) = arg(args, 0, "function") else {
        return Err(SassError::runtime("$function: not a function reference.", span));
    };
    let name = function_ref.name.clone();
    let rest = EvaluatedArgs {
        positional: args.positional.get(1..).map(<[Value]>::to_vec).unwrap_or_default(),
        named: args.named.clone(),
        rest: args.rest.clone(),
    };
    evaluator.call_named_function(&name, rest, span)
}
