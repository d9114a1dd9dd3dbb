//! `sass:list` built-ins (spec §4.9.3).

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{ops, ListSeparator, SassList, SassNumber, SassString, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "length" => Value::Number(SassNumber::unitless(list_value(args, 0, "list", span)?.as_list_items().len() as f64)),
        "nth" => nth(args, span)?,
        "list-separator" => Value::String(SassString::unquoted(separator_name(list_value(args, 0, "list", span)?))),
        "is-bracketed" => Value::Boolean(matches!(list_value(args, 0, "list", span)?, Value::List(l) if l.bracketed)),
        "join" => join(args, span)?,
        "append" => append(args, span)?,
        "index" => index(args, span)?,
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn list_value<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a Value> {
    arg(args, index, name).ok_or_else(|| SassError::runtime(format!("Missing argument ${name}."), span))
}

fn separator_name(value: &Value) -> &'static str {
    match value {
        Value::List(l) => match l.separator {
            ListSeparator::Comma => "comma",
            ListSeparator::Space => "space",
            ListSeparator::Undecided => "space",
        },
        _ => "space",
    }
}

fn resolve_separator(value: &Value) -> ListSeparator {
    match value {
        Value::List(l) => l.separator,
        _ => ListSeparator::Space,
    }
}

fn nth(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let list = list_value(args, 0, "list", span)?;
    let items = list.as_list_items();
    let Some(Value::Number(n)) = arg(args, 1, "n") else {
        return Err(SassError::runtime("Missing argument $n.", span));
    };
    let index = n.value.round() as i64;
    if index == 0 || items.is_empty() {
        return Err(SassError::runtime(format!("$n: Invalid index {index} for a list with {} elements.", items.len()), span));
    }
    let zero_based = if index > 0 { index - 1 } else { items.len() as i64 + index };
    items
        .get(zero_based as usize)
        .cloned()
        .ok_or_else(|| SassError::runtime(format!("$n: Invalid index {index} for a list with {} elements.", items.len()), span))
}

fn join(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let a = list_value(args, 0, "list1", span)?.clone();
    let b = list_value(args, 1, "list2", span)?.clone();
    let separator = match arg(args, 2, "separator") {
        Some(Value::String(s)) if &*s.text == "comma" => ListSeparator::Comma,
        Some(Value::String(s)) if &*s.text == "space" => ListSeparator::Space,
        _ if !a.as_list_items().is_empty() => resolve_separator(&a),
        _ => resolve_separator(&b),
    };
    let bracketed = matches!(arg(args, 3, "bracketed"), Some(v) if v.is_truthy()) || matches!(&a, Value::List(l) if l.bracketed);
    let joined = ops::join(a, b, separator);
    Ok(match joined {
        Value::List(mut l) => {
            l.bracketed = bracketed;
            Value::List(l)
        }
        other => other,
    })
}

fn append(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let list = list_value(args, 0, "list", span)?;
    let value = list_value(args, 1, "val", span)?.clone();
    let separator = match arg(args, 2, "separator") {
        Some(Value::String(s)) if &*s.text == "comma" => ListSeparator::Comma,
        Some(Value::String(s)) if &*s.text == "space" => ListSeparator::Space,
        _ => resolve_separator(list),
    };
    let bracketed = matches!(list, Value::List(l) if l.bracketed);
    let mut items = list.as_list_items();
    items.push(value);
    Ok(Value::List(SassList { items, separator, bracketed }))
}

fn index(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let list = list_value(args, 0, "list", span)?;
    let value = list_value(args, 1, "value", span)?;
    let items = list.as_list_items();
    match items.iter().position(|item| ops::values_equal(item, value)) {
        Some(pos) => Ok(Value::Number(SassNumber::unitless((pos + 1) as f64))),
        None => Ok(Value::Null),
    }
}
