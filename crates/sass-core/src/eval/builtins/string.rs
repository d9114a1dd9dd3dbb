//! `sass:string` built-ins (spec §4.9.2).

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{SassNumber, SassString, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "str-length" => Value::Number(SassNumber::unitless(text(args, 0, "string", span)?.chars().count() as f64)),
        "to-upper-case" => Value::String(SassString::unquoted(text(args, 0, "string", span)?.to_uppercase())),
        "to-lower-case" => Value::String(SassString::unquoted(text(args, 0, "string", span)?.to_lowercase())),
        "quote" => Value::String(SassString::quoted(text(args, 0, "string", span)?.to_string())),
        "unquote" => Value::String(SassString::unquoted(text(args, 0, "string", span)?.to_string())),
        "str-slice" => Value::String(SassString::quoted(str_slice(args, span)?)),
        "str-index" => str_index(args, span)?,
        "str-insert" => Value::String(SassString::quoted(str_insert(args, span)?)),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn text<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a str> {
    match arg(args, index, name) {
        Some(Value::String(s)) => Ok(&s.text),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a string.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn integer(args: &EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<i64> {
    match arg(args, index, name) {
        Some(Value::Number(n)) => Ok(n.value.round() as i64),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a number.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

/// Resolve a 1-based, possibly-negative Sass string index to a 0-based
/// char offset clamped to `[0, len]`.
fn resolve_index(index: i64, len: usize) -> usize {
    if index > 0 {
        ((index - 1) as usize).min(len)
    } else if index < 0 {
        len.saturating_sub((-index) as usize)
    } else {
        0
    }
}

fn str_slice(args: &EvaluatedArgs, span: Span) -> Result<String> {
    let s = text(args, 0, "string", span)?;
    let chars: Vec<char> = s.chars().collect();
    let start = integer(args, 1, "start-at", span)?;
    let end = if args.positional.len() > 2 || args.named.iter().any(|(n, _)| n == "end-at") {
        integer(args, 2, "end-at", span)?
    } else {
        -1
    };
    let start_idx = resolve_index(start, chars.len());
    let end_idx = if end < 0 { chars.len().saturating_sub((-end) as usize - 1).min(chars.len()) } else { (end as usize).min(chars.len()) };
    if start_idx >= chars.len() || start_idx > end_idx {
        return Ok(String::new());
    }
    Ok(chars[start_idx..=end_idx.min(chars.len() - 1)].iter().collect())
}

fn str_index(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let haystack = text(args, 0, "string", span)?;
    let needle = text(args, 1, "substring", span)?;
    match haystack.find(needle) {
        Some(byte_offset) => Ok(Value::Number(SassNumber::unitless((haystack[..byte_offset].chars().count() + 1) as f64))),
        None => Ok(Value::Null),
    }
}

fn str_insert(args: &EvaluatedArgs, span: Span) -> Result<String> {
    let s = text(args, 0, "string", span)?;
    let insert = text(args, 1, "insert", span)?;
    let index = integer(args, 2, "index", span)?;
    let mut chars: Vec<char> = s.chars().collect();
    let at = resolve_index(index, chars.len());
    let _ = chars.splice(at..at, insert.chars());
    Ok(chars.into_iter().collect())
}
