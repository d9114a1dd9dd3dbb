//! `sass:map` built-ins (spec §4.9.4).

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{ops, SassList, SassMap, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "map-get" => map_get(args, span)?,
        "map-merge" => map_merge(args, span)?,
        "map-keys" => Value::List(SassList::comma(map(args, 0, "map", span)?.entries.iter().map(|(k, _)| k.clone()).collect())),
        "map-values" => Value::List(SassList::comma(map(args, 0, "map", span)?.entries.iter().map(|(_, v)| v.clone()).collect())),
        "map-has-key" => {
            let key = value_arg(args, 1, "key", span)?;
            Value::Boolean(map(args, 0, "map", span)?.get(key).is_some())
        }
        "map-remove" => map_remove(args, span)?,
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn map<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a SassMap> {
    match arg(args, index, name) {
        Some(Value::Map(m)) => Ok(m),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a map.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn value_arg<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a Value> {
    arg(args, index, name).ok_or_else(|| SassError::runtime(format!("Missing argument ${name}."), span))
}

fn map_get(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let m = map(args, 0, "map", span)?;
    let key = value_arg(args, 1, "key", span)?;
    Ok(m.get(key).cloned().unwrap_or(Value::Null))
}

fn map_merge(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let mut merged = map(args, 0, "map1", span)?.clone();
    let other = map(args, 1, "map2", span)?;
    for (key, value) in &other.entries {
        merged.insert(key.clone(), value.clone());
    }
    Ok(Value::Map(merged))
}

fn map_remove(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let source = map(args, 0, "map", span)?;
    let keys_to_remove: Vec<Value> = if args.positional.len() > 1 {
        args.positional[1..].to_vec()
    } else if let Some(Value::List(l) | Value::ArgumentList(l, _)) = &args.rest {
        l.items.clone()
    } else {
        Vec::new()
    };
    let mut result = SassMap::new();
    for (key, value) in &source.entries {
        if !keys_to_remove.iter().any(|k| ops::values_equal(k, key)) {
            result.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Map(result))
}
