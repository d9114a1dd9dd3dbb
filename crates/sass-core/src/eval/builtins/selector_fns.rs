//! `sass:selector` built-ins (spec §4.9.6).
//!
//! Sass represents selectors passed to/from these functions as plain
//! strings or comma-separated lists of strings rather than as a special
//! value type; we follow the same convention and reparse the text with
//! [`parse_selector_list`] for every call, the way the `&`-resolution
//! pass already does for style-rule selectors.

use crate::error::{Result, SassError};
use crate::selector::extend::resolve_parent_selectors;
use crate::selector::parser::parse_selector_list;
use crate::selector::{CompoundSelector, SelectorList};
use crate::span::Span;
use crate::value::{SassString, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "selector-nest" => Value::String(SassString::unquoted(nest(args, span)?)),
        "selector-append" => Value::String(SassString::unquoted(append(args, span)?)),
        "selector-unify" => unify(args, span)?,
        "is-superselector" => Value::Boolean(is_superselector(args, span)?),
        "simple-selectors" => simple_selectors(args, span)?,
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn selector_text(args: &EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<String> {
    match arg(args, index, name) {
        Some(Value::String(s)) => Ok(s.text.to_string()),
        Some(other) => Ok(other.to_css_string()),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn parse(args: &EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<SelectorList> {
    Ok(parse_selector_list(&selector_text(args, index, name, span)?))
}

fn nest(args: &EvaluatedArgs, span: Span) -> Result<String> {
    let mut current = parse(args, 0, "selectors", span)?;
    for i in 1..args.positional.len().max(1) {
        if i >= args.positional.len() {
            break;
        }
        let next = parse(args, i, "selectors", span)?;
        current = resolve_parent_selectors(&next, Some(&current));
    }
    Ok(current.to_string())
}

fn append(args: &EvaluatedArgs, span: Span) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    for i in 0..args.positional.len() {
        parts.push(selector_text(args, i, "selectors", span)?);
    }
    Ok(parts.concat())
}

fn unify(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let a = parse(args, 0, "selector1", span)?;
    let b = parse(args, 1, "selector2", span)?;
    let Some(first_a) = a.complexes.first() else { return Ok(Value::Null) };
    let Some(first_b) = b.complexes.first() else { return Ok(Value::Null) };
    let mut merged = CompoundSelector::default();
    for (_, compound) in &first_a.components {
        merged.simple_selectors.extend(compound.simple_selectors.iter().cloned());
    }
    for (_, compound) in &first_b.components {
        for simple in &compound.simple_selectors {
            if !merged.simple_selectors.contains(simple) {
                merged.simple_selectors.push(simple.clone());
            }
        }
    }
    Ok(Value::String(SassString::unquoted(merged.to_string())))
}

fn is_superselector(args: &EvaluatedArgs, span: Span) -> Result<bool> {
    let sup = parse(args, 0, "super", span)?;
    let sub = parse(args, 1, "sub", span)?;
    let Some(sup_complex) = sup.complexes.first() else { return Ok(false) };
    let Some(sub_complex) = sub.complexes.first() else { return Ok(false) };
    Ok(sup_complex.components.iter().all(|(_, sup_compound)| {
        sub_complex.components.iter().any(|(_, sub_compound)| sup_compound.is_subset_of(sub_compound))
    }))
}

fn simple_selectors(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let list = parse(args, 0, "selector", span)?;
    let Some(complex) = list.complexes.first() else {
        return Ok(Value::List(crate::value::SassList::comma(Vec::new())));
    };
    let Some((_, compound)) = complex.components.first() else {
        return Ok(Value::List(crate::value::SassList::comma(Vec::new())));
    };
    let items = compound.simple_selectors.iter().map(|s| Value::String(SassString::unquoted(s.to_string()))).collect();
    Ok(Value::List(crate::value::SassList::comma(items)))
}
