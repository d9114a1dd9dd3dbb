//! `sass:math` built-ins (spec §4.9.1).

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{ops, SassNumber, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "abs" => Value::Number(map_number(number(args, 0, "number", span)?, f64::abs)),
        "ceil" => Value::Number(map_number(number(args, 0, "number", span)?, f64::ceil)),
        "floor" => Value::Number(map_number(number(args, 0, "number", span)?, f64::floor)),
        "round" => Value::Number(map_number(number(args, 0, "number", span)?, f64::round)),
        "min" => return Ok(Some(extremum(args, span, std::cmp::Ordering::Less)?)),
        "max" => return Ok(Some(extremum(args, span, std::cmp::Ordering::Greater)?)),
        "percentage" => {
            let n = number(args, 0, "number", span)?;
            Value::Number(SassNumber::with_unit(n.value * 100.0, "%"))
        }
        "comparable" => {
            let a = number(args, 0, "number1", span)?;
            let b = number(args, 1, "number2", span)?;
            Value::Boolean(a.is_comparable_to(b))
        }
        "unit" => {
            let n = number(args, 0, "number", span)?;
            Value::String(crate::value::SassString::quoted(n.unit_string()))
        }
        "is-unitless" | "unitless" => Value::Boolean(number(args, 0, "number", span)?.is_unitless()),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn number<'a>(args: &'a EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<&'a SassNumber> {
    match arg(args, index, name) {
        Some(Value::Number(n)) => Ok(n),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a number.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn map_number(n: &SassNumber, f: impl Fn(f64) -> f64) -> SassNumber {
    SassNumber {
        value: f(n.value),
        numer_units: n.numer_units.clone(),
        denom_units: n.denom_units.clone(),
    }
}

fn extremum(args: &EvaluatedArgs, span: Span, keep: std::cmp::Ordering) -> Result<Value> {
    let mut values = args.positional.iter();
    let Some(first) = values.next() else {
        return Err(SassError::runtime("At least one argument must be passed.", span));
    };
    let mut best = first.clone();
    for candidate in values {
        if ops::compare(candidate, &best, span)? == keep {
            best = candidate.clone();
        }
    }
    Ok(best)
}
