//! Arithmetic, comparison, and equality operators over [`Value`] (spec §4.7).

use crate::error::{Result, SassError};
use crate::span::Span;

use super::number::SassNumber;
use super::{ListSeparator, SassList, SassString, Value};

/// Sass `==` / `!=`: structural equality with numeric unit coercion
/// (`1px == 1px` is true, `1in == 96px` is true, `1px == 1` is false
/// because a unitless number and a unit-bearing one never compare equal
/// under `==`, only under context that permits unitless autoconversion).
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Color(x), Value::Color(y)) => x == y,
        (Value::String(x), Value::String(y)) => x.text == y.text,
        (Value::List(x), Value::List(y)) => {
            x.bracketed == y.bracketed
                && x.items.len() == y.items.len()
                && x.items.iter().zip(&y.items).all(|(p, q)| values_equal(p, q))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.entries.len() == y.entries.len()
                && x.entries.iter().all(|(k, v)| y.get(k).is_some_and(|v2| values_equal(v, v2)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &SassNumber, b: &SassNumber) -> bool {
    if !a.is_comparable_to(b) {
        return false;
    }
    (a.value - a.value_in_units_of(b)).abs() < 1e-11
}

/// Sass `+`: numeric addition with unit coercion, string concatenation,
/// or list/color addition, per spec §4.7's operator table.
pub fn add(a: &Value, b: &Value, span: Span) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numeric_op(x, y, span, |l, r| l + r),
        (Value::Color(x), Value::Color(y)) => Ok(Value::Color(crate::value::SassColor::rgba(
            x.r.saturating_add(y.r),
            x.g.saturating_add(y.g),
            x.b.saturating_add(y.b),
            x.a,
        ))),
        (Value::String(x), _) => Ok(concat_string(x.quoted, &x.text, &b.to_css_string())),
        (_, Value::String(y)) if y.quoted => Ok(concat_string(true, &a.to_css_string(), &y.text)),
        _ => Ok(concat_string(false, &a.to_css_string(), &b.to_css_string())),
    }
}

fn concat_string(quoted: bool, left: &str, right: &str) -> Value {
    Value::String(SassString {
        text: format!("{left}{right}").into(),
        quoted,
    })
}

/// Sass binary `-`.
pub fn subtract(a: &Value, b: &Value, span: Span) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numeric_op(x, y, span, |l, r| l - r),
        _ => Ok(Value::String(SassString {
            text: format!("{}-{}", a.to_css_string(), b.to_css_string()).into(),
            quoted: false,
        })),
    }
}

/// Sass `*`: numeric multiplication with unit multiplication (units
/// combine rather than requiring a match, unlike `+`/`-`).
pub fn multiply(a: &Value, b: &Value, span: Span) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let mut numer = x.numer_units.clone();
            numer.extend(y.numer_units.iter().cloned());
            let mut denom = x.denom_units.clone();
            denom.extend(y.denom_units.iter().cloned());
            let (numer, denom) = cancel_units(numer, denom);
            Ok(Value::Number(SassNumber {
                value: x.value * y.value,
                numer_units: numer,
                denom_units: denom,
            }))
        }
        _ => Err(SassError::runtime(
            format!("Undefined operation \"{} * {}\".", a.inspect(), b.inspect()),
            span,
        )),
    }
}

/// Sass `/`: numeric division. (Slash-as-separator vs slash-as-division
/// disambiguation happens in the evaluator, per spec §4.6; by the time a
/// value reaches here the caller has already decided this is division.)
pub fn divide(a: &Value, b: &Value, span: Span) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if y.value == 0.0 {
                return Err(SassError::runtime("Division by zero.", span));
            }
            let mut numer = x.numer_units.clone();
            numer.extend(y.denom_units.iter().cloned());
            let mut denom = x.denom_units.clone();
            denom.extend(y.numer_units.iter().cloned());
            let (numer, denom) = cancel_units(numer, denom);
            Ok(Value::Number(SassNumber {
                value: x.value / y.value,
                numer_units: numer,
                denom_units: denom,
            }))
        }
        _ => Err(SassError::runtime(
            format!("Undefined operation \"{} / {}\".", a.inspect(), b.inspect()),
            span,
        )),
    }
}

/// Sass `%`.
pub fn modulo(a: &Value, b: &Value, span: Span) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numeric_op(x, y, span, |l, r| l.rem_euclid(r)),
        _ => Err(SassError::runtime(
            format!("Undefined operation \"{} % {}\".", a.inspect(), b.inspect()),
            span,
        )),
    }
}

/// Unary `-`.
pub fn negate(value: &Value, span: Span) -> Result<Value> {
    match value {
        Value::Number(n) => Ok(Value::Number(SassNumber {
            value: -n.value,
            numer_units: n.numer_units.clone(),
            denom_units: n.denom_units.clone(),
        })),
        _ => Err(SassError::runtime(format!("Undefined operation \"-{}\".", value.inspect()), span)),
    }
}

/// Ordering comparison (`<`, `<=`, `>`, `>=`); both sides must be
/// comparable numbers.
pub fn compare(a: &Value, b: &Value, span: Span) -> Result<std::cmp::Ordering> {
    let (Value::Number(x), Value::Number(y)) = (a, b) else {
        return Err(SassError::runtime(
            format!("Undefined operation \"{} < {}\".", a.inspect(), b.inspect()),
            span,
        ));
    };
    if !x.is_comparable_to(y) {
        return Err(SassError::runtime(
            format!("Incompatible units {} and {}.", x.unit_string(), y.unit_string()),
            span,
        ));
    }
    let rhs = x.value_in_units_of(y);
    x.value
        .partial_cmp(&rhs)
        .ok_or_else(|| SassError::runtime("Invalid comparison (NaN).", span))
}

fn numeric_op(x: &SassNumber, y: &SassNumber, span: Span, f: impl Fn(f64, f64) -> f64) -> Result<Value> {
    if !x.is_comparable_to(y) {
        return Err(SassError::runtime(
            format!("Incompatible units {} and {}.", x.unit_string(), y.unit_string()),
            span,
        ));
    }
    let rhs = x.value_in_units_of(y);
    let units = if x.is_unitless() { y.clone() } else { x.clone() };
    Ok(Value::Number(SassNumber {
        value: f(x.value, rhs),
        numer_units: units.numer_units,
        denom_units: units.denom_units,
    }))
}

/// Cancel one matching numerator/denominator unit pair (so `px * s / s`
/// simplifies back to `px`), mirroring the original's unit-simplification
/// pass.
fn cancel_units(mut numer: Vec<String>, mut denom: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut i = 0;
    while i < numer.len() {
        if let Some(pos) = denom.iter().position(|d| d.eq_ignore_ascii_case(&numer[i])) {
            let _ = denom.remove(pos);
            let _ = numer.remove(i);
        } else {
            i += 1;
        }
    }
    (numer, denom)
}

/// Boolean `not`.
#[must_use]
pub fn not(value: &Value) -> Value {
    Value::Boolean(!value.is_truthy())
}

/// Join two values into a list (used by `,`/` ` list-literal construction
/// as well as `list.append`).
#[must_use]
pub fn join(a: Value, b: Value, separator: ListSeparator) -> Value {
    let mut items = a.as_list_items();
    items.extend(b.as_list_items());
    Value::List(SassList {
        items,
        separator,
        bracketed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::{add, divide, multiply, values_equal};
    use crate::span::{SourceId, Span};
    use crate::value::{SassNumber, Value};

    fn span() -> Span {
        Span::point(SourceId(0), 0)
    }

    #[test]
    fn test_add_same_units() {
        let a = Value::Number(SassNumber::with_unit(1.0, "px"));
        let b = Value::Number(SassNumber::with_unit(2.0, "px"));
        let Value::Number(result) = add(&a, &b, span()).unwrap() else {
            panic!("expected number")
        };
        assert_eq!(result.value, 3.0);
        assert_eq!(result.unit_string(), "px");
    }

    #[test]
    fn test_add_converts_compatible_units() {
        let a = Value::Number(SassNumber::with_unit(1.0, "in"));
        let b = Value::Number(SassNumber::with_unit(96.0, "px"));
        let Value::Number(result) = add(&a, &b, span()).unwrap() else {
            panic!("expected number")
        };
        assert!((result.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiply_combines_units() {
        let a = Value::Number(SassNumber::with_unit(2.0, "px"));
        let b = Value::Number(SassNumber::with_unit(3.0, "px"));
        let Value::Number(result) = multiply(&a, &b, span()).unwrap() else {
            panic!("expected number")
        };
        assert_eq!(result.unit_string(), "px*px");
    }

    #[test]
    fn test_divide_by_zero_errors() {
        let a = Value::Number(SassNumber::unitless(1.0));
        let b = Value::Number(SassNumber::unitless(0.0));
        assert!(divide(&a, &b, span()).is_err());
    }

    #[test]
    fn test_divide_cancels_shared_unit() {
        let a = Value::Number(SassNumber::with_unit(10.0, "px"));
        let b = Value::Number(SassNumber::with_unit(2.0, "px"));
        let Value::Number(result) = divide(&a, &b, span()).unwrap() else {
            panic!("expected number")
        };
        assert!(result.is_unitless());
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn test_values_equal_cross_unit() {
        let a = Value::Number(SassNumber::with_unit(1.0, "in"));
        let b = Value::Number(SassNumber::with_unit(96.0, "px"));
        assert!(values_equal(&a, &b));
    }
}
