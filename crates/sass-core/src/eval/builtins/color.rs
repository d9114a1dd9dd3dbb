//! `sass:color` built-ins (spec §4.9.5). Channel math itself lives on
//! [`SassColor`]; these wrappers just parse Sass call conventions.

use crate::error::{Result, SassError};
use crate::span::Span;
use crate::value::{SassColor, SassNumber, Value};

use super::arg;
use super::super::callable::EvaluatedArgs;

pub(super) fn call(name: &str, args: &EvaluatedArgs, span: Span) -> Result<Option<Value>> {
    let result = match name {
        "rgb" | "rgba" => rgb(args, span)?,
        "hsl" | "hsla" => hsl(args, span)?,
        "mix" => {
            let a = color(args, 0, "color1", span)?;
            let b = color(args, 1, "color2", span)?;
            let weight = number_or(args, 2, "weight", 50.0) / 100.0;
            Value::Color(a.mix(b, weight))
        }
        "lighten" => Value::Color(color(args, 0, "color", span)?.lighten(number_or(args, 1, "amount", 0.0) / 100.0)),
        "darken" => Value::Color(color(args, 0, "color", span)?.darken(number_or(args, 1, "amount", 0.0) / 100.0)),
        "saturate" => Value::Color(color(args, 0, "color", span)?.saturate(number_or(args, 1, "amount", 0.0) / 100.0)),
        "desaturate" => Value::Color(color(args, 0, "color", span)?.desaturate(number_or(args, 1, "amount", 0.0) / 100.0)),
        "grayscale" => Value::Color(color(args, 0, "color", span)?.grayscale()),
        "complement" => Value::Color(color(args, 0, "color", span)?.complement()),
        "invert" => Value::Color(color(args, 0, "color", span)?.invert(number_or(args, 1, "weight", 100.0) / 100.0)),
        "adjust-hue" => Value::Color(color(args, 0, "color", span)?.adjust_hue(number_or(args, 1, "degrees", 0.0))),
        "alpha" | "opacity" => Value::Number(SassNumber::unitless(color(args, 0, "color", span)?.a)),
        "opacify" | "fade-in" => Value::Color(color(args, 0, "color", span)?.with_alpha_delta(number_or(args, 1, "amount", 0.0))),
        "transparentize" | "fade-out" => Value::Color(color(args, 0, "color", span)?.with_alpha_delta(-number_or(args, 1, "amount", 0.0))),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn color(args: &EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<SassColor> {
    match arg(args, index, name) {
        Some(Value::Color(c)) => Ok(*c),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a color.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn number_or(args: &EvaluatedArgs, index: usize, name: &str, default: f64) -> f64 {
    match arg(args, index, name) {
        Some(Value::Number(n)) => n.value,
        _ => default,
    }
}

fn channel(args: &EvaluatedArgs, index: usize, name: &str, span: Span) -> Result<u8> {
    match arg(args, index, name) {
        Some(Value::Number(n)) => Ok(n.value.round().clamp(0.0, 255.0) as u8),
        Some(other) => Err(SassError::runtime(format!("${name}: {} is not a number.", other.inspect()), span)),
        None => Err(SassError::runtime(format!("Missing argument ${name}."), span)),
    }
}

fn rgb(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    // `rgba($color, $alpha)`: adjust an existing color's alpha.
    if let Some(Value::Color(c)) = arg(args, 0, "color") {
        let alpha = number_or(args, 1, "alpha", 1.0);
        return Ok(Value::Color(SassColor::rgba(c.r, c.g, c.b, alpha)));
    }
    let r = channel(args, 0, "red", span)?;
    let g = channel(args, 1, "green", span)?;
    let b = channel(args, 2, "blue", span)?;
    let alpha = number_or(args, 3, "alpha", 1.0);
    Ok(Value::Color(SassColor::rgba(r, g, b, alpha)))
}

fn hsl(args: &EvaluatedArgs, span: Span) -> Result<Value> {
    let Some(Value::Number(h)) = arg(args, 0, "hue") else {
        return Err(SassError::runtime("Missing argument $hue.", span));
    };
    let s = number_or(args, 1, "saturation", 0.0) / 100.0;
    let l = number_or(args, 2, "lightness", 0.0) / 100.0;
    let alpha = number_or(args, 3, "alpha", 1.0);
    Ok(Value::Color(SassColor::from_hsla(h.value, s, l, alpha)))
}
