//! Integration tests for the value system: number unit arithmetic and
//! color construction/conversion.

use sass_core::value::{ops, SassColor, SassNumber, Value};

#[test]
fn test_color_from_hex_6_digit() {
    let color = SassColor::from_hex("#ff0000").unwrap();
    assert_eq!(color.r, 255);
    assert_eq!(color.g, 0);
    assert_eq!(color.b, 0);
    assert!((color.a - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_color_from_hex_3_digit_shorthand() {
    let color = SassColor::from_hex("#0f0").unwrap();
    assert_eq!(color.r, 0);
    assert_eq!(color.g, 255);
    assert_eq!(color.b, 0);
}

#[test]
fn test_color_from_hex_8_digit_with_alpha() {
    let color = SassColor::from_hex("#ff000080").unwrap();
    assert_eq!(color.r, 255);
    assert!((color.a - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn test_color_from_hsla_primary_hues() {
    let red = SassColor::from_hsla(0.0, 1.0, 0.5, 1.0);
    assert_eq!((red.r, red.g, red.b), (255, 0, 0));

    let green = SassColor::from_hsla(120.0, 1.0, 0.5, 1.0);
    assert_eq!((green.r, green.g, green.b), (0, 255, 0));

    let blue = SassColor::from_hsla(240.0, 1.0, 0.5, 1.0);
    assert_eq!((blue.r, blue.g, blue.b), (0, 0, 255));
}

#[test]
fn test_named_color_table_covers_common_keywords() {
    assert_eq!(SassColor::from_named("red").unwrap().r, 255);
    assert_eq!(SassColor::from_named("transparent").unwrap().a, 0.0);
    assert!(SassColor::from_named("notacolor").is_none());
}

#[test]
fn test_number_addition_requires_comparable_units() {
    let px = Value::Number(SassNumber::with_unit(1.0, "px"));
    let more_px = Value::Number(SassNumber::with_unit(2.0, "px"));
    let sum = ops::add(&px, &more_px, dummy_span()).unwrap();
    assert_eq!(sum.to_css_string(), "3px");
}

#[test]
fn test_number_multiplication_combines_units() {
    let px = Value::Number(SassNumber::with_unit(2.0, "px"));
    let unitless = Value::Number(SassNumber::unitless(3.0));
    let product = ops::multiply(&px, &unitless, dummy_span()).unwrap();
    assert_eq!(product.to_css_string(), "6px");
}

#[test]
fn test_division_by_zero_is_a_runtime_error() {
    let a = Value::Number(SassNumber::unitless(1.0));
    let zero = Value::Number(SassNumber::unitless(0.0));
    assert!(ops::divide(&a, &zero, dummy_span()).is_err());
}

#[test]
fn test_values_equal_coerces_comparable_units() {
    let one_inch = Value::Number(SassNumber::with_unit(1.0, "in"));
    let ninety_six_px = Value::Number(SassNumber::with_unit(96.0, "px"));
    assert!(ops::values_equal(&one_inch, &ninety_six_px));
}

fn dummy_span() -> sass_core::span::Span {
    let mut registry = sass_core::span::SourceRegistry::new();
    let id = registry.add_synthetic("test", String::new());
    sass_core::span::Span::new(id, 0, 0)
}
