//! Integration tests for the public `compile`/`compile_string` entry points.

use sass_core::{compile, compile_string, Dialect, Options, OutputStyle};

#[test]
fn test_compiles_variables_and_arithmetic() {
    let source = "$base: 10px;\n.box { width: $base * 2; height: $base + 5px; }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains("width: 20px"));
    assert!(result.css.contains("height: 15px"));
}

#[test]
fn test_compiles_nested_rules_into_flat_css() {
    let source = ".card { color: black; &:hover { color: blue; } .title { font-weight: bold; } }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains(".card {"));
    assert!(result.css.contains(".card:hover {"));
    assert!(result.css.contains(".card .title {"));
}

#[test]
fn test_compiles_mixins_and_functions() {
    let source = "
        @function double($n) { @return $n * 2; }
        @mixin pad($n) { padding: $n; }
        .box { @include pad(double(4px)); }
    ";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains("padding: 8px"));
}

#[test]
fn test_compiles_control_flow() {
    let source = "
        @each $name, $value in (a: 1px, b: 2px) {
            .#{$name} { width: $value; }
        }
    ";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains(".a {\n  width: 1px;\n}"));
    assert!(result.css.contains(".b {\n  width: 2px;\n}"));
}

#[test]
fn test_compiles_extend_across_rules() {
    let source = ".error { border: 1px solid red; } .critical { @extend .error; font-weight: bold; }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains(".error, .critical"));
}

#[test]
fn test_compressed_output_style() {
    let source = ".a { color: red; width: 1px; }";
    let mut options = Options::default();
    options.style = OutputStyle::Compressed;
    let result = compile_string(source, Dialect::Scss, &options).unwrap();
    assert!(!result.css.contains('\n'));
    assert!(!result.css.contains("  "));
}

#[test]
fn test_indented_syntax_dialect() {
    let source = ".card\n  color: red\n  .title\n    font-weight: bold\n";
    let result = compile_string(source, Dialect::Indented, &Options::default()).unwrap();
    assert!(result.css.contains(".card {"));
    assert!(result.css.contains(".card .title {"));
}

#[test]
fn test_plain_css_dialect_rejects_sass_syntax() {
    let err = compile_string("$x: 1px; .a { width: $x; }", Dialect::Css, &Options::default()).unwrap_err();
    assert!(matches!(err, sass_core::SassError::Parse { .. }));
}

#[test]
fn test_compile_infers_dialect_from_filename() {
    let scss = compile("theme.scss", ".a { width: 1px + 1px; }", &Options::default()).unwrap();
    assert!(scss.css.contains("width: 2px"));

    let plain = compile("reset.css", ".a { color: red; }", &Options::default()).unwrap();
    assert!(plain.css.contains("color: red"));
}

#[test]
fn test_error_message_reports_undefined_variable() {
    let err = compile_string(".a { width: $missing; }", Dialect::Scss, &Options::default()).unwrap_err();
    match err {
        sass_core::SassError::Runtime { message, .. } => assert!(message.contains("missing")),
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn test_nested_media_merges_and_drops_empty_rules() {
    let source = "@media screen { @media (min-width: 600px) { .a { width: 1px; } } }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains("@media screen and (min-width: 600px)"));
}

#[test]
fn test_at_root_without_query_hoists_past_style_rule_only() {
    let source = "@media screen { .card { @at-root { .banner { color: red; } } } }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains("@media screen"));
    assert!(result.css.contains(".banner {"));
    assert!(!result.css.contains(".card .banner"));
}

#[test]
fn test_at_root_without_all_hoists_to_stylesheet_root() {
    let source = "@media screen { .card { @at-root (without: all) { .banner { color: red; } } } }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(!result.css.contains("@media"));
    assert!(result.css.contains(".banner {"));
}

#[test]
fn test_extend_complex_selector_is_rejected() {
    let source = ".a .b { color: red; } .c { @extend .a .b; }";
    let err = compile_string(source, Dialect::Scss, &Options::default()).unwrap_err();
    match err {
        sass_core::SassError::Runtime { message, .. } => assert!(message.contains("complex selectors")),
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn test_extend_selector_list_registers_every_complex() {
    let source = ".a { color: red; } .b { width: 1px; } .c { @extend .a, .b; }";
    let result = compile_string(source, Dialect::Scss, &Options::default()).unwrap();
    assert!(result.css.contains(".a, .c"));
    assert!(result.css.contains(".b, .c"));
}

#[test]
fn test_extend_across_incompatible_media_errors() {
    let source = "@media screen { .a { @extend .b; } } .b { color: red; }";
    let err = compile_string(source, Dialect::Scss, &Options::default()).unwrap_err();
    assert!(matches!(err, sass_core::SassError::Runtime { .. }));
}
