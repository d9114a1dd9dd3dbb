//! The Sass value system: the tagged-variant `Value` enum plus arithmetic,
//! comparison, and string-conversion operators (spec §3, §4.7).

pub mod color;
pub mod number;
pub mod ops;

use std::fmt;
use std::rc::Rc;

pub use color::SassColor;
pub use number::SassNumber;

/// How a [`SassList`]'s elements are joined when rendered: `,` or ` `.
/// `Undecided` is what an empty or single-element list literal has until
/// context (e.g. `list-separator()`) forces a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ListSeparator {
    /// Space-separated, e.g. `1px solid red`.
    Space,
    /// Comma-separated, e.g. `Helvetica, Arial, sans-serif`.
    Comma,
    /// Not yet determined (empty list or single bare value).
    Undecided,
}

/// A Sass list: an ordered sequence of values with a separator and an
/// optional `[...]` bracketed flag (spec §3 "Value hierarchy").
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SassList {
    /// The elements, in order.
    pub items: Vec<Value>,
    /// `,` or ` ` (or undecided).
    pub separator: ListSeparator,
    /// `true` for `[a, b, c]` bracketed list syntax.
    pub bracketed: bool,
}

impl SassList {
    /// An empty, unbracketed, undecided-separator list — what `()` parses to.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            separator: ListSeparator::Undecided,
            bracketed: false,
        }
    }

    /// A comma-separated list built from `items`.
    #[must_use]
    pub fn comma(items: Vec<Value>) -> Self {
        Self {
            items,
            separator: ListSeparator::Comma,
            bracketed: false,
        }
    }

    /// A space-separated list built from `items`.
    #[must_use]
    pub fn space(items: Vec<Value>) -> Self {
        Self {
            items,
            separator: ListSeparator::Space,
            bracketed: false,
        }
    }
}

/// A Sass map: an association list rather than a `HashMap`, because
/// `Value` keys (numbers, colors) have no total `Hash` impl and Sass maps
/// must preserve insertion order for `map-keys`/`map-values`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SassMap {
    /// Key/value pairs in insertion order.
    pub entries: Vec<(Value, Value)>,
}

impl SassMap {
    /// An empty map — what `()` inside a map context, or the value `map.merge` starts from, is.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by Sass-equality of the key.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| ops::values_equal(k, key))
            .map(|(_, v)| v)
    }

    /// Insert or overwrite a key, preserving the original position on
    /// overwrite (as `map-merge` must).
    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| ops::values_equal(k, &key)) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }
}

/// A Sass string: text plus whether it was written with quotes. Unquoted
/// strings are CSS identifiers/keywords; quoted strings render with their
/// quote marks in `inspect()` but not in plain CSS output.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SassString {
    /// The text content, already unescaped.
    pub text: Rc<str>,
    /// `true` if this string was written `"like this"` or `'like this'`.
    pub quoted: bool,
}

impl SassString {
    /// A quoted string.
    #[must_use]
    pub fn quoted(text: impl Into<Rc<str>>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    /// An unquoted string/identifier.
    #[must_use]
    pub fn unquoted(text: impl Into<Rc<str>>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

/// A reference to a first-class function value, as produced by
/// `get-function($name)` and consumed by `call()`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionRef {
    /// The function's Sass-visible name.
    pub name: Rc<str>,
}

/// The tagged-variant value type every Sass expression evaluates to.
///
/// A tagged enum, not a class hierarchy, per spec §9's explicit design
/// recommendation — matching how the teacher models every other small
/// closed value set in this codebase (`CSSToken`, `SimpleSelector`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// `null`.
    Null,
    /// `true`/`false`.
    Boolean(bool),
    /// A number, with optional compound units.
    Number(SassNumber),
    /// A color, in RGBA form (HSL derived on demand).
    Color(SassColor),
    /// A quoted or unquoted string.
    String(SassString),
    /// A space- or comma-separated list, possibly bracketed.
    List(SassList),
    /// A key-value map.
    Map(SassMap),
    /// A first-class function reference.
    FunctionRef(FunctionRef),
    /// The special "rest args" value bound to `$args...` inside a
    /// variadic callable, which is list-like but also exposes named
    /// keyword arguments via `keywords($args)`.
    ArgumentList(SassList, Vec<(Rc<str>, Value)>),
}

impl Value {
    /// Is this value "truthy" for `@if`/boolean operators? Only `false`
    /// and `null` are falsey; everything else, including `0` and empty
    /// strings, is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// The `type-of()` name for this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Number(_) => "number",
            Self::Color(_) => "color",
            Self::String(_) => "string",
            Self::List(_) | Self::ArgumentList(..) => "list",
            Self::Map(_) => "map",
            Self::FunctionRef(_) => "function",
        }
    }

    /// View any value as a single-element list, the way Sass list
    /// functions treat scalars (`nth($color, 1)` works, for example).
    #[must_use]
    pub fn as_list_items(&self) -> Vec<Value> {
        match self {
            Self::List(list) | Self::ArgumentList(list, _) => list.items.clone(),
            Self::Map(map) => map
                .entries
                .iter()
                .map(|(k, v)| Value::List(SassList::space(vec![k.clone(), v.clone()])))
                .collect(),
            other => vec![other.clone()],
        }
    }

    /// Render this value the way it would appear in compiled CSS output
    /// (unquoted strings bare, quoted strings without their marks removed
    /// only if that's legal CSS — emitter.rs calls this, not `inspect`).
    #[must_use]
    pub fn to_css_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => format!("{}{}", format_number(n.value), n.unit_string()),
            Self::Color(c) => c.to_css_string(),
            Self::String(s) => s.text.to_string(),
            Self::List(list) => render_list(list),
            Self::ArgumentList(list, _) => render_list(list),
            Self::Map(_) => String::new(),
            Self::FunctionRef(f) => format!("get-function(\"{}\")", f.name),
        }
    }

    /// Render this value the way `@debug`/`inspect()` would: quotes kept,
    /// `null` spelled out, lists shown with brackets/parens as written.
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Self::String(s) if s.quoted => format!("\"{}\"", s.text),
            Self::Map(map) => {
                let body = map
                    .entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({body})")
            }
            Self::List(list) if list.items.is_empty() => {
                if list.bracketed { "[]".to_string() } else { "()".to_string() }
            }
            _ => self.to_css_string(),
        }
    }
}

fn render_list(list: &SassList) -> String {
    let sep = match list.separator {
        ListSeparator::Comma => ", ",
        _ => " ",
    };
    let body = list
        .items
        .iter()
        .filter(|v| !matches!(v, Value::Null))
        .map(Value::to_css_string)
        .collect::<Vec<_>>()
        .join(sep);
    if list.bracketed {
        format!("[{body}]")
    } else {
        body
    }
}

/// Format a float the way a Sass emitter does: trim trailing zeros and a
/// bare trailing decimal point, and drop a redundant leading `0` before
/// the decimal point (`0.5` -> `.5`) only in compressed output — here we
/// keep the leading zero and let `emitter.rs` decide, since `inspect()`
/// and plain arithmetic both want the un-compressed form.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == value.trunc() && value.is_finite() && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let rounded = (value * 1e10).round() / 1e10;
    let mut s = format!("{rounded}");
    if let Some(dot) = s.find('.') {
        while s.ends_with('0') {
            let _ = s.pop();
        }
        if s.ends_with('.') {
            s.truncate(dot);
        }
    }
    s
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{SassList, SassMap, Value};

    #[test]
    fn test_falsey_values() {
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_zero_is_truthy() {
        assert!(Value::Number(super::SassNumber::unitless(0.0)).is_truthy());
    }

    #[test]
    fn test_map_insert_preserves_position_on_overwrite() {
        let mut map = SassMap::new();
        map.insert(Value::String(super::SassString::unquoted("a")), Value::Number(super::SassNumber::unitless(1.0)));
        map.insert(Value::String(super::SassString::unquoted("b")), Value::Number(super::SassNumber::unitless(2.0)));
        map.insert(Value::String(super::SassString::unquoted("a")), Value::Number(super::SassNumber::unitless(9.0)));
        assert_eq!(map.entries.len(), 2);
        assert_eq!(map.entries[0].0, Value::String(super::SassString::unquoted("a")));
    }

    #[test]
    fn test_render_comma_list() {
        let list = SassList::comma(vec![
            Value::String(super::SassString::unquoted("a")),
            Value::String(super::SassString::unquoted("b")),
        ]);
        assert_eq!(Value::List(list).to_css_string(), "a, b");
    }
}
