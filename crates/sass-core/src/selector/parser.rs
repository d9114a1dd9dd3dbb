//! Parses already-interpolated selector text into a [`SelectorList`]
//! (spec §4.3.3).
//!
//! Adapted from the teacher's hand-rolled `parse_selector` char walk
//! (`crates/koala-css/src/selector/mod.rs`), but built on the shared
//! [`Scanner`] instead of direct string indexing, and extended with `&`
//! and `%placeholder` which a DOM selector parser never needed.

use crate::scanner::Scanner;
use crate::selector::{
    AttributeMatch, AttributeSelector, Combinator, CompoundSelector, SelectorList, SimpleSelector,
};

/// Parse a full comma-separated selector list, e.g. `"a.b > c, &.active"`.
#[must_use]
pub fn parse_selector_list(text: &str) -> SelectorList {
    let complexes = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_complex)
        .collect();
    SelectorList { complexes }
}

fn parse_complex(text: &str) -> crate::selector::ComplexSelector {
    let mut scanner = Scanner::new(text);
    let mut components = Vec::new();
    let mut pending_combinator = None;
    loop {
        skip_whitespace(&mut scanner);
        if scanner.is_done() {
            break;
        }
        if let Some(c) = scanner.peek() {
            if matches!(c, '>' | '+' | '~') {
                let _ = scanner.read();
                pending_combinator = Some(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                });
                skip_whitespace(&mut scanner);
                continue;
            }
        }
        let before = scanner.byte_offset();
        let compound = parse_compound(&mut scanner);
        if scanner.byte_offset() == before {
            break;
        }
        let combinator = if components.is_empty() {
            None
        } else {
            Some(pending_combinator.take().unwrap_or(Combinator::Descendant))
        };
        components.push((combinator, compound));
    }
    crate::selector::ComplexSelector { components }
}

fn skip_whitespace(scanner: &mut Scanner<'_>) {
    let _ = scanner.scan_while(char::is_whitespace);
}

fn parse_compound(scanner: &mut Scanner<'_>) -> CompoundSelector {
    let mut simple_selectors = Vec::new();
    loop {
        match scanner.peek() {
            Some('&') => {
                let _ = scanner.read();
                simple_selectors.push(SimpleSelector::Parent);
            }
            Some('*') => {
                let _ = scanner.read();
                simple_selectors.push(SimpleSelector::Universal);
            }
            Some('.') => {
                let _ = scanner.read();
                simple_selectors.push(SimpleSelector::Class(scan_ident(scanner)));
            }
            Some('#') => {
                let _ = scanner.read();
                simple_selectors.push(SimpleSelector::Id(scan_ident(scanner)));
            }
            Some('%') => {
                let _ = scanner.read();
                simple_selectors.push(SimpleSelector::Placeholder(scan_ident(scanner)));
            }
            Some('[') => {
                if let Some(attr) = parse_attribute(scanner) {
                    simple_selectors.push(SimpleSelector::Attribute(attr));
                } else {
                    break;
                }
            }
            Some(':') => {
                let _ = scanner.read();
                let is_element = scanner.scan_char(':');
                let name = scan_ident(scanner);
                let args = if scanner.scan_char('(') {
                    Some(scan_balanced_parens(scanner))
                } else {
                    None
                };
                if is_element {
                    simple_selectors.push(SimpleSelector::PseudoElement(name));
                } else {
                    simple_selectors.push(SimpleSelector::PseudoClass(name, args));
                }
            }
            Some(c) if is_ident_start(c) => {
                simple_selectors.push(SimpleSelector::Type(scan_ident(scanner)));
            }
            _ => break,
        }
    }
    CompoundSelector { simple_selectors }
}

fn parse_attribute(scanner: &mut Scanner<'_>) -> Option<AttributeSelector> {
    let saved = scanner.state();
    let _ = scanner.read(); // '['
    skip_whitespace(scanner);
    let name = scan_ident(scanner);
    if name.is_empty() {
        scanner.reset_state(saved);
        return None;
    }
    skip_whitespace(scanner);
    let matcher = match scanner.peek() {
        Some(']') => {
            let _ = scanner.read();
            return Some(AttributeSelector {
                name,
                matcher: AttributeMatch::Exists,
            });
        }
        Some('=') => {
            let _ = scanner.read();
            AttributeMatch::Equals(scan_attr_value(scanner))
        }
        Some('~') if scanner.peek_at(1) == Some('=') => {
            let _ = scanner.read();
            let _ = scanner.read();
            AttributeMatch::Includes(scan_attr_value(scanner))
        }
        Some('|') if scanner.peek_at(1) == Some('=') => {
            let _ = scanner.read();
            let _ = scanner.read();
            AttributeMatch::DashMatch(scan_attr_value(scanner))
        }
        Some('^') if scanner.peek_at(1) == Some('=') => {
            let _ = scanner.read();
            let _ = scanner.read();
            AttributeMatch::PrefixMatch(scan_attr_value(scanner))
        }
        Some('$') if scanner.peek_at(1) == Some('=') => {
            let _ = scanner.read();
            let _ = scanner.read();
            AttributeMatch::SuffixMatch(scan_attr_value(scanner))
        }
        Some('*') if scanner.peek_at(1) == Some('=') => {
            let _ = scanner.read();
            let _ = scanner.read();
            AttributeMatch::SubstringMatch(scan_attr_value(scanner))
        }
        _ => {
            scanner.reset_state(saved);
            return None;
        }
    };
    skip_whitespace(scanner);
    let _ = scanner.scan_char(']');
    Some(AttributeSelector { name, matcher })
}

fn scan_attr_value(scanner: &mut Scanner<'_>) -> String {
    skip_whitespace(scanner);
    let value = if scanner.peek() == Some('"') || scanner.peek() == Some('\'') {
        let quote = scanner.read().unwrap();
        let text = scanner.scan_while(|c| c != quote).to_string();
        let _ = scanner.read();
        text
    } else {
        scanner.scan_while(|c| !matches!(c, ']' | ' ')).to_string()
    };
    skip_whitespace(scanner);
    value
}

fn scan_balanced_parens(scanner: &mut Scanner<'_>) -> String {
    let start = scanner.byte_offset();
    let mut depth = 1;
    while let Some(c) = scanner.peek() {
        let _ = scanner.read();
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    let end = scanner.byte_offset().saturating_sub(1);
    scanner.source()[start..end.max(start)].to_string()
}

fn scan_ident(scanner: &mut Scanner<'_>) -> String {
    scanner.scan_while(is_ident_char).to_string()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || c == '\\'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::parse_selector_list;
    use crate::selector::SimpleSelector;

    #[test]
    fn test_parses_comma_separated_list() {
        let list = parse_selector_list("a, b");
        assert_eq!(list.complexes.len(), 2);
    }

    #[test]
    fn test_parses_child_combinator() {
        let list = parse_selector_list("a > b");
        let complex = &list.complexes[0];
        assert_eq!(complex.components.len(), 2);
        assert_eq!(complex.components[1].0, Some(crate::selector::Combinator::Child));
    }

    #[test]
    fn test_parses_parent_and_class() {
        let list = parse_selector_list("&.active");
        let compound = &list.complexes[0].components[0].1;
        assert_eq!(compound.simple_selectors, vec![SimpleSelector::Parent, SimpleSelector::Class("active".into())]);
    }

    #[test]
    fn test_parses_placeholder() {
        let list = parse_selector_list("%button-base");
        let compound = &list.complexes[0].components[0].1;
        assert_eq!(compound.simple_selectors, vec![SimpleSelector::Placeholder("button-base".into())]);
    }

    #[test]
    fn test_parses_attribute_prefix_match() {
        let list = parse_selector_list("a[href^=\"http\"]");
        let compound = &list.complexes[0].components[0].1;
        assert!(matches!(
            &compound.simple_selectors[1],
            SimpleSelector::Attribute(attr) if attr.name == "href"
        ));
    }
}
