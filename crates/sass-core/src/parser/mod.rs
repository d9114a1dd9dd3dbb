//! Shared recursive-descent stylesheet grammar (spec §4.3).
//!
//! There is no token stream: [`StylesheetParser`] drives the
//! [`crate::scanner::Scanner`] directly, the way the teacher's
//! `CSSTokenizer` consumed characters, generalized from "emit the next
//! token" into "recognize the next statement/expression". The three
//! dialects in `scss.rs`/`indented.rs`/`css.rs` configure this shared
//! core rather than duplicating it.

pub mod css;
pub mod indented;
pub mod scss;

use crate::ast::{
    BinaryOp, CallArgs, Expression, ImportArgument, Interpolation, InterpolationPart, Param, Params,
    Statement, Stylesheet, UnaryOp,
};
use crate::error::{Result, SassError};
use crate::scanner::Scanner;
use crate::span::{SourceId, Span};
use crate::value::{ListSeparator, SassColor, SassNumber, Value};

/// Which of the three grammars this parser is recognizing. The shared
/// statement/expression logic branches on this only where the dialects
/// genuinely diverge: block delimiters and whether plain-CSS mode
/// forbids Sass-only directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `.scss`, brace-delimited.
    Scss,
    /// `.sass`, indentation-delimited (pre-processed into brace form
    /// before reaching this parser, see `indented.rs`).
    Indented,
    /// Plain `.css`, brace-delimited, no Sass-only constructs permitted.
    Css,
}

/// The shared recursive-descent parser all three dialects are built on.
pub struct StylesheetParser<'a> {
    scanner: Scanner<'a>,
    source: SourceId,
    dialect: Dialect,
}

impl<'a> StylesheetParser<'a> {
    /// Construct a parser over `text`, already preprocessed for its
    /// dialect (indentation flattened to braces for [`Dialect::Indented`]).
    #[must_use]
    pub fn new(text: &'a str, source: SourceId, dialect: Dialect) -> Self {
        Self {
            scanner: Scanner::new(text),
            source,
            dialect,
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.source, start, self.scanner.byte_offset())
    }

    fn error(&self, message: impl Into<String>) -> SassError {
        SassError::parse(message, Span::point(self.source, self.scanner.byte_offset()))
    }

    /// Parse the whole stylesheet into its top-level statement list.
    pub fn parse_stylesheet(mut self) -> Result<Stylesheet> {
        let statements = self.parse_statements(true)?;
        Ok(Stylesheet {
            statements,
            source: self.source,
        })
    }

    fn skip_trivia(&mut self) {
        loop {
            let _ = self.scanner.scan_while(char::is_whitespace);
            if self.scanner.peek() == Some('/') && self.scanner.peek_at(1) == Some('/') {
                let _ = self.scanner.scan_while(|c| c != '\n');
                continue;
            }
            if self.scanner.peek() == Some('/') && self.scanner.peek_at(1) == Some('*') {
                let _ = self.scanner.read();
                let _ = self.scanner.read();
                while !self.scanner.is_done() && !(self.scanner.peek() == Some('*') && self.scanner.peek_at(1) == Some('/')) {
                    let _ = self.scanner.read();
                }
                let _ = self.scanner.read();
                let _ = self.scanner.read();
                continue;
            }
            break;
        }
    }

    /// Parse a run of statements, stopping at `}` unless `top_level`.
    fn parse_statements(&mut self, top_level: bool) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            self.skip_trivia();
            if self.scanner.is_done() {
                break;
            }
            if !top_level && self.scanner.peek() == Some('}') {
                break;
            }
            statements.push(self.parse_statement()?);
            self.skip_trivia();
        }
        Ok(statements)
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>> {
        self.scanner.expect_char('{').map_err(|m| self.error(m))?;
        let statements = self.parse_statements(false)?;
        self.skip_trivia();
        self.scanner.expect_char('}').map_err(|m| self.error(m))?;
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let start = self.scanner.byte_offset();
        if self.scanner.peek() == Some('@') {
            return self.parse_at_rule(start);
        }
        if self.scanner.peek() == Some('$') {
            if self.dialect == Dialect::Css {
                return Err(self.error("Sass variables are not allowed in plain CSS"));
            }
            return self.parse_variable_decl(start);
        }
        if self.scanner.peek() == Some('/') && self.scanner.peek_at(1) == Some('*') {
            return self.parse_loud_comment(start);
        }
        self.parse_rule_or_declaration(start)
    }

    fn parse_loud_comment(&mut self, start: usize) -> Result<Statement> {
        let _ = self.scanner.read();
        let _ = self.scanner.read();
        let text_start = self.scanner.byte_offset();
        while !self.scanner.is_done() && !(self.scanner.peek() == Some('*') && self.scanner.peek_at(1) == Some('/')) {
            let _ = self.scanner.read();
        }
        let text_end = self.scanner.byte_offset();
        let _ = self.scanner.read();
        let _ = self.scanner.read();
        let body = &self.scanner.source()[text_start..text_end];
        Ok(Statement::Comment {
            text: format!("/*{body}*/"),
            span: self.span_from(start),
        })
    }

    fn parse_variable_decl(&mut self, start: usize) -> Result<Statement> {
        let _ = self.scanner.read();
        let name = self.scan_identifier();
        self.skip_trivia();
        self.scanner.expect_char(':').map_err(|m| self.error(m))?;
        self.skip_trivia();
        let value = self.parse_expression()?;
        let (default, global) = self.parse_trailing_flags()?;
        let _ = self.scanner.scan_char(';');
        Ok(Statement::VariableDecl {
            name,
            value,
            default,
            global,
            span: self.span_from(start),
        })
    }

    fn parse_trailing_flags(&mut self) -> Result<(bool, bool)> {
        let mut default = false;
        let mut global = false;
        loop {
            self.skip_trivia();
            if self.scanner.scan_char('!') {
                let flag = self.scan_identifier();
                match flag.as_str() {
                    "default" => default = true,
                    "global" => global = true,
                    other => return Err(self.error(format!("unknown flag \"!{other}\""))),
                }
            } else {
                break;
            }
        }
        Ok((default, global))
    }

    fn parse_rule_or_declaration(&mut self, start: usize) -> Result<Statement> {
        let prelude = self.scan_prelude_until(&['{', ';', '}'])?;
        self.skip_trivia();
        match self.scanner.peek() {
            Some('{') => {
                if let Some((name, value)) = split_declaration_prelude(&prelude) {
                    let (value, important) = strip_important(&value);
                    let value_expr = self.parse_embedded_expression(&value)?;
                    let children = self.parse_block()?;
                    return Ok(Statement::Declaration {
                        name: Interpolation::plain(name.trim().to_string(), self.span_from(start)),
                        value: Some(value_expr),
                        important,
                        children,
                        span: self.span_from(start),
                    });
                }
                let body = self.parse_block()?;
                Ok(Statement::StyleRule {
                    selector: Interpolation::plain(prelude.trim().to_string(), self.span_from(start)),
                    body,
                    span: self.span_from(start),
                })
            }
            _ => {
                let _ = self.scanner.scan_char(';');
                let (name, value) = split_declaration_prelude(&prelude)
                    .ok_or_else(|| self.error("expected a declaration or rule"))?;
                let (value, important) = strip_important(&value);
                let value_expr = self.parse_embedded_expression(&value)?;
                Ok(Statement::Declaration {
                    name: Interpolation::plain(name.trim().to_string(), self.span_from(start)),
                    value: Some(value_expr),
                    important,
                    children: Vec::new(),
                    span: self.span_from(start),
                })
            }
        }
    }

    /// Scan raw text up to (not including) the first unparenthesized
    /// occurrence of any of `stop_chars`, honoring string literals and
    /// balanced parens/brackets so a selector like `a[href="{"]` or a
    /// value like `rgba(0, 0, 0, .5)` isn't cut short.
    fn scan_prelude_until(&mut self, stop_chars: &[char]) -> Result<String> {
        let start = self.scanner.byte_offset();
        let mut depth = 0i32;
        loop {
            match self.scanner.peek() {
                None => break,
                Some(c) if depth == 0 && stop_chars.contains(&c) => break,
                Some('(') | Some('[') => {
                    depth += 1;
                    let _ = self.scanner.read();
                }
                Some(')') | Some(']') => {
                    depth -= 1;
                    let _ = self.scanner.read();
                }
                Some(q @ ('"' | '\'')) => {
                    let _ = self.scanner.read();
                    while let Some(c) = self.scanner.peek() {
                        let _ = self.scanner.read();
                        if c == '\\' {
                            let _ = self.scanner.read();
                        } else if c == q {
                            break;
                        }
                    }
                }
                Some(_) => {
                    let _ = self.scanner.read();
                }
            }
        }
        let end = self.scanner.byte_offset();
        Ok(self.scanner.source()[start..end].to_string())
    }

    fn parse_embedded_expression(&mut self, text: &str) -> Result<Expression> {
        let offset = self.scanner.byte_offset();
        let mut sub = StylesheetParser::new(text, self.source, self.dialect);
        let expr = sub.parse_expression()?;
        let _ = offset;
        Ok(expr)
    }

    fn parse_at_rule(&mut self, start: usize) -> Result<Statement> {
        let _ = self.scanner.read();
        let name = self.scan_identifier();
        self.skip_trivia();
        if self.dialect == Dialect::Css
            && matches!(
                name.as_str(),
                "if" | "each" | "for" | "while" | "mixin" | "include" | "function" | "return" | "at-root" | "extend" | "warn" | "error" | "debug" | "content" | "else"
            )
        {
            return Err(self.error(format!("\"@{name}\" is not allowed in plain CSS")));
        }
        match name.as_str() {
            "if" => self.parse_if(start),
            "each" => self.parse_each(start),
            "for" => self.parse_for(start),
            "while" => self.parse_while(start),
            "mixin" => self.parse_mixin_def(start),
            "include" => self.parse_include(start),
            "function" => self.parse_function_def(start),
            "return" => self.parse_simple_expr_statement(start, |v, s| Statement::Return { value: v, span: s }),
            "at-root" => self.parse_at_root(start),
            "media" => self.parse_media(start),
            "import" => self.parse_import(start),
            "extend" => self.parse_extend(start),
            "warn" => self.parse_simple_expr_statement(start, |v, s| Statement::Warn { value: v, span: s }),
            "error" => self.parse_simple_expr_statement(start, |v, s| Statement::Error { value: v, span: s }),
            "debug" => self.parse_simple_expr_statement(start, |v, s| Statement::Debug { value: v, span: s }),
            "content" => self.parse_content(start),
            "else" => Err(self.error("@else must follow @if")),
            other => self.parse_plain_at_rule(start, other),
        }
    }

    fn parse_simple_expr_statement(&mut self, start: usize, build: impl Fn(Expression, Span) -> Statement) -> Result<Statement> {
        let value = self.parse_expression()?;
        let _ = self.scanner.scan_char(';');
        Ok(build(value, self.span_from(start)))
    }

    fn parse_if(&mut self, start: usize) -> Result<Statement> {
        let condition = self.parse_expression()?;
        self.skip_trivia();
        let body = self.parse_block()?;
        let mut branches = vec![(condition, body)];
        let mut else_branch = None;
        loop {
            let checkpoint = self.scanner.state();
            self.skip_trivia();
            if self.scanner.scan_char('@') && self.scan_identifier() == "else" {
                self.skip_trivia();
                if self.scanner.scan_identifier_ci("if") {
                    self.skip_trivia();
                    let cond = self.parse_expression()?;
                    self.skip_trivia();
                    let body = self.parse_block()?;
                    branches.push((cond, body));
                    continue;
                }
                self.skip_trivia();
                else_branch = Some(self.parse_block()?);
                break;
            }
            self.scanner.reset_state(checkpoint);
            break;
        }
        Ok(Statement::If {
            branches,
            else_branch,
            span: self.span_from(start),
        })
    }

    fn parse_each(&mut self, start: usize) -> Result<Statement> {
        let mut variables = vec![self.scan_variable_name()?];
        self.skip_trivia();
        while self.scanner.scan_char(',') {
            self.skip_trivia();
            variables.push(self.scan_variable_name()?);
            self.skip_trivia();
        }
        if !self.scanner.scan_identifier_ci("in") {
            return Err(self.error("expected \"in\" in @each"));
        }
        self.skip_trivia();
        let list = self.parse_expression()?;
        self.skip_trivia();
        let body = self.parse_block()?;
        Ok(Statement::Each {
            variables,
            list,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_for(&mut self, start: usize) -> Result<Statement> {
        let variable = self.scan_variable_name()?;
        self.skip_trivia();
        if !self.scanner.scan_identifier_ci("from") {
            return Err(self.error("expected \"from\" in @for"));
        }
        self.skip_trivia();
        let from = self.parse_expression()?;
        self.skip_trivia();
        let inclusive = if self.scanner.scan_identifier_ci("through") {
            true
        } else if self.scanner.scan_identifier_ci("to") {
            false
        } else {
            return Err(self.error("expected \"through\" or \"to\" in @for"));
        };
        self.skip_trivia();
        let to = self.parse_expression()?;
        self.skip_trivia();
        let body = self.parse_block()?;
        Ok(Statement::For {
            variable,
            from,
            to,
            inclusive,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_while(&mut self, start: usize) -> Result<Statement> {
        let condition = self.parse_expression()?;
        self.skip_trivia();
        let body = self.parse_block()?;
        Ok(Statement::While {
            condition,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_mixin_def(&mut self, start: usize) -> Result<Statement> {
        let name = self.scan_identifier();
        self.skip_trivia();
        let params = if self.scanner.peek() == Some('(') {
            self.parse_params()?
        } else {
            Params::default()
        };
        self.skip_trivia();
        let body = self.parse_block()?;
        let has_content = statements_contain_content(&body);
        Ok(Statement::MixinDef {
            name,
            params,
            has_content,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_function_def(&mut self, start: usize) -> Result<Statement> {
        let name = self.scan_identifier();
        self.skip_trivia();
        let params = if self.scanner.peek() == Some('(') {
            self.parse_params()?
        } else {
            Params::default()
        };
        self.skip_trivia();
        let body = self.parse_block()?;
        Ok(Statement::FunctionDef {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_include(&mut self, start: usize) -> Result<Statement> {
        let (namespace, name) = self.scan_namespaced_ident();
        self.skip_trivia();
        let args = if self.scanner.peek() == Some('(') {
            self.parse_call_args()?
        } else {
            CallArgs::default()
        };
        self.skip_trivia();
        let content = if self.scanner.peek() == Some('{') {
            Some(self.parse_block()?)
        } else {
            let _ = self.scanner.scan_char(';');
            None
        };
        Ok(Statement::Include {
            namespace,
            name,
            args,
            content,
            span: self.span_from(start),
        })
    }

    fn parse_content(&mut self, start: usize) -> Result<Statement> {
        self.skip_trivia();
        let args = if self.scanner.peek() == Some('(') {
            self.parse_call_args()?
        } else {
            CallArgs::default()
        };
        let _ = self.scanner.scan_char(';');
        Ok(Statement::Content {
            args,
            span: self.span_from(start),
        })
    }

    fn parse_at_root(&mut self, start: usize) -> Result<Statement> {
        self.skip_trivia();
        let query = if self.scanner.peek() == Some('(') {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.skip_trivia();
        let body = self.parse_block()?;
        Ok(Statement::AtRoot {
            query,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_media(&mut self, start: usize) -> Result<Statement> {
        let query_text = self.scan_prelude_until(&['{'])?;
        let body = self.parse_block()?;
        Ok(Statement::Media {
            query: Interpolation::plain(query_text.trim().to_string(), self.span_from(start)),
            body,
            span: self.span_from(start),
        })
    }

    fn parse_import(&mut self, start: usize) -> Result<Statement> {
        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            let text = self.parse_string_literal_text()?;
            if is_plain_css_import(&text) {
                args.push(ImportArgument::Plain(Interpolation::plain(text, self.span_from(start))));
            } else {
                args.push(ImportArgument::Sass(text));
            }
            self.skip_trivia();
            if !self.scanner.scan_char(',') {
                break;
            }
        }
        let _ = self.scanner.scan_char(';');
        Ok(Statement::Import {
            args,
            span: self.span_from(start),
        })
    }

    fn parse_extend(&mut self, start: usize) -> Result<Statement> {
        let text = self.scan_prelude_until(&[';', '}', '!'])?;
        self.skip_trivia();
        let optional = self.scanner.scan_char('!') && self.scanner.scan_identifier_ci("optional");
        let _ = self.scanner.scan_char(';');
        Ok(Statement::Extend {
            selector: Interpolation::plain(text.trim().to_string(), self.span_from(start)),
            optional,
            span: self.span_from(start),
        })
    }

    fn parse_plain_at_rule(&mut self, start: usize, name: &str) -> Result<Statement> {
        if self.dialect == Dialect::Css && !matches!(name, "media" | "import" | "charset" | "font-face" | "keyframes" | "supports") {
            return Err(self.error(format!("\"@{name}\" is not allowed in plain CSS")));
        }
        let prelude_text = self.scan_prelude_until(&['{', ';'])?;
        self.skip_trivia();
        let body = if self.scanner.peek() == Some('{') {
            Some(self.parse_block()?)
        } else {
            let _ = self.scanner.scan_char(';');
            None
        };
        Ok(Statement::PlainAtRule {
            name: name.to_string(),
            prelude: Interpolation::plain(prelude_text.trim().to_string(), self.span_from(start)),
            body,
            span: self.span_from(start),
        })
    }

    fn parse_params(&mut self) -> Result<Params> {
        self.scanner.expect_char('(').map_err(|m| self.error(m))?;
        let mut params = Vec::new();
        let mut rest = None;
        loop {
            self.skip_trivia();
            if self.scanner.scan_char(')') {
                break;
            }
            let name = self.scan_variable_name()?;
            self.skip_trivia();
            if self.scanner.scan("...") {
                rest = Some(name);
                self.skip_trivia();
                let _ = self.scanner.scan_char(')');
                break;
            }
            let default = if self.scanner.scan_char(':') {
                self.skip_trivia();
                Some(self.parse_additive_or_higher_no_comma()?)
            } else {
                None
            };
            params.push(Param { name, default });
            self.skip_trivia();
            if !self.scanner.scan_char(',') {
                self.skip_trivia();
                let _ = self.scanner.scan_char(')');
                break;
            }
        }
        Ok(Params { params, rest })
    }

    fn parse_call_args(&mut self) -> Result<CallArgs> {
        self.scanner.expect_char('(').map_err(|m| self.error(m))?;
        let mut args = CallArgs::default();
        loop {
            self.skip_trivia();
            if self.scanner.scan_char(')') {
                break;
            }
            let checkpoint = self.scanner.state();
            if self.scanner.peek() == Some('$') {
                let name = self.scan_variable_name()?;
                self.skip_trivia();
                if self.scanner.scan_char(':') {
                    self.skip_trivia();
                    let value = self.parse_additive_or_higher_no_comma()?;
                    args.named.push((name, value));
                    self.skip_trivia();
                    if self.scanner.scan_char(',') {
                        continue;
                    }
                    self.skip_trivia();
                    let _ = self.scanner.scan_char(')');
                    break;
                }
                self.scanner.reset_state(checkpoint);
            }
            let value = self.parse_additive_or_higher_no_comma()?;
            self.skip_trivia();
            if self.scanner.scan("...") {
                self.skip_trivia();
                args.rest = Some(Box::new(value));
            } else {
                args.positional.push(value);
            }
            self.skip_trivia();
            if !self.scanner.scan_char(',') {
                self.skip_trivia();
                let _ = self.scanner.scan_char(')');
                break;
            }
        }
        Ok(args)
    }

    fn scan_variable_name(&mut self) -> Result<String> {
        self.scanner.expect_char('$').map_err(|m| self.error(m))?;
        Ok(self.scan_identifier())
    }

    fn scan_namespaced_ident(&mut self) -> (Option<String>, String) {
        let first = self.scan_identifier();
        if self.scanner.peek() == Some('.') && self.scanner.peek_at(1).is_some_and(is_ident_start) {
            let _ = self.scanner.read();
            let second = self.scan_identifier();
            (Some(first), second)
        } else {
            (None, first)
        }
    }

    fn scan_identifier(&mut self) -> String {
        self.scanner.scan_while(is_ident_char).to_string()
    }

    fn parse_string_literal_text(&mut self) -> Result<String> {
        match self.scanner.peek() {
            Some(q @ ('"' | '\'')) => {
                let _ = self.scanner.read();
                let text = self.scanner.scan_while(|c| c != q).to_string();
                self.scanner.expect_char(q).map_err(|m| self.error(m))?;
                Ok(text)
            }
            _ => Ok(self.scanner.scan_while(|c| !matches!(c, ',' | ';' | '}')).trim().to_string()),
        }
    }

    // ---- expression grammar (precedence climbing) ----

    /// Parse a full expression, including top-level comma-separated list
    /// syntax (used for declaration values and `@return`/`@if` arguments,
    /// not for call-argument positions where commas separate arguments
    /// instead).
    pub fn parse_expression(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let first = self.parse_space_list()?;
        self.skip_trivia();
        if self.scanner.peek() != Some(',') {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.scanner.scan_char(',') {
            self.skip_trivia();
            items.push(self.parse_space_list()?);
            self.skip_trivia();
        }
        Ok(Expression::ListLiteral {
            items,
            separator: ListSeparator::Comma,
            bracketed: false,
            span: self.span_from(start),
        })
    }

    fn parse_additive_or_higher_no_comma(&mut self) -> Result<Expression> {
        self.parse_space_list()
    }

    fn parse_space_list(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let first = self.parse_or()?;
        let mut items = vec![first];
        loop {
            let checkpoint = self.scanner.state();
            let _ = self.scanner.scan_while(|c| c == ' ' || c == '\t');
            if self.scanner.is_done() || matches!(self.scanner.peek(), Some(',' | ';' | '}' | ')' | ']' | '\n' | '\r')) {
                self.scanner.reset_state(checkpoint);
                break;
            }
            match self.parse_or() {
                Ok(expr) => items.push(expr),
                Err(_) => {
                    self.scanner.reset_state(checkpoint);
                    break;
                }
            }
        }
        if items.len() == 1 {
            return Ok(items.into_iter().next().unwrap());
        }
        Ok(Expression::ListLiteral {
            items,
            separator: ListSeparator::Space,
            bracketed: false,
            span: self.span_from(start),
        })
    }

    fn parse_or(&mut self) -> Result<Expression> {
        self.parse_binary_level(&[("or", BinaryOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        self.parse_binary_level(&[("and", BinaryOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let mut left = self.parse_relational()?;
        loop {
            self.skip_trivia();
            let op = if self.scanner.scan("==") {
                BinaryOp::Eq
            } else if self.scanner.scan("!=") {
                BinaryOp::Neq
            } else {
                break;
            };
            self.skip_trivia();
            let right = self.parse_relational()?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let mut left = self.parse_additive()?;
        loop {
            self.skip_trivia();
            let op = if self.scanner.scan("<=") {
                BinaryOp::Le
            } else if self.scanner.scan(">=") {
                BinaryOp::Ge
            } else if self.scanner.peek() == Some('<') {
                let _ = self.scanner.read();
                BinaryOp::Lt
            } else if self.scanner.peek() == Some('>') {
                let _ = self.scanner.read();
                BinaryOp::Gt
            } else {
                break;
            };
            self.skip_trivia();
            let right = self.parse_additive()?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let mut left = self.parse_multiplicative()?;
        loop {
            self.skip_trivia();
            let op = match self.scanner.peek() {
                Some('+') => BinaryOp::Add,
                Some('-') if self.scanner.peek_at(1).is_some_and(|c| c.is_whitespace() || c == '$' || c == '(') => BinaryOp::Sub,
                _ => break,
            };
            let _ = self.scanner.read();
            self.skip_trivia();
            let right = self.parse_multiplicative()?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let mut left = self.parse_unary()?;
        loop {
            self.skip_trivia();
            let op = match self.scanner.peek() {
                Some('*') => BinaryOp::Mul,
                Some('%') => BinaryOp::Mod,
                Some('/') if self.scanner.peek_at(1) != Some('/') => BinaryOp::Div,
                _ => break,
            };
            let _ = self.scanner.read();
            self.skip_trivia();
            let right = self.parse_unary()?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        if self.scanner.scan_identifier_ci("not") && self.scanner.peek() == Some(' ') {
            self.skip_trivia();
            let operand = self.parse_unary()?;
            return Ok(Expression::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }
        match self.scanner.peek() {
            Some('-') if self.scanner.peek_at(1).is_some_and(|c| c.is_ascii_digit() || c == '$' || c == '(') => {
                let _ = self.scanner.read();
                let operand = self.parse_unary()?;
                Ok(Expression::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    span: self.span_from(start),
                })
            }
            Some('+') if self.scanner.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                let _ = self.scanner.read();
                let operand = self.parse_unary()?;
                Ok(Expression::UnaryOp {
                    op: UnaryOp::Plus,
                    operand: Box::new(operand),
                    span: self.span_from(start),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_binary_level(
        &mut self,
        ops: &[(&str, BinaryOp)],
        mut next: impl FnMut(&mut Self) -> Result<Expression>,
    ) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        let mut left = next(self)?;
        loop {
            self.skip_trivia();
            let checkpoint = self.scanner.state();
            let mut matched = None;
            for (keyword, op) in ops {
                if self.scanner.scan_identifier_ci(keyword)
                    && self.scanner.peek().is_none_or(|c| !is_ident_char(c))
                {
                    matched = Some(*op);
                    break;
                }
                self.scanner.reset_state(checkpoint);
            }
            let Some(op) = matched else { break };
            self.skip_trivia();
            let right = next(self)?;
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let start = self.scanner.byte_offset();
        match self.scanner.peek() {
            Some('$') => {
                let (namespace, name) = self.scan_namespaced_variable()?;
                Ok(Expression::Variable {
                    namespace,
                    name,
                    span: self.span_from(start),
                })
            }
            Some('&') => {
                let _ = self.scanner.read();
                Ok(Expression::ParentSelector(self.span_from(start)))
            }
            Some('(') => self.parse_parenthesized_or_map(start),
            Some('[') => self.parse_bracketed_list(start),
            Some('"') | Some('\'') => self.parse_quoted_string(start),
            Some('#') if self.scanner.peek_at(1) == Some('{') => self.parse_interpolated_string(start),
            Some(c) if c.is_ascii_digit() || (c == '.' && self.scanner.peek_at(1).is_some_and(|d| d.is_ascii_digit())) => {
                self.parse_number(start)
            }
            Some(c) if is_ident_start(c) => self.parse_ident_expr(start),
            _ => Err(self.error("expected expression")),
        }
    }

    fn scan_namespaced_variable(&mut self) -> Result<(Option<String>, String)> {
        let name = self.scan_variable_name()?;
        if self.scanner.peek() == Some('.') && self.scanner.peek_at(1) == Some('$') {
            let _ = self.scanner.read();
            let inner = self.scan_variable_name()?;
            return Ok((Some(name), inner));
        }
        Ok((None, name))
    }

    fn parse_parenthesized_or_map(&mut self, start: usize) -> Result<Expression> {
        let _ = self.scanner.read();
        self.skip_trivia();
        if self.scanner.scan_char(')') {
            return Ok(Expression::ListLiteral {
                items: Vec::new(),
                separator: ListSeparator::Undecided,
                bracketed: false,
                span: self.span_from(start),
            });
        }
        let first_key = self.parse_space_list_no_comma()?;
        self.skip_trivia();
        if self.scanner.scan_char(':') {
            self.skip_trivia();
            let first_value = self.parse_space_list_no_comma()?;
            let mut entries = vec![(first_key, first_value)];
            loop {
                self.skip_trivia();
                if !self.scanner.scan_char(',') {
                    break;
                }
                self.skip_trivia();
                if self.scanner.peek() == Some(')') {
                    break;
                }
                let key = self.parse_space_list_no_comma()?;
                self.skip_trivia();
                self.scanner.expect_char(':').map_err(|m| self.error(m))?;
                self.skip_trivia();
                let value = self.parse_space_list_no_comma()?;
                entries.push((key, value));
            }
            self.skip_trivia();
            self.scanner.expect_char(')').map_err(|m| self.error(m))?;
            return Ok(Expression::MapLiteral {
                entries,
                span: self.span_from(start),
            });
        }
        let mut items = vec![first_key];
        loop {
            self.skip_trivia();
            if !self.scanner.scan_char(',') {
                break;
            }
            self.skip_trivia();
            if self.scanner.peek() == Some(')') {
                break;
            }
            items.push(self.parse_space_list_no_comma()?);
        }
        self.skip_trivia();
        self.scanner.expect_char(')').map_err(|m| self.error(m))?;
        if items.len() == 1 {
            return Ok(Expression::Parenthesized(Box::new(items.into_iter().next().unwrap())));
        }
        Ok(Expression::ListLiteral {
            items,
            separator: ListSeparator::Comma,
            bracketed: false,
            span: self.span_from(start),
        })
    }

    fn parse_space_list_no_comma(&mut self) -> Result<Expression> {
        self.parse_space_list()
    }

    fn parse_bracketed_list(&mut self, start: usize) -> Result<Expression> {
        let _ = self.scanner.read();
        self.skip_trivia();
        let mut items = Vec::new();
        let mut separator = ListSeparator::Undecided;
        if !self.scanner.scan_char(']') {
            items.push(self.parse_space_list_no_comma()?);
            loop {
                self.skip_trivia();
                if self.scanner.scan_char(',') {
                    separator = ListSeparator::Comma;
                    self.skip_trivia();
                    items.push(self.parse_space_list_no_comma()?);
                } else {
                    break;
                }
            }
            self.skip_trivia();
            self.scanner.expect_char(']').map_err(|m| self.error(m))?;
        }
        Ok(Expression::ListLiteral {
            items,
            separator,
            bracketed: true,
            span: self.span_from(start),
        })
    }

    fn parse_quoted_string(&mut self, start: usize) -> Result<Expression> {
        let quote = self.scanner.read().unwrap();
        let mut parts = Vec::new();
        let mut literal = String::new();
        loop {
            match self.scanner.peek() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => {
                    let _ = self.scanner.read();
                    break;
                }
                Some('#') if self.scanner.peek_at(1) == Some('{') => {
                    if !literal.is_empty() {
                        parts.push(InterpolationPart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(InterpolationPart::Expr(self.parse_interpolation_expr()?));
                }
                Some('\\') => {
                    let _ = self.scanner.read();
                    if let Some(escaped) = self.scanner.read() {
                        literal.push(escaped);
                    }
                }
                Some(c) => {
                    let _ = self.scanner.read();
                    literal.push(c);
                }
            }
        }
        if !literal.is_empty() || parts.is_empty() {
            parts.push(InterpolationPart::Literal(literal));
        }
        Ok(Expression::StringLiteral {
            text: Interpolation {
                parts,
                span: self.span_from(start),
            },
            quoted: true,
        })
    }

    fn parse_interpolated_string(&mut self, start: usize) -> Result<Expression> {
        let expr = self.parse_interpolation_expr()?;
        Ok(Expression::StringLiteral {
            text: Interpolation {
                parts: vec![InterpolationPart::Expr(expr)],
                span: self.span_from(start),
            },
            quoted: false,
        })
    }

    fn parse_interpolation_expr(&mut self) -> Result<Expression> {
        self.scanner.expect("#{").map_err(|m| self.error(m))?;
        self.skip_trivia();
        let expr = self.parse_expression()?;
        self.skip_trivia();
        self.scanner.expect_char('}').map_err(|m| self.error(m))?;
        Ok(expr)
    }

    fn parse_number(&mut self, start: usize) -> Result<Expression> {
        let digits = self.scanner.scan_while(|c| c.is_ascii_digit() || c == '.');
        let numeric: f64 = digits.parse().map_err(|_| self.error("invalid number"))?;
        let unit = self.scanner.scan_while(|c| c.is_ascii_alphabetic() || c == '%');
        let number = if unit.is_empty() {
            SassNumber::unitless(numeric)
        } else {
            SassNumber::with_unit(numeric, unit)
        };
        Ok(Expression::Literal(Value::Number(number), self.span_from(start)))
    }

    fn parse_ident_expr(&mut self, start: usize) -> Result<Expression> {
        let (namespace, name) = self.scan_namespaced_ident();
        if self.scanner.peek() == Some('(') {
            let args = self.parse_call_args()?;
            return Ok(Expression::FunctionCall {
                namespace,
                name,
                args,
                span: self.span_from(start),
            });
        }
        if namespace.is_none() && self.scanner.peek() == Some('#') && self.scanner.peek_at(1) == Some('{') {
            return self.parse_unquoted_interpolated(start, name);
        }
        match name.as_str() {
            "true" => return Ok(Expression::Literal(Value::Boolean(true), self.span_from(start))),
            "false" => return Ok(Expression::Literal(Value::Boolean(false), self.span_from(start))),
            "null" => return Ok(Expression::Literal(Value::Null, self.span_from(start))),
            _ => {}
        }
        if let Some(color) = name.strip_prefix('#').and_then(SassColor::from_hex) {
            return Ok(Expression::Literal(Value::Color(color), self.span_from(start)));
        }
        if name.starts_with('#') {
            if let Some(color) = SassColor::from_hex(&name) {
                return Ok(Expression::Literal(Value::Color(color), self.span_from(start)));
            }
        }
        if namespace.is_none() {
            if let Some(color) = SassColor::from_named(&name) {
                return Ok(Expression::Literal(Value::Color(color), self.span_from(start)));
            }
        }
        Ok(Expression::StringLiteral {
            text: Interpolation::plain(name, self.span_from(start)),
            quoted: false,
        })
    }

    fn parse_unquoted_interpolated(&mut self, start: usize, leading: String) -> Result<Expression> {
        let mut parts = vec![InterpolationPart::Literal(leading)];
        while self.scanner.peek() == Some('#') && self.scanner.peek_at(1) == Some('{') {
            parts.push(InterpolationPart::Expr(self.parse_interpolation_expr()?));
            let trailing = self.scanner.scan_while(is_ident_char);
            if !trailing.is_empty() {
                parts.push(InterpolationPart::Literal(trailing.to_string()));
            }
        }
        Ok(Expression::StringLiteral {
            text: Interpolation {
                parts,
                span: self.span_from(start),
            },
            quoted: false,
        })
    }
}

fn statements_contain_content(statements: &[Statement]) -> bool {
    statements.iter().any(|s| match s {
        Statement::Content { .. } => true,
        Statement::If { branches, else_branch, .. } => {
            branches.iter().any(|(_, body)| statements_contain_content(body))
                || else_branch.as_ref().is_some_and(|b| statements_contain_content(b))
        }
        Statement::Each { body, .. } | Statement::For { body, .. } | Statement::While { body, .. } => {
            statements_contain_content(body)
        }
        _ => false,
    })
}

/// Strip a trailing `!important` (any casing/whitespace) from a
/// declaration's value text, returning the remaining value text and
/// whether the flag was present.
fn strip_important(value: &str) -> (String, bool) {
    let trimmed = value.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(bang) = lower.rfind('!') {
        if lower[bang + 1..].trim() == "important" {
            return (trimmed[..bang].trim_end().to_string(), true);
        }
    }
    (value.to_string(), false)
}

fn split_declaration_prelude(prelude: &str) -> Option<(String, String)> {
    let colon = find_top_level_colon(prelude)?;
    let name = &prelude[..colon];
    let value = &prelude[colon + 1..];
    if name.trim().is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

fn find_top_level_colon(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ':' if depth == 0 => {
                if chars.peek().is_some_and(|&(_, n)| n == ':') {
                    continue;
                }
                return Some(i);
            }
            '"' | '\'' => {
                for (_, c2) in chars.by_ref() {
                    if c2 == c {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn is_plain_css_import(text: &str) -> bool {
    text.ends_with(".css") || text.starts_with("http://") || text.starts_with("https://") || text.starts_with("//")
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || c == '\\'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::{Dialect, StylesheetParser};
    use crate::ast::Statement;
    use crate::span::SourceId;

    fn parse(text: &str) -> Vec<Statement> {
        StylesheetParser::new(text, SourceId(0), Dialect::Scss)
            .parse_stylesheet()
            .unwrap()
            .statements
    }

    #[test]
    fn test_parses_variable_declaration() {
        let statements = parse("$x: 1px;");
        assert!(matches!(statements[0], Statement::VariableDecl { .. }));
    }

    #[test]
    fn test_parses_simple_rule_with_declaration() {
        let statements = parse(".a { color: red; }");
        let Statement::StyleRule { body, .. } = &statements[0] else {
            panic!("expected style rule")
        };
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Statement::Declaration { .. }));
    }

    #[test]
    fn test_parses_nested_rule() {
        let statements = parse(".a { .b { color: red; } }");
        let Statement::StyleRule { body, .. } = &statements[0] else {
            panic!("expected style rule")
        };
        assert!(matches!(body[0], Statement::StyleRule { .. }));
    }

    #[test]
    fn test_parses_if_else() {
        let statements = parse("@if $x == 1 { a: b; } @else { c: d; }");
        let Statement::If { branches, else_branch, .. } = &statements[0] else {
            panic!("expected if")
        };
        assert_eq!(branches.len(), 1);
        assert!(else_branch.is_some());
    }

    #[test]
    fn test_parses_mixin_and_include() {
        let statements = parse("@mixin m($a, $b: 1) { x: $a; } @include m(1, 2);");
        assert!(matches!(statements[0], Statement::MixinDef { .. }));
        assert!(matches!(statements[1], Statement::Include { .. }));
    }

    #[test]
    fn test_parses_each_loop() {
        let statements = parse("@each $k, $v in $map { x: $v; }");
        assert!(matches!(statements[0], Statement::Each { .. }));
    }

    #[test]
    fn test_parses_extend_with_optional() {
        let statements = parse(".a { @extend .b !optional; }");
        let Statement::StyleRule { body, .. } = &statements[0] else {
            panic!("expected style rule")
        };
        let Statement::Extend { optional, .. } = &body[0] else {
            panic!("expected extend")
        };
        assert!(optional);
    }
}
