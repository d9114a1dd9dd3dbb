//! `@warn`/`@debug`/deprecation event collection with colored terminal rendering.
//!
//! Mirrors the two things a Sass compiler's logger has to do: deduplicate
//! repeated warnings within a single compile, and render a frame-by-frame
//! call stack under each one so the user can find the `@include`/`@import`
//! chain that produced it.

use std::collections::HashSet;

use owo_colors::OwoColorize;

/// One entry of a rendered call stack, e.g. `styles.scss:12:3  in mixin "button"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Path (or synthetic name) of the source the frame is in.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// What kind of callable the frame is inside, e.g. `"mixin"`, `"function"`, `"import"`.
    pub kind: &'static str,
    /// Name of the callable, empty for the root stylesheet frame.
    pub name: String,
}

impl std::fmt::Display for StackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}:{}:{}  root stylesheet", self.path, self.line, self.column)
        } else {
            write!(
                f,
                "{}:{}:{}  in {} `{}`",
                self.path, self.line, self.column, self.kind, self.name
            )
        }
    }
}

/// A single `@warn`, `@debug`, or deprecation-warning event.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// The message text, already interpolated.
    pub message: String,
    /// Call stack at the point the event was raised, innermost frame first.
    pub stack: Vec<StackFrame>,
    /// `true` for deprecation warnings (rendered with a different header).
    pub deprecation: bool,
}

impl LogEvent {
    /// Render this event the way a terminal-attached compiler would: a
    /// colored header, the message, then one indented line per stack frame.
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let header = if self.deprecation {
            "DEPRECATION WARNING"
        } else {
            "WARNING"
        };
        let mut out = if color {
            format!("{}: {}\n", header.yellow().bold(), self.message)
        } else {
            format!("{header}: {}\n", self.message)
        };
        for frame in &self.stack {
            out.push_str("    ");
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out
    }
}

/// Collects warning and debug events during a single compile.
///
/// Unlike a fire-and-forget `warn_once`, this accumulates every event so the
/// caller can inspect them after `compile()` returns (spec §7 requires
/// warnings to travel alongside the result, not just be printed).
#[derive(Debug, Default)]
pub struct Logger {
    warnings: Vec<LogEvent>,
    debug: Vec<LogEvent>,
    seen_deprecations: HashSet<String>,
}

impl Logger {
    /// Create an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `@warn` event.
    pub fn warn(&mut self, message: impl Into<String>, stack: Vec<StackFrame>) {
        self.warnings.push(LogEvent {
            message: message.into(),
            stack,
            deprecation: false,
        });
    }

    /// Record a deprecation warning, deduplicated by message text within
    /// this compile (repeated `@extend` optional-failure or obsolete-syntax
    /// warnings from a loop body would otherwise flood the output).
    pub fn deprecation(&mut self, message: impl Into<String>, stack: Vec<StackFrame>) {
        let message = message.into();
        if self.seen_deprecations.insert(message.clone()) {
            self.warnings.push(LogEvent {
                message,
                stack,
                deprecation: true,
            });
        }
    }

    /// Record a `@debug` event.
    pub fn debug(&mut self, message: impl Into<String>, stack: Vec<StackFrame>) {
        self.debug.push(LogEvent {
            message: message.into(),
            stack,
            deprecation: false,
        });
    }

    /// All `@warn` and deprecation events recorded so far, in emission order.
    #[must_use]
    pub fn warnings(&self) -> &[LogEvent] {
        &self.warnings
    }

    /// All `@debug` events recorded so far, in emission order.
    #[must_use]
    pub fn debug_events(&self) -> &[LogEvent] {
        &self.debug
    }

    /// Render every recorded event to a single string, `@debug` events first
    /// (they print immediately during a real compile, before any trailing
    /// warning summary).
    #[must_use]
    pub fn render_all(&self, color: bool) -> String {
        let mut out = String::new();
        for event in &self.debug {
            out.push_str(&event.render(color));
        }
        for event in &self.warnings {
            out.push_str(&event.render(color));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Logger, StackFrame};

    fn frame(name: &str) -> StackFrame {
        StackFrame {
            path: "input.scss".to_string(),
            line: 3,
            column: 5,
            kind: "mixin",
            name: name.to_string(),
        }
    }

    #[test]
    fn test_warn_records_message_and_stack() {
        let mut logger = Logger::new();
        logger.warn("deprecated color function", vec![frame("button")]);
        assert_eq!(logger.warnings().len(), 1);
        assert_eq!(logger.warnings()[0].message, "deprecated color function");
        assert!(!logger.warnings()[0].deprecation);
    }

    #[test]
    fn test_deprecation_is_deduplicated() {
        let mut logger = Logger::new();
        logger.deprecation("old @extend syntax", vec![frame("a")]);
        logger.deprecation("old @extend syntax", vec![frame("b")]);
        assert_eq!(logger.warnings().len(), 1);
    }

    #[test]
    fn test_debug_and_warn_kept_separate() {
        let mut logger = Logger::new();
        logger.debug("value is 3px", vec![]);
        logger.warn("unitless division", vec![]);
        assert_eq!(logger.debug_events().len(), 1);
        assert_eq!(logger.warnings().len(), 1);
    }

    #[test]
    fn test_render_all_contains_message_text() {
        let mut logger = Logger::new();
        logger.warn("unitless division", vec![frame("double")]);
        let rendered = logger.render_all(false);
        assert!(rendered.contains("unitless division"));
        assert!(rendered.contains("in mixin `double`"));
    }
}
