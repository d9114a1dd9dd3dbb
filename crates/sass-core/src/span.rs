//! Source text and span tracking.
//!
//! Every scanned character is addressable through a [`Span`], and every
//! [`Span`] can be traced back to the original file even when it was
//! produced inside a synthetic source such as an interpolated selector or
//! a generated `@at-root` copy.

use std::sync::Arc;

/// Identifies one registered [`Source`] inside a [`SourceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub usize);

/// The origin of a [`Source`]: a real file, or text synthesized during
/// compilation (an interpolated string, a generated selector, the
/// stylesheet handed to `compile_string`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Path as given to the importer, e.g. `"components/_button.scss"`.
    File(String),
    /// Synthetic text with a human-readable label, e.g. `"interpolation"`.
    Synthetic(String),
}

/// Registered source text plus precomputed line-start offsets, so that a
/// byte offset can be mapped to a 1-based (line, column) pair without
/// rescanning the text on every diagnostic.
#[derive(Debug, Clone)]
pub struct Source {
    id: SourceId,
    origin: SourceOrigin,
    text: Arc<str>,
    line_starts: Vec<usize>,
}

impl Source {
    fn new(id: SourceId, origin: SourceOrigin, text: Arc<str>) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            id,
            origin,
            text,
            line_starts,
        }
    }

    /// The id this source was registered under.
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The path or synthetic label this source was registered with.
    #[must_use]
    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// A display-friendly name: the path for a file, or `"<label>"` for
    /// synthetic text.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.origin {
            SourceOrigin::File(path) => path.clone(),
            SourceOrigin::Synthetic(label) => format!("<{label}>"),
        }
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Map a byte offset to a 1-based `(line, column)` pair. Column is
    /// counted in UTF-8 characters, not bytes.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_index];
        let column = self.text[line_start..offset].chars().count() + 1;
        (line_index + 1, column)
    }

    /// The full text of the line containing `offset`, without its trailing
    /// newline. Used to render the `^^^` caret line under a diagnostic.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches(['\n', '\r']))
    }
}

/// A half-open byte range `[start, end)` into one registered [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Which source this span indexes into.
    pub source: SourceId,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

impl Span {
    /// Construct a span. `start` must be `<= end`.
    #[must_use]
    pub fn new(source: SourceId, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { source, start, end }
    }

    /// A zero-width span at `offset`, used for synthetic nodes that have no
    /// real source text (e.g. a built-in function's "call site").
    #[must_use]
    pub fn point(source: SourceId, offset: usize) -> Self {
        Self::new(source, offset, offset)
    }

    /// The smallest span containing both `self` and `other`. Both spans
    /// must belong to the same source.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        debug_assert_eq!(self.source, other.source, "cannot merge spans across sources");
        Self::new(self.source, self.start.min(other.start), self.end.max(other.end))
    }
}

/// Owns every [`Source`] registered during a compile and hands out
/// [`SourceId`]s for them. Interpolated strings and other synthetic text
/// get their own entry here too, so a [`Span`] into them can still be
/// traced back to line/column for diagnostics.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's contents and return its id.
    pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<Arc<str>>) -> SourceId {
        self.add(SourceOrigin::File(path.into()), text)
    }

    /// Register synthesized text (e.g. the result of resolving `#{...}`
    /// inside a selector) under a human-readable label, returning its id.
    pub fn add_synthetic(&mut self, label: impl Into<String>, text: impl Into<Arc<str>>) -> SourceId {
        self.add(SourceOrigin::Synthetic(label.into()), text)
    }

    fn add(&mut self, origin: SourceOrigin, text: impl Into<Arc<str>>) -> SourceId {
        let id = SourceId(self.sources.len());
        self.sources.push(Source::new(id, origin, text.into()));
        id
    }

    /// Look up a previously registered source.
    #[must_use]
    pub fn get(&self, id: SourceId) -> &Source {
        &self.sources[id.0]
    }

    /// Byte offset -> 1-based (line, column) for the source a span belongs to.
    #[must_use]
    pub fn line_col(&self, span: Span) -> (usize, usize) {
        self.get(span.source).line_col(span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::SourceRegistry;

    #[test]
    fn test_line_col_first_line() {
        let mut reg = SourceRegistry::new();
        let id = reg.add_file("a.scss", "abc\ndef\n");
        assert_eq!(reg.get(id).line_col(0), (1, 1));
        assert_eq!(reg.get(id).line_col(2), (1, 3));
    }

    #[test]
    fn test_line_col_second_line() {
        let mut reg = SourceRegistry::new();
        let id = reg.add_file("a.scss", "abc\ndef\n");
        assert_eq!(reg.get(id).line_col(4), (2, 1));
        assert_eq!(reg.get(id).line_col(6), (2, 3));
    }

    #[test]
    fn test_get_line_strips_newline() {
        let mut reg = SourceRegistry::new();
        let id = reg.add_file("a.scss", "abc\ndef\n");
        assert_eq!(reg.get(id).get_line(1), Some("abc"));
        assert_eq!(reg.get(id).get_line(2), Some("def"));
    }

    #[test]
    fn test_synthetic_source_display_name() {
        let mut reg = SourceRegistry::new();
        let id = reg.add_synthetic("interpolation", "foo");
        assert_eq!(reg.get(id).display_name(), "<interpolation>");
    }
}
