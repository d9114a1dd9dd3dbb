//! The `@import`/`@use`-resolution seam an embedder implements (spec §6.2).
//!
//! `sass-core` never touches the filesystem itself -- every non-plain-CSS
//! import is resolved by asking an [`Importer`] chain for the text, the
//! way the teacher's crate takes a fully-formed `DomTree` rather than
//! fetching HTML itself.

use std::sync::Arc;

/// The result of successfully resolving an import: the canonical URL
/// Sass should report in stack traces, and the stylesheet text itself.
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Canonical identifier for the resolved file, used as its
    /// registered source name (e.g. `"components/_button.scss"`).
    pub canonical_url: String,
    /// The stylesheet's contents.
    pub contents: Arc<str>,
}

/// Resolves `@import`/`@use` targets to source text.
///
/// Implementations typically wrap a filesystem load-path list, an
/// in-memory map (for embedding in a browser/WASM context), or a network
/// fetch; none of that belongs in this crate (spec §1 Non-goals).
pub trait Importer {
    /// Attempt to resolve `url` (as written in the `@import` argument,
    /// relative to `from` if given) to a stylesheet. Returns `None` if
    /// this importer doesn't recognize the URL, letting the next
    /// importer in the chain try.
    fn resolve(&self, url: &str, from: Option<&str>) -> Option<ImportResult>;
}

/// An ordered chain of [`Importer`]s, tried in order until one resolves
/// the URL.
#[derive(Default)]
pub struct ImporterChain {
    importers: Vec<Box<dyn Importer>>,
}

impl ImporterChain {
    /// An empty chain (every `@import` of a non-plain-CSS URL will fail
    /// to resolve).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an importer to the end of the chain.
    pub fn push(&mut self, importer: Box<dyn Importer>) {
        self.importers.push(importer);
    }

    /// Try each importer in order, returning the first successful resolution.
    #[must_use]
    pub fn resolve(&self, url: &str, from: Option<&str>) -> Option<ImportResult> {
        self.importers.iter().find_map(|importer| importer.resolve(url, from))
    }
}

/// A trivial in-memory importer useful for tests and for embedding
/// compilers that already have every partial loaded, keyed by the exact
/// string used in `@import`.
#[derive(Debug, Default)]
pub struct MapImporter {
    files: std::collections::HashMap<String, Arc<str>>,
}

impl MapImporter {
    /// An importer with no files registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a virtual file.
    pub fn add(&mut self, path: impl Into<String>, contents: impl Into<Arc<str>>) {
        let _ = self.files.insert(path.into(), contents.into());
    }
}

impl Importer for MapImporter {
    fn resolve(&self, url: &str, _from: Option<&str>) -> Option<ImportResult> {
        let candidates = partial_candidates(url);
        candidates.into_iter().find_map(|candidate| {
            self.files.get(&candidate).map(|contents| ImportResult {
                canonical_url: candidate.clone(),
                contents: Arc::clone(contents),
            })
        })
    }
}

/// Sass's partial-resolution rule: `@import "button"` can resolve to
/// `button.scss`, `_button.scss`, `button/index.scss`, etc. We cover the
/// common `name`/`_name` + `.scss`/`.sass` cases.
fn partial_candidates(url: &str) -> Vec<String> {
    let (dir, base) = url.rsplit_once('/').map_or(("", url), |(d, b)| (d, b));
    let prefix = if dir.is_empty() { String::new() } else { format!("{dir}/") };
    let mut candidates = vec![url.to_string()];
    for ext in ["scss", "sass"] {
        candidates.push(format!("{prefix}{base}.{ext}"));
        candidates.push(format!("{prefix}_{base}.{ext}"));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::{Importer, MapImporter};

    #[test]
    fn test_map_importer_resolves_partial_prefix() {
        let mut importer = MapImporter::new();
        importer.add("_button.scss", ".btn { color: red; }");
        let result = importer.resolve("button", None).unwrap();
        assert_eq!(result.canonical_url, "_button.scss");
    }

    #[test]
    fn test_map_importer_returns_none_for_unknown() {
        let importer = MapImporter::new();
        assert!(importer.resolve("missing", None).is_none());
    }
}
