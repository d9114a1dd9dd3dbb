//! The flat, arena-indexed CSS output tree the evaluator builds and the
//! emitter walks (spec §3.4, §9).
//!
//! Ported from the teacher's DOM arena pattern
//! (`crates/koala-dom/src/lib.rs`'s `NodeId(pub usize)` over a flat
//! `Vec<Node>`): a non-owning integer handle avoids the lifetime
//! entanglement a `Rc<RefCell<Node>>` parent/child graph would need for
//! what is, after evaluation, a purely tree-shaped (not cyclic) structure
//! that just needs cheap append-only construction and linear emission.

use crate::selector::SelectorList;

/// Non-owning handle into a [`CssTree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The tree's implicit root, always present at index 0.
    pub const ROOT: Self = Self(0);
}

/// One CSS declaration, `property: value`, plus whether it carried
/// `!important`.
#[derive(Debug, Clone, PartialEq)]
pub struct CssDeclaration {
    /// Property name.
    pub property: String,
    /// The already-stringified value.
    pub value: String,
    /// `true` if `!important` was present.
    pub important: bool,
}

/// What kind of CSS construct a [`CssNode`] represents.
#[derive(Debug, Clone, PartialEq)]
pub enum CssNodeKind {
    /// The implicit document root; never emitted itself.
    Root,
    /// A style rule with its resolved, extended selector list.
    StyleRule(SelectorList),
    /// A plain declaration inside a style rule.
    Declaration(CssDeclaration),
    /// `@media query { ... }`.
    Media(String),
    /// Any other at-rule (`@font-face`, `@keyframes`, `@supports`, ...).
    AtRule {
        /// At-rule name, without `@`.
        name: String,
        /// Prelude text after the name.
        prelude: String,
    },
    /// A comment preserved verbatim.
    Comment(String),
}

/// One node in the output tree.
#[derive(Debug, Clone)]
pub struct CssNode {
    /// What this node is.
    pub kind: CssNodeKind,
    /// Parent node, `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children, in the order they were appended.
    pub children: Vec<NodeId>,
}

/// An append-only arena of [`CssNode`]s forming the tree the emitter
/// walks to produce CSS text.
#[derive(Debug)]
pub struct CssTree {
    nodes: Vec<CssNode>,
}

impl Default for CssTree {
    fn default() -> Self {
        Self {
            nodes: vec![CssNode {
                kind: CssNodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }
}

impl CssTree {
    /// A tree containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new node as the last child of `parent`, returning its id.
    pub fn append(&mut self, parent: NodeId, kind: CssNodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CssNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Borrow a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &CssNode {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node by id.
    pub fn get_mut(&mut self, id: NodeId) -> &mut CssNode {
        &mut self.nodes[id.0]
    }

    /// Children of `id`, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `true` if `id` has no declaration/rule/at-rule descendants (used to
    /// drop style rules that end up with no emittable properties, which
    /// Sass does after `@extend` resolution leaves an empty rule).
    #[must_use]
    pub fn is_empty_of_content(&self, id: NodeId) -> bool {
        self.children(id).iter().all(|&child| {
            matches!(self.get(child).kind, CssNodeKind::Comment(_)) || self.is_empty_of_content(child)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CssDeclaration, CssNodeKind, CssTree, NodeId};

    #[test]
    fn test_root_has_no_parent() {
        let tree = CssTree::new();
        assert!(tree.get(NodeId::ROOT).parent.is_none());
    }

    #[test]
    fn test_append_links_child_to_parent() {
        let mut tree = CssTree::new();
        let rule = tree.append(NodeId::ROOT, CssNodeKind::Media("screen".into()));
        assert_eq!(tree.children(NodeId::ROOT), &[rule]);
        assert_eq!(tree.get(rule).parent, Some(NodeId::ROOT));
    }

    #[test]
    fn test_is_empty_of_content_true_for_bare_rule() {
        let mut tree = CssTree::new();
        let rule = tree.append(NodeId::ROOT, CssNodeKind::Media("screen".into()));
        assert!(tree.is_empty_of_content(rule));
    }

    #[test]
    fn test_is_empty_of_content_false_with_declaration() {
        let mut tree = CssTree::new();
        let rule = tree.append(NodeId::ROOT, CssNodeKind::Media("screen".into()));
        let _ = tree.append(
            rule,
            CssNodeKind::Declaration(CssDeclaration {
                property: "color".into(),
                value: "red".into(),
                important: false,
            }),
        );
        assert!(!tree.is_empty_of_content(rule));
    }
}
