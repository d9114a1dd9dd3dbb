//! Lexical environment: variable scopes, and the callable/call-stack
//! bookkeeping the evaluator needs for `@mixin`/`@function`/`@content`
//! (spec §4.5).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Params, Statement};
use crate::span::Span;
use crate::value::Value;

/// One lexical scope. Scopes form a parent chain (captured by closures at
/// definition time) rather than a single stack, so a mixin defined at
/// top level still sees top-level variables when it's `@include`d from
/// deep inside a nested rule.
#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<String, Value>,
    parent: Option<Rc<RefCell<Scope>>>,
}

impl Scope {
    fn child(parent: Rc<RefCell<Scope>>) -> Rc<RefCell<Scope>> {
        Rc::new(RefCell::new(Self {
            variables: HashMap::new(),
            parent: Some(parent),
        }))
    }
}

/// A user-defined `@mixin` or `@function`, bundled with the scope it
/// closed over so it can resolve outer variables when later invoked.
#[derive(Debug, Clone)]
pub struct Callable {
    /// Declared parameters.
    pub params: Params,
    /// Body statements.
    pub body: Vec<Statement>,
    /// Scope the callable was defined in (its closure).
    pub closure: Rc<RefCell<Scope>>,
    /// `true` if this is a `@mixin` that calls `@content`.
    pub accepts_content: bool,
}

/// One frame of the evaluator's call stack, used both for `@content`
/// forwarding and for rendering [`sass_common::Logger`] stack traces.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// What kind of callable this frame is inside: `"mixin"`, `"function"`, `"import"`.
    pub kind: &'static str,
    /// The callable's name.
    pub name: String,
    /// Where the call site is.
    pub call_span: Span,
}

/// The full environment threaded through evaluation: the current variable
/// scope chain, the (flat, non-nested) mixin/function registries, and the
/// call stack.
///
/// Mixins and functions live in a single flat namespace per spec's
/// simplified module model: `@use`-style namespacing is parsed (callers
/// may write `namespace.$var` / `namespace.fn()`) but resolved by ignoring
/// the namespace and looking the bare name up in the same registry,
/// since this repo does not implement a multi-module loader.
#[derive(Debug)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
    global: Rc<RefCell<Scope>>,
    mixins: HashMap<String, Rc<Callable>>,
    functions: HashMap<String, Rc<Callable>>,
    call_stack: Vec<CallFrame>,
}

impl Default for Environment {
    fn default() -> Self {
        let global = Rc::new(RefCell::new(Scope::default()));
        Self {
            scope: Rc::clone(&global),
            global,
            mixins: HashMap::new(),
            functions: HashMap::new(),
            call_stack: Vec::new(),
        }
    }
}

impl Environment {
    /// A fresh environment with only the global scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable by name, searching from the current scope
    /// outward through its closure chain.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        let mut current = Some(Rc::clone(&self.scope));
        while let Some(scope) = current {
            let scope_ref = scope.borrow();
            if let Some(value) = scope_ref.variables.get(name) {
                return Some(value.clone());
            }
            current = scope_ref.parent.clone();
        }
        None
    }

    /// Declare or overwrite a variable in the current scope.
    pub fn set_local(&self, name: impl Into<String>, value: Value) {
        let _ = self.scope.borrow_mut().variables.insert(name.into(), value);
    }

    /// Assign to a variable, per `!global` or ordinary-assignment rules:
    /// if an existing binding is found anywhere in the chain, overwrite it
    /// there; otherwise declare it in the current scope (or the global
    /// scope if `global` is set).
    pub fn set_variable(&self, name: &str, value: Value, global: bool) {
        if global {
            let _ = self.global.borrow_mut().variables.insert(name.to_string(), value);
            return;
        }
        let mut current = Some(Rc::clone(&self.scope));
        while let Some(scope) = current {
            let mut scope_mut = scope.borrow_mut();
            if scope_mut.variables.contains_key(name) {
                let _ = scope_mut.variables.insert(name.to_string(), value);
                return;
            }
            current = scope_mut.parent.clone();
        }
        let _ = self.scope.borrow_mut().variables.insert(name.to_string(), value);
    }

    /// `!default`: assign only if the variable is currently unset or `null`.
    pub fn set_default(&self, name: &str, value: Value, global: bool) {
        let existing = self.get_variable(name);
        if existing.is_none() || existing == Some(Value::Null) {
            self.set_variable(name, value, global);
        }
    }

    /// Run `f` with a fresh child scope pushed, restoring the previous
    /// scope afterward regardless of whether `f` returns `Ok`/`Err`.
    pub fn with_new_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.push_new_scope();
        let result = f(self);
        self.pop_scope(saved);
        result
    }

    /// Run `f` with the scope temporarily switched to `closure` (used to
    /// invoke a callable in the scope it was defined in, not the scope it
    /// was called from), itself wrapped in one more child scope for the
    /// call's own locals.
    pub fn with_closure_scope<T>(&mut self, closure: &Rc<RefCell<Scope>>, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.push_closure_scope(closure);
        let result = f(self);
        self.pop_scope(saved);
        result
    }

    /// Push a fresh child of the current scope, returning a handle that
    /// [`pop_scope`](Self::pop_scope) restores. Exists alongside
    /// [`with_new_scope`](Self::with_new_scope) for callers (like the
    /// evaluator) that can't hand their whole state through a closure
    /// because they need `&mut self` for more than just the environment.
    pub fn push_new_scope(&mut self) -> Rc<RefCell<Scope>> {
        let saved = Rc::clone(&self.scope);
        self.scope = Scope::child(Rc::clone(&saved));
        saved
    }

    /// Push a fresh child of `closure`, detached from the current scope
    /// chain. See [`push_new_scope`](Self::push_new_scope).
    pub fn push_closure_scope(&mut self, closure: &Rc<RefCell<Scope>>) -> Rc<RefCell<Scope>> {
        let saved = Rc::clone(&self.scope);
        self.scope = Scope::child(Rc::clone(closure));
        saved
    }

    /// Restore a scope handle previously returned by
    /// [`push_new_scope`](Self::push_new_scope)/[`push_closure_scope`](Self::push_closure_scope).
    pub fn pop_scope(&mut self, saved: Rc<RefCell<Scope>>) {
        self.scope = saved;
    }

    /// A handle to the current scope, for a callable definition to close over.
    #[must_use]
    pub fn current_scope(&self) -> Rc<RefCell<Scope>> {
        Rc::clone(&self.scope)
    }

    /// Register a `@mixin` definition.
    pub fn define_mixin(&mut self, name: impl Into<String>, callable: Callable) {
        let _ = self.mixins.insert(name.into(), Rc::new(callable));
    }

    /// Register a `@function` definition.
    pub fn define_function(&mut self, name: impl Into<String>, callable: Callable) {
        let _ = self.functions.insert(name.into(), Rc::new(callable));
    }

    /// Look up a user-defined mixin by name (namespace ignored, see struct docs).
    #[must_use]
    pub fn get_mixin(&self, name: &str) -> Option<Rc<Callable>> {
        self.mixins.get(name).cloned()
    }

    /// Look up a user-defined function by name (namespace ignored, see struct docs).
    #[must_use]
    pub fn get_function(&self, name: &str) -> Option<Rc<Callable>> {
        self.functions.get(name).cloned()
    }

    /// Push a call frame (entering a mixin/function/import).
    pub fn push_frame(&mut self, frame: CallFrame) {
        self.call_stack.push(frame);
    }

    /// Pop the most recent call frame.
    pub fn pop_frame(&mut self) {
        let _ = self.call_stack.pop();
    }

    /// The current call stack, innermost frame last.
    #[must_use]
    pub fn call_stack(&self) -> &[CallFrame] {
        &self.call_stack
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::value::{SassNumber, Value};

    #[test]
    fn test_set_and_get_local() {
        let env = Environment::new();
        env.set_local("x", Value::Number(SassNumber::unitless(1.0)));
        assert_eq!(env.get_variable("x"), Some(Value::Number(SassNumber::unitless(1.0))));
    }

    #[test]
    fn test_child_scope_sees_parent_variable() {
        let mut env = Environment::new();
        env.set_local("x", Value::Number(SassNumber::unitless(1.0)));
        env.with_new_scope(|inner| {
            assert_eq!(inner.get_variable("x"), Some(Value::Number(SassNumber::unitless(1.0))));
        });
    }

    #[test]
    fn test_assignment_in_child_scope_updates_parent_binding() {
        let mut env = Environment::new();
        env.set_local("x", Value::Number(SassNumber::unitless(1.0)));
        env.with_new_scope(|inner| {
            inner.set_variable("x", Value::Number(SassNumber::unitless(2.0)), false);
        });
        assert_eq!(env.get_variable("x"), Some(Value::Number(SassNumber::unitless(2.0))));
    }

    #[test]
    fn test_default_does_not_overwrite_existing() {
        let env = Environment::new();
        env.set_local("x", Value::Number(SassNumber::unitless(1.0)));
        env.set_default("x", Value::Number(SassNumber::unitless(2.0)), false);
        assert_eq!(env.get_variable("x"), Some(Value::Number(SassNumber::unitless(1.0))));
    }

    #[test]
    fn test_child_scope_restored_after_with_new_scope() {
        let mut env = Environment::new();
        env.with_new_scope(|inner| {
            inner.set_local("y", Value::Number(SassNumber::unitless(5.0)));
        });
        assert_eq!(env.get_variable("y"), None);
    }
}
