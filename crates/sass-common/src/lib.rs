//! Shared diagnostics infrastructure for the Sass compiler.
//!
//! This crate provides the pieces every stage of `sass-core`'s pipeline
//! (parser, evaluator, emitter) needs to report back to the caller:
//! - **Logger** - collects `@warn`/`@debug`/deprecation events and renders
//!   them with a call-stack trace, the way a Sass implementation's terminal
//!   output does.

pub mod logger;

pub use logger::{LogEvent, Logger, StackFrame};
