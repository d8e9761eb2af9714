//! Shared types for the RSL interpreter.
//!
//! This crate defines the AST node types, source spans, and structured
//! compile errors used by the lexer, parser, and evaluator.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, RslError, Severity, MAX_ERRORS};
pub use span::{SourceFile, Span};
