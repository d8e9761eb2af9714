use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// Error severity. The front end currently only emits `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lex,
    Syntax,
    Load,
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lex errors (E100–E199) ──
    pub const UNEXPECTED_CHAR: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const BAD_ESCAPE: Self = Self(102);
    pub const BAD_NUMBER: Self = Self(103);

    // ── Syntax errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const EXPECTED_STATEMENT: Self = Self(201);
    pub const EXPECTED_EXPRESSION: Self = Self(202);
    pub const UNCLOSED_FUNCTION: Self = Self(203);

    // ── Load errors (E300–E399) ──
    pub const DUPLICATE_FUNCTION: Self = Self(300);
    pub const MISSING_MAIN: Self = Self(301);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lex,
            200..=299 => ErrorCategory::Syntax,
            _ => ErrorCategory::Load,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured front-end error (lexing, parsing, or program load).
///
/// Runtime errors are a separate type in `rsl-eval`; they abort execution
/// instead of being collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RslError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E200).
    pub code: ErrorCode,
    /// Error severity.
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
}

impl RslError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

impl fmt::Display for RslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file, self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for RslError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "lex"),
            Self::Syntax => write!(f, "syntax"),
            Self::Load => write!(f, "load"),
        }
    }
}

/// Collected front-end errors with a fail-fast cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<RslError>,
    pub total_errors: usize,
}

impl CompileErrors {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
        }
    }

    /// Check if any errors were recorded.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the [`MAX_ERRORS`] storage limit.
    pub fn push_error(&mut self, error: RslError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Absorb another collection (e.g. lexer errors into parser errors).
    pub fn extend(&mut self, other: CompileErrors) {
        let kept = other.errors.len();
        for e in other.errors {
            self.push_error(e);
        }
        // Carry over errors the other collection counted but did not store.
        self.total_errors += other.total_errors.saturating_sub(kept);
    }
}
