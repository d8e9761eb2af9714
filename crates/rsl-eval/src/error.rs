//! Runtime errors.
//!
//! Every error raised during execution carries the 1-based source line
//! of the statement or expression that caused it, except for the two
//! load-time errors which refer to whole declarations.

use rsl_types::ast::BinOp;
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// A runtime (or load-time) failure. Execution stops at the first error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("multiple definitions of function '{name}'")]
    DuplicateFunction { name: String },

    #[error("function 'main' is not defined")]
    MissingMain,

    #[error("line {line}: function '{name}' not declared")]
    UnknownFunction { name: String, line: u32 },

    #[error("line {line}: undefined variable '{name}'")]
    UndefinedVariable { name: String, line: u32 },

    #[error("line {line}: incorrect number of parameters calling function '{name}'")]
    ArityMismatch { name: String, line: u32 },

    #[error("line {line}: wrong argument for pass by reference")]
    BadRefArgument { line: u32 },

    #[error("line {line}: incompatible operand types for '{op}' ({left} and {right})")]
    IncompatibleOperands {
        op: BinOp,
        left: &'static str,
        right: &'static str,
        line: u32,
    },

    #[error("line {line}: operator '{op}' is not defined for {type_name} values")]
    UnsupportedOperation {
        op: BinOp,
        type_name: &'static str,
        line: u32,
    },

    #[error("line {line}: expecting Boolean expression, got {found}")]
    ExpectedBool { found: &'static str, line: u32 },

    #[error("line {line}: expecting numerical expression, got {found}")]
    ExpectedNumeric { found: &'static str, line: u32 },

    #[error("line {line}: expecting integer expression, got {found}")]
    ExpectedInt { found: &'static str, line: u32 },

    #[error("line {line}: expecting float argument, got {found}")]
    ExpectedFloat { found: &'static str, line: u32 },

    #[error("line {line}: function '{name}' expected to return a value")]
    VoidResult { name: String, line: u32 },

    #[error("line {line}: division by zero")]
    DivisionByZero { line: u32 },

    #[error("line {line}: robot is not positioned yet")]
    NotPositioned { line: u32 },

    #[error("line {line}: position out of bounds")]
    PositionOutOfBounds { line: u32 },

    #[error("line {line}: obstacle out of bounds")]
    ObstacleOutOfBounds { line: u32 },

    #[error("line {line}: obstacle overlaps with robot")]
    ObstacleOverlapsRobot { line: u32 },

    #[error("line {line}: incorrect sensor number {index}")]
    BadSensorIndex { index: i32, line: u32 },

    #[error("line {line}: no more input to read")]
    InputExhausted { line: u32 },

    #[error("line {line}: I/O error: {message}")]
    Io { message: String, line: u32 },
}

impl EvalError {
    /// The source line the error refers to, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            EvalError::DuplicateFunction { .. } | EvalError::MissingMain => None,
            EvalError::UnknownFunction { line, .. }
            | EvalError::UndefinedVariable { line, .. }
            | EvalError::ArityMismatch { line, .. }
            | EvalError::BadRefArgument { line }
            | EvalError::IncompatibleOperands { line, .. }
            | EvalError::UnsupportedOperation { line, .. }
            | EvalError::ExpectedBool { line, .. }
            | EvalError::ExpectedNumeric { line, .. }
            | EvalError::ExpectedInt { line, .. }
            | EvalError::ExpectedFloat { line, .. }
            | EvalError::VoidResult { line, .. }
            | EvalError::DivisionByZero { line }
            | EvalError::NotPositioned { line }
            | EvalError::PositionOutOfBounds { line }
            | EvalError::ObstacleOutOfBounds { line }
            | EvalError::ObstacleOverlapsRobot { line }
            | EvalError::BadSensorIndex { line, .. }
            | EvalError::InputExhausted { line }
            | EvalError::Io { line, .. } => Some(*line),
        }
    }
}
