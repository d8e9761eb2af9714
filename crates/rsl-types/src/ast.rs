//! AST node types for the RSL language.
//!
//! Every node carries a [`Span`] for diagnostics; at runtime only the
//! start line is reported. Literal values are resolved by the parser, so
//! the evaluator never re-parses text.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete RSL program: one or more function declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
    pub span: Span,
}

/// `func name(params) body endfunc`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A declared parameter. `&name` marks pass-by-reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub mode: ParamMode,
    pub span: Span,
}

/// Parameter passing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    ByValue,
    ByRef,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    /// The 1-based source line this statement starts on.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

/// Every statement kind in RSL.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `name = expr;` — first assignment defines the variable.
    Assign { target: Ident, value: Expr },
    /// `if cond then ... else ... endif`
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    /// `while cond do ... endwhile`
    While { cond: Expr, body: Vec<Stmt> },
    /// `return;` or `return expr;`
    Return(Option<Expr>),
    /// `read name;`
    Read(Ident),
    /// `write expr;`
    Write(Expr),
    /// `name(args);` — call with the result discarded.
    Call(Call),
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The 1-based source line this expression starts on.
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

/// Every expression kind in RSL.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: `42`
    IntLit(i32),
    /// Float literal: `3.14`
    FloatLit(f32),
    /// `true` / `false`
    BoolLit(bool),
    /// String literal with escapes already processed.
    StringLit(String),
    /// Variable reference.
    Var(String),
    /// Function call used as an expression — must not return void.
    Call(Call),
    /// Unary operator application.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary operator application.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A function call: callee name plus ordered argument expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+expr` — numeric identity.
    Plus,
    /// `-expr`
    Neg,
    /// `not expr`
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinOp {
    /// Returns `true` for `== != < <= > >=`.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::And => "and",
            Self::Or => "or",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Neg => write!(f, "-"),
            Self::Not => write!(f, "not"),
        }
    }
}
