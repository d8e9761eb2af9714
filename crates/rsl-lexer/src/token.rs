//! Token types for the RSL lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in RSL and [`Token`],
//! which pairs a kind with a source [`Span`].

use rsl_types::Span;
use std::fmt;

/// All reserved identifiers in RSL.
///
/// These cannot be used as user-defined names. The lexer recognises each
/// one and emits a specific keyword token instead of [`TokenKind::Identifier`].
pub const ALL_KEYWORDS: &[&str] = &[
    "func", "endfunc", "if", "then", "else", "endif", "while", "do", "endwhile", "return", "read",
    "write", "true", "false", "not", "and", "or",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the RSL lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the RSL language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Integer literal: `42`
    IntLit(i32),
    /// Float literal (contains a `.`): `3.14`
    FloatLit(f32),
    /// String literal with escapes already processed: `"hello\n"`
    StringLit(String),
    /// `true`
    True,
    /// `false`
    False,

    // ── Identifiers ──────────────────────────────────────────
    /// User-defined identifier: `main`, `rSet`, `my_var`
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    /// `func`
    Func,
    /// `endfunc`
    EndFunc,
    /// `if`
    If,
    /// `then`
    Then,
    /// `else`
    Else,
    /// `endif`
    EndIf,
    /// `while`
    While,
    /// `do`
    Do,
    /// `endwhile`
    EndWhile,
    /// `return`
    Return,
    /// `read`
    Read,
    /// `write`
    Write,
    /// `not`
    Not,
    /// `and`
    And,
    /// `or`
    Or,

    // ── Operators ────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=` (assignment)
    Assign,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `&` (pass-by-reference marker in parameter lists)
    Amp,

    // ── Punctuation ──────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semi,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token kind is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Func
                | Self::EndFunc
                | Self::If
                | Self::Then
                | Self::Else
                | Self::EndIf
                | Self::While
                | Self::Do
                | Self::EndWhile
                | Self::Return
                | Self::Read
                | Self::Write
                | Self::True
                | Self::False
                | Self::Not
                | Self::And
                | Self::Or
        )
    }

    /// Map a keyword spelling to its token kind, if reserved.
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "func" => Self::Func,
            "endfunc" => Self::EndFunc,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "endif" => Self::EndIf,
            "while" => Self::While,
            "do" => Self::Do,
            "endwhile" => Self::EndWhile,
            "return" => Self::Return,
            "read" => Self::Read,
            "write" => Self::Write,
            "true" => Self::True,
            "false" => Self::False,
            "not" => Self::Not,
            "and" => Self::And,
            "or" => Self::Or,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntLit(n) => write!(f, "{n}"),
            Self::FloatLit(n) => write!(f, "{n}"),
            Self::StringLit(_) => write!(f, "string literal"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Func => write!(f, "func"),
            Self::EndFunc => write!(f, "endfunc"),
            Self::If => write!(f, "if"),
            Self::Then => write!(f, "then"),
            Self::Else => write!(f, "else"),
            Self::EndIf => write!(f, "endif"),
            Self::While => write!(f, "while"),
            Self::Do => write!(f, "do"),
            Self::EndWhile => write!(f, "endwhile"),
            Self::Return => write!(f, "return"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Not => write!(f, "not"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Assign => write!(f, "="),
            Self::EqEq => write!(f, "=="),
            Self::BangEq => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEq => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEq => write!(f, ">="),
            Self::Amp => write!(f, "&"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Semi => write!(f, ";"),
            Self::Eof => write!(f, "end of file"),
        }
    }
}
