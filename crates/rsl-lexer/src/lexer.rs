//! Core RSL lexer — converts source text to a token stream.
//!
//! Features:
//! - All RSL tokens (17 reserved words, operators, punctuation, literals)
//! - Single-line comments stripped (`//`)
//! - String escapes `\n`, `\t`, `\"`, `\\` processed in place
//! - Error recovery: collects up to `MAX_ERRORS` errors instead of
//!   stopping at the first

use rsl_types::{CompileErrors, ErrorCode, RslError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The RSL lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`rsl_types::MAX_ERRORS`] errors along the way.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// File name (for errors).
    file_name: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected errors.
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            file_name: &source_file.name,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.errors.total_errors >= rsl_types::MAX_ERRORS {
                break;
            }
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        // Ensure the token stream always ends with Eof
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        self.errors
            .push_error(RslError::new(self.file_name, code, message, span, source_line));
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces, tabs, and newlines. Statements are `;`-terminated,
    /// so newlines carry no structure.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a single-line comment (`// ...`).
    /// Returns `true` if a comment was consumed.
    fn skip_comment(&mut self) -> bool {
        if self.peek() == Some(b'/') && self.peek_at(1) == Some(b'/') {
            while let Some(ch) = self.peek() {
                if ch == b'\n' {
                    break;
                }
                self.advance();
            }
            true
        } else {
            false
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token. Illegal characters are reported and skipped in
    /// place, so arbitrarily long runs of junk stay iterative; once the
    /// error cap is reached the rest of the input is abandoned.
    fn scan_token(&mut self) -> Token {
        loop {
            loop {
                self.skip_whitespace();
                if !self.skip_comment() {
                    break;
                }
            }

            if self.at_end() || self.errors.total_errors >= rsl_types::MAX_ERRORS {
                return Token::new(TokenKind::Eof, self.current_span());
            }

            let start_line = self.line;
            let start_col = self.col;
            let ch = self.advance().unwrap();

            return match ch {
                b'"' => self.scan_string(start_line, start_col),
                b'0'..=b'9' => self.scan_number(start_line, start_col),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start_line, start_col),

                b'+' => Token::new(TokenKind::Plus, self.span_from(start_line, start_col)),
                b'-' => Token::new(TokenKind::Minus, self.span_from(start_line, start_col)),
                b'*' => Token::new(TokenKind::Star, self.span_from(start_line, start_col)),
                b'%' => Token::new(TokenKind::Percent, self.span_from(start_line, start_col)),
                // `//` was handled above, so a bare `/` is division
                b'/' => Token::new(TokenKind::Slash, self.span_from(start_line, start_col)),
                b'&' => Token::new(TokenKind::Amp, self.span_from(start_line, start_col)),
                b'(' => Token::new(TokenKind::LParen, self.span_from(start_line, start_col)),
                b')' => Token::new(TokenKind::RParen, self.span_from(start_line, start_col)),
                b',' => Token::new(TokenKind::Comma, self.span_from(start_line, start_col)),
                b';' => Token::new(TokenKind::Semi, self.span_from(start_line, start_col)),

                b'=' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::EqEq, self.span_from(start_line, start_col))
                    } else {
                        Token::new(TokenKind::Assign, self.span_from(start_line, start_col))
                    }
                }

                b'!' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::BangEq, self.span_from(start_line, start_col))
                    } else {
                        let span = self.span_from(start_line, start_col);
                        self.emit_error(
                            ErrorCode::UNEXPECTED_CHAR,
                            "unexpected character '!' (use 'not' for negation, '!=' for inequality)",
                            span,
                        );
                        continue;
                    }
                }

                b'<' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::LessEq, self.span_from(start_line, start_col))
                    } else {
                        Token::new(TokenKind::Less, self.span_from(start_line, start_col))
                    }
                }

                b'>' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        Token::new(TokenKind::GreaterEq, self.span_from(start_line, start_col))
                    } else {
                        Token::new(TokenKind::Greater, self.span_from(start_line, start_col))
                    }
                }

                other => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHAR,
                        format!("unexpected character '{}'", other as char),
                        span,
                    );
                    continue;
                }
            };
        }
    }

    /// Scan an identifier or keyword. The first character is already consumed.
    fn scan_identifier(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos - 1;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos])
            .expect("identifier bytes are ASCII");
        let span = self.span_from(start_line, start_col);
        match TokenKind::keyword(text) {
            Some(kind) => Token::new(kind, span),
            None => Token::new(TokenKind::Identifier(text.to_string()), span),
        }
    }

    /// Scan an integer or float literal. The first digit is already consumed.
    ///
    /// A literal containing a `.` is a float; otherwise it is an integer.
    fn scan_number(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos - 1;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.advance(); // the dot
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }

        let text = std::str::from_utf8(&self.source[start..self.pos])
            .expect("number bytes are ASCII");
        let span = self.span_from(start_line, start_col);

        if is_float {
            match text.parse::<f32>() {
                Ok(v) => Token::new(TokenKind::FloatLit(v), span),
                Err(_) => {
                    self.emit_error(
                        ErrorCode::BAD_NUMBER,
                        format!("invalid float literal '{text}'"),
                        span,
                    );
                    Token::new(TokenKind::FloatLit(0.0), span)
                }
            }
        } else {
            match text.parse::<i32>() {
                Ok(v) => Token::new(TokenKind::IntLit(v), span),
                Err(_) => {
                    self.emit_error(
                        ErrorCode::BAD_NUMBER,
                        format!("integer literal '{text}' out of range"),
                        span,
                    );
                    Token::new(TokenKind::IntLit(0), span)
                }
            }
        }
    }

    /// Scan a string literal. The opening `"` is already consumed.
    ///
    /// Escapes are resolved here so the parser stores the final text.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Token::new(TokenKind::StringLit(text), span);
                }
                Some(b'"') => {
                    self.advance();
                    let span = self.span_from(start_line, start_col);
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Token::new(TokenKind::StringLit(text), span);
                }
                Some(b'\\') => {
                    self.advance();
                    match self.advance() {
                        Some(b'n') => bytes.push(b'\n'),
                        Some(b't') => bytes.push(b'\t'),
                        Some(b'"') => bytes.push(b'"'),
                        Some(b'\\') => bytes.push(b'\\'),
                        other => {
                            let span = Span::point(self.line, self.col.saturating_sub(2));
                            self.emit_error(
                                ErrorCode::BAD_ESCAPE,
                                match other {
                                    Some(c) => format!("unknown escape '\\{}'", c as char),
                                    None => "incomplete escape at end of file".to_string(),
                                },
                                span,
                            );
                        }
                    }
                }
                Some(_) => {
                    // Multi-byte UTF-8 sequences pass through byte by byte
                    bytes.push(self.advance().unwrap());
                }
            }
        }
    }
}
