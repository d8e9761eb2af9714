//! Program and function declaration parsing.

use crate::parser::Parser;
use rsl_lexer::token::TokenKind;
use rsl_types::ast::*;
use rsl_types::ErrorCode;

impl<'src> Parser<'src> {
    /// `Program = Function+`
    pub(crate) fn parse_program(&mut self) -> Option<Program> {
        let start = self.current_span();
        let mut functions = Vec::new();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if self.check(&TokenKind::Func) {
                if let Some(func) = self.parse_function() {
                    functions.push(func);
                } else {
                    self.skip_to_next_function();
                }
            } else {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected 'func', got '{}'", self.peek_kind()),
                );
                self.skip_to_next_function();
            }
        }

        if functions.is_empty() {
            return None;
        }
        let span = start.merge(self.previous_span());
        Some(Program { functions, span })
    }

    /// `Function = "func" ID "(" ParamList? ")" Stmt* "endfunc"`
    fn parse_function(&mut self) -> Option<Function> {
        let start = self.current_span();
        self.advance(); // eat `func`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::EndFunc) {
            if self.at_end() {
                self.error_at(
                    ErrorCode::UNCLOSED_FUNCTION,
                    format!("function '{}' is missing 'endfunc'", name.name),
                    start,
                );
                return None;
            }
            if self.too_many_errors() {
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                body.push(stmt);
            } else {
                self.synchronize();
            }
        }
        self.advance(); // eat `endfunc`

        let span = start.merge(self.previous_span());
        Some(Function {
            name,
            params,
            body,
            span,
        })
    }

    /// `ParamList = Param { "," Param }` where `Param = ["&"] ID`
    fn parse_param_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Some(params);
        }
        loop {
            let start = self.current_span();
            let mode = if self.eat(&TokenKind::Amp) {
                ParamMode::ByRef
            } else {
                ParamMode::ByValue
            };
            let name = self.expect_identifier()?;
            let span = start.merge(self.previous_span());
            params.push(Param { name, mode, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Some(params)
    }

    /// After a failed function, skip forward to the next `func` keyword
    /// (past any stray `endfunc`) so later functions still parse.
    fn skip_to_next_function(&mut self) {
        while !self.at_end() {
            if self.check(&TokenKind::Func) {
                return;
            }
            self.advance();
        }
    }
}
