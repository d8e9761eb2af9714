//! Statement parsing.

use crate::parser::Parser;
use rsl_lexer::token::TokenKind;
use rsl_types::ast::*;
use rsl_types::ErrorCode;

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Read => self.parse_read_stmt(),
            TokenKind::Write => self.parse_write_stmt(),
            TokenKind::Identifier(_) => self.parse_assign_or_call(),
            _ => {
                self.error_at_current(
                    ErrorCode::EXPECTED_STATEMENT,
                    format!("expected statement, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// Parse the statements of a block until one of `terminators` is seen.
    /// The terminator token is left in the stream.
    fn parse_block(&mut self, terminators: &[TokenKind]) -> Option<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            if self.at_end() {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "unexpected end of file inside block",
                );
                return None;
            }
            if terminators.iter().any(|t| self.check(t)) {
                return Some(stmts);
            }
            if self.too_many_errors() {
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.synchronize();
            }
        }
    }

    /// `ID = expr ;` or `ID ( args ) ;`
    fn parse_assign_or_call(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let name = self.expect_identifier()?;

        if self.check(&TokenKind::LParen) {
            let call = self.parse_call_args(name)?;
            let span = start.merge(self.previous_span());
            self.expect_semi()?;
            return Some(Stmt {
                kind: StmtKind::Call(call),
                span,
            });
        }

        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expression()?;
        let span = start.merge(self.previous_span());
        self.expect_semi()?;
        Some(Stmt {
            kind: StmtKind::Assign {
                target: name,
                value,
            },
            span,
        })
    }

    /// `if expr then stmts [else stmts] endif`
    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `if`
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::Then)?;
        let then_body = self.parse_block(&[TokenKind::Else, TokenKind::EndIf])?;
        let else_body = if self.eat(&TokenKind::Else) {
            Some(self.parse_block(&[TokenKind::EndIf])?)
        } else {
            None
        };
        self.expect(&TokenKind::EndIf)?;
        let span = start.merge(self.previous_span());
        Some(Stmt {
            kind: StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        })
    }

    /// `while expr do stmts endwhile`
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `while`
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::EndWhile])?;
        self.expect(&TokenKind::EndWhile)?;
        let span = start.merge(self.previous_span());
        Some(Stmt {
            kind: StmtKind::While { cond, body },
            span,
        })
    }

    /// `return ;` or `return expr ;`
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `return`
        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = start.merge(self.previous_span());
        self.expect_semi()?;
        Some(Stmt {
            kind: StmtKind::Return(value),
            span,
        })
    }

    /// `read ID ;`
    fn parse_read_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `read`
        let target = self.expect_identifier()?;
        let span = start.merge(self.previous_span());
        self.expect_semi()?;
        Some(Stmt {
            kind: StmtKind::Read(target),
            span,
        })
    }

    /// `write expr ;`
    fn parse_write_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `write`
        let value = self.parse_expression()?;
        let span = start.merge(self.previous_span());
        self.expect_semi()?;
        Some(Stmt {
            kind: StmtKind::Write(value),
            span,
        })
    }
}
