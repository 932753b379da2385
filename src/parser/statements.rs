// Patito - An educational compiler and quadruple VM for a Pascal-like language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Statement parsing with inline semantic actions.
//!
//! The firing points matter: the if-action runs right after the
//! condition's closing parenthesis, the else-action right after the
//! `else` keyword, and the do-while marker right after `do`, so the
//! jump quadruples land exactly where backpatching expects them.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::error::{CompileError, ErrorCode, Result};
use crate::lexer::Token;

/// Statement-level productions.
pub trait StatementParser {
    /// Dispatch one statement.
    fn parse_statement(&mut self) -> Result<()>;
    /// `Assign := ID "=" Expr ";"`
    fn parse_assignment(&mut self) -> Result<()>;
    /// `Condition := "if" "(" Expr ")" "{" Body "}" ("else" "{" Body "}")? ";"`
    fn parse_condition(&mut self) -> Result<()>;
    /// `Cycle := "do" "{" Body "}" "while" "(" Expr ")" ";"`
    fn parse_cycle(&mut self) -> Result<()>;
    /// `FCall := ID "(" ExprList? ")" ";"`
    fn parse_call(&mut self) -> Result<()>;
    /// `Print := "print" "(" PrintItem ("," PrintItem)* ")" ";"`
    fn parse_print(&mut self) -> Result<()>;
}

impl StatementParser for Parser<'_> {
    fn parse_statement(&mut self) -> Result<()> {
        match self.peek() {
            Some(Token::If) => self.parse_condition(),
            Some(Token::Do) => self.parse_cycle(),
            Some(Token::Print) => self.parse_print(),
            Some(Token::Identifier(_)) => match self.peek_next() {
                Some(Token::LeftParen) => self.parse_call(),
                _ => self.parse_assignment(),
            },
            Some(token) => Err(CompileError::new(
                ErrorCode::ExpectedStatement,
                format!("Unexpected token {} at statement start", token.name()),
                self.current_span(),
            )),
            None => Err(CompileError::new(
                ErrorCode::UnexpectedEndOfFile,
                "Expected a statement, found end of input",
                self.current_span(),
            )),
        }
    }

    fn parse_assignment(&mut self) -> Result<()> {
        let (name, span) = self.expect_identifier("a variable name")?;
        self.expect(Token::Equal)?;
        self.parse_expression()?;
        self.expect(Token::Semicolon)?;
        self.ctx.assign_to(&name, &span)
    }

    fn parse_condition(&mut self) -> Result<()> {
        self.expect(Token::If)?;
        self.expect(Token::LeftParen)?;
        let condition_span = self.current_span();
        self.parse_expression()?;
        self.expect(Token::RightParen)?;

        // The GOTOF goes out before the body opens.
        self.ctx.begin_if(&condition_span)?;

        self.expect(Token::LeftBrace)?;
        self.parse_body()?;
        self.expect(Token::RightBrace)?;

        if self.check(&Token::Else) {
            let else_span = self.current_span();
            self.advance();
            self.ctx.begin_else(&else_span)?;
            self.expect(Token::LeftBrace)?;
            self.parse_body()?;
            self.expect(Token::RightBrace)?;
        }

        let end_span = self.expect(Token::Semicolon)?;
        self.ctx.end_if(&end_span)
    }

    fn parse_cycle(&mut self) -> Result<()> {
        self.expect(Token::Do)?;
        self.ctx.begin_do_loop();

        self.expect(Token::LeftBrace)?;
        self.parse_body()?;
        self.expect(Token::RightBrace)?;

        self.expect(Token::While)?;
        self.expect(Token::LeftParen)?;
        let condition_span = self.current_span();
        self.parse_expression()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;

        self.ctx.end_do_loop(&condition_span)
    }

    fn parse_call(&mut self) -> Result<()> {
        let (name, span) = self.expect_identifier("a function name")?;
        self.expect(Token::LeftParen)?;

        let mut arg_count = 0;
        if !self.check(&Token::RightParen) {
            loop {
                self.parse_expression()?;
                arg_count += 1;
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;
        self.ctx.call_function(&name, arg_count, &span)
    }

    fn parse_print(&mut self) -> Result<()> {
        self.expect(Token::Print)?;
        self.expect(Token::LeftParen)?;

        loop {
            let span = self.current_span();
            // A lone string literal is a direct print item; anything else
            // (including strings inside larger expressions) goes through
            // the expression machinery.
            let lone_string = matches!(self.peek(), Some(Token::String(_)))
                && matches!(
                    self.peek_next(),
                    Some(Token::Comma) | Some(Token::RightParen)
                );

            if lone_string {
                if let Some((Token::String(value), span)) = self.advance() {
                    self.ctx.print_string_literal(&value, &span)?;
                }
            } else {
                self.parse_expression()?;
                self.ctx.print_expression(&span)?;
            }

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(Token::RightParen)?;
        self.expect(Token::Semicolon)?;
        Ok(())
    }
}
