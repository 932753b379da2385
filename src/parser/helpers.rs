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

//! Token stream navigation and error recovery for the parser.

use super::Parser;
use crate::error::{CompileError, ErrorCode, Result, Span};
use crate::lexer::Token;

/// Navigation and recovery primitives shared by all parser submodules.
pub trait ParserHelpers {
    /// Peek at the current token without advancing.
    fn peek(&self) -> Option<&Token>;
    /// Peek one token ahead of the current one.
    fn peek_next(&self) -> Option<&Token>;
    /// Check whether the current token equals `token`.
    fn check(&self, token: &Token) -> bool;
    /// Consume the current token if it equals `token`.
    fn match_token(&mut self, token: &Token) -> bool;
    /// Consume and return the current token.
    fn advance(&mut self) -> Option<(Token, Span)>;
    /// Whether the whole stream has been consumed.
    fn is_at_end(&self) -> bool;
    /// The span of the current token, or an empty span at the end.
    fn current_span(&self) -> Span;
    /// Consume `expected` or produce a syntax error.
    fn expect(&mut self, expected: Token) -> Result<Span>;
    /// Consume an identifier or produce a syntax error.
    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span)>;
    /// Panic-mode recovery: discard tokens through the next `;`.
    fn synchronize(&mut self);
}

impl ParserHelpers for Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1).map(|(token, _)| token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.position += 1;
            return true;
        }
        false
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let entry = self.tokens.get(self.position).cloned();
        if entry.is_some() {
            self.position += 1;
        }
        entry
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn current_span(&self) -> Span {
        match self.tokens.get(self.position) {
            Some((_, span)) => span.clone(),
            None => self
                .tokens
                .last()
                .map(|(_, span)| Span::new(span.end, span.end))
                .unwrap_or_else(|| Span::new(0, 0)),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span> {
        match self.tokens.get(self.position) {
            Some((token, span)) if *token == expected => {
                let span = span.clone();
                self.position += 1;
                Ok(span)
            }
            Some((token, span)) => Err(CompileError::new(
                ErrorCode::ExpectedToken,
                format!("Expected {}, found {}", expected.name(), token.name()),
                span.clone(),
            )),
            None => Err(CompileError::new(
                ErrorCode::UnexpectedEndOfFile,
                format!("Expected {}, found end of input", expected.name()),
                self.current_span(),
            )),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<(String, Span)> {
        match self.tokens.get(self.position) {
            Some((Token::Identifier(name), span)) => {
                let result = (name.clone(), span.clone());
                self.position += 1;
                Ok(result)
            }
            Some((token, span)) => Err(CompileError::new(
                ErrorCode::ExpectedIdentifier,
                format!("Expected {}, found {}", what, token.name()),
                span.clone(),
            )),
            None => Err(CompileError::new(
                ErrorCode::UnexpectedEndOfFile,
                format!("Expected {}, found end of input", what),
                self.current_span(),
            )),
        }
    }

    fn synchronize(&mut self) {
        while let Some(token) = self.peek() {
            match token {
                Token::Semicolon => {
                    self.position += 1;
                    return;
                }
                // Let the enclosing block close itself.
                Token::RightBrace | Token::RightBracket | Token::End => return,
                _ => {
                    self.position += 1;
                }
            }
        }
    }
}
