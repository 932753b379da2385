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

//! Expression parsing with inline semantic actions.
//!
//! The grammar's three precedence levels map to three methods: a
//! comparison of additive expressions, additive over multiplicative,
//! and factors. Each completed production fires its quadruple action
//! immediately; nothing is deferred to a later tree walk.

use super::helpers::ParserHelpers;
use super::Parser;
use crate::error::{CompileError, ErrorCode, Result};
use crate::ir::OpCode;
use crate::lexer::Token;

/// Expression-level productions.
pub trait ExpressionParser {
    /// `Expr := Exp (Comparator Exp)?`
    fn parse_expression(&mut self) -> Result<()>;
    /// `Exp := Term (("+"|"-") Term)*`
    fn parse_exp(&mut self) -> Result<()>;
    /// `Term := Factor (("*"|"/") Factor)*`
    fn parse_term(&mut self) -> Result<()>;
    /// `Factor := "(" Expr ")" | ("+"|"-")? (ID | CTE_INT | CTE_FLOAT | CTE_STRING)`
    fn parse_factor(&mut self) -> Result<()>;
}

impl ExpressionParser for Parser<'_> {
    fn parse_expression(&mut self) -> Result<()> {
        self.parse_exp()?;

        if self.peek().map(Token::is_comparison).unwrap_or(false) {
            let span = self.current_span();
            let op = match self.advance() {
                Some((Token::Less, _)) => OpCode::Less,
                Some((Token::Greater, _)) => OpCode::Greater,
                Some((Token::LessEqual, _)) => OpCode::LessEqual,
                Some((Token::GreaterEqual, _)) => OpCode::GreaterEqual,
                Some((Token::EqualEqual, _)) => OpCode::Equal,
                _ => OpCode::NotEqual,
            };
            self.parse_exp()?;
            self.ctx.apply_binary(op, &span)?;
        }
        Ok(())
    }

    fn parse_exp(&mut self) -> Result<()> {
        self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => OpCode::Add,
                Some(Token::Minus) => OpCode::Sub,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            self.parse_term()?;
            self.ctx.apply_binary(op, &span)?;
        }
        Ok(())
    }

    fn parse_term(&mut self) -> Result<()> {
        self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => OpCode::Mul,
                Some(Token::Slash) => OpCode::Div,
                _ => break,
            };
            let span = self.current_span();
            self.advance();
            self.parse_factor()?;
            self.ctx.apply_binary(op, &span)?;
        }
        Ok(())
    }

    fn parse_factor(&mut self) -> Result<()> {
        if self.match_token(&Token::LeftParen) {
            self.parse_expression()?;
            self.expect(Token::RightParen)?;
            return Ok(());
        }

        // A sign is only allowed directly before an operand.
        let negated = if self.match_token(&Token::Minus) {
            true
        } else {
            // Unary plus is a no-op.
            self.match_token(&Token::Plus);
            false
        };

        // Do not consume the offending token on error; statement-level
        // resynchronization needs to see it.
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::Identifier(name)) => {
                self.advance();
                self.ctx.push_variable_operand(&name, &span);
            }
            Some(Token::Integer(value)) => {
                self.advance();
                self.ctx.push_int_literal(value)?;
            }
            Some(Token::Decimal(value)) => {
                self.advance();
                self.ctx.push_float_literal(value)?;
            }
            Some(Token::String(value)) => {
                self.advance();
                self.ctx.push_string_literal(&value)?;
            }
            Some(token) => {
                return Err(CompileError::new(
                    ErrorCode::UnexpectedToken,
                    format!("Expected an operand, found {}", token.name()),
                    span,
                ));
            }
            None => {
                return Err(CompileError::new(
                    ErrorCode::UnexpectedEndOfFile,
                    "Expected an operand, found end of input",
                    span,
                ));
            }
        }

        if negated {
            self.ctx.apply_unary_minus(&span)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{CompilationContext, Type};
    use crate::error::Span;
    use crate::lexer::tokenize;

    fn parse_expr_with_vars(source: &str, vars: &[(&str, Type)]) -> CompilationContext {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty());
        let mut parser = Parser::new(&tokens);
        for (name, ty) in vars {
            parser
                .ctx
                .declare_variables(&[(name.to_string(), Span::new(0, 0))], *ty)
                .unwrap();
        }
        parser.parse_expression().unwrap();
        parser.into_context()
    }

    #[test]
    fn test_single_operand_leaves_one_entry() {
        let ctx = parse_expr_with_vars("42", &[]);
        assert_eq!(ctx.operand_depth(), 1);
        assert!(ctx.quads.is_empty());
    }

    #[test]
    fn test_precedence_mul_before_add() {
        let ctx = parse_expr_with_vars("1 + 2 * 3", &[]);
        // First quad multiplies, second adds
        assert_eq!(ctx.quads[0].op, OpCode::Mul);
        assert_eq!(ctx.quads[1].op, OpCode::Add);
        assert_eq!(ctx.operand_depth(), 1);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let ctx = parse_expr_with_vars("(1 + 2) * 3", &[]);
        assert_eq!(ctx.quads[0].op, OpCode::Add);
        assert_eq!(ctx.quads[1].op, OpCode::Mul);
    }

    #[test]
    fn test_left_associativity() {
        let ctx = parse_expr_with_vars("a - b - 1", &[("a", Type::Int), ("b", Type::Int)]);
        // (a - b) first, then the result minus 1
        assert_eq!(ctx.quads[0].op, OpCode::Sub);
        assert_eq!(ctx.quads[1].op, OpCode::Sub);
        assert_eq!(ctx.quads[1].left, ctx.quads[0].result);
    }

    #[test]
    fn test_comparison_produces_bool_temp() {
        let ctx = parse_expr_with_vars("a > 2", &[("a", Type::Int)]);
        let last = ctx.quads.last().unwrap();
        assert_eq!(last.op, OpCode::Greater);
        // Bool temporaries live at 14000+
        assert!(last.result >= 14000 && last.result <= 16999);
    }

    #[test]
    fn test_unary_minus_emits_quad() {
        let ctx = parse_expr_with_vars("-a", &[("a", Type::Int)]);
        assert_eq!(ctx.quads[0].op, OpCode::UMinus);
    }

    #[test]
    fn test_unary_plus_is_noop() {
        let ctx = parse_expr_with_vars("+a", &[("a", Type::Int)]);
        assert!(ctx.quads.is_empty());
        assert_eq!(ctx.operand_depth(), 1);
    }

    #[test]
    fn test_missing_operand_is_syntax_error() {
        let (tokens, _) = tokenize("1 + ;");
        let mut parser = Parser::new(&tokens);
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_deeply_nested_expression_balances() {
        let ctx = parse_expr_with_vars("((((1))))", &[]);
        assert_eq!(ctx.operand_depth(), 1);
    }
}
