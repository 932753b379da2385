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

//! Parser module for the Patito compiler.
//!
//! A recursive-descent parser over the lexer's token stream. Patito is a
//! single-pass compiler, so there is no AST: every completed production
//! immediately fires its semantic action on the [`CompilationContext`],
//! which type-checks, allocates addresses, and emits quadruples.
//!
//! Syntax errors are recorded and recovered from by discarding tokens
//! through the next statement terminator; only internal invariant
//! violations abort the parse.
//!
//! # Module Structure
//!
//! - `expressions` - expression productions (ExpressionParser trait)
//! - `helpers` - token stream navigation and recovery (ParserHelpers trait)
//! - `statements` - statement productions (StatementParser trait)

pub mod expressions;
pub mod helpers;
pub mod statements;

use helpers::ParserHelpers;
use statements::StatementParser;

use crate::analyzer::{CompilationContext, Scope, Type};
use crate::error::{Category, CompileError, ErrorCode, Result, Span};
use crate::lexer::Token;

/// The parser state.
pub struct Parser<'a> {
    /// The token stream to parse.
    pub(crate) tokens: &'a [(Token, Span)],
    /// Current position in the token stream.
    pub(crate) position: usize,
    /// The semantic state the grammar actions mutate.
    pub(crate) ctx: CompilationContext,
}

impl<'a> Parser<'a> {
    /// Create a parser with a fresh compilation context.
    pub fn new(tokens: &'a [(Token, Span)]) -> Self {
        Self {
            tokens,
            position: 0,
            ctx: CompilationContext::new(),
        }
    }

    /// Borrow the compilation context.
    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    /// Borrow the compilation context mutably (e.g. to predeclare
    /// variables when driving expression productions directly).
    pub fn context_mut(&mut self) -> &mut CompilationContext {
        &mut self.ctx
    }

    /// Consume the parser and keep its compilation context.
    pub fn into_context(self) -> CompilationContext {
        self.ctx
    }

    // ========================================
    // Program Parsing
    // ========================================

    /// Parse the whole token stream.
    ///
    /// Recoverable problems end up in the context's diagnostics; only
    /// internal invariant violations are returned as `Err`.
    pub fn parse(&mut self) -> Result<()> {
        if let Err(error) = self.parse_program() {
            if error.category() == Category::Internal {
                return Err(error);
            }
            self.ctx.report(error);
        }
        Ok(())
    }

    /// `Program := "program" ID ";" VarDecls FuncDecls "main" "{" Body "}" "end" ";"`
    fn parse_program(&mut self) -> Result<()> {
        self.expect(Token::Program)?;
        self.expect_identifier("the program name")?;
        self.expect(Token::Semicolon)?;

        self.parse_var_section()?;

        while self.check(&Token::Void) {
            let operand_depth = self.ctx.operand_depth();
            let jump_depth = self.ctx.jump_depth();
            if let Err(error) = self.parse_function_declaration() {
                if error.category() == Category::Internal {
                    return Err(error);
                }
                self.ctx.report(error);
                self.ctx.truncate_operands(operand_depth);
                self.ctx.truncate_jumps(jump_depth);
                self.ctx.set_scope(Scope::Global);
                self.synchronize();
            }
        }

        self.expect(Token::Main)?;
        self.ctx.mark_main_start();
        self.expect(Token::LeftBrace)?;
        self.parse_body()?;
        self.expect(Token::RightBrace)?;
        self.expect(Token::End)?;
        self.expect(Token::Semicolon)?;
        Ok(())
    }

    // ========================================
    // Declarations
    // ========================================

    /// `VarDecls := ("var" IdList ":" Type ";")*`
    ///
    /// One `var` keyword may also introduce several declaration lines,
    /// the way the classic grammar allows:
    /// `var A, B : int; C : float;`
    pub(crate) fn parse_var_section(&mut self) -> Result<()> {
        while self.match_token(&Token::Var) {
            loop {
                self.parse_declaration_line()?;
                // A bare identifier continues the section without a
                // repeated 'var'.
                if !matches!(self.peek(), Some(Token::Identifier(_))) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// One `IdList ":" Type ";"` line.
    fn parse_declaration_line(&mut self) -> Result<()> {
        let mut names = Vec::new();
        loop {
            let (name, span) = self.expect_identifier("a variable name")?;
            names.push((name, span));
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        self.expect(Token::Colon)?;
        let ty = self.parse_type()?;
        self.expect(Token::Semicolon)?;

        self.ctx.declare_variables(&names, ty)
    }

    /// `Type := "int" | "float" | "string"`
    fn parse_type(&mut self) -> Result<Type> {
        match self.peek() {
            Some(Token::Int) => {
                self.advance();
                Ok(Type::Int)
            }
            Some(Token::Float) => {
                self.advance();
                Ok(Type::Float)
            }
            Some(Token::StringType) => {
                self.advance();
                Ok(Type::Str)
            }
            Some(token) => Err(CompileError::new(
                ErrorCode::ExpectedType,
                format!("Expected a type, found {}", token.name()),
                self.current_span(),
            )),
            None => Err(CompileError::new(
                ErrorCode::UnexpectedEndOfFile,
                "Expected a type, found end of input",
                self.current_span(),
            )),
        }
    }

    // ========================================
    // Functions
    // ========================================

    /// `FuncDecl := "void" ID "(" Params? ")" "[" VarDecls "{" Body "}" "]" ";"`
    fn parse_function_declaration(&mut self) -> Result<()> {
        self.expect(Token::Void)?;
        let (name, span) = self.expect_identifier("a function name")?;

        // Registers the function with the next quad as its start and
        // switches the scope before parameters are declared.
        self.ctx.begin_function(&name, &span)?;

        self.expect(Token::LeftParen)?;
        if !self.check(&Token::RightParen) {
            loop {
                let (param, param_span) = self.expect_identifier("a parameter name")?;
                self.expect(Token::Colon)?;
                let ty = self.parse_type()?;
                self.ctx.declare_parameter(&param, ty, &param_span)?;
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RightParen)?;

        self.expect(Token::LeftBracket)?;
        self.parse_var_section()?;
        self.expect(Token::LeftBrace)?;
        self.parse_body()?;
        self.expect(Token::RightBrace)?;
        self.expect(Token::RightBracket)?;
        self.expect(Token::Semicolon)?;

        self.ctx.end_function();
        Ok(())
    }

    // ========================================
    // Bodies
    // ========================================

    /// `Body := Statement*`, up to the enclosing `}`.
    ///
    /// A statement that fails to parse is recorded and skipped; leftover
    /// operands and pending jumps from the broken construct are dropped
    /// so later statements start from a consistent stack.
    pub(crate) fn parse_body(&mut self) -> Result<()> {
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            let operand_depth = self.ctx.operand_depth();
            let jump_depth = self.ctx.jump_depth();
            let position = self.position;

            if let Err(error) = self.parse_statement() {
                if error.category() == Category::Internal {
                    return Err(error);
                }
                self.ctx.report(error);
                self.ctx.truncate_operands(operand_depth);
                self.ctx.truncate_jumps(jump_depth);
                self.synchronize();
                if self.position == position {
                    // Nothing was consumed; force progress.
                    self.advance();
                }
            }
        }
        Ok(())
    }
}

/// Parse a token stream, driving semantic analysis and quadruple
/// generation, and return the finalized compilation context (leading
/// GOTOMAIN inserted, quadruples renumbered).
pub fn parse(tokens: &[(Token, Span)]) -> Result<CompilationContext> {
    let mut parser = Parser::new(tokens);
    parser.parse()?;
    let mut ctx = parser.into_context();
    ctx.finalize_program();
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OpCode;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> CompilationContext {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "lexical errors: {:?}", errors);
        parse(&tokens).unwrap()
    }

    #[test]
    fn test_minimal_program() {
        let ctx = parse_source("program p; main { } end;");
        assert!(ctx.diagnostics().is_empty());
        // Only the leading jump into (empty) main
        assert_eq!(ctx.quads.len(), 1);
        assert_eq!(ctx.quads[0].op, OpCode::GotoMain);
    }

    #[test]
    fn test_global_declarations() {
        let ctx = parse_source("program p; var A, B : int; C : float; main { } end;");
        assert!(ctx.diagnostics().is_empty());
        assert_eq!(ctx.directory.globals().len(), 3);
        assert_eq!(ctx.directory.globals().get("A").unwrap().address, 1000);
        assert_eq!(ctx.directory.globals().get("B").unwrap().address, 1001);
        assert_eq!(ctx.directory.globals().get("C").unwrap().address, 2000);
    }

    #[test]
    fn test_repeated_var_keyword() {
        let ctx = parse_source("program p; var A : int; var B : float; main { } end;");
        assert!(ctx.diagnostics().is_empty());
        assert_eq!(ctx.directory.globals().len(), 2);
    }

    #[test]
    fn test_function_declaration() {
        let ctx = parse_source(
            "program p; void f(x : int) [ var y : float; { y = 2.0; } ]; main { f(1); } end;",
        );
        assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
        let function = ctx.directory.function("f").unwrap();
        assert_eq!(function.param_count, 1);
        assert_eq!(function.local_count, 1);
        assert_eq!(function.params(), vec![("x", Type::Int)]);
    }

    #[test]
    fn test_scenario_a_quads() {
        let ctx = parse_source(
            "program p; var A, B, C : int; main { A = 10; B = 2; C = A + B * 3; } end;",
        );
        assert!(ctx.diagnostics().is_empty());
        let ops: Vec<OpCode> = ctx.quads.iter().map(|q| q.op).collect();
        assert_eq!(
            ops,
            vec![
                OpCode::GotoMain,
                OpCode::Assign,
                OpCode::Assign,
                OpCode::Mul,
                OpCode::Add,
                OpCode::Assign,
            ]
        );
        // B * 3 into an int temp, then A + temp into another
        assert_eq!(ctx.quads[3].result, 12000);
        assert_eq!(ctx.quads[4].left, 1000);
        assert_eq!(ctx.quads[4].right, 12000);
        assert_eq!(ctx.quads[4].result, 12001);
        // Final store into C
        assert_eq!(ctx.quads[5].left, 12001);
        assert_eq!(ctx.quads[5].result, 1002);
    }

    #[test]
    fn test_undeclared_variable_is_semantic_error() {
        let ctx = parse_source("program p; main { X = 1; } end;");
        assert_eq!(ctx.diagnostics().semantic().len(), 1);
        assert_eq!(
            ctx.diagnostics().semantic()[0].code,
            ErrorCode::UndeclaredVariable
        );
    }

    #[test]
    fn test_local_shadows_global() {
        let ctx = parse_source(
            "program p; var x : int; void f() [ var x : float; { x = 1.5; } ]; main { } end;",
        );
        assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
        // The assignment inside f targets the local float at 8000
        let assign = ctx.quads.iter().find(|q| q.op == OpCode::Assign).unwrap();
        assert_eq!(assign.result, 8000);
    }

    #[test]
    fn test_global_visible_inside_function() {
        let ctx = parse_source(
            "program p; var g : int; void f() [ { g = 3; } ]; main { f(); } end;",
        );
        assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
    }

    #[test]
    fn test_syntax_error_recovery_keeps_going() {
        let ctx = parse_source("program p; var A : int; main { A = ; A = 2; } end;");
        assert_eq!(ctx.diagnostics().syntax().len(), 1);
        // The second assignment still produced its quad (plus GOTOMAIN)
        assert!(ctx
            .quads
            .iter()
            .any(|q| q.op == OpCode::Assign && q.left >= 17000));
    }

    #[test]
    fn test_missing_program_header() {
        let (tokens, _) = tokenize("main { } end;");
        let ctx = parse(&tokens).unwrap();
        assert!(!ctx.diagnostics().syntax().is_empty());
    }

    #[test]
    fn test_finalization_adds_gotomain() {
        let ctx = parse_source("program p; var A : int; main { A = 1; } end;");
        assert_eq!(ctx.quads[0].op, OpCode::GotoMain);
        assert_eq!(ctx.quads[0].result, 1);
        let seqs: Vec<usize> = ctx.quads.iter().map(|q| q.seq).collect();
        assert_eq!(seqs, (0..ctx.quads.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_gotomain_skips_function_bodies() {
        let ctx = parse_source(
            "program p; var A : int; void f() [ { A = 9; } ]; main { A = 1; } end;",
        );
        // Function body: assign + endfunc occupy quads 1 and 2 after the shift
        assert_eq!(ctx.quads[0].op, OpCode::GotoMain);
        assert_eq!(ctx.quads[0].result, 3);
        assert_eq!(ctx.quads[3].op, OpCode::Assign);
        // Directory start quad shifted consistently
        assert_eq!(ctx.directory.function("f").unwrap().start_quad, 1);
    }
}
