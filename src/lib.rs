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

//! Patito Compiler Library
//!
//! An educational compiler and virtual machine for Patito, a small
//! Pascal-like language with typed variables, void functions, if/else,
//! do-while, calls, and print. Compilation is a single syntax-directed
//! pass that emits quadruples; the VM interprets them on a simulated
//! segmented memory.
//!
//! # Modules
//!
//! - [`error`] - Diagnostics, error codes, and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Recursive descent parsing with inline semantic actions
//! - [`analyzer`] - Symbol directory, type cube, memory manager, and the
//!   quadruple-emitting semantic actions
//! - [`ir`] - Quadruples, memory regions, and the IR text format
//! - [`vm`] - The quadruple machine
//!
//! # Example
//!
//! ```
//! let source = r#"
//! program demo;
//! var A : int;
//! main {
//!     A = 2 + 3;
//!     print(A);
//! } end;
//! "#;
//!
//! let compilation = patito::compile(source).unwrap();
//! assert!(compilation.diagnostics.is_empty());
//!
//! let mut vm = patito::vm::Vm::load(&compilation.ir).unwrap();
//! vm.run().unwrap();
//! assert_eq!(vm.output(), &["5".to_string()]);
//! ```

pub mod analyzer;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod vm;

// Re-export commonly used types
pub use analyzer::{CompilationContext, FunctionDirectory, Type};
pub use error::{format_error, CompileError, Diagnostics, ErrorCode, Result, Span};
pub use ir::{IrProgram, OpCode, Quadruple};
pub use lexer::Token;

/// The version of the Patito compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "Patito";

/// The result of compiling one source text.
///
/// Diagnostics never prevent this struct from being produced; callers
/// decide what to do with a program that has errors. By policy, a
/// program with semantic errors is not executed.
#[derive(Debug)]
pub struct Compilation {
    /// The intermediate program (constants, region counts, quadruples).
    pub ir: IrProgram,
    /// The symbol directory built during the pass.
    pub directory: FunctionDirectory,
    /// Everything collected on the way: lexical, syntax, and semantic.
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Whether the compiled program may be executed.
    pub fn allows_execution(&self) -> bool {
        self.diagnostics.allows_execution()
    }
}

/// Compile Patito source code.
///
/// This is the main entry point: it tokenizes, parses, type-checks, and
/// generates quadruples in one pass. Recoverable problems are collected
/// in the returned [`Compilation`]; `Err` is reserved for internal
/// invariant violations (compiler bugs and exhausted address ranges).
pub fn compile(source: &str) -> Result<Compilation> {
    let (tokens, lexical_errors) = lexer::tokenize(source);

    let mut parser = parser::Parser::new(&tokens);
    parser.parse()?;

    let mut ctx = parser.into_context();
    for error in lexical_errors {
        ctx.report(error);
    }
    ctx.finalize_program();

    let (ir, directory, diagnostics) = ctx.finish();
    Ok(Compilation {
        ir,
        directory,
        diagnostics,
    })
}
