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

//! Semantic analysis and quadruple generation for the Patito compiler.
//!
//! Patito is a single-pass compiler: the parser fires a semantic action as
//! each grammar production completes, and the actions defined in this
//! module do all the real work — operand/type bookkeeping, symbol
//! directory maintenance, address allocation, and quadruple emission with
//! jump backpatching.
//!
//! # Module Structure
//!
//! - `actions` - the semantic actions invoked by the parser
//! - `cube` - the operator/operand-type compatibility table
//! - `directory` - variable tables and the function directory
//! - `memory` - segmented virtual-address allocation
//! - `operand` - the operand-stack entry type
//! - `types` - the Patito type enum

mod actions;
pub mod cube;
mod directory;
mod memory;
mod operand;
mod types;

pub use directory::{Function, FunctionDirectory, Scope, VarTable, Variable};
pub use memory::{MemoryManager, StorageClass};
pub use operand::Operand;
pub use types::Type;

use crate::error::{CompileError, Diagnostics, ErrorCode, Result, Span};
use crate::ir::{IrProgram, OpCode, Quadruple, UNUSED};

/// The working memory of one compilation.
///
/// Every grammar action mutates this state in place; a fresh instance is
/// created per compilation and nothing is shared. Recoverable problems go
/// into `diagnostics`; methods return `Err` only for internal invariant
/// violations, which abort the compilation.
#[derive(Debug)]
pub struct CompilationContext {
    /// The symbol directory (functions + global variables).
    pub directory: FunctionDirectory,
    /// The address allocator.
    pub memory: MemoryManager,
    /// The quadruple list under construction.
    pub quads: Vec<Quadruple>,
    /// Expression operands, innermost on top.
    operands: Vec<Operand>,
    /// Pending jump quadruple indices and do-while start markers.
    jumps: Vec<usize>,
    /// The scope the parser is currently inside.
    scope: Scope,
    /// Index of main's first quadruple, captured at the `main` keyword.
    main_start: usize,
    /// Collected lexical/syntax/semantic diagnostics.
    diagnostics: Diagnostics,
}

impl CompilationContext {
    /// Create the state for a fresh compilation.
    pub fn new() -> Self {
        Self {
            directory: FunctionDirectory::new(),
            memory: MemoryManager::new(),
            quads: Vec::new(),
            operands: Vec::new(),
            jumps: Vec::new(),
            scope: Scope::Global,
            main_start: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// The scope the parser is currently inside.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub(crate) fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    /// Index the next emitted quadruple will get.
    pub fn next_quad_index(&self) -> usize {
        self.quads.len()
    }

    /// Append a quadruple and return its index.
    pub(crate) fn emit(&mut self, op: OpCode, left: i32, right: i32, result: i32) -> usize {
        let index = self.quads.len();
        self.quads.push(Quadruple::new(index, op, left, right, result));
        index
    }

    /// Rewrite the jump target of an already-emitted quadruple.
    pub(crate) fn backpatch(&mut self, index: usize, target: usize) {
        if let Some(quad) = self.quads.get_mut(index) {
            quad.result = target as i32;
        }
    }

    /// Record a recoverable diagnostic.
    pub fn report(&mut self, error: CompileError) {
        self.diagnostics.push(error);
    }

    /// Record a semantic diagnostic.
    pub(crate) fn semantic_error(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) {
        self.diagnostics.push(CompileError::new(code, message, span));
    }

    pub(crate) fn push_operand(&mut self, operand: Operand) {
        self.operands.push(operand);
    }

    /// Pop the top operand; an empty stack is a generator bug, never a
    /// user error.
    pub(crate) fn pop_operand(&mut self, span: &Span) -> Result<Operand> {
        self.operands.pop().ok_or_else(|| {
            CompileError::new(
                ErrorCode::OperandStackUnderflow,
                "Operand stack underflow while reducing an expression",
                span.clone(),
            )
        })
    }

    /// Pop a pending jump index; an empty stack is a generator bug.
    pub(crate) fn pop_jump(&mut self, span: &Span) -> Result<usize> {
        self.jumps.pop().ok_or_else(|| {
            CompileError::new(
                ErrorCode::JumpStackUnderflow,
                "Jump stack underflow while closing a control construct",
                span.clone(),
            )
        })
    }

    pub(crate) fn push_jump(&mut self, index: usize) {
        self.jumps.push(index);
    }

    pub(crate) fn set_main_start(&mut self, index: usize) {
        self.main_start = index;
    }

    /// Number of operands currently on the expression stack.
    pub fn operand_depth(&self) -> usize {
        self.operands.len()
    }

    /// Number of pending entries on the jump stack.
    pub fn jump_depth(&self) -> usize {
        self.jumps.len()
    }

    /// Drop operands left behind by a construct that failed to parse.
    pub(crate) fn truncate_operands(&mut self, depth: usize) {
        self.operands.truncate(depth);
    }

    /// Drop pending jumps left behind by a construct that failed to parse.
    /// Their placeholders keep the `-1` target, which the VM rejects
    /// instead of executing.
    pub(crate) fn truncate_jumps(&mut self, depth: usize) {
        self.jumps.truncate(depth);
    }

    /// The collected diagnostics.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Build the intermediate program from the current state.
    pub fn ir_program(&self) -> IrProgram {
        IrProgram {
            constants: self.memory.constant_table(),
            regions: self.memory.region_usage(),
            quads: self.quads.clone(),
        }
    }

    /// Tear the context apart into the compilation result pieces.
    pub fn finish(self) -> (IrProgram, FunctionDirectory, Diagnostics) {
        let program = IrProgram {
            constants: self.memory.constant_table(),
            regions: self.memory.region_usage(),
            quads: self.quads,
        };
        (program, self.directory, self.diagnostics)
    }

    /// Insert the leading GOTOMAIN and renumber everything.
    ///
    /// Every jump target recorded so far is an index into the unshifted
    /// list, so each one moves by the same offset as the quads themselves;
    /// unresolved `-1` placeholders (possible after error recovery) are
    /// left alone. The function directory's start quads move too.
    pub fn finalize_program(&mut self) {
        let main_target = (self.main_start + 1) as i32;

        for quad in &mut self.quads {
            if quad.op.is_jump() && quad.result != UNUSED {
                quad.result += 1;
            }
        }

        self.quads
            .insert(0, Quadruple::new(0, OpCode::GotoMain, UNUSED, UNUSED, main_target));

        for (index, quad) in self.quads.iter_mut().enumerate() {
            quad.seq = index;
        }

        self.directory.shift_start_quads();
    }
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new()
    }
}
