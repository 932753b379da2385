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

//! Semantic actions fired by the parser as productions complete.
//!
//! Each action translates one finished construct into operand-stack
//! effects and zero or more quadruples. Semantic problems are recorded
//! and the current construct's emission is skipped; the pass continues.
//! `Err` returns signal generator bugs (stack underflow, exhausted
//! memory) and abort the compilation.

use super::cube;
use super::{CompilationContext, Operand, Scope, StorageClass, Type, Variable};
use crate::error::{ErrorCode, Result, Span};
use crate::ir::{OpCode, UNUSED};

impl CompilationContext {
    // ========================================
    // Operand pushes (factor/varcte reductions)
    // ========================================

    /// A variable reference was reduced.
    pub fn push_variable_operand(&mut self, name: &str, span: &Span) {
        match self.directory.lookup(self.scope(), name) {
            Some(variable) => {
                let operand = Operand::Variable {
                    name: variable.name.clone(),
                    address: variable.address,
                    ty: variable.ty,
                };
                self.push_operand(operand);
            }
            None => {
                self.semantic_error(
                    ErrorCode::UndeclaredVariable,
                    format!("Variable '{}' is not declared", name),
                    span.clone(),
                );
                self.push_operand(Operand::poisoned(name));
            }
        }
    }

    /// An integer literal was reduced.
    pub fn push_int_literal(&mut self, value: i64) -> Result<()> {
        let address = self.memory.constant_address(&value.to_string(), Type::Int)?;
        self.push_operand(Operand::Literal {
            address,
            ty: Type::Int,
        });
        Ok(())
    }

    /// A decimal literal was reduced.
    pub fn push_float_literal(&mut self, value: f64) -> Result<()> {
        let address = self
            .memory
            .constant_address(&value.to_string(), Type::Float)?;
        self.push_operand(Operand::Literal {
            address,
            ty: Type::Float,
        });
        Ok(())
    }

    /// A string literal was reduced inside an expression.
    pub fn push_string_literal(&mut self, value: &str) -> Result<()> {
        let address = self.memory.constant_address(value, Type::Str)?;
        self.push_operand(Operand::Literal {
            address,
            ty: Type::Str,
        });
        Ok(())
    }

    // ========================================
    // Expression operators
    // ========================================

    /// A binary arithmetic or relational production was reduced.
    ///
    /// Pops right then left, consults the cube, allocates a temporary of
    /// the result type and pushes it. On a cube miss the diagnostic is
    /// recorded, no quadruple is emitted, and a poisoned operand keeps
    /// the stack balanced.
    pub fn apply_binary(&mut self, op: OpCode, span: &Span) -> Result<()> {
        let right = self.pop_operand(span)?;
        let left = self.pop_operand(span)?;

        if left.is_poisoned() || right.is_poisoned() {
            // The earlier error is already recorded; do not cascade.
            self.push_operand(Operand::poisoned("<error>"));
            return Ok(());
        }

        match cube::result_type(left.ty(), right.ty(), op) {
            Some(result_ty) => {
                let address = self.memory.allocate_temp(result_ty)?;
                self.emit(op, left.address(), right.address(), address);
                self.push_operand(Operand::Temporary {
                    address,
                    ty: result_ty,
                });
            }
            None => {
                self.semantic_error(
                    ErrorCode::InvalidOperatorForType,
                    format!(
                        "Invalid operation: {} {} {}",
                        left.ty(),
                        op,
                        right.ty()
                    ),
                    span.clone(),
                );
                self.push_operand(Operand::poisoned("<error>"));
            }
        }
        Ok(())
    }

    /// A unary minus was reduced.
    pub fn apply_unary_minus(&mut self, span: &Span) -> Result<()> {
        let operand = self.pop_operand(span)?;

        if operand.is_poisoned() {
            self.push_operand(operand);
            return Ok(());
        }

        if !operand.ty().is_numeric() {
            self.semantic_error(
                ErrorCode::InvalidOperatorForType,
                format!("Cannot negate a value of type {}", operand.ty()),
                span.clone(),
            );
            self.push_operand(Operand::poisoned("<error>"));
            return Ok(());
        }

        let address = self.memory.allocate_temp(operand.ty())?;
        self.emit(OpCode::UMinus, operand.address(), UNUSED, address);
        self.push_operand(Operand::Temporary {
            address,
            ty: operand.ty(),
        });
        Ok(())
    }

    // ========================================
    // Statements
    // ========================================

    /// `id = expr ;` finished.
    ///
    /// Direct assignment demands exact type equality; there is no
    /// implicit numeric coercion here.
    pub fn assign_to(&mut self, name: &str, span: &Span) -> Result<()> {
        let value = self.pop_operand(span)?;

        let variable = match self.directory.lookup(self.scope(), name) {
            Some(variable) => variable.clone(),
            None => {
                self.semantic_error(
                    ErrorCode::UndeclaredVariable,
                    format!("Variable '{}' is not declared", name),
                    span.clone(),
                );
                return Ok(());
            }
        };

        if value.is_poisoned() {
            return Ok(());
        }

        if value.ty() != variable.ty {
            self.semantic_error(
                ErrorCode::TypeMismatch,
                format!(
                    "Cannot assign {} to '{}' of type {}",
                    value.ty(),
                    name,
                    variable.ty
                ),
                span.clone(),
            );
            return Ok(());
        }

        self.emit(OpCode::Assign, value.address(), UNUSED, variable.address);
        Ok(())
    }

    /// A print item that is a string literal.
    pub fn print_string_literal(&mut self, value: &str, _span: &Span) -> Result<()> {
        let address = self.memory.constant_address(value, Type::Str)?;
        self.emit(OpCode::Print, address, UNUSED, UNUSED);
        Ok(())
    }

    /// A print item that is an expression; its operand is on top of the
    /// stack, so popping right after each item keeps the emitted PRINT
    /// quadruples in source order.
    pub fn print_expression(&mut self, span: &Span) -> Result<()> {
        let operand = self.pop_operand(span)?;
        if operand.is_poisoned() {
            return Ok(());
        }
        self.emit(OpCode::Print, operand.address(), UNUSED, UNUSED);
        Ok(())
    }

    // ========================================
    // Conditionals
    // ========================================

    /// The if-condition closed (right before the `{`).
    ///
    /// Emits the pending GOTOF. The placeholder is pushed even when the
    /// condition is not boolean, so the construct stays balanced and the
    /// closing actions behave for every syntactically valid program.
    pub fn begin_if(&mut self, span: &Span) -> Result<()> {
        let condition = self.pop_operand(span)?;
        self.require_boolean(&condition, "if condition", span);

        let index = self.emit(OpCode::GotoF, condition.address(), UNUSED, UNUSED);
        self.push_jump(index);
        Ok(())
    }

    /// An `else` keyword was seen after the if-body.
    ///
    /// Emits the skip-else GOTO, resolves the pending GOTOF to the quad
    /// after it (the else-body start), and leaves the GOTO pending.
    pub fn begin_else(&mut self, span: &Span) -> Result<()> {
        let goto_index = self.emit(OpCode::Goto, UNUSED, UNUSED, UNUSED);
        let gotof_index = self.pop_jump(span)?;
        let else_start = self.next_quad_index();
        self.backpatch(gotof_index, else_start);
        self.push_jump(goto_index);
        Ok(())
    }

    /// The whole conditional closed (with or without an else).
    pub fn end_if(&mut self, span: &Span) -> Result<()> {
        let pending = self.pop_jump(span)?;
        let after = self.next_quad_index();
        self.backpatch(pending, after);
        Ok(())
    }

    // ========================================
    // Do-while
    // ========================================

    /// The `do` keyword was seen; remember where the body starts.
    pub fn begin_do_loop(&mut self) {
        let start = self.next_quad_index();
        self.push_jump(start);
    }

    /// The while-condition closed; emit the back edge.
    pub fn end_do_loop(&mut self, span: &Span) -> Result<()> {
        let condition = self.pop_operand(span)?;
        self.require_boolean(&condition, "do-while condition", span);

        let start = self.pop_jump(span)?;
        self.emit(OpCode::GotoT, condition.address(), UNUSED, start as i32);
        Ok(())
    }

    // ========================================
    // Declarations
    // ========================================

    /// One `var` line closed: declare every listed name with the type.
    pub fn declare_variables(&mut self, names: &[(String, Span)], ty: Type) -> Result<()> {
        let storage = if self.scope.is_global() {
            StorageClass::Global
        } else {
            StorageClass::Local
        };

        for (name, span) in names {
            if self.directory.has_variable(&self.scope, name) {
                self.semantic_error(
                    ErrorCode::VariableAlreadyDeclared,
                    format!(
                        "Variable '{}' is already declared in scope '{}'",
                        name,
                        self.scope.name()
                    ),
                    span.clone(),
                );
                continue;
            }

            let address = self.memory.allocate_variable(ty, storage)?;
            let scope = self.scope.clone();
            self.directory.insert_variable(
                &scope,
                Variable {
                    name: name.clone(),
                    ty,
                    is_param: false,
                    address,
                },
            );
        }
        Ok(())
    }

    // ========================================
    // Functions
    // ========================================

    /// A function header's name was seen; register it and switch scope.
    pub fn begin_function(&mut self, name: &str, span: &Span) -> Result<()> {
        let start_quad = self.next_quad_index();
        let address = self.memory.allocate_function_slot()?;

        if self
            .directory
            .declare_function(name, start_quad, address)
            .is_err()
        {
            self.semantic_error(
                ErrorCode::FunctionAlreadyDeclared,
                format!("Function '{}' is already declared", name),
                span.clone(),
            );
        }

        // Scope switches regardless so the body's declarations and
        // statements resolve against the (first) declaration.
        self.set_scope(Scope::Function(name.to_string()));
        Ok(())
    }

    /// One parameter of the current function's header.
    pub fn declare_parameter(&mut self, name: &str, ty: Type, span: &Span) -> Result<()> {
        if self.directory.has_variable(&self.scope, name) {
            self.semantic_error(
                ErrorCode::VariableAlreadyDeclared,
                format!(
                    "Parameter '{}' is already declared in function '{}'",
                    name,
                    self.scope.name()
                ),
                span.clone(),
            );
            return Ok(());
        }

        let address = self.memory.allocate_variable(ty, StorageClass::Local)?;
        let scope = self.scope.clone();
        self.directory.insert_variable(
            &scope,
            Variable {
                name: name.to_string(),
                ty,
                is_param: true,
                address,
            },
        );
        Ok(())
    }

    /// The function body closed.
    pub fn end_function(&mut self) {
        self.emit(OpCode::EndFunc, UNUSED, UNUSED, UNUSED);
        self.set_scope(Scope::Global);
    }

    /// The `main` keyword was seen; its body starts at the next quad.
    pub fn mark_main_start(&mut self) {
        let index = self.next_quad_index();
        self.set_main_start(index);
    }

    // ========================================
    // Calls
    // ========================================

    /// A call statement closed with `arg_count` argument expressions.
    ///
    /// The arguments sit on the operand stack in push order, so they are
    /// popped and reversed back to call-site order before the positional
    /// checks. On any semantic problem the whole call emits nothing.
    pub fn call_function(&mut self, name: &str, arg_count: usize, span: &Span) -> Result<()> {
        let mut args = Vec::with_capacity(arg_count);
        for _ in 0..arg_count {
            args.push(self.pop_operand(span)?);
        }
        args.reverse();

        let (function_address, start_quad, params) = match self.directory.function(name) {
            Some(function) => {
                let params: Vec<(String, Type, i32)> = function
                    .var_table
                    .iter()
                    .filter(|v| v.is_param)
                    .map(|v| (v.name.clone(), v.ty, v.address))
                    .collect();
                (function.address, function.start_quad, params)
            }
            None => {
                self.semantic_error(
                    ErrorCode::UndefinedFunction,
                    format!("Function '{}' is not declared", name),
                    span.clone(),
                );
                return Ok(());
            }
        };

        if args.len() != params.len() {
            self.semantic_error(
                ErrorCode::WrongNumberOfArguments,
                format!(
                    "Function '{}' expects {} arguments, got {}",
                    name,
                    params.len(),
                    args.len()
                ),
                span.clone(),
            );
            return Ok(());
        }

        for (position, (arg, (param_name, param_ty, _))) in
            args.iter().zip(&params).enumerate()
        {
            if arg.is_poisoned() {
                // The argument expression already produced a diagnostic.
                return Ok(());
            }
            if arg.ty() != *param_ty {
                self.semantic_error(
                    ErrorCode::ArgumentTypeMismatch,
                    format!(
                        "In call to '{}': argument {} is {} but parameter '{}' expects {}",
                        name,
                        position + 1,
                        arg.ty(),
                        param_name,
                        param_ty
                    ),
                    span.clone(),
                );
                return Ok(());
            }
        }

        self.emit(OpCode::Era, function_address, UNUSED, UNUSED);
        for (arg, (_, _, param_address)) in args.iter().zip(&params) {
            self.emit(OpCode::Param, arg.address(), UNUSED, *param_address);
        }
        self.emit(OpCode::GoSub, function_address, UNUSED, start_quad as i32);
        Ok(())
    }

    // ========================================
    // Helpers
    // ========================================

    fn require_boolean(&mut self, operand: &Operand, what: &str, span: &Span) {
        if operand.is_poisoned() {
            return;
        }
        if operand.ty() != cube::condition_type() {
            self.semantic_error(
                ErrorCode::NonBooleanCondition,
                format!("The {} must be boolean, found {}", what, operand.ty()),
                span.clone(),
            );
        }
    }
}
