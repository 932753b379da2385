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

//! The semantic cube: operator/operand-type compatibility.
//!
//! Rules:
//! - arithmetic on two ints yields int, except division which always
//!   yields float
//! - any int/float mix promotes to float
//! - the six comparison operators on any numeric pair yield bool
//! - strings and bools support no operators at all
//!
//! A lookup miss means the operation is a semantic error; it never panics.

use super::types::Type;
use crate::ir::OpCode;

/// Look up the result type of `left op right`.
///
/// Returns `None` when the combination is not allowed; the caller records
/// the semantic diagnostic.
pub fn result_type(left: Type, right: Type, op: OpCode) -> Option<Type> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }

    if op.is_relational() {
        return Some(Type::Bool);
    }

    if op.is_arithmetic() {
        // Division always produces float, even for int / int.
        if op == OpCode::Div {
            return Some(Type::Float);
        }
        return Some(match (left, right) {
            (Type::Int, Type::Int) => Type::Int,
            _ => Type::Float,
        });
    }

    None
}

/// The type a condition must reduce to.
pub fn condition_type() -> Type {
    Type::Bool
}
