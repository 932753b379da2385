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

//! Operands on the expression stack.

use super::types::Type;
use crate::ir::UNUSED;

/// One entry on the operand stack.
///
/// Every variant carries a resolved virtual address and a type, so the
/// quadruple actions never have to look anything up again; the variants
/// exist for error reporting and debugging.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal constant, already placed in the constant table.
    Literal { address: i32, ty: Type },
    /// A declared variable reference.
    Variable {
        name: String,
        address: i32,
        ty: Type,
    },
    /// A compiler temporary holding an intermediate result.
    Temporary { address: i32, ty: Type },
}

impl Operand {
    /// The operand's virtual address.
    pub fn address(&self) -> i32 {
        match self {
            Operand::Literal { address, .. }
            | Operand::Variable { address, .. }
            | Operand::Temporary { address, .. } => *address,
        }
    }

    /// The operand's type.
    pub fn ty(&self) -> Type {
        match self {
            Operand::Literal { ty, .. }
            | Operand::Variable { ty, .. }
            | Operand::Temporary { ty, .. } => *ty,
        }
    }

    /// Whether this operand is poisoned by an earlier semantic error.
    pub fn is_poisoned(&self) -> bool {
        self.ty().is_error()
    }

    /// A poisoned stand-in pushed after a semantic error so the operand
    /// stack stays balanced.
    pub fn poisoned(name: impl Into<String>) -> Self {
        Operand::Variable {
            name: name.into(),
            address: UNUSED,
            ty: Type::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let op = Operand::Temporary {
            address: 12000,
            ty: Type::Int,
        };
        assert_eq!(op.address(), 12000);
        assert_eq!(op.ty(), Type::Int);
        assert!(!op.is_poisoned());
    }

    #[test]
    fn test_poisoned() {
        let op = Operand::poisoned("x");
        assert!(op.is_poisoned());
        assert_eq!(op.address(), UNUSED);
    }
}
