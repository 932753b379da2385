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

//! Intermediate representation for the Patito compiler.
//!
//! The compiler's output is a list of quadruples plus the constant table
//! and per-region allocation counts. This module defines those shapes and
//! the segmented virtual address space shared by the memory manager and
//! the quadruple machine.

pub mod text;

/// Sentinel for an unused quadruple field.
pub const UNUSED: i32 = -1;

/// The thirteen fixed regions of the virtual address space.
///
/// Every region owns a disjoint address range; an address encodes both
/// the scope and the type of whatever lives there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    GlobalInt,
    GlobalFloat,
    GlobalStr,
    /// Function directory slots.
    GlobalVoid,
    LocalInt,
    LocalFloat,
    LocalStr,
    TempInt,
    TempFloat,
    TempBool,
    CteInt,
    CteFloat,
    CteStr,
}

impl RegionKind {
    /// All regions, in canonical order (ascending address ranges).
    pub const ALL: [RegionKind; 13] = [
        RegionKind::GlobalInt,
        RegionKind::GlobalFloat,
        RegionKind::GlobalStr,
        RegionKind::GlobalVoid,
        RegionKind::LocalInt,
        RegionKind::LocalFloat,
        RegionKind::LocalStr,
        RegionKind::TempInt,
        RegionKind::TempFloat,
        RegionKind::TempBool,
        RegionKind::CteInt,
        RegionKind::CteFloat,
        RegionKind::CteStr,
    ];

    /// The inclusive address range of this region.
    pub fn range(self) -> (i32, i32) {
        match self {
            RegionKind::GlobalInt => (1000, 1999),
            RegionKind::GlobalFloat => (2000, 2999),
            RegionKind::GlobalStr => (3000, 3999),
            RegionKind::GlobalVoid => (4000, 6999),
            RegionKind::LocalInt => (7000, 7999),
            RegionKind::LocalFloat => (8000, 8999),
            RegionKind::LocalStr => (9000, 11999),
            RegionKind::TempInt => (12000, 12999),
            RegionKind::TempFloat => (13000, 13999),
            RegionKind::TempBool => (14000, 16999),
            RegionKind::CteInt => (17000, 17999),
            RegionKind::CteFloat => (18000, 18999),
            RegionKind::CteStr => (19000, 19999),
        }
    }

    /// The region name used in the IR text format.
    pub fn name(self) -> &'static str {
        match self {
            RegionKind::GlobalInt => "global_int",
            RegionKind::GlobalFloat => "global_float",
            RegionKind::GlobalStr => "global_str",
            RegionKind::GlobalVoid => "global_void",
            RegionKind::LocalInt => "local_int",
            RegionKind::LocalFloat => "local_float",
            RegionKind::LocalStr => "local_str",
            RegionKind::TempInt => "temp_int",
            RegionKind::TempFloat => "temp_float",
            RegionKind::TempBool => "temp_bool",
            RegionKind::CteInt => "cte_int",
            RegionKind::CteFloat => "cte_float",
            RegionKind::CteStr => "cte_str",
        }
    }

    /// Look up a region by its text-format name.
    pub fn from_name(name: &str) -> Option<RegionKind> {
        RegionKind::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// Find the region an address belongs to.
    pub fn of_address(address: i32) -> Option<RegionKind> {
        RegionKind::ALL.iter().copied().find(|r| {
            let (start, end) = r.range();
            (start..=end).contains(&address)
        })
    }

    /// Number of addresses this region can hand out.
    pub fn capacity(self) -> u32 {
        let (start, end) = self.range();
        (end - start + 1) as u32
    }

    /// Whether this region holds function-local storage.
    ///
    /// Local storage is a single shared pool saved and restored around
    /// calls, not a per-frame allocation.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            RegionKind::LocalInt | RegionKind::LocalFloat | RegionKind::LocalStr
        )
    }
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A quadruple operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Relational
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,

    /// Copy arg1 into the result address.
    Assign,
    /// Arithmetic negation of arg1 into the result address.
    UMinus,

    // Control transfer (result field holds a quadruple index)
    Goto,
    /// Jump when the condition operand is falsy.
    GotoF,
    /// Jump when the condition operand is truthy.
    GotoT,
    /// The leading jump over all function bodies into main.
    GotoMain,

    // Call protocol
    /// Frame setup: snapshot and clear the callee's local memory.
    Era,
    /// Bind one argument value to a parameter address.
    Param,
    /// Push the return address and jump to the function start.
    GoSub,
    /// Restore caller locals and return.
    EndFunc,

    /// Emit the operand's current value.
    Print,
}

impl OpCode {
    /// The mnemonic used in the IR text format.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Add => "+",
            OpCode::Sub => "-",
            OpCode::Mul => "*",
            OpCode::Div => "/",
            OpCode::Less => "<",
            OpCode::Greater => ">",
            OpCode::LessEqual => "<=",
            OpCode::GreaterEqual => ">=",
            OpCode::Equal => "==",
            OpCode::NotEqual => "!=",
            OpCode::Assign => "=",
            OpCode::UMinus => "uminus",
            OpCode::Goto => "goto",
            OpCode::GotoF => "gotof",
            OpCode::GotoT => "gotot",
            OpCode::GotoMain => "gotomain",
            OpCode::Era => "era",
            OpCode::Param => "param",
            OpCode::GoSub => "gosub",
            OpCode::EndFunc => "endfunc",
            OpCode::Print => "print",
        }
    }

    /// Look up an opcode by its text-format mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<OpCode> {
        let all = [
            OpCode::Add,
            OpCode::Sub,
            OpCode::Mul,
            OpCode::Div,
            OpCode::Less,
            OpCode::Greater,
            OpCode::LessEqual,
            OpCode::GreaterEqual,
            OpCode::Equal,
            OpCode::NotEqual,
            OpCode::Assign,
            OpCode::UMinus,
            OpCode::Goto,
            OpCode::GotoF,
            OpCode::GotoT,
            OpCode::GotoMain,
            OpCode::Era,
            OpCode::Param,
            OpCode::GoSub,
            OpCode::EndFunc,
            OpCode::Print,
        ];
        all.into_iter().find(|op| op.mnemonic() == mnemonic)
    }

    /// Whether the result field of this opcode is a quadruple index.
    ///
    /// Jump targets are the fields that must be shifted when the leading
    /// GOTOMAIN is inserted during finalization.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            OpCode::Goto | OpCode::GotoF | OpCode::GotoT | OpCode::GotoMain | OpCode::GoSub
        )
    }

    /// Whether this is one of the four arithmetic opcodes.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div
        )
    }

    /// Whether this is one of the six relational opcodes.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            OpCode::Less
                | OpCode::Greater
                | OpCode::LessEqual
                | OpCode::GreaterEqual
                | OpCode::Equal
                | OpCode::NotEqual
        )
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// One intermediate-code instruction.
///
/// Operand fields hold virtual addresses, a quadruple index for jumps, or
/// [`UNUSED`]. The list is append-only during generation except for
/// backpatching, which rewrites the result field of one quad in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadruple {
    /// Sequence number; equals the quad's index in the final list.
    pub seq: usize,
    /// The operation.
    pub op: OpCode,
    /// First operand address.
    pub left: i32,
    /// Second operand address.
    pub right: i32,
    /// Result address or jump target.
    pub result: i32,
}

impl Quadruple {
    /// Create a new quadruple.
    pub fn new(seq: usize, op: OpCode, left: i32, right: i32, result: i32) -> Self {
        Self {
            seq,
            op,
            left,
            right,
            result,
        }
    }
}

impl std::fmt::Display for Quadruple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.seq, self.op, self.left, self.right, self.result
        )
    }
}

/// The full intermediate program handed from the compiler to the VM.
#[derive(Debug, Clone, PartialEq)]
pub struct IrProgram {
    /// Constant table: (stringified value, address), ascending by address.
    pub constants: Vec<(String, i32)>,
    /// Allocation counts for all thirteen regions, canonical order.
    pub regions: Vec<(RegionKind, u32)>,
    /// The quadruple list.
    pub quads: Vec<Quadruple>,
}
