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

//! The quadruple machine.
//!
//! Executes a compiled [`IrProgram`] on a sparse segmented memory: a
//! single address-to-value map where the address range determines the
//! storage class and the type-appropriate zero of anything read before
//! it is written. The machine owns its memory outright; nothing aliases
//! back into the compiler's state.
//!
//! Calls use one shared local-memory pool rather than per-call frames:
//! ERA snapshots and clears the local range so PARAM bindings land in a
//! fresh context, and ENDFUNC restores the caller's locals.

mod value;

pub use value::Value;

use std::collections::HashMap;

use crate::ir::{IrProgram, OpCode, Quadruple, RegionKind};
use thiserror::Error;

/// Errors raised while loading or executing a program.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("Malformed constant '{value}' for address {address}")]
    MalformedConstant { value: String, address: i32 },

    #[error("ENDFUNC at quad {pc} with an empty call stack")]
    CallStackUnderflow { pc: usize },

    #[error("Invalid jump target {target} at quad {pc}")]
    InvalidJumpTarget { target: i32, pc: usize },

    #[error("Step limit of {limit} exceeded; the program is likely looping forever")]
    StepLimitExceeded { limit: usize },
}

/// The virtual machine state.
#[derive(Debug)]
pub struct Vm {
    /// Sparse virtual memory, address -> current value.
    memory: HashMap<i32, Value>,
    /// Return addresses of active calls.
    call_stack: Vec<usize>,
    /// Saved local-memory snapshots, one per active call.
    local_stack: Vec<HashMap<i32, Value>>,
    /// The program being executed.
    quads: Vec<Quadruple>,
    /// Everything PRINT emitted, in order.
    output: Vec<String>,
    /// Safety cap on executed quadruples.
    step_limit: usize,
}

impl Vm {
    /// Default safety cap on executed quadruples.
    pub const DEFAULT_STEP_LIMIT: usize = 1000;

    /// Load a compiled program: install its constant table and take a
    /// private copy of the quadruple list.
    pub fn load(program: &IrProgram) -> Result<Self, VmError> {
        let mut memory = HashMap::new();

        for (value, address) in &program.constants {
            let parsed = match RegionKind::of_address(*address) {
                Some(RegionKind::CteInt) => {
                    value
                        .parse::<i64>()
                        .map(Value::Int)
                        .map_err(|_| VmError::MalformedConstant {
                            value: value.clone(),
                            address: *address,
                        })?
                }
                Some(RegionKind::CteFloat) => {
                    value
                        .parse::<f64>()
                        .map(Value::Float)
                        .map_err(|_| VmError::MalformedConstant {
                            value: value.clone(),
                            address: *address,
                        })?
                }
                Some(RegionKind::CteStr) => Value::Str(value.clone()),
                _ => {
                    return Err(VmError::MalformedConstant {
                        value: value.clone(),
                        address: *address,
                    })
                }
            };
            memory.insert(*address, parsed);
        }

        Ok(Self {
            memory,
            call_stack: Vec::new(),
            local_stack: Vec::new(),
            quads: program.quads.clone(),
            output: Vec::new(),
            step_limit: Self::DEFAULT_STEP_LIMIT,
        })
    }

    /// Replace the safety step limit.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Run the program from quadruple 0 to completion.
    pub fn run(&mut self) -> Result<(), VmError> {
        let mut pc = 0usize;
        let mut steps = 0usize;

        while pc < self.quads.len() {
            steps += 1;
            if steps > self.step_limit {
                return Err(VmError::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }

            let quad = self.quads[pc].clone();
            match quad.op {
                OpCode::Goto | OpCode::GotoMain => {
                    pc = self.jump_target(quad.result, pc)?;
                    continue;
                }
                OpCode::GotoF => {
                    if !self.read(quad.left).truthy() {
                        pc = self.jump_target(quad.result, pc)?;
                        continue;
                    }
                }
                OpCode::GotoT => {
                    if self.read(quad.left).truthy() {
                        pc = self.jump_target(quad.result, pc)?;
                        continue;
                    }
                }

                OpCode::Assign => {
                    let value = self.read(quad.left);
                    self.write(quad.result, value);
                }
                OpCode::UMinus => {
                    let value = self.read(quad.left).neg();
                    self.write(quad.result, value);
                }

                OpCode::Add
                | OpCode::Sub
                | OpCode::Mul
                | OpCode::Div
                | OpCode::Less
                | OpCode::Greater
                | OpCode::LessEqual
                | OpCode::GreaterEqual
                | OpCode::Equal
                | OpCode::NotEqual => {
                    let left = self.read(quad.left);
                    let right = self.read(quad.right);
                    let result = match quad.op {
                        OpCode::Add => left.add(&right),
                        OpCode::Sub => left.sub(&right),
                        OpCode::Mul => left.mul(&right),
                        OpCode::Div => left.div(&right),
                        OpCode::Less => left.lt(&right),
                        OpCode::Greater => left.gt(&right),
                        OpCode::LessEqual => left.le(&right),
                        OpCode::GreaterEqual => left.ge(&right),
                        OpCode::Equal => left.eq_value(&right),
                        _ => left.ne_value(&right),
                    };
                    self.write(quad.result, result);
                }

                OpCode::Era => {
                    self.push_local_context();
                }
                OpCode::Param => {
                    let value = self.read(quad.left);
                    self.write(quad.result, value);
                }
                OpCode::GoSub => {
                    self.call_stack.push(pc + 1);
                    pc = self.jump_target(quad.result, pc)?;
                    continue;
                }
                OpCode::EndFunc => {
                    let return_address = self
                        .call_stack
                        .pop()
                        .ok_or(VmError::CallStackUnderflow { pc })?;
                    self.pop_local_context();
                    pc = return_address;
                    continue;
                }

                OpCode::Print => {
                    let value = self.read(quad.left);
                    self.output.push(value.to_string());
                }
            }

            pc += 1;
        }

        Ok(())
    }

    /// Everything PRINT emitted so far, in order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Read an address the way the machine does, zero default included.
    pub fn value_at(&self, address: i32) -> Value {
        self.memory
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Self::default_for(address))
    }

    /// The written memory, ascending by address (for final-state dumps).
    pub fn memory_snapshot(&self) -> Vec<(i32, Value)> {
        let mut entries: Vec<(i32, Value)> = self
            .memory
            .iter()
            .map(|(&address, value)| (address, value.clone()))
            .collect();
        entries.sort_by_key(|&(address, _)| address);
        entries
    }

    fn jump_target(&self, target: i32, pc: usize) -> Result<usize, VmError> {
        if target < 0 {
            return Err(VmError::InvalidJumpTarget { target, pc });
        }
        // A target one past the end simply terminates the run loop.
        Ok(target as usize)
    }

    fn read(&self, address: i32) -> Value {
        self.memory
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Self::default_for(address))
    }

    fn write(&mut self, address: i32, value: Value) {
        if address < 0 {
            return;
        }
        self.memory.insert(address, value);
    }

    /// The type-appropriate zero for an uninitialized address.
    fn default_for(address: i32) -> Value {
        match RegionKind::of_address(address) {
            Some(
                RegionKind::GlobalFloat | RegionKind::LocalFloat | RegionKind::TempFloat
                | RegionKind::CteFloat,
            ) => Value::Float(0.0),
            Some(RegionKind::GlobalStr | RegionKind::LocalStr | RegionKind::CteStr) => {
                Value::Str(String::new())
            }
            Some(RegionKind::TempBool) => Value::Bool(false),
            _ => Value::Int(0),
        }
    }

    fn is_local_address(address: i32) -> bool {
        RegionKind::of_address(address)
            .map(|region| region.is_local())
            .unwrap_or(false)
    }

    /// Save and clear the shared local pool for an incoming call.
    fn push_local_context(&mut self) {
        let mut snapshot = HashMap::new();
        self.memory.retain(|&address, value| {
            if Self::is_local_address(address) {
                snapshot.insert(address, value.clone());
                false
            } else {
                true
            }
        });
        self.local_stack.push(snapshot);
    }

    /// Restore the caller's local pool.
    fn pop_local_context(&mut self) {
        if let Some(snapshot) = self.local_stack.pop() {
            self.memory
                .retain(|&address, _| !Self::is_local_address(address));
            self.memory.extend(snapshot);
        }
    }
}
