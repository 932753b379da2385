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

//! Virtual memory allocation for the compiler.
//!
//! Addresses are handed out from thirteen disjoint regions keyed by
//! scope and type (see [`RegionKind`]). Allocation is a post-increment of
//! the region counter; nothing is ever reclaimed within one compilation.
//! Constants are deduplicated: asking for the same literal twice yields
//! the same address.

use std::collections::HashMap;

use super::types::Type;
use crate::error::{CompileError, ErrorCode, Result, Span};
use crate::ir::RegionKind;

/// Whether a variable lives in global or function-local storage.
///
/// Local storage is one shared pool reused by every function; the VM
/// saves and restores it around calls instead of building real frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Global,
    Local,
}

/// The compiler's address allocator.
#[derive(Debug)]
pub struct MemoryManager {
    /// Next free address per region, indexed parallel to `RegionKind::ALL`.
    counters: [i32; 13],
    /// Constant pool: (region, stringified value) -> address.
    constants: HashMap<(RegionKind, String), i32>,
}

impl MemoryManager {
    /// Create a manager with every counter at its region start.
    pub fn new() -> Self {
        let mut counters = [0; 13];
        for (slot, region) in counters.iter_mut().zip(RegionKind::ALL) {
            *slot = region.range().0;
        }
        Self {
            counters,
            constants: HashMap::new(),
        }
    }

    fn region_index(region: RegionKind) -> usize {
        RegionKind::ALL
            .iter()
            .position(|&r| r == region)
            .unwrap_or(0)
    }

    /// Allocate the next address of a region.
    ///
    /// Running past the region's end is a fatal error, not a silent
    /// collision with the neighboring region.
    pub fn allocate(&mut self, region: RegionKind) -> Result<i32> {
        let index = Self::region_index(region);
        let address = self.counters[index];
        let (_, end) = region.range();
        if address > end {
            return Err(CompileError::new(
                ErrorCode::MemoryRangeExhausted,
                format!(
                    "Memory region {} exhausted ({} addresses)",
                    region,
                    region.capacity()
                ),
                Span::new(0, 0),
            ));
        }
        self.counters[index] = address + 1;
        Ok(address)
    }

    /// Allocate storage for a declared variable.
    pub fn allocate_variable(&mut self, ty: Type, storage: StorageClass) -> Result<i32> {
        let region = match (storage, ty) {
            (StorageClass::Global, Type::Int) => RegionKind::GlobalInt,
            (StorageClass::Global, Type::Float) => RegionKind::GlobalFloat,
            (StorageClass::Global, Type::Str) => RegionKind::GlobalStr,
            (StorageClass::Local, Type::Int) => RegionKind::LocalInt,
            (StorageClass::Local, Type::Float) => RegionKind::LocalFloat,
            (StorageClass::Local, Type::Str) => RegionKind::LocalStr,
            _ => return Err(Self::bad_request(ty, "variable")),
        };
        self.allocate(region)
    }

    /// Allocate a temporary for an expression result.
    pub fn allocate_temp(&mut self, ty: Type) -> Result<i32> {
        let region = match ty {
            Type::Int => RegionKind::TempInt,
            Type::Float => RegionKind::TempFloat,
            Type::Bool => RegionKind::TempBool,
            _ => return Err(Self::bad_request(ty, "temporary")),
        };
        self.allocate(region)
    }

    /// Get the address of a constant, allocating it on first sight.
    ///
    /// Deduplication is by exact stringified value, scoped per region, so
    /// the int `5` and the string `"5"` never share an address.
    pub fn constant_address(&mut self, value: &str, ty: Type) -> Result<i32> {
        let region = match ty {
            Type::Int => RegionKind::CteInt,
            Type::Float => RegionKind::CteFloat,
            Type::Str => RegionKind::CteStr,
            _ => return Err(Self::bad_request(ty, "constant")),
        };

        if let Some(&address) = self.constants.get(&(region, value.to_string())) {
            return Ok(address);
        }

        let address = self.allocate(region)?;
        self.constants.insert((region, value.to_string()), address);
        Ok(address)
    }

    /// Allocate a function directory slot.
    pub fn allocate_function_slot(&mut self) -> Result<i32> {
        self.allocate(RegionKind::GlobalVoid)
    }

    /// Allocation counts for all thirteen regions, canonical order.
    pub fn region_usage(&self) -> Vec<(RegionKind, u32)> {
        RegionKind::ALL
            .iter()
            .map(|&region| {
                let index = Self::region_index(region);
                let used = (self.counters[index] - region.range().0) as u32;
                (region, used)
            })
            .collect()
    }

    /// The constant table, ascending by address.
    pub fn constant_table(&self) -> Vec<(String, i32)> {
        let mut table: Vec<(String, i32)> = self
            .constants
            .iter()
            .map(|((_, value), &address)| (value.clone(), address))
            .collect();
        table.sort_by_key(|&(_, address)| address);
        table
    }

    fn bad_request(ty: Type, what: &str) -> CompileError {
        CompileError::new(
            ErrorCode::InvalidAllocationRequest,
            format!("No memory region can hold a {} of type {}", what, ty),
            Span::new(0, 0),
        )
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_start_at_region_base() {
        let mut memory = MemoryManager::new();
        assert_eq!(
            memory
                .allocate_variable(Type::Int, StorageClass::Global)
                .unwrap(),
            1000
        );
        assert_eq!(
            memory
                .allocate_variable(Type::Int, StorageClass::Global)
                .unwrap(),
            1001
        );
        assert_eq!(
            memory
                .allocate_variable(Type::Float, StorageClass::Global)
                .unwrap(),
            2000
        );
        assert_eq!(
            memory
                .allocate_variable(Type::Int, StorageClass::Local)
                .unwrap(),
            7000
        );
        assert_eq!(
            memory
                .allocate_variable(Type::Str, StorageClass::Local)
                .unwrap(),
            9000
        );
    }

    #[test]
    fn test_temporaries_by_result_type() {
        let mut memory = MemoryManager::new();
        assert_eq!(memory.allocate_temp(Type::Int).unwrap(), 12000);
        assert_eq!(memory.allocate_temp(Type::Float).unwrap(), 13000);
        assert_eq!(memory.allocate_temp(Type::Bool).unwrap(), 14000);
        assert_eq!(memory.allocate_temp(Type::Int).unwrap(), 12001);
    }

    #[test]
    fn test_constant_deduplication() {
        let mut memory = MemoryManager::new();
        let first = memory.constant_address("10", Type::Int).unwrap();
        let second = memory.constant_address("10", Type::Int).unwrap();
        assert_eq!(first, second);

        let other = memory.constant_address("11", Type::Int).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_constant_dedup_is_scoped_per_type() {
        let mut memory = MemoryManager::new();
        let as_int = memory.constant_address("5", Type::Int).unwrap();
        let as_str = memory.constant_address("5", Type::Str).unwrap();
        assert_ne!(as_int, as_str);
        assert_eq!(RegionKind::of_address(as_int), Some(RegionKind::CteInt));
        assert_eq!(RegionKind::of_address(as_str), Some(RegionKind::CteStr));
    }

    #[test]
    fn test_range_exhaustion_is_an_error() {
        let mut memory = MemoryManager::new();
        for _ in 0..RegionKind::TempInt.capacity() {
            memory.allocate_temp(Type::Int).unwrap();
        }
        let overflow = memory.allocate_temp(Type::Int);
        assert!(overflow.is_err());
        assert_eq!(
            overflow.unwrap_err().code,
            ErrorCode::MemoryRangeExhausted
        );
        // The neighboring region is untouched
        assert_eq!(memory.allocate_temp(Type::Float).unwrap(), 13000);
    }

    #[test]
    fn test_no_double_allocation_within_region() {
        let mut memory = MemoryManager::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let address = memory.allocate_temp(Type::Int).unwrap();
            assert!(seen.insert(address), "address {} issued twice", address);
        }
    }

    #[test]
    fn test_region_usage_counts() {
        let mut memory = MemoryManager::new();
        memory
            .allocate_variable(Type::Int, StorageClass::Global)
            .unwrap();
        memory
            .allocate_variable(Type::Int, StorageClass::Global)
            .unwrap();
        memory.constant_address("3.5", Type::Float).unwrap();

        let usage = memory.region_usage();
        assert_eq!(usage.len(), 13);
        let count_of = |kind: RegionKind| {
            usage
                .iter()
                .find(|(region, _)| *region == kind)
                .map(|(_, count)| *count)
                .unwrap()
        };
        assert_eq!(count_of(RegionKind::GlobalInt), 2);
        assert_eq!(count_of(RegionKind::CteFloat), 1);
        assert_eq!(count_of(RegionKind::LocalStr), 0);
    }

    #[test]
    fn test_constant_table_sorted_by_address() {
        let mut memory = MemoryManager::new();
        memory.constant_address("b", Type::Str).unwrap();
        memory.constant_address("7", Type::Int).unwrap();
        memory.constant_address("a", Type::Str).unwrap();

        let table = memory.constant_table();
        let addresses: Vec<i32> = table.iter().map(|&(_, a)| a).collect();
        let mut sorted = addresses.clone();
        sorted.sort_unstable();
        assert_eq!(addresses, sorted);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_bool_variable_is_rejected() {
        let mut memory = MemoryManager::new();
        let result = memory.allocate_variable(Type::Bool, StorageClass::Global);
        assert!(result.is_err());
    }
}
