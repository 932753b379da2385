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

//! The symbol directory: variables per scope and the function table.
//!
//! Patito has exactly two scope levels: the global scope and one local
//! scope per declared function. Name resolution checks the current
//! function's table first and falls back to the globals; there is no
//! further nesting.

use std::collections::HashMap;

use super::types::Type;

/// The scope a grammar action currently runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Function(String),
}

impl Scope {
    /// Whether this is the global scope.
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }

    /// The scope's display name.
    pub fn name(&self) -> &str {
        match self {
            Scope::Global => "global",
            Scope::Function(name) => name,
        }
    }
}

/// A declared variable. Immutable after creation; redeclaration attempts
/// are diagnosed by the caller and the first declaration wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The variable name.
    pub name: String,
    /// The declared type.
    pub ty: Type,
    /// Whether this variable is a function parameter.
    pub is_param: bool,
    /// The assigned virtual address.
    pub address: i32,
}

/// The variable table of one scope.
///
/// Keys are unique; insertion order is preserved because parameter
/// matching at call sites is positional.
#[derive(Debug, Default)]
pub struct VarTable {
    variables: HashMap<String, Variable>,
    order: Vec<String>,
}

impl VarTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable. On a duplicate name the table is left unchanged
    /// and the existing variable is returned as the error.
    pub fn insert(&mut self, variable: Variable) -> Result<(), Variable> {
        if let Some(existing) = self.variables.get(&variable.name) {
            return Err(existing.clone());
        }
        self.order.push(variable.name.clone());
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Check if a name is declared in this table.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterate the variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.order.iter().filter_map(|name| self.variables.get(name))
    }

    /// Number of variables in this table.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A declared function. Patito functions are void-only.
#[derive(Debug)]
pub struct Function {
    /// The function name.
    pub name: String,
    /// Index of the function's first quadruple.
    pub start_quad: usize,
    /// The function's directory slot address (global_void region).
    pub address: i32,
    /// Parameters and local variables.
    pub var_table: VarTable,
    /// Number of parameters.
    pub param_count: usize,
    /// Number of non-parameter locals.
    pub local_count: usize,
}

impl Function {
    /// The parameters in declaration order, for positional matching.
    pub fn params(&self) -> Vec<(&str, Type)> {
        self.var_table
            .iter()
            .filter(|v| v.is_param)
            .map(|v| (v.name.as_str(), v.ty))
            .collect()
    }
}

/// The function directory plus the global variable table. One instance
/// lives for the whole compilation.
#[derive(Debug, Default)]
pub struct FunctionDirectory {
    globals: VarTable,
    functions: HashMap<String, Function>,
    order: Vec<String>,
}

impl FunctionDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function. On a duplicate name the directory is left
    /// unchanged and `Err` is returned; the caller records the diagnostic.
    pub fn declare_function(
        &mut self,
        name: &str,
        start_quad: usize,
        address: i32,
    ) -> Result<(), ()> {
        if self.functions.contains_key(name) {
            return Err(());
        }
        self.order.push(name.to_string());
        self.functions.insert(
            name.to_string(),
            Function {
                name: name.to_string(),
                start_quad,
                address,
                var_table: VarTable::new(),
                param_count: 0,
                local_count: 0,
            },
        );
        Ok(())
    }

    /// Check if a function is declared.
    pub fn function_exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Look up a function.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Whether `name` is declared directly in `scope` (no global fallback).
    pub fn has_variable(&self, scope: &Scope, name: &str) -> bool {
        match scope {
            Scope::Global => self.globals.contains(name),
            Scope::Function(function) => self
                .functions
                .get(function)
                .map(|f| f.var_table.contains(name))
                .unwrap_or(false),
        }
    }

    /// Insert a variable into a scope's table.
    ///
    /// The caller must have checked for redeclaration first; inserts into
    /// an unknown function scope are dropped (that only happens while
    /// recovering from a duplicate function declaration).
    pub fn insert_variable(&mut self, scope: &Scope, variable: Variable) {
        match scope {
            Scope::Global => {
                let _ = self.globals.insert(variable);
            }
            Scope::Function(function) => {
                if let Some(f) = self.functions.get_mut(function) {
                    if variable.is_param {
                        f.param_count += 1;
                    } else {
                        f.local_count += 1;
                    }
                    let _ = f.var_table.insert(variable);
                }
            }
        }
    }

    /// Resolve a variable: the scope's own table first, then the globals.
    pub fn lookup(&self, scope: &Scope, name: &str) -> Option<&Variable> {
        if let Scope::Function(function) = scope {
            if let Some(variable) = self
                .functions
                .get(function)
                .and_then(|f| f.var_table.get(name))
            {
                return Some(variable);
            }
        }
        self.globals.get(name)
    }

    /// The parameters of a function in declaration order.
    pub fn params_of(&self, name: &str) -> Option<Vec<(&str, Type)>> {
        self.functions.get(name).map(|f| f.params())
    }

    /// The global variable table.
    pub fn globals(&self) -> &VarTable {
        &self.globals
    }

    /// Iterate the functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.order.iter().filter_map(|name| self.functions.get(name))
    }

    /// Shift every function's start quadruple by one.
    ///
    /// Called once when the leading GOTOMAIN is inserted and all
    /// quadruple indices move.
    pub fn shift_start_quads(&mut self) {
        for function in self.functions.values_mut() {
            function.start_quad += 1;
        }
    }
}
