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

//! Property-based tests for the compiler's structural invariants,
//! using proptest for random input generation.

use proptest::prelude::*;

use patito::analyzer::{MemoryManager, StorageClass, Type};
use patito::error::Span;
use patito::lexer::tokenize;
use patito::parser::expressions::ExpressionParser;
use patito::parser::Parser;

// ============================================================================
// Generators
// ============================================================================

/// Random well-formed arithmetic/relational expressions over A, B and
/// integer literals.
fn arb_expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0i64..100).prop_map(|n| n.to_string()),
        Just("A".to_string()),
        Just("B".to_string()),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{} + {}", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{} - {}", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{} * {}", a, b)),
            inner.prop_map(|e| format!("({})", e)),
        ]
    })
}

/// A syntactically valid main body with if/else and do-while nested to
/// the given depth.
fn nested_body(depth: u32) -> String {
    if depth == 0 {
        return "A = 1;".to_string();
    }
    let inner = nested_body(depth - 1);
    format!(
        "if (A > 0) {{ {} }} else {{ {} }}; do {{ {} }} while (A > 0);",
        inner, inner, inner
    )
}

// ============================================================================
// Structural invariants
// ============================================================================

proptest! {
    /// Property: after reducing any well-formed expression, exactly one
    /// operand remains on the stack.
    #[test]
    fn prop_operand_stack_balances(expression in arb_expression()) {
        let (tokens, errors) = tokenize(&expression);
        prop_assert!(errors.is_empty());

        let mut parser = Parser::new(&tokens);
        parser
            .context_mut()
            .declare_variables(
                &[
                    ("A".to_string(), Span::new(0, 0)),
                    ("B".to_string(), Span::new(0, 0)),
                ],
                Type::Int,
            )
            .unwrap();

        parser.parse_expression().unwrap();
        prop_assert_eq!(parser.context().operand_depth(), 1);
    }

    /// Property: the jump stack returns to empty after any nesting depth
    /// of if/else and do-while constructs.
    #[test]
    fn prop_backpatch_stack_balances(depth in 0u32..5) {
        let source = format!(
            "program p; var A : int; main {{ {} }} end;",
            nested_body(depth)
        );
        let (tokens, errors) = tokenize(&source);
        prop_assert!(errors.is_empty());

        let mut parser = Parser::new(&tokens);
        parser.parse().unwrap();
        prop_assert_eq!(parser.context().jump_depth(), 0);
        prop_assert_eq!(parser.context().operand_depth(), 0);
        prop_assert!(parser.context().diagnostics().is_empty());
    }

    /// Property: every pending jump placeholder is resolved in a
    /// syntactically valid program; no -1 targets survive on jumps.
    #[test]
    fn prop_all_jump_targets_resolved(depth in 0u32..5) {
        let source = format!(
            "program p; var A : int; main {{ {} }} end;",
            nested_body(depth)
        );
        let compilation = patito::compile(&source).unwrap();
        prop_assert!(compilation.diagnostics.is_empty());
        for quad in &compilation.ir.quads {
            if quad.op.is_jump() {
                prop_assert!(
                    quad.result >= 0 && (quad.result as usize) <= compilation.ir.quads.len(),
                    "unresolved or wild jump target {} in {}",
                    quad.result,
                    quad
                );
            }
        }
    }

    /// Property: requesting the same constant twice yields the same
    /// address; distinct values of the same type yield distinct addresses.
    #[test]
    fn prop_constant_dedup_idempotent(values in proptest::collection::vec(-500i64..500, 1..40)) {
        let mut memory = MemoryManager::new();
        let mut seen = std::collections::HashMap::new();

        for value in values {
            let text = value.to_string();
            let address = memory.constant_address(&text, Type::Int).unwrap();
            if let Some(&previous) = seen.get(&text) {
                prop_assert_eq!(address, previous);
            } else {
                for (other, &other_address) in &seen {
                    prop_assert_ne!(
                        address, other_address,
                        "constants '{}' and '{}' share an address", text, other
                    );
                }
                seen.insert(text, address);
            }
        }
    }

    /// Property: no two allocations ever share an address, and every
    /// address lands inside its own region.
    #[test]
    fn prop_addresses_disjoint(commands in proptest::collection::vec(0u8..6, 0..100)) {
        use patito::ir::RegionKind;

        let mut memory = MemoryManager::new();
        let mut issued = std::collections::HashSet::new();

        for command in commands {
            let (address, expected_region) = match command {
                0 => (
                    memory.allocate_variable(Type::Int, StorageClass::Global).unwrap(),
                    RegionKind::GlobalInt,
                ),
                1 => (
                    memory.allocate_variable(Type::Float, StorageClass::Local).unwrap(),
                    RegionKind::LocalFloat,
                ),
                2 => (
                    memory.allocate_temp(Type::Int).unwrap(),
                    RegionKind::TempInt,
                ),
                3 => (
                    memory.allocate_temp(Type::Bool).unwrap(),
                    RegionKind::TempBool,
                ),
                4 => (
                    memory.allocate_variable(Type::Str, StorageClass::Global).unwrap(),
                    RegionKind::GlobalStr,
                ),
                _ => (
                    memory.allocate_function_slot().unwrap(),
                    RegionKind::GlobalVoid,
                ),
            };

            prop_assert!(issued.insert(address), "address {} issued twice", address);
            prop_assert_eq!(RegionKind::of_address(address), Some(expected_region));
        }
    }

    /// Property: the compiler neither panics nor loops forever on
    /// arbitrary input; everything surfaces as diagnostics.
    #[test]
    fn prop_compile_tolerates_arbitrary_input(
        source in "[a-zA-Z0-9 +\\-*/(){};:,=<>!\\.\"\n]{0,200}"
    ) {
        // Internal errors are impossible to reach from source text this
        // small; anything else must come back as a Compilation.
        let result = patito::compile(&source);
        prop_assert!(result.is_ok());
    }

    /// Property: compiling the same source twice is deterministic.
    #[test]
    fn prop_compilation_deterministic(expression in arb_expression()) {
        let source = format!(
            "program p; var A, B, C : int; main {{ C = {}; }} end;",
            expression
        );
        let first = patito::compile(&source).unwrap();
        let second = patito::compile(&source).unwrap();
        prop_assert_eq!(first.ir.quads, second.ir.quads);
        prop_assert_eq!(first.ir.regions, second.ir.regions);
        // Constant tables are sorted by address, so they compare directly
        prop_assert_eq!(first.ir.constants, second.ir.constants);
    }
}
