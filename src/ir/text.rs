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

//! The IR text format.
//!
//! Three newline-separated sections, separated by one blank line each:
//!
//! 1. constants — one `<value> <address>` per line; the value may contain
//!    spaces, so the address is parsed from the right
//! 2. memory regions — one `<region> <count>` per line for all 13 regions
//! 3. quadruples — one `<seq> <op> <arg1> <arg2> <dest>` per line, with
//!    `-1` as the unused sentinel
//!
//! [`serialize`] and [`parse`] round-trip exactly.

use super::{IrProgram, OpCode, Quadruple, RegionKind};
use thiserror::Error;

/// Errors produced while loading the IR text format.
#[derive(Debug, Error)]
pub enum IrTextError {
    #[error("IR text is missing a section (expected constants, regions, quadruples)")]
    MissingSection,

    #[error("Malformed constant line {line}: '{content}'")]
    BadConstantLine { line: usize, content: String },

    #[error("Constant address {address} is outside every constant region")]
    BadConstantAddress { address: i32 },

    #[error("Malformed region line {line}: '{content}'")]
    BadRegionLine { line: usize, content: String },

    #[error("Unknown memory region '{name}'")]
    UnknownRegion { name: String },

    #[error("Malformed quadruple line {line}: '{content}'")]
    BadQuadLine { line: usize, content: String },

    #[error("Unknown opcode '{mnemonic}'")]
    UnknownOpcode { mnemonic: String },
}

/// Serialize an IR program to the text format.
pub fn serialize(program: &IrProgram) -> String {
    let constants = program
        .constants
        .iter()
        .map(|(value, address)| format!("{} {}", value, address))
        .collect::<Vec<_>>()
        .join("\n");

    let regions = program
        .regions
        .iter()
        .map(|(region, count)| format!("{} {}", region.name(), count))
        .collect::<Vec<_>>()
        .join("\n");

    let quads = program
        .quads
        .iter()
        .map(|quad| quad.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{}\n\n{}", constants, regions, quads)
}

/// Parse the text format back into an IR program.
pub fn parse(text: &str) -> Result<IrProgram, IrTextError> {
    let mut sections = text.trim_end_matches('\n').splitn(3, "\n\n");
    let constants_text = sections.next().ok_or(IrTextError::MissingSection)?;
    let regions_text = sections.next().ok_or(IrTextError::MissingSection)?;
    let quads_text = sections.next().ok_or(IrTextError::MissingSection)?;

    Ok(IrProgram {
        constants: parse_constants(constants_text)?,
        regions: parse_regions(regions_text)?,
        quads: parse_quads(quads_text)?,
    })
}

fn parse_constants(section: &str) -> Result<Vec<(String, i32)>, IrTextError> {
    let mut constants = Vec::new();
    for (index, line) in section.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        // The value may contain spaces; the address never does.
        let (value, address) =
            line.rsplit_once(' ')
                .ok_or_else(|| IrTextError::BadConstantLine {
                    line: index + 1,
                    content: line.to_string(),
                })?;
        let address: i32 = address
            .parse()
            .map_err(|_| IrTextError::BadConstantLine {
                line: index + 1,
                content: line.to_string(),
            })?;
        match RegionKind::of_address(address) {
            Some(region)
                if matches!(
                    region,
                    RegionKind::CteInt | RegionKind::CteFloat | RegionKind::CteStr
                ) => {}
            _ => return Err(IrTextError::BadConstantAddress { address }),
        }
        constants.push((value.to_string(), address));
    }
    Ok(constants)
}

fn parse_regions(section: &str) -> Result<Vec<(RegionKind, u32)>, IrTextError> {
    let mut regions = Vec::new();
    for (index, line) in section.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (name, count) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(count), None) => (name, count),
            _ => {
                return Err(IrTextError::BadRegionLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        };
        let region = RegionKind::from_name(name).ok_or_else(|| IrTextError::UnknownRegion {
            name: name.to_string(),
        })?;
        let count: u32 = count.parse().map_err(|_| IrTextError::BadRegionLine {
            line: index + 1,
            content: line.to_string(),
        })?;
        regions.push((region, count));
    }
    Ok(regions)
}

fn parse_quads(section: &str) -> Result<Vec<Quadruple>, IrTextError> {
    let mut quads = Vec::new();
    for (index, line) in section.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let bad_line = || IrTextError::BadQuadLine {
            line: index + 1,
            content: line.to_string(),
        };
        if parts.len() != 5 {
            return Err(bad_line());
        }

        let seq: usize = parts[0].parse().map_err(|_| bad_line())?;
        let op = OpCode::from_mnemonic(parts[1]).ok_or_else(|| IrTextError::UnknownOpcode {
            mnemonic: parts[1].to_string(),
        })?;
        let left: i32 = parts[2].parse().map_err(|_| bad_line())?;
        let right: i32 = parts[3].parse().map_err(|_| bad_line())?;
        let result: i32 = parts[4].parse().map_err(|_| bad_line())?;

        quads.push(Quadruple::new(seq, op, left, right, result));
    }
    Ok(quads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::UNUSED;
    use pretty_assertions::assert_eq;

    fn all_regions(counts: &[(RegionKind, u32)]) -> Vec<(RegionKind, u32)> {
        RegionKind::ALL
            .iter()
            .map(|&r| {
                let count = counts
                    .iter()
                    .find(|(region, _)| *region == r)
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                (r, count)
            })
            .collect()
    }

    fn sample_program() -> IrProgram {
        IrProgram {
            constants: vec![
                ("10".to_string(), 17000),
                ("2.5".to_string(), 18000),
                ("hello world".to_string(), 19000),
            ],
            regions: all_regions(&[
                (RegionKind::GlobalInt, 3),
                (RegionKind::TempInt, 2),
                (RegionKind::CteInt, 1),
                (RegionKind::CteFloat, 1),
                (RegionKind::CteStr, 1),
            ]),
            quads: vec![
                Quadruple::new(0, OpCode::GotoMain, UNUSED, UNUSED, 1),
                Quadruple::new(1, OpCode::Assign, 17000, UNUSED, 1000),
                Quadruple::new(2, OpCode::Add, 1000, 1001, 12000),
                Quadruple::new(3, OpCode::Print, 19000, UNUSED, UNUSED),
            ],
        }
    }

    #[test]
    fn test_round_trip() {
        let program = sample_program();
        let text = serialize(&program);
        let parsed = parse(&text).unwrap();
        assert_eq!(program, parsed);
    }

    #[test]
    fn test_round_trip_with_empty_constants() {
        let mut program = sample_program();
        program.constants.clear();
        let text = serialize(&program);
        assert!(text.starts_with('\n'));
        let parsed = parse(&text).unwrap();
        assert_eq!(program, parsed);
    }

    #[test]
    fn test_constant_value_with_spaces_survives() {
        let program = sample_program();
        let text = serialize(&program);
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.constants[2].0, "hello world");
        assert_eq!(parsed.constants[2].1, 19000);
    }

    #[test]
    fn test_unknown_opcode_is_rejected() {
        let program = sample_program();
        let text = serialize(&program).replace("gotomain", "teleport");
        assert!(matches!(
            parse(&text),
            Err(IrTextError::UnknownOpcode { .. })
        ));
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let program = sample_program();
        let text = serialize(&program).replace("temp_bool", "temp_blob");
        assert!(matches!(
            parse(&text),
            Err(IrTextError::UnknownRegion { .. })
        ));
    }

    #[test]
    fn test_constant_outside_constant_regions_is_rejected() {
        let text = "10 1000\n\nglobal_int 1\n\n0 gotomain -1 -1 1";
        assert!(matches!(
            parse(text),
            Err(IrTextError::BadConstantAddress { address: 1000 })
        ));
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        assert!(matches!(
            parse("10 17000"),
            Err(IrTextError::MissingSection)
        ));
    }

    #[test]
    fn test_malformed_quad_line() {
        let text = "\n\nglobal_int 0\n\n0 + 1000";
        assert!(matches!(parse(text), Err(IrTextError::BadQuadLine { .. })));
    }
}
