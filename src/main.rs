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

//! Patito Compiler CLI
//!
//! Compiles a Patito source file, reports every collected diagnostic,
//! optionally writes the intermediate representation, and executes the
//! program on the quadruple machine.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use patito::error::format_error;
use patito::ir::text;
use patito::vm::Vm;
use patito::Compilation;

/// Patito - An educational compiler and quadruple virtual machine
#[derive(Parser, Debug)]
#[command(name = "patito")]
#[command(author = "Patito Team")]
#[command(version)]
#[command(about = "An educational compiler and quadruple virtual machine")]
#[command(long_about = r#"
Patito compiles a small Pascal-like language into quadruple intermediate
code and interprets it on a simulated segmented-memory machine.

By default the program is compiled, all diagnostics are reported, and
execution starts when no semantic errors were found.

Example usage:
  patito program.ld
  patito program.ld -o program.ir
  patito program.ld --verbose
  patito program.ld --no-run
"#)]
struct Cli {
    /// Source file to compile (.ld)
    source_file: PathBuf,

    /// Write the intermediate representation to this file
    #[arg(short = 'o', long = "emit-ir")]
    emit_ir: Option<PathBuf>,

    /// Compile and report only; skip execution
    #[arg(long)]
    no_run: bool,

    /// Print quadruples, symbol tables, and memory allocation
    #[arg(short, long)]
    verbose: bool,

    /// Safety cap on executed quadruples
    #[arg(long, default_value_t = Vm::DEFAULT_STEP_LIMIT)]
    max_steps: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.source_file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", cli.source_file.display(), e);
            return ExitCode::from(3);
        }
    };

    let filename = cli
        .source_file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");

    // Compile
    let compilation = match patito::compile(&source) {
        Ok(compilation) => compilation,
        Err(e) => {
            // Internal invariant violation; nothing usable came out.
            eprint!("{}", format_error(&e, &source, Some(filename)));
            return ExitCode::from(1);
        }
    };

    // Report every collected diagnostic, tagged by category.
    for error in compilation.diagnostics.iter() {
        eprint!("{}", format_error(error, &source, Some(filename)));
    }
    if compilation.diagnostics.has_errors() {
        eprintln!(
            "{} error(s): {} lexical, {} syntax, {} semantic",
            compilation.diagnostics.len(),
            compilation.diagnostics.lexical().len(),
            compilation.diagnostics.syntax().len(),
            compilation.diagnostics.semantic().len()
        );
    }

    if cli.verbose {
        print_quadruples(&compilation);
        print_symbol_tables(&compilation);
        print_memory_allocation(&compilation);
    }

    // Write the IR text if requested
    if let Some(path) = &cli.emit_ir {
        let ir_text = text::serialize(&compilation.ir);
        if let Err(e) = std::fs::write(path, ir_text) {
            eprintln!("Error: Cannot write {}: {}", path.display(), e);
            return ExitCode::from(4);
        }
        if cli.verbose {
            println!("Wrote {}", path.display());
        }
    }

    // A program with semantic errors is never executed.
    if !compilation.allows_execution() {
        eprintln!("Cannot run the program due to semantic errors.");
        return ExitCode::from(1);
    }

    if cli.no_run {
        return if compilation.diagnostics.has_errors() {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        };
    }

    // Execute
    let mut vm = match Vm::load(&compilation.ir) {
        Ok(vm) => vm.with_step_limit(cli.max_steps),
        Err(e) => {
            eprintln!("Error: Cannot load program: {}", e);
            return ExitCode::from(5);
        }
    };

    if let Err(e) = vm.run() {
        eprintln!("Runtime error: {}", e);
        return ExitCode::from(5);
    }

    for line in vm.output() {
        println!("{}", line);
    }

    if cli.verbose {
        print_final_memory(&vm);
    }

    if compilation.diagnostics.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Print the generated quadruple listing.
fn print_quadruples(compilation: &Compilation) {
    println!("\nGenerated quadruples:");
    println!(
        "{:<5} {:<10} {:>8} {:>8} {:>8}",
        "No.", "Operator", "Arg1", "Arg2", "Result"
    );
    println!("{}", "-".repeat(44));
    for quad in &compilation.ir.quads {
        println!(
            "{:<5} {:<10} {:>8} {:>8} {:>8}",
            quad.seq,
            quad.op.mnemonic(),
            quad.left,
            quad.right,
            quad.result
        );
    }
}

/// Print the global and per-function variable tables and constants.
fn print_symbol_tables(compilation: &Compilation) {
    println!("\nGlobal variables:");
    println!("{:<12} {:<8} {:>8}", "Name", "Type", "Address");
    for variable in compilation.directory.globals().iter() {
        println!(
            "{:<12} {:<8} {:>8}",
            variable.name,
            variable.ty.name(),
            variable.address
        );
    }

    for function in compilation.directory.functions() {
        println!(
            "\nFunction {} (address {}, starts at quad {}): {} parameter(s), {} local(s)",
            function.name,
            function.address,
            function.start_quad,
            function.param_count,
            function.local_count
        );
        println!("  {:<12} {:<8} {:<6} {:>8}", "Name", "Type", "Param", "Address");
        for variable in function.var_table.iter() {
            println!(
                "  {:<12} {:<8} {:<6} {:>8}",
                variable.name,
                variable.ty.name(),
                if variable.is_param { "yes" } else { "no" },
                variable.address
            );
        }
    }

    if !compilation.ir.constants.is_empty() {
        println!("\nConstants:");
        println!("{:<16} {:>8}", "Value", "Address");
        for (value, address) in &compilation.ir.constants {
            println!("{:<16} {:>8}", value, address);
        }
    }
}

/// Print how much of each memory region was allocated.
fn print_memory_allocation(compilation: &Compilation) {
    println!("\nMemory allocation:");
    for (region, count) in &compilation.ir.regions {
        if *count > 0 {
            let (start, _) = region.range();
            println!(
                "{:<14} {} address(es), {}-{}",
                region.name(),
                count,
                start,
                start + *count as i32 - 1
            );
        }
    }
}

/// Print every written address after execution, grouped by region.
fn print_final_memory(vm: &Vm) {
    println!("\nFinal memory state:");
    for (address, value) in vm.memory_snapshot() {
        println!("  [{}] = {}", address, value);
    }
}
