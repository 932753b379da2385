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

//! Error types for the Patito compiler.
//!
//! This module defines all error types used throughout the compiler,
//! including lexical, syntax, and semantic diagnostics as well as the
//! internal invariant violations that abort a compilation.

use std::ops::Range;
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span from a range.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// The diagnostic category an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Unrecognized input characters.
    Lexical,
    /// Token-stream shape violations.
    Syntax,
    /// Meaning-level violations (types, declarations, call sites).
    Semantic,
    /// Generator invariant violations; these abort the compilation.
    Internal,
}

impl Category {
    /// Get a human-readable tag for this category.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Lexical => "lexical",
            Category::Syntax => "syntax",
            Category::Semantic => "semantic",
            Category::Internal => "internal",
        }
    }
}

/// Error codes for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexical errors (E001-E030)
    InvalidCharacter,
    UnterminatedString,

    // Syntax errors (E100-E130)
    UnexpectedToken,
    UnexpectedEndOfFile,
    ExpectedToken,
    ExpectedStatement,
    ExpectedIdentifier,
    ExpectedType,

    // Semantic errors (E200-E230)
    UndeclaredVariable,
    VariableAlreadyDeclared,
    TypeMismatch,
    InvalidOperatorForType,
    NonBooleanCondition,
    UndefinedFunction,
    FunctionAlreadyDeclared,
    WrongNumberOfArguments,
    ArgumentTypeMismatch,

    // Internal invariant violations (E900-E910)
    OperandStackUnderflow,
    JumpStackUnderflow,
    MemoryRangeExhausted,
    InvalidAllocationRequest,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::UnterminatedString => "E010",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",
            ErrorCode::ExpectedToken => "E102",
            ErrorCode::ExpectedStatement => "E104",
            ErrorCode::ExpectedIdentifier => "E105",
            ErrorCode::ExpectedType => "E106",

            // Semantic errors
            ErrorCode::UndeclaredVariable => "E200",
            ErrorCode::VariableAlreadyDeclared => "E201",
            ErrorCode::TypeMismatch => "E210",
            ErrorCode::InvalidOperatorForType => "E212",
            ErrorCode::NonBooleanCondition => "E213",
            ErrorCode::UndefinedFunction => "E220",
            ErrorCode::FunctionAlreadyDeclared => "E221",
            ErrorCode::WrongNumberOfArguments => "E222",
            ErrorCode::ArgumentTypeMismatch => "E223",

            // Internal invariant violations
            ErrorCode::OperandStackUnderflow => "E900",
            ErrorCode::JumpStackUnderflow => "E901",
            ErrorCode::MemoryRangeExhausted => "E902",
            ErrorCode::InvalidAllocationRequest => "E903",
        }
    }

    /// Get the diagnostic category this code belongs to.
    pub fn category(&self) -> Category {
        match self {
            ErrorCode::InvalidCharacter | ErrorCode::UnterminatedString => Category::Lexical,

            ErrorCode::UnexpectedToken
            | ErrorCode::UnexpectedEndOfFile
            | ErrorCode::ExpectedToken
            | ErrorCode::ExpectedStatement
            | ErrorCode::ExpectedIdentifier
            | ErrorCode::ExpectedType => Category::Syntax,

            ErrorCode::UndeclaredVariable
            | ErrorCode::VariableAlreadyDeclared
            | ErrorCode::TypeMismatch
            | ErrorCode::InvalidOperatorForType
            | ErrorCode::NonBooleanCondition
            | ErrorCode::UndefinedFunction
            | ErrorCode::FunctionAlreadyDeclared
            | ErrorCode::WrongNumberOfArguments
            | ErrorCode::ArgumentTypeMismatch => Category::Semantic,

            ErrorCode::OperandStackUnderflow
            | ErrorCode::JumpStackUnderflow
            | ErrorCode::MemoryRangeExhausted
            | ErrorCode::InvalidAllocationRequest => Category::Internal,
        }
    }
}

/// A compiler error with source location.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the diagnostic category of this error.
    pub fn category(&self) -> Category {
        self.code.category()
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The content of the line.
    pub line_content: String,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];

        let line = before.chars().filter(|&c| c == '\n').count() + 1;

        let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[last_newline..].chars().count() + 1;

        // Extract the line content
        let line_start = last_newline;
        let line_end = source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(source.len());
        let line_content = source[line_start..line_end].to_string();

        Self {
            line,
            column,
            line_content,
        }
    }
}

/// Format an error with source context.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let loc = SourceLocation::from_offset(source, error.span.start);
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();

    // Error header
    output.push_str(&format!(
        "{} error[{}]: {}\n",
        error.category().tag(),
        error.code_str(),
        error.message
    ));

    // Location
    output.push_str(&format!("  --> {}:{}:{}\n", filename, loc.line, loc.column));

    // Source context
    let line_num_width = loc.line.to_string().len();
    output.push_str(&format!("{:>width$} |\n", "", width = line_num_width));
    output.push_str(&format!(
        "{:>width$} | {}\n",
        loc.line,
        loc.line_content,
        width = line_num_width
    ));

    // Underline the error span
    let underline_start = loc.column - 1;
    let underline_len = (error.span.end - error.span.start)
        .max(1)
        .min(loc.line_content.len().saturating_sub(underline_start))
        .max(1);
    output.push_str(&format!(
        "{:>width$} | {:>start$}{}\n",
        "",
        "",
        "^".repeat(underline_len),
        width = line_num_width,
        start = underline_start
    ));

    // Hint if available
    if let Some(hint) = &error.hint {
        output.push_str(&format!(
            "{:>width$} = hint: {}\n",
            "",
            hint,
            width = line_num_width
        ));
    }

    output
}

/// The collected diagnostics of one compilation.
///
/// Patito collects everything it can instead of failing fast: lexical,
/// syntax, and semantic problems are appended to their category list and
/// the pass keeps going. Only internal invariant violations abort.
#[derive(Debug, Default)]
pub struct Diagnostics {
    lexical: Vec<CompileError>,
    syntax: Vec<CompileError>,
    semantic: Vec<CompileError>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the collection, routed by its category.
    ///
    /// # Panics
    ///
    /// Panics if the error is an internal invariant violation; those must
    /// be propagated as `Err`, never collected.
    pub fn push(&mut self, error: CompileError) {
        match error.category() {
            Category::Lexical => self.lexical.push(error),
            Category::Syntax => self.syntax.push(error),
            Category::Semantic => self.semantic.push(error),
            Category::Internal => {
                panic!("internal error must abort the compilation, not be collected")
            }
        }
    }

    /// Get the lexical diagnostics.
    pub fn lexical(&self) -> &[CompileError] {
        &self.lexical
    }

    /// Get the syntax diagnostics.
    pub fn syntax(&self) -> &[CompileError] {
        &self.syntax
    }

    /// Get the semantic diagnostics.
    pub fn semantic(&self) -> &[CompileError] {
        &self.semantic
    }

    /// Check if there are any diagnostics at all.
    pub fn has_errors(&self) -> bool {
        !self.lexical.is_empty() || !self.syntax.is_empty() || !self.semantic.is_empty()
    }

    /// Total number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.lexical.len() + self.syntax.len() + self.semantic.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// Whether the compiled program may be executed.
    ///
    /// A program with semantic errors is never run.
    pub fn allows_execution(&self) -> bool {
        self.semantic.is_empty()
    }

    /// Iterate over all diagnostics, lexical first, then syntax, then semantic.
    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.lexical
            .iter()
            .chain(self.syntax.iter())
            .chain(self.semantic.iter())
    }

    /// Merge another collection into this one.
    pub fn extend(&mut self, other: Diagnostics) {
        self.lexical.extend(other.lexical);
        self.syntax.extend(other.syntax);
        self.semantic.extend(other.semantic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = Span::new(10, 20);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let span1 = Span::new(5, 10);
        let span2 = Span::new(15, 20);
        let merged = span1.merge(&span2);
        assert_eq!(merged.start, 5);
        assert_eq!(merged.end, 20);
    }

    #[test]
    fn test_error_code() {
        assert_eq!(ErrorCode::InvalidCharacter.code(), "E001");
        assert_eq!(ErrorCode::UnexpectedToken.code(), "E100");
        assert_eq!(ErrorCode::UndeclaredVariable.code(), "E200");
        assert_eq!(ErrorCode::MemoryRangeExhausted.code(), "E902");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ErrorCode::InvalidCharacter.category(), Category::Lexical);
        assert_eq!(ErrorCode::UnexpectedToken.category(), Category::Syntax);
        assert_eq!(ErrorCode::TypeMismatch.category(), Category::Semantic);
        assert_eq!(ErrorCode::JumpStackUnderflow.category(), Category::Internal);
    }

    #[test]
    fn test_compile_error() {
        let error = CompileError::new(
            ErrorCode::UndeclaredVariable,
            "Undeclared variable 'foo'",
            Span::new(0, 3),
        )
        .with_hint("Declare it in a var section first");

        assert_eq!(error.code_str(), "E200");
        assert!(error.hint.is_some());
    }

    #[test]
    fn test_diagnostics_routing() {
        let mut diags = Diagnostics::new();
        diags.push(CompileError::new(
            ErrorCode::InvalidCharacter,
            "Unrecognized character '@'",
            Span::new(0, 1),
        ));
        diags.push(CompileError::new(
            ErrorCode::TypeMismatch,
            "Cannot assign float to int",
            Span::new(4, 5),
        ));

        assert_eq!(diags.lexical().len(), 1);
        assert_eq!(diags.syntax().len(), 0);
        assert_eq!(diags.semantic().len(), 1);
        assert_eq!(diags.len(), 2);
        assert!(!diags.allows_execution());
    }

    #[test]
    fn test_empty_diagnostics_allow_execution() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert!(diags.allows_execution());
    }

    #[test]
    fn test_syntax_errors_do_not_block_execution_flag() {
        let mut diags = Diagnostics::new();
        diags.push(CompileError::new(
            ErrorCode::UnexpectedToken,
            "Unexpected token ';'",
            Span::new(0, 1),
        ));
        assert!(diags.allows_execution());
        assert!(diags.has_errors());
    }

    #[test]
    fn test_source_location() {
        let source = "first\nsecond line\nthird";
        let loc = SourceLocation::from_offset(source, 6);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.line_content, "second line");
    }
}
