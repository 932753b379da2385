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

//! Lexer module for the Patito compiler.
//!
//! Tokenization is driven by a `logos`-generated scanner. Lexical errors
//! never abort the scan: the offending character is recorded as a
//! diagnostic and scanning resumes one character later, so a single stray
//! symbol does not hide the rest of the program from the parser.

mod tokens;

pub use tokens::Token;

use crate::error::{CompileError, ErrorCode, SourceLocation, Span};
use logos::Logos;

/// Tokenize Patito source code.
///
/// Returns the token stream together with the lexical diagnostics that
/// were collected along the way. The stream contains every token that
/// could be recognized; unrecognized characters are skipped.
pub fn tokenize(source: &str) -> (Vec<(Token, Span)>, Vec<CompileError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, range) in Token::lexer(source).spanned() {
        let span = Span::from_range(range);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => errors.push(lexical_error(source, span)),
        }
    }

    (tokens, errors)
}

/// Build the diagnostic for an unrecognized piece of input.
fn lexical_error(source: &str, span: Span) -> CompileError {
    let offending = source[span.start..span.end].chars().next().unwrap_or('?');
    let loc = SourceLocation::from_offset(source, span.start);

    if offending == '"' {
        return CompileError::new(
            ErrorCode::UnterminatedString,
            format!("Unterminated string literal at line {}", loc.line),
            span,
        )
        .with_hint("String literals must close with '\"' on the same line");
    }

    CompileError::new(
        ErrorCode::InvalidCharacter,
        format!(
            "Unrecognized character '{}' at line {}, position {}",
            offending, loc.line, span.start
        ),
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(source: &str) -> Vec<Token> {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = tokens_of("program demo ;");
        assert_eq!(
            tokens,
            vec![
                Token::Program,
                Token::Identifier("demo".into()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        // 'mainly' must not lex as the keyword 'main'
        let tokens = tokens_of("mainly");
        assert_eq!(tokens, vec![Token::Identifier("mainly".into())]);
    }

    #[test]
    fn test_number_literals() {
        let tokens = tokens_of("12 3.5");
        assert_eq!(tokens, vec![Token::Integer(12), Token::Decimal(3.5)]);
    }

    #[test]
    fn test_string_literal_strips_quotes() {
        let tokens = tokens_of("\"hello world\"");
        assert_eq!(tokens, vec![Token::String("hello world".into())]);
    }

    #[test]
    fn test_comparators_longest_match() {
        let tokens = tokens_of("<= >= == != < > =");
        assert_eq!(
            tokens,
            vec![
                Token::LessEqual,
                Token::GreaterEqual,
                Token::EqualEqual,
                Token::BangEqual,
                Token::Less,
                Token::Greater,
                Token::Equal,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokens_of("A = 1; # trailing comment\nB = 2;");
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[4], Token::Identifier("B".into()));
    }

    #[test]
    fn test_declaration_line() {
        let tokens = tokens_of("var A, B : int;");
        assert_eq!(
            tokens,
            vec![
                Token::Var,
                Token::Identifier("A".into()),
                Token::Comma,
                Token::Identifier("B".into()),
                Token::Colon,
                Token::Int,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_invalid_character_is_reported_and_skipped() {
        let (tokens, errors) = tokenize("A = @ 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidCharacter);
        // The rest of the line still tokenizes
        assert!(tokens.contains(&(Token::Integer(1), Span::new(6, 7))));
    }

    #[test]
    fn test_multiple_invalid_characters() {
        let (_, errors) = tokenize("@ $\n&");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_unterminated_string() {
        let (_, errors) = tokenize("print(\"oops);");
        assert!(errors
            .iter()
            .any(|e| e.code == ErrorCode::UnterminatedString));
    }

    #[test]
    fn test_error_message_carries_line_number() {
        let (_, errors) = tokenize("A = 1;\nB = @;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("line 2"));
    }
}
