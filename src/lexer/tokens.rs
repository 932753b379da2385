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

//! Token definitions for the Patito language.

use logos::Logos;

/// A token in the Patito language.
///
/// Whitespace and `#` comments are skipped by the lexer. Anything the
/// patterns below cannot match surfaces as a lexical error token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Literals
    /// Integer literal.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),
    /// Decimal literal (digits, a point, digits).
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Decimal(f64),
    /// String literal, quotes stripped.
    #[regex(r#""[^"\n]*""#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_owned() })]
    String(std::string::String),
    /// Identifier (variable or function name).
    #[regex(r"[A-Za-z_][A-Za-z_0-9]*", |lex| lex.slice().to_owned())]
    Identifier(std::string::String),

    // Keywords
    /// `program` - program header.
    #[token("program")]
    Program,
    /// `main` - entry block.
    #[token("main")]
    Main,
    /// `var` - variable declaration section.
    #[token("var")]
    Var,
    /// `int` - integer type.
    #[token("int")]
    Int,
    /// `float` - floating-point type.
    #[token("float")]
    Float,
    /// `string` - string type.
    #[token("string")]
    StringType,
    /// `void` - function declaration (functions never return values).
    #[token("void")]
    Void,
    /// `if` - conditional statement.
    #[token("if")]
    If,
    /// `else` - else branch.
    #[token("else")]
    Else,
    /// `while` - loop condition keyword.
    #[token("while")]
    While,
    /// `do` - loop body keyword.
    #[token("do")]
    Do,
    /// `print` - output statement.
    #[token("print")]
    Print,
    /// `end` - program terminator.
    #[token("end")]
    End,

    // Arithmetic operators
    /// `+` - addition.
    #[token("+")]
    Plus,
    /// `-` - subtraction.
    #[token("-")]
    Minus,
    /// `*` - multiplication.
    #[token("*")]
    Star,
    /// `/` - division.
    #[token("/")]
    Slash,

    // Comparison operators
    /// `==` - equal.
    #[token("==")]
    EqualEqual,
    /// `!=` - not equal.
    #[token("!=")]
    BangEqual,
    /// `<` - less than.
    #[token("<")]
    Less,
    /// `>` - greater than.
    #[token(">")]
    Greater,
    /// `<=` - less or equal.
    #[token("<=")]
    LessEqual,
    /// `>=` - greater or equal.
    #[token(">=")]
    GreaterEqual,

    // Assignment
    /// `=` - assignment.
    #[token("=")]
    Equal,

    // Punctuation
    /// `;` - statement terminator.
    #[token(";")]
    Semicolon,
    /// `,` - separator.
    #[token(",")]
    Comma,
    /// `(` - left parenthesis.
    #[token("(")]
    LeftParen,
    /// `)` - right parenthesis.
    #[token(")")]
    RightParen,
    /// `{` - left brace.
    #[token("{")]
    LeftBrace,
    /// `}` - right brace.
    #[token("}")]
    RightBrace,
    /// `[` - left bracket (function declaration block).
    #[token("[")]
    LeftBracket,
    /// `]` - right bracket.
    #[token("]")]
    RightBracket,
    /// `:` - colon (declaration type separator).
    #[token(":")]
    Colon,
}

impl Token {
    /// Check if this token is a type keyword.
    pub fn is_type(&self) -> bool {
        matches!(self, Token::Int | Token::Float | Token::StringType)
    }

    /// Check if this token is a comparison operator.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::EqualEqual
                | Token::BangEqual
                | Token::Less
                | Token::Greater
                | Token::LessEqual
                | Token::GreaterEqual
        )
    }

    /// Get a human-readable name for this token type.
    pub fn name(&self) -> &'static str {
        match self {
            Token::Integer(_) => "integer",
            Token::Decimal(_) => "decimal",
            Token::String(_) => "string",
            Token::Identifier(_) => "identifier",
            Token::Program => "'program'",
            Token::Main => "'main'",
            Token::Var => "'var'",
            Token::Int => "'int'",
            Token::Float => "'float'",
            Token::StringType => "'string'",
            Token::Void => "'void'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::Do => "'do'",
            Token::Print => "'print'",
            Token::End => "'end'",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::EqualEqual => "'=='",
            Token::BangEqual => "'!='",
            Token::Less => "'<'",
            Token::Greater => "'>'",
            Token::LessEqual => "'<='",
            Token::GreaterEqual => "'>='",
            Token::Equal => "'='",
            Token::Semicolon => "';'",
            Token::Comma => "','",
            Token::LeftParen => "'('",
            Token::RightParen => "')'",
            Token::LeftBrace => "'{'",
            Token::RightBrace => "'}'",
            Token::LeftBracket => "'['",
            Token::RightBracket => "']'",
            Token::Colon => "':'",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Decimal(d) => write!(f, "{}", d),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Identifier(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.name()),
        }
    }
}
