// f90lex/src/lib.rs

//! A lossless lexer for free-form Fortran source.
//!
//! This library provides functionality to:
//! - Scan physical lines into whitespace, comments, names, numbers, strings
//!   and operators
//! - Assemble logical statements across `&` continuations and `;` separators
//! - Run a small preprocessor (`#define`, `#undef`, `#ifdef`, `#ifndef`,
//!   `#else`, `#endif`, `#include`) while lexing
//! - Rebuild the original text byte for byte from the statements

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod preprocessor;
pub mod scanner;
pub mod source;
pub mod token;

#[cfg(feature = "cli")]
pub mod cli;

use std::path::Path;

pub use config::{LexerConfig, LexerConfigBuilder, LexerConfigBuilderError};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, LogSink};
pub use error::{LexError, Result};
pub use lexer::{Document, Inclusion, Lexer};
pub use preprocessor::{MacroTable, SharedMacroTable};
pub use scanner::{Lexeme, LexemeKind};
pub use token::{Statement, Token};

/// Lex a Fortran source file.
///
/// `#include` paths are resolved against the current directory.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), f90lex::LexError> {
///     let document = f90lex::read("model.F90")?;
///     for statement in &document {
///         println!("{}", statement);
///     }
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> Result<Document> {
    Lexer::open(path)?.into_document()
}

/// Lex Fortran source held in a string.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), f90lex::LexError> {
///     let source = "program p\n  x = 1; y = 2\nend program p\n";
///     let document = f90lex::reads(source)?;
///     assert_eq!(document.len(), 4);
///     assert_eq!(document.to_source(), source);
///     Ok(())
/// }
/// ```
pub fn reads(content: &str) -> Result<Document> {
    Lexer::from_text(content).into_document()
}

/// Lex a string with the given include root, depth limit and macros.
pub fn reads_with_config(content: &str, config: &LexerConfig) -> Result<Document> {
    Lexer::with_config(source::SourceLines::from_text(content), config)?.into_document()
}

/// Token values of each statement in `content`.
///
/// # Examples
///
/// ```
/// let statements = f90lex::tokenize("REAL :: x\n").unwrap();
/// assert_eq!(statements, vec![vec!["REAL", "::", "x"]]);
/// ```
pub fn tokenize(content: &str) -> Result<Vec<Vec<String>>> {
    Lexer::from_text(content)
        .map(|statement| {
            statement.map(|stmt| stmt.values().into_iter().map(String::from).collect())
        })
        .collect()
}
