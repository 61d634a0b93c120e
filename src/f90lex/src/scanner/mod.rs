// f90lex/src/scanner/mod.rs

//! Character-level scanning of single source lines.
//!
//! The scanner splits one physical line into lexemes: whitespace runs,
//! comments, names, numbers, strings, dotted operators, punctuation and the
//! line terminator. Lexemes are raw text tagged with a [`LexemeKind`]; turning
//! them into decorated tokens is the job of the [`lexer`](crate::lexer).

pub mod lexeme;
pub mod scanner;

// Re-export main types and functions
pub use lexeme::{Lexeme, LexemeClass, LexemeKind, CONTINUATION, DIRECTIVE, SEPARATOR};
pub use scanner::{scan_line, scan_line_with, split_terminator, ScannedLine, Scanner};

use crate::error::Result;

/// Convenience function to scan a whole text line by line.
pub fn scan_text(input: &str) -> Result<Vec<Vec<Lexeme>>> {
    let mut scanner = Scanner::new();
    input
        .split_inclusive('\n')
        .map(|line| scanner.scan(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_text_preserves_every_byte() {
        let input = "program p\n  x = 'a&\n  &b' ! c\nend\n";
        let lines = scan_text(input).unwrap();
        assert_eq!(lines.len(), 4);

        let joined: String = lines
            .iter()
            .flat_map(|line| line.iter().map(|lx| lx.text.as_str()))
            .collect();
        assert_eq!(joined, input);
    }
}
