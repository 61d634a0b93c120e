// f90lex/src/error.rs

//! Error types for the f90lex library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for f90lex operations.
pub type Result<T> = std::result::Result<T, LexError>;

/// Errors that terminate scanning or statement assembly.
///
/// Preprocessor issues that can be skipped (unknown directives, missing
/// include files, ...) are not errors; they go to a
/// [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead.
#[derive(Error, Debug)]
pub enum LexError {
    /// A character the scanner has no lexeme class for.
    #[error("unexpected character {character:?} at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },

    /// A directive missing a required argument.
    #[error("malformed directive at line {line}: {reason}: {directive}")]
    MalformedDirective {
        directive: String,
        line: usize,
        reason: &'static str,
    },

    /// A `NAME=BODY` macro definition that could not be parsed.
    #[error("invalid macro definition: {definition}")]
    InvalidDefine { definition: String },

    /// An include file that exists but could not be read.
    #[error("failed to read include file {}: {source}", path.display())]
    IncludeRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error while pulling lines from the source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LexError {
    /// Create a new unexpected character error.
    ///
    /// The scanner only knows the column; the lexer fills in the line with
    /// [`LexError::at_line`].
    pub fn unexpected_character(character: char, column: usize) -> Self {
        LexError::UnexpectedCharacter {
            character,
            line: 0,
            column,
        }
    }

    /// Create a new malformed directive error.
    pub fn malformed_directive<S: Into<String>>(
        directive: S,
        line: usize,
        reason: &'static str,
    ) -> Self {
        LexError::MalformedDirective {
            directive: directive.into(),
            line,
            reason,
        }
    }

    /// Create a new invalid define error.
    pub fn invalid_define<S: Into<String>>(definition: S) -> Self {
        LexError::InvalidDefine {
            definition: definition.into(),
        }
    }

    /// Attach a source line number to a line-local error.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            LexError::UnexpectedCharacter {
                character, column, ..
            } => LexError::UnexpectedCharacter {
                character,
                line,
                column,
            },
            LexError::MalformedDirective {
                directive, reason, ..
            } => LexError::MalformedDirective {
                directive,
                line,
                reason,
            },
            other => other,
        }
    }

    /// Whether this error came from the scanner rather than the input source.
    pub fn is_scan_error(&self) -> bool {
        matches!(self, LexError::UnexpectedCharacter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_fills_in_line_number() {
        let err = LexError::unexpected_character('^', 3).at_line(12);
        assert!(err.is_scan_error());
        match err {
            LexError::UnexpectedCharacter {
                character,
                line,
                column,
            } => {
                assert_eq!(character, '^');
                assert_eq!(line, 12);
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_messages() {
        let err = LexError::unexpected_character('^', 3).at_line(2);
        assert_eq!(
            err.to_string(),
            "unexpected character '^' at line 2, column 3"
        );

        let err = LexError::malformed_directive("#define", 7, "missing macro name");
        assert_eq!(
            err.to_string(),
            "malformed directive at line 7: missing macro name: #define"
        );
        assert!(!err.is_scan_error());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: LexError = io_err.into();
        assert!(matches!(err, LexError::Io(_)));
    }
}
