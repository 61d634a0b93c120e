// f90lex/src/scanner/lexeme.rs

//! Lexeme types produced by the line scanner.

use serde::Serialize;
use std::fmt;

/// Statement continuation marker.
pub const CONTINUATION: char = '&';

/// Statement separator.
pub const SEPARATOR: char = ';';

/// Marker that starts a preprocessor directive.
pub const DIRECTIVE: char = '#';

/// A raw lexeme scanned from one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The kind of lexeme
    pub kind: LexemeKind,
    /// The exact source text
    pub text: String,
}

impl Lexeme {
    pub fn new<S: Into<String>>(kind: LexemeKind, text: S) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Classify this lexeme for statement assembly.
    pub fn class(&self) -> LexemeClass {
        match self.kind {
            LexemeKind::Whitespace | LexemeKind::LineEnd => LexemeClass::Whitespace,
            LexemeKind::Comment => LexemeClass::Comment,
            LexemeKind::Separator => LexemeClass::Separator,
            LexemeKind::Continuation => LexemeClass::Continuation,
            LexemeKind::Name
            | LexemeKind::Number
            | LexemeKind::String
            | LexemeKind::DotOperator
            | LexemeKind::Operator
            | LexemeKind::Punctuation => LexemeClass::Semantic,
        }
    }

    /// Whitespace, comments and separators.
    pub fn is_liminal(&self) -> bool {
        matches!(
            self.class(),
            LexemeClass::Whitespace | LexemeClass::Comment | LexemeClass::Separator
        )
    }

    pub fn is_whitespace(&self) -> bool {
        self.class() == LexemeClass::Whitespace
    }

    pub fn is_continuation(&self) -> bool {
        self.kind == LexemeKind::Continuation
    }

    /// A comment starting with the directive marker.
    pub fn is_directive(&self) -> bool {
        self.kind == LexemeKind::Comment && self.text.starts_with(DIRECTIVE)
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Kinds of lexemes the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LexemeKind {
    /// Run of spaces and tabs
    Whitespace,
    /// Line terminator (`\n`, `\r\n`, or empty for an unterminated last line)
    LineEnd,
    /// Comment or directive to the end of the line (`!`, `#`)
    Comment,
    /// Identifier or keyword
    Name,
    /// Numeric literal, including exponent and kind suffix
    Number,
    /// String literal, or the fragment of one continued across lines
    String,
    /// Bare dot or dotted operator (`.`, `.eq.`, `.true.`)
    DotOperator,
    /// Two-character operator (`::`, `=>`, `**`, `//`, `==`, `/=`, `<=`, `>=`)
    Operator,
    /// Any other single punctuation character
    Punctuation,
    /// Statement continuation marker (`&`)
    Continuation,
    /// Statement separator (`;`)
    Separator,
}

impl LexemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LexemeKind::Whitespace => "whitespace",
            LexemeKind::LineEnd => "line_end",
            LexemeKind::Comment => "comment",
            LexemeKind::Name => "name",
            LexemeKind::Number => "number",
            LexemeKind::String => "string",
            LexemeKind::DotOperator => "dot_operator",
            LexemeKind::Operator => "operator",
            LexemeKind::Punctuation => "punctuation",
            LexemeKind::Continuation => "continuation",
            LexemeKind::Separator => "separator",
        }
    }
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classification of a lexeme with respect to statement assembly.
///
/// Whitespace, comments and separators are liminal: they are kept for
/// reconstruction but carry no meaning. Continuation markers are handled
/// separately because they can join a token split across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeClass {
    Whitespace,
    Comment,
    Separator,
    Continuation,
    Semantic,
}
