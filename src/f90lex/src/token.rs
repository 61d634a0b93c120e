// f90lex/src/token.rs

//! Tokens and statements produced by the lexer.

use crate::scanner::{Lexeme, LexemeKind};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use unicase::UniCase;

/// A semantic token decorated with its surrounding liminal text.
///
/// Tokens compare and hash case-insensitively: `IF`, `if` and `If` are the
/// same token. The spelling is kept for reconstruction.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    /// The token text as it means something to the language
    pub value: String,
    /// Lexeme kind the value was scanned as
    pub kind: LexemeKind,
    /// Liminal lexemes before this token that no earlier token owns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<String>,
    /// Liminal lexemes after this token, up to the next token
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tail: Vec<String>,
    /// Original spelling of a token divided by a line continuation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
    /// Macro whose expansion starts with this token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_origin: Option<String>,
    #[serde(skip)]
    expanded: bool,
}

impl Token {
    pub fn new<S: Into<String>>(kind: LexemeKind, value: S) -> Self {
        Self {
            value: value.into(),
            kind,
            head: Vec::new(),
            tail: Vec::new(),
            split: None,
            macro_origin: None,
            expanded: false,
        }
    }

    /// A token produced by expanding `name`.
    ///
    /// Only the first token of an expansion carries the macro name.
    pub fn expanded(lexeme: &Lexeme, name: &str, first: bool) -> Self {
        let mut token = Self::from(lexeme.clone());
        token.expanded = true;
        if first {
            token.macro_origin = Some(name.to_string());
        }
        token
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether this token came from a macro body rather than the source.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The spelling used for reconstruction: the split text if the token
    /// was continued across lines, otherwise its value.
    pub fn spelling(&self) -> &str {
        self.split.as_deref().unwrap_or(&self.value)
    }

    /// The text this token stands for in the source file.
    ///
    /// An expansion is spelled as its invocation: the first replacement
    /// token renders the macro name and the others render nothing.
    pub fn source_text(&self) -> &str {
        match (&self.macro_origin, self.expanded) {
            (Some(name), _) => name,
            (None, true) => "",
            (None, false) => self.spelling(),
        }
    }

    /// Append head, source text and tail to `out`.
    pub fn write_source(&self, out: &mut String) {
        self.head.iter().for_each(|lx| out.push_str(lx));
        out.push_str(self.source_text());
        self.tail.iter().for_each(|lx| out.push_str(lx));
    }

    /// Append head, value and tail to `out`.
    pub fn write_expanded(&self, out: &mut String) {
        self.head.iter().for_each(|lx| out.push_str(lx));
        out.push_str(&self.value);
        self.tail.iter().for_each(|lx| out.push_str(lx));
    }

    fn key(&self) -> UniCase<&str> {
        UniCase::new(self.value.as_str())
    }
}

impl From<Lexeme> for Token {
    fn from(lexeme: Lexeme) -> Self {
        Self::new(lexeme.kind, lexeme.text)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.key() == UniCase::new(other)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One logical statement: a non-empty sequence of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Statement {
    tokens: Vec<Token>,
}

impl Statement {
    /// Wrap a token sequence. Returns `None` for an empty sequence.
    pub fn new(tokens: Vec<Token>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Token values in order.
    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(Token::as_str).collect()
    }

    /// The source text of this statement, liminals included.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.tokens.iter().for_each(|tok| tok.write_source(&mut out));
        out
    }

    /// Like [`Statement::to_source`], but with macros expanded and split
    /// tokens joined.
    pub fn to_expanded(&self) -> String {
        let mut out = String::new();
        self.tokens.iter().for_each(|tok| tok.write_expanded(&mut out));
        out
    }
}

impl Deref for Statement {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl IntoIterator for Statement {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a Statement {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values().join(" · "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn name(value: &str) -> Token {
        Token::new(LexemeKind::Name, value)
    }

    #[test]
    fn test_case_insensitive_equality() {
        let upper = name("IF");
        let lower = name("if");
        let mixed = name("If");

        assert_eq!(upper, lower);
        assert_eq!(lower, mixed);
        assert_eq!(upper, "if");
        assert_ne!(upper, name("of"));

        let set: HashSet<Token> = [upper.clone(), lower.clone(), mixed.clone()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);

        // Spelling is preserved even though the tokens are equal
        assert_eq!(upper.spelling(), "IF");
        assert_eq!(mixed.spelling(), "If");
    }

    #[test]
    fn test_metadata_does_not_affect_equality() {
        let mut a = name("x");
        a.tail.push(" ".into());
        a.macro_origin = Some("FOO".into());
        let b = name("X");
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_spelling() {
        let mut tok = name("REAL");
        tok.split = Some("REA&\n&L".into());
        tok.tail.push(" ".into());

        assert_eq!(tok.value, "REAL");
        assert_eq!(tok.spelling(), "REA&\n&L");

        let mut out = String::new();
        tok.write_source(&mut out);
        assert_eq!(out, "REA&\n&L ");

        let mut out = String::new();
        tok.write_expanded(&mut out);
        assert_eq!(out, "REAL ");
    }

    #[test]
    fn test_expanded_tokens_render_as_invocation() {
        let one = Lexeme::new(LexemeKind::Number, "1");
        let plus = Lexeme::new(LexemeKind::Punctuation, "+");
        let first = Token::expanded(&one, "FOO", true);
        let rest = Token::expanded(&plus, "FOO", false);

        assert!(first.is_expanded());
        assert_eq!(first.macro_origin.as_deref(), Some("FOO"));
        assert_eq!(rest.macro_origin, None);
        assert_eq!(first.source_text(), "FOO");
        assert_eq!(rest.source_text(), "");
        assert_eq!(first.spelling(), "1");
    }

    #[test]
    fn test_statement_requires_tokens() {
        assert!(Statement::new(Vec::new()).is_none());

        let mut x = name("x");
        x.head.push("  ".into());
        x.tail.push(" ".into());
        let mut eq = Token::new(LexemeKind::Punctuation, "=");
        eq.tail.push(" ".into());
        let mut one = Token::new(LexemeKind::Number, "1");
        one.tail.push("\n".into());

        let stmt = Statement::new(vec![x, eq, one]).unwrap();
        assert_eq!(stmt.len(), 3);
        assert_eq!(stmt.values(), vec!["x", "=", "1"]);
        assert_eq!(stmt.to_source(), "  x = 1\n");
        assert_eq!(stmt.to_string(), "x · = · 1");
    }
}
