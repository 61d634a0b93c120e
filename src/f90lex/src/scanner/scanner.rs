// f90lex/src/scanner/scanner.rs

//! Line-local scanner for free-form Fortran source.
//!
//! The scanner turns one physical line into lexemes. The only state that
//! crosses a line boundary is the delimiter of a string literal left open by
//! a trailing continuation marker; it is passed in and handed back
//! explicitly, so scanning one line never depends on hidden state.

use super::lexeme::{Lexeme, LexemeKind, CONTINUATION, SEPARATOR};
use crate::error::{LexError, Result};

/// Characters scanned as single-character punctuation.
const PUNCTUATION: &str = "=+-*/\\()[]{},:;%&~<>?`|$#@";

/// Two-character operators merged into one lexeme.
///
/// `(/` and `/)` are left out: merging them breaks `operator (/)`
/// declarations, and telling the two apart needs statement context.
const PAIRS: [&str; 8] = ["::", "=>", "**", "//", "==", "/=", "<=", ">="];

/// The lexemes of one line and the string delimiter still open at its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    pub lexemes: Vec<Lexeme>,
    pub open_delimiter: Option<char>,
}

/// Scan one line.
///
/// `carried` is the delimiter of a string left open by the previous line.
/// The final lexeme is always the line terminator.
pub fn scan_line(line: &str, carried: Option<char>) -> Result<ScannedLine> {
    scan_line_with(line, carried, |_| None)
}

/// Scan one line, offering each name to `substitute` before it is emitted.
///
/// Returning `Some(text)` replaces the name word for word; the replacement
/// is not rescanned.
pub fn scan_line_with<F>(line: &str, carried: Option<char>, substitute: F) -> Result<ScannedLine>
where
    F: FnMut(&str) -> Option<String>,
{
    let (body, terminator) = split_terminator(line);
    let mut cursor = LineCursor {
        input: body.chars().collect(),
        current: 0,
        lexemes: Vec::new(),
        substitute,
    };

    let open_delimiter = cursor.scan(carried)?;
    cursor
        .lexemes
        .push(Lexeme::new(LexemeKind::LineEnd, terminator));

    Ok(ScannedLine {
        lexemes: cursor.lexemes,
        open_delimiter,
    })
}

/// Split a line into its content and its terminator.
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Scanner that threads the open string delimiter from line to line.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    open_delimiter: Option<char>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the next physical line of a source.
    pub fn scan(&mut self, line: &str) -> Result<Vec<Lexeme>> {
        let scanned = scan_line(line, self.open_delimiter)?;
        self.open_delimiter = scanned.open_delimiter;
        Ok(scanned.lexemes)
    }

    /// Delimiter of the string continued onto the next line, if any.
    pub fn open_delimiter(&self) -> Option<char> {
        self.open_delimiter
    }
}

struct LineCursor<F> {
    input: Vec<char>,
    current: usize,
    lexemes: Vec<Lexeme>,
    substitute: F,
}

impl<F> LineCursor<F>
where
    F: FnMut(&str) -> Option<String>,
{
    fn scan(&mut self, carried: Option<char>) -> Result<Option<char>> {
        let mut open = None;

        match carried {
            // Blank and comment lines between continued lines leave the string open
            Some(_) if self.is_blank_or_comment() => open = carried,
            Some(delim) => {
                self.resume_string();
                open = self.scan_string(Some(delim));
            }
            None => {}
        }

        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' => self.scan_whitespace(),
                '\'' | '"' => open = self.scan_string(None),
                _ if c.is_alphabetic() || c == '_' => self.scan_name(),
                _ if c.is_ascii_digit() => {
                    let word = self.scan_number();
                    self.push(LexemeKind::Number, word);
                }
                '!' | '#' => {
                    // Comments run to the end of the line
                    let word = self.collect_from(self.current);
                    self.current = self.input.len();
                    self.push(LexemeKind::Comment, word);
                }
                '.' => self.scan_dot(),
                _ if PUNCTUATION.contains(c) => self.scan_punctuation(c),
                _ => return Err(LexError::unexpected_character(c, self.current + 1)),
            }
        }

        Ok(open)
    }

    /// Emit the indentation and marker that may precede a continued string.
    fn resume_string(&mut self) {
        let indent = self
            .input
            .iter()
            .take_while(|c| matches!(c, ' ' | '\t'))
            .count();

        if self.input.get(indent) == Some(&CONTINUATION) {
            if indent > 0 {
                let ws = self.collect(0, indent);
                self.push(LexemeKind::Whitespace, ws);
            }
            self.push(LexemeKind::Continuation, CONTINUATION.to_string());
            self.current = indent + 1;
        }
    }

    fn is_blank_or_comment(&self) -> bool {
        self.input
            .iter()
            .find(|c| !matches!(c, ' ' | '\t'))
            .map_or(true, |c| matches!(c, '!' | '#'))
    }

    fn scan_whitespace(&mut self) {
        let start = self.current;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
        let word = self.collect(start, self.current);
        self.push(LexemeKind::Whitespace, word);
    }

    /// Scan a string literal, or the rest of one carried from the previous line.
    ///
    /// Returns the delimiter when the string is continued onto the next line.
    fn scan_string(&mut self, resume: Option<char>) -> Option<char> {
        let mut word = String::new();
        let delim = match resume {
            Some(delim) => delim,
            None => {
                let delim = self.advance();
                word.push(delim);
                delim
            }
        };

        let mut next_delim = None;
        loop {
            match self.peek() {
                // Unterminated at the end of the line
                None => break,
                Some(CONTINUATION) if self.only_blanks_after(self.current + 1) => {
                    // The marker stays in the line, not in the string
                    next_delim = Some(delim);
                    break;
                }
                Some(c) if c == delim => {
                    self.advance();
                    word.push(delim);
                    if self.peek() == Some(delim) {
                        // Escaped delimiter
                        self.advance();
                        word.push(delim);
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.advance();
                    word.push(c);
                }
            }
        }

        if !word.is_empty() {
            self.push(LexemeKind::String, word);
        }
        next_delim
    }

    fn scan_name(&mut self) {
        let start = self.current;
        while self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let mut word = self.collect(start, self.current);
        if let Some(replacement) = (self.substitute)(&word) {
            log::debug!("replacing {} with {}", word, replacement);
            word = replacement;
        }
        self.push(LexemeKind::Name, word);
    }

    fn scan_number(&mut self) -> String {
        let start = self.current;
        self.skip_digits();

        // Only one decimal point, and not the start of `.eq.` in `1.eq.2`
        if self.peek() == Some('.') && !self.dot_operator_at(self.current) {
            self.advance();
            self.skip_digits();
        }

        self.scan_exponent_and_kind();
        self.collect(start, self.current)
    }

    fn scan_exponent_and_kind(&mut self) {
        if matches!(self.peek(), Some('e' | 'E' | 'd' | 'D')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.skip_digits();
        }

        if self.peek() == Some('_') {
            self.advance();
            if self.peek().map_or(false, |c| c.is_alphabetic()) {
                // Named kind
                while self
                    .peek()
                    .map_or(false, |c| c.is_alphanumeric() || c == '_')
                {
                    self.advance();
                }
            } else {
                self.skip_digits();
            }
        }
    }

    fn scan_dot(&mut self) {
        let start = self.current;
        self.advance();

        if self.peek().map_or(false, |c| c.is_ascii_digit()) {
            // Fraction with no integer part, e.g. `.5e3`
            self.skip_digits();
            self.scan_exponent_and_kind();
            let word = self.collect(start, self.current);
            self.push(LexemeKind::Number, word);
            return;
        }

        while self.peek().map_or(false, |c| c.is_alphabetic()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
        }
        let word = self.collect(start, self.current);
        self.push(LexemeKind::DotOperator, word);
    }

    fn scan_punctuation(&mut self, c: char) {
        let start = self.current;
        self.advance();

        if let Some(next) = self.peek() {
            let pair: String = [c, next].iter().collect();
            if PAIRS.contains(&pair.as_str()) {
                self.advance();
                self.push(LexemeKind::Operator, pair);
                return;
            }
        }

        let kind = match c {
            CONTINUATION => LexemeKind::Continuation,
            SEPARATOR => LexemeKind::Separator,
            _ => LexemeKind::Punctuation,
        };
        let word = self.collect(start, self.current);
        self.push(kind, word);
    }

    /// Whether a dotted operator (`.name.`) starts at `pos`.
    fn dot_operator_at(&self, pos: usize) -> bool {
        let letters = self.input[pos + 1..]
            .iter()
            .take_while(|c| c.is_alphabetic())
            .count();
        letters > 0 && self.input.get(pos + 1 + letters) == Some(&'.')
    }

    fn only_blanks_after(&self, pos: usize) -> bool {
        self.input[pos.min(self.input.len())..]
            .iter()
            .all(|c| matches!(c, ' ' | '\t'))
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn push(&mut self, kind: LexemeKind, text: String) {
        self.lexemes.push(Lexeme::new(kind, text));
    }

    fn collect(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn collect_from(&self, start: usize) -> String {
        self.collect(start, self.input.len())
    }

    fn advance(&mut self) -> char {
        let c = self.input[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }
}
