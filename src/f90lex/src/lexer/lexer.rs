// f90lex/src/lexer/lexer.rs

//! Statement assembly.
//!
//! The lexer pulls physical lines from a source, scans them, runs
//! preprocessor directives and groups the semantic lexemes into logical
//! statements. Every liminal lexeme (whitespace, comments, line ends,
//! continuation markers, separators, directive lines and suppressed text)
//! is attached to a neighbouring token so the input can be rebuilt exactly.

use super::continuation::rejoin;
use super::document::{Document, Inclusion};
use crate::config::LexerConfig;
use crate::diagnostics::{log_sink, Diagnostic, DiagnosticKind, SharedSink};
use crate::error::{LexError, Result};
use crate::preprocessor::{Directive, MacroTable, Outcome, Preprocessor, SharedMacroTable};
use crate::scanner::{split_terminator, Lexeme, LexemeClass, Scanner, DIRECTIVE};
use crate::source::{FileLines, SourceLines, TextLines};
use crate::token::{Statement, Token};
use std::io::{self, BufRead};
use std::mem;
use std::path::{Path, PathBuf};

/// Iterator of logical statements over a source of physical lines.
///
/// Lines must keep their terminators (see [`SourceLines`]); a line without
/// one is taken to be the last line of the input.
pub struct Lexer<I> {
    lines: I,
    scanner: Scanner,
    /// Lexemes of the current line not yet assembled
    cache: Vec<Lexeme>,
    /// Liminals read ahead that belong to the next statement
    pending: Vec<String>,
    preprocessor: Preprocessor,
    diagnostics: SharedSink,
    include_root: PathBuf,
    max_include_depth: usize,
    depth: usize,
    source: Option<PathBuf>,
    line_number: usize,
    exhausted: bool,
    /// Error hit while reading ahead, returned after the statement
    deferred: Option<LexError>,
    failed: bool,
    inclusions: Vec<Inclusion>,
}

impl<I> Lexer<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// A lexer with an empty macro table and default settings.
    pub fn new(lines: I) -> Self {
        Self::build(
            lines,
            MacroTable::new().into_shared(),
            log_sink(),
            &LexerConfig::default(),
            0,
        )
    }

    /// A lexer with the include root, depth limit and predefined macros of
    /// `config`.
    pub fn with_config(lines: I, config: &LexerConfig) -> Result<Self> {
        let macros = config.macro_table()?.into_shared();
        Ok(Self::build(lines, macros, log_sink(), config, 0))
    }

    fn build(
        lines: I,
        macros: SharedMacroTable,
        diagnostics: SharedSink,
        config: &LexerConfig,
        depth: usize,
    ) -> Self {
        Self {
            lines,
            scanner: Scanner::new(),
            cache: Vec::new(),
            pending: Vec::new(),
            preprocessor: Preprocessor::new(macros),
            diagnostics,
            include_root: config.include_root.clone(),
            max_include_depth: config.max_include_depth,
            depth,
            source: None,
            line_number: 0,
            exhausted: false,
            deferred: None,
            failed: false,
            inclusions: Vec::new(),
        }
    }

    /// Share a macro table, e.g. with another lexer.
    pub fn with_macros(mut self, macros: SharedMacroTable) -> Self {
        self.preprocessor = Preprocessor::new(macros);
        self
    }

    /// Send diagnostics to `sink` instead of the log.
    pub fn with_diagnostics(mut self, sink: SharedSink) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Name the source in diagnostics.
    pub fn with_source_name<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn macros(&self) -> SharedMacroTable {
        self.preprocessor.macros().clone()
    }

    /// Number of physical lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Liminal text read after the last statement.
    pub fn pending_liminals(&self) -> &[String] {
        &self.pending
    }

    /// Documents of the files included so far, in order of inclusion.
    pub fn take_inclusions(&mut self) -> Vec<Inclusion> {
        mem::take(&mut self.inclusions)
    }

    /// Lex the whole source.
    pub fn into_document(mut self) -> Result<Document> {
        let statements = self.by_ref().collect::<Result<Vec<_>>>()?;
        Ok(Document {
            statements,
            trailing: mem::take(&mut self.pending),
            inclusions: mem::take(&mut self.inclusions),
        })
    }

    fn report(&self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(kind, self.source.clone(), self.line_number);
        self.diagnostics.borrow_mut().report(diagnostic);
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }
        match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                Ok(Some(line?))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn scan(&mut self, line: &str) -> Result<Vec<Lexeme>> {
        let line_number = self.line_number;
        self.scanner
            .scan(line)
            .map_err(|err| err.at_line(line_number))
    }

    /// Read lines until one has semantic content, collecting the liminal
    /// text before it.
    ///
    /// The remaining lexemes of that line are left in the cache. Directive
    /// lines are run as they are read; lines in a suppressed region are
    /// kept verbatim.
    fn gather_liminals(&mut self) -> Result<Vec<String>> {
        let mut liminals = Vec::new();

        while let Some(line) = self.next_line()? {
            if self.preprocessor.is_suppressed() && !is_directive_line(&line) {
                let (body, terminator) = split_terminator(&line);
                liminals.extend(
                    [body, terminator]
                        .into_iter()
                        .filter(|text| !text.is_empty())
                        .map(String::from),
                );
                continue;
            }

            let mut lexemes = self.scan(&line)?;
            let boundary = lexemes
                .iter()
                .position(|lx| !lx.is_liminal())
                .unwrap_or(lexemes.len());

            let directive = lexemes[..boundary]
                .iter()
                .find(|lx| !lx.is_whitespace())
                .filter(|lx| lx.is_directive())
                .map(|lx| lx.text.clone());
            if let Some(text) = directive {
                self.preprocess(&text)?;
            }

            let rest = lexemes.split_off(boundary);
            liminals.extend(lexemes.into_iter().map(|lx| lx.text));
            if self.preprocessor.is_suppressed() {
                liminals.extend(rest.into_iter().map(|lx| lx.text));
            } else if !rest.is_empty() {
                self.cache = rest;
                break;
            }
        }

        Ok(liminals)
    }

    fn preprocess(&mut self, text: &str) -> Result<()> {
        let line_number = self.line_number;
        if self.preprocessor.is_suppressed() && !Directive::is_conditional_line(text) {
            log::trace!("line {}: skipping suppressed directive", line_number);
            return Ok(());
        }
        let directive = Directive::parse(text).map_err(|err| err.at_line(line_number))?;
        log::debug!("line {}: {:?}", line_number, directive);

        match self
            .preprocessor
            .apply(directive)
            .map_err(|err| err.at_line(line_number))?
        {
            Outcome::Applied => {}
            Outcome::Include(path) => self.include(&path)?,
            Outcome::Report(kind) => self.report(kind),
        }
        Ok(())
    }

    /// Lex an included file with a nested lexer sharing this lexer's
    /// macros and diagnostics.
    fn include(&mut self, name: &str) -> Result<()> {
        let path = self.include_root.join(name);
        if !path.is_file() {
            self.report(DiagnosticKind::IncludeNotFound {
                path: PathBuf::from(name),
            });
            return Ok(());
        }
        if self.depth >= self.max_include_depth {
            self.report(DiagnosticKind::IncludeDepthExceeded {
                path: PathBuf::from(name),
                depth: self.max_include_depth,
            });
            return Ok(());
        }

        log::info!("including {}", path.display());
        let lines = SourceLines::open(&path).map_err(|source| LexError::IncludeRead {
            path: path.clone(),
            source,
        })?;
        let config = LexerConfig {
            include_root: self.include_root.clone(),
            max_include_depth: self.max_include_depth,
            defines: Vec::new(),
        };
        let nested = Lexer::build(
            lines,
            self.macros(),
            self.diagnostics.clone(),
            &config,
            self.depth + 1,
        )
        .with_source_name(path.clone());
        let document = nested.into_document()?;

        self.inclusions.push(Inclusion { path, document });
        Ok(())
    }

    /// Assemble the next statement.
    ///
    /// Returns `None` when the lexemes read produced no token, either at
    /// the end of input or because a macro expanded to nothing.
    fn assemble(&mut self) -> Result<Option<Statement>> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut liminals = mem::take(&mut self.pending);
        let mut continued = false;

        loop {
            if self.cache.is_empty() {
                let gathered = self.gather_liminals()?;
                liminals.extend(gathered);
                if self.cache.is_empty() {
                    break;
                }
            }

            let mut lexemes = mem::take(&mut self.cache);
            let mut i = self.resume(&mut tokens, &mut liminals, &lexemes, continued)?;
            continued = false;

            while i < lexemes.len() {
                let lexeme = &lexemes[i];
                match lexeme.class() {
                    LexemeClass::Whitespace | LexemeClass::Comment => {
                        liminals.push(lexeme.text.clone())
                    }
                    LexemeClass::Separator if tokens.is_empty() => {
                        liminals.push(lexeme.text.clone())
                    }
                    LexemeClass::Separator => {
                        // The separator and what follows it up to the next
                        // statement stay with this one
                        let end = lexemes[i..]
                            .iter()
                            .position(|lx| !(lx.is_liminal() || lx.is_continuation()))
                            .map_or(lexemes.len(), |n| i + n);
                        liminals.extend(lexemes[i..end].iter().map(|lx| lx.text.clone()));
                        self.cache = lexemes.split_off(end);
                        break;
                    }
                    LexemeClass::Continuation => {
                        liminals.extend(lexemes[i..].iter().map(|lx| lx.text.clone()));
                        continued = true;
                        break;
                    }
                    LexemeClass::Semantic => self.push_semantic(&mut tokens, &mut liminals, lexeme),
                }
                i += 1;
            }

            if !continued {
                break;
            }
        }

        if tokens.is_empty() {
            self.pending = liminals;
            return Ok(None);
        }

        // Liminals up to the next statement belong to this one
        if self.cache.is_empty() {
            match self.gather_liminals() {
                Ok(gathered) => liminals.extend(gathered),
                Err(err) => self.deferred = Some(err),
            }
        }
        if let Some(last) = tokens.last_mut() {
            last.tail.append(&mut liminals);
        }
        Ok(Statement::new(tokens))
    }

    /// Handle the start of a line that follows a continuation.
    ///
    /// Merges a token split across the break when possible and moves a
    /// leading `&` into the liminals. Returns the index of the first
    /// lexeme left to assemble.
    fn resume(
        &self,
        tokens: &mut Vec<Token>,
        liminals: &mut Vec<String>,
        lexemes: &[Lexeme],
        continued: bool,
    ) -> Result<usize> {
        let marker = lexemes.first().is_some_and(Lexeme::is_continuation);
        let at = usize::from(marker);

        if continued {
            if let (Some(previous), Some(fragment)) = (tokens.last(), lexemes.get(at)) {
                if let Some(merged) = rejoin(previous, liminals, marker, fragment)? {
                    tokens.pop();
                    tokens.push(merged);
                    liminals.clear();
                    return Ok(at + 1);
                }
            }
        }

        if marker {
            liminals.push(lexemes[0].text.clone());
        }
        Ok(at)
    }

    /// Push a semantic lexeme, expanding it if it names a macro.
    fn push_semantic(&self, tokens: &mut Vec<Token>, liminals: &mut Vec<String>, lexeme: &Lexeme) {
        let body = self
            .preprocessor
            .macros()
            .borrow()
            .get(&lexeme.text)
            .map(<[Lexeme]>::to_vec);

        let Some(body) = body else {
            attach(tokens, liminals, Token::from(lexeme.clone()));
            return;
        };

        self.report(DiagnosticKind::MacroExpanded {
            name: lexeme.text.clone(),
            replacement: body.iter().map(|lx| lx.text.clone()).collect(),
        });
        if body.is_empty() {
            // No token to carry the invocation, keep it as liminal text
            liminals.push(lexeme.text.clone());
        }
        for (n, replacement) in body.iter().enumerate() {
            attach(tokens, liminals, Token::expanded(replacement, &lexeme.text, n == 0));
        }
    }
}

/// Attach pending liminals to the previous token, or to `token` itself
/// when it starts the statement.
fn attach(tokens: &mut Vec<Token>, liminals: &mut Vec<String>, mut token: Token) {
    match tokens.last_mut() {
        Some(last) => last.tail.append(liminals),
        None => token.head.append(liminals),
    }
    tokens.push(token);
}

fn is_directive_line(line: &str) -> bool {
    line.trim_start_matches([' ', '\t']).starts_with(DIRECTIVE)
}

impl<I> Iterator for Lexer<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(err) = self.deferred.take() {
            self.failed = true;
            return Some(Err(err));
        }
        loop {
            match self.assemble() {
                Ok(Some(statement)) => return Some(Ok(statement)),
                Ok(None) if self.exhausted && self.cache.is_empty() => return None,
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl Lexer<TextLines> {
    /// Lex an in-memory text.
    pub fn from_text(text: &str) -> Self {
        Self::new(SourceLines::from_text(text))
    }
}

impl<R: BufRead> Lexer<SourceLines<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::new(SourceLines::new(reader))
    }
}

impl Lexer<FileLines> {
    /// Lex a file. Includes resolve against the current directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, &LexerConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &LexerConfig) -> Result<Self> {
        let path = path.as_ref();
        let lines = SourceLines::open(path)?;
        Ok(Self::with_config(lines, config)?.with_source_name(path))
    }
}
