// f90lex/src/diagnostics.rs

//! Non-fatal preprocessor diagnostics.
//!
//! Unsupported directives, missing include files and the like do not stop
//! lexing. They are reported to a [`DiagnosticSink`] handed to the lexer and
//! shared with any nested lexer created for an include.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// A sink shared between a lexer and the lexers of its included files.
pub type SharedSink = Rc<RefCell<dyn DiagnosticSink>>;

/// A diagnostic raised while lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What happened
    pub kind: DiagnosticKind,
    /// File being lexed, if the lexer was opened from one
    pub source: Option<PathBuf>,
    /// Line number (1-based) of the line that triggered it
    pub line: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, source: Option<PathBuf>, line: usize) -> Self {
        Self { kind, source, line }
    }

    pub fn severity(&self) -> log::Level {
        match self.kind {
            DiagnosticKind::UnsupportedDirective { .. }
            | DiagnosticKind::IncludeNotFound { .. }
            | DiagnosticKind::IncludeDepthExceeded { .. } => log::Level::Warn,
            DiagnosticKind::UndefinedMacro { .. } => log::Level::Info,
            DiagnosticKind::MacroExpanded { .. } => log::Level::Debug,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(path) => write!(f, "{}:{}: {}", path.display(), self.line, self.kind),
            None => write!(f, "line {}: {}", self.line, self.kind),
        }
    }
}

/// Kinds of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A directive the preprocessor does not handle (`#pragma`, `#if`, ...)
    UnsupportedDirective { directive: String },
    /// `#include` of a file that does not exist
    IncludeNotFound { path: PathBuf },
    /// `#include` nested deeper than the configured limit
    IncludeDepthExceeded { path: PathBuf, depth: usize },
    /// `#undef` of a name that was never defined
    UndefinedMacro { name: String },
    /// A macro invocation replaced by its body
    MacroExpanded {
        name: String,
        replacement: Vec<String>,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedDirective { directive } => {
                write!(f, "unsupported preprocess directive: {}", directive)
            }
            DiagnosticKind::IncludeNotFound { path } => {
                write!(f, "include file {} not found; skipping", path.display())
            }
            DiagnosticKind::IncludeDepthExceeded { path, depth } => write!(
                f,
                "include of {} exceeds maximum depth {}; skipping",
                path.display(),
                depth
            ),
            DiagnosticKind::UndefinedMacro { name } => {
                write!(f, "unset identifier {} was never defined", name)
            }
            DiagnosticKind::MacroExpanded { name, replacement } => {
                write!(f, "replacing {} with {}", name, replacement.join(" "))
            }
        }
    }
}

/// Receiver of lexer diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade at their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.severity(), "f90lex: {}", diagnostic);
    }
}

/// Collects diagnostics, mostly for tests and batch tools.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// The default sink: log everything.
pub fn log_sink() -> SharedSink {
    Rc::new(RefCell::new(LogSink))
}
