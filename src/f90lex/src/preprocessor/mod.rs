// f90lex/src/preprocessor/mod.rs

//! A minimal line-oriented preprocessor.
//!
//! Supports object-like `#define`/`#undef`, `#ifdef`/`#ifndef`/`#else`/`#endif`
//! and `#include`. Conditionals are tracked with a single flag, so a nested
//! `#endif` ends the whole suppressed region.

pub mod directive;
pub mod macros;

pub use directive::Directive;
pub use macros::{MacroTable, SharedMacroTable};

use crate::diagnostics::DiagnosticKind;
use crate::error::Result;

/// What the lexer has to do after a directive was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing more to do
    Applied,
    /// Lex the named file in place of the directive
    Include(String),
    /// Report a diagnostic and carry on
    Report(DiagnosticKind),
}

/// Directive state of one lexer: the shared macro table and the
/// suppression flag.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    macros: SharedMacroTable,
    suppressed: bool,
}

impl Preprocessor {
    pub fn new(macros: SharedMacroTable) -> Self {
        Self {
            macros,
            suppressed: false,
        }
    }

    pub fn macros(&self) -> &SharedMacroTable {
        &self.macros
    }

    /// Whether statement content is currently being skipped.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Apply a directive.
    ///
    /// Inside a suppressed region only conditionals take effect.
    pub fn apply(&mut self, directive: Directive) -> Result<Outcome> {
        if self.suppressed && !directive.is_conditional() {
            log::trace!("skipping {:?} in suppressed region", directive);
            return Ok(Outcome::Applied);
        }

        let outcome = match directive {
            Directive::Define { name, body } => {
                log::debug!("define {} as {:?}", name, body);
                self.macros.borrow_mut().define(name, &body)?;
                Outcome::Applied
            }
            Directive::Undef { name } => match self.macros.borrow_mut().undef(&name) {
                Some(_) => Outcome::Applied,
                None => Outcome::Report(DiagnosticKind::UndefinedMacro { name }),
            },
            Directive::Ifdef { name } => {
                if !self.macros.borrow().contains(&name) {
                    self.suppressed = true;
                }
                Outcome::Applied
            }
            Directive::Ifndef { name } => {
                if self.macros.borrow().contains(&name) {
                    self.suppressed = true;
                }
                Outcome::Applied
            }
            Directive::Else => {
                self.suppressed = !self.suppressed;
                Outcome::Applied
            }
            Directive::Endif => {
                self.suppressed = false;
                Outcome::Applied
            }
            Directive::Include { path, .. } => Outcome::Include(path),
            Directive::Unsupported { text } => {
                Outcome::Report(DiagnosticKind::UnsupportedDirective { directive: text })
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pp: &mut Preprocessor, line: &str) -> Outcome {
        pp.apply(Directive::parse(line).unwrap()).unwrap()
    }

    #[test]
    fn test_ifdef_else_endif() {
        let mut pp = Preprocessor::new(MacroTable::new().into_shared());

        run(&mut pp, "#ifdef FOO");
        assert!(pp.is_suppressed());
        run(&mut pp, "#else");
        assert!(!pp.is_suppressed());
        run(&mut pp, "#endif");
        assert!(!pp.is_suppressed());

        run(&mut pp, "#define FOO");
        run(&mut pp, "#ifndef FOO");
        assert!(pp.is_suppressed());
        run(&mut pp, "#endif");
        assert!(!pp.is_suppressed());
    }

    #[test]
    fn test_nested_endif_ends_suppression() {
        let mut pp = Preprocessor::new(MacroTable::new().into_shared());
        run(&mut pp, "#ifdef A");
        run(&mut pp, "#ifdef B");
        run(&mut pp, "#endif");
        assert!(!pp.is_suppressed());
    }

    #[test]
    fn test_suppressed_region_skips_definitions() {
        let mut pp = Preprocessor::new(MacroTable::new().into_shared());
        run(&mut pp, "#ifdef MISSING");
        assert_eq!(run(&mut pp, "#define X 1"), Outcome::Applied);
        assert_eq!(run(&mut pp, "#include \"x.h\""), Outcome::Applied);
        run(&mut pp, "#endif");
        assert!(!pp.macros().borrow().contains("X"));
    }

    #[test]
    fn test_outcomes() {
        let mut pp = Preprocessor::new(MacroTable::new().into_shared());
        assert_eq!(
            run(&mut pp, "#include \"params.h\""),
            Outcome::Include("params.h".into())
        );
        assert_eq!(
            run(&mut pp, "#undef NOPE"),
            Outcome::Report(DiagnosticKind::UndefinedMacro {
                name: "NOPE".into()
            })
        );
        assert_eq!(
            run(&mut pp, "#pragma once"),
            Outcome::Report(DiagnosticKind::UnsupportedDirective {
                directive: "pragma once".into()
            })
        );
    }
}
