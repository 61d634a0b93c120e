// f90lex/src/lexer/document.rs

use crate::token::Statement;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a lexer produced for one source: its statements, the
/// liminal text after the last statement and the documents of the files
/// it included.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub statements: Vec<Statement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inclusions: Vec<Inclusion>,
}

/// A file pulled in by `#include`, lexed in its own right.
#[derive(Debug, Clone, Serialize)]
pub struct Inclusion {
    pub path: PathBuf,
    pub document: Document,
}

impl Document {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Rebuild the source text. Included files are not inlined; their
    /// `#include` lines are reproduced instead.
    pub fn to_source(&self) -> String {
        let mut out: String = self.statements.iter().map(Statement::to_source).collect();
        self.trailing.iter().for_each(|lx| out.push_str(lx));
        out
    }

    /// Rebuild the text with macros expanded and split tokens joined.
    pub fn to_expanded(&self) -> String {
        let mut out: String = self
            .statements
            .iter()
            .map(Statement::to_expanded)
            .collect();
        self.trailing.iter().for_each(|lx| out.push_str(lx));
        out
    }

    /// Statements of this document and of every included file, depth first.
    pub fn all_statements(&self) -> Vec<&Statement> {
        let mut all: Vec<&Statement> = self.statements.iter().collect();
        for inclusion in &self.inclusions {
            all.extend(inclusion.document.all_statements());
        }
        all
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
