// f90lex/src/config.rs

use crate::error::{LexError, Result};
use crate::preprocessor::MacroTable;
use std::path::PathBuf;
use thiserror::Error;

/// Include depth used when none is configured.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Settings shared by a lexer and the lexers of its included files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerConfig {
    /// Directory `#include` paths are resolved against
    pub include_root: PathBuf,
    /// Deepest allowed include nesting; includes beyond it are skipped
    pub max_include_depth: usize,
    /// Macros defined before the first line is read, in order
    pub defines: Vec<(String, String)>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            include_root: PathBuf::from("."),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            defines: Vec::new(),
        }
    }
}

impl LexerConfig {
    pub fn builder() -> LexerConfigBuilder {
        LexerConfigBuilder::default()
    }

    /// A fresh macro table holding the predefined macros.
    pub fn macro_table(&self) -> Result<MacroTable> {
        let mut table = MacroTable::new();
        for (name, body) in &self.defines {
            table.define(name.as_str(), body)?;
        }
        Ok(table)
    }
}

#[derive(Default)]
pub struct LexerConfigBuilder {
    include_root: Option<PathBuf>,
    max_include_depth: Option<usize>,
    defines: Vec<(String, String)>,
}

impl LexerConfigBuilder {
    pub fn build(&self) -> std::result::Result<LexerConfig, LexerConfigBuilderError> {
        Self::validate(&self.defines)?;
        let defaults = LexerConfig::default();
        Ok(LexerConfig {
            include_root: self
                .include_root
                .clone()
                .unwrap_or(defaults.include_root),
            max_include_depth: self
                .max_include_depth
                .unwrap_or(defaults.max_include_depth),
            defines: self.defines.clone(),
        })
    }
    pub fn include_root<P: Into<PathBuf>>(&mut self, include_root: P) -> &mut Self {
        self.include_root = Some(include_root.into());
        self
    }
    pub fn max_include_depth(&mut self, max_include_depth: usize) -> &mut Self {
        self.max_include_depth = Some(max_include_depth);
        self
    }
    pub fn define<N: Into<String>, B: Into<String>>(&mut self, name: N, body: B) -> &mut Self {
        self.defines.push((name.into(), body.into()));
        self
    }
    /// Add a definition written as `NAME` or `NAME=BODY`.
    pub fn define_str(&mut self, definition: &str) -> Result<&mut Self> {
        let (name, body) = parse_define(definition)?;
        Ok(self.define(name, body))
    }
    fn validate(defines: &[(String, String)]) -> std::result::Result<(), LexerConfigBuilderError> {
        for (name, _) in defines {
            Self::validate_macro_name(name)?;
        }
        Ok(())
    }
    fn validate_macro_name(name: &str) -> std::result::Result<(), LexerConfigBuilderError> {
        let mut chars = name.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(LexerConfigBuilderError::InvalidMacroName(name.to_string()));
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LexerConfigBuilderError {
    #[error("macro name must be an identifier: {0:?}")]
    InvalidMacroName(String),
}

/// Split a command-line style definition into name and body.
///
/// `NAME` alone defines `NAME` with an empty body.
pub fn parse_define(definition: &str) -> Result<(String, String)> {
    let (name, body) = match definition.split_once('=') {
        Some((name, body)) => (name.trim(), body.trim()),
        None => (definition.trim(), ""),
    };
    if name.is_empty() {
        return Err(LexError::invalid_define(definition));
    }
    Ok((name.to_string(), body.to_string()))
}
