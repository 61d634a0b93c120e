// f90lex/src/preprocessor/macros.rs

//! The macro table shared by a lexer and its includes.

use crate::error::Result;
use crate::scanner::{scan_line, Lexeme, LexemeClass};
use linked_hash_map::LinkedHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to a macro table shared between nested lexers.
pub type SharedMacroTable = Rc<RefCell<MacroTable>>;

/// Object-like macros in order of definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTable {
    defines: LinkedHashMap<String, Vec<Lexeme>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedMacroTable {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` to the lexemes of `body`, replacing any earlier binding.
    ///
    /// Whitespace and comments in the body are dropped.
    pub fn define<S: Into<String>>(&mut self, name: S, body: &str) -> Result<()> {
        let scanned = scan_line(&format!("{}\n", body), None)?;
        let lexemes = scanned
            .lexemes
            .into_iter()
            .filter(|lx| lx.class() == LexemeClass::Semantic)
            .collect();
        self.define_lexemes(name, lexemes);
        Ok(())
    }

    pub fn define_lexemes<S: Into<String>>(&mut self, name: S, lexemes: Vec<Lexeme>) {
        self.defines.insert(name.into(), lexemes);
    }

    /// Remove a binding, returning its body if there was one.
    pub fn undef(&mut self, name: &str) -> Option<Vec<Lexeme>> {
        self.defines.remove(name)
    }

    /// Replacement lexemes for `name`. Names match exactly.
    pub fn get(&self, name: &str) -> Option<&[Lexeme]> {
        self.defines.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(table: &MacroTable, name: &str) -> Vec<String> {
        table
            .get(name)
            .unwrap()
            .iter()
            .map(|lx| lx.text.clone())
            .collect()
    }

    #[test]
    fn test_define_strips_whitespace() {
        let mut table = MacroTable::new();
        table.define("FOO", "1 + 2*x").unwrap();
        assert_eq!(body(&table, "FOO"), vec!["1", "+", "2", "*", "x"]);
    }

    #[test]
    fn test_define_empty_body() {
        let mut table = MacroTable::new();
        table.define("DEBUG", "").unwrap();
        assert!(table.contains("DEBUG"));
        assert!(table.get("DEBUG").unwrap().is_empty());
    }

    #[test]
    fn test_define_drops_comments() {
        let mut table = MacroTable::new();
        table.define("N", "10 ! size").unwrap();
        assert_eq!(body(&table, "N"), vec!["10"]);
    }

    #[test]
    fn test_redefine_and_undef() {
        let mut table = MacroTable::new();
        table.define("A", "1").unwrap();
        table.define("B", "2").unwrap();
        table.define("A", "3").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(body(&table, "A"), vec!["3"]);

        assert!(table.undef("A").is_some());
        assert!(table.undef("A").is_none());
        assert!(!table.contains("A"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = MacroTable::new();
        table.define("FOO", "1").unwrap();
        assert!(table.contains("FOO"));
        assert!(!table.contains("foo"));
    }

    #[test]
    fn test_names_in_definition_order() {
        let mut table = MacroTable::new();
        for name in ["Z", "A", "M"] {
            table.define(name, "0").unwrap();
        }
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_shared_handle_sees_mutations() {
        let shared = MacroTable::new().into_shared();
        let other = Rc::clone(&shared);
        other.borrow_mut().define("X", "42").unwrap();
        assert!(shared.borrow().contains("X"));
    }
}
