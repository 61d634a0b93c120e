// f90lex/src/lexer/mod.rs

pub mod continuation;
pub mod document;
pub mod lexer;

pub use document::{Document, Inclusion};
pub use lexer::Lexer;
