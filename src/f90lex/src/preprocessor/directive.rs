// f90lex/src/preprocessor/directive.rs

//! Parsing of `#` directive lines.

use crate::error::{LexError, Result};
use crate::scanner::DIRECTIVE;

/// A parsed preprocessor directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `#define NAME [BODY]`
    Define { name: String, body: String },
    /// `#undef NAME`
    Undef { name: String },
    /// `#ifdef NAME`
    Ifdef { name: String },
    /// `#ifndef NAME`
    Ifndef { name: String },
    /// `#else`
    Else,
    /// `#endif`
    Endif,
    /// `#include "PATH"` or `#include <PATH>`
    Include { path: String, system: bool },
    /// Anything else, kept as the text after `#`
    Unsupported { text: String },
}

impl Directive {
    /// Parse the text of a directive lexeme, `#` included.
    ///
    /// Whitespace is allowed between `#` and the keyword. Errors carry line
    /// number 0; callers attach the real line with [`LexError::at_line`].
    pub fn parse(text: &str) -> Result<Self> {
        let line = text.trim_end_matches(['\r', '\n']);
        let body = line.strip_prefix(DIRECTIVE).unwrap_or(line).trim();
        let (keyword, rest) = split_word(body);

        let directive = match keyword {
            "define" => {
                let (name, value) = split_word(rest);
                Directive::Define {
                    name: required(name, line, "missing macro name")?,
                    body: value.to_string(),
                }
            }
            "undef" => Directive::Undef {
                name: required(first_word(rest), line, "missing macro name")?,
            },
            "ifdef" => Directive::Ifdef {
                name: required(first_word(rest), line, "missing macro name")?,
            },
            "ifndef" => Directive::Ifndef {
                name: required(first_word(rest), line, "missing macro name")?,
            },
            "else" => Directive::Else,
            "endif" => Directive::Endif,
            // `#include"file.h"` has no space after the keyword
            word if word.starts_with("include") => {
                let argument = body["include".len()..].trim_start();
                let (path, system) = include_path(argument)
                    .ok_or_else(|| LexError::malformed_directive(line, 0, "bad include path"))?;
                Directive::Include {
                    path: path.to_string(),
                    system,
                }
            }
            _ => Directive::Unsupported {
                text: body.to_string(),
            },
        };
        Ok(directive)
    }

    /// Whether a directive line is a conditional, without parsing the rest.
    pub fn is_conditional_line(text: &str) -> bool {
        let line = text.trim_end_matches(['\r', '\n']);
        let body = line.strip_prefix(DIRECTIVE).unwrap_or(line).trim();
        matches!(split_word(body).0, "ifdef" | "ifndef" | "else" | "endif")
    }

    /// Whether this directive takes part in conditional compilation.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            Directive::Ifdef { .. } | Directive::Ifndef { .. } | Directive::Else | Directive::Endif
        )
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim()),
        None => (text, ""),
    }
}

fn first_word(text: &str) -> &str {
    split_word(text).0
}

fn required(name: &str, line: &str, reason: &'static str) -> Result<String> {
    if name.is_empty() {
        Err(LexError::malformed_directive(line, 0, reason))
    } else {
        Ok(name.to_string())
    }
}

fn include_path(argument: &str) -> Option<(&str, bool)> {
    let mut chars = argument.chars();
    let (close, system) = match chars.next()? {
        '"' => ('"', false),
        '<' => ('>', true),
        _ => return None,
    };
    let inner = &argument[1..];
    let end = inner.find(close)?;
    let path = &inner[..end];
    if path.is_empty() {
        None
    } else {
        Some((path, system))
    }
}
