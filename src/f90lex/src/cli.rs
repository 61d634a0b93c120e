// f90lex/src/cli.rs

use crate::config::LexerConfig;
use crate::lexer::{Document, Lexer};
use crate::scanner::Scanner;
use crate::source::SourceLines;
use anyhow::Context;
use clap::ValueEnum;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// What to print for a lexed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// The source rebuilt from the statements
    Roundtrip,
    /// One line of token values per statement
    Statements,
    /// Every token with its liminal text
    Tokens,
    /// Raw scanner output, line by line
    Lexemes,
    /// The source with macros expanded
    Expanded,
    /// The document as JSON (needs the `json` feature)
    Json,
}

/// Build the lexer configuration from command-line values.
pub fn build_config(
    include_root: Option<PathBuf>,
    defines: &[String],
    max_include_depth: Option<usize>,
) -> anyhow::Result<LexerConfig> {
    let mut builder = LexerConfig::builder();
    if let Some(root) = include_root {
        builder.include_root(root);
    }
    if let Some(depth) = max_include_depth {
        builder.max_include_depth(depth);
    }
    for definition in defines {
        builder.define_str(definition)?;
    }
    Ok(builder.build()?)
}

/// Lex `path` and write the output for `mode`.
///
/// With `check`, a roundtrip that does not reproduce the file is an error.
pub fn lex_file<W: Write>(
    path: &Path,
    mode: Mode,
    config: &LexerConfig,
    check: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    match mode {
        Mode::Lexemes => write_lexemes(path, out)?,
        Mode::Roundtrip => {
            let rebuilt = lex_document(path, config)?.to_source();
            if check {
                let original = fs_err::read_to_string(path)?;
                if rebuilt != original {
                    anyhow::bail!("Roundtrip of {} does not match the input", path.display());
                }
            }
            out.write_all(rebuilt.as_bytes())?;
        }
        Mode::Statements => write_statements(&lex_document(path, config)?, out)?,
        Mode::Tokens => write_tokens(&lex_document(path, config)?, out)?,
        Mode::Expanded => out.write_all(lex_document(path, config)?.to_expanded().as_bytes())?,
        Mode::Json => write_json(&lex_document(path, config)?, out)?,
    }
    Ok(())
}

fn lex_document(path: &Path, config: &LexerConfig) -> anyhow::Result<Document> {
    let file = fs_err::File::open(path)?;
    let lines = SourceLines::new(BufReader::new(file));
    let document = Lexer::with_config(lines, config)?
        .with_source_name(path)
        .into_document()
        .with_context(|| format!("Failed to lex {}", path.display()))?;
    log::info!(
        "{}: {} statements, {} includes",
        path.display(),
        document.len(),
        document.inclusions.len()
    );
    Ok(document)
}

fn write_lexemes<W: Write>(path: &Path, out: &mut W) -> anyhow::Result<()> {
    let file = fs_err::File::open(path)?;
    let mut scanner = Scanner::new();
    for (n, line) in SourceLines::new(BufReader::new(file)).enumerate() {
        let lexemes = scanner
            .scan(&line?)
            .map_err(|err| err.at_line(n + 1))
            .with_context(|| format!("Failed to scan {}", path.display()))?;
        for lexeme in lexemes {
            writeln!(out, "{:>5} {:<12} {:?}", n + 1, lexeme.kind, lexeme.text)?;
        }
    }
    Ok(())
}

fn write_statements<W: Write>(document: &Document, out: &mut W) -> anyhow::Result<()> {
    for statement in document {
        writeln!(out, "{}", statement.values().join(" "))?;
    }
    for inclusion in &document.inclusions {
        writeln!(out, "# included from {}", inclusion.path.display())?;
        write_statements(&inclusion.document, out)?;
    }
    Ok(())
}

fn write_tokens<W: Write>(document: &Document, out: &mut W) -> anyhow::Result<()> {
    for (n, statement) in document.iter().enumerate() {
        writeln!(out, "statement {}", n + 1)?;
        for token in statement {
            write!(out, "  {:<12} {:?}", token.kind, token.value)?;
            if !token.head.is_empty() {
                write!(out, " head={:?}", token.head)?;
            }
            if !token.tail.is_empty() {
                write!(out, " tail={:?}", token.tail)?;
            }
            if let Some(split) = &token.split {
                write!(out, " split={:?}", split)?;
            }
            if let Some(name) = &token.macro_origin {
                write!(out, " macro={}", name)?;
            }
            writeln!(out)?;
        }
    }
    if !document.trailing.is_empty() {
        writeln!(out, "trailing {:?}", document.trailing)?;
    }
    for inclusion in &document.inclusions {
        writeln!(out, "# included from {}", inclusion.path.display())?;
        write_tokens(&inclusion.document, out)?;
    }
    Ok(())
}

#[cfg(feature = "json")]
fn write_json<W: Write>(document: &Document, out: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, document)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(not(feature = "json"))]
fn write_json<W: Write>(_document: &Document, _out: &mut W) -> anyhow::Result<()> {
    anyhow::bail!("JSON output requires the `json` feature")
}
