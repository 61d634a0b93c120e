// f90lex/tests/streaming_test.rs

use f90lex::error::Result;
use f90lex::source::SourceLines;
use f90lex::{LexerConfig, Lexer, Token};
use std::fs;
use tempfile::tempdir;

const SOURCE: &str = "\
! header
#include \"kinds.h\"
real(rk) :: a, &
            b
a = 1.0_rk ; b = a  ! set

! trailing comment
";

#[test]
fn streamed_statements_rebuild_the_source() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("kinds.h"), "integer, parameter :: rk = 8\n")?;
    let config = LexerConfig::builder()
        .include_root(dir.path())
        .build()
        .unwrap();

    let mut lexer = Lexer::with_config(SourceLines::from_text(SOURCE), &config)?;
    let mut rebuilt = String::new();
    let mut tokens: Vec<Token> = Vec::new();
    for statement in lexer.by_ref() {
        let statement = statement?;
        rebuilt.push_str(&statement.to_source());
        tokens.extend(statement.into_tokens());
    }

    // Everything after the last statement is left with the lexer
    assert_eq!(lexer.pending_liminals().concat(), "");
    rebuilt.push_str(&lexer.pending_liminals().concat());
    assert_eq!(rebuilt, SOURCE);
    assert_eq!(lexer.line_number(), SOURCE.lines().count());

    let values: Vec<&str> = tokens.iter().map(Token::as_str).collect();
    assert_eq!(
        values,
        vec!["real", "(", "rk", ")", "::", "a", ",", "b", "a", "=", "1.0_rk", "b", "=", "a"]
    );

    let inclusions = lexer.take_inclusions();
    assert_eq!(inclusions.len(), 1);
    assert_eq!(inclusions[0].path, dir.path().join("kinds.h"));
    assert_eq!(
        inclusions[0].document.statements[0].values(),
        vec!["integer", ",", "parameter", "::", "rk", "=", "8"]
    );
    assert!(lexer.take_inclusions().is_empty());
    Ok(())
}

#[test]
fn liminals_after_the_last_statement_stay_pending() -> Result<()> {
    let mut lexer = Lexer::from_text("x = 1\n");
    let first = lexer.next().transpose()?;
    assert!(first.is_some());
    assert!(lexer.next().is_none());
    assert!(lexer.pending_liminals().is_empty());

    // Only liminal text: nothing is emitted and it all stays pending
    let mut lexer = Lexer::from_text("! only a comment\n\n");
    assert!(lexer.next().is_none());
    assert_eq!(lexer.pending_liminals().concat(), "! only a comment\n\n");
    assert_eq!(lexer.line_number(), 2);
    Ok(())
}
