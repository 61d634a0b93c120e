// f90lex/src/lexer/continuation.rs

//! Rejoining tokens split by a line continuation.

use crate::error::Result;
use crate::scanner::{scan_line, Lexeme, LexemeClass, CONTINUATION};
use crate::token::Token;

/// Try to merge the last token of a continued line with the first
/// lexeme of the next one.
///
/// `liminals` is the text between the two: the `&`, anything after it and
/// the following line up to `fragment`. `marker` says whether the new line
/// started with its own `&`. A merge only happens when nothing but the
/// continuation sits between the two halves and the joined text rescans
/// as a single lexeme.
pub fn rejoin(
    previous: &Token,
    liminals: &[String],
    marker: bool,
    fragment: &Lexeme,
) -> Result<Option<Token>> {
    if previous.is_expanded() || fragment.class() != LexemeClass::Semantic {
        return Ok(None);
    }
    if !is_adjacent(liminals, marker) {
        return Ok(None);
    }

    let joined = format!("{}{}\n", previous.value, fragment.text);
    let mut lexemes = scan_line(&joined, None)?.lexemes;
    lexemes.pop();
    if lexemes.len() != 1 {
        return Ok(None);
    }
    let Some(lexeme) = lexemes.pop() else {
        return Ok(None);
    };

    let mut split = previous.spelling().to_string();
    liminals.iter().for_each(|lx| split.push_str(lx));
    if marker {
        split.push(CONTINUATION);
    }
    split.push_str(&fragment.text);

    let mut merged = Token::from(lexeme);
    merged.head = previous.head.clone();
    merged.split = Some(split);
    log::trace!("rejoined {:?} across a continuation", merged.value);
    Ok(Some(merged))
}

/// The `&` must follow the token directly, and without a leading `&` the
/// continued text must start in the first column.
fn is_adjacent(liminals: &[String], marker: bool) -> bool {
    let touches_previous = liminals
        .first()
        .is_some_and(|lx| lx.len() == 1 && lx.starts_with(CONTINUATION));
    let touches_next = marker || liminals.last().is_some_and(|lx| lx.ends_with('\n'));
    touches_previous && touches_next
}
