// f90lex/tests/roundtrip_test.rs

use f90lex::error::Result;
use f90lex::source::SourceLines;
use f90lex::{reads, tokenize, LexError, Lexer, LexemeKind, Token};

const MODULE: &str = r#"! Grid utilities
module grid_utils
  use iso_fortran_env, only: rk => real64
  implicit none
  private ; public :: spacing

  real(rk), parameter :: eps = 2.5e-3_rk  ! tolerance
  integer, parameter :: levels(3) = (/ 1, 2, 3 /)

contains

  pure function spacing(x, n) result(dx)
    real(rk), intent(in) :: x(:)
    integer, intent(in) :: n
    real(rk) :: dx
    character(len=*), parameter :: msg = 'spacing of ' // &
                                         'the grid'
    if (n > 1 .and. x(n) /= x(1)) then
      dx = (x(n) - x(1)) / real(n - 1, rk)
    else
      dx = 1.0d0 ; return
    end if
  end function spacing

end module grid_utils
"#;

#[test]
fn roundtrip_module() -> Result<()> {
    let document = reads(MODULE)?;
    assert_eq!(document.to_source(), MODULE);
    Ok(())
}

#[test]
fn roundtrip_is_stable_line_by_line() -> Result<()> {
    // Any prefix of whole lines must also rebuild exactly
    let mut prefix = String::new();
    for line in MODULE.split_inclusive('\n') {
        prefix.push_str(line);
        let document = reads(&prefix)?;
        assert_eq!(document.to_source(), prefix);
    }
    Ok(())
}

#[test]
fn module_statements() -> Result<()> {
    let statements = tokenize(MODULE)?;

    assert_eq!(statements[0], vec!["module", "grid_utils"]);
    assert_eq!(
        statements[1],
        vec!["use", "iso_fortran_env", ",", "only", ":", "rk", "=>", "real64"]
    );
    assert_eq!(statements[3], vec!["private"]);
    assert_eq!(statements[4], vec!["public", "::", "spacing"]);
    assert_eq!(
        statements[5],
        vec!["real", "(", "rk", ")", ",", "parameter", "::", "eps", "=", "2.5e-3_rk"]
    );
    assert!(statements.contains(&vec![
        "character".to_string(),
        "(".into(),
        "len".into(),
        "=".into(),
        "*".into(),
        ")".into(),
        ",".into(),
        "parameter".into(),
        "::".into(),
        "msg".into(),
        "=".into(),
        "'spacing of '".into(),
        "//".into(),
        "'the grid'".into(),
    ]));
    assert!(statements.contains(&vec![
        "dx".to_string(),
        "=".into(),
        "1.0d0".into()
    ]));
    assert!(statements.contains(&vec!["return".to_string()]));
    assert_eq!(
        statements.last().map(Vec::as_slice),
        Some(&["end".to_string(), "module".into(), "grid_utils".into()][..])
    );
    Ok(())
}

#[test]
fn dotted_operators_and_logicals() -> Result<()> {
    let statements = tokenize("if (a .and. .not. b .or. c .eq. 1) ok = .true.\n")?;
    assert_eq!(
        statements[0],
        vec![
            "if", "(", "a", ".and.", ".not.", "b", ".or.", "c", ".eq.", "1", ")", "ok", "=",
            ".true."
        ]
    );
    Ok(())
}

#[test]
fn tokens_compare_case_insensitively() -> Result<()> {
    let document = reads("INTEGER :: N\ninteger :: n\n")?;
    let upper = &document.statements[0];
    let lower = &document.statements[1];

    assert_eq!(upper, lower);
    assert_eq!(upper[0], "integer");
    assert_eq!(upper[0].spelling(), "INTEGER");
    assert_eq!(Token::new(LexemeKind::Name, "End"), Token::new(LexemeKind::Name, "END"));
    Ok(())
}

#[test]
fn continued_keyword_keeps_its_split() -> Result<()> {
    let source = "REA&\n&L*8 :: x\n";
    let document = reads(source)?;
    let real = &document.statements[0][0];

    assert_eq!(real.value, "REAL");
    assert_eq!(real.split.as_deref(), Some("REA&\n&L"));
    assert_eq!(document.statements[0].values(), vec!["REAL", "*", "8", "::", "x"]);
    assert_eq!(document.to_source(), source);
    Ok(())
}

#[test]
fn continued_string_keeps_its_split() -> Result<()> {
    let source = "msg = \"first half &\n   &second half\"\n";
    let document = reads(source)?;
    let string = &document.statements[0][2];

    assert_eq!(string.kind, LexemeKind::String);
    assert_eq!(string.value, "\"first half second half\"");
    assert_eq!(document.to_source(), source);
    Ok(())
}

#[test]
fn separated_continuations_do_not_merge() -> Result<()> {
    let source = "A &\n+ B\n";
    assert_eq!(tokenize(source)?, vec![vec!["A", "+", "B"]]);
    assert_eq!(reads(source)?.to_source(), source);
    Ok(())
}

#[test]
fn line_endings_are_preserved() -> Result<()> {
    for source in ["x = 1\r\ny = 2\r\n", "x = 1\ny = 2", "x = 1 ! no newline"] {
        assert_eq!(reads(source)?.to_source(), source);
    }
    assert_eq!(tokenize("x = 1\r\n")?, vec![vec!["x", "=", "1"]]);
    Ok(())
}

#[test]
fn comment_only_input_has_no_statements() -> Result<()> {
    let source = "! nothing here\n\n   ! or here\n";
    let document = reads(source)?;
    assert!(document.is_empty());
    assert_eq!(document.to_source(), source);
    Ok(())
}

#[test]
fn reader_source_matches_text_source() -> Result<()> {
    let from_reader = Lexer::from_reader(MODULE.as_bytes()).into_document()?;
    let from_lines = Lexer::new(SourceLines::from_text(MODULE)).into_document()?;
    assert_eq!(from_reader.statements, from_lines.statements);
    Ok(())
}

#[test]
fn scan_error_carries_position() {
    let result = reads("x = 1\ny = 2\nz = x ^ y\n");
    match result {
        Err(LexError::UnexpectedCharacter {
            character,
            line,
            column,
        }) => {
            assert_eq!(character, '^');
            assert_eq!(line, 3);
            assert_eq!(column, 7);
        }
        other => panic!("expected an unexpected character error, got {other:?}"),
    }
}

#[cfg(feature = "json")]
#[test]
fn document_serializes_to_json() -> Result<()> {
    let document = reads("#define N 3\nx = N\n")?;
    let json = serde_json::to_value(&document).unwrap();
    let tokens = &json["statements"][0];
    assert_eq!(tokens[0]["value"], "x");
    assert_eq!(tokens[0]["kind"], "name");
    assert_eq!(tokens[2]["value"], "3");
    assert_eq!(tokens[2]["macro_origin"], "N");
    Ok(())
}
