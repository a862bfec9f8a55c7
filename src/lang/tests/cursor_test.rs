use super::*;

fn cursor(bytes: &[u8]) -> TokenCursor {
    TokenCursor::new(bytes.to_vec())
}

#[test]
fn test_skip_to_ignores_string_literal() {
    let mut c = cursor(b"\x91 \"A:B\":X\x00");
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 7);
    assert_eq!(c.read_byte(), Some(COLON));
}

#[test]
fn test_skip_to_ignores_comment_until_end_of_line() {
    let mut c = cursor(&[0, 5, 0, 10, 0, REM, b':', b'x', 0, 9, 0, 20, 0, b':', b'Y', 0, 0, 0]);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 13);
}

#[test]
fn test_skip_to_terminator_clears_literal() {
    let mut c = cursor(&[QUOTE, b'A', b':', 0, 9, 0, 20, 0, b':', 0, 0, 0]);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 8);
}

#[test]
fn test_skip_to_skips_operand_bytes() {
    let mut c = cursor(&[T_BYTE, b':', b':']);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 2);
    let mut c = cursor(&[T_INT, QUOTE, 0x00, b':', 0]);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 3);
}

#[test]
fn test_skip_to_line_marker_is_opaque() {
    // line number 58 is ':' and must not match
    let mut c = cursor(&[b'A', 0, 9, 0, 58, 0, b'B', b':', 0, 0, 0]);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 7);
}

#[test]
fn test_skip_to_stops_at_end_of_program() {
    let mut c = cursor(&[b'A', 0, 0, 0, b':']);
    c.skip_to(&[COLON], true);
    assert_eq!(c.tell(), 4);
    assert_eq!(c.peek_byte(), Some(b':'));
}

#[test]
fn test_skip_to_passes_first_match() {
    let mut c = cursor(b":A:");
    c.skip_to(&[COLON], false);
    assert_eq!(c.tell(), 2);
    let mut c = cursor(b":A:");
    assert_eq!(c.skip_to_read(&[COLON]), Some(COLON));
    assert_eq!(c.tell(), 1);
}

#[test]
fn test_parse_line_number() {
    let mut c = cursor(&[9, 0, 10, 0, PRINT]);
    assert_eq!(c.parse_line_number(), Some(10));
    assert_eq!(c.tell(), 4);
}

#[test]
fn test_parse_line_number_end_of_program() {
    let mut c = cursor(&[0, 0, 0]);
    assert_eq!(c.parse_line_number(), None);
    assert_eq!(c.tell(), 0);
    assert_eq!(c.parse_line_number(), None);
    assert_eq!(c.tell(), 0);
}

#[test]
fn test_parse_line_number_truncated() {
    let mut c = cursor(&[1, 2, 3, 9, 0, 10]);
    c.seek(3);
    assert_eq!(c.parse_line_number(), None);
    assert_eq!(c.tell(), 3);
    let mut c = cursor(&[9]);
    assert_eq!(c.parse_line_number(), None);
    assert_eq!(c.tell(), 0);
}

#[test]
fn test_peek_at_end_is_empty() {
    let mut c = cursor(b"  ");
    assert_eq!(c.skip_white(), None);
    assert_eq!(c.peek(3), &[] as &[u8]);
    assert_eq!(c.read(3), &[] as &[u8]);
    assert_eq!(c.tell(), 2);
}

#[test]
fn test_seek_relative_clamps() {
    let mut c = cursor(b"ABC");
    c.seek(1);
    c.seek_relative(-5);
    assert_eq!(c.tell(), 0);
    c.seek_relative(10);
    assert_eq!(c.tell(), 3);
}

#[test]
fn test_read_if() {
    let mut c = cursor(&[b' ', OPEN[0], OPEN[1], b'X']);
    assert!(!c.skip_white_read_if(&[&CLOSE]));
    assert_eq!(c.tell(), 1);
    assert!(c.skip_white_read_if(&[&CLOSE, &OPEN]));
    assert_eq!(c.tell(), 3);
}

#[test]
fn test_require() {
    let mut c = cursor(b" =1");
    assert_eq!(c.require_read(&[&[b'(']], ErrorCode::SyntaxError), Err(error!(SyntaxError)));
    assert!(c.require(&[b'='], ErrorCode::SyntaxError).is_ok());
    let mut c = cursor(b"");
    assert!(c.require(END_STATEMENT, ErrorCode::SyntaxError).is_ok());
    let mut c = cursor(b"X");
    assert_eq!(
        c.require(END_STATEMENT, ErrorCode::IllegalFunctionCall),
        Err(error!(IllegalFunctionCall))
    );
}

#[test]
fn test_parse_jump_target() {
    let mut c = cursor(&[b' ', T_UINT, 10, 0]);
    assert_eq!(c.parse_jump_target(false), Ok(Some(10)));
    let mut c = cursor(&[b':']);
    assert_eq!(c.parse_jump_target(true), Ok(None));
    assert_eq!(c.parse_jump_target(false), Err(error!(SyntaxError)));
    let mut c = cursor(&[T_UINT, 10]);
    assert_eq!(c.parse_jump_target(true), Err(error!(SyntaxError)));
}

#[test]
fn test_read_name() {
    let mut c = cursor(b" ab1$=");
    assert_eq!(c.read_name(false), Ok("AB1$".to_string()));
    assert_eq!(c.peek_byte(), Some(b'='));
    let mut c = cursor(b"1A");
    assert_eq!(c.read_name(true), Ok(String::new()));
    assert_eq!(c.tell(), 0);
    assert_eq!(c.read_name(false), Err(error!(SyntaxError)));
}

#[test]
fn test_range_check() {
    assert!(range_check(0, 255, &[Some(0), None, Some(255)]).is_ok());
    assert_eq!(range_check(0, 255, &[Some(256)]), Err(error!(IllegalFunctionCall)));
    assert_eq!(
        range_check_err(1, 10, Some(0), ErrorCode::BadFileNumber),
        Err(error!(BadFileNumber))
    );
    assert!(range_check_err(1, 10, None, ErrorCode::BadFileNumber).is_ok());
}
