use super::*;

const TRAP_PROGRAM: &str = "10 ERROR 5\n20 END\n100 RESUME NEXT\n";

fn failing() -> Session {
    let mut s = session(TRAP_PROGRAM);
    s.trap.handler = Some(100);
    s.jump(Some(10)).unwrap();
    s.current_statement = s.program.offset_of(10).unwrap();
    // as if line 10 had just been parsed
    let body_end = s.program.offset_of(20).unwrap();
    s.set_pointer(true, Some(body_end));
    s
}

#[test]
fn test_trap_jumps_to_handler() {
    let mut s = failing();
    s.trap_error(error!(IllegalFunctionCall)).unwrap();
    assert!(s.trap.is_handling());
    assert!(s.events.suspend_all);
    assert_eq!(s.trap.errn, 5);
    assert_eq!(s.erl(), 10);
    assert_eq!(s.codestream().tell(), s.program.offset_of(100).unwrap());
}

#[test]
fn test_error_inside_handler_is_not_trapped() {
    let mut s = failing();
    s.trap_error(error!(IllegalFunctionCall)).unwrap();
    let e = s.trap_error(error!(Overflow)).unwrap_err();
    assert!(e.is(ErrorCode::Overflow));
    assert_eq!(s.trap.errn, 6);
}

#[test]
fn test_resume_next_continues_after_statement() {
    let mut s = failing();
    s.trap_error(error!(IllegalFunctionCall)).unwrap();
    s.resume(ResumeTarget::Next).unwrap();
    assert!(!s.trap.is_handling());
    assert!(!s.events.suspend_all);
    assert_eq!(s.trap.errn, 0);
    assert_eq!(s.codestream().tell(), s.program.offset_of(20).unwrap());
}

#[test]
fn test_resume_retries_statement() {
    let mut s = failing();
    s.trap_error(error!(IllegalFunctionCall)).unwrap();
    s.resume(ResumeTarget::Statement).unwrap();
    assert_eq!(s.codestream().tell(), s.program.offset_of(10).unwrap());
}

#[test]
fn test_resume_without_error() {
    let mut s = session(TRAP_PROGRAM);
    assert!(s
        .resume(ResumeTarget::Next)
        .unwrap_err()
        .is(ErrorCode::ResumeWithoutError));
}

#[test]
fn test_no_handler_hands_error_back() {
    let mut s = failing();
    s.trap.handler = None;
    let e = s.trap_error(error!(IllegalFunctionCall)).unwrap_err();
    assert_eq!(e.line_number(), None);
    assert_eq!(
        s.program.line_number_at(match e.location() {
            Some(Location::Program(pos)) => pos,
            _ => panic!("not located in the program"),
        }),
        Some(10)
    );
}

#[test]
fn test_direct_mode_erl() {
    let mut s = Session::new();
    s.trap_error(error!(SyntaxError)).unwrap_err();
    assert_eq!(s.trap.errp, Some(Location::Direct));
    assert_eq!(s.erl(), 65535);
}

#[test]
fn test_handler_off_while_handling_reraises() {
    let mut s = failing();
    s.trap_error(error!(IllegalFunctionCall)).unwrap();
    let e = s.set_error_handler(None).unwrap_err();
    assert_eq!(e.code(), 5);
}
