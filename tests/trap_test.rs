mod common;
use basic::mach::TrapState;
use common::*;

#[test]
fn test_resume_next() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 ERROR 5");
    r.enter(r#"30 PRINT "BACK""#);
    r.enter("40 END");
    r.enter("100 PRINT ERR;ERL");
    r.enter("110 RESUME NEXT");
    r.enter("RUN");
    assert_eq!(exec(&mut r), " 5  20 \nBACK\n");
    assert_eq!(r.session().trap.state, TrapState::Idle);
}

#[test]
fn test_resume_line() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 X = 1 + \"A\"");
    r.enter(r#"30 PRINT "NO""#);
    r.enter(r#"40 PRINT "YES""#);
    r.enter("50 END");
    r.enter("100 RESUME 40");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "YES\n");
}

#[test]
fn test_error_in_handler_is_reported() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 ERROR 5");
    r.enter("100 ERROR 6");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "Overflow in 100\n");
    assert_eq!(r.session().trap.state, TrapState::Idle);
    assert!(!r.session().events.suspend_all);
}

#[test]
fn test_no_resume() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 ERROR 5");
    r.enter(r#"100 PRINT "H""#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "H\nNo RESUME in 100\n");
}

#[test]
fn test_resume_without_error() {
    let mut r = runtime();
    r.enter("RESUME");
    assert_eq!(exec(&mut r), "RESUME without error\n");
}

#[test]
fn test_handler_off_reports_error() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 ERROR 5");
    r.enter("100 ON ERROR GOTO 0");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "Illegal function call in 20\n");
}

#[test]
fn test_handler_must_exist() {
    let mut r = runtime();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "Undefined line number in 10\n");
}

#[test]
fn test_break_is_not_trapped() {
    let mut r = runtime();
    r.events_mut().break_at = Some(4);
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 GOTO 20");
    r.enter(r#"100 PRINT "TRAPPED""#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "^C\nBreak in 20\n");
}
