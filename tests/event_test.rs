mod common;
use basic::mach::{EventKind, EventState};
use common::*;

fn key_program(r: &mut TestRuntime, handler_end: &str) {
    r.enter("10 ON KEY(1) GOSUB 100");
    r.enter("20 KEY(1) ON");
    r.enter("30 GOTO 30");
    r.enter(r#"100 PRINT "K""#);
    r.enter(handler_end);
    r.enter("RUN");
}

#[test]
fn test_key_handler_runs() {
    let mut r = runtime();
    r.events_mut().triggers.push((4, EventKind::Key(1)));
    r.events_mut().break_at = Some(12);
    key_program(&mut r, "110 RETURN");
    assert_eq!(exec(&mut r), "K\n^C\nBreak in 30\n");
    assert!(r.session().gosub.is_empty());
}

#[test]
fn test_handler_not_reentered() {
    let mut r = runtime();
    r.events_mut().triggers.push((4, EventKind::Key(1)));
    r.events_mut().triggers.push((8, EventKind::Key(1)));
    r.events_mut().break_at = Some(12);
    key_program(&mut r, "110 GOTO 110");
    assert_eq!(exec(&mut r), "K\n^C\nBreak in 110\n");
    assert_eq!(r.session().gosub.len(), 1);
    let key = r.session().events.get(EventKind::Key(1)).unwrap();
    assert_eq!(key.state(), EventState::HandlerActive);
    assert!(key.is_triggered());
}

#[test]
fn test_key_stop_defers() {
    let mut r = runtime();
    r.events_mut().triggers.push((5, EventKind::Key(1)));
    r.events_mut().break_at = Some(10);
    r.enter("10 ON KEY(1) GOSUB 100");
    r.enter("15 KEY(1) ON");
    r.enter("20 KEY(1) STOP");
    r.enter(r#"30 PRINT "S""#);
    r.enter("40 KEY(1) ON");
    r.enter("50 GOTO 50");
    r.enter(r#"100 PRINT "K""#);
    r.enter("110 RETURN");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "S\nK\n^C\nBreak in 50\n");
}

#[test]
fn test_no_events_while_trapping_errors() {
    let mut r = runtime();
    r.events_mut().triggers.push((6, EventKind::Key(1)));
    r.events_mut().break_at = Some(12);
    r.enter("10 ON KEY(1) GOSUB 100");
    r.enter("20 KEY(1) ON");
    r.enter("30 ON ERROR GOTO 200");
    r.enter("40 ERROR 5");
    r.enter(r#"100 PRINT "K""#);
    r.enter("110 RETURN");
    r.enter("200 GOTO 200");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "^C\nBreak in 200\n");
    assert!(r
        .session()
        .events
        .get(EventKind::Key(1))
        .unwrap()
        .is_triggered());
}
