use super::*;

const KEY_PROGRAM: &str = "10 GOTO 10\n100 RETURN\n200 RETURN\n";

fn armed() -> Session {
    let mut s = session(KEY_PROGRAM);
    s.events.set_handler(EventKind::Key(1), Some(100));
    s.events.command(EventKind::Key(1), EventCommand::On);
    s.jump(Some(10)).unwrap();
    s
}

#[test]
fn test_dispatch_runs_handler_as_subroutine() {
    let mut s = armed();
    s.events.trigger(EventKind::Key(1));
    s.handle_basic_events().unwrap();
    let key = s.events.get(EventKind::Key(1)).unwrap();
    assert_eq!(key.state(), EventState::HandlerActive);
    assert!(!key.is_triggered());
    assert_eq!(s.gosub.len(), 1);
    assert_eq!(s.codestream().tell(), s.program.offset_of(100).unwrap());
}

#[test]
fn test_no_reentry_while_handler_active() {
    let mut s = armed();
    s.events.trigger(EventKind::Key(1));
    s.handle_basic_events().unwrap();
    s.events.trigger(EventKind::Key(1));
    s.handle_basic_events().unwrap();
    assert_eq!(s.gosub.len(), 1);
    s.events.command(EventKind::Key(1), EventCommand::On);
    s.handle_basic_events().unwrap();
    assert_eq!(s.gosub.len(), 1);
    s.jump_return(None).unwrap();
    assert_eq!(
        s.events.get(EventKind::Key(1)).unwrap().state(),
        EventState::Idle
    );
    s.handle_basic_events().unwrap();
    assert_eq!(s.gosub.len(), 1);
}

#[test]
fn test_one_dispatch_per_pass_in_priority_order() {
    let mut s = armed();
    s.events.set_handler(EventKind::Timer, Some(200));
    s.events.command(EventKind::Timer, EventCommand::On);
    s.events.trigger(EventKind::Key(1));
    s.events.trigger(EventKind::Timer);
    s.handle_basic_events().unwrap();
    assert_eq!(s.gosub.len(), 1);
    assert_eq!(s.codestream().tell(), s.program.offset_of(200).unwrap());
    assert!(s.events.get(EventKind::Key(1)).unwrap().is_triggered());
}

#[test]
fn test_stop_remembers_and_off_forgets() {
    let mut s = armed();
    s.events.command(EventKind::Key(1), EventCommand::Stop);
    s.events.trigger(EventKind::Key(1));
    s.handle_basic_events().unwrap();
    assert!(s.gosub.is_empty());
    s.events.command(EventKind::Key(1), EventCommand::On);
    s.handle_basic_events().unwrap();
    assert_eq!(s.gosub.len(), 1);

    let mut s = armed();
    s.events.command(EventKind::Key(1), EventCommand::Off);
    s.events.trigger(EventKind::Key(1));
    s.events.command(EventKind::Key(1), EventCommand::On);
    s.handle_basic_events().unwrap();
    assert!(s.gosub.is_empty());
}

#[test]
fn test_not_dispatched_in_direct_mode_or_while_suspended() {
    let mut s = armed();
    s.events.trigger(EventKind::Key(1));
    s.set_pointer(false, Some(0));
    s.handle_basic_events().unwrap();
    assert!(s.gosub.is_empty());
    s.set_pointer(true, Some(0));
    s.events.suspend_all = true;
    s.handle_basic_events().unwrap();
    assert!(s.gosub.is_empty());
}

#[test]
fn test_missing_handler_line_reverts_state() {
    let mut s = armed();
    s.events.set_handler(EventKind::Key(1), Some(500));
    s.events.trigger(EventKind::Key(1));
    let e = s.handle_basic_events().unwrap_err();
    assert!(e.is(ErrorCode::UndefinedLineNumber));
    let key = s.events.get(EventKind::Key(1)).unwrap();
    assert_eq!(key.state(), EventState::Idle);
    assert!(s.gosub.is_empty());
}

#[test]
fn test_queued_triggers_and_timer() {
    let mut s = armed();
    s.events.sender().push(EventKind::Key(1));
    assert!(!s.events.get(EventKind::Key(1)).unwrap().is_triggered());
    s.events.drain_pending();
    assert!(s.events.get(EventKind::Key(1)).unwrap().is_triggered());

    s.events.command(EventKind::Timer, EventCommand::On);
    s.events.set_timer_period(2, 1_000);
    s.events.check_timer(2_999);
    assert!(!s.events.get(EventKind::Timer).unwrap().is_triggered());
    s.events.check_timer(3_000);
    assert!(s.events.get(EventKind::Timer).unwrap().is_triggered());
}

#[test]
fn test_pump_latches_function_keys() {
    let mut s = armed();
    let mut pump = EventPump::new();
    let keys = pump.key_sender();
    keys.push(EventKind::Key(1));
    keys.push(EventKind::Key(2));
    pump.poll(&mut s).unwrap();
    assert!(keys.is_empty());
    assert!(s.events.get(EventKind::Key(1)).unwrap().is_triggered());
    // Key 2 is not enabled, so the press is dropped.
    assert!(!s.events.get(EventKind::Key(2)).unwrap().is_triggered());
}

#[test]
fn test_pump_interrupt_comes_before_keys() {
    let mut s = armed();
    let mut pump = EventPump::new();
    pump.key_sender().push(EventKind::Key(1));
    pump.interrupt_flag().store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(matches!(pump.poll(&mut s), Err(crate::lang::Signal::Break(_))));
    assert!(!s.events.get(EventKind::Key(1)).unwrap().is_triggered());
    pump.poll(&mut s).unwrap();
    assert!(s.events.get(EventKind::Key(1)).unwrap().is_triggered());
}
