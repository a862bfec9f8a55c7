use super::queue::EventQueue;
use super::Session;
use crate::lang::{Break, Error, Signal};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

/// Event classes in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Timer,
    Key(u8),
    Play,
    Com(u8),
    Pen,
    Strig(u8),
}

pub const NUM_KEYS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCommand {
    On,
    Off,
    Stop,
}

/// Where a trap stands with respect to its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    Idle,
    /// `STOP` was issued; triggers are remembered but not dispatched.
    Stopped,
    /// Control is being transferred to the handler.
    Dispatching,
    /// The handler runs until it returns.
    HandlerActive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    kind: EventKind,
    enabled: bool,
    triggered: bool,
    state: EventState,
    handler: Option<u16>,
}

impl EventDescriptor {
    fn new(kind: EventKind) -> EventDescriptor {
        EventDescriptor {
            kind,
            enabled: false,
            triggered: false,
            state: EventState::Idle,
            handler: None,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn is_stopped(&self) -> bool {
        self.state != EventState::Idle
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    pub fn handler(&self) -> Option<u16> {
        self.handler
    }

    pub fn command(&mut self, command: EventCommand) {
        match command {
            EventCommand::On => {
                self.enabled = true;
                if self.state == EventState::Stopped {
                    self.state = EventState::Idle;
                }
            }
            EventCommand::Off => self.enabled = false,
            EventCommand::Stop => self.state = EventState::Stopped,
        }
    }

    /// Signals only latch while the trap is enabled.
    pub fn trigger(&mut self) {
        if self.enabled {
            self.triggered = true;
        }
    }

    fn is_ready(&self) -> bool {
        self.enabled && self.triggered && !self.is_stopped() && self.handler.is_some()
    }
}

/// ## Event trap table

#[derive(Debug, Serialize, Deserialize)]
pub struct EventTable {
    descriptors: Vec<EventDescriptor>,
    pub suspend_all: bool,
    timer_period: Option<i64>,
    timer_start: i64,
    pending: EventQueue<EventKind>,
}

impl Default for EventTable {
    fn default() -> EventTable {
        EventTable::new()
    }
}

impl EventTable {
    pub fn new() -> EventTable {
        let mut kinds = vec![EventKind::Timer];
        kinds.extend((1..=NUM_KEYS).map(EventKind::Key));
        kinds.push(EventKind::Play);
        kinds.extend((1..=2).map(EventKind::Com));
        kinds.push(EventKind::Pen);
        kinds.extend((0..4).map(|n| EventKind::Strig(n * 2)));
        EventTable {
            descriptors: kinds.into_iter().map(EventDescriptor::new).collect(),
            suspend_all: false,
            timer_period: None,
            timer_start: 0,
            pending: EventQueue::new(),
        }
    }

    /// Forget all handlers and signals. Pending triggers are dropped.
    pub fn reset(&mut self) {
        for d in self.descriptors.iter_mut() {
            *d = EventDescriptor::new(d.kind);
        }
        self.suspend_all = false;
        self.timer_period = None;
        self.pending.clear();
    }

    pub fn get(&self, kind: EventKind) -> Option<&EventDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    pub fn get_mut(&mut self, kind: EventKind) -> Option<&mut EventDescriptor> {
        self.descriptors.iter_mut().find(|d| d.kind == kind)
    }

    pub fn set_handler(&mut self, kind: EventKind, line: Option<u16>) {
        if let Some(d) = self.get_mut(kind) {
            d.handler = line.filter(|n| *n != 0);
        }
    }

    pub fn command(&mut self, kind: EventKind, command: EventCommand) {
        if let Some(d) = self.get_mut(kind) {
            d.command(command);
        }
    }

    pub fn trigger(&mut self, kind: EventKind) {
        if let Some(d) = self.get_mut(kind) {
            d.trigger();
        }
    }

    /// Producer end for signal sources on other threads.
    pub fn sender(&self) -> EventQueue<EventKind> {
        self.pending.clone()
    }

    /// Latch every trigger queued since the last poll.
    pub fn drain_pending(&mut self) {
        while let Some(kind) = self.pending.pop() {
            self.trigger(kind);
        }
    }

    pub fn set_timer_period(&mut self, seconds: u32, now_millis: i64) {
        self.timer_period = Some(i64::from(seconds) * 1000);
        self.timer_start = now_millis;
    }

    /// Trigger the timer trap if its period has elapsed.
    pub fn check_timer(&mut self, now_millis: i64) {
        if let Some(period) = self.timer_period {
            if now_millis - self.timer_start >= period {
                self.timer_start = now_millis;
                self.trigger(EventKind::Timer);
            }
        }
    }

    /// The highest priority event that may be dispatched now.
    pub fn next_ready(&self) -> Option<(EventKind, u16)> {
        self.descriptors
            .iter()
            .find(|d| d.is_ready())
            .and_then(|d| Some((d.kind, d.handler?)))
    }

    /// Called when a handler returns.
    pub fn release(&mut self, kind: EventKind) {
        if let Some(d) = self.get_mut(kind) {
            d.state = EventState::Idle;
        }
    }
}

impl Session {
    /// Dispatch at most one due event handler as a subroutine call.
    pub fn handle_basic_events(&mut self) -> Result<()> {
        if self.events.suspend_all || !self.run_mode {
            return Ok(());
        }
        let (kind, line) = match self.events.next_ready() {
            Some(ready) => ready,
            None => return Ok(()),
        };
        let previous = match self.events.get_mut(kind) {
            Some(d) => {
                d.triggered = false;
                std::mem::replace(&mut d.state, EventState::Dispatching)
            }
            None => return Ok(()),
        };
        debug!("Dispatching {:?} to line {}", kind, line);
        let result = self.jump_gosub(line, Some(kind));
        if let Some(d) = self.events.get_mut(kind) {
            d.state = match result {
                Ok(()) => EventState::HandlerActive,
                Err(_) => previous,
            };
        }
        result
    }
}

/// Delivers asynchronous signals to the session at the poll point.
pub trait EventSource {
    fn poll(&mut self, session: &mut Session) -> std::result::Result<(), Signal>;
}

/// Interrupt flag and function keys from the terminal, plus the
/// session's own trigger queue and timer.
#[derive(Debug, Default, Clone)]
pub struct EventPump {
    interrupt: Arc<AtomicBool>,
    keys: EventQueue<EventKind>,
}

impl EventPump {
    pub fn new() -> EventPump {
        EventPump::default()
    }

    /// Set from a signal handler to break into a running program.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Producer end for function keys. The queue belongs to the pump,
    /// so it outlives a session replaced by a resume.
    pub fn key_sender(&self) -> EventQueue<EventKind> {
        self.keys.clone()
    }
}

impl EventSource for EventPump {
    fn poll(&mut self, session: &mut Session) -> std::result::Result<(), Signal> {
        if self.interrupt.swap(false, Ordering::SeqCst) {
            return Err(Break::default().into());
        }
        while let Some(kind) = self.keys.pop() {
            session.events.trigger(kind);
        }
        session.events.drain_pending();
        session.events.check_timer(chrono::Utc::now().timestamp_millis());
        Ok(())
    }
}
