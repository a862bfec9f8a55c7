use super::Session;
use crate::error;
use crate::lang::token::END_STATEMENT;
use crate::lang::{Error, Location};
use log::debug;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, Error>;

/// Where `RESUME` returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContext {
    pub statement: usize,
    pub run_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapState {
    Idle,
    /// An `ON ERROR` handler is running; further errors are not trapped.
    HandlerActive(ResumeContext),
}

/// ## ON ERROR state

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTrap {
    pub handler: Option<u16>,
    pub state: TrapState,
    pub errn: u16,
    pub errp: Option<Location>,
}

impl Default for ErrorTrap {
    fn default() -> ErrorTrap {
        ErrorTrap {
            handler: None,
            state: TrapState::Idle,
            errn: 0,
            errp: None,
        }
    }
}

impl ErrorTrap {
    pub fn is_handling(&self) -> bool {
        self.state != TrapState::Idle
    }

    /// Forget the handler and any active handling. `ERR` and `ERL` survive.
    pub fn reset(&mut self) {
        self.handler = None;
        self.state = TrapState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeTarget {
    /// `RESUME` or `RESUME 0`: retry the failing statement.
    Statement,
    /// `RESUME NEXT`
    Next,
    Line(u16),
}

impl Session {
    /// Route an error to the `ON ERROR` handler, or hand it back when no
    /// handler is installed or one is already running.
    pub fn trap_error(&mut self, error: Error) -> Result<()> {
        let error = match error.location() {
            Some(_) => error,
            None if self.run_mode => {
                let pos = self.program.bytecode().tell().saturating_sub(1);
                error.at(Location::Program(pos))
            }
            None => error.at(Location::Direct),
        };
        self.trap.errn = error.code();
        self.trap.errp = error.location();
        let line = match (self.trap.handler, self.trap.state) {
            (Some(line), TrapState::Idle) => line,
            _ => return Err(error),
        };
        let context = ResumeContext {
            statement: self.current_statement,
            run_mode: self.run_mode,
        };
        debug!("Trapping \"{}\" to line {}", error.text(), line);
        self.jump(Some(line))?;
        self.trap.state = TrapState::HandlerActive(context);
        self.events.suspend_all = true;
        Ok(())
    }

    /// `ON ERROR GOTO`. Turning the trap off inside a handler reports the
    /// error being handled.
    pub fn set_error_handler(&mut self, line: Option<u16>) -> Result<()> {
        self.trap.handler = line.filter(|n| *n != 0);
        if self.trap.handler.is_none() && self.trap.is_handling() {
            let error = Error::from_code(self.trap.errn);
            return Err(match self.trap.errp {
                Some(location) => error.at(location),
                None => error,
            });
        }
        Ok(())
    }

    pub fn resume(&mut self, target: ResumeTarget) -> Result<()> {
        let context = match self.trap.state {
            TrapState::HandlerActive(context) => context,
            TrapState::Idle => return Err(error!(ResumeWithoutError)),
        };
        self.trap.errn = 0;
        self.trap.state = TrapState::Idle;
        self.events.suspend_all = false;
        match target {
            ResumeTarget::Statement => self.set_pointer(context.run_mode, Some(context.statement)),
            ResumeTarget::Next => {
                self.set_pointer(context.run_mode, Some(context.statement));
                self.codestream_mut().skip_to(END_STATEMENT, false);
            }
            ResumeTarget::Line(line) => self.jump(Some(line))?,
        }
        Ok(())
    }

    /// Value of `ERL`: 65535 for the direct line.
    pub fn erl(&self) -> u16 {
        match self.trap.errp {
            Some(Location::Program(pos)) => self.program.line_number_at(pos).unwrap_or(0),
            Some(Location::Direct) => u16::max_value(),
            None => 0,
        }
    }
}
