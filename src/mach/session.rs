use super::events::{EventKind, EventTable};
use super::files::FileTable;
use super::trap::ErrorTrap;
use super::{Program, Stack, Var};
use crate::lang::{LineNumber, Location, TokenCursor};
use serde::{Deserialize, Serialize};

/// Deepest GOSUB nesting before Out of memory.
pub const MAX_GOSUB_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Direct,
    Executing,
    AutoNumbering,
}

/// Line and bytecode offset to put the cursor at on the next prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPrompt {
    pub line: u16,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoNumber {
    pub line: u32,
    pub increment: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GosubFrame {
    pub statement: usize,
    pub run_mode: bool,
    /// Set when the subroutine is an event handler.
    pub handler: Option<EventKind>,
}

/// ## Everything a running interpreter knows
///
/// One value owned by the runtime loop. A snapshot is this struct,
/// serialized.
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub program: Program,
    pub direct_line: TokenCursor,
    /// Whether the code stream is the program or the direct line.
    pub run_mode: bool,
    pub mode: Mode,
    /// Blocked on a line of operator input.
    pub awaiting_input: bool,
    pub prompt: bool,
    pub edit_prompt: Option<EditPrompt>,
    pub auto: AutoNumber,
    /// AUTO prompts come back once a command typed at one has run.
    pub auto_active: bool,
    /// Increment for `AUTO` without one.
    pub auto_increment: u16,
    pub current_statement: usize,
    /// Where `CONT` picks up.
    pub stop: Option<usize>,
    pub tron: bool,
    pub gosub: Stack<GosubFrame>,
    pub vars: Var,
    pub events: EventTable,
    pub trap: ErrorTrap,
    pub files: FileTable,
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Session {
        Session {
            program: Program::new(),
            direct_line: TokenCursor::default(),
            run_mode: false,
            mode: Mode::Direct,
            awaiting_input: false,
            prompt: true,
            edit_prompt: None,
            auto: AutoNumber {
                line: 10,
                increment: 10,
            },
            auto_active: false,
            auto_increment: 10,
            current_statement: 0,
            stop: None,
            tron: false,
            gosub: Stack::new("GOSUB", MAX_GOSUB_DEPTH),
            vars: Var::new(),
            events: EventTable::new(),
            trap: ErrorTrap::default(),
            files: FileTable::new(),
        }
    }

    pub fn codestream(&self) -> &TokenCursor {
        if self.run_mode {
            self.program.bytecode()
        } else {
            &self.direct_line
        }
    }

    pub fn codestream_mut(&mut self) -> &mut TokenCursor {
        if self.run_mode {
            self.program.bytecode_mut()
        } else {
            &mut self.direct_line
        }
    }

    /// Leave execution for the AUTO prompt if AUTO is on, else for
    /// direct mode.
    pub fn end_execution(&mut self) {
        self.mode = if self.auto_active {
            Mode::AutoNumbering
        } else {
            Mode::Direct
        };
    }

    /// Drop run-time state after the program text changed or on `RUN`.
    pub fn clear(&mut self) {
        self.vars.clear();
        self.gosub.clear();
        self.trap.reset();
        self.events.reset();
        self.files.close_all();
        self.stop = None;
    }

    /// Line number for an error location; `None` on the direct line.
    pub fn line_number_of(&self, location: Option<Location>) -> LineNumber {
        match location {
            Some(Location::Program(pos)) => self.program.line_number_at(pos),
            _ => None,
        }
    }

    /// Line the current statement belongs to, when running a program.
    pub fn current_line(&self) -> LineNumber {
        if self.run_mode {
            self.program.line_number_at(self.current_statement)
        } else {
            None
        }
    }
}
