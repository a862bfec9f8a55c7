/*!
## Rust Machine Module

This Rust module runs tokenized BASIC. It holds the session state,
the interpreter loop with its modes, event and error traps, and
session snapshots.

*/

mod config;
mod console;
mod events;
mod expression;
mod files;
mod flow;
mod program;
mod queue;
mod runtime;
mod session;
mod stack;
mod statement;
mod trap;
mod val;
mod var;

pub mod snapshot;

pub use config::Config;
pub use console::Console;
pub use events::{
    EventCommand, EventDescriptor, EventKind, EventPump, EventSource, EventState, EventTable,
};
pub use files::{FileImage, FileMode, FileTable, OpenFile};
pub use program::Program;
pub use queue::EventQueue;
pub use runtime::Runtime;
pub use session::{AutoNumber, EditPrompt, GosubFrame, Mode, Session};
pub use snapshot::{Persist, ResumeFailed};
pub use stack::Stack;
pub use statement::{Dispatcher, Statements};
pub use trap::{ErrorTrap, ResumeContext, ResumeTarget, TrapState};
pub use val::Val;
pub use var::Var;

#[cfg(test)]
mod tests;
