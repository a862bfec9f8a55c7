//! # BASIC Engine
//!
//! The execution engine of a GW-BASIC style interpreter. Programs are
//! stored tokenized and run one statement at a time from a loop that
//! switches between direct entry, program execution and automatic
//! line numbering. `ON ERROR`, `ON KEY` and `ON TIMER` traps divert
//! control to handler subroutines. The whole session, open files
//! included, can be saved on exit and resumed later.
//!
//! ```text
//! $ basic --state-file session.bin
//! BASIC 0.1.0
//! Ok
//! 10 PRINT "A"
//! 20 GOTO 10
//! RUN
//! ```
//!
//! Start it again with `--resume` to pick up where the session left off.

pub mod lang;
pub mod mach;
pub mod term;
