use super::*;
use crate::lang::token::*;
use crate::error;
use crate::lang::{tokenise_line, ErrorCode, Location, TokenCursor};

mod events_test;
mod trap_test;

fn program(text: &str) -> Program {
    Program::load(text.as_bytes()).unwrap()
}

fn session(text: &str) -> Session {
    let mut session = Session::new();
    session.program = program(text);
    session
}
