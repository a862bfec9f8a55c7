use super::events::{EventCommand, EventKind, NUM_KEYS};
use super::expression::{expression, int_expression, string_expression};
use super::files::FileMode;
use super::session::{AutoNumber, EditPrompt, Mode};
use super::trap::ResumeTarget;
use super::{Console, Session};
use crate::error;
use crate::lang::token::*;
use crate::lang::{range_check, range_check_err, Break, Error, ErrorCode, Location, Signal};
use log::debug;

type Result<T> = std::result::Result<T, Error>;

/// Width of a `PRINT` comma zone.
const ZONE_WIDTH: usize = 14;

/// Executes statements from a session's code stream.
pub trait Dispatcher {
    /// Run the statement at the cursor. Returns `false` once the code
    /// stream has ended and execution should stop.
    fn parse_statement(
        &mut self,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> std::result::Result<bool, Signal>;
}

/// ## Built-in statements
///
/// Program editing, flow control, traps, files and simple `LET`/`PRINT`.
#[derive(Debug, Default)]
pub struct Statements;

impl Statements {
    pub fn new() -> Statements {
        Statements
    }
}

impl Dispatcher for Statements {
    fn parse_statement(
        &mut self,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> std::result::Result<bool, Signal> {
        session.current_statement = session.codestream().tell();
        match session.codestream_mut().skip_white() {
            None | Some(END_LINE) => {
                let tron = session.tron;
                let handling = session.trap.is_handling();
                let run_mode = session.run_mode;
                let ins = session.codestream_mut();
                ins.read_byte();
                match ins.parse_line_number() {
                    Some(line) => {
                        if tron {
                            console.write(&format!("[{}]", line))?;
                        }
                    }
                    None => {
                        if handling {
                            let location = if run_mode {
                                Location::Program(ins.tell().saturating_sub(2))
                            } else {
                                Location::Direct
                            };
                            return Err(error!(NoResume, ..location).into());
                        }
                        return Ok(false);
                    }
                }
            }
            Some(COLON) => {
                session.codestream_mut().read_byte();
            }
            Some(_) => {}
        }
        match session.codestream_mut().skip_white() {
            None | Some(END_LINE) | Some(COLON) => Ok(true),
            Some(c) if c.is_ascii_alphabetic() => {
                exec_let(session)?;
                Ok(true)
            }
            Some(_) => self.dispatch(session, console),
        }
    }
}

impl Statements {
    fn dispatch(
        &mut self,
        session: &mut Session,
        console: &mut dyn Console,
    ) -> std::result::Result<bool, Signal> {
        let token = match session.codestream_mut().read_byte() {
            Some(token) => token,
            None => return Ok(false),
        };
        match token {
            LET => exec_let(session)?,
            PRINT => exec_print(session, console)?,
            GOTO => {
                let line = jump_target(session)?;
                require_end(session)?;
                session.jump(Some(line))?;
            }
            GOSUB => {
                let line = jump_target(session)?;
                require_end(session)?;
                session.jump_gosub(line, None)?;
            }
            RETURN => {
                let line = session.codestream_mut().parse_jump_target(true)?;
                require_end(session)?;
                session.jump_return(line)?;
            }
            END => {
                require_end(session)?;
                if session.run_mode {
                    session.stop = Some(session.codestream().tell());
                }
                session.files.close_all();
                return Ok(false);
            }
            STOP => {
                require_end(session)?;
                return Err(Break { stop: true }.into());
            }
            CONT => {
                require_end(session)?;
                session.cont()?;
            }
            RUN => {
                let line = session.codestream_mut().parse_jump_target(true)?;
                require_end(session)?;
                session.clear();
                session.jump(line)?;
            }
            NEW => {
                require_end(session)?;
                session.program.clear();
                session.clear();
                return Ok(false);
            }
            CLEAR => {
                session.codestream_mut().skip_to(END_STATEMENT, true);
                session.clear();
            }
            LIST => exec_list(session, console)?,
            REM | ELSE => session.codestream_mut().skip_to(&[END_LINE], true),
            AUTO => exec_auto(session)?,
            EDIT => {
                let line = jump_target(session)?;
                require_end(session)?;
                let offset = session
                    .program
                    .offset_of(line)
                    .ok_or_else(|| error!(UndefinedLineNumber))?;
                session.edit_prompt = Some(EditPrompt {
                    line,
                    position: offset + 5,
                });
                session.prompt = false;
                return Ok(false);
            }
            DELETE => {
                let (from, to) = line_range(session)?;
                if from.is_none() && to.is_none() {
                    return Err(error!(IllegalFunctionCall).into());
                }
                require_end(session)?;
                session.program.delete_range(from, to)?;
                session.clear();
                return Ok(false);
            }
            ON => exec_on(session)?,
            KEY => {
                let key = key_number(session)?;
                let command = event_command(session)?;
                require_end(session)?;
                session.events.command(EventKind::Key(key), command);
            }
            ERROR => {
                let code = int_expression(session)?;
                range_check(1, 255, &[Some(i32::from(code))])?;
                require_end(session)?;
                return Err(Error::from_code(code as u16).into());
            }
            RESUME => exec_resume(session)?,
            TRON => {
                require_end(session)?;
                session.tron = true;
            }
            TROFF => {
                require_end(session)?;
                session.tron = false;
            }
            PREFIX_FE => {
                let second = session.codestream_mut().read_byte().unwrap_or(END_LINE);
                match [PREFIX_FE, second] {
                    OPEN => exec_open(session)?,
                    CLOSE => exec_close(session)?,
                    SYSTEM => {
                        require_end(session)?;
                        return Err(Signal::Exit);
                    }
                    TIMER => {
                        let command = event_command(session)?;
                        require_end(session)?;
                        session.events.command(EventKind::Timer, command);
                    }
                    _ => return Err(error!(SyntaxError).into()),
                }
            }
            _ => return Err(error!(SyntaxError).into()),
        }
        Ok(true)
    }
}

fn require_end(session: &mut Session) -> Result<()> {
    session
        .codestream_mut()
        .require(END_STATEMENT, ErrorCode::SyntaxError)
}

fn jump_target(session: &mut Session) -> Result<u16> {
    session
        .codestream_mut()
        .parse_jump_target(false)?
        .ok_or_else(|| error!(SyntaxError))
}

fn line_range(session: &mut Session) -> Result<(Option<u16>, Option<u16>)> {
    let ins = session.codestream_mut();
    let from = ins.parse_jump_target(true)?;
    if ins.skip_white_read_if(&[&[O_MINUS]]) {
        Ok((from, ins.parse_jump_target(true)?))
    } else {
        Ok((from, from))
    }
}

fn exec_let(session: &mut Session) -> Result<()> {
    let ins = session.codestream_mut();
    let name = ins.read_name(false)?;
    ins.require_read(&[&[O_EQ]], ErrorCode::SyntaxError)?;
    let value = expression(session)?;
    require_end(session)?;
    session.vars.store(&name, value)
}

fn exec_print(session: &mut Session, console: &mut dyn Console) -> std::result::Result<(), Signal> {
    let file = if session.codestream_mut().skip_white_read_if(&[b"#"]) {
        let number = int_expression(session)?;
        range_check_err(1, 255, Some(i32::from(number)), ErrorCode::BadFileNumber)?;
        session
            .codestream_mut()
            .require_read(&[b","], ErrorCode::SyntaxError)?;
        Some(number as u8)
    } else {
        None
    };
    let mut out = String::new();
    let mut newline = true;
    loop {
        match session.codestream_mut().skip_white() {
            None | Some(END_LINE) | Some(COLON) => break,
            Some(b';') => {
                session.codestream_mut().read_byte();
                newline = false;
            }
            Some(b',') => {
                session.codestream_mut().read_byte();
                let pad = ZONE_WIDTH - out.len() % ZONE_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                newline = false;
            }
            Some(_) => {
                out.push_str(&expression(session)?.to_string());
                newline = true;
            }
        }
    }
    if newline {
        out.push('\n');
    }
    match file {
        Some(number) => session.files.get_mut(number)?.write_str(&out)?,
        None => console.write(&out)?,
    }
    Ok(())
}

fn exec_list(session: &mut Session, console: &mut dyn Console) -> std::result::Result<(), Signal> {
    let (from, to) = line_range(session)?;
    require_end(session)?;
    for line in session.program.listing(from, to) {
        console.write_line(&line)?;
    }
    Ok(())
}

fn exec_auto(session: &mut Session) -> Result<()> {
    let ins = session.codestream_mut();
    let line = ins.parse_jump_target(true)?.unwrap_or(10);
    let increment = if ins.skip_white_read_if(&[b","]) {
        ins.parse_jump_target(true)?
    } else {
        None
    };
    require_end(session)?;
    let increment = increment.unwrap_or(session.auto_increment);
    if increment == 0 {
        return Err(error!(IllegalFunctionCall));
    }
    session.auto = AutoNumber {
        line: u32::from(line),
        increment,
    };
    session.mode = Mode::AutoNumbering;
    session.auto_active = true;
    Ok(())
}

fn exec_on(session: &mut Session) -> Result<()> {
    let ins = session.codestream_mut();
    if ins.skip_white_read_if(&[&[ERROR]]) {
        ins.require_read(&[&[GOTO]], ErrorCode::SyntaxError)?;
        let line = jump_target(session)?;
        require_end(session)?;
        if line != 0 && !session.program.contains(line) {
            return Err(error!(UndefinedLineNumber));
        }
        return session.set_error_handler(Some(line));
    }
    let kind = if ins.skip_white_read_if(&[&[KEY]]) {
        EventKind::Key(key_number(session)?)
    } else if ins.skip_white_read_if(&[&TIMER]) {
        session
            .codestream_mut()
            .require_read(&[b"("], ErrorCode::SyntaxError)?;
        let seconds = expression(session)?;
        session
            .codestream_mut()
            .require_read(&[b")"], ErrorCode::SyntaxError)?;
        let seconds: f32 = std::convert::TryFrom::try_from(seconds)?;
        if !(1.0..=86400.0).contains(&seconds) {
            return Err(error!(IllegalFunctionCall));
        }
        let now = chrono::Utc::now().timestamp_millis();
        session.events.set_timer_period(seconds.round() as u32, now);
        EventKind::Timer
    } else {
        return Err(error!(SyntaxError));
    };
    session
        .codestream_mut()
        .require_read(&[&[GOSUB]], ErrorCode::SyntaxError)?;
    let line = jump_target(session)?;
    require_end(session)?;
    debug!("Event {:?} handled at line {}", kind, line);
    session.events.set_handler(kind, Some(line));
    Ok(())
}

fn key_number(session: &mut Session) -> Result<u8> {
    session
        .codestream_mut()
        .require_read(&[b"("], ErrorCode::SyntaxError)?;
    let key = int_expression(session)?;
    session
        .codestream_mut()
        .require_read(&[b")"], ErrorCode::SyntaxError)?;
    range_check(1, i32::from(NUM_KEYS), &[Some(i32::from(key))])?;
    Ok(key as u8)
}

fn event_command(session: &mut Session) -> Result<EventCommand> {
    let ins = session.codestream_mut();
    if ins.skip_white_read_if(&[&[ON]]) {
        Ok(EventCommand::On)
    } else if ins.skip_white_read_if(&[&[OFF]]) {
        Ok(EventCommand::Off)
    } else if ins.skip_white_read_if(&[&[STOP]]) {
        Ok(EventCommand::Stop)
    } else {
        Err(error!(SyntaxError))
    }
}

fn exec_resume(session: &mut Session) -> Result<()> {
    let ins = session.codestream_mut();
    let target = if ins.skip_white_read_if(&[&[NEXT]]) {
        ResumeTarget::Next
    } else {
        match ins.parse_jump_target(true)? {
            None | Some(0) => ResumeTarget::Statement,
            Some(line) => ResumeTarget::Line(line),
        }
    };
    require_end(session)?;
    session.resume(target)
}

fn exec_open(session: &mut Session) -> Result<()> {
    let name = string_expression(session)?;
    let ins = session.codestream_mut();
    ins.require_read(&[&[FOR]], ErrorCode::SyntaxError)?;
    let mode = if ins.skip_white_read_if(&[&[INPUT]]) {
        FileMode::Input
    } else if ins.skip_white_read_if(&[&OUTPUT]) {
        FileMode::Output
    } else if ins.skip_white_read_if(&[&APPEND]) {
        FileMode::Append
    } else if ins.skip_white_read_if(&[&RANDOM]) {
        FileMode::Random
    } else {
        return Err(error!(SyntaxError));
    };
    ins.require_read(&[&AS], ErrorCode::SyntaxError)?;
    ins.skip_white_read_if(&[b"#"]);
    let number = int_expression(session)?;
    range_check_err(1, 255, Some(i32::from(number)), ErrorCode::BadFileNumber)?;
    require_end(session)?;
    session.files.open(number as u8, &name, mode)
}

fn exec_close(session: &mut Session) -> Result<()> {
    if session.codestream_mut().require(END_STATEMENT, ErrorCode::SyntaxError).is_ok() {
        session.files.close_all();
        return Ok(());
    }
    loop {
        session.codestream_mut().skip_white_read_if(&[b"#"]);
        let number = int_expression(session)?;
        range_check_err(1, 255, Some(i32::from(number)), ErrorCode::BadFileNumber)?;
        session.files.close(number as u8)?;
        if !session.codestream_mut().skip_white_read_if(&[b","]) {
            break;
        }
    }
    require_end(session)
}
