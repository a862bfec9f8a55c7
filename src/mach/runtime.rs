use super::events::EventSource;
use super::session::{EditPrompt, Mode};
use super::statement::Dispatcher;
use super::trap::TrapState;
use super::{snapshot, Config, Console, Program, Session};
use crate::lang::token::END_LINE;
use crate::lang::{
    tokenise_line, Break, Error, ErrorCode, Location, Signal, TokenCursor, MAX_LINE_NUMBER,
};
use log::{debug, info};
use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;

type Result<T> = std::result::Result<T, Signal>;

/// ## Interpreter loop
///
/// Owns the session and drives it with operator input from a
/// [`Console`], statements from a [`Dispatcher`] and signals from an
/// [`EventSource`].
pub struct Runtime<C, D, E> {
    session: Session,
    config: Config,
    console: C,
    dispatcher: D,
    events: E,
}

impl<C: Console, D: Dispatcher, E: EventSource> Runtime<C, D, E> {
    pub fn new(config: Config, console: C, dispatcher: D, events: E) -> Self {
        let session = Runtime::<C, D, E>::fresh_session(&config);
        Runtime {
            session,
            config,
            console,
            dispatcher,
            events,
        }
    }

    fn fresh_session(config: &Config) -> Session {
        let mut session = Session::new();
        session.auto_increment = config.auto_increment;
        session.auto.increment = config.auto_increment;
        session
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Run until `SYSTEM`, end of input, or an idle quit. A reset
    /// discards the saved session and starts over.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.launch() {
                Err(Signal::Reset) => {
                    info!("Reset");
                    snapshot::delete(self.config.state_file.as_deref());
                    self.session = Runtime::<C, D, E>::fresh_session(&self.config);
                    self.config.resume = false;
                }
                other => return other,
            }
        }
    }

    fn launch(&mut self) -> Result<()> {
        if self.config.resume {
            match snapshot::load(self.config.state_file.as_deref()) {
                Ok(session) => {
                    self.session = session;
                    return self.resume();
                }
                Err(e) => debug!("{}", e),
            }
        }
        self.start()
    }

    fn start(&mut self) -> Result<()> {
        if let Some(path) = self.config.program.clone() {
            match File::open(&path)
                .map_err(Error::from)
                .and_then(|file| Program::load(BufReader::new(file)))
            {
                Ok(program) => self.session.program = program,
                Err(e) => self.console.write_error_message(e.text(), None)?,
            }
        }
        if self.config.greeting && !self.config.run && self.config.exec.is_none() {
            self.console
                .write_line(&format!("BASIC {}", env!("CARGO_PKG_VERSION")))?;
        }
        if let Some(command) = self.config.exec.clone() {
            match self.store_line(&command) {
                Ok(stored) => {
                    self.session.prompt = !stored;
                    if self.session.mode == Mode::Executing {
                        self.cycle()?;
                    }
                }
                Err(Signal::Error(e)) => self.handle_error(e)?,
                Err(other) => return Err(other),
            }
        }
        if self.config.run {
            self.session.jump(None)?;
            self.session.mode = Mode::Executing;
            self.console.reset_cursor_visibility();
        }
        self.main_loop()
    }

    fn resume(&mut self) -> Result<()> {
        if self.session.mode != Mode::Executing {
            self.session.prompt = false;
        }
        self.main_loop()
    }

    fn main_loop(&mut self) -> Result<()> {
        let result = loop {
            if self.config.quit
                && self.session.mode == Mode::Direct
                && !self.console.input_pending()
            {
                break Ok(());
            }
            if let Err(signal) = self.cycle() {
                break Err(signal);
            }
        };
        if result == Err(Signal::Exit) && self.config.wait {
            self.console.wait_key();
        }
        self.shutdown();
        match result {
            Err(Signal::Exit) => Ok(()),
            other => other,
        }
    }

    /// Save the session, then release files and the console.
    pub fn shutdown(&mut self) {
        snapshot::save(&self.session, self.config.state_file.as_deref());
        self.session.files.close_all();
        self.console.close();
    }

    /// One pass of the loop. Returns once execution has come back to
    /// idle. Only `Exit` and `Reset` get out.
    pub fn cycle(&mut self) -> Result<()> {
        match self.cycle_modes() {
            Err(Signal::Error(e)) => {
                self.handle_error(e)?;
                self.session.prompt = true;
                Ok(())
            }
            Err(Signal::Break(brk)) => {
                self.console.stop_sound();
                self.handle_break(brk)?;
                self.session.prompt = true;
                Ok(())
            }
            Err(Signal::Fault(fault)) => {
                self.handle_fault(&fault)?;
                Ok(())
            }
            other => other,
        }
    }

    fn cycle_modes(&mut self) -> Result<()> {
        loop {
            let last_execute = self.session.mode == Mode::Executing;
            match self.session.mode {
                Mode::Executing => match self.step() {
                    Ok(()) => {}
                    Err(Signal::Error(e)) => self.session.trap_error(e)?,
                    Err(Signal::Break(brk)) => {
                        self.console.stop_sound();
                        self.handle_break(brk)?;
                    }
                    Err(other) => return Err(other),
                },
                Mode::AutoNumbering => match self.auto_step() {
                    Ok(()) => {}
                    Err(Signal::Break(_)) => {
                        self.console.stop_sound();
                        self.session.auto_active = false;
                        self.session.mode = Mode::Direct;
                    }
                    Err(other) => return Err(other),
                },
                Mode::Direct => {
                    let (buffer, cursor) = self.show_prompt()?;
                    match self.read_line(&buffer, cursor) {
                        Ok(line) => self.session.prompt = !self.store_line(&line)?,
                        Err(Signal::Break(_)) => {
                            self.console.stop_sound();
                            self.session.prompt = false;
                            continue;
                        }
                        Err(other) => return Err(other),
                    }
                }
            }
            if self.switch_mode(last_execute) {
                return Ok(());
            }
        }
    }

    fn step(&mut self) -> Result<()> {
        self.events.poll(&mut self.session)?;
        self.session.handle_basic_events()?;
        if !self
            .dispatcher
            .parse_statement(&mut self.session, &mut self.console)?
        {
            self.session.end_execution();
        }
        Ok(())
    }

    /// Returns true once the mode has settled to idle after execution.
    fn switch_mode(&mut self, last_execute: bool) -> bool {
        let executing = self.session.mode == Mode::Executing;
        if executing != last_execute {
            debug!("Executing: {}", executing);
            self.session.set_pointer(false, Some(0));
            self.console.reset_cursor_visibility();
        }
        self.session.mode == Mode::Direct && last_execute
    }

    fn read_line(&mut self, buffer: &str, cursor: usize) -> Result<String> {
        self.session.awaiting_input = true;
        let line = self.console.read_line(buffer, cursor);
        self.session.awaiting_input = false;
        line
    }

    /// Store a numbered line, or queue anything else as the direct line.
    /// Returns true if nothing is to be executed.
    pub fn store_line(&mut self, line: &str) -> Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }
        self.session.direct_line = TokenCursor::new(tokenise_line(line));
        if self.session.direct_line.peek_byte() == Some(END_LINE) {
            let (empty, number) = Program::check_number_start(&mut self.session.direct_line)?;
            if empty {
                self.session.program.delete_line(number)?;
            } else {
                self.session
                    .program
                    .store_line(self.session.direct_line.bytes())?;
            }
            self.session.clear();
        } else {
            self.session.mode = Mode::Executing;
        }
        Ok(self.session.mode != Mode::Executing)
    }

    fn auto_step(&mut self) -> Result<()> {
        let number = self.session.auto.line.to_string();
        let exists = u16::try_from(self.session.auto.line)
            .map_or(false, |line| self.session.program.contains(line));
        let prefill = format!("{}{}", number, if exists { '*' } else { ' ' });
        let len = prefill.len();
        let mut line = self.read_line(&prefill, len)?;
        let starred = format!("{}*", number);
        if line.starts_with(&starred) {
            line.replace_range(number.len()..=number.len(), " ");
        }
        self.session.direct_line = TokenCursor::new(tokenise_line(&line));
        if self.session.direct_line.peek_byte() == Some(END_LINE) {
            let (empty, number) = Program::check_number_start(&mut self.session.direct_line)?;
            if empty {
                if self.session.program.contains(number) {
                    self.session.program.delete_line(number)?;
                }
            } else {
                self.session
                    .program
                    .store_line(self.session.direct_line.bytes())?;
            }
            self.session.clear();
            let next = u32::from(number) + u32::from(self.session.auto.increment);
            self.session.auto.line = next;
            if next > u32::from(MAX_LINE_NUMBER) {
                self.session.auto_active = false;
                self.session.mode = Mode::Direct;
            }
        } else if !line.trim().is_empty() {
            self.session.mode = Mode::Executing;
        }
        Ok(())
    }

    /// Print `Ok` if due. A pending edit prompt instead comes back as
    /// the text and cursor column to start the next input with.
    fn show_prompt(&mut self) -> Result<(String, usize)> {
        if let Some(edit) = self.session.edit_prompt.take() {
            if let Some(text) = self.session.program.edit_text(edit.line, edit.position) {
                return Ok(text);
            }
        }
        if self.session.prompt {
            self.console.start_line()?;
            self.console.write_line("Ok")?;
        }
        Ok((String::new(), 0))
    }

    fn handle_error(&mut self, error: Error) -> Result<()> {
        let line = match error.line_number() {
            Some(line) => Some(line),
            None => self.session.line_number_of(error.location()),
        };
        self.console.write_error_message(error.text(), line)?;
        self.session.trap.state = TrapState::Idle;
        self.session.events.suspend_all = false;
        self.session.end_execution();
        self.session.awaiting_input = false;
        if error.is(ErrorCode::SyntaxError) {
            self.session.trap.errn = 0;
            if let (Some(Location::Program(pos)), Some(line)) = (error.location(), line) {
                self.session.edit_prompt = Some(EditPrompt {
                    line,
                    position: pos + 1,
                });
            }
        }
        Ok(())
    }

    fn handle_break(&mut self, brk: Break) -> Result<()> {
        if !self.session.awaiting_input && !brk.stop {
            self.console.write("^C")?;
        }
        let line = if self.session.run_mode {
            let pos = self.session.program.bytecode().tell();
            self.session.stop = Some(pos);
            let at = if brk.stop {
                self.session.current_statement
            } else {
                pos
            };
            self.session.program.line_number_at(at)
        } else {
            None
        };
        self.console.write_error_message(&brk.to_string(), line)?;
        self.session.end_execution();
        self.session.awaiting_input = false;
        Ok(())
    }

    /// Report a condition that is not a BASIC error and abandon the
    /// current execution.
    fn handle_fault(&mut self, fault: &str) -> Result<()> {
        log::error!("Unhandled fault: {}", fault);
        log::error!(
            "mode={:?} run_mode={} line={:?} gosub_depth={} files={}",
            self.session.mode,
            self.session.run_mode,
            self.session.current_line(),
            self.session.gosub.len(),
            self.session.files.len()
        );
        self.session.auto_active = false;
        self.session.mode = Mode::Direct;
        self.session.awaiting_input = false;
        self.session.set_pointer(false, None);
        self.session.prompt = true;
        self.console.start_line()?;
        self.console
            .write_line(&format!("Internal error; {}", fault))?;
        Ok(())
    }
}
