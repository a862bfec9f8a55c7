#![allow(dead_code)]
use basic::lang::{Break, Signal};
use basic::mach::{Config, Console, EventKind, EventSource, Runtime, Session, Statements};
use std::collections::VecDeque;
use std::io;

/// Console fed from a script of typed lines. Each line is appended to
/// whatever the prompt offered, as if typed after it, unless it was
/// entered to type over the offer. `^C` interrupts the input. Running
/// out of script ends the session.
#[derive(Debug, Default)]
pub struct Script {
    input: VecDeque<(String, bool)>,
    pub output: String,
    pub offered: Vec<String>,
}

impl Console for Script {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn start_line(&mut self) -> io::Result<()> {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        Ok(())
    }

    fn read_line(&mut self, buffer: &str, _cursor: usize) -> Result<String, Signal> {
        self.offered.push(buffer.to_string());
        match self.input.pop_front() {
            Some((line, _)) if line == "^C" => Err(Break::default().into()),
            Some((line, true)) => Ok(line),
            Some((line, false)) => Ok(format!("{}{}", buffer, line)),
            None => Err(Signal::Exit),
        }
    }

    fn input_pending(&self) -> bool {
        !self.input.is_empty()
    }
}

/// Counts polls. Can interrupt, trigger events or fail at given polls.
#[derive(Debug, Default)]
pub struct Pump {
    pub polls: usize,
    pub break_at: Option<usize>,
    pub reset_at: Option<usize>,
    pub fault_at: Option<usize>,
    pub triggers: Vec<(usize, EventKind)>,
}

impl EventSource for Pump {
    fn poll(&mut self, session: &mut Session) -> Result<(), Signal> {
        self.polls += 1;
        for (at, kind) in self.triggers.iter() {
            if *at == self.polls {
                session.events.trigger(*kind);
            }
        }
        if self.break_at == Some(self.polls) {
            return Err(Break::default().into());
        }
        if self.reset_at == Some(self.polls) {
            return Err(Signal::Reset);
        }
        if self.fault_at == Some(self.polls) {
            return Err(Signal::Fault("poll failed".to_string()));
        }
        Ok(())
    }
}

pub type TestRuntime = Runtime<Script, Statements, Pump>;

pub fn runtime() -> TestRuntime {
    runtime_with(Config::default())
}

pub fn runtime_with(config: Config) -> TestRuntime {
    let config = Config {
        greeting: false,
        ..config
    };
    Runtime::new(config, Script::default(), Statements::new(), Pump::default())
}

pub trait Enter {
    fn enter(&mut self, line: &str);
    fn overtype(&mut self, line: &str);
}

impl Enter for TestRuntime {
    fn enter(&mut self, line: &str) {
        self.console_mut().input.push_back((line.to_string(), false));
    }

    fn overtype(&mut self, line: &str) {
        self.console_mut().input.push_back((line.to_string(), true));
    }
}

/// Run the script to the end and return what was printed between the
/// first and the last `Ok`.
pub fn exec(runtime: &mut TestRuntime) -> String {
    runtime.run().unwrap();
    let s = std::mem::take(&mut runtime.console_mut().output);
    let s = s.strip_prefix("Ok\n").unwrap_or(&s);
    s.strip_suffix("Ok\n").unwrap_or(s).to_string()
}
