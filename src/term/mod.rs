extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::lang::{Break, LineNumber, Signal};
use crate::mach::{Config, Console, EventKind, EventPump, EventQueue, Runtime, Statements};
use ansi_term::Style;
use linefeed::{Command, DefaultTerminal, Function, Interface, Prompter, ReadResult};
use log::warn;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn main(config: Config) {
    let pump = EventPump::new();
    let interrupted = pump.interrupt_flag();
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        warn!("Error setting Ctrl-C handler: {}", error);
    }
    let console = match Terminal::new(interrupted, pump.key_sender()) {
        Ok(console) => console,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };
    let mut runtime = Runtime::new(config, console, Statements::new(), pump);
    if let Err(signal) = runtime.run() {
        eprintln!("{:?}", signal);
    }
}

/// Console on a `linefeed` line editor.
pub struct Terminal {
    interface: Interface<DefaultTerminal>,
    interrupted: Arc<AtomicBool>,
    at_line_start: bool,
}

impl Terminal {
    pub fn new(
        interrupted: Arc<AtomicBool>,
        keys: EventQueue<EventKind>,
    ) -> io::Result<Terminal> {
        let interface = Interface::new("BASIC")?;
        interface.set_report_signal(linefeed::Signal::Interrupt, true);
        FunctionKey::install(&interface, keys);
        Ok(Terminal {
            interface,
            interrupted,
            at_line_start: true,
        })
    }

    fn cancel_input(&mut self) -> io::Result<()> {
        self.interface.set_buffer("")?;
        self.interface.lock_reader().cancel_read_line()?;
        self.at_line_start = true;
        Ok(())
    }
}

impl Console for Terminal {
    fn write(&mut self, text: &str) -> io::Result<()> {
        if let Some(c) = text.chars().last() {
            self.at_line_start = c == '\n';
        }
        self.interface.write_fmt(format_args!("{}", text))
    }

    fn start_line(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            self.write("\n")?;
        }
        Ok(())
    }

    fn read_line(&mut self, buffer: &str, cursor: usize) -> Result<String, Signal> {
        self.interface.set_buffer(buffer)?;
        self.interface.set_cursor(cursor.min(buffer.len()))?;
        loop {
            if self.interrupted.swap(false, Ordering::SeqCst) {
                self.cancel_input()?;
                return Err(Break::default().into());
            }
            match self
                .interface
                .read_line_step(Some(Duration::from_millis(50)))?
            {
                None => continue,
                Some(ReadResult::Input(line)) => {
                    self.at_line_start = true;
                    if !line.trim().is_empty() {
                        self.interface.add_history_unique(line.clone());
                    }
                    return Ok(line);
                }
                Some(ReadResult::Signal(linefeed::Signal::Interrupt)) => {
                    self.cancel_input()?;
                    return Err(Break::default().into());
                }
                Some(ReadResult::Signal(_)) | Some(ReadResult::Eof) => return Err(Signal::Exit),
            }
        }
    }

    fn write_error_message(&mut self, message: &str, line: LineNumber) -> io::Result<()> {
        self.start_line()?;
        let text = match line {
            Some(line) => format!("{} in {}", message, line),
            None => message.to_string(),
        };
        self.interface
            .write_fmt(format_args!("{}\n", Style::new().bold().paint(text)))?;
        self.at_line_start = true;
        Ok(())
    }

    fn wait_key(&mut self) {
        if self.write("Press Enter to close\n").is_ok() {
            let _ = self.interface.read_line();
        }
    }

    fn close(&mut self) {
        let _ = self.start_line();
        let _ = io::stdout().flush();
    }
}

/// Escape sequences of F1 to F10.
const FUNCTION_KEYS: [&str; 10] = [
    "\x1bOP", "\x1bOQ", "\x1bOR", "\x1bOS", "\x1b[15~", "\x1b[17~", "\x1b[18~", "\x1b[19~",
    "\x1b[20~", "\x1b[21~",
];

/// Sends `KEY(n)` events for function keys pressed in the editor.
struct FunctionKey {
    keys: EventQueue<EventKind>,
}

impl FunctionKey {
    fn install<T: linefeed::Terminal>(i: &Interface<T>, keys: EventQueue<EventKind>) {
        i.define_function("function-key", Arc::new(FunctionKey { keys }));
        for seq in FUNCTION_KEYS.iter() {
            i.bind_sequence(*seq, Command::from_str("function-key"));
        }
    }

    fn key_number(sequence: &str) -> Option<u8> {
        FUNCTION_KEYS
            .iter()
            .position(|seq| *seq == sequence)
            .map(|index| index as u8 + 1)
    }
}

impl<Term: linefeed::Terminal> Function<Term> for FunctionKey {
    fn execute(&self, prompter: &mut Prompter<Term>, _count: i32, _ch: char) -> io::Result<()> {
        if let Some(key) = FunctionKey::key_number(prompter.sequence()) {
            self.keys.push(EventKind::Key(key));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_key_numbers() {
        assert_eq!(FunctionKey::key_number("\x1bOP"), Some(1));
        assert_eq!(FunctionKey::key_number("\x1b[21~"), Some(10));
        assert_eq!(FunctionKey::key_number("\x1b[16~"), None);
    }
}
