use crate::lang::{LineNumber, Signal};
use std::io;

/// ## Operator console
///
/// The runtime's only way to talk to the operator.
pub trait Console {
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Move to a new line unless the cursor is already at the start of one.
    fn start_line(&mut self) -> io::Result<()>;

    /// Block for one line of input. The editor starts out holding
    /// `buffer` with the cursor at byte `cursor`. An interrupt returns
    /// `Signal::Break`; end of input returns `Signal::Exit`.
    fn read_line(&mut self, buffer: &str, cursor: usize) -> Result<String, Signal>;

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    fn write_error_message(&mut self, message: &str, line: LineNumber) -> io::Result<()> {
        self.start_line()?;
        match line {
            Some(line) => self.write_line(&format!("{} in {}", message, line)),
            None => self.write_line(message),
        }
    }

    /// Whether typed-ahead input is waiting to be read.
    fn input_pending(&self) -> bool {
        false
    }

    fn reset_cursor_visibility(&mut self) {}

    fn stop_sound(&mut self) {}

    fn wait_key(&mut self) {}

    fn close(&mut self) {}
}
