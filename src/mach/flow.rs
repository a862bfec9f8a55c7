use super::events::EventKind;
use super::session::GosubFrame;
use super::Session;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

impl Session {
    /// Switch code streams. `None` puts the cursor at the end, so nothing
    /// more runs from it.
    pub fn set_pointer(&mut self, run_mode: bool, pos: Option<usize>) {
        self.run_mode = run_mode;
        let codestream = self.codestream_mut();
        match pos {
            Some(pos) => codestream.seek(pos),
            None => {
                let end = codestream.len();
                codestream.seek(end)
            }
        }
    }

    /// Continue the program at a line, or from the top.
    pub fn jump(&mut self, line: Option<u16>) -> Result<()> {
        let pos = match line {
            None => 0,
            Some(line) => self
                .program
                .offset_of(line)
                .ok_or_else(|| error!(UndefinedLineNumber))?,
        };
        self.set_pointer(true, Some(pos));
        Ok(())
    }

    pub fn jump_gosub(&mut self, line: u16, handler: Option<EventKind>) -> Result<()> {
        if !self.program.contains(line) {
            return Err(error!(UndefinedLineNumber));
        }
        self.gosub.push(GosubFrame {
            statement: self.codestream().tell(),
            run_mode: self.run_mode,
            handler,
        })?;
        self.jump(Some(line))
    }

    /// Return from a subroutine, to the caller or to `line`. Returning
    /// from an event handler re-arms its event.
    pub fn jump_return(&mut self, line: Option<u16>) -> Result<()> {
        let frame = self.gosub.pop().ok_or_else(|| error!(ReturnWithoutGosub))?;
        if let Some(kind) = frame.handler {
            self.events.release(kind);
        }
        match line {
            Some(line) => self.jump(Some(line)),
            None => {
                self.set_pointer(frame.run_mode, Some(frame.statement));
                Ok(())
            }
        }
    }

    /// `CONT`
    pub fn cont(&mut self) -> Result<()> {
        match self.stop {
            Some(pos) => {
                self.set_pointer(true, Some(pos));
                Ok(())
            }
            None => Err(error!(CantContinue)),
        }
    }
}
