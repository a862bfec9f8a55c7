use super::token::{self, END_LINE, QUOTE, REM, T_UINT, WHITESPACE};
use super::{Error, ErrorCode};
use crate::error;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, Error>;

/// ## Seekable cursor over tokenized code
///
/// The position is always within `0..=len`. Reads past the end
/// return fewer bytes (or none) instead of failing; callers treat an
/// empty read as "no token here".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCursor {
    bytes: Vec<u8>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(bytes: Vec<u8>) -> TokenCursor {
        TokenCursor { bytes, pos: 0 }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    /// Relative seeks stop at either end of the buffer.
    pub fn seek_relative(&mut self, delta: isize) {
        if delta < 0 {
            self.pos = self.pos.saturating_sub(delta.unsigned_abs());
        } else {
            self.seek(self.pos.saturating_add(delta as usize));
        }
    }

    pub fn read(&mut self, n: usize) -> &[u8] {
        let start = self.pos;
        self.pos = (start + n).min(self.bytes.len());
        &self.bytes[start..self.pos]
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    pub fn peek(&self, n: usize) -> &[u8] {
        let end = (self.pos + n).min(self.bytes.len());
        &self.bytes[self.pos..end]
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Skip bytes in `skip_set`, then read `n` bytes.
    pub fn skip_read(&mut self, skip_set: &[u8], n: usize) -> &[u8] {
        while let Some(b) = self.peek_byte() {
            if !skip_set.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        self.read(n)
    }

    /// Skip bytes in `skip_set`, then peek `n` bytes.
    pub fn skip(&mut self, skip_set: &[u8], n: usize) -> &[u8] {
        let len = self.skip_read(skip_set, n).len();
        self.pos -= len;
        self.peek(n)
    }

    pub fn skip_white(&mut self) -> Option<u8> {
        self.skip(WHITESPACE, 1).first().copied()
    }

    pub fn skip_white_read(&mut self) -> Option<u8> {
        self.skip_read(WHITESPACE, 1).first().copied()
    }

    /// Consume the next token only if it is one of `tokens`, which
    /// must all have the same length.
    pub fn read_if(&mut self, tokens: &[&[u8]]) -> bool {
        let n = match tokens.first() {
            Some(t) => t.len(),
            None => return false,
        };
        let next = self.peek(n);
        if next.len() == n && tokens.contains(&next) {
            self.pos += n;
            return true;
        }
        false
    }

    pub fn skip_white_read_if(&mut self, tokens: &[&[u8]]) -> bool {
        self.skip_white();
        self.read_if(tokens)
    }

    /// Scan forward until a byte in `find` is at the cursor.
    ///
    /// Bytes inside string literals and after `REM` never match. A line
    /// terminator clears both states and is followed by a four byte line
    /// marker that is skipped whole; a `00 00` or truncated marker ends
    /// the scan. Operand bytes of numeric tokens are skipped as a unit.
    ///
    /// With `break_on_first` false, a match on the very first byte is
    /// passed over.
    pub fn skip_to(&mut self, find: &[u8], break_on_first: bool) {
        let mut break_on_first = break_on_first;
        let mut literal = false;
        let mut rem = false;
        while let Some(c) = self.read_byte() {
            if c == QUOTE {
                literal = !literal;
            } else if c == REM {
                rem = true;
            } else if c == END_LINE {
                literal = false;
                rem = false;
            }
            if literal || rem {
                continue;
            }
            if find.contains(&c) {
                if break_on_first {
                    self.pos -= 1;
                    break;
                }
                break_on_first = true;
            }
            if c == END_LINE {
                let off = self.read(2);
                if off.len() < 2 || off == [0, 0] {
                    break;
                }
                self.read(2);
            } else {
                self.read(token::plus_bytes(c));
            }
        }
    }

    pub fn skip_to_read(&mut self, find: &[u8]) -> Option<u8> {
        self.skip_to(find, true);
        self.read_byte()
    }

    /// Skip whitespace and read one of `tokens`, or fail with `err`.
    pub fn require_read(&mut self, tokens: &[&[u8]], err: ErrorCode) -> Result<()> {
        if self.skip_white_read_if(tokens) {
            Ok(())
        } else {
            Err(Error::new(err))
        }
    }

    /// Skip whitespace and fail with `err` unless the next byte is in
    /// `set`. The end of the buffer counts as `END_LINE`.
    pub fn require(&mut self, set: &[u8], err: ErrorCode) -> Result<()> {
        let next = self.skip_white().unwrap_or(END_LINE);
        if set.contains(&next) {
            Ok(())
        } else {
            Err(Error::new(err))
        }
    }

    /// Read the `next:u16 number:u16` marker that follows a line terminator.
    ///
    /// At the end of the program (`00 00`) or on a truncated marker the
    /// cursor is left at the start of the marker and `None` is returned.
    pub fn parse_line_number(&mut self) -> Option<u16> {
        let off = self.read(2);
        if off.len() < 2 || off == [0, 0] {
            let len = off.len() as isize;
            self.seek_relative(-len);
            return None;
        }
        let num = self.read(2);
        if num.len() < 2 {
            let len = num.len() as isize;
            self.seek_relative(-len - 2);
            return None;
        }
        Some(u16::from_le_bytes([num[0], num[1]]))
    }

    /// Parse a line number operand as in `GOTO`, `RUN` or `LIST`.
    pub fn parse_jump_target(&mut self, allow_empty: bool) -> Result<Option<u16>> {
        if self.skip_white_read_if(&[&[T_UINT]]) {
            let num = self.read(2);
            if num.len() == 2 {
                return Ok(Some(u16::from_le_bytes([num[0], num[1]])));
            }
        } else if allow_empty {
            return Ok(None);
        }
        Err(error!(SyntaxError))
    }

    /// Read a variable name: a letter, then name characters, then an
    /// optional type sigil.
    pub fn read_name(&mut self, allow_empty: bool) -> Result<String> {
        let mut name = String::new();
        match self.skip_white() {
            Some(d) if d.is_ascii_alphabetic() => {
                while let Some(d) = self.peek_byte() {
                    if !token::NAME_CHARS.contains(&d) {
                        break;
                    }
                    name.push(char::from(d.to_ascii_uppercase()));
                    self.pos += 1;
                }
                if let Some(d) = self.peek_byte() {
                    if token::SIGILS.contains(&d) {
                        name.push(char::from(d));
                        self.pos += 1;
                    }
                }
            }
            _ => {}
        }
        if name.is_empty() && !allow_empty {
            return Err(error!(SyntaxError));
        }
        Ok(name)
    }
}

/// Fail with Illegal function call if any present value is outside `lower..=upper`.
pub fn range_check(lower: i32, upper: i32, values: &[Option<i32>]) -> Result<()> {
    for v in values.iter().flatten() {
        if !(lower..=upper).contains(v) {
            return Err(error!(IllegalFunctionCall));
        }
    }
    Ok(())
}

pub fn range_check_err(lower: i32, upper: i32, value: Option<i32>, err: ErrorCode) -> Result<()> {
    match value {
        Some(v) if !(lower..=upper).contains(&v) => Err(Error::new(err)),
        _ => Ok(()),
    }
}
