use crate::error;
use crate::lang::token::{self, END_LINE};
use crate::lang::{detokenise_line, tokenise_line, Error, TokenCursor, MAX_LINE_NUMBER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io::BufRead;

type Result<T> = std::result::Result<T, Error>;

/// ## Stored program
///
/// Lines are kept as one tokenized image:
/// `00 <next:u16> <number:u16> <body>` per line, then `00 00 00`.
/// `next` is the offset of the following line's `next` field, so it is
/// never zero for a stored line. The line offset map is derived from
/// the image and rebuilt whenever the image changes.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TokenCursor", into = "TokenCursor")]
pub struct Program {
    bytecode: TokenCursor,
    lines: BTreeMap<u16, usize>,
    end: usize,
}

impl Default for Program {
    fn default() -> Program {
        Program::new()
    }
}

impl Program {
    pub fn new() -> Program {
        Program {
            bytecode: TokenCursor::new(vec![END_LINE, 0, 0]),
            lines: BTreeMap::new(),
            end: 0,
        }
    }

    /// Adopt a program image, checking its structure.
    pub fn from_bytecode(bytes: Vec<u8>) -> Result<Program> {
        Program::try_from(TokenCursor::new(bytes))
    }

    /// Read a program saved as text. Every line must be numbered.
    pub fn load<R: BufRead>(reader: R) -> Result<Program> {
        let mut program = Program::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut cursor = TokenCursor::new(tokenise_line(&line));
            if cursor.peek_byte() != Some(END_LINE) {
                return Err(error!(DirectStatementInFile));
            }
            let (empty, number) = Program::check_number_start(&mut cursor)?;
            if !empty {
                program.store_line(cursor.bytes())?;
            } else if program.contains(number) {
                program.delete_line(number)?;
            }
        }
        Ok(program)
    }

    /// Check a tokenized numbered line. Returns whether the body is
    /// empty, and the line number.
    pub fn check_number_start(line: &mut TokenCursor) -> Result<(bool, u16)> {
        line.seek(1);
        let number = match line.parse_line_number() {
            Some(n) if n <= MAX_LINE_NUMBER => n,
            _ => return Err(error!(SyntaxError)),
        };
        let c = line.skip_white_read();
        let empty = c.map_or(true, |c| c == END_LINE);
        if let Some(c) = c {
            if token::is_number(c) {
                return Err(error!(SyntaxError));
            }
        }
        Ok((empty, number))
    }

    pub fn bytecode(&self) -> &TokenCursor {
        &self.bytecode
    }

    pub fn bytecode_mut(&mut self) -> &mut TokenCursor {
        &mut self.bytecode
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, line: u16) -> bool {
        self.lines.contains_key(&line)
    }

    /// Offset of the line's leading terminator byte.
    pub fn offset_of(&self, line: u16) -> Option<usize> {
        self.lines.get(&line).copied()
    }

    pub fn first_line(&self) -> Option<u16> {
        self.lines.keys().next().copied()
    }

    pub fn last_line(&self) -> Option<u16> {
        self.lines.keys().next_back().copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = u16> + '_ {
        self.lines.keys().copied()
    }

    /// The line holding the bytecode offset `pos`.
    pub fn line_number_at(&self, pos: usize) -> Option<u16> {
        for (line_number, offset) in self.lines.iter().rev() {
            if pos >= *offset {
                return Some(*line_number);
            }
        }
        None
    }

    fn body(&self, line: u16) -> Option<&[u8]> {
        let start = self.offset_of(line)?;
        let stop = match self.lines.range(line..).nth(1) {
            Some((_, next)) => *next,
            None => self.end,
        };
        self.bytecode.bytes().get(start + 5..stop)
    }

    /// Insert or replace a tokenized numbered line.
    pub fn store_line(&mut self, line: &[u8]) -> Result<()> {
        if line.len() < 5 || line[0] != END_LINE {
            return Err(error!(InternalError; "NOT A NUMBERED LINE"));
        }
        let number = u16::from_le_bytes([line[3], line[4]]);
        let mut body = &line[5..];
        if body.last() == Some(&END_LINE) {
            body = &body[..body.len() - 1];
        }
        let mut lines = self.contents();
        lines.insert(number, body.to_vec());
        *self = Program::build(lines)?;
        Ok(())
    }

    pub fn delete_line(&mut self, line: u16) -> Result<()> {
        if !self.contains(line) {
            return Err(error!(UndefinedLineNumber));
        }
        let mut lines = self.contents();
        lines.remove(&line);
        *self = Program::build(lines)?;
        Ok(())
    }

    /// Remove all lines within the range. Nothing in range is an error.
    pub fn delete_range(&mut self, from: Option<u16>, to: Option<u16>) -> Result<()> {
        let from = from.unwrap_or(0);
        let to = to.unwrap_or(u16::max_value());
        if from > to || self.lines.range(from..=to).next().is_none() {
            return Err(error!(IllegalFunctionCall));
        }
        let mut lines = self.contents();
        lines.retain(|n, _| *n < from || *n > to);
        *self = Program::build(lines)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Program::new();
    }

    /// Source text of each line in the range.
    pub fn listing(&self, from: Option<u16>, to: Option<u16>) -> Vec<String> {
        let from = from.unwrap_or(0);
        let to = to.unwrap_or(u16::max_value());
        if from > to {
            return vec![];
        }
        self.lines
            .range(from..=to)
            .filter_map(|(n, _)| self.line_text(*n))
            .collect()
    }

    pub fn line_text(&self, line: u16) -> Option<String> {
        let body = self.body(line)?;
        Some(format!("{} {}", line, detokenise_line(body)))
    }

    /// Line text for editing, with the cursor column for bytecode
    /// offset `pos`.
    pub fn edit_text(&self, line: u16, pos: usize) -> Option<(String, usize)> {
        let body = self.body(line)?;
        let start = self.offset_of(line)? + 5;
        let prefix = format!("{} ", line);
        let within = pos.saturating_sub(start).min(body.len());
        let column = prefix.len() + detokenise_line(&body[..within]).len();
        Some((format!("{}{}", prefix, detokenise_line(body)), column))
    }

    fn contents(&self) -> BTreeMap<u16, Vec<u8>> {
        self.lines
            .keys()
            .filter_map(|n| Some((*n, self.body(*n)?.to_vec())))
            .collect()
    }

    fn build(contents: BTreeMap<u16, Vec<u8>>) -> Result<Program> {
        let mut bytes = vec![];
        let mut lines = BTreeMap::new();
        for (number, body) in contents {
            lines.insert(number, bytes.len());
            bytes.push(END_LINE);
            bytes.extend_from_slice(&[0, 0]);
            bytes.extend_from_slice(&number.to_le_bytes());
            bytes.extend_from_slice(&body);
        }
        let end = bytes.len();
        bytes.extend_from_slice(&[END_LINE, 0, 0]);
        let mut program = Program {
            bytecode: TokenCursor::new(bytes),
            lines,
            end,
        };
        program.relink()?;
        Ok(program)
    }

    /// Rewrite every `next` pointer from the offset map.
    fn relink(&mut self) -> Result<()> {
        let mut bytes = self.bytecode.bytes().to_vec();
        let mut offsets: Vec<usize> = self.lines.values().copied().collect();
        offsets.push(self.end);
        for pair in offsets.windows(2) {
            let next = u16::try_from(pair[1] + 1).map_err(|_| error!(OutOfMemory))?;
            bytes[pair[0] + 1..pair[0] + 3].copy_from_slice(&next.to_le_bytes());
        }
        if bytes.len() > u16::max_value() as usize {
            return Err(error!(OutOfMemory));
        }
        let pos = self.bytecode.tell();
        self.bytecode = TokenCursor::new(bytes);
        self.bytecode.seek(pos);
        Ok(())
    }
}

impl TryFrom<TokenCursor> for Program {
    type Error = Error;

    fn try_from(mut bytecode: TokenCursor) -> Result<Program> {
        let pos = bytecode.tell();
        bytecode.seek(0);
        let mut lines = BTreeMap::new();
        let mut last: Option<u16> = None;
        let end = loop {
            let at = bytecode.tell();
            if bytecode.read_byte() != Some(END_LINE) {
                return Err(error!(InternalError; "CORRUPT PROGRAM"));
            }
            match bytecode.parse_line_number() {
                None => {
                    if bytecode.peek(2) != [0, 0] {
                        return Err(error!(InternalError; "CORRUPT PROGRAM"));
                    }
                    break at;
                }
                Some(number) => {
                    if last.map_or(false, |last| number <= last) {
                        return Err(error!(InternalError; "CORRUPT PROGRAM"));
                    }
                    last = Some(number);
                    lines.insert(number, at);
                    bytecode.skip_to(&[END_LINE], true);
                }
            }
        };
        let mut bytes = bytecode.bytes().to_vec();
        bytes.truncate(end + 3);
        let mut bytecode = TokenCursor::new(bytes);
        bytecode.seek(pos);
        let mut program = Program {
            bytecode,
            lines,
            end,
        };
        program.relink()?;
        Ok(program)
    }
}

impl From<Program> for TokenCursor {
    fn from(program: Program) -> TokenCursor {
        program.bytecode
    }
}
