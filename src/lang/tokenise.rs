use super::token::*;

/// Next pointer of a line that is not yet part of a program.
pub const UNLINKED: [u8; 2] = [0xC0, 0xDE];

/// Encode one line of source text.
///
/// A line that starts with a line number becomes
/// `00 <next:u16> <number:u16> <body> 00`, the layout of a stored program
/// line, with a placeholder `next` pointer. Anything else is a direct line
/// `<body> 00`.
pub fn tokenise_line(s: &str) -> Vec<u8> {
    Tokeniser::new(s).tokenise()
}

/// Render a tokenized line body (up to its terminator) as source text.
pub fn detokenise_line(body: &[u8]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while let Some(&c) = body.get(i) {
        i += 1;
        match c {
            END_LINE => break,
            QUOTE => {
                out.push('"');
                while let Some(&d) = body.get(i) {
                    if d == END_LINE {
                        break;
                    }
                    i += 1;
                    out.push(char::from(d));
                    if d == QUOTE {
                        break;
                    }
                }
            }
            REM => {
                if out.ends_with(':') && body.get(i) == Some(&b'\'') {
                    out.pop();
                    i += 1;
                    out.push('\'');
                } else {
                    out.push_str("REM");
                }
                while let Some(&d) = body.get(i) {
                    if d == END_LINE {
                        break;
                    }
                    out.push(char::from(d));
                    i += 1;
                }
            }
            C_0..=C_10 => out.push_str(&(c - C_0).to_string()),
            T_BYTE | T_UINT | T_LINE_PTR | T_INT | T_OCT | T_HEX | T_SINGLE | T_DOUBLE => {
                let n = plus_bytes(c);
                let operand = body.get(i..i + n).unwrap_or(&[]);
                i += n;
                out.push_str(&number_text(c, operand));
            }
            PREFIX_FD | PREFIX_FE | PREFIX_FF => {
                let token = body.get(i - 1..i + 1).unwrap_or(&[]);
                i += 1;
                out.push_str(keyword_name(token).unwrap_or("?"));
            }
            _ if c >= 0x80 => match operator_char(c) {
                Some(op) => out.push(op),
                None => out.push_str(keyword_name(&[c]).unwrap_or("?")),
            },
            _ => out.push(char::from(c)),
        }
    }
    out
}

fn number_text(lead: u8, operand: &[u8]) -> String {
    if operand.len() < plus_bytes(lead) {
        return String::new();
    }
    match lead {
        T_BYTE => operand[0].to_string(),
        T_UINT | T_LINE_PTR => u16::from_le_bytes([operand[0], operand[1]]).to_string(),
        T_INT => i16::from_le_bytes([operand[0], operand[1]]).to_string(),
        T_OCT => format!("&O{:o}", u16::from_le_bytes([operand[0], operand[1]])),
        T_HEX => format!("&H{:X}", u16::from_le_bytes([operand[0], operand[1]])),
        T_SINGLE => {
            let mut b = [0u8; 4];
            b.copy_from_slice(operand);
            f32::from_le_bytes(b).to_string()
        }
        _ => {
            let mut b = [0u8; 8];
            b.copy_from_slice(operand);
            f64::from_le_bytes(b).to_string()
        }
    }
}

struct Tokeniser<'a> {
    src: &'a [u8],
    pos: usize,
    out: Vec<u8>,
    line_numbers_follow: bool,
}

impl<'a> Tokeniser<'a> {
    fn new(s: &'a str) -> Tokeniser<'a> {
        Tokeniser {
            src: s.trim_end_matches(|c| c == '\r' || c == '\n').as_bytes(),
            pos: 0,
            out: vec![],
            line_numbers_follow: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn tokenise(mut self) -> Vec<u8> {
        while let Some(b' ') | Some(b'\t') = self.peek() {
            self.pos += 1;
        }
        if let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                let start = self.pos;
                let digits = self.digits();
                match digits.parse::<u16>() {
                    Ok(number) => {
                        self.out.push(END_LINE);
                        self.out.extend_from_slice(&UNLINKED);
                        self.out.extend_from_slice(&number.to_le_bytes());
                        while let Some(b' ') = self.peek() {
                            self.pos += 1;
                        }
                    }
                    Err(_) => self.pos = start,
                }
            }
        }
        while let Some(c) = self.peek() {
            let keep_line_numbers = matches!(c, b' ' | b',' | b'-') || c.is_ascii_digit();
            if !keep_line_numbers {
                self.line_numbers_follow = false;
            }
            if c == QUOTE {
                self.string();
            } else if c == b'\'' {
                self.out.extend_from_slice(&[COLON, REM]);
                self.rest();
            } else if c.is_ascii_digit() || (c == b'.' && self.is_digit_at(self.pos + 1)) {
                self.number();
            } else if c.is_ascii_alphabetic() {
                if self.keyword() {
                    continue;
                }
                self.name();
            } else if c == b'?' {
                self.pos += 1;
                self.out.push(PRINT);
            } else if let Some((_, token)) = OPERATORS.iter().find(|(ch, _)| *ch == c) {
                self.pos += 1;
                self.out.push(*token);
            } else if c.is_ascii() && !c.is_ascii_control() || c == b'\t' {
                self.pos += 1;
                self.out.push(c);
            } else {
                self.pos += 1;
            }
        }
        self.out.push(END_LINE);
        self.out
    }

    fn is_digit_at(&self, pos: usize) -> bool {
        self.src.get(pos).map_or(false, |c| c.is_ascii_digit())
    }

    fn digits(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            s.push(char::from(c));
            self.pos += 1;
        }
        s
    }

    fn string(&mut self) {
        self.out.push(QUOTE);
        self.pos += 1;
        while let Some(c) = self.peek() {
            self.pos += 1;
            self.out.push(c);
            if c == QUOTE {
                break;
            }
        }
    }

    /// Copies the remainder of the line verbatim.
    fn rest(&mut self) {
        self.out.extend_from_slice(&self.src[self.pos..]);
        self.pos = self.src.len();
    }

    fn number(&mut self) {
        let mut s = self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            s.push('.');
            s.push_str(&self.digits());
            let value = s.parse::<f32>().unwrap_or(0.0);
            self.out.push(T_SINGLE);
            self.out.extend_from_slice(&value.to_le_bytes());
            return;
        }
        let value = s.parse::<u32>().unwrap_or(u32::MAX);
        if self.line_numbers_follow && value <= u16::MAX as u32 {
            self.out.push(T_UINT);
            self.out.extend_from_slice(&(value as u16).to_le_bytes());
        } else if value <= 9 {
            self.out.push(C_0 + value as u8);
        } else if value <= 255 {
            self.out.extend_from_slice(&[T_BYTE, value as u8]);
        } else if value <= i16::MAX as u32 {
            self.out.push(T_INT);
            self.out.extend_from_slice(&(value as i16).to_le_bytes());
        } else {
            self.out.push(T_SINGLE);
            self.out.extend_from_slice(&(value as f32).to_le_bytes());
        }
    }

    fn keyword(&mut self) -> bool {
        let rest = &self.src[self.pos..];
        let found = KEYWORDS
            .iter()
            .filter(|(word, _)| {
                rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word.as_bytes())
            })
            .max_by_key(|(word, _)| word.len());
        let (word, bytes) = match found {
            Some(found) => *found,
            None => return false,
        };
        self.pos += word.len();
        self.out.extend_from_slice(bytes);
        if bytes == [REM] {
            self.rest();
        } else if bytes.len() == 1 && LINE_NUMBER_KEYWORDS.contains(&bytes[0]) {
            self.line_numbers_follow = true;
        }
        true
    }

    fn name(&mut self) {
        while let Some(c) = self.peek() {
            if !NAME_CHARS.contains(&c) {
                break;
            }
            self.out.push(c.to_ascii_uppercase());
            self.pos += 1;
        }
        if let Some(c) = self.peek() {
            if SIGILS.contains(&c) {
                self.out.push(c);
                self.pos += 1;
            }
        }
    }
}
