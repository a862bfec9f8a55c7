use super::{Session, Val};
use crate::error;
use crate::lang::token::*;
use crate::lang::{Error, ErrorCode};
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Expressions
///
/// Sums and differences of string literals, numbers, variables, `ERR`,
/// `ERL` and parenthesized expressions.

pub fn expression(session: &mut Session) -> Result<Val> {
    let mut value = term(session)?;
    loop {
        let ins = session.codestream_mut();
        if ins.skip_white_read_if(&[&[O_PLUS]]) {
            value = value.add(term(session)?)?;
        } else if ins.skip_white_read_if(&[&[O_MINUS]]) {
            value = value.subtract(term(session)?)?;
        } else {
            return Ok(value);
        }
    }
}

pub fn int_expression(session: &mut Session) -> Result<i16> {
    i16::try_from(expression(session)?)
}

pub fn string_expression(session: &mut Session) -> Result<String> {
    match expression(session)? {
        Val::String(s) => Ok(s),
        _ => Err(error!(TypeMismatch)),
    }
}

fn term(session: &mut Session) -> Result<Val> {
    let ins = session.codestream_mut();
    let c = match ins.skip_white() {
        None | Some(END_LINE) | Some(COLON) => return Err(error!(MissingOperand)),
        Some(c) => c,
    };
    ins.read_byte();
    match c {
        QUOTE => {
            let mut s = String::new();
            while let Some(d) = ins.peek_byte() {
                if d == END_LINE {
                    break;
                }
                ins.read_byte();
                if d == QUOTE {
                    break;
                }
                s.push(char::from(d));
            }
            Ok(Val::String(s))
        }
        C_0..=C_10 => Ok(Val::Integer(i16::from(c - C_0))),
        T_BYTE | T_INT | T_UINT | T_SINGLE => {
            let operand = ins.read(plus_bytes(c));
            if operand.len() < plus_bytes(c) {
                return Err(error!(SyntaxError));
            }
            Ok(match c {
                T_BYTE => Val::Integer(i16::from(operand[0])),
                T_INT => Val::Integer(i16::from_le_bytes([operand[0], operand[1]])),
                T_UINT => {
                    let n = u16::from_le_bytes([operand[0], operand[1]]);
                    match i16::try_from(n) {
                        Ok(n) => Val::Integer(n),
                        Err(_) => Val::Single(f32::from(n)),
                    }
                }
                _ => Val::Single(f32::from_le_bytes([
                    operand[0], operand[1], operand[2], operand[3],
                ])),
            })
        }
        O_MINUS => term(session)?.negate(),
        O_PLUS => term(session),
        b'(' => {
            let value = expression(session)?;
            session
                .codestream_mut()
                .require_read(&[b")"], ErrorCode::SyntaxError)?;
            Ok(value)
        }
        ERR => Ok(Val::Integer(session.trap.errn as i16)),
        ERL => {
            let erl = session.erl();
            Ok(match i16::try_from(erl) {
                Ok(n) => Val::Integer(n),
                Err(_) => Val::Single(f32::from(erl)),
            })
        }
        c if c.is_ascii_alphabetic() => {
            ins.seek_relative(-1);
            let name = ins.read_name(false)?;
            Ok(session.vars.fetch(&name))
        }
        _ => Err(error!(SyntaxError)),
    }
}
