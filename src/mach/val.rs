use crate::error;
use crate::lang::Error;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime values

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Val {
    String(String),
    Integer(i16),
    Single(f32),
}

impl Val {
    pub fn add(self, rhs: Val) -> Result<Val> {
        use Val::*;
        match (self, rhs) {
            (Integer(l), Integer(r)) => match l.checked_add(r) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(l as f32 + r as f32)),
            },
            (String(mut l), String(r)) => {
                l.push_str(&r);
                Ok(String(l))
            }
            (String(_), _) | (_, String(_)) => Err(error!(TypeMismatch)),
            (l, r) => Ok(Single(f32::try_from(l)? + f32::try_from(r)?)),
        }
    }

    pub fn subtract(self, rhs: Val) -> Result<Val> {
        use Val::*;
        match (self, rhs) {
            (Integer(l), Integer(r)) => match l.checked_sub(r) {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(l as f32 - r as f32)),
            },
            (String(_), _) | (_, String(_)) => Err(error!(TypeMismatch)),
            (l, r) => Ok(Single(f32::try_from(l)? - f32::try_from(r)?)),
        }
    }

    pub fn negate(self) -> Result<Val> {
        use Val::*;
        match self {
            Integer(n) => match n.checked_neg() {
                Some(i) => Ok(Integer(i)),
                None => Ok(Single(-(n as f32))),
            },
            Single(n) => Ok(Single(-n)),
            String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for f32 {
    type Error = Error;
    fn try_from(val: Val) -> Result<f32> {
        match val {
            Val::Integer(n) => Ok(n as f32),
            Val::Single(n) => Ok(n),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for i16 {
    type Error = Error;
    fn try_from(val: Val) -> Result<i16> {
        match val {
            Val::Integer(n) => Ok(n),
            Val::Single(n) => {
                let n = n.round();
                if n.is_finite() && n >= i16::MIN as f32 && n <= i16::MAX as f32 {
                    Ok(n as i16)
                } else {
                    Err(error!(Overflow))
                }
            }
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            String(s) => write!(f, "{}", s),
            Integer(n) => {
                if *n < 0 {
                    write!(f, "{} ", n)
                } else {
                    write!(f, " {} ", n)
                }
            }
            Single(n) => {
                if *n < 0.0 {
                    write!(f, "{} ", n)
                } else {
                    write!(f, " {} ", n)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_overflow_promotes() {
        assert_eq!(Val::Integer(32767).add(Val::Integer(1)), Ok(Val::Single(32768.0)));
    }

    #[test]
    fn test_string_concat() {
        let v = Val::String("A".into()).add(Val::String("B".into()));
        assert_eq!(v, Ok(Val::String("AB".into())));
        assert_eq!(
            Val::String("A".into()).subtract(Val::Integer(1)),
            Err(error!(TypeMismatch))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Integer(5).to_string(), " 5 ");
        assert_eq!(Val::Integer(-5).to_string(), "-5 ");
        assert_eq!(Val::Single(1.5).to_string(), " 1.5 ");
    }
}
