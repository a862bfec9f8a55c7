use super::Val;
use crate::error;
use crate::lang::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// ## Variable memory
///
/// The type of a variable comes from its sigil: `$` string,
/// `%` integer, anything else single precision.

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Var {
    vars: HashMap<String, Val>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn fetch(&self, var_name: &str) -> Val {
        match self.vars.get(var_name) {
            Some(val) => val.clone(),
            None => {
                if var_name.ends_with('$') {
                    Val::String("".into())
                } else if var_name.ends_with('%') {
                    Val::Integer(0)
                } else {
                    Val::Single(0.0)
                }
            }
        }
    }

    pub fn store(&mut self, var_name: &str, value: Val) -> Result<()> {
        if self.vars.len() > u16::max_value() as usize {
            return Err(error!(OutOfMemory));
        }
        let value = if var_name.ends_with('$') {
            match value {
                Val::String(s) => {
                    if s.chars().count() > 255 {
                        return Err(error!(StringTooLong));
                    }
                    Val::String(s)
                }
                _ => return Err(error!(TypeMismatch)),
            }
        } else if var_name.ends_with('%') {
            Val::Integer(i16::try_from(value)?)
        } else {
            Val::Single(f32::try_from(value)?)
        };
        self.vars.insert(var_name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_sigil() {
        let v = Var::new();
        assert_eq!(v.fetch("A$"), Val::String("".into()));
        assert_eq!(v.fetch("A%"), Val::Integer(0));
        assert_eq!(v.fetch("A"), Val::Single(0.0));
    }

    #[test]
    fn test_store_converts() {
        let mut v = Var::new();
        v.store("I%", Val::Single(2.6)).unwrap();
        assert_eq!(v.fetch("I%"), Val::Integer(3));
        assert_eq!(v.store("S$", Val::Integer(1)), Err(error!(TypeMismatch)));
        assert_eq!(v.store("I%", Val::Single(40000.0)), Err(error!(Overflow)));
    }
}
