use crate::error;
use crate::lang::Error;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

#[derive(Clone, Serialize, Deserialize)]
pub struct Stack<T> {
    overflow_message: String,
    limit: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &str, limit: usize) -> Stack<T> {
        Stack {
            overflow_message: overflow_message.to_string(),
            limit,
            vec: vec![],
        }
    }
    fn overflow_check(&mut self) -> Result<()> {
        if self.vec.len() > self.limit {
            self.vec.pop();
            log::debug!("{} overflow at depth {}", self.overflow_message, self.limit);
            Err(error!(OutOfMemory))
        } else {
            Ok(())
        }
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        self.vec.push(val);
        self.overflow_check()
    }
    pub fn pop(&mut self) -> Option<T> {
        self.vec.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit() {
        let mut s: Stack<u8> = Stack::new("GOSUB", 2);
        assert!(s.push(1).is_ok());
        assert!(s.push(2).is_ok());
        assert_eq!(s.push(3), Err(error!(OutOfMemory)));
        assert_eq!(s.len(), 2);
        assert_eq!(s.pop(), Some(2));
    }
}
