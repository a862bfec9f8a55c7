use super::token::*;
use super::*;
use crate::error;

mod cursor_test;
