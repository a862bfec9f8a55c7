//! Byte values of the tokenized program format.
//!
//! Every stored line is `00 <next:u16> <number:u16> <body...>` and the
//! program ends with `00 00 00`. Values follow the GW-BASIC encoding.

/// Line terminator. Also precedes every line number marker.
pub const END_LINE: u8 = 0x00;
/// Statement separator.
pub const COLON: u8 = b':';
pub const QUOTE: u8 = b'"';

/// Octal, hex, line pointer and line number constants carry two bytes.
pub const T_OCT: u8 = 0x0b;
pub const T_HEX: u8 = 0x0c;
pub const T_LINE_PTR: u8 = 0x0d;
pub const T_UINT: u8 = 0x0e;
/// One-byte unsigned integer constant.
pub const T_BYTE: u8 = 0x0f;
/// Integers 0 to 9 are stored as `0x11 + n` with no trailing bytes.
pub const C_0: u8 = 0x11;
pub const C_9: u8 = 0x1a;
pub const C_10: u8 = 0x1b;
pub const T_INT: u8 = 0x1c;
pub const T_SINGLE: u8 = 0x1d;
pub const T_DOUBLE: u8 = 0x1f;

pub const END: u8 = 0x81;
pub const FOR: u8 = 0x82;
pub const NEXT: u8 = 0x83;
pub const DATA: u8 = 0x84;
pub const INPUT: u8 = 0x85;
pub const LET: u8 = 0x88;
pub const GOTO: u8 = 0x89;
pub const RUN: u8 = 0x8a;
pub const IF: u8 = 0x8b;
pub const GOSUB: u8 = 0x8d;
pub const RETURN: u8 = 0x8e;
pub const REM: u8 = 0x8f;
pub const STOP: u8 = 0x90;
pub const PRINT: u8 = 0x91;
pub const CLEAR: u8 = 0x92;
pub const LIST: u8 = 0x93;
pub const NEW: u8 = 0x94;
pub const ON: u8 = 0x95;
pub const CONT: u8 = 0x99;
pub const ELSE: u8 = 0xa1;
pub const TRON: u8 = 0xa2;
pub const TROFF: u8 = 0xa3;
pub const EDIT: u8 = 0xa6;
pub const ERROR: u8 = 0xa7;
pub const RESUME: u8 = 0xa8;
pub const DELETE: u8 = 0xa9;
pub const AUTO: u8 = 0xaa;
pub const KEY: u8 = 0xc9;
pub const TO: u8 = 0xcc;
pub const THEN: u8 = 0xcd;
pub const ERL: u8 = 0xd4;
pub const ERR: u8 = 0xd5;
pub const OFF: u8 = 0xdd;
pub const O_GT: u8 = 0xe6;
pub const O_EQ: u8 = 0xe7;
pub const O_LT: u8 = 0xe8;
pub const O_PLUS: u8 = 0xe9;
pub const O_MINUS: u8 = 0xea;
pub const O_TIMES: u8 = 0xeb;
pub const O_DIV: u8 = 0xec;

/// Prefix bytes of the two-byte keyword pages.
pub const PREFIX_FD: u8 = 0xfd;
pub const PREFIX_FE: u8 = 0xfe;
pub const PREFIX_FF: u8 = 0xff;

pub const OPEN: [u8; 2] = [PREFIX_FE, 0x81];
pub const CLOSE: [u8; 2] = [PREFIX_FE, 0x82];
pub const SYSTEM: [u8; 2] = [PREFIX_FE, 0x88];
pub const TIMER: [u8; 2] = [PREFIX_FE, 0x94];
pub const APPEND: [u8; 2] = [PREFIX_FE, 0x95];
pub const OUTPUT: [u8; 2] = [PREFIX_FE, 0x96];
pub const RANDOM: [u8; 2] = [PREFIX_FE, 0x97];
pub const AS: [u8; 2] = [PREFIX_FE, 0x98];

/// Bytes skipped by `skip_white`.
pub const WHITESPACE: &[u8] = b" \t\n";
/// Bytes that end a statement.
pub const END_STATEMENT: &[u8] = &[END_LINE, COLON];
/// Characters allowed after the first letter of a name.
pub const NAME_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789.";
/// Type suffixes.
pub const SIGILS: &[u8] = b"$%!#";

/// Number of operand bytes that follow a leading byte.
/// These must be skipped as a unit, they may contain any value.
pub fn plus_bytes(lead: u8) -> usize {
    match lead {
        T_OCT | T_HEX | T_LINE_PTR | T_UINT | T_INT => 2,
        T_BYTE => 1,
        T_SINGLE => 4,
        T_DOUBLE => 8,
        PREFIX_FD | PREFIX_FE | PREFIX_FF => 1,
        _ => 0,
    }
}

/// Whether `lead` starts a numeric constant.
pub fn is_number(lead: u8) -> bool {
    matches!(lead, T_OCT..=T_UINT | T_BYTE | C_0..=T_SINGLE | T_DOUBLE)
}

/// Keywords in matching order. Longer words that share a prefix come first.
pub const KEYWORDS: &[(&str, &[u8])] = &[
    ("APPEND", &APPEND),
    ("AS", &AS),
    ("AUTO", &[AUTO]),
    ("CLEAR", &[CLEAR]),
    ("CLOSE", &CLOSE),
    ("CONT", &[CONT]),
    ("DATA", &[DATA]),
    ("DELETE", &[DELETE]),
    ("EDIT", &[EDIT]),
    ("ELSE", &[ELSE]),
    ("END", &[END]),
    ("ERL", &[ERL]),
    ("ERROR", &[ERROR]),
    ("ERR", &[ERR]),
    ("FOR", &[FOR]),
    ("GOSUB", &[GOSUB]),
    ("GOTO", &[GOTO]),
    ("IF", &[IF]),
    ("INPUT", &[INPUT]),
    ("KEY", &[KEY]),
    ("LET", &[LET]),
    ("LIST", &[LIST]),
    ("NEW", &[NEW]),
    ("NEXT", &[NEXT]),
    ("OFF", &[OFF]),
    ("ON", &[ON]),
    ("OPEN", &OPEN),
    ("OUTPUT", &OUTPUT),
    ("PRINT", &[PRINT]),
    ("RANDOM", &RANDOM),
    ("REM", &[REM]),
    ("RESUME", &[RESUME]),
    ("RETURN", &[RETURN]),
    ("RUN", &[RUN]),
    ("STOP", &[STOP]),
    ("SYSTEM", &SYSTEM),
    ("THEN", &[THEN]),
    ("TIMER", &TIMER),
    ("TO", &[TO]),
    ("TROFF", &[TROFF]),
    ("TRON", &[TRON]),
];

/// Keywords after which numbers are line numbers.
pub const LINE_NUMBER_KEYWORDS: &[u8] = &[GOTO, GOSUB, THEN, ELSE, RUN, LIST, RESUME, AUTO, EDIT, DELETE];

/// Single-character operators.
pub const OPERATORS: &[(u8, u8)] = &[
    (b'>', O_GT),
    (b'=', O_EQ),
    (b'<', O_LT),
    (b'+', O_PLUS),
    (b'-', O_MINUS),
    (b'*', O_TIMES),
    (b'/', O_DIV),
];

pub fn keyword_name(token: &[u8]) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(_, bytes)| *bytes == token)
        .map(|(name, _)| *name)
}

pub fn operator_char(token: u8) -> Option<char> {
    OPERATORS
        .iter()
        .find(|(_, t)| *t == token)
        .map(|(c, _)| char::from(*c))
}
