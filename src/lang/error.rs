use super::LineNumber;

/// Where in the code stream an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Location {
    /// Raised while running the direct line.
    Direct,
    /// Raised at this offset of the program bytecode.
    Program(usize),
}

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    location: Option<Location>,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$loc:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).at($loc)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$loc:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .at($loc)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error::from_code(code as u16)
    }

    /// Errors raised with `ERROR n` may carry any code from 1 to 255.
    pub fn from_code(code: u16) -> Error {
        Error {
            code,
            line_number: None,
            location: None,
            message: "",
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn is_direct(&self) -> bool {
        self.location == Some(Location::Direct)
    }

    pub fn at(&self, location: Location) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            location: Some(location),
            message: self.message,
        }
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        Error {
            code: self.code,
            line_number: line,
            location: self.location,
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            location: self.location,
            message,
        }
    }

    /// The message text without the line number suffix.
    pub fn text(&self) -> &'static str {
        let text = match self.code {
            1 => "NEXT without FOR",
            2 => "Syntax error",
            3 => "RETURN without GOSUB",
            4 => "Out of DATA",
            5 => "Illegal function call",
            6 => "Overflow",
            7 => "Out of memory",
            8 => "Undefined line number",
            9 => "Subscript out of range",
            10 => "Duplicate Definition",
            11 => "Division by zero",
            12 => "Illegal direct",
            13 => "Type mismatch",
            14 => "Out of string space",
            15 => "String too long",
            16 => "String formula too complex",
            17 => "Can't continue",
            18 => "Undefined user function",
            19 => "No RESUME",
            20 => "RESUME without error",
            22 => "Missing operand",
            23 => "Line buffer overflow",
            24 => "Device Timeout",
            25 => "Device Fault",
            26 => "FOR without NEXT",
            27 => "Out of paper",
            29 => "WHILE without WEND",
            30 => "WEND without WHILE",
            50 => "FIELD overflow",
            51 => "Internal error",
            52 => "Bad file number",
            53 => "File not found",
            54 => "Bad file mode",
            55 => "File already open",
            57 => "Device I/O error",
            58 => "File already exists",
            61 => "Disk full",
            62 => "Input past end",
            63 => "Bad record number",
            64 => "Bad file name",
            66 => "Direct statement in file",
            67 => "Too many files",
            68 => "Device Unavailable",
            70 => "Permission Denied",
            71 => "Disk not Ready",
            75 => "Path/File access error",
            76 => "Path not found",
            _ => "",
        };
        if text.is_empty() {
            "Unprintable error"
        } else {
            text
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    UndefinedLineNumber = 8,
    IllegalDirect = 12,
    TypeMismatch = 13,
    StringTooLong = 15,
    CantContinue = 17,
    NoResume = 19,
    ResumeWithoutError = 20,
    MissingOperand = 22,
    LineBufferOverflow = 23,
    InternalError = 51,
    BadFileNumber = 52,
    FileNotFound = 53,
    BadFileMode = 54,
    FileAlreadyOpen = 55,
    DeviceIOError = 57,
    DirectStatementInFile = 66,
    PermissionDenied = 70,
    PathFileAccessError = 75,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} ({:?}) }}", self.to_string(), self.location)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text())?;
        if let Some(line_number) = self.line_number {
            write!(f, " in {}", line_number)?;
        }
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        Ok(())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        use std::io::ErrorKind::*;
        match error.kind() {
            NotFound => error!(FileNotFound),
            PermissionDenied => error!(PermissionDenied),
            AlreadyExists | InvalidInput => error!(PathFileAccessError),
            _ => error!(DeviceIOError),
        }
    }
}

/// Operator interrupt, or the `STOP` statement when `stop` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Break {
    pub stop: bool,
}

impl std::fmt::Display for Break {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Break")
    }
}

/// Everything that can unwind a statement back to the interpreter loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A BASIC error; may be trapped by `ON ERROR`.
    Error(Error),
    /// Never trapped by `ON ERROR`.
    Break(Break),
    /// Leave the interpreter after the shutdown sequence.
    Exit,
    /// Discard any saved session and start over.
    Reset,
    /// Not a BASIC condition. Reported with a diagnostic dump.
    Fault(String),
}

impl From<Error> for Signal {
    fn from(error: Error) -> Signal {
        Signal::Error(error)
    }
}

impl From<Break> for Signal {
    fn from(brk: Break) -> Signal {
        Signal::Break(brk)
    }
}

impl From<std::io::Error> for Signal {
    fn from(error: std::io::Error) -> Signal {
        Signal::Fault(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_number() {
        let e = error!(SyntaxError).in_line_number(Some(10));
        assert_eq!(e.to_string(), "Syntax error in 10");
        assert_eq!(error!(Overflow).to_string(), "Overflow");
    }

    #[test]
    fn test_unknown_code_is_unprintable() {
        assert_eq!(Error::from_code(200).to_string(), "Unprintable error");
    }

    #[test]
    fn test_message_suffix() {
        let e = error!(InternalError; "LINK FAILURE");
        assert_eq!(e.to_string(), "Internal error; LINK FAILURE");
    }
}
