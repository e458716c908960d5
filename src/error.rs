use std::{error, fmt, io};

/// Fatal machine faults. Execution cannot continue past any of these: an
/// unknown opcode has no defined semantics, and a blown stack or oversized
/// image would corrupt reserved memory.
#[derive(Debug)]
pub enum Chip8Error {
    /// no instruction matches the fetched word; carries the word and the
    /// address it was fetched from
    UnknownOpcode { opcode: u16, pc: u16 },
    /// program image won't fit between 0x200 and the top of RAM
    ProgramTooLarge { len: usize, max: usize },
    /// more than 16 nested subroutine calls
    StackOverflow { pc: u16 },
    /// 00EE with nothing on the stack
    StackUnderflow { pc: u16 },
    Io(io::Error),
}

impl fmt::Display for Chip8Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode, pc } => {
                write!(f, "unknown opcode {:#06x} at {:#05x}", opcode, pc)
            }
            Self::ProgramTooLarge { len, max } => {
                write!(f, "program is {} bytes; at most {} fit in RAM", len, max)
            }
            Self::StackOverflow { pc } => write!(f, "call stack overflow at {:#05x}", pc),
            Self::StackUnderflow { pc } => {
                write!(f, "return with an empty call stack at {:#05x}", pc)
            }
            Self::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Chip8Error {
    fn from(e: io::Error) -> Self {
        Chip8Error::Io(e)
    }
}
