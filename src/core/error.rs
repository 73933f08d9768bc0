use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("unknown opcode {opcode:#06x} at {pc:#05x}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at {pc:#05x}")]
    StackUnderflow { pc: u16 },

    #[error("register block transfer of {count} registers from V{index:X} runs past the register file")]
    RegisterWindow { index: u16, count: usize },
}

impl VmError {
    /// Everything except an unknown opcode leaves the program in a state it cannot recover from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, VmError::UnknownOpcode { .. })
    }
}

#[derive(Error, Debug)]
pub enum RomError {
    #[error("could not read program image: {0}")]
    Io(#[from] io::Error),

    #[error("program image is {size} bytes, at most {max} fit in memory")]
    TooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(!VmError::UnknownOpcode { opcode: 0xFFFF, pc: 0x200 }.is_fatal());
        assert!(VmError::StackOverflow { pc: 0x200 }.is_fatal());
        assert!(VmError::StackUnderflow { pc: 0x200 }.is_fatal());
        assert!(VmError::RegisterWindow { index: 0x300, count: 1 }.is_fatal());
    }

    #[test]
    fn test_messages() {
        let err = VmError::UnknownOpcode { opcode: 0x5AB1, pc: 0x2A4 };
        assert_eq!(err.to_string(), "unknown opcode 0x5ab1 at 0x2a4");
        let err = RomError::TooLarge { size: 4000, max: 3584 };
        assert_eq!(
            err.to_string(),
            "program image is 4000 bytes, at most 3584 fit in memory"
        );
    }
}
