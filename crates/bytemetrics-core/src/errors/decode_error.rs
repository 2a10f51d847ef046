//! Class-file decoding errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while decoding one compiled artifact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Not a class file: bad magic 0x{found:08X}")]
    BadMagic { found: u32 },

    #[error("Truncated class file: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Constant pool index {index} is out of range or unusable")]
    BadConstantIndex { index: u16 },

    #[error("Constant pool entry {index} is not a {expected}")]
    UnexpectedConstant { index: u16, expected: &'static str },

    #[error("Unknown constant pool tag {tag} at entry {index}")]
    UnknownConstantTag { tag: u8, index: u16 },

    #[error("Unknown opcode 0x{opcode:02X} at pc {pc}")]
    UnknownOpcode { opcode: u8, pc: usize },

    #[error("Malformed descriptor or signature: {descriptor}")]
    MalformedDescriptor { descriptor: String },

    #[error("Artifact too large: {size} bytes, max {max}")]
    TooLarge { size: u64, max: u64 },
}

impl ErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => error_code::ARTIFACT_TOO_LARGE,
            _ => error_code::DECODE_ERROR,
        }
    }
}
