//! Instruction walker for `Code` attributes.

use byteorder::{BigEndian, ByteOrder};
use bytemetrics_core::errors::DecodeError;

use super::constant_pool::{Constant, ConstantPool};
use super::descriptor::class_constant_target;
use super::types::MethodBody;

const LDC: u8 = 0x12;
const LDC_W: u8 = 0x13;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const GETSTATIC: u8 = 0xb2;
const PUTFIELD: u8 = 0xb5;
const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKEINTERFACE: u8 = 0xb9;
const NEW: u8 = 0xbb;
const ANEWARRAY: u8 = 0xbd;
const CHECKCAST: u8 = 0xc0;
const INSTANCEOF: u8 = 0xc1;
const WIDE: u8 = 0xc4;
const MULTIANEWARRAY: u8 = 0xc5;
const IINC: u8 = 0x84;

fn truncated(offset: usize, needed: usize) -> DecodeError {
    DecodeError::Truncated { offset, needed }
}

fn u16_at(code: &[u8], offset: usize) -> Result<u16, DecodeError> {
    code.get(offset..offset + 2)
        .map(BigEndian::read_u16)
        .ok_or_else(|| truncated(offset, 2))
}

fn i32_at(code: &[u8], offset: usize) -> Result<i32, DecodeError> {
    code.get(offset..offset + 4)
        .map(BigEndian::read_i32)
        .ok_or_else(|| truncated(offset, 4))
}

/// Byte length of the instruction starting at `pc`, operands included.
pub fn instruction_length(code: &[u8], pc: usize) -> Result<usize, DecodeError> {
    let opcode = *code.get(pc).ok_or_else(|| truncated(pc, 1))?;
    let length = match opcode {
        0x00..=0x0f => 1,
        0x10 => 2,
        0x11 => 3,
        0x12 => 2,
        0x13 | 0x14 => 3,
        0x15..=0x19 => 2,
        0x1a..=0x35 => 1,
        0x36..=0x3a => 2,
        0x3b..=0x83 => 1,
        0x84 => 3,
        0x85..=0x98 => 1,
        0x99..=0xa8 => 3,
        0xa9 => 2,
        TABLESWITCH => {
            let base = pc + 1 + switch_padding(pc);
            let low = i32_at(code, base + 4)?;
            let high = i32_at(code, base + 8)?;
            let entries = i64::from(high) - i64::from(low) + 1;
            if entries < 0 {
                return Err(truncated(pc, 0));
            }
            1 + switch_padding(pc) + 12 + (entries as usize) * 4
        }
        LOOKUPSWITCH => {
            let base = pc + 1 + switch_padding(pc);
            let npairs = i32_at(code, base + 4)?;
            if npairs < 0 {
                return Err(truncated(pc, 0));
            }
            1 + switch_padding(pc) + 8 + (npairs as usize) * 8
        }
        0xac..=0xb1 => 1,
        0xb2..=0xb8 => 3,
        0xb9 | 0xba => 5,
        0xbb => 3,
        0xbc => 2,
        0xbd => 3,
        0xbe | 0xbf => 1,
        0xc0 | 0xc1 => 3,
        0xc2 | 0xc3 => 1,
        WIDE => {
            let modified = *code.get(pc + 1).ok_or_else(|| truncated(pc + 1, 1))?;
            if modified == IINC {
                6
            } else {
                4
            }
        }
        0xc5 => 4,
        0xc6 | 0xc7 => 3,
        0xc8 | 0xc9 => 5,
        0xca | 0xfe | 0xff => 1,
        _ => return Err(DecodeError::UnknownOpcode { opcode, pc }),
    };
    if pc + length > code.len() {
        return Err(truncated(pc, length));
    }
    Ok(length)
}

/// Alignment bytes after a switch opcode at `pc`.
fn switch_padding(pc: usize) -> usize {
    (4 - (pc + 1) % 4) % 4
}

/// Walk every instruction in `code`, collecting the member accesses,
/// invocations and type uses a method body makes. Member owners are not
/// repeated in `type_uses`.
pub fn walk_code(code: &[u8], pool: &ConstantPool) -> Result<MethodBody, DecodeError> {
    let mut body = MethodBody::default();
    let mut pc = 0;

    while pc < code.len() {
        let length = instruction_length(code, pc)?;
        let opcode = code[pc];

        match opcode {
            GETSTATIC..=PUTFIELD => {
                body.field_accesses
                    .push(pool.member_ref(u16_at(code, pc + 1)?)?);
            }
            INVOKEVIRTUAL..=INVOKEINTERFACE => {
                body.invocations
                    .push(pool.member_ref(u16_at(code, pc + 1)?)?);
            }
            NEW | ANEWARRAY | CHECKCAST | INSTANCEOF | MULTIANEWARRAY => {
                let name = pool.class_name(u16_at(code, pc + 1)?)?;
                push_type_use(&mut body, name)?;
            }
            LDC | LDC_W => {
                let index = if opcode == LDC {
                    u16::from(code[pc + 1])
                } else {
                    u16_at(code, pc + 1)?
                };
                if let Constant::Class { name_index } = pool.get(index)? {
                    push_type_use(&mut body, pool.utf8(*name_index)?)?;
                }
            }
            _ => {}
        }

        pc += length;
    }

    Ok(body)
}

fn push_type_use(body: &mut MethodBody, class_name: &str) -> Result<(), DecodeError> {
    if let Some(target) = class_constant_target(class_name)? {
        body.type_uses.push(target);
    }
    Ok(())
}
