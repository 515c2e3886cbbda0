//! Codec for the instruction stream inside a `Code` attribute.
//!
//! One static table maps each opcode byte to its mnemonic and operand
//! layout, and every consumer - the byte decoder, the byte encoder, and the
//! assembly parser - resolves against that same table, so the two directions
//! cannot drift apart. The stream has no instruction boundary markers:
//! decoding walks from offset 0 consuming `1 + operand width` bytes per
//! instruction until the declared byte count runs out.

use crate::class_file::Serialize;
use crate::{ByteCursor, Error};
use byteorder::WriteBytesExt;
use std::io::{Result, Seek};

/// Operand layout of one opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    None,
    U8,
    I8,
    U16,
    I16,
    /// `(u8 local index, i8 signed delta)`, used by `iinc`
    IndexDelta,
}

/// One row of the opcode table
#[derive(Debug)]
pub struct OpInfo {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub operands: OperandKind,
}

const fn op(opcode: u8, mnemonic: &'static str, operands: OperandKind) -> OpInfo {
    OpInfo {
        opcode,
        mnemonic,
        operands,
    }
}

/// The authoritative opcode table, sorted by opcode
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-6.html
pub const OPCODE_TABLE: &[OpInfo] = &[
    op(0x00, "nop", OperandKind::None),
    op(0x01, "aconst_null", OperandKind::None),
    op(0x02, "iconst_m1", OperandKind::None),
    op(0x03, "iconst_0", OperandKind::None),
    op(0x04, "iconst_1", OperandKind::None),
    op(0x05, "iconst_2", OperandKind::None),
    op(0x06, "iconst_3", OperandKind::None),
    op(0x07, "iconst_4", OperandKind::None),
    op(0x08, "iconst_5", OperandKind::None),
    op(0x10, "bipush", OperandKind::I8),
    op(0x11, "sipush", OperandKind::I16),
    op(0x12, "ldc", OperandKind::U8),
    op(0x15, "iload", OperandKind::U8),
    op(0x19, "aload", OperandKind::U8),
    op(0x1A, "iload_0", OperandKind::None),
    op(0x1B, "iload_1", OperandKind::None),
    op(0x1C, "iload_2", OperandKind::None),
    op(0x1D, "iload_3", OperandKind::None),
    op(0x2A, "aload_0", OperandKind::None),
    op(0x2B, "aload_1", OperandKind::None),
    op(0x2C, "aload_2", OperandKind::None),
    op(0x2D, "aload_3", OperandKind::None),
    op(0x36, "istore", OperandKind::U8),
    op(0x3A, "astore", OperandKind::U8),
    op(0x3B, "istore_0", OperandKind::None),
    op(0x3C, "istore_1", OperandKind::None),
    op(0x3D, "istore_2", OperandKind::None),
    op(0x3E, "istore_3", OperandKind::None),
    op(0x4B, "astore_0", OperandKind::None),
    op(0x4C, "astore_1", OperandKind::None),
    op(0x4D, "astore_2", OperandKind::None),
    op(0x4E, "astore_3", OperandKind::None),
    op(0x57, "pop", OperandKind::None),
    op(0x59, "dup", OperandKind::None),
    op(0x60, "iadd", OperandKind::None),
    op(0x64, "isub", OperandKind::None),
    op(0x68, "imul", OperandKind::None),
    op(0x6C, "idiv", OperandKind::None),
    op(0x70, "irem", OperandKind::None),
    op(0x74, "ineg", OperandKind::None),
    op(0x84, "iinc", OperandKind::IndexDelta),
    op(0x99, "ifeq", OperandKind::I16),
    op(0x9A, "ifne", OperandKind::I16),
    op(0x9B, "iflt", OperandKind::I16),
    op(0x9C, "ifge", OperandKind::I16),
    op(0x9D, "ifgt", OperandKind::I16),
    op(0x9E, "ifle", OperandKind::I16),
    op(0x9F, "if_icmpeq", OperandKind::I16),
    op(0xA0, "if_icmpne", OperandKind::I16),
    op(0xA1, "if_icmplt", OperandKind::I16),
    op(0xA2, "if_icmpge", OperandKind::I16),
    op(0xA3, "if_icmpgt", OperandKind::I16),
    op(0xA4, "if_icmple", OperandKind::I16),
    op(0xA7, "goto", OperandKind::I16),
    op(0xAC, "ireturn", OperandKind::None),
    op(0xB0, "areturn", OperandKind::None),
    op(0xB1, "return", OperandKind::None),
    op(0xB2, "getstatic", OperandKind::U16),
    op(0xB3, "putstatic", OperandKind::U16),
    op(0xB4, "getfield", OperandKind::U16),
    op(0xB5, "putfield", OperandKind::U16),
    op(0xB6, "invokevirtual", OperandKind::U16),
    op(0xB7, "invokespecial", OperandKind::U16),
    op(0xB8, "invokestatic", OperandKind::U16),
    op(0xBB, "new", OperandKind::U16),
    op(0xBE, "arraylength", OperandKind::None),
    op(0xBF, "athrow", OperandKind::None),
    op(0xC0, "checkcast", OperandKind::U16),
];

pub fn by_opcode(opcode: u8) -> Option<&'static OpInfo> {
    OPCODE_TABLE
        .binary_search_by_key(&opcode, |info| info.opcode)
        .ok()
        .map(|at| &OPCODE_TABLE[at])
}

pub fn by_mnemonic(mnemonic: &str) -> Option<&'static OpInfo> {
    OPCODE_TABLE.iter().find(|info| info.mnemonic == mnemonic)
}

/// Decoded operand bytes of one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    IndexDelta { index: u8, delta: i8 },
}

/// One decoded bytecode instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub operand: Operand,
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match by_opcode(self.opcode) {
            Some(info) => info.mnemonic,
            None => "<unknown>",
        }
    }
}

/// Decode a complete instruction stream
pub fn parse_code(bytes: &[u8]) -> std::result::Result<Vec<Instruction>, Error> {
    let mut cursor = ByteCursor::new(bytes);
    let mut code = Vec::new();
    while cursor.remaining() != 0 {
        let offset = cursor.position();
        let opcode = cursor.u8()?;
        let info = by_opcode(opcode).ok_or(Error::UnsupportedOpcode { opcode, offset })?;
        let operand = match info.operands {
            OperandKind::None => Operand::None,
            OperandKind::U8 => Operand::U8(cursor.u8()?),
            OperandKind::I8 => Operand::I8(cursor.i8()?),
            OperandKind::U16 => Operand::U16(cursor.u16()?),
            OperandKind::I16 => Operand::I16(cursor.i16()?),
            OperandKind::IndexDelta => Operand::IndexDelta {
                index: cursor.u8()?,
                delta: cursor.i8()?,
            },
        };
        code.push(Instruction { opcode, operand });
    }
    Ok(code)
}

impl Serialize for Instruction {
    fn serialize<W: WriteBytesExt + Seek>(&self, writer: &mut W) -> Result<()> {
        self.opcode.serialize(writer)?;
        match self.operand {
            Operand::None => {}
            Operand::U8(value) => value.serialize(writer)?,
            Operand::I8(value) => value.serialize(writer)?,
            Operand::U16(value) => value.serialize(writer)?,
            Operand::I16(value) => value.serialize(writer)?,
            Operand::IndexDelta { index, delta } => {
                index.serialize(writer)?;
                delta.serialize(writer)?;
            }
        };
        Ok(())
    }
}
