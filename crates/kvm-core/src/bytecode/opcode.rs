//! Bytecode Opcode Definitions
//!
//! The array-instruction subset of the Dalvik opcode set, plus the few
//! instructions needed to feed it operands.
//! Opcode values follow Dalvik numbering.

use std::fmt;

use crate::value::ElementKind;

/// Bytecode opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Nop = 0x00,
    MoveResultObject = 0x0c,
    ReturnVoid = 0x0e,
    Const = 0x14,

    // Array creation
    ArrayLength    = 0x21,
    NewArray       = 0x23,
    FilledNewArray = 0x24,

    // Array loads
    Aget        = 0x44,
    AgetWide    = 0x45,
    AgetObject  = 0x46,
    AgetBoolean = 0x47,
    AgetByte    = 0x48,
    AgetChar    = 0x49,
    AgetShort   = 0x4a,

    // Array stores
    Aput        = 0x4b,
    AputWide    = 0x4c,
    AputObject  = 0x4d,
    AputBoolean = 0x4e,
    AputByte    = 0x4f,
    AputChar    = 0x50,
    AputShort   = 0x51,
}

/// Element class an `aget`/`aput` variant is declared for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOperand {
    /// 32-bit int or float
    Plain,
    /// 64-bit long or double
    Wide,
    Object,
    Boolean,
    Byte,
    Char,
    Short,
}

impl ArrayOperand {
    /// Whether an array of `kind` may be accessed by this variant
    pub fn accepts(self, kind: ElementKind) -> bool {
        match self {
            ArrayOperand::Plain => matches!(kind, ElementKind::Int | ElementKind::Float),
            ArrayOperand::Wide => kind.is_wide(),
            ArrayOperand::Object => kind == ElementKind::Reference,
            ArrayOperand::Boolean => kind == ElementKind::Bool,
            ArrayOperand::Byte => kind == ElementKind::Byte,
            ArrayOperand::Char => kind == ElementKind::Char,
            ArrayOperand::Short => kind == ElementKind::Short,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ArrayOperand::Plain => "int or float array",
            ArrayOperand::Wide => "long or double array",
            ArrayOperand::Object => "reference array",
            ArrayOperand::Boolean => "boolean array",
            ArrayOperand::Byte => "byte array",
            ArrayOperand::Char => "char array",
            ArrayOperand::Short => "short array",
        }
    }
}

impl OpCode {
    /// Every opcode, in numbering order
    pub const ALL: [OpCode; 21] = [
        OpCode::Nop,
        OpCode::MoveResultObject,
        OpCode::ReturnVoid,
        OpCode::Const,
        OpCode::ArrayLength,
        OpCode::NewArray,
        OpCode::FilledNewArray,
        OpCode::Aget,
        OpCode::AgetWide,
        OpCode::AgetObject,
        OpCode::AgetBoolean,
        OpCode::AgetByte,
        OpCode::AgetChar,
        OpCode::AgetShort,
        OpCode::Aput,
        OpCode::AputWide,
        OpCode::AputObject,
        OpCode::AputBoolean,
        OpCode::AputByte,
        OpCode::AputChar,
        OpCode::AputShort,
    ];

    /// Convert raw byte to opcode
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    /// Look up an opcode by its assembler mnemonic
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == name)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Nop => "nop",
            OpCode::MoveResultObject => "move-result-object",
            OpCode::ReturnVoid => "return-void",
            OpCode::Const => "const",
            OpCode::ArrayLength => "array-length",
            OpCode::NewArray => "new-array",
            OpCode::FilledNewArray => "filled-new-array",
            OpCode::Aget => "aget",
            OpCode::AgetWide => "aget-wide",
            OpCode::AgetObject => "aget-object",
            OpCode::AgetBoolean => "aget-boolean",
            OpCode::AgetByte => "aget-byte",
            OpCode::AgetChar => "aget-char",
            OpCode::AgetShort => "aget-short",
            OpCode::Aput => "aput",
            OpCode::AputWide => "aput-wide",
            OpCode::AputObject => "aput-object",
            OpCode::AputBoolean => "aput-boolean",
            OpCode::AputByte => "aput-byte",
            OpCode::AputChar => "aput-char",
            OpCode::AputShort => "aput-short",
        }
    }

    /// Operand class for `aget*`/`aput*`, `None` for everything else
    pub fn array_operand(self) -> Option<ArrayOperand> {
        match self {
            OpCode::Aget | OpCode::Aput => Some(ArrayOperand::Plain),
            OpCode::AgetWide | OpCode::AputWide => Some(ArrayOperand::Wide),
            OpCode::AgetObject | OpCode::AputObject => Some(ArrayOperand::Object),
            OpCode::AgetBoolean | OpCode::AputBoolean => Some(ArrayOperand::Boolean),
            OpCode::AgetByte | OpCode::AputByte => Some(ArrayOperand::Byte),
            OpCode::AgetChar | OpCode::AputChar => Some(ArrayOperand::Char),
            OpCode::AgetShort | OpCode::AputShort => Some(ArrayOperand::Short),
            OpCode::Nop
            | OpCode::MoveResultObject
            | OpCode::ReturnVoid
            | OpCode::Const
            | OpCode::ArrayLength
            | OpCode::NewArray
            | OpCode::FilledNewArray => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
