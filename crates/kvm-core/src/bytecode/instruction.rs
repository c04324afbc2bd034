//! Bytecode Instruction Representation
//!
//! Decoded instructions with their register operands.
//! This layer contains no execution semantics.

use std::fmt;

use super::opcode::OpCode;
use crate::value::BoxedValue;

/// Register number within the frame
pub type Reg = u16;

/// Maximum register count of `filled-new-array`
pub const MAX_FILLED_ARGS: usize = 5;

/// Decoded instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Nop,
    ReturnVoid,
    MoveResultObject { dest: Reg },
    Const { dest: Reg, value: BoxedValue },
    ArrayLength { dest: Reg, array: Reg },
    NewArray { dest: Reg, size: Reg, descriptor: String },
    FilledNewArray { args: Vec<Reg>, descriptor: String },
    /// `aget*`; `op` keeps the declared variant
    ArrayGet { op: OpCode, dest: Reg, array: Reg, index: Reg },
    /// `aput*`; `op` keeps the declared variant
    ArrayPut { op: OpCode, src: Reg, array: Reg, index: Reg },
}

impl Instruction {
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::Nop => OpCode::Nop,
            Instruction::ReturnVoid => OpCode::ReturnVoid,
            Instruction::MoveResultObject { .. } => OpCode::MoveResultObject,
            Instruction::Const { .. } => OpCode::Const,
            Instruction::ArrayLength { .. } => OpCode::ArrayLength,
            Instruction::NewArray { .. } => OpCode::NewArray,
            Instruction::FilledNewArray { .. } => OpCode::FilledNewArray,
            Instruction::ArrayGet { op, .. } | Instruction::ArrayPut { op, .. } => *op,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Nop | Instruction::ReturnVoid => write!(f, "{}", op),
            Instruction::MoveResultObject { dest } => write!(f, "{} v{}", op, dest),
            Instruction::Const { dest, value } => write!(f, "{} v{}, {}", op, dest, value),
            Instruction::ArrayLength { dest, array } => write!(f, "{} v{}, v{}", op, dest, array),
            Instruction::NewArray { dest, size, descriptor } => {
                write!(f, "{} v{}, v{}, {}", op, dest, size, descriptor)
            }
            Instruction::FilledNewArray { args, descriptor } => {
                let regs: Vec<String> = args.iter().map(|r| format!("v{}", r)).collect();
                write!(f, "{} {{{}}}, {}", op, regs.join(", "), descriptor)
            }
            Instruction::ArrayGet { dest: a, array, index, .. }
            | Instruction::ArrayPut { src: a, array, index, .. } => {
                write!(f, "{} v{}, v{}, v{}", op, a, array, index)
            }
        }
    }
}
