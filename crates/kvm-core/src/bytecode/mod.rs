pub mod instruction;
pub mod opcode;

pub use instruction::{Instruction, Reg};
pub use opcode::{ArrayOperand, OpCode};
