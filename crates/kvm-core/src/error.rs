//! KVM Error Types
//!
//! Defines all error conditions produced by the kvm core.
//! Every error is recoverable; the caller decides whether it becomes a VM-level trap.

use std::io;

use crate::bytecode::opcode::OpCode;
use crate::value::ElementKind;

#[derive(Debug, thiserror::Error)]
pub enum KvmError {
    // Array access errors
    #[error("array value is null")]
    NullArray,
    #[error("value is not an array")]
    NotAnArray,
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i32, length: usize },
    #[error("cannot store {actual} into {expected} array")]
    KindMismatch {
        expected: ElementKind,
        actual: ElementKind,
    },

    // Heap errors
    #[error("negative array size: {0}")]
    NegativeArraySize(i32),
    #[error("array length {length} exceeds limit {max}")]
    ArrayTooLarge { length: usize, max: usize },
    #[error("heap exhausted: {0} live objects")]
    HeapExhausted(usize),
    #[error("dangling reference: @{0}")]
    DanglingReference(u32),
    #[error("invalid type descriptor: {0}")]
    InvalidDescriptor(String),

    // Execution errors
    #[error("invalid opcode: 0x{0:02X}")]
    InvalidOpcode(u8),
    #[error("invalid register: v{0}")]
    InvalidRegister(u16),
    #[error("register v{0} holds no value")]
    UninitializedRegister(u16),
    #[error("{opcode} expected {expected} operand, got {actual}")]
    OperandMismatch {
        opcode: OpCode,
        expected: &'static str,
        actual: String,
    },
    #[error("no pending result to move")]
    NoPendingResult,
    #[error("too many arguments: {0}")]
    TooManyArguments(usize),

    // Loading errors
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    // IO boundary
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type KvmResult<T> = Result<T, KvmError>;
