//! kvm - Core Library
//!
//! Typed arrays for a Dalvik-style VM: element kinds, boxed values, the
//! type-erased array accessor, the heap that owns arrays, and a small VM
//! that runs the array instructions.

pub mod error;
pub mod config;
pub mod value;
pub mod array;
pub mod bytecode;
pub mod vm;
pub mod loader;

// Re-export commonly used types
pub use error::{KvmError, KvmResult};
pub use config::KvmConfig;
pub use value::{BoxedValue, ElementKind, ObjRef};
pub use array::{ArrayValue, TypedArrayAccessor};
pub use bytecode::opcode::OpCode;
pub use vm::{Heap, HeapObject, VirtualMachine};
pub use loader::{LoadedProgram, ProgramLoader};
