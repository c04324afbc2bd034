pub mod heap;
pub mod registers;
pub mod vm;

pub use heap::{Heap, HeapObject};
pub use registers::{Register, RegisterFile};
pub use vm::VirtualMachine;
