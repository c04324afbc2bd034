//! Runtime Value Representation
//!
//! Element kinds, boxed values and object handles shared by the heap,
//! the accessor and the VM.

pub mod boxed;
pub mod kind;
pub mod reference;

pub use boxed::BoxedValue;
pub use kind::{ElementKind, MAX_DIMENSIONS};
pub use reference::ObjRef;
