//! Object references
//!
//! Opaque handle into the heap. Equality is identity: two handles are equal
//! only when they name the same heap object.

use std::fmt;

/// Heap object handle. Never zero; the null reference is `None` at use sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(pub(crate) u32);

impl ObjRef {
    /// Raw handle id
    pub fn id(self) -> u32 {
        self.0
    }
}

impl From<ObjRef> for u32 {
    fn from(r: ObjRef) -> Self {
        r.0
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
