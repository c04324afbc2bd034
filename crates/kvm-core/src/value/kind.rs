//! Element Kinds
//!
//! The closed set of runtime kinds an array element (or boxed value) can have.

use std::fmt;

use crate::error::{KvmError, KvmResult};

/// Deepest array type a descriptor may name
pub const MAX_DIMENSIONS: usize = 255;

/// Runtime element kind of an array or boxed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Bool,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Reference,
}

impl ElementKind {
    /// Every kind, in declaration order
    pub const ALL: [ElementKind; 9] = [
        ElementKind::Bool,
        ElementKind::Byte,
        ElementKind::Char,
        ElementKind::Double,
        ElementKind::Float,
        ElementKind::Int,
        ElementKind::Long,
        ElementKind::Short,
        ElementKind::Reference,
    ];

    /// Resolve the kind of a component type descriptor.
    ///
    /// Primitive descriptors are single letters (`I`, `Z`, ...). Class
    /// descriptors (`Ljava/lang/String;`) and nested array descriptors
    /// (`[I`) are both references. At most [`MAX_DIMENSIONS`] leading `[`
    /// are accepted.
    pub fn from_descriptor(descriptor: &str) -> KvmResult<Self> {
        let invalid = || KvmError::InvalidDescriptor(descriptor.to_string());
        let component = descriptor.trim_start_matches('[');
        let dimensions = descriptor.len() - component.len();
        if dimensions > MAX_DIMENSIONS {
            return Err(invalid());
        }
        let kind = match component.as_bytes() {
            [b'Z'] => ElementKind::Bool,
            [b'B'] => ElementKind::Byte,
            [b'C'] => ElementKind::Char,
            [b'D'] => ElementKind::Double,
            [b'F'] => ElementKind::Float,
            [b'I'] => ElementKind::Int,
            [b'J'] => ElementKind::Long,
            [b'S'] => ElementKind::Short,
            [b'L', class @ .., b';'] if !class.is_empty() && !class.contains(&b';') => ElementKind::Reference,
            _ => return Err(invalid()),
        };
        if dimensions > 0 {
            return Ok(ElementKind::Reference);
        }
        Ok(kind)
    }

    /// Descriptor letter for this kind (`L` for references)
    pub fn descriptor(self) -> char {
        match self {
            ElementKind::Bool => 'Z',
            ElementKind::Byte => 'B',
            ElementKind::Char => 'C',
            ElementKind::Double => 'D',
            ElementKind::Float => 'F',
            ElementKind::Int => 'I',
            ElementKind::Long => 'J',
            ElementKind::Short => 'S',
            ElementKind::Reference => 'L',
        }
    }

    /// Lower-case name, also used as the literal prefix in the text form
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Bool => "bool",
            ElementKind::Byte => "byte",
            ElementKind::Char => "char",
            ElementKind::Double => "double",
            ElementKind::Float => "float",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Short => "short",
            ElementKind::Reference => "ref",
        }
    }

    /// Long and double occupy a register pair
    pub fn is_wide(self) -> bool {
        matches!(self, ElementKind::Long | ElementKind::Double)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
