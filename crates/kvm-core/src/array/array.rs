//! Array Storage
//!
//! Homogeneous, fixed-length arrays. Each kind gets its own narrow `Vec`, so
//! the element kind is the storage variant and cannot change after creation.

use crate::error::{KvmError, KvmResult};
use crate::value::{BoxedValue, ElementKind, ObjRef};

/// Narrow backing store, one variant per element kind
#[derive(Debug, Clone)]
pub(crate) enum ArrayStorage {
    Bool(Vec<bool>),
    Byte(Vec<i8>),
    Char(Vec<u16>),
    Double(Vec<f64>),
    Float(Vec<f32>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Short(Vec<i16>),
    Reference(Vec<Option<ObjRef>>),
}

/// A fixed-length array of a single element kind
#[derive(Debug, Clone)]
pub struct ArrayValue {
    pub(crate) storage: ArrayStorage,
}

impl ArrayValue {
    /// Allocate `length` default-initialised elements of `kind`
    pub fn new(kind: ElementKind, length: usize) -> Self {
        let storage = match kind {
            ElementKind::Bool => ArrayStorage::Bool(vec![false; length]),
            ElementKind::Byte => ArrayStorage::Byte(vec![0; length]),
            ElementKind::Char => ArrayStorage::Char(vec![0; length]),
            ElementKind::Double => ArrayStorage::Double(vec![0.0; length]),
            ElementKind::Float => ArrayStorage::Float(vec![0.0; length]),
            ElementKind::Int => ArrayStorage::Int(vec![0; length]),
            ElementKind::Long => ArrayStorage::Long(vec![0; length]),
            ElementKind::Short => ArrayStorage::Short(vec![0; length]),
            ElementKind::Reference => ArrayStorage::Reference(vec![None; length]),
        };
        ArrayValue { storage }
    }

    pub fn kind(&self) -> ElementKind {
        match &self.storage {
            ArrayStorage::Bool(_) => ElementKind::Bool,
            ArrayStorage::Byte(_) => ElementKind::Byte,
            ArrayStorage::Char(_) => ElementKind::Char,
            ArrayStorage::Double(_) => ElementKind::Double,
            ArrayStorage::Float(_) => ElementKind::Float,
            ArrayStorage::Int(_) => ElementKind::Int,
            ArrayStorage::Long(_) => ElementKind::Long,
            ArrayStorage::Short(_) => ElementKind::Short,
            ArrayStorage::Reference(_) => ElementKind::Reference,
        }
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            ArrayStorage::Bool(v) => v.len(),
            ArrayStorage::Byte(v) => v.len(),
            ArrayStorage::Char(v) => v.len(),
            ArrayStorage::Double(v) => v.len(),
            ArrayStorage::Float(v) => v.len(),
            ArrayStorage::Int(v) => v.len(),
            ArrayStorage::Long(v) => v.len(),
            ArrayStorage::Short(v) => v.len(),
            ArrayStorage::Reference(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate a VM index against the length and convert it to a slot
    pub(crate) fn check_index(&self, index: i32) -> KvmResult<usize> {
        let length = self.len();
        match usize::try_from(index) {
            Ok(slot) if slot < length => Ok(slot),
            _ => Err(KvmError::IndexOutOfBounds { index, length }),
        }
    }

    /// Snapshot every element as a boxed value
    pub fn to_boxed_vec(&self) -> Vec<BoxedValue> {
        match &self.storage {
            ArrayStorage::Bool(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Byte(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Char(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Double(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Float(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Int(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Long(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Short(v) => v.iter().map(|&x| BoxedValue::from(x)).collect(),
            ArrayStorage::Reference(v) => v.iter().map(|&r| BoxedValue::Reference(r)).collect(),
        }
    }
}

// element-wise, with the same bitwise float equality as `BoxedValue`
impl PartialEq for ArrayValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_boxed_vec() == other.to_boxed_vec()
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for ArrayValue {
                fn from(v: Vec<$ty>) -> Self {
                    ArrayValue { storage: ArrayStorage::$variant(v) }
                }
            }
        )*
    };
}

impl_from_vec! {
    bool => Bool,
    i8 => Byte,
    u16 => Char,
    f64 => Double,
    f32 => Float,
    i32 => Int,
    i64 => Long,
    i16 => Short,
    Option<ObjRef> => Reference,
}
