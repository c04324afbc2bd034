//! Typed Array Accessor
//!
//! Loads and stores single array elements when the element kind is only
//! known at runtime. Dispatch is a closed match over the storage variant;
//! there is no fallback path.

use crate::error::{KvmError, KvmResult};
use crate::value::{BoxedValue, ElementKind};
use crate::vm::heap::HeapObject;

use super::array::{ArrayStorage, ArrayValue};

/// Unwrap a boxed value of the expected variant or report the mismatch
macro_rules! narrow {
    ($value:expr, $variant:ident) => {
        match $value {
            BoxedValue::$variant(v) => v,
            other => {
                return Err(KvmError::KindMismatch {
                    expected: ElementKind::$variant,
                    actual: other.kind(),
                })
            }
        }
    };
}

/// Stateless element accessor used by the array opcodes
pub struct TypedArrayAccessor;

impl TypedArrayAccessor {
    /// Read element `index` of the array behind `target`
    pub fn get(target: Option<&HeapObject>, index: i32) -> KvmResult<BoxedValue> {
        let array = target
            .ok_or(KvmError::NullArray)?
            .as_array()
            .ok_or(KvmError::NotAnArray)?;
        Self::load(array, index)
    }

    /// Overwrite element `index` of the array behind `target`
    pub fn set(target: Option<&mut HeapObject>, index: i32, value: BoxedValue) -> KvmResult<()> {
        let array = target
            .ok_or(KvmError::NullArray)?
            .as_array_mut()
            .ok_or(KvmError::NotAnArray)?;
        Self::store(array, index, value)
    }

    /// Read from an array that is already known to be one
    pub fn load(array: &ArrayValue, index: i32) -> KvmResult<BoxedValue> {
        let slot = array.check_index(index)?;
        let value = match &array.storage {
            ArrayStorage::Bool(v) => BoxedValue::Bool(v[slot]),
            ArrayStorage::Byte(v) => BoxedValue::Byte(v[slot]),
            ArrayStorage::Char(v) => BoxedValue::Char(v[slot]),
            ArrayStorage::Double(v) => BoxedValue::Double(v[slot]),
            ArrayStorage::Float(v) => BoxedValue::Float(v[slot]),
            ArrayStorage::Int(v) => BoxedValue::Int(v[slot]),
            ArrayStorage::Long(v) => BoxedValue::Long(v[slot]),
            ArrayStorage::Short(v) => BoxedValue::Short(v[slot]),
            ArrayStorage::Reference(v) => BoxedValue::Reference(v[slot]),
        };
        Ok(value)
    }

    /// Write to an array that is already known to be one.
    ///
    /// Bounds are checked before the kind, so an out-of-range store of the
    /// wrong kind reports `IndexOutOfBounds`.
    pub fn store(array: &mut ArrayValue, index: i32, value: BoxedValue) -> KvmResult<()> {
        let slot = array.check_index(index)?;
        match &mut array.storage {
            ArrayStorage::Bool(v) => v[slot] = narrow!(value, Bool),
            ArrayStorage::Byte(v) => v[slot] = narrow!(value, Byte),
            ArrayStorage::Char(v) => v[slot] = narrow!(value, Char),
            ArrayStorage::Double(v) => v[slot] = narrow!(value, Double),
            ArrayStorage::Float(v) => v[slot] = narrow!(value, Float),
            ArrayStorage::Int(v) => v[slot] = narrow!(value, Int),
            ArrayStorage::Long(v) => v[slot] = narrow!(value, Long),
            ArrayStorage::Short(v) => v[slot] = narrow!(value, Short),
            ArrayStorage::Reference(v) => v[slot] = narrow!(value, Reference),
        }
        Ok(())
    }
}
