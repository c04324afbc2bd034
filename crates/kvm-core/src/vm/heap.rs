//! VM Heap
//!
//! Owns every object the VM can reference and hands out `ObjRef` handles.
//! Arrays are created and destroyed only here; the accessor merely borrows them.
//! Handles are never reused, so a freed handle stays detectable as dangling.

use log::{debug, trace};

use crate::array::{ArrayValue, TypedArrayAccessor};
use crate::config::KvmConfig;
use crate::error::{KvmError, KvmResult};
use crate::value::{BoxedValue, ElementKind, ObjRef};

/// Anything a reference can point at
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Array(ArrayValue),
    /// Opaque non-array object; only its class descriptor is tracked
    Instance { class_name: String },
}

impl HeapObject {
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            HeapObject::Array(a) => Some(a),
            HeapObject::Instance { .. } => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
        match self {
            HeapObject::Array(a) => Some(a),
            HeapObject::Instance { .. } => None,
        }
    }
}

/// Handle-indexed object store
#[derive(Debug)]
pub struct Heap {
    slots: Vec<Option<HeapObject>>,
    live: usize,
    max_objects: usize,
    max_array_length: usize,
}

impl Heap {
    pub fn new(config: &KvmConfig) -> Self {
        Heap {
            slots: Vec::new(),
            live: 0,
            max_objects: config.max_heap_objects,
            max_array_length: config.max_array_length,
        }
    }

    /// Number of objects currently allocated
    pub fn live_objects(&self) -> usize {
        self.live
    }

    fn insert(&mut self, object: HeapObject) -> KvmResult<ObjRef> {
        if self.live >= self.max_objects {
            return Err(KvmError::HeapExhausted(self.live));
        }
        let id = u32::try_from(self.slots.len() + 1).map_err(|_| KvmError::HeapExhausted(self.live))?;
        self.slots.push(Some(object));
        self.live += 1;
        Ok(ObjRef(id))
    }

    /// Allocate a zero-filled array of `kind`
    pub fn alloc_array(&mut self, kind: ElementKind, length: i32) -> KvmResult<ObjRef> {
        let length = usize::try_from(length).map_err(|_| KvmError::NegativeArraySize(length))?;
        if length > self.max_array_length {
            return Err(KvmError::ArrayTooLarge { length, max: self.max_array_length });
        }
        let handle = self.insert(HeapObject::Array(ArrayValue::new(kind, length)))?;
        debug!("allocated {}[{}] at {}", kind, length, handle);
        Ok(handle)
    }

    /// Allocate an array from its type descriptor, e.g. `[I` or `[Ljava/lang/String;`.
    ///
    /// For multi-dimensional descriptors only the outer dimension is sized;
    /// inner slots start out null.
    pub fn new_array(&mut self, descriptor: &str, length: i32) -> KvmResult<ObjRef> {
        // the dimension cap applies to the array type, not its component
        ElementKind::from_descriptor(descriptor)?;
        let component = descriptor
            .strip_prefix('[')
            .ok_or_else(|| KvmError::InvalidDescriptor(descriptor.to_string()))?;
        let kind = ElementKind::from_descriptor(component)?;
        self.alloc_array(kind, length)
    }

    /// Allocate an array and store `values` into it, in order
    pub fn filled_new_array(&mut self, descriptor: &str, values: &[BoxedValue]) -> KvmResult<ObjRef> {
        let length = i32::try_from(values.len()).map_err(|_| KvmError::TooManyArguments(values.len()))?;
        let handle = self.new_array(descriptor, length)?;
        for (index, value) in (0..length).zip(values) {
            if let Err(e) = self.array_set(Some(handle), index, *value) {
                self.free(handle)?;
                return Err(e);
            }
        }
        Ok(handle)
    }

    /// Allocate an opaque object of the given class
    pub fn alloc_instance(&mut self, class_name: &str) -> KvmResult<ObjRef> {
        let handle = self.insert(HeapObject::Instance { class_name: class_name.to_string() })?;
        debug!("allocated instance of {} at {}", class_name, handle);
        Ok(handle)
    }

    /// Release an object. The handle is dangling afterwards.
    pub fn free(&mut self, handle: ObjRef) -> KvmResult<()> {
        let slot = self
            .slot_index(handle)
            .and_then(|i| self.slots[i].take())
            .map(|_| ())
            .ok_or(KvmError::DanglingReference(handle.0));
        if slot.is_ok() {
            self.live -= 1;
            trace!("freed {}", handle);
        }
        slot
    }

    fn slot_index(&self, handle: ObjRef) -> Option<usize> {
        let index = (handle.0 as usize).checked_sub(1)?;
        (index < self.slots.len()).then_some(index)
    }

    /// Look up a live object
    pub fn lookup(&self, handle: ObjRef) -> KvmResult<&HeapObject> {
        self.slot_index(handle)
            .and_then(|i| self.slots[i].as_ref())
            .ok_or(KvmError::DanglingReference(handle.0))
    }

    pub fn lookup_mut(&mut self, handle: ObjRef) -> KvmResult<&mut HeapObject> {
        match self.slot_index(handle) {
            Some(i) => self.slots[i].as_mut().ok_or(KvmError::DanglingReference(handle.0)),
            None => Err(KvmError::DanglingReference(handle.0)),
        }
    }

    /// Resolve a possibly-null handle to the array it names
    pub fn array(&self, handle: Option<ObjRef>) -> KvmResult<&ArrayValue> {
        let handle = handle.ok_or(KvmError::NullArray)?;
        self.lookup(handle)?.as_array().ok_or(KvmError::NotAnArray)
    }

    pub fn array_length(&self, handle: Option<ObjRef>) -> KvmResult<usize> {
        Ok(self.array(handle)?.len())
    }

    /// Load `handle[index]` through the accessor
    pub fn array_get(&self, handle: Option<ObjRef>, index: i32) -> KvmResult<BoxedValue> {
        let target = match handle {
            Some(h) => Some(self.lookup(h)?),
            None => None,
        };
        TypedArrayAccessor::get(target, index)
    }

    /// Store `value` into `handle[index]` through the accessor
    pub fn array_set(&mut self, handle: Option<ObjRef>, index: i32, value: BoxedValue) -> KvmResult<()> {
        let target = match handle {
            Some(h) => Some(self.lookup_mut(h)?),
            None => None,
        };
        TypedArrayAccessor::set(target, index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap() -> Heap {
        Heap::new(&KvmConfig::new())
    }

    #[test]
    fn handles_start_at_one() {
        let mut heap = heap();
        let a = heap.alloc_array(ElementKind::Int, 1).unwrap();
        let b = heap.alloc_instance("Lkvm/Foo;").unwrap();
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(heap.live_objects(), 2);
    }

    #[test]
    fn negative_length_rejected() {
        let mut heap = heap();
        assert!(matches!(
            heap.alloc_array(ElementKind::Byte, -1),
            Err(KvmError::NegativeArraySize(-1))
        ));
        assert_eq!(heap.live_objects(), 0);
    }

    #[test]
    fn length_limit_enforced() {
        let mut config = KvmConfig::new();
        config.max_array_length = 8;
        let mut heap = Heap::new(&config);
        assert!(heap.alloc_array(ElementKind::Long, 8).is_ok());
        assert!(matches!(
            heap.alloc_array(ElementKind::Long, 9),
            Err(KvmError::ArrayTooLarge { length: 9, max: 8 })
        ));
    }

    #[test]
    fn object_limit_enforced() {
        let mut config = KvmConfig::new();
        config.max_heap_objects = 1;
        let mut heap = Heap::new(&config);
        let first = heap.alloc_array(ElementKind::Int, 0).unwrap();
        assert!(matches!(heap.alloc_instance("LFoo;"), Err(KvmError::HeapExhausted(1))));
        heap.free(first).unwrap();
        assert!(heap.alloc_instance("LFoo;").is_ok());
    }

    #[test]
    fn descriptors_select_kind() {
        let mut heap = heap();
        let cases = [
            ("[Z", ElementKind::Bool),
            ("[C", ElementKind::Char),
            ("[J", ElementKind::Long),
            ("[Ljava/lang/String;", ElementKind::Reference),
            ("[[I", ElementKind::Reference),
        ];
        for (descriptor, kind) in cases {
            let handle = heap.new_array(descriptor, 2).unwrap();
            assert_eq!(heap.array(Some(handle)).unwrap().kind(), kind);
        }
    }

    #[test]
    fn non_array_descriptor_rejected() {
        let mut heap = heap();
        for d in ["I", "Ljava/lang/Object;", "[V", "["] {
            assert!(matches!(heap.new_array(d, 1), Err(KvmError::InvalidDescriptor(_))), "{}", d);
        }
    }

    #[test]
    fn filled_new_array_stores_in_order() {
        let mut heap = heap();
        let values = [BoxedValue::Int(4), BoxedValue::Int(5), BoxedValue::Int(6)];
        let handle = heap.filled_new_array("[I", &values).unwrap();
        assert_eq!(heap.array(Some(handle)).unwrap().to_boxed_vec(), values.to_vec());
    }

    #[test]
    fn filled_new_array_with_wrong_kind_releases_array() {
        let mut heap = heap();
        let values = [BoxedValue::Int(4), BoxedValue::Float(1.0)];
        assert!(matches!(
            heap.filled_new_array("[I", &values),
            Err(KvmError::KindMismatch { expected: ElementKind::Int, actual: ElementKind::Float })
        ));
        assert_eq!(heap.live_objects(), 0);
    }

    #[test]
    fn freed_handle_dangles() {
        let mut heap = heap();
        let handle = heap.alloc_array(ElementKind::Short, 1).unwrap();
        heap.free(handle).unwrap();
        assert!(matches!(heap.array_get(Some(handle), 0), Err(KvmError::DanglingReference(1))));
        assert!(matches!(heap.free(handle), Err(KvmError::DanglingReference(1))));
        assert!(matches!(heap.lookup(ObjRef(99)), Err(KvmError::DanglingReference(99))));
    }

    #[test]
    fn array_length_errors() {
        let mut heap = heap();
        let object = heap.alloc_instance("LFoo;").unwrap();
        assert!(matches!(heap.array_length(None), Err(KvmError::NullArray)));
        assert!(matches!(heap.array_length(Some(object)), Err(KvmError::NotAnArray)));
    }
}
