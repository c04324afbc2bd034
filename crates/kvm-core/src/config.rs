//! KVM Configuration
//!
//! Defines runtime limits for the array VM and its heap.
//! Configuration specifies constraints only; enforcement is handled by the heap and VM.

/// VM Configuration
#[derive(Debug, Clone)]
pub struct KvmConfig {
    /// Number of registers in the frame
    pub register_count: usize,

    /// Maximum length of a single array
    pub max_array_length: usize,

    /// Maximum number of live heap objects
    pub max_heap_objects: usize,
}

impl Default for KvmConfig {
    fn default() -> Self {
        KvmConfig {
            register_count: 256,
            max_array_length: 1 << 24,
            max_heap_objects: 65_536,
        }
    }
}

impl KvmConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }
}
