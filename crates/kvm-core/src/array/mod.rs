pub mod accessor;
pub mod array;

pub use accessor::TypedArrayAccessor;
pub use array::ArrayValue;
