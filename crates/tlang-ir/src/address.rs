use std::fmt;

use smol_str::SmolStr;

use crate::data_type::DataType;

/// A memory location as seen by `addr` nodes.
///
/// Implementations come from the layer that binds placeholders to storage. The
/// graph only needs to know whether two locations address the same kind of
/// element and where they sit relative to each other.
pub trait Address: Clone + PartialEq + fmt::Debug {
    fn same_type(&self, other: &Self) -> bool;

    fn offset(&self) -> i64;
}

/// `true` iff `second` is the element right after `first` in the same storage.
pub fn prior_to<A: Address>(first: &A, second: &A) -> bool {
    first.same_type(second) && first.offset().checked_add(1) == Some(second.offset())
}

/// An element of a named, flat buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferAddress {
    buffer: SmolStr,
    element: DataType,
    offset: i64,
}

impl BufferAddress {
    pub fn new(buffer: impl Into<SmolStr>, element: DataType, offset: i64) -> Self {
        Self {
            buffer: buffer.into(),
            element,
            offset,
        }
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn element(&self) -> DataType {
        self.element
    }

    pub fn with_offset(&self, offset: i64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }
}

impl Address for BufferAddress {
    fn same_type(&self, other: &Self) -> bool {
        self.buffer == other.buffer && self.element == other.element
    }

    fn offset(&self) -> i64 {
        self.offset
    }
}

impl fmt::Display for BufferAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]:{}", self.buffer, self.offset, self.element)
    }
}
