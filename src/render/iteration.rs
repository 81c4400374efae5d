//! Positional metadata for collection renders.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Position of an element within a collection render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationMetadata {
    index: usize,
    size: usize,
}

impl IterationMetadata {
    /// `index` must be below `size`.
    pub fn new(index: usize, size: usize) -> Self {
        debug_assert!(index < size, "iteration index {index} out of bounds for size {size}");
        Self {
            index,
            size,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.size
    }
}

// Templates see the derived flags alongside index and size
impl Serialize for IterationMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IterationMetadata", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("first", &self.is_first())?;
        state.serialize_field("last", &self.is_last())?;
        state.end()
    }
}
