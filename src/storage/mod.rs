//! Backing storage types for string buffers.

mod array;
mod heap;
pub(crate) mod utils;

pub use self::{array::ArrayStorage, heap::HeapBuffer};
