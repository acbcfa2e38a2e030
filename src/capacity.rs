//! Growth behavior for buffers which have exceeded their available storage.

use core::fmt::Debug;

use crate::storage::utils::min_non_zero_cap;

/// Growth behavior for buffers which have exceeded their available storage
pub trait Grow: Debug {
    /// Calculate the next capacity to request from the allocator
    fn next_capacity<T>(prev: usize, minimum: usize) -> usize;
}

/// Growth behavior which never requests extra capacity
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowExact;

impl Grow for GrowExact {
    #[inline]
    fn next_capacity<T>(_prev: usize, minimum: usize) -> usize {
        minimum
    }
}

/// Growth behavior which consistently doubles in size
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GrowDoubling;

impl Grow for GrowDoubling {
    #[inline]
    fn next_capacity<T>(prev: usize, minimum: usize) -> usize {
        let preferred = if prev == 0 {
            min_non_zero_cap::<T>()
        } else {
            prev.saturating_mul(2)
        };
        preferred.max(minimum)
    }
}
