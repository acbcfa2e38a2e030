use core::alloc::Layout;
use core::fmt;
use core::mem::{size_of, MaybeUninit};
use core::ptr::NonNull;
use core::slice;

use super::utils::array_layout;
use crate::alloc::Allocator;
use crate::error::StorageError;

/// An allocation handle for a heap buffer of `T` values.
///
/// A handle with a capacity of zero owns no memory. Once the handle has been
/// allocated, its capacity may only increase.
pub struct HeapBuffer<T, A: Allocator> {
    data: NonNull<T>,
    capacity: usize,
    alloc: A,
}

impl<T, A: Allocator> HeapBuffer<T, A> {
    #[inline]
    pub(crate) const fn dangling(alloc: A) -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            alloc,
        }
    }

    /// Determine whether this handle owns an allocation.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.capacity != 0
    }

    /// Get the number of `T` values which fit in the allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Access the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline]
    pub(crate) fn as_uninit_slice(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr().cast(), self.capacity) }
    }

    /// Allocate a new buffer, or extend the current allocation, so that it
    /// holds at least `capacity` values. The contents of an existing
    /// allocation are preserved.
    pub(crate) fn try_grow(&mut self, capacity: usize) -> Result<(), StorageError> {
        debug_assert!(capacity > self.capacity);
        let new_layout = array_layout::<T>(capacity)?;
        let ptr = if self.is_allocated() {
            let old_layout = array_layout::<T>(self.capacity)?;
            unsafe { self.alloc.grow(self.data.cast(), old_layout, new_layout) }
        } else {
            self.alloc.allocate(new_layout)
        }
        .map_err(StorageError::alloc(new_layout))?;
        self.data = ptr.cast();
        self.capacity = Self::capacity_for(ptr.len(), capacity);
        Ok(())
    }

    #[inline]
    fn capacity_for(alloc_len: usize, requested: usize) -> usize {
        let t_size = size_of::<T>();
        if t_size > 0 {
            (alloc_len / t_size).max(requested)
        } else {
            usize::MAX
        }
    }

    #[inline]
    fn layout(&self) -> Layout {
        // the layout was validated when the allocation was made
        unsafe {
            Layout::from_size_align_unchecked(
                self.capacity * size_of::<T>(),
                Layout::new::<T>().align(),
            )
        }
    }
}

impl<T, A: Allocator> fmt::Debug for HeapBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<T, A: Allocator> Drop for HeapBuffer<T, A> {
    fn drop(&mut self) {
        if self.is_allocated() {
            unsafe { self.alloc.deallocate(self.data.cast(), self.layout()) };
        }
    }
}

// SAFETY: the handle exclusively owns its allocation.
unsafe impl<T: Send, A: Allocator + Send> Send for HeapBuffer<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for HeapBuffer<T, A> {}
