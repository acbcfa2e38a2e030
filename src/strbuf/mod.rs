//! A growable string buffer with inline storage.

use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::ffi::{CStr, FromBytesWithNulError};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, MaybeUninit};
use core::ops::{AddAssign, Deref, DerefMut};
use core::ptr;
use core::slice;
use core::str::Utf8Error;

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault, Global};
use crate::capacity::{Grow, GrowDoubling, GrowExact};
use crate::error::StorageError;
use crate::storage::{ArrayStorage, HeapBuffer};

#[doc(hidden)]
pub use self::path::path_segment;
pub use self::unit::StrUnit;

mod path;
mod unit;
mod write;

/// The inline capacity of a [`UrlBuf`].
pub const URL_BUF_CAPACITY: usize = 2000;

/// The inline capacity of a [`PathBuf`].
pub const PATH_BUF_CAPACITY: usize = 4096;

/// A buffer for building short-term URLs.
///
/// The inline capacity is large enough to avoid heap allocation for most
/// URLs, but that also makes it a poor choice for longer-term storage.
pub type UrlBuf = StrBuf<u8, URL_BUF_CAPACITY>;

/// A buffer for building short-term filesystem paths.
///
/// The inline capacity is large enough to avoid heap allocation for most
/// paths, but that also makes it a poor choice for longer-term storage.
pub type PathBuf = StrBuf<u8, PATH_BUF_CAPACITY>;

#[cfg(feature = "zeroize")]
/// A `StrBuf` which zeroizes its contents when dropped, including any heap
/// storage released while growing.
///
/// ```
/// use flex_strbuf::ZeroizingStrBuf;
///
/// let mut key = ZeroizingStrBuf::<u8, 8>::default();
/// key.extend_from_slice(b"correct horse");
/// assert!(key.is_heap());
/// ```
pub type ZeroizingStrBuf<T, const N: usize> =
    zeroize::Zeroizing<StrBuf<T, N, crate::alloc::ZeroizingAlloc<Global>>>;

/// A growable buffer of `T` values which stores up to `N` values inline,
/// moving its contents to a heap allocation from `A` once that capacity is
/// exceeded.
///
/// Promotion to the heap is permanent: clearing or shrinking the buffer
/// retains the heap allocation until the buffer is dropped.
///
/// # Examples
///
/// ```
/// use flex_strbuf::StrBuf;
///
/// let mut buf = StrBuf::<u8, 8>::new();
/// buf.extend_from_slice(b"short");
/// assert!(!buf.is_heap());
/// buf.extend_from_slice(b" and longer");
/// assert!(buf.is_heap());
/// assert_eq!(buf, "short and longer");
/// ```
pub struct StrBuf<T: Copy, const N: usize, A: Allocator = Global> {
    inline: ArrayStorage<T, N>,
    heap: HeapBuffer<T, A>,
    length: usize,
}

impl<T: Copy, const N: usize, A: AllocatorDefault> StrBuf<T, N, A> {
    /// Constructs a new, empty `StrBuf` using inline storage.
    pub const fn new() -> Self {
        Self::new_in(A::DEFAULT)
    }

    /// Constructs a new `StrBuf` containing a copy of `data`. The data is
    /// moved to the heap if it exceeds the inline capacity.
    #[track_caller]
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_slice_in(data, A::DEFAULT)
    }
}

impl<T: Copy, const N: usize, A: Allocator> StrBuf<T, N, A> {
    /// Constructs a new, empty `StrBuf` which will spill into the allocator `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            inline: ArrayStorage::DEFAULT,
            heap: HeapBuffer::dangling(alloc),
            length: 0,
        }
    }

    /// Constructs a new `StrBuf` containing a copy of `data`, which will spill
    /// into the allocator `alloc`.
    #[track_caller]
    pub fn from_slice_in(data: &[T], alloc: A) -> Self {
        let mut buf = Self::new_in(alloc);
        buf.extend_from_slice(data);
        buf
    }

    /// Access the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.heap.allocator()
    }

    /// Get the number of values which may be stored without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        if self.heap.is_allocated() {
            self.heap.capacity()
        } else {
            N
        }
    }

    /// Determine whether the contents have been moved to heap storage.
    #[inline]
    pub fn is_heap(&self) -> bool {
        self.heap.is_allocated()
    }

    /// Get the number of values in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Determine whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Access the contents as a raw pointer.
    ///
    /// The pointer is invalidated by any operation which may reallocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        if self.heap.is_allocated() {
            self.heap.as_ptr()
        } else {
            self.inline.as_ptr()
        }
    }

    /// Access the contents as a mutable raw pointer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        if self.heap.is_allocated() {
            self.heap.as_mut_ptr()
        } else {
            self.inline.as_mut_ptr()
        }
    }

    /// Access the contents as a slice. The view is valid until the
    /// next modification of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.length) }
    }

    /// Access the contents as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.length) }
    }

    /// Access the unused capacity of the buffer, to be filled before
    /// calling [`set_len`](Self::set_len).
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let length = self.length;
        &mut self.as_uninit_slice()[length..]
    }

    #[inline]
    fn as_uninit_slice(&mut self) -> &mut [MaybeUninit<T>] {
        if self.heap.is_allocated() {
            self.heap.as_uninit_slice()
        } else {
            self.inline.as_uninit_slice()
        }
    }

    /// Set the length of the buffer.
    ///
    /// # Safety
    /// `length` must not exceed the capacity of the buffer, and all values
    /// up to `length` must have been initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, length: usize) {
        debug_check!(length <= self.capacity());
        self.length = length;
    }

    /// Access a value without checking the bounds of the buffer.
    ///
    /// # Safety
    /// `index` must be less than the length of the buffer.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_check!(index < self.length, "index {} out of range", index);
        &*self.as_ptr().add(index)
    }

    /// Mutably access a value without checking the bounds of the buffer.
    ///
    /// # Safety
    /// `index` must be less than the length of the buffer.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_check!(index < self.length, "index {} out of range", index);
        &mut *self.as_mut_ptr().add(index)
    }

    /// Remove all values from the buffer, retaining the current storage.
    #[inline]
    pub fn clear(&mut self) {
        self.length = 0;
    }

    /// Shorten the buffer to `length` values. Has no effect if the buffer
    /// is already shorter.
    #[inline]
    pub fn truncate(&mut self, length: usize) {
        self.length = self.length.min(length);
    }

    /// Ensure that the buffer can hold at least `capacity` values in total
    /// without reallocating. When the inline capacity is exceeded the
    /// contents are moved to the heap.
    #[inline]
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        match self.try_reserve_total::<GrowDoubling>(capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Ensure that the buffer can hold at least `capacity` values in total,
    /// without requesting additional headroom from the allocator.
    #[inline]
    #[track_caller]
    pub fn reserve_exact(&mut self, capacity: usize) {
        match self.try_reserve_total::<GrowExact>(capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub(crate) fn try_reserve_total<G: Grow>(&mut self, capacity: usize) -> Result<(), StorageError> {
        let buf_cap = self.capacity();
        if buf_cap >= capacity {
            return Ok(());
        }
        self.try_grow(G::next_capacity::<T>(buf_cap, capacity))
    }

    #[inline]
    pub(crate) fn try_reserve_additional(&mut self, reserve: usize) -> Result<(), StorageError> {
        let Some(needed) = self.length.checked_add(reserve) else {
            return Err(StorageError::CapacityLimit);
        };
        self.try_reserve_total::<GrowDoubling>(needed)
    }

    fn try_grow(&mut self, capacity: usize) -> Result<(), StorageError> {
        let promote = !self.heap.is_allocated();
        self.heap.try_grow(capacity)?;
        if promote && self.length > 0 {
            unsafe {
                ptr::copy_nonoverlapping(self.inline.as_ptr(), self.heap.as_mut_ptr(), self.length)
            };
            // the inline copy is never read again
            #[cfg(feature = "zeroize")]
            zeroize::Zeroize::zeroize(&mut self.inline.as_uninit_slice()[..self.length]);
        }
        Ok(())
    }

    /// Append a value to the buffer.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) {
        if self.length == self.capacity() {
            if let Err(error) = self.try_reserve_additional(1) {
                error.panic();
            }
        }
        unsafe { self.push_unchecked(value) };
    }

    #[inline]
    unsafe fn push_unchecked(&mut self, value: T) {
        let length = self.length;
        self.as_mut_ptr().add(length).write(value);
        self.length = length + 1;
    }

    /// Remove the last value from the buffer.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.length > 0 {
            self.length -= 1;
            Some(unsafe { self.as_ptr().add(self.length).read() })
        } else {
            None
        }
    }

    /// Append all values of `items` to the buffer, reserving the necessary
    /// capacity in advance.
    #[track_caller]
    pub fn extend_from_slice(&mut self, items: &[T]) {
        match self.try_reserve_additional(items.len()) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
        unsafe { self.extend_unchecked(items) };
    }

    /// Append all values of `items` to the buffer.
    ///
    /// This is equivalent to [`extend_from_slice`](Self::extend_from_slice).
    #[inline]
    #[track_caller]
    pub fn append(&mut self, items: &[T]) {
        self.extend_from_slice(items)
    }

    unsafe fn extend_unchecked(&mut self, items: &[T]) {
        let length = self.length;
        if !items.is_empty() {
            ptr::copy_nonoverlapping(items.as_ptr(), self.as_mut_ptr().add(length), items.len());
            self.length = length + items.len();
        }
    }

    /// Replace the contents of the buffer with a copy of `items`.
    #[track_caller]
    pub fn assign(&mut self, items: &[T]) {
        self.clear();
        self.extend_from_slice(items);
    }

    /// Take the contents of this buffer, leaving it empty and using inline
    /// storage.
    ///
    /// ```
    /// use flex_strbuf::StrBuf;
    ///
    /// let mut a = StrBuf::<u8, 4>::from("a longer value");
    /// let b = a.take();
    /// assert_eq!(b, "a longer value");
    /// assert!(a.is_empty() && !a.is_heap());
    /// ```
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let alloc = self.allocator().clone();
        mem::replace(self, Self::new_in(alloc))
    }

    /// Replace the contents of this buffer by taking the contents of
    /// `other`, which is left empty.
    pub fn assign_from(&mut self, other: &mut Self)
    where
        A: Clone,
    {
        *self = other.take();
    }
}

impl<T: StrUnit, const N: usize, A: Allocator> StrBuf<T, N, A> {
    /// Set the length of the buffer to `length`, moving to heap storage if
    /// necessary.
    ///
    /// Values exposed by extending the buffer are set to [`StrUnit::NUL`].
    /// Use [`spare_capacity_mut`](Self::spare_capacity_mut) and
    /// [`set_len`](Self::set_len) to fill the buffer directly instead.
    #[track_caller]
    pub fn resize(&mut self, length: usize) {
        if length > self.length {
            match self.try_reserve_total::<GrowDoubling>(length) {
                Ok(_) => (),
                Err(error) => error.panic(),
            }
            let prev = self.length;
            for slot in &mut self.as_uninit_slice()[prev..length] {
                slot.write(T::NUL);
            }
        }
        self.length = length;
    }

    /// Ensure that the value immediately following the contents is a
    /// terminator. The length of the buffer is unaffected.
    ///
    /// This must be repeated after any modification of the buffer.
    #[track_caller]
    pub fn ensure_terminated(&mut self) {
        let length = self.length;
        match self.try_reserve_total::<GrowDoubling>(length + 1) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
        self.as_uninit_slice()[length].write(T::NUL);
    }

    /// Access the contents followed by a terminator.
    #[track_caller]
    pub fn as_terminated_slice(&mut self) -> &[T] {
        self.ensure_terminated();
        unsafe { slice::from_raw_parts(self.as_ptr(), self.length + 1) }
    }

    /// Access the contents as a pointer to terminated data, for use with
    /// external interfaces.
    ///
    /// The pointer is invalidated by any modification of the buffer.
    #[track_caller]
    pub fn as_terminated_ptr(&mut self) -> *const T {
        self.as_terminated_slice().as_ptr()
    }
}

impl<const N: usize, A: Allocator> StrBuf<u8, N, A> {
    /// Access the contents as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    /// Access the contents as a string slice, if they are valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        core::str::from_utf8(self.as_slice())
    }

    /// Access the contents as a C string. This fails if the contents include
    /// a nul byte.
    #[track_caller]
    pub fn as_c_str(&mut self) -> Result<&CStr, FromBytesWithNulError> {
        CStr::from_bytes_with_nul(self.as_terminated_slice())
    }
}

impl<T: Copy, const N: usize, A: Allocator> AddAssign<&[T]> for StrBuf<T, N, A> {
    #[inline]
    #[track_caller]
    fn add_assign(&mut self, items: &[T]) {
        self.extend_from_slice(items)
    }
}

impl<const N: usize, A: Allocator> AddAssign<&str> for StrBuf<u8, N, A> {
    #[inline]
    #[track_caller]
    fn add_assign(&mut self, items: &str) {
        self.extend_from_slice(items.as_bytes())
    }
}

impl<T: Copy, const N: usize, A: Allocator> AsRef<[T]> for StrBuf<T, N, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator> AsMut<[T]> for StrBuf<T, N, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator> Borrow<[T]> for StrBuf<T, N, A> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator> BorrowMut<[T]> for StrBuf<T, N, A> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator + Clone> Clone for StrBuf<T, N, A> {
    fn clone(&self) -> Self {
        Self::from_slice_in(self.as_slice(), self.allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source.as_slice());
    }
}

impl<T: Copy + fmt::Debug, const N: usize, A: Allocator> fmt::Debug for StrBuf<T, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T: Copy, const N: usize, A: AllocatorDefault> Default for StrBuf<T, N, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize, A: Allocator> Deref for StrBuf<T, N, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator> DerefMut for StrBuf<T, N, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Copy, const N: usize, A: Allocator> Extend<T> for StrBuf<T, N, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (min_len, _) = iter.size_hint();
        if let Err(error) = self.try_reserve_additional(min_len) {
            error.panic();
        }
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, const N: usize, A: Allocator> Extend<&'a T> for StrBuf<T, N, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T: Copy, const N: usize, A: AllocatorDefault> FromIterator<T> for StrBuf<T, N, A> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T: Copy, const N: usize, A: AllocatorDefault> From<&[T]> for StrBuf<T, N, A> {
    #[inline]
    #[track_caller]
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: Copy, const N: usize, A: AllocatorDefault, const M: usize> From<&[T; M]>
    for StrBuf<T, N, A>
{
    #[inline]
    #[track_caller]
    fn from(data: &[T; M]) -> Self {
        Self::from_slice(data)
    }
}

impl<const N: usize, A: AllocatorDefault> From<&str> for StrBuf<u8, N, A> {
    #[inline]
    #[track_caller]
    fn from(data: &str) -> Self {
        Self::from_slice(data.as_bytes())
    }
}

impl<T: Copy + Hash, const N: usize, A: Allocator> Hash for StrBuf<T, N, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<'a, T: Copy, const N: usize, A: Allocator> IntoIterator for &'a StrBuf<T, N, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T, const N: usize, A, const M: usize, B> PartialEq<StrBuf<T, M, B>> for StrBuf<T, N, A>
where
    T: Copy + PartialEq,
    A: Allocator,
    B: Allocator,
{
    #[inline]
    fn eq(&self, other: &StrBuf<T, M, B>) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}

impl<T: Copy + Eq, const N: usize, A: Allocator> Eq for StrBuf<T, N, A> {}

impl<T: Copy + PartialEq, const N: usize, A: Allocator> PartialEq<[T]> for StrBuf<T, N, A> {
    #[inline]
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice().eq(other)
    }
}

impl<T: Copy + PartialEq, const N: usize, A: Allocator> PartialEq<&[T]> for StrBuf<T, N, A> {
    #[inline]
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice().eq(*other)
    }
}

impl<T: Copy + PartialEq, const N: usize, A: Allocator, const M: usize> PartialEq<[T; M]>
    for StrBuf<T, N, A>
{
    #[inline]
    fn eq(&self, other: &[T; M]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<T: Copy + PartialEq, const N: usize, A: Allocator, const M: usize> PartialEq<&[T; M]>
    for StrBuf<T, N, A>
{
    #[inline]
    fn eq(&self, other: &&[T; M]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<const N: usize, A: Allocator> PartialEq<str> for StrBuf<u8, N, A> {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_slice().eq(other.as_bytes())
    }
}

impl<const N: usize, A: Allocator> PartialEq<&str> for StrBuf<u8, N, A> {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_slice().eq(other.as_bytes())
    }
}

impl<T, const N: usize, A, const M: usize, B> PartialOrd<StrBuf<T, M, B>> for StrBuf<T, N, A>
where
    T: Copy + PartialOrd,
    A: Allocator,
    B: Allocator,
{
    #[inline]
    fn partial_cmp(&self, other: &StrBuf<T, M, B>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Copy + Ord, const N: usize, A: Allocator> Ord for StrBuf<T, N, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

#[cfg(feature = "zeroize")]
impl<T: Copy, const N: usize, A: Allocator> zeroize::Zeroize for StrBuf<T, N, A> {
    fn zeroize(&mut self) {
        self.inline.zeroize();
        if self.heap.is_allocated() {
            self.heap.as_uninit_slice().zeroize();
        }
        self.length = 0;
    }
}
