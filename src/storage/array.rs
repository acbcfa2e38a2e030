use core::fmt;
use core::mem::MaybeUninit;

use const_default::ConstDefault;

/// A storage buffer consisting of an uninitialized `MaybeUninit` array.
#[repr(transparent)]
pub struct ArrayStorage<T, const N: usize>(pub [MaybeUninit<T>; N]);

impl<T, const N: usize> ArrayStorage<T, N> {
    /// Access the buffer contents as a mutable slice.
    pub fn as_uninit_slice(&mut self) -> &mut [MaybeUninit<T>] {
        &mut self.0
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.0.as_ptr().cast()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr().cast()
    }
}

impl<T, const N: usize> fmt::Debug for ArrayStorage<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayStorage").finish_non_exhaustive()
    }
}

impl<T, const N: usize> ConstDefault for ArrayStorage<T, N> {
    const DEFAULT: Self = Self(unsafe { MaybeUninit::uninit().assume_init() });
}

impl<T, const N: usize> Default for ArrayStorage<T, N> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "zeroize")]
impl<T, const N: usize> zeroize::Zeroize for ArrayStorage<T, N> {
    #[inline]
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}
