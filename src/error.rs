//! Error handling.

use core::alloc::{Layout, LayoutError};
use core::fmt;

use crate::alloc::AllocError;
use crate::report::{report_and_abort, SourceLocation};

/// An enumeration of error types raised by storage implementations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// A memory allocation failed.
    AllocError(Layout),
    /// The requested capacity cannot be represented.
    CapacityLimit,
    /// The provided layout was not allocatable.
    LayoutError(LayoutError),
}

impl StorageError {
    /// Generic description of this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllocError(_) => "Allocation error",
            Self::CapacityLimit => "Exceeded storage capacity limit",
            Self::LayoutError(_) => "Layout error",
        }
    }

    /// Generate a fatal error with this error as the reason.
    ///
    /// Allocation failures are passed to the out-of-memory handler, all
    /// other errors are reported against the location of the caller.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn panic(self) -> ! {
        if let Self::AllocError(layout) = self {
            crate::alloc::handle_alloc_error(layout);
        } else {
            report_and_abort(SourceLocation::caller(), format_args!("{}", self.as_str()))
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LayoutError> for StorageError {
    fn from(err: LayoutError) -> Self {
        Self::LayoutError(err)
    }
}

impl StorageError {
    #[inline]
    pub(crate) fn alloc(layout: Layout) -> impl FnOnce(AllocError) -> Self {
        move |_| Self::AllocError(layout)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}
