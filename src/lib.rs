//! String buffers which store their contents inline, spilling to
//! the heap only when the inline capacity is exceeded.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(all(doctest, feature = "alloc"))]
#[doc = include_str!("../README.md")]
struct _ReadmeDoctests;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

#[macro_use]
pub mod report;

pub mod alloc;

pub mod capacity;

pub(crate) mod error;

pub mod storage;

pub mod strbuf;

pub use self::error::StorageError;
pub use self::strbuf::{PathBuf, StrBuf, StrUnit, UrlBuf};

#[cfg(feature = "zeroize")]
pub use self::strbuf::ZeroizingStrBuf;
