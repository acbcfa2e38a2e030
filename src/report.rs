//! Reporting of unrecoverable conditions.
//!
//! The [`check!`](crate::check) macro always evaluates its predicate. The
//! [`debug_check!`](crate::debug_check) macro is only active when
//! [`ASSERTIONS_ENABLED`] is set, which is the case for debug builds or when
//! the `force-assertions` feature is enabled. Otherwise its predicate is
//! never evaluated.

use core::fmt;
use core::panic::Location;

/// Whether [`debug_check!`](crate::debug_check) assertions are active.
pub const ASSERTIONS_ENABLED: bool = cfg!(any(debug_assertions, feature = "force-assertions"));

/// The source position associated with a fatal report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// The source file name.
    pub file: &'static str,
    /// The line number.
    pub line: u32,
}

impl SourceLocation {
    /// Create a new source location.
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Capture the location of the caller, following `#[track_caller]`.
    #[inline]
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    #[inline]
    fn from(loc: &'static Location<'static>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Report a fatal condition and stop execution.
///
/// The report is raised as a panic carrying the message `"{file}:{line}: {message}"`.
/// Builds using `panic = "abort"` terminate the process at this point.
#[cold]
#[inline(never)]
pub fn report_and_abort(location: SourceLocation, message: fmt::Arguments<'_>) -> ! {
    panic!("{}: {}", location, message)
}

/// Check a condition regardless of the build mode, reporting a fatal error
/// when it does not hold.
///
/// ```should_panic
/// # use flex_strbuf::check;
/// let len = 5;
/// check!(len < 4, "length {} exceeds limit", len);
/// ```
#[macro_export]
macro_rules! check {
    ($pred:expr $(,)?) => {
        if !$pred {
            $crate::report::report_and_abort(
                $crate::report::SourceLocation::new(file!(), line!()),
                format_args!("{}", stringify!($pred)),
            )
        }
    };
    ($pred:expr, $($arg:tt)+) => {
        if !$pred {
            $crate::report::report_and_abort(
                $crate::report::SourceLocation::new(file!(), line!()),
                format_args!($($arg)+),
            )
        }
    };
}

/// Check a condition regardless of the build mode, reporting a formatted
/// message when it does not hold.
#[macro_export]
macro_rules! check_msg {
    ($pred:expr, $($arg:tt)+) => {
        $crate::check!($pred, $($arg)+)
    };
}

/// Check a condition when assertions are enabled. The predicate is not
/// evaluated otherwise.
#[macro_export]
macro_rules! debug_check {
    ($($arg:tt)+) => {
        if $crate::report::ASSERTIONS_ENABLED {
            $crate::check!($($arg)+)
        }
    };
}

/// Check a condition when assertions are enabled, reporting a formatted
/// message when it does not hold.
#[macro_export]
macro_rules! debug_check_msg {
    ($pred:expr, $($arg:tt)+) => {
        $crate::debug_check!($pred, $($arg)+)
    };
}
