use super::{StrBuf, StrUnit};
use crate::alloc::Allocator;

impl<T: StrUnit, const N: usize, A: Allocator> StrBuf<T, N, A> {
    /// Replace the contents of the buffer with `segments` joined by
    /// [`StrUnit::SEPARATOR`].
    ///
    /// No separator is added before the first segment or after the last.
    /// Capacity for all of the segments is reserved in advance.
    ///
    /// ```
    /// use flex_strbuf::PathBuf;
    ///
    /// let mut path = PathBuf::new();
    /// path.build_path(&["var", "lib", "data"]);
    /// assert_eq!(path, "var/lib/data");
    /// ```
    #[track_caller]
    pub fn build_path<S: AsRef<[T]>>(&mut self, segments: &[S]) {
        let total = segments
            .iter()
            .fold(segments.len(), |acc, seg| acc.saturating_add(seg.as_ref().len()));
        self.clear();
        self.reserve(total);
        for seg in segments {
            self.extend_from_slice(seg.as_ref());
            self.push(T::SEPARATOR);
        }
        // drop the trailing separator
        self.truncate(self.len().saturating_sub(1));
    }

    /// Replace the contents of the buffer with `segments` joined by
    /// [`StrUnit::SEPARATOR`].
    ///
    /// This is the form of [`build_path`](Self::build_path) used by the
    /// [`build_path!`](crate::build_path) macro.
    #[inline]
    #[track_caller]
    pub fn build_path_slices(&mut self, segments: &[&[T]]) {
        self.build_path(segments)
    }
}

#[doc(hidden)]
#[inline]
pub fn path_segment<T, S: AsRef<[T]> + ?Sized>(segment: &S) -> &[T] {
    segment.as_ref()
}

/// Replace the contents of a buffer with a sequence of path segments
/// of varying types, joined by the path separator.
///
/// ```
/// use flex_strbuf::{build_path, PathBuf};
///
/// let dir = PathBuf::from("/tmp");
/// let mut path = PathBuf::new();
/// build_path!(path; dir, "cache", b"entry.bin");
/// assert_eq!(path, "/tmp/cache/entry.bin");
/// ```
#[macro_export]
macro_rules! build_path {
    ($buf:expr $(;)?) => {
        $buf.clear()
    };
    ($buf:expr; $($seg:expr),+ $(,)?) => {
        $buf.build_path_slices(&[$($crate::strbuf::path_segment(&$seg)),+])
    };
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use crate::strbuf::StrBuf;

    #[test]
    fn build_path_reserves_once() {
        let mut buf = StrBuf::<u8, 4>::new();
        buf.build_path(&["abc", "defg", "h"]);
        assert_eq!(buf, "abc/defg/h");
        // 8 bytes of segments plus 3 separators
        assert_eq!(buf.capacity(), 11);
    }

    #[test]
    fn build_path_no_segments() {
        let mut buf = StrBuf::<u8, 16>::from("stale");
        buf.build_path::<&str>(&[]);
        assert!(buf.is_empty());
    }

    #[test]
    fn build_path_empty_segments() {
        let mut buf = StrBuf::<u8, 16>::new();
        buf.build_path(&["", "a", ""]);
        assert_eq!(buf, "/a/");
    }

    #[test]
    fn build_path_chars() {
        let mut buf = StrBuf::<char, 16>::new();
        buf.build_path(&[&['a'][..], &['b', 'c'][..]]);
        assert_eq!(buf, ['a', '/', 'b', 'c']);
    }

    #[test]
    fn build_path_macro() {
        let mut buf = StrBuf::<u8, 16>::from("stale");
        build_path!(buf; "x", b"yz");
        assert_eq!(buf, "x/yz");
        build_path!(buf);
        assert!(buf.is_empty());
    }
}
