use core::fmt;

use super::StrBuf;
use crate::alloc::Allocator;

impl<const N: usize, A: Allocator> fmt::Write for StrBuf<u8, N, A> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl<const N: usize, A: Allocator> fmt::Write for StrBuf<char, N, A> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend(s.chars());
        Ok(())
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.push(c);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<const N: usize, A: Allocator> std::io::Write for StrBuf<u8, N, A> {
    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}
