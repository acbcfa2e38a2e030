use core::fmt::Debug;

/// Element types which may be used as string code units.
///
/// A code unit supplies the value used to terminate a string for
/// consumers expecting null-terminated data, and the separator inserted
/// between path segments.
pub trait StrUnit: Copy + Debug + Eq + Send + Sync + 'static {
    /// The string terminator, and the value used to fill resized buffers.
    const NUL: Self;
    /// The separator placed between path segments.
    const SEPARATOR: Self;
}

impl StrUnit for u8 {
    const NUL: Self = 0;
    const SEPARATOR: Self = b'/';
}

impl StrUnit for u16 {
    const NUL: Self = 0;
    const SEPARATOR: Self = b'/' as u16;
}

impl StrUnit for u32 {
    const NUL: Self = 0;
    const SEPARATOR: Self = b'/' as u32;
}

impl StrUnit for char {
    const NUL: Self = '\0';
    const SEPARATOR: Self = '/';
}
