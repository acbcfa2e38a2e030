#![cfg(feature = "alloc")]

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt::Write;
use core::ptr::NonNull;

use rstest::rstest;

use flex_strbuf::{
    alloc::{AllocError, Allocator, Global},
    PathBuf, StrBuf, UrlBuf,
};

#[derive(Debug, Default)]
struct CountingAlloc {
    allocs: Cell<usize>,
    releases: Cell<usize>,
}

unsafe impl Allocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.allocs.set(self.allocs.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.releases.set(self.releases.get() + 1);
        Global.deallocate(ptr, layout)
    }
}

#[test]
fn strbuf_default_capacities() {
    assert_eq!(UrlBuf::new().capacity(), 2000);
    assert_eq!(PathBuf::new().capacity(), 4096);
    assert!(StrBuf::<u8, 10>::default().is_empty());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(15)]
#[case(16)]
fn strbuf_inline_never_allocates(#[case] count: usize) {
    let alloc = CountingAlloc::default();
    let mut buf = StrBuf::<u8, 16, _>::new_in(&alloc);
    for _ in 0..count {
        buf.push(b'x');
    }
    buf.truncate(1);
    buf.resize(16);
    assert!(!buf.is_heap());
    assert_eq!(buf.capacity(), 16);
    drop(buf);
    assert_eq!(alloc.allocs.get(), 0);
    assert_eq!(alloc.releases.get(), 0);
}

#[test]
fn strbuf_spill_allocates_once() {
    let alloc = CountingAlloc::default();
    let mut buf = StrBuf::<u8, 16, _>::new_in(&alloc);
    buf.extend_from_slice(&[b'a'; 16]);
    assert_eq!(alloc.allocs.get(), 0);
    buf.push(b'b');
    assert!(buf.is_heap());
    assert_eq!(alloc.allocs.get(), 1);
    assert_eq!(&buf[..16], &[b'a'; 16]);
    assert_eq!(buf[16], b'b');
    drop(buf);
    assert_eq!(alloc.releases.get(), 1);
}

#[test]
fn strbuf_amortized_growth() {
    let alloc = CountingAlloc::default();
    let mut buf = StrBuf::<u8, 4, _>::new_in(&alloc);
    for idx in 0..4096usize {
        buf.push(idx as u8);
    }
    assert_eq!(buf.len(), 4096);
    // one allocation per doubling from 8 to 4096
    assert!(alloc.allocs.get() <= 10, "allocs: {}", alloc.allocs.get());
    assert!(buf.iter().enumerate().all(|(idx, b)| *b == idx as u8));
}

#[rstest]
#[case::clear(|buf: &mut StrBuf<u8, 4>| buf.clear())]
#[case::truncate(|buf: &mut StrBuf<u8, 4>| buf.truncate(1))]
#[case::resize(|buf: &mut StrBuf<u8, 4>| buf.resize(0))]
#[case::assign(|buf: &mut StrBuf<u8, 4>| buf.assign(b"ab"))]
fn strbuf_promotion_is_permanent(#[case] shrink: fn(&mut StrBuf<u8, 4>)) {
    let mut buf = StrBuf::<u8, 4>::from("promoted");
    assert!(buf.is_heap());
    let cap = buf.capacity();
    shrink(&mut buf);
    assert!(buf.is_heap());
    assert_eq!(buf.capacity(), cap);
    buf.extend_from_slice(b"xy");
    assert!(buf.is_heap());
}

#[test]
fn strbuf_resize_fills_nul() {
    let mut buf = StrBuf::<u8, 4>::from("ab");
    buf.resize(6);
    assert_eq!(buf, b"ab\0\0\0\0");
    buf.resize(1);
    assert_eq!(buf, "a");
}

#[rstest]
#[case("")]
#[case("abc")]
#[case("abcdefgh")]
fn strbuf_terminated_idempotent(#[case] value: &str) {
    let mut buf = StrBuf::<u8, 8>::from(value);
    let first = buf.as_terminated_slice().to_vec();
    let second = buf.as_terminated_slice().to_vec();
    assert_eq!(first, second);
    assert_eq!(first.len(), value.len() + 1);
    assert_eq!(first.last(), Some(&0));
    assert_eq!(buf.len(), value.len());
    assert_eq!(buf, value);
}

#[test]
fn strbuf_terminated_after_modification() {
    let mut buf = StrBuf::<u8, 8>::from("abcd");
    buf.ensure_terminated();
    buf.truncate(2);
    let ptr = buf.as_terminated_ptr();
    let c_str = unsafe { core::ffi::CStr::from_ptr(ptr.cast()) };
    assert_eq!(c_str.to_bytes(), b"ab");
}

#[test]
fn strbuf_as_c_str() {
    let mut buf = PathBuf::from("/tmp/file");
    assert_eq!(buf.as_c_str().unwrap().to_bytes(), b"/tmp/file");
    buf.push(0);
    buf.extend_from_slice(b"tail");
    assert!(buf.as_c_str().is_err());
}

#[test]
fn strbuf_as_str() {
    let buf = UrlBuf::from("https://example.com/");
    assert_eq!(buf.as_str(), Ok("https://example.com/"));
    let buf = StrBuf::<u8, 4>::from(&[0xffu8, 0xfe][..]);
    assert!(buf.as_str().is_err());
}

#[test]
fn strbuf_take() {
    let mut a = StrBuf::<u8, 4>::from("heap contents");
    let ptr = a.as_ptr();
    let b = a.take();
    assert_eq!(b, "heap contents");
    // the heap allocation is transferred
    assert_eq!(b.as_ptr(), ptr);
    assert!(a.is_empty());
    assert!(!a.is_heap());
    assert_eq!(a.capacity(), 4);
}

#[test]
fn strbuf_take_inline() {
    let mut a = StrBuf::<u8, 16>::from("inline");
    let b = a.take();
    assert_eq!(b, "inline");
    assert!(!b.is_heap());
    assert!(a.is_empty());
}

#[test]
fn strbuf_assign_from() {
    let alloc = CountingAlloc::default();
    let mut a = StrBuf::<u8, 4, _>::from_slice_in(b"first heap value", &alloc);
    let mut b = StrBuf::<u8, 4, _>::from_slice_in(b"second heap value", &alloc);
    assert_eq!(alloc.allocs.get(), 2);
    a.assign_from(&mut b);
    // the previous allocation of `a` is released
    assert_eq!(alloc.releases.get(), 1);
    assert_eq!(a, "second heap value");
    assert!(b.is_empty() && !b.is_heap());
    drop(a);
    drop(b);
    assert_eq!(alloc.releases.get(), 2);
}

#[rstest]
#[case(&[])]
#[case(&[1, 2, 3])]
#[case(&[7; 40])]
fn strbuf_slice_contents(#[case] data: &[u32]) {
    let buf = StrBuf::<u32, 8>::from_slice(data);
    assert_eq!(buf.as_slice(), data);
    assert_eq!(buf.len(), data.len());
    assert_eq!(buf.is_heap(), data.len() > 8);
    let copy = buf.clone();
    assert_eq!(copy, buf);
}

#[test]
fn strbuf_assign_shorter() {
    let mut buf = StrBuf::<u8, 32>::from("a long initial value");
    buf.assign(b"short");
    assert_eq!(buf, "short");
    buf.assign(&[]);
    assert!(buf.is_empty());
}

#[test]
fn strbuf_add_assign() {
    let mut buf = UrlBuf::from("http://host");
    buf += ":8080";
    buf += &b"/path"[..];
    assert_eq!(buf, "http://host:8080/path");
}

#[test]
fn strbuf_extend_iter() {
    let mut buf: StrBuf<char, 4> = "abc".chars().collect();
    assert!(!buf.is_heap());
    buf.extend("defg".chars());
    assert!(buf.is_heap());
    buf.extend(&['h', 'i']);
    assert_eq!(buf.iter().collect::<String>(), "abcdefghi");
}

#[test]
fn strbuf_write_fmt() {
    let mut buf = UrlBuf::new();
    write!(buf, "{}://{}:{}/", "udp", "tracker.example", 6969).unwrap();
    assert_eq!(buf, "udp://tracker.example:6969/");
    assert!(!buf.is_heap());
}

#[test]
fn strbuf_compare() {
    let a = StrBuf::<u8, 4>::from("abc");
    let b = StrBuf::<u8, 64>::from("abd");
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a, StrBuf::<u8, 64>::from("abc"));
    assert_eq!(a, &b"abc"[..]);
    assert_eq!(format!("{:?}", a), "[97, 98, 99]");
}

#[test]
fn strbuf_pointer_stable_inline() {
    let mut buf = StrBuf::<u16, 8>::new();
    let ptr = buf.as_ptr();
    buf.extend_from_slice(&[1, 2, 3]);
    assert_eq!(buf.as_ptr(), ptr);
    unsafe {
        assert_eq!(*buf.get_unchecked(2), 3);
    }
}
