//! Byte sources consumed by the assembler and the owned [`Buffer`] it produces.

use bytes::{Bytes, BytesMut};
use std::ops::{Deref, DerefMut};

use crate::view::BufView;

/// Read-only, length-known run of bytes contributed to an assembly.
///
/// `reported_len` is queried during the sizing pass, before the destination
/// buffer is allocated; `as_bytes` is queried during the copy pass. Sources
/// whose two answers disagree are rejected by the assembler.
pub trait ByteSource {
	/// Length announced to the sizing pass. `None` means the source cannot
	/// describe itself and the assembly is rejected.
	fn reported_len(&self) -> Option<usize> {
		Some(self.as_bytes().len())
	}

	/// Borrow the source's bytes for the copy pass.
	fn as_bytes(&self) -> &[u8];
}

impl ByteSource for [u8] {
	fn as_bytes(&self) -> &[u8] { self }
}

impl<const N: usize> ByteSource for [u8; N] {
	fn as_bytes(&self) -> &[u8] { self }
}

impl ByteSource for Vec<u8> {
	fn as_bytes(&self) -> &[u8] { self }
}

impl ByteSource for str {
	fn as_bytes(&self) -> &[u8] { str::as_bytes(self) }
}

impl ByteSource for String {
	fn as_bytes(&self) -> &[u8] { String::as_bytes(self) }
}

impl ByteSource for Bytes {
	fn as_bytes(&self) -> &[u8] { self }
}

impl ByteSource for BytesMut {
	fn as_bytes(&self) -> &[u8] { self }
}

impl ByteSource for Buffer {
	fn as_bytes(&self) -> &[u8] { self }
}

impl ByteSource for BufView<'_> {
	fn as_bytes(&self) -> &[u8] { BufView::as_bytes(self) }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
	fn reported_len(&self) -> Option<usize> { (**self).reported_len() }
	fn as_bytes(&self) -> &[u8] { (**self).as_bytes() }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
	fn reported_len(&self) -> Option<usize> { (**self).reported_len() }
	fn as_bytes(&self) -> &[u8] { (**self).as_bytes() }
}

/// Owned, contiguous buffer handed to the caller by the assembler.
///
/// Allocated once at its final size. The caller may mutate it in place
/// (see [`crate::reverse_in_place`]) or [`freeze`](Buffer::freeze) it into a
/// cheaply cloneable [`Bytes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer(BytesMut);

impl Buffer {
	/// Zero-length buffer.
	pub fn new() -> Self { Self(BytesMut::new()) }

	pub(crate) fn from_bytes_mut(inner: BytesMut) -> Self { Self(inner) }

	/// Number of bytes held.
	#[inline]
	pub fn len(&self) -> usize { self.0.len() }

	/// True for a zero-length buffer.
	#[inline]
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	/// Mutable access to the bytes; the length stays fixed.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [u8] { &mut self.0 }

	/// Borrowed view over the whole buffer.
	pub fn view(&self) -> BufView<'_> { BufView::new(&self.0) }

	/// Convert into immutable shared bytes without copying.
	pub fn freeze(self) -> Bytes { self.0.freeze() }

	/// Give back the underlying `BytesMut`.
	pub fn into_inner(self) -> BytesMut { self.0 }

	/// Copy out into a plain vector.
	pub fn to_vec(&self) -> Vec<u8> { self.0.to_vec() }
}

impl Deref for Buffer {
	type Target = [u8];
	fn deref(&self) -> &[u8] { &self.0 }
}

impl DerefMut for Buffer {
	fn deref_mut(&mut self) -> &mut [u8] { &mut self.0 }
}

impl AsRef<[u8]> for Buffer {
	fn as_ref(&self) -> &[u8] { &self.0 }
}

impl AsMut<[u8]> for Buffer {
	fn as_mut(&mut self) -> &mut [u8] { &mut self.0 }
}

impl From<Buffer> for Bytes {
	fn from(b: Buffer) -> Self { b.freeze() }
}

impl From<Buffer> for Vec<u8> {
	fn from(b: Buffer) -> Self { b.0.to_vec() }
}

impl From<&[u8]> for Buffer {
	fn from(s: &[u8]) -> Self { Self(BytesMut::from(s)) }
}

impl From<Vec<u8>> for Buffer {
	fn from(v: Vec<u8>) -> Self { Self(BytesMut::from(&v[..])) }
}
