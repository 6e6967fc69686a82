//! Borrowed, bounds-checked windows into a buffer.
//!
//! A [`BufView`] never copies: it is a `&'a [u8]` plus the offset it was cut
//! at, so error messages can name absolute positions. The borrow checker
//! keeps every view inside the lifetime of the bytes it references.

use std::ops::{Bound, RangeBounds};

use crate::error::{Error, Result};

/// Read-only window over a region of an owned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufView<'a> {
	bytes: &'a [u8],
	base: usize,
}

impl<'a> BufView<'a> {
	/// View over the whole slice.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, base: 0 }
	}

	/// Number of bytes in the window.
	#[inline(always)]
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// True for a zero-length window.
	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Offset of this window inside the view it was cut from.
	pub fn base_offset(&self) -> usize {
		self.base
	}

	/// The referenced bytes, with the full underlying lifetime.
	#[inline(always)]
	pub fn as_bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Narrow the window. Fails with `OutOfBounds` instead of panicking.
	pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<BufView<'a>> {
		let start = match range.start_bound() {
			Bound::Included(&s) => s,
			Bound::Excluded(&s) => s.checked_add(1).ok_or_else(|| Error::out_of_bounds(self.base.saturating_add(s), usize::MAX, self.len()))?,
			Bound::Unbounded => 0,
		};
		let end = match range.end_bound() {
			Bound::Included(&e) => e.checked_add(1).ok_or_else(|| Error::out_of_bounds(self.base.saturating_add(start), usize::MAX, self.len()))?,
			Bound::Excluded(&e) => e,
			Bound::Unbounded => self.len(),
		};
		if start > end || end > self.len() {
			return Err(Error::out_of_bounds(self.base.saturating_add(start), end.saturating_sub(start), self.len()));
		}
		Ok(Self { bytes: &self.bytes[start..end], base: self.base + start })
	}

	/// Split into `[0, mid)` and `[mid, len)`.
	pub fn split_at(&self, mid: usize) -> Result<(BufView<'a>, BufView<'a>)> {
		if mid > self.len() {
			return Err(Error::out_of_bounds(self.base, mid, self.len()));
		}
		let (head, tail) = self.bytes.split_at(mid);
		Ok((
			Self { bytes: head, base: self.base },
			Self { bytes: tail, base: self.base + mid },
		))
	}

	/// Cut consecutive windows of the given lengths. The lengths must cover
	/// the view exactly, so splitting an assembled buffer at its source
	/// lengths gives back each source.
	pub fn split_lengths(&self, lengths: &[usize]) -> Result<Vec<BufView<'a>>> {
		let mut out = Vec::with_capacity(lengths.len());
		let mut rest = *self;
		for &n in lengths {
			let (head, tail) = rest.split_at(n)?;
			out.push(head);
			rest = tail;
		}
		if !rest.is_empty() {
			return Err(Error::invalid_input(format!(
				"lengths cover {} of {} bytes",
				self.len() - rest.len(),
				self.len()
			)));
		}
		Ok(out)
	}
}

impl AsRef<[u8]> for BufView<'_> {
	fn as_ref(&self) -> &[u8] {
		self.bytes
	}
}

impl<'a> From<&'a [u8]> for BufView<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Self::new(bytes)
	}
}
