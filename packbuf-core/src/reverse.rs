/// Reverse `buf` in place with two cursors walking inward.
///
/// O(n) swaps, no extra allocation. `&mut` guarantees the caller holds the
/// only reference for the duration of the call.
pub fn reverse_in_place(buf: &mut [u8]) {
	if buf.len() < 2 {
		return;
	}
	let mut lo = 0;
	let mut hi = buf.len() - 1;
	while lo < hi {
		buf.swap(lo, hi);
		lo += 1;
		hi -= 1;
	}
}
