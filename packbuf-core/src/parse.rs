//! Field extraction from, and header encoding into, fixed binary layouts.

use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::layout::{ByteOrder, Encoding, FieldLayout, FieldSpec};
use crate::source::Buffer;

/// Decoded value of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// From an unsigned field.
	Unsigned(u64),
	/// From a signed field.
	Signed(i64),
}

impl FieldValue {
	/// The value as `u64`, if it is unsigned or a non-negative signed value.
	pub fn as_u64(&self) -> Option<u64> {
		match *self {
			FieldValue::Unsigned(v) => Some(v),
			FieldValue::Signed(v) => u64::try_from(v).ok(),
		}
	}

	/// The value as `i64`, if it fits.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			FieldValue::Unsigned(v) => i64::try_from(v).ok(),
			FieldValue::Signed(v) => Some(v),
		}
	}
}

impl From<u64> for FieldValue {
	fn from(v: u64) -> Self { FieldValue::Unsigned(v) }
}

impl From<i64> for FieldValue {
	fn from(v: i64) -> Self { FieldValue::Signed(v) }
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Unsigned(v) => write!(f, "{v}"),
			FieldValue::Signed(v) => write!(f, "{v}"),
		}
	}
}

/// Result of [`parse_fields`]: one entry per layout field, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFields {
	entries: Vec<(String, FieldValue)>,
}

impl ParsedFields {
	/// Value of the named field.
	pub fn get(&self, name: &str) -> Option<FieldValue> {
		self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
	}

	/// Number of decoded fields.
	pub fn len(&self) -> usize { self.entries.len() }

	/// True when the layout had no fields.
	pub fn is_empty(&self) -> bool { self.entries.is_empty() }

	/// `(name, value)` pairs in layout order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> + '_ {
		self.entries.iter().map(|(n, v)| (n.as_str(), *v))
	}

	/// Decoded values in layout order, without names.
	pub fn values(&self) -> Vec<FieldValue> {
		self.entries.iter().map(|(_, v)| *v).collect()
	}

	/// Drop ordering and index by name.
	pub fn into_map(self) -> HashMap<String, FieldValue> {
		self.entries.into_iter().collect()
	}
}

impl Serialize for ParsedFields {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
		use serde::ser::SerializeMap;
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (name, value) in &self.entries {
			map.serialize_entry(name, value)?;
		}
		map.end()
	}
}

/// Decode `layout` from `buffer` starting at `offset`.
///
/// Fails with `UnsupportedEncoding` if any field width is outside
/// {1, 2, 4, 8}, and with `OutOfBounds` unless
/// `offset + layout.total_width() <= buffer.len()`. Nothing is read before
/// both checks pass.
pub fn parse_fields(buffer: &[u8], layout: &FieldLayout, offset: usize) -> Result<ParsedFields> {
	layout.check_encodings()?;
	let needed = layout.total_width();
	let end = offset
		.checked_add(needed)
		.ok_or_else(|| Error::out_of_bounds(offset, needed, buffer.len()))?;
	if end > buffer.len() {
		return Err(Error::out_of_bounds(offset, needed, buffer.len()));
	}

	let mut cursor = &buffer[offset..end];
	let mut entries = Vec::with_capacity(layout.len());
	for spec in layout.fields() {
		let value = decode_field(&mut cursor, spec);
		trace!(field = %spec.name, width = spec.width, %value, "decoded field");
		entries.push((spec.name.clone(), value));
	}
	debug!(fields = entries.len(), offset, bytes = needed, "parsed layout");
	Ok(ParsedFields { entries })
}

// Width was validated by `check_encodings`; `cursor` holds at least `spec.width` bytes.
fn decode_field(cursor: &mut &[u8], spec: &FieldSpec) -> FieldValue {
	use ByteOrder::{Big, Little};
	match spec.encoding {
		Encoding::Unsigned => FieldValue::Unsigned(match (spec.width, spec.order) {
			(1, _) => u64::from(cursor.get_u8()),
			(2, Big) => u64::from(cursor.get_u16()),
			(2, Little) => u64::from(cursor.get_u16_le()),
			(4, Big) => u64::from(cursor.get_u32()),
			(4, Little) => u64::from(cursor.get_u32_le()),
			(_, Big) => cursor.get_u64(),
			(_, Little) => cursor.get_u64_le(),
		}),
		Encoding::Signed => FieldValue::Signed(match (spec.width, spec.order) {
			(1, _) => i64::from(cursor.get_i8()),
			(2, Big) => i64::from(cursor.get_i16()),
			(2, Little) => i64::from(cursor.get_i16_le()),
			(4, Big) => i64::from(cursor.get_i32()),
			(4, Little) => i64::from(cursor.get_i32_le()),
			(_, Big) => cursor.get_i64(),
			(_, Little) => cursor.get_i64_le(),
		}),
	}
}

/// Encode `values` into a fresh buffer of exactly `layout.total_width()`
/// bytes. Values are looked up by field name.
pub fn encode_fields(layout: &FieldLayout, values: &HashMap<String, FieldValue>) -> Result<Buffer> {
	layout.check_encodings()?;
	let mut out = BytesMut::with_capacity(layout.total_width());
	for spec in layout.fields() {
		let value = values
			.get(&spec.name)
			.ok_or_else(|| Error::invalid_input(format!("no value for field `{}`", spec.name)))?;
		encode_field(&mut out, spec, *value)?;
	}
	debug_assert_eq!(out.len(), layout.total_width());
	Ok(Buffer::from_bytes_mut(out))
}

fn encode_field(out: &mut BytesMut, spec: &FieldSpec, value: FieldValue) -> Result<()> {
	use ByteOrder::{Big, Little};
	let too_wide = || Error::invalid_input(format!("value {value} does not fit field `{}` ({} bytes)", spec.name, spec.width));
	match (spec.encoding, value) {
		(Encoding::Unsigned, FieldValue::Unsigned(v)) => match (spec.width, spec.order) {
			(1, _) => out.put_u8(u8::try_from(v).map_err(|_| too_wide())?),
			(2, Big) => out.put_u16(u16::try_from(v).map_err(|_| too_wide())?),
			(2, Little) => out.put_u16_le(u16::try_from(v).map_err(|_| too_wide())?),
			(4, Big) => out.put_u32(u32::try_from(v).map_err(|_| too_wide())?),
			(4, Little) => out.put_u32_le(u32::try_from(v).map_err(|_| too_wide())?),
			(_, Big) => out.put_u64(v),
			(_, Little) => out.put_u64_le(v),
		},
		(Encoding::Signed, FieldValue::Signed(v)) => match (spec.width, spec.order) {
			(1, _) => out.put_i8(i8::try_from(v).map_err(|_| too_wide())?),
			(2, Big) => out.put_i16(i16::try_from(v).map_err(|_| too_wide())?),
			(2, Little) => out.put_i16_le(i16::try_from(v).map_err(|_| too_wide())?),
			(4, Big) => out.put_i32(i32::try_from(v).map_err(|_| too_wide())?),
			(4, Little) => out.put_i32_le(i32::try_from(v).map_err(|_| too_wide())?),
			(_, Big) => out.put_i64(v),
			(_, Little) => out.put_i64_le(v),
		},
		(enc, _) => {
			return Err(Error::invalid_input(format!(
				"field `{}` is {enc} but value {value} has the other signedness",
				spec.name
			)))
		}
	}
	Ok(())
}
