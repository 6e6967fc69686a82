//! Fixed binary layouts: ordered, named, fixed-width integer fields.
//!
//! Every field carries its own byte order. There is no platform default, so
//! a layout read from TOML must spell out `order` for each field:
//!
//! ```toml
//! [[layouts.header]]
//! name = "length"
//! width = 4
//! order = "big"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Widths the integer decoders support.
pub const SUPPORTED_WIDTHS: [usize; 4] = [1, 2, 4, 8];

/// Byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
	/// Most significant byte first (network order).
	Big,
	/// Least significant byte first.
	Little,
}

/// Numeric interpretation of a field's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
	/// Fixed-width unsigned integer.
	#[default]
	Unsigned,
	/// Fixed-width two's complement integer.
	Signed,
}

impl Encoding {
	/// Lowercase name, as written in TOML.
	pub fn as_str(&self) -> &'static str {
		match self {
			Encoding::Unsigned => "unsigned",
			Encoding::Signed => "signed",
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One named field of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
	/// Unique within its layout.
	pub name: String,
	/// Width in bytes.
	pub width: usize,
	/// Defaults to unsigned.
	#[serde(default)]
	pub encoding: Encoding,
	/// Always explicit.
	pub order: ByteOrder,
}

impl FieldSpec {
	/// Field with the given name, width, encoding and byte order.
	pub fn new(name: impl Into<String>, width: usize, encoding: Encoding, order: ByteOrder) -> Self {
		Self { name: name.into(), width, encoding, order }
	}

	/// Reject widths the decoders cannot handle.
	pub fn check_encoding(&self) -> Result<()> {
		if SUPPORTED_WIDTHS.contains(&self.width) {
			Ok(())
		} else {
			Err(Error::UnsupportedEncoding {
				field: self.name.clone(),
				width: self.width,
				encoding: self.encoding.as_str(),
			})
		}
	}
}

/// Ordered list of fields describing a buffer prefix.
///
/// Names are unique. Widths are not checked on construction so that a layout
/// declaring, say, a 3-byte integer can still be built and will be reported
/// as `UnsupportedEncoding` when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldLayout {
	fields: Vec<FieldSpec>,
	total_width: usize,
}

impl FieldLayout {
	/// Layout from fields in order. Fails with `InvalidInput` on duplicate names.
	pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
		let mut seen = HashSet::with_capacity(fields.len());
		let mut total_width = 0usize;
		for f in &fields {
			if !seen.insert(f.name.as_str()) {
				return Err(Error::invalid_input(format!("duplicate field name `{}`", f.name)));
			}
			total_width = total_width
				.checked_add(f.width)
				.ok_or_else(|| Error::invalid_input("layout width overflows usize"))?;
		}
		Ok(Self { fields, total_width })
	}

	/// Start an empty [`LayoutBuilder`].
	pub fn builder() -> LayoutBuilder {
		LayoutBuilder::default()
	}

	/// Fields in declared order.
	pub fn fields(&self) -> &[FieldSpec] {
		&self.fields
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// True for a layout with no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Sum of all field widths: the number of bytes the layout consumes.
	pub fn total_width(&self) -> usize {
		self.total_width
	}

	/// Look a field up by name.
	pub fn field(&self, name: &str) -> Option<&FieldSpec> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Check every field against the supported encodings.
	pub fn check_encodings(&self) -> Result<()> {
		self.fields.iter().try_for_each(FieldSpec::check_encoding)
	}
}

impl TryFrom<Vec<FieldSpec>> for FieldLayout {
	type Error = Error;
	fn try_from(fields: Vec<FieldSpec>) -> Result<Self> {
		Self::new(fields)
	}
}

impl From<FieldLayout> for Vec<FieldSpec> {
	fn from(l: FieldLayout) -> Self {
		l.fields
	}
}

/// Chainable construction of a [`FieldLayout`].
#[derive(Debug, Default, Clone)]
pub struct LayoutBuilder {
	fields: Vec<FieldSpec>,
}

impl LayoutBuilder {
	/// Append a field.
	pub fn field(mut self, name: impl Into<String>, width: usize, encoding: Encoding, order: ByteOrder) -> Self {
		self.fields.push(FieldSpec::new(name, width, encoding, order));
		self
	}

	/// Append an unsigned field.
	pub fn unsigned(self, name: impl Into<String>, width: usize, order: ByteOrder) -> Self {
		self.field(name, width, Encoding::Unsigned, order)
	}

	/// Append a signed field.
	pub fn signed(self, name: impl Into<String>, width: usize, order: ByteOrder) -> Self {
		self.field(name, width, Encoding::Signed, order)
	}

	/// Fixed-width unsigned shorthands.
	pub fn u8(self, name: impl Into<String>) -> Self { self.unsigned(name, 1, ByteOrder::Big) }
	pub fn u16(self, name: impl Into<String>, order: ByteOrder) -> Self { self.unsigned(name, 2, order) }
	pub fn u32(self, name: impl Into<String>, order: ByteOrder) -> Self { self.unsigned(name, 4, order) }
	pub fn u64(self, name: impl Into<String>, order: ByteOrder) -> Self { self.unsigned(name, 8, order) }

	/// Finish; see [`FieldLayout::new`].
	pub fn build(self) -> Result<FieldLayout> {
		FieldLayout::new(self.fields)
	}
}
