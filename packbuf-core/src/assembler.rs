//! Single-copy concatenation of byte sources into one owned [`Buffer`].
//!
//! Assembly runs in two passes. The sizing pass asks every source for its
//! length and sums them with checked arithmetic; nothing is allocated if a
//! source cannot describe itself or the total exceeds the configured cap.
//! The copy pass allocates once at the exact total and appends each source
//! at the next unwritten offset, so every byte is copied exactly once.

use bytes::BytesMut;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::AssemblerConfig;
use crate::error::{Error, Result};
use crate::layout::FieldLayout;
use crate::parse::{self, FieldValue, ParsedFields};
use crate::source::{Buffer, ByteSource};

/// Assembles buffers from sources and parses fixed layouts out of them.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads freely.
#[derive(Debug, Clone, Default)]
pub struct BufferAssembler {
	config: AssemblerConfig,
}

impl BufferAssembler {
	/// Assembler using `config`.
	pub fn new(config: AssemblerConfig) -> Self {
		Self { config }
	}

	/// Active configuration.
	pub fn config(&self) -> &AssemblerConfig {
		&self.config
	}

	/// Concatenate `sources` in order into one exactly sized buffer.
	pub fn assemble<S: ByteSource>(&self, sources: &[S]) -> Result<Buffer> {
		let lengths = self.size_sources(sources)?;
		let total: usize = lengths.iter().sum();

		let mut out = BytesMut::with_capacity(total);
		for (idx, (src, &expected)) in sources.iter().zip(&lengths).enumerate() {
			let bytes = src.as_bytes();
			if bytes.len() != expected {
				warn!(source = idx, expected, actual = bytes.len(), "source length changed during assembly");
				return Err(Error::invalid_input(format!(
					"source {idx} reported {expected} bytes but yielded {}",
					bytes.len()
				)));
			}
			out.extend_from_slice(bytes);
		}
		debug_assert_eq!(out.len(), total);
		debug!(sources = sources.len(), total, "assembled buffer");
		Ok(Buffer::from_bytes_mut(out))
	}

	/// Header from `layout` and `values`, followed by `payload` sources.
	pub fn assemble_packet<S: ByteSource>(
		&self,
		layout: &FieldLayout,
		values: &HashMap<String, FieldValue>,
		payload: &[S],
	) -> Result<Buffer> {
		let header = parse::encode_fields(layout, values)?;
		let mut sources: Vec<&dyn ByteSource> = Vec::with_capacity(payload.len() + 1);
		sources.push(&header);
		sources.extend(payload.iter().map(|p| p as &dyn ByteSource));
		self.assemble(&sources)
	}

	/// See [`parse::parse_fields`].
	pub fn parse_fields(&self, buffer: &[u8], layout: &FieldLayout, offset: usize) -> Result<ParsedFields> {
		parse::parse_fields(buffer, layout, offset)
	}

	/// Parse with a layout registered in the configuration.
	pub fn parse_named(&self, buffer: &[u8], layout: &str, offset: usize) -> Result<ParsedFields> {
		parse::parse_fields(buffer, self.config.layout(layout)?, offset)
	}

	// Sizing pass: per-source lengths, validated against overflow and the cap.
	fn size_sources<S: ByteSource>(&self, sources: &[S]) -> Result<Vec<usize>> {
		let mut lengths = Vec::with_capacity(sources.len());
		let mut total = 0usize;
		for (idx, src) in sources.iter().enumerate() {
			let len = src
				.reported_len()
				.ok_or_else(|| Error::invalid_input(format!("source {idx} has no well-defined length")))?;
			total = total
				.checked_add(len)
				.ok_or_else(|| Error::invalid_input("total source length overflows usize"))?;
			lengths.push(len);
		}
		if let Some(max) = self.config.max_buffer_len {
			if total > max {
				warn!(total, max, "assembly rejected");
				return Err(Error::invalid_input(format!("total length {total} exceeds max_buffer_len {max}")));
			}
		}
		Ok(lengths)
	}
}

/// [`BufferAssembler::assemble`] with the default configuration.
pub fn assemble<S: ByteSource>(sources: &[S]) -> Result<Buffer> {
	BufferAssembler::default().assemble(sources)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::ByteOrder;
	use std::cell::Cell;

	#[test]
	fn concatenates_in_order() {
		let buf = assemble(&[&b"HEAD"[..], b"DATA", b"TAIL"]).unwrap();
		assert_eq!(&buf[..], b"HEADDATATAIL");
		assert_eq!(buf.len(), 12);
	}

	#[test]
	fn empty_sequence_yields_empty_buffer() {
		let none: [&[u8]; 0] = [];
		assert!(assemble(&none).unwrap().is_empty());
	}

	#[test]
	fn mixed_sources_via_dyn() {
		let owned = vec![1u8, 2];
		let frozen = bytes::Bytes::from_static(&[3, 4]);
		let srcs: [&dyn ByteSource; 3] = [&owned, &frozen, &[5u8]];
		assert_eq!(&assemble(&srcs).unwrap()[..], &[1, 2, 3, 4, 5]);
	}

	struct Unsized;
	impl ByteSource for Unsized {
		fn reported_len(&self) -> Option<usize> { None }
		fn as_bytes(&self) -> &[u8] { &[] }
	}

	// Reports one length during sizing and yields more bytes afterwards.
	struct Growing { calls: Cell<usize>, data: [u8; 8] }
	impl ByteSource for Growing {
		fn reported_len(&self) -> Option<usize> {
			self.calls.set(self.calls.get() + 1);
			Some(4)
		}
		fn as_bytes(&self) -> &[u8] { &self.data }
	}

	#[test]
	fn ill_defined_length_is_invalid_input() {
		assert!(matches!(assemble(&[Unsized]), Err(Error::InvalidInput(_))));
	}

	#[test]
	fn length_change_between_passes_is_invalid_input() {
		let g = Growing { calls: Cell::new(0), data: [0; 8] };
		let err = assemble(&[&g]).unwrap_err();
		assert!(matches!(err, Error::InvalidInput(m) if m.contains("reported 4")));
		assert_eq!(g.calls.get(), 1);
	}

	#[test]
	fn cap_is_enforced_before_allocation() {
		let asm = BufferAssembler::new(AssemblerConfig { max_buffer_len: Some(8), ..Default::default() });
		assert!(asm.assemble(&[&b"1234"[..], b"5678"]).is_ok());
		assert!(matches!(asm.assemble(&[&b"1234"[..], b"56789"]), Err(Error::InvalidInput(_))));
	}

	#[test]
	fn packet_header_then_payload() {
		let layout = FieldLayout::builder()
			.u16("kind", ByteOrder::Big)
			.u16("len", ByteOrder::Big)
			.build()
			.unwrap();
		let values = HashMap::from([
			("kind".to_string(), FieldValue::Unsigned(1)),
			("len".to_string(), FieldValue::Unsigned(5)),
		]);
		let asm = BufferAssembler::default();
		let pkt = asm.assemble_packet(&layout, &values, &[&b"he"[..], b"llo"]).unwrap();
		assert_eq!(&pkt[..], b"\x00\x01\x00\x05hello");
		let parsed = asm.parse_fields(&pkt, &layout, 0).unwrap();
		assert_eq!(parsed.get("len"), Some(FieldValue::Unsigned(5)));
	}
}
