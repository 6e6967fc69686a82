#![allow(
	clippy::unwrap_used,
	clippy::expect_used,
	clippy::panic,
	clippy::uninlined_format_args
)]

//! End-to-end behaviour of assembly, parsing and in-place reversal.

use hex_literal::hex;
use packbuf_core::{
	assemble, parse_fields, reverse_in_place, BufferAssembler, ByteOrder, ByteSource, Error,
	FieldLayout, FieldValue,
};
use proptest::prelude::*;
use tracing_test::traced_test;

fn header_layout() -> FieldLayout {
	FieldLayout::builder()
		.u32("id", ByteOrder::Big)
		.u16("kind", ByteOrder::Big)
		.u16("len", ByteOrder::Big)
		.build()
		.unwrap()
}

#[test]
fn head_data_tail() {
	let buf = assemble(&[&b"HEAD"[..], b"DATA", b"TAIL"]).unwrap();
	assert_eq!(buf.len(), 12);
	assert_eq!(&buf[..], b"HEADDATATAIL");
}

#[test]
fn sixteen_byte_header_decodes_to_one_two_three() {
	let buf = hex!("00000001 00020003 00000000 00000000");
	let fields = parse_fields(&buf, &header_layout(), 0).unwrap();
	let values: Vec<u64> = fields.values().iter().map(|v| v.as_u64().unwrap()).collect();
	assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn parse_boundary_is_exact() {
	let layout = header_layout();
	let buf = [0u8; 16];
	// offset + width == len succeeds, one past fails
	assert!(parse_fields(&buf, &layout, 8).is_ok());
	let err = parse_fields(&buf, &layout, 9).unwrap_err();
	assert!(matches!(err, Error::OutOfBounds { offset: 9, needed: 8, available: 16 }));
}

#[test]
fn alphabet_reverse_prefix() {
	let mut buf = assemble(&[&b"abcdefghijklm"[..], b"nopqrstuvwxyz"]).unwrap();
	reverse_in_place(&mut buf);
	assert_eq!(&buf[..10], b"zyxwvutsrq");
}

#[test]
fn assembled_buffer_freezes_without_copy() {
	let buf = assemble(&["ab".to_string(), "cd".to_string()]).unwrap();
	let frozen = buf.freeze();
	let shared = frozen.clone();
	assert_eq!(frozen.as_ptr(), shared.as_ptr());
	assert_eq!(&shared[..], b"abcd");
}

#[test]
fn views_of_an_assembled_buffer_feed_another_assembly() {
	let buf = assemble(&[&b"HEAD"[..], b"DATA", b"TAIL"]).unwrap();
	let view = buf.view();
	let parts = view.split_lengths(&[4, 4, 4]).unwrap();
	let swapped = assemble(&[parts[2], parts[1], parts[0]]).unwrap();
	assert_eq!(&swapped[..], b"TAILDATAHEAD");
}

#[test]
fn named_layout_from_config() {
	let cfg = packbuf_core::AssemblerConfig::from_toml_str(
		r#"
		[[layouts.rec]]
		name = "count"
		width = 2
		order = "little"

		[[layouts.rec]]
		name = "delta"
		width = 4
		encoding = "signed"
		order = "big"
		"#,
	)
	.unwrap();
	let asm = BufferAssembler::new(cfg);
	let fields = asm.parse_named(&hex!("0a00 fffffff6"), "rec", 0).unwrap();
	assert_eq!(fields.get("count"), Some(FieldValue::Unsigned(10)));
	assert_eq!(fields.get("delta"), Some(FieldValue::Signed(-10)));
	assert!(matches!(asm.parse_named(&[], "nope", 0), Err(Error::Config(_))));
}

#[test]
fn default_assembler_has_no_size_cap() {
	let big = vec![0x5au8; 40 * 1024 * 1024];
	let buf = assemble(&[&big[..], &big[..]]).unwrap();
	assert_eq!(buf.len(), 80 * 1024 * 1024);
	assert_eq!(buf[buf.len() - 1], 0x5a);
}

#[test]
#[traced_test]
fn rejected_assembly_is_logged() {
	let asm = BufferAssembler::new(packbuf_core::AssemblerConfig {
		max_buffer_len: Some(2),
		..Default::default()
	});
	assert!(asm.assemble(&[&b"abc"[..]]).is_err());
	assert!(logs_contain("assembly rejected"));
}

proptest! {
	#[test]
	fn prop_length_is_sum(sources in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..16)) {
		let buf = assemble(&sources).unwrap();
		let expected: usize = sources.iter().map(Vec::len).sum();
		prop_assert_eq!(buf.len(), expected);
	}

	#[test]
	fn prop_split_restores_sources(sources in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..16)) {
		let buf = assemble(&sources).unwrap();
		let lengths: Vec<usize> = sources.iter().map(|s| s.reported_len().unwrap()).collect();
		let parts = buf.view().split_lengths(&lengths).unwrap();
		prop_assert_eq!(parts.len(), sources.len());
		for (part, src) in parts.iter().zip(&sources) {
			prop_assert_eq!(part.as_bytes(), &src[..]);
		}
	}

	#[test]
	fn prop_parse_is_idempotent(data in proptest::collection::vec(any::<u8>(), 16..64), offset in 0usize..8) {
		let layout = header_layout();
		let a = parse_fields(&data, &layout, offset).unwrap();
		let b = parse_fields(&data, &layout, offset).unwrap();
		prop_assert_eq!(a, b);
	}

	#[test]
	fn prop_reverse_twice_is_identity(data in proptest::collection::vec(any::<u8>(), 0..256)) {
		let mut buf = data.clone();
		reverse_in_place(&mut buf);
		reverse_in_place(&mut buf);
		prop_assert_eq!(buf, data);
	}
}
