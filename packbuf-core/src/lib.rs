#![forbid(unsafe_code)]

//! Zero-copy buffer assembly and fixed-layout field parsing.
//!
//! The crate does three things with byte buffers:
//!
//! - [`assemble`] concatenates any number of [`ByteSource`]s into one
//!   [`Buffer`] allocated once at its exact final size, copying each byte once.
//! - [`parse_fields`] decodes a [`FieldLayout`] (named fixed-width integers
//!   with an explicit byte order each) from a buffer at a given offset.
//!   [`encode_fields`] writes the same layout back out.
//! - [`reverse_in_place`] reverses a mutable buffer without allocating.
//!
//! ```
//! use packbuf_core::{assemble, parse_fields, ByteOrder, FieldLayout};
//!
//! let buf = assemble(&[&b"\x00\x00\x00\x01"[..], b"\x00\x02", b"\x00\x03"])?;
//! let layout = FieldLayout::builder()
//!     .u32("id", ByteOrder::Big)
//!     .u16("kind", ByteOrder::Big)
//!     .u16("len", ByteOrder::Big)
//!     .build()?;
//! let fields = parse_fields(&buf, &layout, 0)?;
//! assert_eq!(fields.get("kind").and_then(|v| v.as_u64()), Some(2));
//! # Ok::<(), packbuf_core::Error>(())
//! ```

/// Two-pass buffer assembly.
pub mod assembler;
/// TOML configuration.
pub mod config;
/// Error type and result alias.
pub mod error;
/// Field layout descriptions.
pub mod layout;
/// Layout decoding and encoding.
pub mod parse;
/// In-place reversal.
pub mod reverse;
/// Byte sources and the owned buffer.
pub mod source;
/// Borrowed buffer views.
pub mod view;

pub use assembler::{assemble, BufferAssembler};
pub use config::AssemblerConfig;
pub use error::{Error, Result};
pub use layout::{ByteOrder, Encoding, FieldLayout, FieldSpec, LayoutBuilder, SUPPORTED_WIDTHS};
pub use parse::{encode_fields, parse_fields, FieldValue, ParsedFields};
pub use reverse::reverse_in_place;
pub use source::{Buffer, ByteSource};
pub use view::BufView;
