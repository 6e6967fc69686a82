use thiserror::Error;

/// Crate result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by assembly, parsing and configuration.
#[derive(Debug, Error)]
pub enum Error {
	/// A source or value could not be described consistently.
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// A read or write would leave the buffer extent.
	#[error("out of bounds: need {needed} bytes at offset {offset}, buffer has {available}")]
	OutOfBounds {
		/// Absolute position of the failed access.
		offset: usize,
		/// Bytes the access required.
		needed: usize,
		/// Bytes the buffer or view holds.
		available: usize,
	},
	/// The layout asks for a decoding this crate does not provide.
	#[error("unsupported encoding for field `{field}`: {encoding} with width {width}")]
	UnsupportedEncoding {
		/// Offending field name.
		field: String,
		/// Declared width in bytes.
		width: usize,
		/// Declared encoding.
		encoding: &'static str,
	},
	/// Reading or writing a configuration file failed.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Configuration could not be parsed or failed validation.
	#[error("config: {0}")]
	Config(String),
}

impl Error {
	/// Build an `InvalidInput` error.
	pub fn invalid_input(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }
	/// Build a `Config` error.
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }

	pub(crate) fn out_of_bounds(offset: usize, needed: usize, available: usize) -> Self {
		Self::OutOfBounds { offset, needed, available }
	}
}
