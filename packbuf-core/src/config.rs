use crate::error::{Error, Result};
use crate::layout::FieldLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

/// Assembler settings: logging level, optional size cap and named layouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssemblerConfig {
	/// One of `trace`, `debug`, `info`, `warn`, `error`.
	pub log_level: String,
	/// Largest buffer `assemble` will allocate, in bytes. `None` means no cap.
	pub max_buffer_len: Option<usize>,
	/// Named layouts, e.g. `[[layouts.header]]` tables in TOML.
	pub layouts: BTreeMap<String, FieldLayout>,
}

impl Default for AssemblerConfig {
	fn default() -> Self {
		Self { log_level: "info".into(), max_buffer_len: None, layouts: BTreeMap::new() }
	}
}

impl AssemblerConfig {
	/// Read, parse and validate a TOML file.
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let data = fs::read_to_string(path)?;
		Self::from_toml_str(&data)
	}

	/// Parse and validate TOML text.
	pub fn from_toml_str(data: &str) -> Result<Self> {
		let cfg: Self = toml::from_str(data).map_err(|e| Error::config(format!("toml parse error: {e}")))?;
		cfg.validate()?;
		Ok(cfg)
	}

	/// Serialize as pretty TOML.
	pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
		let s = toml::to_string_pretty(self).map_err(|e| Error::config(format!("toml serialize error: {e}")))?;
		fs::write(path, s)?;
		Ok(())
	}

	/// Defaults overridden by `PACKBUF_LOG_LEVEL` and `PACKBUF_MAX_BUFFER_LEN`.
	pub fn from_env() -> Result<Self> {
		let mut cfg = Self::default();
		cfg.apply_env()?;
		cfg.validate()?;
		Ok(cfg)
	}

	/// Apply environment overrides on top of the current values.
	pub fn apply_env(&mut self) -> Result<()> {
		if let Ok(v) = std::env::var("PACKBUF_LOG_LEVEL") { self.log_level = v; }
		if let Ok(v) = std::env::var("PACKBUF_MAX_BUFFER_LEN") {
			let cap = v
				.trim()
				.parse()
				.map_err(|e| Error::config(format!("PACKBUF_MAX_BUFFER_LEN: {e}")))?;
			self.max_buffer_len = Some(cap);
		}
		Ok(())
	}

	/// Check log level, size cap and every layout's encodings.
	pub fn validate(&self) -> Result<()> {
		let allowed = ["trace", "debug", "info", "warn", "error"];
		if !allowed.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		if self.max_buffer_len == Some(0) {
			return Err(Error::config("max_buffer_len must be greater than zero"));
		}
		for (name, layout) in &self.layouts {
			layout
				.check_encodings()
				.map_err(|e| Error::config(format!("layout `{name}`: {e}")))?;
		}
		Ok(())
	}

	/// Look up a named layout.
	pub fn layout(&self, name: &str) -> Result<&FieldLayout> {
		self.layouts
			.get(name)
			.ok_or_else(|| Error::config(format!("unknown layout `{name}`")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::ByteOrder;

	#[test]
	fn default_is_valid_and_uncapped() {
		let cfg = AssemblerConfig::default();
		assert!(cfg.validate().is_ok());
		assert_eq!(cfg.max_buffer_len, None);
	}

	#[test]
	fn cap_roundtrips_through_toml() {
		let cfg = AssemblerConfig::from_toml_str("max_buffer_len = 67108864").unwrap();
		assert_eq!(cfg.max_buffer_len, Some(64 * 1024 * 1024));
		let uncapped = toml::to_string_pretty(&AssemblerConfig::default()).unwrap();
		assert!(!uncapped.contains("max_buffer_len"));
	}

	#[test]
	fn layouts_parse_from_toml() {
		let cfg = AssemblerConfig::from_toml_str(r#"
			log_level = "debug"

			[[layouts.header]]
			name = "id"
			width = 4
			order = "big"

			[[layouts.header]]
			name = "len"
			width = 2
			order = "little"
		"#).unwrap();
		assert_eq!(cfg.max_buffer_len, None);
		let l = cfg.layout("header").unwrap();
		assert_eq!(l.total_width(), 6);
		assert_eq!(l.fields()[1].order, ByteOrder::Little);
		assert!(matches!(cfg.layout("missing"), Err(Error::Config(_))));
	}

	#[test]
	fn unsupported_layout_fails_validation() {
		let err = AssemblerConfig::from_toml_str(r#"
			[[layouts.bad]]
			name = "x"
			width = 3
			order = "big"
		"#).unwrap_err();
		assert!(matches!(err, Error::Config(m) if m.contains("bad")));
	}

	#[test]
	fn bad_values_rejected() {
		let cfg = AssemblerConfig { log_level: "loud".into(), ..Default::default() };
		assert!(cfg.validate().is_err());
		let cfg = AssemblerConfig { max_buffer_len: Some(0), ..Default::default() };
		assert!(cfg.validate().is_err());
	}
}
