#![forbid(unsafe_code)]

//! `packbuf` command line front end.

use anyhow::Context;
use clap::{Parser, Subcommand};
use packbuf_core::{reverse_in_place, AssemblerConfig, BufferAssembler};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "packbuf", version, about = "Assemble, parse and reverse binary buffers")]
struct Cli {
	/// TOML configuration (default: $PACKBUF_CONFIG, else built-in defaults)
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Concatenate files into one output file
	Assemble {
		/// Output path
		#[arg(short, long)]
		output: PathBuf,
		/// Input files, in order
		#[arg(required = true)]
		inputs: Vec<PathBuf>,
	},
	/// Decode a named layout from a file and print the fields as JSON
	Parse {
		/// Layout name from the `layouts` table of the config
		#[arg(long)]
		layout: String,
		/// Byte offset of the first field
		#[arg(long, default_value_t = 0)]
		offset: usize,
		file: PathBuf,
	},
	/// Reverse the bytes of a file
	Reverse {
		file: PathBuf,
		/// Write here instead of rewriting the input
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Config helpers
	Config {
		#[command(subcommand)]
		action: ConfigCmd,
	},
}

#[derive(Debug, Subcommand)]
enum ConfigCmd {
	/// Show the effective configuration as TOML
	Show,
	/// Write a packbuf.toml template
	WriteTemplate {
		/// Destination path (default: ./packbuf.toml)
		#[arg(long)]
		path: Option<PathBuf>,
		/// Overwrite if the file exists
		#[arg(long)]
		force: bool,
	},
}

const TEMPLATE: &str = r#"# packbuf configuration
log_level = "info"
# Largest buffer `assemble` may allocate, in bytes
max_buffer_len = 67108864

# Each layout is an ordered list of fields. `order` is required.
[[layouts.header]]
name = "id"
width = 4
order = "big"

[[layouts.header]]
name = "kind"
width = 2
order = "big"

[[layouts.header]]
name = "len"
width = 2
order = "big"
"#;

fn load_config(path: Option<&Path>) -> anyhow::Result<AssemblerConfig> {
	let path = path
		.map(Path::to_path_buf)
		.or_else(|| std::env::var_os("PACKBUF_CONFIG").map(PathBuf::from));
	let mut cfg = match path {
		Some(p) => AssemblerConfig::load_from_file(&p).with_context(|| format!("loading {}", p.display()))?,
		None => AssemblerConfig::default(),
	};
	cfg.apply_env()?;
	cfg.validate()?;
	Ok(cfg)
}

fn init_tracing(level: &str) {
	// RUST_LOG wins over the configured level
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let cfg = load_config(cli.config.as_deref())?;
	init_tracing(&cfg.log_level);
	debug!(max_buffer_len = cfg.max_buffer_len, layouts = cfg.layouts.len(), "configuration loaded");

	match cli.command {
		Commands::Assemble { output, inputs } => {
			let assembler = BufferAssembler::new(cfg);
			let contents = inputs
				.iter()
				.map(|p| fs::read(p).with_context(|| format!("reading {}", p.display())))
				.collect::<anyhow::Result<Vec<_>>>()?;
			let buf = assembler.assemble(&contents)?;
			fs::write(&output, &buf).with_context(|| format!("writing {}", output.display()))?;
			info!(inputs = inputs.len(), bytes = buf.len(), output = %output.display(), "assembled");
			println!("{}", json!({ "ok": true, "bytes": buf.len(), "output": output.display().to_string() }));
		}
		Commands::Parse { layout, offset, file } => {
			let assembler = BufferAssembler::new(cfg);
			let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
			let fields = assembler.parse_named(&data, &layout, offset)?;
			println!("{}", serde_json::to_string_pretty(&fields)?);
		}
		Commands::Reverse { file, output } => {
			let mut data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
			reverse_in_place(&mut data);
			let dest = output.unwrap_or_else(|| file.clone());
			fs::write(&dest, &data).with_context(|| format!("writing {}", dest.display()))?;
			println!("{}", json!({ "ok": true, "bytes": data.len(), "output": dest.display().to_string() }));
		}
		Commands::Config { action } => match action {
			ConfigCmd::Show => {
				print!("{}", toml::to_string_pretty(&cfg)?);
			}
			ConfigCmd::WriteTemplate { path, force } => {
				let p = path.unwrap_or_else(|| PathBuf::from("packbuf.toml"));
				if p.exists() && !force {
					anyhow::bail!("refusing to overwrite existing file: {} (use --force)", p.display());
				}
				fs::write(&p, TEMPLATE).with_context(|| format!("writing {}", p.display()))?;
				println!("{}", json!({ "ok": true, "path": p.display().to_string() }));
			}
		},
	}
	Ok(())
}
