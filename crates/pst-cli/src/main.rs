//! `pst` CLI: decode PST from arguments or stdin to JSON, encode JSON to PST.
//!
//! ## Usage
//!
//! ```sh
//! # Decode the command line itself
//! pst args -- name: Alice -v tags: { a b }
//! # {"name":"Alice","v":true,"tags":["a","b"]}
//!
//! # Split into positionals and options; everything after a second `--` is verbatim
//! pst args --split -- build -j 4 -- -not-a-flag
//!
//! # Decode stdin (or a file) to JSON
//! echo 'a: 1 b: { 2 3 }' | pst decode
//!
//! # Encode JSON to PST, pretty-printed with flags
//! echo '{"v":true,"out":"a b"}' | pst encode --flags --tab
//! ```
//!
//! Set `PST_LOG=debug` to see ignored brackets and dropped escapes on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pst_core::{ArgvOptions, DecodeOptions, EncodeOptions, FlagStyle, Indent, Value};
use std::ffi::OsString;
use std::io::{self, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pst", version, about = "PST (Plain Structured Text) CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode command-line arguments (one word each) and print JSON
    Args {
        /// Print {"positional": [...], "options": {...}} instead of the decoded value
        #[arg(long)]
        split: bool,
        /// With --split, do not stop PST parsing at `--`
        #[arg(long, requires = "split")]
        no_delimiter: bool,
        /// Arguments to decode
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Decode PST text to JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Encode JSON to PST
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print, indenting nested containers by N spaces
        #[arg(long, value_name = "N", conflicts_with = "tab")]
        indent: Option<usize>,
        /// Pretty-print, indenting nested containers by tabs
        #[arg(long)]
        tab: bool,
        /// Write `key: true` as -k / --key
        #[arg(long, conflicts_with_all = ["short_flags", "long_flags"])]
        flags: bool,
        /// Write `key: true` as -k for single-character keys only
        #[arg(long, conflicts_with = "long_flags")]
        short_flags: bool,
        /// Write `key: true` as --key
        #[arg(long)]
        long_flags: bool,
        /// Escape control and non-ASCII bytes instead of writing them raw
        #[arg(long)]
        escape: bool,
        /// Bracket every array and map
        #[arg(long)]
        explicit: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Args {
            split,
            no_delimiter,
            args,
        } => {
            let words: Vec<&[u8]> = args.iter().map(|a| a.as_encoded_bytes()).collect();
            debug!(count = words.len(), split, "decoding arguments");
            let json = if split {
                let options = ArgvOptions::new()
                    .with_delimiter(!no_delimiter)
                    .with_as_text(true);
                let decoded = pst_core::decode_argv(&words, &options);
                serde_json::json!({
                    "positional": decoded.positionals,
                    "options": Value::Map(decoded.options),
                })
            } else {
                let value = pst_core::decode_words(&words, &DecodeOptions::text());
                serde_json::to_value(&value)?
            };
            let mut out = serde_json::to_vec(&json)?;
            out.push(b'\n');
            write_output(None, &out)?;
        }
        Commands::Decode {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            debug!(bytes = text.len(), "decoding input");
            let value = pst_core::decode_with_options(&text, &DecodeOptions::text());
            let mut out = if pretty {
                serde_json::to_vec_pretty(&value)?
            } else {
                serde_json::to_vec(&value)?
            };
            out.push(b'\n');
            write_output(output.as_deref(), &out)?;
        }
        Commands::Encode {
            input,
            output,
            indent,
            tab,
            flags,
            short_flags,
            long_flags,
            escape,
            explicit,
        } => {
            let json = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_slice(&json).context("Failed to parse JSON input")?;

            let mut options = EncodeOptions::new()
                .with_escape(escape)
                .with_explicit(explicit)
                .with_flags(flag_style(flags, short_flags, long_flags));
            if tab {
                options = options.with_indent(Indent::Tab);
            } else if let Some(n) = indent {
                options = options.with_indent(Indent::Spaces(n));
            }

            let mut out = pst_core::to_vec(&value, &options).context("Failed to encode JSON to PST")?;
            if output.is_none() {
                out.push(b'\n');
            }
            write_output(output.as_deref(), &out)?;
        }
    }

    Ok(())
}

fn flag_style(flags: bool, short_flags: bool, long_flags: bool) -> FlagStyle {
    match (flags, short_flags, long_flags) {
        (true, _, _) => FlagStyle::Both,
        (_, true, _) => FlagStyle::Short,
        (_, _, true) => FlagStyle::Long,
        _ => FlagStyle::None,
    }
}

/// Log to stderr, filtered by `PST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
