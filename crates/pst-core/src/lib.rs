//! # pst-core
//!
//! Pure-Rust encoder and decoder for **PST (Plain Structured Text)**.
//!
//! PST is a whitespace-delimited notation meant to be typed straight onto a
//! command line or piped as text. The same grammar covers configuration-style
//! `key: value` pairs and command-line style `-x` / `--name` flags, so both
//! decode into one value model.
//!
//! ## Quick start
//!
//! ```rust
//! use pst_core::{decode, encode, EncodeOptions, Value};
//!
//! let value = decode(b"name: Alice scores: { 95 87 92 } -v");
//! assert_eq!(value.get("name"), Some(&Value::from("Alice")));
//! assert_eq!(value.get("v"), Some(&Value::Bool(true)));
//!
//! let text = encode(&value, &EncodeOptions::new());
//! assert_eq!(text, b"name: Alice scores: { 95 87 92 } v: true");
//! assert_eq!(decode(&text), value);
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`]: bytes → words (quote masks, escapes)
//! - [`decoder`]: words → [`Value`] (stack assembler, collapse rules)
//! - [`encoder`]: [`Value`] → bytes (minimal quoting, flags, indentation)
//! - [`argv`]: process arguments → positionals + options
//! - [`ser`]: any `T: Serialize` → [`Value`]
//! - [`escape`]: whitespace, escape and reserved-word tables
//! - [`error`]: error types
//! - [`types`]: the [`Value`] model

pub mod argv;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod ser;
pub mod tokenizer;
pub mod types;

pub use argv::{decode_argv, Arguments, ArgvOptions};
pub use decoder::{decode, decode_with_options, decode_words, DecodeOptions};
pub use encoder::{encode, encode_str, EncodeOptions, FlagStyle, Indent};
pub use error::{PstError, Result};
pub use ser::{to_value, to_vec};
pub use tokenizer::{Tokenizer, Word};
pub use types::{Map, Value};
