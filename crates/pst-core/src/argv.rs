//! Argument-vector adapter: decode process arguments into positionals and
//! options.
//!
//! Each argument is one word. With the delimiter enabled, the first literal
//! `--` ends PST parsing and every later argument is passed through as a
//! plain string positional.
//!
//! ```rust
//! use pst_core::{decode_argv, ArgvOptions, Value};
//!
//! let args = decode_argv(["build", "-v", "jobs:", "4", "--", "-x"], &ArgvOptions::default());
//! assert_eq!(args.positionals, vec![Value::from("build"), Value::from("-x")]);
//! assert_eq!(args.options.get(b"v".as_slice()), Some(&Value::Bool(true)));
//! assert_eq!(args.options.get(b"jobs".as_slice()), Some(&Value::Int(4)));
//! ```

use crate::decoder::{decode_words, DecodeOptions};
use crate::types::{Map, Value};
use tracing::trace;

/// Options for [`decode_argv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgvOptions {
    /// Stop PST parsing at the first `--` argument.
    pub delimiter: bool,
    /// See [`DecodeOptions::as_text`].
    pub as_text: bool,
}

impl Default for ArgvOptions {
    fn default() -> Self {
        Self {
            delimiter: true,
            as_text: false,
        }
    }
}

impl ArgvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: bool) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_as_text(mut self, as_text: bool) -> Self {
        self.as_text = as_text;
        self
    }
}

/// Decoded command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    /// Non-map values in order, then any arguments after `--`.
    pub positionals: Vec<Value>,
    /// Union of every map in the decoded arguments; later keys win.
    pub options: Map,
}

/// Decode an argument vector.
pub fn decode_argv<I, S>(args: I, options: &ArgvOptions) -> Arguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let args: Vec<S> = args.into_iter().collect();
    let split = if options.delimiter {
        args.iter().position(|a| a.as_ref() == b"--")
    } else {
        None
    };
    let (head, passthrough) = match split {
        Some(at) => (&args[..at], &args[at + 1..]),
        None => (&args[..], &args[args.len()..]),
    };
    trace!(words = head.len(), passthrough = passthrough.len(), "decoding argv");

    let decode_options = DecodeOptions {
        as_text: options.as_text,
    };
    let mut arguments = Arguments::default();
    match decode_words(head, &decode_options) {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Map(map) => arguments.options.extend(map),
                    other => arguments.positionals.push(other),
                }
            }
        }
        Value::Map(map) => arguments.options = map,
        scalar => arguments.positionals.push(scalar),
    }

    arguments.positionals.extend(passthrough.iter().map(|arg| {
        let value = Value::String(arg.as_ref().to_vec());
        if options.as_text {
            value.into_text()
        } else {
            value
        }
    }));
    arguments
}
