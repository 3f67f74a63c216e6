//! PST encoder: converts a [`Value`] back into PST text.
//!
//! The encoder emits the shortest form that decodes back to the same value:
//!
//! - **Strings** are left bare unless they would re-parse as something else
//!   (a number, a keyword, a bracket, a `key:`, a flag) or would be split by
//!   whitespace. `"` and `\` are always backslash-escaped.
//! - **Maps** are written as `key: value` pairs with no brackets when they can
//!   stand alone, and inside `{{ }}` when they would otherwise merge into a
//!   neighbouring map.
//! - **Arrays** nested anywhere are written inside `{ }`. A top-level array is
//!   bare unless it has exactly one element, which would collapse on decode.
//! - **Flags**: with a [`FlagStyle`] other than `None`, `key: true` entries
//!   are written as `-k` or `--key`.
//!
//! # Example
//! ```
//! use pst_core::{encode, EncodeOptions, FlagStyle, Value};
//!
//! let value: Value = [("verbose", Value::Bool(true)), ("out", Value::from("a b"))]
//!     .into_iter()
//!     .collect();
//! let options = EncodeOptions::new().with_flags(FlagStyle::Both);
//! assert_eq!(encode(&value, &options), b"--verbose out: \"a b\"");
//! ```

use crate::escape::{escape_name, is_reserved, is_unprintable};
use crate::tokenizer::{has_whitespace, parse_literal};
use crate::types::{Map, Value};

/// Indentation unit for pretty-printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Tab,
    Spaces(usize),
}

impl Indent {
    fn unit(self) -> Vec<u8> {
        match self {
            Indent::Tab => b"\t".to_vec(),
            Indent::Spaces(n) => vec![b' '; n],
        }
    }
}

/// Which `key: true` entries are written as flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagStyle {
    /// Always `key: true`.
    #[default]
    None,
    /// `-k` for single-character keys, `--key` for longer ones.
    Both,
    /// Only `-k`, for single-character keys.
    Short,
    /// Only `--key`, for every key.
    Long,
}

/// Configuration for [`encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Put every array element and map entry on its own line, nesting with
    /// this unit. `None` joins all words with single spaces.
    pub indent: Option<Indent>,
    pub flags: FlagStyle,
    /// Write control and non-ASCII bytes as `\n`-style or three-digit octal
    /// escapes instead of raw bytes, so the output is plain ASCII.
    pub escape: bool,
    /// Bracket every container, even where the brackets could be omitted.
    pub explicit: bool,
}

impl EncodeOptions {
    /// Default options: one line, no flags, raw bytes, minimal brackets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed with a tab per nesting level.
    pub fn pretty() -> Self {
        Self {
            indent: Some(Indent::Tab),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FlagStyle) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }
}

/// Encode a value as PST.
///
/// A root `none` encodes to empty output, which decodes back to `none`.
pub fn encode(value: &Value, options: &EncodeOptions) -> Vec<u8> {
    let mut encoder = Encoder {
        options,
        writer: Writer::new(options.indent),
    };
    encoder.encode_root(value);
    encoder.writer.out
}

/// Encode a string as one PST word, quoting and escaping only as needed.
///
/// ```
/// use pst_core::encode_str;
///
/// assert_eq!(encode_str(b"hello", false), b"hello");
/// assert_eq!(encode_str(b"123", false), b"\"123\"");
/// assert_eq!(encode_str(b"a\"b", false), b"\"a\\\"b\"");
/// assert_eq!(encode_str(b"", false), b"\"\"");
/// ```
pub fn encode_str(s: &[u8], escape: bool) -> Vec<u8> {
    let quote = needs_quotes(s);
    let mut out = Vec::with_capacity(s.len() + 2);
    if quote {
        out.push(b'"');
    }
    push_escaped(&mut out, s, escape);
    if quote {
        out.push(b'"');
    }
    out
}

/// Determine if a string must be quoted to decode back as the same string.
///
/// A string must be quoted if it:
/// - Is empty (otherwise it would vanish)
/// - Is a bracket or keyword (`{ } {{ }} true false none`)
/// - Ends with `:` (would become a key) or starts with `-` (would become flags)
/// - Parses as a number
/// - Contains whitespace or `"`
fn needs_quotes(s: &[u8]) -> bool {
    s.is_empty()
        || is_reserved(s)
        || s.ends_with(b":")
        || s.starts_with(b"-")
        || parse_literal(s).is_some()
        || s.contains(&b'"')
        || has_whitespace(s)
}

/// Append `s` with `"` and `\` escaped, and control and non-ASCII bytes
/// escaped when `escape` is set.
fn push_escaped(out: &mut Vec<u8>, s: &[u8], escape: bool) {
    for &b in s {
        match b {
            b'"' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            _ if escape && is_unprintable(b) => {
                out.push(b'\\');
                match escape_name(b) {
                    Some(name) => out.push(name),
                    // Always three digits, so a following digit is not absorbed.
                    None => out.extend_from_slice(format!("{:03o}", b).as_bytes()),
                }
            }
            _ => out.push(b),
        }
    }
}

/// Encode a map key as a `key:` word.
fn encode_key(key: &[u8], escape: bool) -> Vec<u8> {
    let quote = key.is_empty() || has_whitespace(key);
    let mut out = Vec::with_capacity(key.len() + 3);
    if quote {
        out.push(b'"');
    }
    push_escaped(&mut out, key, escape);
    if quote {
        out.push(b'"');
    }
    out.push(b':');
    out
}

/// Format a float so it always re-parses as a float: `1.0`, not `1`.
fn format_float(f: f64) -> String {
    format!("{:?}", f)
}

/// A character usable in `-k`: it must not turn the word into a number, a
/// key, a long flag or an escape.
fn is_short_flag_char(b: u8) -> bool {
    b.is_ascii_graphic() && !b.is_ascii_digit() && !matches!(b, b'"' | b'\\' | b':' | b'-')
}

/// A name usable in `--name` without quoting or escaping.
fn is_long_flag_name(name: &[u8]) -> bool {
    !name.is_empty()
        && !name.ends_with(b":")
        && name
            .iter()
            .all(|&b| b != b'"' && b != b'\\' && !is_unprintable(b) && b != b' ')
}

/// Word joiner. Tracks nesting depth for pretty output.
struct Writer {
    out: Vec<u8>,
    indent: Option<Vec<u8>>,
    depth: usize,
    /// True right after a line break, so the next word needs no separator.
    line_start: bool,
}

impl Writer {
    fn new(indent: Option<Indent>) -> Self {
        Self {
            out: Vec::new(),
            indent: indent.map(Indent::unit),
            depth: 0,
            line_start: true,
        }
    }

    /// Start a new element or map entry: a new line when pretty-printing.
    fn item(&mut self) {
        if self.out.is_empty() {
            return;
        }
        if let Some(unit) = &self.indent {
            self.out.push(b'\n');
            for _ in 0..self.depth {
                self.out.extend_from_slice(unit);
            }
            self.line_start = true;
        }
    }

    fn word(&mut self, word: &[u8]) {
        if !self.line_start && !self.out.is_empty() {
            self.out.push(b' ');
        }
        self.out.extend_from_slice(word);
        self.line_start = false;
    }

    fn open(&mut self, bracket: &[u8]) {
        self.word(bracket);
        self.depth += 1;
    }

    fn close(&mut self, bracket: &[u8]) {
        self.depth -= 1;
        self.item();
        self.word(bracket);
    }
}

struct Encoder<'a> {
    options: &'a EncodeOptions,
    writer: Writer,
}

impl Encoder<'_> {
    fn encode_root(&mut self, value: &Value) {
        match value {
            Value::Null => {}
            Value::Array(items) if items.len() > 1 && !self.options.explicit => {
                self.encode_elements(items);
            }
            Value::Map(map) if !map.is_empty() && !self.options.explicit => {
                self.encode_pairs(map);
            }
            _ => self.encode_nested(value),
        }
    }

    /// Elements of an array, in array context.
    fn encode_elements(&mut self, items: &[Value]) {
        let mut after_map = false;
        for item in items {
            match item {
                // A bare map would merge into the map before it.
                Value::Map(map) if !map.is_empty() && !after_map && !self.options.explicit => {
                    self.encode_pairs(map);
                }
                _ => {
                    self.writer.item();
                    self.encode_nested(item);
                }
            }
            after_map = item.is_map();
        }
    }

    fn encode_pairs(&mut self, map: &Map) {
        for (key, value) in map {
            self.writer.item();
            if let Value::Bool(true) = value {
                if let Some(flag) = self.flag(key) {
                    self.writer.word(&flag);
                    continue;
                }
            }
            self.writer.word(&encode_key(key, self.options.escape));
            self.encode_nested(value);
        }
    }

    /// A value that must form a single element: containers get brackets.
    fn encode_nested(&mut self, value: &Value) {
        match value {
            Value::Array(items) if items.is_empty() => {
                self.writer.word(b"{");
                self.writer.word(b"}");
            }
            Value::Array(items) => {
                self.writer.open(b"{");
                self.encode_elements(items);
                self.writer.close(b"}");
            }
            Value::Map(map) if map.is_empty() => {
                self.writer.word(b"{{");
                self.writer.word(b"}}");
            }
            Value::Map(map) => {
                self.writer.open(b"{{");
                self.encode_pairs(map);
                self.writer.close(b"}}");
            }
            Value::Null => self.writer.word(b"none"),
            Value::Bool(true) => self.writer.word(b"true"),
            Value::Bool(false) => self.writer.word(b"false"),
            Value::Int(i) => self.writer.word(i.to_string().as_bytes()),
            Value::Float(f) => self.writer.word(format_float(*f).as_bytes()),
            Value::String(s) => self.writer.word(&encode_str(s, self.options.escape)),
        }
    }

    /// The flag word for `key: true`, if the flag style allows one.
    fn flag(&self, key: &[u8]) -> Option<Vec<u8>> {
        let short = match key {
            [b] if is_short_flag_char(*b) => Some(vec![b'-', *b]),
            _ => None,
        };
        let long = || {
            is_long_flag_name(key).then(|| {
                let mut word = b"--".to_vec();
                word.extend_from_slice(key);
                word
            })
        };
        match self.options.flags {
            FlagStyle::None => None,
            FlagStyle::Short => short,
            FlagStyle::Long => long(),
            FlagStyle::Both => short.or_else(long),
        }
    }
}
