//! PST tokenizer: splits a byte buffer into words.
//!
//! A word runs until the next whitespace byte outside double quotes. Quotes
//! are not part of the word; instead every byte carries a *quotation mask*
//! bit recording whether it came from inside quotes (or from a backslash
//! escape). The mask is what lets the decoder tell `"123"` (a string) from
//! `123` (an integer), and `"-x"` (a string) from `-x` (a flag).
//!
//! # Escapes
//!
//! - `\a \b \e \f \n \r \t \v` produce the usual control bytes.
//! - `\` followed by a digit starts an octal escape of up to three digits.
//!   A value that would reach 256 is dropped rather than clamped.
//! - `\` followed by anything else produces that byte literally.

use crate::escape::{is_whitespace, unescape_named, WHITESPACE};
use crate::types::Value;
use tracing::{debug, trace};

/// Per-byte quotation mask of a [`Word`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteMask {
    bits: Vec<bool>,
    /// Set when a quoted byte was produced and later discarded (an octal
    /// escape overflowing 255). The word still counts as quoted.
    dropped_quoted: bool,
}

impl QuoteMask {
    fn push(&mut self, quoted: bool) {
        self.bits.push(quoted);
    }

    fn discard_last(&mut self) {
        if let Some(true) = self.bits.pop() {
            self.dropped_quoted = true;
        }
    }

    /// Whether byte `i` was quoted. Out-of-range positions read as unquoted.
    pub fn is_quoted(&self, i: usize) -> bool {
        self.bits.get(i).copied().unwrap_or(false)
    }

    /// Whether the last byte was quoted.
    pub fn last_quoted(&self) -> bool {
        self.bits.last().copied().unwrap_or(false)
    }

    /// True when no byte of the word was quoted or escaped.
    pub fn is_unquoted(&self) -> bool {
        !self.dropped_quoted && !self.bits.iter().any(|&q| q)
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// One token of PST input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The word's bytes with quotes removed and escapes resolved.
    pub bytes: Vec<u8>,
    pub mask: QuoteMask,
    /// Offset just past the word in the input buffer.
    pub end: usize,
}

impl Word {
    /// True if the word is exactly `token` and entirely unquoted.
    pub fn is_bare(&self, token: &[u8]) -> bool {
        self.bytes == token && self.mask.is_unquoted()
    }

    /// The literal value of this word. See [`classify`].
    pub fn value(&self) -> Value {
        classify(&self.bytes, &self.mask)
    }
}

/// Type a finished word.
///
/// A fully unquoted word is tried as `true`/`false`/`none`, then as an
/// integer, then as a float. Anything else, and any word with at least one
/// quoted byte, is a string.
pub fn classify(bytes: &[u8], mask: &QuoteMask) -> Value {
    if mask.is_unquoted() {
        if let Some(literal) = parse_literal(bytes) {
            return literal;
        }
    }
    Value::String(bytes.to_vec())
}

/// Parse `bytes` as an unquoted literal: keyword, integer or float.
///
/// The encoder quotes exactly the strings for which this returns `Some`.
pub fn parse_literal(bytes: &[u8]) -> Option<Value> {
    match bytes {
        b"true" => return Some(Value::Bool(true)),
        b"false" => return Some(Value::Bool(false)),
        b"none" => return Some(Value::Null),
        _ => {}
    }
    let text = std::str::from_utf8(bytes).ok()?;
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Int(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Some(Value::Float(f));
    }
    None
}

/// Escape state inside a word.
#[derive(Clone, Copy, PartialEq)]
enum Escape {
    None,
    /// Just saw `\`.
    Start,
    /// Inside an octal escape after `n` digits.
    Octal(u8),
}

/// Read the word starting at or after `start`, skipping leading bytes in
/// `whitespace`. Returns `None` once only whitespace remains.
///
/// With an empty `whitespace` set the whole remaining buffer is one word;
/// this is how pre-split command-line arguments are read.
pub fn read_word(input: &[u8], start: usize, whitespace: &[u8]) -> Option<Word> {
    let mut i = start;
    while i < input.len() && whitespace.contains(&input[i]) {
        i += 1;
    }
    if i >= input.len() {
        return None;
    }

    let mut bytes = Vec::new();
    let mut mask = QuoteMask::default();
    let mut escape = Escape::None;
    let mut quote = false;

    while i < input.len() {
        let c = input[i];
        match escape {
            Escape::Start => {
                if c.is_ascii_digit() {
                    bytes.push(c - b'0');
                    escape = Escape::Octal(1);
                } else {
                    bytes.push(unescape_named(c).unwrap_or(c));
                    escape = Escape::None;
                }
                mask.push(true);
            }
            Escape::Octal(digits) => {
                if !c.is_ascii_digit() {
                    // Not part of the escape; rescan it as a normal byte.
                    escape = Escape::None;
                    continue;
                }
                let acc = bytes.last().copied().map_or(0, u32::from) * 8 + u32::from(c - b'0');
                match u8::try_from(acc) {
                    Ok(b) => {
                        if let Some(last) = bytes.last_mut() {
                            *last = b;
                        }
                        escape = if digits >= 2 {
                            Escape::None
                        } else {
                            Escape::Octal(digits + 1)
                        };
                    }
                    Err(_) => {
                        debug!(value = acc, "dropping octal escape above 255");
                        bytes.pop();
                        mask.discard_last();
                        escape = Escape::None;
                    }
                }
            }
            Escape::None => {
                if c == b'"' {
                    quote = !quote;
                } else if c == b'\\' {
                    escape = Escape::Start;
                } else if !quote && whitespace.contains(&c) {
                    break;
                } else {
                    bytes.push(c);
                    mask.push(quote);
                }
            }
        }
        i += 1;
    }

    trace!(word = %String::from_utf8_lossy(&bytes), end = i, "read word");
    Some(Word {
        bytes,
        mask,
        end: i,
    })
}

/// Iterator over the words of a byte buffer.
///
/// ```rust
/// use pst_core::Tokenizer;
///
/// let words: Vec<Vec<u8>> = Tokenizer::new(b"a \"b c\" d").map(|w| w.bytes).collect();
/// assert_eq!(words, vec![b"a".to_vec(), b"b c".to_vec(), b"d".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    whitespace: &'a [u8],
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `input` using the standard PST whitespace set.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_whitespace(input, WHITESPACE)
    }

    /// Tokenize `input` as exactly one word (no whitespace splitting).
    pub fn without_whitespace(input: &'a [u8]) -> Self {
        Self::with_whitespace(input, &[])
    }

    pub fn with_whitespace(input: &'a [u8], whitespace: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            whitespace,
        }
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        let word = read_word(self.input, self.pos, self.whitespace)?;
        self.pos = word.end;
        Some(word)
    }
}

/// True if `bytes` contains a byte that would split it into several words.
pub(crate) fn has_whitespace(bytes: &[u8]) -> bool {
    bytes.iter().any(|&b| is_whitespace(b))
}
