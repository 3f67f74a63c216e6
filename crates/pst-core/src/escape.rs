//! Constant tables shared by the tokenizer and the encoder.

/// Bytes that separate words: space, form feed, newline, carriage return,
/// tab, vertical tab.
pub const WHITESPACE: &[u8] = b" \x0c\n\r\t\x0b";

/// Words with grammatical meaning when unquoted. Strings equal to one of
/// these must be quoted on output.
pub const RESERVED: &[&[u8]] = &[b"{", b"}", b"{{", b"}}", b"true", b"false", b"none"];

/// Single-character escapes: `\a \b \e \f \n \r \t \v`.
const NAMED: [(u8, u8); 8] = [
    (b'a', 7),
    (b'b', 8),
    (b'e', 27),
    (b'f', 12),
    (b'n', 10),
    (b'r', 13),
    (b't', 9),
    (b'v', 11),
];

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

pub fn is_reserved(word: &[u8]) -> bool {
    RESERVED.contains(&word)
}

/// Resolve the byte after a backslash through the named escape table.
pub fn unescape_named(c: u8) -> Option<u8> {
    NAMED.iter().find(|(name, _)| *name == c).map(|(_, b)| *b)
}

/// The escape letter for `b`, if it has one (`\n` for 10, ...).
pub fn escape_name(b: u8) -> Option<u8> {
    NAMED.iter().find(|(_, byte)| *byte == b).map(|(name, _)| *name)
}

/// Bytes rendered as escapes when escaping is requested: ASCII control
/// characters, DEL and everything outside ASCII.
#[inline]
pub fn is_unprintable(b: u8) -> bool {
    !(0x20..0x7f).contains(&b)
}

