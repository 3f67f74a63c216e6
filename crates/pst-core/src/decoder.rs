//! PST decoder: assembles words into a [`Value`].
//!
//! The assembler is a small stack machine. Containers under construction
//! live in an arena and frames refer to them by index, so a map can sit in
//! its parent array *and* stay open for further `key:` merges without two
//! owners.
//!
//! # Word rules, in priority order
//!
//! 1. `key:`: remember `key`, insert `{key: none}` as a placeholder.
//! 2. `--name`: insert `{name: true}`.
//! 3. `-abc`: insert `{a: true}`, `{b: true}`, `{c: true}`.
//! 4. `{` / `{{`: open an array / explicit map (under the pending key, if any).
//! 5. `}` / `}}`: close the innermost array / explicit map.
//! 6. anything else: a value, stored under the pending key if there is one.
//!
//! Every rule except the first clears the pending key.
//!
//! # Implicit maps
//!
//! Inserting a single-entry map into an array appends it *and* opens an
//! implicit-object frame over it. Later pairs and flags merge into that map
//! until a plain value or a bracket arrives, which is why `a: 1 b: 2` decodes
//! to one map rather than two.
//!
//! # Graceful failure
//!
//! Nothing here returns an error. Stray or mismatched closing brackets are
//! ignored, and values with nowhere to go are dropped.

use crate::tokenizer::{read_word, QuoteMask, Tokenizer, Word};
use crate::types::Value;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Options for [`decode_with_options`] and [`decode_words`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Return strings and keys as valid UTF-8, replacing invalid sequences
    /// with U+FFFD, and split short flags (`-abc`) per character instead of
    /// per byte.
    pub as_text: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for text output (`as_text` set).
    pub fn text() -> Self {
        Self { as_text: true }
    }

    #[must_use]
    pub fn with_as_text(mut self, as_text: bool) -> Self {
        self.as_text = as_text;
        self
    }
}

/// Decode a PST buffer, keeping strings as raw bytes.
///
/// ```rust
/// use pst_core::{decode, Value};
///
/// assert_eq!(decode(b"1 2 3"), Value::Array(vec![1.into(), 2.into(), 3.into()]));
/// assert_eq!(decode(b"\"123\""), Value::from("123"));
/// assert_eq!(decode(b""), Value::Null);
/// ```
pub fn decode(input: &[u8]) -> Value {
    decode_with_options(input, &DecodeOptions::default())
}

/// Decode a PST buffer.
pub fn decode_with_options(input: &[u8], options: &DecodeOptions) -> Value {
    let mut assembler = Assembler::new(options.as_text);
    for word in Tokenizer::new(input) {
        assembler.push(word);
    }
    assembler.finish()
}

/// Decode pre-split words, one word per item, without whitespace splitting.
///
/// This is the argument-vector mode: the operating system has already split
/// the command line, so `"a b"` passed as one argument stays one word. An
/// empty item is the empty string.
pub fn decode_words<I, S>(words: I, options: &DecodeOptions) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut assembler = Assembler::new(options.as_text);
    for item in words {
        let word = read_word(item.as_ref(), 0, &[]).unwrap_or_else(|| Word {
            bytes: Vec::new(),
            mask: QuoteMask::default(),
            end: 0,
        });
        assembler.push(word);
    }
    assembler.finish()
}

type NodeId = usize;

/// An element of a container under construction: either finished, or
/// another arena container.
#[derive(Debug)]
enum Slot {
    Value(Value),
    Node(NodeId),
}

#[derive(Debug)]
enum Node {
    Array(Vec<Slot>),
    Map(IndexMap<Vec<u8>, Slot>),
}

/// An open container on the decode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Array(NodeId),
    /// A map opened by a bare `key:` or flag in array position.
    ImplicitObject(NodeId),
    /// A map opened with `{{`.
    ExplicitObject(NodeId),
}

const ROOT: NodeId = 0;

struct Assembler {
    arena: Vec<Node>,
    stack: Vec<Frame>,
    key: Option<Vec<u8>>,
    as_text: bool,
}

impl Assembler {
    fn new(as_text: bool) -> Self {
        Self {
            arena: vec![Node::Array(Vec::new())],
            stack: vec![Frame::Array(ROOT)],
            key: None,
            as_text,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.arena.push(node);
        self.arena.len() - 1
    }

    fn top(&self) -> Frame {
        // The root frame is never popped.
        self.stack[self.stack.len() - 1]
    }

    fn push(&mut self, word: Word) {
        let value = word.value();
        if let Value::String(text) = &value {
            if text.ends_with(b":") && !word.mask.last_quoted() {
                let key = text[..text.len() - 1].to_vec();
                self.insert_pair(key.clone(), Slot::Value(Value::Null));
                self.key = Some(key);
                return;
            }
            if text.starts_with(b"--") && !word.mask.is_quoted(0) && !word.mask.is_quoted(1) {
                self.insert_pair(text[2..].to_vec(), Slot::Value(Value::Bool(true)));
                self.key = None;
                return;
            }
            if text.starts_with(b"-") && !word.mask.is_quoted(0) {
                for name in self.short_flags(&text[1..]) {
                    self.insert_pair(name, Slot::Value(Value::Bool(true)));
                }
                self.key = None;
                return;
            }
        }

        if word.is_bare(b"{") {
            let id = self.alloc(Node::Array(Vec::new()));
            self.open(id);
            self.stack.push(Frame::Array(id));
            trace!(depth = self.stack.len(), "open array");
        } else if word.is_bare(b"{{") {
            let id = self.alloc(Node::Map(IndexMap::new()));
            self.open(id);
            self.stack.push(Frame::ExplicitObject(id));
            trace!(depth = self.stack.len(), "open explicit object");
        } else if word.is_bare(b"}") {
            self.close(false);
        } else if word.is_bare(b"}}") {
            self.close(true);
        } else {
            match self.key.take() {
                Some(key) => self.insert_pair(key, Slot::Value(value)),
                None => self.insert_value(Slot::Value(value)),
            }
        }
        self.key = None;
    }

    /// Flag names of a `-abc` word: one per byte, or one per character in
    /// text mode.
    fn short_flags(&self, names: &[u8]) -> Vec<Vec<u8>> {
        if self.as_text {
            String::from_utf8_lossy(names)
                .chars()
                .map(|c| c.to_string().into_bytes())
                .collect()
        } else {
            names.iter().map(|&b| vec![b]).collect()
        }
    }

    /// Attach a freshly allocated container to the current frame.
    fn open(&mut self, id: NodeId) {
        match self.key.take() {
            Some(key) => self.insert_pair(key, Slot::Node(id)),
            None => self.insert_value(Slot::Node(id)),
        }
    }

    fn close(&mut self, explicit: bool) {
        while let Frame::ImplicitObject(_) = self.top() {
            self.stack.pop();
        }
        let matches = match self.top() {
            Frame::Array(_) => !explicit,
            Frame::ExplicitObject(_) => explicit,
            Frame::ImplicitObject(_) => false,
        };
        if matches && self.stack.len() > 1 {
            self.stack.pop();
            trace!(depth = self.stack.len(), "close container");
        } else {
            debug!(
                closer = if explicit { "}}" } else { "}" },
                "ignoring unmatched closing bracket"
            );
        }
    }

    /// Insert the single-entry map `{key: slot}` into the current frame.
    fn insert_pair(&mut self, key: Vec<u8>, slot: Slot) {
        match self.top() {
            Frame::ImplicitObject(id) | Frame::ExplicitObject(id) => {
                if let Node::Map(map) = &mut self.arena[id] {
                    map.insert(key, slot);
                }
            }
            Frame::Array(parent) => {
                let mut map = IndexMap::new();
                map.insert(key, slot);
                let id = self.alloc(Node::Map(map));
                if let Node::Array(items) = &mut self.arena[parent] {
                    items.push(Slot::Node(id));
                }
                self.stack.push(Frame::ImplicitObject(id));
            }
        }
    }

    /// Insert a non-map element into the current frame.
    fn insert_value(&mut self, slot: Slot) {
        loop {
            match self.top() {
                Frame::Array(id) => {
                    if let Node::Array(items) = &mut self.arena[id] {
                        items.push(slot);
                    }
                    return;
                }
                Frame::ImplicitObject(_) => {
                    self.stack.pop();
                }
                Frame::ExplicitObject(_) => {
                    debug!("dropping value without a key inside {{{{ }}}}");
                    return;
                }
            }
        }
    }

    /// Materialize the root and apply the collapse rule.
    fn finish(mut self) -> Value {
        let mut items = match self.take(ROOT) {
            Value::Array(items) => items,
            other => vec![other],
        };
        let value = match items.len() {
            0 => Value::Null,
            1 => items.pop().unwrap_or(Value::Null),
            _ => Value::Array(items),
        };
        if self.as_text {
            value.into_text()
        } else {
            value
        }
    }

    fn take(&mut self, id: NodeId) -> Value {
        match std::mem::replace(&mut self.arena[id], Node::Array(Vec::new())) {
            Node::Array(slots) => Value::Array(slots.into_iter().map(|s| self.resolve(s)).collect()),
            Node::Map(slots) => Value::Map(
                slots
                    .into_iter()
                    .map(|(k, s)| (k, self.resolve(s)))
                    .collect(),
            ),
        }
    }

    fn resolve(&mut self, slot: Slot) -> Value {
        match slot {
            Slot::Value(value) => value,
            Slot::Node(id) => self.take(id),
        }
    }
}
