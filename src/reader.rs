use std::convert::TryFrom;
use std::io::Read;

use byteorder::ReadBytesExt;

use crate::codec::ReadNbt;
use crate::error::{Error, Result};
use crate::observe::{Event, Observer};
use crate::{List, Node, ReadOpts, Tag, Value};

// Lists announce their length up front. Never trust it for more than this
// many elements of preallocation.
const MAX_PREALLOC: usize = 1024;

/// Reader builds a [`Node`] tree from any reader of uncompressed NBT data.
///
/// Each tag is a tag byte, a name, then a payload decided by the tag.
/// Compounds read named tags until an End tag, lists read a fixed number of
/// unnamed payloads. Open lists and compounds are kept on a stack of layers,
/// so deeply nested input cannot exhaust the call stack.
///
/// ```
/// use nbtree::{Reader, Value};
///
/// # fn main() -> nbtree::error::Result<()> {
/// let input = [
///     0x0a, 0x00, 0x00, // compound, empty name
///     0x01, 0x00, 0x01, b'b', 0x7f, // byte named "b", 127
///     0x00, // end of compound
/// ];
///
/// let mut reader = Reader::new(&input[..]);
/// let root = reader.read_tag()?.expect("a root tag");
/// assert_eq!(root.get("b").map(|b| b.value()), Some(&Value::Byte(127)));
///
/// // Nothing left, so no further document.
/// assert!(reader.read_tag()?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct Reader<R: Read, O: Observer = ()> {
    reader: R,
    opts: ReadOpts,
    observer: O,
    depth: usize,
}

impl<R: Read> Reader<R> {
    /// Create new reader for the given input. Does not do decompression.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            opts: ReadOpts::default(),
            observer: (),
            depth: 0,
        }
    }
}

impl<R: Read, O: Observer> Reader<R, O> {
    pub fn with_opts(mut self, opts: ReadOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Replace the observer that is told about each tag as it is read.
    pub fn observer<P: Observer>(self, observer: P) -> Reader<R, P> {
        Reader {
            reader: self.reader,
            opts: self.opts,
            observer,
            depth: self.depth,
        }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this reader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read one complete named tag.
    ///
    /// Returns `Ok(None)` if the input is already exhausted, or if the next
    /// tag is an End tag (which is consumed). Any failure part way through
    /// the tag is an error, and nothing of the partially read tag is kept.
    pub fn read_tag(&mut self) -> Result<Option<Node>> {
        self.depth = 0;

        // If we get EOF reading a tag, it means we completed a tag to get
        // here, so this is a natural end of stream.
        let tag = match self.reader.read_u8() {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!("no document: end of input");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let tag = Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))?;
        if tag == Tag::End {
            tracing::debug!("no document: leading end tag");
            return Ok(None);
        }

        let root = self.read_root(tag);
        match &root {
            Ok(node) => {
                tracing::debug!(kind = %node.kind(), name = %node.name(), "read document")
            }
            Err(e) => tracing::debug!(error = %e, "failed to read document"),
        }
        root.map(Some)
    }

    /// Read the payload of a tag of the given kind: everything that follows
    /// the tag byte and name. This is also the whole encoding of a list
    /// element.
    ///
    /// Nested lists and compounds are tracked on the heap rather than by
    /// recursion, so the depth limit is the only bound on nesting.
    pub fn read_payload(&mut self, tag: Tag) -> Result<Value> {
        let depth = self.depth;
        let value = self.read_value(tag);
        self.depth = depth;
        value
    }

    fn read_root(&mut self, tag: Tag) -> Result<Node> {
        let name = self.reader.get_string(self.opts.strings)?;
        self.observe(tag, &name);
        let value = self.read_payload(tag)?;
        Ok(Node::new(name, value))
    }

    fn read_value(&mut self, tag: Tag) -> Result<Value> {
        let mut current = match self.open(tag, String::new())? {
            Opened::Value(_, value) => return Ok(value),
            Opened::Layer(layer) => layer,
        };
        let mut parents: Vec<Layer> = vec![];

        loop {
            match self.next_child(&mut current)? {
                Some((tag, name)) => match self.open(tag, name)? {
                    Opened::Value(name, value) => current.push(name, value),
                    Opened::Layer(child) => {
                        parents.push(std::mem::replace(&mut current, child));
                    }
                },
                None => {
                    self.leave();
                    let (name, value) = current.finish();
                    match parents.pop() {
                        Some(parent) => {
                            current = parent;
                            current.push(name, value);
                        }
                        None => return Ok(value),
                    }
                }
            }
        }
    }

    /// Start reading a payload. Scalars and arrays are read completely, lists
    /// and compounds only as far as their header.
    fn open(&mut self, tag: Tag, name: String) -> Result<Opened> {
        let strings = self.opts.strings;
        let max_len = self.opts.max_seq_len;

        let value = match tag {
            Tag::Byte => Value::Byte(self.reader.get_byte()?),
            Tag::Short => Value::Short(self.reader.get_short()?),
            Tag::Int => Value::Int(self.reader.get_int()?),
            Tag::Long => Value::Long(self.reader.get_long()?),
            Tag::Float => Value::Float(self.reader.get_float()?),
            Tag::Double => Value::Double(self.reader.get_double()?),
            Tag::String => Value::String(self.reader.get_string(strings)?),
            Tag::ByteArray => Value::ByteArray(self.reader.get_byte_array(max_len)?),
            Tag::IntArray => Value::IntArray(self.reader.get_int_array(max_len)?),
            Tag::LongArray => Value::LongArray(self.reader.get_long_array(max_len)?),
            Tag::List => {
                let element = self.reader.get_tag()?;
                let len = self.reader.get_len(max_len)?;

                if element == Tag::End && len > 0 {
                    return Err(Error::invalid_tag(Tag::End.into()));
                }

                self.enter()?;
                return Ok(Opened::Layer(Layer {
                    name,
                    kind: LayerKind::List {
                        element,
                        remaining: len,
                        items: Vec::with_capacity(len.min(MAX_PREALLOC)),
                    },
                }));
            }
            Tag::Compound => {
                self.enter()?;
                return Ok(Opened::Layer(Layer {
                    name,
                    kind: LayerKind::Compound(vec![]),
                }));
            }
            // End tags have no payload.
            Tag::End => return Err(Error::invalid_tag(Tag::End.into())),
        };

        Ok(Opened::Value(name, value))
    }

    /// The kind and name of the next child of an open list or compound, or
    /// `None` once it is complete.
    fn next_child(&mut self, layer: &mut Layer) -> Result<Option<(Tag, String)>> {
        match &mut layer.kind {
            LayerKind::List {
                element, remaining, ..
            } => {
                if *remaining == 0 {
                    return Ok(None);
                }
                *remaining -= 1;
                Ok(Some((*element, String::new())))
            }
            LayerKind::Compound(_) => {
                // Unlike the top level, running out of input here means the
                // End tag is missing.
                let tag = self.reader.get_tag()?;
                if tag == Tag::End {
                    return Ok(None);
                }

                let name = self.reader.get_string(self.opts.strings)?;
                self.observe(tag, &name);
                Ok(Some((tag, name)))
            }
        }
    }

    fn observe(&mut self, kind: Tag, name: &str) {
        tracing::trace!(depth = self.depth, kind = %kind, name = %name, "read tag");
        self.observer.event(&Event::TagRead {
            depth: self.depth,
            kind,
            name,
        });
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.opts.max_depth {
            return Err(Error::limit_exceeded(format!(
                "nbt nested deeper than {}",
                self.opts.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

enum Opened {
    Value(String, Value),
    Layer(Layer),
}

/// A list or compound whose payload is part way through being read.
struct Layer {
    /// Empty for list items.
    name: String,
    kind: LayerKind,
}

enum LayerKind {
    List {
        element: Tag,
        remaining: usize,
        items: Vec<Value>,
    },
    Compound(Vec<Node>),
}

impl Layer {
    fn push(&mut self, name: String, value: Value) {
        match &mut self.kind {
            LayerKind::List { items, .. } => items.push(value),
            LayerKind::Compound(children) => children.push(Node::new(name, value)),
        }
    }

    fn finish(self) -> (String, Value) {
        let value = match self.kind {
            LayerKind::List { element, items, .. } => {
                Value::List(List::from_parts(element, items))
            }
            LayerKind::Compound(children) => Value::Compound(children),
        };
        (self.name, value)
    }
}
