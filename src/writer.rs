use std::io::Write;

use crate::codec::WriteNbt;
use crate::error::{Error, Result};
use crate::observe::{Event, Observer};
use crate::{Node, Tag, Value, WriteOpts};

/// Writer encodes [`Node`] trees as uncompressed NBT to any writer.
///
/// Open lists and compounds are kept on a stack of layers rather than by
/// recursion. The first failure stops the write and is returned. The
/// underlying writer may have received part of the tree by then.
pub struct Writer<W: Write, O: Observer = ()> {
    writer: W,
    opts: WriteOpts,
    observer: O,
    depth: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            opts: WriteOpts::default(),
            observer: (),
            depth: 0,
        }
    }
}

impl<W: Write, O: Observer> Writer<W, O> {
    pub fn with_opts(mut self, opts: WriteOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Replace the observer that is told about each tag as it is written.
    pub fn observer<P: Observer>(self, observer: P) -> Writer<W, P> {
        Writer {
            writer: self.writer,
            opts: self.opts,
            observer,
            depth: self.depth,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Write a complete named tag: tag byte, name and payload.
    pub fn write_tag(&mut self, node: &Node) -> Result<()> {
        self.write_header(node)?;
        self.write_payload(node.value())
    }

    /// Write just the payload of a value, as it appears after a tag's name or
    /// as an element of a list.
    ///
    /// Nesting deeper than [`WriteOpts::max_depth`] fails with
    /// [`ErrorKind::LimitExceeded`][`crate::error::ErrorKind::LimitExceeded`].
    pub fn write_payload(&mut self, value: &Value) -> Result<()> {
        let depth = self.depth;
        let written = self.write_value(value);
        self.depth = depth;
        written
    }

    fn write_header(&mut self, node: &Node) -> Result<()> {
        let kind = node.kind();

        tracing::trace!(depth = self.depth, kind = %kind, name = %node.name(), "write tag");
        self.observer.event(&Event::TagWritten {
            depth: self.depth,
            kind,
            name: node.name(),
        });

        self.writer.put_tag(kind)?;
        self.writer.put_string(node.name(), self.opts.strings)
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        let mut layers: Vec<Layer<'_>> = vec![];
        if let Some(layer) = self.open(value)? {
            layers.push(layer);
        }

        while let Some(layer) = layers.last_mut() {
            let next = match layer {
                Layer::List(element, items) => match items.next() {
                    Some(item) if item.kind() != *element => {
                        return Err(Error::invalid_input(format!(
                            "list of {} holds a {}",
                            element,
                            item.kind()
                        )));
                    }
                    item => item,
                },
                Layer::Compound(children) => match children.next() {
                    Some(child) => {
                        self.write_header(child)?;
                        Some(child.value())
                    }
                    None => {
                        // End tags have no name or payload.
                        self.writer.put_tag(Tag::End)?;
                        None
                    }
                },
            };

            match next {
                Some(value) => {
                    if let Some(layer) = self.open(value)? {
                        layers.push(layer);
                    }
                }
                None => {
                    layers.pop();
                    self.depth -= 1;
                }
            }
        }

        Ok(())
    }

    /// Write a scalar or array completely, or the header of a list. Lists
    /// and compounds are returned so their contents can be written next.
    fn open<'a>(&mut self, value: &'a Value) -> Result<Option<Layer<'a>>> {
        match value {
            Value::Byte(v) => self.writer.put_byte(*v)?,
            Value::Short(v) => self.writer.put_short(*v)?,
            Value::Int(v) => self.writer.put_int(*v)?,
            Value::Long(v) => self.writer.put_long(*v)?,
            Value::Float(v) => self.writer.put_float(*v)?,
            Value::Double(v) => self.writer.put_double(*v)?,
            Value::String(v) => self.writer.put_string(v, self.opts.strings)?,
            Value::ByteArray(v) => self.writer.put_byte_array(v)?,
            Value::IntArray(v) => self.writer.put_int_array(v)?,
            Value::LongArray(v) => self.writer.put_long_array(v)?,
            Value::List(list) => {
                self.enter()?;
                self.writer.put_tag(list.element())?;
                self.writer.put_len(list.len())?;
                return Ok(Some(Layer::List(list.element(), list.iter())));
            }
            Value::Compound(children) => {
                self.enter()?;
                return Ok(Some(Layer::Compound(children.iter())));
            }
        }
        Ok(None)
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
}

/// A list or compound whose contents are part way through being written.
enum Layer<'a> {
    List(Tag, std::slice::Iter<'a, Value>),
    Compound(std::slice::Iter<'a, Node>),
}
