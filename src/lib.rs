//! nbtree reads and writes NBT (Named Binary Tag) data as an owned tree of
//! [`Node`]s. NBT is the format *Minecraft: Java Edition* uses to store world
//! data, player inventories and most other save data.
//!
//! * For the tree types and the builder functions, see [`Node`], [`Value`]
//!   and [`List`].
//! * For the wire-level primitives, see the [`codec`] module.
//! * For streaming a tree out of any [`Read`][`std::io::Read`], see
//!   [`Reader`]; for the reverse, see [`Writer`].
//! * For gzip/zlib wrapped files, see the [`compression`] module.
//!
//! ```toml
//! [dependencies]
//! nbtree = "0.1"
//! ```
//!
//! # Quick example
//!
//! ```
//! use nbtree::{from_bytes, to_bytes, Node};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let tree = Node::compound("hello world", vec![Node::string("name", "Bananrama")]);
//! let bytes = to_bytes(&tree)?;
//!
//! assert_eq!(bytes[0], 10); // compound
//! assert_eq!(*bytes.last().unwrap(), 0); // end of the compound
//!
//! let back = from_bytes(&bytes)?.expect("one root tag");
//! assert_eq!(back, tree);
//! assert_eq!(back.find("name").and_then(|n| n.value().as_str()), Some("Bananrama"));
//! # Ok(())
//! # }
//! ```
//!
//! # No document
//!
//! Input that is empty, or that starts with an End tag, is not an error. The
//! read functions return `Ok(None)` for it. Anything else that fails to decode
//! is an [`Error`][`error::Error`]; a partially read tree is never returned.
//!
//! # Decompression
//!
//! The codec itself works on uncompressed bytes. Files written by the game are
//! normally gzip compressed. With the default `compression` feature,
//! [`compression::read_file`] detects and undoes the compression before
//! decoding.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub mod codec;
#[cfg(feature = "compression")]
pub mod compression;
pub mod error;
pub mod observe;

mod node;
mod opts;
mod reader;
mod writer;

pub use node::*;
pub use opts::*;
pub use reader::Reader;
pub use writer::Writer;

#[cfg(test)]
mod test;

use error::Result;
use std::convert::TryFrom;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of unnamed values, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times. The tags are part of the wire format and will not change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tag::End => "TAG_End",
            Tag::Byte => "TAG_Byte",
            Tag::Short => "TAG_Short",
            Tag::Int => "TAG_Int",
            Tag::Long => "TAG_Long",
            Tag::Float => "TAG_Float",
            Tag::Double => "TAG_Double",
            Tag::ByteArray => "TAG_Byte_Array",
            Tag::String => "TAG_String",
            Tag::List => "TAG_List",
            Tag::Compound => "TAG_Compound",
            Tag::IntArray => "TAG_Int_Array",
            Tag::LongArray => "TAG_Long_Array",
        };
        f.write_str(name)
    }
}

/// Decode a single root tag from uncompressed NBT bytes.
///
/// Returns `Ok(None)` if the input holds no document: it is empty or starts
/// with an End tag. Trailing bytes after the root tag are left unread.
pub fn from_bytes(input: &[u8]) -> Result<Option<Node>> {
    from_reader(input)
}

/// Like [`from_bytes`], with the given options.
pub fn from_bytes_with_opts(input: &[u8], opts: ReadOpts) -> Result<Option<Node>> {
    from_reader_with_opts(input, opts)
}

/// Decode a single root tag from a reader of uncompressed NBT data. Does not
/// do decompression, see [`compression`] for that.
pub fn from_reader<R: Read>(reader: R) -> Result<Option<Node>> {
    from_reader_with_opts(reader, ReadOpts::default())
}

/// Like [`from_reader`], with the given options.
pub fn from_reader_with_opts<R: Read>(reader: R, opts: ReadOpts) -> Result<Option<Node>> {
    Reader::new(reader).with_opts(opts).read_tag()
}

/// Encode a tree to uncompressed NBT bytes.
pub fn to_bytes(node: &Node) -> Result<Vec<u8>> {
    to_bytes_with_opts(node, WriteOpts::default())
}

/// Like [`to_bytes`], with the given options.
pub fn to_bytes_with_opts(node: &Node, opts: WriteOpts) -> Result<Vec<u8>> {
    let mut result: Vec<u8> = vec![];
    to_writer_with_opts(&mut result, node, opts)?;
    Ok(result)
}

/// Encode a tree to a writer as uncompressed NBT.
pub fn to_writer<W: Write>(writer: W, node: &Node) -> Result<()> {
    to_writer_with_opts(writer, node, WriteOpts::default())
}

/// Like [`to_writer`], with the given options.
pub fn to_writer_with_opts<W: Write>(writer: W, node: &Node, opts: WriteOpts) -> Result<()> {
    let mut writer = Writer::new(writer).with_opts(opts);
    writer.write_tag(node)?;
    writer.flush()
}
