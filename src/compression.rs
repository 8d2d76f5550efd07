//! Reading and writing NBT wrapped in gzip or zlib compression.
//!
//! The codec itself only deals with uncompressed bytes. Files saved by the
//! game, such as `level.dat` and player data, are gzip compressed; chunks
//! inside region files are usually zlib compressed. The functions here undo
//! or apply that wrapping around [`from_reader`][`crate::from_reader`] and
//! [`to_writer`][`crate::to_writer`].
//!
//! ```no_run
//! use nbtree::compression::{self, Compression};
//! use nbtree::Node;
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let level = compression::read_file("world/level.dat")?.expect("level.dat has a root tag");
//! println!("{}", level);
//!
//! let copy = Node::compound("", level.children().to_vec());
//! compression::write_file("copy.dat", &copy, Compression::Gzip)?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::bufread::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};

use crate::error::Result;
use crate::{Node, ReadOpts, WriteOpts};

/// Compression wrapped around NBT data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Raw NBT.
    None,
    /// Gzip (RFC 1952), used for whole files.
    Gzip,
    /// Zlib (RFC 1950), used for region file chunks.
    Zlib,
}

impl Compression {
    /// Guess the compression from the first bytes of the data.
    ///
    /// No tag byte is a gzip magic byte. The only tag byte that is also a
    /// valid zlib CMF byte is String (`0x08`, a 256 byte window), which zlib
    /// encoders never produce, so that window size is not treated as zlib.
    pub fn detect(header: &[u8]) -> Compression {
        match header {
            [0x1f, 0x8b, ..] => Compression::Gzip,
            // CMF: deflate with a window of 512 bytes to 32K. FLG makes the
            // pair a multiple of 31.
            [cmf, flg, ..]
                if cmf & 0x0f == 8
                    && (1..=7).contains(&(cmf >> 4))
                    && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0 =>
            {
                Compression::Zlib
            }
            _ => Compression::None,
        }
    }
}

/// Decode a root tag from a reader of possibly compressed NBT, detecting the
/// compression from the data.
pub fn from_reader<R: Read>(reader: R) -> Result<Option<Node>> {
    from_reader_with_opts(reader, ReadOpts::default())
}

/// Like [`from_reader`], with the given options.
pub fn from_reader_with_opts<R: Read>(reader: R, opts: ReadOpts) -> Result<Option<Node>> {
    let mut reader = BufReader::new(reader);
    let mut header = [0u8; 2];
    let len = read_header(&mut reader, &mut header)?;
    let scheme = Compression::detect(&header[..len]);

    tracing::debug!(?scheme, "reading nbt");

    let input = (&header[..len]).chain(reader);
    match scheme {
        Compression::None => crate::from_reader_with_opts(input, opts),
        Compression::Gzip => crate::from_reader_with_opts(GzDecoder::new(input), opts),
        Compression::Zlib => crate::from_reader_with_opts(ZlibDecoder::new(input), opts),
    }
}

/// Fill as much of `header` as the input allows, however few bytes each read
/// returns. Returns the number of bytes read, which is less than the header
/// length only at end of input.
fn read_header<R: Read>(reader: &mut R, header: &mut [u8]) -> Result<usize> {
    let mut len = 0;
    while len < header.len() {
        match reader.read(&mut header[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(len)
}

/// Encode a tree to a writer, compressing it with the given scheme.
pub fn to_writer<W: Write>(writer: W, node: &Node, scheme: Compression) -> Result<()> {
    to_writer_with_opts(writer, node, scheme, WriteOpts::default())
}

/// Like [`to_writer`], with the given options.
pub fn to_writer_with_opts<W: Write>(
    writer: W,
    node: &Node,
    scheme: Compression,
    opts: WriteOpts,
) -> Result<()> {
    tracing::debug!(?scheme, name = %node.name(), "writing nbt");

    match scheme {
        Compression::None => crate::to_writer_with_opts(writer, node, opts),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
            crate::to_writer_with_opts(&mut encoder, node, opts)?;
            encoder.finish()?;
            Ok(())
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(writer, flate2::Compression::default());
            crate::to_writer_with_opts(&mut encoder, node, opts)?;
            encoder.finish()?;
            Ok(())
        }
    }
}

/// Encode a tree to a byte vector, compressing it with the given scheme.
pub fn to_bytes(node: &Node, scheme: Compression) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = vec![];
    to_writer(&mut buf, node, scheme)?;
    Ok(buf)
}

/// Read a root tag from an NBT file, detecting the compression.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<Node>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "failed to open nbt file");
        e
    })?;

    from_reader(file)
}

/// Write a tree to an NBT file, creating or truncating it.
pub fn write_file<P: AsRef<Path>>(path: P, node: &Node, scheme: Compression) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "failed to create nbt file");
        e
    })?;

    let mut writer = BufWriter::new(file);
    to_writer(&mut writer, node, scheme)?;
    writer.flush()?;
    Ok(())
}
