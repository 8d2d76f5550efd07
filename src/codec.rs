//! Bit-exact encoding of the NBT primitives.
//!
//! [`ReadNbt`] and [`WriteNbt`] are extension traits implemented for every
//! [`Read`] and [`Write`] respectively. Each `get_*` reads exactly one value
//! of a primitive type from the current position, and each `put_*` writes
//! one. Nothing here knows about tag names, lists or compounds; that is the
//! job of [`Reader`][`crate::Reader`] and [`Writer`][`crate::Writer`].
//!
//! All multi-byte values are big-endian on the wire:
//!
//! | Type      | Width  | Encoding                                  |
//! |-----------|--------|-------------------------------------------|
//! | Byte      | 1      | signed 8-bit                              |
//! | Short     | 2      | signed 16-bit                             |
//! | Int       | 4      | signed 32-bit                             |
//! | Long      | 8      | signed 64-bit, as two 32-bit halves       |
//! | Float     | 4      | IEEE-754 single                           |
//! | Double    | 8      | IEEE-754 double                           |
//! | String    | 2 + N  | unsigned 16-bit byte length, then bytes   |
//! | ByteArray | 4 + N  | Int element count, then N bytes           |
//! | IntArray  | 4 + 4N | Int element count, then N Ints            |
//! | LongArray | 4 + 8N | Int element count, then N Longs           |
//!
//! ```
//! use nbtree::codec::{ReadNbt, WriteNbt};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let mut buf: Vec<u8> = vec![];
//! buf.put_long(i64::MIN)?;
//! assert_eq!(buf, [0x80, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(buf.as_slice().get_long()?, i64::MIN);
//! # Ok(())
//! # }
//! ```

use std::convert::TryFrom;
use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::{StringEncoding, Tag};

/// Reinterpret the low `bits` bits of `value` as a two's complement signed
/// integer. Values at or above `2^(bits-1)` come back negative, having had
/// `2^bits` subtracted.
///
/// `bits` must be in `1..=64`.
///
/// ```
/// # use nbtree::codec::unsigned_to_signed;
/// assert_eq!(unsigned_to_signed(0xFFFF, 16), -1);
/// assert_eq!(unsigned_to_signed(0x7FFF, 16), 32767);
/// assert_eq!(unsigned_to_signed(u64::MAX, 64), -1);
/// ```
pub fn unsigned_to_signed(value: u64, bits: u32) -> i64 {
    debug_assert!((1..=64).contains(&bits));
    let shift = 64 - bits;
    // Arithmetic right shift sign-extends from the top bit of the field.
    ((value << shift) as i64) >> shift
}

/// The inverse of [`unsigned_to_signed`]: negative values have `2^bits` added,
/// and the result is truncated to the low `bits` bits.
///
/// ```
/// # use nbtree::codec::signed_to_unsigned;
/// assert_eq!(signed_to_unsigned(-1, 16), 0xFFFF);
/// assert_eq!(signed_to_unsigned(i64::MIN, 64), 1 << 63);
/// ```
pub fn signed_to_unsigned(value: i64, bits: u32) -> u64 {
    debug_assert!((1..=64).contains(&bits));
    let mask = u64::MAX >> (64 - bits);
    (value as u64) & mask
}

fn checked_len(len: i32, max_len: usize) -> Result<usize> {
    let len = usize::try_from(len)
        .map_err(|_| Error::invalid_data(format!("negative length: {}", len)))?;

    if len > max_len {
        return Err(Error::limit_exceeded(format!(
            "length {} exceeds maximum of {}",
            len, max_len
        )));
    }

    Ok(len)
}

/// Reads NBT primitives from any [`Read`].
///
/// A read that runs out of input part way through a value fails with
/// [`ErrorKind::UnexpectedEof`][`crate::error::ErrorKind::UnexpectedEof`].
/// Short data is never padded.
pub trait ReadNbt: Read {
    fn get_byte(&mut self) -> Result<i8> {
        Ok(self.read_i8()?)
    }

    fn get_short(&mut self) -> Result<i16> {
        let raw = self.read_u16::<BigEndian>()?;
        Ok(unsigned_to_signed(raw.into(), 16) as i16)
    }

    fn get_int(&mut self) -> Result<i32> {
        let raw = self.read_u32::<BigEndian>()?;
        Ok(unsigned_to_signed(raw.into(), 32) as i32)
    }

    fn get_long(&mut self) -> Result<i64> {
        let high = self.read_u32::<BigEndian>()?;
        let low = self.read_u32::<BigEndian>()?;
        Ok(unsigned_to_signed(
            (u64::from(high) << 32) | u64::from(low),
            64,
        ))
    }

    fn get_float(&mut self) -> Result<f32> {
        Ok(self.read_f32::<BigEndian>()?)
    }

    fn get_double(&mut self) -> Result<f64> {
        Ok(self.read_f64::<BigEndian>()?)
    }

    /// Read a tag byte, failing on anything outside the known tags.
    fn get_tag(&mut self) -> Result<Tag> {
        let tag = self.read_u8()?;
        Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    /// Read an Int length prefix. Negative lengths are invalid data.
    fn get_len(&mut self, max_len: usize) -> Result<usize> {
        let len = self.get_int()?;
        checked_len(len, max_len)
    }

    /// Read exactly `len` bytes. The buffer grows with the data actually
    /// read, so a bogus length cannot cause a huge allocation up front.
    fn get_raw(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(Error::unexpected_eof());
        }
        Ok(buf)
    }

    /// Read a length-prefixed string. A zero length returns the empty string
    /// without reading further.
    fn get_string(&mut self, encoding: StringEncoding) -> Result<String> {
        let len = self.read_u16::<BigEndian>()? as usize;
        if len == 0 {
            return Ok(String::new());
        }

        let buf = self.get_raw(len)?;
        encoding.decode(buf)
    }

    fn get_byte_array(&mut self, max_len: usize) -> Result<Vec<i8>> {
        let len = self.get_len(max_len)?;
        let buf = self.get_raw(len)?;
        Ok(buf.into_iter().map(|b| b as i8).collect())
    }

    fn get_int_array(&mut self, max_len: usize) -> Result<Vec<i32>> {
        let len = self.get_len(max_len)?;
        let size = len
            .checked_mul(std::mem::size_of::<i32>())
            .ok_or_else(|| Error::limit_exceeded("int array too large"))?;

        let buf = self.get_raw(size)?;
        Ok(buf.chunks_exact(4).map(BigEndian::read_i32).collect())
    }

    fn get_long_array(&mut self, max_len: usize) -> Result<Vec<i64>> {
        let len = self.get_len(max_len)?;
        let size = len
            .checked_mul(std::mem::size_of::<i64>())
            .ok_or_else(|| Error::limit_exceeded("long array too large"))?;

        let buf = self.get_raw(size)?;
        Ok(buf.chunks_exact(8).map(BigEndian::read_i64).collect())
    }
}

impl<R: Read + ?Sized> ReadNbt for R {}

/// Writes NBT primitives to any [`Write`].
///
/// Values that cannot be represented, such as a string longer than 65535
/// bytes once encoded, fail with
/// [`ErrorKind::InvalidInput`][`crate::error::ErrorKind::InvalidInput`]
/// before anything is written for them.
pub trait WriteNbt: Write {
    fn put_byte(&mut self, value: i8) -> Result<()> {
        self.write_i8(value)?;
        Ok(())
    }

    fn put_short(&mut self, value: i16) -> Result<()> {
        let raw = signed_to_unsigned(value.into(), 16) as u16;
        self.write_u16::<BigEndian>(raw)?;
        Ok(())
    }

    fn put_int(&mut self, value: i32) -> Result<()> {
        let raw = signed_to_unsigned(value.into(), 32) as u32;
        self.write_u32::<BigEndian>(raw)?;
        Ok(())
    }

    fn put_long(&mut self, value: i64) -> Result<()> {
        let raw = signed_to_unsigned(value, 64);
        self.write_u32::<BigEndian>((raw >> 32) as u32)?;
        self.write_u32::<BigEndian>(raw as u32)?;
        Ok(())
    }

    fn put_float(&mut self, value: f32) -> Result<()> {
        self.write_f32::<BigEndian>(value)?;
        Ok(())
    }

    fn put_double(&mut self, value: f64) -> Result<()> {
        self.write_f64::<BigEndian>(value)?;
        Ok(())
    }

    fn put_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag.into())?;
        Ok(())
    }

    /// Write an Int length prefix.
    fn put_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::invalid_input(format!("length {} too large for nbt", len)))?;
        self.put_int(len)
    }

    fn put_string(&mut self, value: &str, encoding: StringEncoding) -> Result<()> {
        let bytes = encoding.encode(value);
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::invalid_input(format!(
                "string of {} bytes too long for nbt, maximum is {}",
                bytes.len(),
                u16::MAX
            ))
        })?;

        self.write_u16::<BigEndian>(len)?;
        self.write_all(&bytes)?;
        Ok(())
    }

    fn put_byte_array(&mut self, values: &[i8]) -> Result<()> {
        self.put_len(values.len())?;
        let bytes: Vec<u8> = values.iter().map(|&b| b as u8).collect();
        self.write_all(&bytes)?;
        Ok(())
    }

    fn put_int_array(&mut self, values: &[i32]) -> Result<()> {
        self.put_len(values.len())?;
        for &v in values {
            self.put_int(v)?;
        }
        Ok(())
    }

    fn put_long_array(&mut self, values: &[i64]) -> Result<()> {
        self.put_len(values.len())?;
        for &v in values {
            self.put_long(v)?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> WriteNbt for W {}
