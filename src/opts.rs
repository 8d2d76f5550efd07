use std::borrow::Cow;

use crate::error::{Error, Result};

/// How strings (tag names and String payloads) are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringEncoding {
    /// Standard UTF-8.
    #[default]
    Utf8,
    /// Java's modified UTF-8 (CESU-8 with an encoded nul), which is what the
    /// game itself writes. Identical to UTF-8 for most text, but differs for
    /// characters outside the basic multilingual plane and for `'\0'`.
    JavaCesu8,
}

impl StringEncoding {
    pub(crate) fn encode<'a>(&self, s: &'a str) -> Cow<'a, [u8]> {
        match self {
            StringEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
            StringEncoding::JavaCesu8 => cesu8::to_java_cesu8(s),
        }
    }

    pub(crate) fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        match self {
            StringEncoding::Utf8 => {
                String::from_utf8(bytes).map_err(|e| Error::nonunicode(e.into_bytes()))
            }
            StringEncoding::JavaCesu8 => match cesu8::from_java_cesu8(&bytes) {
                Ok(s) => Ok(s.into_owned()),
                Err(_) => Err(Error::nonunicode(bytes)),
            },
        }
    }
}

const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for reading NBT. Use [`ReadOpts::new`] and the builder methods.
///
/// ```
/// # use nbtree::{ReadOpts, StringEncoding};
/// let opts = ReadOpts::new()
///     .max_seq_len(1 << 20)
///     .strings(StringEncoding::JavaCesu8);
/// # let _ = opts;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOpts {
    pub(crate) max_seq_len: usize,
    pub(crate) max_depth: usize,
    pub(crate) strings: StringEncoding,
}

impl ReadOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of elements in any list or array. Longer sequences
    /// fail with [`ErrorKind::LimitExceeded`][`crate::error::ErrorKind::LimitExceeded`]
    /// before anything is allocated for them. Unlimited by default.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }

    /// Maximum nesting of lists and compounds. Defaults to 512, which is the
    /// limit the game uses.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    pub fn strings(mut self, value: StringEncoding) -> Self {
        self.strings = value;
        self
    }
}

impl Default for ReadOpts {
    fn default() -> Self {
        Self {
            max_seq_len: usize::MAX,
            max_depth: DEFAULT_MAX_DEPTH,
            strings: StringEncoding::Utf8,
        }
    }
}

/// Options for writing NBT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOpts {
    pub(crate) max_depth: usize,
    pub(crate) strings: StringEncoding,
}

impl WriteOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum nesting of lists and compounds in a tree being written. The
    /// default matches [`ReadOpts`], so anything written with default
    /// options can be read back with them.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    pub fn strings(mut self, value: StringEncoding) -> Self {
        self.strings = value;
        self
    }
}

impl Default for WriteOpts {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strings: StringEncoding::Utf8,
        }
    }
}
