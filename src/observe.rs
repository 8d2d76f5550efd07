//! Diagnostic hooks for watching a tree being read or written.
//!
//! An [`Observer`] is told about each named tag as it is read or written. It
//! only receives borrowed information and cannot alter what is decoded or
//! encoded. Every reader and writer also emits the same information as
//! `tracing` events at `TRACE` level, so an observer is only needed when the
//! caller wants the events in-process.
//!
//! ```
//! use nbtree::observe::Event;
//! use nbtree::{Node, Writer};
//!
//! # fn main() -> nbtree::error::Result<()> {
//! let mut names: Vec<String> = vec![];
//! let mut writer = Writer::new(Vec::<u8>::new()).observer(|e: &Event<'_>| {
//!     names.push(e.name().to_owned());
//! });
//! writer.write_tag(&Node::compound("root", vec![Node::byte("a", 1)]))?;
//! drop(writer);
//!
//! assert_eq!(names, ["root", "a"]);
//! # Ok(())
//! # }
//! ```

use crate::Tag;

/// Something that happened to a named tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A tag was read: its kind byte and name are consumed, the payload is
    /// about to be.
    TagRead {
        depth: usize,
        kind: Tag,
        name: &'a str,
    },
    /// A tag's kind byte and name are about to be written.
    TagWritten {
        depth: usize,
        kind: Tag,
        name: &'a str,
    },
}

impl<'a> Event<'a> {
    /// Nesting depth of the tag. The root tag is at depth zero.
    pub fn depth(&self) -> usize {
        match *self {
            Event::TagRead { depth, .. } | Event::TagWritten { depth, .. } => depth,
        }
    }

    pub fn kind(&self) -> Tag {
        match *self {
            Event::TagRead { kind, .. } | Event::TagWritten { kind, .. } => kind,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Event::TagRead { name, .. } | Event::TagWritten { name, .. } => name,
        }
    }
}

/// Receives [`Event`]s from a [`Reader`][`crate::Reader`] or
/// [`Writer`][`crate::Writer`].
pub trait Observer {
    fn event(&mut self, event: &Event<'_>);
}

/// The default observer, which ignores everything.
impl Observer for () {
    fn event(&mut self, _: &Event<'_>) {}
}

impl<F> Observer for F
where
    F: FnMut(&Event<'_>),
{
    fn event(&mut self, event: &Event<'_>) {
        self(event)
    }
}
