use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::Tag;

/// A named NBT tag: the root of a document or a child of a compound.
///
/// The tag kind is not stored separately, it is always the kind of the
/// [`Value`], so the two cannot disagree. Nodes are built bottom-up with one
/// constructor per kind:
///
/// ```
/// use nbtree::{Node, Tag, Value};
///
/// # fn main() -> nbtree::error::Result<()> {
/// let level = Node::compound(
///     "Level",
///     vec![
///         Node::long("longTest", i64::MAX),
///         Node::string("stringTest", "HELLO WORLD THIS IS A TEST STRING!"),
///         Node::list(
///             "listTest (long)",
///             Tag::Long,
///             vec![Value::Long(11), Value::Long(12), Value::Long(13)],
///         )?,
///     ],
/// );
///
/// assert_eq!(level.kind(), Tag::Compound);
/// assert_eq!(level.get("longTest").unwrap().value().as_i64(), Some(i64::MAX));
/// assert_eq!(level.get("listTest (long)").unwrap().payload_kind(), Some(Tag::Long));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    name: String,
    value: Value,
}

/// The payload of a tag.
///
/// List elements are `Value`s rather than [`Node`]s: they have no name and
/// their kind is given by the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Vec<Node>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// A homogeneous list of unnamed values.
///
/// Every item has the kind given by [`List::element`]. This is checked when
/// the list is built, so a `List` can always be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    element: Tag,
    items: Vec<Value>,
}

impl List {
    /// Create a list of the given element kind. Fails if any item is of a
    /// different kind, or if there are items and the kind is `End`.
    pub fn new(element: Tag, items: Vec<Value>) -> Result<Self> {
        if element == Tag::End && !items.is_empty() {
            return Err(Error::invalid_input("list of End tags must be empty"));
        }

        if let Some(item) = items.iter().find(|item| item.kind() != element) {
            return Err(mismatch(element, item.kind()));
        }

        Ok(Self { element, items })
    }

    /// An empty list. The game writes empty lists with an element kind of
    /// `End`.
    pub fn empty() -> Self {
        Self {
            element: Tag::End,
            items: vec![],
        }
    }

    /// Decoded lists are homogeneous by construction.
    pub(crate) fn from_parts(element: Tag, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    pub fn element(&self) -> Tag {
        self.element
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item. An empty list with element kind `End` adopts the kind
    /// of the first item pushed.
    pub fn push(&mut self, item: Value) -> Result<()> {
        if self.items.is_empty() && self.element == Tag::End {
            self.element = item.kind();
        } else if item.kind() != self.element {
            return Err(mismatch(self.element, item.kind()));
        }

        self.items.push(item);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn mismatch(expected: Tag, found: Tag) -> Error {
    Error::invalid_input(format!("list of {} cannot hold a {}", expected, found))
}

impl Value {
    /// The tag kind of this value.
    pub fn kind(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&[Node]> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(List, List);
from!(Vec<Node>, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

impl Node {
    /// A node with an arbitrary value. The typed constructors below are
    /// usually clearer.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn byte(name: impl Into<String>, value: i8) -> Self {
        Self::new(name, Value::Byte(value))
    }

    pub fn short(name: impl Into<String>, value: i16) -> Self {
        Self::new(name, Value::Short(value))
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, Value::Int(value))
    }

    pub fn long(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Value::Long(value))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, Value::Float(value))
    }

    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, Value::Double(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::String(value.into()))
    }

    pub fn byte_array(name: impl Into<String>, value: impl Into<Vec<i8>>) -> Self {
        Self::new(name, Value::ByteArray(value.into()))
    }

    pub fn int_array(name: impl Into<String>, value: impl Into<Vec<i32>>) -> Self {
        Self::new(name, Value::IntArray(value.into()))
    }

    pub fn long_array(name: impl Into<String>, value: impl Into<Vec<i64>>) -> Self {
        Self::new(name, Value::LongArray(value.into()))
    }

    /// A list node. Fails if the items are not all of the `element` kind.
    pub fn list(name: impl Into<String>, element: Tag, items: Vec<Value>) -> Result<Self> {
        Ok(Self::new(name, Value::List(List::new(element, items)?)))
    }

    pub fn compound(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(name, Value::Compound(children))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Tag {
        self.value.kind()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// The element kind, if this is a list.
    pub fn payload_kind(&self) -> Option<Tag> {
        self.value.as_list().map(List::element)
    }

    /// The children of a compound, or an empty slice for any other kind.
    pub fn children(&self) -> &[Node] {
        self.value.as_compound().unwrap_or(&[])
    }

    /// The items of a list, or an empty slice for any other kind.
    pub fn items(&self) -> &[Value] {
        self.value.as_list().map(List::items).unwrap_or(&[])
    }

    /// The first direct child of this compound with the given name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Depth-first search for a tag with the given name, starting with this
    /// node itself. Descends into compounds, including compounds held in
    /// lists.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        find_in(&self.value, name)
    }
}

fn find_in<'a>(value: &'a Value, name: &str) -> Option<&'a Node> {
    match value {
        Value::Compound(children) => children.iter().find_map(|c| c.find(name)),
        Value::List(list) => list.iter().find_map(|item| find_in(item, name)),
        _ => None,
    }
}

// Indented dump of the tree, one tag per line, in the style of the NBT
// reference documents:
//
//   TAG_Compound('hello world'): 1 entry
//   {
//     TAG_String('name'): 'Bananrama'
//   }
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, Some(&self.name), &self.value, 0)
    }
}

fn write_tag(
    f: &mut fmt::Formatter<'_>,
    name: Option<&str>,
    value: &Value,
    indent: usize,
) -> fmt::Result {
    write!(f, "{:indent$}{}", "", value.kind(), indent = indent)?;
    match name {
        Some(name) => write!(f, "('{}'): ", name)?,
        None => write!(f, ": ")?,
    }

    match value {
        Value::Byte(v) => writeln!(f, "{}", v),
        Value::Short(v) => writeln!(f, "{}", v),
        Value::Int(v) => writeln!(f, "{}", v),
        Value::Long(v) => writeln!(f, "{}", v),
        Value::Float(v) => writeln!(f, "{}", v),
        Value::Double(v) => writeln!(f, "{}", v),
        Value::String(v) => writeln!(f, "'{}'", v),
        Value::ByteArray(v) => writeln!(f, "[{} bytes]", v.len()),
        Value::IntArray(v) => writeln!(f, "[{} ints]", v.len()),
        Value::LongArray(v) => writeln!(f, "[{} longs]", v.len()),
        Value::List(list) => {
            writeln!(f, "{} entries of type {}", list.len(), list.element())?;
            writeln!(f, "{:indent$}{{", "", indent = indent)?;
            for item in list {
                write_tag(f, None, item, indent + 2)?;
            }
            writeln!(f, "{:indent$}}}", "", indent = indent)
        }
        Value::Compound(children) => {
            let plural = if children.len() == 1 { "entry" } else { "entries" };
            writeln!(f, "{} {}", children.len(), plural)?;
            writeln!(f, "{:indent$}{{", "", indent = indent)?;
            for child in children {
                write_tag(f, Some(&child.name), &child.value, indent + 2)?;
            }
            writeln!(f, "{:indent$}}}", "", indent = indent)
        }
    }
}

#[cfg(feature = "arbitrary1")]
fn arb_value(
    u: &mut arbitrary::Unstructured<'_>,
    tag: Tag,
    depth: usize,
) -> arbitrary::Result<Value> {
    use Value::*;

    // Keep generated trees shallow enough to stay inside the reader's depth
    // limit.
    let tag = match tag {
        Tag::List | Tag::Compound if depth >= 16 => Tag::Byte,
        tag => tag,
    };

    Ok(match tag {
        Tag::End => return Err(arbitrary::Error::IncorrectFormat),
        Tag::Byte => Byte(u.arbitrary()?),
        Tag::Short => Short(u.arbitrary()?),
        Tag::Int => Int(u.arbitrary()?),
        Tag::Long => Long(u.arbitrary()?),
        Tag::Float => Float(u.arbitrary()?),
        Tag::Double => Double(u.arbitrary()?),
        Tag::ByteArray => ByteArray(u.arbitrary()?),
        Tag::String => String(u.arbitrary()?),
        Tag::IntArray => IntArray(u.arbitrary()?),
        Tag::LongArray => LongArray(u.arbitrary()?),
        Tag::List => {
            // Lists need to all be the same type.
            let element: Tag = u.arbitrary()?;
            if element == Tag::End {
                List(crate::List::empty())
            } else {
                let len = u.arbitrary_len::<u8>()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(arb_value(u, element, depth + 1)?);
                }
                // Depth clamping may have substituted Byte for the element.
                let element = items.first().map(Value::kind).unwrap_or(element);
                let list = crate::List::new(element, items)
                    .map_err(|_| arbitrary::Error::IncorrectFormat)?;
                List(list)
            }
        }
        Tag::Compound => {
            let len = u.arbitrary_len::<u8>()?;
            let mut children = Vec::with_capacity(len);
            for _ in 0..len {
                let name: std::string::String = u.arbitrary()?;
                let tag: Tag = u.arbitrary()?;
                let tag = if tag == Tag::End { Tag::Compound } else { tag };
                children.push(Node::new(name, arb_value(u, tag, depth + 1)?));
            }
            Compound(children)
        }
    })
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Node {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let name: String = u.arbitrary()?;
        let tag: Tag = u.arbitrary()?;
        let tag = if tag == Tag::End { Tag::Compound } else { tag };
        Ok(Node::new(name, arb_value(u, tag, 0)?))
    }
}
