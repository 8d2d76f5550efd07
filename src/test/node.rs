use serde_json::json;

use crate::error::{ErrorKind, Result};
use crate::{List, Node, Tag, Value};

#[test]
fn list_rejects_mixed_kinds() {
    let err = List::new(Tag::Int, vec![Value::Int(1), Value::Short(2)]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);

    let err = Node::list("l", Tag::String, vec![Value::Int(1)]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);
}

#[test]
fn list_of_end_must_be_empty() {
    assert!(List::new(Tag::End, vec![]).is_ok());

    let err = List::new(Tag::End, vec![Value::Byte(0)]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);
}

#[test]
fn push_adopts_first_kind() -> Result<()> {
    let mut list = List::empty();
    assert_eq!(list.element(), Tag::End);

    list.push(Value::Double(1.0))?;
    assert_eq!(list.element(), Tag::Double);
    list.push(Value::Double(2.0))?;
    assert_eq!(list.len(), 2);

    let err = list.push(Value::Float(3.0)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);
    assert_eq!(list.len(), 2);

    let mut typed = List::new(Tag::Int, vec![])?;
    assert!(typed.push(Value::Long(1)).is_err());
    Ok(())
}

#[test]
fn get_only_looks_at_direct_children() {
    let tree = Node::compound(
        "root",
        vec![
            Node::int("a", 1),
            Node::compound("inner", vec![Node::int("b", 2)]),
            Node::int("a", 3),
        ],
    );

    assert_eq!(tree.get("a").unwrap().value(), &Value::Int(1));
    assert!(tree.get("b").is_none());
    assert!(tree.get("root").is_none());
    assert!(Node::int("x", 1).get("x").is_none());
}

#[test]
fn find_searches_depth_first() -> Result<()> {
    let tree = Node::compound(
        "root",
        vec![
            Node::compound("first", vec![Node::string("name", "deep")]),
            Node::string("name", "shallow"),
            Node::list(
                "entries",
                Tag::Compound,
                vec![Value::Compound(vec![Node::long("created-on", 42)])],
            )?,
        ],
    );

    assert_eq!(tree.find("root"), Some(&tree));
    assert_eq!(tree.find("name").unwrap().value().as_str(), Some("deep"));
    assert_eq!(tree.find("created-on").unwrap().value().as_i64(), Some(42));
    assert!(tree.find("missing").is_none());
    Ok(())
}

#[test]
fn kinds_and_accessors() -> Result<()> {
    let list = Node::list("l", Tag::Byte, vec![Value::Byte(1), Value::Byte(2)])?;
    assert_eq!(list.kind(), Tag::List);
    assert_eq!(list.payload_kind(), Some(Tag::Byte));
    assert_eq!(list.items(), &[Value::Byte(1), Value::Byte(2)]);
    assert!(list.children().is_empty());

    let compound = Node::compound("c", vec![Node::byte("b", 1)]);
    assert_eq!(compound.payload_kind(), None);
    assert!(compound.items().is_empty());
    assert_eq!(compound.children().len(), 1);

    assert_eq!(Value::Short(-2).as_i64(), Some(-2));
    assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
    assert_eq!(Value::String("s".into()).as_i64(), None);
    assert_eq!(Node::int_array("ia", vec![1]).into_value(), Value::IntArray(vec![1]));
    Ok(())
}

#[test]
fn value_from_rust_types() {
    assert_eq!(Value::from(1i8), Value::Byte(1));
    assert_eq!(Value::from(1i16), Value::Short(1));
    assert_eq!(Value::from(1i32), Value::Int(1));
    assert_eq!(Value::from(1i64), Value::Long(1));
    assert_eq!(Value::from(true), Value::Byte(1));
    assert_eq!(Value::from("s"), Value::String("s".to_owned()));
    assert_eq!(Value::from(List::empty()).kind(), Tag::List);
    assert_eq!(Value::from(Vec::<Node>::new()).kind(), Tag::Compound);

    let node = Node::new("pi", std::f64::consts::PI);
    assert_eq!(node.kind(), Tag::Double);
    assert_eq!(node.name(), "pi");
}

#[test]
fn display_hello_world() {
    let tree = Node::compound("hello world", vec![Node::string("name", "Bananrama")]);
    let expected = "\
TAG_Compound('hello world'): 1 entry
{
  TAG_String('name'): 'Bananrama'
}
";
    assert_eq!(tree.to_string(), expected);
}

#[test]
fn display_lists_and_arrays() -> Result<()> {
    let tree = Node::compound(
        "root",
        vec![
            Node::list("l", Tag::Long, vec![Value::Long(11), Value::Long(12)])?,
            Node::byte_array("b", vec![0; 3]),
        ],
    );
    let expected = "\
TAG_Compound('root'): 2 entries
{
  TAG_List('l'): 2 entries of type TAG_Long
  {
    TAG_Long: 11
    TAG_Long: 12
  }
  TAG_Byte_Array('b'): [3 bytes]
}
";
    assert_eq!(tree.to_string(), expected);
    Ok(())
}

#[test]
fn serializes_to_json() -> Result<()> {
    let tree = Node::compound(
        "c",
        vec![
            Node::int("i", 1),
            Node::list("l", Tag::Byte, vec![Value::Byte(1), Value::Byte(2)])?,
        ],
    );

    let actual = serde_json::to_value(&tree).unwrap();
    let expected = json!({
        "name": "c",
        "value": [
            { "name": "i", "value": 1 },
            { "name": "l", "value": { "element": "Byte", "items": [1, 2] } },
        ]
    });
    assert_eq!(actual, expected);
    Ok(())
}
