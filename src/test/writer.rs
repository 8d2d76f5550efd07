use super::builder::Builder;
use crate::error::{ErrorKind, Result};
use crate::observe::Event;
use crate::{
    from_bytes, from_bytes_with_opts, to_bytes, to_bytes_with_opts, to_writer, List, Node,
    ReadOpts, StringEncoding, Tag, Value, WriteOpts, Writer,
};

fn level() -> Result<Node> {
    let byte_array: Vec<i8> = (0..1000i32)
        .map(|n| ((n * n * 255 + n * 7) % 100) as i8)
        .collect();

    let entry = |i: usize| {
        Value::Compound(vec![
            Node::string("name", format!("Compound tag #{}", i)),
            Node::long("created-on", 1264099775885),
        ])
    };

    Ok(Node::compound(
        "Level",
        vec![
            Node::long("longTest", 9223372036854775807),
            Node::short("shortTest", 32767),
            Node::string("stringTest", "HELLO WORLD THIS IS A TEST STRING ÅÄÖ!"),
            Node::float("floatTest", 0.49823147058487f64 as f32),
            Node::int("intTest", 2147483647),
            Node::compound(
                "nested compound test",
                vec![
                    Node::compound(
                        "ham",
                        vec![Node::string("name", "Hampus"), Node::float("value", 0.75)],
                    ),
                    Node::compound(
                        "egg",
                        vec![Node::string("name", "Eggbert"), Node::float("value", 0.5)],
                    ),
                ],
            ),
            Node::list(
                "listTest (long)",
                Tag::Long,
                (11..=15).map(Value::Long).collect(),
            )?,
            Node::list("listTest (compound)", Tag::Compound, vec![entry(0), entry(1)])?,
            Node::byte("byteTest", 127),
            Node::byte_array(
                "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, starting with n=0 (0, 62, 34, 16, 8, ...))",
                byte_array,
            ),
            Node::double("doubleTest", 0.493128713218231),
            Node::int_array("intArrayTest", vec![i32::MIN, 0, i32::MAX]),
            Node::long_array("longArrayTest", vec![i64::MIN, 0, i64::MAX]),
        ],
    ))
}

#[test]
fn hello_world_bytes() -> Result<()> {
    let tree = Node::compound("hello world", vec![Node::string("name", "Bananrama")]);
    let expected = [
        0x0A, 0x00, 0x0B, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x20, 0x77, 0x6F, 0x72, 0x6C, 0x64,
        0x08, 0x00, 0x04, 0x6E, 0x61, 0x6D, 0x65, 0x00, 0x09, 0x42, 0x61, 0x6E, 0x61, 0x6E,
        0x72, 0x61, 0x6D, 0x61, 0x00,
    ];

    let bytes = to_bytes(&tree)?;
    assert_eq!(bytes, expected);
    assert_eq!(from_bytes(&bytes)?, Some(tree));
    Ok(())
}

#[test]
fn matches_builder() -> Result<()> {
    let tree = Node::compound(
        "",
        vec![
            Node::byte("b", -1),
            Node::short("s", -300),
            Node::int("i", 70000),
            Node::long("l", -5_000_000_000),
            Node::float("f", 1.5),
            Node::double("d", -2.25),
            Node::string("str", "abc"),
            Node::byte_array("ba", vec![1, -1]),
            Node::int_array("ia", vec![7]),
            Node::long_array("la", vec![]),
        ],
    );

    let expected = Builder::new()
        .start_compound("")
        .byte("b", -1)
        .short("s", -300)
        .int("i", 70000)
        .long("l", -5_000_000_000)
        .float("f", 1.5)
        .double("d", -2.25)
        .string("str", "abc")
        .byte_array("ba", &[1, -1])
        .int_array("ia", &[7])
        .long_array("la", &[])
        .end_compound()
        .build();

    assert_eq!(to_bytes(&tree)?, expected);
    Ok(())
}

#[test]
fn compound_ends_with_exactly_one_end() -> Result<()> {
    let children: Vec<Node> = (0..3).map(|i| Node::byte(format!("k{}", i), i)).collect();
    let bytes = to_bytes(&Node::compound("c", children))?;

    // tag + name(2 + 1), then 3 * (tag + name(2 + 2) + payload 1), then End.
    assert_eq!(bytes.len(), 4 + 3 * 6 + 1);
    assert_eq!(bytes.last(), Some(&0));
    assert_ne!(bytes[bytes.len() - 2], 0);

    let empty = to_bytes(&Node::compound("", vec![]))?;
    assert_eq!(empty, [10, 0, 0, 0]);
    Ok(())
}

#[test]
fn list_elements_have_no_names() -> Result<()> {
    let tree = Node::list("l", Tag::Short, vec![Value::Short(1), Value::Short(-1)])?;
    let bytes = to_bytes(&tree)?;

    let expected = Builder::new()
        .start_list("l", Tag::Short, 2)
        .short_payload(1)
        .short_payload(-1)
        .build();
    assert_eq!(bytes, expected);
    Ok(())
}

#[test]
fn list_of_longs_round_trip() -> Result<()> {
    let tree = Node::list(
        "listTest (long)",
        Tag::Long,
        vec![11i64, 12, 13, 14, 15].into_iter().map(Value::from).collect(),
    )?;

    let bytes = to_bytes(&tree)?;
    // 1 + (2 + 15) + 1 + 4 + 5 * 8, no per-element tag or name.
    assert_eq!(bytes.len(), 63);
    assert_eq!(bytes[18], Tag::Long as u8);
    assert_eq!(&bytes[19..23], &5i32.to_be_bytes());

    let back = from_bytes(&bytes)?.unwrap();
    assert_eq!(back.payload_kind(), Some(Tag::Long));
    assert_eq!(back, tree);
    Ok(())
}

#[test]
fn long_max_round_trip() -> Result<()> {
    let tree = Node::compound("", vec![Node::long("longTest", i64::MAX)]);
    let back = from_bytes(&to_bytes(&tree)?)?.unwrap();
    assert_eq!(back.get("longTest").unwrap().value(), &Value::Long(9223372036854775807));
    Ok(())
}

#[test]
fn level_round_trip() -> Result<()> {
    let tree = level()?;
    let bytes = to_bytes(&tree)?;
    let back = from_bytes(&bytes)?.unwrap();

    assert_eq!(back, tree);
    assert_eq!(to_bytes(&back)?, bytes);

    let float = back.find("floatTest").unwrap().value();
    assert_eq!(float, &Value::Float(0.49823147058487f64 as f32));
    Ok(())
}

#[test]
fn empty_list_written_as_end() -> Result<()> {
    let tree = Node::new("empty", List::empty());
    let bytes = to_bytes(&tree)?;

    let expected = Builder::new().start_list("empty", Tag::End, 0).build();
    assert_eq!(bytes, expected);
    assert_eq!(from_bytes(&bytes)?, Some(tree));
    Ok(())
}

#[test]
fn cesu8_output() -> Result<()> {
    let tree = Node::string("n", "\u{1F608}\0");
    let opts = WriteOpts::new().strings(StringEncoding::JavaCesu8);
    let bytes = to_bytes_with_opts(&tree, opts)?;

    assert_ne!(bytes, to_bytes(&tree)?);
    let back = from_bytes_with_opts(&bytes, ReadOpts::new().strings(StringEncoding::JavaCesu8))?;
    assert_eq!(back, Some(tree));
    Ok(())
}

#[test]
fn overlong_name_is_rejected() {
    let tree = Node::byte("x".repeat(70_000), 1);
    let err = to_bytes(&tree).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);
}

#[test]
fn failing_sink_is_an_error() {
    struct Full;

    impl std::io::Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = to_writer(Full, &Node::int("i", 1)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Io(std::io::ErrorKind::Other));

    let err = to_writer(&mut [0u8; 3][..], &Node::int("i", 1)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Io(std::io::ErrorKind::WriteZero));
}

#[test]
fn observer_sees_each_named_tag() -> Result<()> {
    let tree = level()?;

    let mut count = 0;
    let mut max_depth = 0;
    let mut writer = Writer::new(Vec::<u8>::new()).observer(|e: &Event<'_>| {
        assert!(matches!(e, Event::TagWritten { .. }));
        count += 1;
        max_depth = max_depth.max(e.depth());
    });
    writer.write_tag(&tree)?;
    let bytes = writer.into_inner();

    // 1 root + 13 children + 2 nested + 4 in ham/egg + 4 in the compound list.
    assert_eq!(count, 24);
    assert_eq!(max_depth, 3);
    assert_eq!(bytes, to_bytes(&tree)?);
    Ok(())
}

fn nested(depth: usize) -> Node {
    let mut node = Node::compound("c", vec![]);
    for _ in 1..depth {
        node = Node::compound("c", vec![node]);
    }
    node
}

#[test]
fn depth_limit_matches_reader() -> Result<()> {
    let max = WriteOpts::default().max_depth;
    assert_eq!(max, ReadOpts::default().max_depth);

    let bytes = to_bytes(&nested(max))?;
    let mut expected = Builder::new();
    for _ in 0..max {
        expected = expected.start_compound("c");
    }
    for _ in 0..max {
        expected = expected.end_compound();
    }
    assert_eq!(bytes, expected.build());
    assert!(from_bytes(&bytes)?.is_some());

    let err = to_bytes(&nested(max + 1)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::LimitExceeded);
    Ok(())
}

#[test]
fn depth_limit_counts_lists() -> Result<()> {
    let tree = Node::compound(
        "",
        vec![Node::list("l", Tag::Compound, vec![Value::Compound(vec![])])?],
    );

    let opts = WriteOpts::new().max_depth(3);
    assert!(to_bytes_with_opts(&tree, opts).is_ok());

    let err = to_bytes_with_opts(&tree, WriteOpts::new().max_depth(2)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::LimitExceeded);
    Ok(())
}

#[test]
fn failed_payload_does_not_leak_depth() -> Result<()> {
    let opts = WriteOpts::new().max_depth(1);
    let mut writer = Writer::new(Vec::<u8>::new()).with_opts(opts);

    let bad = Value::Compound(vec![Node::string("s", "x".repeat(70_000))]);
    let err = writer.write_payload(&bad).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidInput);

    writer.get_mut().clear();
    writer.write_payload(&Value::Compound(vec![Node::byte("b", 5)]))?;
    assert_eq!(writer.into_inner(), Builder::new().byte("b", 5).end_compound().build());
    Ok(())
}
