use crate::{error::Result, from_bytes, test::builder::Builder, to_bytes, Node, Tag};

/// Bugs found via cargo-fuzz.

#[test]
fn partial_input_in_name() {
    let input = Builder::new().start_compound("some long name").build();
    let v: Result<Option<Node>> = from_bytes(&input[0..3]);
    assert!(v.is_err());
}

#[test]
fn list_of_end() {
    let input = Builder::new()
        .start_compound("")
        .start_list("", Tag::End, 1)
        .tag(Tag::End)
        .end_compound()
        .build();

    let v: Result<Option<Node>> = from_bytes(&input);
    assert!(v.is_err());
}

#[test]
fn huge_list_of_empty_compounds() {
    let input = Builder::new()
        .start_compound("")
        .start_list("", Tag::Compound, i32::MAX)
        .end_compound()
        .end_compound()
        .build();

    let v: Result<Option<Node>> = from_bytes(&input);
    assert!(v.unwrap_err().is_eof());
}

#[test]
fn huge_byte_array() {
    let input = Builder::new()
        .tag(Tag::ByteArray)
        .name("")
        .int_payload(i32::MAX)
        .raw_bytes(&[1, 2, 3])
        .build();

    let v: Result<Option<Node>> = from_bytes(&input);
    assert!(v.unwrap_err().is_eof());
}

#[test]
fn reencodes_what_it_reads() -> Result<()> {
    let input = Builder::new()
        .start_compound("")
        .start_list("l", Tag::List, 2)
        .start_anon_list(Tag::End, 0)
        .start_anon_list(Tag::Int, 1)
        .int_payload(7)
        .string("", "")
        .end_compound()
        .build();

    let node = from_bytes(&input)?.unwrap();
    assert_eq!(to_bytes(&node)?, input);
    Ok(())
}
