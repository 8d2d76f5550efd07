#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::{from_bytes, to_bytes, Node};

fuzz_target!(|tree: Node| {
    // Names and strings may be too long to encode.
    if let Ok(bs) = to_bytes(&tree) {
        let back = from_bytes(&bs).unwrap().unwrap();
        // Compare bytes rather than trees, NaN floats are never equal.
        assert_eq!(to_bytes(&back).unwrap(), bs);
    }
});
