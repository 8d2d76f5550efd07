#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtree::{from_bytes_with_opts, to_bytes, ReadOpts};

fuzz_target!(|data: &[u8]| {
    let tree = from_bytes_with_opts(data, ReadOpts::new().max_seq_len(100));
    if let Ok(Some(tree)) = tree {
        let _bs = to_bytes(&tree).unwrap();
    }
});
