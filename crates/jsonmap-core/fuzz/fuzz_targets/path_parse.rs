//! Fuzzing target for path expression parsing
//!
//! The parser must return a key-path or an error for any input, and every
//! key-path it returns must print back to an expression that parses to itself.

#![no_main]

use jsonmap_core::{parse_path, KeyPath};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if let Ok(path) = parse_path(&input) {
        let printed = path.to_string();
        let reparsed: KeyPath = printed.parse().expect("printed key-path must parse");
        assert_eq!(reparsed, path);
    }
});
