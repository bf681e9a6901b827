//! Fuzzing target for mapping documents
//!
//! Arbitrary JSON must either build a mapping or fail with an error, and a
//! built mapping must run on a fixed document without panicking.

#![no_main]

use jsonmap_core::MappingDocument;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = MappingDocument::from_json_str(text) else {
        return;
    };
    if let Ok(mapping) = document.build() {
        let _ = mapping.apply(json!({
            "a": {"b": [1, "two", null, {"c": true}]},
            "d": [],
            "e": {}
        }));
    }
});
