//! Fuzzing target for running mappings
//!
//! The first line of the input is a path expression used as a destination,
//! the rest a JSON document. Map and transform must never panic, and the
//! identity transform must leave the document unchanged.

#![no_main]

use jsonmap_core::{all_rule, parse_path, KeyPath, Mapping, ValueMaps};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    let Ok(document) = serde_json::from_str::<Value>(rest) else {
        return;
    };

    let identity = Mapping::transform(all_rule(), ValueMaps::none());
    if let Ok(result) = identity.apply(document.clone()) {
        assert_eq!(result, document);
    }

    if let Ok(destination) = parse_path(first) {
        let prefixed = move |path: &KeyPath| {
            let mut target = destination.clone();
            path.iter().for_each(|key| target.push(key.as_str()));
            target
        };
        let _ = Mapping::map(prefixed, ValueMaps::none()).apply(document.clone());

        let collapse = |path: &KeyPath| path.iter().rev().take(2).cloned().collect::<KeyPath>();
        let _ = Mapping::transform(collapse, ValueMaps::none()).apply(document);
    }
});
