//! Integration tests for mapping documents loaded from disk


use jsonmap_core::{ErrorKind, MappingDocument, MappingMode};
use serde_json::json;
use test_support::fixture;

#[test]
fn test_rename_document_from_file() {
    let document = MappingDocument::from_path(fixture("rename_colors.json"))
        .expect("Failed to load mapping document");
    assert_eq!(document.mode(), MappingMode::Map);

    let mapping = document.build().expect("Failed to build mapping");
    let result = mapping
        .apply(json!({
            "product": {
                "color": "org",
                "display name": "Widget",
                "sizes": ["S", "M"],
                "status": "active"
            }
        }))
        .unwrap();

    assert_eq!(
        result,
        json!({"attributes": {"hue": "orange", "sizes": ["S"]}, "title": "Widget"})
    );
}

#[test]
fn test_rename_document_skips_unknown_values() {
    let mapping = MappingDocument::from_path(fixture("rename_colors.json"))
        .and_then(|document| document.build())
        .unwrap();
    let result = mapping
        .apply(json!({"product": {"color": "unknown", "display name": "Widget"}}))
        .unwrap();
    assert_eq!(result, json!({"title": "Widget"}));
}

#[test]
fn test_pipeline_document_from_file() {
    let document = MappingDocument::from_path(fixture("cleanup_pipeline.json")).unwrap();
    assert_eq!(document.mode(), MappingMode::Transform);

    let mapping = document.build().unwrap();
    let result = mapping
        .apply(json!({"legacy": {"id": 7}, "name": "", "note": "x"}))
        .unwrap();
    assert_eq!(
        result,
        json!({"legacy": {}, "name": null, "note": "x", "id": 7})
    );
}

#[test]
fn test_bad_stage_in_file() {
    let err = MappingDocument::from_path(fixture("bad_stage.json"))
        .and_then(|document| document.build())
        .map(|_| ())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Construction);
    assert_eq!(err.to_string(), "index 1 is not a function: \"all\"");
}

#[test]
fn test_documents_round_trip_through_serde() {
    let document = MappingDocument::from_path(fixture("cleanup_pipeline.json")).unwrap();
    let text = serde_json::to_string(&document).unwrap();
    let reloaded = MappingDocument::from_json_str(&text).unwrap();
    assert_eq!(reloaded, document);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let document = MappingDocument::from_value(json!({
        "ref": "all",
        "description": "copy everything"
    }))
    .unwrap();
    let mapping = document.build().unwrap();
    assert_eq!(mapping.apply(json!({"a": 1})).unwrap(), json!({"a": 1}));
}
