//! Relation Tests
//!
//! Tests for the public relation model and request documents: header
//! construction, by-name lookup, row rendering, and the export/import
//! request shapes.

use std::sync::Arc;

use cozo_embedded::protocol::{ExportRelationsRequest, ImportFromBackupRequest};
use cozo_embedded::{EngineError, RelationHeader, RelationRow};
use serde_json::json;

fn row(headers: Option<Arc<RelationHeader>>, values: Vec<serde_json::Value>) -> RelationRow {
    RelationRow { headers, values }
}

#[test]
fn test_lookup_by_name_follows_header_order() {
    let header = Arc::new(RelationHeader::new(vec![
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
    ]));
    let row = row(Some(header), vec![json!(1), json!(2), json!(3)]);

    assert_eq!(row.get_named("a"), Some(&json!(1)));
    assert_eq!(row.get_named("b"), Some(&json!(2)));
    assert_eq!(row.get_named("c"), Some(&json!(3)));
    assert_eq!(row.get_named("d"), None);
}

#[test]
fn test_lookup_without_headers_fails() {
    let row = row(None, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(row.get_named("a"), None);
    assert_eq!(row.get(1), Some(&json!(2)));
    assert_eq!(row.len(), 3);
}

#[test]
fn test_header_is_shareable_across_rows() {
    let header = Arc::new(RelationHeader::new(vec!["k".to_string()]));
    let first = row(Some(header.clone()), vec![json!("x")]);
    let second = row(Some(header.clone()), vec![json!("y")]);

    assert!(Arc::ptr_eq(
        first.headers.as_ref().unwrap(),
        second.headers.as_ref().unwrap()
    ));
    assert_eq!(Arc::strong_count(&header), 3);
}

#[test]
fn test_row_renders_as_json_array() {
    let row = row(None, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(row.to_string(), "[1,2,3]");
}

#[test]
fn test_engine_error_rendering_precedence() {
    let boom = EngineError {
        details: json!({"ok": false, "display": "boom"}),
    };
    assert_eq!(boom.to_string(), "boom");

    let oops = EngineError {
        details: json!({"ok": false, "message": "oops"}),
    };
    assert_eq!(oops.to_string(), "oops");
}

#[test]
fn test_export_request_round_trips_relation_names() {
    let request = ExportRelationsRequest::new(&["stores", "orders"]);
    let doc = serde_json::to_value(&request).unwrap();

    // Decoding an export response keyed by the same names must find every
    // relation that was asked for.
    let names: Vec<&str> = doc["relations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|name| name.as_str().unwrap())
        .collect();
    assert_eq!(names, ["stores", "orders"]);

    let response = json!({"stores": [{"a": 1}], "orders": []});
    for name in names {
        assert!(response.get(name).is_some());
    }
}

#[test]
fn test_import_from_backup_request_carries_path_and_relations() {
    let request = ImportFromBackupRequest::new("backup.db", &["s", "t"]);
    let doc = serde_json::to_value(&request).unwrap();
    assert_eq!(doc["path"], "backup.db");
    assert_eq!(doc["relations"], json!(["s", "t"]));
}
