use pretty_assertions::assert_eq;
use replica_types::{SYNC_EVENT, SyncEvent};
use serde_json::json;

// ── Wire contract ────────────────────────────────────────────────

#[test]
fn sync_event_field_names_are_stable() {
    let ev = SyncEvent::new("abc", "title", json!("Hello"));
    let wire = serde_json::to_value(&ev).unwrap();
    assert_eq!(
        wire,
        json!({"id": "abc", "property": "title", "value": "Hello"})
    );
}

#[test]
fn sync_event_deserializes_from_known_json() {
    let raw = r#"{"id": "ent-1", "property": "done", "value": true}"#;
    let ev: SyncEvent = serde_json::from_str(raw).unwrap();
    assert_eq!(ev.id, "ent-1");
    assert_eq!(ev.property, "done");
    assert_eq!(ev.value, json!(true));
}

#[test]
fn sync_event_serde_roundtrip() {
    let original = SyncEvent::new("id-9", "tags", json!(["a", "b"]));
    let text = serde_json::to_string(&original).unwrap();
    let parsed: SyncEvent = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn sync_event_carries_object_values() {
    // Model-typed property values travel as serialized records.
    let ev = SyncEvent::new("parent-1", "author", json!({"name": "Alice"}));
    let wire = serde_json::to_value(&ev).unwrap();
    assert_eq!(wire["value"]["name"], "Alice");
}

#[test]
fn sync_event_name_constant() {
    assert_eq!(SYNC_EVENT, "sync");
}
