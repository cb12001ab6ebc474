use std::collections::HashSet;
use std::str::FromStr;
use trellis_types::{ContentId, Error};

// ── ContentId ─────────────────────────────────────────────────────

#[test]
fn content_id_new_is_unique() {
    let a = ContentId::new();
    let b = ContentId::new();
    assert_ne!(a, b);
}

#[test]
fn content_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = ContentId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn content_id_display_and_parse() {
    let id = ContentId::new();
    let parsed = ContentId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn content_id_from_str() {
    let id = ContentId::new();
    let parsed = ContentId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn content_id_parse_invalid() {
    assert!(ContentId::parse("not-a-uuid").is_err());
    assert!(ContentId::from_str("garbage").is_err());
}

#[test]
fn content_id_parse_error_is_invalid_uuid() {
    let err = ContentId::parse("not-a-uuid").unwrap_err();
    assert!(matches!(err, Error::InvalidUuid(_)));
    let err = "garbage".parse::<ContentId>().unwrap_err();
    assert!(err.to_string().starts_with("invalid UUID"));
}

#[test]
fn content_id_parse_ignores_surrounding_whitespace() {
    let id = ContentId::new();
    assert_eq!(ContentId::parse(&format!("  {id}\n")).unwrap(), id);
}

#[test]
fn content_id_hash_and_eq() {
    let id = ContentId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn content_ids_are_time_ordered() {
    let first = ContentId::new();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = ContentId::new();
    assert!(first < second);
}

#[test]
fn content_id_serializes_as_plain_string() {
    let id = ContentId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let parsed: ContentId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, parsed);
}
