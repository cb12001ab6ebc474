mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use trellis_model::{
    Content, ContentBehavior, ContentStore, FieldKind, FieldOptions, MemoryStore, ModelError,
    RenderOptions, StoredField,
};
use trellis_types::ContentId;

fn title_version(content: &Content) -> u64 {
    content.field("title").unwrap().version()
}

// ── Field versions ───────────────────────────────────────────────

#[test]
fn versions_move_only_when_values_change() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    assert_eq!(title_version(&page), 0);

    page.set_field("title", "Welcome").unwrap();
    page.save(&store).unwrap();
    assert_eq!(title_version(&page), 1);

    page.save(&store).unwrap();
    assert_eq!(title_version(&page), 1);

    page.set_field("title", "Welcome back").unwrap();
    page.save(&store).unwrap();
    assert_eq!(title_version(&page), 2);
}

#[test]
fn untouched_fields_stay_at_version_zero() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut picture = site.picture("p");
    picture.set_field("title", "Sunset").unwrap();
    picture.save(&store).unwrap();

    assert_eq!(picture.field("title").unwrap().version(), 1);
    assert_eq!(picture.field("image").unwrap().version(), 0);
}

#[test]
fn restoring_the_persisted_value_is_not_a_change() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.set_field("title", "One").unwrap();
    page.save(&store).unwrap();

    page.set_field("title", "Two").unwrap();
    assert!(page.is_dirty());
    page.set_field("title", "One").unwrap();
    assert!(!page.is_dirty());
    page.save(&store).unwrap();
    assert_eq!(title_version(&page), 1);
}

#[test]
fn serialize_shows_staged_versions() {
    let site = common::site();
    let mut page = site.page("home");
    page.set_field("title", "Hello & Goodbye").unwrap();

    let expected: BTreeMap<String, StoredField> = [(
        "title".to_string(),
        StoredField {
            value: "Hello & Goodbye".into(),
            version: 1,
        },
    )]
    .into_iter()
    .collect();
    assert_eq!(page.fields().serialize(), expected);
    assert_eq!(title_version(&page), 0);
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn loading_restores_raw_values_and_versions() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.set_field("title", "Fish & Chips").unwrap();
    page.set_style(Some("wide".into()));
    page.save(&store).unwrap();

    let loaded = Content::load(site.schema.clone(), &store, page.id()).unwrap();
    let title = loaded.field("title").unwrap();
    assert_eq!(title.unprocessed_value(), "Fish & Chips");
    assert_eq!(title.value(), "Fish &amp; Chips");
    assert_eq!(title.version(), 1);
    assert!(!loaded.is_dirty());
    assert_eq!(loaded.slug(), "home");
    assert_eq!(loaded.style_id(), Some("wide"));
    assert_eq!(loaded.version(), page.version());
    assert_eq!(loaded.to_record(), store.load(page.id()).unwrap().unwrap());
}

fn reload(content: &mut Content, store: &MemoryStore) -> Content {
    content.save(store).unwrap();
    Content::load(content.schema_arc().clone(), store, content.id()).unwrap()
}

#[test]
fn formatted_dates_render_the_same_after_loading() {
    let options = FieldOptions::new().option("format", "%-d %B %Y");
    let (schema, ty) = common::single_field("published", Some(FieldKind::Date), options);
    let store = MemoryStore::new();
    let mut post = Content::new(schema, ty);
    post.set_field("published", "2011-02-14").unwrap();

    let before = post.field("published").unwrap().value();
    let loaded = reload(&mut post, &store);
    let field = loaded.field("published").unwrap();
    assert_eq!(before, "14 February 2011");
    assert_eq!(field.value(), before);
    assert_eq!(field.unprocessed_value(), "2011-02-14");

    let mut render = RenderOptions::new();
    render.insert("format".into(), json!("%d/%m/%y"));
    assert_eq!(
        field.render("html", &render),
        post.field("published").unwrap().render("html", &render)
    );
}

#[test]
fn markdown_renders_the_same_after_loading() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut text = Content::new(site.schema.clone(), site.text);
    text.set_field("text", "*Fish* & **Chips**\nto go").unwrap();

    let before = text.field("text").unwrap().value();
    let loaded = reload(&mut text, &store);
    let field = loaded.field("text").unwrap();
    assert_eq!(field.kind(), FieldKind::Markdown);
    assert_eq!(field.value(), before);
    assert_eq!(field.value_as("json"), "*Fish* & **Chips**\nto go");
    assert_eq!(field.version(), 1);
}

#[test]
fn fields_added_after_saving_load_with_defaults() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.save(&store).unwrap();

    let mut record = store.load(page.id()).unwrap().unwrap();
    record.content_type = "InfoPage".into();
    store.save(record, page.version()).unwrap();

    let loaded = Content::load(site.schema.clone(), &store, page.id()).unwrap();
    assert_eq!(loaded.fields().names(), vec!["title", "summary"]);
    assert_eq!(loaded.field("summary").unwrap().version(), 0);
}

#[test]
fn raw_fields_are_exposed_by_the_store() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.set_field("title", "<b>raw</b>").unwrap();
    page.save(&store).unwrap();

    let raw = store.load_raw_fields(page.id()).unwrap();
    assert_eq!(raw.get("title").map(String::as_str), Some("<b>raw</b>"));
}

#[test]
fn loading_a_missing_instance_is_not_found() {
    let site = common::site();
    let store = MemoryStore::new();
    let err = Content::load(site.schema.clone(), &store, ContentId::new()).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { what: "content", .. }));
}

#[test]
fn loading_an_unknown_type_fails() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut record = site.page("home").to_record();
    record.content_type = "Retired".into();
    let id = record.id;
    store.save(record, 0).unwrap();

    let err = Content::load(site.schema.clone(), &store, id).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { what: "content type", .. }));
}

// ── Optimistic concurrency ───────────────────────────────────────

#[test]
fn stale_saves_conflict() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.save(&store).unwrap();

    let mut first = Content::load(site.schema.clone(), &store, page.id()).unwrap();
    let mut second = Content::load(site.schema.clone(), &store, page.id()).unwrap();
    first.set_field("title", "first").unwrap();
    first.save(&store).unwrap();

    second.set_field("title", "second").unwrap();
    let err = second.save(&store).unwrap_err();
    match err {
        ModelError::Conflict {
            id,
            expected,
            actual,
        } => {
            assert_eq!(id, page.id());
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }

    assert_eq!(second.version(), 1);
    assert!(second.is_dirty());
    assert_eq!(title_version(&second), 0);
    let stored = store.load(page.id()).unwrap().unwrap();
    assert_eq!(stored.fields["title"].value, "first");
}

#[test]
fn conflicting_saves_can_retry_after_reload() {
    let site = common::site();
    let store = MemoryStore::new();
    let mut page = site.page("home");
    page.save(&store).unwrap();
    let mut stale = page.clone();

    page.set_field("title", "newer").unwrap();
    page.save(&store).unwrap();

    stale.set_field("title", "older").unwrap();
    assert!(stale.save(&store).is_err());

    let mut fresh = Content::load(site.schema.clone(), &store, page.id()).unwrap();
    fresh.set_field("title", "merged").unwrap();
    fresh.save(&store).unwrap();
    assert_eq!(title_version(&fresh), 2);
}

// ── Deletion ─────────────────────────────────────────────────────

#[test]
fn deleting_a_missing_instance_is_not_found() {
    let store = MemoryStore::new();
    let err = store.delete_cascade(ContentId::new()).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));
    assert!(store.is_empty());
}
