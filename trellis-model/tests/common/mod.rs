//! Shared fixtures for schema engine tests.

#![allow(dead_code)]

use std::sync::Arc;
use trellis_model::{
    Content, ContentTypeId, EngineConfig, FieldKind, FieldOptions, Layout, Schema, Style,
};

/// Routes engine logs to the test harness; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A small site schema:
///
/// - `Page` (page): `title`; layouts `standard`, `wide`
/// - `InfoPage` < `Page` (page): `summary`
/// - `Text` (piece): `title`, `text` (markdown)
/// - `Picture` (piece): `title`, `image`; styles `framed`, `bare`
/// - `PageAlias` (page, alias of `Page`): `note`; no styles or layouts
/// - `PictureAlias` (piece, alias of `Picture`): style `thumb`, layout `tile`
/// - `PictureLink` (piece, alias of `Picture`): no fields, styles or layouts
pub struct Site {
    pub schema: Arc<Schema>,
    pub page: ContentTypeId,
    pub info_page: ContentTypeId,
    pub text: ContentTypeId,
    pub picture: ContentTypeId,
    pub page_alias: ContentTypeId,
    pub picture_alias: ContentTypeId,
    pub picture_link: ContentTypeId,
}

pub fn site() -> Site {
    site_with_config(EngineConfig::default())
}

pub fn site_with_config(config: EngineConfig) -> Site {
    init_tracing();
    let mut schema = Schema::with_config(config);

    let page = schema.define_page_type("Page", None).unwrap();
    schema.field(page, "title").unwrap();
    schema.add_layout(page, Layout::named("standard"));
    schema.add_layout(page, Layout::named("wide"));

    let info_page = schema.define_type("InfoPage", Some(page)).unwrap();
    schema.field(info_page, "summary").unwrap();

    let text = schema.define_type("Text", None).unwrap();
    schema.field(text, "title").unwrap();
    schema
        .declare_field(text, "text", Some(FieldKind::Markdown), FieldOptions::new())
        .unwrap();

    let picture = schema.define_type("Picture", None).unwrap();
    schema.field(picture, "title").unwrap();
    schema.field(picture, "image").unwrap();
    schema.add_style(picture, Style::named("framed"));
    schema.add_style(picture, Style::named("bare"));

    let page_alias = schema.define_page_type("PageAlias", None).unwrap();
    schema.field(page_alias, "note").unwrap();
    schema.alias_of(page_alias, &[page]).unwrap();

    let picture_alias = schema.define_type("PictureAlias", None).unwrap();
    schema.alias_of(picture_alias, &[picture]).unwrap();
    schema.add_style(picture_alias, Style::named("thumb"));
    schema.add_layout(picture_alias, Layout::named("tile"));

    let picture_link = schema.define_type("PictureLink", None).unwrap();
    schema.alias_of(picture_link, &[picture]).unwrap();

    Site {
        schema: Arc::new(schema),
        page,
        info_page,
        text,
        picture,
        page_alias,
        picture_alias,
        picture_link,
    }
}

impl Site {
    pub fn page(&self, slug: &str) -> Content {
        Content::new(self.schema.clone(), self.page).with_slug(slug)
    }

    pub fn picture(&self, slug: &str) -> Content {
        Content::new(self.schema.clone(), self.picture).with_slug(slug)
    }
}

/// A schema with one type `Thing` declaring `field` with `kind` and `options`.
pub fn single_field(
    field: &str,
    kind: Option<FieldKind>,
    options: FieldOptions,
) -> (Arc<Schema>, ContentTypeId) {
    single_field_with_config(field, kind, options, EngineConfig::default())
}

pub fn single_field_with_config(
    field: &str,
    kind: Option<FieldKind>,
    options: FieldOptions,
    config: EngineConfig,
) -> (Arc<Schema>, ContentTypeId) {
    init_tracing();
    let mut schema = Schema::with_config(config);
    let thing = schema.define_type("Thing", None).unwrap();
    schema.declare_field(thing, field, kind, options).unwrap();
    (Arc::new(schema), thing)
}
