mod common;

use pretty_assertions::assert_eq;
use trellis_model::{
    ContentTypeId, EngineConfig, LevelTable, ModelError, RuleOptions, RuleTarget, Schema, Style,
};
use trellis_types::UserLevel;

struct Fixture {
    schema: Schema,
    home: ContentTypeId,
    section: ContentTypeId,
    text: ContentTypeId,
    picture: ContentTypeId,
    page: ContentTypeId,
    info_page: ContentTypeId,
}

fn fixture() -> Fixture {
    common::init_tracing();
    let mut schema = Schema::new();
    let page = schema.define_page_type("Page", None).unwrap();
    let info_page = schema.define_type("InfoPage", Some(page)).unwrap();
    let home = schema.define_page_type("Home", None).unwrap();
    let section = schema.define_page_type("Section", Some(home)).unwrap();

    let text = schema.define_type("Text", None).unwrap();
    schema.add_style(text, Style::named("paragraph"));

    let picture = schema.define_type("Picture", None).unwrap();
    schema.add_style(picture, Style::named("framed"));
    schema.add_style(picture, Style::named("bare"));
    schema.add_style(picture, Style::named("wide"));

    Fixture {
        schema,
        home,
        section,
        text,
        picture,
        page,
        info_page,
    }
}

fn users() -> LevelTable {
    LevelTable::new()
        .with("ed", UserLevel::Editor)
        .with("root", UserLevel::Root)
}

// ── Inclusion ────────────────────────────────────────────────────

#[test]
fn exact_type_rules_match_only_that_type() {
    let mut f = fixture();
    f.schema.allow(f.home, f.page, RuleOptions::new()).unwrap();

    assert!(f.schema.is_allowed(f.home, f.page, "anyone", &users()));
    assert!(!f.schema.is_allowed(f.home, f.info_page, "anyone", &users()));
    assert!(!f.schema.is_allowed(f.home, f.text, "anyone", &users()));
}

#[test]
fn subclass_rules_match_descendants() {
    let mut f = fixture();
    f.schema
        .allow_subclasses(f.home, f.page, RuleOptions::new())
        .unwrap();

    assert!(f.schema.is_allowed(f.home, f.page, "anyone", &users()));
    assert!(f.schema.is_allowed(f.home, f.info_page, "anyone", &users()));
    assert_eq!(f.schema.allowed_types(f.home), vec![f.page, f.info_page]);
}

#[test]
fn group_rules_match_group_members() {
    let mut f = fixture();
    f.schema.add_to_group("media", f.picture);
    f.schema.add_to_group("media", f.text);
    f.schema.add_to_group("media", f.picture);
    f.schema
        .allow_group(f.home, &["media", "empty"], RuleOptions::new())
        .unwrap();

    assert!(f.schema.is_allowed(f.home, f.text, "anyone", &users()));
    assert!(f.schema.is_allowed(f.home, f.picture, "anyone", &users()));
    assert!(!f.schema.is_allowed(f.home, f.page, "anyone", &users()));
    assert_eq!(f.schema.allowed_types(f.home), vec![f.picture, f.text]);
    assert_eq!(f.schema.group_names().collect::<Vec<_>>(), vec!["media"]);
}

#[test]
fn container_rules_include_supertype_rules_first() {
    let mut f = fixture();
    f.schema.allow(f.home, f.text, RuleOptions::new()).unwrap();
    f.schema.allow(f.section, f.picture, RuleOptions::new()).unwrap();

    let rules = f.schema.allowed(f.section);
    assert_eq!(rules.len(), 2);
    assert_eq!(
        rules[0].target(),
        &RuleTarget::Type {
            ty: f.text,
            allow_subclasses: false
        }
    );
    assert_eq!(f.schema.allowed_types(f.section), vec![f.text, f.picture]);
    assert_eq!(f.schema.allowed_types(f.home), vec![f.text]);
}

#[test]
fn no_rules_allows_nothing() {
    let f = fixture();
    assert!(f.schema.allowed(f.home).is_empty());
    assert!(!f.schema.is_allowed(f.home, f.text, "root", &users()));
}

// ── Permission levels ────────────────────────────────────────────

#[test]
fn rule_levels_gate_users() {
    let mut f = fixture();
    f.schema
        .allow(f.home, f.text, RuleOptions::new().level(UserLevel::Editor))
        .unwrap();

    assert!(!f.schema.is_allowed(f.home, f.text, "visitor", &users()));
    assert!(f.schema.is_allowed(f.home, f.text, "ed", &users()));
    assert!(f.schema.is_allowed(f.home, f.text, "root", &users()));
}

#[test]
fn any_matching_rule_may_grant() {
    let mut f = fixture();
    f.schema
        .allow(f.home, f.text, RuleOptions::new().level(UserLevel::Root))
        .unwrap();
    f.schema
        .allow(f.home, f.text, RuleOptions::new().level(UserLevel::Editor))
        .unwrap();
    assert!(f.schema.is_allowed(f.home, f.text, "ed", &users()));
}

#[test]
fn configured_default_level_applies_to_unleveled_rules() {
    common::init_tracing();
    let config = EngineConfig {
        default_level: UserLevel::Admin,
        ..EngineConfig::default()
    };
    let mut schema = Schema::with_config(config);
    let home = schema.define_page_type("Home", None).unwrap();
    let text = schema.define_type("Text", None).unwrap();
    schema.allow(home, text, RuleOptions::new()).unwrap();

    assert_eq!(schema.allowed(home)[0].level(), UserLevel::Admin);
    assert!(!schema.is_allowed(home, text, "ed", &users()));
    assert!(schema.is_allowed(home, text, "root", &users()));
}

// ── Styles ───────────────────────────────────────────────────────

#[test]
fn rule_styles_come_first() {
    let mut f = fixture();
    f.schema
        .allow(f.home, f.picture, RuleOptions::new().styles(["wide", "bare"]))
        .unwrap();

    let style = f.schema.style_for_content(f.home, f.picture).unwrap();
    assert_eq!(style, Some(Style::named("wide")));
    let names: Vec<String> = f
        .schema
        .available_styles(f.home, f.picture)
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["wide", "bare"]);
}

#[test]
fn candidate_styles_apply_without_rule_styles() {
    let mut f = fixture();
    f.schema.allow(f.home, f.picture, RuleOptions::new()).unwrap();

    let style = f.schema.style_for_content(f.home, f.picture).unwrap();
    assert_eq!(style, Some(Style::named("framed")));
    assert_eq!(f.schema.available_styles(f.home, f.picture).unwrap().len(), 3);
}

#[test]
fn unmatched_candidates_use_their_default_style() {
    let f = fixture();
    let style = f.schema.style_for_content(f.home, f.picture).unwrap();
    assert_eq!(style, Some(Style::named("framed")));
    assert_eq!(f.schema.style_for_content(f.home, f.page).unwrap(), None);
}

#[test]
fn unknown_rule_style_fails_at_declaration() {
    let mut f = fixture();
    let err = f
        .schema
        .allow(f.home, f.picture, RuleOptions::new().style("sepia"))
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnknownStyle { ref style, ref type_name } if style == "sepia" && type_name == "Picture"
    ));
    assert!(f.schema.allowed(f.home).is_empty());
}

#[test]
fn subclass_rule_styles_resolve_on_the_subtype() {
    let mut f = fixture();
    let media = f.schema.define_type("Media", None).unwrap();
    let photo = f.schema.define_type("Photo", Some(media)).unwrap();
    f.schema.add_style(photo, Style::named("framed"));
    f.schema.add_style(photo, Style::named("wide"));

    f.schema
        .allow_subclasses(f.home, media, RuleOptions::new().style("wide"))
        .unwrap();

    assert_eq!(
        f.schema.style_for_content(f.home, photo).unwrap(),
        Some(Style::named("wide"))
    );
    let err = f.schema.style_for_content(f.home, media).unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnknownStyle { ref style, ref type_name } if style == "wide" && type_name == "Media"
    ));
}

#[test]
fn subclass_rules_accept_styles_of_later_subtypes() {
    let mut f = fixture();
    let media = f.schema.define_type("Media", None).unwrap();
    f.schema
        .allow_subclasses(f.home, media, RuleOptions::new().style("wide"))
        .unwrap();

    let clip = f.schema.define_type("Clip", Some(media)).unwrap();
    f.schema.add_style(clip, Style::named("wide"));
    assert_eq!(
        f.schema.style_for_content(f.home, clip).unwrap(),
        Some(Style::named("wide"))
    );
}

#[test]
fn group_rule_styles_are_checked_per_candidate() {
    let mut f = fixture();
    f.schema.add_to_group("media", f.picture);
    f.schema.add_to_group("media", f.text);
    f.schema
        .allow_group(f.home, &["media"], RuleOptions::new().style("bare"))
        .unwrap();

    assert_eq!(
        f.schema.style_for_content(f.home, f.picture).unwrap(),
        Some(Style::named("bare"))
    );
    let err = f.schema.style_for_content(f.home, f.text).unwrap_err();
    assert!(matches!(err, ModelError::UnknownStyle { .. }));
}

#[test]
fn rule_prototype_is_exposed() {
    let mut f = fixture();
    f.schema
        .allow(f.home, f.picture, RuleOptions::new().prototype("gallery"))
        .unwrap();
    assert_eq!(f.schema.prototype_for_content(f.home, f.picture), Some("gallery"));
    assert_eq!(f.schema.prototype_for_content(f.home, f.text), None);
}
