use proptest::prelude::*;
use trellis_types::{Error, UserLevel};

// ── Ordering ──────────────────────────────────────────────────────

#[test]
fn levels_are_totally_ordered() {
    assert!(UserLevel::Public < UserLevel::Editor);
    assert!(UserLevel::Editor < UserLevel::Admin);
    assert!(UserLevel::Admin < UserLevel::Root);
}

#[test]
fn minimum_is_public_and_default() {
    assert_eq!(UserLevel::minimum(), UserLevel::Public);
    assert_eq!(UserLevel::default(), UserLevel::minimum());
    assert_eq!(UserLevel::maximum(), UserLevel::Root);
}

#[test]
fn satisfies_is_greater_or_equal() {
    assert!(UserLevel::Editor.satisfies(UserLevel::Editor));
    assert!(UserLevel::Admin.satisfies(UserLevel::Editor));
    assert!(!UserLevel::Public.satisfies(UserLevel::Editor));
}

// ── Parsing ───────────────────────────────────────────────────────

#[test]
fn parse_known_names() {
    assert_eq!("editor".parse::<UserLevel>().unwrap(), UserLevel::Editor);
    assert_eq!("ADMIN".parse::<UserLevel>().unwrap(), UserLevel::Admin);
    assert_eq!("none".parse::<UserLevel>().unwrap(), UserLevel::Public);
}

#[test]
fn parse_unknown_name_fails() {
    let err = "wizard".parse::<UserLevel>().unwrap_err();
    assert!(matches!(err, Error::UnknownUserLevel(ref name) if name == "wizard"));
    assert!(err.to_string().contains("wizard"));
}

#[test]
fn serde_uses_lowercase_names() {
    let json = serde_json::to_string(&UserLevel::Editor).unwrap();
    assert_eq!(json, "\"editor\"");
}

proptest! {
    #[test]
    fn display_parse_roundtrip(idx in 0usize..4) {
        let level = UserLevel::ALL[idx];
        prop_assert_eq!(level.to_string().parse::<UserLevel>().unwrap(), level);
    }

    #[test]
    fn every_level_satisfies_minimum(idx in 0usize..4) {
        prop_assert!(UserLevel::ALL[idx].satisfies(UserLevel::minimum()));
    }
}
