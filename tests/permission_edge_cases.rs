//! Edge case tests for grant keys and form decoding.

use access_model::{AccessModel, Error, GrantSet, Permission, Principal, form, grants};

#[test]
fn test_permission_parsing_security() {
    let malformed = ["", " ", "\n\t", "list\u{0000}stories"];
    for name in malformed {
        assert!(
            matches!(Permission::parse(name), Err(Error::InvalidFormField(_))),
            "Should fail to parse: {name:?}"
        );
    }

    for valid in ["list stories", "platform.systems.index", "view logs"] {
        assert_eq!(Permission::parse(valid).unwrap(), valid);
    }
}

#[test]
fn test_unicode_and_special_characters() {
    let keys = [
        "читать документы",
        "🔒 vault",
        "<script>",
        "'; DROP TABLE users",
        "../..",
    ];

    let mut model = AccessModel::new();
    let mut user = Principal::new("u1");
    let updates: GrantSet = keys.iter().map(|key| (*key, true)).collect();
    model.update_permissions(&mut user, &updates).unwrap();

    for key in keys {
        assert!(model.has_permission(&user, key));

        let field = form::field_name(key);
        assert!(field.starts_with(form::FIELD_PREFIX));
        assert_eq!(form::decode_field_name(&field).unwrap().unwrap(), key);
    }
}

#[test]
fn test_keys_are_case_sensitive_and_exact() {
    let set = grants! { "list stories" => true };
    assert!(set.has("list stories"));
    assert!(!set.has("List Stories"));
    assert!(!set.has("list stories "));
    assert!(!set.has("list"));
}

#[test]
fn test_false_entry_equals_missing_entry_for_checks() {
    let model = AccessModel::new();
    let explicit = Principal::with_grants("a", grants! { "delete stories" => false });
    let missing = Principal::new("b");

    assert_eq!(
        model.has_permission(&explicit, "delete stories"),
        model.has_permission(&missing, "delete stories")
    );
    // but the key is still there for the editor to show
    assert!(explicit.grants().contains_key("delete stories"));
}

#[test]
fn test_role_slug_checked_as_permission() {
    let model = AccessModel::new();
    let user = Principal::with_grants("u1", grants! { "editor" => true });

    assert!(model.has_permission(&user, "editor"));
    assert!(model.in_role(&user, "editor").unwrap());
    // the marker alone confers nothing
    assert!(!model.has_permission(&user, "publish stories"));
}

#[test]
fn test_form_decode_errors() {
    let cases = [
        ("permissions.%%%".to_string(), "1"),
        ("permissions.//8=".to_string(), "1"),
        ("permissions.".to_string(), "1"),
        (form::field_name("list stories"), "maybe"),
    ];

    for (field, value) in cases {
        let result = form::decode_submission([(field.as_str(), value)]);
        assert!(
            matches!(result, Err(Error::InvalidFormField(_))),
            "{field} = {value} should be rejected"
        );
    }
}

#[test]
fn test_form_skips_unrelated_fields() {
    let updates = form::decode_submission([
        ("_token", "abc"),
        ("permission_search", "stories"),
        ("permissions", "1"),
    ])
    .unwrap();
    assert!(updates.is_empty());
}

#[test]
fn test_form_checkbox_values() {
    for value in ["1", "true", "on", " 1 "] {
        assert!(form::parse_flag(value).unwrap(), "{value:?}");
    }
    for value in ["0", "false", ""] {
        assert!(!form::parse_flag(value).unwrap(), "{value:?}");
    }
}

#[test]
fn test_last_submitted_value_wins() {
    let field = form::field_name("show tags");
    let updates =
        form::decode_submission([(field.as_str(), "1"), (field.as_str(), "0")]).unwrap();
    assert_eq!(updates.get("show tags"), Some(false));
}

#[cfg(feature = "persistence")]
mod legacy_rows {
    use super::*;

    #[test]
    fn test_integer_flags() {
        let set: GrantSet =
            serde_json::from_str(r#"{ "viewer": 1, "list stories": 1, "delete stories": 0, "x": 7 }"#)
                .unwrap();

        assert!(set.has("viewer"));
        assert!(set.has("list stories"));
        assert!(!set.has("delete stories"));
        assert!(set.contains_key("delete stories"));
        assert!(set.has("x"));
    }

    #[test]
    fn test_null_column_is_empty() {
        let set: GrantSet = serde_json::from_str("null").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_booleans() {
        let set = grants! { "viewer" => true, "view analytics" => false };
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"view analytics":false,"viewer":true}"#);
    }

    #[test]
    fn test_submitted_checkbox_strings() {
        let set: GrantSet = serde_json::from_str(
            r#"{ "list stories": "1", "delete stories": "0", "show tags": "on", "list tags": "" }"#,
        )
        .unwrap();

        assert!(set.has("list stories"));
        assert!(!set.has("delete stories"));
        assert!(set.contains_key("delete stories"));
        assert!(set.has("show tags"));
        assert!(!set.has("list tags"));
    }

    #[test]
    fn test_rejects_non_flag_values() {
        assert!(serde_json::from_str::<GrantSet>(r#"{ "viewer": "yes" }"#).is_err());
        assert!(serde_json::from_str::<GrantSet>(r#"{ "viewer": [1] }"#).is_err());
    }
}
