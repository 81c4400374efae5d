use componentry::cache::{FragmentKey, is_truthy, remap_namespace};
use componentry::templating::digest_source;
use serde_json::json;

#[test]
fn test_digest_key_format() {
    let key = FragmentKey::for_template("card/show", Some("sha256:abc"), "show", json!([1, "x"]));
    assert!(key.has_digest());
    assert_eq!(key.expanded(), "views/card/show:sha256:abc/1/x");
    assert_eq!(key.store_key(), "components/card/show:sha256:abc/1/x");
    assert_eq!(key.to_string(), key.store_key());
}

#[test]
fn test_identity_key_without_digest() {
    let key = FragmentKey::for_template("card/show", None, "show", json!("123"));
    assert!(!key.has_digest());
    assert_eq!(key.store_key(), "components/card/show/show");
}

#[test]
fn test_keys_follow_template_content() {
    let v1 = digest_source("<p>{{ title }}</p>");
    let v2 = digest_source("<p>{{ title }}!</p>");
    assert_eq!(v1, digest_source("<p>{{ title }}</p>"));
    assert_ne!(v1, v2);

    let a = FragmentKey::for_template("card/show", Some(&v1), "show", json!("123"));
    let b = FragmentKey::for_template("card/show", Some(&v2), "show", json!("123"));
    assert_ne!(a.store_key(), b.store_key());
}

#[test]
fn test_remap_only_leading_views() {
    assert_eq!(remap_namespace("views/card/show"), "components/card/show");
    assert_eq!(remap_namespace("card/views/show"), "card/views/show");
}

#[test]
fn test_truthiness() {
    assert!(!is_truthy(&json!(null)));
    assert!(!is_truthy(&json!(false)));
    assert!(is_truthy(&json!("123")));
    assert!(is_truthy(&json!(0)));
    assert!(is_truthy(&json!([])));
}
