use componentry::render::RenderOptions;
use serde_json::json;

#[test]
fn test_reserved_keys_never_reach_attributes() {
    let options = RenderOptions::from_map([
        ("component".to_string(), json!("card")),
        ("action".to_string(), json!("compact")),
        ("object".to_string(), json!({"id": 1})),
        ("collection".to_string(), json!([1, 2])),
        ("block".to_string(), json!("inner")),
        ("collection_iteration".to_string(), json!({"index": 0})),
        ("title".to_string(), json!("Hello")),
    ]);

    assert_eq!(options.component.as_deref(), Some("card"));
    assert_eq!(options.action.as_deref(), Some("compact"));
    assert_eq!(options.object, Some(json!({"id": 1})));
    assert_eq!(options.collection, Some(vec![json!(1), json!(2)]));
    assert!(options.block.is_some());
    assert!(options.collection_iteration.is_none());
    assert_eq!(options.attributes.keys().collect::<Vec<_>>(), vec!["title"]);
}

#[test]
fn test_builder_attr_routes_reserved_keys() {
    let options = RenderOptions::new().attr("object", json!(5)).attr("label", json!("x"));
    assert_eq!(options.object, Some(json!(5)));
    assert_eq!(options.attributes.len(), 1);
}

#[test]
fn test_scalar_collection_is_single_element() {
    let options = RenderOptions::from_map([("collection".to_string(), json!("only"))]);
    assert_eq!(options.collection, Some(vec![json!("only")]));

    let options = RenderOptions::from_map([("collection".to_string(), json!(null))]);
    assert!(options.collection.is_none());
}
