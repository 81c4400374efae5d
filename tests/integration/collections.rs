//! Collection renders.

use anyhow::Result;
use componentry::component::ComponentClass;
use componentry::config::EngineConfig;
use componentry::core::ComponentError;
use componentry::render::{Engine, RenderOptions};
use componentry::test_utils::memory_engine;
use serde_json::{Value, json};

fn engine(templates: &[(&str, &str)]) -> Result<Engine> {
    let thing = ComponentClass::builder("ThingComponent")
        .action("action", |component, _| component.render_text("rendered"))
        .build();
    let (builder, _) = memory_engine(templates);
    builder
        .config(EngineConfig {
            perform_caching: false,
            ..EngineConfig::default()
        })
        .component(thing)
        .build()
}

#[test]
fn test_collection_joins_outputs() -> Result<()> {
    let engine = engine(&[])?;
    let items = vec![json!("object1"), json!("object2"), json!("object3")];

    let output = engine.render("thing", RenderOptions::new().action("action").collection(items))?;
    assert_eq!(output, "renderedrenderedrendered");
    Ok(())
}

#[test]
fn test_collection_equals_concatenated_renders() -> Result<()> {
    let engine = engine(&[("item/show", "<li>{{ object.name }}</li>")])?;
    let items: Vec<Value> = ["a", "b", "c", "d"].iter().map(|name| json!({ "name": name })).collect();

    let joined = engine.render("item", RenderOptions::new().collection(items.clone()))?;
    let mut expected = String::new();
    for item in items {
        expected.push_str(&engine.render("item", RenderOptions::new().object(item))?);
    }
    assert_eq!(joined, expected);
    assert_eq!(joined, "<li>a</li><li>b</li><li>c</li><li>d</li>");
    Ok(())
}

#[test]
fn test_empty_collection_renders_nothing() -> Result<()> {
    let engine = engine(&[])?;
    assert_eq!(engine.render("thing", RenderOptions::new().action("action").collection(vec![]))?, "");
    Ok(())
}

#[test]
fn test_single_element_collection() -> Result<()> {
    let engine = engine(&[(
        "item/show",
        "{{ object }}{% if collection_iteration %}:{{ collection_iteration.first }}-{{ collection_iteration.last }}{% endif %}",
    )])?;

    assert_eq!(engine.render("item", RenderOptions::new().collection(vec![json!(7)]))?, "7:true-true");
    assert_eq!(engine.render("item", RenderOptions::new().object(json!(7)))?, "7");
    Ok(())
}

#[test]
fn test_collection_from_template_helper() -> Result<()> {
    let engine = engine(&[("item/show", "{{ object }}{% if not collection_iteration.last %}, {% endif %}")])?;
    let locals = [("ids".to_string(), json!([1, 2, 3]))].into_iter().collect();

    let output = engine.render_page("{{ component(component='item', collection=ids) | safe }}", &locals)?;
    assert_eq!(output, "1, 2, 3");
    Ok(())
}

#[test]
fn test_failure_aborts_collection() {
    let failing = ComponentClass::builder("FlakyComponent")
        .action("show", |component, _| {
            if component.object() == Some(&json!(false)) {
                anyhow::bail!("bad element");
            }
            component.render_text("ok")
        })
        .build();
    let (builder, _) = memory_engine(&[]);
    let engine = builder
        .config(EngineConfig {
            perform_caching: false,
            ..EngineConfig::default()
        })
        .component(failing)
        .build()
        .unwrap();

    let items = vec![json!(true), json!(false), json!(true)];
    let err = engine.render("flaky", RenderOptions::new().collection(items)).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ComponentError>(),
        Some(&ComponentError::CollectionElementFailed {
            index: 1,
            size: 3,
        })
    );
    assert_eq!(err.root_cause().to_string(), "bad element");
}
