//! File-system templates, `components.toml` and template helpers.

use anyhow::Result;
use componentry::cache::MemoryFragmentStore;
use componentry::component::Attributes;
use componentry::config::{ComponentDecl, EngineConfig};
use componentry::core::ComponentError;
use componentry::render::{Engine, RenderOptions};
use componentry::test_utils::TemplateFixture;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn card_decls() -> BTreeMap<String, ComponentDecl> {
    BTreeMap::from([
        (
            "CardComponent".to_string(),
            ComponentDecl {
                defaults: BTreeMap::from([("title".to_string(), json!("Untitled"))]),
                cache_key: Some(vec!["title".to_string()]),
                ..ComponentDecl::default()
            },
        ),
        (
            "FeaturedCardComponent".to_string(),
            ComponentDecl {
                parent: Some("CardComponent".to_string()),
                path: Some("featured".to_string()),
                ..ComponentDecl::default()
            },
        ),
    ])
}

#[test]
fn test_render_from_disk_with_declared_components() -> Result<()> {
    let fixture = TemplateFixture::new()?;
    fixture.template("card/show", "<div>{{ title }}</div>")?;
    fixture.template("featured/show", "<div class=\"featured\">{{ title }}</div>")?;
    fixture.template("card/compact", "{{ title }}")?;

    let mut config = fixture.engine_config();
    config.components = card_decls();
    let path = fixture.config(&config)?;

    let engine = Engine::builder().config(EngineConfig::load_from(&path)?).build()?;

    assert_eq!(engine.render("card", RenderOptions::new())?, "<div>Untitled</div>");
    assert_eq!(engine.render("featured_card", RenderOptions::new().attr("title", json!("Top")))?, "<div class=\"featured\">Top</div>");
    // Inherited prefixes reach the parent's directory
    assert_eq!(engine.render("featured_card", RenderOptions::new().action("compact"))?, "Untitled");
    Ok(())
}

#[test]
fn test_declared_cache_key_uses_attributes() -> Result<()> {
    let fixture = TemplateFixture::new()?;
    fixture.template("card/show", "{{ title }}")?;
    let mut config = fixture.engine_config();
    config.components = card_decls();

    let store = Arc::new(MemoryFragmentStore::new());
    let engine = Engine::builder().config(config).store(store.clone()).build()?;

    engine.render("card", RenderOptions::new().attr("title", json!("a")))?;
    engine.render("card", RenderOptions::new().attr("title", json!("b")))?;
    engine.render("card", RenderOptions::new().attr("title", json!("a")))?;

    assert_eq!(store.len(), 2);
    assert_eq!(store.stats().hits, 1);
    Ok(())
}

#[test]
fn test_template_directories_become_helpers() -> Result<()> {
    let fixture = TemplateFixture::new()?;
    fixture.template("badge/show", "<b>{{ label }}</b>")?;
    fixture.template("alert/show", "<p>{{ block_content }}</p>")?;
    fixture.template("concerns/shared", "ignored")?;

    let engine = Engine::builder().config(fixture.engine_config()).build()?;
    assert_eq!(engine.discovered_components(), ["alert", "badge"]);
    assert_eq!(engine.helper_names(), vec!["alert".to_string(), "badge".to_string()]);

    let page = "{{ badge(label=name) | safe }}{{ alert(block='careful') | safe }}";
    let locals = Attributes::from([("name".to_string(), json!("new"))]);
    assert_eq!(engine.render_page(page, &locals)?, "<b>new</b><p>careful</p>");
    Ok(())
}

#[test]
fn test_path_traversal_is_rejected() {
    let fixture = TemplateFixture::new().unwrap();
    let engine = Engine::builder().config(fixture.engine_config()).build().unwrap();

    let err = engine.render("..", RenderOptions::new()).unwrap_err();
    assert!(format!("{err:#}").contains("escapes the template root"), "error: {err:#}");
}

#[test]
fn test_unknown_declared_parent_fails_build() {
    let mut config = EngineConfig::default();
    config.components.insert(
        "OrphanComponent".to_string(),
        ComponentDecl {
            parent: Some("MissingComponent".to_string()),
            ..ComponentDecl::default()
        },
    );

    let err = Engine::builder().config(config).build().unwrap_err();
    assert!(matches!(err.downcast_ref::<ComponentError>(), Some(ComponentError::ConfigError { .. })));
}

#[test]
fn test_missing_template_root_is_tolerated() -> Result<()> {
    let config = EngineConfig {
        template_root: Some("/nonexistent/componentry/templates".into()),
        ..EngineConfig::default()
    };
    let engine = Engine::builder().config(config).build()?;
    assert!(engine.discovered_components().is_empty());
    Ok(())
}
