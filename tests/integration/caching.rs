//! Fragment cache behavior through the render entry point.

use anyhow::Result;
use componentry::cache::{FragmentKey, FragmentStore, MemoryFragmentStore};
use componentry::component::ComponentClass;
use componentry::config::{EngineConfig, Environment};
use componentry::render::{Block, Engine, RenderOptions};
use componentry::templating::{MemoryTemplates, digest_source};
use componentry::test_utils::{RecordingStore, StoreOp, counting_action, memory_engine};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const CARD_SHOW: &str = "card {{ title }}";

struct Fixture {
    engine: Engine,
    templates: Arc<MemoryTemplates>,
    store: Arc<MemoryFragmentStore>,
    counter: Arc<AtomicUsize>,
}

impl Fixture {
    fn new(config: EngineConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryFragmentStore::new()))
    }

    fn with_store(config: EngineConfig, store: Arc<MemoryFragmentStore>) -> Result<Self> {
        let counter = Arc::new(AtomicUsize::new(0));
        let card = ComponentClass::builder("CardComponent")
            .attribute("title", json!("Untitled"))
            .action("show", counting_action(counter.clone()))
            .cache_key(|_| Ok(json!("123")))
            .build();

        let (builder, templates) = memory_engine(&[("card/show", CARD_SHOW)]);
        let engine = builder.config(config).store(store.clone()).component(card).build()?;
        Ok(Self {
            engine,
            templates,
            store,
            counter,
        })
    }

    fn render(&self) -> Result<String> {
        self.engine.render("card", RenderOptions::new())
    }

    fn actions_run(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[test]
fn test_second_render_is_served_from_cache() -> Result<()> {
    let fixture = Fixture::new(EngineConfig::default())?;

    let first = fixture.render()?;
    let second = fixture.render()?;

    assert_eq!(first, "card Untitled");
    assert_eq!(first, second);
    assert_eq!(fixture.actions_run(), 1);

    let stats = fixture.store.stats();
    assert_eq!((stats.hits, stats.misses, stats.writes), (1, 1, 1));
    Ok(())
}

#[test]
fn test_fragment_key_carries_digest_and_cache_key() -> Result<()> {
    let fixture = Fixture::new(EngineConfig::default())?;
    fixture.render()?;

    let expected = FragmentKey::for_template("card/show", Some(&digest_source(CARD_SHOW)), "show", json!("123"));
    assert_eq!(fixture.store.keys(), vec![expected.store_key()]);
    assert!(expected.store_key().starts_with("components/card/show:sha256:"));
    Ok(())
}

#[test]
fn test_stored_fragment_short_circuits_action() -> Result<()> {
    let fixture = Fixture::new(EngineConfig::default())?;
    let key = FragmentKey::for_template("card/show", Some(&digest_source(CARD_SHOW)), "show", json!("123"));
    fixture.store.write(&key.store_key(), "from the store".to_string());

    assert_eq!(fixture.render()?, "from the store");
    assert_eq!(fixture.actions_run(), 0);
    Ok(())
}

#[test]
fn test_global_switch_off_always_renders() -> Result<()> {
    let store = Arc::new(MemoryFragmentStore::new());
    let warm = Fixture::with_store(EngineConfig::default(), store.clone())?;
    warm.render()?;
    assert_eq!(store.len(), 1);

    let cold = Fixture::with_store(
        EngineConfig {
            perform_caching: false,
            ..EngineConfig::default()
        },
        store.clone(),
    )?;
    cold.render()?;
    cold.render()?;

    assert_eq!(cold.actions_run(), 2);
    assert_eq!(store.stats().hits, 0);
    Ok(())
}

#[test]
fn test_class_switch_overrides_global() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let live = ComponentClass::builder("TickerComponent")
        .perform_caching(false)
        .action("show", counting_action(counter.clone()))
        .cache_key(|_| Ok(json!("k")))
        .build();
    let (builder, _) = memory_engine(&[("ticker/show", "tick")]);
    let engine = builder.component(live).build()?;

    engine.render("ticker", RenderOptions::new())?;
    engine.render("ticker", RenderOptions::new())?;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_template_edit_invalidates() -> Result<()> {
    let fixture = Fixture::new(EngineConfig::default())?;
    assert_eq!(fixture.render()?, "card Untitled");
    fixture.render()?;
    assert_eq!(fixture.actions_run(), 1);

    fixture.templates.insert("card/show", "edited {{ title }}");
    assert_eq!(fixture.render()?, "edited Untitled");
    assert_eq!(fixture.actions_run(), 2);
    assert_eq!(fixture.store.len(), 2);
    Ok(())
}

#[test]
fn test_falsy_cache_key_bypasses() -> Result<()> {
    for key in [json!(false), json!(null)] {
        let counter = Arc::new(AtomicUsize::new(0));
        let class = ComponentClass::builder("CardComponent")
            .action("show", counting_action(counter.clone()))
            .cache_key(move |_| Ok(key.clone()))
            .build();
        let store = Arc::new(MemoryFragmentStore::new());
        let (builder, _) = memory_engine(&[("card/show", "card")]);
        let engine = builder.store(store.clone()).component(class).build()?;

        engine.render("card", RenderOptions::new())?;
        engine.render("card", RenderOptions::new())?;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(store.is_empty());
    }
    Ok(())
}

#[test]
fn test_development_default_key_disables_caching() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let class = ComponentClass::builder("CardComponent").action("show", counting_action(counter.clone())).build();
    let store = Arc::new(MemoryFragmentStore::new());
    let (builder, _) = memory_engine(&[("card/show", "card")]);
    let engine = builder
        .config(EngineConfig {
            environment: Environment::Development,
            ..EngineConfig::default()
        })
        .store(store.clone())
        .component(class)
        .build()?;

    engine.render("card", RenderOptions::new())?;
    engine.render("card", RenderOptions::new())?;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_base_component_is_never_cached() -> Result<()> {
    let store = Arc::new(MemoryFragmentStore::new());
    let (builder, _) = memory_engine(&[("plain/show", "plain")]);
    let engine = builder.store(store.clone()).build()?;

    assert_eq!(engine.render("plain", RenderOptions::new())?, "plain");
    assert!(store.is_empty());
    assert_eq!(store.stats().misses, 0);
    Ok(())
}

#[test]
fn test_empty_fragment_is_a_miss() -> Result<()> {
    let counter = Arc::new(AtomicUsize::new(0));
    let class = ComponentClass::builder("EmptyComponent")
        .action("show", counting_action(counter.clone()))
        .cache_key(|_| Ok(json!(1)))
        .build();
    let (builder, _) = memory_engine(&[("empty/show", "")]);
    let engine = builder.component(class).build()?;

    assert_eq!(engine.render("empty", RenderOptions::new())?, "");
    assert_eq!(engine.render("empty", RenderOptions::new())?, "");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_identity_key_without_template_digest() -> Result<()> {
    let store = Arc::new(MemoryFragmentStore::new());
    let class = ComponentClass::builder("InlineComponent")
        .action("show", |component, view| component.render_inline(view, "inline"))
        .cache_key(|_| Ok(json!("123")))
        .build();
    let (builder, _) = memory_engine(&[]);
    let engine = builder.store(store.clone()).component(class).build()?;

    assert_eq!(engine.render("inline", RenderOptions::new())?, "inline");
    assert_eq!(store.keys(), vec!["components/inline/show/show".to_string()]);
    Ok(())
}

#[test]
fn test_cache_key_from_attribute_and_block() -> Result<()> {
    let store = Arc::new(MemoryFragmentStore::new());
    let class = ComponentClass::builder("KeyedComponent")
        .cache_key(|component| Ok(json!([component.attribute("value"), component.block_content()])))
        .build();
    let (builder, _) = memory_engine(&[("keyed/show", "{{ value }} {{ block_content }}")]);
    let engine = builder.store(store.clone()).component(class).build()?;

    let options = RenderOptions::new().attr("value", json!("v")).block(Block::value(json!("the block")));
    assert_eq!(engine.render("keyed", options)?, "v the block");

    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].ends_with("/v/the block"), "key: {}", keys[0]);
    Ok(())
}

#[test]
fn test_miss_writes_then_hit_reads() -> Result<()> {
    let store = Arc::new(RecordingStore::new());
    let class = ComponentClass::builder("CardComponent").cache_key(|_| Ok(json!("123"))).build();
    let (builder, _) = memory_engine(&[("card/show", CARD_SHOW)]);
    let engine = builder.store(store.clone()).component(class).build()?;

    engine.render("card", RenderOptions::new())?;
    engine.render("card", RenderOptions::new())?;

    let key = FragmentKey::for_template("card/show", Some(&digest_source(CARD_SHOW)), "show", json!("123")).store_key();
    assert_eq!(
        store.ops(),
        vec![
            StoreOp::Read {
                key: key.clone(),
                hit: false,
            },
            StoreOp::Write {
                key: key.clone(),
            },
            StoreOp::Read {
                key,
                hit: true,
            },
        ]
    );
    Ok(())
}

#[test]
fn test_subclass_caches_per_object_through_inherited_template() -> Result<()> {
    let store = Arc::new(MemoryFragmentStore::new());
    let card = ComponentClass::builder("CardComponent")
        .cache_key(|component| Ok(component.object().cloned().unwrap_or(Value::Null)))
        .build();
    let featured = ComponentClass::builder("FeaturedCardComponent").parent(card.clone()).build();
    let (builder, templates) = memory_engine(&[("card/show", "card {{ object.id }}")]);
    let engine = builder.store(store.clone()).component(card).component(featured).build()?;

    let first = engine.render("featured_card", RenderOptions::new().object(json!({"id": 1})))?;
    let second = engine.render("featured_card", RenderOptions::new().object(json!({"id": 2})))?;
    assert_eq!(first, "card 1");
    assert_eq!(second, "card 2");

    let digest = digest_source("card {{ object.id }}");
    let mut keys = store.keys();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            FragmentKey::for_template("featured_card/show", Some(&digest), "show", json!({"id": 1})).store_key(),
            FragmentKey::for_template("featured_card/show", Some(&digest), "show", json!({"id": 2})).store_key(),
        ]
    );

    // Editing the inherited template moves the subclass to new keys
    templates.insert("card/show", "featured {{ object.id }}");
    let edited = engine.render("featured_card", RenderOptions::new().object(json!({"id": 1})))?;
    assert_eq!(edited, "featured 1");
    assert_eq!(store.len(), 3);
    Ok(())
}
