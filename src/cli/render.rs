//! The `render` command.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{EngineConfig, ResolutionPolicy};
use crate::render::{Block, Engine, RenderOptions};

/// Render a component and print its output.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Component reference, e.g. `card` or `admin/card`
    component: String,

    /// Action to render
    #[arg(short, long, default_value = "show")]
    action: String,

    /// Attribute as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = super::parse_attribute)]
    attributes: Vec<(String, Value)>,

    /// Data object as JSON
    #[arg(long, value_name = "JSON")]
    object: Option<String>,

    /// Collection as a JSON array; renders once per element
    #[arg(long, value_name = "JSON", conflicts_with = "object")]
    collection: Option<String>,

    /// Block content passed to the component
    #[arg(long, value_name = "TEXT")]
    block: Option<String>,

    /// Template root, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Disable fragment caching
    #[arg(long)]
    no_cache: bool,

    /// Fail on unknown component references instead of using the base component
    #[arg(long)]
    strict: bool,
}

impl RenderCommand {
    pub fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let mut config = EngineConfig::load_with_optional(config_path)?;
        if let Some(templates) = &self.templates {
            config.template_root = Some(templates.clone());
        }
        if self.no_cache {
            config.perform_caching = false;
        }
        if self.strict {
            config.resolution = ResolutionPolicy::Strict;
        }

        let engine = Engine::builder().config(config).build()?;
        let output = engine.render(&self.component, self.options()?)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes()).context("Failed to write rendered output")?;
        if !output.ends_with('\n') {
            writeln!(stdout).context("Failed to write rendered output")?;
        }
        Ok(())
    }

    fn options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::new().action(&self.action);
        for (name, value) in &self.attributes {
            options = options.attr(name.clone(), value.clone());
        }
        if let Some(object) = &self.object {
            options = options.object(serde_json::from_str(object).context("Invalid JSON in --object")?);
        }
        if let Some(collection) = &self.collection {
            let items = match serde_json::from_str(collection).context("Invalid JSON in --collection")? {
                Value::Array(items) => items,
                other => vec![other],
            };
            options = options.collection(items);
        }
        if let Some(block) = &self.block {
            options = options.block(Block::text(block.clone()));
        }
        Ok(options)
    }
}
