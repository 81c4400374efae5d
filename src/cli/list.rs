//! The `list` command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::render::Engine;

/// List the component types and template directories the engine knows.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Template root, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct ListEntry {
    name: String,
    /// Declared as a type (in code or configuration)
    registered: bool,
    /// Has a template directory
    templates: bool,
    /// Callable as `{{ name(...) }}` in templates
    helper: bool,
}

impl ListCommand {
    pub fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let mut config = EngineConfig::load_with_optional(config_path)?;
        if let Some(templates) = self.templates {
            config.template_root = Some(templates);
        }
        let engine = Engine::builder().config(config).build()?;
        let entries = list_entries(&engine);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No components found");
            return Ok(());
        }
        println!("{:<24} {:<10} {:<10} {}", "NAME".bold(), "TYPE".bold(), "TEMPLATES".bold(), "HELPER".bold());
        for entry in &entries {
            let kind = if entry.registered { "class" } else { "base" };
            println!(
                "{:<24} {:<10} {:<10} {}",
                entry.name,
                kind,
                if entry.templates { "yes".green() } else { "no".yellow() },
                if entry.helper { "yes" } else { "no" }
            );
        }
        Ok(())
    }
}

pub(crate) fn list_entries(engine: &Engine) -> Vec<ListEntry> {
    let registered = engine.registry().references();
    let discovered = engine.discovered_components();
    let helpers = engine.helper_names();

    let mut names: Vec<String> = registered.iter().chain(discovered.iter()).cloned().collect();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|name| ListEntry {
            registered: registered.contains(&name),
            templates: discovered.contains(&name),
            helper: helpers.contains(&name),
            name,
        })
        .collect()
}
