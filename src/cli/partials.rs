//! List the partials a template references.
//!
//! Each partial is shown with the resource path it resolves to and whether
//! that resource exists:
//!
//! ```text
//! footer_links -> footer/links.html
//! header       -> header.html
//! sidebar      -> sidebar.html (missing)
//! ```
//!
//! With `--nested`, partials referenced from inside other partials are listed too.
//! A nested reference with no resource that the bootstrap script registers is
//! marked `(engine)`, since the render leaves it to the engine.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::common::{ResourceArgs, registered_partials, resource_loader};
use crate::config::RenderConfig;
use crate::loader::ResourceLoader;
use crate::templating::{PartialScanner, PartialSet, encode};

/// Command to list a template's partials.
#[derive(Args, Debug)]
pub struct PartialsCommand {
    /// Template resource name, relative to the resource root
    template: String,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct PartialEntry {
    name: String,
    path: String,
    found: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    registered: bool,
}

impl PartialsCommand {
    /// Execute the partials command.
    ///
    /// # Errors
    /// Returns an error if the template cannot be loaded, or if a nested walk
    /// hits a partial that fails to load for a reason other than being absent
    pub async fn execute(self, config: RenderConfig) -> Result<()> {
        let config = self.resources.apply(config);
        let loader = resource_loader(&config);

        let template = loader.load(&self.template)?;
        let scanner = PartialScanner::new(config.resolver());
        let direct = scanner.scan(&encode(&template));

        let entries = if config.nested_partials {
            let registered = registered_partials(&config, loader.as_ref());
            walk_nested(loader.as_ref(), &scanner, direct, &registered)?
        } else {
            direct
                .iter()
                .map(|(name, path)| PartialEntry {
                    name: name.to_string(),
                    path: path.to_string(),
                    found: loader.load(path).is_ok(),
                    registered: false,
                })
                .collect()
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No partials referenced by {}", self.template);
            return Ok(());
        }

        let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for entry in &entries {
            let line = format!("{:width$} -> {}", entry.name, entry.path);
            if entry.found {
                println!("{line}");
            } else if entry.registered {
                println!("{} {}", line, "(engine)".cyan());
            } else {
                println!("{} {}", line, "(missing)".red());
            }
        }

        Ok(())
    }
}

/// Follow references through every loadable partial, keeping missing ones
/// in the listing instead of failing.
fn walk_nested(
    loader: &dyn ResourceLoader,
    scanner: &PartialScanner,
    direct: PartialSet,
    registered: &BTreeSet<String>,
) -> Result<Vec<PartialEntry>> {
    let direct_names: BTreeSet<String> = direct.names().map(str::to_string).collect();
    let mut entries: BTreeMap<String, PartialEntry> = BTreeMap::new();
    let mut pending: Vec<(String, String)> = direct.into_iter().collect();

    while let Some((name, path)) = pending.pop() {
        if entries.contains_key(&name) {
            continue;
        }

        let found = match loader.load(&path) {
            Ok(content) => {
                pending.extend(scanner.scan(&encode(&content)));
                true
            }
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e.into()),
        };

        let registered =
            !found && !direct_names.contains(&name) && registered.contains(&name);
        entries.insert(name.clone(), PartialEntry {
            name,
            path,
            found,
            registered,
        });
    }

    Ok(entries.into_values().collect())
}
