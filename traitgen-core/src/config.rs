//! Configuration loading from traitgen.toml.
//!
//! Every field mirrors a CLI flag; explicit CLI values win over file
//! values (merging happens in the pipeline builder).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Main configuration structure for traitgen.toml.
#[derive(Debug, Deserialize, Default)]
pub struct TraitgenConfig {
    /// Explicit trait name. Blank for the derived agent-noun name.
    pub name: Option<String>,
    /// Destination module name for the generated declaration.
    pub module: Option<String>,
    /// `cfg` predicate emitted as a build-tag line.
    pub tags: Option<String>,
    /// Output target. `-` selects stdout.
    pub output: Option<String>,
    /// Extra directory names to exclude from file discovery.
    pub exclude: Option<Vec<String>>,
}

/// Loads configuration from `<root>/traitgen.toml` if it exists.
pub fn load_config(root: &Path) -> Result<Option<TraitgenConfig>> {
    let path = root.join("traitgen.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid traitgen.toml")?;
    Ok(Some(cfg))
}
