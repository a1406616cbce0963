//! Compile configuration.
//!
//! Settings resolve in this order, later sources winning: built-in
//! defaults, an optional TOML file, the `ENTITIES_RESOURCE_DIR` environment
//! variable, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use entities_ingest::VOCABULARY_FILE;
use entities_thumbs::RasterizerPrograms;

/// Environment variable naming the resource root.
pub const RESOURCE_DIR_ENV: &str = "ENTITIES_RESOURCE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Root of the entity tree (`<dir>/<kind>/**/*.json`).
    pub entities_dir: PathBuf,
    /// Combined documents holding a sequence of records each.
    pub combined: Vec<PathBuf>,
    /// Vocabulary document; defaults to `valid_values.json` in the entity
    /// directory.
    pub vocabulary: Option<PathBuf>,
    pub output: PathBuf,
    /// Directory that `/resources/` URLs resolve against.
    pub resource_dir: PathBuf,
    /// Pretty-print the output document.
    pub pretty: bool,
    pub thumbnails: ThumbnailConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            entities_dir: PathBuf::from("entities"),
            combined: Vec::new(),
            vocabulary: None,
            output: PathBuf::from("entities.json"),
            resource_dir: PathBuf::from("."),
            pretty: false,
            thumbnails: ThumbnailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailConfig {
    pub enabled: bool,
    pub workers: usize,
    pub shell: String,
    pub pdftoppm: String,
    pub convert: String,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        let programs = RasterizerPrograms::default();
        Self {
            enabled: true,
            workers: 4,
            shell: programs.shell,
            pdftoppm: programs.pdftoppm,
            convert: programs.convert,
        }
    }
}

impl ThumbnailConfig {
    pub fn programs(&self) -> RasterizerPrograms {
        RasterizerPrograms {
            shell: self.shell.clone(),
            pdftoppm: self.pdftoppm.clone(),
            convert: self.convert.clone(),
        }
    }
}

impl CompileConfig {
    /// Reads a TOML configuration file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(RESOURCE_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            self.resource_dir = PathBuf::from(dir);
        }
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.vocabulary
            .clone()
            .unwrap_or_else(|| self.entities_dir.join(VOCABULARY_FILE))
    }
}
