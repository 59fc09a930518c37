//! Verifier configuration: path conventions and naming conventions that the
//! matchers and the alias resolver rely on.
//!
//! The defaults encode the conventions the tool ships with. A JSON or YAML file
//! can override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Current configuration format version.
pub const CONFIG_VERSION: &str = "0.1.0";

/// Rewrite rule from a system include prefix to a directory under the source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeMirror {
    /// Absolute prefix as it appears in debug info (e.g. `/usr/local/include/`).
    pub prefix: String,
    /// Directory name under the source root that mirrors `prefix`.
    pub mirror: String,
}

impl IncludeMirror {
    pub fn new(prefix: impl Into<String>, mirror: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), mirror: mirror.into() }
    }
}

/// Serializable configuration for a verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Schema/config version. This is about the config format.
    pub config_version: String,
    /// Declared-path prefixes excluded from verification entirely.
    pub excluded_roots: Vec<String>,
    /// System include prefixes rewritten to local mirror directories.
    pub include_mirrors: Vec<IncludeMirror>,
    /// Ordered prefixes tried by the prefix-stripping convention.
    pub strip_prefixes: Vec<String>,
    /// Header token meaning the prototype is backed by a fortified wrapper.
    pub fortify_marker: String,
    /// Tokens whose following non-blank line is a candidate definition site.
    pub wrapper_markers: Vec<String>,
    /// Extensions (without the dot) treated as C translation units.
    pub source_extensions: Vec<String>,
    /// Extensions (without the dot) treated as C headers.
    pub header_extensions: Vec<String>,
    /// How many lines on either side of the declared line the line heuristic inspects.
    pub line_window: u32,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION.to_string(),
            excluded_roots: vec!["/usr/include/".to_string()],
            include_mirrors: vec![IncludeMirror::new("/usr/local/include/", "include")],
            strip_prefixes: vec!["rlp_".to_string(), "__GI_".to_string(), "__libc_".to_string()],
            fortify_marker: "__fortify_function".to_string(),
            wrapper_markers: vec![
                "__extern_always_inline".to_string(),
                "__extern_inline".to_string(),
            ],
            source_extensions: vec!["c".to_string()],
            header_extensions: vec!["h".to_string()],
            line_window: 1,
        }
    }
}

/// On-disk format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or_default() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            other => Err(anyhow!(
                "Unsupported config extension '{}' for {}; expected json, yaml, or yml",
                other,
                path.display()
            )),
        }
    }
}

/// Load a verifier config from a JSON or YAML file.
pub fn load_config(path: &Path) -> Result<VerifierConfig> {
    let format = ConfigFormat::from_path(path)?;
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read verifier config at {}", path.display()))?;
    let config = match format {
        ConfigFormat::Json => {
            serde_json::from_str(&body).context("Failed to parse verifier config JSON")?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(&body).context("Failed to parse verifier config YAML")?
        }
    };
    Ok(config)
}

/// Serialize a config in the format implied by `path`.
pub fn render_config(config: &VerifierConfig, path: &Path) -> Result<String> {
    let body = match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(body)
}
