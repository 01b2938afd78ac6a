//! Rendering configuration stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::compose::DEFAULT_BODY_INDENT;
use crate::core::dump::DEFAULT_INDENT;
use crate::core::filter::FilterPolicy;

/// Rendering configuration (TOML).
///
/// Read once per run and never changed while rendering. Missing fields
/// default to the built-in policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces per nesting level inside a dumped body.
    pub indent: usize,

    /// Spaces the dumped body is shifted under the flag line.
    pub body_indent: usize,

    pub filter: FilterPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            body_indent: DEFAULT_BODY_INDENT,
            filter: FilterPolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.indent == 0 {
            return Err(anyhow!("indent must be > 0"));
        }
        if self.filter.verbose_threshold == 0 {
            return Err(anyhow!("filter.verbose_threshold must be > 0"));
        }
        if self.filter.placeholder.is_empty() {
            return Err(anyhow!("filter.placeholder must be non-empty"));
        }
        if self.filter.no_log_key.trim().is_empty() {
            return Err(anyhow!("filter.no_log_key must be non-empty"));
        }
        if self
            .filter
            .internal_key_prefixes
            .iter()
            .any(|prefix| prefix.is_empty())
        {
            return Err(anyhow!("filter.internal_key_prefixes must not contain \"\""));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RenderConfig::default()`.
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    if !path.exists() {
        let cfg = RenderConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RenderConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Serialize config as pretty TOML with a trailing newline.
pub fn config_toml(cfg: &RenderConfig) -> Result<String> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    Ok(buf)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RenderConfig) -> Result<()> {
    let buf = config_toml(cfg)?;
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
