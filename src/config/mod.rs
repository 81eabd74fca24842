use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::layout::LayoutKind;
use crate::window::{PaneSpec, SpecError, WindowSpec};

/// Serialization format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// A pane as written in the config: either a bare command or a mapping.
///
/// ```yaml
/// panes:
///   - htop
///   - commands: [cargo watch -x test]
///     root: ~/code/app
///     focus: true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PaneEntry {
    Command(String),
    Expanded(PaneConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaneConfig {
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub focus: bool,
    #[serde(default)]
    pub root: Option<String>,
}

impl PaneEntry {
    fn into_spec(self) -> PaneSpec {
        match self {
            PaneEntry::Command(command) => PaneSpec::command(command),
            PaneEntry::Expanded(config) => PaneSpec {
                commands: config.commands,
                root: non_empty(config.root).map(PathBuf::from),
                focus: config.focus,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub panes: Vec<PaneEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub windows: Vec<WindowConfig>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Read, parse and validate the config at `path`.
    pub fn load(path: &Path) -> Result<Vec<WindowSpec>> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::parse(&contents, ConfigFormat::from_path(path))
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let windows = config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(windows)
    }

    pub fn parse(contents: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(contents).context("parsing YAML")?,
            ConfigFormat::Toml => toml::from_str(contents).context("parsing TOML")?,
        };
        Ok(config)
    }

    /// Check every window and convert to the immutable runtime form.
    ///
    /// An empty `layout` counts as absent. Unknown layout names are rejected
    /// here rather than silently replaced.
    pub fn validate(self) -> Result<Vec<WindowSpec>, SpecError> {
        if self.windows.is_empty() {
            return Err(SpecError::NoWindows);
        }

        let mut specs = Vec::with_capacity(self.windows.len());
        for (index, window) in self.windows.into_iter().enumerate() {
            if window.name.trim().is_empty() {
                return Err(SpecError::MissingName { index });
            }
            if window.panes.is_empty() {
                return Err(SpecError::NoPanes {
                    window: window.name,
                });
            }

            let layout = match non_empty(window.layout) {
                Some(name) => name.parse::<LayoutKind>().map_err(|source| {
                    SpecError::UnknownLayout {
                        window: window.name.clone(),
                        source,
                    }
                })?,
                None => LayoutKind::default(),
            };

            let panes = window.panes.into_iter().map(PaneEntry::into_spec).collect();
            specs.push(WindowSpec::new(
                window.name,
                non_empty(window.root).map(PathBuf::from),
                layout,
                panes,
            )?);
        }
        Ok(specs)
    }
}
