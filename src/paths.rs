use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Per-user directory holding named configs.
pub const CONFIG_DIR: &str = ".ghostmux";
/// Config used when neither a name nor a path is given.
pub const LOCAL_CONFIG: &str = ".ghostmux.yml";
/// Extensions tried, in order, when resolving a named config.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["yml", "yaml", "toml"];

/// `~/.ghostmux`, or `None` when the home directory is unknown.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

/// Resolve a config name to a file in `configs_dir`.
///
/// Prefers `<name>.yml`, then `.yaml`, then `.toml`. When none exist the
/// `.yml` path is returned so the read error names the expected file.
pub fn named_config(configs_dir: &Path, name: &str) -> PathBuf {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| configs_dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
        .unwrap_or_else(|| configs_dir.join(format!("{name}.{}", CONFIG_EXTENSIONS[0])))
}

/// Pick the config file: a name beats an explicit path, which beats the
/// local `.ghostmux.yml`.
pub fn resolve_config_path(
    name: Option<&str>,
    path: Option<&Path>,
    configs_dir: &Path,
    cwd: &Path,
) -> PathBuf {
    if let Some(name) = name {
        return named_config(configs_dir, name);
    }
    if let Some(path) = path {
        return path.to_path_buf();
    }
    cwd.join(LOCAL_CONFIG)
}

/// Names of configs available in `configs_dir`, sorted and de-duplicated.
///
/// A missing directory lists as empty.
pub fn list_configs(configs_dir: &Path) -> Result<Vec<String>> {
    if !configs_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(configs_dir)
        .with_context(|| format!("failed to list {}", configs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext));
        if !matches_ext {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    names.dedup();
    Ok(names)
}
