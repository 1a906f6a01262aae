//! Library configuration properties.
//!
//! Settings resolve through a fixed chain: the process environment wins,
//! then an optional TOML file under the XDG config home, then the
//! caller-supplied default. Every value is handled as a string; the
//! consuming module parses it.

use crate::error::{Result, SpdxLibraryError};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "SPDX_";

const CONFIG_PREFIX: &str = "spdx-library";
const CONFIG_FILE: &str = "config.toml";

/// Flat property map with environment override.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Loads `$XDG_CONFIG_HOME/spdx-library/config.toml` when present, an
    /// empty map otherwise.
    pub fn load() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX)?;
        match xdg_dirs.find_config_file(CONFIG_FILE) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads properties from a specific TOML file.
    ///
    /// Nested tables flatten into dotted names, so `[download.cache]
    /// enabled = true` becomes `download.cache.enabled` = `"true"`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| SpdxLibraryError::io(path, e))?;
        let table: toml::Table = toml::from_str(&data)?;
        let mut values = HashMap::new();
        flatten("", &table, &mut values);
        Ok(Self { values })
    }

    /// Resolves `name`, falling back to `default`.
    ///
    /// The environment key is the property name uppercased with `.` and `-`
    /// mapped to `_` and prefixed `SPDX_`, so `download.cache.enabled` is
    /// overridden by `SPDX_DOWNLOAD_CACHE_ENABLED`.
    pub fn get(&self, name: &str, default: &str) -> String {
        if let Ok(value) = env::var(env_key(name)) {
            return value;
        }
        self.values
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

fn env_key(name: &str) -> String {
    let mut key = String::with_capacity(ENV_PREFIX.len() + name.len());
    key.push_str(ENV_PREFIX);
    for c in name.chars() {
        match c {
            '.' | '-' => key.push('_'),
            c => key.push(c.to_ascii_uppercase()),
        }
    }
    key
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten(&name, nested, out),
            toml::Value::String(s) => {
                out.insert(name, s.clone());
            }
            other => {
                out.insert(name, other.to_string());
            }
        }
    }
}
