//! Configuration file upgrades: detect keys added in newer releases and
//! write them back with their default values, leaving existing values alone.

use super::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys that the current release expects in the YAML file.
fn expected_keys() -> AppResult<Mapping> {
    let defaults = serde_yaml::to_value(Config::default())?;
    Ok(defaults.as_mapping().cloned().unwrap_or_default())
}

/// Return the names of keys missing from the config file at `path`.
/// A missing file is reported as missing every key.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let expected = expected_keys()?;

    let current = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str::<Value>(&content)?
    } else {
        Value::Mapping(Mapping::new())
    };

    let current = current.as_mapping().cloned().unwrap_or_default();

    Ok(expected
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add missing keys to the config file. Returns the keys that were added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        info("Configuration already up to date.");
        return Ok(missing);
    }

    let expected = expected_keys()?;
    let mut current = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str::<Value>(&content)?
            .as_mapping()
            .cloned()
            .unwrap_or_default()
    } else {
        Mapping::new()
    };

    for key in &missing {
        let k = Value::String(key.clone());
        if let Some(v) = expected.get(&k) {
            current.insert(k, v.clone());
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(&Value::Mapping(current))?)?;

    success(format!(
        "Configuration migrated, added: {}",
        missing.join(", ")
    ));
    Ok(missing)
}
