//! Configuration loading

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde_yaml_ng::Value;

use crate::domain::value_objects::Target;
use crate::error::{ConfigError, ConfigResult};

use super::types::{ConfigWarning, TargetEntry, REQUIRED_KEYS};

/// Load targets from `cfg_path`, logging any ignored keys.
pub fn parse_config(
    cfg_path: &Path,
    local_base: &Path,
    remote_base: &Path,
) -> ConfigResult<BTreeSet<Target>> {
    let (targets, warnings) = load_with_warnings(cfg_path, local_base, remote_base)?;
    for warning in &warnings {
        log::warn!("{}", warning);
    }
    Ok(targets)
}

/// Load targets and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(
    cfg_path: &Path,
    local_base: &Path,
    remote_base: &Path,
) -> ConfigResult<(BTreeSet<Target>, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(cfg_path).map_err(|source| ConfigError::Read {
        path: cfg_path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded config from {}", cfg_path.display());

    parse_str(&content, cfg_path, local_base, remote_base)
}

/// Parse config `content`; `cfg_path` is only used in messages.
pub fn parse_str(
    content: &str,
    cfg_path: &Path,
    local_base: &Path,
    remote_base: &Path,
) -> ConfigResult<(BTreeSet<Target>, Vec<ConfigWarning>)> {
    let path = cfg_path.to_path_buf();

    let document: Value = serde_yaml_ng::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let entries = match document.get("targets") {
        None => return Err(ConfigError::MissingTargets { path }),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(ConfigError::NotAList { path }),
    };

    let mut targets = BTreeSet::new();
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(mapping) = entry.as_mapping() else {
            return Err(ConfigError::InvalidEntry {
                path,
                index,
                message: "expected a mapping with 'local_path' and 'remote_path'".to_string(),
            });
        };

        for key in REQUIRED_KEYS {
            if !mapping.contains_key(key) {
                return Err(ConfigError::MissingKey {
                    path,
                    index,
                    key: key.to_string(),
                });
            }
        }

        let mut ignored = Vec::new();
        let parsed: TargetEntry = serde_ignored::deserialize(entry.clone(), |p| {
            ignored.push(p.to_string());
        })
        .map_err(|e| ConfigError::InvalidEntry {
            path: path.clone(),
            index,
            message: e.to_string(),
        })?;

        warnings.extend(ignored.into_iter().map(|key| ConfigWarning {
            key,
            file: path.clone(),
            entry: index,
        }));

        let mut target = Target::new(
            local_base,
            parsed.local_path,
            remote_base,
            parsed.remote_path,
        );
        if let Some(service) = parsed.service {
            target = target.with_service(service);
        }
        if let Some(command) = parsed.pre_exec {
            target = target.with_pre_exec(command);
        }
        targets.insert(target);
    }

    if targets.is_empty() {
        return Err(ConfigError::EmptyTargets { path });
    }

    log::debug!("{} target(s) in {}", targets.len(), path.display());
    Ok((targets, warnings))
}
