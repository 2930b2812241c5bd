//! Upgrades raw config objects written by older versions before they are decoded.

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

pub const CURRENT_CONFIG_VERSION: u32 = 2;
pub const CONFIG_VERSION_KEY: &str = "configVersion";
pub const CUSTOM_TAGS_KEY: &str = "customTags";

type UpdateStep = fn(&mut Map<String, Value>);

/// Step `i` upgrades a config from version `i + 1` to version `i + 2`.
const UPDATE_STEPS: [UpdateStep; CURRENT_CONFIG_VERSION as usize - 1] = [add_original_names];

/// The version a config object was written with. Configs predating the version field are
/// version 1.
pub fn config_version(object: &Map<String, Value>) -> u32 {
    object
        .get(CONFIG_VERSION_KEY)
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(1)
}

/// Applies every step from `used_version` up to [`CURRENT_CONFIG_VERSION`] and records the new
/// version in `object`.
pub fn update_config(object: &mut Map<String, Value>, used_version: u32) -> ConfigResult<u32> {
    if used_version > CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(
            used_version,
            CURRENT_CONFIG_VERSION,
        ));
    }
    if used_version == CURRENT_CONFIG_VERSION {
        return Ok(used_version);
    }

    tracing::info!(
        "Config update detected, current version: {}, required version: {}.",
        used_version,
        CURRENT_CONFIG_VERSION
    );

    let first_step = used_version.saturating_sub(1) as usize;
    for update in &UPDATE_STEPS[first_step..] {
        update(object);
    }

    object.insert(
        CONFIG_VERSION_KEY.to_string(),
        Value::from(CURRENT_CONFIG_VERSION),
    );
    Ok(CURRENT_CONFIG_VERSION)
}

/// Version 2 stores the username inside each tag instead of only as its key.
fn add_original_names(object: &mut Map<String, Value>) {
    let Some(custom_tags) = object
        .get_mut(CUSTOM_TAGS_KEY)
        .and_then(Value::as_object_mut)
    else {
        tracing::warn!("Could not find customTags in config, updating of config to version 2 failed.");
        return;
    };

    for (name, custom_tag) in custom_tags.iter_mut() {
        let Some(custom_tag) = custom_tag.as_object_mut() else {
            tracing::warn!(
                "Invalid customTag in config, updating of config to version 2 failed for entry {}.",
                name
            );
            continue;
        };
        custom_tag.insert("originalName".to_string(), Value::String(name.clone()));
    }

    tracing::info!("Updated config to version 2.");
}
