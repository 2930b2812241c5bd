use std::{collections::BTreeMap, fs, io, mem, path::Path};

use component::{LegacySerializer, TextComponent};
use getset::{CopyGetters, Getters, Setters};
use ownable::IntoOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{ConfigError, ConfigResult},
    migration::{self, CURRENT_CONFIG_VERSION, CUSTOM_TAGS_KEY},
};

/// A custom label shown in place of a player's username.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Getters, CopyGetters, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomNameTag {
    /// The exact, case-sensitive username the tag applies to.
    #[getset(get = "pub", set = "pub")]
    original_name: String,
    /// The label, with `&` formatting codes.
    #[getset(get = "pub", set = "pub")]
    custom_name: String,
    #[getset(get_copy = "pub", set = "pub")]
    enabled: bool,
    /// Replace the whole player list entry instead of only the username inside it.
    #[getset(get_copy = "pub", set = "pub")]
    replace_scoreboard: bool,
}

impl CustomNameTag {
    pub fn new(original_name: impl Into<String>, custom_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            custom_name: custom_name.into(),
            ..Default::default()
        }
    }

    pub fn with_replace_scoreboard(mut self, replace_scoreboard: bool) -> Self {
        self.replace_scoreboard = replace_scoreboard;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Parses the label into a new component. Every call returns an independent tree.
    pub fn display_name(&self) -> TextComponent<'static> {
        LegacySerializer::ampersand()
            .deserialize(&self.custom_name)
            .into_owned()
    }

    /// Whether both the username and the label contain something other than whitespace.
    pub fn is_valid(&self) -> bool {
        !self.original_name.trim().is_empty() && !self.custom_name.trim().is_empty()
    }
}

impl Default for CustomNameTag {
    fn default() -> Self {
        Self {
            original_name: String::new(),
            custom_name: String::new(),
            enabled: true,
            replace_scoreboard: false,
        }
    }
}

/// The persisted add-on settings: a master switch and the name tags keyed by username.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, CopyGetters, Setters)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomNameTagsConfig {
    #[getset(get_copy = "pub", set = "pub")]
    enabled: bool,
    custom_tags: BTreeMap<String, CustomNameTag>,
    #[getset(get_copy = "pub")]
    config_version: u32,
}

impl Default for CustomNameTagsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_tags: BTreeMap::new(),
            config_version: CURRENT_CONFIG_VERSION,
        }
    }
}

impl CustomNameTagsConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Decodes a config object, upgrading it first if it was written by an older version.
    ///
    /// Tags that cannot be decoded are dropped with a warning, the rest of the config still
    /// loads.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let Value::Object(mut object) = value else {
            return Err(ConfigError::NotAnObject);
        };

        let used_version = migration::config_version(&object);
        migration::update_config(&mut object, used_version)?;
        drop_malformed_tags(&mut object);

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Reads the config at `path`. A missing file yields the default config.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No config found at {}, using defaults.", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Saved config to {}.", path.display());
        Ok(())
    }

    pub fn custom_tags(&self) -> &BTreeMap<String, CustomNameTag> {
        &self.custom_tags
    }

    pub fn custom_tag(&self, name: &str) -> Option<&CustomNameTag> {
        self.custom_tags.get(name)
    }

    pub fn enabled_tags(&self) -> impl Iterator<Item = &CustomNameTag> {
        self.custom_tags.values().filter(|tag| tag.enabled)
    }

    /// Stores `tag` under its username, dropping the entry it was stored under before (the
    /// username may have been edited).
    pub fn put_custom_tag(&mut self, previous_name: Option<&str>, tag: CustomNameTag) {
        if let Some(previous_name) = previous_name {
            self.custom_tags.remove(previous_name);
        }
        self.custom_tags.insert(tag.original_name.clone(), tag);
    }

    pub fn remove_custom_tag(&mut self, name: &str) -> Option<CustomNameTag> {
        self.custom_tags.remove(name)
    }

    /// Drops tags with a blank username or label and moves tags stored under a key other than
    /// their username. Returns the number of entries that were dropped.
    pub fn remove_invalid_name_tags(&mut self) -> usize {
        let count = self.custom_tags.len();
        let mut moved = Vec::new();

        for (name, tag) in mem::take(&mut self.custom_tags) {
            if !tag.is_valid() {
                tracing::warn!("Removing invalid custom name tag {:?}.", name);
            } else if tag.original_name != name {
                moved.push((name, tag));
            } else {
                self.custom_tags.insert(name, tag);
            }
        }

        for (name, tag) in moved {
            if self.custom_tags.contains_key(&tag.original_name) {
                tracing::warn!(
                    "Removing custom name tag {:?}, {} already has one.",
                    name,
                    tag.original_name
                );
                continue;
            }
            tracing::info!(
                "Moving custom name tag {:?} to {}.",
                name,
                tag.original_name
            );
            self.custom_tags.insert(tag.original_name.clone(), tag);
        }

        count - self.custom_tags.len()
    }
}

fn drop_malformed_tags(object: &mut Map<String, Value>) {
    if object
        .get(CUSTOM_TAGS_KEY)
        .is_some_and(|custom_tags| !custom_tags.is_object())
    {
        tracing::warn!("Ignoring customTags in config, not an object.");
        object.remove(CUSTOM_TAGS_KEY);
        return;
    }

    let Some(custom_tags) = object
        .get_mut(CUSTOM_TAGS_KEY)
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    custom_tags.retain(|name, custom_tag| match CustomNameTag::deserialize(&*custom_tag) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!("Ignoring malformed custom name tag {:?}: {}.", name, err);
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use component::{TextColor, TextDecoration};

    use super::*;

    #[test]
    fn display_name_is_parsed() {
        let tag = CustomNameTag::new("Notch", "&6&lThe Creator");
        let display_name = tag.display_name();
        assert_eq!(display_name.text_content(), Some("The Creator"));
        assert_eq!(display_name.style().color(), &Some(TextColor::Gold));
        assert_eq!(
            display_name.style().decoration(TextDecoration::Bold),
            Some(true)
        );
        assert_eq!(tag.display_name(), display_name);
    }

    #[test]
    fn validity() {
        assert!(CustomNameTag::new("Notch", "Creator").is_valid());
        assert!(!CustomNameTag::new("", "Creator").is_valid());
        assert!(!CustomNameTag::new("Notch", "   ").is_valid());
    }

    #[test]
    fn decode_current_version() {
        let config = CustomNameTagsConfig::from_json_str(
            r#"{
                "enabled": true,
                "configVersion": 2,
                "customTags": {
                    "Notch": {
                        "originalName": "Notch",
                        "customName": "&6Creator",
                        "enabled": true,
                        "replaceScoreboard": true
                    }
                }
            }"#,
        )
        .unwrap();

        let tag = config.custom_tag("Notch").unwrap();
        assert_eq!(tag.custom_name(), "&6Creator");
        assert!(tag.enabled());
        assert!(tag.replace_scoreboard());
        assert_eq!(config.config_version(), 2);
    }

    #[test]
    fn decode_version_one() {
        let config = CustomNameTagsConfig::from_json_str(
            r#"{
                "enabled": false,
                "customTags": {
                    "jeb_": { "customName": "&crainbow", "enabled": false, "replaceScoreboard": false }
                }
            }"#,
        )
        .unwrap();

        assert!(!config.enabled());
        assert_eq!(config.config_version(), CURRENT_CONFIG_VERSION);
        let tag = config.custom_tag("jeb_").unwrap();
        assert_eq!(tag.original_name(), "jeb_");
        assert!(!tag.enabled());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = CustomNameTagsConfig::from_json_str(
            r#"{ "configVersion": 2, "customTags": { "Notch": { "originalName": "Notch" } } }"#,
        )
        .unwrap();
        assert!(config.enabled());
        let tag = config.custom_tag("Notch").unwrap();
        assert!(tag.enabled());
        assert!(!tag.replace_scoreboard());
        assert_eq!(tag.custom_name(), "");
    }

    #[test]
    fn malformed_tags_do_not_block_loading() {
        let config = CustomNameTagsConfig::from_json_str(
            r#"{
                "customTags": {
                    "Broken": "not a tag",
                    "Nothing": null,
                    "Numbers": { "customName": 42 },
                    "Notch": { "customName": "&6Creator", "enabled": true, "replaceScoreboard": false }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.custom_tags().len(), 1);
        let tag = config.custom_tag("Notch").unwrap();
        assert_eq!(tag.original_name(), "Notch");
        assert_eq!(tag.custom_name(), "&6Creator");
    }

    #[test]
    fn malformed_tag_map_loads_empty() {
        for json in [
            r#"{ "configVersion": 2, "customTags": null }"#,
            r#"{ "configVersion": 2, "customTags": ["Notch"] }"#,
        ] {
            let config = CustomNameTagsConfig::from_json_str(json).unwrap();
            assert!(config.custom_tags().is_empty(), "{json}");
            assert!(config.enabled());
        }
    }

    #[test]
    fn rejects_non_objects_and_newer_versions() {
        assert!(matches!(
            CustomNameTagsConfig::from_json_str("[]"),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            CustomNameTagsConfig::from_json_str(r#"{ "configVersion": 7 }"#),
            Err(ConfigError::UnsupportedVersion(7, CURRENT_CONFIG_VERSION))
        ));
        assert!(matches!(
            CustomNameTagsConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn enabled_tags_skip_disabled() {
        let mut config = CustomNameTagsConfig::default();
        config.put_custom_tag(None, CustomNameTag::new("Notch", "a"));
        config.put_custom_tag(None, CustomNameTag::new("jeb_", "b").with_enabled(false));

        let names: Vec<_> = config
            .enabled_tags()
            .map(|tag| tag.original_name().as_str())
            .collect();
        assert_eq!(names, ["Notch"]);
    }

    #[test]
    fn renaming_replaces_previous_entry() {
        let mut config = CustomNameTagsConfig::default();
        config.put_custom_tag(None, CustomNameTag::new("Notch", "Creator"));

        let mut tag = config.custom_tag("Notch").unwrap().clone();
        tag.set_original_name(String::from("Dinnerbone"));
        config.put_custom_tag(Some("Notch"), tag);

        assert!(config.custom_tag("Notch").is_none());
        assert_eq!(
            config.custom_tag("Dinnerbone").unwrap().custom_name(),
            "Creator"
        );
        assert_eq!(config.custom_tags().len(), 1);

        assert!(config.remove_custom_tag("Dinnerbone").is_some());
        assert!(config.custom_tags().is_empty());
    }

    #[test]
    fn invalid_tags_are_removed() {
        let mut config = CustomNameTagsConfig::from_json_str(
            r#"{
                "configVersion": 2,
                "customTags": {
                    "Notch": { "originalName": "Notch", "customName": "Creator" },
                    "Blank": { "originalName": "Blank", "customName": " " },
                    "NoName": { "originalName": "", "customName": "x" },
                    "old": { "originalName": "Dinnerbone", "customName": "Grumm" },
                    "dupe": { "originalName": "Notch", "customName": "Other" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.remove_invalid_name_tags(), 3);
        assert_eq!(config.custom_tags().len(), 2);
        assert_eq!(config.custom_tag("Notch").unwrap().custom_name(), "Creator");
        assert_eq!(config.custom_tag("Dinnerbone").unwrap().custom_name(), "Grumm");
        assert!(config.custom_tag("old").is_none());

        assert_eq!(config.remove_invalid_name_tags(), 0);
    }

    #[test]
    fn save_and_load() {
        let path = env::temp_dir().join(format!("customnametags-{}.json", process::id()));

        let mut config = CustomNameTagsConfig::default();
        config.put_custom_tag(
            None,
            CustomNameTag::new("Notch", "&6Creator").with_replace_scoreboard(true),
        );
        config.save(&path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"replaceScoreboard\": true"));
        assert!(json.contains("\"configVersion\": 2"));

        let loaded = CustomNameTagsConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = env::temp_dir().join("customnametags-missing/none.json");
        assert_eq!(
            CustomNameTagsConfig::load(path).unwrap(),
            CustomNameTagsConfig::default()
        );
    }
}
