//! Replaces player names in chat messages and the player list with user-defined labels.

use component::{LegacySerializer, TextComponent};
use getset::{CopyGetters, Getters, MutGetters};

pub mod config;
pub mod error;
pub mod legacy;
pub mod listener;
pub mod migration;
pub mod replace;

pub use config::{CustomNameTag, CustomNameTagsConfig};
pub use error::{ConfigError, ConfigResult};
pub use legacy::{replace_legacy_context, LegacyNormalize};
pub use listener::{ChatReceiveEvent, ChatReceiveListener, PlayerInfo, PlayerListListener};

#[derive(Debug, Getters, MutGetters, CopyGetters)]
pub struct CustomNameTags {
    #[getset(get = "pub", get_mut = "pub")]
    configuration: CustomNameTagsConfig,
    /// The codes incoming chat and player list names are written with.
    #[getset(get_copy = "pub")]
    legacy_serializer: LegacySerializer,
}

impl CustomNameTags {
    pub fn new(mut configuration: CustomNameTagsConfig) -> Self {
        let removed = configuration.remove_invalid_name_tags();
        if removed > 0 {
            tracing::info!("Removed {} invalid custom name tags.", removed);
        }
        Self {
            configuration,
            legacy_serializer: LegacySerializer::section(),
        }
    }

    pub fn with_legacy_serializer(mut self, legacy_serializer: LegacySerializer) -> Self {
        self.legacy_serializer = legacy_serializer;
        self
    }

    /// Replaces the username of every enabled tag in `component` with the tag's display name.
    /// Does nothing while the add-on is disabled.
    pub fn replace_name_tags(&self, component: &mut TextComponent<'_>) -> bool {
        if !self.configuration.enabled() {
            return false;
        }

        let mut replaced = false;
        for tag in self.configuration.enabled_tags() {
            if replace::replace_username(component, tag.original_name(), || tag.display_name()) {
                tracing::trace!("Replaced {}.", tag.original_name());
                replaced = true;
            }
        }
        replaced
    }

    /// Normalizes the legacy codes in `component` with the configured serializer.
    pub fn replace_legacy_context<'a>(&self, component: TextComponent<'a>) -> TextComponent<'a> {
        self.legacy_serializer.normalize(component)
    }
}

impl Default for CustomNameTags {
    fn default() -> Self {
        Self::new(CustomNameTagsConfig::default())
    }
}
