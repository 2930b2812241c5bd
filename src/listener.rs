//! Hooks run by the client when chat messages arrive and when player list entries change.

use std::mem;

use component::{MergeStrategy, TextComponent};
use getset::{Getters, MutGetters};
use uuid::Uuid;

use crate::{replace, CustomNameTags};

#[derive(Debug, Clone, PartialEq, Getters, MutGetters)]
#[getset(get = "pub", get_mut = "pub")]
pub struct ChatReceiveEvent<'a> {
    message: TextComponent<'a>,
}

impl<'a> ChatReceiveEvent<'a> {
    pub fn new(message: TextComponent<'a>) -> Self {
        Self { message }
    }

    pub fn set_message(&mut self, message: TextComponent<'a>) {
        self.message = message;
    }

    pub fn into_message(self) -> TextComponent<'a> {
        self.message
    }
}

pub struct ChatReceiveListener<'addon> {
    addon: &'addon CustomNameTags,
}

impl<'addon> ChatReceiveListener<'addon> {
    pub fn new(addon: &'addon CustomNameTags) -> Self {
        Self { addon }
    }

    /// Replaces the username of every enabled tag in the received message.
    pub fn on_chat_receive<'a>(&self, event: &mut ChatReceiveEvent<'a>) {
        let configuration = self.addon.configuration();
        if !configuration.enabled() || configuration.enabled_tags().next().is_none() {
            return;
        }

        let message = mem::replace(event.message_mut(), TextComponent::text(""));
        let mut message = self.addon.replace_legacy_context(message);
        if self.addon.replace_name_tags(&mut message) {
            tracing::debug!("Rewrote chat message: {}", message.plain_text());
        }
        event.set_message(message);
    }
}

/// An entry of the player list.
#[derive(Debug, Clone, PartialEq, Getters, MutGetters)]
pub struct PlayerInfo<'a> {
    #[getset(get = "pub")]
    profile_id: Uuid,
    #[getset(get = "pub")]
    profile_name: String,
    /// The name shown instead of the profile name, if the server sent one.
    #[getset(get = "pub", get_mut = "pub")]
    display_name: Option<TextComponent<'a>>,
}

impl<'a> PlayerInfo<'a> {
    pub fn new(profile_id: Uuid, profile_name: impl Into<String>) -> Self {
        Self {
            profile_id,
            profile_name: profile_name.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: TextComponent<'a>) -> Self {
        self.display_name = Some(display_name);
        self
    }
}

pub struct PlayerListListener<'addon> {
    addon: &'addon CustomNameTags,
}

impl<'addon> PlayerListListener<'addon> {
    pub fn new(addon: &'addon CustomNameTags) -> Self {
        Self { addon }
    }

    /// Applies the enabled tag of the entry's player, if there is one.
    pub fn on_player_list_update<'a>(&self, info: &mut PlayerInfo<'a>) {
        let configuration = self.addon.configuration();
        if !configuration.enabled() {
            return;
        }
        let Some(tag) = configuration
            .custom_tag(&info.profile_name)
            .filter(|tag| tag.enabled())
        else {
            return;
        };

        if tag.replace_scoreboard() {
            let mut display_name: TextComponent<'a> = tag.display_name();
            if let Some(previous) = &info.display_name {
                display_name
                    .style_mut()
                    .merge(previous.style(), MergeStrategy::IfAbsentOnTarget);
            }
            tracing::debug!(
                "Replaced player list entry of {} ({}).",
                info.profile_name,
                info.profile_id
            );
            info.display_name = Some(display_name);
            return;
        }

        let mut display_name = match info.display_name.take() {
            Some(display_name) => self.addon.replace_legacy_context(display_name),
            None => TextComponent::text(info.profile_name.clone()),
        };
        if replace::replace_username(&mut display_name, &info.profile_name, || tag.display_name()) {
            tracing::debug!(
                "Replaced {} in player list entry ({}).",
                info.profile_name,
                info.profile_id
            );
        }
        info.display_name = Some(display_name);
    }
}
