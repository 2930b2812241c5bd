use std::{borrow::Cow, mem};

use component::{LegacySerializer, MergeStrategy, TextComponent, TextContent};
use ownable::IntoOwned;

/// Rewrites text nodes carrying legacy formatting codes into styled components.
pub trait LegacyNormalize {
    /// Normalizes `component` and all of its descendants, returning the rewritten tree.
    ///
    /// A text node containing the marker is replaced by its parsed form. The parsed root keeps
    /// the attributes its codes set and takes every other attribute from the replaced node.
    /// Nodes without the marker keep their content and are only descended into.
    fn normalize<'a>(&self, component: TextComponent<'a>) -> TextComponent<'a>;
}

impl LegacyNormalize for LegacySerializer {
    fn normalize<'a>(&self, mut component: TextComponent<'a>) -> TextComponent<'a> {
        let children: Vec<_> = component
            .take_children()
            .into_iter()
            .map(|child| self.normalize(child))
            .collect();

        if let Some(arguments) = component.arguments_mut() {
            let normalized = mem::take(arguments)
                .into_iter()
                .map(|argument| self.normalize(argument))
                .collect();
            *arguments = normalized;
        }

        let TextContent::Text(content) = component.content_mut() else {
            component.set_children(children);
            return component;
        };
        if !self.contains_marker(content.text()) {
            component.set_children(children);
            return component;
        }

        let mut parsed = match mem::take(content.text_mut()) {
            Cow::Borrowed(text) => self.deserialize(text),
            Cow::Owned(text) => self.deserialize(&text).into_owned(),
        };
        parsed
            .style_mut()
            .merge(component.style(), MergeStrategy::IfAbsentOnTarget);

        if children.is_empty() {
            return parsed;
        }

        // The node stays as an empty container so its children keep inheriting its style
        // instead of whatever the last code set.
        component.push_child(parsed);
        component.children_mut().extend(children);
        component
    }
}

/// Normalizes section sign codes, the form servers embed in chat and display names.
pub fn replace_legacy_context(component: TextComponent<'_>) -> TextComponent<'_> {
    LegacySerializer::section().normalize(component)
}
