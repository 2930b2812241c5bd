use derive_more::derive::From;
use getset::{Getters, MutGetters};
use ownable::IntoOwned;
use serde::{
    de::{SeqAccess, Visitor},
    Deserialize, Serialize,
};
use serde_with::{serde_as, skip_serializing_none, BorrowCow};
use std::{borrow::Cow, mem};

use crate::TextStyling;

/// A chat component: some content, a style and an ordered list of children rendered after
/// the content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, MutGetters, IntoOwned)]
#[serde(remote = "Self")] // https://github.com/jonasbb/serde_with/issues/702
pub struct TextComponent<'a> {
    #[serde(borrow, flatten)]
    #[getset(get = "pub", get_mut = "pub")]
    content: TextContent<'a>,
    #[serde(borrow, default, skip_serializing_if = "Vec::is_empty")]
    extra: Vec<TextComponent<'a>>,
    #[serde(borrow, flatten)]
    #[getset(get = "pub", get_mut = "pub")]
    style: TextStyling<'a>,
}

impl<'a> TextComponent<'a> {
    pub fn new(content: impl Into<TextContent<'a>>) -> Self {
        TextComponent {
            content: content.into(),
            extra: Vec::new(),
            style: TextStyling::default(),
        }
    }

    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        TextComponent::new(TextContentText { text: text.into() })
    }

    pub fn translatable(
        translate: impl Into<Cow<'a, str>>,
        with: Vec<TextComponent<'a>>,
    ) -> Self {
        TextComponent::new(TextContentTranslatable {
            translate: translate.into(),
            fallback: None,
            with,
        })
    }

    pub fn keybind(keybind: impl Into<Cow<'a, str>>) -> Self {
        TextComponent::new(TextContentKeybind {
            keybind: keybind.into(),
        })
    }

    pub fn with_style(mut self, style: TextStyling<'a>) -> Self {
        self.style = style;
        self
    }

    pub fn append(mut self, child: impl Into<TextComponent<'a>>) -> Self {
        self.extra.push(child.into());
        self
    }

    pub fn set_style(&mut self, style: TextStyling<'a>) {
        self.style = style;
    }

    pub fn children(&self) -> &[TextComponent<'a>] {
        &self.extra
    }

    pub fn children_mut(&mut self) -> &mut Vec<TextComponent<'a>> {
        &mut self.extra
    }

    pub fn push_child(&mut self, child: TextComponent<'a>) {
        self.extra.push(child);
    }

    /// Inserts `child` at `index`, shifting all children after it to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.children().len()`.
    pub fn insert_child(&mut self, index: usize, child: TextComponent<'a>) {
        self.extra.insert(index, child);
    }

    pub fn set_children(&mut self, children: Vec<TextComponent<'a>>) {
        self.extra = children;
    }

    pub fn take_children(&mut self) -> Vec<TextComponent<'a>> {
        mem::take(&mut self.extra)
    }

    /// The literal text of this node, if it is a text component.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            TextContent::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    /// The arguments of this node, if it is a translatable component.
    pub fn arguments(&self) -> Option<&[TextComponent<'a>]> {
        match &self.content {
            TextContent::Translatable(translatable) => Some(&translatable.with),
            _ => None,
        }
    }

    pub fn arguments_mut(&mut self) -> Option<&mut Vec<TextComponent<'a>>> {
        match &mut self.content {
            TextContent::Translatable(translatable) => Some(&mut translatable.with),
            _ => None,
        }
    }

    /// Flattens the tree into its unstyled text, depth first.
    ///
    /// Translatable components are not translated: they contribute their fallback (or key)
    /// followed by their arguments.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) {
        match &self.content {
            TextContent::Text(text) => out.push_str(&text.text),
            TextContent::Translatable(translatable) => {
                out.push_str(
                    translatable
                        .fallback
                        .as_deref()
                        .unwrap_or(&translatable.translate),
                );
                for argument in &translatable.with {
                    argument.write_plain_text(out);
                }
            }
            TextContent::Keybind(keybind) => out.push_str(&keybind.keybind),
            TextContent::Score(score) => out.push_str(&score.score.name),
            TextContent::Selector(selector) => out.push_str(&selector.selector),
            TextContent::Nbt(nbt) => out.push_str(&nbt.nbt),
        }

        for child in &self.extra {
            child.write_plain_text(out);
        }
    }
}

impl<'a> From<&'a str> for TextComponent<'a> {
    fn from(value: &'a str) -> TextComponent<'a> {
        TextComponent::text(value)
    }
}

impl From<String> for TextComponent<'_> {
    fn from(value: String) -> Self {
        TextComponent::text(value)
    }
}

impl Serialize for TextComponent<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        TextComponent::serialize(self, serializer)
    }
}

impl<'a, 'de> Deserialize<'de> for TextComponent<'a>
where
    'de: 'a,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = TextComponent<'de>;

            fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.into())
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(TextComponent::text(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.into())
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.to_string().into())
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.to_string().into())
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.to_string().into())
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(v.to_string().into())
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                TextComponent::deserialize(serde::de::value::MapAccessDeserializer::new(map))
            }

            // The first element is the root, the others are appended to it as children.
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut root: TextComponent<'de> = seq
                    .next_element()?
                    .ok_or_else(|| <A::Error as serde::de::Error>::invalid_length(0, &self))?;
                while let Some(child) = seq.next_element()? {
                    root.extra.push(child);
                }
                Ok(root)
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string, a text component or a list of text components")
            }
        }

        deserializer.deserialize_any(V)
    }
}

// https://stackoverflow.com/questions/61216723/how-can-i-deserialize-an-enum-with-an-optional-internal-tag
#[derive(Serialize, Deserialize, Debug, Clone, From, PartialEq, IntoOwned)]
#[serde(untagged)]
pub enum TextContent<'a> {
    Text(#[serde(borrow)] TextContentText<'a>),
    Translatable(#[serde(borrow)] TextContentTranslatable<'a>),
    Keybind(#[serde(borrow)] TextContentKeybind<'a>),
    Score(#[serde(borrow)] TextContentScore<'a>),
    Selector(#[serde(borrow)] TextContentSelector<'a>),
    Nbt(#[serde(borrow)] TextContentNbt<'a>),
}

impl<'a> From<&'a str> for TextContent<'a> {
    fn from(value: &'a str) -> Self {
        TextContent::Text(TextContentText { text: value.into() })
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, MutGetters, IntoOwned)]
#[getset(get = "pub", get_mut = "pub")]
pub struct TextContentText<'a> {
    #[serde_as(as = "BorrowCow")]
    text: Cow<'a, str>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, MutGetters, IntoOwned)]
#[getset(get = "pub", get_mut = "pub")]
pub struct TextContentTranslatable<'a> {
    #[serde_as(as = "BorrowCow")]
    translate: Cow<'a, str>,
    #[serde_as(as = "Option<BorrowCow>")]
    fallback: Option<Cow<'a, str>>,
    #[serde(borrow, default, skip_serializing_if = "Vec::is_empty")]
    with: Vec<TextComponent<'a>>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, IntoOwned)]
#[getset(get = "pub")]
pub struct TextContentKeybind<'a> {
    #[serde_as(as = "BorrowCow")]
    keybind: Cow<'a, str>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Getters, IntoOwned)]
#[getset(get = "pub")]
pub struct Score<'a> {
    #[serde_as(as = "BorrowCow")]
    name: Cow<'a, str>,
    #[serde_as(as = "BorrowCow")]
    objective: Cow<'a, str>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, IntoOwned)]
#[getset(get = "pub")]
pub struct TextContentScore<'a> {
    #[serde(borrow)]
    score: Score<'a>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, IntoOwned)]
#[getset(get = "pub")]
pub struct TextContentSelector<'a> {
    #[serde_as(as = "BorrowCow")]
    selector: Cow<'a, str>,
    #[serde(borrow)]
    separator: Option<Box<TextComponent<'a>>>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Getters, IntoOwned)]
#[getset(get = "pub")]
pub struct TextContentNbt<'a> {
    #[serde_as(as = "BorrowCow")]
    nbt: Cow<'a, str>,
    interpret: Option<bool>,
    #[serde(borrow)]
    separator: Option<Box<TextComponent<'a>>>,
    #[serde(borrow, flatten)]
    source: TextContentNbtSource<'a>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, IntoOwned)]
#[serde(untagged)]
pub enum TextContentNbtSource<'a> {
    Block {
        #[serde_as(as = "BorrowCow")]
        block: Cow<'a, str>,
    },
    Entity {
        #[serde_as(as = "BorrowCow")]
        entity: Cow<'a, str>,
    },
    Storage {
        #[serde_as(as = "BorrowCow")]
        storage: Cow<'a, str>,
    },
}
