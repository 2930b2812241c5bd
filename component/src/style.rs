use bitflags::bitflags;
use getset::{Getters, MutGetters};
use ownable::IntoOwned;
use rgb::RGB8;
use serde::{de::Visitor, Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none, BorrowCow, DisplayFromStr};
use std::borrow::Cow;
use uuid::Uuid;

use crate::{Identifier, TextComponent};

/// The attribute bag attached to every component. Every attribute is optional, an unset
/// attribute is inherited from the parent component at render time.
#[serde_as]
#[skip_serializing_none]
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, PartialEq, Getters, MutGetters, IntoOwned,
)]
#[serde(rename_all = "camelCase")]
#[getset(get = "pub", get_mut = "pub")]
pub struct TextStyling<'a> {
    color: Option<TextColor>,
    bold: Option<bool>,
    italic: Option<bool>,
    underlined: Option<bool>,
    strikethrough: Option<bool>,
    obfuscated: Option<bool>,
    #[serde(borrow)]
    font: Option<TextFont<'a>>,
    #[serde_as(as = "Option<BorrowCow>")]
    insertion: Option<Cow<'a, str>>,
    #[serde(borrow)]
    click_event: Option<TextClickEvent<'a>>,
    #[serde(borrow)]
    hover_event: Option<TextHoverEvent<'a>>,
}

/// How [`TextStyling::merge`] resolves an attribute set on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Every attribute set on the source overwrites the target.
    Always,
    /// Only attributes unset on the target are taken from the source.
    IfAbsentOnTarget,
}

impl<'a> TextStyling<'a> {
    pub fn is_empty(&self) -> bool {
        *self == TextStyling::default()
    }

    /// Merges `source` into `self` attribute by attribute.
    pub fn merge(&mut self, source: &TextStyling<'a>, strategy: MergeStrategy) {
        fn apply<T: Clone>(target: &mut Option<T>, source: &Option<T>, strategy: MergeStrategy) {
            let take = match strategy {
                MergeStrategy::Always => source.is_some(),
                MergeStrategy::IfAbsentOnTarget => target.is_none(),
            };
            if take {
                target.clone_from(source);
            }
        }

        apply(&mut self.color, &source.color, strategy);
        apply(&mut self.bold, &source.bold, strategy);
        apply(&mut self.italic, &source.italic, strategy);
        apply(&mut self.underlined, &source.underlined, strategy);
        apply(&mut self.strikethrough, &source.strikethrough, strategy);
        apply(&mut self.obfuscated, &source.obfuscated, strategy);
        apply(&mut self.font, &source.font, strategy);
        apply(&mut self.insertion, &source.insertion, strategy);
        apply(&mut self.click_event, &source.click_event, strategy);
        apply(&mut self.hover_event, &source.hover_event, strategy);
    }

    /// Returns `self` with every unset attribute taken from `fallback`.
    ///
    /// This is not commutative: `a.merged_with(&b)` keeps the attributes of `a` where both
    /// are set.
    pub fn merged_with(mut self, fallback: &TextStyling<'a>) -> Self {
        self.merge(fallback, MergeStrategy::IfAbsentOnTarget);
        self
    }

    pub fn with_color(mut self, color: impl Into<TextColor>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_decoration(mut self, decoration: TextDecoration, value: bool) -> Self {
        *self.decoration_mut(decoration) = Some(value);
        self
    }

    /// Sets every decoration contained in `decorations` to `true`, leaving the others untouched.
    pub fn with_decorations(mut self, decorations: TextDecorations) -> Self {
        for decoration in TextDecoration::ALL {
            if decorations.contains(decoration.into()) {
                *self.decoration_mut(decoration) = Some(true);
            }
        }
        self
    }

    pub fn with_font(mut self, font: TextFont<'a>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_insertion(mut self, insertion: impl Into<Cow<'a, str>>) -> Self {
        self.insertion = Some(insertion.into());
        self
    }

    pub fn with_click_event(mut self, click_event: TextClickEvent<'a>) -> Self {
        self.click_event = Some(click_event);
        self
    }

    pub fn with_hover_event(mut self, hover_event: TextHoverEvent<'a>) -> Self {
        self.hover_event = Some(hover_event);
        self
    }

    pub fn decoration(&self, decoration: TextDecoration) -> Option<bool> {
        match decoration {
            TextDecoration::Obfuscated => self.obfuscated,
            TextDecoration::Bold => self.bold,
            TextDecoration::Strikethrough => self.strikethrough,
            TextDecoration::Underlined => self.underlined,
            TextDecoration::Italic => self.italic,
        }
    }

    pub fn decoration_mut(&mut self, decoration: TextDecoration) -> &mut Option<bool> {
        match decoration {
            TextDecoration::Obfuscated => &mut self.obfuscated,
            TextDecoration::Bold => &mut self.bold,
            TextDecoration::Strikethrough => &mut self.strikethrough,
            TextDecoration::Underlined => &mut self.underlined,
            TextDecoration::Italic => &mut self.italic,
        }
    }

    /// The decorations explicitly enabled on this style.
    pub fn decorations(&self) -> TextDecorations {
        TextDecoration::ALL
            .into_iter()
            .filter(|decoration| self.decoration(*decoration) == Some(true))
            .fold(TextDecorations::empty(), |set, decoration| {
                set | TextDecorations::from(decoration)
            })
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, IntoOwned)]
#[serde(rename_all = "snake_case", tag = "action", content = "value")]
pub enum TextClickEvent<'a> {
    OpenUrl(#[serde_as(as = "BorrowCow")] Cow<'a, str>),
    RunCommand(#[serde_as(as = "BorrowCow")] Cow<'a, str>),
    SuggestCommand(#[serde_as(as = "BorrowCow")] Cow<'a, str>),
    ChangePage(#[serde_as(as = "DisplayFromStr")] i32),
    CopyToClipboard(#[serde_as(as = "BorrowCow")] Cow<'a, str>),
}

#[serde_as]
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, IntoOwned)]
#[serde(rename_all = "snake_case", tag = "action", content = "value")]
pub enum TextHoverEvent<'a> {
    ShowText(#[serde(borrow)] Box<TextComponent<'a>>),
    ShowItem {
        #[serde_as(as = "BorrowCow")]
        id: Cow<'a, str>,
        count: i32,
        #[serde_as(as = "Option<BorrowCow>")]
        tag: Option<Cow<'a, str>>,
    },
    ShowEntity {
        #[serde_as(as = "BorrowCow")]
        r#type: Cow<'a, str>,
        #[ownable(clone)]
        id: Uuid,
        #[serde_as(as = "Option<BorrowCow>")]
        name: Option<Cow<'a, str>>,
    },
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, IntoOwned)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    Purple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    BrightGreen,
    Cyan,
    Red,
    Pink,
    Yellow,
    White,
    #[ownable(clone)] Custom(RGB8)
}

impl TextColor {
    #[rustfmt::skip]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "black"        => TextColor::Black,
            "dark_blue"    => TextColor::DarkBlue,
            "dark_green"   => TextColor::DarkGreen,
            "dark_aqua"    => TextColor::DarkCyan,
            "dark_red"     => TextColor::DarkRed,
            "dark_purple"  => TextColor::Purple,
            "gold"         => TextColor::Gold,
            "gray"         => TextColor::Gray,
            "dark_gray"    => TextColor::DarkGray,
            "blue"         => TextColor::Blue,
            "green"        => TextColor::BrightGreen,
            "aqua"         => TextColor::Cyan,
            "red"          => TextColor::Red,
            "light_purple" => TextColor::Pink,
            "yellow"       => TextColor::Yellow,
            "white"        => TextColor::White,
            _              => return None,
        })
    }

    #[rustfmt::skip]
    pub const fn name(&self) -> Option<&'static str> {
        Some(match self {
            TextColor::Black       => "black",
            TextColor::DarkBlue    => "dark_blue",
            TextColor::DarkGreen   => "dark_green",
            TextColor::DarkCyan    => "dark_aqua",
            TextColor::DarkRed     => "dark_red",
            TextColor::Purple      => "dark_purple",
            TextColor::Gold        => "gold",
            TextColor::Gray        => "gray",
            TextColor::DarkGray    => "dark_gray",
            TextColor::Blue        => "blue",
            TextColor::BrightGreen => "green",
            TextColor::Cyan        => "aqua",
            TextColor::Red         => "red",
            TextColor::Pink        => "light_purple",
            TextColor::Yellow      => "yellow",
            TextColor::White       => "white",
            _                      => return None,
        })
    }

    /// Parses a legacy color code. Codes are case-insensitive.
    #[rustfmt::skip]
    pub const fn from_legacy_code(code: char) -> Option<Self> {
        Some(match code.to_ascii_lowercase() {
            '0' => TextColor::Black,
            '1' => TextColor::DarkBlue,
            '2' => TextColor::DarkGreen,
            '3' => TextColor::DarkCyan,
            '4' => TextColor::DarkRed,
            '5' => TextColor::Purple,
            '6' => TextColor::Gold,
            '7' => TextColor::Gray,
            '8' => TextColor::DarkGray,
            '9' => TextColor::Blue,
            'a' => TextColor::BrightGreen,
            'b' => TextColor::Cyan,
            'c' => TextColor::Red,
            'd' => TextColor::Pink,
            'e' => TextColor::Yellow,
            'f' => TextColor::White,
            _   => return None,
        })
    }

    #[rustfmt::skip]
    pub const fn legacy_code(&self) -> Option<char> {
        Some(match self {
            TextColor::Black       => '0',
            TextColor::DarkBlue    => '1',
            TextColor::DarkGreen   => '2',
            TextColor::DarkCyan    => '3',
            TextColor::DarkRed     => '4',
            TextColor::Purple      => '5',
            TextColor::Gold        => '6',
            TextColor::Gray        => '7',
            TextColor::DarkGray    => '8',
            TextColor::Blue        => '9',
            TextColor::BrightGreen => 'a',
            TextColor::Cyan        => 'b',
            TextColor::Red         => 'c',
            TextColor::Pink        => 'd',
            TextColor::Yellow      => 'e',
            TextColor::White       => 'f',
            _                      => return None,
        })
    }

    #[rustfmt::skip]
    pub const fn foreground(&self) -> RGB8 {
        match self {
            TextColor::Black       => RGB8 { r: 0,   g: 0,   b: 0   }, // #000000
            TextColor::DarkBlue    => RGB8 { r: 0,   g: 0,   b: 170 }, // #0000aa
            TextColor::DarkGreen   => RGB8 { r: 0,   g: 170, b: 0   }, // #00aa00
            TextColor::DarkCyan    => RGB8 { r: 0,   g: 170, b: 170 }, // #00aaaa
            TextColor::DarkRed     => RGB8 { r: 170, g: 0,   b: 0   }, // #aa0000
            TextColor::Purple      => RGB8 { r: 170, g: 0,   b: 170 }, // #aa00aa
            TextColor::Gold        => RGB8 { r: 255, g: 170, b: 0   }, // #ffaa00
            TextColor::Gray        => RGB8 { r: 170, g: 170, b: 170 }, // #aaaaaa
            TextColor::DarkGray    => RGB8 { r: 85,  g: 85,  b: 85  }, // #555555
            TextColor::Blue        => RGB8 { r: 85,  g: 85,  b: 255 }, // #5555ff
            TextColor::BrightGreen => RGB8 { r: 85,  g: 255, b: 85  }, // #55ff55
            TextColor::Cyan        => RGB8 { r: 85,  g: 255, b: 255 }, // #55ffff
            TextColor::Red         => RGB8 { r: 255, g: 85,  b: 85  }, // #ff5555
            TextColor::Pink        => RGB8 { r: 255, g: 85,  b: 255 }, // #ff55ff
            TextColor::Yellow      => RGB8 { r: 255, g: 255, b: 85  }, // #ffff55
            TextColor::White       => RGB8 { r: 255, g: 255, b: 255 }, // #ffffff
            TextColor::Custom(c)   => *c,
        }
    }

    /// Parses `rrggbb` (without the leading `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let [r, g, b] = [0, 2, 4].map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok());
        Some(TextColor::Custom(RGB8 {
            r: r?,
            g: g?,
            b: b?,
        }))
    }
}

impl From<RGB8> for TextColor {
    fn from(value: RGB8) -> Self {
        TextColor::Custom(value)
    }
}

impl Serialize for TextColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let Some(name) = self.name() {
            serializer.serialize_str(name)
        } else {
            let rgb = self.foreground();
            serializer.serialize_str(&format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b))
        }
    }
}

impl<'de> Deserialize<'de> for TextColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = TextColor;

            fn visit_str<E>(self, string: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if let Some(color) = TextColor::from_name(string) {
                    return Ok(color);
                }

                let string = match string.strip_prefix('#') {
                    Some(v) => v,
                    None => return Err(E::custom("expected #")),
                };
                TextColor::from_hex(string).ok_or_else(|| E::custom("expected valid hex code"))
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a color name or a #-prefixed hexadecimal RGB specification")
            }
        }

        deserializer.deserialize_str(V)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoration {
    Obfuscated,
    Bold,
    Strikethrough,
    Underlined,
    Italic,
}

bitflags! {
    /// A set of [`TextDecoration`]s, as accumulated by consecutive legacy format codes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextDecorations: u8 {
        const OBFUSCATED = 0x01;
        const BOLD = 0x02;
        const STRIKETHROUGH = 0x04;
        const UNDERLINED = 0x08;
        const ITALIC = 0x10;
    }
}

impl From<TextDecoration> for TextDecorations {
    fn from(value: TextDecoration) -> Self {
        match value {
            TextDecoration::Obfuscated => TextDecorations::OBFUSCATED,
            TextDecoration::Bold => TextDecorations::BOLD,
            TextDecoration::Strikethrough => TextDecorations::STRIKETHROUGH,
            TextDecoration::Underlined => TextDecorations::UNDERLINED,
            TextDecoration::Italic => TextDecorations::ITALIC,
        }
    }
}

impl TextDecoration {
    pub const ALL: [TextDecoration; 5] = [
        TextDecoration::Obfuscated,
        TextDecoration::Bold,
        TextDecoration::Strikethrough,
        TextDecoration::Underlined,
        TextDecoration::Italic,
    ];

    /// Parses a legacy format code. Codes are case-insensitive.
    #[rustfmt::skip]
    pub const fn from_code(code: char) -> Option<Self> {
        Some(match code.to_ascii_lowercase() {
            'k' => TextDecoration::Obfuscated,
            'l' => TextDecoration::Bold,
            'm' => TextDecoration::Strikethrough,
            'n' => TextDecoration::Underlined,
            'o' => TextDecoration::Italic,
            _   => return None,
        })
    }

    #[rustfmt::skip]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "obfuscated"    => TextDecoration::Obfuscated,
            "bold"          => TextDecoration::Bold,
            "strikethrough" => TextDecoration::Strikethrough,
            "underlined"    => TextDecoration::Underlined,
            "italic"        => TextDecoration::Italic,
            _               => return None,
        })
    }

    #[rustfmt::skip]
    pub const fn code(&self) -> char {
        match self {
            TextDecoration::Obfuscated =>    'k',
            TextDecoration::Bold =>          'l',
            TextDecoration::Strikethrough => 'm',
            TextDecoration::Underlined =>    'n',
            TextDecoration::Italic =>        'o',
        }
    }

    #[rustfmt::skip]
    pub const fn name(&self) -> &'static str {
        match self {
            TextDecoration::Obfuscated =>    "obfuscated",
            TextDecoration::Bold =>          "bold",
            TextDecoration::Strikethrough => "strikethrough",
            TextDecoration::Underlined =>    "underlined",
            TextDecoration::Italic =>        "italic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, IntoOwned)]
pub enum TextFont<'a> {
    Default,
    Uniform,
    Alt,
    Illageralt,
    Custom(Identifier<'a>),
}

impl TextFont<'_> {
    pub fn identifier(&self) -> Identifier<'_> {
        match self {
            TextFont::Default => Identifier::builtin("default"),
            TextFont::Uniform => Identifier::builtin("uniform"),
            TextFont::Alt => Identifier::builtin("alt"),
            TextFont::Illageralt => Identifier::builtin("illageralt"),
            TextFont::Custom(identifier) => identifier.clone(),
        }
    }
}

impl<'a> From<TextFont<'a>> for Identifier<'a> {
    fn from(value: TextFont<'a>) -> Self {
        match value {
            TextFont::Default => Identifier::builtin("default"),
            TextFont::Uniform => Identifier::builtin("uniform"),
            TextFont::Alt => Identifier::builtin("alt"),
            TextFont::Illageralt => Identifier::builtin("illageralt"),
            TextFont::Custom(identifier) => identifier,
        }
    }
}

impl Serialize for TextFont<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.identifier().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextFont<'_> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = TextFont<'static>;

            fn visit_str<E>(self, string: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let identifier: Identifier<'static> =
                    Identifier::from_string(string.to_string()).map_err(E::custom)?;

                if identifier.namespace() != "minecraft" {
                    return Ok(TextFont::Custom(identifier));
                }

                Ok(match identifier.value() {
                    "default" => TextFont::Default,
                    "uniform" => TextFont::Uniform,
                    "alt" => TextFont::Alt,
                    "illageralt" => TextFont::Illageralt,
                    _ => TextFont::Custom(identifier),
                })
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an identifier")
            }
        }

        deserializer.deserialize_str(V)
    }
}
