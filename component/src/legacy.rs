//! Legacy formatting codes: a marker character followed by one code character, styling all
//! text up to the next code.
//!
//! | Code          | Effect                                              |
//! |---------------|-----------------------------------------------------|
//! | `0-9`, `a-f`  | Sets the color and clears all decorations.          |
//! | `k-o`         | Adds a decoration (see [`TextDecoration::code`]).   |
//! | `r`           | Clears the color and all decorations.               |
//! | `x`           | Followed by six marker/hex digit pairs, a hex color. |
//!
//! Codes are case-insensitive. A marker followed by anything else, or at the end of the
//! input, is kept as literal text.

use std::borrow::Cow;

use crate::{
    TextColor, TextComponent, TextContent, TextDecoration, TextDecorations, TextStyling,
};

pub const SECTION_CHAR: char = '§';
pub const AMPERSAND_CHAR: char = '&';

const HEX_CODE: char = 'x';
const RESET_CODE: char = 'r';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySerializer {
    marker: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LegacyCode {
    Color(TextColor),
    Decoration(TextDecoration),
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LegacyStyle {
    color: Option<TextColor>,
    decorations: TextDecorations,
}

impl LegacyStyle {
    fn apply(&mut self, code: LegacyCode) {
        match code {
            LegacyCode::Color(color) => {
                self.color = Some(color);
                self.decorations = TextDecorations::empty();
            }
            LegacyCode::Decoration(decoration) => {
                self.decorations |= TextDecorations::from(decoration)
            }
            LegacyCode::Reset => *self = LegacyStyle::default(),
        }
    }

    fn styling<'a>(&self) -> TextStyling<'a> {
        let styling = TextStyling::default().with_decorations(self.decorations);
        match self.color {
            Some(color) => styling.with_color(color),
            None => styling,
        }
    }

    fn of(styling: &TextStyling<'_>) -> Self {
        LegacyStyle {
            color: *styling.color(),
            decorations: styling.decorations(),
        }
    }
}

impl LegacySerializer {
    pub const fn new(marker: char) -> Self {
        LegacySerializer { marker }
    }

    /// The `§` serializer, used for text received from servers.
    pub const fn section() -> Self {
        LegacySerializer::new(SECTION_CHAR)
    }

    /// The `&` serializer, used for text typed by users.
    pub const fn ampersand() -> Self {
        LegacySerializer::new(AMPERSAND_CHAR)
    }

    pub const fn marker(&self) -> char {
        self.marker
    }

    pub fn contains_marker(&self, text: &str) -> bool {
        text.contains(self.marker)
    }

    /// Parses legacy formatted text into a tree of styled text segments.
    ///
    /// Segments borrow from `input`. A single segment is returned as is, several segments
    /// are wrapped as children of an empty text component.
    pub fn deserialize<'a>(&self, input: &'a str) -> TextComponent<'a> {
        let mut segments = Vec::new();
        let mut style = LegacyStyle::default();
        let mut segment_start = 0;
        let mut chars = input.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if c != self.marker {
                continue;
            }
            let Some(&(code_i, code)) = chars.peek() else {
                break;
            };
            let Some((code, code_end)) = self.parse_code(input, code_i, code) else {
                continue;
            };

            if i > segment_start {
                segments.push(
                    TextComponent::text(Cow::Borrowed(&input[segment_start..i]))
                        .with_style(style.styling()),
                );
            }
            style.apply(code);
            segment_start = code_end;

            while chars.next_if(|&(j, _)| j < code_end).is_some() {}
        }

        if segment_start < input.len() {
            segments.push(
                TextComponent::text(Cow::Borrowed(&input[segment_start..]))
                    .with_style(style.styling()),
            );
        }

        match segments.len() {
            0 => TextComponent::text(""),
            1 => segments.remove(0),
            _ => {
                let mut root = TextComponent::text("");
                root.set_children(segments);
                root
            }
        }
    }

    /// Parses the code starting at byte `code_i`, returning it and the byte offset right after
    /// it.
    fn parse_code(&self, input: &str, code_i: usize, code: char) -> Option<(LegacyCode, usize)> {
        let code_end = code_i + code.len_utf8();
        let lower = code.to_ascii_lowercase();

        if let Some(color) = TextColor::from_legacy_code(lower) {
            return Some((LegacyCode::Color(color), code_end));
        }
        if let Some(decoration) = TextDecoration::from_code(lower) {
            return Some((LegacyCode::Decoration(decoration), code_end));
        }
        match lower {
            RESET_CODE => Some((LegacyCode::Reset, code_end)),
            HEX_CODE => self.parse_hex_color(&input[code_end..]).map(|(color, len)| {
                (LegacyCode::Color(color), code_end + len)
            }),
            _ => None,
        }
    }

    /// Parses six marker/hex digit pairs, returning the color and the byte length consumed.
    fn parse_hex_color(&self, rest: &str) -> Option<(TextColor, usize)> {
        let mut hex = String::with_capacity(6);
        let mut chars = rest.chars();
        let mut len = 0;
        for _ in 0..6 {
            let marker = chars.next()?;
            let digit = chars.next()?;
            if marker != self.marker || !digit.is_ascii_hexdigit() {
                return None;
            }
            hex.push(digit);
            len += marker.len_utf8() + digit.len_utf8();
        }
        TextColor::from_hex(&hex).map(|color| (color, len))
    }

    /// Renders a tree back to legacy formatted text. Only colors and decorations survive.
    pub fn serialize(&self, component: &TextComponent<'_>) -> String {
        let mut out = String::new();
        let mut current = LegacyStyle::default();
        self.serialize_into(component, &TextStyling::default(), &mut current, &mut out);
        out
    }

    fn serialize_into<'a>(
        &self,
        component: &TextComponent<'a>,
        parent: &TextStyling<'a>,
        current: &mut LegacyStyle,
        out: &mut String,
    ) {
        let effective = component.style().clone().merged_with(parent);

        match component.content() {
            TextContent::Text(text) => self.write_run(text.text(), &effective, current, out),
            TextContent::Translatable(translatable) => {
                let key = translatable
                    .fallback()
                    .as_deref()
                    .unwrap_or(translatable.translate());
                self.write_run(key, &effective, current, out);
                for argument in translatable.with() {
                    self.serialize_into(argument, &effective, current, out);
                }
            }
            TextContent::Keybind(keybind) => {
                self.write_run(keybind.keybind(), &effective, current, out)
            }
            TextContent::Score(score) => {
                self.write_run(score.score().name(), &effective, current, out)
            }
            TextContent::Selector(selector) => {
                self.write_run(selector.selector(), &effective, current, out)
            }
            TextContent::Nbt(nbt) => self.write_run(nbt.nbt(), &effective, current, out),
        }

        for child in component.children() {
            self.serialize_into(child, &effective, current, out);
        }
    }

    fn write_run(
        &self,
        text: &str,
        styling: &TextStyling<'_>,
        current: &mut LegacyStyle,
        out: &mut String,
    ) {
        if text.is_empty() {
            return;
        }

        let wanted = LegacyStyle::of(styling);
        if wanted != *current {
            if wanted.color == current.color && wanted.decorations.contains(current.decorations) {
                self.write_decorations(wanted.decorations - current.decorations, out);
            } else {
                match wanted.color {
                    Some(color) => self.write_color(color, out),
                    None => {
                        out.push(self.marker);
                        out.push(RESET_CODE);
                    }
                }
                self.write_decorations(wanted.decorations, out);
            }
            *current = wanted;
        }

        out.push_str(text);
    }

    fn write_color(&self, color: TextColor, out: &mut String) {
        if let Some(code) = color.legacy_code() {
            out.push(self.marker);
            out.push(code);
            return;
        }

        let rgb = color.foreground();
        out.push(self.marker);
        out.push(HEX_CODE);
        for digit in format!("{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b).chars() {
            out.push(self.marker);
            out.push(digit);
        }
    }

    fn write_decorations(&self, decorations: TextDecorations, out: &mut String) {
        for decoration in TextDecoration::ALL {
            if decorations.contains(decoration.into()) {
                out.push(self.marker);
                out.push(decoration.code());
            }
        }
    }
}
