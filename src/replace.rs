use std::{borrow::Cow, mem, ops::Range};

use component::{MergeStrategy, TextComponent, TextContent, TextStyling};

/// Replaces every whole-word occurrence of `player_name` in the text of `component` and its
/// descendants (children and translation arguments) with a component obtained from
/// `custom_name`.
///
/// A text node containing the name keeps its style but loses its text: the text around each
/// occurrence and the replacements are inserted, in order, in front of its existing children.
/// Every inserted component inherits the unset attributes of the node's style.
///
/// `custom_name` is called once per occurrence. Returns whether anything was replaced.
pub fn replace_username<'a, F>(
    component: &mut TextComponent<'a>,
    player_name: &str,
    mut custom_name: F,
) -> bool
where
    F: FnMut() -> TextComponent<'a>,
{
    if player_name.is_empty() {
        return false;
    }
    replace_in(component, player_name, &mut custom_name)
}

fn replace_in<'a, F>(component: &mut TextComponent<'a>, player_name: &str, custom_name: &mut F) -> bool
where
    F: FnMut() -> TextComponent<'a>,
{
    let mut replaced = false;
    for child in component.children_mut() {
        if replace_in(child, player_name, custom_name) {
            replaced = true;
        }
    }

    if let Some(arguments) = component.arguments_mut() {
        for argument in arguments {
            if replace_in(argument, player_name, custom_name) {
                replaced = true;
            }
        }
    }

    let TextContent::Text(content) = component.content_mut() else {
        return replaced;
    };

    let matches = find_name_matches(content.text(), player_name);
    if matches.is_empty() {
        return replaced;
    }

    let text = mem::take(content.text_mut());
    let style = component.style().clone();

    if matches == [0] && text.len() == player_name.len() {
        component.insert_child(0, inherit_style(custom_name(), &style));
        return true;
    }

    let mut inserted = Vec::with_capacity(matches.len() * 2 + 1);
    let mut last_name_end = 0;
    for name_start in matches {
        if name_start > last_name_end {
            inserted.push(spacer(&text, last_name_end..name_start, &style));
        }
        inserted.push(inherit_style(custom_name(), &style));
        last_name_end = name_start + player_name.len();
    }
    if last_name_end < text.len() {
        inserted.push(spacer(&text, last_name_end..text.len(), &style));
    }

    component.children_mut().splice(0..0, inserted);
    true
}

/// Byte offsets of the occurrences of `player_name` in `text` that are not part of a longer
/// name, left to right and non-overlapping.
fn find_name_matches(text: &str, player_name: &str) -> Vec<usize> {
    let mut matches = Vec::new();
    if player_name.is_empty() {
        return matches;
    }

    let mut from = 0;
    while let Some(offset) = text[from..].find(player_name) {
        let name_start = from + offset;
        let name_end = name_start + player_name.len();

        let before = text[..name_start].chars().next_back();
        let after = text[name_end..].chars().next();
        if before.is_some_and(is_name_char) || after.is_some_and(is_name_char) {
            from = name_start + text[name_start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        matches.push(name_start);
        from = name_end;
    }

    matches
}

/// Characters allowed in a Minecraft username.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn inherit_style<'a>(mut component: TextComponent<'a>, style: &TextStyling<'a>) -> TextComponent<'a> {
    component
        .style_mut()
        .merge(style, MergeStrategy::IfAbsentOnTarget);
    component
}

fn spacer<'a>(text: &Cow<'a, str>, range: Range<usize>, style: &TextStyling<'a>) -> TextComponent<'a> {
    let text = match text {
        Cow::Borrowed(text) => {
            let text: &'a str = *text;
            Cow::Borrowed(&text[range])
        }
        Cow::Owned(text) => Cow::Owned(text[range].to_string()),
    };
    inherit_style(TextComponent::text(text), style)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use component::{TextColor, TextDecoration};

    use super::*;

    fn marker<'a>() -> TextComponent<'a> {
        TextComponent::text("#")
    }

    fn texts<'a>(components: &'a [TextComponent<'_>]) -> Vec<&'a str> {
        components
            .iter()
            .map(|component| component.text_content().unwrap_or("?"))
            .collect()
    }

    #[test]
    fn absent_name_is_noop() {
        let original = TextComponent::text("Alice joined the game")
            .with_style(TextStyling::default().with_color(TextColor::Yellow));
        let mut component = original.clone();
        assert!(!replace_username(&mut component, "Bob", marker));
        assert_eq!(component, original);
    }

    #[test]
    fn empty_name_is_noop() {
        let mut component = TextComponent::text("Bob");
        assert!(!replace_username(&mut component, "", marker));
        assert_eq!(component, TextComponent::text("Bob"));
    }

    #[test]
    fn single_occurrence() {
        let mut component = TextComponent::text("<Bob> hello");
        assert!(replace_username(&mut component, "Bob", marker));

        assert_eq!(component.text_content(), Some(""));
        assert_eq!(texts(component.children()), ["<", "#", "> hello"]);
        assert_eq!(component.plain_text(), "<#> hello");
    }

    #[test]
    fn longer_names_are_not_replaced() {
        for text in ["Bobby is here", "xBob", "Bob_1", "Bob2 left", "I_Bob", "9Bob"] {
            let mut component = TextComponent::text(text);
            assert!(!replace_username(&mut component, "Bob", marker), "{text}");
            assert_eq!(component.text_content(), Some(text));
            assert!(component.children().is_empty());
        }
    }

    #[test]
    fn punctuation_delimits_names() {
        for (text, expected) in [
            ("(Bob)", "(#)"),
            ("Bob's house", "#'s house"),
            ("[VIP] Bob: hi", "[VIP] #: hi"),
            ("Bob-Bob", "#-#"),
            ("éBob", "é#"),
        ] {
            let mut component = TextComponent::text(text);
            assert!(replace_username(&mut component, "Bob", marker), "{text}");
            assert_eq!(component.plain_text(), expected);
        }
    }

    #[test]
    fn rejected_match_does_not_hide_later_one() {
        let mut component = TextComponent::text("BobBob Bob");
        assert!(replace_username(&mut component, "Bob", marker));
        assert_eq!(texts(component.children()), ["BobBob ", "#"]);
    }

    #[test]
    fn multiple_occurrences() {
        let calls = Cell::new(0);
        let mut component = TextComponent::text("Bob said hi to Bob");
        assert!(replace_username(&mut component, "Bob", || {
            calls.set(calls.get() + 1);
            marker()
        }));

        assert_eq!(calls.get(), 2);
        assert_eq!(texts(component.children()), ["#", " said hi to ", "#"]);
    }

    #[test]
    fn full_match_has_no_spacers() {
        let mut component = TextComponent::text("Bob")
            .with_style(TextStyling::default().with_color(TextColor::Gray));
        assert!(replace_username(&mut component, "Bob", marker));

        assert_eq!(component.text_content(), Some(""));
        assert_eq!(component.children().len(), 1);
        assert_eq!(component.children()[0].text_content(), Some("#"));
        assert_eq!(
            component.children()[0].style().color(),
            &Some(TextColor::Gray)
        );
        assert_eq!(component.style().color(), &Some(TextColor::Gray));
    }

    #[test]
    fn inserted_components_inherit_style() {
        let style = TextStyling::default()
            .with_color(TextColor::Red)
            .with_decoration(TextDecoration::Bold, true);
        let mut component = TextComponent::text("hi Bob!").with_style(style.clone());

        assert!(replace_username(&mut component, "Bob", || {
            TextComponent::text("Robert").with_style(
                TextStyling::default()
                    .with_color(TextColor::Gold)
                    .with_decoration(TextDecoration::Bold, false),
            )
        }));

        let children = component.children();
        assert_eq!(texts(children), ["hi ", "Robert", "!"]);
        assert_eq!(children[0].style(), &style);
        assert_eq!(children[2].style(), &style);
        assert_eq!(children[1].style().color(), &Some(TextColor::Gold));
        assert_eq!(children[1].style().bold(), &Some(false));
        assert_eq!(component.style(), &style);
    }

    #[test]
    fn replacement_comes_before_existing_children() {
        let mut component = TextComponent::text("Hi Bob").append(TextComponent::text(", welcome"));
        assert!(replace_username(&mut component, "Bob", marker));
        assert_eq!(texts(component.children()), ["Hi ", "#", ", welcome"]);
    }

    #[test]
    fn nested_children_and_arguments() {
        let mut component = TextComponent::translatable(
            "chat.type.text",
            vec![TextComponent::text("Bob"), TextComponent::text("hello Bob!")],
        )
        .append(TextComponent::text("").append(TextComponent::text("bye Bob")));

        assert!(replace_username(&mut component, "Bob", marker));

        let arguments = component.arguments().unwrap();
        assert_eq!(arguments.len(), 2);
        assert_eq!(texts(arguments[0].children()), ["#"]);
        assert_eq!(texts(arguments[1].children()), ["hello ", "#", "!"]);

        let nested = &component.children()[0].children()[0];
        assert_eq!(texts(nested.children()), ["bye ", "#"]);
        assert_eq!(component.plain_text(), "chat.type.text#hello #!bye #");
    }

    #[test]
    fn replacement_in_child_only() {
        let mut component = TextComponent::text("Welcome, ").append(TextComponent::text("Bob"));
        assert!(replace_username(&mut component, "Bob", marker));
        assert_eq!(component.text_content(), Some("Welcome, "));
        assert_eq!(component.plain_text(), "Welcome, #");
    }

    #[test]
    fn spacers_borrow_original_text() {
        let message = String::from("Bob: gg Bob");
        let mut component = TextComponent::text(message.as_str());
        assert!(replace_username(&mut component, "Bob", marker));

        let spacer = &component.children()[1];
        match spacer.content() {
            TextContent::Text(text) => assert!(matches!(text.text(), Cow::Borrowed(": gg "))),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn owned_text_is_sliced() {
        let mut component = TextComponent::text(String::from("gg Bob, gg"));
        assert!(replace_username(&mut component, "Bob", marker));
        assert_eq!(texts(component.children()), ["gg ", "#", ", gg"]);
    }

    #[test]
    fn match_offsets() {
        assert_eq!(find_name_matches("Bob and Bob", "Bob"), [0, 8]);
        assert_eq!(find_name_matches("Bobby Bob", "Bob"), [6]);
        assert_eq!(find_name_matches("ééBob", "Bob"), [4]);
        assert!(find_name_matches("anything", "").is_empty());
    }
}
