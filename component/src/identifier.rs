use std::{
    borrow::Cow,
    fmt::{Display, Write},
};

use ownable::IntoOwned;
use serde_with::SerializeDisplay;
use thiserror::Error;

const IDENTIFIER_MAX_LEN: usize = 32767;
const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced resource location such as `minecraft:uniform`.
#[derive(Debug, Clone, Eq, SerializeDisplay, IntoOwned)]
pub struct Identifier<'a> {
    pub(crate) namespace: Option<Cow<'a, str>>,
    pub(crate) value: Cow<'a, str>,
}

impl<'a> Identifier<'a> {
    pub fn from_string(string: impl Into<Cow<'a, str>>) -> Result<Self, IdentifierParseError> {
        let string: Cow<'a, str> = string.into();

        if string.len() > IDENTIFIER_MAX_LEN {
            return Err(IdentifierParseError::TooLong(string.to_string()));
        }

        let Some(colon_i) = string.find(':') else {
            check_value(&string, 0)?;
            return Ok(Self {
                namespace: None,
                value: string,
            });
        };

        check_namespace(&string[..colon_i])?;
        check_value(&string[colon_i + 1..], colon_i + 1)?;

        let (namespace, value) = match string {
            Cow::Borrowed(s) => (
                Cow::Borrowed(&s[..colon_i]),
                Cow::Borrowed(&s[colon_i + 1..]),
            ),
            Cow::Owned(s) => (
                Cow::Owned(s[..colon_i].to_string()),
                Cow::Owned(s[colon_i + 1..].to_string()),
            ),
        };

        Ok(Self {
            namespace: Some(namespace),
            value,
        })
    }

    pub fn from_parts(
        namespace: impl Into<Cow<'a, str>>,
        value: impl Into<Cow<'a, str>>,
    ) -> Result<Self, IdentifierParseError> {
        let (namespace, value): (Cow<'a, str>, Cow<'a, str>) = (namespace.into(), value.into());

        check_namespace(&namespace)?;
        check_value(&value, namespace.len() + 1)?;

        Ok(Identifier {
            namespace: Some(namespace),
            value,
        })
    }

    /// Builds an identifier in the implicit `minecraft` namespace without validation.
    pub(crate) const fn builtin(value: &'static str) -> Identifier<'static> {
        Identifier {
            namespace: None,
            value: Cow::Borrowed(value),
        }
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

fn check_namespace(namespace: &str) -> Result<(), IdentifierParseError> {
    for (i, c) in namespace.char_indices() {
        match c {
            'a'..='z' | '0'..='9' | '.' | '-' | '_' => continue,
            _ => return Err(IdentifierParseError::IllegalCharacter(namespace.to_string(), i)),
        }
    }
    Ok(())
}

fn check_value(value: &str, offset: usize) -> Result<(), IdentifierParseError> {
    for (i, c) in value.char_indices() {
        match c {
            'a'..='z' | '0'..='9' | '.' | '-' | '_' | '/' => continue,
            _ => {
                return Err(IdentifierParseError::IllegalCharacter(
                    value.to_string(),
                    offset + i,
                ))
            }
        }
    }
    Ok(())
}

impl TryFrom<String> for Identifier<'static> {
    type Error = IdentifierParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::from_string(value)
    }
}

impl Display for Identifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(namespace) = &self.namespace {
            namespace.fmt(f)?;
            f.write_char(':')?;
        }
        self.value.fmt(f)
    }
}

impl PartialEq for Identifier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace() && self.value == other.value
    }
}

#[derive(Debug, Error)]
pub enum IdentifierParseError {
    #[error(
        "identifier {0} is too long, must be at most {} characters",
        IDENTIFIER_MAX_LEN
    )]
    TooLong(String),
    #[error("identifier {0} has illegal character at position {1}, must be one of [a-z0-9.-_] in namespace or [a-z0-9.-_/] in value")]
    IllegalCharacter(String, usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn implicit_namespace() {
        let identifier = Identifier::from_string("uniform").unwrap();
        assert_eq!(identifier.namespace(), "minecraft");
        assert_eq!(identifier.value(), "uniform");
        assert_eq!(identifier, Identifier::from_parts("minecraft", "uniform").unwrap());
        assert_eq!(identifier.to_string(), "uniform");
    }

    #[test]
    fn explicit_namespace() {
        let identifier = Identifier::from_string("nametags:fonts/fancy").unwrap();
        assert_eq!(identifier.namespace(), "nametags");
        assert_eq!(identifier.value(), "fonts/fancy");
        assert_eq!(identifier.to_string(), "nametags:fonts/fancy");
    }

    #[test]
    fn owned_input_is_split() {
        let identifier = Identifier::from_string(String::from("a:b")).unwrap();
        assert_eq!(identifier.namespace(), "a");
        assert_eq!(identifier.value(), "b");
    }

    #[test]
    fn illegal_characters() {
        assert!(matches!(
            Identifier::from_string("Fancy:font"),
            Err(IdentifierParseError::IllegalCharacter(_, 0))
        ));
        assert!(matches!(
            Identifier::from_string("fancy:Font"),
            Err(IdentifierParseError::IllegalCharacter(_, 6))
        ));
        assert!(matches!(
            Identifier::from_string("a/b:c"),
            Err(IdentifierParseError::IllegalCharacter(_, 1))
        ));
    }

    #[test]
    fn too_long() {
        let long = "a".repeat(IDENTIFIER_MAX_LEN + 1);
        assert!(matches!(
            Identifier::from_string(long),
            Err(IdentifierParseError::TooLong(_))
        ));
    }
}
