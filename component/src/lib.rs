//! Minecraft chat components: a tree of styled content nodes, its JSON form and the legacy
//! `§`/`&` formatting codes.

pub mod identifier;
pub mod legacy;
pub mod style;
pub mod text;

pub use identifier::*;
pub use legacy::LegacySerializer;
pub use style::*;
pub use text::*;
