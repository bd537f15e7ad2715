//! Colors and garden themes.
//!
//! A [`Theme`] is the palette every tree in a garden draws from: trunk and
//! leaf colors, optional two-color gradient pairs, a background and a base
//! grass tint. Themes are plain values; retheming a garden swaps which one
//! the next render reads.

pub mod color;
pub mod theme;

pub use color::{Color, Lerp};
pub use theme::{Theme, builtin_themes};
