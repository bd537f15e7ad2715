//! RGB color with hex round-tripping and interpolation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::Error;

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for Color {
    /// Channel-wise interpolation, truncating like an integer cast.
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color::rgb(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fallback bark brown
    pub const BARK: Color = Color::rgb(0x8B, 0x45, 0x13);
    /// Fallback forest green
    pub const FOREST: Color = Color::rgb(0x22, 0x8B, 0x22);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix alone would accept a sign such as "+f"
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::Config(format!("invalid color '{}'", hex)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::Config(format!("invalid color '{}'", hex)))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shift toward green for ground cover, with a little random variation.
    pub fn grass_tint<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let r = (self.r as f32 * 0.7) as i32 + rng.random_range(-20..=20);
        let g = ((self.g as f32 * 1.2 + 30.0) as i32).min(255) + rng.random_range(-15..=15);
        let b = (self.b as f32 * 0.6) as i32 + rng.random_range(-20..=20);
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::rgb(clamp(r), clamp(g), clamp(b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Serde support (hex strings)
// ---------------------------------------------------------------------------

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
