//! Tree style tags.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::Error;

/// Tree visual style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    #[default]
    Classic,
    /// Drooping polyline branches
    Weeping,
    /// Short, many branches, dense leaves
    Bushy,
    Tall,
    Wide,
    /// Helical trunk
    Spiral,
    /// Binary recursion to a fixed depth
    Fractal,
    /// Layered cone of radial needle branches
    Pine,
    /// Rising branches lined with blossoms
    Cherry,
}

impl TreeStyle {
    /// Every style, in the order used for random selection
    pub const ALL: [TreeStyle; 9] = [
        TreeStyle::Classic,
        TreeStyle::Weeping,
        TreeStyle::Bushy,
        TreeStyle::Tall,
        TreeStyle::Wide,
        TreeStyle::Spiral,
        TreeStyle::Fractal,
        TreeStyle::Pine,
        TreeStyle::Cherry,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TreeStyle::Classic => "classic",
            TreeStyle::Weeping => "weeping",
            TreeStyle::Bushy => "bushy",
            TreeStyle::Tall => "tall",
            TreeStyle::Wide => "wide",
            TreeStyle::Spiral => "spiral",
            TreeStyle::Fractal => "fractal",
            TreeStyle::Pine => "pine",
            TreeStyle::Cherry => "cherry",
        }
    }

    /// Two-letter code used in sound codes
    pub fn code(self) -> &'static str {
        match self {
            TreeStyle::Classic => "CL",
            TreeStyle::Weeping => "WP",
            TreeStyle::Bushy => "BS",
            TreeStyle::Tall => "TL",
            TreeStyle::Wide => "WD",
            TreeStyle::Spiral => "SP",
            TreeStyle::Fractal => "FR",
            TreeStyle::Pine => "PN",
            TreeStyle::Cherry => "CH",
        }
    }

    /// Uniform choice over [`TreeStyle::ALL`]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for TreeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeStyle {
    type Err = Error;

    /// Accepts the style name or its code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s) || style.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownStyle(s.to_string()))
    }
}
