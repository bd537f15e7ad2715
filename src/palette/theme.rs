//! Named garden themes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use super::color::Color;

/// Palette shared by every tree in a garden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Trunk and branch colors
    pub trunk: Vec<Color>,
    /// Leaf colors
    pub leaves: Vec<Color>,
    /// Optional (from, to) gradient pairs for gradient rendering
    #[serde(default)]
    pub gradients: Vec<(Color, Color)>,
    pub background: Color,
    /// Grass color when no tree is close enough to borrow from
    pub grass_base: Color,
}

impl Theme {
    /// Pick a trunk color uniformly. Empty palettes fall back to bark brown.
    pub fn trunk_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        pick(&self.trunk, rng).unwrap_or(Color::BARK)
    }

    /// Pick a leaf color uniformly. Empty palettes fall back to forest green.
    pub fn leaf_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        pick(&self.leaves, rng).unwrap_or(Color::FOREST)
    }

    /// Gradient pair for a tree's stored index, wrapping around the list.
    ///
    /// Themes without gradient pairs synthesise one from the first and last
    /// leaf colors.
    pub fn gradient(&self, index: usize) -> (Color, Color) {
        if !self.gradients.is_empty() {
            return self.gradients[index % self.gradients.len()];
        }
        match (self.leaves.first(), self.leaves.last()) {
            (Some(a), Some(b)) => (*a, *b),
            _ => (Color::FOREST, Color::FOREST),
        }
    }

    /// Whether `color` belongs to this theme's trunk or leaf palette.
    pub fn contains(&self, color: Color) -> bool {
        self.trunk.contains(&color) || self.leaves.contains(&color)
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Theme> {
        builtin_themes()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownTheme(name.to_string()))
    }

    /// Warm oranges and golds over brown bark
    pub fn warm() -> Self {
        Self {
            name: "warm".into(),
            trunk: hexes(&["#8B4513", "#A0522D", "#CD853F", "#D2691E", "#DEB887"]),
            leaves: hexes(&[
                "#FF6B35", "#FF7F50", "#FF8C69", "#FFA500", "#FFB347",
                "#F7931E", "#FFD700", "#FFFF99", "#FFEFD5", "#FFE4B5",
            ]),
            gradients: vec![
                (hex("#FF6B35"), hex("#FFD700")),
                (hex("#FF7F50"), hex("#FFFF99")),
                (hex("#FFA500"), hex("#FFE4B5")),
            ],
            background: hex("#FFF8DC"),
            grass_base: hex("#9ACD32"),
        }
    }

    /// Teals and blues over slate bark
    pub fn cool() -> Self {
        Self {
            name: "cool".into(),
            trunk: hexes(&["#2F4F4F", "#708090", "#778899", "#87CEEB", "#B0C4DE"]),
            leaves: hexes(&[
                "#00CED1", "#20B2AA", "#48D1CC", "#87CEEB", "#B0E0E6",
                "#4682B4", "#5F9EA0", "#6495ED", "#7B68EE", "#9370DB",
            ]),
            gradients: vec![
                (hex("#00CED1"), hex("#87CEEB")),
                (hex("#20B2AA"), hex("#B0E0E6")),
                (hex("#4682B4"), hex("#9370DB")),
            ],
            background: hex("#F0F8FF"),
            grass_base: hex("#4682B4"),
        }
    }

    /// Greyscale
    pub fn mono() -> Self {
        Self {
            name: "mono".into(),
            trunk: hexes(&["#2F2F2F", "#4F4F4F", "#696969", "#808080", "#A9A9A9"]),
            leaves: hexes(&[
                "#696969", "#778899", "#808080", "#A9A9A9", "#C0C0C0",
                "#D3D3D3", "#DCDCDC", "#E5E5E5", "#F0F0F0", "#F8F8FF",
            ]),
            gradients: vec![
                (hex("#696969"), hex("#D3D3D3")),
                (hex("#808080"), hex("#F0F0F0")),
                (hex("#A9A9A9"), hex("#F8F8FF")),
            ],
            background: hex("#F5F5F5"),
            grass_base: hex("#808080"),
        }
    }

    /// Pinks fading to lime
    pub fn sunset() -> Self {
        Self {
            name: "sunset".into(),
            trunk: hexes(&["#8B4513", "#CD853F", "#DEB887", "#F4A460", "#FFDAB9"]),
            leaves: hexes(&[
                "#FF69B4", "#FF1493", "#FF6347", "#FF4500", "#FF8C00",
                "#FFD700", "#FFFF00", "#ADFF2F", "#32CD32", "#00FF7F",
            ]),
            gradients: vec![
                (hex("#FF69B4"), hex("#FFD700")),
                (hex("#FF1493"), hex("#ADFF2F")),
                (hex("#FF4500"), hex("#32CD32")),
            ],
            background: hex("#FFE4E1"),
            grass_base: hex("#32CD32"),
        }
    }

    /// Cyan and violet on a night sky
    pub fn aurora() -> Self {
        Self {
            name: "aurora".into(),
            trunk: hexes(&["#2F4F4F", "#483D8B", "#6A5ACD", "#9370DB", "#BA55D3"]),
            leaves: hexes(&[
                "#00FFFF", "#00BFFF", "#1E90FF", "#0000FF", "#4169E1",
                "#9370DB", "#8A2BE2", "#9400D3", "#FF00FF", "#FF1493",
            ]),
            gradients: vec![
                (hex("#00FFFF"), hex("#9370DB")),
                (hex("#1E90FF"), hex("#FF00FF")),
                (hex("#0000FF"), hex("#FF1493")),
            ],
            background: hex("#191970"),
            grass_base: hex("#00FFFF"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::warm()
    }
}

/// All built-in themes in cycling order.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme::warm(),
        Theme::cool(),
        Theme::mono(),
        Theme::sunset(),
        Theme::aurora(),
    ]
}

fn pick<R: Rng + ?Sized>(colors: &[Color], rng: &mut R) -> Option<Color> {
    if colors.is_empty() {
        None
    } else {
        Some(colors[rng.random_range(0..colors.len())])
    }
}

/// Compile-time `#RRGGBB` literal; built-in tables only.
const fn hex(s: &str) -> Color {
    const fn nibble(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0,
        }
    }
    let b = s.as_bytes();
    Color::rgb(
        nibble(b[1]) << 4 | nibble(b[2]),
        nibble(b[3]) << 4 | nibble(b[4]),
        nibble(b[5]) << 4 | nibble(b[6]),
    )
}

fn hexes(list: &[&str]) -> Vec<Color> {
    list.iter().map(|s| hex(s)).collect()
}
