//! Keyword heuristic that turns a text description of a sound into features.
//!
//! The description is scanned for words from a fixed table. Every hit pulls
//! volume, pitch and energy halfway towards the word's values, starting from
//! defaults derived from the text itself (length for volume, 0.5 otherwise).
//! Letter mix nudges pitch and punctuation adds energy.

use rand::Rng;

use super::features::FeatureVector;

/// Keyword and the feature values it pulls towards.
#[derive(Clone, Copy, Debug)]
struct Keyword {
    word: &'static str,
    volume: f32,
    pitch: f32,
    energy: f32,
}

const fn kw(word: &'static str, volume: f32, pitch: f32, energy: f32) -> Keyword {
    Keyword { word, volume, pitch, energy }
}

const KEYWORDS: &[Keyword] = &[
    kw("high", 0.8, 0.9, 0.7),
    kw("高音", 0.8, 0.9, 0.7),
    kw("loud", 0.9, 0.5, 0.8),
    kw("大声", 0.9, 0.5, 0.8),
    kw("deep", 0.6, 0.2, 0.5),
    kw("low", 0.6, 0.2, 0.5),
    kw("低音", 0.6, 0.2, 0.5),
    kw("soft", 0.3, 0.4, 0.3),
    kw("gentle", 0.3, 0.4, 0.3),
    kw("轻柔", 0.3, 0.4, 0.3),
    kw("rhythm", 0.7, 0.6, 0.9),
    kw("节奏", 0.7, 0.6, 0.9),
    kw("melod", 0.5, 0.8, 0.6),
    kw("旋律", 0.5, 0.8, 0.6),
    kw("harmon", 0.6, 0.7, 0.5),
    kw("和谐", 0.6, 0.7, 0.5),
    kw("intense", 0.9, 0.8, 0.9),
    kw("激烈", 0.9, 0.8, 0.9),
];

/// Words that set timbre directly (bright/pure near 1, noisy near 0).
const TIMBRE_WORDS: &[(&str, f32)] = &[
    ("pure", 0.9), ("纯净", 0.9),
    ("clear", 0.85), ("清澈", 0.85),
    ("natural", 0.5), ("自然", 0.5),
    ("rough", 0.2), ("粗糙", 0.2),
    ("noisy", 0.1), ("嘈杂", 0.1),
    ("distort", 0.05), ("失真", 0.05),
];

/// Words that set harmony directly (simple near 0, rich near 1).
const HARMONY_WORDS: &[(&str, f32)] = &[
    ("monoton", 0.1), ("单调", 0.1),
    ("simple", 0.2), ("简单", 0.2),
    ("balanced", 0.6), ("平衡", 0.6),
    ("complex", 0.8), ("复杂", 0.8),
    ("layered", 0.85), ("层次", 0.85),
    ("rich", 0.9), ("丰富", 0.9),
];

/// Deterministic text-to-features analyzer.
#[derive(Clone, Debug)]
pub struct TextAnalyzer {
    /// Characters at which the length-derived volume saturates
    pub saturation_len: usize,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self { saturation_len: 20 }
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a description. Blank input yields random features.
    pub fn analyze<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> FeatureVector {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return FeatureVector::random(rng);
        }

        let len = text.chars().count();
        let mut volume = (len as f32 / self.saturation_len.max(1) as f32).min(1.0);
        let mut pitch = 0.5;
        let mut energy = 0.5;

        for k in KEYWORDS.iter().filter(|k| text.contains(k.word)) {
            volume = (volume + k.volume) / 2.0;
            pitch = (pitch + k.pitch) / 2.0;
            energy = (energy + k.energy) / 2.0;
        }

        let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count();
        let consonants = text
            .chars()
            .filter(|c| c.is_ascii_alphabetic() && !"aeiou".contains(*c))
            .count();
        if vowels + consonants > 0 {
            let ratio = vowels as f32 / (vowels + consonants) as f32;
            pitch = (pitch + ratio) / 2.0;
        }

        let punctuation = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        energy = (energy + punctuation as f32 / 10.0).min(1.0);

        let mut features = FeatureVector::new(volume, pitch, energy);
        if let Some(t) = last_hit(&text, TIMBRE_WORDS) {
            features = features.with_timbre(t);
        }
        if let Some(h) = last_hit(&text, HARMONY_WORDS) {
            features = features.with_harmony(h);
        }

        log::debug!("Analyzed '{}' -> {:?}", text, features);
        features
    }
}

/// Value of the last table entry found in `text`.
fn last_hit(text: &str, table: &[(&str, f32)]) -> Option<f32> {
    table
        .iter()
        .filter(|(word, _)| text.contains(word))
        .map(|(_, v)| *v)
        .last()
}
