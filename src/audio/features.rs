//! Normalized sound feature vector.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::uniform;

/// Normalized `[0, 1]` summary of a sound.
///
/// `timbre` and `harmony` are optional extras; when absent every derivation
/// treats them as neutral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub volume: f32,
    pub pitch: f32,
    pub energy: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timbre: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmony: Option<f32>,
}

impl FeatureVector {
    /// Build a vector, clamping every component into `[0, 1]`.
    pub fn new(volume: f32, pitch: f32, energy: f32) -> Self {
        Self {
            volume: unit(volume),
            pitch: unit(pitch),
            energy: unit(energy),
            timbre: None,
            harmony: None,
        }
    }

    pub fn with_timbre(mut self, timbre: f32) -> Self {
        self.timbre = Some(unit(timbre));
        self
    }

    pub fn with_harmony(mut self, harmony: f32) -> Self {
        self.harmony = Some(unit(harmony));
        self
    }

    /// All components at 0.5
    pub fn neutral() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }

    /// Plausible default for a tree planted without a sound.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            uniform(rng, 0.3, 0.8),
            uniform(rng, 0.2, 0.8),
            uniform(rng, 0.4, 0.7),
        )
    }

    /// Copy with every component forced back into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            volume: unit(self.volume),
            pitch: unit(self.pitch),
            energy: unit(self.energy),
            timbre: self.timbre.map(unit),
            harmony: self.harmony.map(unit),
        }
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Clamp into `[0, 1]`; NaN maps to 0.
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
