//! Synthetic waveform source for hosts without a microphone.

use std::f64::consts::TAU;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::types::uniform;
use super::FeatureSource;
use super::features::FeatureVector;
use super::live::extract_features;

const SAMPLE_RATE: f64 = 44_100.0;
const WINDOW_LEN: usize = 200;
/// Every partial repeats after one period of the 220 Hz base
const BASE_PERIOD: f64 = 1.0 / 220.0;

/// Three stacked sines (220/440/880 Hz) with a little noise.
pub struct SimulatedSource {
    /// Peak amplitude in 16-bit sample units
    pub amplitude: f32,
    /// Seconds into the current base period
    time: f64,
    rng: StdRng,
    last_window: Vec<i16>,
}

impl SimulatedSource {
    pub fn new(seed: u64) -> Self {
        Self {
            amplitude: 8000.0,
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
            last_window: Vec::new(),
        }
    }

    /// Generate the next window and advance time past it.
    pub fn next_window(&mut self) -> Vec<i16> {
        let window: Vec<i16> = (0..WINDOW_LEN)
            .map(|i| {
                let t = self.time + i as f64 / SAMPLE_RATE;
                let tone = 0.3 * (TAU * 440.0 * t).sin()
                    + 0.2 * (TAU * 880.0 * t).sin()
                    + 0.1 * (TAU * 220.0 * t).sin();
                let wave = tone as f32 + 0.05 * uniform(&mut self.rng, -0.5, 0.5);
                (wave * self.amplitude).clamp(i16::MIN as f32, i16::MAX as f32) as i16
            })
            .collect();
        self.time = (self.time + WINDOW_LEN as f64 / SAMPLE_RATE).rem_euclid(BASE_PERIOD);
        self.last_window = window.clone();
        window
    }

    /// Most recently generated window, for waveform displays
    pub fn last_window(&self) -> &[i16] {
        &self.last_window
    }
}

impl FeatureSource for SimulatedSource {
    fn next_features(&mut self) -> Option<FeatureVector> {
        let window = self.next_window();
        extract_features(&window)
    }
}
