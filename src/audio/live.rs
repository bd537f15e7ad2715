//! Live sample capture plumbing.
//!
//! An audio callback thread pushes fixed-size sample windows into a
//! [`SampleRing`]; the animation thread only ever reads the newest window.
//! The ring is bounded and evicts the oldest window on push, so the producer
//! never blocks on a slow consumer.
//!
//! Device handling lives with the host application. This module owns the
//! shared buffer, the running flag, and the feature extraction.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::FeatureSource;
use super::features::FeatureVector;

/// Default number of windows kept
pub const DEFAULT_RING_CAPACITY: usize = 100;

/// RMS value treated as full volume (16-bit samples)
const VOLUME_FULL_SCALE: f32 = 3000.0;
/// Mean absolute amplitude treated as full energy
const ENERGY_FULL_SCALE: f32 = 1000.0;

/// Bounded FIFO of sample windows shared between threads.
#[derive(Clone, Debug)]
pub struct SampleRing {
    windows: Arc<Mutex<VecDeque<Vec<i16>>>>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            windows: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Vec<i16>>> {
        // A panicked producer leaves plain sample data behind; keep reading it.
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a window, evicting the oldest when full.
    pub fn push(&self, window: Vec<i16>) {
        let mut windows = self.lock();
        if windows.len() >= self.capacity {
            windows.pop_front();
        }
        windows.push_back(window);
    }

    /// Copy of the most recent window
    pub fn latest(&self) -> Option<Vec<i16>> {
        self.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::new(DEFAULT_RING_CAPACITY)
    }
}

/// Handle given to the audio callback thread.
#[derive(Clone, Debug)]
pub struct SampleProducer {
    ring: SampleRing,
    running: Arc<AtomicBool>,
}

impl SampleProducer {
    /// Push a window if live mode is on; windows arriving while stopped are
    /// dropped. Returns whether the window was kept.
    pub fn push(&self, window: Vec<i16>) -> bool {
        if !self.running.load(Ordering::Acquire) {
            return false;
        }
        self.ring.push(window);
        true
    }
}

/// Live-mode switch plus the ring the callback feeds.
#[derive(Debug)]
pub struct LiveInput {
    ring: SampleRing,
    running: Arc<AtomicBool>,
}

impl LiveInput {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: SampleRing::new(capacity),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Turn live mode on. Returns `false` if it was already running.
    pub fn start(&self) -> bool {
        let started = self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if started {
            log::info!("Live input started");
        }
        started
    }

    /// Turn live mode off and drop buffered windows.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.ring.clear();
            log::info!("Live input stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Handle for the capture thread
    pub fn producer(&self) -> SampleProducer {
        SampleProducer {
            ring: self.ring.clone(),
            running: Arc::clone(&self.running),
        }
    }

    pub fn ring(&self) -> &SampleRing {
        &self.ring
    }
}

impl Default for LiveInput {
    fn default() -> Self {
        Self::new(DEFAULT_RING_CAPACITY)
    }
}

impl FeatureSource for LiveInput {
    fn next_features(&mut self) -> Option<FeatureVector> {
        if !self.is_running() {
            return None;
        }
        self.ring.latest().and_then(|w| extract_features(&w))
    }
}

/// Features of one sample window: RMS volume, zero-crossing-rate pitch
/// proxy, and mean absolute amplitude energy. Empty windows yield `None`.
pub fn extract_features(samples: &[i16]) -> Option<FeatureVector> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;

    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / n).sqrt() as f32;

    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] as i32) * (w[1] as i32) < 0)
        .count();

    let mean_abs = samples.iter().map(|&s| (s as f64).abs()).sum::<f64>() / n;

    Some(FeatureVector::new(
        (rms / VOLUME_FULL_SCALE).min(1.0),
        (crossings as f32 / samples.len() as f32).min(1.0),
        (mean_abs as f32 / ENERGY_FULL_SCALE).min(1.0),
    ))
}
