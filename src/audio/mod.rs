//! Sound feature inputs.
//!
//! Trees are shaped by a [`FeatureVector`]: a handful of `[0, 1]` scalars
//! summarising a sound. Vectors come from a keyword heuristic over free text
//! ([`TextAnalyzer`]), from live sample windows ([`LiveInput`]), or from a
//! synthetic waveform ([`SimulatedSource`]).

pub mod features;
pub mod text;
pub mod live;
pub mod simulated;

pub use features::FeatureVector;
pub use text::TextAnalyzer;
pub use live::{LiveInput, SampleProducer, SampleRing, extract_features};
pub use simulated::SimulatedSource;

/// Something that can be polled for the current sound features.
///
/// `None` means the source has nothing to offer right now (not running,
/// no samples yet); callers substitute random features.
pub trait FeatureSource {
    fn next_features(&mut self) -> Option<FeatureVector>;
}
