//! Procedural tree model.
//!
//! A tree is planted from a [`TreeStyle`] and a sound [`FeatureVector`]. The
//! [`StyleTable`] turns those into [`DerivedParameters`] once; after that the
//! [`Tree`] only tracks growth and sway, and regenerates its branches through
//! the [`BranchGenerator`] on every render.
//!
//! [`FeatureVector`]: crate::audio::FeatureVector

pub mod style;
pub mod params;
pub mod branch;
pub mod entity;

pub use style::TreeStyle;
pub use params::{DerivedParameters, StyleModifier, StyleModifiers, StyleShape, StyleTable};
pub use branch::{BranchConfig, BranchGenerator, BranchNode, BranchStats, LeafKind, Paint};
pub use entity::{GrowthStage, RenderContext, Tree, TreeId};
