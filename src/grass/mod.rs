//! Ground-cover grass.
//!
//! Patches are scattered along the ground band once a garden holds enough
//! trees, tinted from the leaves of nearby trees.

pub mod config;
pub mod patch;

pub use config::GrassConfig;
pub use patch::Grass;
