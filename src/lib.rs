//! Echo Garden - procedural trees grown from sound
//!
//! A [`garden::Garden`] holds trees planted from sound features. Each tree's
//! shape is derived once from its style and features; growth and sway
//! advance every animation tick, and every redraw regenerates the branches
//! onto any [`canvas::Canvas`].

pub mod core;
pub mod math;
pub mod audio;
pub mod palette;
pub mod canvas;
pub mod tree;
pub mod grass;
pub mod garden;
