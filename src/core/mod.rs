//! Core garden types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod time;

pub use types::*;
pub use error::Error;
