//! Shared types used across the earthview crates.

pub mod types;

pub use types::{Rgb, Transform};
