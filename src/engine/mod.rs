// src/engine/mod.rs

pub mod runtime;

pub use runtime::{Runtime, RuntimeEvent};
