// src/watch/mod.rs

pub mod path_utils;
pub mod watcher;

pub use watcher::{WatcherHandle, spawn_watcher};
