// src/sync/mod.rs

pub mod digest;
pub mod synchronizer;

pub use digest::{compute_file_digest, digest_bytes};
pub use synchronizer::{AssetSynchronizer, ChangeOutcome, PlanDecision, SyncReport};
