//! prizecore - prize storage, claim logic and image rendering for prizebot
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `storage`: SQLite pool, migrations and queries
//! - `prizes`: prize lifecycle manager (registration, claims, unused → used)
//! - `imaging`: teaser blur, collage composition, JPEG encoding
//! - `assets`: original and teaser image directories
//! - `broadcast`: one broadcast cycle over a pluggable delivery sink
//! - `progress`: per-user progress collage

pub mod assets;
pub mod broadcast;
pub mod core;
pub mod imaging;
pub mod prizes;
pub mod progress;
pub mod storage;

// Re-export commonly used types for convenience
pub use assets::AssetStore;
pub use broadcast::{run_broadcast_cycle, BroadcastReport, TeaserSink};
pub use self::core::{config, AppError, AppResult};
pub use prizes::PrizeManager;
pub use progress::{build_progress, ProgressReport};
pub use storage::{create_pool, ClaimOutcome, DbPool, Prize};
