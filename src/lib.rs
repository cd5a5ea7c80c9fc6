//! Kart Rating - Glicko-2 skill ratings for kart races
//!
//! This crate scores free-for-all races by expanding each finishing order
//! into round-robin head-to-head results and applying one Glicko-2 rating
//! period per race, then ranks racers by conservative score.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use leaderboard::{Leaderboard, Standing};
pub use rating::{Glicko2RatingCalculator, RaceRecorder, RatingCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
